use ratatui::Frame;

use crate::{
    app::{App, AppState},
    ui::history::render_history,
};

/// How one app state is drawn. Keys are handled by `App::handle_key`.
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

/// Name entry
pub struct EditingScreen;

impl Screen for EditingScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        f.render_widget(&*app, f.area());
    }
}

pub struct WheelScreen;

impl Screen for WheelScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        let area = f.area();
        app.viewport = (area.width, area.height);
        f.render_widget(&*app, area);
    }
}

/// Past winners - uses dedicated renderer
pub struct HistoryScreen;

impl Screen for HistoryScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_history(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Editing => Box::new(EditingScreen),
        AppState::Wheel => Box::new(WheelScreen),
        AppState::History => Box::new(HistoryScreen),
    }
}
