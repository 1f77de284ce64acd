// Library surface for the binary, headless integration tests and reuse.
// The wheel engine (geometry, planner, animation, wheel) has no terminal
// dependencies; everything else wires it to a ratatui front end.
pub mod animation;
pub mod app;
pub mod app_dirs;
pub mod celebration;
pub mod config;
pub mod geometry;
pub mod history;
pub mod logging;
pub mod notifier;
pub mod picker;
pub mod planner;
pub mod runtime;
pub mod ui;
pub mod util;
pub mod wheel;

pub use app::{App, AppAction, AppState};
pub use wheel::{Phase, StepOutcome, WheelError, WheelState, Winner};
