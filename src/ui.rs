pub mod history;
pub mod screen;

use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, AppState},
    celebration::Celebration,
    util::truncate_to_width,
    wheel::Phase,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
/// Widest the wheel column is drawn, pointer included.
const MAX_WHEEL_WIDTH: u16 = 40;

const STRIPE_COLORS: [Color; 8] = [
    Color::Red,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
    Color::LightRed,
    Color::LightGreen,
];

const PARTICLE_COLORS: [Color; 7] = [
    Color::Yellow,
    Color::Magenta,
    Color::Cyan,
    Color::Green,
    Color::Red,
    Color::Blue,
    Color::LightYellow,
];

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state {
            AppState::Editing => render_editing(self, area, buf),
            AppState::Wheel | AppState::History => render_wheel_screen(self, area, buf),
        }

        if self.celebration.is_active() {
            render_celebration_particles(&self.celebration, area, buf);
        }
    }
}

fn render_editing(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Who's on the wheel?",
        bold_style.fg(Color::Cyan),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let input = Line::from(vec![
        Span::raw(app.input.as_str()),
        Span::styled("_", dim_style.add_modifier(Modifier::SLOW_BLINK)),
    ]);
    Paragraph::new(input)
        .block(Block::default().borders(Borders::ALL).title("Name"))
        .render(chunks[1], buf);

    let names = if app.names.is_empty() {
        Span::styled("No names yet. Separate several with commas.", dim_style)
    } else {
        Span::styled(app.names.iter().join(", "), bold_style)
    };
    Paragraph::new(names)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Names ({})", app.names.len())),
        )
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(enter) add / spin on empty  (backspace) remove last  (esc) quit",
        dim_style.add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn render_wheel_screen(app: &App, area: Rect, buf: &mut Buffer) {
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // last winner
            Constraint::Min(3),    // wheel
            Constraint::Length(1), // remaining
            Constraint::Length(1), // legend
        ])
        .split(area);

    let headline = match (app.wheel.phase(), app.wheel.last_winner()) {
        (Phase::Spinning, _) => Span::styled("Spinning...", dim_style),
        (_, Some(winner)) => Span::styled(
            format!("Winner: {winner}"),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        (_, None) => Span::styled("Press space to spin", dim_style),
    };
    Paragraph::new(headline)
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    if app.wheel.items().is_empty() {
        let message = if app.wheel.phase() == Phase::Exhausted {
            "Everyone has been drawn. (r) start over  (e) edit names"
        } else {
            "The wheel is empty. (e) add names"
        };
        Paragraph::new(Span::styled(
            message,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
    } else {
        render_wheel(app, chunks[1], buf);
    }

    let remaining = format!(
        "{} left: {}",
        app.wheel.items().len(),
        app.wheel.items().iter().join(", ")
    );
    Paragraph::new(Span::styled(
        truncate_to_width(&remaining, usize::from(chunks[2].width)),
        dim_style,
    ))
    .alignment(Alignment::Center)
    .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        "(space) spin  (r) reset  (n) reshuffle  (e) edit  (h) history  (esc) quit",
        dim_style.add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

/// Draws the wheel as horizontal stripes scrolling vertically, with a pointer
/// on the centerline.
fn render_wheel(app: &App, area: Rect, buf: &mut Buffer) {
    let width = area.width.min(MAX_WHEEL_WIDTH);
    if width < 5 || area.height == 0 {
        return;
    }
    let left = area.x + (area.width - width) / 2;
    let stripe_x = left + 2;
    let stripe_width = width - 4;
    let rows = f64::from(area.height);

    let wheel = &app.wheel;
    let geometry = wheel.geometry();
    let count = wheel.items().len();
    let offset = wheel.offset();
    let row_position =
        |row: u16| geometry.base_start() + (f64::from(row) + 0.5) / rows * geometry.extent();
    let row_of = |position: f64| {
        ((position - geometry.base_start()) / geometry.extent() * rows).floor() as u16
    };
    // The pointer row shows whatever covers the centerline, even when a stripe
    // boundary falls inside that row.
    let pointer_row = row_of(geometry.centre()).min(area.height - 1);

    for row in 0..area.height {
        let index = if row == pointer_row {
            geometry.index_at_centre(count, offset)
        } else {
            geometry.index_at(count, offset, row_position(row))
        };
        let style = Style::default().bg(STRIPE_COLORS[index % STRIPE_COLORS.len()]);
        for x in stripe_x..stripe_x + stripe_width {
            if let Some(cell) = buf.cell_mut((x, area.y + row)) {
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }

    let label_style = Style::default()
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);
    for (index, label) in wheel.items().iter().enumerate() {
        let centre = geometry.segment_centre(count, index, offset);
        let row = row_of(centre);
        if row >= area.height {
            continue;
        }
        let text = truncate_to_width(label, usize::from(stripe_width.saturating_sub(2)));
        let text_width = unicode_width::UnicodeWidthStr::width(text.as_str()) as u16;
        let x = stripe_x + (stripe_width.saturating_sub(text_width)) / 2;
        let bg = STRIPE_COLORS[index % STRIPE_COLORS.len()];
        buf.set_string(x, area.y + row, text, label_style.bg(bg));
    }

    let pointer_style = if app.notifier.is_flashing() {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };
    buf.set_string(left, area.y + pointer_row, "▶", pointer_style);
    buf.set_string(left + width - 1, area.y + pointer_row, "◀", pointer_style);
}

fn render_celebration_particles(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = PARTICLE_COLORS[particle.color_index % PARTICLE_COLORS.len()];
        let alpha = 1.0 - (particle.age / particle.max_age);
        let style = if particle.is_letter() || alpha > 0.7 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if alpha > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        history::HistoryDb,
        notifier::{TerminalNotifier, TickSound},
    };
    use rand::{rngs::StdRng, SeedableRng};

    fn app_with(names: &[&str]) -> App {
        let notifier = TerminalNotifier::with_writer(TickSound::Silent, Box::new(std::io::sink()));
        App::new(
            Config::default(),
            names.iter().map(|s| s.to_string()).collect(),
            notifier,
            HistoryDb::in_memory().ok(),
        )
        .with_rng(StdRng::seed_from_u64(7))
    }

    fn buffer_text(buf: &Buffer) -> String {
        let area = buf.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .filter_map(|x| buf.cell((x, y)).map(|c| c.symbol().to_string()))
                    .collect::<String>()
            })
            .join("\n")
    }

    #[test]
    fn test_editing_screen_lists_names() {
        let mut app = app_with(&["Ada", "Grace"]);
        app.input = "Lin".to_string();
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Ada, Grace"));
        assert!(text.contains("Lin_"));
        assert!(text.contains("Names (2)"));
    }

    #[test]
    fn test_wheel_screen_draws_labels_and_pointer() {
        let mut app = app_with(&["Ada", "Grace", "Linus"]);
        app.build_wheel().unwrap();
        let area = Rect::new(0, 0, 60, 30);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);

        let text = buffer_text(&buf);
        for name in ["Ada", "Grace", "Linus"] {
            assert!(text.contains(name), "missing {name}");
        }
        assert!(text.contains('▶'));
        assert!(text.contains('◀'));
        assert!(text.contains("3 left"));
    }

    #[test]
    fn test_pointer_row_shows_centre_item() {
        let mut app = app_with(&["Ada", "Grace", "Linus", "Barbara"]);
        app.build_wheel().unwrap();
        let area = Rect::new(0, 0, 40, 24);
        let mut buf = Buffer::empty(area);
        render_wheel(&app, area, &mut buf);

        let centre = app.wheel.index_at_centre().unwrap();
        let expected = STRIPE_COLORS[centre % STRIPE_COLORS.len()];
        let pointer_row = area.height / 2;
        let cell = buf.cell((area.width / 2, pointer_row)).unwrap();
        assert_eq!(cell.bg, expected);
        assert_eq!(buf.cell((0, pointer_row)).unwrap().symbol(), "▶");
    }

    #[test]
    fn test_pointer_row_follows_centerline_inside_short_wheel() {
        // Eight stripes in four rows: the stripe boundary sits exactly on the
        // centerline, so the pointer row's own midpoint lies in the next stripe.
        let names = ["A", "B", "C", "D", "E", "F", "G", "H"];
        let mut app = app_with(&names);
        app.build_wheel().unwrap();
        let area = Rect::new(0, 5, 40, 4);
        let mut buf = Buffer::empty(area);
        render_wheel(&app, area, &mut buf);

        let centre = app.wheel.index_at_centre().unwrap();
        let pointer_row = area.y + 2;
        assert_eq!(buf.cell((0, pointer_row)).unwrap().symbol(), "▶");
        assert_eq!(buf.cell((39, pointer_row)).unwrap().symbol(), "◀");
        assert_eq!(
            buf.cell((30, pointer_row)).unwrap().bg,
            STRIPE_COLORS[centre % STRIPE_COLORS.len()]
        );
        // Midpoint of the pointer row, an eighth of a turn below the centre.
        let geometry = app.wheel.geometry();
        let row_middle = geometry.centre() + geometry.extent() / 8.0;
        let sampled = geometry.index_at(names.len(), app.wheel.offset(), row_middle);
        assert_ne!(centre, sampled);
    }

    #[test]
    fn test_exhausted_wheel_shows_start_over_hint() {
        let mut app = app_with(&["Solo"]);
        app.build_wheel().unwrap();
        app.wheel.spin_to(0);
        let end = app.wheel.settings().duration;
        app.wheel
            .step(end, &mut crate::notifier::NoopNotifier)
            .unwrap();

        let area = Rect::new(0, 0, 80, 20);
        let mut buf = Buffer::empty(area);
        (&app).render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains("Everyone has been drawn"));
        assert!(text.contains("Winner: Solo"));
    }

    #[test]
    fn test_tiny_area_does_not_panic() {
        let mut app = app_with(&["Ada", "Grace"]);
        app.build_wheel().unwrap();
        for (w, h) in [(1, 1), (4, 3), (10, 5)] {
            let area = Rect::new(0, 0, w, h);
            let mut buf = Buffer::empty(area);
            (&app).render(area, &mut buf);
        }
    }

    #[test]
    fn test_celebration_particles_drawn() {
        let mut app = app_with(&["Ada"]);
        let mut rng = StdRng::seed_from_u64(1);
        app.celebration.start("Ada", 40, 12, &mut rng);
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        render_celebration_particles(&app.celebration, area, &mut buf);
        let drawn = buffer_text(&buf)
            .chars()
            .filter(|c| !c.is_whitespace())
            .count();
        assert!(drawn > 0);
    }
}
