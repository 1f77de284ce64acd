use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::{app::App, history::HistoryEntry};

/// Pure presenter for a single past winner
pub fn present_row(entry: &HistoryEntry) -> Row<'static> {
    // The last name drawn from a wheel stands out.
    let remaining_style = if entry.remaining == 0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    Row::new(vec![
        Cell::from(entry.label.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
        Cell::from(entry.remaining.to_string()).style(remaining_style),
        Cell::from(entry.spun_at.format("%Y-%m-%d %H:%M").to_string()),
    ])
}

/// Render the winner history screen
pub fn render_history(app: &mut App, f: &mut Frame) {
    let area = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Tables
            Constraint::Length(2), // Instructions
        ])
        .split(area);

    let view = &mut app.history_view;
    let title = Paragraph::new(format!("Past Winners ({})", view.entries.len()))
        .block(Block::default().borders(Borders::ALL).title("History"))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    if view.entries.is_empty() {
        let no_data = Paragraph::new("No winners recorded yet. Spin the wheel to collect some.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(no_data, chunks[1]);
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(chunks[1]);

        let table_height = columns[0].height.saturating_sub(3) as usize; // borders + header
        let max_scroll = view.entries.len().saturating_sub(table_height);
        if view.scroll_offset > max_scroll {
            view.scroll_offset = max_scroll;
        }

        let header_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);

        let rows: Vec<Row> = view
            .entries
            .iter()
            .skip(view.scroll_offset)
            .take(table_height)
            .map(present_row)
            .collect();
        let recent = Table::new(
            rows,
            [
                Constraint::Min(12),
                Constraint::Length(9),
                Constraint::Length(16),
            ],
        )
        .header(Row::new(vec!["Winner", "Left", "When"]).style(header_style))
        .block(Block::default().borders(Borders::ALL).title("Recent"))
        .column_spacing(2);
        f.render_widget(recent, columns[0]);

        let tally_rows: Vec<Row> = view
            .tally
            .iter()
            .map(|(label, wins)| Row::new(vec![label.clone(), wins.to_string()]))
            .collect();
        let tally = Table::new(tally_rows, [Constraint::Min(10), Constraint::Length(5)])
            .header(Row::new(vec!["Name", "Wins"]).style(header_style))
            .block(Block::default().borders(Borders::ALL).title("Tally"))
            .column_spacing(2);
        f.render_widget(tally, columns[1]);
    }

    let instructions =
        Paragraph::new("(↑/↓) scroll  (Home) top  (c) clear history  (b/esc) back")
            .alignment(Alignment::Center)
            .wrap(ratatui::widgets::Wrap { trim: true });
    f.render_widget(instructions, chunks[2]);
}
