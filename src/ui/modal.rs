// Modal UI components.
// The dropdown list opened from the connections pane.

use ratatui::{prelude::*, widgets::*};

use crate::graph::{DependencyOption, EntityInfoLookup};
use crate::state::{Dropdown, SelectableList};

use super::list;

/// Height of the dropdown for `option_count` rows: borders and the
/// instruction line, at least 6 and at most 20 rows tall.
fn modal_height(option_count: usize, max_height: u16) -> u16 {
    let rows = u16::try_from(option_count).unwrap_or(u16::MAX);
    rows.saturating_add(4).clamp(6, 20).min(max_height)
}

/// Draw an open connections dropdown on top of the current view.
pub fn draw_connections_modal(
    frame: &mut Frame,
    dropdown: Dropdown,
    options: &mut SelectableList<DependencyOption>,
    lookup: &EntityInfoLookup,
) {
    let area = frame.area();

    // Create centered modal
    let modal_width = 50u16.min(area.width);
    let modal_height = modal_height(options.len(), area.height);
    let modal_x = (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Options
            Constraint::Length(1), // Instructions
        ])
        .split(modal_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", dropdown.header_label()));

    let items: Vec<ListItem> = options
        .items
        .iter()
        .map(|option| list::option_item(option, lookup))
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, chunks[0], &mut options.list_state);

    // Instructions
    let instructions = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" = Go to  ", Style::default().fg(Color::DarkGray)),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(" = Navigate  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" = Close ", Style::default().fg(Color::DarkGray)),
    ]);

    let instructions_widget = Paragraph::new(instructions)
        .alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));
    frame.render_widget(instructions_widget, chunks[1]);
}
