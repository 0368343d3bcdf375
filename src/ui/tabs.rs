// Bottom tab bar rendering with badge support for the Errors tab.
// Handles visual indication of the active tab and unread error count.

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::state::tabs::ERROR_TAB;

/// Draw the bottom panel's tab bar.
pub fn draw_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let unread = app.debugger.unread_errors;
    let selected_index = app.bottom_tabs.selected_index();

    let tab_titles: Vec<Line> = app
        .bottom_tabs
        .tabs()
        .iter()
        .enumerate()
        .map(|(i, tab)| {
            let has_badge = tab.key == ERROR_TAB && unread > 0;
            let title = if has_badge {
                format!("{} ({})", tab.title, unread)
            } else {
                tab.title.clone()
            };

            let style = if i == selected_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else if has_badge {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::White)
            };

            Line::from(Span::styled(title, style))
        })
        .collect();

    let tabs_widget = Tabs::new(tab_titles)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .select(selected_index)
        .highlight_style(Style::default().fg(Color::Yellow))
        .divider(Span::raw(" │ "));

    frame.render_widget(tabs_widget, area);
}
