// List rendering for selectable items.
// Provides the entity explorer, connection option rows, and console views.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::graph::{DependencyOption, EntityInfoLookup};
use crate::state::{ConsoleLevel, ConsoleMessage, SelectableList};

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let now = Utc::now();
    let duration = now.signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

fn level_color(level: ConsoleLevel) -> Color {
    match level {
        ConsoleLevel::Info => Color::White,
        ConsoleLevel::Warn => Color::Yellow,
        ConsoleLevel::Error => Color::Red,
    }
}

fn highlight_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: true });
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

/// Render the entity explorer.
pub fn render_entity_list(
    frame: &mut Frame,
    list: &mut SelectableList<String>,
    lookup: &EntityInfoLookup,
    selected_entity: Option<&str>,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" Entities ");

    if list.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, inner, "No entities");
        return;
    }

    let items: Vec<ListItem> = list
        .items
        .iter()
        .map(|name| {
            let icon = lookup.lookup(name).map(|info| info.icon).unwrap_or("·");
            let style = if Some(name.as_str()) == selected_entity {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(name.as_str(), style),
            ]))
        })
        .collect();

    let list_widget = List::new(items)
        .block(block)
        .highlight_style(highlight_style())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list_widget, area, &mut list.list_state);
}

/// One dropdown row: icon, entity name, and the datasource for actions.
pub fn option_item<'a>(option: &'a DependencyOption, lookup: &EntityInfoLookup) -> ListItem<'a> {
    let info = lookup.lookup(&option.value);
    let icon = info.as_ref().map(|i| i.icon).unwrap_or("?");

    let mut spans = vec![
        Span::raw(format!("{} ", icon)),
        Span::styled(option.label.as_str(), Style::default().fg(Color::White)),
    ];

    if let Some(datasource) = info
        .and_then(|i| i.datasource_name)
        .filter(|name| !name.is_empty())
    {
        spans.push(Span::styled(
            format!(" from {}", datasource),
            Style::default().fg(Color::DarkGray),
        ));
    }

    ListItem::new(Line::from(spans))
}

/// Render console messages (Logs and Errors tabs).
pub fn render_console<'a>(
    frame: &mut Frame,
    messages: impl Iterator<Item = &'a ConsoleMessage>,
    list_state: &mut ListState,
    area: Rect,
    empty_message: &str,
) {
    let items: Vec<ListItem> = messages
        .map(|m| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>9} ", format_relative_time(&m.timestamp)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(m.message.as_str(), Style::default().fg(level_color(m.level))),
            ]))
        })
        .collect();

    if items.is_empty() {
        render_empty(frame, area, empty_message);
        return;
    }

    let list_widget = List::new(items).highlight_style(highlight_style());
    frame.render_stateful_widget(list_widget, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now), "just now");
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::minutes(5))),
            "5m ago"
        );
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::hours(3))),
            "3h ago"
        );
        assert_eq!(
            format_relative_time(&(now - chrono::Duration::days(2))),
            "2d ago"
        );
    }
}
