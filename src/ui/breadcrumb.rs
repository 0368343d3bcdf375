// Breadcrumb rendering for the navigation trail.

use ratatui::{prelude::*, widgets::*};

use crate::state::BreadcrumbNode;

/// Render the breadcrumb trail of visited entities.
pub fn draw_breadcrumb(frame: &mut Frame, breadcrumbs: &[BreadcrumbNode], area: Rect) {
    let mut spans = Vec::new();

    if breadcrumbs.is_empty() {
        spans.push(Span::styled(
            "Select an entity",
            Style::default().fg(Color::DarkGray),
        ));
    }

    for (i, node) in breadcrumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }

        let style = if i == breadcrumbs.len() - 1 {
            // Current entity is highlighted
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        spans.push(Span::styled(node.label.clone(), style));
    }

    let breadcrumb = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    frame.render_widget(breadcrumb, area);
}
