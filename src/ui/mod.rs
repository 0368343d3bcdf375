// UI module for rendering the TUI.
// Contains the connections bar, entity explorer, bottom tab panel, and overlays.

mod breadcrumb;
mod list;
mod modal;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::App;
use crate::graph::{EntityInfoLookup, MatchRule, Snapshot, entity_count_label};
use crate::state::tabs::{ERROR_TAB, INSPECT_TAB, LOGS_TAB, RESPONSE_TAB};
use crate::state::{ConnectionsPane, ConsoleLevel, Dropdown, LoadingState};

/// Main draw function that renders the entire UI.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Connections bar
            Constraint::Length(2), // Breadcrumb
            Constraint::Min(1),    // Explorer + tab panel
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let empty = Snapshot::default();

    draw_connections_bar(frame, &app.connections, chunks[0]);
    breadcrumb::draw_breadcrumb(frame, &app.nav.breadcrumbs(), chunks[1]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[2]);

    match &app.snapshot {
        LoadingState::Error(e) => list::render_error(frame, body[0], e),
        LoadingState::Loaded(snapshot) => list::render_entity_list(
            frame,
            &mut app.explorer,
            &EntityInfoLookup::new(snapshot),
            app.nav.current(),
            body[0],
        ),
        LoadingState::Idle => list::render_empty(frame, body[0], "No snapshot loaded"),
    }

    let panel = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(body[1]);

    tabs::draw_tabs(frame, app, panel[0]);
    draw_tab_content(frame, app, panel[1]);

    draw_status_bar(frame, app, chunks[3]);

    // Open dropdown, then help overlay on top of everything
    if let Some(dropdown) = app.connections.open {
        let lookup = EntityInfoLookup::new(app.snapshot.data().unwrap_or(&empty));
        modal::draw_connections_modal(
            frame,
            dropdown,
            app.connections.list_mut(dropdown),
            &lookup,
        );
    }

    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Draw the two connection dropdown triggers around the selected entity.
fn draw_connections_bar(frame: &mut Frame, pane: &ConnectionsPane, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(24),
            Constraint::Min(1),
            Constraint::Length(24),
        ])
        .split(area);

    frame.render_widget(dropdown_trigger(pane, Dropdown::Incoming), columns[0]);

    let entity = match &pane.entity {
        Some(name) => Span::styled(
            name.as_str(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled("No entity selected", Style::default().fg(Color::DarkGray)),
    };
    let title = Paragraph::new(Line::from(entity))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" bindscope "),
        );
    frame.render_widget(title, columns[1]);

    frame.render_widget(dropdown_trigger(pane, Dropdown::Outgoing), columns[2]);
}

/// A closed dropdown: arrow, entity count, and the open key.
fn dropdown_trigger(pane: &ConnectionsPane, dropdown: Dropdown) -> Paragraph<'static> {
    let count = pane.list(dropdown).len();
    let label = entity_count_label(count);
    let color = if pane.is_enabled(dropdown) {
        Color::White
    } else {
        Color::DarkGray
    };

    let (text, key) = match dropdown {
        Dropdown::Incoming => (format!("→ {} ▾", label), " [ "),
        Dropdown::Outgoing => (format!("{} → ▾", label), " ] "),
    };

    Paragraph::new(Line::from(Span::styled(text, Style::default().fg(color))))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(key),
        )
}

/// Draw the content of the selected bottom tab.
fn draw_tab_content(frame: &mut Frame, app: &mut App, area: Rect) {
    let key = app
        .bottom_tabs
        .selected_tab()
        .map(|tab| tab.key.clone())
        .unwrap_or_default();

    match key.as_str() {
        RESPONSE_TAB => draw_response_tab(frame, app, area),
        LOGS_TAB => {
            let debugger = &mut app.debugger;
            list::render_console(
                frame,
                debugger.messages.iter(),
                &mut debugger.list_state,
                area,
                "No logs yet",
            );
        }
        ERROR_TAB => {
            let debugger = &mut app.debugger;
            let errors = debugger
                .messages
                .iter()
                .filter(|m| m.level == ConsoleLevel::Error);
            list::render_console(
                frame,
                errors,
                &mut debugger.error_list_state,
                area,
                "No errors",
            );
        }
        INSPECT_TAB => draw_inspect_tab(frame, app, area),
        _ => list::render_empty(frame, area, "Nothing to show"),
    }
}

/// Summary of the selected entity.
fn draw_response_tab(frame: &mut Frame, app: &App, area: Rect) {
    let (Some(name), Some(snapshot)) = (app.nav.current(), app.snapshot.data()) else {
        list::render_empty(frame, area, "Select an entity to see its details");
        return;
    };

    let lookup = EntityInfoLookup::new(snapshot);
    let kind = snapshot
        .data_tree
        .get(name)
        .map(|entity| entity.kind_label())
        .unwrap_or("Unknown");

    let mut lines = vec![Line::from(vec![
        Span::raw(format!(
            "{} ",
            lookup.lookup(name).map(|i| i.icon).unwrap_or("?")
        )),
        Span::styled(name, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", kind), Style::default().fg(Color::DarkGray)),
    ])];

    if let Some(datasource) = lookup.lookup(name).and_then(|i| i.datasource_name) {
        let text = if datasource.is_empty() {
            "Datasource: embedded".to_string()
        } else {
            format!("Datasource: {}", datasource)
        };
        lines.push(Line::from(text));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(format!(
        "{}: {}",
        Dropdown::Incoming.header_label(),
        entity_count_label(app.connections.incoming.len())
    )));
    lines.push(Line::from(format!(
        "{}: {}",
        Dropdown::Outgoing.header_label(),
        entity_count_label(app.connections.outgoing.len())
    )));

    frame.render_widget(Paragraph::new(lines), area);
}

/// Resolved dependency sets of the selected entity.
fn draw_inspect_tab(frame: &mut Frame, app: &App, area: Rect) {
    let rule = match app.resolver.rule() {
        MatchRule::Substring => "substring",
        MatchRule::EntityBoundary => "entity boundary",
    };

    let mut lines = vec![Line::from(Span::styled(
        format!(
            "map revision {} · match rule: {} · {} cached",
            app.resolver.revision(),
            rule,
            app.resolver.cached_entries()
        ),
        Style::default().fg(Color::DarkGray),
    ))];

    let section = |title: &str, names: Vec<&str>| -> Vec<Line<'static>> {
        let mut out = vec![Line::from(Span::styled(
            title.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ))];
        if names.is_empty() {
            out.push(Line::from("  (none)"));
        }
        out.extend(names.into_iter().map(|n| Line::from(format!("  {}", n))));
        out
    };

    let incoming: Vec<&str> = app
        .connections
        .incoming
        .items
        .iter()
        .map(|o| o.value.as_str())
        .collect();
    let outgoing: Vec<&str> = app
        .connections
        .outgoing
        .items
        .iter()
        .map(|o| o.value.as_str())
        .collect();

    lines.push(Line::from(""));
    lines.extend(section("directDependencies", incoming));
    lines.push(Line::from(""));
    lines.extend(section("inverseDependencies", outgoing));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

/// Draw the status bar with key hints and the analytics counter.
fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let mut hints = vec![
        Span::raw(" ↑↓ "),
        Span::styled("Navigate", Style::default().fg(Color::DarkGray)),
        Span::raw("  ↵ "),
        Span::styled("Select", Style::default().fg(Color::DarkGray)),
        Span::raw("  [ ] "),
        Span::styled("Connections", Style::default().fg(Color::DarkGray)),
        Span::raw("  Esc "),
        Span::styled("Back", Style::default().fg(Color::DarkGray)),
        Span::raw("  Tab "),
        Span::styled("Switch", Style::default().fg(Color::DarkGray)),
        Span::raw("  ? "),
        Span::styled("Help", Style::default().fg(Color::DarkGray)),
        Span::raw("  q "),
        Span::styled("Quit", Style::default().fg(Color::DarkGray)),
    ];

    if !app.analytics.is_empty() {
        let last = app
            .analytics
            .events()
            .last()
            .map(|event| event.payload.tab_name.as_str())
            .unwrap_or_default();
        hints.push(Span::styled(
            format!("  events: {} (last: {})", app.analytics.len(), last),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let status = Paragraph::new(Line::from(hints));
    frame.render_widget(status, area);
}

/// Draw the help overlay popup.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 50u16.min(area.width);
    let popup_height = 17u16.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let shortcut = |keys: &'static str, action: &'static str| {
        Line::from(vec![
            Span::styled(keys, Style::default().fg(Color::Cyan)),
            Span::raw(action),
        ])
    };

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        shortcut("  ↑/↓           ", "Navigate list / scroll console"),
        shortcut("  Enter         ", "Select entity / go to connection"),
        shortcut("  [             ", "Incoming connections"),
        shortcut("  ]             ", "Outgoing connections"),
        shortcut("  Esc           ", "Back / close dropdown"),
        shortcut("  Tab/Shift+Tab ", "Switch bottom tab"),
        shortcut("  i             ", "Open Inspect tab"),
        shortcut("  s             ", "Toggle strict entity matching"),
        shortcut("  r             ", "Reload snapshot"),
        shortcut("  ?             ", "Toggle help"),
        shortcut("  q             ", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help "),
    );
    frame.render_widget(help, popup_area);
}
