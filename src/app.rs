// App state and main event loop.
// Wires the snapshot, connections pane, navigation, and the bottom tab panel together.

use std::io;
use std::path::PathBuf;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tracing::{debug, info};

use crate::graph::{ConnectionResolver, DependencyOptions, DependencySets, MatchRule, Snapshot};
use crate::state::tabs::{self, ERROR_TAB, INSPECT_TAB, LOGS_TAB};
use crate::state::{
    AnalyticsLog, ConnectionsPane, ConsoleView, DebuggerState, Dropdown, LoadingState,
    NavigationStack, SelectableList, TabSyncController,
};
use crate::ui;

/// Default tab of the bottom panel (Response).
pub const DEFAULT_TAB_INDEX: usize = 0;

/// Main application state.
pub struct App {
    /// Snapshot file being inspected.
    pub snapshot_path: PathBuf,
    /// Loaded snapshot.
    pub snapshot: LoadingState<Snapshot>,
    /// Memoized connection resolution over the snapshot's dependency map.
    pub resolver: ConnectionResolver,
    /// Entity explorer list.
    pub explorer: SelectableList<String>,
    /// Incoming/outgoing connections of the selected entity.
    pub connections: ConnectionsPane,
    /// Entities visited through the connections pane.
    pub nav: NavigationStack,
    /// Debugger store: current tab and console.
    pub debugger: DebuggerState,
    /// Analytics sink.
    pub analytics: AnalyticsLog,
    /// Bottom tab panel selection.
    pub bottom_tabs: TabSyncController,
    /// Whether the help overlay is shown.
    pub show_help: bool,
    /// Whether the app should exit.
    pub should_quit: bool,
}

impl App {
    pub fn new(snapshot_path: PathBuf, rule: MatchRule) -> Self {
        let mut debugger = DebuggerState::new();
        let mut analytics = AnalyticsLog::new();
        let current_tab = debugger.current_tab.clone();
        let bottom_tabs = TabSyncController::mount(
            tabs::entity_bottom_tabs(),
            DEFAULT_TAB_INDEX,
            &current_tab,
            &mut debugger,
            &mut analytics,
        );

        let mut app = Self {
            snapshot_path,
            snapshot: LoadingState::Idle,
            resolver: ConnectionResolver::default(),
            explorer: SelectableList::new(),
            connections: ConnectionsPane::new(),
            nav: NavigationStack::new(),
            debugger,
            analytics,
            bottom_tabs,
            show_help: false,
            should_quit: false,
        };
        app.resolver.set_rule(rule);
        app.reload();
        app
    }

    /// (Re)load the snapshot from disk and reset selection.
    pub fn reload(&mut self) {
        match Snapshot::load(&self.snapshot_path) {
            Ok(snapshot) => {
                self.resolver.set_map(&snapshot.inverse_dependency_map);
                self.explorer.set_items(snapshot.entity_names());
                self.debugger.log_info(format!(
                    "Loaded {} ({} entities, {} dependant paths)",
                    self.snapshot_path.display(),
                    snapshot.data_tree.len(),
                    snapshot.inverse_dependency_map.len()
                ));
                let missing = snapshot.missing_entities();
                if !missing.is_empty() {
                    self.debugger.log_warn(format!(
                        "Dependency map references {} unknown entities: {}",
                        missing.len(),
                        missing.join(", ")
                    ));
                }
                self.snapshot = LoadingState::Loaded(snapshot);
                self.nav.clear();
                self.show_connections(None);
                self.debugger.show_tab(LOGS_TAB);
            }
            Err(e) => {
                self.debugger.log_error(format!("Failed to load snapshot: {}", e));
                self.snapshot = LoadingState::Error(e.to_string());
                self.explorer.set_items(Vec::new());
                self.nav.clear();
                self.show_connections(None);
                self.debugger.show_tab(ERROR_TAB);
            }
        }
        self.sync_tabs();
    }

    /// Name of the entity shown in the connections pane.
    pub fn selected_entity(&self) -> Option<&str> {
        self.nav.current()
    }

    /// Select an entity from the explorer (or a restored session).
    pub fn select_entity(&mut self, name: &str) {
        if self.nav.push(name) {
            debug!(entity = name, "entity selected");
        }
        self.explorer.select_where(|n| n == name);
        self.show_connections(Some(name));
    }

    /// Navigation collaborator: jump to an entity picked from a dropdown.
    pub fn navigate_to_entity(&mut self, name: &str) {
        let known = self
            .snapshot
            .data()
            .is_some_and(|snapshot| snapshot.contains_entity(name));

        if known {
            info!(entity = name, "navigating to entity");
            self.select_entity(name);
        } else {
            self.debugger
                .log_error(format!("Entity {} is not in the data tree", name));
            self.debugger.show_tab(ERROR_TAB);
        }
        self.sync_tabs();
    }

    /// Go back to the previously visited entity.
    pub fn go_back(&mut self) -> bool {
        if !self.nav.pop() {
            return false;
        }
        let current = self.nav.current().map(str::to_string);
        if let Some(name) = &current {
            self.explorer.select_where(|n| n == name);
        }
        self.show_connections(current.as_deref());
        true
    }

    /// Switch between the substring and entity-boundary match rules.
    pub fn toggle_match_rule(&mut self) {
        let rule = match self.resolver.rule() {
            MatchRule::Substring => MatchRule::EntityBoundary,
            MatchRule::EntityBoundary => MatchRule::Substring,
        };
        self.resolver.set_rule(rule);
        self.debugger.log_info(format!("Match rule: {:?}", rule));
        let current = self.nav.current().map(str::to_string);
        self.show_connections(current.as_deref());
    }

    fn show_connections(&mut self, entity: Option<&str>) {
        let sets = self.resolver.resolve(entity);
        if sets.as_ref().is_some_and(DependencySets::is_empty) {
            debug!(entity = ?entity, "entity has no connections");
        }
        let options = DependencyOptions::from_sets(sets.as_ref());
        self.connections.set_entity(entity, options);
    }

    /// Apply the debugger store's current tab to the bottom panel.
    pub fn sync_tabs(&mut self) {
        let current_tab = self.debugger.current_tab.clone();
        self.bottom_tabs
            .observe(&current_tab, &mut self.debugger, &mut self.analytics);
        self.clear_error_badge_if_viewing();
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key.code);
                }
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.connections.open.is_some() {
            match code {
                KeyCode::Up => self.connections.select_prev(),
                KeyCode::Down => self.connections.select_next(),
                KeyCode::Enter => {
                    if let Some(name) = self.connections.confirm() {
                        self.navigate_to_entity(&name);
                    }
                }
                KeyCode::Esc => self.connections.close(),
                _ => {}
            }
            return;
        }

        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Up => self.scroll_up(),
            KeyCode::Down => self.scroll_down(),
            KeyCode::Enter => {
                if let Some(name) = self.explorer.selected_item().cloned() {
                    self.select_entity(&name);
                }
            }
            KeyCode::Esc => {
                self.go_back();
            }
            KeyCode::Char('[') => {
                self.connections.open(Dropdown::Incoming);
            }
            KeyCode::Char(']') => {
                self.connections.open(Dropdown::Outgoing);
            }
            KeyCode::Tab => {
                self.bottom_tabs
                    .select_next(&mut self.debugger, &mut self.analytics);
                self.clear_error_badge_if_viewing();
            }
            KeyCode::BackTab => {
                self.bottom_tabs
                    .select_prev(&mut self.debugger, &mut self.analytics);
                self.clear_error_badge_if_viewing();
            }
            KeyCode::Char('i') => {
                self.debugger.show_tab(INSPECT_TAB);
                self.sync_tabs();
            }
            KeyCode::Char('s') => self.toggle_match_rule(),
            KeyCode::Char('r') => self.reload(),
            _ => {}
        }
    }

    fn scroll_up(&mut self) {
        match self.console_view() {
            Some(view) => self.debugger.select_prev(view),
            None => self.explorer.select_prev(),
        }
    }

    fn scroll_down(&mut self) {
        match self.console_view() {
            Some(view) => self.debugger.select_next(view),
            None => self.explorer.select_next(),
        }
    }

    /// Console list shown in the bottom panel, if any.
    fn console_view(&self) -> Option<ConsoleView> {
        match self.selected_tab_key() {
            Some(LOGS_TAB) => Some(ConsoleView::All),
            Some(ERROR_TAB) => Some(ConsoleView::Errors),
            _ => None,
        }
    }

    fn selected_tab_key(&self) -> Option<&str> {
        self.bottom_tabs.selected_tab().map(|tab| tab.key.as_str())
    }

    /// Clear the error badge when viewing the Errors tab.
    fn clear_error_badge_if_viewing(&mut self) {
        if self.selected_tab_key() == Some(ERROR_TAB) {
            self.debugger.mark_errors_read();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::state::ConsoleLevel;
    use crate::state::tabs::RESPONSE_TAB;

    const SNAPSHOT: &str = r#"{
        "dataTree": {
            "Input1": { "ENTITY_TYPE": "WIDGET", "type": "INPUT_WIDGET" },
            "Api1": { "ENTITY_TYPE": "ACTION", "actionId": "a1" },
            "Table1": { "ENTITY_TYPE": "WIDGET", "type": "TABLE_WIDGET" }
        },
        "inverseDependencyMap": {
            "Api1.config.url": ["Input1.text"],
            "Table1.tableData": ["Api1.data", "Ghost1.value"],
            "Input1.text": []
        }
    }"#;

    fn app_with_snapshot() -> (TempDir, App) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        fs::write(&path, SNAPSHOT).unwrap();
        let app = App::new(path, MatchRule::Substring);
        (temp_dir, app)
    }

    fn incoming(app: &App) -> Vec<&str> {
        app.connections
            .incoming
            .items
            .iter()
            .map(|o| o.value.as_str())
            .collect()
    }

    fn outgoing(app: &App) -> Vec<&str> {
        app.connections
            .outgoing
            .items
            .iter()
            .map(|o| o.value.as_str())
            .collect()
    }

    #[test]
    fn test_load_opens_logs_tab() {
        let (_dir, app) = app_with_snapshot();

        assert!(app.snapshot.data().is_some());
        assert_eq!(app.explorer.items, vec!["Api1", "Input1", "Table1"]);
        assert_eq!(app.selected_tab_key(), Some(LOGS_TAB));
        assert_eq!(app.debugger.current_tab, LOGS_TAB);
        assert_eq!(app.analytics.len(), 1);
        assert_eq!(app.selected_entity(), None);
    }

    #[test]
    fn test_missing_snapshot_opens_errors_tab() {
        let temp_dir = TempDir::new().unwrap();
        let app = App::new(temp_dir.path().join("nope.json"), MatchRule::Substring);

        assert!(matches!(app.snapshot, LoadingState::Error(_)));
        assert_eq!(app.selected_tab_key(), Some(ERROR_TAB));
        // Viewing the Errors tab clears the badge.
        assert_eq!(app.debugger.unread_errors, 0);
        assert_eq!(app.debugger.errors().count(), 1);
    }

    #[test]
    fn test_errors_tab_cursor_tracks_errors_only() {
        let temp_dir = TempDir::new().unwrap();
        let mut app = App::new(temp_dir.path().join("nope.json"), MatchRule::Substring);
        assert_eq!(app.selected_tab_key(), Some(ERROR_TAB));

        app.debugger.log_info("one");
        app.debugger.log_info("two");
        app.debugger.log_info("three");
        app.handle_key(KeyCode::Down);

        let errors = app.debugger.errors().count();
        assert_eq!(errors, 1);
        assert!(
            app.debugger
                .error_list_state
                .selected()
                .is_some_and(|i| i < errors)
        );
        assert_eq!(app.debugger.list_state.selected(), Some(3));
    }

    #[test]
    fn test_stale_dependency_map_logs_warning() {
        let (_dir, app) = app_with_snapshot();

        let warnings: Vec<&str> = app
            .debugger
            .messages
            .iter()
            .filter(|m| m.level == ConsoleLevel::Warn)
            .map(|m| m.message.as_str())
            .collect();
        assert_eq!(
            warnings,
            vec!["Dependency map references 1 unknown entities: Ghost1"]
        );
    }

    #[test]
    fn test_select_entity_shows_connections() {
        let (_dir, mut app) = app_with_snapshot();

        app.select_entity("Api1");
        assert_eq!(incoming(&app), vec!["Input1"]);
        assert_eq!(outgoing(&app), vec!["Table1"]);

        app.select_entity("Input1");
        assert!(incoming(&app).is_empty());
        assert_eq!(outgoing(&app), vec!["Api1"]);
    }

    #[test]
    fn test_dropdown_navigation_and_back() {
        let (_dir, mut app) = app_with_snapshot();
        app.select_entity("Api1");

        app.handle_key(KeyCode::Char(']'));
        assert_eq!(app.connections.open, Some(Dropdown::Outgoing));
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.selected_entity(), Some("Table1"));
        assert_eq!(app.explorer.selected_item().map(String::as_str), Some("Table1"));
        assert_eq!(incoming(&app), vec!["Api1", "Ghost1"]);

        app.handle_key(KeyCode::Esc);
        assert_eq!(app.selected_entity(), Some("Api1"));
        assert_eq!(app.nav.breadcrumbs().len(), 1);
    }

    #[test]
    fn test_unknown_entity_navigation_opens_errors_tab() {
        let (_dir, mut app) = app_with_snapshot();
        app.select_entity("Table1");

        app.handle_key(KeyCode::Char('['));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);

        assert_eq!(app.selected_entity(), Some("Table1"));
        assert_eq!(app.selected_tab_key(), Some(ERROR_TAB));
        let names: Vec<&str> = app
            .analytics
            .events()
            .iter()
            .map(|e| e.payload.tab_name.as_str())
            .collect();
        assert_eq!(names, vec![LOGS_TAB, ERROR_TAB]);
    }

    #[test]
    fn test_user_tab_switch_logs_once() {
        let (_dir, mut app) = app_with_snapshot();
        let before = app.analytics.len();

        // Logs -> Inspect
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.selected_tab_key(), Some(INSPECT_TAB));
        assert_eq!(app.debugger.current_tab, INSPECT_TAB);

        // The store echo must not log a second time.
        app.sync_tabs();
        assert_eq!(app.analytics.len(), before + 1);

        // Inspect -> Response: store notified, no event
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.debugger.current_tab, RESPONSE_TAB);
        assert_eq!(app.analytics.len(), before + 1);
    }

    #[test]
    fn test_inspect_shortcut_is_an_external_change() {
        let (_dir, mut app) = app_with_snapshot();
        app.handle_key(KeyCode::Char('i'));
        assert_eq!(app.selected_tab_key(), Some(INSPECT_TAB));

        let before = app.analytics.len();
        app.handle_key(KeyCode::Char('i'));
        assert_eq!(app.analytics.len(), before);
    }

    #[test]
    fn test_toggle_match_rule_reresolves() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("snapshot.json");
        fs::write(
            &path,
            r#"{
                "dataTree": {
                    "Text1": { "ENTITY_TYPE": "WIDGET", "type": "TEXT_WIDGET" },
                    "Text10": { "ENTITY_TYPE": "WIDGET", "type": "TEXT_WIDGET" }
                },
                "inverseDependencyMap": { "Text10.value": ["Text1.text"] }
            }"#,
        )
        .unwrap();
        let mut app = App::new(path, MatchRule::Substring);

        app.select_entity("Text1");
        assert!(outgoing(&app).is_empty());

        app.handle_key(KeyCode::Char('s'));
        assert_eq!(outgoing(&app), vec!["Text10"]);
    }
}
