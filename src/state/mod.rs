// State management module.
// Handles tab selection sync, the debugger store, analytics, and connections pane state.

pub mod analytics;
pub mod connections;
pub mod debugger;
pub mod navigation;
pub mod tabs;

pub use analytics::AnalyticsLog;
pub use connections::{ConnectionsPane, Dropdown, LoadingState, SelectableList};
pub use debugger::{ConsoleLevel, ConsoleMessage, ConsoleView, DebuggerState};
pub use navigation::{BreadcrumbNode, NavigationStack};
pub use tabs::TabSyncController;
