// Bottom tab panel selection state.
// Keeps the selected tab in step with the debugger store's current tab.

use tracing::{debug, warn};

use super::analytics::{AnalyticsEvent, AnalyticsSink};

pub const RESPONSE_TAB: &str = "RESPONSE_TAB";
pub const ERROR_TAB: &str = "ERROR";
pub const LOGS_TAB: &str = "LOGS_TAB";
pub const INSPECT_TAB: &str = "INSPECT_TAB";

/// Tab keys that count as debugger tabs for analytics.
pub const DEBUGGER_TAB_KEYS: [&str; 3] = [ERROR_TAB, LOGS_TAB, INSPECT_TAB];

pub fn is_debugger_tab(key: &str) -> bool {
    DEBUGGER_TAB_KEYS.iter().any(|k| *k == key)
}

/// One tab of a tab panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabDescriptor {
    pub key: String,
    pub title: String,
}

impl TabDescriptor {
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
        }
    }
}

/// The tabs shown under the connections pane.
pub fn entity_bottom_tabs() -> Vec<TabDescriptor> {
    vec![
        TabDescriptor::new(RESPONSE_TAB, "Response"),
        TabDescriptor::new(ERROR_TAB, "Errors"),
        TabDescriptor::new(LOGS_TAB, "Logs"),
        TabDescriptor::new(INSPECT_TAB, "Inspect"),
    ]
}

/// Store that owns the current debugger tab.
pub trait TabStore {
    fn set_current_tab(&mut self, key: &str);
}

/// Selection state for one mounted tab panel.
///
/// User selections and external changes both go through [`Self::user_select`],
/// which updates the store and logs debugger tab switches. External changes
/// are only acted on when the observed key differs from the last one seen,
/// and a user selection marks its own key as seen so the store's echo is
/// not treated as a change.
#[derive(Debug, Clone)]
pub struct TabSyncController {
    tabs: Vec<TabDescriptor>,
    default_index: usize,
    selected_index: usize,
    observed: Option<String>,
}

impl TabSyncController {
    pub fn new(tabs: Vec<TabDescriptor>, default_index: usize) -> Self {
        Self {
            tabs,
            default_index,
            selected_index: default_index,
            observed: None,
        }
    }

    /// Create the controller and evaluate the store's current tab once.
    pub fn mount(
        tabs: Vec<TabDescriptor>,
        default_index: usize,
        current_tab: &str,
        store: &mut impl TabStore,
        analytics: &mut impl AnalyticsSink,
    ) -> Self {
        let mut controller = Self::new(tabs, default_index);
        controller.observe(current_tab, store, analytics);
        controller
    }

    pub fn tabs(&self) -> &[TabDescriptor] {
        &self.tabs
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn selected_tab(&self) -> Option<&TabDescriptor> {
        self.tabs.get(self.selected_index)
    }

    /// Select a tab: update local state, notify the store, and log the
    /// switch when it is a debugger tab. Returns false for an index that
    /// is out of range.
    pub fn user_select(
        &mut self,
        index: usize,
        store: &mut impl TabStore,
        analytics: &mut impl AnalyticsSink,
    ) -> bool {
        let Some(tab) = self.tabs.get(index) else {
            warn!(index, tabs = self.tabs.len(), "tab index out of range");
            return false;
        };
        let key = tab.key.clone();

        self.selected_index = index;
        store.set_current_tab(&key);

        if is_debugger_tab(&key) {
            analytics.log_event(AnalyticsEvent::debugger_tab_switch(key.as_str()));
        }

        debug!(index, key = %key, "tab selected");
        self.observed = Some(key);
        true
    }

    /// React to the store's current tab. Does nothing unless the value
    /// changed since it was last observed. Keys this panel does not render
    /// fall back to the default tab. Returns true when a selection was made.
    pub fn observe(
        &mut self,
        current_tab: &str,
        store: &mut impl TabStore,
        analytics: &mut impl AnalyticsSink,
    ) -> bool {
        if self.observed.as_deref() == Some(current_tab) {
            return false;
        }
        self.observed = Some(current_tab.to_string());

        let index = self
            .tabs
            .iter()
            .position(|tab| tab.key == current_tab)
            .unwrap_or(self.default_index);

        debug!(current_tab, index, "external tab change");
        self.user_select(index, store, analytics)
    }

    /// Select the tab after the current one, wrapping around.
    pub fn select_next(
        &mut self,
        store: &mut impl TabStore,
        analytics: &mut impl AnalyticsSink,
    ) -> bool {
        if self.tabs.is_empty() {
            return false;
        }
        let index = (self.selected_index + 1) % self.tabs.len();
        self.user_select(index, store, analytics)
    }

    /// Select the tab before the current one, wrapping around.
    pub fn select_prev(
        &mut self,
        store: &mut impl TabStore,
        analytics: &mut impl AnalyticsSink,
    ) -> bool {
        if self.tabs.is_empty() {
            return false;
        }
        let index = if self.selected_index == 0 {
            self.tabs.len() - 1
        } else {
            (self.selected_index - 1).min(self.tabs.len() - 1)
        };
        self.user_select(index, store, analytics)
    }
}
