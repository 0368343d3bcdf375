// Debugger store.
// Owns the current debugger tab and the console messages shown in the Logs and Errors tabs.

use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;
use tracing::{debug, error, info, warn};

use super::tabs::{RESPONSE_TAB, TabStore};

/// Console message level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Info,
    Warn,
    Error,
}

/// A console message for the debugger log.
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Info,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Warn,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: ConsoleLevel::Error,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Which console list a scroll applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleView {
    /// Every message (Logs tab).
    All,
    /// Error messages only (Errors tab).
    Errors,
}

/// Debugger state shared by every tab panel.
#[derive(Debug)]
pub struct DebuggerState {
    /// Key of the debugger tab that should be showing.
    pub current_tab: String,
    /// Console messages, oldest first.
    pub messages: Vec<ConsoleMessage>,
    /// Errors logged since the Errors tab was last viewed.
    pub unread_errors: usize,
    /// Cursor into all messages (Logs tab).
    pub list_state: ListState,
    /// Cursor into error messages (Errors tab).
    pub error_list_state: ListState,
}

impl Default for DebuggerState {
    fn default() -> Self {
        Self {
            current_tab: RESPONSE_TAB.to_string(),
            messages: Vec::new(),
            unread_errors: 0,
            list_state: ListState::default(),
            error_list_state: ListState::default(),
        }
    }
}

impl DebuggerState {
    /// Oldest messages are dropped past this many.
    pub const MAX_MESSAGES: usize = 500;

    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every panel to show `key`. Panels pick this up on their next sync.
    pub fn show_tab(&mut self, key: &str) {
        if self.current_tab != key {
            debug!(from = %self.current_tab, to = key, "debugger tab requested");
            self.current_tab = key.to_string();
        }
    }

    /// Add an info message.
    pub fn log_info(&mut self, message: impl Into<String>) {
        let message = ConsoleMessage::info(message);
        info!("{}", message.message);
        self.push(message);
    }

    /// Add a warning message.
    pub fn log_warn(&mut self, message: impl Into<String>) {
        let message = ConsoleMessage::warn(message);
        warn!("{}", message.message);
        self.push(message);
    }

    /// Add an error message and bump the unread badge.
    pub fn log_error(&mut self, message: impl Into<String>) {
        let message = ConsoleMessage::error(message);
        error!("{}", message.message);
        self.unread_errors += 1;
        self.push(message);
    }

    /// Error messages only, oldest first.
    pub fn errors(&self) -> impl Iterator<Item = &ConsoleMessage> {
        self.messages
            .iter()
            .filter(|m| m.level == ConsoleLevel::Error)
    }

    pub fn mark_errors_read(&mut self) {
        self.unread_errors = 0;
    }

    fn push(&mut self, message: ConsoleMessage) {
        self.messages.push(message);
        if self.messages.len() > Self::MAX_MESSAGES {
            let excess = self.messages.len() - Self::MAX_MESSAGES;
            self.messages.drain(..excess);
        }
        self.scroll_to_bottom();
    }

    fn view_len(&self, view: ConsoleView) -> usize {
        match view {
            ConsoleView::All => self.messages.len(),
            ConsoleView::Errors => self.errors().count(),
        }
    }

    fn view_state(&mut self, view: ConsoleView) -> &mut ListState {
        match view {
            ConsoleView::All => &mut self.list_state,
            ConsoleView::Errors => &mut self.error_list_state,
        }
    }

    /// Scroll both message lists to their last entry.
    fn scroll_to_bottom(&mut self) {
        for view in [ConsoleView::All, ConsoleView::Errors] {
            let last = self.view_len(view).checked_sub(1);
            self.view_state(view).select(last);
        }
    }

    /// Select the previous message of `view`.
    pub fn select_prev(&mut self, view: ConsoleView) {
        let len = self.view_len(view);
        if len == 0 {
            return;
        }
        let state = self.view_state(view);
        let i = match state.selected() {
            Some(i) => i.min(len - 1).saturating_sub(1),
            None => len - 1,
        };
        state.select(Some(i));
    }

    /// Select the next message of `view`.
    pub fn select_next(&mut self, view: ConsoleView) {
        let len = self.view_len(view);
        if len == 0 {
            return;
        }
        let state = self.view_state(view);
        let i = match state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }
}

impl TabStore for DebuggerState {
    fn set_current_tab(&mut self, key: &str) {
        self.current_tab = key.to_string();
    }
}
