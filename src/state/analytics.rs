// Analytics events emitted by the debugger tab panel.
// Events are fire-and-forget: sinks record them and never fail.

use serde::Serialize;
use tracing::info;

pub const DEBUGGER_TAB_SWITCH: &str = "DEBUGGER_TAB_SWITCH";

/// Payload of a tab switch event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSwitchPayload {
    pub tab_name: String,
}

/// A single analytics event.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsEvent {
    pub name: &'static str,
    pub payload: TabSwitchPayload,
}

impl AnalyticsEvent {
    pub fn debugger_tab_switch(tab_name: impl Into<String>) -> Self {
        Self {
            name: DEBUGGER_TAB_SWITCH,
            payload: TabSwitchPayload {
                tab_name: tab_name.into(),
            },
        }
    }
}

/// Receiver of analytics events.
pub trait AnalyticsSink {
    fn log_event(&mut self, event: AnalyticsEvent);
}

/// In-memory sink that also writes every event to the trace log.
#[derive(Debug, Default)]
pub struct AnalyticsLog {
    events: Vec<AnalyticsEvent>,
}

impl AnalyticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[AnalyticsEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl AnalyticsSink for AnalyticsLog {
    fn log_event(&mut self, event: AnalyticsEvent) {
        info!(
            event = event.name,
            tab_name = %event.payload.tab_name,
            "analytics event"
        );
        self.events.push(event);
    }
}
