use crate::dispatch::Outcome;
use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters describing what key resolution has produced so far.
#[derive(Debug, Default, Clone)]
pub struct DispatchMetrics {
    events: u64,
    focus_changes: u64,
    zone_changes: u64,
    mode_transitions: u64,
    actions: u64,
    unhandled: u64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: &Outcome) {
        self.events = self.events.saturating_add(1);
        let counter = match outcome {
            Outcome::FocusChanged { .. } => &mut self.focus_changes,
            Outcome::ZoneChanged { .. } => &mut self.zone_changes,
            Outcome::ModeEntered { .. } | Outcome::ModeExited { .. } => &mut self.mode_transitions,
            Outcome::ActionInvoked { .. } => &mut self.actions,
            Outcome::Unhandled => &mut self.unhandled,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            focus_changes: self.focus_changes,
            zone_changes: self.zone_changes,
            mode_transitions: self.mode_transitions,
            actions: self.actions,
            unhandled: self.unhandled,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub focus_changes: u64,
    pub zone_changes: u64,
    pub mode_transitions: u64,
    pub actions: u64,
    pub unhandled: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "dispatch_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("events".to_string(), json!(self.events));
        map.insert("focus_changes".to_string(), json!(self.focus_changes));
        map.insert("zone_changes".to_string(), json!(self.zone_changes));
        map.insert("mode_transitions".to_string(), json!(self.mode_transitions));
        map.insert("actions".to_string(), json!(self.actions));
        map.insert("unhandled".to_string(), json!(self.unhandled));
        map
    }
}
