//! Bounded in-memory event log for the profile/diagnostics view.
//!
//! Events are kept in a ring buffer: once `capacity` is reached the oldest
//! event is dropped. Every event is mirrored to `tracing` at debug level.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const DEFAULT_CAPACITY: usize = 100;

/// Event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Navigation,
    UserAction,
    Api,
    Error,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Navigation => "NAVIGATION",
            Self::UserAction => "USER_ACTION",
            Self::Api => "API",
            Self::Error => "ERROR",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Ring buffer of telemetry events. Share it through `Arc<Telemetry>`.
pub struct Telemetry {
    capacity: usize,
    events: RwLock<VecDeque<TelemetryEvent>>,
}

impl Telemetry {
    /// A zero capacity is bumped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: RwLock::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn log(&self, kind: EventKind, action: impl Into<String>, details: Option<Value>) {
        let event = TelemetryEvent {
            timestamp: Utc::now(),
            kind,
            action: action.into(),
            details,
        };

        tracing::debug!(
            kind = kind.as_str(),
            action = %event.action,
            details = ?event.details,
            "telemetry"
        );

        let mut events = self.events.write();
        if events.len() == self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }

    pub fn screen_view(&self, screen: &str) {
        self.log(EventKind::Navigation, "screen_view", Some(json!({ "screen": screen })));
    }

    pub fn user_action(&self, action: &str, details: Option<Value>) {
        self.log(EventKind::UserAction, action, details);
    }

    /// Records an API call. Object `details` are merged next to `endpoint`.
    pub fn api_call(&self, endpoint: &str, success: bool, details: Option<Value>) {
        let mut payload = serde_json::Map::new();
        payload.insert("endpoint".to_string(), Value::String(endpoint.to_string()));
        match details {
            Some(Value::Object(extra)) => payload.extend(extra),
            Some(other) => {
                payload.insert("details".to_string(), other);
            }
            None => {}
        }
        let action = if success { "success" } else { "error" };
        self.log(EventKind::Api, action, Some(Value::Object(payload)));
    }

    pub fn error(&self, error: &str, details: Option<Value>) {
        self.log(EventKind::Error, error, details);
    }

    /// Copy of all retained events, oldest first.
    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.read().iter().cloned().collect()
    }

    /// The `n` most recent events, newest first.
    pub fn recent(&self, n: usize) -> Vec<TelemetryEvent> {
        self.events.read().iter().rev().take(n).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    pub fn clear(&self) {
        self.events.write().clear();
        tracing::debug!("Telemetry events cleared");
    }

    /// Pretty-printed JSON array of the retained events.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.events())
    }
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
