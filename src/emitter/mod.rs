//! Change notifications for the presentation layer.
//!
//! The store queues one event per committed mutation and emits the queue once
//! the change has been applied and persisted. Payloads are the affected entry
//! as a JSON string.
//!
//! ```ignore
//! store.on(FEEDBACK_CREATED, |json| {
//!     println!("new feedback: {}", json);
//! });
//! ```
//!
//! Listeners run on background threads and must not assume they observe the
//! store in the state that produced the event.

use event_emitter_rs::EventEmitter;

use crate::entry::FeedbackEntry;
use crate::store::Change;

pub const FEEDBACK_CREATED: &str = "FeedbackCreated";
pub const FEEDBACK_UPDATED: &str = "FeedbackUpdated";
pub const FEEDBACK_DELETED: &str = "FeedbackDeleted";

pub fn event_name(change: Change) -> &'static str {
    match change {
        Change::Created => FEEDBACK_CREATED,
        Change::Updated => FEEDBACK_UPDATED,
        Change::Deleted => FEEDBACK_DELETED,
    }
}

struct QueuedEvent {
    event_type: &'static str,
    data: String,
}

pub struct FeedbackEmitter {
    emitter: EventEmitter,
    queued: Vec<QueuedEvent>,
}

impl Default for FeedbackEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedbackEmitter {
    pub fn new() -> Self {
        Self {
            emitter: EventEmitter::new(),
            queued: Vec::new(),
        }
    }

    /// Register a listener. Returns an id usable with `remove_listener`.
    pub fn on<F>(&mut self, event: &str, listener: F) -> String
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.emitter.on(event, listener)
    }

    pub fn remove_listener(&mut self, listener_id: &str) -> bool {
        self.emitter.remove_listener(listener_id).is_some()
    }

    /// Queue `entry` under the event for `change` until the next `emit_queued`.
    pub(crate) fn enqueue(&mut self, change: Change, entry: &FeedbackEntry) {
        let event_type = event_name(change);
        match serde_json::to_string(entry) {
            Ok(data) => self.queued.push(QueuedEvent { event_type, data }),
            Err(err) => {
                tracing::warn!(event_type, id = entry.id.get(), error = %err, "dropping change event")
            }
        }
    }

    /// Emit all queued events. Call this after a successful commit.
    pub(crate) fn emit_queued(&mut self) {
        let events: Vec<_> = self.queued.drain(..).collect();
        for event in events {
            self.emitter.emit(event.event_type, event.data);
        }
    }

    pub fn queued_len(&self) -> usize {
        self.queued.len()
    }
}
