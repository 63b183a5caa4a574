//! Event Bus implementation.
//!
//! Synchronous, in-order fan-out of [`StoreEvent`]s to registered handlers.

use parking_lot::RwLock;
use regex::Regex;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, trace, warn};
use uuid::Uuid;

use super::events::{EventKind, StoreEvent};

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Selects which events a handler receives
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive one kind of event.
    Kind(EventKind),
    /// Receive events matching any of these kinds.
    Kinds(Vec<EventKind>),
    /// Receive events whose name matches the pattern (e.g. `^cart:`).
    Pattern(Regex),
}

impl EventFilter {
    /// Builds a pattern filter from a regular expression.
    pub fn pattern(expr: &str) -> Result<Self, regex::Error> {
        Regex::new(expr).map(EventFilter::Pattern)
    }

    /// Check if an event matches this filter
    pub fn matches(&self, event: &StoreEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Kind(kind) => event.kind() == *kind,
            EventFilter::Kinds(kinds) => kinds.contains(&event.kind()),
            EventFilter::Pattern(re) => re.is_match(event.name()),
        }
    }
}

impl From<EventKind> for EventFilter {
    fn from(kind: EventKind) -> Self {
        EventFilter::Kind(kind)
    }
}

impl From<Vec<EventKind>> for EventFilter {
    fn from(kinds: Vec<EventKind>) -> Self {
        EventFilter::Kinds(kinds)
    }
}

/// Type alias for event handler functions
type EventHandler = Arc<dyn Fn(&StoreEvent) -> anyhow::Result<()> + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    filter: EventFilter,
    handler: EventHandler,
}

/// Outcome of one [`EventBus::publish`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Handlers that ran to completion.
    pub delivered: usize,
    /// Handlers that returned an error or panicked.
    pub failed: Vec<SubscriptionId>,
}

impl DispatchReport {
    /// Total number of handlers the event matched.
    pub fn matched(&self) -> usize {
        self.delivered + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Central event bus.
///
/// Handlers run on the publishing call stack, in registration order. The
/// subscription list is snapshotted before dispatch and no lock is held
/// while handlers run, so handlers may publish or subscribe themselves.
pub struct EventBus {
    subscriptions: RwLock<Vec<Subscription>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(Vec::new()),
        }
    }

    /// Publish an event to all matching subscribers
    ///
    /// A handler that fails or panics is logged and skipped; the remaining
    /// handlers still run.
    pub fn publish(&self, event: StoreEvent) -> DispatchReport {
        let targets: Vec<(SubscriptionId, EventHandler)> = self
            .subscriptions
            .read()
            .iter()
            .filter(|sub| sub.filter.matches(&event))
            .map(|sub| (sub.id, Arc::clone(&sub.handler)))
            .collect();

        trace!(event = event.name(), subscribers = targets.len(), "Publishing");

        let mut report = DispatchReport::default();
        for (id, handler) in targets {
            match panic::catch_unwind(AssertUnwindSafe(|| handler(&event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(err)) => {
                    warn!(event = event.name(), subscription = %id, error = %err, "Handler failed");
                    report.failed.push(id);
                }
                Err(_) => {
                    error!(event = event.name(), subscription = %id, "Handler panicked");
                    report.failed.push(id);
                }
            }
        }
        report
    }

    /// Subscribe a handler
    ///
    /// The handler is called on the publishing thread, so it should return
    /// quickly.
    pub fn subscribe<F>(&self, filter: impl Into<EventFilter>, handler: F) -> SubscriptionId
    where
        F: Fn(&StoreEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let filter = filter.into();
        debug!(subscription = %id, ?filter, "Subscription added");
        self.subscriptions.write().push(Subscription {
            id,
            filter,
            handler: Arc::new(handler),
        });
        id
    }

    /// Unsubscribe a handler
    ///
    /// Returns true if the subscription was found and removed.
    ///
    /// A `publish` already under way dispatches to the handlers it matched
    /// when it started, so a handler removed from inside a dispatch still
    /// receives that event. It receives nothing published afterwards.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscriptions.write();
        let before = subs.len();
        subs.retain(|sub| sub.id != id);
        let removed = subs.len() != before;
        if removed {
            debug!(subscription = %id, "Subscription removed");
        }
        removed
    }

    /// Get the number of active subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
