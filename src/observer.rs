//! Pluggable observation of actor activity.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::signal::ActorId;


/// Something that happened inside a signal actor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The actor thread entered its loop.
    Started,
    /// A subscriber was added, or its registration replaced.
    Registered(ActorId),
    /// A subscriber was removed on request.
    Unregistered(ActorId),
    /// A subscriber terminated and was pruned from the registry.
    SubscriberDied(ActorId),
    /// A new value was sent to every current subscriber.
    Published {
        /// Number of subscribers the value was sent to.
        subscribers: usize,
    },
    /// A pull adapter answered a pending `get`.
    Replied,
    /// The actor is leaving its loop.
    Stopped,
}


/// A sink for actor events, injected into each actor at construction.
///
/// Observers run on the actor's own thread and should return quickly.
pub trait Observer: Send + Sync + 'static {
    /// Handle an event emitted by `actor`.
    fn observe(&self, actor: ActorId, event: &Event);
}

impl<F> Observer for F
    where F: Fn(ActorId, &Event) + Send + Sync + 'static
{
    fn observe(&self, actor: ActorId, event: &Event) {
        self(actor, event)
    }
}


/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn observe(&self, actor: ActorId, event: &Event) {
        match *event {
            Event::Published { subscribers } => trace!(%actor, subscribers, "published"),
            Event::Replied => trace!(%actor, "replied"),
            Event::SubscriberDied(sub) => warn!(%actor, subscriber = %sub, "subscriber died"),
            Event::Registered(sub) => debug!(%actor, subscriber = %sub, "registered"),
            Event::Unregistered(sub) => debug!(%actor, subscriber = %sub, "unregistered"),
            Event::Started => debug!(%actor, "started"),
            Event::Stopped => debug!(%actor, "stopped"),
        }
    }
}


/// Discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl Observer for NullObserver {
    fn observe(&self, _: ActorId, _: &Event) {}
}


/// A shared observer, as stored by actors and configuration.
#[derive(Clone)]
pub struct SharedObserver(Arc<dyn Observer>);

impl SharedObserver {
    /// Wrap an observer for sharing between actors.
    pub fn new<O: Observer>(observer: O) -> SharedObserver {
        SharedObserver(Arc::new(observer))
    }

    pub(crate) fn emit(&self, actor: ActorId, event: Event) {
        self.0.observe(actor, &event)
    }
}

impl From<Arc<dyn Observer>> for SharedObserver {
    fn from(observer: Arc<dyn Observer>) -> SharedObserver {
        SharedObserver(observer)
    }
}

impl Default for SharedObserver {
    fn default() -> SharedObserver {
        SharedObserver::new(TracingObserver)
    }
}

impl fmt::Debug for SharedObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SharedObserver")
    }
}
