//! Signal handles and actor addresses

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

use crate::actor::Mailbox;
use crate::error::Result;
use crate::monitor::Monitor;
use crate::registry::Subscriber;


/// Opaque identity of a running signal actor.
///
/// Identifiers are unique within the process and never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(u64);

impl ActorId {
    /// Mint a fresh identifier.
    pub(crate) fn next() -> ActorId {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ActorId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub(crate) fn raw(self) -> u64 { self.0 }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}


/// The control endpoint of an actor publishing values of type `T`.
pub struct Address<T> {
    id: ActorId,
    mailbox: Arc<dyn Mailbox<T>>,
    monitor: Monitor,
}

impl<T> Clone for Address<T> {
    fn clone(&self) -> Address<T> {
        Address {
            id: self.id,
            mailbox: self.mailbox.clone(),
            monitor: self.monitor.clone(),
        }
    }
}

impl<T> Address<T> {
    pub(crate) fn new(id: ActorId, mailbox: Arc<dyn Mailbox<T>>, monitor: Monitor) -> Address<T> {
        Address { id, mailbox, monitor }
    }

    /// Identity of the addressed actor.
    pub fn id(&self) -> ActorId { self.id }

    /// A monitor that fires once the addressed actor terminates.
    pub fn monitor(&self) -> Monitor { self.monitor.clone() }

    /// Subscribe to the values published by this actor.
    ///
    /// Registering the same subscriber twice replaces the first entry.
    pub(crate) fn register(&self, subscriber: Subscriber<T>) -> Result<()> {
        self.mailbox.register(subscriber)
    }

    /// Remove the subscription of actor `id`, if any.
    pub(crate) fn unregister(&self, id: ActorId) -> Result<()> {
        self.mailbox.unregister(id)
    }

    /// Terminate the actor without draining its mailbox.
    pub fn stop(&self) -> Result<()> {
        self.mailbox.stop()
    }
}

impl<T> PartialEq for Address<T> {
    fn eq(&self, other: &Address<T>) -> bool { self.id == other.id }
}

impl<T> Eq for Address<T> {}

impl<T> Hash for Address<T> {
    fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state) }
}

impl<T> fmt::Debug for Address<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Address").field(&self.id).finish()
    }
}


/// A handle on a running signal.
///
/// A handle is an immutable snapshot: a token identifying one particular
/// value, the address of the actor that produced it, and that value. Every
/// value published by an actor comes with a fresh token. Handles are cheap to
/// clone and do not own their actor; dropping one leaves the actor running.
///
/// Two handles compare equal when they refer to the same actor, regardless of
/// the values they carry.
pub struct Signal<T> {
    id: Uuid,
    source: Address<T>,
    value: T,
}

impl<T: Clone> Clone for Signal<T> {
    fn clone(&self) -> Signal<T> {
        Signal {
            id: self.id,
            source: self.source.clone(),
            value: self.value.clone(),
        }
    }
}

impl<T> Signal<T> {
    /// Token of this particular value.
    pub fn id(&self) -> Uuid { self.id }

    /// Address of the actor behind this signal.
    pub fn source(&self) -> &Address<T> { &self.source }

    /// The value snapshot carried by this handle.
    ///
    /// This is the value at the time the handle was minted. The actor may
    /// have published newer values since.
    pub fn value(&self) -> &T { &self.value }

    /// Consume the handle, keeping only its value.
    pub fn into_value(self) -> T { self.value }

    /// Forcefully terminate the actor behind this signal.
    ///
    /// Messages still queued for the actor are lost and its subscribers are
    /// not told; they notice through their monitors.
    pub fn stop(&self) -> Result<()> { self.source.stop() }

    /// Whether the actor behind this signal is still running.
    pub fn is_alive(&self) -> bool { self.source.monitor.is_alive() }

    /// A monitor on the actor behind this signal.
    pub fn monitor(&self) -> Monitor { self.source.monitor() }
}

impl<T> PartialEq for Signal<T> {
    fn eq(&self, other: &Signal<T>) -> bool { self.source == other.source }
}

impl<T> Eq for Signal<T> {}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("id", &self.id)
            .field("source", &self.source.id)
            .field("value", &self.value)
            .finish()
    }
}


/// Mint a new handle for `value`, published by `source`.
pub(crate) fn make_signal<T>(source: &Address<T>, value: T) -> Signal<T> {
    Signal { id: Uuid::new_v4(), source: source.clone(), value }
}
