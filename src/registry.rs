//! Subscriber registries.
//!
//! Each actor keeps the set of actors subscribed to it. Entries are keyed by
//! the subscriber's identity, so an actor appears at most once no matter how
//! often it registers. Every entry carries a monitor on the subscriber, which
//! the owning actor waits on to prune dead entries.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::actor::Inlet;
use crate::error::Result;
use crate::monitor::Monitor;
use crate::signal::{ActorId, Signal};


/// A registered dependent: where to deliver values, and how to tell whether it
/// is still alive.
pub struct Subscriber<T> {
    id: ActorId,
    inlet: Arc<dyn Inlet<T>>,
    monitor: Monitor,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Subscriber<T> {
        Subscriber {
            id: self.id,
            inlet: self.inlet.clone(),
            monitor: self.monitor.clone(),
        }
    }
}

impl<T> Subscriber<T> {
    pub(crate) fn new(id: ActorId, inlet: Arc<dyn Inlet<T>>, monitor: Monitor) -> Subscriber<T> {
        Subscriber { id, inlet, monitor }
    }

    /// Identity of the subscribed actor.
    pub fn id(&self) -> ActorId { self.id }

    pub(crate) fn monitor(&self) -> &Monitor { &self.monitor }

    /// Send a value-update to the subscriber.
    pub(crate) fn deliver(&self, signal: Signal<T>) -> Result<()> {
        self.inlet.deliver(signal)
    }
}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Subscriber").field(&self.id).finish()
    }
}


/// The subscribers of one actor.
///
/// Only the owning actor's loop touches its registry, so it needs no locking.
pub struct Registry<T> {
    entries: HashMap<ActorId, Subscriber<T>>,
}

impl<T> Default for Registry<T> {
    fn default() -> Registry<T> { Registry::new() }
}

impl<T> Registry<T> {
    /// Create an empty registry.
    pub fn new() -> Registry<T> {
        Registry { entries: HashMap::new() }
    }

    /// Add a subscriber, replacing any previous entry for the same actor.
    ///
    /// Returns whether an entry was replaced.
    pub fn register(&mut self, subscriber: Subscriber<T>) -> bool {
        self.entries.insert(subscriber.id, subscriber).is_some()
    }

    /// Remove the entry for actor `id`. Returns whether there was one.
    pub fn unregister(&mut self, id: ActorId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Whether actor `id` is currently subscribed.
    #[cfg(test)]
    pub fn contains(&self, id: ActorId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Number of subscribers.
    pub fn len(&self) -> usize { self.entries.len() }

    /// Whether there are no subscribers.
    #[cfg(test)]
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    /// Iterate over all subscribers, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Subscriber<T>> {
        self.entries.values()
    }
}

impl<T: Clone> Registry<T> {
    /// Send a handle to every subscriber and return how many there were.
    ///
    /// Delivery is fire and forget. A subscriber that cannot be reached keeps
    /// its entry until its monitor reports the death.
    pub fn broadcast(&self, signal: &Signal<T>) -> usize {
        for subscriber in self.entries.values() {
            let _ = subscriber.deliver(signal.clone());
        }
        self.entries.len()
    }
}


#[cfg(test)]
mod test {
    use std::collections::HashSet;
    use quickcheck::quickcheck;

    use crate::monitor::{lifeline, Lifeline};
    use crate::signal::make_signal;
    use crate::testing::{dummy_address, Collect};
    use super::*;

    fn subscriber(collect: &Collect<i32>) -> (Lifeline, Subscriber<i32>) {
        let (line, monitor) = lifeline();
        (line, Subscriber::new(ActorId::next(), Arc::new(collect.clone()), monitor))
    }

    #[test]
    fn register_and_broadcast() {
        let (_line, address) = dummy_address();
        let collect = Collect::new();
        let (_sub_line, sub) = subscriber(&collect);
        let mut registry = Registry::new();
        assert!(!registry.register(sub));
        assert_eq!(registry.broadcast(&make_signal(&address, 4)), 1);
        assert_eq!(collect.values(), vec![4]);
    }

    #[test]
    fn double_register_single_unregister_leaves_nothing() {
        let collect = Collect::new();
        let (_line, sub) = subscriber(&collect);
        let id = sub.id();
        let mut registry = Registry::new();
        registry.register(sub.clone());
        assert!(registry.register(sub));
        assert_eq!(registry.len(), 1);
        assert!(registry.unregister(id));
        assert!(registry.is_empty());
        assert!(!registry.unregister(id));
    }

    #[test]
    fn broadcast_to_unreachable_subscriber_keeps_entry() {
        let (_line, address) = dummy_address();
        let collect = Collect::new();
        let (sub_line, sub) = subscriber(&collect);
        let id = sub.id();
        let mut registry = Registry::new();
        registry.register(sub);
        drop(sub_line);
        collect.close();
        assert_eq!(registry.broadcast(&make_signal(&address, 1)), 1);
        assert!(registry.contains(id));
    }

    #[test]
    fn registry_matches_set_model() {
        fn check(ops: Vec<(u8, u8)>) -> bool {
            let collect = Collect::new();
            let subs: Vec<_> = (0..8).map(|_| subscriber(&collect)).collect();
            let mut registry = Registry::new();
            let mut model = HashSet::new();
            for (op, n) in ops {
                let sub = &subs[n as usize % subs.len()].1;
                match op % 3 {
                    0 => {
                        registry.register(sub.clone());
                        model.insert(sub.id());
                    }
                    // explicit unregister and death notices prune alike
                    _ => {
                        registry.unregister(sub.id());
                        model.remove(&sub.id());
                    }
                }
            }
            let actual: HashSet<_> = registry.iter().map(Subscriber::id).collect();
            actual == model && registry.len() == model.len()
        }
        quickcheck(check as fn(Vec<(u8, u8)>) -> bool);
    }
}
