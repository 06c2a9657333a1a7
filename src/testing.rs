//! Utilities for the test suite.

use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;

use crate::actor::{Inlet, Message, Postbox};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::monitor::{lifeline, Lifeline};
use crate::observer::Event;
use crate::registry::Subscriber;
use crate::signal::{make_signal, ActorId, Address, Signal};
use crate::source::Input;


/// How long helpers wait for something to happen before failing the test.
const PATIENCE: Duration = Duration::from_secs(5);

/// Poll `f` until it yields a value, panicking after `PATIENCE`.
pub fn eventually<T, F: FnMut() -> Option<T>>(what: &str, mut f: F) -> T {
    let deadline = Instant::now() + PATIENCE;
    loop {
        if let Some(t) = f() { return t }
        if Instant::now() > deadline {
            panic!("timed out waiting for {}", what);
        }
        thread::sleep(Duration::from_millis(1));
    }
}


/// An address that belongs to no running actor, kept "alive" for as long
/// as the returned lifeline is held.
pub fn dummy_address<T: Send + 'static>() -> (Lifeline, Address<T>) {
    let id = ActorId::next();
    let (tx, _) = unbounded::<Message<T, T>>();
    let (stop, _) = unbounded();
    let (line, monitor) = lifeline();
    (line, Address::new(id, Arc::new(Postbox::new(id, tx, stop)), monitor))
}

/// Deliver `value` to `subscriber` as if it came from some upstream actor.
pub fn feed<T: Send + 'static>(subscriber: &Subscriber<T>, value: T) {
    let (_line, upstream) = dummy_address();
    subscriber.deliver(make_signal(&upstream, value)).unwrap();
}


/// Subscribe `collect` to `signal` for as long as the lifeline is held.
pub fn subscribe<T: Clone + Send + 'static>(signal: &Signal<T>, collect: &Collect<T>) -> Lifeline {
    let (line, monitor) = lifeline();
    let sub = Subscriber::new(ActorId::next(), Arc::new(collect.clone()), monitor);
    signal.source().register(sub).unwrap();
    line
}

/// Send `values` into `input` from another thread, 20ms apart, starting 20ms
/// from now. A pull issued right after this call is waiting when each arrives.
pub fn send_slowly<T>(input: &Input<T>, values: Vec<T>) -> JoinHandle<()>
    where T: Clone + Send + 'static
{
    let input = input.clone();
    thread::spawn(move || {
        for value in values {
            thread::sleep(Duration::from_millis(20));
            input.send(value).unwrap();
        }
    })
}


/// An inlet that collects everything delivered to it.
pub struct Collect<T> {
    received: Arc<Mutex<Option<Vec<Signal<T>>>>>,
}

impl<T> Clone for Collect<T> {
    fn clone(&self) -> Collect<T> {
        Collect { received: self.received.clone() }
    }
}

impl<T: Clone> Collect<T> {
    pub fn new() -> Collect<T> {
        Collect { received: Arc::new(Mutex::new(Some(vec![]))) }
    }

    /// Refuse all further deliveries.
    pub fn close(&self) {
        *self.received.lock().unwrap() = None;
    }

    pub fn signals(&self) -> Vec<Signal<T>> {
        self.received.lock().unwrap().clone().unwrap_or_default()
    }

    pub fn values(&self) -> Vec<T> {
        self.signals().into_iter().map(Signal::into_value).collect()
    }

    /// Wait until at least `n` handles have arrived and return the first `n`.
    pub fn wait_for_signals(&self, n: usize) -> Vec<Signal<T>> {
        eventually("deliveries", || {
            let signals = self.signals();
            if signals.len() >= n { Some(signals[..n].to_vec()) } else { None }
        })
    }

    /// Wait until at least `n` values have arrived and return the first `n`.
    pub fn wait_for(&self, n: usize) -> Vec<T> {
        self.wait_for_signals(n).into_iter().map(Signal::into_value).collect()
    }
}

impl<T: Send> Inlet<T> for Collect<T> {
    fn deliver(&self, signal: Signal<T>) -> Result<()> {
        match *self.received.lock().unwrap() {
            Some(ref mut received) => {
                received.push(signal);
                Ok(())
            }
            None => Err(Error::Disconnected(signal.source().id())),
        }
    }
}


/// An observer recording every event of every actor.
#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<(ActorId, Event)>>>,
}

impl Recorder {
    pub fn new() -> Recorder { Recorder::default() }

    /// A configuration reporting to this recorder.
    pub fn config(&self) -> Config {
        let events = self.events.clone();
        Config::new().observer(move |actor: ActorId, event: &Event| {
            events.lock().unwrap().push((actor, event.clone()))
        })
    }

    pub fn events(&self, actor: ActorId) -> Vec<Event> {
        self.events.lock().unwrap().iter()
            .filter(|&&(id, _)| id == actor)
            .map(|(_, event)| event.clone())
            .collect()
    }

    pub fn count(&self, actor: ActorId, event: &Event) -> usize {
        self.events(actor).iter().filter(|&e| e == event).count()
    }

    /// Wait until `actor` has emitted `event`.
    pub fn wait_for(&self, actor: ActorId, event: Event) {
        eventually("actor event", || {
            if self.events(actor).contains(&event) { Some(()) } else { None }
        })
    }

    /// Wait until `actor` has emitted one of `events`.
    pub fn wait_for_any(&self, actor: ActorId, events: &[Event]) {
        eventually("one of several actor events", || {
            let seen = self.events(actor);
            if events.iter().any(|e| seen.contains(e)) { Some(()) } else { None }
        })
    }
}


/// Self-tests.
#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn closed_collect_refuses_delivery() {
        let collect = Collect::new();
        let (_line, address) = dummy_address();
        assert!(collect.deliver(make_signal(&address, 1)).is_ok());
        collect.close();
        assert!(collect.deliver(make_signal(&address, 2)).is_err());
        assert!(collect.values().is_empty());
    }

    #[test]
    fn dummy_addresses_refuse_messages() {
        let (_line, address) = dummy_address::<i32>();
        assert!(address.stop().is_err());
    }
}
