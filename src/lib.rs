//! Functional reactive signals running as concurrent actors
//!
//! *Dendrite* models a reactive dataflow graph as a set of independent
//! actors. Every signal is a thread that holds a subscriber registry and a
//! transformation function. Whenever a new value reaches it, the signal
//! transforms the value and pushes it, wrapped in a fresh handle, to
//! everything currently subscribed to it.
//!
//!
//! # Primitives
//!
//! - [`every`] creates a source signal publishing the current time at a fixed
//!   period.
//! - [`input`] creates a source signal you feed by hand.
//! - [`lift`] derives a signal by applying a function to every value of
//!   another one.
//! - [`for_each`] and [`as_text`] are sinks: they run a side effect for every
//!   value (`as_text` prints it).
//! - [`as_stream`] exposes a signal as a blocking iterator.
//!
//! All of these return [`Signal`] handles, except `as_stream`. A handle is an
//! immutable snapshot: the identity of the actor, a token for one particular
//! value and that value. Handles are `Clone` and can be passed freely between
//! threads; they do not own the actor. Use [`Signal::stop`] to end one.
//!
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! // A signal fed by hand
//! let input = dendrite::input(1).unwrap();
//!
//! // Derive another one from it
//! let doubled = dendrite::lift(|x| 2 * x, &input.signal()).unwrap();
//! assert_eq!(*doubled.value(), 2);
//!
//! // Pull values out of the derived signal while another thread feeds it.
//! // Each pull waits for the next value published after it was issued.
//! let mut values = dendrite::as_stream(&doubled, Duration::from_secs(1)).unwrap();
//! let feeder = {
//!     let input = input.clone();
//!     std::thread::spawn(move || for x in 5..7 {
//!         std::thread::sleep(Duration::from_millis(20));
//!         input.send(x).unwrap();
//!     })
//! };
//! assert_eq!(values.next(), Some(10));
//! assert_eq!(values.next(), Some(12));
//! feeder.join().unwrap();
//! ```
//!
//!
//! # Delivery guarantees
//!
//! Delivery is fire and forget. Values sent from one actor to another arrive
//! in the order they were sent, but different subscribers of the same signal
//! may see a broadcast in any order relative to each other. There is no
//! backpressure and no redelivery.
//!
//! Subscriptions are cleaned up by monitoring: when a subscribed actor
//! terminates, for whatever reason, its upstream is notified exactly once and
//! drops it from its registry. Stopping a signal does not notify anyone else;
//! its dependents simply stop receiving values.
//!
//! Constructors subscribe to their upstream without waiting for the
//! subscription to be processed. A value published concurrently by another
//! thread may therefore be missed by a freshly derived signal.
//!
//!
//! # Observation
//!
//! Actors report their lifecycle and activity to an [`Observer`] injected at
//! construction. The free functions use [`Config::default`], which forwards
//! these events to `tracing`; build a [`Config`] to install another observer.

#![warn(missing_docs)]

use std::fmt::Display;
use std::time::Duration;

use chrono::{DateTime, Utc};

pub use config::{Config, DEFAULT_STREAM_TIMEOUT};
pub use error::{Error, Result};
pub use monitor::Monitor;
pub use observer::{Event, NullObserver, Observer, TracingObserver};
pub use signal::{ActorId, Address, Signal};
pub use source::Input;
pub use stream::Stream;

mod actor;
mod config;
mod error;
mod lift;
mod monitor;
mod observer;
mod registry;
mod signal;
mod sink;
mod source;
mod stream;
#[cfg(test)]
mod testing;


/// Spawn a signal publishing the current time every `period`.
///
/// See [`Config::every`] to spawn it with custom settings.
pub fn every(period: Duration) -> Result<Signal<DateTime<Utc>>> {
    Config::default().every(period)
}

/// Spawn a signal fed by hand, starting out with `initial`.
pub fn input<T>(initial: T) -> Result<Input<T>>
    where T: Clone + Send + 'static
{
    Config::default().input(initial)
}

/// Derive a signal publishing `f(value)` for every value of `upstream`.
pub fn lift<A, B, F>(f: F, upstream: &Signal<A>) -> Result<Signal<B>>
    where A: Clone + Send + 'static,
          B: Clone + Send + 'static,
          F: Fn(A) -> B + Send + 'static,
{
    Config::default().lift(f, upstream)
}

/// Run `effect` on every value of `upstream`.
///
/// ```
/// # use std::sync::mpsc::channel;
/// # use std::time::Duration;
/// let (tx, rx) = channel();
/// let input = dendrite::input(0).unwrap();
/// dendrite::for_each(&input.signal(), move |x| { let _ = tx.send(*x); }).unwrap();
/// input.send(3).unwrap();
/// assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(3));
/// ```
pub fn for_each<T, F>(upstream: &Signal<T>, effect: F) -> Result<Signal<T>>
    where T: Clone + Send + 'static,
          F: FnMut(&T) + Send + 'static,
{
    Config::default().for_each(upstream, effect)
}

/// Print every value of `upstream` on its own line.
pub fn as_text<T>(upstream: &Signal<T>) -> Result<Signal<T>>
    where T: Display + Clone + Send + 'static
{
    Config::default().as_text(upstream)
}

/// Pull the values of `upstream` through a blocking iterator.
///
/// Each pull yields the first value published after it was issued, waiting
/// at most `timeout`; a pull that times out ends the iteration. Values
/// published between pulls are not kept.
pub fn as_stream<T>(upstream: &Signal<T>, timeout: Duration) -> Result<Stream<T>>
    where T: Clone + Send + 'static
{
    Config::default().as_stream(upstream, timeout)
}
