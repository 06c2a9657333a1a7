//! Source signals: actors that produce values instead of receiving them.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use crossbeam_channel::tick;

use crate::actor::{Actor, Transform};
use crate::config::Config;
use crate::error::Result;
use crate::registry::Subscriber;
use crate::signal::{make_signal, Signal};


/// Spawn a signal that publishes the current time every `period`.
///
/// The timer belongs to the actor thread and stops with it. The returned
/// handle carries the time of creation.
pub fn every(config: &Config, period: Duration) -> Result<Signal<DateTime<Utc>>> {
    let transform: Transform<Instant, DateTime<Utc>> = Box::new(|_| Utc::now());
    Actor::with_ticks(config, tick(period), transform).spawn(config, Utc::now())
}


/// A signal fed by hand.
///
/// Every value sent into an input is published to its subscribers unchanged.
/// Clones refer to the same actor.
///
/// ```
/// # use std::sync::mpsc::channel;
/// # use std::time::Duration;
/// let (tx, rx) = channel();
/// let input = dendrite::input(0).unwrap();
/// dendrite::for_each(&input.signal(), move |x| { let _ = tx.send(*x); }).unwrap();
/// input.feed(vec![1, 2]).unwrap();
/// assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(1));
/// assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(2));
/// ```
pub struct Input<T> {
    signal: Signal<T>,
    inlet: Subscriber<T>,
}

impl<T: Clone> Clone for Input<T> {
    fn clone(&self) -> Input<T> {
        Input { signal: self.signal.clone(), inlet: self.inlet.clone() }
    }
}

impl<T: Clone + Send + 'static> Input<T> {
    /// Publish `value` to every current subscriber.
    ///
    /// Values sent from one thread are published in order. Fails once the
    /// actor has been stopped.
    pub fn send(&self, value: T) -> Result<()> {
        self.inlet.deliver(make_signal(self.signal.source(), value))
    }

    /// Send every item of an iterator, stopping at the first failure.
    pub fn feed<I: IntoIterator<Item = T>>(&self, values: I) -> Result<()> {
        values.into_iter().try_for_each(|value| self.send(value))
    }

    /// Handle on the input's actor, carrying its initial value.
    pub fn signal(&self) -> Signal<T> { self.signal.clone() }

    /// Terminate the input's actor.
    pub fn stop(&self) -> Result<()> { self.signal.stop() }
}

impl<T: fmt::Debug> fmt::Debug for Input<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Input").field("signal", &self.signal).finish()
    }
}


/// Spawn an input signal holding `initial`.
pub fn input<T>(config: &Config, initial: T) -> Result<Input<T>>
    where T: Clone + Send + 'static
{
    let transform: Transform<T, T> = Box::new(|value| value);
    let actor = Actor::new(config, transform);
    let inlet = actor.subscriber();
    let signal = actor.spawn(config, initial)?;
    Ok(Input { signal, inlet })
}
