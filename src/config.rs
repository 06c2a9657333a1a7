//! Construction settings shared by all signal constructors.

use std::fmt::Display;
use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::observer::{Observer, SharedObserver};
use crate::signal::{ActorId, Signal};
use crate::source::Input;
use crate::stream::Stream;
use crate::{lift, sink, source, stream};


/// Default time a pull on a stream waits for the next value.
pub const DEFAULT_STREAM_TIMEOUT: Duration = Duration::from_secs(5);


/// Settings applied to every actor spawned through them.
///
/// The free functions of this crate use `Config::default()`, which reports
/// actor activity to `tracing`.
///
/// ```
/// # use std::time::Duration;
/// # use dendrite::{Config, NullObserver};
/// let config = Config::new()
///     .observer(NullObserver)
///     .stream_timeout(Duration::from_millis(100))
///     .thread_name_prefix("sensor");
/// let input = config.input(0).unwrap();
/// let doubled = config.lift(|x| 2 * x, &input.signal()).unwrap();
/// assert_eq!(*doubled.value(), 0);
/// ```
#[derive(Clone, Debug)]
pub struct Config {
    observer: SharedObserver,
    stream_timeout: Duration,
    thread_name_prefix: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            observer: SharedObserver::default(),
            stream_timeout: DEFAULT_STREAM_TIMEOUT,
            thread_name_prefix: "signal".to_owned(),
        }
    }
}

impl Config {
    /// Default settings.
    pub fn new() -> Config { Config::default() }

    /// Report actor events to `observer`.
    pub fn observer<O: Observer>(self, observer: O) -> Config {
        Config { observer: SharedObserver::new(observer), ..self }
    }

    /// Report actor events to an already shared observer.
    pub fn shared_observer(self, observer: Arc<dyn Observer>) -> Config {
        Config { observer: observer.into(), ..self }
    }

    /// Pull timeout used by `Config::stream`.
    pub fn stream_timeout(self, timeout: Duration) -> Config {
        Config { stream_timeout: timeout, ..self }
    }

    /// Prefix of actor thread names. Threads are named `<prefix>-<id>`.
    pub fn thread_name_prefix(self, prefix: &str) -> Config {
        Config { thread_name_prefix: prefix.to_owned(), ..self }
    }

    pub(crate) fn observer_ref(&self) -> &SharedObserver { &self.observer }

    /// Run `body` on a new, detached actor thread.
    pub(crate) fn spawn<F>(&self, id: ActorId, body: F) -> io::Result<()>
        where F: FnOnce() + Send + 'static
    {
        let name = format!("{}-{}", self.thread_name_prefix, id.raw());
        thread::Builder::new().name(name).spawn(body).map(|_| ())
    }

    /// See [`every`](crate::every).
    pub fn every(&self, period: Duration) -> Result<Signal<DateTime<Utc>>> {
        source::every(self, period)
    }

    /// See [`input`](crate::input).
    pub fn input<T>(&self, initial: T) -> Result<Input<T>>
        where T: Clone + Send + 'static
    {
        source::input(self, initial)
    }

    /// See [`lift`](crate::lift()).
    pub fn lift<A, B, F>(&self, f: F, upstream: &Signal<A>) -> Result<Signal<B>>
        where A: Clone + Send + 'static,
              B: Clone + Send + 'static,
              F: Fn(A) -> B + Send + 'static,
    {
        lift::lift(self, f, upstream)
    }

    /// See [`for_each`](crate::for_each).
    pub fn for_each<T, F>(&self, upstream: &Signal<T>, effect: F) -> Result<Signal<T>>
        where T: Clone + Send + 'static,
              F: FnMut(&T) + Send + 'static,
    {
        sink::for_each(self, upstream, effect)
    }

    /// See [`as_text`](crate::as_text).
    pub fn as_text<T>(&self, upstream: &Signal<T>) -> Result<Signal<T>>
        where T: Display + Clone + Send + 'static
    {
        sink::as_text(self, upstream)
    }

    /// See [`as_stream`](crate::as_stream).
    pub fn as_stream<T>(&self, upstream: &Signal<T>, timeout: Duration) -> Result<Stream<T>>
        where T: Clone + Send + 'static
    {
        stream::as_stream(self, upstream, timeout)
    }

    /// Like `as_stream`, using the configured stream timeout.
    pub fn stream<T>(&self, upstream: &Signal<T>) -> Result<Stream<T>>
        where T: Clone + Send + 'static
    {
        stream::as_stream(self, upstream, self.stream_timeout)
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = Config::new()
            .stream_timeout(Duration::from_millis(10))
            .thread_name_prefix("x");
        assert_eq!(config.stream_timeout, Duration::from_millis(10));
        assert_eq!(config.thread_name_prefix, "x");
        assert_eq!(Config::default().stream_timeout, DEFAULT_STREAM_TIMEOUT);
    }

    #[test]
    fn actor_threads_are_named() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let id = ActorId::next();
        Config::new().thread_name_prefix("dendrite")
            .spawn(id, move || {
                let _ = tx.send(thread::current().name().map(str::to_owned));
            })
            .unwrap();
        assert_eq!(rx.recv().unwrap(), Some(format!("dendrite-{}", id.raw())));
    }
}
