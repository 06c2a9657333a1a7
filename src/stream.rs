//! Pulling values out of a signal.
//!
//! `as_stream` turns a push-based signal into a blocking iterator. Behind
//! the iterator sits a buffering actor subscribed to the signal. Each call to
//! `next` sends it a `get` request tagged with a fresh correlation token and
//! waits a bounded time for the matching reply. The reply carries the first
//! value the signal publishes after the request arrived. Values published
//! while nobody is asking are dropped, so a pull never sees a stale value.
//!
//! A pull that times out ends the sequence. So does the death of the signal.
//! Either way, and also when the iterator is dropped early, the buffering
//! actor unsubscribes and exits. To start over, call `as_stream` again.

use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossbeam_channel::{never, select, unbounded, Receiver, Sender};
use uuid::Uuid;

use crate::actor::{Inlet, Postbox};
use crate::config::Config;
use crate::error::Result;
use crate::monitor::{lifeline, Lifeline, Never};
use crate::observer::{Event, SharedObserver};
use crate::registry::Subscriber;
use crate::signal::{ActorId, Address, Signal};


/// Messages accepted by a buffering actor.
pub enum Request<T> {
    /// Reply with the next value to `reply`, tagged with `correlation`.
    Get {
        correlation: Uuid,
        reply: Sender<Got<T>>,
    },
    /// A new upstream value.
    Value(Signal<T>),
}

/// Answer to a `get`. `value` is `None` once the upstream is gone.
pub struct Got<T> {
    correlation: Uuid,
    value: Option<T>,
}

impl<T: Send> Inlet<T> for Postbox<Request<T>> {
    fn deliver(&self, signal: Signal<T>) -> Result<()> {
        self.post(Request::Value(signal))
    }
}


enum Wake<T> {
    Request(Request<T>),
    UpstreamDied,
    Stop,
}

/// The buffering actor.
struct Buffer<T> {
    id: ActorId,
    requests: Receiver<Request<T>>,
    stop: Receiver<()>,
    upstream: Address<T>,
    upstream_alive: Receiver<Never>,
    upstream_gone: bool,
    pending: Option<(Uuid, Sender<Got<T>>)>,
    observer: SharedObserver,
    _lifeline: Lifeline,
}

impl<T: Send + 'static> Buffer<T> {
    fn run(mut self) {
        self.observer.emit(self.id, Event::Started);
        loop {
            match self.next_wake() {
                Wake::Request(Request::Get { correlation, reply }) => {
                    // a newer request supersedes an unanswered one
                    self.pending = Some((correlation, reply));
                    if self.upstream_gone {
                        self.answer(None);
                    }
                }
                Wake::Request(Request::Value(signal)) => self.answer(Some(signal.into_value())),
                Wake::UpstreamDied => {
                    self.upstream_gone = true;
                    self.upstream_alive = never();
                    self.answer(None);
                }
                Wake::Stop => break,
            }
        }
        let _ = self.upstream.unregister(self.id);
        self.observer.emit(self.id, Event::Stopped);
    }

    fn next_wake(&self) -> Wake<T> {
        if self.stop.try_recv().is_ok() {
            return Wake::Stop;
        }
        select! {
            recv(self.stop) -> _ => Wake::Stop,
            recv(self.requests) -> request => match request {
                Ok(request) => Wake::Request(request),
                Err(_) => Wake::Stop,
            },
            recv(self.upstream_alive) -> _ => Wake::UpstreamDied,
        }
    }

    /// Reply to the pending request, if any. Without one, `value` is dropped.
    fn answer(&mut self, value: Option<T>) {
        if let Some((correlation, reply)) = self.pending.take() {
            let _ = reply.send(Got { correlation, value });
            self.observer.emit(self.id, Event::Replied);
        }
    }
}


/// A blocking iterator over the values of a signal.
///
/// Created by [`as_stream`](crate::as_stream).
pub struct Stream<T> {
    buffer: Arc<Postbox<Request<T>>>,
    reply_to: Sender<Got<T>>,
    replies: Receiver<Got<T>>,
    timeout: Duration,
    finished: bool,
}

impl<T> Stream<T> {
    /// How long each pull waits for a value.
    pub fn timeout(&self) -> Duration { self.timeout }

    /// Whether the sequence has ended.
    pub fn is_finished(&self) -> bool { self.finished }

    fn finish(&mut self) {
        if !self.finished {
            self.finished = true;
            let _ = self.buffer.kill();
        }
    }

    fn pull(&mut self) -> Option<T> {
        let correlation = Uuid::new_v4();
        let get = Request::Get { correlation, reply: self.reply_to.clone() };
        self.buffer.post(get).ok()?;
        // too far out to represent means no deadline at all
        let deadline = Instant::now().checked_add(self.timeout);
        loop {
            let got = match deadline {
                Some(deadline) => self.replies.recv_deadline(deadline).ok()?,
                None => self.replies.recv().ok()?,
            };
            // Replies to earlier, abandoned requests are stale.
            if got.correlation == correlation {
                return got.value;
            }
        }
    }
}

impl<T> Iterator for Stream<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.finished {
            return None;
        }
        let value = self.pull();
        if value.is_none() {
            self.finish();
        }
        value
    }
}

impl<T> FusedIterator for Stream<T> {}

impl<T> Drop for Stream<T> {
    fn drop(&mut self) { self.finish() }
}

impl<T> fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("timeout", &self.timeout)
            .field("finished", &self.finished)
            .finish()
    }
}


/// Expose `upstream` as a blocking iterator whose pulls wait up to `timeout`.
pub fn as_stream<T>(config: &Config, upstream: &Signal<T>, timeout: Duration) -> Result<Stream<T>>
    where T: Clone + Send + 'static
{
    let id = ActorId::next();
    let (tx, requests) = unbounded();
    let (stop_tx, stop) = unbounded();
    let (line, monitor) = lifeline();
    let postbox = Arc::new(Postbox::new(id, tx, stop_tx));
    upstream.source().register(Subscriber::new(id, postbox.clone(), monitor))?;
    let buffer = Buffer {
        id,
        requests,
        stop,
        upstream: upstream.source().clone(),
        upstream_alive: upstream.monitor().receiver().clone(),
        upstream_gone: false,
        pending: None,
        observer: config.observer_ref().clone(),
        _lifeline: line,
    };
    config.spawn(id, move || buffer.run())?;
    let (reply_to, replies) = unbounded();
    Ok(Stream { buffer: postbox, reply_to, replies, timeout, finished: false })
}
