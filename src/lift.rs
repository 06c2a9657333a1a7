use crate::actor::{Actor, Transform};
use crate::config::Config;
use crate::error::Result;
use crate::signal::Signal;


/// Lift a function to a function on signals.
///
/// A lift maps a function on values to a function on signals: it spawns a
/// new actor that subscribes to `upstream` and republishes `f(value)` for
/// every value `upstream` publishes. The returned handle initially carries
/// `f` applied to the upstream handle's snapshot.
///
/// The subscription is queued before this returns, but not awaited. Values
/// the upstream publishes in between, for example because another thread
/// feeds it, may be missed. Values sent later from the calling thread are
/// not.
///
/// ```
/// # use std::sync::mpsc::channel;
/// # use std::time::Duration;
/// let (tx, rx) = channel();
/// let input = dendrite::input(2).unwrap();
/// let squares = dendrite::lift(|x| x * x, &input.signal()).unwrap();
/// assert_eq!(*squares.value(), 4);
/// dendrite::for_each(&squares, move |x| { let _ = tx.send(*x); }).unwrap();
/// input.send(5).unwrap();
/// assert_eq!(rx.recv_timeout(Duration::from_secs(1)), Ok(25));
/// ```
pub fn lift<A, B, F>(config: &Config, f: F, upstream: &Signal<A>) -> Result<Signal<B>>
    where A: Clone + Send + 'static,
          B: Clone + Send + 'static,
          F: Fn(A) -> B + Send + 'static,
{
    let initial = f(upstream.value().clone());
    let transform: Transform<A, B> = Box::new(f);
    let actor = Actor::new(config, transform);
    upstream.source().register(actor.subscriber())?;
    actor.spawn(config, initial)
}
