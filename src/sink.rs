//! Terminal signals that act on every value they receive.

use std::fmt::Display;

use crate::actor::{Actor, Transform};
use crate::config::Config;
use crate::error::Result;
use crate::signal::Signal;


/// Run `effect` on every value published by `upstream`.
///
/// The sink republishes each value unchanged, so its handle can be chained
/// like any other signal. Its initial handle carries the upstream snapshot,
/// without running the effect on it.
pub fn for_each<T, F>(config: &Config, upstream: &Signal<T>, mut effect: F) -> Result<Signal<T>>
    where T: Clone + Send + 'static,
          F: FnMut(&T) + Send + 'static,
{
    let transform: Transform<T, T> = Box::new(move |value| {
        effect(&value);
        value
    });
    let actor = Actor::new(config, transform);
    upstream.source().register(actor.subscriber())?;
    actor.spawn(config, upstream.value().clone())
}

/// Print every value published by `upstream` to stdout, one per line.
pub fn as_text<T>(config: &Config, upstream: &Signal<T>) -> Result<Signal<T>>
    where T: Display + Clone + Send + 'static
{
    for_each(config, upstream, |value| println!("{}", value))
}
