//! Errors surfaced to callers of the public operations.

use std::io;

use thiserror::Error;

use crate::signal::ActorId;


/// An error raised while spawning or addressing a signal actor.
///
/// Value propagation between actors never produces one of these; a
/// subscriber that cannot be reached simply stops receiving values.
#[derive(Debug, Error)]
pub enum Error {
    /// The operating system refused to spawn an actor thread.
    #[error("failed to spawn signal actor: {0}")]
    Spawn(#[from] io::Error),

    /// The addressed actor has already terminated.
    #[error("signal actor {0} has terminated")]
    Disconnected(ActorId),
}

/// Shorthand for results of signal operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
