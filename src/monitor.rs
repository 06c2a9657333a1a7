//! Liveness monitoring between actors.
//!
//! Every actor owns a `Lifeline`. Anyone holding a `Monitor` for it learns
//! about its termination exactly once, when the lifeline is dropped, whether
//! the actor returned normally, was stopped or panicked.

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};


/// Uninhabited payload: nothing is ever sent over a lifeline.
#[derive(Debug)]
pub enum Never {}


/// The owning end of a liveness channel. Dropping it is the death notice.
#[derive(Debug)]
pub struct Lifeline {
    _alive: Sender<Never>,
}


/// An observer of some actor's lifeline.
#[derive(Clone, Debug)]
pub struct Monitor {
    alive: Receiver<Never>,
}

impl Monitor {
    /// The receiver that disconnects when the monitored actor terminates.
    ///
    /// It never yields a value, so it can be waited on inside a select next
    /// to ordinary mailboxes.
    pub(crate) fn receiver(&self) -> &Receiver<Never> {
        &self.alive
    }

    /// Whether the monitored actor is still running.
    pub fn is_alive(&self) -> bool {
        match self.alive.try_recv() {
            Err(TryRecvError::Disconnected) => false,
            _ => true,
        }
    }

    /// Block until the monitored actor has terminated.
    pub fn wait(&self) {
        // Blocks until the lifeline is dropped; nothing can ever be received.
        let _ = self.alive.recv();
    }
}


/// Create a connected lifeline and monitor.
pub fn lifeline() -> (Lifeline, Monitor) {
    let (tx, rx) = bounded(0);
    (Lifeline { _alive: tx }, Monitor { alive: rx })
}
