//! The signal actor loop.
//!
//! A signal actor is a thread that owns a subscriber registry and a
//! transformation function. It waits on a single `Select` for whichever comes
//! first: a message in its mailbox, a stop request, a tick of its own timer,
//! or the death of one of its subscribers. Each value it receives is
//! transformed, wrapped in a fresh handle and sent to every current
//! subscriber.
//!
//! Messages from one sender arrive in the order they were sent. Nothing is
//! promised about the order in which different subscribers see a broadcast.

use std::sync::Arc;

use crossbeam_channel::{never, unbounded, Receiver, Select, Sender};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::monitor::{lifeline, Lifeline, Monitor};
use crate::observer::{Event, SharedObserver};
use crate::registry::{Registry, Subscriber};
use crate::signal::{make_signal, ActorId, Address, Signal};


/// Control side of an actor publishing values of type `T`.
pub trait Mailbox<T>: Send + Sync {
    /// Add or replace a subscription.
    fn register(&self, subscriber: Subscriber<T>) -> Result<()>;
    /// Remove the subscription of actor `id`.
    fn unregister(&self, id: ActorId) -> Result<()>;
    /// Request forced termination.
    fn stop(&self) -> Result<()>;
}

/// Input side of an actor consuming values of type `T`.
pub trait Inlet<T>: Send + Sync {
    /// Deliver a value-update.
    fn deliver(&self, signal: Signal<T>) -> Result<()>;
}


/// Everything an actor with input `I` and output `O` accepts in its mailbox.
pub enum Message<I, O> {
    /// A dependent wants to receive our values.
    Register(Subscriber<O>),
    /// A dependent no longer wants our values.
    Unregister(ActorId),
    /// A new upstream value.
    Value(Signal<I>),
}


/// Sending half of an actor's mailbox, plus its stop line.
pub struct Postbox<M> {
    actor: ActorId,
    messages: Sender<M>,
    stop: Sender<()>,
}

impl<M> Postbox<M> {
    pub(crate) fn new(actor: ActorId, messages: Sender<M>, stop: Sender<()>) -> Postbox<M> {
        Postbox { actor, messages, stop }
    }

    pub(crate) fn post(&self, message: M) -> Result<()> {
        self.messages.send(message).map_err(|_| Error::Disconnected(self.actor))
    }

    pub(crate) fn kill(&self) -> Result<()> {
        self.stop.send(()).map_err(|_| Error::Disconnected(self.actor))
    }
}

impl<I: Send, O: Send> Mailbox<O> for Postbox<Message<I, O>> {
    fn register(&self, subscriber: Subscriber<O>) -> Result<()> {
        self.post(Message::Register(subscriber))
    }

    fn unregister(&self, id: ActorId) -> Result<()> {
        self.post(Message::Unregister(id))
    }

    fn stop(&self) -> Result<()> { self.kill() }
}

impl<I: Send, O: Send> Inlet<I> for Postbox<Message<I, O>> {
    fn deliver(&self, signal: Signal<I>) -> Result<()> {
        self.post(Message::Value(signal))
    }
}


/// What woke the actor up.
enum Inbound<I, O> {
    Message(Message<I, O>),
    Tick(I),
    Died(ActorId),
    Stop,
}

/// The operations of one `Select`, in the order they were added.
enum Arm {
    Stop,
    Mailbox,
    Ticks,
    Monitor(ActorId),
}


/// Boxed transformation function.
pub type Transform<I, O> = Box<dyn FnMut(I) -> O + Send + 'static>;


/// A signal actor that has been set up but not yet started.
///
/// Setting up and starting are separate so that a constructor can register
/// the actor with its upstream from the caller's thread first. Anything the
/// caller sends upstream afterwards is then guaranteed to reach the new actor.
pub struct Actor<I, O> {
    id: ActorId,
    mailbox: Receiver<Message<I, O>>,
    stop: Receiver<()>,
    ticks: Receiver<I>,
    postbox: Arc<Postbox<Message<I, O>>>,
    address: Address<O>,
    registry: Registry<O>,
    transform: Transform<I, O>,
    observer: SharedObserver,
    _lifeline: Lifeline,
}

impl<I, O> Actor<I, O>
    where I: Send + 'static,
          O: Clone + Send + 'static,
{
    /// Set up an actor fed by its mailbox only.
    pub fn new(config: &Config, transform: Transform<I, O>) -> Actor<I, O> {
        Actor::with_ticks(config, never(), transform)
    }

    /// Set up an actor that also treats everything arriving on `ticks` as a
    /// value-update. The channel is dropped together with the actor.
    pub fn with_ticks(config: &Config, ticks: Receiver<I>, transform: Transform<I, O>) -> Actor<I, O> {
        let id = ActorId::next();
        let (tx, mailbox) = unbounded();
        let (stop_tx, stop) = unbounded();
        let (line, monitor) = lifeline();
        let postbox = Arc::new(Postbox::new(id, tx, stop_tx));
        let address = Address::new(id, postbox.clone(), monitor);
        Actor {
            id,
            mailbox,
            stop,
            ticks,
            postbox,
            address,
            registry: Registry::new(),
            transform,
            observer: config.observer_ref().clone(),
            _lifeline: line,
        }
    }

    /// This actor as a subscriber of some upstream signal.
    pub fn subscriber(&self) -> Subscriber<I> {
        Subscriber::new(self.id, self.postbox.clone(), self.monitor())
    }

    fn monitor(&self) -> Monitor { self.address.monitor() }

    /// Start the actor thread and return a handle carrying `initial`.
    pub fn spawn(self, config: &Config, initial: O) -> Result<Signal<O>> {
        let signal = make_signal(&self.address, initial);
        config.spawn(self.id, move || self.run())?;
        Ok(signal)
    }

    fn run(mut self) {
        self.observer.emit(self.id, Event::Started);
        loop {
            match self.next_inbound() {
                Inbound::Message(Message::Register(subscriber)) => {
                    let id = subscriber.id();
                    self.registry.register(subscriber);
                    self.observer.emit(self.id, Event::Registered(id));
                }
                Inbound::Message(Message::Unregister(id)) => {
                    if self.registry.unregister(id) {
                        self.observer.emit(self.id, Event::Unregistered(id));
                    }
                }
                Inbound::Died(id) => {
                    self.registry.unregister(id);
                    self.observer.emit(self.id, Event::SubscriberDied(id));
                }
                Inbound::Message(Message::Value(signal)) => self.publish(signal.into_value()),
                Inbound::Tick(input) => self.publish(input),
                Inbound::Stop => break,
            }
        }
        self.observer.emit(self.id, Event::Stopped);
    }

    fn publish(&mut self, input: I) {
        let value = (self.transform)(input);
        let signal = make_signal(&self.address, value);
        let subscribers = self.registry.broadcast(&signal);
        self.observer.emit(self.id, Event::Published { subscribers });
    }

    fn next_inbound(&self) -> Inbound<I, O> {
        // A pending stop wins over anything else that is ready.
        if self.stop.try_recv().is_ok() {
            return Inbound::Stop;
        }
        let mut select = Select::new();
        let mut arms = Vec::with_capacity(3 + self.registry.len());
        select.recv(&self.stop);
        arms.push(Arm::Stop);
        select.recv(&self.mailbox);
        arms.push(Arm::Mailbox);
        select.recv(&self.ticks);
        arms.push(Arm::Ticks);
        let mut monitors = Vec::with_capacity(self.registry.len());
        for subscriber in self.registry.iter() {
            select.recv(subscriber.monitor().receiver());
            arms.push(Arm::Monitor(subscriber.id()));
            monitors.push(subscriber.monitor().receiver());
        }

        let op = select.select();
        let index = op.index();
        match arms[index] {
            Arm::Stop => {
                let _ = op.recv(&self.stop);
                Inbound::Stop
            }
            Arm::Mailbox => match op.recv(&self.mailbox) {
                Ok(message) => Inbound::Message(message),
                Err(_) => Inbound::Stop,
            },
            Arm::Ticks => match op.recv(&self.ticks) {
                Ok(input) => Inbound::Tick(input),
                Err(_) => Inbound::Stop,
            },
            Arm::Monitor(id) => {
                // Lifelines carry no messages; this only returns on disconnect.
                let _ = op.recv(monitors[index - 3]);
                Inbound::Died(id)
            }
        }
    }
}
