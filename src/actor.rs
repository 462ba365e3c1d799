//! Actors own their state and are driven by messages over a channel.
//!
//! Every message carries the [`Span`] it was sent from so the receiving side
//! can re-enter it while handling the message.

pub mod switcher;

use tokio::sync::mpsc;
use tracing::Span;

pub struct Sender<E>(mpsc::UnboundedSender<(Span, E)>);

pub type Receiver<E> = mpsc::UnboundedReceiver<(Span, E)>;

impl<E> Clone for Sender<E> {
    fn clone(&self) -> Self { Sender(self.0.clone()) }
}

impl<E> std::fmt::Debug for Sender<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sender").field("closed", &self.0.is_closed()).finish()
    }
}

impl<E> Sender<E> {
    /// Sends `event` tagged with the current span. Returns false if the actor is gone.
    pub fn send(&self, event: E) -> bool { self.0.send((Span::current(), event)).is_ok() }
}

pub fn channel<E>() -> (Sender<E>, Receiver<E>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Sender(tx), rx)
}
