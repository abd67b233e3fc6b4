//! Notification streams.
//!
//! Every host collaborator reports asynchronous changes (engine state, lifecycle
//! phase, controller visibility) through a [`NotificationStream`]. The session
//! core consumes each stream from exactly one pump task, so implementations do
//! not need to support concurrent readers.
//!
//! Hosts that already push notifications from callbacks can use
//! [`notification_channel`], which pairs an unbounded sender with a
//! [`ChannelStream`].

use tokio::sync::mpsc;

use crate::platform::PlatformSend;

/// Stream of host notifications of type `T`.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait NotificationStream<T>: PlatformSend
where
    T: PlatformSend + 'static,
{
    /// Get the next notification.
    ///
    /// Returns `None` when the stream is closed.
    async fn next(&mut self) -> Option<T>;
}

/// Sending half returned by [`notification_channel`].
pub type NotificationSender<T> = mpsc::UnboundedSender<T>;

/// [`NotificationStream`] backed by an unbounded tokio channel.
#[derive(Debug)]
pub struct ChannelStream<T> {
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> ChannelStream<T> {
    pub fn new(receiver: mpsc::UnboundedReceiver<T>) -> Self {
        Self { receiver }
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
impl<T> NotificationStream<T> for ChannelStream<T>
where
    T: PlatformSend + 'static,
{
    async fn next(&mut self) -> Option<T> {
        self.receiver.recv().await
    }
}

/// Create a sender/stream pair for pushing notifications from host callbacks.
pub fn notification_channel<T>() -> (NotificationSender<T>, ChannelStream<T>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (sender, ChannelStream::new(receiver))
}
