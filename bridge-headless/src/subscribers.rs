//! Fan-out of host notifications to every open stream.

use bridge_traits::{notification_channel, ChannelStream, NotificationSender};
use parking_lot::Mutex;

/// Set of open notification streams of one kind.
pub struct Subscribers<T> {
    senders: Mutex<Vec<NotificationSender<T>>>,
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self {
            senders: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Clone> Subscribers<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a new stream.
    pub fn subscribe(&self) -> ChannelStream<T> {
        let (sender, stream) = notification_channel();
        self.senders.lock().push(sender);
        stream
    }

    /// Deliver `item` to every open stream, forgetting closed ones.
    pub fn broadcast(&self, item: T) {
        self.senders
            .lock()
            .retain(|sender| sender.send(item.clone()).is_ok());
    }

    /// Number of streams that have not been dropped.
    pub fn count(&self) -> usize {
        let mut senders = self.senders.lock();
        senders.retain(|sender| !sender.is_closed());
        senders.len()
    }
}
