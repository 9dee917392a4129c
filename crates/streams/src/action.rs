//! Ordered action streams (user intents such as "add product").

use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::bus::Publish;

/// Consumer side of an action channel.
pub type ActionStream<T> = UnboundedReceiverStream<T>;

/// Producer side of an action channel.
///
/// - No backpressure: `publish` never waits
/// - Arrival order is preserved
/// - Actions published after the consumer is gone are dropped
#[derive(Debug)]
pub struct ActionBus<T> {
    tx: mpsc::UnboundedSender<T>,
}

impl<T> Clone for ActionBus<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// Create a connected action bus / action stream pair.
pub fn action_channel<T>() -> (ActionBus<T>, ActionStream<T>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ActionBus { tx }, UnboundedReceiverStream::new(rx))
}

impl<T: Send> Publish<T> for ActionBus<T> {
    fn publish(&self, message: T) {
        if self.tx.send(message).is_err() {
            tracing::debug!("action dropped: consumer is gone");
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio_stream::StreamExt;

    use super::*;

    #[tokio::test]
    async fn actions_arrive_in_publish_order() {
        let (bus, mut actions) = action_channel();
        bus.publish("first");
        bus.clone().publish("second");
        drop(bus);

        assert_eq!(actions.next().await, Some("first"));
        assert_eq!(actions.next().await, Some("second"));
        assert_eq!(actions.next().await, None);
    }

    #[test]
    fn publishing_without_consumer_does_not_fail() {
        let (bus, actions) = action_channel::<u8>();
        drop(actions);
        bus.publish(1);
    }
}
