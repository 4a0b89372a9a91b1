pub mod http;

use std::pin::Pin;
use std::task::{Context, Poll};

use anyhow::Result;
use futures::Stream;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::constants::TOPIC_PREFIX;
use crate::models::Notification;
use crate::session::Identity;

pub use http::HttpNotificationApi;

/// Topic key of a user's push channel: one topic per identity.
pub fn topic_for(identity: &Identity) -> String {
    format!("{}{}", TOPIC_PREFIX, identity.user_id)
}

/// REST surface the engine consumes for baselines and acknowledgements.
///
/// Retry/backoff policy belongs to the implementation, not to the engine;
/// the engine treats every call as complete-or-fail.
#[allow(async_fn_in_trait)]
pub trait NotificationApi {
    /// Authoritative unread count for the bound user.
    async fn fetch_unread_count(&self) -> Result<i64>;
    /// First page of notifications, newest first.
    async fn fetch_notifications(&self) -> Result<Vec<Notification>>;
    /// Acknowledge a single notification as read.
    async fn acknowledge_read(&self, id: &str) -> Result<()>;
}

/// Long-lived push channel factory. Delivery on the returned channel is
/// at-least-once and unordered relative to other channels; connection
/// lifecycle (reconnect, heartbeat) is the transport's concern.
#[allow(async_fn_in_trait)]
pub trait PushTransport {
    async fn subscribe(&self, topic: &str) -> Result<PushSubscription>;
}

/// Live push channel for one topic. Payloads arrive as raw JSON.
///
/// `close` flips the accepting flag synchronously: payloads still buffered
/// in the channel are never yielded afterwards, even though the transport's
/// own teardown may complete later. Closing twice is a no-op, and dropping
/// the handle closes it.
pub struct PushSubscription {
    receiver: mpsc::UnboundedReceiver<Value>,
    closed: bool,
}

impl PushSubscription {
    /// Wrap a payload channel. The transport keeps the sending half; once
    /// every sender is dropped the stream ends.
    pub fn new(receiver: mpsc::UnboundedReceiver<Value>) -> Self {
        Self {
            receiver,
            closed: false,
        }
    }

    /// A fresh subscription paired with its sending half, for in-process
    /// transports and tests.
    pub fn channel() -> (mpsc::UnboundedSender<Value>, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx))
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stop accepting payloads, idempotently. Takes effect before any
    /// asynchronous transport teardown completes.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.receiver.close();
    }
}

impl Drop for PushSubscription {
    fn drop(&mut self) {
        self.close();
    }
}

impl Stream for PushSubscription {
    type Item = Value;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Value>> {
        let this = self.get_mut();
        if this.closed {
            return Poll::Ready(None);
        }
        this.receiver.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    #[test]
    fn test_topic_is_namespaced_by_user_id() {
        let identity = Identity::new("u-42");
        assert_eq!(topic_for(&identity), "notifications/u-42");
    }

    #[tokio::test]
    async fn test_subscription_yields_payloads_in_delivery_order() {
        let (tx, mut subscription) = PushSubscription::channel();
        tx.send(json!({"seq": 1})).unwrap();
        tx.send(json!({"seq": 2})).unwrap();

        assert_eq!(subscription.next().await.unwrap()["seq"], 1);
        assert_eq!(subscription.next().await.unwrap()["seq"], 2);
    }

    #[tokio::test]
    async fn test_close_discards_buffered_payloads() {
        let (tx, mut subscription) = PushSubscription::channel();
        tx.send(json!({"seq": 1})).unwrap();

        subscription.close();
        subscription.close(); // idempotent

        assert!(subscription.is_closed());
        assert!(subscription.next().await.is_none());
    }

    #[tokio::test]
    async fn test_senders_fail_after_close() {
        let (tx, mut subscription) = PushSubscription::channel();
        subscription.close();
        assert!(tx.send(json!({"seq": 1})).is_err());
    }

    #[tokio::test]
    async fn test_stream_ends_when_transport_drops_sender() {
        let (tx, mut subscription) = PushSubscription::channel();
        drop(tx);
        assert!(subscription.next().await.is_none());
        assert!(!subscription.is_closed());
    }
}
