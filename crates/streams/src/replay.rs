//! Replay-to-latest hot streams.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::sync::watch;
use tokio_stream::Stream;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::WatchStream;

use crate::bus::Publish;

/// A hot stream that caches its most recent value.
///
/// Production is independent of subscribers: publishing with nobody listening
/// still updates the cache, and every new subscriber first receives the cached
/// value (if any) and then every later update. Subscribers that fall behind
/// skip straight to the newest value.
///
/// Cloning the handle shares the same stream. Subscribers end once every
/// handle has been dropped.
#[derive(Debug)]
pub struct Replay<T> {
    tx: Arc<watch::Sender<Option<T>>>,
}

impl<T> Clone for Replay<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Default for Replay<T> {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }
}

impl<T> Replay<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// An empty stream: subscribers wait for the first publish.
    pub fn new() -> Self {
        Self::default()
    }

    /// A stream that already holds `value`.
    pub fn seeded(value: T) -> Self {
        let (tx, _rx) = watch::channel(Some(value));
        Self { tx: Arc::new(tx) }
    }

    /// Replace the cached value and wake every subscriber.
    pub fn publish(&self, value: T) {
        self.tx.send_replace(Some(value));
    }

    /// The cached value, if anything was published yet.
    pub fn latest(&self) -> Option<T> {
        self.tx.borrow().clone()
    }

    /// Subscribe, starting with the cached value.
    pub fn subscribe(&self) -> ReplayStream<T> {
        ReplayStream {
            inner: Box::pin(WatchStream::new(self.tx.subscribe())),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T> Publish<T> for Replay<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn publish(&self, message: T) {
        Replay::publish(self, message)
    }
}

/// Subscription to a [`Replay`].
pub struct ReplayStream<T> {
    inner: Pin<Box<WatchStream<Option<T>>>>,
}

impl<T> core::fmt::Debug for ReplayStream<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReplayStream").finish_non_exhaustive()
    }
}

impl<T> ReplayStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Wait until a value satisfying `pred` is observed.
    ///
    /// Returns `None` if the stream ends first.
    pub async fn wait_for(&mut self, mut pred: impl FnMut(&T) -> bool) -> Option<T> {
        while let Some(value) = self.next().await {
            if pred(&value) {
                return Some(value);
            }
        }
        None
    }
}

impl<T> Stream for ReplayStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        loop {
            match self.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Some(value))) => return Poll::Ready(Some(value)),
                // Nothing published yet.
                Poll::Ready(Some(None)) => continue,
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
