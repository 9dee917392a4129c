//! Stream combinators.
//!
//! Each combinator spawns one task that owns its inputs and writes to a
//! single output sink, so derived state always has exactly one writer. The
//! returned `JoinHandle` lets the owner abort the pipeline; the task also ends
//! on its own once its inputs are exhausted.

use std::future::Future;
use std::pin::Pin;

use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};

use crate::bus::Publish;
use crate::generation::{Generation, Token};

/// Recompute `combine(left, right)` whenever either input emits.
///
/// Nothing is published until both inputs have produced at least one value.
/// An input that ends keeps contributing its last value.
pub fn combine_latest<L, R, A, B, C, F, P>(left: L, right: R, mut combine: F, out: P) -> JoinHandle<()>
where
    L: Stream<Item = A> + Send + 'static,
    R: Stream<Item = B> + Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
    F: FnMut(&A, &B) -> C + Send + 'static,
    P: Publish<C> + 'static,
{
    tokio::spawn(async move {
        tokio::pin!(left);
        tokio::pin!(right);

        let mut latest_left: Option<A> = None;
        let mut latest_right: Option<B> = None;
        let mut left_done = false;
        let mut right_done = false;

        loop {
            let changed = tokio::select! {
                item = left.next(), if !left_done => match item {
                    Some(a) => {
                        latest_left = Some(a);
                        true
                    }
                    None => {
                        left_done = true;
                        false
                    }
                },
                item = right.next(), if !right_done => match item {
                    Some(b) => {
                        latest_right = Some(b);
                        true
                    }
                    None => {
                        right_done = true;
                        false
                    }
                },
                else => break,
            };

            if !changed {
                continue;
            }
            if let (Some(a), Some(b)) = (&latest_left, &latest_right) {
                out.publish(combine(a, b));
            }
        }
    })
}

/// Fold every item into an accumulator and publish each new state.
///
/// The seed itself is not published; the first output follows the first item.
pub fn accumulate<S, T, A, F, P>(source: S, seed: A, mut fold: F, out: P) -> JoinHandle<()>
where
    S: Stream<Item = T> + Send + 'static,
    T: Send + 'static,
    A: Clone + Send + 'static,
    F: FnMut(A, T) -> A + Send + 'static,
    P: Publish<A> + 'static,
{
    tokio::spawn(async move {
        tokio::pin!(source);

        let mut acc = seed;
        while let Some(item) = source.next().await {
            acc = fold(acc, item);
            out.publish(acc.clone());
        }
    })
}

/// Map every item to a future and publish only the output of the most recent one.
///
/// A new item drops the in-flight future (cancelling it) and starts a new
/// generation; a completion is published only while its token is current.
pub fn switch_map<S, T, U, F, Fut, P>(source: S, mut project: F, out: P) -> JoinHandle<()>
where
    S: Stream<Item = T> + Send + 'static,
    T: Send + 'static,
    U: Send + 'static,
    F: FnMut(T) -> Fut + Send + 'static,
    Fut: Future<Output = U> + Send + 'static,
    P: Publish<U> + 'static,
{
    tokio::spawn(async move {
        tokio::pin!(source);

        let generation = Generation::new();
        let mut in_flight: Option<(Token, Pin<Box<Fut>>)> = None;
        let mut source_done = false;

        loop {
            tokio::select! {
                item = source.next(), if !source_done => match item {
                    Some(value) => {
                        let token = generation.advance();
                        if in_flight.is_some() {
                            tracing::debug!("switch_map: superseding in-flight operation");
                        }
                        in_flight = Some((token, Box::pin(project(value))));
                    }
                    None => source_done = true,
                },
                (token, output) = settle(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    if generation.is_current(token) {
                        out.publish(output);
                    } else {
                        tracing::debug!("switch_map: discarding stale result");
                    }
                },
                else => break,
            }
        }
    })
}

async fn settle<F>(slot: &mut Option<(Token, Pin<Box<F>>)>) -> (Token, F::Output)
where
    F: Future,
{
    match slot {
        Some((token, fut)) => {
            let token = *token;
            (token, fut.as_mut().await)
        }
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::action::action_channel;
    use crate::bus::testing::Recorder;
    use crate::replay::Replay;

    #[tokio::test]
    async fn combine_latest_waits_for_both_sides_then_tracks_either() {
        let left = Replay::new();
        let right = Replay::new();
        let out = Replay::new();
        let _task = combine_latest(left.subscribe(), right.subscribe(), |a: &i32, b: &i32| a + b, out.clone());
        let mut sums = out.subscribe();

        left.publish(1);
        tokio::task::yield_now().await;
        assert_eq!(out.latest(), None);

        right.publish(10);
        assert_eq!(sums.next().await, Some(11));

        left.publish(2);
        assert_eq!(sums.next().await, Some(12));
    }

    #[tokio::test]
    async fn accumulate_publishes_every_fold_step() {
        let (bus, actions) = action_channel();
        let recorder = Arc::new(Recorder::default());
        let task = accumulate(actions, Vec::new(), |mut acc: Vec<u8>, x| {
            acc.push(x);
            acc
        }, recorder.clone());

        bus.publish(1);
        bus.publish(2);
        drop(bus);
        task.await.unwrap();

        assert_eq!(recorder.seen(), vec![vec![1], vec![1, 2]]);
    }

    #[tokio::test(start_paused = true)]
    async fn switch_map_only_publishes_latest_result() {
        let (bus, actions) = action_channel();
        let recorder = Arc::new(Recorder::default());
        let task = switch_map(
            actions,
            |delay_ms: u64| async move {
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                delay_ms
            },
            recorder.clone(),
        );

        // The slow first operation is superseded before it completes.
        bus.publish(100);
        tokio::time::sleep(Duration::from_millis(10)).await;
        bus.publish(20);
        drop(bus);
        task.await.unwrap();

        assert_eq!(recorder.seen(), vec![20]);
    }

    #[tokio::test(start_paused = true)]
    async fn switch_map_publishes_each_result_that_completes_in_time() {
        let (bus, actions) = action_channel();
        let recorder = Arc::new(Recorder::default());
        let task = switch_map(
            actions,
            |value: u64| async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                value * 2
            },
            recorder.clone(),
        );

        bus.publish(1);
        tokio::time::sleep(Duration::from_millis(50)).await;
        bus.publish(2);
        drop(bus);
        task.await.unwrap();

        assert_eq!(recorder.seen(), vec![2, 4]);
    }
}
