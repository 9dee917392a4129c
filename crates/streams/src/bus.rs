//! Publishing abstraction (mechanics only).
//!
//! Every sink in this crate (replayed streams, action buses, notifiers) is
//! written to through [`Publish`]. Combinators take their output as
//! `impl Publish<T>` so the same task can feed a [`crate::Replay`] in
//! production and a recording sink in tests.
//!
//! ## Delivery
//!
//! `publish()` never blocks and never fails. A sink with no live readers
//! simply drops the message (or, for a replay, keeps it for the next reader).

use std::sync::Arc;

/// Domain-agnostic sink for values of type `M`.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync`, so a publisher can be moved into a
/// spawned task and shared with the handle that owns it.
pub trait Publish<M>: Send + Sync {
    fn publish(&self, message: M);
}

impl<M, P> Publish<M> for Arc<P>
where
    P: Publish<M> + ?Sized,
{
    fn publish(&self, message: M) {
        (**self).publish(message)
    }
}
