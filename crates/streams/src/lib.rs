//! Hot streams and the combinators that wire them together.
//!
//! Everything here is domain-agnostic: a [`Replay`] caches the latest value for
//! late subscribers, an [`ActionBus`] carries user intents in order, a
//! [`Notifier`] fans error messages out to whoever is listening, and the
//! combinators in [`combinators`] run as tasks that recompute a downstream
//! [`Replay`] whenever an upstream emits.

pub mod action;
pub mod bus;
pub mod combinators;
pub mod generation;
pub mod notify;
pub mod replay;

pub use action::{ActionBus, ActionStream, action_channel};
pub use bus::Publish;
pub use combinators::{accumulate, combine_latest, switch_map};
pub use generation::{Generation, Token};
pub use notify::{ErrorNotification, NotificationStream, Notifier};
pub use replay::{Replay, ReplayStream};
