//! Generation tokens for latest-wins semantics.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket handed to an operation when it is started.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(u64);

/// Monotonic counter shared by everything racing for the same slot.
///
/// Each new operation calls [`Generation::advance`]; when it completes it is
/// only allowed to publish if its token is still current.
#[derive(Debug, Clone, Default)]
pub struct Generation {
    current: Arc<AtomicU64>,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new generation, superseding every outstanding token.
    pub fn advance(&self) -> Token {
        Token(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_current(&self, token: Token) -> bool {
        self.current.load(Ordering::Acquire) == token.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_token_is_current() {
        let generation = Generation::new();
        let first = generation.advance();
        assert!(generation.is_current(first));

        let second = generation.clone().advance();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
        assert!(second > first);
    }
}
