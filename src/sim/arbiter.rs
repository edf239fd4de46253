//! Direction arbiter
//!
//! Single authority for the snake's heading. Keyboard and gesture requests
//! land here; at most one pending direction survives until the next tick.

use serde::{Deserialize, Serialize};

use super::grid::{Direction, is_opposite_direction};

/// Current (committed) and pending (next tick) heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionArbiter {
    current: Direction,
    pending: Direction,
}

impl Default for DirectionArbiter {
    fn default() -> Self {
        Self::new(Direction::Up)
    }
}

impl DirectionArbiter {
    pub fn new(initial: Direction) -> Self {
        Self {
            current: initial,
            pending: initial,
        }
    }

    /// Heading executed by the last tick
    pub fn current(&self) -> Direction {
        self.current
    }

    /// Heading that the next tick will commit
    pub fn pending(&self) -> Direction {
        self.pending
    }

    /// Buffer `candidate` for the next tick
    ///
    /// Reversals of the current heading are dropped. Accepted requests
    /// overwrite each other, so a tick never sees more than one turn.
    /// Returns whether the request was accepted.
    pub fn request_direction(&mut self, candidate: Direction) -> bool {
        if is_opposite_direction(self.current, candidate) {
            log::trace!(
                "Dropped reversal request {} (heading {})",
                candidate.as_str(),
                self.current.as_str()
            );
            return false;
        }
        self.pending = candidate;
        true
    }

    /// Promote the pending heading to current (start of a tick)
    pub fn commit(&mut self) -> Direction {
        self.current = self.pending;
        self.current
    }

    /// Force both headings (new game)
    pub fn reset(&mut self, direction: Direction) {
        self.current = direction;
        self.pending = direction;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reversal_is_dropped() {
        let mut arbiter = DirectionArbiter::new(Direction::Up);
        assert!(!arbiter.request_direction(Direction::Down));
        assert_eq!(arbiter.pending(), Direction::Up);
    }

    #[test]
    fn test_latest_accepted_request_wins() {
        let mut arbiter = DirectionArbiter::new(Direction::Up);
        assert!(arbiter.request_direction(Direction::Left));
        assert!(arbiter.request_direction(Direction::Right));
        assert_eq!(arbiter.pending(), Direction::Right);
        assert_eq!(arbiter.commit(), Direction::Right);
    }

    #[test]
    fn test_double_turn_is_coalesced() {
        // UP -> RIGHT -> DOWN inside one tick must not reach DOWN
        let mut arbiter = DirectionArbiter::new(Direction::Up);
        assert!(arbiter.request_direction(Direction::Right));
        assert!(!arbiter.request_direction(Direction::Down));
        assert_eq!(arbiter.commit(), Direction::Right);

        // Next tick DOWN is a legal turn from RIGHT
        assert!(arbiter.request_direction(Direction::Down));
        assert_eq!(arbiter.commit(), Direction::Down);
    }

    #[test]
    fn test_reset_overrides_pending() {
        let mut arbiter = DirectionArbiter::new(Direction::Left);
        arbiter.request_direction(Direction::Down);
        arbiter.reset(Direction::Up);
        assert_eq!(arbiter.current(), Direction::Up);
        assert_eq!(arbiter.pending(), Direction::Up);
    }

    proptest! {
        /// Whatever arrives between ticks, the committed heading never
        /// reverses the previous one.
        #[test]
        fn prop_never_reverses_within_a_tick(
            ticks in prop::collection::vec(
                prop::collection::vec(prop::sample::select(Direction::ALL.to_vec()), 0..6),
                1..30,
            )
        ) {
            let mut arbiter = DirectionArbiter::default();
            for requests in ticks {
                let before = arbiter.current();
                for d in requests {
                    arbiter.request_direction(d);
                }
                let after = arbiter.commit();
                prop_assert!(!is_opposite_direction(before, after));
            }
        }
    }
}
