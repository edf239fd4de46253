//! Best score for the lifetime of the page
//!
//! Kept in memory only; a reload starts from zero.

use serde::{Deserialize, Serialize};

/// Process-lifetime best score and run counter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    best: u32,
    /// Finished runs this session
    games_played: u32,
}

impl HighScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Returns true if it set a new best.
    pub fn record(&mut self, score: u32) -> bool {
        self.games_played += 1;
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_maximum() {
        let mut hs = HighScore::new();
        assert!(!hs.record(0));
        assert!(hs.record(40));
        assert!(!hs.record(40));
        assert!(!hs.record(10));
        assert!(hs.record(60));
        assert_eq!(hs.best(), 60);
        assert_eq!(hs.games_played(), 5);
    }
}
