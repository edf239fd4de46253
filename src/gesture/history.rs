//! Rolling window of fingertip samples

use std::collections::VecDeque;

use glam::Vec2;

/// Fingertip position in visual (mirrored) space plus capture time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub pos: Vec2,
    pub timestamp_ms: f64,
}

/// Time-ordered samples no older than `window_ms` relative to the newest push
#[derive(Debug, Clone)]
pub struct GestureHistory {
    samples: VecDeque<GestureSample>,
    window_ms: f64,
}

impl GestureHistory {
    pub fn new(window_ms: f64) -> Self {
        Self {
            samples: VecDeque::with_capacity(16),
            window_ms,
        }
    }

    /// Append a sample and drop everything older than the window
    pub fn push(&mut self, pos: Vec2, now_ms: f64) {
        self.samples.push_back(GestureSample {
            pos,
            timestamp_ms: now_ms,
        });
        self.prune(now_ms);
    }

    /// Remove samples with `now - t > window`
    pub fn prune(&mut self, now_ms: f64) {
        let window = self.window_ms;
        self.samples.retain(|s| now_ms - s.timestamp_ms <= window);
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Newest minus oldest position; zero with fewer than two samples
    pub fn displacement(&self) -> Vec2 {
        match (self.samples.front(), self.samples.back()) {
            (Some(first), Some(last)) => last.pos - first.pos,
            _ => Vec2::ZERO,
        }
    }

    /// Trail for overlay drawing, oldest first
    pub fn points(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.samples.iter().map(|s| s.pos)
    }
}
