//! Swipe classifier
//!
//! Turns a per-frame stream of index-fingertip positions into at most one
//! direction per cooldown period. Frames arrive at camera rate (20-30 Hz,
//! uncontrolled) and are noisy; a swipe is the net displacement between the
//! oldest and newest samples of a short trailing window.

use glam::Vec2;

use super::history::GestureHistory;
use super::landmarks::HandResults;
use crate::settings::GestureTuning;
use crate::sim::{Direction, is_opposite_direction};

/// Map a raw (unmirrored camera) position into visual space
///
/// The overlay is mirrored so that moving the hand right moves the
/// tracker right on screen; only x flips.
#[inline]
pub fn to_visual(raw: Vec2) -> Vec2 {
    Vec2::new(1.0 - raw.x, raw.y)
}

/// Dominant-axis direction of a displacement, if it clears `threshold`
///
/// Ties between the axes resolve to the vertical axis.
pub fn classify_displacement(displacement: Vec2, threshold: f32) -> Option<Direction> {
    if displacement.length_squared() <= threshold * threshold {
        return None;
    }
    let Vec2 { x: dx, y: dy } = displacement;
    let direction = if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}

/// Stateful swipe detector for a single tracked hand
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    tuning: GestureTuning,
    history: GestureHistory,
    /// Time of the last emitted swipe (cooldown anchor)
    last_emit_ms: Option<f64>,
    /// Most recent emitted swipe, for UI feedback
    last_detected: Option<Direction>,
}

impl Default for GestureClassifier {
    fn default() -> Self {
        Self::new(GestureTuning::default())
    }
}

impl GestureClassifier {
    pub fn new(tuning: GestureTuning) -> Self {
        Self {
            tuning,
            history: GestureHistory::new(tuning.history_ms),
            last_emit_ms: None,
            last_detected: None,
        }
    }

    /// Process one detection frame
    ///
    /// `heading` is the snake's committed direction; swipes that repeat it
    /// or reverse it are not emitted.
    pub fn process_frame(
        &mut self,
        results: &HandResults,
        now_ms: f64,
        heading: Direction,
    ) -> Option<Direction> {
        self.observe(results.index_fingertip(), now_ms, heading)
    }

    /// Process one raw fingertip position (`None` when no hand is in view)
    pub fn observe(
        &mut self,
        raw_fingertip: Option<Vec2>,
        now_ms: f64,
        heading: Direction,
    ) -> Option<Direction> {
        let Some(raw) = raw_fingertip else {
            // A dropped hand invalidates any swipe in progress
            self.history.clear();
            return None;
        };

        self.history.push(to_visual(raw), now_ms);

        if self.history.len() <= 2 || self.cooling_down(now_ms) {
            return None;
        }

        let candidate =
            classify_displacement(self.history.displacement(), self.tuning.movement_threshold)?;

        if candidate == heading || is_opposite_direction(heading, candidate) {
            return None;
        }

        self.history.clear();
        self.last_emit_ms = Some(now_ms);
        self.last_detected = Some(candidate);
        log::debug!("Swipe detected: {}", candidate.as_str());
        Some(candidate)
    }

    fn cooling_down(&self, now_ms: f64) -> bool {
        self.last_emit_ms
            .is_some_and(|t| now_ms - t <= self.tuning.cooldown_ms)
    }

    /// Last emitted swipe, if any
    pub fn last_detected(&self) -> Option<Direction> {
        self.last_detected
    }

    /// Current trail in visual space, oldest first
    pub fn trail(&self) -> Vec<Vec2> {
        self.history.points().collect()
    }

    /// Forget history, cooldown and feedback (camera released)
    pub fn reset(&mut self) {
        self.history.clear();
        self.last_emit_ms = None;
        self.last_detected = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Feed a straight visual-space stroke from `from` to `to` as `steps`
    /// frames spaced 10ms apart starting at `t0`. Returns every emission.
    fn stroke(
        c: &mut GestureClassifier,
        from: Vec2,
        to: Vec2,
        steps: usize,
        t0: f64,
        heading: Direction,
    ) -> Vec<Direction> {
        let mut out = Vec::new();
        for i in 0..steps {
            let f = i as f32 / (steps - 1) as f32;
            let visual = from.lerp(to, f);
            // Camera delivers raw (unmirrored) coordinates
            let raw = Vec2::new(1.0 - visual.x, visual.y);
            if let Some(d) = c.observe(Some(raw), t0 + i as f64 * 10.0, heading) {
                out.push(d);
            }
        }
        out
    }

    #[test]
    fn test_visual_mirrors_x_only() {
        let v = to_visual(Vec2::new(0.2, 0.7));
        assert!((v.x - 0.8).abs() < 1e-6);
        assert_eq!(v.y, 0.7);
    }

    #[test]
    fn test_classify_dominant_axis() {
        assert_eq!(
            classify_displacement(Vec2::new(0.1, 0.01), 0.05),
            Some(Direction::Right)
        );
        assert_eq!(
            classify_displacement(Vec2::new(-0.1, 0.01), 0.05),
            Some(Direction::Left)
        );
        assert_eq!(
            classify_displacement(Vec2::new(0.01, 0.1), 0.05),
            Some(Direction::Down)
        );
        assert_eq!(
            classify_displacement(Vec2::new(0.01, -0.1), 0.05),
            Some(Direction::Up)
        );
        assert_eq!(classify_displacement(Vec2::new(0.03, 0.02), 0.05), None);
    }

    #[test]
    fn test_classify_tie_goes_vertical() {
        assert_eq!(
            classify_displacement(Vec2::new(0.1, 0.1), 0.05),
            Some(Direction::Down)
        );
        assert_eq!(
            classify_displacement(Vec2::new(-0.1, -0.1), 0.05),
            Some(Direction::Up)
        );
    }

    #[test]
    fn test_right_swipe_in_visual_space() {
        let mut c = GestureClassifier::default();
        // Visual x grows: the raw camera x shrinks
        let hits = stroke(
            &mut c,
            Vec2::new(0.4, 0.5),
            Vec2::new(0.5, 0.51),
            3,
            1000.0,
            Direction::Up,
        );
        assert_eq!(hits, vec![Direction::Right]);
        assert_eq!(c.last_detected(), Some(Direction::Right));
        // History resets after an emission
        assert!(c.trail().is_empty());
    }

    #[test]
    fn test_needs_more_than_two_samples() {
        let mut c = GestureClassifier::default();
        assert_eq!(c.observe(Some(Vec2::new(0.9, 0.5)), 0.0, Direction::Up), None);
        assert_eq!(c.observe(Some(Vec2::new(0.5, 0.5)), 10.0, Direction::Up), None);
        assert_eq!(
            c.observe(Some(Vec2::new(0.5, 0.5)), 20.0, Direction::Up),
            Some(Direction::Right)
        );
    }

    #[test]
    fn test_small_motion_emits_nothing() {
        let mut c = GestureClassifier::default();
        let hits = stroke(
            &mut c,
            Vec2::new(0.5, 0.5),
            Vec2::new(0.52, 0.53),
            6,
            0.0,
            Direction::Up,
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_cooldown_suppresses_second_swipe() {
        let mut c = GestureClassifier::default();
        let first = stroke(
            &mut c,
            Vec2::new(0.3, 0.5),
            Vec2::new(0.5, 0.5),
            3,
            0.0,
            Direction::Up,
        );
        assert_eq!(first, vec![Direction::Right]);

        // Left swipe 100ms later is inside the 350ms cooldown
        let second = stroke(
            &mut c,
            Vec2::new(0.5, 0.5),
            Vec2::new(0.3, 0.5),
            3,
            100.0,
            Direction::Up,
        );
        assert!(second.is_empty());

        // Lose the hand, hold still past the cooldown, then swipe again
        c.observe(None, 125.0, Direction::Up);
        for t in (130..=460).step_by(30) {
            c.observe(Some(Vec2::new(0.7, 0.5)), t as f64, Direction::Up);
        }
        let third = stroke(
            &mut c,
            Vec2::new(0.3, 0.5),
            Vec2::new(0.1, 0.5),
            3,
            470.0,
            Direction::Up,
        );
        assert_eq!(third, vec![Direction::Left]);
    }

    #[test]
    fn test_rejects_same_and_reverse_heading() {
        let mut c = GestureClassifier::default();
        // Upward swipe while already heading up
        let same = stroke(
            &mut c,
            Vec2::new(0.5, 0.6),
            Vec2::new(0.5, 0.4),
            4,
            0.0,
            Direction::Up,
        );
        assert!(same.is_empty());
        c.observe(None, 50.0, Direction::Up);

        // Downward swipe while heading up is a reversal
        let reverse = stroke(
            &mut c,
            Vec2::new(0.5, 0.4),
            Vec2::new(0.5, 0.6),
            4,
            60.0,
            Direction::Up,
        );
        assert!(reverse.is_empty());
        // Rejections do not arm the cooldown
        assert_eq!(c.last_detected(), None);
    }

    #[test]
    fn test_dropped_hand_clears_history() {
        let mut c = GestureClassifier::default();
        c.observe(Some(Vec2::new(0.7, 0.5)), 0.0, Direction::Up);
        c.observe(Some(Vec2::new(0.65, 0.5)), 10.0, Direction::Up);
        assert_eq!(c.trail().len(), 2);
        assert_eq!(c.process_frame(&HandResults::empty(), 20.0, Direction::Up), None);
        assert!(c.trail().is_empty());
        // The stroke has to start over: two fresh samples are not enough
        assert_eq!(c.observe(Some(Vec2::new(0.6, 0.5)), 30.0, Direction::Up), None);
        assert_eq!(c.observe(Some(Vec2::new(0.4, 0.5)), 40.0, Direction::Up), None);
    }

    #[test]
    fn test_reset_clears_cooldown() {
        let mut c = GestureClassifier::default();
        stroke(&mut c, Vec2::new(0.3, 0.5), Vec2::new(0.5, 0.5), 3, 0.0, Direction::Up);
        c.reset();
        assert_eq!(c.last_detected(), None);
        let again = stroke(&mut c, Vec2::new(0.5, 0.5), Vec2::new(0.3, 0.5), 3, 40.0, Direction::Up);
        assert_eq!(again, vec![Direction::Left]);
    }

    proptest! {
        #[test]
        fn prop_classification_matches_dominant_axis(
            dx in -1.0f32..1.0,
            dy in -1.0f32..1.0,
        ) {
            let d = Vec2::new(dx, dy);
            match classify_displacement(d, 0.05) {
                None => prop_assert!(d.length_squared() <= 0.05f32 * 0.05),
                Some(Direction::Left) | Some(Direction::Right) => {
                    prop_assert!(dx.abs() > dy.abs());
                }
                Some(Direction::Up) | Some(Direction::Down) => {
                    prop_assert!(dy.abs() >= dx.abs());
                }
            }
        }

        #[test]
        fn prop_never_emits_heading_or_reverse(
            xs in prop::collection::vec(0.0f32..1.0, 3..40),
            heading in prop::sample::select(Direction::ALL.to_vec()),
        ) {
            let mut c = GestureClassifier::default();
            for (i, x) in xs.iter().enumerate() {
                let y = xs[(i * 7) % xs.len()];
                if let Some(d) = c.observe(Some(Vec2::new(*x, y)), i as f64 * 33.0, heading) {
                    prop_assert_ne!(d, heading);
                    prop_assert_ne!(d, heading.opposite());
                }
            }
        }
    }
}
