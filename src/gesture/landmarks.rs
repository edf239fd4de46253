//! Hand-landmark frames as delivered by the detection model

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::INDEX_FINGER_TIP;

/// One normalized keypoint (0..1 in the raw, unmirrored camera frame)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

/// Detection result for a single camera frame
///
/// Zero hands is the common "nothing in view" case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandResults {
    #[serde(default)]
    pub multi_hand_landmarks: Vec<Vec<Landmark>>,
}

impl HandResults {
    /// A frame with no hand in view
    pub fn empty() -> Self {
        Self::default()
    }

    /// A frame with one hand whose index fingertip sits at raw `(x, y)`
    pub fn with_fingertip(x: f32, y: f32) -> Self {
        let mut hand = vec![Landmark::default(); crate::consts::HAND_LANDMARK_COUNT];
        hand[INDEX_FINGER_TIP] = Landmark { x, y, z: 0.0 };
        Self {
            multi_hand_landmarks: vec![hand],
        }
    }

    /// Raw index-fingertip position of the first hand, if one was found
    ///
    /// A truncated landmark list counts as no hand.
    pub fn index_fingertip(&self) -> Option<Vec2> {
        let hand = self.multi_hand_landmarks.first()?;
        let tip = hand.get(INDEX_FINGER_TIP)?;
        Some(Vec2::new(tip.x, tip.y))
    }
}
