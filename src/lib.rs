//! Vision Snake - grid snake steered by hand swipes or arrow keys
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid rules, direction arbiter, tick)
//! - `gesture`: Fingertip swipe classifier over hand-landmark frames
//! - `scheduler`: Fixed-period tick scheduling from host timestamps
//! - `app`: Application context wiring input, simulation and camera
//! - `platform`: Camera / hand-landmark capability abstraction
//! - `settings`: Tunable configuration

pub mod app;
pub mod gesture;
pub mod highscores;
pub mod platform;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use app::{App, ControlMode, RenderSnapshot};
pub use highscores::HighScore;
pub use settings::{GestureTuning, Settings};

/// Game configuration constants
pub mod consts {
    /// Board is GRID_SIZE x GRID_SIZE cells
    pub const GRID_SIZE: i32 = 20;
    /// Fixed tick period while playing
    pub const GAME_SPEED_MS: f64 = 150.0;
    /// Most ticks replayed by one scheduler poll (stalled tab, slow frame)
    pub const MAX_CATCH_UP_TICKS: u32 = 4;
    /// Points awarded per food eaten
    pub const FOOD_SCORE: u32 = 10;
    /// Starting snake, head first, vertical line heading up
    pub const INITIAL_SNAKE: [(i32, i32); 3] = [(10, 10), (10, 11), (10, 12)];

    /// Minimum fingertip displacement (normalized units) to count as a swipe
    pub const MOVEMENT_THRESHOLD: f32 = 0.05;
    /// Trailing window of fingertip samples considered for a swipe
    pub const GESTURE_HISTORY_MS: f64 = 300.0;
    /// Minimum time between two emitted swipes
    pub const GESTURE_COOLDOWN_MS: f64 = 350.0;

    /// Landmarks per detected hand
    pub const HAND_LANDMARK_COUNT: usize = 21;
    /// Index fingertip keypoint
    pub const INDEX_FINGER_TIP: usize = 8;

    /// Camera capture size requested from the device
    pub const CAMERA_WIDTH: u32 = 320;
    pub const CAMERA_HEIGHT: u32 = 240;
}
