//! Application context
//!
//! One `App` is built at startup and owns everything: simulation state,
//! direction arbiter (inside the state), gesture classifier, tick scheduler,
//! best score, settings and the camera capability. Input producers never
//! touch the simulation; they leave requests in the mailbox, which `advance`
//! drains into the arbiter right before ticking.

use serde::{Deserialize, Serialize};

use crate::gesture::{GestureClassifier, HandResults};
use crate::highscores::HighScore;
use crate::platform::{CapabilityError, HandTrackingCapability};
use crate::scheduler::TickScheduler;
use crate::settings::Settings;
use crate::sim::{self, Direction, GameEvent, GameState, GameStatus, Point};

/// Which input source steers the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ControlMode {
    /// Index-finger swipes
    #[default]
    Camera,
    /// Arrow keys only; the camera keeps running for feedback
    Keyboard,
}

/// Origin of a direction request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSource {
    Keyboard,
    Gesture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionRequest {
    pub source: InputSource,
    pub direction: Direction,
}

/// Single-consumer queue of direction requests
///
/// Producers push as events arrive; the app drains it in arrival order.
#[derive(Debug, Default)]
pub struct DirectionMailbox {
    requests: Vec<DirectionRequest>,
}

impl DirectionMailbox {
    pub fn new() -> Self {
        Self {
            requests: Vec::with_capacity(8),
        }
    }

    pub fn push(&mut self, source: InputSource, direction: Direction) {
        self.requests.push(DirectionRequest { source, direction });
    }

    /// Take all pending requests, oldest first
    pub fn drain(&mut self) -> Vec<DirectionRequest> {
        std::mem::take(&mut self.requests)
    }

    pub fn clear(&mut self) {
        self.requests.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }
}

/// Camera lifecycle as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CameraStatus {
    #[default]
    Inactive,
    /// Acquisition requested, waiting for the completion signal
    Starting,
    Active,
    /// Sticky until the user retries
    Failed(CapabilityError),
}

impl CameraStatus {
    /// Overlay text for the camera panel
    pub fn message(&self) -> &'static str {
        match self {
            CameraStatus::Inactive => "CAMERA OFF",
            CameraStatus::Starting => "INITIALIZING...",
            CameraStatus::Active => "TRACKING FINGER",
            CameraStatus::Failed(err) => err.user_message(),
        }
    }
}

/// Map a `KeyboardEvent.key` value to a direction
pub fn direction_for_key(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    /// Head first
    pub snake: Vec<Point>,
    pub food: Point,
    pub score: u32,
    pub high_score: u32,
    pub status: GameStatus,
    pub direction: Direction,
    pub control_mode: ControlMode,
    /// Last emitted swipe, for a transient arrow overlay
    pub detected_gesture: Option<Direction>,
    pub camera_active: bool,
    pub camera_message: &'static str,
    pub camera_error: bool,
    /// Fingertip trail in visual space, oldest first
    pub trail: Vec<[f32; 2]>,
}

/// The application context
pub struct App<C: HandTrackingCapability> {
    settings: Settings,
    state: GameState,
    classifier: GestureClassifier,
    scheduler: TickScheduler,
    high_score: HighScore,
    mailbox: DirectionMailbox,
    capability: C,
    camera: CameraStatus,
}

impl<C: HandTrackingCapability> App<C> {
    /// Build the context in the Idle state and request the camera
    pub fn new(seed: u64, settings: Settings, capability: C) -> Self {
        let mut app = Self {
            state: GameState::new(seed),
            classifier: GestureClassifier::new(settings.gesture),
            scheduler: TickScheduler::new(settings.game_speed_ms),
            high_score: HighScore::new(),
            mailbox: DirectionMailbox::new(),
            capability,
            camera: CameraStatus::Inactive,
            settings,
        };
        log::info!("App initialized with seed {}", seed);
        app.acquire_camera();
        app
    }

    // === Game lifecycle ===

    /// Start or restart a run
    pub fn start_game(&mut self, now_ms: f64) {
        sim::start_game(&mut self.state);
        // Requests aimed at the previous run must not steer the new one
        self.mailbox.clear();
        self.scheduler.arm(now_ms);
        self.acquire_camera();
    }

    /// Run everything that is due at `now_ms`
    ///
    /// Applies queued direction requests in arrival order, then ticks as
    /// many times as the schedule says. Leaving Playing cancels the
    /// schedule and releases the camera before returning.
    pub fn advance(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let requests = self.mailbox.drain();
        if self.state.is_playing() {
            for req in requests {
                let accepted = self.state.arbiter.request_direction(req.direction);
                log::trace!(
                    "{:?} request {} {}",
                    req.source,
                    req.direction.as_str(),
                    if accepted { "accepted" } else { "dropped" }
                );
            }
        }

        let mut events = Vec::new();
        let due = self.scheduler.poll(now_ms);
        for _ in 0..due {
            events.extend(sim::tick(&mut self.state, &mut self.high_score));
            if !self.state.is_playing() {
                break;
            }
        }

        if self.state.status == GameStatus::GameOver && self.scheduler.is_armed() {
            self.scheduler.cancel();
            self.release_camera();
        }
        events
    }

    /// Cancel the schedule and release the camera (page teardown)
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
        self.mailbox.clear();
        self.release_camera();
        log::info!("App shut down");
    }

    // === Input ===

    /// Arrow key press. Ignored unless a run is in progress.
    pub fn handle_key(&mut self, key: &str) -> bool {
        if !self.state.is_playing() {
            return false;
        }
        match direction_for_key(key) {
            Some(direction) => {
                self.mailbox.push(InputSource::Keyboard, direction);
                true
            }
            None => false,
        }
    }

    /// One frame of hand-landmark results from the capability
    ///
    /// Returns the swipe detected in this frame, if any. The swipe only
    /// reaches the arbiter in Camera mode.
    pub fn handle_hand_results(&mut self, results: &HandResults, now_ms: f64) -> Option<Direction> {
        if self.camera != CameraStatus::Active {
            return None;
        }
        if !matches!(self.state.status, GameStatus::Idle | GameStatus::Playing) {
            return None;
        }

        let detected = self
            .classifier
            .process_frame(results, now_ms, self.state.direction())?;
        if self.settings.control_mode == ControlMode::Camera {
            self.mailbox.push(InputSource::Gesture, detected);
        }
        Some(detected)
    }

    /// Switch input source; the camera stays up either way
    pub fn set_control_mode(&mut self, mode: ControlMode) {
        if self.settings.control_mode != mode {
            log::info!("Control mode: {:?}", mode);
        }
        self.settings.control_mode = mode;
    }

    // === Camera capability ===

    fn acquire_camera(&mut self) {
        if self.camera != CameraStatus::Inactive {
            return;
        }
        match self.capability.start() {
            Ok(()) => {
                self.camera = if self.capability.is_running() {
                    CameraStatus::Active
                } else {
                    CameraStatus::Starting
                };
                log::info!("Camera requested ({})", self.camera.message());
            }
            Err(err) => self.camera_failed(err),
        }
    }

    fn release_camera(&mut self) {
        self.capability.stop();
        self.classifier.reset();
        if !matches!(self.camera, CameraStatus::Failed(_) | CameraStatus::Inactive) {
            log::info!("Camera released");
            self.camera = CameraStatus::Inactive;
        }
    }

    /// Completion signal: asynchronous acquisition succeeded
    pub fn camera_started(&mut self) {
        match self.camera {
            CameraStatus::Starting => {
                self.camera = CameraStatus::Active;
                log::info!("Camera active");
            }
            CameraStatus::Inactive => {
                // Released while initialization was in flight
                self.capability.stop();
            }
            _ => {}
        }
    }

    /// Completion signal: asynchronous acquisition failed
    pub fn camera_failed(&mut self, err: CapabilityError) {
        log::error!("Camera error: {}", err);
        self.capability.stop();
        self.classifier.reset();
        self.camera = CameraStatus::Failed(err);
    }

    /// Explicit user retry after a failure
    pub fn retry_camera(&mut self) {
        if !matches!(self.camera, CameraStatus::Failed(_)) {
            return;
        }
        self.camera = CameraStatus::Inactive;
        if matches!(self.state.status, GameStatus::Idle | GameStatus::Playing) {
            self.acquire_camera();
        }
    }

    // === Accessors ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn high_score(&self) -> &HighScore {
        &self.high_score
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn control_mode(&self) -> ControlMode {
        self.settings.control_mode
    }

    pub fn camera_status(&self) -> &CameraStatus {
        &self.camera
    }

    pub fn capability(&self) -> &C {
        &self.capability
    }

    pub fn capability_mut(&mut self) -> &mut C {
        &mut self.capability
    }

    pub fn is_ticking(&self) -> bool {
        self.scheduler.is_armed()
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            snake: self.state.snake.iter().copied().collect(),
            food: self.state.food,
            score: self.state.score,
            high_score: self.high_score.best(),
            status: self.state.status,
            direction: self.state.direction(),
            control_mode: self.settings.control_mode,
            detected_gesture: self.classifier.last_detected(),
            camera_active: self.camera == CameraStatus::Active,
            camera_message: self.camera.message(),
            camera_error: matches!(self.camera, CameraStatus::Failed(_)),
            trail: self.classifier.trail().iter().map(|p| [p.x, p.y]).collect(),
        }
    }
}
