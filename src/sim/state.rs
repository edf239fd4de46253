//! Game state and core simulation types
//!
//! Everything the tick function reads or writes lives here.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arbiter::DirectionArbiter;
use super::grid::{Direction, Point, random_food_cell};
use crate::consts::INITIAL_SNAKE;

/// Lifecycle of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameStatus {
    /// Waiting for the first start
    #[default]
    Idle,
    /// Ticking
    Playing,
    /// Collided, waiting for restart
    GameOver,
}

/// Something a tick did that the shell may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Head landed on food; `score` is the new total
    FoodEaten { at: Point, score: u32 },
    /// Head hit a wall or the body
    GameOver { score: u32 },
}

/// Complete simulation state (deterministic for a given seed and input)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Food placement stream
    rng: Pcg32,
    pub status: GameStatus,
    /// Head first
    pub snake: VecDeque<Point>,
    pub food: Point,
    pub arbiter: DirectionArbiter,
    pub score: u32,
    /// Ticks advanced since the last start
    pub time_ticks: u64,
}

impl GameState {
    /// Idle state with the canonical snake in place
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let food = random_food_cell(&mut rng);
        Self {
            seed,
            rng,
            status: GameStatus::Idle,
            snake: initial_snake(),
            food,
            arbiter: DirectionArbiter::new(Direction::Up),
            score: 0,
            time_ticks: 0,
        }
    }

    pub fn head(&self) -> Point {
        // snake is never empty; the fallback only guards a corrupted state
        self.snake.front().copied().unwrap_or(Point::new(
            INITIAL_SNAKE[0].0,
            INITIAL_SNAKE[0].1,
        ))
    }

    /// Committed heading
    pub fn direction(&self) -> Direction {
        self.arbiter.current()
    }

    pub fn is_playing(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// Draw the next food cell from the run's stream
    pub(crate) fn respawn_food(&mut self) {
        self.food = random_food_cell(&mut self.rng);
    }
}

/// The canonical vertical starting line, head first
pub fn initial_snake() -> VecDeque<Point> {
    INITIAL_SNAKE.iter().copied().map(Point::from).collect()
}
