//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no clocks
//! - Seeded RNG only
//! - No rendering, camera or platform dependencies

pub mod arbiter;
pub mod grid;
pub mod state;
pub mod tick;

pub use arbiter::DirectionArbiter;
pub use grid::{
    Direction, Point, check_collision, is_opposite_direction, next_head_position, random_food_cell,
};
pub use state::{GameEvent, GameState, GameStatus};
pub use tick::{start_game, tick};
