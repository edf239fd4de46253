//! Grid geometry and movement rules
//!
//! Pure functions only: head stepping, wall/self collision, reversal check
//! and food cell sampling. No state lives here.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::GRID_SIZE;

/// A grid cell coordinate
///
/// Signed so that a head stepping off the board is representable;
/// on-board cells satisfy `0 <= x, y < GRID_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Whether the cell lies on the board
    #[inline]
    pub fn in_bounds(&self) -> bool {
        (0..GRID_SIZE).contains(&self.x) && (0..GRID_SIZE).contains(&self.y)
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Heading of the snake (screen orientation: y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The axis-opposite heading
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Unit step on the grid
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }

    /// Arrow glyph for transient UI feedback
    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Left => "←",
            Direction::Right => "→",
        }
    }
}

/// Head position after one step in `direction` (no wraparound)
#[inline]
pub fn next_head_position(head: Point, direction: Direction) -> Point {
    let (dx, dy) = direction.offset();
    Point::new(head.x + dx, head.y + dy)
}

/// Check whether moving the head to `new_head` ends the game
///
/// Walls are the board edges. The current tail is ignored for self
/// collision since it vacates the cell on this same tick.
pub fn check_collision(new_head: Point, snake: &VecDeque<Point>) -> bool {
    if !new_head.in_bounds() {
        return true;
    }

    let body_len = snake.len().saturating_sub(1);
    snake.iter().take(body_len).any(|&segment| segment == new_head)
}

/// True exactly for Up/Down and Left/Right pairs (either order)
#[inline]
pub fn is_opposite_direction(a: Direction, b: Direction) -> bool {
    a.opposite() == b
}

/// Uniformly random board cell
///
/// Occupancy is not checked, so food can land under the snake body.
pub fn random_food_cell<R: Rng + ?Sized>(rng: &mut R) -> Point {
    Point::new(rng.random_range(0..GRID_SIZE), rng.random_range(0..GRID_SIZE))
}
