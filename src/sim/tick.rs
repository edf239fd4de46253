//! Fixed-period simulation tick
//!
//! Core game loop step. Advances the snake one cell per call.

use super::grid::{Direction, check_collision, next_head_position};
use super::state::{GameEvent, GameState, GameStatus, initial_snake};
use crate::consts::FOOD_SCORE;
use crate::highscores::HighScore;

/// Reset the run and begin playing (also used for restart from GameOver)
pub fn start_game(state: &mut GameState) {
    state.snake = initial_snake();
    state.arbiter.reset(Direction::Up);
    state.respawn_food();
    state.score = 0;
    state.time_ticks = 0;
    state.status = GameStatus::Playing;
    log::info!("Game started (food at {},{})", state.food.x, state.food.y);
}

/// Advance the game state by one tick
///
/// Does nothing unless the game is playing. A colliding tick only flips the
/// status; snake and food stay as they were.
pub fn tick(state: &mut GameState, high_score: &mut HighScore) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.status != GameStatus::Playing {
        return events;
    }

    state.time_ticks += 1;

    let direction = state.arbiter.commit();
    let new_head = next_head_position(state.head(), direction);

    if check_collision(new_head, &state.snake) {
        state.status = GameStatus::GameOver;
        let new_best = high_score.record(state.score);
        log::info!(
            "Game over after {} ticks: score {} (best {}{})",
            state.time_ticks,
            state.score,
            high_score.best(),
            if new_best { ", new record" } else { "" }
        );
        events.push(GameEvent::GameOver { score: state.score });
        return events;
    }

    state.snake.push_front(new_head);

    if new_head == state.food {
        // Tail stays: net growth of one segment
        state.score += FOOD_SCORE;
        state.respawn_food();
        log::debug!(
            "Food eaten at {},{} (score {}, length {})",
            new_head.x,
            new_head.y,
            state.score,
            state.snake.len()
        );
        events.push(GameEvent::FoodEaten {
            at: new_head,
            score: state.score,
        });
    } else {
        state.snake.pop_back();
    }

    events
}
