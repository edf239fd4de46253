//! Hand-gesture input
//!
//! Frames from the (external) landmark model come in as [`HandResults`];
//! the [`GestureClassifier`] reduces the index-fingertip track to
//! four-way swipe directions.

pub mod classifier;
pub mod history;
pub mod landmarks;

pub use classifier::{GestureClassifier, classify_displacement, to_visual};
pub use history::{GestureHistory, GestureSample};
pub use landmarks::{HandResults, Landmark};
