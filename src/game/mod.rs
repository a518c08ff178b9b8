//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! A render/input loop drives it by steering with `GameState::set_direction` and
//! stepping with `GameState::tick`, so it can run and be tested headlessly.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{CELL_SIZE, COLUMNS, GameConfig, ROWS};
pub use engine::{GameState, Status, TickResult};
pub use state::{Body, CollisionType, Position, Target};
