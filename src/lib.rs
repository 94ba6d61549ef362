//! Terminal snake.
//!
//! The game rules live in [`game`], [`snake`] and [`food`] and know nothing
//! about the terminal; [`app`] drives them with crossterm input and output.

pub mod app;
pub mod config;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod highscore;
pub mod input;
pub mod render;
pub mod snake;
pub mod term;

pub use error::{Error, Result};
pub use game::{GameOverReason, GameState, Phase, TickResult};
pub use grid::{Direction, PlayArea, Position};
