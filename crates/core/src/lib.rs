//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the board model, the resolution rules and the turn
//! state machine. It has no dependencies on rendering, physics or input
//! devices, making it:
//!
//! - **Deterministic**: Same seed (or color script) produces identical games
//! - **Testable**: Every rule runs headless with pacing switched off
//! - **Portable**: Presenters and collision backends plug in from outside
//!
//! # Module Structure
//!
//! - [`config`]: Board geometry, palette and pacing with validation
//! - [`grid`]: Cell arena with position index and column stacks
//! - [`region`]: Same-color 4-connected grouping
//! - [`clear`]: Removal of regions that span both columns, flying marks
//! - [`gravity`]: Settling flying cells onto the stack
//! - [`replenish`]: Refilling the boundary columns to full height
//! - [`piece`]: The live two-cell piece, contact locks and landing
//! - [`cycle`]: The turn state machine tying everything together
//! - [`rng`]: Color sources (seeded and scripted)
//! - [`snapshot`]: Serializable read-only views
//!
//! # Game Rules
//!
//! - **Board**: Two boundary columns at the outer x positions, a floor row at
//!   y = 0, playfield cells resting from y = 1 upward
//! - **Clears**: A same-color region touching both columns is destroyed
//! - **Gravity**: Cells above a destroyed cell fall straight down
//! - **Cascade**: Clear and gravity repeat until the board is stable
//! - **Refill**: Each column grows by one cell per round until full
//! - **Game Over**: A piece cell rests at or above the column height
//!
//! # Example
//!
//! ```
//! use connecting_squares_core::{BoardConfig, Game, Phase};
//!
//! let mut game = Game::new(BoardConfig::default().headless(), 12345).unwrap();
//! game.advance();
//! assert_eq!(game.phase(), Phase::Controlled);
//!
//! // Land the piece right where it spawned
//! game.ground();
//! game.advance();
//! assert_eq!(game.stats().turns, 1);
//! ```
//!
//! # Timing
//!
//! [`Game::tick`](cycle::Game::tick) advances one step and returns the delay a
//! presenter should wait before the next one:
//! - **Tick Rate**: 16ms while a piece is controlled
//! - **Gravity**: 400ms divided by the game speed per fallen row
//! - **Refill**: 200ms per column round

pub mod clear;
pub mod config;
pub mod cycle;
pub mod gravity;
pub mod grid;
pub mod piece;
pub mod region;
pub mod replenish;
pub mod rng;
pub mod snapshot;

pub use connecting_squares_types as types;

// Re-export commonly used types for convenience
pub use clear::{resolve_clears, ClearReport};
pub use config::{BoardConfig, ConfigError};
pub use cycle::{Game, GameEvent, Phase, Stats, Tick};
pub use grid::{Cell, CellId, Grid, GridError};
pub use piece::{LockTable, Piece, PieceCell, PieceController};
pub use region::{find_regions, Region};
pub use rng::{ColorSource, ScriptedColors, SeededColors};
pub use snapshot::{CellSnapshot, GameSnapshot, PieceSnapshot};
