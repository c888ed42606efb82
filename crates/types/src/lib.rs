//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no game logic, making them usable in any
//! context (core simulation, headless engine, snapshots).
//!
//! # Board Geometry
//!
//! The arena is bounded by two side columns of stacked cells:
//!
//! - **Left column**: x = 0
//! - **Right column**: x = 6
//! - **Column height**: 15 cells, stacked from y = 1 upwards
//! - **Floor**: y = 0, spanning both columns
//! - **Ceiling**: decorative, one row above the column tops
//!
//! The y axis grows upwards. A piece spawns above the arena at the
//! horizontally centered column and falls towards the floor.
//!
//! # Pacing Constants
//!
//! Timing values are in milliseconds and only affect presentation; a headless
//! run may collapse every delay to zero without changing the final board.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Frame interval while a piece is controlled (~60 FPS) |
//! | `GRAVITY_STEP_MS` | 400 | Delay per gravity row, divided by the game speed |
//! | `COLUMN_REFILL_MS` | 200 | Delay between column refill rounds |
//!
//! # Examples
//!
//! ```
//! use connecting_squares_types::{Direction, Origin, DEFAULT_COLUMN_HEIGHT};
//!
//! // Left rotation walks the secondary cell around the main cell
//! assert_eq!(Direction::Top.rotate_left(), Direction::Left);
//! assert_eq!(Direction::Top.rotate_right(), Direction::Right);
//!
//! // Column cells take part in grouping, the floor never does
//! assert!(Origin::LeftColumn.is_playfield());
//! assert!(!Origin::Floor.is_playfield());
//!
//! assert_eq!(DEFAULT_COLUMN_HEIGHT, 15);
//! ```

use serde::{Deserialize, Serialize};

/// Default x coordinate of the left boundary column
pub const DEFAULT_LEFT_COLUMN_X: i32 = 0;

/// Default x coordinate of the right boundary column
pub const DEFAULT_RIGHT_COLUMN_X: i32 = 6;

/// Default number of cells stacked in each boundary column (H)
pub const DEFAULT_COLUMN_HEIGHT: i32 = 15;

/// Default number of playable colors
pub const DEFAULT_PALETTE_SIZE: i32 = 4;

/// Largest palette the color encoding supports
pub const MAX_PALETTE_SIZE: i32 = 250;

/// Default game speed; divides the gravity pacing delay
pub const DEFAULT_GAME_SPEED: u32 = 5;

/// Rows per tick a controlled piece falls
pub const DEFAULT_FALL_SPEED: f32 = 0.02;

/// Rows per tick a controlled piece falls while the vertical axis is held down
pub const DEFAULT_SPRINT_FALL_SPEED: f32 = 0.04;

/// Frame interval in milliseconds while a piece is controlled (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Base delay between gravity rows (divided by the game speed)
pub const GRAVITY_STEP_MS: u32 = 400;

/// Delay between column refill rounds
pub const COLUMN_REFILL_MS: u32 = 200;

/// Lowest row a cell can rest on; the floor occupies y = 0.
pub const RESTING_FLOOR_Y: i32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_board_layout() {
        assert_eq!(DEFAULT_LEFT_COLUMN_X, 0);
        assert_eq!(DEFAULT_RIGHT_COLUMN_X, 6);
        assert_eq!(DEFAULT_COLUMN_HEIGHT, 15);
        assert_eq!(DEFAULT_PALETTE_SIZE, 4);
    }

    #[test]
    fn rotation_cycles_are_inverse() {
        for dir in Direction::ALL {
            assert_eq!(dir.rotate_left().rotate_right(), dir);
            assert_eq!(dir.rotate_right().rotate_left(), dir);
        }
    }

    #[test]
    fn direction_offsets_are_unit_steps() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            assert_eq!(dx.abs() + dy.abs(), 1);
            assert_eq!(dir.rotate_left().rotate_left().offset(), (-dx, -dy));
        }
    }

    #[test]
    fn input_frame_signs() {
        let frame = InputFrame {
            horizontal: -0.3,
            ..InputFrame::default()
        };
        assert_eq!(frame.horizontal_sign(), -1);
        assert_eq!(InputFrame::default().horizontal_sign(), 0);
        assert!(!InputFrame::default().sprinting());
    }
}

/// Where a cell came from
///
/// - **LeftColumn / RightColumn**: stacked boundary cells; a region clears
///   only when it holds at least one of each
/// - **Piece**: a landed piece cell, kept for future grouping
/// - **Floor / Ceiling**: static decoration, never grouped or cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Origin {
    LeftColumn,
    RightColumn,
    Piece,
    Floor,
    Ceiling,
}

impl Origin {
    /// Cells that take part in grouping, clearing and gravity
    pub fn is_playfield(&self) -> bool {
        matches!(
            self,
            Origin::LeftColumn | Origin::RightColumn | Origin::Piece
        )
    }

    /// The boundary column this origin belongs to, if any
    pub fn side(&self) -> Option<Side> {
        match self {
            Origin::LeftColumn => Some(Side::Left),
            Origin::RightColumn => Some(Side::Right),
            _ => None,
        }
    }
}

/// One of the two boundary columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Origin tag given to cells stacked in this column
    pub fn origin(&self) -> Origin {
        match self {
            Side::Left => Origin::LeftColumn,
            Side::Right => Origin::RightColumn,
        }
    }
}

/// Color of a cell
///
/// Playable cells carry an index into the configured palette. Floor and
/// ceiling decoration use two reserved colors outside the palette, so they can
/// never join a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellColor {
    Palette(u8),
    Floor,
    Ceiling,
}

impl CellColor {
    /// Palette index, or `None` for reserved colors
    pub fn palette_index(&self) -> Option<u8> {
        match self {
            CellColor::Palette(index) => Some(*index),
            CellColor::Floor | CellColor::Ceiling => None,
        }
    }

    /// Build a playable color, clamping indices outside the palette
    ///
    /// # Examples
    ///
    /// ```
    /// use connecting_squares_types::CellColor;
    ///
    /// assert_eq!(CellColor::clamped(2, 4), CellColor::Palette(2));
    /// assert_eq!(CellColor::clamped(9, 4), CellColor::Palette(3));
    /// ```
    pub fn clamped(index: u8, palette_size: u8) -> Self {
        CellColor::Palette(Self::clamp_index(index, palette_size))
    }

    /// Clamp a palette index to the last color of the palette
    pub fn clamp_index(index: u8, palette_size: u8) -> u8 {
        index.min(palette_size.saturating_sub(1))
    }
}

/// Position of the secondary piece cell relative to the main cell, and the
/// direction of a collision contact.
///
/// Left rotation cycles Top → Left → Bottom → Right → Top; right rotation
/// walks the same cycle backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Top,
    Left,
    Bottom,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Top,
        Direction::Left,
        Direction::Bottom,
        Direction::Right,
    ];

    /// Next position under a left (counter-clockwise) rotation
    ///
    /// # Examples
    ///
    /// ```
    /// use connecting_squares_types::Direction;
    ///
    /// assert_eq!(Direction::Top.rotate_left(), Direction::Left);
    /// assert_eq!(Direction::Left.rotate_left(), Direction::Bottom);
    /// assert_eq!(Direction::Bottom.rotate_left(), Direction::Right);
    /// assert_eq!(Direction::Right.rotate_left(), Direction::Top);
    /// ```
    pub fn rotate_left(&self) -> Self {
        match self {
            Direction::Top => Direction::Left,
            Direction::Left => Direction::Bottom,
            Direction::Bottom => Direction::Right,
            Direction::Right => Direction::Top,
        }
    }

    /// Next position under a right (clockwise) rotation
    ///
    /// # Examples
    ///
    /// ```
    /// use connecting_squares_types::Direction;
    ///
    /// assert_eq!(Direction::Top.rotate_right(), Direction::Right);
    /// assert_eq!(Direction::Right.rotate_right(), Direction::Bottom);
    /// assert_eq!(Direction::Bottom.rotate_right(), Direction::Left);
    /// assert_eq!(Direction::Left.rotate_right(), Direction::Top);
    /// ```
    pub fn rotate_right(&self) -> Self {
        match self {
            Direction::Top => Direction::Right,
            Direction::Right => Direction::Bottom,
            Direction::Bottom => Direction::Left,
            Direction::Left => Direction::Top,
        }
    }

    /// Unit grid step (dx, dy) with y growing upwards
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Top => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Bottom => (0, -1),
            Direction::Right => (1, 0),
        }
    }

    /// Stable slot for per-direction tables
    pub fn index(&self) -> usize {
        match self {
            Direction::Top => 0,
            Direction::Left => 1,
            Direction::Bottom => 2,
            Direction::Right => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Top => "top",
            Direction::Left => "left",
            Direction::Bottom => "bottom",
            Direction::Right => "right",
        }
    }
}

/// Collision contact edge delivered by the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactPhase {
    Begin,
    End,
}

/// Why the scene was left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExitReason {
    /// A landed stack reached the column height
    GameOver,
    /// The player asked to quit
    Quit,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::GameOver => "gameOver",
            ExitReason::Quit => "quit",
        }
    }
}

/// Per-tick input sampled from the player (or an autopilot)
///
/// Axis values follow joystick conventions: negative horizontal is left,
/// negative vertical is down. Rotation and quit are one-shot button presses
/// for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputFrame {
    pub horizontal: f32,
    pub vertical: f32,
    pub rotate_left: bool,
    pub rotate_right: bool,
    pub quit: bool,
}

impl InputFrame {
    /// Sign of the horizontal axis (-1, 0 or 1)
    pub fn horizontal_sign(&self) -> i8 {
        if self.horizontal < 0.0 {
            -1
        } else if self.horizontal > 0.0 {
            1
        } else {
            0
        }
    }

    /// Whether the fast fall speed applies this tick
    pub fn sprinting(&self) -> bool {
        self.vertical < 0.0
    }
}
