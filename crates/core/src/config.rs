//! Board configuration and startup validation.
//!
//! Configuration is read once before the first tick. Anything non-positive or
//! geometrically impossible is a fatal [`ConfigError`]; nothing else in the
//! simulation is treated as fatal.

use std::time::Duration;

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::types::{
    COLUMN_REFILL_MS, DEFAULT_COLUMN_HEIGHT, DEFAULT_FALL_SPEED, DEFAULT_GAME_SPEED,
    DEFAULT_LEFT_COLUMN_X, DEFAULT_PALETTE_SIZE, DEFAULT_RIGHT_COLUMN_X,
    DEFAULT_SPRINT_FALL_SPEED, GRAVITY_STEP_MS, MAX_PALETTE_SIZE,
};

/// Fatal configuration problems, detected before any simulation tick.
#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum ConfigError {
    #[display("column height must be positive, got {height}")]
    NonPositiveHeight { height: i32 },
    #[display("palette size must be within 1..=250, got {size}")]
    PaletteSize { size: i32 },
    #[display("boundary columns leave no interior column (left x = {left}, right x = {right})")]
    BoundariesCrossed { left: i32, right: i32 },
    #[display("game speed must be positive")]
    ZeroGameSpeed,
    #[display("fall speed {speed} is outside (0, 0.5) rows per tick")]
    FallSpeed { speed: f32 },
}

/// Static board and pacing configuration.
///
/// Every field has a default, so a partial JSON document only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub left_column_x: i32,
    pub right_column_x: i32,
    /// Column height H; also the game over threshold.
    pub column_height: i32,
    pub palette_size: i32,
    pub game_speed: u32,
    pub fall_speed: f32,
    pub sprint_fall_speed: f32,
    pub gravity_step_ms: u32,
    pub column_refill_ms: u32,
    pub ceiling: bool,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            left_column_x: DEFAULT_LEFT_COLUMN_X,
            right_column_x: DEFAULT_RIGHT_COLUMN_X,
            column_height: DEFAULT_COLUMN_HEIGHT,
            palette_size: DEFAULT_PALETTE_SIZE,
            game_speed: DEFAULT_GAME_SPEED,
            fall_speed: DEFAULT_FALL_SPEED,
            sprint_fall_speed: DEFAULT_SPRINT_FALL_SPEED,
            gravity_step_ms: GRAVITY_STEP_MS,
            column_refill_ms: COLUMN_REFILL_MS,
            ceiling: true,
        }
    }
}

impl BoardConfig {
    /// Same board with every pacing delay collapsed to zero.
    pub fn headless(mut self) -> Self {
        self.gravity_step_ms = 0;
        self.column_refill_ms = 0;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.column_height <= 0 {
            return Err(ConfigError::NonPositiveHeight {
                height: self.column_height,
            });
        }
        if self.palette_size <= 0 || self.palette_size > MAX_PALETTE_SIZE {
            return Err(ConfigError::PaletteSize {
                size: self.palette_size,
            });
        }
        if self.right_column_x <= self.left_column_x + 1 {
            return Err(ConfigError::BoundariesCrossed {
                left: self.left_column_x,
                right: self.right_column_x,
            });
        }
        if self.game_speed == 0 {
            return Err(ConfigError::ZeroGameSpeed);
        }
        for speed in [self.fall_speed, self.sprint_fall_speed] {
            if !(speed > 0.0 && speed < 0.5) {
                return Err(ConfigError::FallSpeed { speed });
            }
        }
        Ok(())
    }

    /// Palette size as the color sources consume it. Only meaningful after
    /// [`validate`](Self::validate) succeeded.
    pub fn palette(&self) -> u8 {
        self.palette_size.clamp(1, MAX_PALETTE_SIZE) as u8
    }

    /// Horizontally centered spawn column, rounding halves away from zero.
    pub fn spawn_x(&self) -> i32 {
        let mid = (self.left_column_x + self.right_column_x) as f64 / 2.0;
        mid.round() as i32
    }

    /// Spawn height of the main cell, half a row above the column tops.
    pub fn spawn_y(&self) -> f32 {
        self.column_height as f32 + 0.5
    }

    /// Interior columns a piece can occupy.
    pub fn interior(&self) -> std::ops::RangeInclusive<i32> {
        (self.left_column_x + 1)..=(self.right_column_x - 1)
    }

    pub fn gravity_delay(&self) -> Duration {
        Duration::from_millis((self.gravity_step_ms / self.game_speed.max(1)) as u64)
    }

    pub fn refill_delay(&self) -> Duration {
        Duration::from_millis(self.column_refill_ms as u64)
    }
}
