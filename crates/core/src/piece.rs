//! Piece controller - the single live two-cell piece
//!
//! The piece is a main cell plus a secondary cell one step away in one of
//! four relative directions. While controlled it falls continuously, moves
//! one column per edge-triggered horizontal input, and rotates the secondary
//! cell around the main one. Collision contacts arrive from outside as
//! per-direction begin/end signals and are kept as lock counts.
//!
//! Landing is one-shot: positions are rounded to the grid, both cells join
//! the grid as piece-origin cells, and further input is ignored.

use serde::Serialize;

use crate::config::BoardConfig;
use crate::grid::{CellId, Grid};
use crate::types::{CellColor, ContactPhase, Direction, InputFrame, Origin};

/// Active collision contacts per direction
///
/// A direction is blocked while its count is above zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LockTable {
    counts: [u32; 4],
}

impl LockTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock(&mut self, dir: Direction) {
        self.counts[dir.index()] += 1;
    }

    /// Release one contact; unmatched releases are ignored
    pub fn unlock(&mut self, dir: Direction) {
        let count = &mut self.counts[dir.index()];
        if *count == 0 {
            tracing::warn!(direction = dir.as_str(), "contact end without matching begin");
            return;
        }
        *count -= 1;
    }

    pub fn apply(&mut self, dir: Direction, phase: ContactPhase) {
        match phase {
            ContactPhase::Begin => self.lock(dir),
            ContactPhase::End => self.unlock(dir),
        }
    }

    pub fn count(&self, dir: Direction) -> u32 {
        self.counts[dir.index()]
    }

    pub fn is_locked(&self, dir: Direction) -> bool {
        self.count(dir) > 0
    }
}

/// A piece cell in continuous board coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PieceCell {
    pub x: f32,
    pub y: f32,
    pub color: CellColor,
}

/// The falling piece
///
/// The main cell's x is always a whole column; only y is continuous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub x: i32,
    pub y: f32,
    pub secondary: Direction,
    /// Main color first, secondary second
    pub colors: [u8; 2],
}

impl Piece {
    /// Create a piece at the spawn position with the secondary cell on top
    pub fn spawn(config: &BoardConfig, colors: [u8; 2]) -> Self {
        Self {
            x: config.spawn_x(),
            y: config.spawn_y(),
            secondary: Direction::Top,
            colors,
        }
    }

    pub fn main_cell(&self) -> PieceCell {
        PieceCell {
            x: self.x as f32,
            y: self.y,
            color: CellColor::Palette(self.colors[0]),
        }
    }

    pub fn secondary_cell(&self) -> PieceCell {
        let (dx, dy) = self.secondary.offset();
        PieceCell {
            x: (self.x + dx) as f32,
            y: self.y + dy as f32,
            color: CellColor::Palette(self.colors[1]),
        }
    }

    pub fn cells(&self) -> [PieceCell; 2] {
        [self.main_cell(), self.secondary_cell()]
    }

    /// Columns covered by the piece
    pub fn columns(&self) -> [i32; 2] {
        [self.x, self.x + self.secondary.offset().0]
    }
}

/// Owns the live piece and its input state
#[derive(Debug, Clone)]
pub struct PieceController {
    piece: Piece,
    locks: LockTable,
    /// Sign of the horizontal axis on the previous tick
    previous_horizontal: i8,
    enabled: bool,
}

impl PieceController {
    pub fn new(piece: Piece) -> Self {
        Self {
            piece,
            locks: LockTable::new(),
            previous_horizontal: 0,
            enabled: true,
        }
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn locks(&self) -> &LockTable {
        &self.locks
    }

    /// False once the piece has landed
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a collision contact beginning or ending in one direction
    pub fn apply_contact(&mut self, dir: Direction, phase: ContactPhase) {
        self.locks.apply(dir, phase);
    }

    /// Apply one tick of player input: horizontal move, rotation, then fall
    pub fn handle_input(&mut self, input: &InputFrame, config: &BoardConfig) {
        if !self.enabled {
            return;
        }

        let sign = input.horizontal_sign();
        if sign < 0 && !self.locks.is_locked(Direction::Left) {
            self.move_horizontal(-1);
        } else if sign > 0 && !self.locks.is_locked(Direction::Right) {
            self.move_horizontal(1);
        } else {
            self.previous_horizontal = 0;
        }

        if input.rotate_left {
            self.rotate_left();
        } else if input.rotate_right {
            self.rotate_right();
        }

        let fall = if input.sprinting() {
            config.sprint_fall_speed
        } else {
            config.fall_speed
        };
        self.piece.y -= fall;
    }

    /// Edge-triggered: only moves when the axis sign changed since last tick
    fn move_horizontal(&mut self, sign: i8) {
        if self.previous_horizontal == sign {
            return;
        }
        self.previous_horizontal = sign;
        self.piece.x += sign as i32;
    }

    /// Rotate the secondary cell Top → Left → Bottom → Right → Top
    ///
    /// Returns false when the destination is locked. Returning to Top is
    /// never blocked.
    pub fn rotate_left(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        let next = self.piece.secondary.rotate_left();
        self.rotate_to(next)
    }

    /// Rotate the secondary cell Top → Right → Bottom → Left → Top
    pub fn rotate_right(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        let next = self.piece.secondary.rotate_right();
        self.rotate_to(next)
    }

    fn rotate_to(&mut self, next: Direction) -> bool {
        if next != Direction::Top && self.locks.is_locked(next) {
            return false;
        }
        self.piece.secondary = next;
        true
    }

    /// Freeze the piece into the grid
    ///
    /// Only the first call has an effect; later calls return `None`.
    pub fn land(&mut self, grid: &mut Grid) -> Option<[CellId; 2]> {
        if !self.enabled {
            return None;
        }
        self.enabled = false;

        let [main, secondary] = self.piece.cells();
        let main_id = place(grid, main);
        let secondary_id = place(grid, secondary);

        // Keep the landed geometry visible through `piece()`.
        if let Some(cell) = grid.get(main_id) {
            self.piece.x = cell.x;
            self.piece.y = cell.y as f32;
        }

        Some([main_id, secondary_id])
    }
}

/// Round a piece cell onto the grid (halves away from zero) and insert it
///
/// An occupied slot should not happen; if it does the cell is stacked on the
/// first free row above.
fn place(grid: &mut Grid, cell: PieceCell) -> CellId {
    let x = cell.x.round() as i32;
    let mut y = cell.y.round() as i32;
    loop {
        match grid.insert(x, y, cell.color, Origin::Piece) {
            Ok(id) => return id,
            Err(err) => {
                tracing::warn!(%err, "landing slot occupied, stacking above");
                y += 1;
            }
        }
    }
}
