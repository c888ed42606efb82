use serde::Serialize;

use crate::cycle::{Game, Phase, Stats};
use crate::piece::PieceCell;
use crate::rng::ColorSource;
use crate::types::{CellColor, Direction, Origin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellSnapshot {
    pub x: i32,
    pub y: i32,
    pub color: CellColor,
    pub origin: Origin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceSnapshot {
    pub main: PieceCell,
    pub secondary: PieceCell,
    pub orientation: Direction,
}

/// Read-only view of a game for presenters and tooling
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub phase: Phase,
    pub turn: u32,
    /// Grid cells in id order, followed by the decorative ceiling
    pub cells: Vec<CellSnapshot>,
    pub piece: Option<PieceSnapshot>,
    pub next_colors: [u8; 2],
    pub column_heights: [usize; 2],
    pub stats: Stats,
    pub game_over: bool,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.phase = Phase::Spawning;
        self.turn = 0;
        self.cells.clear();
        self.piece = None;
        self.next_colors = [0, 0];
        self.column_heights = [0, 0];
        self.stats = Stats::default();
        self.game_over = false;
    }

    pub fn playable(&self) -> bool {
        !self.game_over && self.phase != Phase::Exited
    }

    /// Cell at a grid position, ignoring the ceiling
    pub fn cell_at(&self, x: i32, y: i32) -> Option<&CellSnapshot> {
        self.cells
            .iter()
            .find(|c| c.x == x && c.y == y && c.origin != Origin::Ceiling)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            phase: Phase::Spawning,
            turn: 0,
            cells: Vec::new(),
            piece: None,
            next_colors: [0, 0],
            column_heights: [0, 0],
            stats: Stats::default(),
            game_over: false,
        }
    }
}

impl<C: ColorSource> Game<C> {
    pub fn snapshot(&self) -> GameSnapshot {
        let mut out = GameSnapshot::default();
        self.snapshot_into(&mut out);
        out
    }

    /// Fill `out` in place, reusing its cell buffer
    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.clear();
        out.phase = self.phase();
        out.turn = self.turn();
        out.cells.extend(self.grid().cells().map(|cell| CellSnapshot {
            x: cell.x,
            y: cell.y,
            color: cell.color,
            origin: cell.origin,
        }));
        out.cells.extend_from_slice(self.ceiling());
        out.piece = self.piece().map(|piece| PieceSnapshot {
            main: piece.main_cell(),
            secondary: piece.secondary_cell(),
            orientation: piece.secondary,
        });
        out.next_colors = self.next_colors();
        out.column_heights = [
            self.grid().column_height(crate::types::Side::Left),
            self.grid().column_height(crate::types::Side::Right),
        ];
        out.stats = self.stats();
        out.game_over = self.phase() == Phase::GameOver;
    }
}
