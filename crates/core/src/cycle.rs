//! Cycle coordinator - the turn state machine
//!
//! A turn runs Spawning → Controlled → Locked → Resolving → Refilling and
//! then either spawns the next piece or ends the game. Every call to
//! [`Game::tick`] advances exactly one simulation step and reports how long
//! a presenter should wait before the next one; the waiting itself is left
//! to the scheduler, so headless callers may ignore it.
//!
//! The grid has a single writer at any time: the piece controller while a
//! piece is controlled, the coordinator from landing until the next spawn.

use std::collections::VecDeque;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clear::resolve_clears;
use crate::config::{BoardConfig, ConfigError};
use crate::gravity;
use crate::grid::{CellId, Grid};
use crate::piece::{Piece, PieceController};
use crate::replenish::{refill_all, refill_round};
use crate::rng::{ColorSource, SeededColors};
use crate::snapshot::CellSnapshot;
use crate::types::{CellColor, ContactPhase, Direction, ExitReason, InputFrame, Origin};

/// Where the turn currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Spawning,
    Controlled,
    Locked,
    Resolving,
    Refilling,
    GameOver,
    /// Left through an explicit quit
    Exited,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Exited)
    }

    /// Phases the coordinator advances on its own, without player input
    pub fn is_automatic(&self) -> bool {
        matches!(
            self,
            Phase::Spawning | Phase::Locked | Phase::Resolving | Phase::Refilling
        )
    }
}

/// Undrained events kept before the oldest are dropped
pub const MAX_PENDING_EVENTS: usize = 1024;

/// Notifications for collaborators, drained with [`Game::take_events`]
///
/// Callers that drive a [`Game`] directly should drain after each step; past
/// [`MAX_PENDING_EVENTS`] the oldest entries are discarded.
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PieceSpawned { turn: u32, colors: [u8; 2] },
    PieceLanded { cells: [CellId; 2] },
    Cleared { regions: usize, cells: usize },
    TurnEnded { turn: u32 },
    /// Emitted exactly once, on game over or quit
    Exit(ExitReason),
}

/// Result of one simulation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// More automatic steps follow without waiting for input
    pub pending: bool,
    /// Presentation pacing before the next step
    pub delay: Duration,
}

impl Tick {
    fn idle() -> Self {
        Self {
            pending: false,
            delay: Duration::ZERO,
        }
    }

    fn next(delay: Duration) -> Self {
        Self {
            pending: true,
            delay,
        }
    }
}

/// Running totals for the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub turns: u32,
    pub regions_cleared: u32,
    pub cells_cleared: u32,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Game<C = SeededColors> {
    config: BoardConfig,
    grid: Grid,
    colors: C,
    controller: Option<PieceController>,
    next_colors: [u8; 2],
    ceiling: Vec<CellSnapshot>,
    phase: Phase,
    /// Cells currently stepping towards their gravity target
    falling: Vec<CellId>,
    events: VecDeque<GameEvent>,
    quit_requested: bool,
    /// Monotonic id of the current (or last) piece
    turn: u32,
    stats: Stats,
}

impl Game<SeededColors> {
    /// Create a new game with the given color seed
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::with_colors(config, SeededColors::new(seed))
    }
}

impl<C: ColorSource> Game<C> {
    /// Build the board: floor, ceiling, full columns and the first preview
    pub fn with_colors(config: BoardConfig, mut colors: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut grid = Grid::new();
        for x in config.left_column_x..=config.right_column_x {
            if let Err(err) = grid.insert(x, 0, CellColor::Floor, Origin::Floor) {
                tracing::warn!(%err, "floor cell skipped");
            }
        }
        refill_all(&mut grid, &config, &mut colors);

        let mut game = Self::assemble(config, grid, colors, Phase::Spawning);
        game.next_colors = game.roll_pair();
        tracing::info!(
            height = game.config.column_height,
            palette = game.config.palette_size,
            "board ready"
        );
        Ok(game)
    }

    /// Take over an existing board as if a piece had just landed
    ///
    /// The next tick starts resolving. Useful for replaying positions and for
    /// tests that craft a board by hand.
    pub fn resolving(config: BoardConfig, grid: Grid, colors: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut game = Self::assemble(config, grid, colors, Phase::Locked);
        game.next_colors = game.roll_pair();
        Ok(game)
    }

    fn assemble(config: BoardConfig, grid: Grid, colors: C, phase: Phase) -> Self {
        let ceiling = if config.ceiling {
            config
                .interior()
                .map(|x| CellSnapshot {
                    x,
                    y: config.column_height + 1,
                    color: CellColor::Ceiling,
                    origin: Origin::Ceiling,
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            config,
            grid,
            colors,
            controller: None,
            next_colors: [0, 0],
            ceiling,
            phase,
            falling: Vec::new(),
            events: VecDeque::new(),
            quit_requested: false,
            turn: 0,
            stats: Stats::default(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_over(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn controller(&self) -> Option<&PieceController> {
        self.controller.as_ref()
    }

    /// The live piece, while one is controlled
    pub fn piece(&self) -> Option<&Piece> {
        self.controller.as_ref().map(|c| c.piece())
    }

    /// Colors of the live piece (main, secondary)
    pub fn piece_colors(&self) -> Option<[u8; 2]> {
        self.piece().map(|p| p.colors)
    }

    /// Colors of the piece that spawns next (main, secondary)
    pub fn next_colors(&self) -> [u8; 2] {
        self.next_colors
    }

    /// Decorative ceiling, outside the grid
    pub fn ceiling(&self) -> &[CellSnapshot] {
        &self.ceiling
    }

    pub fn colors(&self) -> &C {
        &self.colors
    }

    /// Take all notifications emitted since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    fn push_event(&mut self, event: GameEvent) {
        if self.events.len() >= MAX_PENDING_EVENTS {
            if let Some(dropped) = self.events.pop_front() {
                tracing::trace!(?dropped, "event queue full, dropping oldest");
            }
        }
        self.events.push_back(event);
    }

    /// Advance one simulation step
    pub fn tick(&mut self, input: &InputFrame) -> Tick {
        if input.quit && self.phase.is_automatic() {
            // Resolution is never cancelled; the quit lands at the next spawn.
            self.quit_requested = true;
        }

        match self.phase {
            Phase::Spawning => self.spawn_or_end(),
            Phase::Controlled => {
                if input.quit {
                    self.exit(ExitReason::Quit);
                    return Tick::idle();
                }
                if let Some(controller) = self.controller.as_mut() {
                    controller.handle_input(input, &self.config);
                }
                Tick::idle()
            }
            Phase::Locked => {
                self.phase = Phase::Resolving;
                Tick::next(Duration::ZERO)
            }
            Phase::Resolving => self.resolve_step(),
            Phase::Refilling => self.refill_step(),
            Phase::GameOver | Phase::Exited => Tick::idle(),
        }
    }

    /// Run every automatic step until input is needed or the game ended
    ///
    /// Pacing delays are ignored. Returns the number of steps taken.
    pub fn advance(&mut self) -> usize {
        let mut steps = 0;
        while self.phase.is_automatic() {
            self.tick(&InputFrame::default());
            steps += 1;
        }
        steps
    }

    /// Request a quit outside of the input stream
    pub fn request_quit(&mut self) {
        match self.phase {
            Phase::Controlled => self.exit(ExitReason::Quit),
            phase if phase.is_automatic() => self.quit_requested = true,
            _ => {}
        }
    }

    /// Deliver a collision contact for the live piece
    ///
    /// A contact beginning below the piece grounds it. Returns true when this
    /// call landed the piece.
    pub fn contact(&mut self, dir: Direction, phase: ContactPhase) -> bool {
        if self.phase != Phase::Controlled {
            return false;
        }
        let Some(controller) = self.controller.as_mut() else {
            return false;
        };
        controller.apply_contact(dir, phase);

        if dir == Direction::Bottom && phase == ContactPhase::Begin {
            return self.ground();
        }
        false
    }

    /// Land the live piece now
    ///
    /// Only the first call per piece has an effect.
    pub fn ground(&mut self) -> bool {
        if self.phase != Phase::Controlled {
            return false;
        }
        let Some(mut controller) = self.controller.take() else {
            return false;
        };
        let Some(cells) = controller.land(&mut self.grid) else {
            return false;
        };

        tracing::debug!(turn = self.turn, "piece landed");
        self.push_event(GameEvent::PieceLanded { cells });
        self.phase = Phase::Locked;
        true
    }

    fn spawn_or_end(&mut self) -> Tick {
        let height = self.config.column_height;
        if let Some(top) = self.grid.highest_piece_y().filter(|y| *y >= height) {
            tracing::info!(top, height, turns = self.stats.turns, "stack reached the top");
            self.exit(ExitReason::GameOver);
            return Tick::idle();
        }
        if self.quit_requested {
            self.exit(ExitReason::Quit);
            return Tick::idle();
        }

        let colors = self.next_colors;
        self.next_colors = self.roll_pair();
        self.controller = Some(PieceController::new(Piece::spawn(&self.config, colors)));
        self.turn = self.turn.wrapping_add(1);
        self.phase = Phase::Controlled;
        self.push_event(GameEvent::PieceSpawned {
            turn: self.turn,
            colors,
        });
        Tick::idle()
    }

    fn resolve_step(&mut self) -> Tick {
        if !self.falling.is_empty() {
            if gravity::step(&mut self.grid, &self.falling) {
                return Tick::next(self.config.gravity_delay());
            }
            // Settled; the next step looks for new clears.
            self.falling.clear();
            return Tick::next(Duration::ZERO);
        }

        let report = resolve_clears(&mut self.grid);
        if !report.is_empty() {
            self.stats.regions_cleared += report.regions as u32;
            self.stats.cells_cleared += report.destroyed.len() as u32;
            self.push_event(GameEvent::Cleared {
                regions: report.regions,
                cells: report.destroyed.len(),
            });
        }

        let falling = gravity::plan(&mut self.grid);
        if falling.is_empty() {
            self.phase = Phase::Refilling;
            return Tick::next(Duration::ZERO);
        }
        self.falling = falling;
        Tick::next(self.config.gravity_delay())
    }

    fn refill_step(&mut self) -> Tick {
        let inserted = refill_round(&mut self.grid, &self.config, &mut self.colors);
        if !inserted.is_empty() {
            return Tick::next(self.config.refill_delay());
        }

        self.stats.turns += 1;
        tracing::info!(
            turn = self.turn,
            cleared = self.stats.cells_cleared,
            "turn complete"
        );
        self.push_event(GameEvent::TurnEnded { turn: self.turn });
        self.phase = Phase::Spawning;
        Tick::next(Duration::ZERO)
    }

    fn exit(&mut self, reason: ExitReason) {
        if self.phase.is_terminal() {
            return;
        }
        self.controller = None;
        self.falling.clear();
        self.phase = match reason {
            ExitReason::GameOver => Phase::GameOver,
            ExitReason::Quit => Phase::Exited,
        };
        tracing::info!(reason = reason.as_str(), turns = self.stats.turns, "leaving game");
        self.push_event(GameEvent::Exit(reason));
    }

    /// Draw a new piece color pair, main first
    fn roll_pair(&mut self) -> [u8; 2] {
        let palette = self.config.palette();
        let main = self.colors.next_color(palette);
        let secondary = self.colors.next_color(palette);
        [
            CellColor::clamp_index(main, palette),
            CellColor::clamp_index(secondary, palette),
        ]
    }
}
