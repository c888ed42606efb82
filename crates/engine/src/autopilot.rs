//! Autopilot - a simple scripted player
//!
//! On every new piece the autopilot scores each landing column with the
//! secondary cell either on top or to the right, then drives the piece there
//! with the same per-tick input a player would produce: rotation presses,
//! horizontal pulses released between steps (movement is edge-triggered),
//! and a held fast fall once aligned.

use connecting_squares_core::region::neighbors;
use connecting_squares_core::Grid;

use crate::observe::Observation;
use crate::session::InputSource;
use crate::types::{Direction, InputFrame};

/// Chosen landing spot for one piece
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub orientation: Direction,
    /// Row the main cell will rest on
    pub landing_y: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Default)]
pub struct Autopilot {
    turn: Option<u32>,
    target: Option<Placement>,
    last_horizontal: i8,
    /// Remaining presses before giving up on a blocked move
    budget: u32,
}

impl Autopilot {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for Autopilot {
    fn poll(&mut self, obs: &Observation<'_>) -> InputFrame {
        let mut frame = InputFrame::default();
        let Some(piece) = obs.piece.filter(|_| obs.controlled()) else {
            self.turn = None;
            self.last_horizontal = 0;
            return frame;
        };

        if self.turn != Some(obs.turn) {
            self.turn = Some(obs.turn);
            self.target = plan_placement(obs, piece.colors);
            self.last_horizontal = 0;
            self.budget = (obs.config.right_column_x - obs.config.left_column_x) as u32 * 2 + 4;
            if let Some(target) = self.target {
                tracing::debug!(
                    turn = obs.turn,
                    x = target.x,
                    orientation = target.orientation.as_str(),
                    score = target.score,
                    "autopilot target"
                );
            }
        }

        let Some(target) = self.target else {
            frame.vertical = -1.0;
            return frame;
        };

        if self.budget > 0 && piece.secondary != target.orientation {
            self.budget -= 1;
            if piece.secondary == Direction::Right {
                frame.rotate_left = true;
            } else {
                frame.rotate_right = true;
            }
            return frame;
        }

        if self.budget > 0 && piece.x != target.x {
            if self.last_horizontal != 0 {
                self.last_horizontal = 0;
                return frame;
            }
            self.budget -= 1;
            let sign: i8 = if target.x < piece.x { -1 } else { 1 };
            self.last_horizontal = sign;
            frame.horizontal = sign as f32;
            return frame;
        }

        frame.vertical = -1.0;
        frame
    }
}

/// Pick the best landing spot for a piece with the given colors
///
/// Candidates are scored by same-color neighbors at the landing spot, with
/// lower landings breaking ties; the leftmost candidate wins remaining ties.
pub fn plan_placement(obs: &Observation<'_>, colors: [u8; 2]) -> Option<Placement> {
    let config = obs.config;
    let mut best: Option<Placement> = None;

    for x in config.interior() {
        for orientation in [Direction::Top, Direction::Right] {
            let (dx, dy) = orientation.offset();
            let sx = x + dx;
            if !config.interior().contains(&sx) {
                continue;
            }

            let landing_y = if dx == 0 {
                stack_top(obs.grid, x) + 1
            } else {
                stack_top(obs.grid, x).max(stack_top(obs.grid, sx)) + 1
            };
            let cells = [(x, landing_y, colors[0]), (sx, landing_y + dy, colors[1])];

            let mut matches = 0;
            for (cx, cy, color) in cells {
                matches += neighbors(cx, cy)
                    .into_iter()
                    .filter_map(|(nx, ny)| obs.grid.cell_at(nx, ny))
                    .filter(|cell| cell.playable_color() == Some(color))
                    .count() as i32;
            }
            if colors[0] == colors[1] {
                matches += 1;
            }

            let top = landing_y + dy.max(0);
            let mut score = matches * 4 - landing_y;
            if top >= config.column_height {
                score -= 1_000;
            }

            let candidate = Placement {
                x,
                orientation,
                landing_y,
                score,
            };
            if best.map_or(true, |b| candidate.score > b.score) {
                best = Some(candidate);
            }
        }
    }

    best
}

/// Highest occupied row in a column, floor included
fn stack_top(grid: &Grid, x: i32) -> i32 {
    grid.cells()
        .filter(|cell| cell.x == x)
        .map(|cell| cell.y)
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use connecting_squares_core::{BoardConfig, Game, Phase, ScriptedColors};

    use crate::types::{CellColor, Origin};

    fn config() -> BoardConfig {
        BoardConfig::default().headless()
    }

    #[test]
    fn test_prefers_matching_neighbors() {
        let config = config();
        let mut grid = Grid::new();
        for x in config.left_column_x..=config.right_column_x {
            grid.insert(x, 0, CellColor::Floor, Origin::Floor).unwrap();
        }
        grid.insert(4, 1, CellColor::Palette(2), Origin::Piece)
            .unwrap();

        let obs = Observation {
            config: &config,
            grid: &grid,
            piece: None,
            phase: Phase::Controlled,
            turn: 1,
        };
        let placement = plan_placement(&obs, [2, 2]).unwrap();
        // Same-color pair lying flat next to the color-2 cell
        assert_eq!(placement.landing_y, 1);
        assert_eq!(placement.x, 2);
        assert_eq!(placement.orientation, Direction::Right);
    }

    #[test]
    fn test_releases_between_horizontal_pulses() {
        let mut game = Game::with_colors(config(), ScriptedColors::constant(1)).unwrap();
        game.advance();
        let mut pilot = Autopilot::new();

        let mut frames = Vec::new();
        for _ in 0..6 {
            let frame = pilot.poll(&Observation::of(&game));
            game.tick(&frame);
            frames.push(frame);
        }
        for pair in frames.windows(2) {
            assert!(pair[0].horizontal == 0.0 || pair[1].horizontal == 0.0);
        }
    }

    #[test]
    fn test_idle_outside_control() {
        let game = Game::new(config(), 4).unwrap();
        let mut pilot = Autopilot::new();
        let frame = pilot.poll(&Observation::of(&game));
        assert_eq!(frame, InputFrame::default());
    }
}
