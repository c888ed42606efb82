//! Contact sensor - geometric stand-in for a physics backend
//!
//! After every tick the sensor derives which grid cells and walls touch the
//! live piece in each direction, diffs that against the previous tick and
//! delivers one begin/end pair per contact partner, the same way per-collider
//! enter/exit callbacks would.
//!
//! | Direction | Partner for a piece cell at (px, py)              |
//! |-----------|---------------------------------------------------|
//! | Left      | cell at px - 1 with \|yc - py\| < 1, or the wall  |
//! | Right     | cell at px + 1 with \|yc - py\| < 1, or the wall  |
//! | Bottom    | cell at px with 0 < py - yc <= 1                  |
//! | Top       | cell at px with 0 < yc - py <= 1                  |

use arrayvec::ArrayVec;

use connecting_squares_core::{BoardConfig, CellId, ColorSource, Game, Grid, Piece, PieceCell};

use crate::types::{ContactPhase, Direction, Side};

/// Something the piece can touch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partner {
    Cell(CellId),
    Wall(Side),
}

/// Partners touching in one direction; two piece cells, two rows each, one wall
pub type Partners = ArrayVec<Partner, 8>;

#[derive(Debug, Clone, Default)]
pub struct ContactSensor {
    active: [Partners; 4],
    turn: Option<u32>,
}

impl ContactSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every active contact without delivering end events
    pub fn reset(&mut self) {
        for partners in &mut self.active {
            partners.clear();
        }
        self.turn = None;
    }

    /// Partners currently held in one direction
    pub fn active(&self, dir: Direction) -> &[Partner] {
        &self.active[dir.index()]
    }

    /// Sense contacts for the live piece and deliver the changes
    ///
    /// Returns true when a delivered contact grounded the piece.
    pub fn update<C: ColorSource>(&mut self, game: &mut Game<C>) -> bool {
        let Some(piece) = game.piece().copied() else {
            self.reset();
            return false;
        };
        if self.turn != Some(game.turn()) {
            self.reset();
            self.turn = Some(game.turn());
        }

        let sensed = sense(game.grid(), game.config(), &piece);

        for dir in Direction::ALL {
            let previous = &self.active[dir.index()];
            for partner in previous.iter().filter(|p| !sensed[dir.index()].contains(p)) {
                tracing::trace!(direction = dir.as_str(), ?partner, "contact end");
                game.contact(dir, ContactPhase::End);
            }
        }

        let mut landed = false;
        for dir in [Direction::Top, Direction::Left, Direction::Right, Direction::Bottom] {
            let previous = &self.active[dir.index()];
            for partner in sensed[dir.index()].iter().filter(|p| !previous.contains(p)) {
                tracing::trace!(direction = dir.as_str(), ?partner, "contact begin");
                if game.contact(dir, ContactPhase::Begin) {
                    landed = true;
                    break;
                }
            }
            if landed {
                break;
            }
        }

        if landed {
            self.reset();
        } else {
            self.active = sensed;
        }
        landed
    }
}

/// Compute the partners touching each direction of the piece
pub fn sense(grid: &Grid, config: &BoardConfig, piece: &Piece) -> [Partners; 4] {
    let mut out: [Partners; 4] = Default::default();

    for cell in piece.cells() {
        let x = cell.x as i32;

        for (dir, dx) in [(Direction::Left, -1), (Direction::Right, 1)] {
            for y in rows_overlapping(cell) {
                if let Some(other) = grid.cell_at(x + dx, y) {
                    push(&mut out[dir.index()], Partner::Cell(other.id));
                }
            }
        }
        if x - 1 <= config.left_column_x {
            push(&mut out[Direction::Left.index()], Partner::Wall(Side::Left));
        }
        if x + 1 >= config.right_column_x {
            push(&mut out[Direction::Right.index()], Partner::Wall(Side::Right));
        }

        let below = (cell.y - 1.0).ceil();
        if cell.y - below > 0.0 {
            if let Some(other) = grid.cell_at(x, below as i32) {
                push(&mut out[Direction::Bottom.index()], Partner::Cell(other.id));
            }
        }
        let above = (cell.y + 1.0).floor();
        if above - cell.y > 0.0 {
            if let Some(other) = grid.cell_at(x, above as i32) {
                push(&mut out[Direction::Top.index()], Partner::Cell(other.id));
            }
        }
    }

    out
}

/// Integer rows strictly closer than one unit to the cell's y
fn rows_overlapping(cell: PieceCell) -> ArrayVec<i32, 2> {
    let mut rows = ArrayVec::new();
    let low = cell.y.floor();
    let high = cell.y.ceil();
    for y in [low, high] {
        if (y - cell.y).abs() < 1.0 && !rows.contains(&(y as i32)) {
            rows.push(y as i32);
        }
    }
    rows
}

fn push(partners: &mut Partners, partner: Partner) {
    if partners.contains(&partner) {
        return;
    }
    if partners.try_push(partner).is_err() {
        tracing::warn!(?partner, "too many contacts in one direction, dropping");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellColor, InputFrame, Origin};

    fn config() -> BoardConfig {
        BoardConfig::default().headless()
    }

    fn piece(x: i32, y: f32, secondary: Direction) -> Piece {
        Piece {
            x,
            y,
            secondary,
            colors: [0, 1],
        }
    }

    #[test]
    fn test_floor_is_bottom_partner_within_one_row() {
        let mut grid = Grid::new();
        let floor = grid.insert(3, 0, CellColor::Floor, Origin::Floor).unwrap();

        let far = sense(&grid, &config(), &piece(3, 1.5, Direction::Top));
        assert!(far[Direction::Bottom.index()].is_empty());

        let near = sense(&grid, &config(), &piece(3, 0.98, Direction::Top));
        assert_eq!(
            near[Direction::Bottom.index()].as_slice(),
            &[Partner::Cell(floor)]
        );

        let exact = sense(&grid, &config(), &piece(3, 1.0, Direction::Top));
        assert_eq!(exact[Direction::Bottom.index()].len(), 1);
    }

    #[test]
    fn test_side_cells_overlapping_rows() {
        let mut grid = Grid::new();
        let low = grid.insert(2, 4, CellColor::Palette(0), Origin::Piece).unwrap();
        let high = grid.insert(2, 5, CellColor::Palette(0), Origin::Piece).unwrap();

        let between = sense(&grid, &config(), &piece(3, 4.5, Direction::Bottom));
        let left = &between[Direction::Left.index()];
        assert!(left.contains(&Partner::Cell(low)));
        assert!(left.contains(&Partner::Cell(high)));

        let aligned = sense(&grid, &config(), &piece(3, 6.0, Direction::Top));
        assert!(aligned[Direction::Left.index()].is_empty());
    }

    #[test]
    fn test_walls_next_to_columns() {
        let grid = Grid::new();
        let at_left = sense(&grid, &config(), &piece(1, 8.0, Direction::Top));
        assert_eq!(
            at_left[Direction::Left.index()].as_slice(),
            &[Partner::Wall(Side::Left)]
        );
        assert!(at_left[Direction::Right.index()].is_empty());

        // The secondary cell reaches the right wall first
        let at_right = sense(&grid, &config(), &piece(4, 8.0, Direction::Right));
        assert_eq!(
            at_right[Direction::Right.index()].as_slice(),
            &[Partner::Wall(Side::Right)]
        );
    }

    #[test]
    fn test_wall_contact_blocks_further_moves() {
        let mut game = Game::new(config(), 11).unwrap();
        let mut sensor = ContactSensor::new();
        game.advance();

        let left = InputFrame {
            horizontal: -1.0,
            ..InputFrame::default()
        };
        for frame in [left, InputFrame::default(), left] {
            game.tick(&frame);
            sensor.update(&mut game);
        }
        assert_eq!(game.piece().map(|p| p.x), Some(1));
        assert!(sensor.active(Direction::Left).contains(&Partner::Wall(Side::Left)));
        assert!(game.controller().unwrap().locks().is_locked(Direction::Left));

        game.tick(&InputFrame::default());
        game.tick(&left);
        assert_eq!(game.piece().map(|p| p.x), Some(1));
    }

    #[test]
    fn test_new_piece_starts_unlocked() {
        let mut game = Game::new(config(), 11).unwrap();
        let mut sensor = ContactSensor::new();
        game.advance();
        assert!(!sensor.update(&mut game));

        let turn = game.turn();
        while !sensor.update(&mut game) {
            game.tick(&Default::default());
        }
        game.advance();
        assert_eq!(game.turn(), turn + 1);

        sensor.update(&mut game);
        let locks = game.controller().unwrap().locks();
        for dir in Direction::ALL {
            assert_eq!(locks.count(dir), 0);
        }
    }

    #[test]
    fn test_falling_piece_lands_on_contact() {
        let mut game = Game::new(config(), 11).unwrap();
        let mut sensor = ContactSensor::new();
        game.advance();

        let mut ticks = 0;
        let landed = loop {
            game.tick(&Default::default());
            ticks += 1;
            if sensor.update(&mut game) {
                break true;
            }
            if ticks > 2_000 {
                break false;
            }
        };
        assert!(landed);
        // Main cell rests on the floor row, secondary on top of it
        assert!(game.grid().cell_at(3, 1).is_some());
        assert!(game.grid().cell_at(3, 2).is_some());
    }
}
