use connecting_squares_core::{BoardConfig, Game, Grid, Phase, Piece};

/// Borrowed view of a game handed to input sources each tick
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub config: &'a BoardConfig,
    pub grid: &'a Grid,
    pub piece: Option<&'a Piece>,
    pub phase: Phase,
    /// Id of the current (or last) piece
    pub turn: u32,
}

impl<'a> Observation<'a> {
    pub fn of<C>(game: &'a Game<C>) -> Self
    where
        C: connecting_squares_core::ColorSource,
    {
        Self {
            config: game.config(),
            grid: game.grid(),
            piece: game.piece(),
            phase: game.phase(),
            turn: game.turn(),
        }
    }

    pub fn controlled(&self) -> bool {
        self.phase == Phase::Controlled && self.piece.is_some()
    }
}
