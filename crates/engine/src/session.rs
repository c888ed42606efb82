//! Session - drives a game with its external collaborators
//!
//! One [`Session::step`] polls the input source, ticks the game, lets the
//! contact sensor deliver collisions, logs the emitted events and forwards the
//! exit notification. The returned delay is what a real-time loop sleeps.

use std::time::Duration;

use connecting_squares_core::{ColorSource, Game, GameEvent, Phase, Stats};

use crate::contact::ContactSensor;
use crate::observe::Observation;
use crate::types::{ExitReason, InputFrame, TICK_MS};

/// Per-tick input provider
pub trait InputSource {
    fn poll(&mut self, obs: &Observation<'_>) -> InputFrame;
}

/// Input source that never presses anything
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

impl InputSource for Idle {
    fn poll(&mut self, _obs: &Observation<'_>) -> InputFrame {
        InputFrame::default()
    }
}

/// Replays fixed frames, then stays idle
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<InputFrame>,
    index: usize,
}

impl ScriptedInput {
    pub fn new(frames: impl Into<Vec<InputFrame>>) -> Self {
        Self {
            frames: frames.into(),
            index: 0,
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self, _obs: &Observation<'_>) -> InputFrame {
        let frame = self.frames.get(self.index).copied().unwrap_or_default();
        self.index += 1;
        frame
    }
}

/// Receives the single scene-exit notification of a game
pub trait SceneTransition {
    fn exit(&mut self, reason: ExitReason, stats: Stats);
}

impl<F: FnMut(ExitReason, Stats)> SceneTransition for F {
    fn exit(&mut self, reason: ExitReason, stats: Stats) {
        self(reason, stats)
    }
}

/// Scene transition that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct StayOnScene;

impl SceneTransition for StayOnScene {
    fn exit(&mut self, reason: ExitReason, _stats: Stats) {
        tracing::debug!(reason = reason.as_str(), "no scene to switch to");
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    /// `None` when the run stopped before the game ended
    pub exit: Option<ExitReason>,
    pub stats: Stats,
}

pub struct Session<C, I, T> {
    game: Game<C>,
    input: I,
    transition: T,
    sensor: ContactSensor,
    exit: Option<ExitReason>,
    ticks: u64,
}

impl<C, I, T> Session<C, I, T>
where
    C: ColorSource,
    I: InputSource,
    T: SceneTransition,
{
    pub fn new(game: Game<C>, input: I, transition: T) -> Self {
        Self {
            game,
            input,
            transition,
            sensor: ContactSensor::new(),
            exit: None,
            ticks: 0,
        }
    }

    pub fn game(&self) -> &Game<C> {
        &self.game
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one tick and return the pacing delay before the next
    pub fn step(&mut self) -> Duration {
        let frame = self.input.poll(&Observation::of(&self.game));
        let tick = self.game.tick(&frame);
        self.sensor.update(&mut self.game);
        self.ticks += 1;

        for event in self.game.take_events() {
            self.dispatch(event);
        }

        if self.game.phase() == Phase::Controlled {
            tick.delay.max(Duration::from_millis(TICK_MS as u64))
        } else {
            tick.delay
        }
    }

    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::PieceSpawned { turn, colors } => {
                tracing::debug!(turn, main = colors[0], secondary = colors[1], "piece spawned");
            }
            GameEvent::PieceLanded { cells } => {
                tracing::debug!(main = cells[0].0, secondary = cells[1].0, "piece landed");
            }
            GameEvent::Cleared { regions, cells } => {
                tracing::info!(regions, cells, "regions cleared");
            }
            GameEvent::TurnEnded { turn } => {
                tracing::debug!(turn, "turn ended");
            }
            GameEvent::Exit(reason) => {
                if self.exit.is_some() {
                    tracing::warn!(reason = reason.as_str(), "duplicate exit ignored");
                    return;
                }
                self.exit = Some(reason);
                self.transition.exit(reason, self.game.stats());
            }
        }
    }

    /// Step without sleeping until the game ends or `max_ticks` is reached
    pub fn run_headless(&mut self, max_ticks: u64) -> RunSummary {
        self.run_until(max_ticks, |_| false)
    }

    /// Like [`run_headless`](Self::run_headless), also stopping when `stop`
    /// returns true after a step
    pub fn run_until<F>(&mut self, max_ticks: u64, mut stop: F) -> RunSummary
    where
        F: FnMut(&Game<C>) -> bool,
    {
        let start = self.ticks;
        while self.ticks - start < max_ticks && !self.game.is_over() {
            self.step();
            if stop(&self.game) {
                break;
            }
        }
        self.summary()
    }

    /// Step in real time, sleeping the pacing delay between ticks
    pub fn run_realtime<F>(&mut self, mut stop: F) -> RunSummary
    where
        F: FnMut(&Game<C>) -> bool,
    {
        while !self.game.is_over() {
            let delay = self.step();
            if stop(&self.game) {
                break;
            }
            std::thread::sleep(delay);
        }
        self.summary()
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            ticks: self.ticks,
            exit: self.exit,
            stats: self.game.stats(),
        }
    }
}
