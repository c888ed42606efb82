//! Engine module - headless collaborators around the core game
//!
//! The core crate only reacts to input frames and contact signals. This crate
//! supplies those from outside:
//!
//! - [`contact`]: Geometric contact sensing in place of a physics backend
//! - [`session`]: The tick loop, input sources and the scene-exit callback
//! - [`autopilot`]: A scripted player used by the runner and in tests
//! - [`observe`]: Borrowed per-tick view handed to input sources

pub mod autopilot;
pub mod contact;
pub mod observe;
pub mod session;

pub use connecting_squares_types as types;

pub use autopilot::{plan_placement, Autopilot, Placement};
pub use contact::{ContactSensor, Partner};
pub use observe::Observation;
pub use session::{
    Idle, InputSource, RunSummary, SceneTransition, ScriptedInput, Session, StayOnScene,
};
