//! Connecting Squares (workspace facade crate).
//!
//! This package exposes `connecting_squares::{core,engine,types}` as one public
//! API while the implementation lives in dedicated crates under `crates/`.

pub use connecting_squares_core as core;
pub use connecting_squares_engine as engine;
pub use connecting_squares_types as types;
