//! Deterministic game simulation
//!
//! Everything under `sim` is pure with respect to the host: no I/O, no wall
//! clock, no global RNG. A seeded [`state::GameState`] plus a sequence of
//! [`tick::TickInput`] values fully determines every frame, which is what
//! makes the whole game replayable and testable headlessly.

pub mod camera;
pub mod collision;
pub mod combat;
pub mod entity;
pub mod geometry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use state::{GameState, Screen};
pub use tick::{TickInput, tick};
