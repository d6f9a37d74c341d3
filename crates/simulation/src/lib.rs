//! Snake game simulation engine.
//!
//! The deterministic core lives in [`game::SimulationCore`]: a single-snake
//! state machine advanced one tick at a time by whatever drives its
//! [`scheduler::Scheduler`]. Rendering and persistence are observers it calls
//! out to. [`app::App`] wires a core for the browser and [`wasm`] exposes it
//! to JavaScript.

pub mod app;
pub mod auth;
pub mod error;
pub mod food;
pub mod game;
pub mod grid;
pub mod input;
pub mod palette;
pub mod rules;
pub mod scheduler;
pub mod snapshot;
pub mod store;
pub mod wasm;

#[cfg(test)]
mod scenario_test;

pub use game::{Collision, SimulationCore, StepOutcome};
pub use grid::{Direction, Grid, Position};
pub use rules::Rules;
pub use snapshot::{GameState, Snapshot};
