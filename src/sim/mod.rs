//! Simulation module
//!
//! All gameplay logic lives here. Nothing in this module touches the terminal,
//! the clock or the canvas:
//! - One call to `tick` is one fixed timestep
//! - Obstacle gaps come from the state's seeded RNG
//! - Side effects are reported as `GameEvent`s for the presentation layer

pub mod spawn;
pub mod state;
pub mod tick;

pub use spawn::{spawn, spawn_with_gap};
pub use state::{Body, GameEvent, GameState, PairId, Phase, PipePair, Rules};
pub use tick::{check_collisions, is_colliding, jump, restart, tick};
