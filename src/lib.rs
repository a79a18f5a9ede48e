//! Flappy Term - a minimal side-scrolling arcade game
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (gravity, pipes, scoring, collisions)
//! - `clock`: Virtual-time scheduler driving the tick and spawn timers
//! - `surface`: Retained shape canvas the presentation layer draws into
//! - `game`: Controller tying simulation, timers and canvas together
//! - `render`: Half-block terminal rasterizer for the canvas

pub mod audio;
pub mod clock;
pub mod config;
pub mod game;
pub mod geom;
pub mod input;
pub mod render;
pub mod scene;
pub mod sim;
pub mod surface;

pub use game::Game;
pub use geom::Rect;

/// World constants, in logical units (the world is 400 wide, 600 tall)
pub mod consts {
    use std::time::Duration;

    pub const WIDTH: f64 = 400.0;
    pub const HEIGHT: f64 = 600.0;

    /// Added to the body's velocity every tick
    pub const GRAVITY: f64 = 0.6;
    /// Velocity assigned by a jump (negative is up)
    pub const JUMP_IMPULSE: f64 = -10.0;

    pub const TICK_INTERVAL: Duration = Duration::from_millis(20);
    pub const SPAWN_INTERVAL: Duration = Duration::from_millis(1500);

    /// Horizontal distance every pipe moves left per tick
    pub const PIPE_SPEED: f64 = 5.0;
    pub const PIPE_GAP: f64 = 150.0;
    pub const PIPE_WIDTH: f64 = 60.0;

    pub const BODY_RADIUS: f64 = 15.0;
    /// Body centre x; never changes
    pub const BODY_X: f64 = WIDTH / 4.0;

    /// Due tasks processed per frame before the rest are re-based to now
    pub const MAX_CATCHUP_TASKS: usize = 16;
}
