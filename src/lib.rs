//! Astro Jump - a tilt-controlled falling-objects arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, spawning, game state)
//! - `input`: Accelerometer smoothing and the latest-sample latch
//! - `assets`: Native image sizes supplied by the asset loader
//! - `persistence`: High score + session log storage and the background writer
//! - `session`: Fixed-step driver tying input, simulation and persistence together

pub mod assets;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;

pub use assets::SpriteAtlas;
pub use highscores::{Records, SessionRecord};
pub use session::{Clock, Session, SystemClock, UiCommand, UiEvent};
pub use settings::{Sensitivity, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (16 ms, ~60 Hz)
    pub const SIM_DT: f32 = 0.016;
    /// Maximum substeps per frame to prevent spiral of death.
    /// Below `MAX_FRAME_DT / SIM_DT`, so a clamped long frame hits it.
    pub const MAX_SUBSTEPS: u32 = 5;
    /// Longest frame time fed into the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Downward acceleration on the player (px/s²)
    pub const PLAYER_GRAVITY: f32 = 9.8 * 50.0;
    /// Downward acceleration on falling items (px/s²)
    pub const ITEM_GRAVITY: f32 = 9.8 * 10.0;
    /// Horizontal velocity damping applied every tick
    pub const PLAYER_FRICTION: f32 = 0.9;
    /// Player spawns this far above the bottom edge
    pub const PLAYER_START_LIFT: f32 = 300.0;

    /// Health at session start
    pub const INITIAL_HEALTH: u8 = 5;
    /// Score for catching a good item
    pub const GOOD_ITEM_POINTS: u32 = 100;

    /// Minimum horizontal gap between items spawned together (px)
    pub const MIN_SPAWN_SEPARATION: f32 = 50.0;
    /// Base fall speed range for bad items (px/s), before tier scaling
    pub const BAD_FALL_SPEED: (f32, f32) = (180.0, 360.0);
    /// Base fall speed range for good items (px/s), before tier scaling
    pub const GOOD_FALL_SPEED: (f32, f32) = (60.0, 180.0);
    /// Upper bound (exclusive) of the bad-item coin flip
    pub const BAD_ROLL_SIDES: u32 = 5;
}
