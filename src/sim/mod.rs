//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order, which is ID order)
//! - No rendering, sensor or storage dependencies

pub mod collision;
pub mod snapshot;
pub mod spawn;
pub mod sprite;
pub mod state;
pub mod tick;

pub use collision::{check_collision, reached_floor};
pub use snapshot::{FrameSnapshot, SpriteView};
pub use spawn::{SPAWN_TIERS, SpawnParameters, SpawnTier, Spawner, spawn_parameters};
pub use sprite::{Aabb, Sprite};
pub use state::{
    Controls, GameEvent, GamePhase, GameState, ItemKind, Player, Playfield, SkyItem,
};
pub use tick::{TickInput, tick};
