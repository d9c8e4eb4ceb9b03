//! Game state and core simulation types
//!
//! Everything the tick mutates lives here. The simulation owns it outright;
//! renderers and the UI only ever see a `FrameSnapshot` copied out of it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::reached_floor;
use super::spawn::Spawner;
use super::sprite::Sprite;
use crate::assets::{SpriteAtlas, SpriteKind};
use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Physics and spawning running
    Active,
    /// Frozen; rendering continues
    Paused,
    /// Health ran out. Terminal until the session is reset.
    GameOver,
}

/// Something that happened during a tick, drained by the session driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The player touched an item
    Caught { id: u32, kind: ItemKind },
    /// A good item reached the floor uncollected
    Missed { id: u32 },
    Paused,
    Resumed,
    /// Health reached zero. Emitted once per session.
    GameOver { score: u32 },
}

/// Playfield dimensions in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// How filtered tilt turns into horizontal acceleration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Controls {
    /// Acceleration (px/s²) per unit of filtered tilt
    pub sensitivity: f32,
    /// Filtered tilt magnitude below which the player stops dead
    pub dead_zone: f32,
    /// Flip the tilt direction
    pub invert: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            sensitivity: 200.0,
            dead_zone: 0.01,
            invert: false,
        }
    }
}

impl Controls {
    /// Desired horizontal acceleration for a filtered tilt reading.
    ///
    /// `None` means the reading is inside the dead zone and the player should stop.
    /// Tilting the device right reports negative x, so the sign is flipped.
    pub fn drive(&self, tilt_x: f32) -> Option<f32> {
        if tilt_x.abs() < self.dead_zone {
            return None;
        }
        let direction = if self.invert { 1.0 } else { -1.0 };
        Some(direction * tilt_x * self.sensitivity)
    }
}

/// The tilt-controlled avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub sprite: Sprite,
}

impl Player {
    pub fn new(id: u32, native_size: Vec2, pos: Vec2) -> Self {
        Self {
            sprite: Sprite::new(id, native_size, pos),
        }
    }

    /// Spawn position: horizontally centered, lifted off the floor
    pub fn start_position(playfield: &Playfield) -> Vec2 {
        Vec2::new(
            playfield.width / 2.0,
            (playfield.height - PLAYER_START_LIFT).max(0.0),
        )
    }

    /// Advance one step.
    ///
    /// `drive` is the desired horizontal acceleration, or `None` inside the dead zone.
    pub fn integrate(&mut self, dt: f32, drive: Option<f32>, playfield: &Playfield) {
        let s = &mut self.sprite;

        s.vel.x = match drive {
            Some(accel_x) => (s.vel.x + accel_x * dt) * PLAYER_FRICTION,
            None => 0.0,
        };
        s.vel.y += PLAYER_GRAVITY * dt;
        s.integrate_position(dt);

        let max_x = (playfield.width - s.width()).max(0.0);
        s.pos.x = s.pos.x.max(0.0).min(max_x);

        let bottom = s.bounding_box().bottom();
        if bottom >= playfield.height {
            s.pos.y -= bottom - playfield.height;
            s.vel.y = 0.0;
        }
    }
}

/// Falling item flavor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Collect for points; letting it land costs health
    Good,
    /// Touching it costs health
    Bad,
}

impl ItemKind {
    pub fn sprite_kind(&self) -> SpriteKind {
        match self {
            ItemKind::Good => SpriteKind::GoodItem,
            ItemKind::Bad => SpriteKind::BadItem,
        }
    }
}

/// A falling collectible or hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkyItem {
    pub sprite: Sprite,
    pub kind: ItemKind,
}

impl SkyItem {
    pub fn new(id: u32, kind: ItemKind, native_size: Vec2, pos: Vec2, fall_speed: f32) -> Self {
        let mut sprite = Sprite::new(id, native_size, pos);
        sprite.set_velocity(0.0, fall_speed);
        Self { sprite, kind }
    }

    /// Advance one step. Returns true when the item reached the floor this step,
    /// in which case it is also marked dead.
    pub fn integrate(&mut self, dt: f32, playfield: &Playfield) -> bool {
        let s = &mut self.sprite;
        s.vel.y += ITEM_GRAVITY * dt;
        s.integrate_position(dt);

        if reached_floor(s, playfield.height) {
            s.alive = false;
            return true;
        }
        false
    }
}

fn unseeded_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG, seeded from `seed`
    #[serde(skip, default = "unseeded_rng")]
    pub rng: Pcg32,
    pub playfield: Playfield,
    pub atlas: SpriteAtlas,
    pub controls: Controls,
    /// Never negative; only decreases during a session
    pub health: u8,
    /// Only increases; frozen after game over
    pub score: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Wall clock (ms since epoch) when the session started
    pub started_at_ms: i64,
    /// `None` when the player image failed to load
    pub player: Option<Player>,
    /// Live falling items, in spawn order
    pub items: Vec<SkyItem>,
    pub spawner: Spawner,
    /// Events produced since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    /// Set the first time game over fires; guards the side effects
    game_over_fired: bool,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh `Active` session
    pub fn new(seed: u64, playfield: Playfield, atlas: SpriteAtlas, controls: Controls) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            playfield,
            atlas,
            controls,
            health: INITIAL_HEALTH,
            score: 0,
            phase: GamePhase::Active,
            time_ticks: 0,
            started_at_ms: 0,
            player: None,
            items: Vec::new(),
            spawner: Spawner::default(),
            events: Vec::new(),
            game_over_fired: false,
            next_id: 0,
        };

        state.spawn_player();

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn spawn_player(&mut self) {
        match self.atlas.size_of(SpriteKind::Player) {
            Some(size) => {
                let id = self.next_entity_id();
                let pos = Player::start_position(&self.playfield);
                self.player = Some(Player::new(id, size, pos));
            }
            None => log::warn!("Player image missing, session runs without a player"),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    /// Lose one health, never going below zero
    pub fn lose_health(&mut self) {
        self.health = self.health.saturating_sub(1);
    }

    /// Add points unless the session is over
    pub fn add_score(&mut self, points: u32) {
        if !self.is_game_over() {
            self.score = self.score.saturating_add(points);
        }
    }

    /// Enter `GameOver` if health is gone. Only the first call that sees zero health acts.
    ///
    /// Returns true when this call performed the transition.
    pub fn check_game_over(&mut self) -> bool {
        if self.health > 0 || self.game_over_fired {
            return false;
        }
        self.game_over_fired = true;
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!(
            "Game over at tick {} with score {}",
            self.time_ticks,
            self.score
        );
        true
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
