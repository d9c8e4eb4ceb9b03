//! Score-gated item spawning
//!
//! Difficulty is a step function of score: each tier raises fall speed,
//! shortens the gap between batches and makes bad items more likely.
//! Lookups never interpolate between tiers.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{GameState, ItemKind, SkyItem};
use crate::consts::*;

/// Spawn tuning for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnParameters {
    /// Multiplier applied to the base fall speed ranges
    pub speed_multiplier: f32,
    /// Delay between batches, in milliseconds (inclusive range)
    pub delay_ms: (u64, u64),
    /// A bad item spawns when a roll in `[0, BAD_ROLL_SIDES)` lands below this
    pub bad_threshold: u32,
}

/// A row of the tier table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTier {
    /// Lowest score at which this tier applies
    pub min_score: u32,
    pub params: SpawnParameters,
}

/// Tier table, sorted by `min_score`
pub const SPAWN_TIERS: &[SpawnTier] = &[
    SpawnTier {
        min_score: 0,
        params: SpawnParameters {
            speed_multiplier: 1.0,
            delay_ms: (1500, 2500),
            bad_threshold: 2,
        },
    },
    SpawnTier {
        min_score: 500,
        params: SpawnParameters {
            speed_multiplier: 1.2,
            delay_ms: (1300, 2200),
            bad_threshold: 3,
        },
    },
    SpawnTier {
        min_score: 1000,
        params: SpawnParameters {
            speed_multiplier: 1.4,
            delay_ms: (1100, 1900),
            bad_threshold: 3,
        },
    },
    SpawnTier {
        min_score: 2000,
        params: SpawnParameters {
            speed_multiplier: 1.7,
            delay_ms: (900, 1600),
            bad_threshold: 4,
        },
    },
    SpawnTier {
        min_score: 5000,
        params: SpawnParameters {
            speed_multiplier: 2.0,
            delay_ms: (700, 1300),
            bad_threshold: 4,
        },
    },
];

/// Index of the highest tier whose breakpoint `score` has reached
pub fn tier_index(score: u32) -> usize {
    SPAWN_TIERS
        .iter()
        .rposition(|t| score >= t.min_score)
        .unwrap_or(0)
}

/// Spawn parameters for the given score
pub fn spawn_parameters(score: u32) -> SpawnParameters {
    SPAWN_TIERS[tier_index(score)].params
}

/// Batch timer, owned by `GameState`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Spawner {
    /// Seconds until the next batch (zero spawns on the first tick)
    pub cooldown: f32,
    /// Tier used for the last batch
    pub tier: usize,
    /// Categories skipped by the last batch for lack of an image
    pub bad_skipped: bool,
    pub good_skipped: bool,
}

impl Spawner {
    /// Record whether `kind` had to be skipped; logs only when that changes.
    fn note_skip(&mut self, kind: ItemKind, skipped: bool) {
        let flag = match kind {
            ItemKind::Bad => &mut self.bad_skipped,
            ItemKind::Good => &mut self.good_skipped,
        };
        if *flag != skipped {
            if skipped {
                log::debug!("{:?} item image missing, skipping", kind);
            } else {
                log::debug!("{:?} item image available again", kind);
            }
            *flag = skipped;
        }
    }
}

/// Count down the batch timer and spawn a batch when it expires.
///
/// Returns the number of items spawned.
pub fn run_spawner(state: &mut GameState, dt: f32) -> usize {
    state.spawner.cooldown -= dt;
    if state.spawner.cooldown > 0.0 {
        return 0;
    }

    let tier = tier_index(state.score);
    if tier != state.spawner.tier {
        log::info!("Difficulty tier {} reached at score {}", tier, state.score);
        state.spawner.tier = tier;
    }

    let spawned = spawn_batch(state);
    let (lo, hi) = spawn_parameters(state.score).delay_ms;
    let delay_ms = state.rng.random_range(lo..=hi);
    state.spawner.cooldown = delay_ms as f32 / 1000.0;
    spawned
}

/// Spawn zero or one bad item and one good item along the top edge.
///
/// Categories whose image is missing are skipped.
pub fn spawn_batch(state: &mut GameState) -> usize {
    let params = spawn_parameters(state.score);
    let width = state.playfield.width;
    let mut bad_x = None;
    let mut spawned = 0;

    let roll = state.rng.random_range(0..BAD_ROLL_SIDES);
    if roll < params.bad_threshold {
        match state.atlas.size_of(ItemKind::Bad.sprite_kind()) {
            Some(size) => {
                let x = random_x(&mut state.rng, width, size.x);
                let speed = random_speed(&mut state.rng, BAD_FALL_SPEED, params.speed_multiplier);
                let id = state.next_entity_id();
                state
                    .items
                    .push(SkyItem::new(id, ItemKind::Bad, size, Vec2::new(x, 0.0), speed));
                bad_x = Some(x);
                spawned += 1;
                state.spawner.note_skip(ItemKind::Bad, false);
            }
            None => state.spawner.note_skip(ItemKind::Bad, true),
        }
    }

    match state.atlas.size_of(ItemKind::Good.sprite_kind()) {
        Some(size) => {
            let max_x = (width - size.x).max(0.0);
            let mut x = random_x(&mut state.rng, width, size.x);
            if let Some(other) = bad_x {
                x = separate(x, other, max_x);
            }
            let speed = random_speed(&mut state.rng, GOOD_FALL_SPEED, params.speed_multiplier);
            let id = state.next_entity_id();
            state
                .items
                .push(SkyItem::new(id, ItemKind::Good, size, Vec2::new(x, 0.0), speed));
            spawned += 1;
            state.spawner.note_skip(ItemKind::Good, false);
        }
        None => state.spawner.note_skip(ItemKind::Good, true),
    }

    spawned
}

/// Random left edge keeping the item inside the playfield
fn random_x(rng: &mut impl Rng, width: f32, item_width: f32) -> f32 {
    let max_x = (width - item_width).max(0.0);
    rng.random::<f32>() * max_x
}

fn random_speed(rng: &mut impl Rng, (lo, hi): (f32, f32), multiplier: f32) -> f32 {
    (lo + rng.random::<f32>() * (hi - lo)) * multiplier
}

/// Push `x` at least `MIN_SPAWN_SEPARATION` away from `other`, staying within `[0, max_x]`.
/// Leaves `x` alone when the playfield is too narrow for either side.
fn separate(x: f32, other: f32, max_x: f32) -> f32 {
    if (x - other).abs() >= MIN_SPAWN_SEPARATION {
        return x;
    }
    let right = other + MIN_SPAWN_SEPARATION;
    let left = other - MIN_SPAWN_SEPARATION;
    let (first, second) = if x >= other {
        (right, left)
    } else {
        (left, right)
    };
    [first, second]
        .into_iter()
        .find(|c| (0.0..=max_x).contains(c))
        .unwrap_or(x)
}
