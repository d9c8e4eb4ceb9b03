//! Read-only view of the simulation for renderers and the UI
//!
//! Built at tick boundaries and handed out behind an `Arc`, so nothing the
//! renderer holds can alias state the tick is mutating.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};
use crate::assets::SpriteKind;

/// Everything needed to draw one sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpriteView {
    pub id: u32,
    pub kind: SpriteKind,
    pub pos: Vec2,
    /// Degrees
    pub rotation: f32,
    pub scale: f32,
}

/// State published once per frame
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    /// Tick counter at capture time
    pub tick: u64,
    /// Player first (if present), then items in spawn order
    pub sprites: Vec<SpriteView>,
    pub health: u8,
    pub score: u32,
    pub paused: bool,
    pub game_over: bool,
    /// Best score known to the session when this frame was captured
    pub high_score: u32,
}

impl FrameSnapshot {
    /// Copy the drawable parts of `state`
    pub fn capture(state: &GameState, high_score: u32) -> Self {
        let player = state.player.iter().map(|p| SpriteView {
            id: p.sprite.id,
            kind: SpriteKind::Player,
            pos: p.sprite.pos,
            rotation: p.sprite.rotation,
            scale: p.sprite.scale,
        });
        let items = state.items.iter().map(|i| SpriteView {
            id: i.sprite.id,
            kind: i.kind.sprite_kind(),
            pos: i.sprite.pos,
            rotation: i.sprite.rotation,
            scale: i.sprite.scale,
        });

        Self {
            tick: state.time_ticks,
            sprites: player.chain(items).collect(),
            health: state.health,
            score: state.score,
            paused: state.is_paused(),
            game_over: state.phase == GamePhase::GameOver,
            high_score,
        }
    }

    /// True while the game accepts tilt input
    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteAtlas;
    use crate::sim::spawn::spawn_batch;
    use crate::sim::state::{Controls, Playfield};

    #[test]
    fn test_capture_orders_player_first() {
        let atlas = SpriteAtlas::new(Vec2::splat(64.0), Vec2::splat(32.0), Vec2::splat(32.0));
        let mut state = GameState::new(42, Playfield::new(800.0, 1200.0), atlas, Controls::default());
        spawn_batch(&mut state);
        spawn_batch(&mut state);

        let snap = FrameSnapshot::capture(&state, 1200);
        assert_eq!(snap.sprites.len(), 1 + state.items.len());
        assert_eq!(snap.sprites[0].kind, SpriteKind::Player);
        let ids: Vec<u32> = snap.sprites[1..].iter().map(|s| s.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();
        assert_eq!(ids, sorted);
        assert_eq!(snap.high_score, 1200);
        assert!(snap.playable());
    }
}
