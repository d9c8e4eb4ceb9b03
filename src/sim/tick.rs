//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use std::collections::BTreeSet;

use super::collision::check_collision;
use super::spawn::run_spawner;
use super::state::{GameEvent, GamePhase, GameState, ItemKind};
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest filtered horizontal tilt
    pub tilt_x: f32,
    /// Enter the paused state
    pub pause: bool,
    /// Leave the paused state
    pub resume: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Pause/resume before anything moves
    match state.phase {
        GamePhase::Active if input.pause => {
            state.phase = GamePhase::Paused;
            state.events.push(GameEvent::Paused);
            return;
        }
        GamePhase::Paused if input.resume => {
            state.phase = GamePhase::Active;
            state.events.push(GameEvent::Resumed);
        }
        _ => {}
    }

    // Don't tick if paused or game over
    if state.phase != GamePhase::Active {
        return;
    }

    state.time_ticks += 1;

    let drive = state.controls.drive(input.tilt_x);
    let playfield = state.playfield;

    if let Some(player) = &mut state.player {
        player.integrate(dt, drive, &playfield);
    }

    let mut landed: BTreeSet<u32> = BTreeSet::new();
    for item in &mut state.items {
        if item.integrate(dt, &playfield) {
            landed.insert(item.sprite.id);
        }
    }

    // Every item is judged once: a catch takes precedence over landing in the same tick.
    let mut caught: Vec<(u32, ItemKind)> = Vec::new();
    let mut missed: Vec<u32> = Vec::new();
    for item in &state.items {
        let id = item.sprite.id;
        let touched = state
            .player
            .as_ref()
            .is_some_and(|p| check_collision(&p.sprite, &item.sprite));
        if touched {
            caught.push((id, item.kind));
        } else if landed.contains(&id) && item.kind == ItemKind::Good {
            missed.push(id);
        }
    }

    for &(id, kind) in &caught {
        match kind {
            ItemKind::Bad => state.lose_health(),
            ItemKind::Good => state.add_score(GOOD_ITEM_POINTS),
        }
        state.events.push(GameEvent::Caught { id, kind });
    }
    for &id in &missed {
        state.lose_health();
        state.events.push(GameEvent::Missed { id });
    }

    // Apply removals only after every rule has looked at every item
    state
        .items
        .retain(|item| item.sprite.alive && !caught.iter().any(|&(id, _)| id == item.sprite.id));

    if state.check_game_over() {
        return;
    }

    run_spawner(state, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteAtlas;
    use crate::sim::state::{Controls, Playfield, SkyItem};
    use glam::Vec2;
    use proptest::prelude::*;

    const PLAYER_SIZE: f32 = 100.0;

    fn new_state(seed: u64) -> GameState {
        let atlas = SpriteAtlas::new(
            Vec2::splat(PLAYER_SIZE),
            Vec2::splat(40.0),
            Vec2::splat(40.0),
        );
        let mut state = GameState::new(seed, Playfield::new(1000.0, 2000.0), atlas, Controls::default());
        // Park the player on the floor at a known spot
        if let Some(p) = &mut state.player {
            p.sprite.pos = Vec2::new(500.0, 1900.0);
        }
        state
    }

    /// Quiet state: spawner held off so only hand-placed items exist
    fn quiet_state() -> GameState {
        let mut state = new_state(1);
        state.spawner.cooldown = f32::MAX;
        state
    }

    fn place(state: &mut GameState, kind: ItemKind, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        state
            .items
            .push(SkyItem::new(id, kind, Vec2::splat(40.0), pos, 0.0));
        id
    }

    /// Item sitting right on top of the parked player
    fn on_player(state: &mut GameState, kind: ItemKind) -> u32 {
        place(state, kind, Vec2::new(520.0, 1870.0))
    }

    /// Item about to land far from the player
    fn about_to_land(state: &mut GameState, kind: ItemKind) -> u32 {
        place(state, kind, Vec2::new(0.0, 1960.0))
    }

    #[test]
    fn test_bad_collision_costs_health() {
        let mut state = quiet_state();
        let input = TickInput::default();
        for expected in [4, 3, 2] {
            on_player(&mut state, ItemKind::Bad);
            tick(&mut state, &input, SIM_DT);
            assert_eq!(state.health, expected);
            assert!(state.items.is_empty());
        }
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_good_collision_scores() {
        let mut state = quiet_state();
        on_player(&mut state, ItemKind::Good);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, GOOD_ITEM_POINTS);
        assert_eq!(state.health, INITIAL_HEALTH);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_missed_good_costs_health_bad_does_not() {
        let mut state = quiet_state();
        about_to_land(&mut state, ItemKind::Good);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.health, INITIAL_HEALTH - 1);
        assert!(state.items.is_empty());

        about_to_land(&mut state, ItemKind::Bad);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.health, INITIAL_HEALTH - 1);
        assert!(state.items.is_empty());
    }

    #[test]
    fn test_caught_item_on_floor_counts_once() {
        let mut state = quiet_state();
        // Overlaps the player and touches the floor in the same tick
        place(&mut state, ItemKind::Good, Vec2::new(520.0, 1960.0));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, GOOD_ITEM_POINTS);
        assert_eq!(state.health, INITIAL_HEALTH);
    }

    #[test]
    fn test_double_hit_at_one_health_ends_once() {
        let mut state = quiet_state();
        state.health = 1;
        state.score = 300;
        on_player(&mut state, ItemKind::Bad);
        about_to_land(&mut state, ItemKind::Good);
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.health, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        let overs: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .collect();
        assert_eq!(overs, vec![&GameEvent::GameOver { score: 300 }]);

        // Further ticks do nothing
        on_player(&mut state, ItemKind::Good);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 300);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = new_state(3);
        tick(&mut state, &TickInput::default(), SIM_DT);
        let items_before: Vec<Vec2> = state.items.iter().map(|i| i.sprite.pos).collect();
        let ticks = state.time_ticks;

        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT);
        assert_eq!(state.phase, GamePhase::Paused);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        let items_after: Vec<Vec2> = state.items.iter().map(|i| i.sprite.pos).collect();
        assert_eq!(items_before, items_after);
        assert_eq!(state.time_ticks, ticks);

        let resume = TickInput {
            resume: true,
            ..Default::default()
        };
        tick(&mut state, &resume, SIM_DT);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.time_ticks, ticks + 1);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Paused));
        assert!(events.contains(&GameEvent::Resumed));
    }

    #[test]
    fn test_first_tick_spawns() {
        let mut state = new_state(4);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.items.iter().any(|i| i.kind == ItemKind::Good));
    }

    #[test]
    fn test_tilt_moves_player() {
        let mut state = quiet_state();
        let input = TickInput {
            tilt_x: -1.0,
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);
        let p = state.player.as_ref().map(|p| p.sprite.pos.x).unwrap();
        assert!(p > 500.0);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state(99999);
        let mut b = new_state(99999);
        let inputs = [0.3, -0.5, 0.0, 1.2, -2.0];
        for i in 0..600 {
            let input = TickInput {
                tilt_x: inputs[i % inputs.len()],
                ..Default::default()
            };
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.health, b.health);
        assert_eq!(a.score, b.score);
        assert_eq!(a.items.len(), b.items.len());
        for (x, y) in a.items.iter().zip(&b.items) {
            assert_eq!(x.sprite.id, y.sprite.id);
            assert_eq!(x.sprite.pos, y.sprite.pos);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_health_and_score_monotonic(
            seed in any::<u64>(),
            tilts in proptest::collection::vec(-3.0f32..3.0, 200..600),
        ) {
            let mut state = new_state(seed);
            let mut health = state.health;
            let mut score = state.score;
            for tilt in tilts {
                let was_over = state.is_game_over();
                tick(&mut state, &TickInput { tilt_x: tilt, ..Default::default() }, SIM_DT);
                prop_assert!(state.health <= health);
                prop_assert!(state.score >= score);
                if was_over {
                    prop_assert_eq!(state.score, score);
                }
                health = state.health;
                score = state.score;
            }
        }
    }
}
