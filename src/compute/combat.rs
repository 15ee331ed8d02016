/// Projectile spawning and collision resolution.

use std::collections::HashSet;

use rand::Rng;

use super::geometry::{centered_x, overlaps, Rect};
use crate::entities::{EntityId, GameState, Owner, Projectile, SHOT_HEIGHT, SHOT_WIDTH};
use crate::events::{EventSink, GameEvent};

// ── Spawning ─────────────────────────────────────────────────────────────────

/// Fire from the player's nose.  Dropped (returns `false`) while the
/// cooldown window opened by the previous shot is still running.
pub fn fire_from_player(state: &mut GameState, now_ms: u64, sink: &mut impl EventSink) -> bool {
    if now_ms < state.fire_ready_at_ms {
        log::trace!("fire dropped, cooldown until {}ms", state.fire_ready_at_ms);
        return false;
    }
    let player = state.player.rect;
    let id = state.alloc_id();
    state.player_shots.push(Projectile {
        id,
        owner: Owner::Player,
        rect: Rect::new(
            centered_x(player.center_x(), SHOT_WIDTH),
            player.top(),
            SHOT_WIDTH,
            SHOT_HEIGHT,
        ),
    });
    state.fire_ready_at_ms = now_ms + state.settings.fire_cooldown_ms;
    sink.emit(GameEvent::Fire);
    true
}

/// Pick one enemy uniformly at random and fire from its underside.
/// Returns `false` when there is nobody left to shoot.
pub fn fire_from_enemy(state: &mut GameState, rng: &mut impl Rng, sink: &mut impl EventSink) -> bool {
    if state.enemies.is_empty() {
        return false;
    }
    let shooter = state.enemies[rng.gen_range(0..state.enemies.len())].rect;
    let id = state.alloc_id();
    state.enemy_shots.push(Projectile {
        id,
        owner: Owner::Enemy,
        rect: Rect::new(
            centered_x(shooter.center_x(), SHOT_WIDTH),
            shooter.bottom(),
            SHOT_WIDTH,
            SHOT_HEIGHT,
        ),
    });
    sink.emit(GameEvent::EnemyFire);
    true
}

// ── Collision resolution ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CombatOutcome {
    pub enemies_destroyed: u32,
    pub player_hits: u32,
    /// Lives reached zero during this pass.
    pub out_of_lives: bool,
}

/// Resolve shot/enemy and shot/player overlaps.
///
/// Both passes scan read-only and record the ids to drop, then compact the
/// stores afterwards.  A player shot commits to the first live enemy it
/// overlaps (in spawn order) and is consumed there; an enemy already claimed
/// by an earlier shot is not hit again.
pub fn resolve_collisions(state: &mut GameState, sink: &mut impl EventSink) -> CombatOutcome {
    let mut outcome = CombatOutcome::default();

    // ── 1. Player shots ↔ enemies ────────────────────────────────────────────
    let mut spent_shots: HashSet<EntityId> = HashSet::new();
    let mut killed: HashSet<EntityId> = HashSet::new();

    for shot in &state.player_shots {
        let target = state
            .enemies
            .iter()
            .find(|e| !killed.contains(&e.id) && overlaps(&shot.rect, &e.rect));
        if let Some(enemy) = target {
            killed.insert(enemy.id);
            spent_shots.insert(shot.id);
        }
    }

    for _ in 0..killed.len() {
        state.score += state.settings.points_per_enemy;
        outcome.enemies_destroyed += 1;
        sink.emit(GameEvent::EnemyDestroyed);
    }
    if !killed.is_empty() {
        log::debug!("{} enemies destroyed, score {}", killed.len(), state.score);
    }
    state.enemies.retain(|e| !killed.contains(&e.id));
    state.player_shots.retain(|s| !spent_shots.contains(&s.id));

    // ── 2. Enemy shots ↔ player ──────────────────────────────────────────────
    let player = state.player.rect;
    let mut hits: HashSet<EntityId> = HashSet::new();

    for shot in &state.enemy_shots {
        if state.lives == 0 {
            break;
        }
        if overlaps(&shot.rect, &player) {
            hits.insert(shot.id);
            state.lives -= 1;
            outcome.player_hits += 1;
            sink.emit(GameEvent::PlayerHit {
                lives_left: state.lives,
            });
            log::debug!("player hit, {} lives left", state.lives);
        }
    }
    state.enemy_shots.retain(|s| !hits.contains(&s.id));

    outcome.out_of_lives = state.lives == 0;
    outcome
}
