/// Wave clear detection and enemy grid generation.

use rand::seq::SliceRandom;
use rand::Rng;

use super::geometry::Rect;
use crate::entities::{Enemy, EnemyVariant, GameState, ENEMY_SIZE};
use crate::events::{EventSink, GameEvent};

/// Number of columns for `level` on the current field.
pub fn wave_columns(state: &GameState, level: u32) -> u32 {
    state.settings.viewport().columns(level)
}

/// Replace the enemy store with a fresh `rows × columns` lattice for the
/// current level.  Formation direction and speed are left as they are.
pub fn spawn_wave(state: &mut GameState, rng: &mut impl Rng) {
    let rows = state.settings.rows;
    let cols = wave_columns(state, state.level);
    let spacing = state.settings.cell_spacing;
    let (origin_x, origin_y) = (state.settings.grid_origin_x, state.settings.grid_origin_y);

    state.enemies.clear();
    for row in 0..rows {
        for col in 0..cols {
            let id = state.alloc_id();
            let variant = *EnemyVariant::ALL
                .choose(rng)
                .unwrap_or(&EnemyVariant::Yellow);
            state.enemies.push(Enemy {
                id,
                variant,
                rect: Rect::new(
                    origin_x + col as f32 * spacing,
                    origin_y + row as f32 * spacing,
                    ENEMY_SIZE,
                    ENEMY_SIZE,
                ),
            });
        }
    }
    log::debug!("level {}: spawned {}x{} wave", state.level, rows, cols);
}

/// Advance to the next level when the wave is empty.  Returns `true` when a
/// new wave was generated.
pub fn check_wave_clear(state: &mut GameState, rng: &mut impl Rng, sink: &mut impl EventSink) -> bool {
    if !state.enemies.is_empty() {
        return false;
    }
    state.level += 1;
    spawn_wave(state, rng);
    log::info!("wave cleared, now level {} ({} enemies)", state.level, state.enemies.len());
    sink.emit(GameEvent::WaveCleared {
        new_level: state.level,
    });
    true
}
