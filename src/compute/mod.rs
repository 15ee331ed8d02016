/// Pure game-logic subsystems.
///
/// Every function takes the `GameState` aggregate explicitly (plus an RNG or
/// event sink where needed) so each subsystem can be exercised without a
/// terminal or timers.  Randomness only enters through the injected RNG.

pub mod combat;
pub mod geometry;
pub mod movement;
pub mod progression;

use rand::Rng;

use crate::entities::GameState;
use crate::events::EventSink;

pub use combat::{fire_from_enemy, fire_from_player, resolve_collisions, CombatOutcome};
pub use geometry::{overlaps, Rect};
pub use movement::{advance_all, advance_formation, advance_player, advance_projectiles};
pub use progression::{check_wave_clear, spawn_wave, wave_columns};

/// What happened during one fast tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    pub combat: CombatOutcome,
    pub wave_cleared: bool,
}

/// One fast tick: movement, then combat, then progression.  Progression is
/// skipped once the player is out of lives.
pub fn tick(state: &mut GameState, rng: &mut impl Rng, sink: &mut impl EventSink) -> TickReport {
    advance_all(state);
    let combat = resolve_collisions(state, sink);
    let wave_cleared = !combat.out_of_lives && check_wave_clear(state, rng, sink);
    TickReport {
        combat,
        wave_cleared,
    }
}
