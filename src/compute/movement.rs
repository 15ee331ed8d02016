/// Per-tick position updates for the player, projectiles and the enemy
/// formation.

use glam::Vec2;

use crate::entities::{Enemy, Formation, GameState, Owner, Projectile};

/// Shift the player by one step in the held direction, clamped to the
/// field.  No-op when nothing (or both directions) is held.
pub fn advance_player(state: &mut GameState) {
    let axis = state.hold.axis();
    if axis == 0.0 {
        return;
    }
    let max_x = state.settings.field_width - state.player.rect.size.x;
    let rect = &mut state.player.rect;
    rect.pos.x = (rect.pos.x + axis * state.settings.player_step).clamp(0.0, max_x.max(0.0));
}

/// Move every projectile in `store` by `speed` in `owner`'s direction and
/// drop the ones that left the field: player shots once their top is above
/// 0, enemy shots once their bottom is below `field_height`.
///
/// Removal happens in a single `retain` pass after positions are updated,
/// so no entry is skipped or visited twice.
pub fn advance_projectiles(
    store: &mut Vec<Projectile>,
    owner: Owner,
    speed: f32,
    field_height: f32,
) {
    let step = Vec2::new(0.0, owner.direction() * speed);
    for shot in store.iter_mut() {
        shot.rect.translate(step);
    }
    store.retain(|shot| match owner {
        Owner::Player => shot.rect.top() >= 0.0,
        Owner::Enemy => shot.rect.bottom() <= field_height,
    });
}

/// Outcome of one formation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormationStep {
    /// At least one enemy touched a side boundary this tick.
    pub edge_contact: bool,
}

/// Slide the formation sideways.  On the first boundary contact of the
/// tick the direction flips and the whole grid drops one row, once.
/// Enemies never descend past `field_height - floor_margin`.
pub fn advance_formation(
    enemies: &mut [Enemy],
    formation: &mut Formation,
    field: Vec2,
    row_drop: f32,
    floor_margin: f32,
) -> FormationStep {
    let dx = formation.speed * formation.direction;
    for enemy in enemies.iter_mut() {
        enemy.rect.translate(Vec2::new(dx, 0.0));
    }

    let edge_contact = enemies
        .iter()
        .any(|e| e.rect.left() <= 0.0 || e.rect.right() >= field.x);

    if edge_contact {
        formation.direction = -formation.direction;
        let floor = field.y - floor_margin;
        for enemy in enemies.iter_mut() {
            enemy.rect.translate(Vec2::new(0.0, row_drop));
            let max_top = floor - enemy.rect.size.y;
            if enemy.rect.top() > max_top {
                enemy.rect.pos.y = max_top.max(0.0);
            }
        }
    }

    FormationStep { edge_contact }
}

/// The movement half of a tick: player, player shots, formation, enemy
/// shots, in that order.
pub fn advance_all(state: &mut GameState) -> FormationStep {
    let field = state.field();
    advance_player(state);
    let player_speed = state.params.bullet_speed;
    advance_projectiles(&mut state.player_shots, Owner::Player, player_speed, field.y);
    let step = advance_formation(
        &mut state.enemies,
        &mut state.formation,
        field,
        state.settings.row_drop,
        state.settings.floor_margin,
    );
    let enemy_speed = state.settings.enemy_bullet_speed;
    advance_projectiles(&mut state.enemy_shots, Owner::Enemy, enemy_speed, field.y);
    step
}
