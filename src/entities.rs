/// All game entity types and the session state aggregate.
///
/// `GameState` owns every entity store and the formation state.  Entities
/// carry an `EntityId` so removal works by identity, never by index.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::compute::geometry::Rect;
use crate::config::{Difficulty, DifficultyParams, Settings};

pub const PLAYER_WIDTH: f32 = 50.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
/// Gap between the player's bottom edge and the field floor.
pub const PLAYER_FLOOR_GAP: f32 = 10.0;
pub const ENEMY_SIZE: f32 = 40.0;
pub const SHOT_WIDTH: f32 = 4.0;
pub const SHOT_HEIGHT: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

impl Owner {
    /// Vertical velocity sign: player shots travel up, enemy shots down.
    pub fn direction(self) -> f32 {
        match self {
            Owner::Player => -1.0,
            Owner::Enemy => 1.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: Owner,
    pub rect: Rect,
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Cosmetic tag, picked uniformly at random.  No gameplay effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    Yellow,
    Blue,
    Red,
    Violet,
}

impl EnemyVariant {
    pub const ALL: [EnemyVariant; 4] = [
        EnemyVariant::Yellow,
        EnemyVariant::Blue,
        EnemyVariant::Red,
        EnemyVariant::Violet,
    ];
}

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub variant: EnemyVariant,
    pub rect: Rect,
}

/// Shared horizontal motion of the enemy grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Formation {
    /// +1.0 (right) or -1.0 (left).
    pub direction: f32,
    pub speed: f32,
}

// ── Player & input ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
}

/// Which direction keys are currently held down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoldState {
    pub left: bool,
    pub right: bool,
}

impl HoldState {
    /// -1, 0 or +1.  Holding both directions cancels out.
    pub fn axis(&self) -> f32 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

// ── Session state ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Waiting for a difficulty choice.
    Idle,
    /// Drivers active, input attached.
    Running,
    /// Drivers stopped; holds the final score until reset.
    Terminated,
}

/// The session state aggregate.  Passed explicitly to every subsystem.
#[derive(Clone, Debug)]
pub struct GameState {
    pub settings: Settings,
    pub difficulty: Difficulty,
    pub params: DifficultyParams,
    pub player: Player,
    pub player_shots: Vec<Projectile>,
    pub enemy_shots: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub formation: Formation,
    pub hold: HoldState,
    pub score: u32,
    pub level: u32,
    pub lives: u32,
    /// Earliest timestamp at which the player may fire again.
    pub fire_ready_at_ms: u64,
    next_id: u32,
}

impl GameState {
    /// Fresh state for `difficulty`: no entities yet, counters at their
    /// initial values, player centred above the floor.
    pub fn new(settings: Settings, difficulty: Difficulty) -> Self {
        let params = difficulty.params();
        let player = Player {
            rect: Rect::new(
                (settings.field_width - PLAYER_WIDTH) / 2.0,
                settings.field_height - PLAYER_HEIGHT - PLAYER_FLOOR_GAP,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
        };
        Self {
            lives: settings.starting_lives,
            settings,
            difficulty,
            params,
            player,
            player_shots: Vec::new(),
            enemy_shots: Vec::new(),
            enemies: Vec::new(),
            formation: Formation {
                direction: 1.0,
                speed: params.enemy_speed,
            },
            hold: HoldState::default(),
            score: 0,
            level: 1,
            fire_ready_at_ms: 0,
            next_id: 0,
        }
    }

    pub fn field(&self) -> Vec2 {
        Vec2::new(self.settings.field_width, self.settings.field_height)
    }

    pub fn alloc_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

// ── Visual surface snapshot ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u32,
    pub level: u32,
    pub lives: u32,
}

/// Everything a renderer needs to draw one tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub field: Vec2,
    pub phase: SessionPhase,
    pub difficulty: Difficulty,
    pub player: Rect,
    pub enemies: Vec<(Rect, EnemyVariant)>,
    pub player_shots: Vec<Rect>,
    pub enemy_shots: Vec<Rect>,
    pub hud: Hud,
}

impl Frame {
    pub fn from_state(state: &GameState, phase: SessionPhase) -> Self {
        Self {
            field: state.field(),
            phase,
            difficulty: state.difficulty,
            player: state.player.rect,
            enemies: state.enemies.iter().map(|e| (e.rect, e.variant)).collect(),
            player_shots: state.player_shots.iter().map(|p| p.rect).collect(),
            enemy_shots: state.enemy_shots.iter().map(|p| p.rect).collect(),
            hud: Hud {
                score: state.score,
                level: state.level,
                lives: state.lives,
            },
        }
    }
}
