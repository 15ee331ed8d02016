/// Difficulty table and tunable settings.
///
/// `Difficulty` is picked once before a session starts.  `Settings` carries
/// every other knob; its defaults reproduce the classic arcade timings and
/// can be overridden from a JSON file.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::entities::ENEMY_SIZE;
use crate::error::ConfigError;

// ── Difficulty ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Speeds derived from the selected difficulty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyParams {
    /// Horizontal formation speed, units per tick.
    pub enemy_speed: f32,
    /// Upward speed of player shots, units per tick.
    pub bullet_speed: f32,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn params(self) -> DifficultyParams {
        match self {
            Difficulty::Easy => DifficultyParams {
                enemy_speed: 1.5,
                bullet_speed: 12.0,
            },
            Difficulty::Medium => DifficultyParams {
                enemy_speed: 2.5,
                bullet_speed: 14.0,
            },
            Difficulty::Hard => DifficultyParams {
                enemy_speed: 3.5,
                bullet_speed: 16.0,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "med" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            other => Err(ConfigError::UnknownDifficulty(other.to_string())),
        }
    }
}

// ── Settings ─────────────────────────────────────────────────────────────────

/// Field width at or below which the wave uses the narrow density table.
pub const NARROW_FIELD_MAX_WIDTH: f32 = 600.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Play-field ===
    pub field_width: f32,
    pub field_height: f32,

    // === Timing (milliseconds) ===
    pub tick_ms: u64,
    pub enemy_fire_ms: u64,
    pub fire_cooldown_ms: u64,

    // === Movement ===
    /// Player horizontal step per tick while a direction is held.
    pub player_step: f32,
    /// Downward speed of enemy shots; not affected by difficulty.
    pub enemy_bullet_speed: f32,
    /// Vertical drop applied to the whole formation on an edge contact.
    pub row_drop: f32,
    /// Distance kept between the lowest enemy and the field floor.
    pub floor_margin: f32,

    // === Wave layout ===
    pub rows: u32,
    pub cell_spacing: f32,
    pub grid_origin_x: f32,
    pub grid_origin_y: f32,

    // === Session ===
    pub starting_lives: u32,
    pub points_per_enemy: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            field_width: 800.0,
            field_height: 600.0,

            tick_ms: 100,
            enemy_fire_ms: 2000,
            fire_cooldown_ms: 300,

            player_step: 10.0,
            enemy_bullet_speed: 10.0,
            row_drop: 15.0,
            floor_margin: 100.0,

            rows: 4,
            cell_spacing: 50.0,
            grid_origin_x: 10.0,
            grid_origin_y: 0.0,

            starting_lives: 3,
            points_per_enemy: 100,
        }
    }
}

impl Settings {
    /// Read settings from a JSON file.  Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let settings: Settings = serde_json::from_str(&text)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("field_width", self.field_width),
            ("field_height", self.field_height),
            ("player_step", self.player_step),
            ("enemy_bullet_speed", self.enemy_bullet_speed),
            ("cell_spacing", self.cell_spacing),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")));
            }
        }
        if self.row_drop < 0.0 || self.floor_margin < 0.0 {
            return Err(ConfigError::Invalid("row_drop and floor_margin must not be negative".into()));
        }
        if self.tick_ms == 0 || self.enemy_fire_ms == 0 {
            return Err(ConfigError::Invalid("driver periods must be non-zero".into()));
        }
        if self.rows == 0 || self.starting_lives == 0 {
            return Err(ConfigError::Invalid("rows and starting_lives must be at least 1".into()));
        }
        self.check_wave_fits()
    }

    /// A cap-width wave must clear both side boundaries by more than one
    /// step at the fastest difficulty.
    fn check_wave_fits(&self) -> Result<(), ConfigError> {
        let max_speed = Difficulty::ALL
            .iter()
            .map(|d| d.params().enemy_speed)
            .fold(0.0_f32, f32::max);
        let cap = self.viewport().column_cap();
        let right = self.grid_origin_x + (cap - 1) as f32 * self.cell_spacing + ENEMY_SIZE;
        if right + max_speed >= self.field_width {
            return Err(ConfigError::Invalid(format!(
                "field_width {} too narrow for a {cap}-column wave (needs more than {})",
                self.field_width,
                right + max_speed
            )));
        }
        if self.grid_origin_x <= max_speed {
            return Err(ConfigError::Invalid(format!(
                "grid_origin_x must exceed the top enemy speed {max_speed}, got {}",
                self.grid_origin_x
            )));
        }
        Ok(())
    }

    pub fn viewport(&self) -> ViewportClass {
        if self.field_width <= NARROW_FIELD_MAX_WIDTH {
            ViewportClass::Narrow
        } else {
            ViewportClass::Wide
        }
    }
}

// ── Viewport density ─────────────────────────────────────────────────────────

/// Display-adaptive wave density.  Not a difficulty mechanic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportClass {
    Narrow,
    Wide,
}

impl ViewportClass {
    fn base_columns(self) -> u32 {
        match self {
            ViewportClass::Narrow => 5,
            ViewportClass::Wide => 8,
        }
    }

    pub fn column_cap(self) -> u32 {
        match self {
            ViewportClass::Narrow => 10,
            ViewportClass::Wide => 12,
        }
    }

    /// `min(base + level, cap)`
    pub fn columns(self, level: u32) -> u32 {
        (self.base_columns() + level).min(self.column_cap())
    }
}
