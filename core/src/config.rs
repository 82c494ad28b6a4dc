use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;
use crate::types::Seed;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Tunable gameplay parameters. Missing fields in a RON file fall back to the defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub tick_rate: u32,
    pub arena_width: f64,
    pub arena_height: f64,
    pub ground_margin: f64,
    pub gravity: f64,
    pub move_speed: f64,
    pub jump_power: f64,
    pub max_hp: i32,
    pub max_stamina: f64,
    pub stamina_regen: f64,
    pub attack_damage: i32,
    pub attack_range: f64,
    /// Probability in [0, 1] that a melee hit crits.
    pub crit_chance: f64,
    /// Probability in [0, 1] that a crit-special weapon doubles its damage.
    pub weapon_crit_chance: f64,
    pub attack_active_ms: u32,
    pub combo_window_ms: u32,
    pub victory_linger_ms: u32,
    pub weapon_drop_interval_ticks: u32,
    pub weapon_lifetime_ticks: i32,
    pub pickup_distance: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            ground_margin: GROUND_MARGIN,
            gravity: GRAVITY,
            move_speed: MOVE_SPEED,
            jump_power: JUMP_POWER,
            max_hp: MAX_HP,
            max_stamina: MAX_STAMINA,
            stamina_regen: STAMINA_REGEN,
            attack_damage: ATTACK_DAMAGE,
            attack_range: ATTACK_RANGE,
            crit_chance: CRIT_CHANCE,
            weapon_crit_chance: WEAPON_CRIT_CHANCE,
            attack_active_ms: ATTACK_ACTIVE_MS,
            combo_window_ms: COMBO_WINDOW_MS,
            victory_linger_ms: VICTORY_LINGER_MS,
            weapon_drop_interval_ticks: WEAPON_DROP_INTERVAL_TICKS,
            weapon_lifetime_ticks: WEAPON_LIFETIME_TICKS,
            pickup_distance: PICKUP_DISTANCE,
        }
    }
}

impl Tuning {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = ron::from_str(s)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn to_ron_string(&self) -> String {
        // Serializing plain numbers cannot fail.
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive".into()));
        }
        for (name, v) in [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("ground_margin", self.ground_margin),
            ("gravity", self.gravity),
            ("move_speed", self.move_speed),
            ("jump_power", self.jump_power),
            ("max_stamina", self.max_stamina),
            ("stamina_regen", self.stamina_regen),
            ("attack_range", self.attack_range),
            ("crit_chance", self.crit_chance),
            ("weapon_crit_chance", self.weapon_crit_chance),
            ("pickup_distance", self.pickup_distance),
        ] {
            if !v.is_finite() {
                return Err(ConfigError::Invalid(format!("{name} must be finite, got {v}")));
            }
        }
        for (name, v) in [
            ("ground_margin", self.ground_margin),
            ("gravity", self.gravity),
            ("move_speed", self.move_speed),
            ("jump_power", self.jump_power),
            ("stamina_regen", self.stamina_regen),
            ("attack_range", self.attack_range),
            ("pickup_distance", self.pickup_distance),
        ] {
            if v < 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must not be negative, got {v}")));
            }
        }
        if self.arena_width <= COMBATANT_WIDTH + 2.0 * WEAPON_SPAWN_MARGIN {
            return Err(ConfigError::Invalid(format!(
                "arena_width {} is too narrow",
                self.arena_width
            )));
        }
        if self.arena_height - self.ground_margin <= COMBATANT_HEIGHT {
            return Err(ConfigError::Invalid(format!(
                "arena_height {} leaves no room above the ground",
                self.arena_height
            )));
        }
        if self.max_hp <= 0 || self.max_stamina <= 0.0 {
            return Err(ConfigError::Invalid("max_hp and max_stamina must be positive".into()));
        }
        for (name, p) in [
            ("crit_chance", self.crit_chance),
            ("weapon_crit_chance", self.weapon_crit_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("{name} must be within [0, 1], got {p}")));
            }
        }
        if self.weapon_lifetime_ticks <= 0 {
            return Err(ConfigError::Invalid("weapon_lifetime_ticks must be positive".into()));
        }
        Ok(())
    }

    /// Convert a wall-clock duration into whole ticks at the configured rate.
    pub fn ms_to_ticks(&self, ms: u32) -> u32 {
        (ms as u64 * self.tick_rate as u64 / 1000) as u32
    }

    pub fn attack_active_ticks(&self) -> i32 {
        self.ms_to_ticks(self.attack_active_ms) as i32
    }

    pub fn combo_window_ticks(&self) -> u64 {
        self.ms_to_ticks(self.combo_window_ms) as u64
    }

    pub fn victory_linger_ticks(&self) -> u32 {
        self.ms_to_ticks(self.victory_linger_ms)
    }

    /// y of the ground line that feet rest on.
    pub fn ground_y(&self) -> f64 {
        self.arena_height - self.ground_margin
    }
}

// ── Match config ────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub seed: Seed,
    pub tuning: Tuning,
    pub hardcore: bool,
    pub survival: bool,
    /// Per slot: whether the AI drives that combatant.
    pub ai_enabled: [bool; 2],
}

/// Two human-controlled combatants, no modes, default tuning.
pub fn default_config(seed: Seed) -> MatchConfig {
    MatchConfig {
        seed,
        tuning: Tuning::default(),
        hardcore: false,
        survival: false,
        ai_enabled: [false, false],
    }
}
