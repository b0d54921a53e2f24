//! Per-mode difficulty tables.
//!
//! The four modes share every rule; they only differ in the numbers below.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameMode {
    Normal,
    Hard,
    Secret,
    Dodger,
}

impl GameMode {
    pub const ALL: [GameMode; 4] = [GameMode::Normal, GameMode::Hard, GameMode::Secret, GameMode::Dodger];

    pub fn config(self) -> ModeConfig {
        match self {
            GameMode::Normal => ModeConfig {
                mode: self,
                label: "NORMAL",
                storage_prefix: "normalMode",
                obstacle_wave_period_ms: 7000,
                wave_warning_ms: 3000,
                power_up_period_ms: 15000,
                obstacle_velocity: OBSTACLE_VELOCITY_BASE,
                initial_obstacles: 5,
                initial_speed_power_ups: 2,
                initial_slowdown_power_ups: 1,
                wave_obstacle_count: 2,
                shield_milestone: ShieldMilestone { threshold: 4, interval: 2 },
                ship_base_speed: 210.0,
                min_spawn_distance: 200.0,
                ..ModeConfig::shared()
            },
            GameMode::Hard => ModeConfig {
                mode: self,
                label: "HARD",
                storage_prefix: "hardMode",
                power_up_period_ms: 20000,
                obstacle_velocity: OBSTACLE_VELOCITY_BOOSTED,
                ship_base_speed: 250.0,
                ..ModeConfig::shared()
            },
            GameMode::Secret => ModeConfig {
                mode: self,
                label: "SECRET",
                storage_prefix: "secretMode",
                power_up_period_ms: 8000,
                obstacle_velocity: OBSTACLE_VELOCITY_BOOSTED,
                ship_base_speed: 250.0,
                ..ModeConfig::shared()
            },
            GameMode::Dodger => ModeConfig {
                mode: self,
                label: "DODGER",
                storage_prefix: "dodgerMode",
                power_up_period_ms: 20000,
                ..ModeConfig::shared()
            },
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Normal => write!(f, "normal"),
            GameMode::Hard => write!(f, "hard"),
            GameMode::Secret => write!(f, "secret"),
            GameMode::Dodger => write!(f, "dodger"),
        }
    }
}

impl FromStr for GameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(GameMode::Normal),
            "hard" => Ok(GameMode::Hard),
            "secret" => Ok(GameMode::Secret),
            "dodger" => Ok(GameMode::Dodger),
            other => Err(format!("unknown game mode `{other}` (expected normal, hard, secret or dodger)")),
        }
    }
}

/// Inclusive velocity sampling ranges. The vertical range is a magnitude;
/// its sign comes from the spawn edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VelocityRange {
    pub x_min: f32,
    pub x_max: f32,
    pub y_min: f32,
    pub y_max: f32,
}

pub const OBSTACLE_VELOCITY_BASE: VelocityRange = VelocityRange {
    x_min: -180.0,
    x_max: 120.0,
    y_min: 120.0,
    y_max: 180.0,
};

pub const OBSTACLE_VELOCITY_BOOSTED: VelocityRange = VelocityRange {
    x_min: -300.0,
    x_max: 240.0,
    y_min: 240.0,
    y_max: 300.0,
};

pub const POWER_UP_VELOCITY: VelocityRange = VelocityRange {
    x_min: -100.0,
    x_max: 100.0,
    y_min: 100.0,
    y_max: 200.0,
};

/// Waves on which a bonus shield power-up is dropped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShieldMilestone {
    pub threshold: u32,
    pub interval: u32,
}

impl ShieldMilestone {
    pub fn is_reached(&self, wave: u32) -> bool {
        wave >= self.threshold && (wave - self.threshold) % self.interval.max(1) == 0
    }
}

/// Immutable parameters of one game mode.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeConfig {
    pub mode: GameMode,
    pub label: &'static str,
    /// Prefix of the persisted keys, e.g. `normalModeHighScore`.
    pub storage_prefix: &'static str,
    pub obstacle_wave_period_ms: u64,
    pub wave_warning_ms: u64,
    pub power_up_period_ms: u64,
    pub obstacle_velocity: VelocityRange,
    pub power_up_velocity: VelocityRange,
    pub initial_obstacles: usize,
    pub initial_speed_power_ups: usize,
    pub initial_slowdown_power_ups: usize,
    pub initial_shield_power_ups: usize,
    pub wave_obstacle_count: usize,
    pub shield_milestone: ShieldMilestone,
    pub ship_base_speed: f32,
    pub speed_boost_factor: f32,
    pub shield_speed_factor: f32,
    pub effect_duration_ms: u64,
    pub min_spawn_distance: f32,
}

impl ModeConfig {
    /// Values common to the hard-family modes; Normal overrides most of them.
    fn shared() -> Self {
        Self {
            mode: GameMode::Hard,
            label: "",
            storage_prefix: "",
            obstacle_wave_period_ms: 7000,
            wave_warning_ms: 3000,
            power_up_period_ms: 20000,
            obstacle_velocity: OBSTACLE_VELOCITY_BASE,
            power_up_velocity: POWER_UP_VELOCITY,
            initial_obstacles: 6,
            initial_speed_power_ups: 1,
            initial_slowdown_power_ups: 0,
            initial_shield_power_ups: 0,
            wave_obstacle_count: 3,
            shield_milestone: ShieldMilestone { threshold: 5, interval: 5 },
            ship_base_speed: 210.0,
            speed_boost_factor: 1.6,
            shield_speed_factor: 0.7,
            effect_duration_ms: 5000,
            min_spawn_distance: 220.0,
        }
    }

    pub fn high_score_key(&self) -> String {
        format!("{}HighScore", self.storage_prefix)
    }

    pub fn highest_wave_key(&self) -> String {
        format!("{}HighestWave", self.storage_prefix)
    }
}
