//! Game rules and tuning
//!
//! One struct covers every variant of the game: movement, world generation,
//! boss encounters and projectiles. Loaded from JSON, every field optional.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving config and score files
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid ruleset: {0}")]
    Invalid(String),
}

/// Named rule presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RulesetPreset {
    /// The reference game
    #[default]
    Classic,
    /// Faster movement and double jump
    Arcade,
    /// Late, slow-firing bosses
    Practice,
}

impl RulesetPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            RulesetPreset::Classic => "Classic",
            RulesetPreset::Arcade => "Arcade",
            RulesetPreset::Practice => "Practice",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(RulesetPreset::Classic),
            "arcade" => Some(RulesetPreset::Arcade),
            "practice" | "easy" => Some(RulesetPreset::Practice),
            _ => None,
        }
    }
}

/// Complete set of gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    /// Simulation frames per second
    pub tick_rate: u32,

    // === Arena ===
    pub screen_width: f32,
    pub screen_height: f32,
    /// Height of the ground strip at the bottom of the screen
    pub ground_height: f32,

    // === Player ===
    pub player_size: f32,
    pub player_start_x: f32,
    /// Start height measured up from the screen bottom
    pub player_start_lift: f32,
    /// Horizontal speed (px/frame)
    pub move_speed: f32,
    /// Downward acceleration (px/frame²)
    pub gravity: f32,
    /// Upward impulse on jump (px/frame)
    pub jump_force: f32,
    /// Allow one extra jump while airborne
    pub double_jump: bool,
    /// Screen x beyond which motion scrolls the world instead
    pub scroll_threshold: f32,
    /// Stop the player at the left screen edge
    pub clamp_left_edge: bool,
    /// Distance units per score point
    pub distance_per_point: u64,

    // === World generation ===
    pub lookahead: f32,
    pub platform_gap_min: i32,
    pub platform_gap_max: i32,
    pub platform_bonus_chance: f64,
    pub initial_extra_chance: f64,
    pub obstacle_gap: f32,
    pub obstacle_bonus_chance: f64,
    pub obstacle_speed_min: f32,
    pub obstacle_speed_max: f32,
    pub obstacle_range_min: i32,
    pub obstacle_range_max: i32,
    /// Drop entities this far behind the player (None keeps everything)
    pub evict_behind: Option<f32>,

    // === Bosses ===
    pub bosses_enabled: bool,
    /// Score at which the first boss appears
    pub boss_first_score: u64,
    /// Score added to the threshold after each spawn
    pub boss_score_interval: u64,
    /// Warning starts this many points before a spawn
    pub boss_warning_threshold: u64,
    pub boss_warning_ms: u64,
    pub boss_spawn_ahead: f32,
    pub boss_max_health: u32,
    pub boss_burst_shots: u32,
    pub boss_shot_interval_ms: u64,
    pub boss_burst_cooldown_ms: u64,
    pub boss_defeat_bonus: u64,

    // === Player weapon ===
    pub bullet_speed: f32,
    pub shot_cooldown_ms: u64,
}

impl Default for Ruleset {
    fn default() -> Self {
        Self {
            tick_rate: 120,

            screen_width: 1280.0,
            screen_height: 720.0,
            ground_height: 50.0,

            player_size: 100.0,
            player_start_x: 100.0,
            player_start_lift: 200.0,
            move_speed: 5.0,
            gravity: 1.5,
            jump_force: 30.0,
            double_jump: false,
            scroll_threshold: 400.0,
            clamp_left_edge: true,
            distance_per_point: 10,

            lookahead: crate::consts::LOOKAHEAD,
            platform_gap_min: 250,
            platform_gap_max: 800,
            platform_bonus_chance: 0.3,
            initial_extra_chance: 0.4,
            obstacle_gap: 400.0,
            obstacle_bonus_chance: 0.0,
            obstacle_speed_min: 2.0,
            obstacle_speed_max: 4.0,
            obstacle_range_min: 100,
            obstacle_range_max: 300,
            evict_behind: Some(3000.0),

            bosses_enabled: true,
            boss_first_score: 200,
            boss_score_interval: 200,
            boss_warning_threshold: 20,
            boss_warning_ms: 3000,
            boss_spawn_ahead: 600.0,
            boss_max_health: 10,
            boss_burst_shots: 5,
            boss_shot_interval_ms: 200,
            boss_burst_cooldown_ms: 2500,
            boss_defeat_bonus: 100,

            bullet_speed: 12.0,
            shot_cooldown_ms: 700,
        }
    }
}

impl Ruleset {
    /// Create a ruleset from a preset
    pub fn from_preset(preset: RulesetPreset) -> Self {
        let mut rules = Self::default();
        rules.apply_preset(preset);
        rules
    }

    /// Overwrite the preset-dependent fields
    pub fn apply_preset(&mut self, preset: RulesetPreset) {
        match preset {
            RulesetPreset::Classic => {}
            RulesetPreset::Arcade => {
                self.move_speed = 7.0;
                self.double_jump = true;
                self.obstacle_bonus_chance = 0.25;
                self.boss_burst_cooldown_ms = 2000;
            }
            RulesetPreset::Practice => {
                self.boss_first_score = 1000;
                self.boss_score_interval = 1000;
                self.boss_max_health = 5;
                self.boss_shot_interval_ms = 400;
                self.boss_burst_shots = 3;
                self.boss_burst_cooldown_ms = 4000;
                self.shot_cooldown_ms = 400;
            }
        }
    }

    /// Ground surface y (screen space, constant)
    pub fn ground_y(&self) -> f32 {
        self.screen_height - self.ground_height
    }

    /// Player spawn position (screen space)
    pub fn player_start(&self) -> Vec2 {
        Vec2::new(self.player_start_x, self.screen_height - self.player_start_lift)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.tick_rate == 0 {
            return invalid("tick_rate must be positive");
        }
        if self.move_speed <= 0.0 || self.gravity <= 0.0 || self.jump_force <= 0.0 {
            return invalid("move_speed, gravity and jump_force must be positive");
        }
        // Scroll offset is integral; speed must be too
        if self.move_speed.fract() != 0.0 {
            return invalid("move_speed must be a whole number");
        }
        if self.player_size <= 0.0 || self.ground_height < 0.0 {
            return invalid("player_size must be positive");
        }
        if self.ground_y() <= self.player_size {
            return invalid("screen too short for the player");
        }
        if self.platform_gap_min > self.platform_gap_max
            || self.obstacle_range_min > self.obstacle_range_max
            || self.obstacle_speed_min > self.obstacle_speed_max
        {
            return invalid("generation ranges must have min <= max");
        }
        if self.platform_gap_min <= 0 || self.obstacle_gap <= 0.0 {
            return invalid("generation gaps must be positive");
        }
        if self.lookahead <= 0.0 {
            return invalid("lookahead must be positive");
        }
        if self.evict_behind.is_some_and(|d| d < 0.0) {
            return invalid("evict_behind must not be negative");
        }
        // Patrol windows need start <= end and forward progress
        if self.obstacle_range_min < 0 {
            return invalid("obstacle ranges must not be negative");
        }
        if self.obstacle_speed_min <= 0.0 {
            return invalid("obstacle speeds must be positive");
        }
        let chances = [
            self.platform_bonus_chance,
            self.initial_extra_chance,
            self.obstacle_bonus_chance,
        ];
        if chances.iter().any(|p| !(0.0..=1.0).contains(p)) {
            return invalid("chances must be within [0, 1]");
        }
        if self.distance_per_point == 0 {
            return invalid("distance_per_point must be positive");
        }
        if self.bosses_enabled
            && (self.boss_score_interval == 0
                || self.boss_burst_shots == 0
                || self.boss_max_health == 0)
        {
            return invalid("boss interval, burst shots and health must be positive");
        }
        Ok(())
    }

    /// Parse and validate a JSON ruleset
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let rules: Self = serde_json::from_str(json)?;
        rules.validate()?;
        Ok(rules)
    }

    /// Load a ruleset file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let rules = Self::from_json(&json)?;
        log::info!("Loaded ruleset from {}", path.display());
        Ok(rules)
    }

    /// Load a ruleset file, falling back to defaults on any error
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(rules) => rules,
            Err(e) => {
                log::warn!("Using default ruleset: {}", e);
                Self::default()
            }
        }
    }

    /// Write the ruleset as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Ruleset saved to {}", path.display());
        Ok(())
    }
}
