//! Pose Runner - a gesture-controlled side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, world generation, bosses, projectiles)
//! - `input`: Gesture/keyboard signal classification
//! - `platform`: Camera polling and frame clock
//! - `ruleset`: Data-driven game rules (replaces per-variant constants)
//! - `highscores`: Leaderboard persistence

pub mod highscores;
pub mod input;
pub mod platform;
pub mod ruleset;
pub mod sim;

pub use highscores::HighScores;
pub use input::InputSignal;
pub use ruleset::{ConfigError, Ruleset, RulesetPreset};

/// Game configuration constants
pub mod consts {
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// How far ahead of the player content must exist (world units)
    pub const LOOKAHEAD: f32 = 2000.0;

    /// Number of cosmetic platform texture variants
    pub const PLATFORM_VARIANTS: u8 = 4;

    /// Obstacle footprint (square)
    pub const OBSTACLE_SIZE: f32 = 45.0;

    /// Boss footprint (square)
    pub const BOSS_SIZE: f32 = 540.0;
    /// Bob amplitude in pixels
    pub const BOSS_BOB_AMPLITUDE: f32 = 10.0;
    /// Bob period divisor (ms)
    pub const BOSS_BOB_PERIOD_MS: f32 = 700.0;
    /// Angry face duration after each shot (ms)
    pub const BOSS_ANGRY_MS: u64 = 400;
    /// Boss only fires when the player is closer than this (world units)
    pub const BOSS_FIRE_RANGE: f32 = 800.0;

    /// Fireball footprint and kinematics
    pub const FIREBALL_SIZE: f32 = 20.0;
    pub const FIREBALL_SPEED: f32 = 9.0;
    pub const FIREBALL_GRAVITY: f32 = 0.3;
    /// Vertical aim divisor (vy = dy / lead)
    pub const FIREBALL_AIM_LEAD: f32 = 80.0;

    /// Bullet footprint
    pub const BULLET_SIZE: f32 = 40.0;
}

/// Milliseconds elapsed after `ticks` frames at `tick_rate` Hz
#[inline]
pub fn ticks_to_ms(ticks: u64, tick_rate: u32) -> u64 {
    ticks * 1000 / tick_rate.max(1) as u64
}
