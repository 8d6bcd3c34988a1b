//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per frame, clock derived from the tick counter
//! - Seeded RNG only
//! - Stable iteration order (generation order, world x ascending)
//! - No rendering or platform dependencies

pub mod boss;
pub mod collision;
pub mod physics;
pub mod state;
pub mod tick;
pub mod view;
pub mod worldgen;

pub use collision::Rect;
pub use state::{
    Boss, BossPhase, GameEvent, GameOverCause, GamePhase, GameState, Obstacle, Platform, Player,
    Projectile, ProjectileKind,
};
pub use tick::{TickInput, tick};
pub use view::FrameView;
