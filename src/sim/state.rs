//! Game state and core simulation types
//!
//! `GameState` is the single aggregate owned by the frame loop. Every
//! subsystem receives it by `&mut` for the duration of a tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::ruleset::Ruleset;
use crate::ticks_to_ms;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Run ended, simulation frozen until restart
    GameOver,
}

/// What ended the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    Obstacle,
    Boss,
    Fireball,
}

/// Things that happened during a tick, for audio/visual feedback
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BossWarning { spawn_score: u64 },
    BossSpawned { id: u32, world_x: f32 },
    BossHit { id: u32, health: u32 },
    BossDefeated { id: u32 },
    BulletFired,
    FireballFired { boss_id: u32 },
    GameOver { cause: GameOverCause },
    Restarted,
}

/// The player character. Position is in screen space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel_y: f32,
    pub on_ground: bool,
    pub size: f32,
    /// Jump signal level on the previous frame (for air-jump edges)
    #[serde(default)]
    pub jump_held: bool,
    /// Air jumps spent since last touching ground
    #[serde(default)]
    pub air_jumps_used: u8,
}

impl Player {
    pub fn new(start: Vec2, size: f32) -> Self {
        Self {
            pos: start,
            vel_y: 0.0,
            on_ground: false,
            size,
            jump_held: false,
            air_jumps_used: 0,
        }
    }

    /// Bounding box in screen space
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, self.size, self.size)
    }

    /// Bounding box in world space
    pub fn world_rect(&self, scroll_offset: i32) -> Rect {
        self.rect().translate_x(-(scroll_offset as f32))
    }

    /// Left edge in world space
    pub fn world_x(&self, scroll_offset: i32) -> f32 {
        self.pos.x - scroll_offset as f32
    }
}

/// A static platform (world space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    pub rect: Rect,
    /// Texture variant (cosmetic only)
    pub variant: u8,
}

/// A ground obstacle patrolling between two bounds (world space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub rect: Rect,
    /// Creation x, used as the generation frontier
    pub anchor_x: f32,
    pub patrol_start: f32,
    pub patrol_end: f32,
    /// Units per frame
    pub speed: f32,
    /// +1 right, -1 left
    pub direction: f32,
}

impl Obstacle {
    pub fn new(id: u32, rect: Rect, range: f32, speed: f32, direction: f32) -> Self {
        Self {
            id,
            rect,
            anchor_x: rect.x,
            patrol_start: rect.x - range,
            patrol_end: rect.x + range,
            speed,
            direction,
        }
    }

    /// Step one frame, reflecting at the patrol bounds
    pub fn advance(&mut self) {
        let new_x = self.rect.x + self.speed * self.direction;
        if new_x <= self.patrol_start {
            self.rect.x = self.patrol_start;
            self.direction = 1.0;
        } else if new_x >= self.patrol_end {
            self.rect.x = self.patrol_end;
            self.direction = -1.0;
        } else {
            self.rect.x = new_x;
        }
    }
}

/// Boss behaviour state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BossPhase {
    /// Idle, ready to open a burst
    Bobbing,
    /// Mid-burst
    Firing { shots_fired: u32, last_shot_ms: u64 },
    /// Burst finished, holding fire until the given time
    Cooldown { until_ms: u64 },
    /// Health exhausted; removed at the end of the tick
    Defeated,
}

/// A boss (world space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub rect: Rect,
    /// Bob phase offset (radians)
    pub bob_phase: f32,
    pub health: u32,
    pub max_health: u32,
    pub phase: BossPhase,
    pub face_angry_until_ms: u64,
}

impl Boss {
    pub fn is_angry(&self, now_ms: u64) -> bool {
        now_ms < self.face_angry_until_ms
    }

    pub fn is_defeated(&self) -> bool {
        matches!(self.phase, BossPhase::Defeated)
    }
}

/// Projectile owner/behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Player shot, constant velocity
    Bullet,
    /// Boss shot, falls under light gravity
    Fireball,
}

/// A projectile (world space)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub rect: Rect,
    pub vel: Vec2,
}

impl Projectile {
    /// Step one frame
    pub fn advance(&mut self) {
        match self.kind {
            ProjectileKind::Bullet => {
                self.rect = self.rect.translate(self.vel);
            }
            ProjectileKind::Fireball => {
                self.rect.x += self.vel.x;
                self.vel.y += FIREBALL_GRAVITY;
                self.rect.y += self.vel.y;
            }
        }
    }
}

/// Complete game state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed
    pub seed: u64,
    /// Rules in effect
    pub rules: Ruleset,
    /// Session RNG (continues across resets)
    pub rng: Pcg32,
    pub player: Player,
    /// Ordered by world x
    pub platforms: Vec<Platform>,
    /// Ordered by anchor x
    pub obstacles: Vec<Obstacle>,
    pub bosses: Vec<Boss>,
    pub bullets: Vec<Projectile>,
    pub fireballs: Vec<Projectile>,
    /// World-to-screen translation (only ever decreases)
    pub scroll_offset: i32,
    /// Total rightward distance moved
    pub distance: u64,
    /// Points from defeated bosses
    pub bonus_score: u64,
    pub score: u64,
    pub phase: GamePhase,
    /// Simulation tick counter (monotonic clock)
    pub time_ticks: u64,
    pub next_boss_score: u64,
    /// Start time of the active boss warning
    pub boss_warning_started_ms: Option<u64>,
    pub last_shot_ms: Option<u64>,
    pub bosses_defeated: u32,
    /// Completed runs this session
    pub runs: u32,
    /// Events emitted by the most recent tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new game state with the given seed and rules
    pub fn new(seed: u64, rules: Ruleset) -> Self {
        let mut state = Self {
            seed,
            player: Player::new(rules.player_start(), rules.player_size),
            next_boss_score: rules.boss_first_score,
            rules,
            rng: Pcg32::seed_from_u64(seed),
            platforms: Vec::new(),
            obstacles: Vec::new(),
            bosses: Vec::new(),
            bullets: Vec::new(),
            fireballs: Vec::new(),
            scroll_offset: 0,
            distance: 0,
            bonus_score: 0,
            score: 0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            boss_warning_started_ms: None,
            last_shot_ms: None,
            bosses_defeated: 0,
            runs: 0,
            events: Vec::new(),
            next_id: 1,
        };

        super::worldgen::generate_initial(&mut state);

        state
    }

    /// Reinitialize everything except the session RNG, rules and clock
    pub fn reset(&mut self) {
        self.player = Player::new(self.rules.player_start(), self.rules.player_size);
        self.platforms.clear();
        self.obstacles.clear();
        self.bosses.clear();
        self.bullets.clear();
        self.fireballs.clear();
        self.scroll_offset = 0;
        self.distance = 0;
        self.bonus_score = 0;
        self.score = 0;
        self.phase = GamePhase::Playing;
        self.next_boss_score = self.rules.boss_first_score;
        self.boss_warning_started_ms = None;
        self.last_shot_ms = None;
        self.bosses_defeated = 0;
        self.runs += 1;

        super::worldgen::generate_initial(self);
        log::info!("Run {} started (session seed {})", self.runs + 1, self.seed);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Current simulation time in milliseconds
    pub fn now_ms(&self) -> u64 {
        ticks_to_ms(self.time_ticks, self.rules.tick_rate)
    }

    /// Player left edge in world space
    pub fn player_world_x(&self) -> f32 {
        self.player.world_x(self.scroll_offset)
    }

    /// Player box in world space
    pub fn player_world_rect(&self) -> Rect {
        self.player.world_rect(self.scroll_offset)
    }

    /// Project a world rect to screen space
    pub fn to_screen(&self, rect: &Rect) -> Rect {
        rect.translate_x(self.scroll_offset as f32)
    }

    /// Ground strip in screen space
    pub fn ground_rect(&self) -> Rect {
        Rect::new(
            0.0,
            self.rules.ground_y(),
            self.rules.screen_width,
            self.rules.ground_height,
        )
    }

    /// Recompute score from distance and bonuses
    pub fn update_score(&mut self) {
        self.score = self.distance / self.rules.distance_per_point + self.bonus_score;
    }

    /// End the run (idempotent within a tick)
    pub fn end_run(&mut self, cause: GameOverCause) {
        if self.phase == GamePhase::GameOver {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { cause });
        log::info!(
            "Game over ({:?}) with score {} after {} units",
            cause,
            self.score,
            self.distance
        );
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
