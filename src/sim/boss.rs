//! Boss encounters and projectiles
//!
//! Bosses appear every `boss_score_interval` points, announced by a timed
//! warning. Each boss bobs in place and fires aimed fireballs in bursts
//! while the player is in range. Player bullets chip away at its health.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::collision::Rect;
use super::state::{
    Boss, BossPhase, GameEvent, GameOverCause, GameState, Projectile, ProjectileKind,
};
use crate::consts::*;
use crate::ruleset::Ruleset;

/// Bullets live within this window around the player (world units)
const BULLET_KEEP_BEHIND: f32 = 200.0;
const BULLET_KEEP_AHEAD: f32 = 1000.0;
/// Fireballs are culled past these bounds
const FIREBALL_FLOOR_MARGIN: f32 = 200.0;
const FIREBALL_KEEP_BEHIND: f32 = 2400.0;
const FIREBALL_KEEP_AHEAD: f32 = 12000.0;

impl Boss {
    /// Advance the burst state machine. Returns true when a shot goes out now.
    ///
    /// Bobbing -> Firing -> ... -> Cooldown -> Bobbing. A burst interrupted
    /// by the player leaving range resumes where it stopped.
    pub fn update_fire(&mut self, now_ms: u64, in_range: bool, rules: &Ruleset) -> bool {
        if let BossPhase::Cooldown { until_ms } = self.phase {
            if now_ms < until_ms {
                return false;
            }
            self.phase = BossPhase::Bobbing;
        }

        if !in_range {
            return false;
        }

        let shots_fired = match self.phase {
            BossPhase::Bobbing => 0,
            BossPhase::Firing {
                shots_fired,
                last_shot_ms,
            } => {
                if now_ms.saturating_sub(last_shot_ms) < rules.boss_shot_interval_ms {
                    return false;
                }
                shots_fired
            }
            BossPhase::Cooldown { .. } | BossPhase::Defeated => return false,
        };

        let shots_fired = shots_fired + 1;
        self.phase = if shots_fired >= rules.boss_burst_shots {
            BossPhase::Cooldown {
                until_ms: now_ms + rules.boss_burst_cooldown_ms,
            }
        } else {
            BossPhase::Firing {
                shots_fired,
                last_shot_ms: now_ms,
            }
        };
        self.face_angry_until_ms = now_ms + BOSS_ANGRY_MS;
        true
    }

    /// Take one bullet hit. Returns true if this hit defeats the boss.
    pub fn take_hit(&mut self) -> bool {
        if self.is_defeated() {
            return false;
        }
        self.health = self.health.saturating_sub(1);
        if self.health == 0 {
            self.phase = BossPhase::Defeated;
            return true;
        }
        false
    }
}

/// Place a new boss resting on the ground at world x
pub fn spawn_boss(state: &mut GameState, world_x: f32) -> u32 {
    let bob_phase = state.rng.random_range(0.0..TAU);
    let max_health = state.rules.boss_max_health;
    let rect = Rect::new(
        world_x,
        state.rules.ground_y() - BOSS_SIZE,
        BOSS_SIZE,
        BOSS_SIZE,
    );

    let id = state.next_entity_id();
    state.bosses.push(Boss {
        id,
        rect,
        bob_phase,
        health: max_health,
        max_health,
        phase: BossPhase::Bobbing,
        face_angry_until_ms: 0,
    });
    state.events.push(GameEvent::BossSpawned { id, world_x });
    log::info!("Boss {} spawned at world x={} (score {})", id, world_x, state.score);
    id
}

/// Start the warning near a threshold; spawn once the warning has elapsed
pub fn update_schedule(state: &mut GameState) {
    if !state.rules.bosses_enabled {
        return;
    }
    let now = state.now_ms();
    let warn_at = state
        .next_boss_score
        .saturating_sub(state.rules.boss_warning_threshold);

    if state.boss_warning_started_ms.is_none() && state.score >= warn_at {
        state.boss_warning_started_ms = Some(now);
        state.events.push(GameEvent::BossWarning {
            spawn_score: state.next_boss_score,
        });
        log::info!(
            "Boss warning at score {} (spawns at {})",
            state.score,
            state.next_boss_score
        );
    }

    if state.score < state.next_boss_score {
        return;
    }

    let warning_done = match state.boss_warning_started_ms {
        None => true,
        Some(started) => now.saturating_sub(started) >= state.rules.boss_warning_ms,
    };
    if warning_done {
        let world_x = state.player_world_x() + state.rules.boss_spawn_ahead;
        spawn_boss(state, world_x);
        state.next_boss_score += state.rules.boss_score_interval;
        state.boss_warning_started_ms = None;
    }
}

/// Fraction of the active warning still remaining (1 = just started)
pub fn warning_intensity(state: &GameState) -> Option<f32> {
    let started = state.boss_warning_started_ms?;
    let elapsed = state.now_ms().saturating_sub(started);
    let duration = state.rules.boss_warning_ms;
    if duration == 0 || elapsed >= duration {
        return None;
    }
    Some(1.0 - elapsed as f32 / duration as f32)
}

/// Fire a bullet if requested and the weapon has cooled down
pub fn fire_player_bullet(state: &mut GameState, shoot: bool) {
    if !shoot {
        return;
    }
    let now = state.now_ms();
    if let Some(last) = state.last_shot_ms {
        if now.saturating_sub(last) < state.rules.shot_cooldown_ms {
            return;
        }
    }

    let center = state.player_world_rect().center();
    let rect = Rect::new(
        center.x - BULLET_SIZE / 2.0,
        center.y - 15.0,
        BULLET_SIZE,
        BULLET_SIZE,
    );
    let vel = Vec2::new(state.rules.bullet_speed, 0.0);

    let id = state.next_entity_id();
    state.bullets.push(Projectile {
        id,
        kind: ProjectileKind::Bullet,
        rect,
        vel,
    });
    state.last_shot_ms = Some(now);
    state.events.push(GameEvent::BulletFired);
}

/// Bob each boss, check contact with the player, run burst fire
pub fn update_bosses(state: &mut GameState) {
    let now = state.now_ms();
    let ground_y = state.rules.ground_y();
    let player = state.player_world_rect();
    let player_center = player.center();

    let mut shots: Vec<(u32, Vec2, Vec2)> = Vec::new();
    let mut contact = false;

    for boss in &mut state.bosses {
        if boss.is_defeated() {
            continue;
        }

        let bob = ((now as f32 / BOSS_BOB_PERIOD_MS) + boss.bob_phase).sin() * BOSS_BOB_AMPLITUDE;
        boss.rect.y = ground_y - boss.rect.h + bob.trunc();

        if boss.rect.overlaps(&player) {
            contact = true;
        }

        let boss_center = boss.rect.center();
        let in_range = (player_center.x - boss_center.x).abs() < BOSS_FIRE_RANGE;
        if boss.update_fire(now, in_range, &state.rules) {
            let direction = if player_center.x > boss_center.x { 1.0 } else { -1.0 };
            let vy = (player_center.y - boss_center.y) / FIREBALL_AIM_LEAD;
            shots.push((boss.id, boss_center, Vec2::new(FIREBALL_SPEED * direction, vy)));
            log::debug!("Boss {} fired ({:?})", boss.id, boss.phase);
        }
    }

    for (boss_id, origin, vel) in shots {
        let id = state.next_entity_id();
        state.fireballs.push(Projectile {
            id,
            kind: ProjectileKind::Fireball,
            rect: Rect::new(origin.x, origin.y, FIREBALL_SIZE, FIREBALL_SIZE),
            vel,
        });
        state.events.push(GameEvent::FireballFired { boss_id });
    }

    if contact {
        state.end_run(GameOverCause::Boss);
    }
}

/// Move bullets, apply boss hits, cull strays, remove defeated bosses
pub fn update_bullets(state: &mut GameState) {
    let player_x = state.player_world_rect().x;
    let mut hits: Vec<(u32, u32, bool)> = Vec::new();

    let bosses = &mut state.bosses;
    state.bullets.retain_mut(|bullet| {
        bullet.advance();

        if let Some(boss) = bosses
            .iter_mut()
            .find(|b| !b.is_defeated() && bullet.rect.overlaps(&b.rect))
        {
            let defeated = boss.take_hit();
            hits.push((boss.id, boss.health, defeated));
            return false;
        }

        let x = bullet.rect.x;
        x <= player_x + BULLET_KEEP_AHEAD && x >= player_x - BULLET_KEEP_BEHIND
    });

    for (id, health, defeated) in hits {
        state.events.push(GameEvent::BossHit { id, health });
        if defeated {
            state.bonus_score += state.rules.boss_defeat_bonus;
            state.bosses_defeated += 1;
            state.events.push(GameEvent::BossDefeated { id });
            log::info!("Boss {} defeated (+{})", id, state.rules.boss_defeat_bonus);
        } else {
            log::debug!("Boss {} hit, health {}", id, health);
        }
    }

    state.bosses.retain(|b| !b.is_defeated());
}

/// Move fireballs, check player hits, cull strays
pub fn update_fireballs(state: &mut GameState) {
    let player = state.player_world_rect();
    let floor = state.rules.ground_y() + FIREBALL_FLOOR_MARGIN;
    let mut hit = false;

    state.fireballs.retain_mut(|fireball| {
        fireball.advance();

        if fireball.rect.overlaps(&player) {
            hit = true;
        }

        !(fireball.rect.y > floor
            || fireball.rect.right() < player.x - FIREBALL_KEEP_BEHIND
            || fireball.rect.left() > player.x + FIREBALL_KEEP_AHEAD)
    });

    if hit {
        state.end_run(GameOverCause::Fireball);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GamePhase;

    fn empty_state() -> GameState {
        let mut state = GameState::new(21, Ruleset::default());
        state.platforms.clear();
        state.obstacles.clear();
        state.player.pos.y = state.rules.ground_y() - state.player.size;
        state
    }

    /// Boss in fire range but not touching the player (player spans 100..200)
    fn nearby_boss(state: &mut GameState) -> u32 {
        spawn_boss(state, 300.0)
    }

    fn fire_times(state: &mut GameState, ticks: u64) -> Vec<u64> {
        let mut times = Vec::new();
        for _ in 0..ticks {
            state.time_ticks += 1;
            state.events.clear();
            update_bosses(state);
            let now = state.now_ms();
            for event in &state.events {
                if matches!(event, GameEvent::FireballFired { .. }) {
                    times.push(now);
                }
            }
        }
        times
    }

    #[test]
    fn test_burst_pattern() {
        let mut state = empty_state();
        nearby_boss(&mut state);

        // 8 seconds at 120 Hz
        let times = fire_times(&mut state, 960);
        assert!(times.len() >= 10);

        for burst in times.chunks(5).take(2) {
            assert_eq!(burst.len(), 5);
            for pair in burst.windows(2) {
                assert!(pair[1] - pair[0] >= 200, "{:?}", burst);
                assert!(pair[1] - pair[0] < 250, "{:?}", burst);
            }
        }
        // Cooldown gap between the 5th and 6th shot
        assert!(times[5] - times[4] >= 2500);
        assert!(times[5] - times[4] < 2550);
        assert_eq!(state.fireballs.len(), times.len());
    }

    #[test]
    fn test_no_fire_out_of_range() {
        let mut state = empty_state();
        // Boss center at 1540, player center at 150
        spawn_boss(&mut state, 1270.0);
        let times = fire_times(&mut state, 240);
        assert!(times.is_empty());
        assert_eq!(state.bosses[0].phase, BossPhase::Bobbing);
    }

    #[test]
    fn test_interrupted_burst_resumes() {
        let mut state = empty_state();
        nearby_boss(&mut state);
        let rules = state.rules.clone();
        let boss = &mut state.bosses[0];

        assert!(boss.update_fire(0, true, &rules));
        assert!(boss.update_fire(200, true, &rules));
        // Out of range for a while
        assert!(!boss.update_fire(400, false, &rules));
        assert!(!boss.update_fire(5000, false, &rules));
        assert!(boss.update_fire(5001, true, &rules));
        assert_eq!(
            boss.phase,
            BossPhase::Firing {
                shots_fired: 3,
                last_shot_ms: 5001
            }
        );
    }

    #[test]
    fn test_fireball_aimed_at_player() {
        let mut state = empty_state();
        nearby_boss(&mut state);
        state.time_ticks = 1;
        update_bosses(&mut state);

        assert_eq!(state.fireballs.len(), 1);
        let fireball = &state.fireballs[0];
        assert_eq!(fireball.vel.x, -FIREBALL_SPEED);

        let player_cy = state.player_world_rect().center().y;
        let boss_cy = state.bosses[0].rect.center().y;
        assert!((fireball.vel.y - (player_cy - boss_cy) / FIREBALL_AIM_LEAD).abs() < 1e-4);
        assert!(state.bosses[0].is_angry(state.now_ms()));
    }

    #[test]
    fn test_ten_bullets_defeat_boss() {
        let mut state = empty_state();
        let id = nearby_boss(&mut state);
        let boss_rect = state.bosses[0].rect;

        for i in 0..10 {
            let bid = state.next_entity_id();
            state.bullets.push(Projectile {
                id: bid,
                kind: ProjectileKind::Bullet,
                rect: Rect::new(boss_rect.x - 20.0, boss_rect.y + 100.0, BULLET_SIZE, BULLET_SIZE),
                vel: Vec2::new(12.0, 0.0),
            });
            update_bullets(&mut state);
            assert!(state.bullets.is_empty());
            if i < 9 {
                assert_eq!(state.bosses[0].health, 9 - i);
            }
        }

        assert!(state.bosses.is_empty());
        assert_eq!(state.bonus_score, 100);
        assert_eq!(state.bosses_defeated, 1);
        assert!(state.events.contains(&GameEvent::BossDefeated { id }));

        let before = state.score;
        state.update_score();
        assert_eq!(state.score, before + 100);
    }

    #[test]
    fn test_bullet_culled_out_of_window() {
        let mut state = empty_state();
        fire_player_bullet(&mut state, true);
        assert_eq!(state.bullets.len(), 1);
        // 1000 units / 12 per frame
        for _ in 0..90 {
            update_bullets(&mut state);
        }
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_shot_cooldown() {
        let mut state = empty_state();
        fire_player_bullet(&mut state, true);
        fire_player_bullet(&mut state, true);
        assert_eq!(state.bullets.len(), 1);

        // 699 ms later: still cooling
        state.time_ticks = 83;
        fire_player_bullet(&mut state, true);
        assert_eq!(state.bullets.len(), 1);

        state.time_ticks = 84; // 700 ms
        fire_player_bullet(&mut state, true);
        assert_eq!(state.bullets.len(), 2);

        let bullet = &state.bullets[0];
        let center = state.player_world_rect().center();
        assert_eq!(bullet.rect.x, center.x - 20.0);
        assert_eq!(bullet.rect.y, center.y - 15.0);
    }

    #[test]
    fn test_fireball_hit_ends_game() {
        let mut state = empty_state();
        let player = state.player_world_rect();
        let id = state.next_entity_id();
        state.fireballs.push(Projectile {
            id,
            kind: ProjectileKind::Fireball,
            rect: Rect::new(player.right() + 5.0, player.y + 40.0, FIREBALL_SIZE, FIREBALL_SIZE),
            vel: Vec2::new(-9.0, 0.0),
        });
        update_fireballs(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver {
            cause: GameOverCause::Fireball
        }));
    }

    #[test]
    fn test_fireball_culled_below_floor() {
        let mut state = empty_state();
        let id = state.next_entity_id();
        state.fireballs.push(Projectile {
            id,
            kind: ProjectileKind::Fireball,
            rect: Rect::new(3000.0, 860.0, FIREBALL_SIZE, FIREBALL_SIZE),
            vel: Vec2::new(9.0, 12.0),
        });
        update_fireballs(&mut state);
        assert!(state.fireballs.is_empty());
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_boss_contact_ends_game() {
        let mut state = empty_state();
        spawn_boss(&mut state, 150.0);
        update_bosses(&mut state);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_warning_gates_spawn() {
        let mut state = empty_state();
        state.score = 180;
        update_schedule(&mut state);
        assert!(state.boss_warning_started_ms.is_some());
        assert!(warning_intensity(&state).is_some());
        assert!(state.bosses.is_empty());

        state.score = 200;
        state.time_ticks = 120; // 1 s into the warning
        update_schedule(&mut state);
        assert!(state.bosses.is_empty());

        state.time_ticks = 360; // 3 s
        update_schedule(&mut state);
        assert_eq!(state.bosses.len(), 1);
        assert_eq!(state.next_boss_score, 400);
        assert!(state.boss_warning_started_ms.is_none());

        let boss = &state.bosses[0];
        assert_eq!(boss.rect.x, state.player_world_x() + 600.0);
        assert_eq!(boss.health, 10);
        assert_eq!(boss.rect.bottom(), state.rules.ground_y());
    }

    #[test]
    fn test_bosses_disabled() {
        let mut state = GameState::new(
            2,
            Ruleset {
                bosses_enabled: false,
                ..Ruleset::default()
            },
        );
        state.score = 10_000;
        update_schedule(&mut state);
        assert!(state.bosses.is_empty());
        assert!(state.boss_warning_started_ms.is_none());
    }
}
