//! Procedural world generation
//!
//! Platforms and obstacles are appended ahead of the player so the frontier
//! always sits at least `lookahead` units beyond the player's world x. Both
//! sequences stay sorted by world x.

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::Rect;
use super::state::{GameState, Obstacle, Platform};
use crate::consts::*;

/// Initial base platform positions (world x)
const INITIAL_PLATFORM_XS: [f32; 3] = [500.0, 1000.0, 1500.0];
/// Initial obstacle offsets past the right screen edge
const INITIAL_OBSTACLE_OFFSETS: [f32; 3] = [200.0, 600.0, 1000.0];

const INITIAL_WIDTHS: [f32; 5] = [200.0, 250.0, 300.0, 350.0, 400.0];
const EXTRA_WIDTHS: [f32; 3] = [180.0, 220.0, 250.0];
const PLATFORM_WIDTHS: [f32; 6] = [180.0, 220.0, 250.0, 300.0, 350.0, 400.0];
const BONUS_WIDTHS: [f32; 3] = [150.0, 180.0, 220.0];
const PLATFORM_HEIGHTS: [f32; 3] = [20.0, 25.0, 30.0];
/// Extra/bonus platforms are thin
const THIN_PLATFORM: f32 = 20.0;

/// Pick one value from a non-empty table
fn pick(rng: &mut Pcg32, table: &[f32]) -> f32 {
    table[rng.random_range(0..table.len())]
}

fn random_variant(rng: &mut Pcg32) -> u8 {
    rng.random_range(0..PLATFORM_VARIANTS)
}

/// Platform rect plus variant, before an ID is assigned
struct PendingPlatform {
    rect: Rect,
    variant: u8,
}

fn push_platforms(state: &mut GameState, pending: Vec<PendingPlatform>) {
    for platform in pending {
        let id = state.next_entity_id();
        state.platforms.push(Platform {
            id,
            rect: platform.rect,
            variant: platform.variant,
        });
    }
}

/// Create an obstacle resting on the ground at world x with random patrol
fn spawn_obstacle(state: &mut GameState, x: f32) {
    let rules = &state.rules;
    let rng = &mut state.rng;

    let speed = rng.random_range(rules.obstacle_speed_min..=rules.obstacle_speed_max);
    let range = rng.random_range(rules.obstacle_range_min..=rules.obstacle_range_max) as f32;
    let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    let rect = Rect::new(x, rules.ground_y() - OBSTACLE_SIZE, OBSTACLE_SIZE, OBSTACLE_SIZE);

    let id = state.next_entity_id();
    state.obstacles.push(Obstacle::new(id, rect, range, speed, direction));
}

/// Build the starting platforms and obstacles
pub fn generate_initial(state: &mut GameState) {
    let mut pending = Vec::new();
    {
        let rules = &state.rules;
        let rng = &mut state.rng;
        let ground_y = rules.ground_y();
        let h = rules.screen_height;

        for base_x in INITIAL_PLATFORM_XS {
            let x = base_x + rng.random_range(-100..=100) as f32;
            let y = ground_y - rng.random_range(150..=300) as f32;
            let w = pick(rng, &INITIAL_WIDTHS);
            let ph = pick(rng, &PLATFORM_HEIGHTS);
            pending.push(PendingPlatform {
                rect: Rect::new(x, y, w, ph),
                variant: random_variant(rng),
            });

            if rng.random_bool(rules.initial_extra_chance) {
                let extra_x = x + rng.random_range(200..=400) as f32;
                let extra_y =
                    (y + rng.random_range(-80..=80) as f32).clamp(h - 350.0, h - 120.0);
                let extra_w = pick(rng, &EXTRA_WIDTHS);
                pending.push(PendingPlatform {
                    rect: Rect::new(extra_x, extra_y, extra_w, THIN_PLATFORM),
                    variant: random_variant(rng),
                });
            }
        }
    }

    // Extras can land past the next base platform
    pending.sort_by(|a, b| a.rect.x.total_cmp(&b.rect.x));
    push_platforms(state, pending);

    let right_edge = state.rules.screen_width;
    for offset in INITIAL_OBSTACLE_OFFSETS {
        spawn_obstacle(state, right_edge + offset);
    }

    log::debug!(
        "Generated {} platforms and {} obstacles",
        state.platforms.len(),
        state.obstacles.len()
    );
}

/// World x of the last platform (generation frontier)
pub fn platform_frontier(state: &GameState) -> Option<f32> {
    state.platforms.last().map(|p| p.rect.x)
}

/// Anchor x of the last obstacle (generation frontier)
pub fn obstacle_frontier(state: &GameState) -> Option<f32> {
    state.obstacles.last().map(|o| o.anchor_x)
}

/// Append one platform (plus an optional bonus) past the frontier
fn append_platform(state: &mut GameState, frontier: f32) {
    let mut pending = Vec::with_capacity(2);
    {
        let rules = &state.rules;
        let rng = &mut state.rng;
        let h = rules.screen_height;

        let gap = rng.random_range(rules.platform_gap_min..=rules.platform_gap_max) as f32;
        let x = frontier + gap;
        let y = rng.random_range((h - 350.0) as i32..=(h - 120.0) as i32) as f32;
        let w = pick(rng, &PLATFORM_WIDTHS);
        let ph = pick(rng, &PLATFORM_HEIGHTS);
        pending.push(PendingPlatform {
            rect: Rect::new(x, y, w, ph),
            variant: random_variant(rng),
        });

        if rng.random_bool(rules.platform_bonus_chance) {
            let bonus_x = x + rng.random_range(150..=300) as f32;
            let bonus_y = (y + rng.random_range(-100..=100) as f32).clamp(h - 400.0, h - 120.0);
            let bonus_w = pick(rng, &BONUS_WIDTHS);
            pending.push(PendingPlatform {
                rect: Rect::new(bonus_x, bonus_y, bonus_w, THIN_PLATFORM),
                variant: random_variant(rng),
            });
        }
    }
    push_platforms(state, pending);
}

/// Append one obstacle (plus an optional bonus) past the frontier
fn append_obstacle(state: &mut GameState, frontier: f32) {
    let x = frontier + state.rules.obstacle_gap;
    spawn_obstacle(state, x);

    let bonus_chance = state.rules.obstacle_bonus_chance;
    if state.rng.random_bool(bonus_chance) {
        let bonus_x = x + state.rng.random_range(150..=250) as f32;
        spawn_obstacle(state, bonus_x);
    }
}

/// Extend both sequences when the player nears their frontier.
/// At most one append per sequence per call.
pub fn extend_world(state: &mut GameState) {
    let player_x = state.player_world_x();
    let lookahead = state.rules.lookahead;

    let frontier = platform_frontier(state).unwrap_or(player_x);
    if player_x > frontier - lookahead {
        append_platform(state, frontier);
    }

    let frontier = obstacle_frontier(state).unwrap_or(player_x);
    if player_x > frontier - lookahead {
        append_obstacle(state, frontier);
    }
}

/// Drop entities far behind the player. The frontier entity always survives.
pub fn evict_behind(state: &mut GameState) {
    let Some(distance) = state.rules.evict_behind else {
        return;
    };
    let cutoff = state.player_world_x() - distance;

    let before = state.platforms.len() + state.obstacles.len();

    let last = state.platforms.len().saturating_sub(1);
    let mut index = 0;
    state.platforms.retain(|p| {
        let keep = index == last || p.rect.right() >= cutoff;
        index += 1;
        keep
    });

    let last = state.obstacles.len().saturating_sub(1);
    let mut index = 0;
    state.obstacles.retain(|o| {
        let keep = index == last || o.patrol_end + o.rect.w >= cutoff;
        index += 1;
        keep
    });

    let evicted = before - (state.platforms.len() + state.obstacles.len());
    if evicted > 0 {
        log::debug!("Evicted {} entities behind x={}", evicted, cutoff);
    }
}
