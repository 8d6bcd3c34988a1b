//! Per-frame simulation tick
//!
//! Core game loop that advances the simulation by one frame:
//! input -> physics/scroll -> world generation -> obstacles -> score ->
//! boss schedule -> bosses and projectiles.

use super::state::{GameEvent, GameOverCause, GameState};
use super::{boss, physics, worldgen};
use crate::input::InputSignal;

/// Autopilot jumps when an obstacle is this close ahead (screen px)
const AUTOPILOT_JUMP_DISTANCE: f32 = 140.0;
/// Autopilot holds position this far from a boss (world units)
const AUTOPILOT_BOSS_STANDOFF: f32 = 300.0;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Gesture/keyboard intents
    pub signal: InputSignal,
    /// Any key pressed this frame (restarts after game over)
    pub restart: bool,
    /// Demo mode - AI plays the game
    pub autopilot: bool,
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.events.clear();

    if state.is_game_over() {
        if input.restart {
            state.reset();
            state.events.push(GameEvent::Restarted);
        }
        return;
    }

    state.time_ticks += 1;

    let signal = if input.autopilot {
        autopilot_signal(state)
    } else {
        input.signal
    };

    boss::fire_player_bullet(state, signal.shoot);

    physics::step_player(state, &signal);

    worldgen::extend_world(state);
    worldgen::evict_behind(state);

    update_obstacles(state);

    state.update_score();

    boss::update_schedule(state);
    boss::update_bosses(state);
    boss::update_bullets(state);
    boss::update_fireballs(state);

    // Boss bonuses land this frame
    state.update_score();
}

/// Check obstacle contact, then move every obstacle one step
pub fn update_obstacles(state: &mut GameState) {
    let player = state.player.rect();
    let scroll = state.scroll_offset as f32;

    let hit = state
        .obstacles
        .iter()
        .any(|o| player.overlaps(&o.rect.translate_x(scroll)));

    for obstacle in &mut state.obstacles {
        obstacle.advance();
    }

    if hit {
        state.end_run(GameOverCause::Obstacle);
    }
}

/// Demo-mode intents: run right, hop obstacles, shoot bosses
pub fn autopilot_signal(state: &GameState) -> InputSignal {
    let player = state.player.rect();
    let scroll = state.scroll_offset as f32;

    let obstacle_ahead = state.obstacles.iter().any(|o| {
        let gap = o.rect.translate_x(scroll).left() - player.right();
        gap > -o.rect.w && gap < AUTOPILOT_JUMP_DISTANCE
    });

    let player_world_right = state.player_world_rect().right();
    let boss_close = state
        .bosses
        .iter()
        .any(|b| b.rect.left() - player_world_right < AUTOPILOT_BOSS_STANDOFF);

    InputSignal {
        move_left: false,
        move_right: !boss_close,
        jump: obstacle_ahead,
        shoot: !state.bosses.is_empty(),
    }
}
