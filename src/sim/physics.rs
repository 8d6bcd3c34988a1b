//! Player physics and camera scroll
//!
//! Integrates the player one frame: horizontal intent, jump impulse, gravity,
//! landing on platforms, ground clamp, then converts motion past the scroll
//! threshold into world scroll.

use super::state::GameState;
use crate::input::InputSignal;

/// Extra jumps available in the air when double jump is enabled
const MAX_AIR_JUMPS: u8 = 1;

/// Advance the player by one frame
pub fn step_player(state: &mut GameState, signal: &InputSignal) {
    let rules = &state.rules;
    let speed = rules.move_speed;
    let player = &mut state.player;

    // Both directions may apply in the same frame
    if signal.move_right {
        player.pos.x += speed;
        state.distance += speed as u64;
    }
    if signal.move_left {
        player.pos.x -= speed;
    }

    let jump_edge = signal.jump && !player.jump_held;
    if signal.jump && player.on_ground {
        player.vel_y = -rules.jump_force;
        player.on_ground = false;
    } else if rules.double_jump
        && jump_edge
        && !player.on_ground
        && player.air_jumps_used < MAX_AIR_JUMPS
    {
        player.vel_y = -rules.jump_force;
        player.air_jumps_used += 1;
    }
    player.jump_held = signal.jump;

    player.vel_y += rules.gravity;
    player.pos.y += player.vel_y;

    resolve_landing(state);
    apply_scroll(state);
}

/// Snap the player onto the first platform it lands on, then clamp to ground.
/// `on_ground` reflects only this frame's contacts.
pub fn resolve_landing(state: &mut GameState) {
    let scroll = state.scroll_offset as f32;
    let ground_y = state.rules.ground_y();
    let player = &mut state.player;
    player.on_ground = false;

    let player_rect = player.rect();
    let landing = state
        .platforms
        .iter()
        .map(|p| p.rect.translate_x(scroll))
        .find(|surface| player_rect.lands_on(surface));

    if let Some(surface) = landing {
        player.pos.y = surface.top() - player.size;
        player.vel_y = 0.0;
        player.on_ground = true;
    }

    if player.pos.y > ground_y - player.size {
        player.pos.y = ground_y - player.size;
        player.vel_y = 0.0;
        player.on_ground = true;
    }

    if player.on_ground {
        player.air_jumps_used = 0;
    }
}

/// Convert motion past the threshold into scroll; optionally stop at the
/// left screen edge. The scroll offset never increases.
pub fn apply_scroll(state: &mut GameState) {
    let rules = &state.rules;
    let player = &mut state.player;

    if player.pos.x > rules.scroll_threshold {
        state.scroll_offset -= rules.move_speed as i32;
        player.pos.x = rules.scroll_threshold;
    }

    if rules.clamp_left_edge && player.pos.x < 0.0 {
        player.pos.x = 0.0;
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::ruleset::Ruleset;
    use proptest::prelude::*;

    fn signal_strategy() -> impl Strategy<Value = InputSignal> {
        (any::<bool>(), any::<bool>(), any::<bool>()).prop_map(|(move_left, move_right, jump)| {
            InputSignal {
                move_left,
                move_right,
                jump,
                shoot: false,
            }
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn airborne_frames_gain_gravity(
            seed in any::<u64>(),
            gravity in 0.5f32..3.0,
            signals in prop::collection::vec(signal_strategy(), 1..300),
        ) {
            let rules = Ruleset { gravity, ..Ruleset::default() };
            let mut state = GameState::new(seed, rules);

            for signal in signals {
                let airborne = !state.player.on_ground;
                let vel_before = state.player.vel_y;
                let y_before = state.player.pos.y;

                step_player(&mut state, &signal);

                // Started in the air and did not land this frame
                if airborne && !state.player.on_ground {
                    prop_assert_eq!(state.player.vel_y, vel_before + gravity);
                    prop_assert_eq!(state.player.pos.y, y_before + state.player.vel_y);
                }
            }
        }
    }
}
