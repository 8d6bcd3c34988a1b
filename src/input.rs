//! Control signals
//!
//! The simulation consumes a level-based [`InputSignal`] each frame. It is
//! produced by classifying body landmarks from the pose tracker, by the
//! keyboard fallback, or both OR-merged. Debouncing (grounded jumps, shot
//! cooldown) is the simulation's job, not the source's.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Per-frame control intents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSignal {
    pub move_left: bool,
    pub move_right: bool,
    pub jump: bool,
    pub shoot: bool,
}

impl InputSignal {
    /// Combine two sources; an intent holds if either source asserts it
    pub fn merge(self, other: InputSignal) -> InputSignal {
        InputSignal {
            move_left: self.move_left || other.move_left,
            move_right: self.move_right || other.move_right,
            jump: self.jump || other.jump,
            shoot: self.shoot || other.shoot,
        }
    }

    pub fn is_idle(&self) -> bool {
        !(self.move_left || self.move_right || self.jump || self.shoot)
    }
}

/// Shoot gesture: wrist and shoulder heights must be this close
const SHOOT_HEIGHT_TOLERANCE: f32 = 0.15;

/// A tracked body point in normalized image coordinates.
/// y grows downward, smaller z is closer to the camera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Upper-body landmarks from the pose tracker (mirrored frame)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseLandmarks {
    pub left_wrist: Landmark,
    pub right_wrist: Landmark,
    pub left_elbow: Landmark,
    pub right_elbow: Landmark,
    pub left_shoulder: Landmark,
    pub right_shoulder: Landmark,
}

/// Map a pose to control intents.
///
/// - Right wrist outside the right shoulder: move right
/// - Otherwise left wrist outside the left shoulder: move left
/// - Both wrists above their shoulders: jump
/// - Right arm pointing at the camera at shoulder height: shoot
pub fn classify_pose(pose: &PoseLandmarks) -> InputSignal {
    let mut signal = InputSignal::default();

    if pose.right_wrist.x > pose.right_shoulder.x {
        signal.move_right = true;
    } else if pose.left_wrist.x < pose.left_shoulder.x {
        signal.move_left = true;
    }

    signal.jump =
        pose.left_wrist.y < pose.left_shoulder.y && pose.right_wrist.y < pose.right_shoulder.y;

    signal.shoot = pose.right_wrist.z < pose.right_elbow.z
        && pose.right_elbow.z < pose.right_shoulder.z
        && (pose.right_wrist.y - pose.right_shoulder.y).abs() < SHOOT_HEIGHT_TOLERANCE;

    signal
}

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Left,
    Right,
    Up,
    A,
    D,
    W,
    Space,
    X,
    LeftCtrl,
    RightCtrl,
    Escape,
    Other,
}

/// Keyboard fallback state for one frame
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Key>,
    /// Keys that went down this frame
    pressed: Vec<Key>,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key-down event
    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
        self.pressed.push(key);
    }

    /// Record a key-up event
    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Forget per-frame presses (call after the frame is processed)
    pub fn end_frame(&mut self) {
        self.pressed.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn any_held(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.held.contains(k))
    }

    /// Held keys as control intents
    pub fn to_signal(&self) -> InputSignal {
        InputSignal {
            move_left: self.any_held(&[Key::Left, Key::A]),
            move_right: self.any_held(&[Key::Right, Key::D]),
            jump: self.any_held(&[Key::Up, Key::W, Key::Space]),
            shoot: self.any_held(&[Key::X, Key::LeftCtrl, Key::RightCtrl]),
        }
    }

    /// Any non-quit key went down this frame (restart trigger)
    pub fn any_pressed(&self) -> bool {
        self.pressed.iter().any(|k| *k != Key::Escape)
    }

    /// Escape went down this frame
    pub fn quit_requested(&self) -> bool {
        self.pressed.contains(&Key::Escape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Arms relaxed at the sides, shoulders at y=0.4
    fn neutral_pose() -> PoseLandmarks {
        PoseLandmarks {
            left_wrist: Landmark::new(0.65, 0.7, 0.0),
            right_wrist: Landmark::new(0.35, 0.7, 0.0),
            left_elbow: Landmark::new(0.63, 0.55, 0.0),
            right_elbow: Landmark::new(0.37, 0.55, 0.0),
            left_shoulder: Landmark::new(0.6, 0.4, 0.0),
            right_shoulder: Landmark::new(0.4, 0.4, 0.0),
        }
    }

    #[test]
    fn test_neutral_pose_is_idle() {
        assert!(classify_pose(&neutral_pose()).is_idle());
    }

    #[test]
    fn test_right_arm_out_moves_right() {
        let mut pose = neutral_pose();
        pose.right_wrist.x = 0.5;
        // Left arm also out: right wins
        pose.left_wrist.x = 0.5;
        let signal = classify_pose(&pose);
        assert!(signal.move_right);
        assert!(!signal.move_left);
    }

    #[test]
    fn test_left_arm_out_moves_left() {
        let mut pose = neutral_pose();
        pose.left_wrist.x = 0.5;
        let signal = classify_pose(&pose);
        assert!(signal.move_left);
        assert!(!signal.move_right);
    }

    #[test]
    fn test_both_arms_up_jumps() {
        let mut pose = neutral_pose();
        pose.left_wrist.y = 0.2;
        assert!(!classify_pose(&pose).jump);
        pose.right_wrist.y = 0.2;
        assert!(classify_pose(&pose).jump);
    }

    #[test]
    fn test_pointing_forward_shoots() {
        let mut pose = neutral_pose();
        pose.right_shoulder.z = 0.0;
        pose.right_elbow.z = -0.2;
        pose.right_wrist = Landmark::new(0.35, 0.45, -0.4);
        assert!(classify_pose(&pose).shoot);

        // Arm too low
        pose.right_wrist.y = 0.6;
        assert!(!classify_pose(&pose).shoot);
    }

    #[test]
    fn test_keyboard_mapping() {
        let mut keys = KeyboardState::new();
        keys.press(Key::D);
        keys.press(Key::Space);
        let signal = keys.to_signal();
        assert!(signal.move_right && signal.jump);
        assert!(!signal.move_left && !signal.shoot);
        assert!(keys.any_pressed());

        keys.end_frame();
        assert!(!keys.any_pressed());
        assert!(keys.to_signal().move_right);

        keys.release(Key::D);
        assert!(!keys.to_signal().move_right);
    }

    #[test]
    fn test_escape_is_not_restart() {
        let mut keys = KeyboardState::new();
        keys.press(Key::Escape);
        assert!(keys.quit_requested());
        assert!(!keys.any_pressed());
    }

    #[test]
    fn test_merge_is_or() {
        let gesture = InputSignal {
            move_right: true,
            ..Default::default()
        };
        let keyboard = InputSignal {
            shoot: true,
            ..Default::default()
        };
        let merged = gesture.merge(keyboard);
        assert!(merged.move_right && merged.shoot);
        assert!(!merged.move_left && !merged.jump);
    }
}
