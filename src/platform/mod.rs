//! Platform abstraction layer
//!
//! Host-side plumbing around the simulation:
//! - Pose sources (camera tracker, or none)
//! - Gesture signal smoothing over dropped camera frames
//! - Fixed-rate frame clock

use std::collections::VecDeque;

use crate::consts::MAX_SUBSTEPS;
use crate::input::{InputSignal, PoseLandmarks, classify_pose};

/// Something that produces body landmarks once per frame
pub trait PoseSource {
    /// Latest landmarks, or `None` if no body was detected this frame
    fn poll(&mut self) -> Option<PoseLandmarks>;
}

/// Stand-in when no camera is available (keyboard-only play)
#[derive(Debug, Default)]
pub struct NoCamera;

impl NoCamera {
    pub fn new() -> Self {
        log::warn!("No camera available, gesture input disabled");
        Self
    }
}

impl PoseSource for NoCamera {
    fn poll(&mut self) -> Option<PoseLandmarks> {
        None
    }
}

/// Replays a fixed sequence of frames, then reports nothing
#[derive(Debug, Default)]
pub struct ScriptedPoses {
    frames: VecDeque<Option<PoseLandmarks>>,
}

impl ScriptedPoses {
    pub fn new(frames: impl IntoIterator<Item = Option<PoseLandmarks>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }
}

impl PoseSource for ScriptedPoses {
    fn poll(&mut self) -> Option<PoseLandmarks> {
        self.frames.pop_front().flatten()
    }
}

/// Turns a pose source into a per-frame signal.
///
/// A single missed frame repeats the last signal; a second one in a row
/// drops to idle.
pub struct GestureInput<S: PoseSource> {
    source: S,
    last: InputSignal,
    missed: u32,
}

impl<S: PoseSource> GestureInput<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            last: InputSignal::default(),
            missed: 0,
        }
    }

    /// Poll the source and classify
    pub fn sample(&mut self) -> InputSignal {
        match self.source.poll() {
            Some(pose) => {
                self.last = classify_pose(&pose);
                self.missed = 0;
                self.last
            }
            None => {
                self.missed = self.missed.saturating_add(1);
                if self.missed == 1 {
                    self.last
                } else {
                    self.last = InputSignal::default();
                    self.last
                }
            }
        }
    }
}

/// Fixed-timestep accumulator
#[derive(Debug, Clone)]
pub struct FrameClock {
    step: f32,
    accumulator: f32,
}

impl FrameClock {
    pub fn new(tick_rate: u32) -> Self {
        Self {
            step: 1.0 / tick_rate.max(1) as f32,
            accumulator: 0.0,
        }
    }

    /// Add elapsed wall time and return how many ticks to run now.
    /// Capped at `MAX_SUBSTEPS`; any backlog beyond that is dropped.
    pub fn advance(&mut self, dt: f32) -> u32 {
        // Cap large frame gaps (tab switch, debugger)
        self.accumulator += dt.clamp(0.0, 0.1);

        let mut steps = 0;
        while self.accumulator >= self.step && steps < MAX_SUBSTEPS {
            self.accumulator -= self.step;
            steps += 1;
        }
        if steps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(self.step);
        }
        steps
    }
}
