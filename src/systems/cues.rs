use crate::components::MovementMode;
use crate::engine::input::{Button, InputSample};

/// Seconds between footsteps.
pub const DEFAULT_STEP_DELAY: f32 = 0.5;
const WALK_PITCH: f32 = 1.0;
const SPRINT_PITCH: f32 = 1.5;

/// Which locomotion sound should be playing this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    Silent,
    /// Moving on the ground between two footsteps.
    Walking,
    /// Play one footstep now at `pitch`.
    Footstep { pitch: f32 },
    Swimming,
}

/// Picks locomotion cues from the current mode and input. Mixing and
/// playback are left to the caller.
#[derive(Debug, Clone)]
pub struct CueSelector {
    pub step_delay: f32,
    next_step_at: f32,
}

impl Default for CueSelector {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_DELAY)
    }
}

impl CueSelector {
    pub fn new(step_delay: f32) -> Self {
        Self {
            step_delay,
            next_step_at: 0.0,
        }
    }

    /// `now` is the session clock in seconds.
    pub fn update(&mut self, mode: MovementMode, input: &InputSample, now: f32) -> Cue {
        if !input.is_moving() {
            return Cue::Silent;
        }
        match mode {
            MovementMode::Piloting => Cue::Silent,
            MovementMode::Swimming => Cue::Swimming,
            MovementMode::Grounded { .. } if now >= self.next_step_at => {
                self.next_step_at = now + self.step_delay;
                let pitch = if input.is_held(Button::Sprint) {
                    SPRINT_PITCH
                } else {
                    WALK_PITCH
                };
                Cue::Footstep { pitch }
            }
            MovementMode::Grounded { .. } => Cue::Walking,
        }
    }
}
