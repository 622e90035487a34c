mod cues;
mod locomotion;
pub mod motion;
mod mover;
mod possession;
mod triggers;

pub use cues::{Cue, CueSelector, DEFAULT_STEP_DELAY};
pub use locomotion::LocomotionStateMachine;
pub use mover::{CapsuleMover, Mover};
pub use possession::{Handoff, PossessionController, PossessionLink};
pub use triggers::{Overlap, OverlapDetector, TriggerVolume, VolumeEvent, VolumeTag};
