use std::fmt;

use hecs::Entity;

use crate::fsm::StateMachine;

/// Marker: this entity is the player body.
pub struct Player;

/// A drivable body the player can possess.
///
/// `occupant` is the player reference held on the vehicle side while a
/// possession link is active.
#[derive(Debug, Default)]
pub struct Vehicle {
    pub occupant: Option<Entity>,
}

/// Marker: body is deactivated. It neither renders nor collides and receives
/// no trigger events. The player carries it while piloting.
pub struct Inactive;

// ---------------------------------------------------------------------------
// Movement mode state machine
// ---------------------------------------------------------------------------

/// The player's mutually exclusive locomotion modes.
///
/// Walking, running and crouching collapse into `Grounded`; the sprint button
/// only picks a speed grade. Transition rules live in
/// `systems::locomotion` and `systems::possession`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementMode {
    Grounded { crouched: bool },
    Swimming,
    /// Input drives a possessed vehicle. Masks both other modes.
    Piloting,
}

impl Default for MovementMode {
    fn default() -> Self {
        Self::Grounded { crouched: false }
    }
}

impl MovementMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Grounded { crouched: false } => "Grounded",
            Self::Grounded { crouched: true } => "Crouched",
            Self::Swimming => "Swimming",
            Self::Piloting => "Piloting",
        }
    }

    pub fn is_piloting(&self) -> bool {
        matches!(self, Self::Piloting)
    }
}

impl fmt::Display for MovementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// FSM holding the player's movement mode.
pub type ModeFsm = StateMachine<MovementMode>;
