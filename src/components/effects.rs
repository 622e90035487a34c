use hecs::Entity;

use super::character::MovementMode;

/// Observable outcome of one controller step.
///
/// Returned by `Controller::step` in the order things happened, for audio
/// cues, UI and tests. Nothing inside the controller reads them back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    ModeChanged {
        from: MovementMode,
        to: MovementMode,
    },
    /// Jump impulse applied this frame.
    Jumped { impulse: f32 },
    /// Possession link created; the vehicle now holds camera authority.
    Possessed { vehicle: Entity },
    /// Possession link destroyed; the player holds camera authority again.
    Released { vehicle: Entity },
    /// A request that failed its precondition and was absorbed as a no-op.
    Ignored(Refusal),
}

/// Why a trigger or handoff request was absorbed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Enter while a link already exists.
    AlreadyLinked { vehicle: Entity },
    /// Exit without a link.
    NotLinked,
    /// Enter on an entity that is not a usable vehicle.
    NotAVehicle(Entity),
    /// Vehicle is held by a different body.
    Occupied { vehicle: Entity, occupant: Entity },
    /// Event concerns a body other than the controlled player.
    ForeignBody(Entity),
    /// Vehicle exit event for a vehicle other than the linked one.
    OtherVehicle(Entity),
    /// Liquid event while piloting; piloting masks swimming.
    Piloting { volume: Entity },
}
