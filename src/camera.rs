use glam::Quat;
use hecs::{Entity, World};

/// Clamped vertical look accumulator, in degrees.
///
/// One instance is shared by whichever body holds camera authority, so pitch
/// carries across a vehicle handoff. Positive pitch looks down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LookState {
    pub pitch: f32,
    pub limit: f32,
    pub sensitivity: f32,
}

impl LookState {
    pub fn new(sensitivity: f32, limit: f32) -> Self {
        Self {
            pitch: 0.0,
            limit,
            sensitivity,
        }
    }

    /// Yaw in degrees for this frame's horizontal look delta.
    pub fn yaw_delta(&self, look_dx: f32) -> f32 {
        look_dx * self.sensitivity
    }

    /// Accumulate the vertical look delta and clamp. Returns the new pitch.
    pub fn look(&mut self, look_dy: f32) -> f32 {
        self.pitch -= look_dy * self.sensitivity;
        self.pitch = self.pitch.clamp(-self.limit, self.limit);
        self.pitch
    }

    /// Camera local rotation for the current pitch.
    pub fn camera_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.pitch.to_radians())
    }
}

/// Camera attach point on a body. Exactly one mount is enabled at a time.
///
/// Only `local_rotation` (pitch) is written here; the camera inherits yaw
/// from the body it is mounted on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMount {
    pub enabled: bool,
    pub local_rotation: Quat,
}

impl CameraMount {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            local_rotation: Quat::IDENTITY,
        }
    }
}

/// Disable the camera on `from` and enable the one on `to`.
pub fn transfer_authority(world: &mut World, from: Entity, to: Entity) {
    if let Ok(mut mount) = world.get::<&mut CameraMount>(from) {
        mount.enabled = false;
    }
    if let Ok(mut mount) = world.get::<&mut CameraMount>(to) {
        mount.enabled = true;
    }
}

/// Write the current pitch into `holder`'s camera mount.
pub fn apply_pitch(world: &mut World, holder: Entity, look: &LookState) {
    if let Ok(mut mount) = world.get::<&mut CameraMount>(holder) {
        mount.local_rotation = look.camera_rotation();
    }
}

/// Entities whose camera mount is currently enabled.
pub fn enabled_mounts(world: &World) -> Vec<Entity> {
    world
        .query::<&CameraMount>()
        .iter()
        .filter(|(_, mount)| mount.enabled)
        .map(|(entity, _)| entity)
        .collect()
}
