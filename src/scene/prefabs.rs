use glam::Vec3;
use hecs::{Entity, World};

use crate::camera::CameraMount;
use crate::components::*;
use crate::systems::{TriggerVolume, VolumeTag};

pub const PLAYER_RADIUS: f32 = 0.5;

/// Spawn the infinite ground plane at y = 0.
pub fn spawn_ground(world: &mut World) -> Entity {
    world.spawn((
        LocalTransform::new(Vec3::ZERO),
        Collider::Plane {
            normal: Vec3::Y,
            offset: 0.0,
        },
        Static,
    ))
}

/// Spawn an immovable axis-aligned box centred at `pos`.
pub fn spawn_static_box(world: &mut World, pos: Vec3, half_extents: Vec3) -> Entity {
    world.spawn((
        LocalTransform::new(pos),
        Collider::Box { half_extents },
        Static,
    ))
}

/// Spawn the player body standing with its capsule centre at `pos`.
/// The player starts out with camera authority.
pub fn spawn_player(world: &mut World, pos: Vec3, height: f32) -> Entity {
    world.spawn((
        Player,
        LocalTransform::new(pos),
        Collider::Capsule {
            radius: PLAYER_RADIUS,
            height,
        },
        CameraMount::new(true),
    ))
}

/// Spawn a drivable vehicle facing `yaw_degrees`. Its entry volume is a
/// trigger on the vehicle entity itself, so it travels with the vehicle.
pub fn spawn_vehicle(world: &mut World, pos: Vec3, yaw_degrees: f32, half_extents: Vec3) -> Entity {
    world.spawn((
        Vehicle::default(),
        LocalTransform::with_yaw(pos, yaw_degrees),
        CameraMount::new(false),
        TriggerVolume {
            tag: VolumeTag::Vehicle,
            half_extents,
        },
    ))
}

/// Spawn a box-shaped body of liquid. Purely a trigger; it does not collide.
pub fn spawn_liquid(world: &mut World, pos: Vec3, half_extents: Vec3) -> Entity {
    world.spawn((
        LocalTransform::new(pos),
        TriggerVolume {
            tag: VolumeTag::Liquid,
            half_extents,
        },
    ))
}
