pub mod prefabs;
pub mod script;
pub mod test_scene;

use hecs::{Entity, World};

use crate::camera::{self, CameraMount};
use crate::components::{Collider, LocalTransform, Player, Vehicle};
use crate::error::SetupError;

/// Check that the scene has everything the controller relies on before the
/// first frame: a complete player body, complete vehicles and exactly one
/// enabled camera mount.
pub fn validate(world: &World, player: Entity) -> Result<(), SetupError> {
    let entity = world
        .entity(player)
        .map_err(|_| SetupError::NoSuchEntity(player))?;

    let missing = |component| SetupError::PlayerMissing {
        entity: player,
        component,
    };
    if !entity.has::<Player>() {
        return Err(missing("Player"));
    }
    if !entity.has::<LocalTransform>() {
        return Err(missing("LocalTransform"));
    }
    match entity.get::<&Collider>().as_deref() {
        Some(Collider::Capsule { .. }) => {}
        Some(_) => return Err(SetupError::PlayerNotCapsule(player)),
        None => return Err(missing("Collider")),
    }
    if !entity.has::<CameraMount>() {
        return Err(missing("CameraMount"));
    }

    for (vehicle, (_, local, mount)) in world
        .query::<(&Vehicle, Option<&LocalTransform>, Option<&CameraMount>)>()
        .iter()
    {
        let component = match (local, mount) {
            (None, _) => "LocalTransform",
            (_, None) => "CameraMount",
            _ => continue,
        };
        return Err(SetupError::VehicleMissing {
            entity: vehicle,
            component,
        });
    }

    let enabled = camera::enabled_mounts(world).len();
    if enabled != 1 {
        return Err(SetupError::CameraAuthority(enabled));
    }
    Ok(())
}
