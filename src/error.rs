use hecs::Entity;
use thiserror::Error;

use crate::config::ConfigError;

/// Fatal scene-setup errors, raised before the first frame runs.
///
/// Runtime precondition violations (double enter, exit without a link) are not
/// errors; they are absorbed and reported as `Effect::Ignored`.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("entity {0:?} does not exist")]
    NoSuchEntity(Entity),
    #[error("player {entity:?} is missing its {component} component")]
    PlayerMissing {
        entity: Entity,
        component: &'static str,
    },
    #[error("player {0:?} needs a capsule collider")]
    PlayerNotCapsule(Entity),
    #[error("vehicle {entity:?} is missing its {component} component")]
    VehicleMissing {
        entity: Entity,
        component: &'static str,
    },
    #[error("{0} camera mounts are enabled at setup, expected exactly one")]
    CameraAuthority(usize),
    #[error("invalid movement parameters: {0}")]
    Config(#[from] ConfigError),
}
