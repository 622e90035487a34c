use glam::{Quat, Vec3};

/// Spatial transform of a body: world position and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl LocalTransform {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Transform facing `yaw_degrees` around +Y (0 faces +Z, 90 faces +X).
    pub fn with_yaw(position: Vec3, yaw_degrees: f32) -> Self {
        Self {
            position,
            rotation: Quat::from_rotation_y(yaw_degrees.to_radians()),
        }
    }

    /// Heading around +Y in degrees, in `(-180, 180]`.
    pub fn yaw_degrees(&self) -> f32 {
        let forward = self.rotation * Vec3::Z;
        forward.x.atan2(forward.z).to_degrees()
    }
}

/// Collision shape attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// Upright capsule centred on the transform. `height` is the full height
    /// including both hemispheres.
    Capsule { radius: f32, height: f32 },
    /// Infinite plane: points `p` with `p.dot(normal) == offset`.
    Plane { normal: Vec3, offset: f32 },
    /// Axis-aligned box centred on the transform.
    Box { half_extents: Vec3 },
}

impl Collider {
    /// Resize a capsule. Other shapes are left alone.
    pub fn set_capsule_height(&mut self, new_height: f32) {
        if let Collider::Capsule { height, .. } = self {
            *height = new_height;
        }
    }
}

/// Marker: entity is immovable level geometry the mover collides against.
pub struct Static;
