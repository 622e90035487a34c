use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Collider, LocalTransform, Static};

/// Collision-aware displacement applier for the player body.
///
/// The locomotion state machine only talks to the mover through this trait,
/// so a physics engine's character controller can stand in for
/// [`CapsuleMover`].
pub trait Mover {
    /// Move `body` by `displacement` and resolve collisions. Updates the
    /// ground-contact flag reported by [`Mover::is_grounded`].
    fn sweep(&mut self, world: &mut World, body: Entity, displacement: Vec3);

    /// Whether the last sweep ended touching a supporting surface.
    fn is_grounded(&self) -> bool;

    fn height(&self) -> f32;

    /// Change the capsule height. Takes effect on the next sweep.
    fn set_height(&mut self, height: f32);
}

/// Contact normals with `y` above this count as ground.
const GROUND_NORMAL_MIN_Y: f32 = 0.7;
/// Surfaces within this distance count as touching without being pushed.
const CONTACT_SKIN: f32 = 0.01;
const RESOLVE_ITERATIONS: usize = 4;

/// Upright capsule mover that depenetrates against `Static` planes and boxes.
///
/// Moves first, then pushes the capsule out along each contact normal. Good
/// enough for the speeds involved here; it does not do continuous sweeps, so
/// thin geometry can be tunnelled at very high displacement.
#[derive(Debug, Clone)]
pub struct CapsuleMover {
    pub radius: f32,
    height: f32,
    grounded: bool,
}

impl CapsuleMover {
    pub fn new(radius: f32, height: f32) -> Self {
        Self {
            radius,
            height,
            grounded: false,
        }
    }

    /// Half length of the capsule's inner segment.
    fn half_segment(&self) -> f32 {
        (self.height * 0.5 - self.radius).max(0.0)
    }
}

impl Mover for CapsuleMover {
    fn sweep(&mut self, world: &mut World, body: Entity, displacement: Vec3) {
        let Ok(mut position) = world.get::<&LocalTransform>(body).map(|local| local.position) else {
            return;
        };
        position += displacement;

        let solids: Vec<(Vec3, Collider)> = world
            .query::<(&LocalTransform, &Collider)>()
            .with::<&Static>()
            .iter()
            .map(|(_, (local, collider))| (local.position, *collider))
            .collect();

        let capsule = Capsule {
            radius: self.radius,
            half_segment: self.half_segment(),
        };
        self.grounded = false;
        for _ in 0..RESOLVE_ITERATIONS {
            let mut pushed = false;
            for (origin, collider) in &solids {
                let Some(contact) = capsule.contact(position, *origin, collider) else {
                    continue;
                };
                if contact.normal.y > GROUND_NORMAL_MIN_Y {
                    self.grounded = true;
                }
                if contact.depth > 0.0 {
                    position += contact.normal * contact.depth;
                    pushed = true;
                }
            }
            if !pushed {
                break;
            }
        }

        if let Ok(mut local) = world.get::<&mut LocalTransform>(body) {
            local.position = position;
        }
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn set_height(&mut self, height: f32) {
        self.height = height;
    }
}

// ---------------------------------------------------------------------------
// Narrow phase
// ---------------------------------------------------------------------------

struct Capsule {
    radius: f32,
    half_segment: f32,
}

/// `normal` points from the solid toward the capsule (the push direction).
/// `depth` may be slightly negative for a touching-but-separated contact.
struct Contact {
    normal: Vec3,
    depth: f32,
}

fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

impl Capsule {
    fn contact(&self, center: Vec3, origin: Vec3, collider: &Collider) -> Option<Contact> {
        let top = center + Vec3::Y * self.half_segment;
        let bottom = center - Vec3::Y * self.half_segment;
        let contact = match collider {
            Collider::Plane { normal, offset } => {
                let min_dist = (top.dot(*normal) - offset).min(bottom.dot(*normal) - offset);
                Contact {
                    normal: *normal,
                    depth: self.radius - min_dist,
                }
            }
            Collider::Box { half_extents } => self.box_contact(bottom, top, origin, *half_extents)?,
            // Capsule-capsule is not needed: bodies never block each other.
            Collider::Capsule { .. } => return None,
        };
        (contact.depth > -CONTACT_SKIN).then_some(contact)
    }

    fn box_contact(&self, bottom: Vec3, top: Vec3, origin: Vec3, half: Vec3) -> Option<Contact> {
        let min = origin - half;
        let max = origin + half;

        // Alternate segment/box projections; two rounds settle for an upright
        // segment against an axis-aligned box.
        let mut on_segment = closest_point_on_segment(bottom, top, origin);
        let mut on_box = on_segment.clamp(min, max);
        for _ in 0..2 {
            on_segment = closest_point_on_segment(bottom, top, on_box);
            on_box = on_segment.clamp(min, max);
        }

        let diff = on_segment - on_box;
        let dist = diff.length();
        if dist > 1e-6 {
            return Some(Contact {
                normal: diff / dist,
                depth: self.radius - dist,
            });
        }

        // Segment point is inside the box: leave through the nearest face.
        let to_min = on_segment - min;
        let to_max = max - on_segment;
        let faces = [
            (to_min.x, Vec3::NEG_X),
            (to_max.x, Vec3::X),
            (to_min.y, Vec3::NEG_Y),
            (to_max.y, Vec3::Y),
            (to_min.z, Vec3::NEG_Z),
            (to_max.z, Vec3::Z),
        ];
        let (gap, normal) = faces
            .into_iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))?;
        Some(Contact {
            normal,
            depth: gap + self.radius,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn world_with_ground() -> World {
        let mut world = World::new();
        world.spawn((
            LocalTransform::new(Vec3::ZERO),
            Collider::Plane {
                normal: Vec3::Y,
                offset: 0.0,
            },
            Static,
        ));
        world
    }

    #[test]
    fn falls_onto_ground() {
        let mut world = world_with_ground();
        let body = world.spawn((LocalTransform::new(Vec3::new(0.0, 1.0, 0.0)),));
        let mut mover = CapsuleMover::new(0.5, 2.0);

        mover.sweep(&mut world, body, Vec3::new(0.0, -0.5, 0.0));

        let y = world.get::<&LocalTransform>(body).unwrap().position.y;
        assert_abs_diff_eq!(y, 1.0, epsilon = 1e-5);
        assert!(mover.is_grounded());
    }

    #[test]
    fn resting_contact_counts_as_grounded() {
        let mut world = world_with_ground();
        let body = world.spawn((LocalTransform::new(Vec3::new(0.0, 1.0, 0.0)),));
        let mut mover = CapsuleMover::new(0.5, 2.0);

        mover.sweep(&mut world, body, Vec3::ZERO);
        assert!(mover.is_grounded());

        mover.sweep(&mut world, body, Vec3::new(0.0, 0.5, 0.0));
        assert!(!mover.is_grounded());
    }

    #[test]
    fn crouched_capsule_sits_lower() {
        let mut world = world_with_ground();
        let body = world.spawn((LocalTransform::new(Vec3::new(0.0, 1.0, 0.0)),));
        let mut mover = CapsuleMover::new(0.5, 2.0);
        mover.set_height(1.0);

        for _ in 0..10 {
            mover.sweep(&mut world, body, Vec3::new(0.0, -0.1, 0.0));
        }
        let y = world.get::<&LocalTransform>(body).unwrap().position.y;
        assert_abs_diff_eq!(y, 0.5, epsilon = 1e-5);
    }

    #[test]
    fn lands_on_box_top() {
        let mut world = World::new();
        world.spawn((
            LocalTransform::new(Vec3::new(0.0, 0.5, 0.0)),
            Collider::Box {
                half_extents: Vec3::new(2.0, 0.5, 2.0),
            },
            Static,
        ));
        let body = world.spawn((LocalTransform::new(Vec3::new(0.0, 2.1, 0.0)),));
        let mut mover = CapsuleMover::new(0.5, 2.0);

        mover.sweep(&mut world, body, Vec3::new(0.0, -0.2, 0.0));

        let y = world.get::<&LocalTransform>(body).unwrap().position.y;
        assert_abs_diff_eq!(y, 2.0, epsilon = 1e-4);
        assert!(mover.is_grounded());
    }

    #[test]
    fn box_side_blocks_without_grounding() {
        let mut world = World::new();
        world.spawn((
            LocalTransform::new(Vec3::new(0.0, 1.0, 3.0)),
            Collider::Box {
                half_extents: Vec3::new(2.0, 1.0, 1.0),
            },
            Static,
        ));
        let body = world.spawn((LocalTransform::new(Vec3::new(0.0, 1.5, 1.0)),));
        let mut mover = CapsuleMover::new(0.5, 2.0);

        mover.sweep(&mut world, body, Vec3::new(0.0, 0.0, 0.8));

        let z = world.get::<&LocalTransform>(body).unwrap().position.z;
        assert_abs_diff_eq!(z, 1.5, epsilon = 1e-4);
        assert!(!mover.is_grounded());
    }

    #[test]
    fn missing_body_is_a_no_op() {
        let mut world = world_with_ground();
        let body = world.spawn(());
        let mut mover = CapsuleMover::new(0.5, 2.0);
        mover.sweep(&mut world, body, Vec3::Y);
        assert!(!mover.is_grounded());
    }
}
