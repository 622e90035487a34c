use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Collider, Inactive, LocalTransform};

/// What a trigger volume represents. Closed set; routing matches on it
/// exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VolumeTag {
    Liquid,
    /// Entry volume of a vehicle. The vehicle entity is the volume entity.
    Vehicle,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    Enter,
    Exit,
}

/// A body started or stopped overlapping a tagged trigger volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeEvent {
    pub overlap: Overlap,
    pub tag: VolumeTag,
    pub volume: Entity,
    pub body: Entity,
}

impl VolumeEvent {
    pub fn enter(tag: VolumeTag, volume: Entity, body: Entity) -> Self {
        Self {
            overlap: Overlap::Enter,
            tag,
            volume,
            body,
        }
    }

    pub fn exit(tag: VolumeTag, volume: Entity, body: Entity) -> Self {
        Self {
            overlap: Overlap::Exit,
            tag,
            volume,
            body,
        }
    }
}

/// Axis-aligned trigger region centred on the entity's transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerVolume {
    pub tag: VolumeTag,
    pub half_extents: Vec3,
}

/// Generates [`VolumeEvent`]s from `TriggerVolume` components.
///
/// Each frame, every active capsule body's AABB is tested against every
/// volume and the difference to last frame's overlap set is reported.
/// Bodies carrying `Inactive` are skipped entirely and keep their previous
/// overlaps, so nothing fires for them until they are active again. On the
/// first frame a body is active again, liquid volumes it still touches are
/// reported as fresh enters, since the consumer drops liquid memberships
/// while the body is inactive. Vehicle volumes are not re-reported.
#[derive(Debug, Default)]
pub struct OverlapDetector {
    overlapping: HashSet<(Entity, Entity)>,
    /// Capsule bodies that carried `Inactive` on the last detect.
    dormant: HashSet<Entity>,
}

impl OverlapDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `body` is currently recorded inside `volume`.
    pub fn contains(&self, body: Entity, volume: Entity) -> bool {
        self.overlapping.contains(&(body, volume))
    }

    pub fn detect(&mut self, world: &World) -> Vec<VolumeEvent> {
        let volumes: Vec<(Entity, VolumeTag, Vec3, Vec3)> = world
            .query::<(&LocalTransform, &TriggerVolume)>()
            .iter()
            .map(|(entity, (local, volume))| {
                (
                    entity,
                    volume.tag,
                    local.position - volume.half_extents,
                    local.position + volume.half_extents,
                )
            })
            .collect();

        let mut events = Vec::new();
        let mut current = HashSet::new();
        let mut active = HashSet::new();

        for (body, (local, collider)) in world
            .query::<(&LocalTransform, &Collider)>()
            .without::<&Inactive>()
            .iter()
        {
            let Collider::Capsule { radius, height } = *collider else {
                continue;
            };
            active.insert(body);
            let half = Vec3::new(radius, height * 0.5, radius);
            let (body_min, body_max) = (local.position - half, local.position + half);

            for &(volume, tag, min, max) in &volumes {
                if volume == body {
                    continue;
                }
                let touching = body_min.cmple(max).all() && body_max.cmpge(min).all();
                if !touching {
                    continue;
                }
                current.insert((body, volume));
                let known = self.overlapping.contains(&(body, volume));
                let woke_in_liquid = tag == VolumeTag::Liquid && self.dormant.contains(&body);
                if !known || woke_in_liquid {
                    events.push(VolumeEvent::enter(tag, volume, body));
                }
            }
        }

        for &(body, volume) in &self.overlapping {
            if !active.contains(&body) {
                // Frozen while inactive.
                if world.contains(body) {
                    current.insert((body, volume));
                }
                continue;
            }
            if current.contains(&(body, volume)) {
                continue;
            }
            let tag = world
                .get::<&TriggerVolume>(volume)
                .map(|trigger| trigger.tag)
                .unwrap_or(VolumeTag::Other);
            events.push(VolumeEvent::exit(tag, volume, body));
        }

        // Exits before enters, so a body moving straight from one volume into
        // another leaves the old one first.
        events.sort_by_key(|event| event.overlap == Overlap::Enter);
        self.overlapping = current;
        self.dormant = world
            .query::<&Collider>()
            .with::<&Inactive>()
            .iter()
            .filter(|(_, collider)| matches!(collider, Collider::Capsule { .. }))
            .map(|(body, _)| body)
            .collect();
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn_body(world: &mut World, position: Vec3) -> Entity {
        world.spawn((
            LocalTransform::new(position),
            Collider::Capsule {
                radius: 0.5,
                height: 2.0,
            },
        ))
    }

    fn spawn_pool(world: &mut World) -> Entity {
        world.spawn((
            LocalTransform::new(Vec3::new(10.0, 1.0, 0.0)),
            TriggerVolume {
                tag: VolumeTag::Liquid,
                half_extents: Vec3::new(2.0, 1.0, 2.0),
            },
        ))
    }

    fn move_to(world: &mut World, body: Entity, position: Vec3) {
        world.get::<&mut LocalTransform>(body).unwrap().position = position;
    }

    #[test]
    fn reports_enter_once_then_exit() {
        let mut world = World::new();
        let pool = spawn_pool(&mut world);
        let body = spawn_body(&mut world, Vec3::new(0.0, 1.0, 0.0));
        let mut detector = OverlapDetector::new();

        assert!(detector.detect(&world).is_empty());

        move_to(&mut world, body, Vec3::new(9.0, 1.0, 0.0));
        assert_eq!(
            detector.detect(&world),
            vec![VolumeEvent::enter(VolumeTag::Liquid, pool, body)]
        );
        assert!(detector.detect(&world).is_empty());
        assert!(detector.contains(body, pool));

        move_to(&mut world, body, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(
            detector.detect(&world),
            vec![VolumeEvent::exit(VolumeTag::Liquid, pool, body)]
        );
    }

    #[test]
    fn inactive_body_is_frozen() {
        let mut world = World::new();
        let pool = spawn_pool(&mut world);
        let body = spawn_body(&mut world, Vec3::new(9.0, 1.0, 0.0));
        let mut detector = OverlapDetector::new();
        detector.detect(&world);

        world.insert_one(body, Inactive).unwrap();
        move_to(&mut world, body, Vec3::new(0.0, 1.0, 0.0));
        assert!(detector.detect(&world).is_empty());
        assert!(detector.contains(body, pool));

        world.remove_one::<Inactive>(body).unwrap();
        assert_eq!(
            detector.detect(&world),
            vec![VolumeEvent::exit(VolumeTag::Liquid, pool, body)]
        );
    }

    #[test]
    fn reactivated_body_is_told_about_its_liquid_again() {
        let mut world = World::new();
        let pool = spawn_pool(&mut world);
        let hatch = world.spawn((
            LocalTransform::new(Vec3::new(11.0, 1.0, 0.0)),
            TriggerVolume {
                tag: VolumeTag::Vehicle,
                half_extents: Vec3::ONE,
            },
        ));
        let body = spawn_body(&mut world, Vec3::new(10.0, 1.0, 0.0));
        let mut detector = OverlapDetector::new();
        assert_eq!(detector.detect(&world).len(), 2);

        world.insert_one(body, Inactive).unwrap();
        assert!(detector.detect(&world).is_empty());
        assert!(detector.detect(&world).is_empty());

        world.remove_one::<Inactive>(body).unwrap();
        assert_eq!(
            detector.detect(&world),
            vec![VolumeEvent::enter(VolumeTag::Liquid, pool, body)]
        );
        assert!(detector.contains(body, hatch));
        assert!(detector.detect(&world).is_empty());
    }

    #[test]
    fn exits_come_before_enters() {
        let mut world = World::new();
        let first = spawn_pool(&mut world);
        let second = world.spawn((
            LocalTransform::new(Vec3::new(20.0, 1.0, 0.0)),
            TriggerVolume {
                tag: VolumeTag::Other,
                half_extents: Vec3::splat(2.0),
            },
        ));
        let body = spawn_body(&mut world, Vec3::new(10.0, 1.0, 0.0));
        let mut detector = OverlapDetector::new();
        detector.detect(&world);

        move_to(&mut world, body, Vec3::new(20.0, 1.0, 0.0));
        assert_eq!(
            detector.detect(&world),
            vec![
                VolumeEvent::exit(VolumeTag::Liquid, first, body),
                VolumeEvent::enter(VolumeTag::Other, second, body),
            ]
        );
    }

    #[test]
    fn volume_on_body_does_not_trigger_itself() {
        let mut world = World::new();
        world.spawn((
            LocalTransform::new(Vec3::ZERO),
            Collider::Capsule {
                radius: 0.5,
                height: 2.0,
            },
            TriggerVolume {
                tag: VolumeTag::Vehicle,
                half_extents: Vec3::ONE,
            },
        ));
        let mut detector = OverlapDetector::new();
        assert!(detector.detect(&world).is_empty());
    }
}
