use glam::Vec3;
use hecs::{Entity, World};

use crate::scene::prefabs::{
    spawn_ground, spawn_liquid, spawn_player, spawn_static_box, spawn_vehicle,
};

/// Handles to the interesting entities of the test scene.
#[derive(Debug, Clone, Copy)]
pub struct TestScene {
    pub player: Entity,
    pub vehicle: Entity,
    pub lagoon: Entity,
    pub ledge: Entity,
}

/// Build the test scene.
///
/// Layout, with the player at the origin facing +Z:
/// - vehicle 10 m ahead (+Z), entry volume 3 × 3 × 5 m
/// - lagoon to the right (+X), spanning x 6..18, 3 m deep
/// - a knee-high ledge behind (-Z)
pub fn load_test_scene(world: &mut World) -> TestScene {
    spawn_ground(world);

    let ledge = spawn_static_box(world, Vec3::new(0.0, 0.25, -6.0), Vec3::new(2.0, 0.25, 1.5));

    let vehicle = spawn_vehicle(
        world,
        Vec3::new(0.0, 1.0, 10.0),
        0.0,
        Vec3::new(1.5, 1.5, 2.5),
    );

    let lagoon = spawn_liquid(world, Vec3::new(12.0, 1.5, 0.0), Vec3::new(6.0, 1.5, 8.0));

    let player = spawn_player(world, Vec3::new(0.0, 1.0, 0.0), 2.0);

    TestScene {
        player,
        vehicle,
        lagoon,
        ledge,
    }
}
