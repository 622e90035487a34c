use glam::Vec3;
use hecs::{Entity, World};

use crate::camera::{self, CameraMount};
use crate::components::{Effect, Inactive, LocalTransform, Refusal, Vehicle};
use crate::config::ModeParameters;
use crate::engine::input::InputSample;

use super::locomotion::LocomotionStateMachine;
use super::motion;
use super::mover::Mover;

/// The relation recording which vehicle the player currently controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PossessionLink {
    pub player: Entity,
    pub vehicle: Entity,
}

/// Result of an enter/exit request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    Linked(PossessionLink),
    Unlinked(PossessionLink),
    /// Precondition failed; nothing changed.
    Ignored(Refusal),
}

/// Hands camera and input authority between the player body and a vehicle.
///
/// State is a single `Option<PossessionLink>`: `None` is Unlinked, `Some` is
/// Linked. Both transitions are immediate. Every entry point is guarded the
/// same way, so a second enter while linked is always a no-op.
pub struct PossessionController {
    player: Entity,
    link: Option<PossessionLink>,
}

impl PossessionController {
    pub fn new(player: Entity) -> Self {
        Self { player, link: None }
    }

    pub fn link(&self) -> Option<PossessionLink> {
        self.link
    }

    /// Possess `vehicle` with `body`.
    ///
    /// Ignored when a link already exists, when `body` is not the controlled
    /// player, or when `vehicle` is not a usable vehicle.
    pub fn enter(
        &mut self,
        world: &mut World,
        machine: &mut LocomotionStateMachine,
        body: Entity,
        vehicle: Entity,
        effects: &mut Vec<Effect>,
    ) -> Handoff {
        if let Some(link) = self.link {
            return ignore(
                Refusal::AlreadyLinked {
                    vehicle: link.vehicle,
                },
                effects,
            );
        }
        if body != self.player {
            return ignore(Refusal::ForeignBody(body), effects);
        }
        let usable = world
            .satisfies::<(&Vehicle, &LocalTransform, &CameraMount)>(vehicle)
            .unwrap_or(false);
        if !usable {
            return ignore(Refusal::NotAVehicle(vehicle), effects);
        }
        if let Ok(mut seat) = world.get::<&mut Vehicle>(vehicle) {
            match seat.occupant {
                Some(occupant) if occupant != body => {
                    return ignore(Refusal::Occupied { vehicle, occupant }, effects);
                }
                _ => seat.occupant = Some(body),
            }
        }

        let link = PossessionLink {
            player: body,
            vehicle,
        };
        let _ = world.insert_one(body, Inactive);
        camera::transfer_authority(world, body, vehicle);
        self.link = Some(link);

        effects.extend(machine.begin_piloting());
        effects.push(Effect::Possessed { vehicle });
        log::info!("[possession] {:?} took control of {:?}", body, vehicle);
        Handoff::Linked(link)
    }

    /// Release the possessed vehicle. A no-op without a link.
    pub fn exit(
        &mut self,
        world: &mut World,
        machine: &mut LocomotionStateMachine,
        mover: &mut dyn Mover,
        params: &ModeParameters,
        effects: &mut Vec<Effect>,
    ) -> Handoff {
        let Some(link) = self.link.take() else {
            return ignore(Refusal::NotLinked, effects);
        };

        if let Ok(mut seat) = world.get::<&mut Vehicle>(link.vehicle) {
            seat.occupant = None;
        }
        let _ = world.remove_one::<Inactive>(link.player);
        camera::transfer_authority(world, link.vehicle, link.player);

        effects.extend(machine.end_piloting(world, link.player, mover, params));
        effects.push(Effect::Released {
            vehicle: link.vehicle,
        });
        log::info!("[possession] {:?} left {:?}", link.player, link.vehicle);
        Handoff::Unlinked(link)
    }

    /// Drive the possessed vehicle for one frame.
    ///
    /// Horizontal movement follows the vehicle's yaw at `pilot_speed`;
    /// rise/sink moves it straight up or down. The delta is added directly to
    /// the vehicle position with no collision.
    pub fn pilot(
        &self,
        world: &mut World,
        machine: &mut LocomotionStateMachine,
        input: &InputSample,
        params: &ModeParameters,
        dt: f32,
    ) {
        let Some(link) = self.link else {
            return;
        };
        let look = machine.look_mut();
        if let Ok(mut local) = world.get::<&mut LocalTransform>(link.vehicle) {
            let horizontal = motion::horizontal_velocity(local.rotation, input, params.pilot_speed);
            let vertical = motion::vertical_drive(input, params.pilot_speed);
            local.position += (horizontal + Vec3::Y * vertical) * dt;
            local.rotation = motion::yaw_rotation(local.rotation, look.yaw_delta(input.look_dx));
        }
        look.look(input.look_dy);
        camera::apply_pitch(world, link.vehicle, look);
    }
}

fn ignore(refusal: Refusal, effects: &mut Vec<Effect>) -> Handoff {
    log::debug!("[possession] ignored: {:?}", refusal);
    effects.push(Effect::Ignored(refusal));
    Handoff::Ignored(refusal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::MovementMode;
    use crate::engine::input::Button;
    use crate::systems::mover::CapsuleMover;
    use approx::assert_abs_diff_eq;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        world: World,
        player: Entity,
        vehicle: Entity,
        machine: LocomotionStateMachine,
        possession: PossessionController,
        mover: CapsuleMover,
        params: ModeParameters,
    }

    impl Rig {
        fn new() -> Self {
            let params = ModeParameters::default();
            let mut world = World::new();
            let player = world.spawn((
                LocalTransform::new(Vec3::new(0.0, 1.0, 0.0)),
                CameraMount::new(true),
            ));
            let vehicle = world.spawn((
                Vehicle::default(),
                LocalTransform::new(Vec3::new(0.0, 1.0, 5.0)),
                CameraMount::new(false),
            ));
            Self {
                world,
                player,
                vehicle,
                machine: LocomotionStateMachine::new(&params),
                possession: PossessionController::new(player),
                mover: CapsuleMover::new(0.5, params.standing_height),
                params,
            }
        }

        fn enter(&mut self, vehicle: Entity) -> Handoff {
            let mut effects = Vec::new();
            self.possession
                .enter(&mut self.world, &mut self.machine, self.player, vehicle, &mut effects)
        }

        fn exit(&mut self) -> Handoff {
            let mut effects = Vec::new();
            self.possession.exit(
                &mut self.world,
                &mut self.machine,
                &mut self.mover,
                &self.params,
                &mut effects,
            )
        }

        fn camera_enabled(&self, entity: Entity) -> bool {
            self.world.get::<&CameraMount>(entity).unwrap().enabled
        }
    }

    #[test]
    fn enter_hands_over_authority() {
        let mut rig = Rig::new();
        let handoff = rig.enter(rig.vehicle);

        assert!(matches!(handoff, Handoff::Linked(_)));
        assert_eq!(rig.machine.mode(), MovementMode::Piloting);
        assert!(rig.world.get::<&Inactive>(rig.player).is_ok());
        assert!(!rig.camera_enabled(rig.player));
        assert!(rig.camera_enabled(rig.vehicle));
        assert_eq!(
            rig.world.get::<&Vehicle>(rig.vehicle).unwrap().occupant,
            Some(rig.player)
        );
    }

    #[test]
    fn second_enter_is_ignored() {
        let mut rig = Rig::new();
        rig.enter(rig.vehicle);
        let other = rig.world.spawn((
            Vehicle::default(),
            LocalTransform::new(Vec3::ZERO),
            CameraMount::new(false),
        ));

        let handoff = rig.enter(other);
        assert_eq!(
            handoff,
            Handoff::Ignored(Refusal::AlreadyLinked {
                vehicle: rig.vehicle
            })
        );
        assert_eq!(rig.possession.link().map(|l| l.vehicle), Some(rig.vehicle));
        assert!(!rig.camera_enabled(other));
    }

    #[test]
    fn non_vehicle_is_refused() {
        let mut rig = Rig::new();
        let rock = rig.world.spawn((LocalTransform::new(Vec3::ZERO),));
        assert_eq!(rig.enter(rock), Handoff::Ignored(Refusal::NotAVehicle(rock)));
        assert_eq!(rig.machine.mode(), MovementMode::Grounded { crouched: false });
        assert!(rig.world.get::<&Inactive>(rig.player).is_err());
    }

    #[test]
    fn foreign_body_is_refused() {
        let mut rig = Rig::new();
        let stranger = rig.world.spawn(());
        let mut effects = Vec::new();
        let handoff = rig.possession.enter(
            &mut rig.world,
            &mut rig.machine,
            stranger,
            rig.vehicle,
            &mut effects,
        );
        assert_eq!(handoff, Handoff::Ignored(Refusal::ForeignBody(stranger)));
        assert_eq!(effects, vec![Effect::Ignored(Refusal::ForeignBody(stranger))]);
    }

    #[test]
    fn exit_without_link_is_a_no_op() {
        let mut rig = Rig::new();
        assert_eq!(rig.exit(), Handoff::Ignored(Refusal::NotLinked));
        assert!(rig.camera_enabled(rig.player));
        assert_eq!(rig.machine.mode(), MovementMode::Grounded { crouched: false });
    }

    #[test]
    fn exit_restores_player() {
        let mut rig = Rig::new();
        rig.enter(rig.vehicle);
        let handoff = rig.exit();

        assert!(matches!(handoff, Handoff::Unlinked(link) if link.vehicle == rig.vehicle));
        assert!(rig.world.get::<&Inactive>(rig.player).is_err());
        assert!(rig.camera_enabled(rig.player));
        assert!(!rig.camera_enabled(rig.vehicle));
        assert_eq!(rig.world.get::<&Vehicle>(rig.vehicle).unwrap().occupant, None);
        assert_eq!(rig.possession.link(), None);
    }

    #[test]
    fn pilot_moves_vehicle_directly() {
        let mut rig = Rig::new();
        rig.enter(rig.vehicle);
        let input = InputSample::new(0.0, 1.0).holding(Button::Rise);
        for _ in 0..60 {
            rig.possession
                .pilot(&mut rig.world, &mut rig.machine, &input, &rig.params, DT);
        }
        let position = rig.world.get::<&LocalTransform>(rig.vehicle).unwrap().position;
        assert_abs_diff_eq!(position.z, 10.0, epsilon = 1e-3);
        assert_abs_diff_eq!(position.y, 6.0, epsilon = 1e-3);

        let player = rig.world.get::<&LocalTransform>(rig.player).unwrap().position;
        assert_eq!(player, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn pilot_look_turns_vehicle_and_shares_pitch() {
        let mut rig = Rig::new();
        rig.machine.look_mut().look(-5.0);
        rig.enter(rig.vehicle);

        let input = InputSample::default().with_look(45.0, -20.0);
        rig.possession
            .pilot(&mut rig.world, &mut rig.machine, &input, &rig.params, DT);

        let yaw = rig.world.get::<&LocalTransform>(rig.vehicle).unwrap().yaw_degrees();
        assert_abs_diff_eq!(yaw, 90.0, epsilon = 1e-3);
        assert_eq!(rig.machine.look().pitch, 45.0);
        let mount = *rig.world.get::<&CameraMount>(rig.vehicle).unwrap();
        assert_eq!(mount.local_rotation, rig.machine.look().camera_rotation());
    }
}
