use glam::Vec3;
use hecs::{Entity, World};

use crate::components::{Collider, Effect, LocalTransform, MovementMode, Refusal};
use crate::config::ModeParameters;
use crate::engine::input::{Button, DeviceEvent, InputSample, InputState};
use crate::engine::time::FrameClock;
use crate::error::SetupError;
use crate::scene;
use crate::systems::{
    Cue, CueSelector, CapsuleMover, Handoff, LocomotionStateMachine, Mover, Overlap,
    OverlapDetector, PossessionController, PossessionLink, VolumeEvent, VolumeTag,
};
use crate::ui::{DebugHud, HudSnapshot};

/// Per-frame controller for one player body.
///
/// Composes the locomotion state machine, the possession controller and the
/// mover. All state changes happen inside [`Controller::step`] (or the
/// explicit [`enter`](Controller::enter) / [`exit`](Controller::exit)
/// calls), one frame at a time.
pub struct Controller<M: Mover = CapsuleMover> {
    player: Entity,
    params: ModeParameters,
    machine: LocomotionStateMachine,
    possession: PossessionController,
    mover: M,
}

impl Controller<CapsuleMover> {
    /// Build a controller whose capsule mover matches the player's collider.
    pub fn with_capsule(
        world: &mut World,
        player: Entity,
        params: ModeParameters,
    ) -> Result<Self, SetupError> {
        let radius = match world.get::<&Collider>(player).as_deref() {
            Ok(Collider::Capsule { radius, .. }) => *radius,
            Ok(_) => return Err(SetupError::PlayerNotCapsule(player)),
            Err(_) => {
                return Err(SetupError::PlayerMissing {
                    entity: player,
                    component: "Collider",
                })
            }
        };
        let mover = CapsuleMover::new(radius, params.standing_height);
        Self::new(world, player, params, mover)
    }
}

impl<M: Mover> Controller<M> {
    /// Validate the scene and take control of `player`. The player's capsule
    /// collider is resized to `standing_height` along with the mover.
    pub fn new(
        world: &mut World,
        player: Entity,
        params: ModeParameters,
        mut mover: M,
    ) -> Result<Self, SetupError> {
        params.validate()?;
        scene::validate(world, player)?;
        mover.set_height(params.standing_height);
        if let Ok(mut collider) = world.get::<&mut Collider>(player) {
            collider.set_capsule_height(params.standing_height);
        }
        log::info!("[controller] player {:?} ready", player);
        Ok(Self {
            player,
            machine: LocomotionStateMachine::new(&params),
            possession: PossessionController::new(player),
            params,
            mover,
        })
    }

    /// Advance one frame.
    ///
    /// Trigger events are routed first, in the order given. While piloting
    /// the vehicle is driven and then the exit press is honoured; otherwise
    /// the active locomotion mode integrates the player body. Returns every
    /// observable effect of the frame in order.
    pub fn step(
        &mut self,
        world: &mut World,
        dt: f32,
        input: &InputSample,
        events: &[VolumeEvent],
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.machine.tick(dt);

        for event in events {
            self.route(world, event, &mut effects);
        }

        if self.machine.mode().is_piloting() {
            self.possession
                .pilot(world, &mut self.machine, input, &self.params, dt);
            if input.was_pressed(Button::Exit) {
                self.possession.exit(
                    world,
                    &mut self.machine,
                    &mut self.mover,
                    &self.params,
                    &mut effects,
                );
            }
        } else {
            self.machine.update(
                world,
                self.player,
                &mut self.mover,
                input,
                &self.params,
                dt,
                &mut effects,
            );
        }

        debug_assert_eq!(
            self.possession.link().is_some(),
            self.machine.mode().is_piloting(),
            "possession link must exist exactly while piloting"
        );
        effects
    }

    fn route(&mut self, world: &mut World, event: &VolumeEvent, effects: &mut Vec<Effect>) {
        log::trace!("[triggers] {:?}", event);
        match (event.tag, event.overlap) {
            (VolumeTag::Other, _) => {}
            _ if event.body != self.player => {
                log::debug!("[triggers] ignored event for {:?}", event.body);
                effects.push(Effect::Ignored(Refusal::ForeignBody(event.body)));
            }
            (VolumeTag::Liquid, Overlap::Enter) => self.machine.enter_liquid(event.volume, effects),
            (VolumeTag::Liquid, Overlap::Exit) => self.machine.exit_liquid(event.volume, effects),
            (VolumeTag::Vehicle, Overlap::Enter) => {
                self.possession
                    .enter(world, &mut self.machine, event.body, event.volume, effects);
            }
            (VolumeTag::Vehicle, Overlap::Exit) => match self.possession.link() {
                Some(link) if link.vehicle != event.volume => {
                    log::debug!("[triggers] exit of {:?} while in {:?}", event.volume, link.vehicle);
                    effects.push(Effect::Ignored(Refusal::OtherVehicle(event.volume)));
                }
                _ => {
                    self.possession.exit(
                        world,
                        &mut self.machine,
                        &mut self.mover,
                        &self.params,
                        effects,
                    );
                }
            },
        }
    }

    /// Possess `vehicle` outside of trigger routing. Same guards as the
    /// trigger path.
    pub fn enter(&mut self, world: &mut World, vehicle: Entity) -> (Handoff, Vec<Effect>) {
        let mut effects = Vec::new();
        let handoff =
            self.possession
                .enter(world, &mut self.machine, self.player, vehicle, &mut effects);
        (handoff, effects)
    }

    pub fn exit(&mut self, world: &mut World) -> (Handoff, Vec<Effect>) {
        let mut effects = Vec::new();
        let handoff = self.possession.exit(
            world,
            &mut self.machine,
            &mut self.mover,
            &self.params,
            &mut effects,
        );
        (handoff, effects)
    }

    pub fn mode(&self) -> MovementMode {
        self.machine.mode()
    }

    pub fn link(&self) -> Option<PossessionLink> {
        self.possession.link()
    }

    pub fn machine(&self) -> &LocomotionStateMachine {
        &self.machine
    }

    pub fn mover(&self) -> &M {
        &self.mover
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    pub fn params(&self) -> &ModeParameters {
        &self.params
    }

    /// The body currently holding camera and input authority.
    pub fn authority(&self) -> Entity {
        self.link().map_or(self.player, |link| link.vehicle)
    }
}

/// What one [`Session::frame`] produced.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame: u64,
    pub volume_events: Vec<VolumeEvent>,
    pub effects: Vec<Effect>,
    pub cue: Cue,
}

/// A controller wired to its collaborators: device input folding, the
/// overlap detector, a fixed-step clock, cue selection and the status panel.
pub struct Session {
    pub world: World,
    pub controller: Controller,
    pub detector: OverlapDetector,
    pub input: InputState,
    pub clock: FrameClock,
    pub cues: CueSelector,
    pub hud: DebugHud,
}

impl Session {
    pub fn new(
        mut world: World,
        player: Entity,
        params: ModeParameters,
        dt: f32,
    ) -> Result<Self, SetupError> {
        let controller = Controller::with_capsule(&mut world, player, params)?;
        Ok(Self {
            world,
            controller,
            detector: OverlapDetector::new(),
            input: InputState::new(),
            clock: FrameClock::new(dt),
            cues: CueSelector::default(),
            hud: DebugHud::new(),
        })
    }

    pub fn frame(&mut self, device_events: &[DeviceEvent]) -> FrameReport {
        let (_, now) = self.clock.tick();
        self.input.update(device_events);
        let sample = self.input.sample();

        let volume_events = self.detector.detect(&self.world);
        let effects = self
            .controller
            .step(&mut self.world, self.clock.dt, &sample, &volume_events);
        let cue = self.cues.update(self.controller.mode(), &sample, now);
        self.hud.update(self.clock.dt);

        FrameReport {
            frame: self.clock.frame,
            volume_events,
            effects,
            cue,
        }
    }

    pub fn hud_lines(&self) -> [String; 5] {
        let holder = self.controller.authority();
        let (position, yaw) = self
            .world
            .get::<&LocalTransform>(holder)
            .map(|local| (local.position, local.yaw_degrees()))
            .unwrap_or((Vec3::ZERO, 0.0));
        self.hud.lines(&HudSnapshot {
            position,
            yaw,
            pitch: self.controller.machine().look().pitch,
            mode: self.controller.mode(),
            vehicle: self.controller.link().map(|link| link.vehicle),
        })
    }
}
