use std::collections::HashSet;

use glam::Vec3;
use hecs::{Entity, World};

use crate::camera::{self, LookState};
use crate::components::{Collider, Effect, LocalTransform, ModeFsm, MovementMode, Refusal};
use crate::config::ModeParameters;
use crate::engine::input::{Button, InputSample};

use super::motion;
use super::mover::Mover;

/// Owns the player's movement mode, look state and vertical accumulators.
///
/// Grounded/Swimming transitions come from liquid trigger events; Piloting is
/// entered and left only through `PossessionController`, which calls
/// [`begin_piloting`](Self::begin_piloting) and
/// [`end_piloting`](Self::end_piloting).
pub struct LocomotionStateMachine {
    fsm: ModeFsm,
    look: LookState,
    /// Persistent vertical velocity (jump, gravity, last swim stroke).
    vertical_velocity: f32,
    /// Accumulated buoyancy while swimming. Reset on entering liquid.
    buoyancy_lift: f32,
    /// Crouch flag carried through a swim so it comes back on leaving liquid.
    crouched: bool,
    /// Liquid volumes the player is currently inside.
    submerged: HashSet<Entity>,
}

impl LocomotionStateMachine {
    pub fn new(params: &ModeParameters) -> Self {
        Self {
            fsm: ModeFsm::new(MovementMode::default()),
            look: LookState::new(params.look_sensitivity, params.pitch_limit),
            vertical_velocity: 0.0,
            buoyancy_lift: 0.0,
            crouched: false,
            submerged: HashSet::new(),
        }
    }

    pub fn mode(&self) -> MovementMode {
        self.fsm.state
    }

    pub fn fsm(&self) -> &ModeFsm {
        &self.fsm
    }

    pub fn look(&self) -> &LookState {
        &self.look
    }

    pub fn look_mut(&mut self) -> &mut LookState {
        &mut self.look
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn buoyancy_lift(&self) -> f32 {
        self.buoyancy_lift
    }

    pub fn is_submerged(&self) -> bool {
        !self.submerged.is_empty()
    }

    pub fn tick(&mut self, dt: f32) {
        self.fsm.tick(dt);
    }

    fn transition(&mut self, next: MovementMode) -> Option<Effect> {
        let from = self.fsm.go(next)?;
        log::debug!("[locomotion] {} -> {}", from, next);
        Some(Effect::ModeChanged { from, to: next })
    }

    // -----------------------------------------------------------------------
    // Liquid volumes
    // -----------------------------------------------------------------------

    /// The player entered liquid `volume`. Ignored while piloting.
    pub fn enter_liquid(&mut self, volume: Entity, effects: &mut Vec<Effect>) {
        if self.mode().is_piloting() {
            log::debug!("[locomotion] liquid {:?} ignored while piloting", volume);
            effects.push(Effect::Ignored(Refusal::Piloting { volume }));
            return;
        }
        let first = self.submerged.is_empty();
        self.submerged.insert(volume);
        if !first {
            return;
        }
        if let MovementMode::Grounded { crouched } = self.mode() {
            self.crouched = crouched;
        }
        self.buoyancy_lift = 0.0;
        effects.extend(self.transition(MovementMode::Swimming));
    }

    /// The player left liquid `volume`. Back to grounded once no liquid
    /// volume contains the player any more.
    pub fn exit_liquid(&mut self, volume: Entity, effects: &mut Vec<Effect>) {
        if self.mode().is_piloting() {
            log::debug!("[locomotion] liquid {:?} ignored while piloting", volume);
            effects.push(Effect::Ignored(Refusal::Piloting { volume }));
            return;
        }
        if !self.submerged.remove(&volume) || !self.submerged.is_empty() {
            return;
        }
        let crouched = self.crouched;
        effects.extend(self.transition(MovementMode::Grounded { crouched }));
    }

    // -----------------------------------------------------------------------
    // Piloting handoff
    // -----------------------------------------------------------------------

    /// Switch to Piloting. The player body goes inactive and its liquid
    /// memberships are dropped. `OverlapDetector` reports the liquids the body
    /// still touches as new enters on the first frame after it wakes up.
    pub(crate) fn begin_piloting(&mut self) -> Option<Effect> {
        self.submerged.clear();
        self.buoyancy_lift = 0.0;
        self.transition(MovementMode::Piloting)
    }

    /// Leave Piloting for non-crouched Grounded. Prior crouch state is
    /// discarded and the capsule goes back to standing height.
    pub(crate) fn end_piloting(
        &mut self,
        world: &mut World,
        body: Entity,
        mover: &mut dyn Mover,
        params: &ModeParameters,
    ) -> Option<Effect> {
        self.crouched = false;
        self.vertical_velocity = 0.0;
        resize_capsule(world, body, mover, params.standing_height);
        self.transition(MovementMode::Grounded { crouched: false })
    }

    // -----------------------------------------------------------------------
    // Per-frame update
    // -----------------------------------------------------------------------

    /// Integrate one frame of Grounded or Swimming movement for `body`.
    /// Does nothing while piloting; the possession controller drives then.
    pub fn update(
        &mut self,
        world: &mut World,
        body: Entity,
        mover: &mut dyn Mover,
        input: &InputSample,
        params: &ModeParameters,
        dt: f32,
        effects: &mut Vec<Effect>,
    ) {
        let Ok(rotation) = world.get::<&LocalTransform>(body).map(|local| local.rotation) else {
            return;
        };
        let grounded = mover.is_grounded();

        let velocity = match self.mode() {
            MovementMode::Piloting => return,

            MovementMode::Grounded { mut crouched } => {
                if input.was_pressed(Button::Crouch) {
                    crouched = !crouched;
                    self.crouched = crouched;
                    resize_capsule(world, body, mover, params.capsule_height(crouched));
                    effects.extend(self.transition(MovementMode::Grounded { crouched }));
                }

                let speed = params.grounded_speed(crouched, input.is_held(Button::Sprint));
                let horizontal = motion::horizontal_velocity(rotation, input, speed);

                let (vertical, jumped) = motion::grounded_vertical(
                    self.vertical_velocity,
                    input.was_pressed(Button::Jump),
                    grounded,
                    params,
                    dt,
                );
                if jumped {
                    effects.push(Effect::Jumped {
                        impulse: params.jump_impulse,
                    });
                }
                self.vertical_velocity = vertical;
                horizontal + Vec3::Y * vertical
            }

            MovementMode::Swimming => {
                let horizontal = motion::horizontal_velocity(rotation, input, params.swim_speed);
                self.buoyancy_lift = motion::buoyancy_lift(self.buoyancy_lift, grounded, params, dt);
                let vertical = motion::vertical_drive(input, params.swim_speed) + self.buoyancy_lift;
                // Carried into the grounded integration when the swim ends.
                self.vertical_velocity = vertical;
                horizontal + Vec3::Y * vertical
            }
        };

        mover.sweep(world, body, velocity * dt);
        self.apply_look(world, body, input);
    }

    /// Yaw the body and pitch its camera from this frame's look deltas.
    pub fn apply_look(&mut self, world: &mut World, body: Entity, input: &InputSample) {
        if let Ok(mut local) = world.get::<&mut LocalTransform>(body) {
            local.rotation = motion::yaw_rotation(local.rotation, self.look.yaw_delta(input.look_dx));
        }
        self.look.look(input.look_dy);
        camera::apply_pitch(world, body, &self.look);
    }
}

/// Keep the mover and the body's collider at the same height, so overlap
/// tests see the capsule the mover collides with.
fn resize_capsule(world: &mut World, body: Entity, mover: &mut dyn Mover, height: f32) {
    mover.set_height(height);
    if let Ok(mut collider) = world.get::<&mut Collider>(body) {
        collider.set_capsule_height(height);
    }
}
