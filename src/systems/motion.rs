//! Pure per-frame motion integration shared by every locomotion mode.
//!
//! Nothing here touches the world; callers pass in orientation, input and
//! the current accumulators and apply the results themselves.

use glam::{Quat, Vec3};

use crate::config::ModeParameters;
use crate::engine::input::{Button, InputSample};

/// Horizontal-plane forward and right vectors for `rotation`, yaw only.
///
/// Pitch and roll are dropped so movement always stays level. Identity
/// rotation gives forward `+Z` and right `+X`.
pub fn yaw_basis(rotation: Quat) -> (Vec3, Vec3) {
    let forward = rotation * Vec3::Z;
    let forward = Vec3::new(forward.x, 0.0, forward.z).normalize_or(Vec3::Z);
    let right = Vec3::new(forward.z, 0.0, -forward.x);
    (forward, right)
}

/// Horizontal velocity: `speed × (forward·move_y + right·move_x)`.
///
/// Not normalized; diagonal input moves faster, as the axes are independent.
pub fn horizontal_velocity(rotation: Quat, input: &InputSample, speed: f32) -> Vec3 {
    let (forward, right) = yaw_basis(rotation);
    (forward * input.move_y + right * input.move_x) * speed
}

/// Vertical velocity update while grounded.
///
/// A jump press with ground contact sets the jump impulse. Airborne frames
/// lose `gravity × dt`. A grounded frame without a press leaves the value
/// as it is; no clamp to zero. Returns the new velocity and whether a jump
/// fired.
pub fn grounded_vertical(
    vertical_velocity: f32,
    jump_pressed: bool,
    grounded: bool,
    params: &ModeParameters,
    dt: f32,
) -> (f32, bool) {
    if jump_pressed && grounded {
        (params.jump_impulse, true)
    } else if !grounded {
        (vertical_velocity - params.gravity * dt, false)
    } else {
        (vertical_velocity, false)
    }
}

/// Rise/sink drive at `speed`. `Rise` is checked first.
pub fn vertical_drive(input: &InputSample, speed: f32) -> f32 {
    if input.is_held(Button::Rise) {
        speed
    } else if input.is_held(Button::Sink) {
        -speed
    } else {
        0.0
    }
}

/// Buoyancy lift accumulator update while swimming.
///
/// Grows by `buoyancy × dt` on every frame without ground contact. Unbounded
/// unless `terminal_ascent_speed` is configured.
pub fn buoyancy_lift(lift: f32, grounded: bool, params: &ModeParameters, dt: f32) -> f32 {
    if grounded {
        return lift;
    }
    let lift = lift + params.buoyancy * dt;
    match params.terminal_ascent_speed {
        Some(cap) => lift.min(cap),
        None => lift,
    }
}

/// Compose a yaw of `degrees` around +Y onto `rotation`.
pub fn yaw_rotation(rotation: Quat, degrees: f32) -> Quat {
    (rotation * Quat::from_rotation_y(degrees.to_radians())).normalize()
}
