/// Logical buttons the controller reads. Device bindings are the caller's
/// business; the headless driver feeds these directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Jump,
    /// Swim or pilot upwards.
    Rise,
    /// Swim or pilot downwards. `Rise` wins when both are held.
    Sink,
    Crouch,
    Sprint,
    /// Leave the possessed vehicle.
    Exit,
}

impl Button {
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Small set of [`Button`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Buttons(u8);

impl Buttons {
    pub const NONE: Self = Self(0);

    pub fn contains(self, button: Button) -> bool {
        self.0 & button.bit() != 0
    }

    pub fn insert(&mut self, button: Button) {
        self.0 |= button.bit();
    }

    pub fn remove(&mut self, button: Button) {
        self.0 &= !button.bit();
    }
}

/// Movement axes below this magnitude count as "not moving".
pub const MOVE_DEADZONE: f32 = 0.1;

/// Per-frame input snapshot consumed read-only by the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSample {
    /// Strafe axis, right positive. Clamped to `[-1, 1]`.
    pub move_x: f32,
    /// Forward axis, forward positive. Clamped to `[-1, 1]`.
    pub move_y: f32,
    pub look_dx: f32,
    pub look_dy: f32,
    pub held: Buttons,
    /// Buttons that went down this frame. Always a subset of what was held at
    /// some point during the frame.
    pub pressed: Buttons,
}

impl InputSample {
    pub fn new(move_x: f32, move_y: f32) -> Self {
        Self {
            move_x: move_x.clamp(-1.0, 1.0),
            move_y: move_y.clamp(-1.0, 1.0),
            ..Default::default()
        }
    }

    pub fn with_look(mut self, look_dx: f32, look_dy: f32) -> Self {
        self.look_dx = look_dx;
        self.look_dy = look_dy;
        self
    }

    /// Button held, but not pressed this frame.
    pub fn holding(mut self, button: Button) -> Self {
        self.held.insert(button);
        self
    }

    /// Button pressed this frame (and therefore held).
    pub fn pressing(mut self, button: Button) -> Self {
        self.held.insert(button);
        self.pressed.insert(button);
        self
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held.contains(button)
    }

    pub fn was_pressed(&self, button: Button) -> bool {
        self.pressed.contains(button)
    }

    pub fn is_moving(&self) -> bool {
        self.move_x.abs() >= MOVE_DEADZONE || self.move_y.abs() >= MOVE_DEADZONE
    }
}

/// Raw events from the device-polling collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    ButtonDown(Button),
    ButtonUp(Button),
    /// Absolute movement axis values; they persist until the next `Axes`.
    Axes { x: f32, y: f32 },
    /// Relative pointer motion; accumulated within one frame.
    Look { dx: f32, dy: f32 },
}

/// Folds device events into held state and derives press edges.
pub struct InputState {
    held: Buttons,
    pressed: Buttons,
    move_x: f32,
    move_y: f32,
    look_dx: f32,
    look_dy: f32,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: Buttons::NONE,
            pressed: Buttons::NONE,
            move_x: 0.0,
            move_y: 0.0,
            look_dx: 0.0,
            look_dy: 0.0,
        }
    }

    /// Apply this frame's events. Look deltas and press edges are per-frame;
    /// held buttons and axes carry over.
    pub fn update(&mut self, events: &[DeviceEvent]) {
        self.look_dx = 0.0;
        self.look_dy = 0.0;
        self.pressed = Buttons::NONE;

        for event in events {
            match *event {
                DeviceEvent::ButtonDown(button) => {
                    // Auto-repeat downs of a held button are not new presses.
                    if !self.held.contains(button) {
                        self.pressed.insert(button);
                    }
                    self.held.insert(button);
                }
                DeviceEvent::ButtonUp(button) => self.held.remove(button),
                DeviceEvent::Axes { x, y } => {
                    self.move_x = x;
                    self.move_y = y;
                }
                DeviceEvent::Look { dx, dy } => {
                    self.look_dx += dx;
                    self.look_dy += dy;
                }
            }
        }
    }

    pub fn sample(&self) -> InputSample {
        InputSample {
            held: self.held,
            pressed: self.pressed,
            ..InputSample::new(self.move_x, self.move_y).with_look(self.look_dx, self.look_dy)
        }
    }
}
