/// Minimal finite-state-machine container.
///
/// `S` is the state type (usually a small `Copy` enum). The machine tracks the
/// current state, the previous state, and how long it has been in the current
/// state. Transition rules are kept out of the machine itself; they live in
/// the system that drives it (see `systems::locomotion`).
///
/// # Usage
/// ```
/// use undertow::fsm::StateMachine;
///
/// #[derive(Clone, Copy, PartialEq, Debug)]
/// enum Door { Open, Shut }
///
/// let mut fsm = StateMachine::new(Door::Shut);
/// assert_eq!(fsm.go(Door::Open), Some(Door::Shut));
/// fsm.tick(0.5);
/// assert_eq!(fsm.go(Door::Open), None);
/// ```
#[derive(Debug, Clone)]
pub struct StateMachine<S: Copy + PartialEq> {
    pub state: S,
    pub previous: S,
    /// Seconds spent in the current state. Reset to 0.0 on each transition.
    pub elapsed: f32,
    entered_this_frame: bool,
}

impl<S: Copy + PartialEq> StateMachine<S> {
    /// Create a new machine starting in `initial`.
    /// `just_entered()` returns `true` until the first tick.
    pub fn new(initial: S) -> Self {
        Self {
            previous: initial,
            state: initial,
            elapsed: 0.0,
            entered_this_frame: true,
        }
    }

    /// Transition to `next` if it differs from the current state.
    ///
    /// States are compared by value, so variants carrying data (e.g. a crouch
    /// flag) transition when only the data changes. Returns the state that was
    /// left, or `None` when `next` equals the current state.
    pub fn go(&mut self, next: S) -> Option<S> {
        if self.state == next {
            return None;
        }
        self.previous = std::mem::replace(&mut self.state, next);
        self.elapsed = 0.0;
        self.entered_this_frame = true;
        Some(self.previous)
    }

    /// Advance the elapsed-in-state timer by `dt` seconds and clear the
    /// `just_entered` flag. Call once at the start of each frame.
    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
        self.entered_this_frame = false;
    }

    /// Returns `true` only on the frame a transition happened.
    pub fn just_entered(&self) -> bool {
        self.entered_this_frame
    }
}
