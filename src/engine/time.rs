/// Fixed-step frame clock for the headless driver.
pub struct FrameClock {
    pub dt: f32,
    pub frame: u64,
    pub elapsed: f32,
}

impl FrameClock {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            frame: 0,
            elapsed: 0.0,
        }
    }

    /// Advance one frame. Returns the time window `(start, end)` it covers.
    pub fn tick(&mut self) -> (f32, f32) {
        let start = self.elapsed;
        self.frame += 1;
        self.elapsed = self.frame as f32 * self.dt;
        (start, self.elapsed)
    }
}
