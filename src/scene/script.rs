//! Scripted input for the headless driver.
//!
//! A script is a time-sorted list of device events. Each frame the driver
//! asks for the events that fall inside the frame's time window, so the
//! same script plays back identically at any fixed timestep.

use clap::ValueEnum;

use crate::engine::input::{Button, DeviceEvent};

/// How long a tapped button stays down.
const TAP: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Scenario {
    /// Walk, sprint, crouch and jump onto the ledge.
    Stroll,
    /// Walk into the lagoon, dive, swim back out.
    Swim,
    /// Walk into the vehicle, fly it around, get out.
    Pilot,
    /// Pilot, then swim.
    Tour,
}

pub struct Script {
    steps: Vec<(f32, DeviceEvent)>,
    cursor: usize,
}

impl Script {
    pub fn for_scenario(scenario: Scenario) -> Self {
        let mut builder = Builder::default();
        let end = match scenario {
            Scenario::Stroll => stroll(&mut builder, 0.0),
            Scenario::Swim => swim(&mut builder, 0.0),
            Scenario::Pilot => pilot(&mut builder, 0.0),
            Scenario::Tour => {
                let end = pilot(&mut builder, 0.0);
                swim(&mut builder, end)
            }
        };
        log::debug!("[script] {:?} scripted until {:.2}s", scenario, end);
        builder.build()
    }

    /// Time of the last scripted event plus one second to settle.
    pub fn duration(&self) -> f32 {
        self.steps.last().map_or(0.0, |(at, _)| at + 1.0)
    }

    /// Events scheduled before `end` that have not been handed out yet.
    pub fn events_until(&mut self, end: f32) -> Vec<DeviceEvent> {
        let start = self.cursor;
        while self.cursor < self.steps.len() && self.steps[self.cursor].0 < end {
            self.cursor += 1;
        }
        self.steps[start..self.cursor]
            .iter()
            .map(|(_, event)| *event)
            .collect()
    }
}

#[derive(Default)]
struct Builder {
    steps: Vec<(f32, DeviceEvent)>,
}

impl Builder {
    fn at(&mut self, time: f32, event: DeviceEvent) -> &mut Self {
        self.steps.push((time, event));
        self
    }

    fn axes(&mut self, time: f32, x: f32, y: f32) -> &mut Self {
        self.at(time, DeviceEvent::Axes { x, y })
    }

    fn turn(&mut self, time: f32, dx: f32) -> &mut Self {
        self.at(time, DeviceEvent::Look { dx, dy: 0.0 })
    }

    fn hold(&mut self, from: f32, to: f32, button: Button) -> &mut Self {
        self.at(from, DeviceEvent::ButtonDown(button))
            .at(to, DeviceEvent::ButtonUp(button))
    }

    fn tap(&mut self, time: f32, button: Button) -> &mut Self {
        self.hold(time, time + TAP, button)
    }

    fn build(mut self) -> Script {
        self.steps.sort_by(|a, b| a.0.total_cmp(&b.0));
        Script {
            steps: self.steps,
            cursor: 0,
        }
    }
}

// Each scenario returns the time its last event fires, so they can be chained.
// Yaw is 2 degrees per unit of look delta: a turn of 45 is a quarter turn.

fn stroll(b: &mut Builder, t: f32) -> f32 {
    b.turn(t, 90.0)
        .axes(t, 0.0, 1.0)
        .hold(t + 0.1, t + 0.3, Button::Sprint)
        .tap(t + 0.3, Button::Jump)
        .tap(t + 1.6, Button::Crouch)
        .tap(t + 2.6, Button::Crouch)
        .axes(t + 3.0, 0.0, 0.0);
    t + 3.0
}

fn swim(b: &mut Builder, t: f32) -> f32 {
    b.turn(t, 45.0)
        .axes(t, 0.0, 1.0)
        .axes(t + 2.5, 0.0, 0.0)
        .hold(t + 2.5, t + 3.5, Button::Sink)
        .hold(t + 3.5, t + 4.0, Button::Rise)
        .axes(t + 4.0, 0.0, -1.0)
        .axes(t + 6.0, 0.0, 0.0)
        .turn(t + 6.0, -45.0);
    t + 6.0
}

fn pilot(b: &mut Builder, t: f32) -> f32 {
    b.axes(t, 0.0, 1.0)
        .hold(t + 2.0, t + 3.0, Button::Rise)
        .turn(t + 3.0, 45.0)
        .at(t + 3.2, DeviceEvent::Look { dx: 0.0, dy: -5.0 })
        .axes(t + 4.0, 0.0, 0.0)
        .tap(t + 4.0, Button::Exit);
    t + 4.5
}
