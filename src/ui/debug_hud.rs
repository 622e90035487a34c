use glam::Vec3;
use hecs::Entity;

use crate::components::MovementMode;

const FPS_SAMPLES: usize = 60;

/// Values the status panel shows for one frame.
#[derive(Debug, Clone, Copy)]
pub struct HudSnapshot {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub mode: MovementMode,
    pub vehicle: Option<Entity>,
}

/// Text status panel: frame rate, position, facing, mode and vehicle.
pub struct DebugHud {
    visible: bool,
    fps_ring: [f32; FPS_SAMPLES],
    fps_index: usize,
    fps_count: usize,
}

impl Default for DebugHud {
    fn default() -> Self {
        Self::new()
    }
}

impl DebugHud {
    pub fn new() -> Self {
        Self {
            visible: true,
            fps_ring: [0.0; FPS_SAMPLES],
            fps_index: 0,
            fps_count: 0,
        }
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Push a frame delta into the rolling FPS buffer.
    pub fn update(&mut self, dt: f32) {
        self.fps_ring[self.fps_index] = dt;
        self.fps_index = (self.fps_index + 1) % FPS_SAMPLES;
        if self.fps_count < FPS_SAMPLES {
            self.fps_count += 1;
        }
    }

    pub fn fps(&self) -> f32 {
        let sum: f32 = self.fps_ring[..self.fps_count].iter().sum();
        if sum <= 0.0 {
            0.0
        } else {
            self.fps_count as f32 / sum
        }
    }

    pub fn lines(&self, snapshot: &HudSnapshot) -> [String; 5] {
        let pos = snapshot.position;
        let vehicle = match snapshot.vehicle {
            Some(entity) => format!("Vehicle: {:?}", entity),
            None => "Vehicle: none".to_string(),
        };
        [
            format!("FPS: {:.0}", self.fps()),
            format!("Pos: {:.2} {:.2} {:.2}", pos.x, pos.y, pos.z),
            format!("Yaw: {:.1}  Pitch: {:.1}", snapshot.yaw, snapshot.pitch),
            format!("Mode: {}", snapshot.mode),
            vehicle,
        ]
    }
}
