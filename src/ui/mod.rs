pub mod debug_hud;

pub use debug_hud::{DebugHud, HudSnapshot};
