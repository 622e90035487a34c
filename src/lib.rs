//! Character locomotion modes and vehicle possession for a hecs world.
//!
//! A player body moves through three exclusive modes (grounded, swimming,
//! piloting a vehicle). [`app::Controller`] advances everything one frame at
//! a time from an input sample and the trigger-volume events of that frame,
//! and reports what happened as a list of [`components::Effect`]s.

pub mod app;
pub mod camera;
pub mod components;
pub mod config;
pub mod engine;
pub mod error;
pub mod fsm;
pub mod scene;
pub mod systems;
pub mod ui;

pub use app::{Controller, Session};
pub use config::{ConfigError, ModeParameters};
pub use error::SetupError;
