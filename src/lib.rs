//! Mood Switch - a mood-matching vertical arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track generation, mood matching, power-ups, game flow)
//! - `tuning`: Data-driven layout and game balance
//! - `web`: Browser host bindings (wasm32 only)
//!
//! Rendering, audio and the physics engine live outside this crate. The
//! simulation consumes a per-frame tick, a single tap signal and contact-begin
//! events, and emits [`sim::GameEvent`]s for the presentation layer.

pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use tuning::{Layout, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Default logical screen size (portrait phone)
    pub const DEFAULT_SCREEN_WIDTH: f32 = 390.0;
    pub const DEFAULT_SCREEN_HEIGHT: f32 = 844.0;
}

/// Rotate a vector counter-clockwise by `angle` radians
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Wrap a value into [0, 1)
#[inline]
pub fn wrap_unit(t: f32) -> f32 {
    t.rem_euclid(1.0)
}
