//! Game tuning and layout
//!
//! Every geometric constant is derived from the screen size so the track
//! scales with the device. Balance values can be overridden from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH};

/// Screen-derived layout values
///
/// Only the screen size is serialized; everything else is re-derived on load
/// so overrides can never disagree with each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScreenSize", into = "ScreenSize")]
pub struct Layout {
    pub screen_width: f32,
    pub screen_height: f32,

    pub ball_radius: f32,
    pub pickup_radius: f32,
    pub ball_start: Vec2,
    /// Top surface of the resting ledge below the ball start
    pub ledge_y: f32,

    pub first_obstacle_y: f32,
    /// Maximum footprint width of any obstacle
    pub max_obstacle_width: f32,
    /// Wall thickness of solid obstacles, disc diameter of dotted ones
    pub obstacle_thickness: f32,
    /// Vertical distance between consecutive obstacles
    pub obstacle_spacing: f32,

    /// Base time (seconds) for one full obstacle revolution
    pub rotation_duration: f32,
}

impl Layout {
    /// Derive the layout for a given screen size
    pub fn for_screen(width: f32, height: f32) -> Self {
        let ball_radius = width / 15.0;
        let ball_start = Vec2::new(width / 2.0, height * 0.25);
        let max_obstacle_width = width * 0.8;

        Self {
            screen_width: width,
            screen_height: height,
            ball_radius,
            pickup_radius: ball_radius - 5.0,
            ball_start,
            ledge_y: ball_start.y - ball_radius * 1.05,
            first_obstacle_y: height / 2.0 + height * 0.8,
            max_obstacle_width,
            obstacle_thickness: width / 14.0,
            obstacle_spacing: max_obstacle_width * 1.75,
            rotation_duration: 4.0,
        }
    }

    /// Horizontal lane centre every obstacle is placed on
    #[inline]
    pub fn lane_x(&self) -> f32 {
        self.screen_width / 2.0
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::for_screen(DEFAULT_SCREEN_WIDTH, DEFAULT_SCREEN_HEIGHT)
    }
}

/// Serialized form of [`Layout`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
struct ScreenSize {
    screen_width: f32,
    screen_height: f32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl From<ScreenSize> for Layout {
    fn from(size: ScreenSize) -> Self {
        Layout::for_screen(size.screen_width, size.screen_height)
    }
}

impl From<Layout> for ScreenSize {
    fn from(layout: Layout) -> Self {
        Self {
            screen_width: layout.screen_width,
            screen_height: layout.screen_height,
        }
    }
}

/// Game balance and timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub layout: Layout,

    // === Ball ===
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Upward velocity set by a normal jump
    pub jump_velocity: f32,
    /// Upward velocity set by a tutorial double jump
    pub double_jump_velocity: f32,

    // === Power-up economy ===
    /// Progress credited to a mood per pickup
    pub mood_progress_step: f32,
    /// Per-mood accumulator cap
    pub mood_progress_cap: f32,
    /// Active meter value on activation
    pub power_up_full: f32,
    /// Active meter drain per pickup
    pub power_up_decrement: f32,
    pub surge_rotation_multiplier: f32,
    pub slow_rotation_multiplier: f32,
    pub base_rotation_multiplier: f32,

    // === Timers (seconds) ===
    pub death_delay: f32,
    pub retry_cooldown: f32,
    pub tutorial_tap_cooldown: f32,
    /// Taps subject to the tutorial cooldown
    pub tutorial_throttled_taps: u32,
    /// Taps that use the double jump impulse
    pub tutorial_double_jumps: u32,

    // === Track ===
    /// Start → Play once the first obstacle is closer than this × screen height
    pub start_trigger_ratio: f32,
    /// Extra distance an obstacle must fall behind before it is pruned
    pub prune_margin: f32,
    /// Score awarded per pickup
    pub score_unit: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            layout: Layout::default(),

            gravity: 1700.0,
            jump_velocity: 700.0,
            double_jump_velocity: 900.0,

            mood_progress_step: 30.0,
            mood_progress_cap: 90.0,
            power_up_full: 360.0,
            power_up_decrement: 72.0,
            surge_rotation_multiplier: 1.5,
            slow_rotation_multiplier: 0.5,
            base_rotation_multiplier: 1.0,

            death_delay: 1.25,
            retry_cooldown: 1.0,
            tutorial_tap_cooldown: 0.7,
            tutorial_throttled_taps: 5,
            tutorial_double_jumps: 4,

            start_trigger_ratio: 0.75,
            prune_margin: 200.0,
            score_unit: 1,
        }
    }
}

impl Tuning {
    /// Tuning for a specific screen size with default balance
    pub fn for_screen(width: f32, height: f32) -> Self {
        Self {
            layout: Layout::for_screen(width, height),
            ..Self::default()
        }
    }

    /// Parse tuning overrides from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse overrides if present, falling back to defaults on bad input
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json {
            Some(json) => match Self::from_json(json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring malformed tuning ({}), using defaults", e);
                    Self::default()
                }
            },
            None => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_derived_from_screen() {
        let layout = Layout::for_screen(390.0, 844.0);
        assert!((layout.ball_radius - 26.0).abs() < 0.001);
        assert!((layout.pickup_radius - 21.0).abs() < 0.001);
        assert!((layout.max_obstacle_width - 312.0).abs() < 0.001);
        assert!((layout.obstacle_spacing - 546.0).abs() < 0.001);
        assert!((layout.first_obstacle_y - 1097.2).abs() < 0.01);
        assert!(layout.ledge_y < layout.ball_start.y - layout.ball_radius);
        assert!((layout.lane_x() - 195.0).abs() < 0.001);
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{ "gravity": 1200.0, "score_unit": 2 }"#).unwrap();
        assert_eq!(tuning.gravity, 1200.0);
        assert_eq!(tuning.score_unit, 2);
        assert_eq!(tuning.death_delay, Tuning::default().death_delay);
    }

    #[test]
    fn test_json_roundtrip() {
        let tuning = Tuning::for_screen(320.0, 640.0);
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_partial_layout_override_rederives() {
        let tuning = Tuning::from_json(r#"{ "layout": { "screen_width": 320.0 } }"#).unwrap();
        let layout = &tuning.layout;
        assert_eq!(layout.screen_width, 320.0);
        assert_eq!(layout.screen_height, DEFAULT_SCREEN_HEIGHT);
        assert_eq!(layout.ball_start.x, layout.lane_x());
        assert_eq!(*layout, Layout::for_screen(320.0, DEFAULT_SCREEN_HEIGHT));
    }

    #[test]
    fn test_derived_layout_fields_not_overridable() {
        let json = r#"{ "layout": { "screen_width": 320.0, "screen_height": 640.0, "ball_start": [195.0, 10.0] } }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.layout, Layout::for_screen(320.0, 640.0));
        assert!((tuning.layout.ball_start.x - 160.0).abs() < 0.001);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let tuning = Tuning::load_or_default(Some("{ not json"));
        assert_eq!(tuning, Tuning::default());
    }
}
