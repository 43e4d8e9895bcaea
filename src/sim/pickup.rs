//! Mood-switch pickups
//!
//! A pickup sits between two consecutive obstacles. On contact it offers the
//! ball a new mood that both neighbouring obstacles expose, so the ball can
//! always pass the next obstacle after switching.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::mood::Mood;

/// Pulse half-period (seconds) and scale range
const PULSE_HALF_PERIOD: f32 = 0.5;
const PULSE_MIN_SCALE: f32 = 0.9;
const PULSE_MAX_SCALE: f32 = 1.1;

/// Which rule produced the offered mood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferSource {
    /// Shared by both neighbouring obstacles and different from the ball's mood
    Shared,
    /// Only the next obstacle exposes it
    NextOnly,
    /// No alternative existed; the ball keeps its mood
    Unchanged,
}

/// A mood-switch pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodSwitchPickup {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    /// Moods of the obstacle after the pickup
    pub moods: Vec<Mood>,
    /// Moods of the obstacle before the pickup
    pub last_obstacle_moods: Vec<Mood>,
    /// Pulse animation clock
    #[serde(default)]
    pulse_time: f32,
}

impl MoodSwitchPickup {
    pub fn new(id: u32, pos: Vec2, radius: f32, moods: Vec<Mood>, last_obstacle_moods: Vec<Mood>) -> Self {
        Self {
            id,
            pos,
            radius,
            moods,
            last_obstacle_moods,
            pulse_time: 0.0,
        }
    }

    /// Moods in both neighbours' lists (deduplicated, in pickup order)
    pub fn shared_moods(&self) -> Vec<Mood> {
        let mut shared = Vec::with_capacity(self.moods.len());
        for &mood in &self.moods {
            if mood.is_active() && self.last_obstacle_moods.contains(&mood) && !shared.contains(&mood) {
                shared.push(mood);
            }
        }
        shared
    }

    /// Pick the mood this pickup offers to a ball currently wearing `current`
    pub fn offered_mood<R: Rng + ?Sized>(&self, rng: &mut R, current: Option<Mood>) -> (Mood, OfferSource) {
        let shared: Vec<Mood> = self
            .shared_moods()
            .into_iter()
            .filter(|&m| Some(m) != current)
            .collect();
        if let Some(&mood) = shared.choose(rng) {
            return (mood, OfferSource::Shared);
        }

        let mut next_only: Vec<Mood> = Vec::new();
        for &mood in &self.moods {
            if mood.is_active() && Some(mood) != current && !next_only.contains(&mood) {
                next_only.push(mood);
            }
        }
        if let Some(&mood) = next_only.choose(rng) {
            log::warn!(
                "Pickup {} has no shared mood besides {:?}; offering {:?} from the next obstacle",
                self.id,
                current,
                mood
            );
            return (mood, OfferSource::NextOnly);
        }

        let fallback = current.or_else(|| self.moods.first().copied()).unwrap_or(Mood::Happy);
        log::warn!("Pickup {} has no alternative mood; keeping {:?}", self.id, fallback);
        (fallback, OfferSource::Unchanged)
    }

    /// Advance the pulse animation
    pub fn animate(&mut self, dt: f32) {
        self.pulse_time = (self.pulse_time + dt) % (PULSE_HALF_PERIOD * 2.0);
    }

    /// Current display scale (0.9 ↔ 1.1, eased)
    pub fn scale(&self) -> f32 {
        let phase = self.pulse_time / PULSE_HALF_PERIOD;
        // 0..1 growing, then 1..2 shrinking
        let t = if phase <= 1.0 { phase } else { 2.0 - phase };
        let eased = t * t * (3.0 - 2.0 * t);
        PULSE_MIN_SCALE + (PULSE_MAX_SCALE - PULSE_MIN_SCALE) * eased
    }

    /// Whether a circle at `center` touches the pickup
    pub fn touches(&self, center: Vec2, radius: f32) -> bool {
        (center - self.pos).length() < self.radius + radius
    }
}
