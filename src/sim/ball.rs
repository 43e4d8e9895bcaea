//! The ball agent

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::mood::Mood;
use crate::tuning::Tuning;

/// Ball life, one-way per round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BallLife {
    #[default]
    Alive,
    Dead,
}

/// Jump impulse strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Normal,
    /// Stronger tutorial jump
    Double,
}

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// None until the first round assigns one
    pub mood: Option<Mood>,
    pub invincible: bool,
    pub life: BallLife,
    /// Whether the physics step applies gravity
    pub affected_by_gravity: bool,
}

impl Ball {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: tuning.layout.ball_start,
            vel: Vec2::ZERO,
            radius: tuning.layout.ball_radius,
            mood: None,
            invincible: false,
            life: BallLife::Alive,
            affected_by_gravity: true,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life == BallLife::Alive
    }

    /// Colour compared against obstacle segments
    pub fn color(&self) -> Option<u32> {
        self.mood.map(Mood::color)
    }

    /// Replace the vertical velocity with a jump impulse
    pub fn jump(&mut self, kind: JumpKind, tuning: &Tuning) {
        if !self.is_alive() {
            return;
        }
        let speed = match kind {
            JumpKind::Normal => tuning.jump_velocity,
            JumpKind::Double => tuning.double_jump_velocity,
        };
        self.vel = Vec2::new(0.0, speed);
    }

    /// Switch mood; returns the previous one when it actually changed
    pub fn change_mood(&mut self, mood: Mood) -> Option<Option<Mood>> {
        if self.mood == Some(mood) {
            return None;
        }
        let previous = self.mood.replace(mood);
        Some(previous)
    }

    /// Mark dead. Returns false if the ball was already dead.
    pub fn mark_dead(&mut self) -> bool {
        if self.life == BallLife::Dead {
            return false;
        }
        self.life = BallLife::Dead;
        self.vel = Vec2::ZERO;
        self.affected_by_gravity = false;
        true
    }

    /// Back to the start position for a new round
    pub fn reset(&mut self, tuning: &Tuning) {
        self.pos = tuning.layout.ball_start;
        self.vel = Vec2::ZERO;
        self.radius = tuning.layout.ball_radius;
        self.invincible = false;
        self.life = BallLife::Alive;
        self.affected_by_gravity = true;
    }
}
