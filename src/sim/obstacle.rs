//! Obstacle entities
//!
//! An obstacle is a set of coloured segments around a centre point. Its
//! segment layout and moods are fixed at creation; only the rotation speed
//! multiplier changes afterwards. All motion (spin, path travel, radial
//! breathing) is derived from a single local clock that advances at
//! `dt × multiplier`, so changing the speed never resets the phase.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

use super::geometry::SegmentShape;
use super::mood::Mood;
use super::shapes::{Blueprint, Breathe, ObstacleKind, Travel};

/// How a segment moves relative to its obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SegmentMotion {
    /// Turns with the obstacle (direction -1.0 counter-rotates)
    Spin { direction: f32 },
    /// Turns with the obstacle while sliding along `direction` and back
    SpinBreathe { direction: Vec2 },
    /// Travels along the obstacle's closed path, starting at `offset`
    Travel { offset: f32 },
}

/// One collidable, coloured piece of an obstacle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub mood: Mood,
    /// Colour compared against the ball's mood colour
    pub color: u32,
    /// Rest shape in the obstacle's local frame
    pub shape: SegmentShape,
    pub motion: SegmentMotion,
}

impl Segment {
    pub fn new(mood: Mood, shape: SegmentShape, motion: SegmentMotion) -> Self {
        Self {
            mood,
            color: mood.color(),
            shape,
            motion,
        }
    }
}

/// A positioned, rotating obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    moods: Vec<Mood>,
    segments: Vec<Segment>,
    /// Seconds per revolution (or path lap) at multiplier 1.0
    rotation_duration: f32,
    speed_multiplier: f32,
    /// Local time, advanced at dt × speed_multiplier
    clock: f32,
    travel: Option<Travel>,
    breathe: Option<Breathe>,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, blueprint: Blueprint, speed_multiplier: f32) -> Self {
        Self {
            id,
            kind,
            pos,
            moods: blueprint.moods,
            segments: blueprint.segments,
            rotation_duration: blueprint.rotation_duration.max(f32::EPSILON),
            speed_multiplier,
            clock: 0.0,
            travel: blueprint.travel,
            breathe: blueprint.breathe,
        }
    }

    /// Ordered moods, one per section
    pub fn moods(&self) -> &[Mood] {
        &self.moods
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn rotation_duration(&self) -> f32 {
        self.rotation_duration
    }

    pub fn rotation_speed(&self) -> f32 {
        self.speed_multiplier
    }

    /// Rescale the ongoing motion without resetting its phase
    pub fn set_rotation_speed(&mut self, multiplier: f32) {
        self.speed_multiplier = multiplier.max(0.0);
    }

    /// Advance the local clock
    pub fn advance(&mut self, dt: f32) {
        self.clock += dt * self.speed_multiplier;
    }

    /// Current spin angle (radians)
    pub fn angle(&self) -> f32 {
        (TAU * self.clock / self.rotation_duration).rem_euclid(TAU)
    }

    /// Current radial breathing offset
    fn breathe_offset(&self) -> f32 {
        match &self.breathe {
            Some(b) if b.cycle > 0.0 => {
                let phase = crate::wrap_unit(self.clock / b.cycle);
                b.amplitude * (1.0 - (2.0 * phase - 1.0).abs())
            }
            _ => 0.0,
        }
    }

    /// Segment shape at the current time, in the obstacle's local frame
    pub fn segment_shape(&self, index: usize) -> Option<SegmentShape> {
        let segment = self.segments.get(index)?;
        let shape = match segment.motion {
            SegmentMotion::Spin { direction } => segment.shape.rotated(self.angle() * direction),
            SegmentMotion::SpinBreathe { direction } => segment
                .shape
                .translated(direction * self.breathe_offset())
                .rotated(self.angle()),
            SegmentMotion::Travel { offset } => match (&self.travel, &segment.shape) {
                (Some(travel), SegmentShape::Disc { radius, .. }) => SegmentShape::Disc {
                    center: travel.path.point_at(offset + self.clock / travel.period.max(f32::EPSILON)),
                    radius: *radius,
                },
                _ => segment.shape.clone(),
            },
        };
        Some(shape)
    }

    /// Indices of segments a circle at world `center` overlaps, in segment order
    pub fn touching_segments(&self, center: Vec2, radius: f32) -> Vec<usize> {
        let local = center - self.pos;
        (0..self.segments.len())
            .filter(|&i| {
                self.segment_shape(i)
                    .is_some_and(|shape| shape.overlaps_circle(local, radius))
            })
            .collect()
    }

    /// Rough bounding radius around the centre
    pub fn reach(&self) -> f32 {
        let base = self
            .segments
            .iter()
            .map(|s| match &s.shape {
                SegmentShape::Arc(band) => band.outer_radius,
                SegmentShape::Polygon(points) => points.iter().map(|p| p.length()).fold(0.0, f32::max),
                SegmentShape::Disc { center, radius } => center.length() + radius,
            })
            .fold(0.0, f32::max);
        let path = self
            .travel
            .as_ref()
            .map(|t| t.path.points.iter().map(|p| p.length()).fold(0.0, f32::max))
            .unwrap_or(0.0);
        base.max(path) + self.breathe.map(|b| b.amplitude).unwrap_or(0.0)
    }
}
