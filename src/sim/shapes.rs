//! Obstacle shape library
//!
//! Every obstacle kind follows one contract: given the layout-derived
//! footprint and wall thickness plus the moods drawn for it, produce the
//! coloured collidable segments, the ordered mood list it exposes and the
//! parameters of its perpetual motion. Kinds dispatch through a plain
//! function table instead of trait objects.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_4, PI, TAU};

use super::geometry::{ArcBand, ClosedPath, SegmentShape};
use super::mood::Mood;
use super::obstacle::{Segment, SegmentMotion};
use crate::tuning::Layout;

/// Obstacle shape kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    #[default]
    Ring,
    Square,
    Triangle,
    DottedRing,
    DottedSquare,
    DottedTriangle,
    DoubleRing,
    ExpandingDottedRing,
}

/// Angular gap between ring sections
const RING_GAP: f32 = (PI / 36.0) * 0.75;
/// Gap (as a fraction of wall thickness) trimmed off each end of a wall section
const WALL_GAP_FRACTION: f32 = 0.1;
/// Fraction of each dotted-ring slot left empty
const DOT_GAP_FRACTION: f32 = 0.25;
/// Marker spacing along dotted square/triangle paths, × wall thickness
const MARKER_SPACING: f32 = 1.2;
/// Expanding ring radial cycle (seconds, out and back)
const BREATHE_CYCLE: f32 = 2.5;

/// Size inputs shared by every builder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeParams {
    pub max_width: f32,
    pub thickness: f32,
    pub base_duration: f32,
}

impl ShapeParams {
    pub fn from_layout(layout: &Layout) -> Self {
        Self {
            max_width: layout.max_obstacle_width,
            thickness: layout.obstacle_thickness,
            base_duration: layout.rotation_duration,
        }
    }
}

/// Radial in-out motion of the expanding ring's discs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Breathe {
    pub amplitude: f32,
    pub cycle: f32,
}

/// Marker travel along a closed path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Travel {
    pub path: ClosedPath,
    /// Seconds per lap at multiplier 1.0
    pub period: f32,
}

/// Everything an obstacle needs from its shape
#[derive(Debug, Clone, PartialEq)]
pub struct Blueprint {
    /// Ordered moods, one per section
    pub moods: Vec<Mood>,
    pub segments: Vec<Segment>,
    /// Seconds per revolution at multiplier 1.0
    pub rotation_duration: f32,
    pub travel: Option<Travel>,
    pub breathe: Option<Breathe>,
}

type ShapeBuilder = fn(&ShapeParams, &[Mood]) -> Blueprint;

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 8] = [
        ObstacleKind::Ring,
        ObstacleKind::Square,
        ObstacleKind::Triangle,
        ObstacleKind::DottedRing,
        ObstacleKind::DottedSquare,
        ObstacleKind::DottedTriangle,
        ObstacleKind::DoubleRing,
        ObstacleKind::ExpandingDottedRing,
    ];

    /// Distinct moods the shape is coloured with
    pub const fn mood_count(self) -> usize {
        match self {
            ObstacleKind::Triangle | ObstacleKind::DottedTriangle => 3,
            ObstacleKind::DoubleRing => 2,
            _ => 4,
        }
    }

    pub const fn is_dotted(self) -> bool {
        matches!(
            self,
            ObstacleKind::DottedRing
                | ObstacleKind::DottedSquare
                | ObstacleKind::DottedTriangle
                | ObstacleKind::ExpandingDottedRing
        )
    }

    fn builder(self) -> ShapeBuilder {
        match self {
            ObstacleKind::Ring => build_ring,
            ObstacleKind::Square => build_square,
            ObstacleKind::Triangle => build_triangle,
            ObstacleKind::DottedRing => build_dotted_ring,
            ObstacleKind::DottedSquare => build_dotted_square,
            ObstacleKind::DottedTriangle => build_dotted_triangle,
            ObstacleKind::DoubleRing => build_double_ring,
            ObstacleKind::ExpandingDottedRing => build_expanding_dotted_ring,
        }
    }

    /// Build the shape for the given moods.
    ///
    /// `moods` should hold `mood_count()` distinct moods; shorter input is
    /// padded by repeating, and an empty one degrades to happy.
    pub fn build(self, params: &ShapeParams, moods: &[Mood]) -> Blueprint {
        let moods = fit_moods(moods, self.mood_count());
        (self.builder())(params, &moods)
    }
}

fn fit_moods(moods: &[Mood], count: usize) -> Vec<Mood> {
    if moods.is_empty() {
        log::warn!("Empty mood sequence for obstacle, defaulting to happy");
        return vec![Mood::Happy; count];
    }
    (0..count).map(|i| moods[i % moods.len()]).collect()
}

fn ring_sections(
    inner: f32,
    outer: f32,
    phase: f32,
    moods: &[Mood],
    direction: f32,
) -> Vec<Segment> {
    let count = moods.len().max(1);
    let span = (TAU - RING_GAP * count as f32) / count as f32;
    moods
        .iter()
        .enumerate()
        .map(|(i, &mood)| {
            let start = phase + i as f32 * (span + RING_GAP) + RING_GAP / 2.0;
            Segment::new(
                mood,
                SegmentShape::Arc(ArcBand::new(inner, outer, start, span)),
                SegmentMotion::Spin { direction },
            )
        })
        .collect()
}

fn build_ring(params: &ShapeParams, moods: &[Mood]) -> Blueprint {
    let outer = params.max_width / 2.0;
    let inner = outer - params.thickness;
    Blueprint {
        moods: moods.to_vec(),
        segments: ring_sections(inner, outer, 0.0, moods, 1.0),
        rotation_duration: params.base_duration,
        travel: None,
        breathe: None,
    }
}

fn build_double_ring(params: &ShapeParams, moods: &[Mood]) -> Blueprint {
    // Two moods alternating around both rings
    let pattern: Vec<Mood> = (0..4).map(|i| moods[i % moods.len()]).collect();

    let outer = params.max_width / 2.0;
    let inner_outer = outer - params.thickness * 1.3;
    let inner_thickness = params.thickness * 0.75;

    let mut segments = ring_sections(outer - params.thickness, outer, FRAC_PI_4, &pattern, 1.0);
    segments.extend(ring_sections(
        inner_outer - inner_thickness,
        inner_outer,
        FRAC_PI_4,
        &pattern,
        -1.0,
    ));

    Blueprint {
        moods: pattern,
        segments,
        rotation_duration: params.base_duration,
        travel: None,
        breathe: None,
    }
}

/// Regular polygon vertices (counter-clockwise) and its inradius
fn regular_polygon(sides: usize, circumradius: f32, first_angle: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| Vec2::from_angle(first_angle + i as f32 * TAU / sides as f32) * circumradius)
        .collect()
}

/// Split a polygon outline of wall thickness `pad` into one trapezoid per side
fn wall_sections(outer: &[Vec2], pad: f32, moods: &[Mood]) -> Vec<Segment> {
    let sides = outer.len();
    let inradius = outer[0].length() * (PI / sides as f32).cos();
    let scale = ((inradius - pad) / inradius).max(0.0);
    let inner: Vec<Vec2> = outer.iter().map(|&v| v * scale).collect();
    let gap = pad * WALL_GAP_FRACTION;

    (0..sides)
        .map(|i| {
            let j = (i + 1) % sides;
            let dir = (outer[j] - outer[i]).normalize_or_zero();
            let quad = vec![
                outer[i] + dir * gap,
                outer[j] - dir * gap,
                inner[j] - dir * gap,
                inner[i] + dir * gap,
            ];
            Segment::new(
                moods[i % moods.len()],
                SegmentShape::Polygon(quad),
                SegmentMotion::Spin { direction: 1.0 },
            )
        })
        .collect()
}

fn build_square(params: &ShapeParams, moods: &[Mood]) -> Blueprint {
    let side = params.max_width * 0.72;
    // Corners at 45° put the square upright
    let outer = regular_polygon(4, side / 2.0 * 2f32.sqrt(), FRAC_PI_4);
    Blueprint {
        moods: moods.to_vec(),
        segments: wall_sections(&outer, params.thickness, moods),
        rotation_duration: params.base_duration,
        travel: None,
        breathe: None,
    }
}

fn build_triangle(params: &ShapeParams, moods: &[Mood]) -> Blueprint {
    let side = params.max_width;
    // Apex up, centred on the centroid
    let outer = regular_polygon(3, side / 3f32.sqrt(), PI / 2.0);
    Blueprint {
        moods: moods.to_vec(),
        segments: wall_sections(&outer, params.thickness, moods),
        rotation_duration: params.base_duration,
        travel: None,
        breathe: None,
    }
}

/// Discs evenly spaced on a circle, coloured in contiguous mood runs
fn dot_ring(outer: f32, count: usize, moods: &[Mood], breathe: bool) -> Vec<Segment> {
    let circumference = TAU * outer;
    let radius = (circumference / count as f32) * (1.0 - DOT_GAP_FRACTION) / 2.0;
    let step = TAU / count as f32;
    (0..count)
        .map(|i| {
            let dir = Vec2::from_angle(i as f32 * step);
            let mood = moods[(i * moods.len()) / count];
            let motion = if breathe {
                SegmentMotion::SpinBreathe { direction: dir }
            } else {
                SegmentMotion::Spin { direction: 1.0 }
            };
            Segment::new(
                mood,
                SegmentShape::Disc { center: dir * (outer - radius), radius },
                motion,
            )
        })
        .collect()
}

fn build_dotted_ring(params: &ShapeParams, moods: &[Mood]) -> Blueprint {
    Blueprint {
        moods: moods.to_vec(),
        segments: dot_ring(params.max_width * 0.75 / 2.0, 25, moods, false),
        rotation_duration: params.base_duration,
        travel: None,
        breathe: None,
    }
}

fn build_expanding_dotted_ring(params: &ShapeParams, moods: &[Mood]) -> Blueprint {
    Blueprint {
        moods: moods.to_vec(),
        segments: dot_ring(params.max_width * 0.35, 20, moods, true),
        rotation_duration: params.base_duration,
        travel: None,
        breathe: Some(Breathe {
            amplitude: params.max_width * 0.25,
            cycle: BREATHE_CYCLE,
        }),
    }
}

/// Fixed-size markers spread along a closed path, each travelling around it
fn path_markers(path: &ClosedPath, params: &ShapeParams, moods: &[Mood]) -> Vec<Segment> {
    let spacing = params.thickness * MARKER_SPACING;
    let count = ((path.perimeter() / spacing) as usize).max(moods.len() * 2);
    let radius = params.thickness / 2.0;
    (0..count)
        .map(|i| {
            let offset = i as f32 / count as f32;
            Segment::new(
                moods[(i * moods.len()) / count],
                SegmentShape::Disc { center: path.point_at(offset), radius },
                SegmentMotion::Travel { offset },
            )
        })
        .collect()
}

fn build_dotted_square(params: &ShapeParams, moods: &[Mood]) -> Blueprint {
    let half = params.max_width * 0.65 / 2.0;
    let path = ClosedPath::new(vec![
        Vec2::new(-half, half),
        Vec2::new(half, half),
        Vec2::new(half, -half),
        Vec2::new(-half, -half),
    ]);
    let duration = params.base_duration * 0.85;
    Blueprint {
        moods: moods.to_vec(),
        segments: path_markers(&path, params, moods),
        rotation_duration: duration,
        travel: Some(Travel { path, period: duration }),
        breathe: None,
    }
}

fn build_dotted_triangle(params: &ShapeParams, moods: &[Mood]) -> Blueprint {
    let side = params.max_width;
    let height = side * 3f32.sqrt() / 2.0;
    let path = ClosedPath::new(vec![
        Vec2::new(0.0, height / 2.0),
        Vec2::new(-side / 2.0, -height / 2.0),
        Vec2::new(side / 2.0, -height / 2.0),
    ]);
    Blueprint {
        moods: moods.to_vec(),
        segments: path_markers(&path, params, moods),
        rotation_duration: params.base_duration,
        travel: Some(Travel { path, period: params.base_duration }),
        breathe: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::mood::ACTIVE_MOODS;

    fn params() -> ShapeParams {
        ShapeParams::from_layout(&Layout::default())
    }

    #[test]
    fn test_section_counts() {
        for kind in ObstacleKind::ALL {
            let bp = kind.build(&params(), &ACTIVE_MOODS);
            let expected = match kind {
                ObstacleKind::Triangle | ObstacleKind::DottedTriangle => 3,
                _ => 4,
            };
            assert_eq!(bp.moods.len(), expected, "{:?}", kind);
            assert!(!bp.segments.is_empty());
            for seg in &bp.segments {
                assert!(bp.moods.contains(&seg.mood), "{:?} segment mood not exposed", kind);
                assert_eq!(seg.color, seg.mood.color());
            }
        }
    }

    #[test]
    fn test_solid_segments_are_disjoint() {
        let p = params();
        for kind in [ObstacleKind::Ring, ObstacleKind::Square, ObstacleKind::Triangle] {
            let bp = kind.build(&p, &ACTIVE_MOODS);
            for (i, seg) in bp.segments.iter().enumerate() {
                let c = seg.shape.centroid();
                assert!(seg.shape.distance(c) < 0.0, "{:?} centroid outside", kind);
                for (j, other) in bp.segments.iter().enumerate() {
                    if i != j {
                        assert!(other.shape.distance(c) > 0.0, "{:?} segments overlap", kind);
                    }
                }
            }
        }
    }

    #[test]
    fn test_ring_gaps_between_sections() {
        let bp = ObstacleKind::Ring.build(&params(), &ACTIVE_MOODS);
        let SegmentShape::Arc(first) = &bp.segments[0].shape else {
            panic!("ring segment is not an arc");
        };
        let SegmentShape::Arc(second) = &bp.segments[1].shape else {
            panic!("ring segment is not an arc");
        };
        let gap_angle = second.start - (first.start + first.span);
        assert!((gap_angle - RING_GAP).abs() < 1e-4);
    }

    #[test]
    fn test_double_ring_pattern() {
        let bp = ObstacleKind::DoubleRing.build(&params(), &[Mood::Sad, Mood::Angry]);
        assert_eq!(bp.moods, vec![Mood::Sad, Mood::Angry, Mood::Sad, Mood::Angry]);
        assert_eq!(bp.segments.len(), 8);
        let reversed = bp
            .segments
            .iter()
            .filter(|s| matches!(s.motion, SegmentMotion::Spin { direction } if direction < 0.0))
            .count();
        assert_eq!(reversed, 4);
    }

    #[test]
    fn test_dotted_moods_in_contiguous_runs() {
        let bp = ObstacleKind::DottedRing.build(&params(), &ACTIVE_MOODS);
        assert_eq!(bp.segments.len(), 25);
        let mut changes = 0;
        for pair in bp.segments.windows(2) {
            if pair[0].mood != pair[1].mood {
                changes += 1;
            }
        }
        assert_eq!(changes, 3);
    }

    #[test]
    fn test_path_markers_cover_every_mood() {
        let p = params();
        for kind in [ObstacleKind::DottedSquare, ObstacleKind::DottedTriangle] {
            let bp = kind.build(&p, &ACTIVE_MOODS);
            assert!(bp.travel.is_some());
            for mood in &bp.moods {
                assert!(bp.segments.iter().any(|s| s.mood == *mood));
            }
        }
    }

    #[test]
    fn test_empty_moods_degrade_to_happy() {
        let bp = ObstacleKind::Ring.build(&params(), &[]);
        assert!(bp.moods.iter().all(|&m| m == Mood::Happy));
    }
}
