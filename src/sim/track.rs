//! Track generation
//!
//! Obstacles are spawned one at a time ahead of the ball at a fixed vertical
//! spacing. The shape kind is drawn from a score-tiered table and a
//! mood-switch pickup is placed halfway between each pair of obstacles.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::mood::{Mood, MoodRegistry};
use super::obstacle::Obstacle;
use super::pickup::MoodSwitchPickup;
use super::shapes::{ObstacleKind, ShapeParams};
use crate::tuning::{Layout, Tuning};

/// A difficulty tier: the kinds available from `min_score` upwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyTier {
    pub min_score: u64,
    pub kinds: &'static [ObstacleKind],
}

/// Tiers in ascending threshold order. Each set replaces the previous one.
pub const DIFFICULTY_TIERS: [DifficultyTier; 5] = [
    DifficultyTier {
        min_score: 0,
        kinds: &[ObstacleKind::Ring],
    },
    DifficultyTier {
        min_score: 7,
        kinds: &[ObstacleKind::Ring, ObstacleKind::Square],
    },
    DifficultyTier {
        min_score: 15,
        kinds: &[ObstacleKind::Ring, ObstacleKind::Square, ObstacleKind::Triangle],
    },
    DifficultyTier {
        min_score: 25,
        kinds: &[
            ObstacleKind::Square,
            ObstacleKind::Triangle,
            ObstacleKind::DottedRing,
            ObstacleKind::DottedTriangle,
            ObstacleKind::DottedSquare,
        ],
    },
    DifficultyTier {
        min_score: 35,
        kinds: &[
            ObstacleKind::Triangle,
            ObstacleKind::DottedRing,
            ObstacleKind::DottedTriangle,
            ObstacleKind::DottedSquare,
            ObstacleKind::DoubleRing,
            ObstacleKind::ExpandingDottedRing,
        ],
    },
];

/// Index of the highest tier whose threshold is ≤ `score`
pub fn tier_index(score: u64) -> usize {
    DIFFICULTY_TIERS
        .iter()
        .rposition(|tier| tier.min_score <= score)
        .unwrap_or(0)
}

/// Obstacle kinds available at `score`
pub fn available_kinds(score: u64) -> &'static [ObstacleKind] {
    DIFFICULTY_TIERS[tier_index(score)].kinds
}

/// Details of a freshly spawned obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Spawned {
    pub obstacle_id: u32,
    pub kind: ObstacleKind,
    pub y: f32,
    /// Pickup placed below it (none for the first obstacle of a round)
    pub pickup_id: Option<u32>,
}

/// Result of one `advance` call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackUpdate {
    pub spawned: Option<Spawned>,
    /// Ids of obstacles pruned this call
    pub pruned: Vec<u32>,
}

/// Live obstacles and pickups for the current round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackGenerator {
    /// Live obstacles in spawn order
    obstacles: Vec<Obstacle>,
    /// Live pickups in spawn order
    pickups: Vec<MoodSwitchPickup>,
    /// Y of the most recent obstacle (None before the first spawn of a round)
    last_obstacle_y: Option<f32>,
    /// Moods of the most recent obstacle
    last_moods: Vec<Mood>,
    /// Shared rotation multiplier applied to every obstacle
    rotation_multiplier: f32,
    /// Obstacles spawned this round
    spawn_count: u32,
    next_id: u32,
}

impl Default for TrackGenerator {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl TrackGenerator {
    pub fn new(rotation_multiplier: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            pickups: Vec::new(),
            last_obstacle_y: None,
            last_moods: Vec::new(),
            rotation_multiplier,
            spawn_count: 0,
            next_id: 1,
        }
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn pickups(&self) -> &[MoodSwitchPickup] {
        &self.pickups
    }

    pub fn obstacle(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }

    pub fn pickup(&self, id: u32) -> Option<&MoodSwitchPickup> {
        self.pickups.iter().find(|p| p.id == id)
    }

    pub fn last_obstacle_y(&self) -> Option<f32> {
        self.last_obstacle_y
    }

    pub fn last_moods(&self) -> &[Mood] {
        &self.last_moods
    }

    pub fn rotation_multiplier(&self) -> f32 {
        self.rotation_multiplier
    }

    pub fn spawn_count(&self) -> u32 {
        self.spawn_count
    }

    /// Clear the round. Ids keep counting so stale references never alias.
    pub fn reset(&mut self, rotation_multiplier: f32) {
        log::debug!(
            "Track reset: dropping {} obstacles, {} pickups",
            self.obstacles.len(),
            self.pickups.len()
        );
        self.obstacles.clear();
        self.pickups.clear();
        self.last_obstacle_y = None;
        self.last_moods.clear();
        self.spawn_count = 0;
        self.set_rotation_multiplier(rotation_multiplier);
    }

    /// Apply a new rotation multiplier to every live and future obstacle
    pub fn set_rotation_multiplier(&mut self, multiplier: f32) {
        self.rotation_multiplier = multiplier;
        for obstacle in &mut self.obstacles {
            obstacle.set_rotation_speed(multiplier);
        }
    }

    /// Spawn ahead of the ball when needed, then prune obstacles far behind it
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R, tuning: &Tuning, ball_y: f32, score: u64) -> TrackUpdate {
        let layout = &tuning.layout;
        let mut update = TrackUpdate::default();

        let needs_spawn = match self.last_obstacle_y {
            None => true,
            Some(last_y) => ball_y > last_y - 2.0 * layout.obstacle_spacing,
        };
        if needs_spawn {
            update.spawned = Some(self.spawn_next(rng, layout, score));
        }

        update.pruned = self.prune(ball_y - layout.screen_height, tuning.prune_margin);
        update
    }

    fn spawn_next<R: Rng + ?Sized>(&mut self, rng: &mut R, layout: &Layout, score: u64) -> Spawned {
        let (kind, y) = match self.last_obstacle_y {
            None => (ObstacleKind::Ring, layout.first_obstacle_y),
            Some(last_y) => (choose_kind(rng, score), last_y + layout.obstacle_spacing),
        };

        let moods = MoodRegistry.linked_mood_sequence(rng, &self.last_moods, kind.mood_count());
        let blueprint = kind.build(&ShapeParams::from_layout(layout), &moods);

        let obstacle_id = self.allocate_id();
        let obstacle = Obstacle::new(
            obstacle_id,
            kind,
            Vec2::new(layout.lane_x(), y),
            blueprint,
            self.rotation_multiplier,
        );

        let pickup_id = match self.last_obstacle_y {
            Some(last_y) => {
                let id = self.allocate_id();
                self.pickups.push(MoodSwitchPickup::new(
                    id,
                    Vec2::new(layout.lane_x(), (last_y + y) / 2.0),
                    layout.pickup_radius,
                    obstacle.moods().to_vec(),
                    self.last_moods.clone(),
                ));
                Some(id)
            }
            None => None,
        };

        log::debug!(
            "Spawned {:?} #{} at y={:.0} with moods {:?}",
            kind,
            obstacle_id,
            y,
            obstacle.moods()
        );

        self.last_obstacle_y = Some(y);
        self.last_moods = obstacle.moods().to_vec();
        self.obstacles.push(obstacle);
        self.spawn_count += 1;

        Spawned {
            obstacle_id,
            kind,
            y,
            pickup_id,
        }
    }

    /// Drop obstacles whose y plus `margin` is below `floor`
    fn prune(&mut self, floor: f32, margin: f32) -> Vec<u32> {
        let mut pruned = Vec::new();
        self.obstacles.retain(|obstacle| {
            let keep = obstacle.pos.y + margin >= floor;
            if !keep {
                pruned.push(obstacle.id);
            }
            keep
        });
        if !pruned.is_empty() {
            log::debug!("Pruned obstacles {:?}", pruned);
        }
        pruned
    }

    /// Remove a pickup on consumption (None if it was already consumed)
    pub fn consume_pickup(&mut self, id: u32) -> Option<MoodSwitchPickup> {
        let index = self.pickups.iter().position(|p| p.id == id)?;
        Some(self.pickups.remove(index))
    }

    #[cfg(test)]
    pub(crate) fn insert_pickup(&mut self, pickup: MoodSwitchPickup) {
        self.pickups.push(pickup);
    }

    /// Pickups left below `y` (consumed pickups are removed immediately)
    pub fn stale_pickups(&self, y: f32) -> usize {
        self.pickups.iter().filter(|p| p.pos.y < y).count()
    }

    /// Advance obstacle motion and pickup animations
    pub fn animate(&mut self, dt: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.advance(dt);
        }
        for pickup in &mut self.pickups {
            pickup.animate(dt);
        }
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

fn choose_kind<R: Rng + ?Sized>(rng: &mut R, score: u64) -> ObstacleKind {
    match available_kinds(score).choose(rng) {
        Some(&kind) => kind,
        None => {
            log::warn!("No obstacle kinds available at score {}, using ring", score);
            ObstacleKind::Ring
        }
    }
}
