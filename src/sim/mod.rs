//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, passed explicitly
//! - Stable iteration order (spawn order, segment index)
//! - No rendering or platform dependencies

pub mod ball;
pub mod contact;
pub mod flow;
pub mod geometry;
pub mod mood;
pub mod obstacle;
pub mod physics;
pub mod pickup;
pub mod powerup;
pub mod shapes;
pub mod state;
pub mod tick;
pub mod track;

pub use ball::{Ball, BallLife, JumpKind};
pub use contact::{Body, ContactEvent, ContactOutcome, category, resolve_contact};
pub use geometry::{ArcBand, ClosedPath, SegmentShape};
pub use mood::{ACTIVE_MOODS, Mood, MoodRegistry};
pub use obstacle::{Obstacle, Segment, SegmentMotion};
pub use pickup::{MoodSwitchPickup, OfferSource};
pub use powerup::{PowerUpEconomy, PowerUpKind, PowerUpSignal};
pub use shapes::{ObstacleKind, ShapeParams};
pub use state::{DeathCause, GameEvent, GamePhase, GameState, TutorialCue};
pub use tick::{FixedStepper, TickInput, autopilot, tick};
pub use track::{DIFFICULTY_TIERS, DifficultyTier, TrackGenerator, available_kinds};
