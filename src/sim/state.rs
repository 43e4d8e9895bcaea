//! Game state and core simulation types
//!
//! Everything the simulation needs to continue deterministically lives here,
//! including the RNG, so a serialized snapshot resumes exactly.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::Ball;
use super::mood::Mood;
use super::physics::ContactTracker;
use super::powerup::{PowerUpEconomy, PowerUpKind};
use super::shapes::ObstacleKind;
use super::track::TrackGenerator;
use crate::tuning::Tuning;

/// Current phase of the game flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Tutorial taps, waiting for the first obstacle to come into range
    Start,
    /// Active gameplay
    Play,
    /// Round ended, waiting for a retry tap
    GameOver,
}

impl GamePhase {
    /// Whether the flow may move from `self` to `next`
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        matches!(
            (self, next),
            (GamePhase::Start, GamePhase::Play)
                | (GamePhase::Play, GamePhase::GameOver)
                | (GamePhase::GameOver, GamePhase::Start)
        )
    }
}

/// Tutorial prompts shown on the first taps of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TutorialCue {
    How,
    You,
    Feel,
    /// Up arrow plus the power-up indicator reveal
    UpArrow,
}

/// Why the ball died
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Touched a segment of a different colour
    Mismatch { obstacle_id: u32, color: u32 },
    /// Dropped too far below the camera
    FellOut,
}

/// Notifications for the presentation layer, drained by the host each frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    MoodChanged { from: Option<Mood>, to: Mood },
    ScoreChanged { score: u64 },
    PowerUpProgress { mood: Mood, progress: f32 },
    PowerUpActivated { kind: PowerUpKind },
    PowerUpDeactivated { kind: PowerUpKind },
    Death { pos: Vec2, cause: DeathCause },
    ObstacleSpawned { id: u32, kind: ObstacleKind, y: f32 },
    PickupConsumed { id: u32, mood: Mood },
    TutorialCue(TutorialCue),
}

/// Start-phase tap sequence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tutorial {
    /// Accepted taps this round
    pub taps: u32,
    /// Seconds until the next throttled tap is accepted
    pub cooldown: f32,
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Single RNG for every random draw
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    pub ball: Ball,
    pub track: TrackGenerator,
    pub economy: PowerUpEconomy,
    /// Score for the current round
    pub score: u64,
    /// Best score this session
    pub best_score: u64,
    /// Rounds started
    pub round: u32,
    /// Camera centre y; follows the ball upward only
    pub camera_y: f32,
    /// Seconds until a dead ball hands over to GameOver
    pub death_timer: Option<f32>,
    /// Seconds until a GameOver tap is accepted
    pub retry_cooldown: f32,
    pub tutorial: Tutorial,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Overlaps seen last step, for contact-begin detection
    pub contacts: ContactTracker,
    /// Pending notifications
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and default tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    /// Create a new game state, entering Start
    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            ball: Ball::new(&tuning),
            track: TrackGenerator::new(tuning.base_rotation_multiplier),
            economy: PowerUpEconomy::new(&tuning),
            camera_y: tuning.layout.screen_height / 2.0,
            tuning,
            phase: GamePhase::Start,
            score: 0,
            best_score: 0,
            round: 0,
            death_timer: None,
            retry_cooldown: 0.0,
            tutorial: Tutorial::default(),
            time_ticks: 0,
            contacts: ContactTracker::default(),
            events: Vec::new(),
        };
        super::flow::enter_start(&mut state);
        state
    }

    /// Queue a notification
    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Notifications queued since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all queued notifications
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Active power-up, if any
    pub fn active_power_up(&self) -> Option<PowerUpKind> {
        self.economy.active_kind()
    }

    /// Change the ball's mood and notify when it actually changed
    pub fn set_ball_mood(&mut self, mood: Mood) {
        if let Some(from) = self.ball.change_mood(mood) {
            self.push_event(GameEvent::MoodChanged { from, to: mood });
        }
    }

    /// Add to the round score
    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
        self.best_score = self.best_score.max(self.score);
        self.push_event(GameEvent::ScoreChanged { score: self.score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        use GamePhase::*;
        assert!(Start.can_transition_to(Play));
        assert!(Play.can_transition_to(GameOver));
        assert!(GameOver.can_transition_to(Start));
        assert!(!Start.can_transition_to(GameOver));
        assert!(!Play.can_transition_to(Start));
        assert!(!GameOver.can_transition_to(Play));
        assert!(!Play.can_transition_to(Play));
    }

    #[test]
    fn test_new_state_is_ready_to_start() {
        let state = GameState::new(42);
        assert_eq!(state.phase, GamePhase::Start);
        assert_eq!(state.score, 0);
        assert_eq!(state.round, 1);
        assert_eq!(state.ball.mood, Some(Mood::Moodless));
        assert_eq!(state.track.obstacles().len(), 1);
        assert!(state.death_timer.is_none());
    }

    #[test]
    fn test_drain_events_empties_queue() {
        let mut state = GameState::new(1);
        state.drain_events();
        state.add_score(3);
        assert_eq!(state.events(), &[GameEvent::ScoreChanged { score: 3 }]);
        assert_eq!(state.drain_events().len(), 1);
        assert!(state.events().is_empty());
        assert_eq!(state.best_score, 3);
    }

    #[test]
    fn test_mood_event_only_on_change() {
        let mut state = GameState::new(1);
        state.drain_events();
        state.set_ball_mood(Mood::Sad);
        state.set_ball_mood(Mood::Sad);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::MoodChanged {
                from: Some(Mood::Moodless),
                to: Mood::Sad
            }]
        );
    }
}
