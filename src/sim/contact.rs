//! Contact events and the mood-match resolver
//!
//! The physics service reports contact-begin events between two tagged
//! bodies. Only ball/obstacle and ball/pickup pairs matter:
//! - a segment of a different colour kills the ball (once per round)
//! - a pickup scores, feeds the power-up economy and switches the ball's mood

use serde::{Deserialize, Serialize};

use super::flow;
use super::mood::Mood;
use super::state::{DeathCause, GameEvent, GamePhase, GameState};

/// Physics category bit flags
pub mod category {
    pub const NONE: u32 = 0;
    pub const BALL: u32 = 0b1;
    pub const OBSTACLE: u32 = 0b10;
    pub const LEDGE: u32 = 0b100;
    pub const MOOD_SWITCH: u32 = 0b1000;
}

/// A body taking part in a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Body {
    Ball,
    /// One coloured segment of an obstacle
    Segment { obstacle_id: u32, index: usize, color: u32 },
    Pickup { id: u32 },
    Ledge,
}

impl Body {
    pub const fn category(&self) -> u32 {
        match self {
            Body::Ball => category::BALL,
            Body::Segment { .. } => category::OBSTACLE,
            Body::Pickup { .. } => category::MOOD_SWITCH,
            Body::Ledge => category::LEDGE,
        }
    }
}

/// Contact-begin between two bodies, in whatever order the engine reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactEvent {
    pub a: Body,
    pub b: Body,
}

impl ContactEvent {
    pub fn new(a: Body, b: Body) -> Self {
        Self { a, b }
    }

    /// Combined category mask
    pub fn collision(&self) -> u32 {
        self.a.category() | self.b.category()
    }

    /// The body that is not the ball
    fn other(&self) -> Body {
        if self.a == Body::Ball { self.b } else { self.a }
    }
}

/// What the resolver did with a contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Not a resolvable pair, or not in Play
    Ignored,
    /// Colours matched
    PassedThrough,
    /// Invincibility absorbed a mismatch
    Shielded,
    /// The ball died from this contact
    Died,
    /// A mismatch on an already dead ball
    AlreadyDead,
    /// Pickup consumed; the offered mood
    PickedUp(Mood),
    /// Pickup already consumed
    PickupGone,
}

/// Apply one contact-begin event to the game state
pub fn resolve_contact(state: &mut GameState, contact: &ContactEvent) -> ContactOutcome {
    if state.phase != GamePhase::Play {
        return ContactOutcome::Ignored;
    }

    let collision = contact.collision();
    if collision == category::BALL | category::OBSTACLE {
        match contact.other() {
            Body::Segment { obstacle_id, color, .. } => resolve_segment(state, obstacle_id, color),
            _ => ContactOutcome::Ignored,
        }
    } else if collision == category::BALL | category::MOOD_SWITCH {
        match contact.other() {
            Body::Pickup { id } => resolve_pickup(state, id),
            _ => ContactOutcome::Ignored,
        }
    } else {
        ContactOutcome::Ignored
    }
}

fn resolve_segment(state: &mut GameState, obstacle_id: u32, color: u32) -> ContactOutcome {
    if state.ball.invincible {
        return ContactOutcome::Shielded;
    }
    if state.ball.color() == Some(color) {
        return ContactOutcome::PassedThrough;
    }
    log::debug!(
        "Mismatch on obstacle #{}: ball {:?} vs segment {:06X}",
        obstacle_id,
        state.ball.mood,
        color
    );
    if flow::kill_ball(state, DeathCause::Mismatch { obstacle_id, color }) {
        ContactOutcome::Died
    } else {
        ContactOutcome::AlreadyDead
    }
}

fn resolve_pickup(state: &mut GameState, id: u32) -> ContactOutcome {
    if !state.ball.is_alive() {
        return ContactOutcome::Ignored;
    }
    let Some(pickup) = state.track.consume_pickup(id) else {
        return ContactOutcome::PickupGone;
    };

    let (offered, _) = pickup.offered_mood(&mut state.rng, state.ball.mood);
    state.push_event(GameEvent::PickupConsumed { id, mood: offered });

    let unit = state.tuning.score_unit;
    state.add_score(unit);
    for _ in 0..unit {
        let signal = if state.economy.is_active() {
            state.economy.decrement_active()
        } else {
            let signal = state.economy.credit_progress(&mut state.rng, offered);
            state.push_event(GameEvent::PowerUpProgress {
                mood: offered,
                progress: state.economy.progress(offered),
            });
            signal
        };
        if let Some(signal) = signal {
            flow::apply_power_up_signal(state, signal);
        }
    }

    // Invincibility is colourless
    if state.ball.invincible {
        state.set_ball_mood(Mood::Moodless);
    } else {
        state.set_ball_mood(offered);
    }
    ContactOutcome::PickedUp(offered)
}
