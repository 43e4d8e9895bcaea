//! Reference physics step
//!
//! Stands in for the host's rigid-body engine: integrates the ball under
//! gravity, rests it on the ledge and reports contact-begin events by
//! diffing the set of overlapping bodies against the previous step.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::contact::{Body, ContactEvent};
use super::state::GameState;

/// Body identity without per-contact payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
enum BodyKey {
    Segment { obstacle_id: u32, index: usize },
    Pickup { id: u32 },
    Ledge,
}

/// Bodies the ball overlapped at the end of the last step
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactTracker {
    touching: BTreeSet<BodyKey>,
}

impl ContactTracker {
    pub fn clear(&mut self) {
        self.touching.clear();
    }

    pub fn len(&self) -> usize {
        self.touching.len()
    }

    pub fn is_empty(&self) -> bool {
        self.touching.is_empty()
    }
}

/// Advance the ball one step and report contacts that began during it
pub fn step(state: &mut GameState, dt: f32) -> Vec<ContactEvent> {
    let ball = &mut state.ball;
    if !ball.is_alive() {
        state.contacts.clear();
        return Vec::new();
    }

    if ball.affected_by_gravity {
        ball.vel.y -= state.tuning.gravity * dt;
    }
    ball.pos += ball.vel * dt;

    // Ledge is a one-sided floor under the start position
    let ledge_y = state.tuning.layout.ledge_y;
    let resting = ball.pos.y - ball.radius <= ledge_y;
    if resting {
        ball.pos.y = ledge_y + ball.radius;
        ball.vel.y = ball.vel.y.max(0.0);
    }

    let (pos, radius) = (ball.pos, ball.radius);
    let mut now: Vec<(BodyKey, Body)> = Vec::new();

    for obstacle in state.track.obstacles() {
        // Cheap reject before per-segment tests
        if (pos - obstacle.pos).length() > obstacle.reach() + radius {
            continue;
        }
        for index in obstacle.touching_segments(pos, radius) {
            let color = obstacle.segments()[index].color;
            now.push((
                BodyKey::Segment {
                    obstacle_id: obstacle.id,
                    index,
                },
                Body::Segment {
                    obstacle_id: obstacle.id,
                    index,
                    color,
                },
            ));
        }
    }
    for pickup in state.track.pickups() {
        if pickup.touches(pos, radius) {
            now.push((BodyKey::Pickup { id: pickup.id }, Body::Pickup { id: pickup.id }));
        }
    }
    if resting {
        now.push((BodyKey::Ledge, Body::Ledge));
    }

    let began: Vec<ContactEvent> = now
        .iter()
        .filter(|(key, _)| !state.contacts.touching.contains(key))
        .map(|&(_, body)| ContactEvent::new(Body::Ball, body))
        .collect();
    state.contacts.touching = now.into_iter().map(|(key, _)| key).collect();

    if !began.is_empty() {
        log::trace!("{} contact(s) began", began.len());
    }
    began
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use glam::Vec2;

    #[test]
    fn test_ball_rests_on_ledge() {
        let mut state = GameState::new(1);
        for _ in 0..240 {
            step(&mut state, SIM_DT);
        }
        let ledge = state.tuning.layout.ledge_y;
        assert!((state.ball.pos.y - state.ball.radius - ledge).abs() < 1e-3);
        assert_eq!(state.ball.vel.y, 0.0);
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut state = GameState::new(1);
        state.ball.pos.y += 300.0;
        let before = state.ball.pos.y;
        step(&mut state, SIM_DT);
        assert!(state.ball.vel.y < 0.0);
        assert!(state.ball.pos.y < before);
    }

    #[test]
    fn test_contact_begins_once() {
        let mut state = GameState::new(2);
        let obstacle = &state.track.obstacles()[0];
        // Park the ball on the ring band, frozen in place
        let band = state.tuning.layout.max_obstacle_width / 2.0 - state.tuning.layout.obstacle_thickness / 2.0;
        state.ball.pos = obstacle.pos + Vec2::new(0.0, -band);
        state.ball.affected_by_gravity = false;
        state.ball.vel = Vec2::ZERO;

        let first = step(&mut state, SIM_DT);
        assert!(!first.is_empty());
        assert!(first.iter().all(|c| matches!(c.b, Body::Segment { .. })));
        let second = step(&mut state, SIM_DT);
        assert!(second.len() <= 1, "only rotation can bring in a new segment");
        assert!(!state.contacts.is_empty());
    }

    #[test]
    fn test_dead_ball_frozen() {
        let mut state = GameState::new(3);
        state.ball.pos.y += 300.0;
        state.ball.mark_dead();
        let pos = state.ball.pos;
        assert!(step(&mut state, SIM_DT).is_empty());
        assert_eq!(state.ball.pos, pos);
    }
}
