//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::contact::{ContactOutcome, resolve_contact};
use super::flow;
use super::physics;
use super::state::{GamePhase, GameState};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Tap (click/touch/space)
    pub tap: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if input.tap {
        flow::handle_tap(state);
    }

    // Physics, then contact-begin events in the order they were reported
    let contacts = physics::step(state, dt);
    for contact in &contacts {
        let outcome = resolve_contact(state, contact);
        if outcome != ContactOutcome::Ignored {
            log::debug!("Contact {:?} -> {:?}", contact.b, outcome);
        }
    }

    flow::update(state, dt);
    state.track.animate(dt);
}

/// Accumulates variable frame time into fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FixedStepper {
    accumulator: f32,
    pending_tap: bool,
}

impl FixedStepper {
    /// Queue a tap for the next tick
    pub fn tap(&mut self) {
        self.pending_tap = true;
    }

    /// Run as many fixed ticks as `frame_dt` covers (capped). Returns the
    /// number of ticks run.
    pub fn advance(&mut self, state: &mut GameState, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = TickInput {
                tap: std::mem::take(&mut self.pending_tap),
            };
            tick(state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS && self.accumulator >= SIM_DT {
            // Drop the backlog rather than spiral
            self.accumulator = 0.0;
        }
        substeps
    }
}

/// Simple autopilot for demos and smoke runs: taps through the tutorial,
/// hops whenever the ball sinks in Play and retries once allowed.
pub fn autopilot(state: &GameState) -> TickInput {
    let tap = match state.phase {
        GamePhase::Start => state.tutorial.cooldown <= 0.0,
        GamePhase::Play => state.ball.is_alive() && state.ball.vel.y < -state.tuning.jump_velocity * 0.3,
        GamePhase::GameOver => state.retry_cooldown <= 0.0,
    };
    TickInput { tap }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::GameEvent;

    fn run(state: &mut GameState, ticks: u32) {
        for _ in 0..ticks {
            let input = autopilot(state);
            tick(state, &input, SIM_DT);
        }
    }

    #[test]
    fn test_tick_start_to_play() {
        let mut state = GameState::new(12345);
        assert_eq!(state.phase, GamePhase::Start);

        // Without taps the ball just sits on the ledge
        for _ in 0..240 {
            tick(&mut state, &TickInput::default(), SIM_DT);
        }
        assert_eq!(state.phase, GamePhase::Start);

        // Tutorial hops carry the ball into range of the first obstacle
        let mut cues = 0;
        for _ in 0..600 {
            let input = autopilot(&state);
            tick(&mut state, &input, SIM_DT);
            cues += state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::TutorialCue(_)))
                .count();
            if state.phase == GamePhase::Play {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::Play);
        assert!(cues >= 1);
        // Leaving Start clears the tutorial
        assert_eq!(state.tutorial.taps, 0);
    }

    #[test]
    fn test_full_cycle_back_to_start() {
        let mut state = GameState::new(4242);
        let mut phases = vec![state.phase];
        for _ in 0..120 * 120 {
            let input = autopilot(&state);
            tick(&mut state, &input, SIM_DT);
            for event in state.drain_events() {
                if let GameEvent::PhaseChanged { to, .. } = event {
                    phases.push(to);
                }
            }
            if phases.len() >= 4 {
                break;
            }
        }
        assert_eq!(
            &phases[..4],
            &[GamePhase::Start, GamePhase::Play, GamePhase::GameOver, GamePhase::Start]
        );
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        run(&mut state1, 3_000);
        run(&mut state2, 3_000);

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.phase, state2.phase);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.ball.pos, state2.ball.pos);
        assert_eq!(state1.drain_events(), state2.drain_events());
        assert_eq!(
            serde_json::to_string(&state1).unwrap(),
            serde_json::to_string(&state2).unwrap()
        );
    }

    #[test]
    fn test_snapshot_continues_identically() {
        let mut state = GameState::new(777);
        run(&mut state, 900);

        let json = serde_json::to_string(&state).unwrap();
        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        run(&mut state, 900);
        run(&mut restored, 900);

        assert_eq!(state.ball.pos, restored.ball.pos);
        assert_eq!(state.score, restored.score);
        assert_eq!(state.phase, restored.phase);
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            serde_json::to_string(&restored).unwrap()
        );
    }

    #[test]
    fn test_stepper_caps_substeps() {
        let mut state = GameState::new(1);
        let mut stepper = FixedStepper::default();
        assert_eq!(stepper.advance(&mut state, SIM_DT * 3.5), 3);
        assert_eq!(stepper.advance(&mut state, 1.0), MAX_SUBSTEPS);
        assert_eq!(state.time_ticks, 3 + MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_stepper_delivers_tap_once() {
        let mut state = GameState::new(1);
        let mut stepper = FixedStepper::default();
        stepper.tap();
        stepper.advance(&mut state, SIM_DT * 4.0);
        assert_eq!(state.tutorial.taps, 1);
    }
}
