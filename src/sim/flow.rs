//! Game flow: Start → Play → GameOver → Start
//!
//! Only the active phase receives taps and per-frame updates. Death and the
//! retry delay are plain countdown fields on the state, cleared on every
//! round reset, so nothing scheduled in one round can fire into the next.

use super::ball::JumpKind;
use super::mood::Mood;
use super::powerup::{PowerUpKind, PowerUpSignal};
use super::state::{DeathCause, GameEvent, GamePhase, GameState, Tutorial, TutorialCue};
use super::track::TrackUpdate;

/// Tutorial prompt and mood for each of the first taps of a round
const TUTORIAL_STEPS: [(TutorialCue, Mood); 4] = [
    (TutorialCue::How, Mood::Happy),
    (TutorialCue::You, Mood::Sad),
    (TutorialCue::Feel, Mood::Angry),
    (TutorialCue::UpArrow, Mood::InLove),
];

/// Move to `next` if the transition is valid. Returns false (and does
/// nothing) otherwise.
pub fn transition(state: &mut GameState, next: GamePhase) -> bool {
    let from = state.phase;
    if !from.can_transition_to(next) {
        log::warn!("Ignoring invalid transition {:?} -> {:?}", from, next);
        return false;
    }

    exit_phase(state, from);
    state.phase = next;
    state.push_event(GameEvent::PhaseChanged { from, to: next });
    log::info!("Phase {:?} -> {:?}", from, next);

    match next {
        GamePhase::Start => enter_start(state),
        GamePhase::Play => enter_play(state),
        GamePhase::GameOver => enter_game_over(state),
    }
    true
}

fn exit_phase(state: &mut GameState, phase: GamePhase) {
    match phase {
        GamePhase::Start => state.tutorial = Tutorial::default(),
        GamePhase::Play => {}
        GamePhase::GameOver => reset_round(state),
    }
}

/// Start entry: fresh round plus the first obstacle
pub(crate) fn enter_start(state: &mut GameState) {
    reset_round(state);
    state.round += 1;
    let score = state.score;
    let ball_y = state.ball.pos.y;
    let update = state.track.advance(&mut state.rng, &state.tuning, ball_y, score);
    publish_track_update(state, update);
    log::info!("Round {} ready (seed {})", state.round, state.seed);
}

fn enter_play(state: &mut GameState) {
    state.ball.affected_by_gravity = true;
    if !state.ball.mood.is_some_and(Mood::is_active) {
        state.set_ball_mood(Mood::Happy);
    }
}

fn enter_game_over(state: &mut GameState) {
    state.death_timer = None;
    state.retry_cooldown = state.tuning.retry_cooldown;
    log::info!(
        "Round {} over: score {} (best {}), {} obstacles spawned, {} pickups left behind",
        state.round,
        state.score,
        state.best_score,
        state.track.spawn_count(),
        state.track.stale_pickups(state.ball.pos.y)
    );
}

/// Put every per-round component back to its initial state
pub fn reset_round(state: &mut GameState) {
    if let Some(signal) = state.economy.reset_all() {
        apply_power_up_signal(state, signal);
    }
    state.track.reset(state.tuning.base_rotation_multiplier);
    state.ball.reset(&state.tuning);
    state.set_ball_mood(Mood::Moodless);
    state.camera_y = state.tuning.layout.screen_height / 2.0;
    state.death_timer = None;
    state.retry_cooldown = 0.0;
    state.tutorial = Tutorial::default();
    state.contacts.clear();
    if state.score != 0 {
        state.score = 0;
        state.push_event(GameEvent::ScoreChanged { score: 0 });
    }
}

/// Route a tap to the active phase
pub fn handle_tap(state: &mut GameState) {
    match state.phase {
        GamePhase::Start => tutorial_tap(state),
        GamePhase::Play => {
            let tuning = &state.tuning;
            state.ball.jump(JumpKind::Normal, tuning);
        }
        GamePhase::GameOver => {
            if state.retry_cooldown > 0.0 {
                log::debug!("Retry tap ignored ({:.2}s left)", state.retry_cooldown);
                return;
            }
            transition(state, GamePhase::Start);
        }
    }
}

fn tutorial_tap(state: &mut GameState) {
    let taps = state.tutorial.taps;
    if taps < state.tuning.tutorial_throttled_taps {
        if state.tutorial.cooldown > 0.0 {
            return;
        }
        state.tutorial.cooldown = state.tuning.tutorial_tap_cooldown;
    }

    if let Some(&(cue, mood)) = TUTORIAL_STEPS.get(taps as usize) {
        state.push_event(GameEvent::TutorialCue(cue));
        state.set_ball_mood(mood);
    }

    let kind = if taps < state.tuning.tutorial_double_jumps {
        JumpKind::Double
    } else {
        JumpKind::Normal
    };
    let tuning = &state.tuning;
    state.ball.jump(kind, tuning);
    state.tutorial.taps += 1;
}

/// Per-frame update for the active phase (after physics and contacts)
pub fn update(state: &mut GameState, dt: f32) {
    follow_camera(state);

    match state.phase {
        GamePhase::Start => {
            state.tutorial.cooldown = (state.tutorial.cooldown - dt).max(0.0);
            let in_range = state.track.obstacles().first().is_some_and(|first| {
                first.pos.y - state.ball.pos.y < state.tuning.layout.screen_height * state.tuning.start_trigger_ratio
            });
            if in_range {
                transition(state, GamePhase::Play);
            }
        }
        GamePhase::Play => {
            if state.ball.is_alive() {
                let floor = state.camera_y - state.tuning.layout.screen_height / 2.0;
                if state.ball.pos.y < floor {
                    kill_ball(state, DeathCause::FellOut);
                } else {
                    let score = state.score;
                    let ball_y = state.ball.pos.y;
                    let update = state.track.advance(&mut state.rng, &state.tuning, ball_y, score);
                    publish_track_update(state, update);
                }
            }
            if let Some(remaining) = state.death_timer {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    transition(state, GamePhase::GameOver);
                } else {
                    state.death_timer = Some(remaining);
                }
            }
        }
        GamePhase::GameOver => {
            state.retry_cooldown = (state.retry_cooldown - dt).max(0.0);
        }
    }
}

/// The camera only ever moves up with the ball
fn follow_camera(state: &mut GameState) {
    if state.ball.is_alive() && state.ball.pos.y > state.camera_y {
        state.camera_y = state.ball.pos.y;
    }
}

/// Kill the ball and arm the GameOver delay. False if it was already dead.
pub fn kill_ball(state: &mut GameState, cause: DeathCause) -> bool {
    if !state.ball.mark_dead() {
        return false;
    }
    state.death_timer = Some(state.tuning.death_delay);
    let pos = state.ball.pos;
    state.push_event(GameEvent::Death { pos, cause });
    log::info!("Ball died at y={:.0}: {:?}", pos.y, cause);
    true
}

/// Apply or undo a power-up's effect on the track and ball
pub fn apply_power_up_signal(state: &mut GameState, signal: PowerUpSignal) {
    match signal {
        PowerUpSignal::Activated(kind) => {
            if let Some(multiplier) = kind.rotation_multiplier(&state.tuning) {
                state.track.set_rotation_multiplier(multiplier);
            }
            if kind == PowerUpKind::Invincible {
                state.ball.invincible = true;
            }
            state.push_event(GameEvent::PowerUpActivated { kind });
        }
        PowerUpSignal::Deactivated(kind) => {
            state.track.set_rotation_multiplier(state.tuning.base_rotation_multiplier);
            state.ball.invincible = false;
            state.push_event(GameEvent::PowerUpDeactivated { kind });
        }
    }
}

fn publish_track_update(state: &mut GameState, update: TrackUpdate) {
    if let Some(spawned) = update.spawned {
        state.push_event(GameEvent::ObstacleSpawned {
            id: spawned.obstacle_id,
            kind: spawned.kind,
            y: spawned.y,
        });
    }
}
