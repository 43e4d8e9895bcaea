//! Mood Switch entry point
//!
//! Native builds run a headless autopilot: seeded rounds through the fixed
//! timestep loop, logging the outgoing event stream. Rendering, audio and
//! input hosts embed the library instead.
//!
//! Usage: `mood-switch [seed] [tuning.json] [rounds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use mood_switch::Tuning;
    use mood_switch::sim::{FixedStepper, GameEvent, GamePhase, GameState, autopilot};

    env_logger::init();
    log::info!("Mood Switch (native, headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| match s.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(e) => {
                log::warn!("Bad seed '{}' ({}), using default", s, e);
                None
            }
        })
        .unwrap_or(0x5EED);
    let tuning_json = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Could not read tuning file {}: {}", path, e);
            None
        }
    });
    let rounds: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(3);

    let tuning = Tuning::load_or_default(tuning_json.as_deref());
    let mut state = GameState::with_tuning(seed, tuning);
    let mut stepper = FixedStepper::default();

    // Simulated 60 Hz host, capped at ten minutes of game time
    let frame_dt = 1.0 / 60.0;
    let max_frames = 60 * 60 * 10;
    let mut finished = 0;

    for _ in 0..max_frames {
        if autopilot(&state).tap {
            stepper.tap();
        }
        stepper.advance(&mut state, frame_dt);

        for event in state.drain_events() {
            match event {
                GameEvent::PhaseChanged {
                    to: GamePhase::GameOver,
                    ..
                } => {
                    finished += 1;
                    log::info!("Round {} finished with score {}", state.round, state.score);
                }
                GameEvent::PowerUpActivated { kind } => log::info!("Power-up {:?}", kind),
                other => log::debug!("{:?}", other),
            }
        }
        if finished >= rounds {
            break;
        }
    }

    println!(
        "seed {}: {} round(s), best score {}, {} ticks",
        seed, finished, state.best_score, state.time_ticks
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web hosts drive the library directly, this is just to satisfy the compiler
}
