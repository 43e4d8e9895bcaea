//! Power-up economy
//!
//! Each pickup credits progress to the mood it hands out. Once all four mood
//! accumulators are full, a randomly chosen power-up activates with a full
//! meter, and every later pickup drains that meter until it runs out.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::mood::{ACTIVE_MOODS, Mood};
use crate::tuning::Tuning;

/// Power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Obstacles spin faster
    Surge,
    /// Obstacles spin slower
    Slow,
    /// Mismatched segments are harmless
    Invincible,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [PowerUpKind::Surge, PowerUpKind::Slow, PowerUpKind::Invincible];

    /// Rotation multiplier this kind applies (None leaves rotation alone)
    pub fn rotation_multiplier(self, tuning: &Tuning) -> Option<f32> {
        match self {
            PowerUpKind::Surge => Some(tuning.surge_rotation_multiplier),
            PowerUpKind::Slow => Some(tuning.slow_rotation_multiplier),
            PowerUpKind::Invincible => None,
        }
    }
}

/// Notification emitted when the economy changes phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpSignal {
    Activated(PowerUpKind),
    Deactivated(PowerUpKind),
}

/// Per-mood progress plus the active power-up meter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpEconomy {
    /// Accumulators indexed like `ACTIVE_MOODS`
    progress: [f32; 4],
    active: Option<PowerUpKind>,
    active_progress: f32,

    step: f32,
    cap: f32,
    full: f32,
    decrement: f32,
}

impl Default for PowerUpEconomy {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl PowerUpEconomy {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            progress: [0.0; 4],
            active: None,
            active_progress: 0.0,
            step: tuning.mood_progress_step,
            cap: tuning.mood_progress_cap,
            full: tuning.power_up_full,
            decrement: tuning.power_up_decrement,
        }
    }

    /// Accumulated progress for `mood` (0 for the sentinel)
    pub fn progress(&self, mood: Mood) -> f32 {
        mood.index().map(|i| self.progress[i]).unwrap_or(0.0)
    }

    pub fn progress_all(&self) -> [f32; 4] {
        self.progress
    }

    pub fn cap(&self) -> f32 {
        self.cap
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active_kind(&self) -> Option<PowerUpKind> {
        self.active
    }

    /// Remaining meter while active (0 otherwise)
    pub fn active_progress(&self) -> f32 {
        self.active_progress
    }

    /// Whether every accumulator is full
    pub fn all_full(&self) -> bool {
        self.progress.iter().all(|&p| p >= self.cap)
    }

    /// Credit one step to `mood`. Ignored while a power-up is active.
    ///
    /// Returns the activation signal when this credit fills the last
    /// accumulator.
    pub fn credit_progress<R: Rng + ?Sized>(&mut self, rng: &mut R, mood: Mood) -> Option<PowerUpSignal> {
        if self.active.is_some() {
            return None;
        }
        let index = mood.index()?;
        self.progress[index] = (self.progress[index] + self.step).min(self.cap);

        if self.all_full() {
            let kind = PowerUpKind::ALL.choose(rng).copied().unwrap_or(PowerUpKind::Invincible);
            self.active = Some(kind);
            self.active_progress = self.full;
            log::info!("Power-up activated: {:?}", kind);
            return Some(PowerUpSignal::Activated(kind));
        }
        None
    }

    /// Drain the active meter by one step. Ignored while inactive.
    pub fn decrement_active(&mut self) -> Option<PowerUpSignal> {
        self.active?;
        self.active_progress = (self.active_progress - self.decrement).max(0.0);
        if self.active_progress <= 0.0 {
            return self.deactivate();
        }
        None
    }

    /// Forcibly deactivate and zero everything
    pub fn reset_all(&mut self) -> Option<PowerUpSignal> {
        let signal = self.deactivate();
        self.progress = [0.0; 4];
        signal
    }

    fn deactivate(&mut self) -> Option<PowerUpSignal> {
        let kind = self.active.take()?;
        self.active_progress = 0.0;
        self.progress = [0.0; 4];
        log::info!("Power-up deactivated: {:?}", kind);
        Some(PowerUpSignal::Deactivated(kind))
    }

    /// Jump straight to an active power-up of `kind`
    #[cfg(test)]
    pub(crate) fn force_active(&mut self, kind: PowerUpKind) {
        self.progress = [self.cap; 4];
        self.active = Some(kind);
        self.active_progress = self.full;
    }

    /// Moods still short of the cap
    pub fn missing_moods(&self) -> Vec<Mood> {
        ACTIVE_MOODS
            .iter()
            .zip(self.progress.iter())
            .filter(|&(_, &p)| p < self.cap)
            .map(|(&m, _)| m)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn fill(economy: &mut PowerUpEconomy, rng: &mut Pcg32) -> Vec<PowerUpSignal> {
        let mut signals = Vec::new();
        for _ in 0..3 {
            for mood in ACTIVE_MOODS {
                signals.extend(economy.credit_progress(rng, mood));
            }
        }
        signals
    }

    #[test]
    fn test_three_credits_fill_a_mood() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut economy = PowerUpEconomy::default();
        for _ in 0..3 {
            assert_eq!(economy.credit_progress(&mut rng, Mood::Sad), None);
        }
        assert_eq!(economy.progress(Mood::Sad), 90.0);
        assert_eq!(economy.missing_moods(), vec![Mood::Happy, Mood::Angry, Mood::InLove]);
    }

    #[test]
    fn test_credit_at_cap_is_unchanged() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut economy = PowerUpEconomy::default();
        for _ in 0..10 {
            economy.credit_progress(&mut rng, Mood::Happy);
        }
        assert_eq!(economy.progress(Mood::Happy), economy.cap());
        assert!(!economy.is_active());
    }

    #[test]
    fn test_activates_exactly_once() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut economy = PowerUpEconomy::default();
        let signals = fill(&mut economy, &mut rng);
        assert_eq!(signals.len(), 1);
        assert!(matches!(signals[0], PowerUpSignal::Activated(_)));
        assert!(economy.is_active());
        assert_eq!(economy.active_progress(), 360.0);

        // Crediting while active is ignored
        assert_eq!(economy.credit_progress(&mut rng, Mood::Happy), None);
        assert_eq!(economy.active_progress(), 360.0);
    }

    #[test]
    fn test_moodless_credit_ignored() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut economy = PowerUpEconomy::default();
        assert_eq!(economy.credit_progress(&mut rng, Mood::Moodless), None);
        assert_eq!(economy.progress_all(), [0.0; 4]);
    }

    #[test]
    fn test_five_pickups_drain_meter() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut economy = PowerUpEconomy::default();
        fill(&mut economy, &mut rng);
        let kind = economy.active_kind().unwrap();
        for _ in 0..4 {
            assert_eq!(economy.decrement_active(), None);
        }
        assert_eq!(economy.decrement_active(), Some(PowerUpSignal::Deactivated(kind)));
        assert!(!economy.is_active());
        assert_eq!(economy.progress_all(), [0.0; 4]);
        // A second drain is ignored
        assert_eq!(economy.decrement_active(), None);
    }

    #[test]
    fn test_decrement_below_zero_clamps() {
        let tuning = Tuning {
            power_up_decrement: 500.0,
            ..Tuning::default()
        };
        let mut rng = Pcg32::seed_from_u64(6);
        let mut economy = PowerUpEconomy::new(&tuning);
        fill(&mut economy, &mut rng);
        assert!(matches!(economy.decrement_active(), Some(PowerUpSignal::Deactivated(_))));
        assert_eq!(economy.active_progress(), 0.0);
    }

    #[test]
    fn test_decrement_while_inactive_ignored() {
        let mut economy = PowerUpEconomy::default();
        assert_eq!(economy.decrement_active(), None);
        assert_eq!(economy.active_progress(), 0.0);
    }

    #[test]
    fn test_reset_while_active_deactivates() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut economy = PowerUpEconomy::default();
        fill(&mut economy, &mut rng);
        assert!(matches!(economy.reset_all(), Some(PowerUpSignal::Deactivated(_))));
        assert_eq!(economy.reset_all(), None);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Credit(usize),
        Decrement,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![(0usize..5).prop_map(Op::Credit), Just(Op::Decrement)]
    }

    proptest! {
        #[test]
        fn prop_reset_all_zeroes(seed in any::<u64>(), ops in proptest::collection::vec(op(), 0..60)) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut economy = PowerUpEconomy::default();
            let moods = [Mood::Happy, Mood::Sad, Mood::Angry, Mood::InLove, Mood::Moodless];
            for op in ops {
                match op {
                    Op::Credit(i) => { economy.credit_progress(&mut rng, moods[i]); }
                    Op::Decrement => { economy.decrement_active(); }
                }
                for p in economy.progress_all() {
                    prop_assert!((0.0..=economy.cap()).contains(&p));
                }
                prop_assert!(economy.active_progress() >= 0.0);
            }
            economy.reset_all();
            prop_assert_eq!(economy.progress_all(), [0.0; 4]);
            prop_assert!(!economy.is_active());
            prop_assert_eq!(economy.active_progress(), 0.0);
        }
    }
}
