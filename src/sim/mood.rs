//! Moods and the mood registry
//!
//! A mood is the ball's colour. Obstacle segments carry a mood and the ball
//! passes through a segment only while wearing the same colour.

use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

/// The closed set of moods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    InLove,
    /// "No mood" sentinel. Only the ball holds it (round reset, invincibility).
    Moodless,
}

/// The selectable moods, in the stable order used for indexed UI mapping
pub const ACTIVE_MOODS: [Mood; 4] = [Mood::Happy, Mood::Sad, Mood::Angry, Mood::InLove];

impl Mood {
    /// Display colour as 0xRRGGBB
    pub const fn color(self) -> u32 {
        match self {
            Mood::Happy => 0xFFCF69,
            Mood::Sad => 0x65BAEE,
            Mood::Angry => 0xF3504C,
            Mood::InLove => 0xFF5AA9,
            Mood::Moodless => 0xD9D9D9,
        }
    }

    /// Texture/asset key for the presentation layer
    pub const fn asset_name(self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Sad => "sad",
            Mood::Angry => "angry",
            Mood::InLove => "inlove",
            Mood::Moodless => "moodless",
        }
    }

    /// Whether this mood can appear on an obstacle
    #[inline]
    pub const fn is_active(self) -> bool {
        !matches!(self, Mood::Moodless)
    }

    /// Index into [`ACTIVE_MOODS`] (None for the sentinel)
    pub fn index(self) -> Option<usize> {
        ACTIVE_MOODS.iter().position(|&m| m == self)
    }
}

/// Stateless mood registry; randomness comes from the caller's RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct MoodRegistry;

impl MoodRegistry {
    /// The fixed list of selectable moods
    pub fn active_moods(&self) -> &'static [Mood] {
        &ACTIVE_MOODS
    }

    /// Uniform pick over the selectable moods
    pub fn random_mood<R: Rng + ?Sized>(&self, rng: &mut R) -> Mood {
        ACTIVE_MOODS.choose(rng).copied().unwrap_or(Mood::Happy)
    }

    /// Uniformly shuffled permutation of all selectable moods
    pub fn random_mood_sequence<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Mood> {
        let mut sequence = ACTIVE_MOODS.to_vec();
        sequence.shuffle(rng);
        sequence
    }

    /// Random mood different from `current`
    pub fn random_mood_except<R: Rng + ?Sized>(&self, rng: &mut R, current: Mood) -> Mood {
        let candidates: Vec<Mood> = ACTIVE_MOODS.iter().copied().filter(|&m| m != current).collect();
        candidates.choose(rng).copied().unwrap_or(Mood::Happy)
    }

    /// Draw `count` distinct moods (1..=4) for a new obstacle.
    ///
    /// At least two of the result (or all of it, when `count` < 2) come from
    /// `previous`, so the next pickup always has two candidate moods shared by
    /// both neighbouring obstacles. An empty `previous` is unconstrained.
    pub fn linked_mood_sequence<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        previous: &[Mood],
        count: usize,
    ) -> Vec<Mood> {
        let count = count.clamp(1, ACTIVE_MOODS.len());

        let mut shared: Vec<Mood> = Vec::with_capacity(ACTIVE_MOODS.len());
        for &mood in previous {
            if mood.is_active() && !shared.contains(&mood) {
                shared.push(mood);
            }
        }
        if shared.is_empty() {
            let mut sequence = self.random_mood_sequence(rng);
            sequence.truncate(count);
            return sequence;
        }
        shared.shuffle(rng);

        let linked = shared.len().min(2).min(count);
        let mut sequence: Vec<Mood> = shared[..linked].to_vec();

        let mut rest: Vec<Mood> = ACTIVE_MOODS
            .iter()
            .copied()
            .filter(|m| !sequence.contains(m))
            .collect();
        rest.shuffle(rng);
        sequence.extend(rest.into_iter().take(count - linked));

        sequence.shuffle(rng);
        sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_random_mood_never_moodless() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..500 {
            assert!(MoodRegistry.random_mood(&mut rng).is_active());
        }
    }

    #[test]
    fn test_sequence_is_permutation() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..50 {
            let mut seq = MoodRegistry.random_mood_sequence(&mut rng);
            assert_eq!(seq.len(), 4);
            seq.sort_by_key(|m| m.index());
            assert_eq!(seq, ACTIVE_MOODS.to_vec());
        }
    }

    #[test]
    fn test_active_moods_stable_order() {
        assert_eq!(
            MoodRegistry.active_moods(),
            &[Mood::Happy, Mood::Sad, Mood::Angry, Mood::InLove]
        );
        assert_eq!(Mood::Angry.index(), Some(2));
        assert_eq!(Mood::Moodless.index(), None);
    }

    #[test]
    fn test_colors_distinct() {
        for (i, a) in ACTIVE_MOODS.iter().enumerate() {
            for b in &ACTIVE_MOODS[i + 1..] {
                assert_ne!(a.color(), b.color());
            }
            assert_ne!(a.color(), Mood::Moodless.color());
        }
    }

    #[test]
    fn test_linked_sequence_shares_two_moods() {
        let mut rng = Pcg32::seed_from_u64(11);
        let previous = [Mood::Sad, Mood::InLove, Mood::Sad, Mood::InLove];
        for count in 2..=4 {
            for _ in 0..100 {
                let seq = MoodRegistry.linked_mood_sequence(&mut rng, &previous, count);
                assert_eq!(seq.len(), count);
                let shared = seq.iter().filter(|m| previous.contains(m)).count();
                assert!(shared >= 2, "{:?} vs {:?}", seq, previous);
                for (i, m) in seq.iter().enumerate() {
                    assert!(!seq[i + 1..].contains(m), "duplicate in {:?}", seq);
                }
            }
        }
    }

    #[test]
    fn test_random_except() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..100 {
            assert_ne!(MoodRegistry.random_mood_except(&mut rng, Mood::Sad), Mood::Sad);
        }
    }
}
