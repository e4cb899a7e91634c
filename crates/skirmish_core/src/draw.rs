//! Sources of random draws for battle resolution.
//!
//! The resolver never touches a random number generator directly. Every
//! attacker and defender pick is an index drawn from a [`DrawSource`], so a
//! seeded PRNG gives reproducible batches and a [`ScriptedDraws`] gives
//! fully forced battles in tests.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Draws uniform indices.
pub trait DrawSource {
    /// Return an index in `0..len`. Callers never pass `len == 0`.
    fn draw_index(&mut self, len: usize) -> usize;
}

impl<D: DrawSource + ?Sized> DrawSource for &mut D {
    fn draw_index(&mut self, len: usize) -> usize {
        (**self).draw_index(len)
    }
}

/// Uniform draws from any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RandomDraws<R> {
    rng: R,
}

impl<R: Rng> RandomDraws<R> {
    /// Wrap a random number generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Unwrap the generator.
    pub fn into_inner(self) -> R {
        self.rng
    }
}

impl RandomDraws<ChaCha8Rng> {
    /// Seeded, platform-independent draws.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> DrawSource for RandomDraws<R> {
    fn draw_index(&mut self, len: usize) -> usize {
        self.rng.gen_range(0..len)
    }
}

/// Draws taken from a fixed script, for forcing exact battle sequences.
///
/// Each scripted value is reduced modulo `len`. Once the script runs out
/// every draw returns 0; [`ScriptedDraws::is_exhausted`] reports whether
/// that has happened.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDraws {
    script: VecDeque<usize>,
    overrun: bool,
}

impl ScriptedDraws {
    /// Create a script from a sequence of indices.
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
            overrun: false,
        }
    }

    /// Append more indices.
    pub fn push(&mut self, index: usize) {
        self.script.push_back(index);
    }

    /// Number of scripted draws not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    /// Whether a draw was requested after the script ran out.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.overrun
    }
}

impl DrawSource for ScriptedDraws {
    fn draw_index(&mut self, len: usize) -> usize {
        match self.script.pop_front() {
            Some(index) => index % len,
            None => {
                self.overrun = true;
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_draws_are_reproducible() {
        let mut a = RandomDraws::seeded(42);
        let mut b = RandomDraws::seeded(42);
        let seq_a: Vec<usize> = (0..50).map(|_| a.draw_index(7)).collect();
        let seq_b: Vec<usize> = (0..50).map(|_| b.draw_index(7)).collect();
        assert_eq!(seq_a, seq_b);
        assert!(seq_a.iter().all(|&i| i < 7));
    }

    #[test]
    fn test_scripted_draws() {
        let mut draws = ScriptedDraws::new([3, 9, 1]);
        assert_eq!(draws.draw_index(7), 3);
        assert_eq!(draws.draw_index(7), 2);
        assert_eq!(draws.remaining(), 1);
        assert_eq!(draws.draw_index(1), 0);
        assert!(!draws.is_exhausted());
        assert_eq!(draws.draw_index(5), 0);
        assert!(draws.is_exhausted());
    }

    #[test]
    fn test_draw_through_mut_ref() {
        fn take_two(mut source: impl DrawSource) -> (usize, usize) {
            (source.draw_index(10), source.draw_index(10))
        }
        let mut draws = ScriptedDraws::new([4, 5, 6]);
        assert_eq!(take_two(&mut draws), (4, 5));
        assert_eq!(draws.remaining(), 1);
    }
}
