//! Concrete dice sources: a seeded PRNG and a scripted queue for tests.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::DiceSource;

/// Dice backed by a seeded [`StdRng`]. The same seed yields the same rolls.
#[derive(Debug, Clone)]
pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    /// Create a source seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a source seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u64>())
    }
}

impl DiceSource for SeededDice {
    fn draw(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

/// Dice that replay a fixed sequence of values.
///
/// Each draw pops the next value and clamps it into `[1, sides]`. Once the
/// queue is empty every draw returns 1.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<u32>,
}

impl ScriptedDice {
    /// Create a source that will return `rolls` in order.
    pub fn new(rolls: impl IntoIterator<Item = u32>) -> Self {
        Self {
            rolls: rolls.into_iter().collect(),
        }
    }

    /// Queue another value after the existing ones.
    pub fn push(&mut self, value: u32) {
        self.rolls.push_back(value);
    }

    /// Number of scripted values not yet drawn.
    pub fn remaining(&self) -> usize {
        self.rolls.len()
    }
}

impl DiceSource for ScriptedDice {
    fn draw(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        self.rolls
            .pop_front()
            .map_or(1, |value| value.clamp(1, sides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_replays_in_order() {
        let mut dice = ScriptedDice::new([3, 17, 1]);
        assert_eq!(dice.draw(20), 3);
        assert_eq!(dice.draw(20), 17);
        assert_eq!(dice.draw(20), 1);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn scripted_clamps_to_die() {
        let mut dice = ScriptedDice::new([15, 0]);
        assert_eq!(dice.draw(6), 6);
        assert_eq!(dice.draw(6), 1);
    }

    #[test]
    fn scripted_exhausted_yields_one() {
        let mut dice = ScriptedDice::default();
        assert_eq!(dice.draw(20), 1);
        dice.push(9);
        assert_eq!(dice.draw(20), 9);
        assert_eq!(dice.draw(20), 1);
    }

    #[test]
    fn seeded_is_reproducible() {
        let mut a = SeededDice::new(2024);
        let mut b = SeededDice::new(2024);
        let left: Vec<u32> = (0..32).map(|_| a.draw(20)).collect();
        let right: Vec<u32> = (0..32).map(|_| b.draw(20)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn seeded_covers_every_face() {
        let mut dice = SeededDice::new(5);
        let mut seen = [false; 6];
        for _ in 0..600 {
            seen[(dice.draw(6) - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn zero_sides_is_treated_as_one() {
        let mut dice = SeededDice::new(1);
        assert_eq!(dice.draw(0), 1);
    }
}
