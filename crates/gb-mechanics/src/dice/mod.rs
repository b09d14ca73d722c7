//! Dice types, formulas, pools, and random sources.
//!
//! Every random number in the engine comes from a [`DiceSource`]. The trait
//! has exactly one required method, [`DiceSource::draw`], which yields a
//! uniform value in `[1, sides]`; all other rolls (shorthand dice, formulas,
//! ability scores) are built on top of it, so a test can swap in
//! [`ScriptedDice`] and know every value the engine will see.

pub mod formula;
pub mod pool;
pub mod roll;
pub mod source;

pub use formula::DiceFormula;
pub use pool::DicePool;
pub use roll::{DieResult, RollResult};
pub use source::{ScriptedDice, SeededDice};

use serde::{Deserialize, Serialize};

use crate::error::MechResult;

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// The die with the given number of sides, using a named variant when one exists.
    pub fn from_sides(sides: u32) -> Self {
        match sides {
            4 => Self::D4,
            6 => Self::D6,
            8 => Self::D8,
            10 => Self::D10,
            12 => Self::D12,
            20 => Self::D20,
            100 => Self::D100,
            n => Self::Custom(n),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// A source of uniform die draws.
///
/// Implementors provide [`draw`](DiceSource::draw); the shorthand methods are
/// derived from it and should not be overridden.
pub trait DiceSource {
    /// Draw one value uniformly from `[1, sides]`.
    fn draw(&mut self, sides: u32) -> u32;

    /// Roll `count` dice with `sides` faces, sum them, and add `modifier`.
    /// Totals beyond the `i32` range saturate.
    fn roll(&mut self, sides: u32, count: u32, modifier: i32) -> i32 {
        let total: i64 = (0..count).map(|_| i64::from(self.draw(sides))).sum();
        formula::clamp_total(total + i64::from(modifier))
    }

    /// Roll `count` d4 plus `modifier`.
    fn d4(&mut self, count: u32, modifier: i32) -> i32 {
        self.roll(4, count, modifier)
    }

    /// Roll `count` d6 plus `modifier`.
    fn d6(&mut self, count: u32, modifier: i32) -> i32 {
        self.roll(6, count, modifier)
    }

    /// Roll `count` d8 plus `modifier`.
    fn d8(&mut self, count: u32, modifier: i32) -> i32 {
        self.roll(8, count, modifier)
    }

    /// Roll `count` d10 plus `modifier`.
    fn d10(&mut self, count: u32, modifier: i32) -> i32 {
        self.roll(10, count, modifier)
    }

    /// Roll `count` d12 plus `modifier`.
    fn d12(&mut self, count: u32, modifier: i32) -> i32 {
        self.roll(12, count, modifier)
    }

    /// Roll `count` d20 plus `modifier`.
    fn d20(&mut self, count: u32, modifier: i32) -> i32 {
        self.roll(20, count, modifier)
    }

    /// Roll `count` percentile dice plus `modifier`.
    fn d100(&mut self, count: u32, modifier: i32) -> i32 {
        self.roll(100, count, modifier)
    }

    /// Roll 4d6 and drop the lowest die (3-18).
    fn ability_score(&mut self) -> i32 {
        let roll = DicePool::new().add(Die::D6, 4).roll(self);
        (roll.total() - roll.lowest()) as i32
    }

    /// Parse a formula like `2d6+3` and roll it.
    fn evaluate(&mut self, formula: &str) -> MechResult<i32> {
        let parsed: DiceFormula = formula.parse()?;
        Ok(parsed.roll(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D4.sides(), 4);
        assert_eq!(Die::D6.sides(), 6);
        assert_eq!(Die::D8.sides(), 8);
        assert_eq!(Die::D10.sides(), 10);
        assert_eq!(Die::D12.sides(), 12);
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::D100.sides(), 100);
        assert_eq!(Die::Custom(30).sides(), 30);
    }

    #[test]
    fn die_from_sides() {
        assert_eq!(Die::from_sides(20), Die::D20);
        assert_eq!(Die::from_sides(3), Die::Custom(3));
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D20.to_string(), "d20");
        assert_eq!(Die::Custom(30).to_string(), "d30");
    }

    #[test]
    fn shorthand_routes_through_draw() {
        let mut dice = ScriptedDice::new([3, 5]);
        assert_eq!(dice.d6(2, 1), 9);
        assert_eq!(dice.remaining(), 0);
    }

    #[test]
    fn roll_total_saturates() {
        let mut dice = ScriptedDice::new([u32::MAX, u32::MAX]);
        assert_eq!(dice.roll(u32::MAX, 2, 0), i32::MAX);

        let mut dice = ScriptedDice::new([1]);
        assert_eq!(dice.roll(6, 1, i32::MIN), i32::MIN + 1);
    }

    #[test]
    fn ability_score_drops_lowest() {
        let mut dice = ScriptedDice::new([6, 1, 4, 5]);
        assert_eq!(dice.ability_score(), 15);
    }

    #[test]
    fn evaluate_one_sided_die_is_one_plus_modifier() {
        let mut dice = SeededDice::new(7);
        for _ in 0..20 {
            assert_eq!(dice.evaluate("1d1").unwrap(), 1);
            assert_eq!(dice.evaluate("1d1+4").unwrap(), 5);
        }
    }

    #[test]
    fn evaluate_rejects_garbage() {
        let mut dice = SeededDice::new(7);
        assert!(dice.evaluate("banana").is_err());
        assert!(dice.evaluate("2x6").is_err());
    }

    #[test]
    fn ability_score_mean_is_near_expected() {
        let mut dice = SeededDice::new(12345);
        let samples = 20_000;
        let sum: i64 = (0..samples).map(|_| i64::from(dice.ability_score())).sum();
        let mean = sum as f64 / f64::from(samples);
        assert!((mean - 12.24).abs() < 0.15, "mean was {mean}");
    }

    proptest! {
        #[test]
        fn ability_score_in_range(seed in any::<u64>()) {
            let mut dice = SeededDice::new(seed);
            let score = dice.ability_score();
            prop_assert!((3..=18).contains(&score));
        }

        #[test]
        fn two_d6_plus_three_in_range(seed in any::<u64>()) {
            let mut dice = SeededDice::new(seed);
            let value = dice.evaluate("2d6+3").unwrap();
            prop_assert!((5..=15).contains(&value));
        }

        #[test]
        fn draw_stays_within_sides(seed in any::<u64>(), sides in 1u32..200) {
            let mut dice = SeededDice::new(seed);
            let value = dice.draw(sides);
            prop_assert!((1..=sides).contains(&value));
        }
    }
}
