//! Dice formulas in `NdS[+M|-M]` notation.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{DicePool, DiceSource, Die, RollResult};
use crate::error::{MechError, MechResult};

/// A parsed dice formula: `count` dice with `sides` faces plus a flat `modifier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceFormula {
    /// Number of dice (at least 1).
    pub count: u32,
    /// Faces per die (at least 1).
    pub sides: u32,
    /// Flat modifier added after summing.
    pub modifier: i32,
}

impl DiceFormula {
    /// Build a formula directly. Callers must pass a positive count and sides.
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Roll the formula against a dice source.
    pub fn roll<D: DiceSource + ?Sized>(&self, dice: &mut D) -> i32 {
        dice.roll(self.sides, self.count, self.modifier)
    }

    /// Roll the formula die by die. Returns the individual dice and the
    /// total including the modifier.
    pub fn roll_dice<D: DiceSource + ?Sized>(&self, dice: &mut D) -> (RollResult, i32) {
        let result = DicePool::new()
            .add(Die::from_sides(self.sides), self.count)
            .roll(dice);
        let total = clamp_total(i64::from(result.total()) + i64::from(self.modifier));
        (result, total)
    }

    /// Smallest possible result, clamped to the `i32` range.
    pub fn min(&self) -> i32 {
        clamp_total(i64::from(self.count) + i64::from(self.modifier))
    }

    /// Largest possible result, clamped to the `i32` range.
    pub fn max(&self) -> i32 {
        let dice = i64::from(self.count).saturating_mul(i64::from(self.sides));
        clamp_total(dice.saturating_add(i64::from(self.modifier)))
    }

    /// Expected result, rounded down.
    pub fn average(&self) -> i32 {
        let per_die = (1.0 + f64::from(self.sides)) / 2.0;
        let average = (f64::from(self.count) * per_die + f64::from(self.modifier)).floor();
        average.clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
    }
}

/// Narrow a dice total to `i32`, saturating at the bounds.
pub(crate) fn clamp_total(total: i64) -> i32 {
    i32::try_from(total).unwrap_or(if total < 0 { i32::MIN } else { i32::MAX })
}

impl FromStr for DiceFormula {
    type Err = MechError;

    fn from_str(s: &str) -> MechResult<Self> {
        let text: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let text = text.to_ascii_lowercase();

        let (count_str, rest) = text
            .split_once('d')
            .ok_or_else(|| MechError::formula(s, "missing 'd'"))?;

        let count = parse_positive(s, count_str, "dice count")?;

        let (sides_str, modifier) = match rest.find(|c: char| c == '+' || c == '-') {
            Some(pos) => {
                let (sides_str, mod_str) = rest.split_at(pos);
                let modifier = mod_str
                    .parse::<i32>()
                    .map_err(|_| MechError::formula(s, format!("invalid modifier '{mod_str}'")))?;
                (sides_str, modifier)
            }
            None => (rest, 0),
        };

        let sides = parse_positive(s, sides_str, "die sides")?;

        Ok(Self::new(count, sides, modifier))
    }
}

fn parse_positive(formula: &str, part: &str, what: &str) -> MechResult<u32> {
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return Err(MechError::formula(formula, format!("invalid {what} '{part}'")));
    }
    match part.parse::<u32>() {
        Ok(0) => Err(MechError::formula(formula, format!("{what} must be at least 1"))),
        Ok(n) => Ok(n),
        Err(_) => Err(MechError::formula(formula, format!("{what} '{part}' is too large"))),
    }
}

impl std::fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.modifier {
            0 => write!(f, "{}d{}", self.count, self.sides),
            m if m > 0 => write!(f, "{}d{}+{}", self.count, self.sides, m),
            m => write!(f, "{}d{}{}", self.count, self.sides, m),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    fn parse(s: &str) -> DiceFormula {
        s.parse().unwrap()
    }

    #[test]
    fn parses_plain_formula() {
        assert_eq!(parse("1d8"), DiceFormula::new(1, 8, 0));
        assert_eq!(parse("13d12"), DiceFormula::new(13, 12, 0));
    }

    #[test]
    fn parses_modifiers() {
        assert_eq!(parse("2d6+3"), DiceFormula::new(2, 6, 3));
        assert_eq!(parse("4d6-2"), DiceFormula::new(4, 6, -2));
        assert_eq!(parse("13d12+39"), DiceFormula::new(13, 12, 39));
    }

    #[test]
    fn tolerates_case_and_spaces() {
        assert_eq!(parse(" 2D6 + 1 "), DiceFormula::new(2, 6, 1));
    }

    #[test]
    fn rejects_malformed() {
        for bad in ["", "d6", "2d", "6", "2x6", "ad6", "2d6+", "2d6+x", "0d6", "2d0", "2d6+1+1"] {
            let err = bad.parse::<DiceFormula>();
            assert!(err.is_err(), "expected '{bad}' to fail");
        }
    }

    #[test]
    fn error_names_formula() {
        let err = "2x6".parse::<DiceFormula>().unwrap_err();
        assert!(err.to_string().contains("2x6"));
    }

    #[test]
    fn display_round_trips_notation() {
        assert_eq!(DiceFormula::new(1, 8, 0).to_string(), "1d8");
        assert_eq!(DiceFormula::new(2, 4, 2).to_string(), "2d4+2");
        assert_eq!(DiceFormula::new(4, 6, -2).to_string(), "4d6-2");
    }

    #[test]
    fn bounds_and_average() {
        let f = DiceFormula::new(2, 6, 3);
        assert_eq!(f.min(), 5);
        assert_eq!(f.max(), 15);
        assert_eq!(f.average(), 10);
    }

    #[test]
    fn bounds_saturate_for_huge_formulas() {
        let f = parse("100000d100000");
        assert_eq!(f.max(), i32::MAX);
        assert_eq!(f.min(), 100_000);
        assert_eq!(f.average(), i32::MAX);

        let f = DiceFormula::new(u32::MAX, u32::MAX, i32::MAX);
        assert_eq!(f.min(), i32::MAX);
        assert_eq!(f.max(), i32::MAX);
    }

    #[test]
    fn clamp_total_saturates() {
        assert_eq!(clamp_total(42), 42);
        assert_eq!(clamp_total(5_000_000_000), i32::MAX);
        assert_eq!(clamp_total(-5_000_000_000), i32::MIN);
    }

    #[test]
    fn roll_dice_keeps_each_die() {
        let mut dice = ScriptedDice::new([3, 5]);
        let (result, total) = parse("2d6-1").roll_dice(&mut dice);
        assert_eq!(result.to_string(), "[3, 5] = 8");
        assert_eq!(result.dice[0].die, Die::D6);
        assert_eq!(total, 7);
    }

    #[test]
    fn roll_sums_draws_and_modifier() {
        let mut dice = ScriptedDice::new([4, 2]);
        assert_eq!(DiceFormula::new(2, 6, 3).roll(&mut dice), 9);
    }
}
