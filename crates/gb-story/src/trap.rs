//! Traps sprung on entering a node.

use gb_mechanics::{Character, Combatant, DiceFormula, DiceSource, MechResult};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A trap: a saving throw against a DC, with damage on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trap {
    /// What the trap is ("poison dart trap").
    #[serde(rename = "type")]
    pub description: String,
    /// Save result needed to avoid it.
    pub dc: i32,
    /// Damage formula on a failed save.
    pub damage: String,
    /// Save type name. Unrecognized names roll a plain d20.
    #[serde(default = "default_save_type")]
    pub save_type: String,
}

fn default_save_type() -> String {
    "reflex".to_string()
}

impl Trap {
    /// A reflex-save trap.
    pub fn new(description: impl Into<String>, dc: i32, damage: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            dc,
            damage: damage.into(),
            save_type: default_save_type(),
        }
    }

    /// Use a different save type.
    pub fn with_save(mut self, save_type: impl Into<String>) -> Self {
        self.save_type = save_type.into();
        self
    }

    /// Roll the save and apply damage on a failure.
    ///
    /// The damage formula is parsed before anything is rolled, so a
    /// malformed trap fails without consuming dice.
    pub fn spring(
        &self,
        character: &mut Character,
        dice: &mut dyn DiceSource,
    ) -> MechResult<Vec<String>> {
        let damage: DiceFormula = self.damage.parse()?;
        let save = character.saving_throw_named(&self.save_type, dice);
        debug!(trap = %self.description, save, dc = self.dc, "trap save");

        if save >= self.dc {
            return Ok(vec![format!(
                "You avoid the {}! (Save: {save} vs DC {})",
                self.description, self.dc
            )]);
        }

        let amount = damage.roll(dice).max(0);
        character.take_damage(amount);
        Ok(vec![
            format!(
                "You trigger a {}! (Save: {save} vs DC {})",
                self.description, self.dc
            ),
            format!(
                "You take {amount} damage! HP: {}/{}",
                character.current_hp(),
                character.max_hp()
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_mechanics::{CharacterClass, ScriptedDice};
    use proptest::prelude::*;

    fn fighter() -> Character {
        // level 1 fighter: reflex +0, 10 HP
        Character::new("Bram", CharacterClass::Fighter)
    }

    #[test]
    fn save_meeting_dc_avoids() {
        let mut c = fighter();
        let mut dice = ScriptedDice::new([15]);
        let msgs = Trap::new("poison dart trap", 15, "2d4").spring(&mut c, &mut dice).unwrap();
        assert_eq!(msgs, vec!["You avoid the poison dart trap! (Save: 15 vs DC 15)"]);
        assert_eq!(c.current_hp(), c.max_hp());
    }

    #[test]
    fn failed_save_deals_damage() {
        let mut c = fighter();
        let mut dice = ScriptedDice::new([14, 2, 3]);
        let msgs = Trap::new("poison dart trap", 15, "2d4").spring(&mut c, &mut dice).unwrap();
        assert_eq!(msgs[0], "You trigger a poison dart trap! (Save: 14 vs DC 15)");
        assert_eq!(msgs[1], "You take 5 damage! HP: 5/10");
        assert_eq!(c.current_hp(), 5);
    }

    #[test]
    fn uses_named_save_bonus() {
        // level 1 fighter: fortitude +2
        let mut c = fighter();
        let mut dice = ScriptedDice::new([13]);
        let msgs = Trap::new("gas vent", 15, "1d6")
            .with_save("fortitude")
            .spring(&mut c, &mut dice)
            .unwrap();
        assert!(msgs[0].starts_with("You avoid"));
    }

    #[test]
    fn malformed_damage_rolls_nothing() {
        let mut c = fighter();
        let mut dice = ScriptedDice::new([1]);
        assert!(Trap::new("pit", 10, "lots").spring(&mut c, &mut dice).is_err());
        assert_eq!(dice.remaining(), 1);
    }

    proptest! {
        #[test]
        fn damage_iff_save_below_dc(roll in 1u32..=20, dc in 1i32..=25) {
            let mut c = fighter();
            let before = c.current_hp();
            let mut dice = ScriptedDice::new([roll, 1]);
            Trap::new("blade", dc, "1d4").spring(&mut c, &mut dice).unwrap();
            let damaged = c.current_hp() < before;
            prop_assert_eq!(damaged, (roll as i32) < dc);
        }
    }
}
