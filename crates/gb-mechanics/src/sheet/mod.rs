//! Ability scores, saving throws, and the shared combatant shape.
//!
//! Both [`Character`] and [`Monster`](crate::monster::Monster) implement
//! [`Combatant`], which is what spells, traps, and attacks operate on.

pub mod character;
pub mod class;

pub use character::{AttackOutcome, CastOutcome, Character};
pub use class::{AttackProgression, CharacterClass, ClassProgression, SaveProgression};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dice::DiceSource;
use crate::error::MechError;

/// One of the six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ability {
    /// Melee attack and damage.
    Strength,
    /// Armor class, initiative, fleeing.
    Dexterity,
    /// Hit points.
    Constitution,
    /// Wizard spell attacks.
    Intelligence,
    /// Divine healing.
    Wisdom,
    /// Force of personality.
    Charisma,
}

impl Ability {
    /// All six abilities in canonical order.
    pub const ALL: [Ability; 6] = [
        Self::Strength,
        Self::Dexterity,
        Self::Constitution,
        Self::Intelligence,
        Self::Wisdom,
        Self::Charisma,
    ];

    /// Lowercase full name, as used in adventure files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Strength => "strength",
            Self::Dexterity => "dexterity",
            Self::Constitution => "constitution",
            Self::Intelligence => "intelligence",
            Self::Wisdom => "wisdom",
            Self::Charisma => "charisma",
        }
    }

    /// Three-letter uppercase abbreviation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }
}

impl FromStr for Ability {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|a| a.name() == lower || a.abbreviation().eq_ignore_ascii_case(&lower))
            .ok_or_else(|| MechError::UnknownAbility(s.to_string()))
    }
}

impl std::fmt::Display for Ability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Modifier for an ability score: `floor((score - 10) / 2)`.
pub fn ability_modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// The six ability scores of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    /// Strength score.
    pub strength: i32,
    /// Dexterity score.
    pub dexterity: i32,
    /// Constitution score.
    pub constitution: i32,
    /// Intelligence score.
    pub intelligence: i32,
    /// Wisdom score.
    pub wisdom: i32,
    /// Charisma score.
    pub charisma: i32,
}

impl Default for Abilities {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

impl Abilities {
    /// Scores in canonical order: STR, DEX, CON, INT, WIS, CHA.
    pub const fn new(
        strength: i32,
        dexterity: i32,
        constitution: i32,
        intelligence: i32,
        wisdom: i32,
        charisma: i32,
    ) -> Self {
        Self {
            strength,
            dexterity,
            constitution,
            intelligence,
            wisdom,
            charisma,
        }
    }

    /// Roll each score with 4d6-drop-lowest, in canonical order.
    pub fn roll<D: DiceSource + ?Sized>(dice: &mut D) -> Self {
        let mut scores = [0; 6];
        for score in &mut scores {
            *score = dice.ability_score();
        }
        let [strength, dexterity, constitution, intelligence, wisdom, charisma] = scores;
        Self::new(strength, dexterity, constitution, intelligence, wisdom, charisma)
    }

    /// Score for one ability.
    pub fn get(&self, ability: Ability) -> i32 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    /// Modifier for one ability.
    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.get(ability))
    }
}

/// A saving throw category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveType {
    /// Resisting poison and physical hardship.
    Fortitude,
    /// Dodging area effects and traps.
    Reflex,
    /// Resisting mental influence.
    Will,
}

impl SaveType {
    /// Lowercase name, as used in adventure files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fortitude => "fortitude",
            Self::Reflex => "reflex",
            Self::Will => "will",
        }
    }
}

impl FromStr for SaveType {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fortitude" | "fort" => Ok(Self::Fortitude),
            "reflex" | "ref" => Ok(Self::Reflex),
            "will" => Ok(Self::Will),
            _ => Err(MechError::UnknownSaveType(s.to_string())),
        }
    }
}

impl std::fmt::Display for SaveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fortitude, reflex, and will bonuses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Saves {
    /// Fortitude bonus.
    pub fortitude: i32,
    /// Reflex bonus.
    pub reflex: i32,
    /// Will bonus.
    pub will: i32,
}

impl Saves {
    /// Bonus for one save type.
    pub fn get(&self, save: SaveType) -> i32 {
        match save {
            SaveType::Fortitude => self.fortitude,
            SaveType::Reflex => self.reflex,
            SaveType::Will => self.will,
        }
    }
}

/// Anything that can fight: hit points, armor class, saving throws.
///
/// Hit points may drop to zero or below; a combatant is alive while
/// `current_hp > 0`.
pub trait Combatant {
    /// Display name.
    fn name(&self) -> &str;

    /// Current armor class, including temporary bonuses.
    fn armor_class(&self) -> i32;

    /// Current hit points.
    fn current_hp(&self) -> i32;

    /// Maximum hit points.
    fn max_hp(&self) -> i32;

    /// Bonus added to attack rolls, including temporary bonuses.
    fn attack_bonus(&self) -> i32;

    /// Saving throw bonuses.
    fn saves(&self) -> Saves;

    /// Modifier for an ability. Combatants without ability scores return 0.
    fn ability_modifier(&self, ability: Ability) -> i32;

    /// Subtract `amount` from current hit points. Not clamped at zero.
    fn take_damage(&mut self, amount: i32);

    /// Add `amount` to current hit points, capped at maximum.
    fn heal(&mut self, amount: i32);

    /// Apply a temporary armor class change.
    fn adjust_armor_class(&mut self, delta: i32);

    /// Apply a temporary attack bonus change.
    fn adjust_attack_bonus(&mut self, delta: i32);

    /// True while hit points are above zero.
    fn is_alive(&self) -> bool {
        self.current_hp() > 0
    }

    /// Roll `1d20` plus the bonus for `save`. `None` rolls a plain d20.
    fn saving_throw(&self, save: Option<SaveType>, dice: &mut dyn DiceSource) -> i32 {
        let bonus = save.map_or(0, |s| self.saves().get(s));
        dice.d20(1, bonus)
    }

    /// Like [`saving_throw`](Combatant::saving_throw), taking the save by
    /// name. Unknown names roll a plain d20.
    fn saving_throw_named(&self, save: &str, dice: &mut dyn DiceSource) -> i32 {
        self.saving_throw(save.parse().ok(), dice)
    }
}
