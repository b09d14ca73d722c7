//! Character classes and their level progression tables.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Saves;
use crate::error::MechError;

/// Base attack bonus progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackProgression {
    /// `level`
    Full,
    /// `3 * level / 4`
    ThreeQuarter,
    /// `level / 2`
    Half,
}

impl AttackProgression {
    /// Base attack bonus at `level`.
    pub fn at(self, level: u32) -> i32 {
        let level = level as i32;
        match self {
            Self::Full => level,
            Self::ThreeQuarter => level * 3 / 4,
            Self::Half => level / 2,
        }
    }
}

/// Saving throw progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveProgression {
    /// `2 + level / 2`
    Good,
    /// `level / 3`
    Poor,
}

impl SaveProgression {
    /// Save bonus at `level`.
    pub fn at(self, level: u32) -> i32 {
        let level = level as i32;
        match self {
            Self::Good => 2 + level / 2,
            Self::Poor => level / 3,
        }
    }
}

/// Spell slots per character level. Row `n` is level `n + 1`; column `m` is
/// the slot count for spell level `m`.
type SlotTable = &'static [&'static [u32]];

const WIZARD_SLOTS: SlotTable = &[&[3, 1], &[3, 2], &[3, 2, 1], &[4, 3, 2], &[4, 3, 2, 1]];

const CLERIC_SLOTS: SlotTable = &[&[3, 1], &[4, 2], &[4, 2, 1], &[5, 3, 2], &[5, 3, 2, 1]];

/// Closed-form derived stats for one class.
#[derive(Debug, Clone, Copy)]
pub struct ClassProgression {
    /// Hit points at first level before the constitution modifier.
    pub base_hp: i32,
    /// Hit points gained per level after the first, before constitution.
    pub hp_per_level: i32,
    /// Base attack bonus progression.
    pub attack: AttackProgression,
    /// Fortitude progression.
    pub fortitude: SaveProgression,
    /// Reflex progression.
    pub reflex: SaveProgression,
    /// Will progression.
    pub will: SaveProgression,
    spell_slots: Option<SlotTable>,
}

const FIGHTER: ClassProgression = ClassProgression {
    base_hp: 10,
    hp_per_level: 6,
    attack: AttackProgression::Full,
    fortitude: SaveProgression::Good,
    reflex: SaveProgression::Poor,
    will: SaveProgression::Poor,
    spell_slots: None,
};

const WIZARD: ClassProgression = ClassProgression {
    base_hp: 4,
    hp_per_level: 3,
    attack: AttackProgression::Half,
    fortitude: SaveProgression::Poor,
    reflex: SaveProgression::Poor,
    will: SaveProgression::Good,
    spell_slots: Some(WIZARD_SLOTS),
};

const ROGUE: ClassProgression = ClassProgression {
    base_hp: 6,
    hp_per_level: 4,
    attack: AttackProgression::ThreeQuarter,
    fortitude: SaveProgression::Poor,
    reflex: SaveProgression::Good,
    will: SaveProgression::Poor,
    spell_slots: None,
};

const CLERIC: ClassProgression = ClassProgression {
    base_hp: 8,
    hp_per_level: 5,
    attack: AttackProgression::ThreeQuarter,
    fortitude: SaveProgression::Good,
    reflex: SaveProgression::Poor,
    will: SaveProgression::Good,
    spell_slots: Some(CLERIC_SLOTS),
};

impl ClassProgression {
    /// Maximum hit points at `level` with the given constitution modifier.
    /// Never less than one per level.
    pub fn max_hp(&self, level: u32, con_mod: i32) -> i32 {
        let level_i = level as i32;
        let hp = self.base_hp + con_mod + (level_i - 1) * (self.hp_per_level + con_mod);
        hp.max(level_i)
    }

    /// Save bonuses at `level`.
    pub fn saves(&self, level: u32) -> Saves {
        Saves {
            fortitude: self.fortitude.at(level),
            reflex: self.reflex.at(level),
            will: self.will.at(level),
        }
    }

    /// Fresh spell slots at `level`, keyed by spell level. Empty for
    /// non-casters; levels beyond the table use its last row.
    pub fn spell_slots(&self, level: u32) -> BTreeMap<u8, u32> {
        let Some(table) = self.spell_slots else {
            return BTreeMap::new();
        };
        let row = (level.max(1) as usize).min(table.len()) - 1;
        table[row]
            .iter()
            .enumerate()
            .map(|(spell_level, &slots)| (spell_level as u8, slots))
            .collect()
    }

    /// True if the class has a spell slot table.
    pub fn is_caster(&self) -> bool {
        self.spell_slots.is_some()
    }
}

/// A playable character class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CharacterClass {
    /// Best hit points, attack, and fortitude.
    #[default]
    Fighter,
    /// Arcane caster with the best will save.
    Wizard,
    /// Best reflex save.
    Rogue,
    /// Divine caster with good fortitude and will.
    Cleric,
}

impl CharacterClass {
    /// All classes in menu order.
    pub const ALL: [CharacterClass; 4] = [Self::Fighter, Self::Wizard, Self::Rogue, Self::Cleric];

    /// The progression table entry for this class.
    pub fn progression(self) -> &'static ClassProgression {
        match self {
            Self::Fighter => &FIGHTER,
            Self::Wizard => &WIZARD,
            Self::Rogue => &ROGUE,
            Self::Cleric => &CLERIC,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Fighter => "Fighter",
            Self::Wizard => "Wizard",
            Self::Rogue => "Rogue",
            Self::Cleric => "Cleric",
        }
    }
}

impl FromStr for CharacterClass {
    type Err = MechError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| MechError::UnknownClass(s.to_string()))
    }
}

impl std::fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
