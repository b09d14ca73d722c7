//! D20 rules engine for Gamebook.
//!
//! Provides dice formulas and injectable random sources, the character and
//! monster stat model, spells and items as data, and turn-based combat
//! between one character and a group of monsters. All randomness flows
//! through [`DiceSource`], so every roll can be scripted in tests.

pub mod combat;
pub mod dice;
pub mod error;
pub mod item;
pub mod monster;
pub mod sheet;
pub mod spell;
pub mod treasure;

pub use combat::{
    CombatAction, CombatRewards, CombatSession, CombatStatus, MonsterStatus, RoundResult,
};
pub use dice::{DiceFormula, DicePool, DiceSource, Die, DieResult, RollResult, ScriptedDice, SeededDice};
pub use error::{MechError, MechResult};
pub use item::{Item, ItemKind, found_item};
pub use monster::{Monster, MonsterAttack, MonsterTemplate};
pub use sheet::{
    Abilities, Ability, AttackOutcome, CastOutcome, Character, CharacterClass, Combatant, SaveType,
    Saves,
};
pub use spell::{Spell, SpellEffect, get_spell, starting_spells};
pub use treasure::TreasureKind;
