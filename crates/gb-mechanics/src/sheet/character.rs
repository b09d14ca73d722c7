//! Player characters.

use std::collections::BTreeMap;

use tracing::info;

use super::{Abilities, Ability, CharacterClass, Combatant, Saves};
use crate::dice::{DiceFormula, DiceSource};
use crate::error::MechResult;
use crate::item::Item;
use crate::spell::Spell;

/// Experience needed per level: a character levels up once
/// `experience >= level * XP_PER_LEVEL`.
pub const XP_PER_LEVEL: u32 = 1000;

/// Result of an attack roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackOutcome {
    /// True if the roll met or beat the target's armor class.
    pub hit: bool,
    /// The attack roll total (d20 plus bonuses).
    pub roll: i32,
    /// Damage dealt; 0 on a miss, at least 1 on a hit.
    pub damage: i32,
}

/// Result of trying to cast a spell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastOutcome {
    /// True if the spell resolved and a slot was spent.
    pub cast: bool,
    /// What happened.
    pub message: String,
}

/// A player character.
///
/// Hit points, armor class, attack bonus, saves, and spell slots are derived
/// from class, level, and abilities. They are recomputed whenever abilities
/// or level change, and on rest, which also restores hit points and clears
/// temporary bonuses.
#[derive(Debug, Clone)]
pub struct Character {
    /// Character name.
    pub name: String,
    /// Gold pieces carried.
    pub gold: u32,
    /// Carried items, in pickup order. Duplicates allowed.
    pub inventory: Vec<Item>,
    class: CharacterClass,
    level: u32,
    experience: u32,
    abilities: Abilities,
    max_hp: i32,
    current_hp: i32,
    base_attack_bonus: i32,
    saves: Saves,
    ac_bonus: i32,
    attack_buff: i32,
    known_spells: Vec<Spell>,
    spell_slots: BTreeMap<u8, u32>,
}

impl Character {
    /// A level 1 character with all abilities at 10.
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        let mut character = Self {
            name: name.into(),
            gold: 0,
            inventory: Vec::new(),
            class,
            level: 1,
            experience: 0,
            abilities: Abilities::default(),
            max_hp: 0,
            current_hp: 0,
            base_attack_bonus: 0,
            saves: Saves::default(),
            ac_bonus: 0,
            attack_buff: 0,
            known_spells: Vec::new(),
            spell_slots: BTreeMap::new(),
        };
        character.recompute();
        character
    }

    /// Start at a higher level (builder style).
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level.max(1);
        self.recompute();
        self
    }

    /// Rebuild a character from saved progress. Hit points are restored to
    /// `current_hp`, capped at the recomputed maximum.
    pub fn restore(
        name: impl Into<String>,
        class: CharacterClass,
        level: u32,
        experience: u32,
        abilities: Abilities,
        current_hp: i32,
    ) -> Self {
        let mut character = Self::new(name, class).with_level(level);
        character.experience = experience;
        character.set_abilities(abilities);
        character.current_hp = current_hp.min(character.max_hp);
        character
    }

    /// Character class.
    pub fn class(&self) -> CharacterClass {
        self.class
    }

    /// Current level (1-based).
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Total experience earned.
    pub fn experience(&self) -> u32 {
        self.experience
    }

    /// Ability scores.
    pub fn abilities(&self) -> &Abilities {
        &self.abilities
    }

    /// Base attack bonus from class and level, without temporary bonuses.
    pub fn base_attack_bonus(&self) -> i32 {
        self.base_attack_bonus
    }

    /// Spells this character knows.
    pub fn known_spells(&self) -> &[Spell] {
        &self.known_spells
    }

    /// Remaining spell slots, keyed by spell level.
    pub fn spell_slots(&self) -> &BTreeMap<u8, u32> {
        &self.spell_slots
    }

    /// Roll all six abilities with 4d6-drop-lowest and recompute.
    pub fn roll_abilities(&mut self, dice: &mut dyn DiceSource) {
        self.abilities = Abilities::roll(dice);
        self.recompute();
    }

    /// Set all six abilities and recompute.
    pub fn set_abilities(&mut self, abilities: Abilities) {
        self.abilities = abilities;
        self.recompute();
    }

    fn recompute(&mut self) {
        let progression = self.class.progression();
        let con = self.abilities.modifier(Ability::Constitution);
        self.max_hp = progression.max_hp(self.level, con);
        self.current_hp = self.max_hp;
        self.base_attack_bonus = progression.attack.at(self.level);
        self.saves = progression.saves(self.level);
        self.spell_slots = progression.spell_slots(self.level);
        self.ac_bonus = 0;
        self.attack_buff = 0;
    }

    /// Roll `1d20 + attack bonus + STR` against `target_ac`. On a hit,
    /// damage is `damage + STR`, at least 1.
    pub fn attack_roll(
        &self,
        target_ac: i32,
        damage: &str,
        dice: &mut dyn DiceSource,
    ) -> MechResult<AttackOutcome> {
        let formula: DiceFormula = damage.parse()?;
        Ok(self.attack_with(target_ac, &formula, dice))
    }

    /// [`attack_roll`](Self::attack_roll) with an already-parsed formula.
    pub fn attack_with(
        &self,
        target_ac: i32,
        damage: &DiceFormula,
        dice: &mut dyn DiceSource,
    ) -> AttackOutcome {
        let str_mod = self.abilities.modifier(Ability::Strength);
        let roll = dice.d20(1, self.attack_bonus() + str_mod);
        if roll >= target_ac {
            let damage = (damage.roll(dice) + str_mod).max(1);
            AttackOutcome {
                hit: true,
                roll,
                damage,
            }
        } else {
            AttackOutcome {
                hit: false,
                roll,
                damage: 0,
            }
        }
    }

    /// Add experience, levelling up as many times as the total allows.
    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, xp: u32) -> u32 {
        self.experience = self.experience.saturating_add(xp);
        // Smallest level with experience < level * XP_PER_LEVEL.
        let target = self.experience / XP_PER_LEVEL + 1;
        if target <= self.level {
            return 0;
        }
        let gained = target - self.level;
        self.level = target;
        self.recompute();
        info!(name = %self.name, level = self.level, gained, "level up");
        gained
    }

    /// Advance one level and recompute.
    pub fn level_up(&mut self) {
        self.level += 1;
        self.recompute();
        info!(name = %self.name, level = self.level, "level up");
    }

    /// Restore hit points and spell slots; temporary bonuses end.
    pub fn rest(&mut self) {
        self.recompute();
    }

    /// Learn a spell. Already-known spells are ignored.
    pub fn learn_spell(&mut self, spell: Spell) {
        if !self.knows_spell(&spell.id) {
            self.known_spells.push(spell);
        }
    }

    /// True if a spell with this id is known.
    pub fn knows_spell(&self, id: &str) -> bool {
        self.known_spells.iter().any(|s| s.id == id)
    }

    /// True if the spell is known and a slot of its level remains.
    pub fn can_cast(&self, spell: &Spell) -> bool {
        self.knows_spell(&spell.id) && self.spell_slots.get(&spell.level).copied().unwrap_or(0) > 0
    }

    /// Spend a slot and resolve the spell.
    ///
    /// Fails without spending a slot if the spell cannot be cast, or if it
    /// needs a target and none was given.
    pub fn cast_spell(
        &mut self,
        spell: &Spell,
        target: Option<&mut dyn Combatant>,
        dice: &mut dyn DiceSource,
    ) -> CastOutcome {
        if !self.can_cast(spell) {
            return CastOutcome {
                cast: false,
                message: "Cannot cast spell".to_string(),
            };
        }
        if spell.effect.needs_target() && target.is_none() {
            return CastOutcome {
                cast: false,
                message: format!("No target selected for {}", spell.name),
            };
        }
        if let Some(slots) = self.spell_slots.get_mut(&spell.level) {
            *slots -= 1;
        }
        let message = spell.apply(self, target, dice);
        CastOutcome {
            cast: true,
            message,
        }
    }

    /// Add an item to the end of the inventory.
    pub fn add_item(&mut self, item: Item) {
        self.inventory.push(item);
    }

    /// True if any carried item has this name (case-insensitive).
    pub fn has_item(&self, name: &str) -> bool {
        self.inventory.iter().any(|i| i.is_named(name))
    }

    /// Number of carried items with this name (case-insensitive).
    pub fn item_count(&self, name: &str) -> usize {
        self.inventory.iter().filter(|i| i.is_named(name)).count()
    }

    /// Damage dice of the first carried weapon, if any.
    pub fn weapon_damage(&self) -> Option<DiceFormula> {
        self.inventory.iter().find_map(Item::weapon_damage)
    }

    /// Use the first item with this name. Consumables are removed.
    /// Returns `None` if no such item is carried.
    pub fn use_item(&mut self, name: &str, dice: &mut dyn DiceSource) -> Option<String> {
        let index = self.inventory.iter().position(|i| i.is_named(name))?;
        let item = if self.inventory[index].consumable {
            self.inventory.remove(index)
        } else {
            self.inventory[index].clone()
        };
        Some(item.apply(self, dice))
    }

    /// Remove up to `quantity` items with this name, earliest first.
    /// Returns how many were removed.
    pub fn remove_items(&mut self, name: &str, quantity: usize) -> usize {
        let mut removed = 0;
        self.inventory.retain(|item| {
            if removed < quantity && item.is_named(name) {
                removed += 1;
                false
            } else {
                true
            }
        });
        removed
    }
}

impl Combatant for Character {
    fn name(&self) -> &str {
        &self.name
    }

    fn armor_class(&self) -> i32 {
        10 + self.abilities.modifier(Ability::Dexterity) + self.ac_bonus
    }

    fn current_hp(&self) -> i32 {
        self.current_hp
    }

    fn max_hp(&self) -> i32 {
        self.max_hp
    }

    fn attack_bonus(&self) -> i32 {
        self.base_attack_bonus + self.attack_buff
    }

    fn saves(&self) -> Saves {
        self.saves
    }

    fn ability_modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    fn take_damage(&mut self, amount: i32) {
        self.current_hp -= amount;
    }

    fn heal(&mut self, amount: i32) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    fn adjust_armor_class(&mut self, delta: i32) {
        self.ac_bonus += delta;
    }

    fn adjust_attack_bonus(&mut self, delta: i32) {
        self.attack_buff += delta;
    }
}

impl std::fmt::Display for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} - Level {} {}", self.name, self.level, self.class)?;
        writeln!(
            f,
            "HP: {}/{} | AC: {}",
            self.current_hp,
            self.max_hp,
            self.armor_class()
        )?;
        let a = &self.abilities;
        writeln!(
            f,
            "STR: {} DEX: {} CON: {}",
            a.strength, a.dexterity, a.constitution
        )?;
        write!(
            f,
            "INT: {} WIS: {} CHA: {}",
            a.intelligence, a.wisdom, a.charisma
        )
    }
}
