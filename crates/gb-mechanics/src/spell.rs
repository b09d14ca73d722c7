//! Spells as data, interpreted by a single effect function.

use crate::dice::{DiceFormula, DiceSource};
use crate::sheet::{Ability, CharacterClass, Combatant, SaveType};

/// School of magic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum School {
    /// Protective magic.
    Abjuration,
    /// Healing and summoning.
    Conjuration,
    /// Information gathering.
    Divination,
    /// Mind-affecting magic.
    Enchantment,
    /// Energy and damage.
    Evocation,
}

impl std::fmt::Display for School {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Abjuration => "Abjuration",
            Self::Conjuration => "Conjuration",
            Self::Divination => "Divination",
            Self::Enchantment => "Enchantment",
            Self::Evocation => "Evocation",
        };
        f.write_str(name)
    }
}

/// What a spell does when it resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum SpellEffect {
    /// `count` automatic hits of `damage`, summed.
    Missiles {
        /// Number of missiles.
        count: u32,
        /// Damage per missile.
        damage: DiceFormula,
    },
    /// Damage the target; a successful save at `dc` halves it (rounded down).
    SaveForHalf {
        /// Damage dice.
        damage: DiceFormula,
        /// Save the target rolls.
        save: SaveType,
        /// Difficulty class of the save.
        dc: i32,
    },
    /// `1d20 + attack bonus + ability modifier` against the target's AC.
    RangedTouch {
        /// Damage on a hit.
        damage: DiceFormula,
        /// Caster ability added to the attack roll.
        ability: Ability,
    },
    /// Heal `dice` plus the caster's modifier for `ability`.
    Heal {
        /// Healing dice.
        dice: DiceFormula,
        /// Caster ability added to the healing.
        ability: Ability,
    },
    /// Temporary armor class bonus.
    ArmorBonus(i32),
    /// Temporary attack bonus.
    AttackBonus(i32),
    /// No mechanical effect; the text follows the caster's name.
    Utility(String),
}

impl SpellEffect {
    /// True if the effect needs an explicit target. Other effects fall back
    /// to the caster.
    pub fn needs_target(&self) -> bool {
        matches!(
            self,
            Self::Missiles { .. } | Self::SaveForHalf { .. } | Self::RangedTouch { .. }
        )
    }
}

/// A castable spell.
#[derive(Debug, Clone, PartialEq)]
pub struct Spell {
    /// Library key, e.g. `magic_missile`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Spell level (0 for cantrips).
    pub level: u8,
    /// School of magic.
    pub school: School,
    /// Range in feet (0 for touch or self).
    pub range_ft: u32,
    /// Duration text.
    pub duration: String,
    /// Rules text.
    pub description: String,
    /// What the spell does.
    pub effect: SpellEffect,
}

impl Spell {
    /// Resolve the spell's effect. Slots are the caller's concern.
    ///
    /// Effects that need a target report a message and do nothing when
    /// `target` is `None`; the rest apply to `target` or, failing that,
    /// to the caster.
    pub fn apply(
        &self,
        caster: &mut dyn Combatant,
        target: Option<&mut dyn Combatant>,
        dice: &mut dyn DiceSource,
    ) -> String {
        match &self.effect {
            SpellEffect::Missiles { count, damage } => {
                let Some(target) = target else {
                    return self.no_target();
                };
                let total: i32 = (0..*count).map(|_| damage.roll(&mut *dice)).sum();
                target.take_damage(total);
                format!("{} hits {} for {total} force damage!", self.name, target.name())
            }
            SpellEffect::SaveForHalf { damage, save, dc } => {
                let Some(target) = target else {
                    return self.no_target();
                };
                let mut amount = damage.roll(dice);
                let save_roll = target.saving_throw(Some(*save), dice);
                let outcome = if save_roll >= *dc {
                    amount /= 2;
                    format!("{} saves! Takes {amount} damage (halved).", target.name())
                } else {
                    format!("{} fails the save! Takes {amount} damage!", target.name())
                };
                target.take_damage(amount);
                format!("{} engulfs the area! {outcome}", self.name)
            }
            SpellEffect::RangedTouch { damage, ability } => {
                let Some(target) = target else {
                    return self.no_target();
                };
                let bonus = caster.attack_bonus() + caster.ability_modifier(*ability);
                let roll = dice.d20(1, bonus);
                if roll >= target.armor_class() {
                    let amount = damage.roll(dice);
                    target.take_damage(amount);
                    format!("{} strikes {} for {amount} damage!", self.name, target.name())
                } else {
                    format!("{} misses {}!", self.name, target.name())
                }
            }
            SpellEffect::Heal { dice: formula, ability } => {
                let bonus = caster.ability_modifier(*ability);
                let target: &mut dyn Combatant = match target {
                    Some(t) => t,
                    None => caster,
                };
                let amount = dice.roll(formula.sides, formula.count, formula.modifier + bonus);
                target.heal(amount);
                format!(
                    "{} heals {} for {amount} HP! ({}/{})",
                    self.name,
                    target.name(),
                    target.current_hp(),
                    target.max_hp()
                )
            }
            SpellEffect::ArmorBonus(bonus) => {
                let target: &mut dyn Combatant = match target {
                    Some(t) => t,
                    None => caster,
                };
                target.adjust_armor_class(*bonus);
                format!(
                    "{} surrounds {}! AC increased to {}.",
                    self.name,
                    target.name(),
                    target.armor_class()
                )
            }
            SpellEffect::AttackBonus(bonus) => {
                let target: &mut dyn Combatant = match target {
                    Some(t) => t,
                    None => caster,
                };
                target.adjust_attack_bonus(*bonus);
                format!("{} is blessed! Attack bonus +{bonus}.", target.name())
            }
            SpellEffect::Utility(text) => format!("{} {text}", caster.name()),
        }
    }

    fn no_target(&self) -> String {
        format!("No target selected for {}", self.name)
    }
}

impl std::fmt::Display for Spell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.level == 0 {
            write!(f, "{} (Cantrip {}): {}", self.name, self.school, self.description)
        } else {
            write!(
                f,
                "{} (Level {} {}): {}",
                self.name, self.level, self.school, self.description
            )
        }
    }
}

impl Spell {
    fn new(id: &str, name: &str, level: u8, school: School, effect: SpellEffect) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            level,
            school,
            range_ft: 0,
            duration: "Instantaneous".to_string(),
            description: String::new(),
            effect,
        }
    }

    fn range(mut self, feet: u32) -> Self {
        self.range_ft = feet;
        self
    }

    fn lasting(mut self, duration: &str) -> Self {
        self.duration = duration.to_string();
        self
    }

    fn described(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }
}

/// Every spell in the library, ordered by level.
pub fn library() -> Vec<Spell> {
    use School::*;
    use SpellEffect::*;

    vec![
        Spell::new(
            "detect_magic",
            "Detect Magic",
            0,
            Divination,
            Utility("senses magical auras in the area...".to_string()),
        )
        .range(60)
        .lasting("Concentration, up to 1 minute")
        .described("Sense the presence of magic within 60 feet."),
        Spell::new(
            "ray_of_frost",
            "Ray of Frost",
            0,
            Evocation,
            RangedTouch {
                damage: DiceFormula::new(1, 8, 0),
                ability: Ability::Intelligence,
            },
        )
        .range(60)
        .described("A frigid beam deals 1d8 cold damage."),
        Spell::new(
            "magic_missile",
            "Magic Missile",
            1,
            Evocation,
            Missiles {
                count: 3,
                damage: DiceFormula::new(1, 4, 1),
            },
        )
        .range(120)
        .described("Three glowing darts strike unerringly. Each dart deals 1d4+1 force damage."),
        Spell::new(
            "cure_light_wounds",
            "Cure Light Wounds",
            1,
            Conjuration,
            Heal {
                dice: DiceFormula::new(1, 8, 0),
                ability: Ability::Wisdom,
            },
        )
        .described("Heals 1d8 + caster's Wisdom modifier hit points."),
        Spell::new("shield", "Shield", 1, Abjuration, ArmorBonus(4))
            .lasting("1 round")
            .described("An invisible barrier grants +4 to AC until your next turn."),
        Spell::new(
            "burning_hands",
            "Burning Hands",
            1,
            Evocation,
            SaveForHalf {
                damage: DiceFormula::new(3, 4, 0),
                save: SaveType::Reflex,
                dc: 13,
            },
        )
        .range(15)
        .described("A cone of fire deals 3d4 fire damage. Reflex save DC 13 for half."),
        Spell::new("bless", "Bless", 1, Enchantment, AttackBonus(1))
            .range(30)
            .lasting("1 minute")
            .described("Allies gain +1 to attack rolls."),
        Spell::new(
            "fireball",
            "Fireball",
            3,
            Evocation,
            SaveForHalf {
                damage: DiceFormula::new(8, 6, 0),
                save: SaveType::Reflex,
                dc: 15,
            },
        )
        .range(150)
        .described(
            "A bright streak explodes with a roar dealing 8d6 fire damage. Reflex save DC 15 for half.",
        ),
        Spell::new(
            "lightning_bolt",
            "Lightning Bolt",
            3,
            Evocation,
            SaveForHalf {
                damage: DiceFormula::new(8, 6, 0),
                save: SaveType::Reflex,
                dc: 15,
            },
        )
        .range(120)
        .described(
            "A stroke of lightning deals 8d6 electricity damage. Reflex save DC 15 for half.",
        ),
    ]
}

/// Look up a spell by id (`magic_missile`) or display name (`Magic Missile`).
pub fn get_spell(name: &str) -> Option<Spell> {
    let key = name.trim().to_lowercase().replace(' ', "_");
    library().into_iter().find(|s| s.id == key)
}

/// All library spells of one level.
pub fn spells_of_level(level: u8) -> Vec<Spell> {
    library().into_iter().filter(|s| s.level == level).collect()
}

/// Spells a new character of this class starts out knowing.
pub fn starting_spells(class: CharacterClass) -> Vec<Spell> {
    let ids: &[&str] = match class {
        CharacterClass::Wizard => &["magic_missile", "ray_of_frost"],
        CharacterClass::Cleric => &["cure_light_wounds", "bless"],
        CharacterClass::Fighter | CharacterClass::Rogue => &[],
    };
    ids.iter().filter_map(|id| get_spell(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::monster::{Monster, MonsterTemplate};
    use crate::sheet::{Abilities, Character, CharacterClass};

    fn goblin(dice: &mut ScriptedDice) -> Monster {
        Monster::spawn(&MonsterTemplate::bestiary("goblin").unwrap(), dice).unwrap()
    }

    fn wizard() -> Character {
        let mut c = Character::new("Elara", CharacterClass::Wizard);
        c.set_abilities(Abilities::new(10, 14, 12, 16, 14, 10));
        c
    }

    #[test]
    fn lookup_by_id_or_name() {
        assert_eq!(get_spell("magic_missile").unwrap().name, "Magic Missile");
        assert_eq!(get_spell("Magic Missile").unwrap().id, "magic_missile");
        assert_eq!(get_spell("Cure Light Wounds").unwrap().level, 1);
        assert!(get_spell("wish").is_none());
    }

    #[test]
    fn library_levels() {
        assert_eq!(spells_of_level(0).len(), 2);
        assert_eq!(spells_of_level(1).len(), 5);
        assert_eq!(spells_of_level(3).len(), 2);
    }

    #[test]
    fn magic_missile_sums_three_darts() {
        let mut dice = ScriptedDice::new([6, 6]);
        let mut target = goblin(&mut dice);
        let mut caster = wizard();
        let mm = get_spell("magic_missile").unwrap();
        let mut dice = ScriptedDice::new([1, 2, 3]);
        let msg = mm.apply(&mut caster, Some(&mut target), &mut dice);
        assert_eq!(target.current_hp(), 12 - 9);
        assert!(msg.contains("9 force damage"));
    }

    #[test]
    fn fireball_halves_on_save() {
        let mut dice = ScriptedDice::new([6, 6]);
        let mut target = goblin(&mut dice);
        let fireball = get_spell("fireball").unwrap();
        // 8d6 = 8 + 5, reflex d20 = 12 + 3 = 15 vs DC 15
        let mut dice = ScriptedDice::new([1, 1, 1, 1, 1, 1, 1, 1, 12]);
        let mut caster = wizard();
        let msg = fireball.apply(&mut caster, Some(&mut target), &mut dice);
        assert_eq!(target.current_hp(), 12 - 4);
        assert!(msg.contains("halved"));
    }

    #[test]
    fn fireball_full_damage_on_failed_save() {
        let mut dice = ScriptedDice::new([6, 6]);
        let mut target = goblin(&mut dice);
        let fireball = get_spell("fireball").unwrap();
        let mut dice = ScriptedDice::new([1, 1, 1, 1, 1, 1, 1, 1, 2]);
        fireball.apply(&mut wizard(), Some(&mut target), &mut dice);
        assert_eq!(target.current_hp(), 12 - 8);
    }

    #[test]
    fn ray_of_frost_uses_intelligence() {
        let mut dice = ScriptedDice::new([6, 6]);
        let mut target = goblin(&mut dice);
        let ray = get_spell("ray_of_frost").unwrap();
        // wizard level 1: BAB 0, INT +3; 9 + 3 = 12 vs AC 12
        let mut dice = ScriptedDice::new([9, 5]);
        let msg = ray.apply(&mut wizard(), Some(&mut target), &mut dice);
        assert!(msg.contains("strikes"));
        assert_eq!(target.current_hp(), 7);

        let mut dice = ScriptedDice::new([8]);
        let msg = ray.apply(&mut wizard(), Some(&mut target), &mut dice);
        assert!(msg.contains("misses"));
        assert_eq!(target.current_hp(), 7);
    }

    #[test]
    fn offensive_spell_without_target() {
        let mm = get_spell("magic_missile").unwrap();
        let mut dice = ScriptedDice::default();
        let msg = mm.apply(&mut wizard(), None, &mut dice);
        assert_eq!(msg, "No target selected for Magic Missile");
    }

    #[test]
    fn cure_heals_caster_with_wisdom() {
        let mut caster = wizard();
        caster.take_damage(5);
        let cure = get_spell("cure_light_wounds").unwrap();
        // 1d8 = 2, WIS 14 = +2
        let mut dice = ScriptedDice::new([2]);
        cure.apply(&mut caster, None, &mut dice);
        assert_eq!(caster.current_hp(), caster.max_hp() - 1);
    }

    #[test]
    fn shield_and_bless_buff_caster() {
        let mut caster = wizard();
        let ac = caster.armor_class();
        let bab = caster.attack_bonus();
        let mut dice = ScriptedDice::default();
        get_spell("shield").unwrap().apply(&mut caster, None, &mut dice);
        get_spell("bless").unwrap().apply(&mut caster, None, &mut dice);
        assert_eq!(caster.armor_class(), ac + 4);
        assert_eq!(caster.attack_bonus(), bab + 1);
    }

    #[test]
    fn utility_is_message_only() {
        let mut caster = wizard();
        let mut dice = ScriptedDice::default();
        let msg = get_spell("detect_magic").unwrap().apply(&mut caster, None, &mut dice);
        assert_eq!(msg, "Elara senses magical auras in the area...");
    }

    #[test]
    fn display_shows_level() {
        let mm = get_spell("magic_missile").unwrap();
        assert!(mm.to_string().starts_with("Magic Missile (Level 1 Evocation)"));
        let ray = get_spell("ray_of_frost").unwrap();
        assert!(ray.to_string().starts_with("Ray of Frost (Cantrip Evocation)"));
    }

    #[test]
    fn starting_spells_by_class() {
        let ids: Vec<String> = starting_spells(CharacterClass::Wizard)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec!["magic_missile", "ray_of_frost"]);
        assert_eq!(starting_spells(CharacterClass::Cleric).len(), 2);
        assert!(starting_spells(CharacterClass::Fighter).is_empty());
    }
}
