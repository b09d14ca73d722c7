//! Monster stat blocks, the built-in bestiary, and spawned monsters.

use serde::{Deserialize, Serialize};

use crate::dice::{DiceFormula, DiceSource};
use crate::error::MechResult;
use crate::sheet::{Ability, Combatant, Saves};

/// Tags recognized by [`MonsterTemplate::bestiary`].
pub const BESTIARY_TAGS: [&str; 8] = [
    "goblin",
    "orc",
    "skeleton",
    "ogre",
    "dragon",
    "giant_spider",
    "zombie",
    "troll",
];

/// A monster stat block, as stored in the bestiary or an adventure file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterTemplate {
    /// Display name. Empty in adventure files, where the map key names it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Hit dice formula, rolled once per spawn.
    #[serde(default = "default_hit_dice")]
    pub hit_dice: String,
    /// Armor class.
    #[serde(default = "default_armor_class")]
    pub armor_class: i32,
    /// Bonus to attack rolls.
    #[serde(default = "default_attack_bonus")]
    pub attack_bonus: i32,
    /// Damage formula per hit.
    #[serde(default = "default_damage")]
    pub damage: String,
    /// Descriptive special ability tags.
    #[serde(default)]
    pub special_abilities: Vec<String>,
    /// Treasure carried, dropped on defeat.
    #[serde(default)]
    pub treasure: Vec<String>,
    /// Saving throw bonuses.
    #[serde(default)]
    pub saves: Saves,
}

fn default_hit_dice() -> String {
    "2d8".to_string()
}

fn default_armor_class() -> i32 {
    12
}

fn default_attack_bonus() -> i32 {
    2
}

fn default_damage() -> String {
    "1d6".to_string()
}

impl MonsterTemplate {
    fn new(name: &str, hit_dice: &str, armor_class: i32, attack_bonus: i32, damage: &str) -> Self {
        Self {
            name: name.to_string(),
            hit_dice: hit_dice.to_string(),
            armor_class,
            attack_bonus,
            damage: damage.to_string(),
            special_abilities: Vec::new(),
            treasure: Vec::new(),
            saves: Saves::default(),
        }
    }

    fn special(mut self, text: &str) -> Self {
        self.special_abilities.push(text.to_string());
        self
    }

    fn carrying(mut self, items: &[&str]) -> Self {
        self.treasure = items.iter().map(|s| s.to_string()).collect();
        self
    }

    fn saves(mut self, fortitude: i32, reflex: i32, will: i32) -> Self {
        self.saves = Saves {
            fortitude,
            reflex,
            will,
        };
        self
    }

    /// Built-in stat block for a tag (case-insensitive), if one exists.
    pub fn bestiary(tag: &str) -> Option<Self> {
        let template = match tag.trim().to_lowercase().as_str() {
            "goblin" => Self::new("Goblin", "2d6", 12, 0, "1d4+2")
                .carrying(&["10 gold pieces"])
                .saves(0, 3, 0),
            "orc" => Self::new("Orc", "2d8", 13, 1, "1d8")
                .carrying(&["20 gold pieces", "Battle axe"])
                .saves(3, 0, 0),
            "skeleton" => Self::new("Skeleton", "1d12", 13, 2, "1d6+1")
                .special("Undead: immune to mind-affecting")
                .saves(0, 0, -2),
            "ogre" => Self::new("Ogre", "4d8+8", 16, 8, "2d8+7")
                .carrying(&["50 gold pieces", "Large club"])
                .saves(5, 0, 0),
            "dragon" => Self::new("Young Red Dragon", "13d12+39", 21, 18, "2d6+7")
                .special("Breath Weapon: 8d10 fire damage, Reflex DC 19 for half")
                .carrying(&["500 gold pieces", "Magic sword +1", "Ruby worth 1000gp"])
                .saves(11, 8, 8),
            "giant_spider" => Self::new("Giant Spider", "2d8", 14, 4, "1d6")
                .special("Poison: DC 14 Fort save or 1d4 STR damage")
                .saves(0, 4, 0),
            "zombie" => Self::new("Zombie", "2d12+3", 11, 2, "1d6+1")
                .special("Undead: immune to mind-affecting")
                .saves(3, 0, -2),
            "troll" => Self::new("Troll", "6d8+36", 16, 9, "1d6+6")
                .special("Regeneration 5: heals 5 HP per round")
                .carrying(&["30 gold pieces"])
                .saves(9, 0, 0),
            _ => return None,
        };
        Some(template)
    }

    /// Stand-in for tags nothing else recognizes.
    pub fn generic() -> Self {
        Self::new("Unknown Creature", "2d8", 12, 0, "1d6")
    }

    /// Parse both formulas, reporting the first that is malformed.
    pub fn check_formulas(&self) -> MechResult<()> {
        self.hit_dice.parse::<DiceFormula>()?;
        self.damage.parse::<DiceFormula>()?;
        Ok(())
    }
}

/// A spawned monster with rolled hit points.
#[derive(Debug, Clone)]
pub struct Monster {
    /// Display name.
    pub name: String,
    /// Armor class.
    pub armor_class: i32,
    /// Bonus to attack rolls.
    pub attack_bonus: i32,
    /// Descriptive special ability tags.
    pub special_abilities: Vec<String>,
    /// Treasure carried.
    pub treasure: Vec<String>,
    /// Saving throw bonuses.
    pub saves: Saves,
    /// Current hit points. May go to zero or below.
    pub current_hp: i32,
    max_hp: i32,
    hit_dice: DiceFormula,
    damage: DiceFormula,
}

/// Result of a monster's attack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterAttack {
    /// True if the attack roll met the target's armor class.
    pub hit: bool,
    /// Damage dealt; 0 on a miss.
    pub damage: i32,
    /// What happened.
    pub message: String,
}

impl Monster {
    /// Spawn from a template, rolling hit points once (at least 1).
    pub fn spawn(template: &MonsterTemplate, dice: &mut dyn DiceSource) -> MechResult<Self> {
        let hit_dice: DiceFormula = template.hit_dice.parse()?;
        let damage: DiceFormula = template.damage.parse()?;
        let max_hp = hit_dice.roll(dice).max(1);
        Ok(Self {
            name: template.name.clone(),
            armor_class: template.armor_class,
            attack_bonus: template.attack_bonus,
            special_abilities: template.special_abilities.clone(),
            treasure: template.treasure.clone(),
            saves: template.saves,
            current_hp: max_hp,
            max_hp,
            hit_dice,
            damage,
        })
    }

    /// The hit dice formula.
    pub fn hit_dice(&self) -> &DiceFormula {
        &self.hit_dice
    }

    /// The damage formula.
    pub fn damage(&self) -> &DiceFormula {
        &self.damage
    }

    /// Experience awarded for defeating this monster: 100 per hit die,
    /// saturating.
    pub fn experience_value(&self) -> u32 {
        self.hit_dice.count.saturating_mul(100)
    }

    /// Roll `1d20 + attack bonus` against the target's armor class; on a hit
    /// roll damage (at least 1) and apply it.
    pub fn attack(&self, target: &mut dyn Combatant, dice: &mut dyn DiceSource) -> MonsterAttack {
        let roll = dice.d20(1, self.attack_bonus);
        if roll >= target.armor_class() {
            let damage = self.damage.roll(dice).max(1);
            target.take_damage(damage);
            MonsterAttack {
                hit: true,
                damage,
                message: format!("{} hits {} for {damage} damage!", self.name, target.name()),
            }
        } else {
            MonsterAttack {
                hit: false,
                damage: 0,
                message: format!("{} misses {}!", self.name, target.name()),
            }
        }
    }
}

impl Combatant for Monster {
    fn name(&self) -> &str {
        &self.name
    }

    fn armor_class(&self) -> i32 {
        self.armor_class
    }

    fn current_hp(&self) -> i32 {
        self.current_hp
    }

    fn max_hp(&self) -> i32 {
        self.max_hp
    }

    fn attack_bonus(&self) -> i32 {
        self.attack_bonus
    }

    fn saves(&self) -> Saves {
        self.saves
    }

    fn ability_modifier(&self, _ability: Ability) -> i32 {
        0
    }

    fn take_damage(&mut self, amount: i32) {
        self.current_hp -= amount;
    }

    fn heal(&mut self, amount: i32) {
        self.current_hp = (self.current_hp + amount).min(self.max_hp);
    }

    fn adjust_armor_class(&mut self, delta: i32) {
        self.armor_class += delta;
    }

    fn adjust_attack_bonus(&mut self, delta: i32) {
        self.attack_bonus += delta;
    }
}

impl std::fmt::Display for Monster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (AC {}, HP {}/{})",
            self.name, self.armor_class, self.current_hp, self.max_hp
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedDice, SeededDice};
    use crate::sheet::{Character, CharacterClass};

    #[test]
    fn every_bestiary_tag_resolves() {
        for tag in BESTIARY_TAGS {
            let template = MonsterTemplate::bestiary(tag).unwrap();
            assert!(template.check_formulas().is_ok(), "{tag}");
        }
        assert!(MonsterTemplate::bestiary("GOBLIN").is_some());
        assert!(MonsterTemplate::bestiary("beholder").is_none());
    }

    #[test]
    fn dragon_stat_line() {
        let dragon = MonsterTemplate::bestiary("dragon").unwrap();
        assert_eq!(dragon.name, "Young Red Dragon");
        assert_eq!(dragon.armor_class, 21);
        assert_eq!(dragon.saves, Saves { fortitude: 11, reflex: 8, will: 8 });
        assert_eq!(dragon.treasure.len(), 3);
    }

    #[test]
    fn generic_monster() {
        let generic = MonsterTemplate::generic();
        assert_eq!(generic.name, "Unknown Creature");
        assert_eq!(generic.hit_dice, "2d8");
        assert_eq!(generic.attack_bonus, 0);
    }

    #[test]
    fn spawn_rolls_hit_points() {
        let mut dice = ScriptedDice::new([3, 5]);
        let orc = Monster::spawn(&MonsterTemplate::bestiary("orc").unwrap(), &mut dice).unwrap();
        assert_eq!(orc.max_hp(), 8);
        assert_eq!(orc.current_hp(), 8);
        assert_eq!(orc.experience_value(), 200);
    }

    #[test]
    fn experience_value_saturates() {
        let mut dice = ScriptedDice::default();
        let mut orc = Monster::spawn(&MonsterTemplate::bestiary("orc").unwrap(), &mut dice).unwrap();
        orc.hit_dice = DiceFormula::new(50_000_000, 1, 0);
        assert_eq!(orc.experience_value(), u32::MAX);
    }

    #[test]
    fn spawn_hp_is_at_least_one() {
        let mut template = MonsterTemplate::generic();
        template.hit_dice = "1d4-10".to_string();
        let m = Monster::spawn(&template, &mut SeededDice::new(1)).unwrap();
        assert_eq!(m.max_hp(), 1);
    }

    #[test]
    fn spawn_rejects_bad_formula() {
        let mut template = MonsterTemplate::generic();
        template.damage = "claws".to_string();
        assert!(Monster::spawn(&template, &mut SeededDice::new(1)).is_err());
    }

    #[test]
    fn attack_hits_and_damages() {
        let mut dice = ScriptedDice::new([4, 4]);
        let goblin = Monster::spawn(&MonsterTemplate::bestiary("goblin").unwrap(), &mut dice).unwrap();
        let mut hero = Character::new("Aric", CharacterClass::Fighter);
        // d20 = 10 vs AC 10, damage 1d4+2 = 3 + 2
        let mut dice = ScriptedDice::new([10, 3]);
        let result = goblin.attack(&mut hero, &mut dice);
        assert!(result.hit);
        assert_eq!(result.damage, 5);
        assert_eq!(hero.current_hp(), 5);
        assert_eq!(result.message, "Goblin hits Aric for 5 damage!");
    }

    #[test]
    fn attack_misses() {
        let mut dice = ScriptedDice::new([4, 4]);
        let goblin = Monster::spawn(&MonsterTemplate::bestiary("goblin").unwrap(), &mut dice).unwrap();
        let mut hero = Character::new("Aric", CharacterClass::Fighter);
        let mut dice = ScriptedDice::new([9]);
        let result = goblin.attack(&mut hero, &mut dice);
        assert!(!result.hit);
        assert_eq!(hero.current_hp(), 10);
    }

    #[test]
    fn monster_damage_floor() {
        let mut template = MonsterTemplate::generic();
        template.damage = "1d4-5".to_string();
        let mut dice = ScriptedDice::new([8, 8]);
        let m = Monster::spawn(&template, &mut dice).unwrap();
        let mut hero = Character::new("Aric", CharacterClass::Fighter);
        let mut dice = ScriptedDice::new([20, 1]);
        assert_eq!(m.attack(&mut hero, &mut dice).damage, 1);
    }

    #[test]
    fn template_defaults_from_json() {
        let template: MonsterTemplate = serde_json::from_str(r#"{"armor_class": 15}"#).unwrap();
        assert_eq!(template.hit_dice, "2d8");
        assert_eq!(template.armor_class, 15);
        assert_eq!(template.attack_bonus, 2);
        assert_eq!(template.damage, "1d6");
        assert!(template.treasure.is_empty());
    }
}
