//! Inventory items.

use serde::{Deserialize, Serialize};

use crate::dice::{DiceFormula, DiceSource};
use crate::sheet::{Character, Combatant};

/// Name of the standard healing potion.
pub const HEALING_POTION: &str = "Potion of Healing";

/// What kind of item this is, and its mechanical payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// Drinkable; restores hit points.
    Potion {
        /// Hit points restored.
        healing: DiceFormula,
    },
    /// A weapon with its damage dice.
    Weapon {
        /// Damage on a hit.
        damage: DiceFormula,
        /// Enhancement bonus.
        bonus: i32,
    },
    /// Anything else: keys, ropes, journals.
    Gear,
}

/// An item a character can carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Display name, matched case-insensitively.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Consumable items are removed from the inventory when used.
    pub consumable: bool,
    /// Kind and mechanical payload.
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    /// A plain, non-consumable item with no mechanical effect.
    pub fn gear(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            consumable: false,
            kind: ItemKind::Gear,
        }
    }

    /// The standard Potion of Healing (2d4+2, consumable).
    pub fn healing_potion() -> Self {
        Self {
            name: HEALING_POTION.to_string(),
            description: "Restores 2d4+2 hit points".to_string(),
            consumable: true,
            kind: ItemKind::Potion {
                healing: DiceFormula::new(2, 4, 2),
            },
        }
    }

    /// A weapon.
    pub fn weapon(name: &str, damage: DiceFormula, bonus: i32, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            consumable: false,
            kind: ItemKind::Weapon { damage, bonus },
        }
    }

    /// Damage dice for a weapon, with its enhancement bonus folded into
    /// the modifier. `None` for anything else.
    pub fn weapon_damage(&self) -> Option<DiceFormula> {
        match &self.kind {
            ItemKind::Weapon { damage, bonus } => Some(DiceFormula::new(
                damage.count,
                damage.sides,
                damage.modifier.saturating_add(*bonus),
            )),
            _ => None,
        }
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim())
    }

    /// Apply the item's effect to `character` and describe what happened.
    /// Inventory bookkeeping is the caller's concern.
    pub fn apply(&self, character: &mut Character, dice: &mut dyn DiceSource) -> String {
        match &self.kind {
            ItemKind::Potion { healing } => {
                let amount = healing.roll(dice);
                character.heal(amount);
                format!(
                    "{} drinks the {} and recovers {amount} HP! ({}/{})",
                    character.name(),
                    self.name,
                    character.current_hp(),
                    character.max_hp()
                )
            }
            ItemKind::Weapon { .. } | ItemKind::Gear => {
                format!("Used {}", self.name)
            }
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ItemKind::Weapon { damage, bonus } if *bonus > 0 => {
                write!(f, "{} +{bonus} ({damage} damage)", self.name)
            }
            ItemKind::Weapon { damage, .. } => write!(f, "{} ({damage} damage)", self.name),
            ItemKind::Potion { .. } | ItemKind::Gear => f.write_str(&self.name),
        }
    }
}

/// Look up one of the common items by key, e.g. `longsword` or `healing_potion`.
pub fn common_item(key: &str) -> Option<Item> {
    let item = match key.trim().to_lowercase().replace(' ', "_").as_str() {
        "healing_potion" | "potion_of_healing" => Item::healing_potion(),
        "longsword" => Item::weapon(
            "Longsword",
            DiceFormula::new(1, 8, 0),
            0,
            "A versatile steel blade",
        ),
        "greatsword" => Item::weapon(
            "Greatsword",
            DiceFormula::new(2, 6, 0),
            0,
            "A massive two-handed sword",
        ),
        "dagger" => Item::weapon("Dagger", DiceFormula::new(1, 4, 0), 0, "A small, quick blade"),
        _ => return None,
    };
    Some(item)
}

/// The item a piece of named loot becomes: a common item when the name
/// matches one, plain gear otherwise. A trailing `+N` on a common weapon
/// (`Longsword +1`) becomes its enhancement bonus.
pub fn found_item(name: &str) -> Item {
    let name = name.trim();
    if let Some(item) = common_item(name) {
        return item;
    }
    let enhanced = name.rsplit_once(" +").and_then(|(base, bonus)| {
        let bonus = bonus.parse::<i32>().ok()?;
        match common_item(base)? {
            Item {
                kind: ItemKind::Weapon { damage, .. },
                description,
                ..
            } => Some(Item::weapon(name, damage, bonus, &description)),
            _ => None,
        }
    });
    enhanced.unwrap_or_else(|| Item::gear(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;
    use crate::sheet::CharacterClass;

    #[test]
    fn potion_heals_two_d4_plus_two() {
        let mut hero = Character::new("Aric", CharacterClass::Fighter);
        hero.take_damage(8);
        let mut dice = ScriptedDice::new([1, 2]);
        let msg = Item::healing_potion().apply(&mut hero, &mut dice);
        assert_eq!(hero.current_hp(), 2 + 5);
        assert!(msg.contains("recovers 5 HP"));
    }

    #[test]
    fn potion_heal_is_capped() {
        let mut hero = Character::new("Aric", CharacterClass::Fighter);
        hero.take_damage(1);
        let mut dice = ScriptedDice::new([4, 4]);
        Item::healing_potion().apply(&mut hero, &mut dice);
        assert_eq!(hero.current_hp(), hero.max_hp());
    }

    #[test]
    fn gear_has_no_effect() {
        let mut hero = Character::new("Aric", CharacterClass::Fighter);
        let mut dice = ScriptedDice::default();
        assert_eq!(Item::gear("Rope").apply(&mut hero, &mut dice), "Used Rope");
    }

    #[test]
    fn names_match_case_insensitively() {
        assert!(Item::healing_potion().is_named("potion of healing"));
        assert!(!Item::gear("Rope").is_named("rope ladder"));
    }

    #[test]
    fn common_items() {
        assert_eq!(common_item("longsword").unwrap().to_string(), "Longsword (1d8 damage)");
        assert_eq!(common_item("Great Sword"), None);
        assert_eq!(common_item("greatsword").unwrap().to_string(), "Greatsword (2d6 damage)");
        assert!(common_item("healing_potion").unwrap().consumable);
        assert!(common_item("wand").is_none());
    }

    #[test]
    fn found_items_resolve_common_names() {
        let sword = found_item("Longsword");
        assert_eq!(sword.weapon_damage(), Some(DiceFormula::new(1, 8, 0)));
        let enhanced = found_item("Longsword +1");
        assert_eq!(enhanced.name, "Longsword +1");
        assert_eq!(enhanced.weapon_damage(), Some(DiceFormula::new(1, 8, 1)));
        assert_eq!(found_item("Magic sword +1"), Item::gear("Magic sword +1"));
        assert_eq!(found_item("Healing Potion +2"), Item::gear("Healing Potion +2"));

        let amulet = found_item("Magic amulet");
        assert_eq!(amulet, Item::gear("Magic amulet"));
        assert_eq!(amulet.weapon_damage(), None);
    }

    #[test]
    fn weapon_bonus_folds_into_damage() {
        let blade = Item::weapon("Flame Blade", DiceFormula::new(1, 8, 1), 2, "Hot");
        assert_eq!(blade.weapon_damage(), Some(DiceFormula::new(1, 8, 3)));
        assert_eq!(blade.to_string(), "Flame Blade +2 (1d8+1 damage)");
    }
}
