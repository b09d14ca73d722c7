//! Nodes: the locations of an adventure.
//!
//! A [`Node`] owns its monsters, treasure, and traps. Other components
//! never edit those lists directly; they collect treasure, spring traps,
//! and clear defeated monsters through the node's own methods.

use gb_mechanics::{
    Character, CombatSession, DiceSource, Item, MechResult, Monster, found_item,
    treasure::{self, TreasureKind},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::adventure::Adventure;
use crate::effect::OnEnterEffect;
use crate::requirement::Requirements;
use crate::trap::Trap;

/// A choice leading from one node to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// What the player sees.
    pub text: String,
    /// Id of the node this choice leads to.
    pub target: String,
    /// What the character needs to take it.
    #[serde(default, skip_serializing_if = "Requirements::is_empty")]
    pub requirements: Requirements,
}

impl Choice {
    /// An unrestricted choice.
    pub fn new(text: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: target.into(),
            requirements: Requirements::none(),
        }
    }

    /// Attach requirements.
    pub fn requiring(mut self, requirements: Requirements) -> Self {
        self.requirements = requirements;
        self
    }
}

/// How an ending node ends the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ending {
    /// The adventure is won.
    Victory,
    /// The adventure is lost.
    Defeat,
}

/// A location in the adventure.
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique id within the adventure.
    pub id: String,
    /// Short title.
    pub title: String,
    /// Narrative text.
    pub description: String,
    monsters: Vec<String>,
    treasure: Vec<String>,
    traps: Vec<Trap>,
    choices: Vec<Choice>,
    ending: Option<Ending>,
    effects: Vec<OnEnterEffect>,
}

impl Node {
    /// An empty node.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            monsters: Vec::new(),
            treasure: Vec::new(),
            traps: Vec::new(),
            choices: Vec::new(),
            ending: None,
            effects: Vec::new(),
        }
    }

    /// Add a monster tag to the encounter.
    pub fn add_monster(&mut self, tag: impl Into<String>) -> &mut Self {
        self.monsters.push(tag.into());
        self
    }

    /// Add several monster tags to the encounter.
    pub fn add_monsters<I, S>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.monsters.extend(tags.into_iter().map(Into::into));
        self
    }

    /// Add a treasure entry.
    pub fn add_treasure(&mut self, entry: impl Into<String>) -> &mut Self {
        self.treasure.push(entry.into());
        self
    }

    /// Add a trap.
    pub fn add_trap(&mut self, trap: Trap) -> &mut Self {
        self.traps.push(trap);
        self
    }

    /// Add a choice.
    pub fn add_choice(&mut self, choice: Choice) -> &mut Self {
        self.choices.push(choice);
        self
    }

    /// Add an on-enter effect.
    pub fn add_effect(&mut self, effect: OnEnterEffect) -> &mut Self {
        self.effects.push(effect);
        self
    }

    /// Mark the node as an ending. Replaces any earlier ending.
    pub fn set_ending(&mut self, ending: Ending) -> &mut Self {
        self.ending = Some(ending);
        self
    }

    /// Monster tags still waiting here.
    pub fn monsters(&self) -> &[String] {
        &self.monsters
    }

    /// Uncollected treasure.
    pub fn treasure(&self) -> &[String] {
        &self.treasure
    }

    /// Traps.
    pub fn traps(&self) -> &[Trap] {
        &self.traps
    }

    /// Choices in display order.
    pub fn choices(&self) -> &[Choice] {
        &self.choices
    }

    /// On-enter effects in run order.
    pub fn effects(&self) -> &[OnEnterEffect] {
        &self.effects
    }

    /// The ending, if this is an ending node.
    pub fn ending(&self) -> Option<Ending> {
        self.ending
    }

    /// True for a victory node.
    pub fn is_victory(&self) -> bool {
        self.ending == Some(Ending::Victory)
    }

    /// True for a defeat node.
    pub fn is_defeat(&self) -> bool {
        self.ending == Some(Ending::Defeat)
    }

    /// True while monsters wait here.
    pub fn has_combat(&self) -> bool {
        !self.monsters.is_empty()
    }

    /// Whether the character may take choice `index`. The error is the
    /// reason shown to the player.
    pub fn check_requirements(&self, character: &Character, index: usize) -> Result<(), String> {
        let choice = self
            .choices
            .get(index)
            .ok_or_else(|| "Invalid choice".to_string())?;
        match choice.requirements.unmet(character) {
            Some(reason) => Err(reason),
            None => Ok(()),
        }
    }

    /// Run every on-enter effect in order, collecting their messages.
    pub fn execute_on_enter(&self, character: &mut Character) -> Vec<String> {
        self.effects
            .iter()
            .filter_map(|effect| effect.apply(character))
            .collect()
    }

    /// Spring every trap in order. All traps resolve even if the character
    /// drops to zero hit points partway through.
    pub fn trigger_traps(
        &self,
        character: &mut Character,
        dice: &mut dyn DiceSource,
    ) -> MechResult<Vec<String>> {
        let mut messages = Vec::new();
        for trap in &self.traps {
            messages.extend(trap.spring(character, dice)?);
        }
        Ok(messages)
    }

    /// Take all treasure. Potions and named items go into the inventory;
    /// gold goes into the purse only when `credit_gold` is set. The
    /// treasure list is empty afterwards.
    pub fn collect_treasure(&mut self, character: &mut Character, credit_gold: bool) -> Vec<String> {
        let mut messages = Vec::with_capacity(self.treasure.len());
        for entry in std::mem::take(&mut self.treasure) {
            debug!(node = %self.id, %entry, "treasure");
            match treasure::classify(&entry) {
                TreasureKind::Gold(amount) => {
                    if credit_gold {
                        character.gold = character.gold.saturating_add(amount);
                    }
                    messages.push(format!("You found {amount} gold pieces!"));
                }
                TreasureKind::Potion => {
                    character.add_item(Item::healing_potion());
                    messages.push(format!("You found a {entry}!"));
                }
                TreasureKind::Named(name) => {
                    messages.push(format!("You found: {name}"));
                    character.add_item(found_item(&name));
                }
            }
        }
        messages
    }

    /// Spawn this node's monsters. Tags resolve through the adventure's
    /// custom monsters first, then the bestiary, then a generic creature.
    pub fn spawn_monsters(
        &self,
        adventure: &Adventure,
        dice: &mut dyn DiceSource,
    ) -> MechResult<Vec<Monster>> {
        self.monsters
            .iter()
            .map(|tag| Monster::spawn(&adventure.monster_template(tag), &mut *dice))
            .collect()
    }

    /// Spawn the monsters and start a fight with the character.
    pub fn create_combat_encounter<'a>(
        &self,
        adventure: &Adventure,
        character: &'a mut Character,
        dice: &'a mut dyn DiceSource,
    ) -> MechResult<CombatSession<'a>> {
        let monsters = self.spawn_monsters(adventure, &mut *dice)?;
        Ok(CombatSession::new(character, monsters, dice))
    }

    /// Remove every monster, typically after they are defeated.
    pub fn clear_monsters(&mut self) {
        self.monsters.clear();
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node {}: {}", self.id, self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_mechanics::{Ability, CharacterClass, Combatant, CombatStatus, ScriptedDice};

    fn hero() -> Character {
        Character::new("Aria", CharacterClass::Fighter)
    }

    #[test]
    fn named_weapon_treasure_arms_the_character() {
        let mut node = Node::new("armory", "Armory", "");
        node.add_treasure("Longsword +1").add_treasure("Old boot");
        let mut c = hero();
        let messages = node.collect_treasure(&mut c, false);
        assert_eq!(messages, vec!["You found: Longsword +1", "You found: Old boot"]);
        assert!(c.has_item("longsword +1"));
        assert_eq!(c.weapon_damage(), Some(gb_mechanics::DiceFormula::new(1, 8, 1)));
    }

    #[test]
    fn check_requirements_reports_first_failure() {
        let mut node = Node::new("start", "Start", "");
        node.add_choice(Choice::new("Walk", "a")).add_choice(
            Choice::new("Climb", "b")
                .requiring(Requirements::none().with_ability(Ability::Dexterity, 14)),
        );
        let c = hero();
        assert_eq!(node.check_requirements(&c, 0), Ok(()));
        assert_eq!(
            node.check_requirements(&c, 1),
            Err("Requires DEXTERITY 14+".to_string())
        );
        assert_eq!(node.check_requirements(&c, 2), Err("Invalid choice".to_string()));
    }

    #[test]
    fn treasure_collected_once() {
        let mut node = Node::new("n", "N", "");
        node.add_treasure("Potion of Healing")
            .add_treasure("25 gold pieces")
            .add_treasure("Magic amulet");
        let mut c = hero();

        let first = node.collect_treasure(&mut c, false);
        assert_eq!(
            first,
            vec![
                "You found a Potion of Healing!",
                "You found 25 gold pieces!",
                "You found: Magic amulet",
            ]
        );
        assert!(node.treasure().is_empty());
        assert!(c.has_item("Potion of Healing"));
        assert!(c.has_item("Magic amulet"));
        assert_eq!(c.gold, 0);

        assert!(node.collect_treasure(&mut c, false).is_empty());
    }

    #[test]
    fn treasure_credits_gold_when_asked() {
        let mut node = Node::new("n", "N", "");
        node.add_treasure("Bag of 12 gold and 3 gems");
        let mut c = hero();
        node.collect_treasure(&mut c, true);
        assert_eq!(c.gold, 12);
    }

    #[test]
    fn all_traps_resolve_even_after_death() {
        let mut node = Node::new("n", "N", "");
        node.add_trap(Trap::new("spike pit", 20, "1d1+20"))
            .add_trap(Trap::new("falling rock", 20, "1d1"));
        let mut c = hero();
        let mut dice = ScriptedDice::new([1, 1, 1, 1]);
        let messages = node.trigger_traps(&mut c, &mut dice).unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(c.current_hp(), 10 - 21 - 1);
        assert!(!c.is_alive());
    }

    #[test]
    fn on_enter_effects_run_in_order() {
        let mut node = Node::new("n", "N", "");
        node.add_effect(OnEnterEffect::custom(|_| Some("first".to_string())))
            .add_effect(OnEnterEffect::custom(|_| None))
            .add_effect(OnEnterEffect::custom(|_| Some("second".to_string())));
        assert_eq!(node.execute_on_enter(&mut hero()), vec!["first", "second"]);
    }

    #[test]
    fn ending_is_exclusive() {
        let mut node = Node::new("end", "End", "");
        node.set_ending(Ending::Victory);
        assert!(node.is_victory());
        node.set_ending(Ending::Defeat);
        assert!(node.is_defeat());
        assert!(!node.is_victory());
    }

    #[test]
    fn encounter_spawns_one_monster_per_tag() {
        let adventure = Adventure::new("A", "", "n");
        let mut node = Node::new("n", "N", "");
        node.add_monsters(["goblin", "goblin", "beholder"]);
        assert!(node.has_combat());

        let mut c = hero();
        let mut dice = ScriptedDice::default();
        let session = node
            .create_combat_encounter(&adventure, &mut c, &mut dice)
            .unwrap();
        let names: Vec<&str> = session.monsters().iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Goblin", "Goblin", "Unknown Creature"]);
        assert_eq!(session.status(), CombatStatus::Ongoing);
        drop(session);

        node.clear_monsters();
        assert!(!node.has_combat());
    }
}
