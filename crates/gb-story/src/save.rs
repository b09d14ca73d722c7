//! Save-state snapshots of a game in progress.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Utc};
use gb_mechanics::{Abilities, Character, CharacterClass, Combatant, Item, get_spell};
use serde::{Deserialize, Serialize};

use crate::error::StoryResult;

/// Everything needed to resume a game: the character and where they are.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    /// Character name.
    pub character_name: String,
    /// Character class.
    pub character_class: CharacterClass,
    /// Character level.
    pub level: u32,
    /// Experience points.
    #[serde(default)]
    pub experience: u32,
    /// Hit points at save time.
    pub current_hp: i32,
    /// Maximum hit points at save time. Informational; recomputed on load.
    pub max_hp: i32,
    /// Gold carried.
    #[serde(default)]
    pub gold: u32,
    /// Inventory in order.
    #[serde(default)]
    pub inventory: Vec<Item>,
    /// Ids of known spells.
    #[serde(default)]
    pub known_spells: Vec<String>,
    /// Ability scores.
    pub abilities: Abilities,
    /// Node the character is at.
    pub current_node: String,
    /// Every node visited so far.
    pub visited_nodes: BTreeSet<String>,
    /// When the snapshot was taken.
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

impl SaveState {
    /// Snapshot a character at a node.
    pub fn capture(
        character: &Character,
        current_node: impl Into<String>,
        visited_nodes: BTreeSet<String>,
    ) -> Self {
        Self {
            character_name: character.name.clone(),
            character_class: character.class(),
            level: character.level(),
            experience: character.experience(),
            current_hp: character.current_hp(),
            max_hp: character.max_hp(),
            gold: character.gold,
            inventory: character.inventory.clone(),
            known_spells: character.known_spells().iter().map(|s| s.id.clone()).collect(),
            abilities: *character.abilities(),
            current_node: current_node.into(),
            visited_nodes,
            saved_at: Utc::now(),
        }
    }

    /// Rebuild the character. Derived stats are recomputed from class,
    /// level, and abilities; spell ids missing from the library are dropped.
    pub fn character(&self) -> Character {
        let mut character = Character::restore(
            self.character_name.clone(),
            self.character_class,
            self.level,
            self.experience,
            self.abilities,
            self.current_hp,
        );
        character.gold = self.gold;
        character.inventory = self.inventory.clone();
        for spell in self.known_spells.iter().filter_map(|id| get_spell(id)) {
            character.learn_spell(spell);
        }
        character
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> StoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse from JSON text.
    pub fn from_json(json: &str) -> StoryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write to a file.
    pub fn write(&self, path: impl AsRef<Path>) -> StoryResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read from a file.
    pub fn read(path: impl AsRef<Path>) -> StoryResult<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }
}
