//! The adventure file format.
//!
//! Adventures are JSON objects with `title`, `description`,
//! `starting_node_id`, a `nodes` array, and optional `custom_monsters`.
//! Empty and default fields are omitted on export. Custom on-enter hooks
//! are code and never appear in files.

use std::collections::BTreeMap;
use std::path::Path;

use gb_mechanics::MonsterTemplate;
use serde::{Deserialize, Serialize};

use crate::adventure::Adventure;
use crate::effect::OnEnterEffect;
use crate::error::{StoryError, StoryResult};
use crate::node::{Choice, Ending, Node};
use crate::trap::Trap;

/// An adventure file as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdventureFile {
    /// Adventure title.
    pub title: String,
    /// Introductory text.
    pub description: String,
    /// Id of the first node.
    pub starting_node_id: String,
    /// Every node.
    pub nodes: Vec<NodeFile>,
    /// Adventure-specific monsters, by tag.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_monsters: BTreeMap<String, MonsterTemplate>,
}

/// One node as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeFile {
    /// Unique node id.
    pub node_id: String,
    /// Short title.
    pub title: String,
    /// Narrative text.
    pub description: String,
    /// Monster tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monsters: Vec<String>,
    /// Treasure entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub treasure: Vec<String>,
    /// Traps.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traps: Vec<Trap>,
    /// Choices.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<Choice>,
    /// Victory ending.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_victory: bool,
    /// Defeat ending.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_defeat: bool,
    /// Gold paid on entry.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub gold_cost: u32,
    /// Items handed over on entry, by name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub item_cost: BTreeMap<String, u32>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

impl TryFrom<NodeFile> for Node {
    type Error = StoryError;

    fn try_from(file: NodeFile) -> StoryResult<Self> {
        let ending = match (file.is_victory, file.is_defeat) {
            (true, true) => {
                return Err(StoryError::InvalidNode {
                    id: file.node_id,
                    reason: "a node cannot be both a victory and a defeat".to_string(),
                });
            }
            (true, false) => Some(Ending::Victory),
            (false, true) => Some(Ending::Defeat),
            (false, false) => None,
        };

        let mut node = Node::new(file.node_id, file.title, file.description);
        node.add_monsters(file.monsters);
        for entry in file.treasure {
            node.add_treasure(entry);
        }
        for trap in file.traps {
            node.add_trap(trap);
        }
        for choice in file.choices {
            node.add_choice(choice);
        }
        if let Some(ending) = ending {
            node.set_ending(ending);
        }
        if file.gold_cost > 0 {
            node.add_effect(OnEnterEffect::GoldCost(file.gold_cost));
        }
        for (item, quantity) in file.item_cost {
            node.add_effect(OnEnterEffect::ItemCost { item, quantity });
        }
        Ok(node)
    }
}

impl From<&Node> for NodeFile {
    fn from(node: &Node) -> Self {
        let mut gold_cost = 0;
        let mut item_cost = BTreeMap::new();
        for effect in node.effects() {
            match effect {
                OnEnterEffect::GoldCost(cost) => gold_cost += cost,
                OnEnterEffect::ItemCost { item, quantity } => {
                    *item_cost.entry(item.clone()).or_insert(0) += quantity;
                }
                OnEnterEffect::Custom(_) => {}
            }
        }

        Self {
            node_id: node.id.clone(),
            title: node.title.clone(),
            description: node.description.clone(),
            monsters: node.monsters().to_vec(),
            treasure: node.treasure().to_vec(),
            traps: node.traps().to_vec(),
            choices: node.choices().to_vec(),
            is_victory: node.is_victory(),
            is_defeat: node.is_defeat(),
            gold_cost,
            item_cost,
        }
    }
}

impl TryFrom<AdventureFile> for Adventure {
    type Error = StoryError;

    fn try_from(file: AdventureFile) -> StoryResult<Self> {
        let mut adventure = Adventure::new(file.title, file.description, file.starting_node_id);
        for (tag, template) in file.custom_monsters {
            adventure.add_custom_monster(tag, template);
        }
        for node_file in file.nodes {
            let node = Node::try_from(node_file)?;
            if adventure.get_node(&node.id).is_some() {
                return Err(StoryError::DuplicateNode(node.id));
            }
            adventure.add_node(node);
        }
        Ok(adventure)
    }
}

impl From<&Adventure> for AdventureFile {
    fn from(adventure: &Adventure) -> Self {
        Self {
            title: adventure.title.clone(),
            description: adventure.description.clone(),
            starting_node_id: adventure.starting_node_id.clone(),
            nodes: adventure.nodes().map(NodeFile::from).collect(),
            custom_monsters: adventure.custom_monsters().clone(),
        }
    }
}

impl Adventure {
    /// Parse an adventure from JSON text.
    pub fn from_json(json: &str) -> StoryResult<Self> {
        let file: AdventureFile = serde_json::from_str(json)?;
        Self::try_from(file)
    }

    /// Export as pretty-printed JSON.
    pub fn to_json(&self) -> StoryResult<String> {
        Ok(serde_json::to_string_pretty(&AdventureFile::from(self))?)
    }

    /// Read and parse an adventure file.
    pub fn load(path: impl AsRef<Path>) -> StoryResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Export to a file.
    pub fn save(&self, path: impl AsRef<Path>) -> StoryResult<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
