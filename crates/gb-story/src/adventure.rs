//! An adventure: the graph of nodes and its custom monsters.

use std::collections::BTreeMap;

use gb_mechanics::MonsterTemplate;
use tracing::warn;

use crate::node::Node;

/// A complete gamebook adventure.
#[derive(Debug, Clone)]
pub struct Adventure {
    /// Adventure title.
    pub title: String,
    /// Introductory text.
    pub description: String,
    /// Id of the node play begins at.
    pub starting_node_id: String,
    nodes: BTreeMap<String, Node>,
    custom_monsters: BTreeMap<String, MonsterTemplate>,
}

impl Adventure {
    /// An adventure with no nodes yet.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        starting_node_id: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            starting_node_id: starting_node_id.into(),
            nodes: BTreeMap::new(),
            custom_monsters: BTreeMap::new(),
        }
    }

    /// Insert a node, returning any node it replaced.
    pub fn add_node(&mut self, node: Node) -> Option<Node> {
        self.nodes.insert(node.id.clone(), node)
    }

    /// Look up a node by id.
    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Look up a node by id for collecting treasure or clearing monsters.
    pub fn get_node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    /// The node play begins at, if it exists.
    pub fn starting_node(&self) -> Option<&Node> {
        self.nodes.get(&self.starting_node_id)
    }

    /// All nodes, ordered by id.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Define a monster for this adventure. It shadows any bestiary entry
    /// with the same tag.
    pub fn add_custom_monster(&mut self, tag: impl Into<String>, template: MonsterTemplate) {
        self.custom_monsters.insert(tag.into(), template);
    }

    /// Monsters defined by this adventure, by tag.
    pub fn custom_monsters(&self) -> &BTreeMap<String, MonsterTemplate> {
        &self.custom_monsters
    }

    /// True if `tag` names a custom or bestiary monster.
    pub fn knows_monster(&self, tag: &str) -> bool {
        self.custom_monsters.contains_key(tag) || MonsterTemplate::bestiary(tag).is_some()
    }

    /// The stat block for a monster tag: custom definitions first, then the
    /// bestiary, then a generic creature.
    pub fn monster_template(&self, tag: &str) -> MonsterTemplate {
        if let Some(custom) = self.custom_monsters.get(tag) {
            let mut template = custom.clone();
            if template.name.is_empty() {
                template.name = tag.to_string();
            }
            return template;
        }
        MonsterTemplate::bestiary(tag).unwrap_or_else(|| {
            warn!(tag, "unknown monster tag, spawning a generic creature");
            MonsterTemplate::generic()
        })
    }
}

impl std::fmt::Display for Adventure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {} locations", self.title, self.nodes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adventure() -> Adventure {
        let mut adv = Adventure::new("Test", "A test.", "start");
        adv.add_node(Node::new("start", "Start", "You begin."));
        adv.add_node(Node::new("end", "End", "You finish."));
        adv
    }

    #[test]
    fn node_lookup() {
        let adv = adventure();
        assert_eq!(adv.starting_node().unwrap().title, "Start");
        assert!(adv.get_node("end").is_some());
        assert!(adv.get_node("nowhere").is_none());
        assert_eq!(adv.node_count(), 2);
        assert_eq!(adv.to_string(), "Test: 2 locations");
    }

    #[test]
    fn add_node_replaces_same_id() {
        let mut adv = adventure();
        let old = adv.add_node(Node::new("end", "New End", ""));
        assert_eq!(old.unwrap().title, "End");
        assert_eq!(adv.get_node("end").unwrap().title, "New End");
    }

    #[test]
    fn missing_starting_node() {
        let adv = Adventure::new("Empty", "", "start");
        assert!(adv.starting_node().is_none());
    }

    #[test]
    fn custom_monster_shadows_bestiary() {
        let mut adv = adventure();
        let mut template = MonsterTemplate::generic();
        template.name = String::new();
        template.armor_class = 18;
        adv.add_custom_monster("goblin", template);

        let resolved = adv.monster_template("goblin");
        assert_eq!(resolved.name, "goblin");
        assert_eq!(resolved.armor_class, 18);
    }

    #[test]
    fn bestiary_then_generic() {
        let adv = adventure();
        assert_eq!(adv.monster_template("orc").name, "Orc");
        assert_eq!(adv.monster_template("beholder").name, "Unknown Creature");
        assert!(adv.knows_monster("orc"));
        assert!(!adv.knows_monster("beholder"));
    }
}
