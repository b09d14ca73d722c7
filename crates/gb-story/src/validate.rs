//! Structural checks on an adventure.
//!
//! Errors mean the adventure cannot be played as written (a missing
//! starting node, a choice pointing nowhere, a formula that does not
//! parse). Warnings flag content that is probably a mistake.

use std::collections::{BTreeSet, VecDeque};

use gb_mechanics::{DiceFormula, SaveType};

use crate::adventure::Adventure;
use crate::node::Node;

/// A warning or error found during adventure validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// Where the issue was found ("node 'cellar'", "adventure").
    pub location: String,
    /// A human-readable description of the issue.
    pub message: String,
    /// Whether this is an error (true) or a warning (false).
    pub is_error: bool,
}

impl ValidationIssue {
    fn error(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
            is_error: false,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{level}: {}: {}", self.location, self.message)
    }
}

/// True if any issue is an error.
pub fn has_errors(issues: &[ValidationIssue]) -> bool {
    issues.iter().any(|i| i.is_error)
}

/// Validate an adventure. Returns every issue found, errors and warnings
/// interleaved in discovery order.
pub fn validate_adventure(adventure: &Adventure) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if adventure.starting_node().is_none() {
        issues.push(ValidationIssue::error(
            "adventure",
            format!(
                "starting_node_id '{}' not found in nodes",
                adventure.starting_node_id
            ),
        ));
    }

    for (tag, template) in adventure.custom_monsters() {
        if let Err(e) = template.check_formulas() {
            issues.push(ValidationIssue::error(format!("monster '{tag}'"), e.to_string()));
        }
    }

    for node in adventure.nodes() {
        validate_node(adventure, node, &mut issues);
    }

    if !adventure.nodes().any(Node::is_victory) {
        issues.push(ValidationIssue::warning(
            "adventure",
            "no victory node found (set is_victory: true)",
        ));
    }
    if !adventure.nodes().any(Node::is_defeat) {
        issues.push(ValidationIssue::warning(
            "adventure",
            "no defeat node found (set is_defeat: true)",
        ));
    }

    if adventure.starting_node().is_some() {
        let reachable = reachable_from(adventure, &adventure.starting_node_id);
        for node in adventure.nodes().filter(|n| !reachable.contains(n.id.as_str())) {
            issues.push(ValidationIssue::warning(
                format!("node '{}'", node.id),
                "unreachable from starting node",
            ));
        }
    }

    issues
}

fn validate_node(adventure: &Adventure, node: &Node, issues: &mut Vec<ValidationIssue>) {
    let location = format!("node '{}'", node.id);

    if node.choices().is_empty() && node.ending().is_none() {
        issues.push(ValidationIssue::warning(
            &location,
            "no choices (should be an ending node)",
        ));
    }

    for (i, choice) in node.choices().iter().enumerate() {
        if adventure.get_node(&choice.target).is_none() {
            issues.push(ValidationIssue::error(
                &location,
                format!("choice {}: target '{}' not found", i + 1, choice.target),
            ));
        }
    }

    for tag in node.monsters() {
        if !adventure.knows_monster(tag) {
            issues.push(ValidationIssue::warning(
                &location,
                format!("unknown monster type '{tag}' (not predefined or custom)"),
            ));
        }
    }

    for (i, trap) in node.traps().iter().enumerate() {
        if let Err(e) = trap.damage.parse::<DiceFormula>() {
            issues.push(ValidationIssue::error(
                &location,
                format!("trap {}: {e}", i + 1),
            ));
        }
        if trap.save_type.parse::<SaveType>().is_err() {
            issues.push(ValidationIssue::warning(
                &location,
                format!("trap {}: unknown save_type '{}'", i + 1, trap.save_type),
            ));
        }
    }
}

/// Ids of every node reachable from `start` by following choices.
fn reachable_from<'a>(adventure: &'a Adventure, start: &'a str) -> BTreeSet<&'a str> {
    let mut seen = BTreeSet::from([start]);
    let mut queue = VecDeque::from([start]);
    while let Some(id) = queue.pop_front() {
        let Some(node) = adventure.get_node(id) else {
            continue;
        };
        for choice in node.choices() {
            if seen.insert(choice.target.as_str()) {
                queue.push_back(choice.target.as_str());
            }
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Choice, Ending};
    use crate::trap::Trap;
    use gb_mechanics::MonsterTemplate;

    fn node(id: &str) -> Node {
        Node::new(id, id, "")
    }

    fn valid() -> Adventure {
        let mut adv = Adventure::new("T", "", "start");
        let mut start = node("start");
        start
            .add_choice(Choice::new("Win", "win"))
            .add_choice(Choice::new("Lose", "lose"));
        let mut win = node("win");
        win.set_ending(Ending::Victory);
        let mut lose = node("lose");
        lose.set_ending(Ending::Defeat);
        adv.add_node(start);
        adv.add_node(win);
        adv.add_node(lose);
        adv
    }

    fn messages(issues: &[ValidationIssue]) -> Vec<String> {
        issues.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn valid_adventure_has_no_issues() {
        assert!(validate_adventure(&valid()).is_empty());
    }

    #[test]
    fn missing_starting_node_is_error() {
        let mut adv = valid();
        adv.starting_node_id = "nowhere".to_string();
        let issues = validate_adventure(&adv);
        assert!(has_errors(&issues));
        assert!(messages(&issues).contains(
            &"error: adventure: starting_node_id 'nowhere' not found in nodes".to_string()
        ));
    }

    #[test]
    fn dangling_target_is_error() {
        let mut adv = valid();
        adv.get_node_mut("start")
            .unwrap()
            .add_choice(Choice::new("Fall", "pit"));
        let issues = validate_adventure(&adv);
        assert_eq!(
            messages(&issues),
            vec!["error: node 'start': choice 3: target 'pit' not found"]
        );
    }

    #[test]
    fn dead_end_and_unreachable_are_warnings() {
        let mut adv = valid();
        adv.add_node(node("island"));
        let issues = validate_adventure(&adv);
        assert!(!has_errors(&issues));
        assert_eq!(
            messages(&issues),
            vec![
                "warning: node 'island': no choices (should be an ending node)",
                "warning: node 'island': unreachable from starting node",
            ]
        );
    }

    #[test]
    fn monsters_and_traps_checked() {
        let mut adv = valid();
        adv.add_custom_monster("cave_bear", MonsterTemplate::generic());
        let mut broken = MonsterTemplate::generic();
        broken.damage = "lots".to_string();
        adv.add_custom_monster("wraith", broken);
        adv.get_node_mut("start")
            .unwrap()
            .add_monsters(["goblin", "cave_bear", "beholder"])
            .add_trap(Trap::new("pit", 12, "2d6").with_save("luck"))
            .add_trap(Trap::new("blade", 12, "d"));

        let issues = validate_adventure(&adv);
        let text = messages(&issues);
        assert!(text.iter().any(|m| m.starts_with("error: monster 'wraith'")));
        assert!(text.contains(
            &"warning: node 'start': unknown monster type 'beholder' (not predefined or custom)"
                .to_string()
        ));
        assert!(text.contains(&"warning: node 'start': trap 1: unknown save_type 'luck'".to_string()));
        assert!(text.iter().any(|m| m.starts_with("error: node 'start': trap 2:")));
        assert!(!text.iter().any(|m| m.contains("cave_bear")));
    }

    #[test]
    fn missing_endings_are_warnings() {
        let mut adv = Adventure::new("T", "", "start");
        let mut start = node("start");
        start.add_choice(Choice::new("Loop", "start"));
        adv.add_node(start);
        assert_eq!(
            messages(&validate_adventure(&adv)),
            vec![
                "warning: adventure: no victory node found (set is_victory: true)",
                "warning: adventure: no defeat node found (set is_defeat: true)",
            ]
        );
    }
}
