//! Requirements that gate a choice.
//!
//! In adventure files a requirement set is a flat object:
//! `{"item": "Iron Key", "dexterity": 14, "level": 2}`. Unknown keys and
//! values of the wrong type are logged and ignored.

use std::collections::BTreeMap;

use gb_mechanics::{Ability, Character};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// What a character needs to take a choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, Value>")]
pub struct Requirements {
    /// An item the character must carry (matched case-insensitively).
    pub item: Option<String>,
    /// Minimum ability scores.
    pub abilities: BTreeMap<Ability, i32>,
    /// Minimum character level.
    pub level: Option<u32>,
}

impl Requirements {
    /// No requirements.
    pub fn none() -> Self {
        Self::default()
    }

    /// Require an item.
    pub fn with_item(mut self, item: impl Into<String>) -> Self {
        self.item = Some(item.into());
        self
    }

    /// Require a minimum ability score.
    pub fn with_ability(mut self, ability: Ability, minimum: i32) -> Self {
        self.abilities.insert(ability, minimum);
        self
    }

    /// Require a minimum level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// True if nothing is required.
    pub fn is_empty(&self) -> bool {
        self.item.is_none() && self.abilities.is_empty() && self.level.is_none()
    }

    /// The reason the character is turned away, or `None` if every
    /// requirement is met.
    ///
    /// Checked in order: item, abilities (strength through charisma), level.
    pub fn unmet(&self, character: &Character) -> Option<String> {
        if let Some(item) = self.item.as_deref().filter(|i| !character.has_item(i)) {
            return Some(format!("Requires {item}"));
        }

        // BTreeMap order over Ability is the canonical order
        for (&ability, &minimum) in &self.abilities {
            if character.abilities().get(ability) < minimum {
                return Some(format!(
                    "Requires {} {minimum}+",
                    ability.name().to_uppercase()
                ));
            }
        }

        match self.level {
            Some(level) if character.level() < level => Some(format!("Requires level {level}+")),
            _ => None,
        }
    }
}

impl From<BTreeMap<String, Value>> for Requirements {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        let mut req = Self::default();
        for (key, value) in raw {
            match key.as_str() {
                "item" => match value.as_str() {
                    Some(item) => req.item = Some(item.to_string()),
                    None => warn!(%value, "item requirement is not a string, ignoring"),
                },
                "level" => match value.as_u64().and_then(|l| u32::try_from(l).ok()) {
                    Some(level) => req.level = Some(level),
                    None => warn!(%value, "level requirement is not a number, ignoring"),
                },
                other => match other.parse::<Ability>() {
                    Ok(ability) => match value.as_i64().and_then(|v| i32::try_from(v).ok()) {
                        Some(minimum) => {
                            req.abilities.insert(ability, minimum);
                        }
                        None => warn!(key = other, %value, "ability requirement is not a number, ignoring"),
                    },
                    Err(_) => warn!(key = other, "unknown requirement key, ignoring"),
                },
            }
        }
        req
    }
}

impl From<Requirements> for BTreeMap<String, Value> {
    fn from(req: Requirements) -> Self {
        let mut raw = BTreeMap::new();
        if let Some(item) = req.item {
            raw.insert("item".to_string(), Value::from(item));
        }
        for (ability, minimum) in req.abilities {
            raw.insert(ability.name().to_string(), Value::from(minimum));
        }
        if let Some(level) = req.level {
            raw.insert("level".to_string(), Value::from(level));
        }
        raw
    }
}
