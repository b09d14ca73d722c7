//! Bundled sample adventures.

use crate::adventure::Adventure;
use crate::effect::OnEnterEffect;
use crate::error::{StoryError, StoryResult};

const DARK_TOWER: &str = include_str!("../adventures/dark_tower.json");
const GOBLIN_CAVE: &str = include_str!("../adventures/goblin_cave.json");

/// "The Dark Tower": fourteen locations, several routes to the summit.
pub fn dark_tower() -> StoryResult<Adventure> {
    let mut adventure = Adventure::from_json(DARK_TOWER)?;
    adventure
        .get_node_mut("search_upper")
        .ok_or_else(|| StoryError::NodeNotFound("search_upper".to_string()))?
        .add_effect(OnEnterEffect::custom(|_| {
            Some("You dispel the protective ward! The demon's power is weakened.".to_string())
        }));
    Ok(adventure)
}

/// "The Goblin Cave": a short adventure for a first game.
pub fn goblin_cave() -> StoryResult<Adventure> {
    Adventure::from_json(GOBLIN_CAVE)
}
