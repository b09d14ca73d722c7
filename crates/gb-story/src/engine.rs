//! The game engine: node traversal and the combat lifecycle.
//!
//! A [`GameEngine`] owns the adventure, the character, and the dice. The
//! caller drives it: [`start_game`](GameEngine::start_game), then
//! [`handle_choice`](GameEngine::handle_choice) for each decision. When a
//! node reports combat, [`start_combat`](GameEngine::start_combat) returns
//! a session to run round by round; its final [`RoundResult`] goes back
//! through [`handle_combat_result`](GameEngine::handle_combat_result).

use std::collections::BTreeSet;

use gb_mechanics::{
    Character, CombatSession, CombatStatus, Combatant, DiceSource, Item, RoundResult, SeededDice,
    found_item,
    treasure::{self, TreasureKind},
};
use tracing::{debug, info};

use crate::adventure::Adventure;
use crate::config::EngineConfig;
use crate::error::{StoryError, StoryResult};
use crate::node::{Ending, Node};
use crate::save::SaveState;

/// What entering a node produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeReport {
    /// Id of the node entered.
    pub node_id: String,
    /// Messages from on-enter effects.
    pub event_messages: Vec<String>,
    /// Messages from traps.
    pub trap_messages: Vec<String>,
    /// Messages from treasure.
    pub treasure_messages: Vec<String>,
    /// True if monsters wait here.
    pub has_combat: bool,
}

/// Result of [`GameEngine::process_node`] or [`GameEngine::handle_choice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOutcome {
    /// The character is at a node and play continues.
    Active(NodeReport),
    /// A victory node was reached. The message is its description.
    Victory {
        /// Narrative text.
        message: String,
    },
    /// A defeat node was reached, or traps killed the character.
    Defeat {
        /// Narrative text.
        message: String,
        /// Trap messages, when traps were the cause.
        trap_messages: Vec<String>,
    },
    /// The choice index was out of range. Nothing changed.
    InvalidChoice {
        /// Why.
        message: String,
    },
    /// The character does not meet the choice's requirements. Nothing changed.
    Blocked {
        /// Why.
        message: String,
    },
}

impl NodeOutcome {
    /// True for victory and defeat.
    pub fn is_game_over(&self) -> bool {
        matches!(self, Self::Victory { .. } | Self::Defeat { .. })
    }
}

/// Result of [`GameEngine::handle_combat_result`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatResolution {
    /// The monsters are beaten; rewards were granted and the node cleared.
    Complete {
        /// Reward messages.
        messages: Vec<String>,
        /// Levels gained from the experience.
        levels_gained: u32,
    },
    /// The character fell. The game is over.
    GameOver {
        /// Narrative text.
        message: String,
    },
    /// The character escaped. The node keeps its monsters.
    Fled {
        /// Narrative text.
        message: String,
    },
    /// The fight goes on.
    Ongoing,
}

/// Drives one playthrough of an adventure.
pub struct GameEngine {
    adventure: Adventure,
    character: Character,
    config: EngineConfig,
    dice: Box<dyn DiceSource>,
    current_node: String,
    visited: BTreeSet<String>,
    game_over: bool,
    victory: bool,
}

impl GameEngine {
    /// An engine with the default configuration.
    pub fn new(adventure: Adventure, character: Character) -> Self {
        Self::with_config(adventure, character, EngineConfig::default())
    }

    /// An engine whose dice are seeded from `config.seed`.
    pub fn with_config(adventure: Adventure, character: Character, config: EngineConfig) -> Self {
        let dice = Box::new(SeededDice::new(config.seed));
        let current_node = adventure.starting_node_id.clone();
        Self {
            adventure,
            character,
            config,
            dice,
            current_node,
            visited: BTreeSet::new(),
            game_over: false,
            victory: false,
        }
    }

    /// Replace the dice (builder style).
    pub fn with_dice(mut self, dice: impl DiceSource + 'static) -> Self {
        self.dice = Box::new(dice);
        self
    }

    /// The adventure being played.
    pub fn adventure(&self) -> &Adventure {
        &self.adventure
    }

    /// The character.
    pub fn character(&self) -> &Character {
        &self.character
    }

    /// The configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Use a carried item outside combat, rolling with the engine's dice.
    /// Returns `None` if no such item is carried.
    pub fn use_item(&mut self, name: &str) -> Option<String> {
        let message = self.character.use_item(name, self.dice.as_mut())?;
        debug!(item = name, "used item");
        Some(message)
    }

    /// Id of the node the character is at.
    pub fn current_node_id(&self) -> &str {
        &self.current_node
    }

    /// The node the character is at.
    pub fn current_node(&self) -> StoryResult<&Node> {
        self.adventure
            .get_node(&self.current_node)
            .ok_or_else(|| StoryError::NodeNotFound(self.current_node.clone()))
    }

    /// Ids of every node entered so far.
    pub fn visited(&self) -> &BTreeSet<String> {
        &self.visited
    }

    /// True once a victory or defeat has been reached.
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// True once a victory node has been reached.
    pub fn is_victory(&self) -> bool {
        self.victory
    }

    /// Move to the starting node and enter it.
    pub fn start_game(&mut self) -> StoryResult<NodeOutcome> {
        info!(
            adventure = %self.adventure.title,
            character = %self.character.name,
            "starting game"
        );
        self.current_node = self.adventure.starting_node_id.clone();
        self.visited.clear();
        self.game_over = false;
        self.victory = false;
        self.process_node()
    }

    /// Enter the current node.
    ///
    /// Ending nodes end the game at once with no effects. Otherwise on-enter
    /// effects run, then traps; if the traps kill the character the game
    /// ends in defeat. Survivors collect the treasure.
    pub fn process_node(&mut self) -> StoryResult<NodeOutcome> {
        let credit_gold = self.config.credit_gold;
        let node = self
            .adventure
            .get_node_mut(&self.current_node)
            .ok_or_else(|| StoryError::NodeNotFound(self.current_node.clone()))?;

        self.visited.insert(node.id.clone());
        info!(node = %node.id, title = %node.title, "entering node");

        match node.ending() {
            Some(Ending::Victory) => {
                self.game_over = true;
                self.victory = true;
                info!(node = %node.id, "victory");
                return Ok(NodeOutcome::Victory {
                    message: node.description.clone(),
                });
            }
            Some(Ending::Defeat) => {
                self.game_over = true;
                info!(node = %node.id, "defeat");
                return Ok(NodeOutcome::Defeat {
                    message: node.description.clone(),
                    trap_messages: Vec::new(),
                });
            }
            None => {}
        }

        let event_messages = node.execute_on_enter(&mut self.character);
        let trap_messages = node.trigger_traps(&mut self.character, self.dice.as_mut())?;

        if !self.character.is_alive() {
            self.game_over = true;
            info!(node = %node.id, "killed by traps");
            return Ok(NodeOutcome::Defeat {
                message: "You have died!".to_string(),
                trap_messages,
            });
        }

        let treasure_messages = node.collect_treasure(&mut self.character, credit_gold);

        Ok(NodeOutcome::Active(NodeReport {
            node_id: node.id.clone(),
            event_messages,
            trap_messages,
            treasure_messages,
            has_combat: node.has_combat(),
        }))
    }

    /// Take choice `index` (0-based) at the current node.
    ///
    /// Out-of-range and blocked choices are outcomes and leave the
    /// character where they are. A choice whose target does not exist is an
    /// error, also leaving the character in place.
    pub fn handle_choice(&mut self, index: usize) -> StoryResult<NodeOutcome> {
        if self.game_over {
            return Ok(NodeOutcome::InvalidChoice {
                message: "The game is over!".to_string(),
            });
        }

        let node = self.current_node()?;
        let Some(choice) = node.choices().get(index) else {
            return Ok(NodeOutcome::InvalidChoice {
                message: "Invalid choice!".to_string(),
            });
        };
        if let Err(reason) = node.check_requirements(&self.character, index) {
            return Ok(NodeOutcome::Blocked {
                message: format!("Cannot choose this option: {reason}"),
            });
        }

        let target = choice.target.clone();
        if self.adventure.get_node(&target).is_none() {
            return Err(StoryError::NodeNotFound(target));
        }

        self.current_node = target;
        self.process_node()
    }

    /// Spawn the current node's monsters and start a fight.
    ///
    /// The session borrows the character and the dice; drop it before
    /// calling [`handle_combat_result`](Self::handle_combat_result).
    pub fn start_combat(&mut self) -> StoryResult<CombatSession<'_>> {
        let node = self
            .adventure
            .get_node(&self.current_node)
            .ok_or_else(|| StoryError::NodeNotFound(self.current_node.clone()))?;
        info!(node = %node.id, monsters = node.monsters().len(), "combat begins");
        Ok(node.create_combat_encounter(
            &self.adventure,
            &mut self.character,
            self.dice.as_mut(),
        )?)
    }

    /// Apply the final result of a fight.
    ///
    /// Victory grants experience (possibly several levels), reports gold and
    /// items, adds the items to the inventory, and clears the node's
    /// monsters. Defeat ends the game.
    pub fn handle_combat_result(&mut self, result: &RoundResult) -> StoryResult<CombatResolution> {
        match result.status {
            CombatStatus::Victory => {
                let credit_gold = self.config.credit_gold;
                let rewards = result.rewards.clone().unwrap_or_default();
                let mut messages = Vec::new();
                let mut levels_gained = 0;

                if rewards.experience > 0 {
                    levels_gained = self.character.gain_experience(rewards.experience);
                    messages.push(format!("Gained {} XP!", rewards.experience));
                    if levels_gained > 0 {
                        messages.push(format!(
                            "{} reached level {}!",
                            self.character.name,
                            self.character.level()
                        ));
                    }
                }

                if rewards.gold > 0 {
                    if credit_gold {
                        self.character.gold = self.character.gold.saturating_add(rewards.gold);
                    }
                    messages.push(format!("Found {} gold pieces!", rewards.gold));
                }

                for entry in rewards.items {
                    messages.push(format!("Found: {entry}"));
                    let item = match treasure::classify(&entry) {
                        TreasureKind::Potion => Item::healing_potion(),
                        _ => found_item(&entry),
                    };
                    self.character.add_item(item);
                }

                self.adventure
                    .get_node_mut(&self.current_node)
                    .ok_or_else(|| StoryError::NodeNotFound(self.current_node.clone()))?
                    .clear_monsters();

                Ok(CombatResolution::Complete {
                    messages,
                    levels_gained,
                })
            }
            CombatStatus::Defeat => {
                self.game_over = true;
                info!(character = %self.character.name, "game over");
                Ok(CombatResolution::GameOver {
                    message: "You have been defeated in combat!".to_string(),
                })
            }
            CombatStatus::Fled => Ok(CombatResolution::Fled {
                message: result.message.clone(),
            }),
            CombatStatus::Ongoing => Ok(CombatResolution::Ongoing),
        }
    }

    /// Snapshot the game for saving.
    pub fn snapshot(&self) -> SaveState {
        SaveState::capture(&self.character, self.current_node.clone(), self.visited.clone())
    }

    /// Resume from a snapshot. Fails if the saved node is not in this
    /// adventure, leaving the engine unchanged.
    pub fn restore(&mut self, state: &SaveState) -> StoryResult<()> {
        if self.adventure.get_node(&state.current_node).is_none() {
            return Err(StoryError::NodeNotFound(state.current_node.clone()));
        }
        self.character = state.character();
        self.current_node = state.current_node.clone();
        self.visited = state.visited_nodes.clone();
        self.game_over = false;
        self.victory = false;
        info!(node = %self.current_node, "game restored");
        Ok(())
    }
}
