//! Turn-based combat between one character and a group of monsters.
//!
//! A [`CombatSession`] is driven one round at a time with
//! [`CombatSession::execute_round`]. Each round rolls fresh initiative and
//! walks the resulting order; monsters are tracked by their index in the
//! encounter, so two monsters sharing a name each take their own turn.

pub mod action;

pub use action::{CombatAction, DEFAULT_WEAPON};

use tracing::{debug, info};

use crate::dice::DiceSource;
use crate::monster::Monster;
use crate::sheet::{Ability, Character, Combatant};
use crate::spell::get_spell;
use crate::treasure::{self, TreasureKind};

/// Flee succeeds when `1d20 + DEX` meets this.
pub const FLEE_DC: i32 = 10;

/// Where a combat session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatStatus {
    /// Both sides still standing.
    Ongoing,
    /// Every monster is down.
    Victory,
    /// The character is down.
    Defeat,
    /// The character escaped.
    Fled,
}

impl CombatStatus {
    /// True for every state except [`Ongoing`](Self::Ongoing).
    pub fn is_terminal(self) -> bool {
        self != Self::Ongoing
    }
}

/// Spoils of a won fight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombatRewards {
    /// Gold carried by the defeated monsters.
    pub gold: u32,
    /// Other treasure, by name.
    pub items: Vec<String>,
    /// Experience: 100 per hit die of every monster in the encounter.
    pub experience: u32,
}

/// A living monster as seen after a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonsterStatus {
    /// Index to pass as an action target.
    pub target: usize,
    /// Display name.
    pub name: String,
    /// Current hit points.
    pub current_hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Armor class.
    pub armor_class: i32,
}

/// Outcome of one call to [`CombatSession::execute_round`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundResult {
    /// Where the session stands after this call.
    pub status: CombatStatus,
    /// One-line summary.
    pub message: String,
    /// Round number (0 if no round was fought yet).
    pub round: u32,
    /// Log entries produced by this call.
    pub entries: Vec<String>,
    /// Set on victory.
    pub rewards: Option<CombatRewards>,
    /// Living monsters, in target order.
    pub monsters: Vec<MonsterStatus>,
    /// Character hit points after the round.
    pub character_hp: i32,
    /// Character maximum hit points.
    pub character_max_hp: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Character,
    Monster(usize),
}

/// One encounter. Borrows the character and the dice for its lifetime and
/// owns the spawned monsters.
pub struct CombatSession<'a> {
    character: &'a mut Character,
    monsters: Vec<Monster>,
    dice: &'a mut dyn DiceSource,
    round: u32,
    log: Vec<String>,
    fled: bool,
}

impl<'a> CombatSession<'a> {
    /// Start an encounter at round 0 with an empty log.
    pub fn new(
        character: &'a mut Character,
        monsters: Vec<Monster>,
        dice: &'a mut dyn DiceSource,
    ) -> Self {
        Self {
            character,
            monsters,
            dice,
            round: 0,
            log: Vec::new(),
            fled: false,
        }
    }

    /// The character in this fight.
    pub fn character(&self) -> &Character {
        &*self.character
    }

    /// Every monster in the encounter, living or not.
    pub fn monsters(&self) -> &[Monster] {
        &self.monsters
    }

    /// Mutable access to the monsters.
    pub fn monsters_mut(&mut self) -> &mut [Monster] {
        &mut self.monsters
    }

    /// Rounds fought so far.
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Every log entry of every round, in order.
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Current state, without rolling anything.
    pub fn status(&self) -> CombatStatus {
        if self.fled {
            CombatStatus::Fled
        } else if !self.character.is_alive() {
            CombatStatus::Defeat
        } else if self.monsters.iter().all(|m| !m.is_alive()) {
            CombatStatus::Victory
        } else {
            CombatStatus::Ongoing
        }
    }

    /// Living monsters with the target index an action would use for them.
    pub fn targets(&self) -> Vec<MonsterStatus> {
        self.living()
            .into_iter()
            .enumerate()
            .map(|(target, index)| {
                let m = &self.monsters[index];
                MonsterStatus {
                    target,
                    name: m.name.clone(),
                    current_hp: m.current_hp(),
                    max_hp: m.max_hp(),
                    armor_class: m.armor_class(),
                }
            })
            .collect()
    }

    /// Fight one round.
    ///
    /// If the session is already decided, nothing is rolled and the terminal
    /// status is returned with no entries. Otherwise initiative is rolled
    /// and every combatant acts in order; a successful flee ends the round
    /// on the spot.
    pub fn execute_round(&mut self, action: &CombatAction) -> RoundResult {
        let status = self.status();
        if status.is_terminal() {
            return self.finish(status, Vec::new());
        }

        self.round += 1;
        debug!(round = self.round, %action, "combat round");
        let mut entries = vec![format!("--- Round {} ---", self.round)];

        for turn in self.roll_initiative() {
            match turn {
                Turn::Character => {
                    if !self.character.is_alive() {
                        continue;
                    }
                    if self.character_turn(action, &mut entries) {
                        self.fled = true;
                        break;
                    }
                }
                Turn::Monster(index) => {
                    let monster = &self.monsters[index];
                    if monster.is_alive() {
                        let attack = monster.attack(&mut *self.character, &mut *self.dice);
                        entries.push(attack.message);
                    }
                }
            }
        }

        self.log.extend(entries.iter().cloned());
        let status = self.status();
        self.finish(status, entries)
    }

    fn living(&self) -> Vec<usize> {
        self.monsters
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_alive())
            .map(|(i, _)| i)
            .collect()
    }

    /// Character rolls `1d20 + DEX`, each living monster a plain `1d20`.
    /// Sorted highest first; ties keep roll order.
    fn roll_initiative(&mut self) -> Vec<Turn> {
        let dex = self.character.ability_modifier(Ability::Dexterity);
        let mut rolls = vec![(Turn::Character, self.dice.d20(1, dex))];
        for (index, monster) in self.monsters.iter().enumerate() {
            if monster.is_alive() {
                rolls.push((Turn::Monster(index), self.dice.d20(1, 0)));
            }
        }
        rolls.sort_by(|a, b| b.1.cmp(&a.1));
        debug!(?rolls, "initiative");
        rolls.into_iter().map(|(turn, _)| turn).collect()
    }

    /// Resolve the character's action. Returns true if the character fled.
    fn character_turn(&mut self, action: &CombatAction, entries: &mut Vec<String>) -> bool {
        let living = self.living();
        match action {
            CombatAction::Attack { target, damage } => {
                let Some(&index) = living.get(*target) else {
                    entries.push(format!("{} has no target!", self.character.name));
                    return false;
                };
                let formula = damage
                    .or_else(|| self.character.weapon_damage())
                    .unwrap_or(DEFAULT_WEAPON);
                let monster = &mut self.monsters[index];
                let outcome =
                    self.character
                        .attack_with(monster.armor_class(), &formula, &mut *self.dice);
                if outcome.hit {
                    monster.take_damage(outcome.damage);
                    let mut msg = format!(
                        "{} hits {} for {} damage!",
                        self.character.name, monster.name, outcome.damage
                    );
                    if !monster.is_alive() {
                        msg.push_str(&format!(" {} is defeated!", monster.name));
                    }
                    entries.push(msg);
                } else {
                    entries.push(format!("{} misses {}!", self.character.name, monster.name));
                }
            }
            CombatAction::Spell { spell, target } => {
                let Some(spell) = get_spell(spell) else {
                    entries.push(format!("Unknown spell: {spell}"));
                    return false;
                };
                let target: Option<&mut dyn Combatant> = if spell.effect.needs_target() {
                    match living.get(*target) {
                        Some(&index) => Some(&mut self.monsters[index] as &mut dyn Combatant),
                        None => None,
                    }
                } else {
                    None
                };
                let outcome = self.character.cast_spell(&spell, target, &mut *self.dice);
                entries.push(outcome.message);
            }
            CombatAction::Item { name } => {
                match self.character.use_item(name, &mut *self.dice) {
                    Some(msg) => entries.push(msg),
                    None => entries.push(format!("Cannot use {name}!")),
                }
            }
            CombatAction::Flee => {
                let dex = self.character.ability_modifier(Ability::Dexterity);
                let roll = self.dice.d20(1, dex);
                if roll >= FLEE_DC {
                    entries.push(format!("{} flees from combat!", self.character.name));
                    return true;
                }
                entries.push(format!("{} fails to flee!", self.character.name));
            }
        }
        false
    }

    fn rewards(&self) -> CombatRewards {
        let mut rewards = CombatRewards::default();
        for monster in &self.monsters {
            for entry in &monster.treasure {
                match treasure::classify(entry) {
                    TreasureKind::Gold(amount) => rewards.gold = rewards.gold.saturating_add(amount),
                    TreasureKind::Potion | TreasureKind::Named(_) => {
                        rewards.items.push(entry.clone());
                    }
                }
            }
            rewards.experience = rewards.experience.saturating_add(monster.experience_value());
        }
        rewards
    }

    fn finish(&self, status: CombatStatus, entries: Vec<String>) -> RoundResult {
        let (message, rewards) = match status {
            CombatStatus::Ongoing => (format!("Round {} complete.", self.round), None),
            CombatStatus::Victory => ("All enemies defeated!".to_string(), Some(self.rewards())),
            CombatStatus::Defeat => ("You have been defeated!".to_string(), None),
            CombatStatus::Fled => ("You successfully fled from combat!".to_string(), None),
        };
        if status.is_terminal() && !entries.is_empty() {
            info!(?status, round = self.round, "combat over");
        }
        RoundResult {
            status,
            message,
            round: self.round,
            entries,
            rewards,
            monsters: self.targets(),
            character_hp: self.character.current_hp(),
            character_max_hp: self.character.max_hp(),
        }
    }
}
