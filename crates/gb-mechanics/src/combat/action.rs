//! Actions the character can take on their turn.

use crate::dice::DiceFormula;

/// Weapon damage used when an attack does not name one.
pub const DEFAULT_WEAPON: DiceFormula = DiceFormula::new(1, 8, 0);

/// The character's action for one combat round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombatAction {
    /// Attack a living monster.
    Attack {
        /// Index into the living monsters at the time of the turn.
        target: usize,
        /// Weapon damage. `None` uses the first carried weapon, or
        /// [`DEFAULT_WEAPON`] without one.
        damage: Option<DiceFormula>,
    },
    /// Cast a known spell.
    Spell {
        /// Spell id or display name.
        spell: String,
        /// Index into the living monsters, for offensive spells.
        target: usize,
    },
    /// Use an inventory item.
    Item {
        /// Item name (case-insensitive).
        name: String,
    },
    /// Try to escape: `1d20 + DEX` against 10.
    Flee,
}

impl CombatAction {
    /// Attack `target` with the default weapon.
    pub fn attack(target: usize) -> Self {
        Self::Attack {
            target,
            damage: None,
        }
    }

    /// Cast `spell` at `target`.
    pub fn spell(spell: impl Into<String>, target: usize) -> Self {
        Self::Spell {
            spell: spell.into(),
            target,
        }
    }

    /// Use the named item.
    pub fn item(name: impl Into<String>) -> Self {
        Self::Item { name: name.into() }
    }
}

impl Default for CombatAction {
    fn default() -> Self {
        Self::attack(0)
    }
}

impl std::fmt::Display for CombatAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attack {
                target,
                damage: Some(damage),
            } => write!(f, "Attack target #{target} ({damage})"),
            Self::Attack { target, .. } => write!(f, "Attack target #{target}"),
            Self::Spell { spell, target } => write!(f, "Cast {spell} at #{target}"),
            Self::Item { name } => write!(f, "Use {name}"),
            Self::Flee => write!(f, "Flee"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_attack_first_target() {
        assert_eq!(CombatAction::default(), CombatAction::attack(0));
    }

    #[test]
    fn display() {
        assert_eq!(CombatAction::attack(1).to_string(), "Attack target #1");
        let with_axe = CombatAction::Attack {
            target: 0,
            damage: Some(DiceFormula::new(1, 12, 0)),
        };
        assert_eq!(with_axe.to_string(), "Attack target #0 (1d12)");
        assert_eq!(
            CombatAction::spell("fireball", 0).to_string(),
            "Cast fireball at #0"
        );
        assert_eq!(CombatAction::item("Potion of Healing").to_string(), "Use Potion of Healing");
        assert_eq!(CombatAction::Flee.to_string(), "Flee");
    }
}
