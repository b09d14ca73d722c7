//! Effects that run each time a node is entered.

use std::fmt;
use std::sync::Arc;

use gb_mechanics::Character;

/// A caller-supplied on-enter hook. Returns a message to show, if any.
pub type EnterHook = Arc<dyn Fn(&mut Character) -> Option<String> + Send + Sync>;

/// Something that happens to the character on entering a node.
#[derive(Clone)]
pub enum OnEnterEffect {
    /// Pay gold to enter (a toll, a bribe).
    GoldCost(u32),
    /// Hand over items to enter (a key, an offering).
    ItemCost {
        /// Item name, matched case-insensitively.
        item: String,
        /// How many are consumed.
        quantity: u32,
    },
    /// Arbitrary code.
    Custom(EnterHook),
}

impl OnEnterEffect {
    /// Wrap a closure as an effect.
    pub fn custom<F>(hook: F) -> Self
    where
        F: Fn(&mut Character) -> Option<String> + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(hook))
    }

    /// Run the effect against the character.
    pub fn apply(&self, character: &mut Character) -> Option<String> {
        match self {
            Self::GoldCost(cost) => {
                if character.gold >= *cost {
                    character.gold -= cost;
                    Some(format!("You pay {cost} gold pieces. ({} remaining)", character.gold))
                } else {
                    Some(format!(
                        "You cannot pay the {cost} gold pieces! (You have {})",
                        character.gold
                    ))
                }
            }
            Self::ItemCost { item, quantity } => {
                let wanted = *quantity as usize;
                if character.item_count(item) >= wanted {
                    character.remove_items(item, wanted);
                    Some(format!("You hand over {quantity}x {item}."))
                } else {
                    Some(format!(
                        "You need {quantity}x {item} but have {}!",
                        character.item_count(item)
                    ))
                }
            }
            Self::Custom(hook) => hook(character),
        }
    }
}

impl fmt::Debug for OnEnterEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoldCost(cost) => f.debug_tuple("GoldCost").field(cost).finish(),
            Self::ItemCost { item, quantity } => f
                .debug_struct("ItemCost")
                .field("item", item)
                .field("quantity", quantity)
                .finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
