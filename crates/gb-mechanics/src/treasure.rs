//! Classifying treasure strings.
//!
//! Treasure is free text in adventure files ("25 gold pieces",
//! "Potion of Healing", "Magic amulet"). Anything mentioning gold is worth
//! the first run of digits in it; anything mentioning a potion becomes a
//! healing potion; everything else is a named item.

/// What a treasure string turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreasureKind {
    /// Gold pieces.
    Gold(u32),
    /// A healing potion.
    Potion,
    /// Anything else, by name.
    Named(String),
}

/// Classify one treasure string. Matching is case-insensitive.
pub fn classify(entry: &str) -> TreasureKind {
    let lower = entry.to_lowercase();
    if lower.contains("gold") {
        TreasureKind::Gold(first_number(entry))
    } else if lower.contains("potion") {
        TreasureKind::Potion
    } else {
        TreasureKind::Named(entry.to_string())
    }
}

/// The first maximal run of ASCII digits, or 0 if there is none.
/// Saturates at `u32::MAX`.
pub fn first_number(text: &str) -> u32 {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|run| !run.is_empty())
        .map_or(0, |run| run.parse().unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gold_takes_first_digit_run() {
        assert_eq!(classify("25 gold pieces"), TreasureKind::Gold(25));
        assert_eq!(classify("Bag of 12 GOLD coins and 3 gems"), TreasureKind::Gold(12));
        assert_eq!(classify("gold dust"), TreasureKind::Gold(0));
    }

    #[test]
    fn gold_wins_over_potion() {
        assert_eq!(classify("Potion worth 5 gold"), TreasureKind::Gold(5));
    }

    #[test]
    fn potions() {
        assert_eq!(classify("Potion of Healing"), TreasureKind::Potion);
        assert_eq!(classify("2x Potion of Healing"), TreasureKind::Potion);
    }

    #[test]
    fn named_items() {
        assert_eq!(
            classify("Ruby worth 1000gp"),
            TreasureKind::Named("Ruby worth 1000gp".to_string())
        );
    }

    #[test]
    fn first_number_edge_cases() {
        assert_eq!(first_number(""), 0);
        assert_eq!(first_number("abc"), 0);
        assert_eq!(first_number("x1y22"), 1);
        assert_eq!(first_number("99999999999999"), u32::MAX);
    }
}
