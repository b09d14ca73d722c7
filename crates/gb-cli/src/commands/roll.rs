use colored::Colorize;
use gb_mechanics::{DiceFormula, SeededDice};

/// Rolls with more dice than this print only the total.
const MAX_SHOWN_DICE: u32 = 20;

pub fn run(formula: &str, seed: Option<u64>, times: u32) -> Result<(), String> {
    let parsed: DiceFormula = formula.parse().map_err(|e| format!("{e}"))?;
    let mut dice = seed.map_or_else(SeededDice::from_entropy, SeededDice::new);

    for _ in 0..times.max(1) {
        if parsed.count <= MAX_SHOWN_DICE {
            let (result, total) = parsed.roll_dice(&mut dice);
            println!("  {parsed}: {}  {result}", total.to_string().bold());
        } else {
            let total = parsed.roll(&mut dice);
            println!("  {parsed}: {}", total.to_string().bold());
        }
    }
    println!(
        "  range {}-{}, average {}",
        parsed.min(),
        parsed.max(),
        parsed.average()
    );

    Ok(())
}
