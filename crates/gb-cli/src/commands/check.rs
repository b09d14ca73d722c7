use std::path::Path;

use colored::Colorize;
use gb_story::{has_errors, validate_adventure};

pub fn run(file: &Path) -> Result<(), String> {
    let adventure = super::load_adventure(Some(file), None)?;
    let issues = validate_adventure(&adventure);

    for issue in &issues {
        let line = issue.to_string();
        if issue.is_error {
            eprintln!("  {}", line.red());
        } else {
            eprintln!("  {}", line.yellow());
        }
    }

    let errors = issues.iter().filter(|i| i.is_error).count();
    let warnings = issues.len() - errors;

    if has_errors(&issues) {
        return Err(format!(
            "validation failed with {errors} error{}",
            if errors == 1 { "" } else { "s" }
        ));
    }

    println!("  All checks passed for '{}'.", adventure.title);
    println!(
        "  {} locations, {} warning{}",
        adventure.node_count(),
        warnings,
        if warnings == 1 { "" } else { "s" }
    );

    Ok(())
}
