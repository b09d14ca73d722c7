use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use tracing::debug;

use gb_mechanics::{
    Character, CharacterClass, CombatAction, CombatSession, Combatant, RoundResult, SeededDice,
    starting_spells,
};
use gb_story::{CombatResolution, EngineConfig, GameEngine, NodeOutcome, NodeReport, SaveState};

pub struct PlayOptions {
    pub file: Option<PathBuf>,
    pub sample: Option<String>,
    pub name: String,
    pub class: String,
    pub seed: u64,
    pub credit_gold: bool,
    pub load: Option<PathBuf>,
}

/// Line-oriented input. `None` means end of input.
struct Prompt<R> {
    reader: R,
    line: String,
}

impl<R: BufRead> Prompt<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            line: String::new(),
        }
    }

    fn ask(&mut self, prompt: &str) -> Result<Option<String>, String> {
        print!("{prompt}");
        io::stdout().flush().map_err(|e| e.to_string())?;

        self.line.clear();
        match self.reader.read_line(&mut self.line) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(self.line.trim().to_string())),
            Err(e) => Err(e.to_string()),
        }
    }
}

pub fn run(opts: &PlayOptions) -> Result<(), String> {
    let adventure = super::load_adventure(opts.file.as_deref(), opts.sample.as_deref())?;
    let class: CharacterClass = opts.class.parse().map_err(|e| format!("{e}"))?;

    let mut character = Character::new(opts.name.clone(), class);
    character.roll_abilities(&mut SeededDice::new(opts.seed));
    for spell in starting_spells(class) {
        character.learn_spell(spell);
    }

    let config = EngineConfig::default()
        .with_seed(opts.seed)
        .with_credit_gold(opts.credit_gold);
    let mut engine = GameEngine::with_config(adventure, character, config);

    println!("\n  {}", engine.adventure().title.bold());
    println!("  {}\n", engine.adventure().description);

    let stdin = io::stdin();
    let mut prompt = Prompt::new(stdin.lock());

    let mut outcome = match &opts.load {
        Some(path) => {
            let state = SaveState::read(path).map_err(|e| e.to_string())?;
            engine.restore(&state).map_err(|e| e.to_string())?;
            debug!(path = %path.display(), node = engine.current_node_id(), "restored save");
            println!("  Game loaded from {}.\n", path.display());
            let node = engine.current_node().map_err(|e| e.to_string())?;
            println!("{}\n{}", node.title.bold(), node.description);
            None
        }
        None => Some(engine.start_game().map_err(|e| e.to_string())?),
    };

    println!("{}\n", engine.character());

    loop {
        if let Some(result) = outcome.take() {
            match result {
                NodeOutcome::Active(report) => {
                    show_node(&engine, &report)?;
                    if report.has_combat && !combat(&mut engine, &mut prompt)? {
                        break;
                    }
                }
                NodeOutcome::Victory { message } => {
                    banner("VICTORY!");
                    println!("{message}");
                    break;
                }
                NodeOutcome::Defeat {
                    message,
                    trap_messages,
                } => {
                    print_messages(&trap_messages);
                    banner("DEFEAT");
                    println!("{message}");
                    break;
                }
                NodeOutcome::InvalidChoice { message } | NodeOutcome::Blocked { message } => {
                    println!("\n  {}", message.yellow());
                }
            }
        }

        if engine.is_game_over() {
            break;
        }

        show_choices(&engine)?;
        let Some(input) = prompt.ask("\nYour choice: ")? else {
            break;
        };

        match input.to_ascii_lowercase().as_str() {
            "" => {}
            "s" | "status" => println!("\n{}", engine.character()),
            "i" | "inventory" => show_inventory(engine.character()),
            "h" | "help" => show_help(),
            "q" | "quit" => {
                println!("Thanks for playing!");
                return Ok(());
            }
            lower => {
                if let Some(path) = lower.strip_prefix("save ") {
                    let path = input[input.len() - path.len()..].trim();
                    engine.snapshot().write(path).map_err(|e| e.to_string())?;
                    println!("  Game saved to {path}.");
                } else if let Some(item) = lower.strip_prefix("use ") {
                    let item = input[input.len() - item.len()..].trim().to_string();
                    match engine.use_item(&item) {
                        Some(message) => println!("  {message}"),
                        None => println!("  {}", format!("You have no {item}!").yellow()),
                    }
                } else {
                    match lower.parse::<usize>() {
                        Ok(n) if n > 0 => {
                            outcome = Some(engine.handle_choice(n - 1).map_err(|e| e.to_string())?);
                        }
                        _ => println!("\n  {}", "Invalid choice! Enter a number.".yellow()),
                    }
                }
            }
        }
    }

    banner("GAME OVER");
    println!("{}", engine.character());
    Ok(())
}

/// Run the fight at the current node. Returns false if input ran out or
/// the character fell.
fn combat<R: BufRead>(engine: &mut GameEngine, prompt: &mut Prompt<R>) -> Result<bool, String> {
    banner("COMBAT BEGINS!");
    debug!(node = engine.current_node_id(), "starting combat");

    let result = {
        let mut session = engine.start_combat().map_err(|e| e.to_string())?;
        match fight(&mut session, prompt)? {
            Some(result) => result,
            None => return Ok(false),
        }
    };

    match engine
        .handle_combat_result(&result)
        .map_err(|e| e.to_string())?
    {
        CombatResolution::Complete { messages, .. } => {
            println!("\n  {}", "=== VICTORY! ===".green().bold());
            print_messages(&messages);
            Ok(true)
        }
        CombatResolution::GameOver { message } => {
            println!("\n  {}", message.red().bold());
            Ok(false)
        }
        CombatResolution::Fled { message } => {
            println!("\n  {message}");
            Ok(true)
        }
        CombatResolution::Ongoing => Ok(true),
    }
}

fn fight<R: BufRead>(
    session: &mut CombatSession<'_>,
    prompt: &mut Prompt<R>,
) -> Result<Option<RoundResult>, String> {
    loop {
        show_targets(session);
        let Some(input) = prompt.ask("\nattack [#] | cast <spell> [#] | use <item> | flee > ")?
        else {
            return Ok(None);
        };
        let Some(action) = parse_action(&input) else {
            println!("  {}", "Unknown action.".yellow());
            continue;
        };

        let result = session.execute_round(&action);
        print_messages(&result.entries);
        println!("  {}", result.message.bold());
        if result.status.is_terminal() {
            return Ok(Some(result));
        }
    }
}

/// Parse a combat command. Targets are 1-based on input.
fn parse_action(input: &str) -> Option<CombatAction> {
    let input = input.trim();
    let (verb, rest) = input.split_once(' ').unwrap_or((input, ""));
    let rest = rest.trim();

    match verb.to_lowercase().as_str() {
        "a" | "attack" | "1" => Some(CombatAction::attack(target_index(rest)?)),
        "c" | "cast" | "2" => {
            let (spell, target) = match rest.rsplit_once(' ') {
                Some((spell, number)) if number.parse::<usize>().is_ok() => {
                    (spell.trim(), target_index(number)?)
                }
                _ => (rest, 0),
            };
            (!spell.is_empty()).then(|| CombatAction::spell(spell, target))
        }
        "u" | "use" | "3" => (!rest.is_empty()).then(|| CombatAction::item(rest)),
        "f" | "flee" | "4" => Some(CombatAction::Flee),
        _ => None,
    }
}

/// 1-based target number to 0-based index. Empty means the first target.
fn target_index(text: &str) -> Option<usize> {
    if text.is_empty() {
        return Some(0);
    }
    text.parse::<usize>().ok()?.checked_sub(1)
}

fn show_node(engine: &GameEngine, report: &NodeReport) -> Result<(), String> {
    let node = engine.current_node().map_err(|e| e.to_string())?;
    println!("\n{}", "=".repeat(60));
    println!("{}", node.title.bold());
    println!("{}\n", "=".repeat(60));
    println!("{}", node.description);
    print_messages(&report.event_messages);
    print_messages(&report.trap_messages);
    print_messages(&report.treasure_messages);
    Ok(())
}

fn show_choices(engine: &GameEngine) -> Result<(), String> {
    let node = engine.current_node().map_err(|e| e.to_string())?;
    if node.choices().is_empty() {
        println!("\n  [No choices available - this is an ending]");
        return Ok(());
    }
    println!("\nWhat do you do?");
    for (i, choice) in node.choices().iter().enumerate() {
        println!("  [{}] {}", i + 1, choice.text);
    }
    println!("  [S]tatus  [I]nventory  [H]elp  [Q]uit");
    Ok(())
}

fn show_targets(session: &CombatSession<'_>) {
    let character = session.character();
    println!(
        "\n  {} HP {}/{} | AC {}",
        character.name.bold(),
        character.current_hp(),
        character.max_hp(),
        character.armor_class()
    );

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Monster", "HP", "AC"]);
    for status in session.targets() {
        table.add_row(vec![
            (status.target + 1).to_string(),
            status.name,
            format!("{}/{}", status.current_hp, status.max_hp),
            status.armor_class.to_string(),
        ]);
    }
    println!("{table}");
}

fn show_inventory(character: &Character) {
    if character.inventory.is_empty() {
        println!("\n  Your inventory is empty!");
        return;
    }
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Item", "Description"]);
    for item in &character.inventory {
        let desc = if item.description.is_empty() {
            "-".to_string()
        } else {
            item.description.clone()
        };
        table.add_row(vec![item.to_string(), desc]);
    }
    println!("{table}");
    println!("  {} gold pieces", character.gold);
}

fn show_help() {
    println!("\n  Enter the number of a choice to take it.");
    println!("  s: status, i: inventory, use <item>, save <file>, q: quit");
    println!("  In combat: attack [#], cast <spell> [#], use <item>, flee");
}

fn banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{:^60}", title.bold());
    println!("{}", "=".repeat(60));
}

fn print_messages(messages: &[String]) {
    for message in messages {
        println!("  {message}");
    }
}
