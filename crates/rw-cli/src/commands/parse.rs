use comfy_table::{ContentArrangement, Table};

use rw_dice::{KeepMode, ParsedRoll};

pub fn run(expression: &str) -> Result<(), String> {
    let roll = ParsedRoll::parse(expression).map_err(|e| e.to_string())?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Term", "Count", "Die", "Keep", "Reroll", "Dice rolled"]);

    for term in &roll.terms {
        let keep = match term.keep {
            KeepMode::All => "—".to_string(),
            KeepMode::Highest(n) => format!("highest {n}"),
            KeepMode::Lowest(n) => format!("lowest {n}"),
        };
        let reroll = match term.reroll {
            Some(rule) => format!("once if {}{}", rule.comparator, rule.threshold),
            None => "—".to_string(),
        };
        table.add_row(vec![
            term.raw.clone(),
            term.count.to_string(),
            term.die.to_string(),
            keep,
            reroll,
            term.rolled_count().to_string(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  constant: {}", roll.constant);

    let needed = roll
        .dice_to_roll()
        .iter()
        .rev()
        .map(|(die, count)| format!("{count}{die}"))
        .collect::<Vec<_>>()
        .join("+");
    println!("  dice to roll: {needed}");

    Ok(())
}
