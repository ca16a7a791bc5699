use colored::Colorize;

use rw_dice::ParsedRoll;

pub fn run(expression: &str) -> Result<(), String> {
    let roll = ParsedRoll::parse(expression).map_err(|e| e.to_string())?;
    let complexity = rw_dice::classify(&roll);

    let verdict = if complexity.is_complex {
        "complex — the provider's rendering must be overridden"
            .yellow()
            .to_string()
    } else {
        "simple — the provider renders it natively".green().to_string()
    };
    println!("  {} {}", roll.raw.bold(), verdict);

    if complexity.is_advantage {
        println!("  rendered as {}", "advantage".green());
    }
    if complexity.is_disadvantage {
        println!("  rendered as {}", "disadvantage".red());
    }

    Ok(())
}
