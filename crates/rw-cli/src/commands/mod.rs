pub mod classify;
pub mod command;
pub mod parse;
pub mod roll;

use std::time::Instant;

use colored::Colorize;

use rw_dice::ParsedRoll;
use rw_session::{
    ChannelEvent, LocalRoller, RollEvent, RollMetadata, RollSession, SessionConfig,
};

/// Drive a full roll through a session backed by the built-in roller and
/// print the corrected result, either human-readable or as the wire JSON
/// of the rewritten fulfilled event.
fn execute_roll(
    roll: ParsedRoll,
    metadata: RollMetadata,
    seed: u64,
    json: bool,
) -> Result<(), String> {
    let expression = roll.raw.clone();
    tracing::debug!(%expression, seed, "rolling against the built-in roller");
    let mut session = RollSession::new(LocalRoller::new(seed), SessionConfig::default());
    let now = Instant::now();
    session
        .initiate(roll, metadata, now)
        .map_err(|e| e.to_string())?;

    let events = session.provider_mut().take_events();
    let mut fulfilled = None;
    for event in events {
        if let Some(ChannelEvent::RollFulfilled(event)) = session.intercept(event, now) {
            fulfilled = Some(event);
        }
    }
    let event = fulfilled.ok_or_else(|| format!("no result produced for '{expression}'"))?;

    if json {
        let wire = serde_json::to_string_pretty(&ChannelEvent::RollFulfilled(event))
            .map_err(|e| e.to_string())?;
        println!("{wire}");
    } else {
        print_roll_event(&event);
    }
    Ok(())
}

fn print_roll_event(event: &RollEvent) {
    println!("  {} {}", "Action:".bold(), event.action);
    if let Some(name) = &event.actor.name {
        println!("  {} {}", "Roller:".bold(), name);
    }

    for roll in &event.rolls {
        let mut line = format!("  {} {}", "Roll:".bold(), roll.notation);
        if let Some(roll_type) = roll.roll_type {
            line.push_str(&format!(" ({roll_type})"));
        }
        if let Some(kind) = roll.roll_kind {
            let marker = match kind {
                rw_session::RollKind::Advantage => "advantage".green().to_string(),
                rw_session::RollKind::Disadvantage => "disadvantage".red().to_string(),
            };
            line.push_str(&format!(" [{marker}]"));
        }
        println!("{line}");

        if let Some(result) = &roll.result {
            let values = result
                .values
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!("  {} {}", "Values:".bold(), values);
            println!("  {} {}", "Text:".bold(), result.text);
            println!("  {} {}", "Total:".bold(), result.total.to_string().bold());
        }
    }
}
