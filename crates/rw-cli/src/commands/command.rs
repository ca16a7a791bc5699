use rw_session::{SlashCommand, StatModifiers};

pub fn run(line: &str, seed: u64, json: bool) -> Result<(), String> {
    let command = SlashCommand::parse(line).map_err(|e| e.to_string())?;

    // offline there is no character sheet; every stat token resolves to 0
    let (roll, metadata) = command
        .resolve(&StatModifiers::default())
        .map_err(|e| e.to_string())?;

    super::execute_roll(roll, metadata, seed, json)
}
