use rw_dice::ParsedRoll;
use rw_session::{Audience, RollMetadata, RollType};

pub fn run(
    expression: &str,
    seed: u64,
    action: Option<&str>,
    roll_type: Option<&str>,
    send_to: Option<&str>,
    json: bool,
) -> Result<(), String> {
    let roll = ParsedRoll::parse(expression).map_err(|e| e.to_string())?;

    let mut metadata = RollMetadata::new();
    if let Some(action) = action {
        metadata.set_action(action);
    }
    if let Some(text) = roll_type {
        metadata.roll_type =
            Some(RollType::parse(text).ok_or_else(|| format!("unknown roll type '{text}'"))?);
    }
    if let Some(text) = send_to {
        metadata.send_to =
            Some(Audience::parse(text).ok_or_else(|| format!("unknown audience '{text}'"))?);
    }

    super::execute_roll(roll, metadata, seed, json)
}
