//! User-facing roll annotations: action labels, roll types, audiences.

use serde::{Deserialize, Serialize};

/// What kind of roll a message represents. Absent means the provider's
/// generic "roll".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RollType {
    /// An attack roll.
    #[serde(rename = "to hit")]
    ToHit,
    /// A damage roll.
    #[serde(rename = "damage")]
    Damage,
    /// A saving throw.
    #[serde(rename = "save")]
    Save,
    /// An ability or skill check.
    #[serde(rename = "check")]
    Check,
    /// A healing roll.
    #[serde(rename = "heal")]
    Heal,
    /// A reroll of a previous result.
    #[serde(rename = "reroll")]
    Reroll,
}

impl RollType {
    /// Parse a roll type leniently: case-insensitive, `-` treated as a
    /// space (so `To-Hit` and `to hit` both work). Unknown strings yield
    /// `None` rather than an error; an unrecognized type leaves the
    /// provider default in place.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace('-', " ").as_str() {
            "to hit" => Some(Self::ToHit),
            "damage" => Some(Self::Damage),
            "save" => Some(Self::Save),
            "check" => Some(Self::Check),
            "heal" => Some(Self::Heal),
            "reroll" => Some(Self::Reroll),
            _ => None,
        }
    }
}

impl std::fmt::Display for RollType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ToHit => write!(f, "to hit"),
            Self::Damage => write!(f, "damage"),
            Self::Save => write!(f, "save"),
            Self::Check => write!(f, "check"),
            Self::Heal => write!(f, "heal"),
            Self::Reroll => write!(f, "reroll"),
        }
    }
}

/// Who a roll result is shown to. Absent means whatever the host's game
/// log is currently set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Audience {
    /// Only the rolling player.
    #[serde(rename = "Self")]
    SelfOnly,
    /// Every connected player.
    Everyone,
    /// The dungeon master only.
    DungeonMaster,
}

impl Audience {
    /// Parse an audience override; unknown strings yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "self" => Some(Self::SelfOnly),
            "everyone" => Some(Self::Everyone),
            "dungeonmaster" | "dungeon-master" | "dm" => Some(Self::DungeonMaster),
            _ => None,
        }
    }
}

/// The kind of entity a roll belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A player character.
    Character,
    /// A monster from the encounter.
    Monster,
    /// A plain user account.
    User,
}

/// Reference to the entity a roll belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRef {
    /// The kind of entity.
    pub kind: EntityKind,
    /// The host application's id for it.
    pub id: String,
}

/// Annotations attached to a roll before it is initiated. All fields are
/// optional and may be changed after construction; absent fields leave the
/// provider's own values untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollMetadata {
    /// Action label, e.g. "Rapier" or "Fire Bolt".
    pub action: Option<String>,
    /// Roll type override.
    pub roll_type: Option<RollType>,
    /// Audience override.
    pub send_to: Option<Audience>,
    /// Display name shown next to the roll.
    pub name: Option<String>,
    /// Avatar image shown next to the roll.
    pub avatar_url: Option<String>,
    /// Entity the roll belongs to.
    pub entity: Option<EntityRef>,
}

impl RollMetadata {
    /// Metadata with every field unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the action label. Trims surrounding whitespace; empty or
    /// whitespace-only labels clear the field instead.
    pub fn set_action(&mut self, action: &str) {
        let trimmed = action.trim();
        self.action = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    /// Builder-style action label.
    pub fn with_action(mut self, action: &str) -> Self {
        self.set_action(action);
        self
    }

    /// Builder-style roll type.
    pub fn with_roll_type(mut self, roll_type: RollType) -> Self {
        self.roll_type = Some(roll_type);
        self
    }

    /// Builder-style audience override.
    pub fn with_send_to(mut self, audience: Audience) -> Self {
        self.send_to = Some(audience);
        self
    }

    /// Builder-style display name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_type_parse_lenient() {
        assert_eq!(RollType::parse("to hit"), Some(RollType::ToHit));
        assert_eq!(RollType::parse("To-Hit"), Some(RollType::ToHit));
        assert_eq!(RollType::parse(" DAMAGE "), Some(RollType::Damage));
        assert_eq!(RollType::parse("initiative"), None);
    }

    #[test]
    fn roll_type_display() {
        assert_eq!(RollType::ToHit.to_string(), "to hit");
        assert_eq!(RollType::Heal.to_string(), "heal");
    }

    #[test]
    fn audience_parse() {
        assert_eq!(Audience::parse("Self"), Some(Audience::SelfOnly));
        assert_eq!(Audience::parse("everyone"), Some(Audience::Everyone));
        assert_eq!(Audience::parse("dm"), Some(Audience::DungeonMaster));
        assert_eq!(Audience::parse("guild"), None);
    }

    #[test]
    fn set_action_trims() {
        let mut metadata = RollMetadata::new();
        metadata.set_action("  Rapier  ");
        assert_eq!(metadata.action.as_deref(), Some("Rapier"));
    }

    #[test]
    fn set_action_clears_on_blank() {
        let mut metadata = RollMetadata::new().with_action("Rapier");
        metadata.set_action("   ");
        assert_eq!(metadata.action, None);
    }

    #[test]
    fn builder_chain() {
        let metadata = RollMetadata::new()
            .with_action("Fire Bolt")
            .with_roll_type(RollType::Damage)
            .with_send_to(Audience::Everyone)
            .with_name("Mira");
        assert_eq!(metadata.action.as_deref(), Some("Fire Bolt"));
        assert_eq!(metadata.roll_type, Some(RollType::Damage));
        assert_eq!(metadata.send_to, Some(Audience::Everyone));
        assert_eq!(metadata.name.as_deref(), Some("Mira"));
    }
}
