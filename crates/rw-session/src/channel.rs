//! Typed events on the host's shared dispatch channel.
//!
//! The host application broadcasts all of its traffic on one channel. Only
//! the two dice events carry structure we understand; everything else is
//! opaque JSON that must pass through untouched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::metadata::{EntityRef, RollType};

/// Whether a roll renders natively as advantage or disadvantage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollKind {
    /// Keep-highest of two dice.
    Advantage,
    /// Keep-lowest of two dice.
    Disadvantage,
}

/// The numeric result attached to a fulfilled roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollValues {
    /// Every die value, in request order.
    pub values: Vec<i32>,
    /// The provider's (or our corrected) total.
    pub total: i32,
    /// The rendered expression text.
    pub text: String,
    /// The arithmetic constant portion of the expression.
    pub constant: i32,
}

/// One roll inside a dice event. Pending events carry no result yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequest {
    /// The dice notation as the provider understands it.
    pub notation: String,
    /// Roll type shown in the game log.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_type: Option<RollType>,
    /// Advantage/disadvantage marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roll_kind: Option<RollKind>,
    /// The result, present only on fulfilled events.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<RollValues>,
}

/// Who a dice event is displayed as coming from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActorContext {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Avatar image url.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// The entity the roll belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<EntityRef>,
}

/// Payload shared by the pending and fulfilled dice events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollEvent {
    /// Correlation id linking a pending event to its fulfilled counterpart.
    pub roll_id: Uuid,
    /// When the provider emitted the event.
    pub timestamp: DateTime<Utc>,
    /// Who the roll is displayed as coming from.
    pub actor: ActorContext,
    /// Action label, defaults to "custom".
    pub action: String,
    /// The rolls in this event (one per submit in practice).
    pub rolls: Vec<RollRequest>,
}

/// An event observed on the shared channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventType", content = "data")]
pub enum ChannelEvent {
    /// The provider has accepted a roll and is animating it.
    #[serde(rename = "dice/roll/pending")]
    RollPending(RollEvent),
    /// The provider has produced values for a previously pending roll.
    #[serde(rename = "dice/roll/fulfilled")]
    RollFulfilled(RollEvent),
    /// Unrelated host traffic; always passes through untouched.
    #[serde(untagged)]
    Other(Value),
}

impl ChannelEvent {
    /// The correlation id, when this is a dice event.
    pub fn roll_id(&self) -> Option<Uuid> {
        match self {
            Self::RollPending(event) | Self::RollFulfilled(event) => Some(event.roll_id),
            Self::Other(_) => None,
        }
    }

    /// True for the two dice events.
    pub fn is_dice_event(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}
