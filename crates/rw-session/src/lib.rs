//! Roll sessions for Rollweaver.
//!
//! Bridges the dice engine in `rw-dice` and a host VTT's roll provider:
//! typed events for the host's shared dispatch channel, metadata for
//! relabeling rolls, a slash-command surface, and the one-roll-at-a-time
//! session state machine that intercepts and rewrites provider events.

pub mod channel;
pub mod command;
pub mod error;
pub mod metadata;
pub mod modifiers;
pub mod provider;
pub mod session;

pub use channel::{ActorContext, ChannelEvent, RollEvent, RollKind, RollRequest, RollValues};
pub use command::SlashCommand;
pub use error::{SessionError, SessionResult};
pub use metadata::{Audience, EntityKind, EntityRef, RollMetadata, RollType};
pub use modifiers::{ModifierSource, NoSheet, StatModifiers};
pub use provider::{LocalRoller, RollProvider};
pub use session::{RollSession, SessionConfig, SessionStatus};
