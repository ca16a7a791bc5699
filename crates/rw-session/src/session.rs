//! The roll session state machine.
//!
//! One session tracks at most one in-flight roll: `initiate` drives the
//! provider's UI, then every event observed on the shared channel is fed
//! through `intercept`, which relabels the pending event, rewrites the
//! matching fulfilled event with reconciled results, and suppresses any
//! other dice traffic until the roll resolves or times out.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use rw_dice::{Complexity, ParsedRoll, classify, group_values_by_die, reconcile};

use crate::channel::{ChannelEvent, RollEvent, RollKind};
use crate::error::{SessionError, SessionResult};
use crate::metadata::{EntityKind, RollMetadata};
use crate::provider::RollProvider;

/// Session tuning knobs.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long to wait for the fulfilled event before dropping the roll.
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            // if the message gets dropped we don't want to wait forever
            timeout: Duration::from_secs(10),
        }
    }
}

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No roll in flight; `initiate` is accepted.
    Idle,
    /// Waiting for the provider's pending/fulfilled pair.
    Pending,
}

/// Everything tracked for the one in-flight roll.
#[derive(Debug)]
struct Inflight {
    roll: ParsedRoll,
    metadata: RollMetadata,
    complexity: Complexity,
    deadline: Instant,
    pending_id: Option<uuid::Uuid>,
}

/// A roll session bound to one provider.
#[derive(Debug)]
pub struct RollSession<P: RollProvider> {
    provider: P,
    timeout: Duration,
    inflight: Option<Inflight>,
}

impl<P: RollProvider> RollSession<P> {
    /// Create an idle session.
    pub fn new(provider: P, config: SessionConfig) -> Self {
        Self {
            provider,
            timeout: config.timeout,
            inflight: None,
        }
    }

    /// Current state.
    pub fn status(&self) -> SessionStatus {
        if self.inflight.is_some() {
            SessionStatus::Pending
        } else {
            SessionStatus::Idle
        }
    }

    /// Access the provider (the local roller's event queue, in tests and
    /// the CLI).
    pub fn provider_mut(&mut self) -> &mut P {
        &mut self.provider
    }

    /// Drop any in-flight roll and return to idle.
    pub fn reset(&mut self) {
        self.inflight = None;
    }

    /// Start a roll: select one die per needed die, pick the audience,
    /// and submit. Fails with [`SessionError::Busy`] while another roll is
    /// in flight; nothing is sent to the provider in that case.
    pub fn initiate(
        &mut self,
        roll: ParsedRoll,
        metadata: RollMetadata,
        now: Instant,
    ) -> SessionResult<()> {
        self.expire_if_overdue(now);
        if self.inflight.is_some() {
            return Err(SessionError::Busy);
        }

        for (die, count) in roll.dice_to_roll() {
            for _ in 0..count {
                self.provider.select_die(die);
            }
        }
        self.provider.choose_audience(metadata.send_to);
        self.provider.submit();

        let complexity = classify(&roll);
        debug!(expression = %roll.raw, complex = complexity.is_complex, "roll initiated");
        self.inflight = Some(Inflight {
            roll,
            metadata,
            complexity,
            deadline: now + self.timeout,
            pending_id: None,
        });
        Ok(())
    }

    /// Feed one observed channel event through the session.
    ///
    /// Returns the event to propagate downstream, possibly rewritten, or
    /// `None` when the event is suppressed. Unrelated traffic always
    /// passes through untouched; while a roll is in flight this session is
    /// the only consumer of dice events.
    pub fn intercept(&mut self, event: ChannelEvent, now: Instant) -> Option<ChannelEvent> {
        self.expire_if_overdue(now);
        if self.inflight.is_none() || !event.is_dice_event() {
            return Some(event);
        }

        match event {
            ChannelEvent::RollPending(mut pending) => {
                debug!(roll_id = %pending.roll_id, "capturing pending roll");
                if let Some(inflight) = self.inflight.as_mut() {
                    inflight.relabel(&mut pending);
                    inflight.pending_id = Some(pending.roll_id);
                }
                Some(ChannelEvent::RollPending(pending))
            }
            ChannelEvent::RollFulfilled(fulfilled)
                if self
                    .inflight
                    .as_ref()
                    .is_some_and(|inflight| inflight.pending_id == Some(fulfilled.roll_id)) =>
            {
                // the guard guarantees a matching in-flight roll
                let rewritten = match self.inflight.take() {
                    Some(inflight) => inflight.rewrite_fulfilled(fulfilled),
                    None => fulfilled,
                };
                Some(ChannelEvent::RollFulfilled(rewritten))
            }
            _ => {
                debug!("suppressing unrelated dice event while a roll is in flight");
                None
            }
        }
    }

    /// Reset to idle when the deadline has passed.
    fn expire_if_overdue(&mut self, now: Instant) {
        if let Some(inflight) = &self.inflight
            && now >= inflight.deadline
        {
            warn!(
                expression = %inflight.roll.raw,
                "roll timed out waiting for the provider; dropping it"
            );
            self.inflight = None;
        }
    }

}

impl Inflight {
    /// Overwrite the event's outbound metadata from this roll's metadata.
    fn relabel(&self, event: &mut RollEvent) {
        let metadata = &self.metadata;
        if let Some(action) = &metadata.action {
            event.action = action.clone();
        }
        if let Some(name) = &metadata.name {
            event.actor.name = Some(name.clone());
        }
        if let Some(avatar_url) = &metadata.avatar_url {
            event.actor.avatar_url = Some(avatar_url.clone());
        }
        if let Some(entity) = &metadata.entity
            && matches!(entity.kind, EntityKind::Character | EntityKind::Monster)
        {
            event.actor.entity = Some(entity.clone());
        }
    }

    /// Rewrite a fulfilled event with reconciled results. On any
    /// reconciliation failure the event is returned unmodified so the game
    /// log still shows a result.
    fn rewrite_fulfilled(&self, fulfilled: RollEvent) -> RollEvent {
        match self.try_rewrite(&fulfilled) {
            Ok(rewritten) => rewritten,
            Err(error) => {
                warn!(%error, "failed to reconcile roll; passing the provider result through");
                fulfilled
            }
        }
    }

    fn try_rewrite(&self, fulfilled: &RollEvent) -> SessionResult<RollEvent> {
        let mut event = fulfilled.clone();
        for roll in &mut event.rolls {
            let result = roll.result.as_mut().ok_or_else(|| {
                SessionError::Dice(rw_dice::DiceError::Reconciliation(
                    "fulfilled event carries no result".to_string(),
                ))
            })?;

            let mut grouped = group_values_by_die(&roll.notation, &result.values)?;
            let outcome = reconcile(&self.roll, &mut grouped)?;

            roll.notation = self.roll.raw.clone();
            result.constant = outcome.constant;
            result.text = outcome.expression_text;
            result.total = outcome.total;
            if outcome.complexity.is_complex {
                result.values = outcome.used_values;
            }
            if let Some(roll_type) = self.metadata.roll_type {
                roll.roll_type = Some(roll_type);
            }
            if self.complexity.is_advantage {
                roll.roll_kind = Some(RollKind::Advantage);
            } else if self.complexity.is_disadvantage {
                roll.roll_kind = Some(RollKind::Disadvantage);
            }
        }
        self.relabel(&mut event);
        Ok(event)
    }
}
