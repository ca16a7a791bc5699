//! The external roll provider surface.
//!
//! The provider is driven through discrete UI actions: one die selection
//! per die needed, an audience selection, then a single submit. Results
//! come back later on the shared channel, never as return values.

use std::collections::BTreeMap;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

use rw_dice::Die;

use crate::channel::{ActorContext, ChannelEvent, RollEvent, RollRequest, RollValues};
use crate::metadata::Audience;

/// Fire-and-forget actions the roll provider's UI accepts.
pub trait RollProvider {
    /// Select one die of the given size for the next roll.
    fn select_die(&mut self, die: Die);
    /// Select where the result is shown; `None` keeps the host's setting.
    fn choose_audience(&mut self, audience: Option<Audience>);
    /// Roll everything selected so far.
    fn submit(&mut self);
}

/// A self-contained roll provider with the same observable contract as the
/// external one: selections accumulate, and `submit` emits a pending and a
/// fulfilled event pair with values grouped by die size, largest die
/// first, in one flat array.
///
/// Seeded for reproducibility, the way the oracle RNG is.
#[derive(Debug)]
pub struct LocalRoller {
    rng: StdRng,
    selected: Vec<Die>,
    audience: Option<Audience>,
    emitted: Vec<ChannelEvent>,
}

impl LocalRoller {
    /// Create a roller with a fixed RNG seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            selected: Vec::new(),
            audience: None,
            emitted: Vec::new(),
        }
    }

    /// Drain every event emitted since the last call, oldest first.
    pub fn take_events(&mut self) -> Vec<ChannelEvent> {
        std::mem::take(&mut self.emitted)
    }

    /// The audience chosen for the most recent submit.
    pub fn audience(&self) -> Option<Audience> {
        self.audience
    }
}

impl RollProvider for LocalRoller {
    fn select_die(&mut self, die: Die) {
        self.selected.push(die);
    }

    fn choose_audience(&mut self, audience: Option<Audience>) {
        self.audience = audience;
    }

    fn submit(&mut self) {
        // group selections by size, largest die first, matching the
        // external provider's notation ("9d20+5d10+1d4")
        let mut counts: BTreeMap<Die, u32> = BTreeMap::new();
        for die in self.selected.drain(..) {
            *counts.entry(die).or_insert(0) += 1;
        }

        let notation = counts
            .iter()
            .rev()
            .map(|(die, count)| format!("{count}{die}"))
            .collect::<Vec<_>>()
            .join("+");

        let mut values = Vec::new();
        for (die, count) in counts.iter().rev() {
            for _ in 0..*count {
                values.push(self.rng.random_range(1..=die.sides()) as i32);
            }
        }

        let roll_id = Uuid::new_v4();
        let pending = RollEvent {
            roll_id,
            timestamp: Utc::now(),
            actor: ActorContext::default(),
            action: "custom".to_string(),
            rolls: vec![RollRequest {
                notation: notation.clone(),
                roll_type: None,
                roll_kind: None,
                result: None,
            }],
        };

        let total: i32 = values.iter().sum();
        let text = values
            .iter()
            .map(i32::to_string)
            .collect::<Vec<_>>()
            .join("+");
        let mut fulfilled = pending.clone();
        fulfilled.timestamp = Utc::now();
        fulfilled.rolls[0].result = Some(RollValues {
            values,
            total,
            text,
            constant: 0,
        });

        self.emitted.push(ChannelEvent::RollPending(pending));
        self.emitted.push(ChannelEvent::RollFulfilled(fulfilled));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_emits_pending_then_fulfilled() {
        let mut roller = LocalRoller::new(7);
        roller.select_die(Die::D20);
        roller.select_die(Die::D20);
        roller.submit();

        let events = roller.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], ChannelEvent::RollPending(_)));
        assert!(matches!(events[1], ChannelEvent::RollFulfilled(_)));
        assert_eq!(events[0].roll_id(), events[1].roll_id());
    }

    #[test]
    fn notation_groups_largest_die_first() {
        let mut roller = LocalRoller::new(7);
        roller.select_die(Die::D4);
        roller.select_die(Die::D20);
        roller.select_die(Die::D20);
        roller.submit();

        let events = roller.take_events();
        let ChannelEvent::RollFulfilled(event) = &events[1] else {
            panic!("expected fulfilled event");
        };
        assert_eq!(event.rolls[0].notation, "2d20+1d4");
    }

    #[test]
    fn values_are_in_range_and_total_is_their_sum() {
        let mut roller = LocalRoller::new(99);
        for _ in 0..10 {
            roller.select_die(Die::D6);
        }
        roller.submit();

        let events = roller.take_events();
        let ChannelEvent::RollFulfilled(event) = &events[1] else {
            panic!("expected fulfilled event");
        };
        let result = event.rolls[0].result.as_ref().unwrap();
        assert_eq!(result.values.len(), 10);
        assert!(result.values.iter().all(|v| (1..=6).contains(v)));
        assert_eq!(result.total, result.values.iter().sum::<i32>());
    }

    #[test]
    fn seeded_rolls_are_deterministic() {
        let roll = |seed| {
            let mut roller = LocalRoller::new(seed);
            roller.select_die(Die::D20);
            roller.submit();
            let events = roller.take_events();
            let ChannelEvent::RollFulfilled(event) = events.into_iter().nth(1).unwrap() else {
                panic!("expected fulfilled event");
            };
            event.rolls[0].result.as_ref().unwrap().values.clone()
        };
        assert_eq!(roll(42), roll(42));
    }

    #[test]
    fn take_events_drains() {
        let mut roller = LocalRoller::new(1);
        roller.select_die(Die::D4);
        roller.submit();
        assert_eq!(roller.take_events().len(), 2);
        assert!(roller.take_events().is_empty());
    }

    #[test]
    fn audience_recorded() {
        let mut roller = LocalRoller::new(1);
        roller.choose_audience(Some(Audience::Everyone));
        assert_eq!(roller.audience(), Some(Audience::Everyone));
    }
}
