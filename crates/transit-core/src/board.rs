//! Card reconciler.
//!
//! The board keeps one [`Card`] per station key, in the order keys were first
//! seen. Every delivery is merged with [`CardBoard::reconcile`]:
//!
//! 1. unknown key → a card is stamped from the template (title/subtitle from
//!    the label, all slots empty) and registered;
//! 2. last-updated and the first four schedule slots are overwritten; slots
//!    with no matching schedule keep whatever they showed before;
//! 3. the first reconciliation of the session clears the loading latch.
//!
//! Overwrites are unconditional unless `keep_newer` is set, so the last
//! delivery wins even when it carries an older timestamp.

use std::collections::HashMap;

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::model::{
    split_label, ScheduleOrigin, ScheduleResult, StationSelection, SCHEDULE_SLOTS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub key: String,
    pub label: String,
    pub title: String,
    pub subtitle: String,
    /// Server timestamp of the last applied result, verbatim.
    pub last_updated: Option<String>,
    pub slots: [Option<String>; SCHEDULE_SLOTS],
    pub origin: Option<ScheduleOrigin>,
}

impl Card {
    fn from_template(key: &str, label: &str) -> Self {
        let (title, subtitle) = split_label(label);
        Self {
            key: key.to_string(),
            label: label.to_string(),
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            last_updated: None,
            slots: Default::default(),
            origin: None,
        }
    }

    pub fn last_updated_at(&self) -> Option<DateTime<FixedOffset>> {
        self.last_updated
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }

    pub fn selection(&self) -> StationSelection {
        StationSelection::new(self.key.clone(), self.label.clone())
    }

    /// True when the card already shows data strictly newer than `created`.
    /// Unparseable timestamps never count as newer.
    fn is_newer_than(&self, created: &str) -> bool {
        match (self.last_updated_at(), DateTime::parse_from_rfc3339(created)) {
            (Some(current), Ok(incoming)) => incoming < current,
            _ => false,
        }
    }

    fn apply(&mut self, result: &ScheduleResult, origin: ScheduleOrigin) {
        self.last_updated = Some(result.created.clone());
        for (slot, schedule) in self.slots.iter_mut().zip(result.schedules.iter()) {
            *slot = Some(schedule.message.clone());
        }
        self.origin = Some(origin);
    }
}

/// What a single reconciliation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    /// A new card was stamped for this key.
    pub created: bool,
    /// The result was written to the card (false only when skipped as stale).
    pub applied: bool,
    /// This was the first applied result of the session.
    pub first_of_session: bool,
}

#[derive(Debug, Clone)]
pub struct CardBoard {
    cards: Vec<Card>,
    index: HashMap<String, usize>,
    loading: bool,
    keep_newer: bool,
}

impl CardBoard {
    pub fn new(keep_newer: bool) -> Self {
        Self {
            cards: Vec::new(),
            index: HashMap::new(),
            loading: true,
            keep_newer,
        }
    }

    pub fn reconcile(&mut self, result: &ScheduleResult, origin: ScheduleOrigin) -> Reconciled {
        let (idx, created) = match self.index.get(&result.key) {
            Some(&idx) => (idx, false),
            None => {
                self.cards.push(Card::from_template(&result.key, &result.label));
                let idx = self.cards.len() - 1;
                self.index.insert(result.key.clone(), idx);
                (idx, true)
            }
        };

        let card = &mut self.cards[idx];
        if self.keep_newer && card.is_newer_than(&result.created) {
            debug!(
                "[board] {} keeps {:?}, skipping older {} ({})",
                result.key,
                card.last_updated,
                result.created,
                origin.label()
            );
            return Reconciled {
                created,
                applied: false,
                first_of_session: false,
            };
        }

        card.apply(result, origin);
        let first_of_session = std::mem::replace(&mut self.loading, false);
        Reconciled {
            created,
            applied: true,
            first_of_session,
        }
    }

    /// True until the first result has been applied.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn get(&self, key: &str) -> Option<&Card> {
        self.index.get(key).map(|&i| &self.cards[i])
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Key and label of every card, in board order.
    pub fn selections(&self) -> Vec<StationSelection> {
        self.cards.iter().map(Card::selection).collect()
    }
}

impl Default for CardBoard {
    fn default() -> Self {
        Self::new(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ScheduleEntry;

    fn result(key: &str, label: &str, created: &str, messages: &[&str]) -> ScheduleResult {
        ScheduleResult {
            key: key.to_string(),
            label: label.to_string(),
            created: created.to_string(),
            schedules: messages
                .iter()
                .map(|m| ScheduleEntry {
                    message: m.to_string(),
                })
                .collect(),
        }
    }

    fn bastille(created: &str, messages: &[&str]) -> ScheduleResult {
        result(
            "metros/1/bastille/A",
            "Bastille, Direction La Défense",
            created,
            messages,
        )
    }

    #[test]
    fn first_result_stamps_card_from_label() {
        let mut board = CardBoard::default();
        let outcome = board.reconcile(
            &ScheduleResult::fallback(&StationSelection::default_station()),
            ScheduleOrigin::Fallback,
        );
        assert!(outcome.created);
        assert!(outcome.first_of_session);

        let card = board.get("metros/1/bastille/A").unwrap();
        assert_eq!(card.title, "Bastille");
        assert_eq!(card.subtitle, "Direction La Défense");
        assert_eq!(
            card.slots,
            [
                Some("0 mn".to_string()),
                Some("2 mn".to_string()),
                Some("5 mn".to_string()),
                None
            ]
        );
    }

    #[test]
    fn same_key_in_either_order_yields_one_card() {
        let a = bastille("2024-01-01T00:00:00Z", &["1 mn"]);
        let b = bastille("2024-01-01T00:05:00Z", &["4 mn", "9 mn"]);

        let mut forward = CardBoard::default();
        forward.reconcile(&a, ScheduleOrigin::Cache);
        forward.reconcile(&b, ScheduleOrigin::Network);

        let mut backward = CardBoard::default();
        backward.reconcile(&b, ScheduleOrigin::Network);
        let second = backward.reconcile(&a, ScheduleOrigin::Cache);

        assert_eq!(forward.len(), 1);
        assert_eq!(backward.len(), 1);
        assert!(!second.created);
    }

    #[test]
    fn short_result_leaves_remaining_slots_untouched() {
        let mut board = CardBoard::default();
        board.reconcile(
            &bastille("2017-07-18T17:08:42+02:00", &["0 mn", "2 mn", "5 mn", "8 mn"]),
            ScheduleOrigin::Fallback,
        );
        board.reconcile(
            &bastille("2024-01-01T00:00:00Z", &["3 mn"]),
            ScheduleOrigin::Network,
        );

        let card = board.get("metros/1/bastille/A").unwrap();
        assert_eq!(card.slots[0].as_deref(), Some("3 mn"));
        assert_eq!(card.slots[1].as_deref(), Some("2 mn"));
        assert_eq!(card.slots[2].as_deref(), Some("5 mn"));
        assert_eq!(card.slots[3].as_deref(), Some("8 mn"));
        assert_eq!(card.last_updated.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(card.origin, Some(ScheduleOrigin::Network));
    }

    #[test]
    fn extra_schedules_are_ignored() {
        let mut board = CardBoard::default();
        board.reconcile(
            &bastille("2024-01-01T00:00:00Z", &["1", "2", "3", "4", "5", "6"]),
            ScheduleOrigin::Network,
        );
        let card = board.get("metros/1/bastille/A").unwrap();
        assert_eq!(card.slots[3].as_deref(), Some("4"));
    }

    #[test]
    fn older_result_still_overwrites_by_default() {
        let mut board = CardBoard::default();
        board.reconcile(&bastille("2024-01-01T00:05:00Z", &["9 mn"]), ScheduleOrigin::Network);
        let outcome =
            board.reconcile(&bastille("2024-01-01T00:00:00Z", &["1 mn"]), ScheduleOrigin::Cache);

        assert!(outcome.applied);
        let card = board.get("metros/1/bastille/A").unwrap();
        assert_eq!(card.slots[0].as_deref(), Some("1 mn"));
        assert_eq!(card.last_updated.as_deref(), Some("2024-01-01T00:00:00Z"));
    }

    #[test]
    fn keep_newer_skips_older_result() {
        let mut board = CardBoard::new(true);
        board.reconcile(&bastille("2024-01-01T00:05:00Z", &["9 mn"]), ScheduleOrigin::Network);
        let outcome =
            board.reconcile(&bastille("2024-01-01T00:00:00Z", &["1 mn"]), ScheduleOrigin::Cache);

        assert!(!outcome.applied);
        let card = board.get("metros/1/bastille/A").unwrap();
        assert_eq!(card.slots[0].as_deref(), Some("9 mn"));
        assert_eq!(card.origin, Some(ScheduleOrigin::Network));
    }

    #[test]
    fn loading_latch_fires_once() {
        let mut board = CardBoard::default();
        assert!(board.is_loading());

        let first = board.reconcile(&bastille("2024-01-01T00:00:00Z", &["1 mn"]), ScheduleOrigin::Network);
        let second = board.reconcile(
            &result("metros/1/foo/B", "Foo, Direction Bar", "2024-01-01T00:00:00Z", &[]),
            ScheduleOrigin::Network,
        );

        assert!(first.first_of_session);
        assert!(!second.first_of_session);
        assert!(second.created);
        assert!(!board.is_loading());
    }

    #[test]
    fn cards_keep_first_seen_order() {
        let mut board = CardBoard::default();
        board.reconcile(
            &result("b", "B, Direction X", "2024-01-01T00:00:00Z", &[]),
            ScheduleOrigin::Network,
        );
        board.reconcile(
            &result("a", "A, Direction Y", "2024-01-01T00:00:00Z", &[]),
            ScheduleOrigin::Network,
        );
        board.reconcile(
            &result("b", "B, Direction X", "2024-01-01T00:01:00Z", &[]),
            ScheduleOrigin::Network,
        );
        let keys: Vec<_> = board.selections().into_iter().map(|s| s.key).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }
}
