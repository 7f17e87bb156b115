//! Session controller.
//!
//! `Session` owns everything the board needs between key presses: the open
//! station store, the fetcher, the card board and the current selection list.
//! The UI calls its methods and feeds it every [`ScheduleDelivery`]; nothing
//! else mutates this state.
//!
//! Startup goes through [`plan_startup`]:
//!
//! ```text
//!  store has entries  → Restore  → fetch each
//!  store is empty     → Seed     → show fallback card now, fetch it, persist it
//! ```
//!
//! The same plan applies whichever store variant was opened.

use tracing::{info, warn};

use crate::board::{CardBoard, Reconciled};
use crate::fetcher::Fetcher;
use crate::model::{ScheduleDelivery, ScheduleOrigin, ScheduleResult, StationSelection};
use crate::store::{dedup_by_key, StationStore, StoreKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Startup {
    /// Previously saved selections, deduplicated, in saved order.
    Restore(Vec<StationSelection>),
    /// Nothing saved: start with the default station.
    Seed(StationSelection),
}

pub fn plan_startup(loaded: Vec<StationSelection>) -> Startup {
    let selections = dedup_by_key(&loaded);
    if selections.is_empty() {
        Startup::Seed(StationSelection::default_station())
    } else {
        Startup::Restore(selections)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// The key was already on the board; it was re-fetched instead.
    AlreadySelected,
}

pub struct Session {
    store: StationStore,
    fetcher: Fetcher,
    board: CardBoard,
    selections: Vec<StationSelection>,
}

impl Session {
    pub fn new(store: StationStore, fetcher: Fetcher, board: CardBoard) -> Self {
        Self {
            store,
            fetcher,
            board,
            selections: Vec::new(),
        }
    }

    pub async fn bootstrap(&mut self) -> Startup {
        let loaded = match self.store.load().await {
            Ok(list) => list,
            Err(e) => {
                warn!("[session] could not read saved stations: {}", e);
                Vec::new()
            }
        };

        let loaded_count = loaded.len();
        let plan = plan_startup(loaded);
        match &plan {
            Startup::Restore(list) => {
                info!("[session] restoring {} station(s)", list.len());
                self.selections = list.clone();
                for selection in list {
                    self.fetcher.fetch(selection);
                }
                if list.len() < loaded_count {
                    info!(
                        "[session] dropping {} duplicate record(s) from the store",
                        loaded_count - list.len()
                    );
                    self.persist().await;
                }
            }
            Startup::Seed(default) => {
                info!("[session] no saved stations, seeding {}", default.key);
                self.board
                    .reconcile(&ScheduleResult::fallback(default), ScheduleOrigin::Fallback);
                self.fetcher.fetch(default);
                self.selections = vec![default.clone()];
                self.persist().await;
            }
        }
        plan
    }

    pub fn on_delivery(&mut self, delivery: &ScheduleDelivery) -> Reconciled {
        let outcome = self.board.reconcile(&delivery.result, delivery.origin);
        if outcome.created {
            info!(
                "[session] card {} created from {}",
                delivery.result.key,
                delivery.origin.label()
            );
        }
        outcome
    }

    /// Re-fetch every card on the board. Returns how many fetches started.
    pub fn refresh(&self) -> usize {
        let selections = self.board.selections();
        for selection in &selections {
            self.fetcher.fetch(selection);
        }
        selections.len()
    }

    pub async fn add_station(&mut self, selection: StationSelection) -> AddOutcome {
        self.fetcher.fetch(&selection);

        if self.selections.iter().any(|s| s.key == selection.key) {
            info!("[session] {} already selected, refreshed instead", selection.key);
            return AddOutcome::AlreadySelected;
        }

        info!("[session] adding {}", selection.key);
        self.selections.push(selection);
        self.persist().await;
        AddOutcome::Added
    }

    pub fn board(&self) -> &CardBoard {
        &self.board
    }

    pub fn selections(&self) -> &[StationSelection] {
        &self.selections
    }

    pub fn store_kind(&self) -> StoreKind {
        self.store.kind()
    }

    async fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.selections).await {
            warn!(
                "[session] could not save {} station(s) to {} store: {}",
                self.selections.len(),
                self.store.kind().label(),
                e
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use crate::config::ApiConfig;
    use crate::model::{DEFAULT_STATION_KEY, FALLBACK_MESSAGES};
    use crate::store::{FlatStore, MemoryStore, FLAT_STORE_FILE};
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn session_with(store: StationStore) -> (Session, mpsc::Receiver<ScheduleDelivery>) {
        let (tx, rx) = mpsc::channel(64);
        let api = ApiConfig {
            base_url: "http://127.0.0.1:1/v3/schedules".to_string(),
            ..ApiConfig::default()
        };
        let fetcher = Fetcher::new(&api, ResponseCache::disabled(), tx).unwrap();
        (Session::new(store, fetcher, CardBoard::default()), rx)
    }

    async fn drain(session: &mut Session, rx: &mut mpsc::Receiver<ScheduleDelivery>, n: usize) {
        for _ in 0..n {
            let delivery = tokio::time::timeout(Duration::from_secs(10), rx.recv())
                .await
                .expect("no delivery within 10s")
                .expect("channel closed");
            session.on_delivery(&delivery);
        }
    }

    #[test]
    fn plan_seeds_default_when_empty() {
        assert_eq!(
            plan_startup(Vec::new()),
            Startup::Seed(StationSelection::default_station())
        );
    }

    #[test]
    fn plan_restores_without_duplicates() {
        let loaded = vec![
            StationSelection::new("a", "A, x"),
            StationSelection::new("a", "A, y"),
            StationSelection::new("b", "B, x"),
        ];
        match plan_startup(loaded) {
            Startup::Restore(list) => {
                assert_eq!(list.len(), 2);
                assert_eq!(list[0].label, "A, y");
            }
            other => panic!("expected restore, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_store_shows_default_card_before_any_response() {
        let (mut session, _rx) = session_with(StationStore::Memory(MemoryStore::default()));
        let plan = session.bootstrap().await;
        assert!(matches!(plan, Startup::Seed(_)));

        let board = session.board();
        assert_eq!(board.len(), 1);
        assert!(!board.is_loading());
        let card = board.get(DEFAULT_STATION_KEY).unwrap();
        assert_eq!(card.title, "Bastille");
        assert_eq!(card.subtitle, "Direction La Défense");
        let shown: Vec<_> = card.slots.iter().flatten().map(String::as_str).collect();
        assert_eq!(shown, FALLBACK_MESSAGES);

        let saved = session.store.load().await.unwrap();
        assert_eq!(saved, vec![StationSelection::default_station()]);
    }

    #[tokio::test]
    async fn stored_stations_are_all_fetched() {
        let mut store = StationStore::Memory(MemoryStore::default());
        let saved = vec![
            StationSelection::new("metros/1/foo/B", "Foo, Direction Bar"),
            StationSelection::new("metros/4/cite/R", "Cité, Direction Porte de Clignancourt"),
        ];
        store.save(&saved).await.unwrap();

        let (mut session, mut rx) = session_with(store);
        session.bootstrap().await;
        assert!(session.board().is_loading());
        assert_eq!(session.selections(), saved.as_slice());

        drain(&mut session, &mut rx, 2).await;
        assert_eq!(session.board().len(), 2);
        assert!(session.board().get("metros/1/foo/B").is_some());
        assert!(session.board().get("metros/4/cite/R").is_some());
    }

    #[tokio::test]
    async fn restore_rewrites_store_without_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(FLAT_STORE_FILE);
        std::fs::write(
            &path,
            "[[selection]]\nkey = \"a\"\nlabel = \"A, x\"\n\n\
             [[selection]]\nkey = \"a\"\nlabel = \"A, y\"\n\n\
             [[selection]]\nkey = \"b\"\nlabel = \"B, x\"\n",
        )
        .unwrap();
        let store = StationStore::Flat(FlatStore::open(path).await.unwrap());
        assert_eq!(store.load().await.unwrap().len(), 3);

        let (mut session, _rx) = session_with(store);
        assert!(matches!(session.bootstrap().await, Startup::Restore(_)));
        assert_eq!(session.selections().len(), 2);

        let saved = session.store.load().await.unwrap();
        assert_eq!(saved, session.selections());
    }

    #[tokio::test]
    async fn adding_a_station_creates_its_card_and_persists() {
        let (mut session, mut rx) = session_with(StationStore::Memory(MemoryStore::default()));
        session.bootstrap().await;
        drain(&mut session, &mut rx, 1).await;

        let foo = StationSelection::new("metros/1/foo/B", "Foo, Direction Bar");
        assert_eq!(session.add_station(foo.clone()).await, AddOutcome::Added);
        drain(&mut session, &mut rx, 1).await;

        let card = session.board().get("metros/1/foo/B").unwrap();
        assert_eq!(card.title, "Foo");
        assert_eq!(card.subtitle, "Direction Bar");

        let saved = session.store.load().await.unwrap();
        assert_eq!(saved, vec![StationSelection::default_station(), foo]);
    }

    #[tokio::test]
    async fn adding_a_known_key_does_not_duplicate() {
        let (mut session, mut rx) = session_with(StationStore::Memory(MemoryStore::default()));
        session.bootstrap().await;

        let outcome = session
            .add_station(StationSelection::default_station())
            .await;
        assert_eq!(outcome, AddOutcome::AlreadySelected);
        assert_eq!(session.selections().len(), 1);

        drain(&mut session, &mut rx, 2).await;
        assert_eq!(session.board().len(), 1);
    }

    #[tokio::test]
    async fn refresh_refetches_every_card() {
        let (mut session, mut rx) = session_with(StationStore::Memory(MemoryStore::default()));
        session.bootstrap().await;
        session
            .add_station(StationSelection::new("metros/1/foo/B", "Foo, Direction Bar"))
            .await;
        drain(&mut session, &mut rx, 2).await;

        assert_eq!(session.refresh(), 2);
        drain(&mut session, &mut rx, 2).await;
        assert_eq!(session.board().len(), 2);
    }
}
