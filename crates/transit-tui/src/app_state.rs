//! AppState: shared read-only data passed to all components during render/event.
//!
//! Components read this but never mutate it. The App event loop refreshes it
//! from the session after every change.

use chrono::{DateTime, Local};

use transit_core::board::Card;
use transit_core::model::StationSelection;
use transit_core::store::StoreKind;

use crate::widgets::status_bar::InputMode;

pub struct AppState {
    // ── Board ──────────────────────────────────────────────────────────────
    /// Snapshot of the session's cards, in board order.
    pub cards: Vec<Card>,
    /// True until the first schedule has been applied.
    pub loading: bool,
    /// Keys the user has selected, including ones still waiting for data.
    pub selected_keys: Vec<String>,
    pub store_kind: StoreKind,

    // ── Add dialog ─────────────────────────────────────────────────────────
    pub catalog: Vec<StationSelection>,

    // ── UI mode ────────────────────────────────────────────────────────────
    pub input_mode: InputMode,
    pub last_refresh: Option<DateTime<Local>>,
}

impl AppState {
    pub fn new(catalog: Vec<StationSelection>, store_kind: StoreKind) -> Self {
        Self {
            cards: Vec::new(),
            loading: true,
            selected_keys: Vec::new(),
            store_kind,
            catalog,
            input_mode: InputMode::Normal,
            last_refresh: None,
        }
    }

    pub fn is_selected(&self, key: &str) -> bool {
        self.selected_keys.iter().any(|k| k == key)
    }
}
