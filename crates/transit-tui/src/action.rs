//! Action enum: user intents flowing from components to the App.

use transit_core::model::StationSelection;

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    CardGrid,
    AddStation,
    HelpOverlay,
}

/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // ── Board ────────────────────────────────────────────────────────────────
    Refresh,
    OpenAdd,
    CloseAdd,
    AddStation(StationSelection),

    // ── UI toggles ───────────────────────────────────────────────────────────
    ToggleHelp,
    ToggleKeys,

    // ── System ───────────────────────────────────────────────────────────────
    Quit,
}
