use serde::{Deserialize, Serialize};

/// Key of the station shown when nothing has been selected yet.
pub const DEFAULT_STATION_KEY: &str = "metros/1/bastille/A";
pub const DEFAULT_STATION_LABEL: &str = "Bastille, Direction La Défense";

/// Timestamp and messages of the synthetic schedule shown before (or instead
/// of) a live response.
pub const FALLBACK_CREATED: &str = "2017-07-18T17:08:42+02:00";
pub const FALLBACK_MESSAGES: [&str; 3] = ["0 mn", "2 mn", "5 mn"];

/// Number of schedule slots on a card.
pub const SCHEDULE_SLOTS: usize = 4;

/// A station/line/direction the user chose to follow.
///
/// `key` is the identity: an opaque API path such as `metros/1/bastille/A`.
/// `label` reads as `"Station, Direction"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StationSelection {
    pub key: String,
    pub label: String,
}

impl StationSelection {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }

    pub fn default_station() -> Self {
        Self::new(DEFAULT_STATION_KEY, DEFAULT_STATION_LABEL)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub message: String,
}

/// Departures for one station as delivered to the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleResult {
    pub key: String,
    pub label: String,
    /// Server-issued ISO-8601 timestamp, kept verbatim.
    pub created: String,
    pub schedules: Vec<ScheduleEntry>,
}

impl ScheduleResult {
    /// Build a result from a transit API body. Cached and live bodies both go
    /// through here so the two paths cannot drift apart.
    pub fn from_response(key: &str, label: &str, response: &ScheduleResponse) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            created: response.metadata.date.clone(),
            schedules: response.result.schedules.clone(),
        }
    }

    /// The hardcoded schedule used for first paint and when a live fetch fails.
    pub fn fallback(selection: &StationSelection) -> Self {
        Self {
            key: selection.key.clone(),
            label: selection.label.clone(),
            created: FALLBACK_CREATED.to_string(),
            schedules: FALLBACK_MESSAGES
                .iter()
                .map(|m| ScheduleEntry {
                    message: m.to_string(),
                })
                .collect(),
        }
    }

    pub fn selection(&self) -> StationSelection {
        StationSelection::new(self.key.clone(), self.label.clone())
    }
}

/// Where a delivered result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOrigin {
    /// A previously stored response for the exact same request URL.
    Cache,
    /// A fresh HTTP 200 response.
    Network,
    /// Synthetic data substituted for a failed request.
    Fallback,
}

impl ScheduleOrigin {
    pub fn label(self) -> &'static str {
        match self {
            Self::Cache => "cache",
            Self::Network => "network",
            Self::Fallback => "fallback",
        }
    }
}

/// One message from the fetcher to whoever reconciles cards.
#[derive(Debug, Clone)]
pub struct ScheduleDelivery {
    pub result: ScheduleResult,
    pub origin: ScheduleOrigin,
}

// ── Wire format ───────────────────────────────────────────────────────────────

/// Body of `GET /v3/schedules/{key}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(rename = "_metadata")]
    pub metadata: ResponseMetadata,
    pub result: ResponseResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseResult {
    #[serde(default)]
    pub schedules: Vec<ScheduleEntry>,
}

/// Split `"Station, Direction"` on the first `", "`.
/// A label without the separator is all title.
pub fn split_label(label: &str) -> (&str, &str) {
    label.split_once(", ").unwrap_or((label, ""))
}
