//! Persistent station store.
//!
//! Selected stations survive restarts through one of three mechanisms, picked
//! once at startup by [`StationStore::open`]:
//!
//! ```text
//!  Structured : versioned JSON database, one record per key   (preferred)
//!  Flat       : a single TOML sequence under one fixed name   (fallback)
//!  Memory     : nothing on disk; lost on exit                 (last resort)
//! ```
//!
//! Every variant stores at most one record per key. Saving replaces the whole
//! collection; a key saved again keeps its position and takes the new label.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{StoreBackend, StoreConfig};
use crate::error::StoreError;
use crate::model::StationSelection;

pub const STRUCTURED_DB_FILE: &str = "stations.db.json";
pub const STRUCTURED_DB_NAME: &str = "transit-stations";
pub const STRUCTURED_DB_VERSION: u32 = 1;
pub const FLAT_STORE_FILE: &str = "selected_stations.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Structured,
    Flat,
    Memory,
}

impl StoreKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Structured => "structured",
            Self::Flat => "flat",
            Self::Memory => "memory",
        }
    }
}

pub enum StationStore {
    Structured(StructuredStore),
    Flat(FlatStore),
    Memory(MemoryStore),
}

impl StationStore {
    /// Probe the configured backends in order and keep the first that opens.
    /// Never fails: the in-memory store is always available.
    pub async fn open(config: &StoreConfig) -> Self {
        let dir = &config.dir;

        if matches!(config.backend, StoreBackend::Auto | StoreBackend::Structured) {
            let path = dir.join(STRUCTURED_DB_FILE);
            match StructuredStore::open(path.clone()).await {
                Ok(store) => {
                    info!("[store] using structured database {}", path.display());
                    return Self::Structured(store);
                }
                Err(e) => warn!(
                    "[store] structured database {} unavailable: {}",
                    path.display(),
                    e
                ),
            }
        }

        if config.backend != StoreBackend::Memory {
            let path = dir.join(FLAT_STORE_FILE);
            match FlatStore::open(path.clone()).await {
                Ok(store) => {
                    info!("[store] using flat file {}", path.display());
                    return Self::Flat(store);
                }
                Err(e) => warn!("[store] flat file {} unavailable: {}", path.display(), e),
            }
        }

        warn!("[store] selections will not outlive this session");
        Self::Memory(MemoryStore::default())
    }

    pub fn kind(&self) -> StoreKind {
        match self {
            Self::Structured(_) => StoreKind::Structured,
            Self::Flat(_) => StoreKind::Flat,
            Self::Memory(_) => StoreKind::Memory,
        }
    }

    pub async fn load(&self) -> Result<Vec<StationSelection>, StoreError> {
        match self {
            Self::Structured(s) => s.load().await,
            Self::Flat(s) => s.load().await,
            Self::Memory(s) => Ok(s.load()),
        }
    }

    pub async fn save(&mut self, selections: &[StationSelection]) -> Result<(), StoreError> {
        match self {
            Self::Structured(s) => s.save(selections).await,
            Self::Flat(s) => s.save(selections).await,
            Self::Memory(s) => {
                s.save(selections);
                Ok(())
            }
        }
    }
}

/// Collapse repeated keys: first position wins, last label wins.
pub fn dedup_by_key(selections: &[StationSelection]) -> Vec<StationSelection> {
    let mut out: Vec<StationSelection> = Vec::with_capacity(selections.len());
    for sel in selections {
        match out.iter_mut().find(|s| s.key == sel.key) {
            Some(existing) => existing.label = sel.label.clone(),
            None => out.push(sel.clone()),
        }
    }
    out
}

// ── Structured ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct Database {
    name: String,
    version: u32,
    #[serde(default)]
    stations: Vec<StationSelection>,
}

impl Database {
    fn with_stations(stations: Vec<StationSelection>) -> Self {
        Self {
            name: STRUCTURED_DB_NAME.to_string(),
            version: STRUCTURED_DB_VERSION,
            stations,
        }
    }

    fn check_schema(&self) -> Result<(), StoreError> {
        if self.name != STRUCTURED_DB_NAME || self.version > STRUCTURED_DB_VERSION {
            return Err(StoreError::Schema {
                name: self.name.clone(),
                version: self.version,
                expected_name: STRUCTURED_DB_NAME,
                expected_version: STRUCTURED_DB_VERSION,
            });
        }
        Ok(())
    }
}

pub struct StructuredStore {
    path: PathBuf,
}

impl StructuredStore {
    /// Open the database, creating an empty station collection on first use.
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        match tokio::fs::read_to_string(&path).await {
            Ok(content) => {
                let db: Database = serde_json::from_str(&content)?;
                db.check_schema()?;
                debug!("[store] opened database with {} record(s)", db.stations.len());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("[store] creating station database {}", path.display());
                write_atomic(&path, &serde_json::to_vec_pretty(&Database::with_stations(Vec::new()))?)
                    .await?;
            }
            Err(e) => return Err(e.into()),
        }

        Ok(Self { path })
    }

    pub async fn load(&self) -> Result<Vec<StationSelection>, StoreError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let db: Database = serde_json::from_str(&content)?;
        db.check_schema()?;
        Ok(db.stations)
    }

    pub async fn save(&self, selections: &[StationSelection]) -> Result<(), StoreError> {
        let db = Database::with_stations(dedup_by_key(selections));
        write_atomic(&self.path, &serde_json::to_vec_pretty(&db)?).await
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, bytes).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

// ── Flat ──────────────────────────────────────────────────────────────────────

/// Mirrors the TOML `[[selection]]` table array.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FlatFile {
    #[serde(default)]
    selection: Vec<StationSelection>,
}

pub struct FlatStore {
    path: PathBuf,
}

impl FlatStore {
    pub async fn open(path: PathBuf) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(Self { path })
    }

    pub async fn load(&self) -> Result<Vec<StationSelection>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let file: FlatFile = toml::from_str(&content)?;
        Ok(file.selection)
    }

    pub async fn save(&self, selections: &[StationSelection]) -> Result<(), StoreError> {
        let file = FlatFile {
            selection: dedup_by_key(selections),
        };
        tokio::fs::write(&self.path, toml::to_string_pretty(&file)?).await?;
        Ok(())
    }
}

// ── Memory ────────────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    selections: Vec<StationSelection>,
}

impl MemoryStore {
    pub fn load(&self) -> Vec<StationSelection> {
        self.selections.clone()
    }

    pub fn save(&mut self, selections: &[StationSelection]) {
        self.selections = dedup_by_key(selections);
    }
}
