//! Stations offered by the add-station dialog.

use std::path::Path;

use tracing::{info, warn};

use crate::model::StationSelection;

const BUILTIN: &[(&str, &str)] = &[
    ("metros/1/bastille/A", "Bastille, Direction La Défense"),
    ("metros/1/bastille/R", "Bastille, Direction Château de Vincennes"),
    ("metros/1/chatelet/A", "Châtelet, Direction La Défense"),
    ("metros/1/chatelet/R", "Châtelet, Direction Château de Vincennes"),
    ("metros/2/anvers/A", "Anvers, Direction Nation"),
    ("metros/2/anvers/R", "Anvers, Direction Porte Dauphine"),
    ("metros/4/cite/A", "Cité, Direction Bagneux"),
    ("metros/4/cite/R", "Cité, Direction Porte de Clignancourt"),
    ("metros/6/pasteur/A", "Pasteur, Direction Nation"),
    ("metros/6/pasteur/R", "Pasteur, Direction Charles de Gaulle - Étoile"),
    ("metros/8/madeleine/A", "Madeleine, Direction Pointe du Lac"),
    ("metros/8/madeleine/R", "Madeleine, Direction Balard"),
    ("rers/A/auber/A", "Auber, Direction Marne-la-Vallée"),
    ("rers/A/auber/R", "Auber, Direction Saint-Germain-en-Laye"),
];

pub fn builtin() -> Vec<StationSelection> {
    BUILTIN
        .iter()
        .map(|(key, label)| StationSelection::new(*key, *label))
        .collect()
}

/// Matches the TOML `[[station]]` table of `catalog.toml`.
#[derive(Debug, serde::Deserialize)]
struct CatalogFile {
    #[serde(default)]
    station: Vec<StationSelection>,
}

pub fn parse_catalog_toml_str(content: &str) -> anyhow::Result<Vec<StationSelection>> {
    let file: CatalogFile = toml::from_str(content)?;
    Ok(file.station)
}

pub fn load_catalog_toml(path: &Path) -> anyhow::Result<Vec<StationSelection>> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog_toml_str(&content)
}

/// The user's catalog file when present and non-empty, otherwise the
/// built-in list.
pub fn load_or_builtin(path: &Path) -> Vec<StationSelection> {
    if !path.exists() {
        return builtin();
    }
    match load_catalog_toml(path) {
        Ok(stations) if !stations.is_empty() => {
            info!("[catalog] {} station(s) from {}", stations.len(), path.display());
            stations
        }
        Ok(_) => {
            warn!("[catalog] {} lists no stations, using built-in list", path.display());
            builtin()
        }
        Err(e) => {
            warn!("[catalog] could not read {}: {}", path.display(), e);
            builtin()
        }
    }
}
