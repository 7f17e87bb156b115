mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use tokio::sync::mpsc;

use transit_core::board::CardBoard;
use transit_core::cache::ResponseCache;
use transit_core::catalog;
use transit_core::config::Config;
use transit_core::fetcher::Fetcher;
use transit_core::model::ScheduleDelivery;
use transit_core::session::Session;
use transit_core::store::StationStore;

const LOG_FILE: &str = "transit.log";
const DEFAULT_LOG_FILTER: &str = "debug,hyper_util=warn,reqwest=warn,hyper=warn";

/// Open `transit.log` in the first directory that can hold it.
fn open_log_file(candidates: &[PathBuf]) -> Option<(PathBuf, File)> {
    candidates.iter().find_map(|dir| {
        std::fs::create_dir_all(dir).ok()?;
        let path = dir.join(LOG_FILE);
        let file = OpenOptions::new().create(true).append(true).open(&path).ok()?;
        Some((path, file))
    })
}

fn init_logging() {
    // RUST_LOG overrides; keep HTTP client internals quiet by default.
    let log_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string());
    let candidates = [
        transit_core::platform::data_dir(),
        transit_core::platform::temp_dir().join("transit"),
    ];

    match open_log_file(&candidates) {
        Some((path, file)) => {
            tracing_subscriber::fmt()
                .with_writer(file)
                .with_env_filter(log_filter.as_str())
                .with_ansi(false)
                .init();
            // Print log path to stderr so the operator can tail it immediately.
            eprintln!("transit log: {}", path.display());
        }
        None => {
            // The TUI owns the terminal, so logs are dropped rather than
            // written over the board.
            tracing_subscriber::fmt()
                .with_writer(std::io::sink)
                .with_env_filter(log_filter.as_str())
                .init();
            eprintln!("transit: no writable log directory, logging disabled");
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    tracing::info!("transit starting…");

    // ── Load config ──────────────────────────────────────────────────────────
    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(
            "[config] could not load {}: {}, using defaults",
            Config::config_path().display(),
            e
        );
        Config::default()
    });

    // ── Station store, response cache, catalog ───────────────────────────────
    let store = StationStore::open(&config.store).await;
    let cache = if config.cache.enabled {
        ResponseCache::new(config.cache.dir.clone())
    } else {
        ResponseCache::disabled()
    };
    let catalog = catalog::load_or_builtin(&config.catalog.catalog_toml);

    // ── Fetcher → App delivery channel ──────────────────────────────────────
    let (delivery_tx, delivery_rx) = mpsc::channel::<ScheduleDelivery>(256);
    let fetcher = Fetcher::new(&config.api, cache, delivery_tx)?;

    let session = Session::new(store, fetcher, CardBoard::new(config.board.keep_newer));

    // ── Run TUI ──────────────────────────────────────────────────────────────
    let app = app::App::new(session, catalog);
    app.run(delivery_rx).await?;

    tracing::info!("transit exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_lands_in_first_usable_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let fallback = tmp.path().join("fallback");

        let (path, _file) = open_log_file(&[blocker.join("transit"), fallback.clone()]).unwrap();
        assert_eq!(path, fallback.join(LOG_FILE));
        assert!(path.exists());
    }

    #[test]
    fn no_usable_directory_is_not_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        assert!(open_log_file(&[blocker.join("a"), blocker.join("b")]).is_none());
    }
}
