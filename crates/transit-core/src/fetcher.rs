//! Schedule fetcher.
//!
//! `fetch` is fire-and-forget: it spawns a cache lookup and a live request
//! for one station and returns at once. Each path sends its own
//! [`ScheduleDelivery`] down the channel when it finishes:
//!
//! ```text
//!  cache hit        → Cache     (only if an entry exists for this exact URL)
//!  HTTP 200 + body  → Network   (body is written back to the cache)
//!  anything else    → Fallback  (hardcoded schedule for the requested key)
//! ```
//!
//! The two paths are not coordinated. Whichever lands last is what the card
//! shows; a slow cache read can overwrite a fresher live result.

use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::cache::ResponseCache;
use crate::config::ApiConfig;
use crate::error::FetchError;
use crate::model::{
    ScheduleDelivery, ScheduleOrigin, ScheduleResponse, ScheduleResult, StationSelection,
};

#[derive(Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    base_url: String,
    cache: ResponseCache,
    tx: mpsc::Sender<ScheduleDelivery>,
}

impl Fetcher {
    pub fn new(
        api: &ApiConfig,
        cache: ResponseCache,
        tx: mpsc::Sender<ScheduleDelivery>,
    ) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder().user_agent(api.user_agent.clone());
        if let Some(secs) = api.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            cache,
            tx,
        })
    }

    pub fn schedule_url(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key.trim_start_matches('/'))
    }

    pub fn fetch(&self, selection: &StationSelection) {
        let url = self.schedule_url(&selection.key);
        info!("[fetch] {} ({})", selection.key, url);

        if self.cache.is_enabled() {
            let cache = self.cache.clone();
            let tx = self.tx.clone();
            let selection = selection.clone();
            let url = url.clone();
            tokio::spawn(async move {
                let Some(body) = cache.lookup(&url).await else {
                    return;
                };
                match serde_json::from_str::<ScheduleResponse>(&body) {
                    Ok(response) => {
                        debug!("[fetch] {} served from cache", selection.key);
                        let result =
                            ScheduleResult::from_response(&selection.key, &selection.label, &response);
                        let _ = tx
                            .send(ScheduleDelivery {
                                result,
                                origin: ScheduleOrigin::Cache,
                            })
                            .await;
                    }
                    Err(e) => debug!("[fetch] ignoring cached body for {}: {}", selection.key, e),
                }
            });
        }

        let client = self.client.clone();
        let cache = self.cache.clone();
        let tx = self.tx.clone();
        let selection = selection.clone();
        tokio::spawn(async move {
            let delivery = match fetch_live(&client, &url).await {
                Ok((response, body)) => {
                    if let Err(e) = cache.store(&url, &body).await {
                        warn!("[cache] could not store {}: {}", url, e);
                    }
                    ScheduleDelivery {
                        result: ScheduleResult::from_response(
                            &selection.key,
                            &selection.label,
                            &response,
                        ),
                        origin: ScheduleOrigin::Network,
                    }
                }
                Err(e) => {
                    warn!("[fetch] {} failed, showing fallback: {}", selection.key, e);
                    ScheduleDelivery {
                        result: ScheduleResult::fallback(&selection),
                        origin: ScheduleOrigin::Fallback,
                    }
                }
            };
            let _ = tx.send(delivery).await;
        });
    }
}

/// One GET against the schedules endpoint. Returns the parsed body together
/// with the raw text so it can be cached verbatim.
pub async fn fetch_live(
    client: &reqwest::Client,
    url: &str,
) -> Result<(ScheduleResponse, String), FetchError> {
    let response = client
        .get(url)
        .header("Accept", "application/json")
        .send()
        .await?;

    let status = response.status();
    if status != StatusCode::OK {
        return Err(FetchError::Status(status));
    }

    let body = response.text().await?;
    let parsed: ScheduleResponse = serde_json::from_str(&body)?;
    Ok((parsed, body))
}
