//! Concurrent playlist download, parse and merge

use std::collections::HashSet;
use std::thread;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::{FetchError, IngestError};
use crate::m3u_parser::parse_m3u;
use crate::models::{Catalog, Channel, PlaylistSource};

/// Retrieves the raw text of a playlist. Implemented over HTTP for the app
/// and by in-memory fakes in tests.
pub trait PlaylistFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// HTTP(S) fetcher backed by a shared ureq agent
pub struct HttpFetcher {
    agent: ureq::Agent,
    user_agent: String,
}

impl HttpFetcher {
    pub fn new(config: &AppConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.request_timeout_secs)))
            .timeout_connect(Some(Duration::from_secs(config.connect_timeout_secs)))
            .build()
            .new_agent();

        Self {
            agent,
            user_agent: config.user_agent.clone(),
        }
    }
}

impl PlaylistFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .call()?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status().as_u16()));
        }

        response
            .body_mut()
            .read_to_string()
            .map_err(|e| FetchError::Body(e.to_string()))
    }
}

/// Fetch every source concurrently and merge the results into one catalog.
///
/// A failing source contributes no channels. The run only fails when every
/// source failed. Nothing is merged until all fetches have settled.
pub fn ingest(sources: &[PlaylistSource], fetcher: &dyn PlaylistFetcher) -> Result<Catalog, IngestError> {
    if sources.is_empty() {
        return Err(IngestError::NoSources);
    }

    let parsed: Vec<Option<Vec<Channel>>> = thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| {
                scope.spawn(move || {
                    fetcher
                        .fetch(&source.url)
                        .map(|text| parse_m3u(&text, &source.language))
                })
            })
            .collect();

        handles
            .into_iter()
            .zip(sources)
            .map(|(handle, source)| match handle.join() {
                Ok(Ok(channels)) => Some(channels),
                Ok(Err(e)) => {
                    warn!(url = %source.url, error = %e, "Playlist source failed");
                    None
                }
                Err(_) => {
                    warn!(url = %source.url, "Playlist fetch thread panicked");
                    None
                }
            })
            .collect()
    });

    let loaded = parsed.iter().filter(|p| p.is_some()).count();
    if loaded == 0 {
        return Err(IngestError::AllSourcesFailed {
            attempted: sources.len(),
        });
    }

    let channels = merge_sources(parsed.into_iter().flatten());
    info!(
        sources = sources.len(),
        loaded,
        channels = channels.len(),
        "Catalog loaded"
    );
    Ok(channels.into())
}

/// Concatenate per-source channel lists in order, keeping the first
/// channel seen for each id
pub fn merge_sources<I>(lists: I) -> Vec<Channel>
where
    I: IntoIterator<Item = Vec<Channel>>,
{
    let mut seen = HashSet::new();
    let mut merged = Vec::new();
    for channel in lists.into_iter().flatten() {
        if seen.insert(channel.id.clone()) {
            merged.push(channel);
        }
    }
    merged
}
