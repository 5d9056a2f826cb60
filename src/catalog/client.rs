use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;

use crate::config::CatalogSettings;

use super::model::{Resolution, Track, TrackId};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("track {id} has no playable url")]
    Unresolved { id: TrackId },
}

/// Remote catalog: text search plus resolution of a track to a playable URL.
pub trait Catalog: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<Track>, CatalogError>;
    fn resolve(&self, id: &TrackId) -> Result<String, CatalogError>;
}

/// Catalog served over HTTP as `/api/search?q=` and `/api/track/<id>`.
pub struct HttpCatalog {
    base_url: String,
    client: Client,
}

impl HttpCatalog {
    pub fn new(settings: &CatalogSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms))
            .user_agent(concat!("crescendo/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn search_url(&self, query: &str) -> String {
        format!("{}/api/search?q={}", self.base_url, urlencoding::encode(query))
    }

    pub fn track_url(&self, id: &TrackId) -> String {
        format!("{}/api/track/{}", self.base_url, urlencoding::encode(id.as_str()))
    }

    fn get_text(&self, url: &str) -> Result<String, CatalogError> {
        let network = |source| CatalogError::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(network)
    }
}

impl Catalog for HttpCatalog {
    fn search(&self, query: &str) -> Result<Vec<Track>, CatalogError> {
        let url = self.search_url(query);
        tracing::debug!(%url, "catalog search");
        let body = self.get_text(&url)?;
        parse_search(&url, &body)
    }

    fn resolve(&self, id: &TrackId) -> Result<String, CatalogError> {
        let url = self.track_url(id);
        tracing::debug!(%url, "catalog resolve");
        let body = self.get_text(&url)?;
        let playable = parse_resolution(&url, id, &body)?;
        Ok(absolutize(&self.base_url, &playable))
    }
}

pub(super) fn parse_search(url: &str, body: &str) -> Result<Vec<Track>, CatalogError> {
    serde_json::from_str(body).map_err(|source| CatalogError::Decode {
        url: url.to_string(),
        source,
    })
}

pub(super) fn parse_resolution(url: &str, id: &TrackId, body: &str) -> Result<String, CatalogError> {
    let resolution: Resolution =
        serde_json::from_str(body).map_err(|source| CatalogError::Decode {
            url: url.to_string(),
            source,
        })?;
    resolution
        .playable_url()
        .map(str::to_string)
        .ok_or_else(|| CatalogError::Unresolved { id: id.clone() })
}

/// Resolve a URL the catalog returned relative to itself.
pub(super) fn absolutize(base_url: &str, url: &str) -> String {
    if url.contains("://") {
        return url.to_string();
    }
    if let Some(rest) = url.strip_prefix("//") {
        // Protocol-relative: keep the catalog's scheme.
        let scheme = base_url.split_once("://").map_or("http", |(s, _)| s);
        return format!("{scheme}://{rest}");
    }
    if url.starts_with('/') {
        let origin_end = base_url
            .find("://")
            .and_then(|scheme| base_url[scheme + 3..].find('/').map(|i| scheme + 3 + i))
            .unwrap_or(base_url.len());
        return format!("{}{}", &base_url[..origin_end], url);
    }
    format!("{}/{}", base_url.trim_end_matches('/'), url)
}
