//! GitHub release API interaction

use log::debug;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::error::{PackagerError, Result};

/// GitHub release metadata from API
#[derive(Deserialize, Debug, Clone)]
pub struct GitHubRelease {
    pub tag_name: String,
    pub assets: Vec<GitHubAsset>,
}

/// GitHub release asset metadata
#[derive(Deserialize, Debug, Clone)]
pub struct GitHubAsset {
    /// Human readable annotation; absent on most assets
    #[serde(default)]
    pub label: Option<String>,
    pub browser_download_url: String,
}

impl GitHubRelease {
    /// Asset whose label is exactly `label`
    pub fn asset_labeled(&self, label: &str) -> Option<&GitHubAsset> {
        self.assets
            .iter()
            .find(|a| a.label.as_deref() == Some(label))
    }
}

/// Thin client over the releases endpoints
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base: Url,
}

impl GitHubClient {
    /// Build a client rooted at `api_url` (e.g. `https://api.github.com`)
    pub fn new(api_url: &str) -> Result<Self> {
        // Url::join drops the last path segment unless it ends with '/'
        let normalized = if api_url.ends_with('/') {
            api_url.to_string()
        } else {
            format!("{api_url}/")
        };
        let base = Url::parse(&normalized).map_err(|source| PackagerError::InvalidApiUrl {
            url: api_url.to_string(),
            source,
        })?;

        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| PackagerError::Request {
                url: base.to_string(),
                source,
            })?;

        Ok(Self { http, base })
    }

    /// `GET /repos/{owner}/{project}/releases`, newest first
    pub async fn list_releases(&self, owner: &str, project: &str) -> Result<Vec<GitHubRelease>> {
        let url = self.endpoint(&format!("repos/{owner}/{project}/releases"))?;
        self.get_json(url).await
    }

    /// `GET /repos/{owner}/{project}/releases/latest`
    pub async fn latest_release(&self, owner: &str, project: &str) -> Result<GitHubRelease> {
        let url = self.endpoint(&format!("repos/{owner}/{project}/releases/latest"))?;
        self.get_json(url).await
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base
            .join(path)
            .map_err(|source| PackagerError::InvalidApiUrl {
                url: format!("{}{}", self.base, path),
                source,
            })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        debug!("fetching '{}'", url);

        let response = self
            .http
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|source| PackagerError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(PackagerError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| PackagerError::Request {
                url: url.to_string(),
                source,
            })?;

        serde_json::from_slice(&body).map_err(|source| PackagerError::MalformedResponse {
            url: url.to_string(),
            source,
        })
    }
}
