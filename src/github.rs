//! Remote repository listing and raw-content download.
//!
//! One GitHub contents-API call lists a single directory (non-recursive by
//! contract: the notebook directory is known to be flat, and recursing would
//! change which paths get fetched). File bodies are downloaded lazily, only
//! for paths the destination store lacks.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Default GitHub API endpoint; overridable for tests.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Extension of the structured-document files this system ingests.
pub const NOTEBOOK_EXT: &str = ".ipynb";

/// A remotely discoverable file, identified without its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFileRef {
    /// Path within the repository (e.g. `docs/01_intro.ipynb`).
    pub path: String,
    /// URL serving the raw file body.
    pub download_url: String,
}

/// Errors from the remote repository API.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("remote transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("remote body is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Async contract for the remote notebook source. Automocked for tests so
/// the no-download-when-destination-exists property can be asserted.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait RemoteRepo: Send + Sync {
    /// Non-recursive listing of `dir_path` in `repo` (an `owner/name` pair),
    /// filtered to notebook files.
    async fn list_notebooks(
        &self,
        repo: &str,
        dir_path: &str,
    ) -> Result<Vec<RemoteFileRef>, RemoteError>;

    /// Download and parse one notebook body. A malformed body fails loudly;
    /// per-file recovery is the ingester's concern, not this method's.
    async fn fetch_notebook(&self, download_url: &str) -> Result<serde_json::Value, RemoteError>;
}

/// One row of the GitHub contents-API listing, as served on the wire.
#[derive(Debug, Deserialize)]
pub struct RawListingRow {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub path: String,
    /// Null for directories and submodules.
    pub download_url: Option<String>,
}

/// Keeps the file rows whose name carries the notebook extension and
/// projects them to [`RemoteFileRef`]s. Directories and non-notebook files
/// are dropped.
pub fn filter_notebook_rows(rows: Vec<RawListingRow>) -> Vec<RemoteFileRef> {
    rows.into_iter()
        .filter(|row| row.kind == "file" && row.name.ends_with(NOTEBOOK_EXT))
        .filter_map(|row| {
            row.download_url.map(|download_url| RemoteFileRef {
                path: row.path,
                download_url,
            })
        })
        .collect()
}

/// GitHub-backed [`RemoteRepo`] over reqwest.
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
}

impl GitHubClient {
    pub fn new() -> Self {
        Self::with_api_base(GITHUB_API_BASE)
    }

    /// Point the client at a different API root, e.g. a local fake.
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteRepo for GitHubClient {
    async fn list_notebooks(
        &self,
        repo: &str,
        dir_path: &str,
    ) -> Result<Vec<RemoteFileRef>, RemoteError> {
        let url = format!("{}/repos/{}/contents/{}?ref=main", self.api_base, repo, dir_path);
        info!(url = %url, "listing remote directory");

        let resp = self
            .http
            .get(&url)
            .header(reqwest::header::USER_AGENT, "notebook-sync")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let rows: Vec<RawListingRow> = resp.json().await?;
        Ok(filter_notebook_rows(rows))
    }

    async fn fetch_notebook(&self, download_url: &str) -> Result<serde_json::Value, RemoteError> {
        let resp = self
            .http
            .get(download_url)
            .header(reqwest::header::USER_AGENT, "notebook-sync")
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(RemoteError::Status {
                url: download_url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(kind: &str, name: &str, path: &str, download_url: Option<&str>) -> RawListingRow {
        RawListingRow {
            kind: kind.to_string(),
            name: name.to_string(),
            path: path.to_string(),
            download_url: download_url.map(str::to_string),
        }
    }

    #[test]
    fn keeps_only_notebook_files() {
        let rows = vec![
            row("file", "a.ipynb", "docs/a.ipynb", Some("https://raw/a")),
            row("file", "b.txt", "docs/b.txt", Some("https://raw/b")),
            row("dir", "sub", "docs/sub", None),
        ];
        let refs = filter_notebook_rows(rows);
        assert_eq!(
            refs,
            vec![RemoteFileRef {
                path: "docs/a.ipynb".to_string(),
                download_url: "https://raw/a".to_string(),
            }]
        );
    }

    #[test]
    fn drops_notebook_rows_without_download_url() {
        let rows = vec![row("file", "a.ipynb", "docs/a.ipynb", None)];
        assert!(filter_notebook_rows(rows).is_empty());
    }

    #[test]
    fn listing_rows_deserialize_from_api_shape() {
        let body = r#"[
            {"type": "file", "name": "a.ipynb", "path": "docs/a.ipynb",
             "download_url": "https://raw.example/a.ipynb", "size": 12},
            {"type": "dir", "name": "img", "path": "docs/img", "download_url": null}
        ]"#;
        let rows: Vec<RawListingRow> = serde_json::from_str(body).unwrap();
        assert_eq!(rows.len(), 2);
        let refs = filter_notebook_rows(rows);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].path, "docs/a.ipynb");
    }
}
