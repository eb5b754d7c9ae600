//! Host content provider contract.
//!
//! This module defines the data model for entries in the workspace content
//! store and the [`ContentStore`] trait every provider implements: the real
//! HTTP client against a Jupyter contents service, the in-memory store used
//! by the test suite, and mockall mocks.
//!
//! The store is the only persistent state in the system. From the
//! synchroniser's point of view it is append-only: entries are created,
//! never overwritten or deleted.
//!
//! Absence is signalled by [`ContentError::NotFound`], not a sentinel value;
//! callers use a failed `get` as their existence probe.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Kind of a content entry. `Notebook` is the structured-document refinement
/// of `File`: its content is a parsed JSON document rather than opaque text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
    Notebook,
}

/// Wire format of an entry's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryFormat {
    Text,
    Json,
}

impl EntryKind {
    /// Format to request when the listing does not carry one: notebooks are
    /// structured JSON, everything else is opaque text.
    pub fn default_format(self) -> EntryFormat {
        match self {
            EntryKind::Notebook => EntryFormat::Json,
            _ => EntryFormat::Text,
        }
    }
}

/// Payload of a fetched entry. Directories fetched with content carry their
/// child listing, mirroring the provider wire shape.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryContent {
    Text(String),
    Json(serde_json::Value),
    Listing(Vec<Entry>),
}

/// One node of the source or destination tree. Ephemeral: fetched per run,
/// never cached across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Slash-delimited path relative to the tree root.
    pub path: String,
    /// Final path segment.
    pub name: String,
    pub kind: EntryKind,
    pub format: Option<EntryFormat>,
    /// Populated only when fetched with `GetOptions::content`.
    pub content: Option<EntryContent>,
}

/// Options for [`ContentStore::get`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GetOptions {
    /// Fetch the entry's payload (file content or directory listing), not
    /// just its metadata.
    pub content: bool,
    /// Decode format to request; provider defaults apply when `None`.
    pub format: Option<EntryFormat>,
}

impl GetOptions {
    /// Metadata-only probe, used for existence checks.
    pub fn probe() -> Self {
        Self::default()
    }

    pub fn with_content() -> Self {
        Self {
            content: true,
            format: None,
        }
    }

    pub fn with_format(format: EntryFormat) -> Self {
        Self {
            content: true,
            format: Some(format),
        }
    }
}

/// Payload for [`ContentStore::save`]: kind, format and content are written
/// verbatim to the destination path.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveRequest {
    pub kind: EntryKind,
    pub format: EntryFormat,
    pub content: EntryContent,
}

/// Errors from a content store provider.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The path does not exist. Expected during existence probes and never
    /// logged as an error.
    #[error("no entry at {path}")]
    NotFound { path: String },

    /// Provider-side failure (storage, permission, malformed response).
    #[error("content provider error: {0}")]
    Provider(String),

    /// Transport failure talking to an HTTP provider.
    #[error("content provider transport error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ContentError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}

/// Async contract of the host content provider.
///
/// There is no "create directory at exact path" primitive: directory creation
/// goes through `new_untitled` (provider-assigned placeholder name) followed
/// by `rename`. See `ensure::ensure_dir`.
///
/// The trait is automocked for tests via the `test-export-mocks` feature.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch the entry at `path`, optionally with its payload. Fails with
    /// [`ContentError::NotFound`] when the path does not exist.
    async fn get(&self, path: &str, options: GetOptions) -> Result<Entry, ContentError>;

    /// Create a placeholder entry of `kind` under `parent`, with a
    /// provider-assigned name. Returns the created entry, whose `path` the
    /// caller typically renames immediately.
    async fn new_untitled(&self, parent: &str, kind: EntryKind) -> Result<Entry, ContentError>;

    /// Rename (move) an entry.
    async fn rename(&self, old_path: &str, new_path: &str) -> Result<Entry, ContentError>;

    /// Write an entry at `path`, creating or replacing it.
    async fn save(&self, path: &str, request: SaveRequest) -> Result<Entry, ContentError>;
}
