//! HTTP implementation of the content store against a Jupyter contents
//! service (`/api/contents/...`).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::contents::{
    ContentError, ContentStore, Entry, EntryContent, EntryFormat, EntryKind, GetOptions,
    SaveRequest,
};

/// Contents-API client for a running Jupyter server.
pub struct JupyterClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl JupyterClient {
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn contents_url(&self, p: &str) -> String {
        if p.is_empty() {
            format!("{}/api/contents/", self.base_url)
        } else {
            format!("{}/api/contents/{}", self.base_url, p)
        }
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => builder.header(reqwest::header::AUTHORIZATION, format!("token {token}")),
            None => builder,
        }
    }

    async fn check(p: &str, resp: reqwest::Response) -> Result<reqwest::Response, ContentError> {
        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound {
                path: p.to_string(),
            });
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ContentError::Provider(format!(
                "contents API returned HTTP {status} for {p}: {body}"
            )));
        }
        Ok(resp)
    }
}

/// Contents-API model as served on the wire.
#[derive(Debug, Deserialize)]
struct WireEntry {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: EntryKind,
    format: Option<EntryFormat>,
    #[serde(default)]
    content: serde_json::Value,
}

impl WireEntry {
    fn into_entry(self) -> Result<Entry, ContentError> {
        let content = match (&self.kind, self.content) {
            (_, serde_json::Value::Null) => None,
            (EntryKind::Directory, serde_json::Value::Array(rows)) => {
                let children = rows
                    .into_iter()
                    .map(|row| {
                        serde_json::from_value::<WireEntry>(row)
                            .map_err(|e| {
                                ContentError::Provider(format!(
                                    "malformed child in listing of {}: {e}",
                                    self.path
                                ))
                            })
                            .and_then(WireEntry::into_entry)
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Some(EntryContent::Listing(children))
            }
            (_, serde_json::Value::String(text)) => Some(EntryContent::Text(text)),
            (_, value) => Some(EntryContent::Json(value)),
        };
        Ok(Entry {
            path: self.path,
            name: self.name,
            kind: self.kind,
            format: self.format,
            content,
        })
    }
}

#[async_trait]
impl ContentStore for JupyterClient {
    async fn get(&self, p: &str, options: GetOptions) -> Result<Entry, ContentError> {
        let mut req = self
            .http
            .get(self.contents_url(p))
            .query(&[("content", if options.content { "1" } else { "0" })]);
        if let Some(format) = options.format {
            let format = match format {
                EntryFormat::Text => "text",
                EntryFormat::Json => "json",
            };
            req = req.query(&[("format", format)]);
        }
        let resp = Self::check(p, self.request(req).send().await?).await?;
        let wire: WireEntry = resp.json().await?;
        debug!(path = %p, "fetched entry");
        wire.into_entry()
    }

    async fn new_untitled(&self, parent: &str, kind: EntryKind) -> Result<Entry, ContentError> {
        let body = json!({ "type": kind });
        let req = self.http.post(self.contents_url(parent)).json(&body);
        let resp = Self::check(parent, self.request(req).send().await?).await?;
        let wire: WireEntry = resp.json().await?;
        wire.into_entry()
    }

    async fn rename(&self, old_path: &str, new_path: &str) -> Result<Entry, ContentError> {
        let body = json!({ "path": new_path });
        let req = self.http.patch(self.contents_url(old_path)).json(&body);
        let resp = Self::check(old_path, self.request(req).send().await?).await?;
        let wire: WireEntry = resp.json().await?;
        wire.into_entry()
    }

    async fn save(&self, p: &str, request: SaveRequest) -> Result<Entry, ContentError> {
        let content = match request.content {
            EntryContent::Text(text) => serde_json::Value::String(text),
            EntryContent::Json(value) => value,
            EntryContent::Listing(_) => {
                return Err(ContentError::Provider(format!(
                    "cannot save a directory listing at {p}"
                )))
            }
        };
        let body = json!({
            "type": request.kind,
            "format": request.format,
            "content": content,
        });
        let req = self.http.put(self.contents_url(p)).json(&body);
        let resp = Self::check(p, self.request(req).send().await?).await?;
        let wire: WireEntry = resp.json().await?;
        wire.into_entry()
    }
}
