//! In-memory content store for tests.
//!
//! Implements the full provider contract, including the untitled-placeholder
//! dance behind directory creation, so the synchroniser's behaviour against
//! it matches a real contents service. Listing reads can be made to fail per
//! path to exercise the subtree isolation boundaries.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::contents::{
    ContentError, ContentStore, Entry, EntryContent, EntryFormat, EntryKind, GetOptions,
    SaveRequest,
};
use crate::path;

#[derive(Debug, Clone)]
struct Stored {
    kind: EntryKind,
    format: Option<EntryFormat>,
    content: Option<EntryContent>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Stored>,
    failing_reads: HashSet<String>,
    untitled_seq: usize,
}

/// Mutex-guarded map keyed by path. The root (`""`) always exists.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory at `dir_path` directly, ancestors included.
    /// Seeding helper; production code goes through `ensure_dir`.
    pub fn seed_dir(&self, dir_path: &str) {
        let mut inner = self.inner.lock().unwrap();
        let mut current = String::new();
        for segment in path::split(dir_path) {
            current = path::join(&current, segment);
            inner.entries.entry(current.clone()).or_insert(Stored {
                kind: EntryKind::Directory,
                format: None,
                content: None,
            });
        }
    }

    pub fn seed_text_file(&self, file_path: &str, text: &str) {
        self.seed_dir(path::parent(file_path));
        self.inner.lock().unwrap().entries.insert(
            file_path.to_string(),
            Stored {
                kind: EntryKind::File,
                format: Some(EntryFormat::Text),
                content: Some(EntryContent::Text(text.to_string())),
            },
        );
    }

    pub fn seed_notebook(&self, file_path: &str, document: serde_json::Value) {
        self.seed_dir(path::parent(file_path));
        self.inner.lock().unwrap().entries.insert(
            file_path.to_string(),
            Stored {
                kind: EntryKind::Notebook,
                format: Some(EntryFormat::Json),
                content: Some(EntryContent::Json(document)),
            },
        );
    }

    /// Makes every content-bearing `get` of `dir_path` fail, simulating an
    /// unreadable source subtree.
    pub fn fail_reads_of(&self, dir_path: &str) {
        self.inner
            .lock()
            .unwrap()
            .failing_reads
            .insert(dir_path.to_string());
    }

    /// True when an entry of any kind exists at `p`.
    pub fn contains(&self, p: &str) -> bool {
        p.is_empty() || self.inner.lock().unwrap().entries.contains_key(p)
    }

    pub fn kind_of(&self, p: &str) -> Option<EntryKind> {
        self.inner.lock().unwrap().entries.get(p).map(|s| s.kind)
    }

    pub fn content_of(&self, p: &str) -> Option<EntryContent> {
        self.inner
            .lock()
            .unwrap()
            .entries
            .get(p)
            .and_then(|s| s.content.clone())
    }

    /// All stored paths, sorted. Handy for whole-tree assertions.
    pub fn paths(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let mut paths: Vec<String> = inner.entries.keys().cloned().collect();
        paths.sort();
        paths
    }

    fn entry_meta(p: &str, stored: &Stored) -> Entry {
        Entry {
            path: p.to_string(),
            name: path::file_name(p).to_string(),
            kind: stored.kind,
            format: stored.format,
            content: None,
        }
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn get(&self, p: &str, options: GetOptions) -> Result<Entry, ContentError> {
        let inner = self.inner.lock().unwrap();

        if options.content && inner.failing_reads.contains(p) {
            return Err(ContentError::Provider(format!("injected read failure for {p}")));
        }

        let stored = if p.is_empty() {
            Stored {
                kind: EntryKind::Directory,
                format: None,
                content: None,
            }
        } else {
            inner
                .entries
                .get(p)
                .cloned()
                .ok_or_else(|| ContentError::NotFound {
                    path: p.to_string(),
                })?
        };

        let mut entry = Self::entry_meta(p, &stored);
        if options.content {
            entry.content = Some(match stored.kind {
                EntryKind::Directory => {
                    let children = inner
                        .entries
                        .iter()
                        .filter(|(child, _)| path::parent(child) == p && child.as_str() != p)
                        .map(|(child, s)| Self::entry_meta(child, s))
                        .collect();
                    EntryContent::Listing(children)
                }
                _ => stored.content.clone().ok_or_else(|| {
                    ContentError::Provider(format!("entry {p} has no stored content"))
                })?,
            });
        }
        Ok(entry)
    }

    async fn new_untitled(&self, parent: &str, kind: EntryKind) -> Result<Entry, ContentError> {
        let mut inner = self.inner.lock().unwrap();
        if !parent.is_empty() && !inner.entries.contains_key(parent) {
            return Err(ContentError::NotFound {
                path: parent.to_string(),
            });
        }

        inner.untitled_seq += 1;
        let name = match kind {
            EntryKind::Directory => format!("Untitled Folder {}", inner.untitled_seq),
            _ => format!("untitled {}", inner.untitled_seq),
        };
        let p = path::join(parent, &name);
        let stored = Stored {
            kind,
            format: None,
            content: match kind {
                EntryKind::Directory => None,
                _ => Some(EntryContent::Text(String::new())),
            },
        };
        inner.entries.insert(p.clone(), stored.clone());
        Ok(Self::entry_meta(&p, &stored))
    }

    async fn rename(&self, old_path: &str, new_path: &str) -> Result<Entry, ContentError> {
        let mut inner = self.inner.lock().unwrap();
        let stored = inner
            .entries
            .remove(old_path)
            .ok_or_else(|| ContentError::NotFound {
                path: old_path.to_string(),
            })?;

        // Move any descendants along with a renamed directory.
        let old_prefix = format!("{old_path}/");
        let descendants: Vec<String> = inner
            .entries
            .keys()
            .filter(|k| k.starts_with(&old_prefix))
            .cloned()
            .collect();
        for key in descendants {
            let moved = path::join(new_path, path::strip_prefix(&key, old_path));
            let value = inner.entries.remove(&key).unwrap();
            inner.entries.insert(moved, value);
        }

        inner.entries.insert(new_path.to_string(), stored.clone());
        Ok(Self::entry_meta(new_path, &stored))
    }

    async fn save(&self, p: &str, request: SaveRequest) -> Result<Entry, ContentError> {
        let mut inner = self.inner.lock().unwrap();
        let parent = path::parent(p);
        let parent_is_dir = parent.is_empty()
            || matches!(
                inner.entries.get(parent),
                Some(Stored {
                    kind: EntryKind::Directory,
                    ..
                })
            );
        if !parent_is_dir {
            return Err(ContentError::Provider(format!(
                "cannot save {p}: {parent} is not a directory"
            )));
        }

        let stored = Stored {
            kind: request.kind,
            format: Some(request.format),
            content: Some(request.content),
        };
        inner.entries.insert(p.to_string(), stored.clone());
        Ok(Self::entry_meta(p, &stored))
    }
}
