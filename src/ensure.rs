//! Directory materialisation for the destination store.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::debug;

use crate::contents::{ContentError, ContentStore, EntryKind, GetOptions};
use crate::path;

/// Guarantees that `dir_path` exists as a directory in the store, creating
/// missing ancestors first. Idempotent; the root path is a no-op.
///
/// The provider has no create-at-exact-path primitive, so a missing
/// directory is created as an untitled placeholder under its parent and then
/// renamed into place. Creation and rename errors propagate to the caller;
/// no retry happens here.
pub fn ensure_dir<'a, S>(store: &'a S, dir_path: &'a str) -> BoxFuture<'a, Result<(), ContentError>>
where
    S: ContentStore + ?Sized,
{
    async move {
        if dir_path.is_empty() {
            return Ok(());
        }

        match store.get(dir_path, GetOptions::probe()).await {
            Ok(_) => return Ok(()),
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let parent = path::parent(dir_path);
        if !parent.is_empty() {
            ensure_dir(store, parent).await?;
        }

        let placeholder = store.new_untitled(parent, EntryKind::Directory).await?;
        store.rename(&placeholder.path, dir_path).await?;
        debug!(path = %dir_path, "created directory");
        Ok(())
    }
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn creates_missing_ancestors() {
        let store = MemoryStore::new();

        ensure_dir(&store, "a/b/c").await.unwrap();

        for dir in ["a", "a/b", "a/b/c"] {
            assert_eq!(store.kind_of(dir), Some(EntryKind::Directory));
        }
        // No leftover untitled placeholders.
        let expected: Vec<String> = ["a", "a/b", "a/b/c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(store.paths(), expected);
    }

    #[tokio::test]
    async fn existing_directory_is_left_alone() {
        let store = MemoryStore::new();
        store.seed_dir("a/b");
        let before = store.paths();

        ensure_dir(&store, "a/b").await.unwrap();

        assert_eq!(store.paths(), before);
    }

    #[tokio::test]
    async fn existing_entry_of_any_kind_satisfies_the_probe() {
        let store = MemoryStore::new();
        store.seed_text_file("a", "not a directory");

        ensure_dir(&store, "a").await.unwrap();

        assert_eq!(store.kind_of("a"), Some(EntryKind::File));
    }

    #[tokio::test]
    async fn root_path_is_a_no_op() {
        let store = MemoryStore::new();

        ensure_dir(&store, "").await.unwrap();

        assert!(store.paths().is_empty());
    }
}
