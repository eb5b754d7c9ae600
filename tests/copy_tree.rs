use serde_json::json;

use notebook_sync::contents::{EntryContent, EntryKind};
use notebook_sync::copy::copy_directory;
use notebook_sync::memory::MemoryStore;

#[tokio::test]
async fn copies_tree_and_precreates_directories() {
    let store = MemoryStore::new();
    store.seed_notebook("files/intro.ipynb", json!({"cells": []}));
    store.seed_text_file("files/data/sample.csv", "a,b\n1,2\n");

    let report = copy_directory(&store, "files", "notebooks").await.unwrap();

    assert_eq!(store.kind_of("notebooks"), Some(EntryKind::Directory));
    assert_eq!(store.kind_of("notebooks/data"), Some(EntryKind::Directory));
    assert_eq!(
        store.content_of("notebooks/intro.ipynb"),
        Some(EntryContent::Json(json!({"cells": []})))
    );
    assert_eq!(
        store.content_of("notebooks/data/sample.csv"),
        Some(EntryContent::Text("a,b\n1,2\n".to_string()))
    );
    assert_eq!(report.copied.len(), 2);
    assert_eq!(report.skipped, 0);
}

#[tokio::test]
async fn existing_destination_entry_is_preserved() {
    let store = MemoryStore::new();
    store.seed_text_file("files/notes.txt", "shipped content");
    store.seed_text_file("notebooks/notes.txt", "user edited this");

    let report = copy_directory(&store, "files", "notebooks").await.unwrap();

    assert_eq!(
        store.content_of("notebooks/notes.txt"),
        Some(EntryContent::Text("user edited this".to_string()))
    );
    assert!(report.copied.is_empty());
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn second_run_is_a_no_op() {
    let store = MemoryStore::new();
    store.seed_notebook("files/intro.ipynb", json!({"cells": []}));
    store.seed_text_file("files/data/sample.csv", "a,b\n");

    let first = copy_directory(&store, "files", "notebooks").await.unwrap();
    assert_eq!(first.copied.len(), 2);
    let after_first = store.paths();

    let second = copy_directory(&store, "files", "notebooks").await.unwrap();
    assert!(second.copied.is_empty());
    assert_eq!(second.skipped, 2);
    assert_eq!(store.paths(), after_first);
}

#[tokio::test]
async fn unreadable_subtree_does_not_block_siblings() {
    let store = MemoryStore::new();
    store.seed_text_file("files/bad/x.txt", "unreachable");
    store.seed_text_file("files/good/y.txt", "copied anyway");
    store.fail_reads_of("files/bad");

    let report = copy_directory(&store, "files", "notebooks").await.unwrap();

    assert_eq!(
        store.content_of("notebooks/good/y.txt"),
        Some(EntryContent::Text("copied anyway".to_string()))
    );
    assert!(!store.contains("notebooks/bad/x.txt"));
    assert_eq!(report.copied, vec!["notebooks/good/y.txt".to_string()]);
}

#[tokio::test]
async fn notebook_kind_and_format_survive_the_copy() {
    let store = MemoryStore::new();
    let document = json!({"cells": [{"cell_type": "markdown", "source": "# hi"}]});
    store.seed_notebook("files/deep/dive.ipynb", document.clone());

    copy_directory(&store, "files", "notebooks").await.unwrap();

    assert_eq!(
        store.kind_of("notebooks/deep/dive.ipynb"),
        Some(EntryKind::Notebook)
    );
    assert_eq!(
        store.content_of("notebooks/deep/dive.ipynb"),
        Some(EntryContent::Json(document))
    );
}

#[tokio::test]
async fn non_directory_source_is_a_no_op() {
    let store = MemoryStore::new();
    store.seed_text_file("files", "actually a file");

    let report = copy_directory(&store, "files", "notebooks").await.unwrap();

    assert!(report.copied.is_empty());
    // The destination directory is still materialised before the source is
    // inspected.
    assert_eq!(store.kind_of("notebooks"), Some(EntryKind::Directory));
}

#[tokio::test]
async fn missing_source_tree_is_logged_and_skipped() {
    let store = MemoryStore::new();

    let report = copy_directory(&store, "files", "notebooks").await.unwrap();

    assert!(report.copied.is_empty());
    assert_eq!(report.skipped, 0);
}
