//! Ingestion of remotely listed notebooks into the destination store.

use tracing::{debug, error, info};

use crate::contents::{
    ContentError, ContentStore, EntryContent, EntryFormat, EntryKind, GetOptions, SaveRequest,
};
use crate::ensure::ensure_dir;
use crate::github::RemoteRepo;
use crate::path;

/// What one ingest pass did.
#[derive(Debug, Default)]
pub struct IngestReport {
    pub ingested: Vec<String>,
    pub skipped: usize,
}

/// Lists `src_dir` of `repo` remotely and writes every notebook the
/// destination lacks under `dst_root`, preserving the path relative to
/// `src_dir`.
///
/// A listing failure abandons the whole pass (logged, empty report); a fetch
/// or parse failure for one notebook is logged and skips only that notebook.
/// Notebooks already present at the destination are never downloaded.
/// Store write failures propagate.
pub async fn ingest_remote<S, R>(
    store: &S,
    remote: &R,
    repo: &str,
    src_dir: &str,
    dst_root: &str,
) -> Result<IngestReport, ContentError>
where
    S: ContentStore + ?Sized,
    R: RemoteRepo + ?Sized,
{
    let mut report = IngestReport::default();

    let refs = match remote.list_notebooks(repo, src_dir).await {
        Ok(refs) => refs,
        Err(err) => {
            error!(repo = %repo, dir = %src_dir, error = %err, "remote listing failed, skipping ingest");
            return Ok(report);
        }
    };
    info!(repo = %repo, dir = %src_dir, count = refs.len(), "remote listing fetched");

    for file_ref in refs {
        let rel_path = path::strip_prefix(&file_ref.path, src_dir);
        let dst_path = path::join(dst_root, rel_path);

        match store.get(&dst_path, GetOptions::probe()).await {
            Ok(_) => {
                debug!(path = %dst_path, "destination exists, keeping it");
                report.skipped += 1;
                continue;
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }

        let notebook = match remote.fetch_notebook(&file_ref.download_url).await {
            Ok(json) => json,
            Err(err) => {
                error!(url = %file_ref.download_url, error = %err, "notebook download failed, skipping file");
                continue;
            }
        };

        ensure_dir(store, path::parent(&dst_path)).await?;
        store
            .save(
                &dst_path,
                SaveRequest {
                    kind: EntryKind::Notebook,
                    format: EntryFormat::Json,
                    content: EntryContent::Json(notebook),
                },
            )
            .await?;
        debug!(path = %dst_path, "ingested notebook");
        report.ingested.push(dst_path);
    }

    info!(
        repo = %repo,
        ingested = report.ingested.len(),
        skipped = report.skipped,
        "ingest pass complete"
    );
    Ok(report)
}
