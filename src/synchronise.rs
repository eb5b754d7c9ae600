//! Two-phase synchronisation pipeline: bundled assets first, remote
//! notebooks second.

use std::future::Future;

use tracing::{error, info};

use crate::contents::{ContentError, ContentStore};
use crate::copy::{copy_directory, CopyReport};
use crate::github::RemoteRepo;
use crate::ingest::{ingest_remote, IngestReport};

/// Where to sync from and to. Both sources land under `workspace_root`.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Root of the bundled asset tree inside the content store.
    pub local_assets_root: String,
    /// Destination root inside the content store.
    pub workspace_root: String,
    /// Remote repository, as an `owner/name` pair.
    pub repo: String,
    /// Directory within the remote repository holding the notebooks.
    pub remote_dir: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            local_assets_root: "files".to_string(),
            workspace_root: "notebooks".to_string(),
            repo: "arogozhnikov/einops".to_string(),
            remote_dir: "docs".to_string(),
        }
    }
}

/// Combined report of both phases.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub copy: CopyReport,
    pub ingest: IngestReport,
}

/// Runs the full pipeline once: await host readiness, merge-copy the bundled
/// asset tree into the workspace, then ingest remote notebooks.
///
/// The copy phase runs inside a failure boundary: its error is logged and
/// the pipeline continues, so a broken bundled tree never blocks remote
/// ingestion. The ingest phase carries its own internal boundaries; only a
/// destination write failure escapes and aborts the run.
pub async fn synchronise<S, R>(
    ready: impl Future<Output = ()> + Send,
    store: &S,
    remote: &R,
    config: &SyncConfig,
) -> Result<SyncReport, ContentError>
where
    S: ContentStore + ?Sized,
    R: RemoteRepo + ?Sized,
{
    ready.await;
    info!(
        assets = %config.local_assets_root,
        workspace = %config.workspace_root,
        repo = %config.repo,
        "starting synchronisation"
    );

    let copy = match copy_directory(store, &config.local_assets_root, &config.workspace_root).await
    {
        Ok(report) => report,
        Err(err) => {
            error!(error = %err, "copying bundled assets failed, continuing with remote ingest");
            CopyReport::default()
        }
    };

    let ingest = ingest_remote(
        store,
        remote,
        &config.repo,
        &config.remote_dir,
        &config.workspace_root,
    )
    .await?;

    info!("synchronisation complete");
    Ok(SyncReport { copy, ingest })
}
