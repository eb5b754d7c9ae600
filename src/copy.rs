//! Recursive merge-copy of one store subtree into another.

use futures::future::BoxFuture;
use futures::FutureExt;
use tracing::{debug, error, info};

use crate::contents::{ContentError, ContentStore, EntryContent, EntryKind, GetOptions, SaveRequest};
use crate::ensure::ensure_dir;
use crate::path;

/// What one copy pass did: every path written, and how many destination
/// entries were left untouched because they already existed.
#[derive(Debug, Default)]
pub struct CopyReport {
    pub copied: Vec<String>,
    pub skipped: usize,
}

/// Recursively mirrors `src_dir` into `dst_dir` within the same store.
///
/// Destination files that already exist are skipped unconditionally so user
/// edits survive re-runs. A subtree whose listing cannot be read is logged
/// and abandoned without affecting its siblings; write failures propagate.
pub async fn copy_directory<S>(
    store: &S,
    src_dir: &str,
    dst_dir: &str,
) -> Result<CopyReport, ContentError>
where
    S: ContentStore + ?Sized,
{
    let mut report = CopyReport::default();
    copy_into(store, src_dir, dst_dir, &mut report).await?;
    info!(
        src = %src_dir,
        dst = %dst_dir,
        copied = report.copied.len(),
        skipped = report.skipped,
        "copy pass complete"
    );
    Ok(report)
}

fn copy_into<'a, S>(
    store: &'a S,
    src_dir: &'a str,
    dst_dir: &'a str,
    report: &'a mut CopyReport,
) -> BoxFuture<'a, Result<(), ContentError>>
where
    S: ContentStore + ?Sized,
{
    async move {
        ensure_dir(store, dst_dir).await?;

        let listing = match store.get(src_dir, GetOptions::with_content()).await {
            Ok(entry) => entry,
            Err(err) => {
                error!(src = %src_dir, error = %err, "unable to read source directory, skipping subtree");
                return Ok(());
            }
        };
        if listing.kind != EntryKind::Directory {
            return Ok(());
        }
        let children = match listing.content {
            Some(EntryContent::Listing(children)) => children,
            _ => return Ok(()),
        };

        for child in children {
            let src_path = path::join(src_dir, &child.name);
            let dst_path = path::join(dst_dir, &child.name);

            if child.kind == EntryKind::Directory {
                copy_into(store, &src_path, &dst_path, report).await?;
                continue;
            }

            match store.get(&dst_path, GetOptions::probe()).await {
                Ok(_) => {
                    debug!(path = %dst_path, "destination exists, keeping it");
                    report.skipped += 1;
                    continue;
                }
                Err(err) if err.is_not_found() => {}
                Err(err) => return Err(err),
            }

            let format = child.format.unwrap_or_else(|| child.kind.default_format());
            let full = store.get(&src_path, GetOptions::with_format(format)).await?;

            let content = full.content.ok_or_else(|| {
                ContentError::Provider(format!("provider returned {src_path} without content"))
            })?;
            let format = full.format.unwrap_or(format);

            // The destination directory was ensured at subtree entry; ensure
            // it again in case a prior partial run or the provider moved it.
            ensure_dir(store, dst_dir).await?;
            store
                .save(
                    &dst_path,
                    SaveRequest {
                        kind: full.kind,
                        format,
                        content,
                    },
                )
                .await?;
            debug!(src = %src_path, dst = %dst_path, "copied file");
            report.copied.push(dst_path);
        }

        Ok(())
    }
    .boxed()
}
