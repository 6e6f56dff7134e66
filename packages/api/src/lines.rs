// ABOUTME: Repository line counter: one sequential content fetch per blob
// ABOUTME: A single failed fetch aborts the whole count; there is no retry or partial result

use serde::Serialize;
use tracing::debug;

use gitgauge_providers::{ProviderAdapter, ProviderResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineCountResult {
    pub total_lines: u64,
}

/// Enumerate the repository's blobs and sum their line counts.
///
/// A file's line count is the number of segments produced by splitting its
/// content on `'\n'`, so `"a\nb\n"` counts 3 and `"x"` counts 1. Binary
/// files are not detected; splitting them yields a meaningless but harmless
/// count. Fetches are sequential and unpaginated.
pub async fn count_repo_lines(
    adapter: &dyn ProviderAdapter,
    access_token: &str,
    owner_or_id: &str,
    repo: &str,
) -> ProviderResult<LineCountResult> {
    let blobs = adapter.list_tree(access_token, owner_or_id, repo).await?;
    debug!("Counting lines across {} files", blobs.len());

    let mut total_lines: u64 = 0;
    for path in &blobs {
        let content = adapter
            .fetch_file_content(access_token, owner_or_id, repo, path)
            .await?;
        total_lines += content.split('\n').count() as u64;
    }

    Ok(LineCountResult { total_lines })
}
