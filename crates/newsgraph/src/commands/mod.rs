//! Command implementations.

use anyhow::Context;
use camino::Utf8Path;
use indicatif::{ProgressBar, ProgressStyle};

use newsgraph_core::config::NaverConfig;
use newsgraph_core::document::{Document, parse_corpus};
use newsgraph_core::source::NaverNewsClient;

pub mod analyze;
pub mod fetch;
pub mod info;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            anyhow::bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Load a corpus snapshot written by `newsgraph fetch`.
pub fn load_corpus(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<Vec<Document>> {
    let content = read_input_file(path, max_bytes)?;
    parse_corpus(&content).with_context(|| format!("{path} is not a corpus snapshot"))
}

/// Retrieve up to `limit` documents from the Naver API, with a progress bar
/// unless `quiet_progress`.
pub fn retrieve(
    keyword: &str,
    limit: usize,
    naver: &NaverConfig,
    quiet_progress: bool,
) -> anyhow::Result<Vec<Document>> {
    let client = NaverNewsClient::new(naver).context("cannot query the news API")?;

    let pb = if quiet_progress {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(limit as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar().template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?,
    );
    pb.set_message(format!("fetching \"{keyword}\""));

    let documents = client.fetch_with_progress(keyword, limit, |n| pb.set_position(n as u64));
    pb.finish_and_clear();
    Ok(documents)
}
