//! Fetch command: save a corpus snapshot for later analysis.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use newsgraph_core::config::Config;
use newsgraph_core::pipeline::DEFAULT_DOCUMENT_LIMIT;
use newsgraph_core::source::write_corpus;

use super::retrieve;

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug, Default)]
pub struct FetchArgs {
    /// Search keyword.
    pub keyword: String,

    /// Number of documents to retrieve.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Write the snapshot here instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<Utf8PathBuf>,
}

/// Retrieve documents for a keyword and write them as JSON.
#[instrument(name = "cmd_fetch", skip_all, fields(keyword = %args.keyword))]
pub fn cmd_fetch(args: FetchArgs, global_json: bool, config: &Config) -> anyhow::Result<()> {
    let keyword = args.keyword.trim();
    if keyword.is_empty() {
        bail!("keyword must not be empty");
    }
    let limit = args
        .limit
        .or(config.document_limit)
        .unwrap_or(DEFAULT_DOCUMENT_LIMIT);
    if limit == 0 {
        bail!("--limit must be at least 1");
    }
    debug!(limit, output = ?args.output, "executing fetch command");

    let quiet_progress = global_json || args.output.is_none();
    let documents = retrieve(keyword, limit, &config.naver, quiet_progress)?;

    match args.output {
        Some(ref path) => {
            write_corpus(path, &documents).with_context(|| format!("failed to write {path}"))?;
            if global_json {
                println!(
                    "{}",
                    serde_json::json!({ "path": path, "documents": documents.len() })
                );
            } else {
                println!(
                    "{} {} documents to {}",
                    "Saved".green(),
                    documents.len(),
                    path.cyan()
                );
            }
        }
        None => println!("{}", serde_json::to_string_pretty(&documents)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_keyword_is_rejected() {
        let args = FetchArgs {
            keyword: "  ".to_string(),
            ..FetchArgs::default()
        };
        assert!(cmd_fetch(args, false, &Config::default()).is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let args = FetchArgs {
            keyword: "케이팝".to_string(),
            limit: Some(0),
            ..FetchArgs::default()
        };
        let err = cmd_fetch(args, false, &Config::default()).unwrap_err();
        assert!(err.to_string().contains("--limit"));
    }
}
