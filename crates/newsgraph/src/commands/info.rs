//! Info command implementation

use clap::Args;
use newsgraph_core::config::{Config, ConfigSources};
use newsgraph_core::pipeline::AnalysisParams;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    homepage: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            homepage: env!("CARGO_PKG_HOMEPAGE"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

/// Effective analysis defaults after config is applied.
#[derive(Serialize)]
struct AnalysisDefaults {
    document_limit: usize,
    min_term_length: usize,
    wordcloud_top_n: usize,
    edge_top_n: usize,
    time_series_top_n: usize,
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    analysis: AnalysisDefaults,
    #[serde(skip_serializing_if = "Option::is_none")]
    stopwords_file: Option<String>,
    extra_stopwords: usize,
    extra_nouns: usize,
    utc_offset_minutes: i32,
    weekday_locale: String,
    naver_credentials: bool,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        // Keyword is irrelevant here; only the numeric defaults are reported.
        let params = AnalysisParams::from_config("", config);
        Self {
            config_file: sources.primary_file().map(|p| p.to_string()),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(|p| p.to_string()),
            analysis: AnalysisDefaults {
                document_limit: params.document_limit,
                min_term_length: params.min_term_length,
                wordcloud_top_n: params.wordcloud_top_n,
                edge_top_n: params.edge_top_n,
                time_series_top_n: params.time_series_top_n,
            },
            stopwords_file: config.stopwords_file.as_ref().map(|p| p.to_string()),
            extra_stopwords: config.extra_stopwords.as_ref().map_or(0, Vec::len),
            extra_nouns: config.extra_nouns.as_ref().map_or(0, Vec::len),
            utc_offset_minutes: config
                .utc_offset_minutes
                .unwrap_or(newsgraph_core::document::DEFAULT_UTC_OFFSET_MINUTES),
            weekday_locale: config.weekday_locale.unwrap_or_default().to_string(),
            naver_credentials: config.naver.client_id.is_some()
                && config.naver.client_secret.is_some(),
        }
    }
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
}

/// Print package information
///
/// # Arguments
/// * `global_json` - Global `--json` flag from CLI
/// * `config` - Loaded configuration
/// * `sources` - Config source metadata from loading
#[instrument(name = "cmd_info", skip_all, fields(json_output))]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    let info = PackageInfo::new();

    debug!(json_output = global_json, "executing info command");

    let full_info = FullInfo {
        package: info,
        config: ConfigInfo::from_config(config, sources),
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&full_info)?);
        return Ok(());
    }

    println!(
        "{} {}",
        full_info.package.name.bold(),
        full_info.package.version.green()
    );
    if !full_info.package.description.is_empty() {
        println!("{}", full_info.package.description);
    }
    if !full_info.package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), full_info.package.license);
    }
    if !full_info.package.repository.is_empty() {
        println!(
            "{}: {}",
            "Repository".dimmed(),
            full_info.package.repository.cyan()
        );
    }

    let cfg = &full_info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match cfg.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), cfg.log_level);
    if let Some(ref dir) = cfg.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    println!(
        "{}: {}",
        "Naver credentials".dimmed(),
        if cfg.naver_credentials {
            "configured".green().to_string()
        } else {
            "missing".yellow().to_string()
        }
    );

    println!();
    println!("{}", "Analysis Defaults".bold().underline());
    let a = &cfg.analysis;
    println!("{}: {}", "Documents".dimmed(), a.document_limit);
    println!("{}: {}", "Min term length".dimmed(), a.min_term_length);
    println!("{}: {}", "Table terms".dimmed(), a.wordcloud_top_n);
    println!("{}: {}", "Graph edges".dimmed(), a.edge_top_n);
    println!("{}: {}", "Series terms".dimmed(), a.time_series_top_n);
    match cfg.stopwords_file {
        Some(ref path) => println!("{}: {}", "Stop-word file".dimmed(), path),
        None => println!("{}: {}", "Stop-word file".dimmed(), "(built-in)".dimmed()),
    }
    println!("{}: {}", "Extra stop words".dimmed(), cfg.extra_stopwords);
    println!("{}: {}", "Extra nouns".dimmed(), cfg.extra_nouns);
    println!(
        "{}: UTC{:+} min, {}",
        "Calendar".dimmed(),
        cfg.utc_offset_minutes,
        cfg.weekday_locale
    );

    Ok(())
}
