//! Analyze command: term frequency, co-occurrence graph, and daily series.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use newsgraph_core::config::{Config, WeekdayLocale};
use newsgraph_core::pipeline::{self, AnalysisParams, AnalysisReport, Pipeline};

use super::{load_corpus, retrieve};

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug, Default)]
pub struct AnalyzeArgs {
    /// Search keyword. Excluded from the counted terms.
    pub keyword: String,

    /// Corpus snapshot to analyze instead of querying the news API.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<Utf8PathBuf>,

    /// Number of documents to analyze.
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Minimum term length in characters.
    #[arg(long)]
    pub min_len: Option<usize>,

    /// Terms in the frequency table.
    #[arg(long)]
    pub top: Option<usize>,

    /// Edges kept in the co-occurrence graph.
    #[arg(long)]
    pub edges: Option<usize>,

    /// Terms tracked in the daily series.
    #[arg(long)]
    pub series_top: Option<usize>,

    /// Base stop-word list, one word per line.
    #[arg(long, value_name = "FILE")]
    pub stopwords: Option<Utf8PathBuf>,

    /// Additional stop words (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub exclude: Option<Vec<String>>,

    /// Weekday label language.
    #[arg(long, value_enum)]
    pub locale: Option<WeekdayLocale>,

    /// Calendar time zone in minutes east of UTC.
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<i32>,
}

impl AnalyzeArgs {
    /// Layer these flags over the loaded configuration.
    fn apply_to(&self, config: &Config) -> Config {
        let mut merged = config.clone();
        if let Some(ref path) = self.stopwords {
            merged.stopwords_file = Some(path.clone());
        }
        if let Some(ref words) = self.exclude {
            merged
                .extra_stopwords
                .get_or_insert_with(Vec::new)
                .extend(words.iter().map(|w| w.trim().to_string()).filter(|w| !w.is_empty()));
        }
        merged.weekday_locale = self.locale.or(config.weekday_locale);
        merged.utc_offset_minutes = self.utc_offset.or(config.utc_offset_minutes);
        merged
    }

    fn params(&self, config: &Config) -> AnalysisParams {
        let defaults = AnalysisParams::from_config(self.keyword.trim(), config);
        AnalysisParams {
            document_limit: self.limit.unwrap_or(defaults.document_limit),
            min_term_length: self.min_len.unwrap_or(defaults.min_term_length),
            wordcloud_top_n: self.top.unwrap_or(defaults.wordcloud_top_n),
            edge_top_n: self.edges.unwrap_or(defaults.edge_top_n),
            time_series_top_n: self.series_top.unwrap_or(defaults.time_series_top_n),
            ..defaults
        }
    }
}

/// Run the analysis pipeline for a keyword.
#[instrument(name = "cmd_analyze", skip_all, fields(keyword = %args.keyword))]
pub fn cmd_analyze(
    args: AnalyzeArgs,
    global_json: bool,
    config: &Config,
    max_input: Option<usize>,
) -> anyhow::Result<()> {
    debug!(input = ?args.input, "executing analyze command");

    let config = args.apply_to(config);
    let params = args.params(&config);
    // Reject bad parameters before touching the network.
    params.validate()?;

    let corpus = match args.input {
        Some(ref path) => load_corpus(path, max_input)?,
        None => retrieve(&params.keyword, params.document_limit, &config.naver, global_json)?,
    };

    let stopwords = pipeline::stopwords_for(&config, &params.keyword);
    let extractor = pipeline::extractor_for(&config);
    let report = Pipeline::new(&extractor)
        .with_calendar(pipeline::calendar_for(&config))
        .run(&params, &corpus, &stopwords)
        .with_context(|| format!("failed to analyze \"{}\"", params.keyword))?;

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &AnalysisReport) {
    println!(
        "{} {}",
        report.keyword.bold(),
        format!("({} documents)", report.document_count).dimmed()
    );

    if report.is_insufficient() {
        println!(
            "\n  {} no terms to show for this keyword and these settings",
            "Insufficient data:".yellow()
        );
        return;
    }

    if !report.skipped_documents.is_empty() {
        println!(
            "  {} {} documents could not be tokenized",
            "Skipped:".yellow(),
            report.skipped_documents.len()
        );
    }

    println!("\n  {} {} distinct", "Terms:".cyan(), report.distinct_terms);
    for (rank, t) in report.top_terms.iter().enumerate() {
        println!("    {:>3}. {} {}", rank + 1, t.term, t.count.to_string().dimmed());
    }

    if report.graph.is_empty() {
        println!("\n  {} no co-occurring terms", "Network:".cyan());
    } else {
        println!(
            "\n  {} {} nodes, {} edges",
            "Network:".cyan(),
            report.graph.nodes.len(),
            report.graph.edges.len()
        );
        for e in &report.graph.edges {
            println!("    {} - {} {}", e.source, e.target, e.weight.to_string().dimmed());
        }
        let mut central: Vec<_> = report.graph.nodes.iter().collect();
        central.sort_by(|a, b| b.centrality.total_cmp(&a.centrality));
        println!("    {}", "centrality:".dimmed());
        for n in central.iter().take(10) {
            println!("      {} {:.3}", n.term, n.centrality);
        }
    }

    let ts = &report.time_series;
    println!("\n  {} {}", "Daily volume:".cyan(), ts.volume.len());
    for v in &ts.volume {
        println!("    {} {} {}", v.date, v.weekday.dimmed(), v.documents);
    }

    if !ts.terms.is_empty() {
        println!("\n  {} {}", "Daily trend:".cyan(), ts.terms.join(", "));
        for v in &ts.volume {
            let counts: Vec<String> = ts
                .series
                .iter()
                .filter(|p| p.date == v.date)
                .map(|p| format!("{}={}", p.term, p.count))
                .collect();
            println!("    {} {}", v.date, counts.join(" "));
        }
    }
}
