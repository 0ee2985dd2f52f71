//! MCP (Model Context Protocol) server implementation.
//!
//! This module exposes keyword analysis over the MCP protocol, making it
//! available to AI assistants via stdio transport.
//!
//! # Architecture
//!
//! The MCP server is a presentation layer. It wraps the same core library that
//! the CLI commands use and returns reports as JSON text; it never modifies a
//! report after the pipeline produces it.
//!
//! # Tools
//!
//! - `get_info`: package name and version
//! - `analyze_documents`: analyze a corpus supplied inline
//! - `analyze_news`: retrieve news for a keyword and analyze it (cached)

use std::sync::Arc;

use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo};
use rmcp::schemars;
use rmcp::{ErrorData as McpError, ServerHandler, tool, tool_handler, tool_router};

use newsgraph_core::config::Config;
use newsgraph_core::document::Document;
use newsgraph_core::pipeline::{self, AnalysisParams, AnalysisReport, Pipeline};
use newsgraph_core::source::NaverNewsClient;
use newsgraph_core::{AnalysisError, NewsSource};

use crate::cache::AnalysisCache;

/// Parameters for the `get_info` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct GetInfoParams {
    /// Output format: "text" or "json"
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_format() -> String {
    "text".to_string()
}

/// Optional overrides for the configured analysis defaults.
#[derive(Debug, Default, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalysisOptions {
    /// Maximum number of documents (100-1000 is typical).
    pub document_limit: Option<usize>,
    /// Minimum term length in characters (1-4).
    pub min_term_length: Option<usize>,
    /// Terms in the ranked frequency table (20-200).
    pub wordcloud_top_n: Option<usize>,
    /// Edges kept in the co-occurrence graph (10-100).
    pub edge_top_n: Option<usize>,
    /// Terms tracked in the daily series (1-10).
    pub time_series_top_n: Option<usize>,
}

impl AnalysisOptions {
    fn params(&self, keyword: &str, config: &Config) -> AnalysisParams {
        let defaults = AnalysisParams::from_config(keyword.trim(), config);
        AnalysisParams {
            document_limit: self.document_limit.unwrap_or(defaults.document_limit),
            min_term_length: self.min_term_length.unwrap_or(defaults.min_term_length),
            wordcloud_top_n: self.wordcloud_top_n.unwrap_or(defaults.wordcloud_top_n),
            edge_top_n: self.edge_top_n.unwrap_or(defaults.edge_top_n),
            time_series_top_n: self.time_series_top_n.unwrap_or(defaults.time_series_top_n),
            ..defaults
        }
    }
}

/// Parameters for the `analyze_documents` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeDocumentsParams {
    /// Search keyword the documents were retrieved for.
    pub keyword: String,
    /// The corpus, in retrieval order.
    pub documents: Vec<Document>,
    /// Overrides for the analysis defaults.
    #[serde(flatten)]
    pub options: AnalysisOptions,
}

/// Parameters for the `analyze_news` tool.
#[derive(Debug, serde::Deserialize, schemars::JsonSchema)]
pub struct AnalyzeNewsParams {
    /// Search keyword.
    pub keyword: String,
    /// Overrides for the analysis defaults.
    #[serde(flatten)]
    pub options: AnalysisOptions,
}

/// MCP server exposing keyword analysis to AI assistants.
///
/// Each `#[tool]` method in the `#[tool_router]` impl block is automatically
/// registered and callable via the MCP protocol.
#[derive(Clone)]
pub struct ProjectServer {
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
    config: Arc<Config>,
    cache: Arc<AnalysisCache>,
}

impl Default for ProjectServer {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl ProjectServer {
    /// Create a server with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a server that analyzes with `config`'s defaults and credentials.
    pub fn with_config(config: Config) -> Self {
        Self {
            tool_router: Self::tool_router(),
            config: Arc::new(config),
            cache: Arc::new(AnalysisCache::new()),
        }
    }

    /// Reports memoized by `analyze_news`.
    pub fn cache(&self) -> &AnalysisCache {
        &self.cache
    }

    /// Get project information.
    #[tool(description = "Get project name, version, and description")]
    #[tracing::instrument(skip(self), fields(otel.kind = "server"))]
    fn get_info(
        &self,
        Parameters(params): Parameters<GetInfoParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "get_info", format = %params.format, "executing MCP tool");

        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
        });

        let text = if params.format == "json" {
            serde_json::to_string_pretty(&info)
                .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?
        } else {
            format!(
                "{} v{}\n{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION"),
                env!("CARGO_PKG_DESCRIPTION"),
            )
        };

        tracing::info!(tool = "get_info", "MCP tool completed");
        Ok(CallToolResult::success(vec![Content::text(text)]))
    }

    /// Analyze a corpus passed in the request.
    #[tool(
        description = "Analyze news documents for a keyword. Returns ranked terms, a co-occurrence graph with degree centrality, and daily volume and term series as JSON. status is \"insufficient_data\" when nothing survives filtering."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", keyword = %params.keyword))]
    fn analyze_documents(
        &self,
        Parameters(params): Parameters<AnalyzeDocumentsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(
            tool = "analyze_documents",
            documents = params.documents.len(),
            "executing MCP tool"
        );

        let analysis = params.options.params(&params.keyword, &self.config);
        let report = run_pipeline(&self.config, &analysis, &params.documents).map_err(to_mcp_error)?;

        tracing::info!(tool = "analyze_documents", status = ?report.status, "MCP tool completed");
        report_result(&report)
    }

    /// Retrieve news for a keyword, analyze it, and memoize the report.
    #[tool(
        description = "Search Naver news for a keyword and analyze the results. Same output as analyze_documents. Results are cached per keyword and parameter set."
    )]
    #[tracing::instrument(skip(self, params), fields(otel.kind = "server", keyword = %params.keyword))]
    async fn analyze_news(
        &self,
        Parameters(params): Parameters<AnalyzeNewsParams>,
    ) -> Result<CallToolResult, McpError> {
        tracing::debug!(tool = "analyze_news", "executing MCP tool");

        let analysis = params.options.params(&params.keyword, &self.config);
        analysis.validate().map_err(to_mcp_error)?;

        if let Some(hit) = self.cache.get(&analysis) {
            tracing::info!(tool = "analyze_news", cached = true, "MCP tool completed");
            return report_result(&hit);
        }

        let config = Arc::clone(&self.config);
        let cache = Arc::clone(&self.cache);

        // The blocking HTTP client must be created, used, and dropped off the
        // async workers.
        let report = tokio::task::spawn_blocking(move || {
            cache.get_or_try_insert(&analysis, || {
                let client = NaverNewsClient::new(&config.naver)
                    .map_err(|e| McpError::invalid_request(e.to_string(), None))?;
                let corpus = client.fetch(&analysis.keyword, analysis.document_limit);
                run_pipeline(&config, &analysis, &corpus).map_err(to_mcp_error)
            })
        })
        .await
        .map_err(|e| McpError::internal_error(format!("analysis task failed: {e}"), None))??;

        tracing::info!(tool = "analyze_news", cached = false, status = ?report.status, "MCP tool completed");
        report_result(&report)
    }
}

fn run_pipeline(
    config: &Config,
    params: &AnalysisParams,
    corpus: &[Document],
) -> Result<AnalysisReport, AnalysisError> {
    let stopwords = pipeline::stopwords_for(config, &params.keyword);
    let extractor = pipeline::extractor_for(config);
    Pipeline::new(&extractor)
        .with_calendar(pipeline::calendar_for(config))
        .run(params, corpus, &stopwords)
}

fn to_mcp_error(err: AnalysisError) -> McpError {
    match err {
        AnalysisError::InvalidParameter { .. } => McpError::invalid_params(err.to_string(), None),
        AnalysisError::Tokenizer { .. } => McpError::internal_error(err.to_string(), None),
    }
}

fn report_result(report: &AnalysisReport) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(report)
        .map_err(|e| McpError::internal_error(format!("serialization error: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

#[tool_handler]
impl ServerHandler for ProjectServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            instructions: Some(format!(
                "{} MCP server. Use analyze_news to search and analyze a keyword, or analyze_documents to analyze documents you already have.",
                env!("CARGO_PKG_NAME"),
            )),
        }
    }
}
