//! News retrieval.
//!
//! [`NewsSource`] is the collaborator that turns a keyword into a corpus.
//! [`NaverNewsClient`] implements it against the Naver news search API.

use std::sync::LazyLock;
use std::time::Duration;

use camino::Utf8Path;
use chrono::DateTime;
use regex::Regex;
use serde::Deserialize;

use crate::config::{NaverConfig, NewsSort};
use crate::document::Document;
use crate::error::{SourceError, SourceResult};

/// Default Naver news search endpoint.
pub const NAVER_NEWS_ENDPOINT: &str = "https://openapi.naver.com/v1/search/news.json";

/// Largest page the API serves.
pub const MAX_PAGE_SIZE: usize = 100;

/// Largest `start` offset the API accepts.
pub const MAX_START: usize = 1000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves documents for a keyword.
///
/// Implementations page through their backend until `max_count` documents are
/// gathered or the backend runs dry. A failing page ends retrieval with what
/// was gathered so far; zero results is an empty corpus, not an error.
pub trait NewsSource {
    /// Up to `max_count` documents for `keyword`, in retrieval order.
    fn fetch(&self, keyword: &str, max_count: usize) -> Vec<Document>;
}

/// One parsed page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewsPage {
    /// Items that parsed into documents.
    pub documents: Vec<Document>,
    /// Items the server returned, including ones dropped for a bad date.
    pub item_count: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(rename = "pubDate", default)]
    pub_date: String,
}

/// Parse a search response body.
///
/// Items whose `pubDate` is not RFC 2822 are dropped one by one.
pub fn parse_page(json: &str) -> SourceResult<NewsPage> {
    let response: SearchResponse = serde_json::from_str(json)?;
    let item_count = response.items.len();
    let documents = response
        .items
        .into_iter()
        .filter_map(|item| match DateTime::parse_from_rfc2822(item.pub_date.trim()) {
            Ok(published_at) => Some(Document::new(
                published_at,
                strip_markup(&item.title),
                strip_markup(&item.description),
            )),
            Err(e) => {
                tracing::debug!(pub_date = %item.pub_date, error = %e, "dropping item with unparseable date");
                None
            }
        })
        .collect();
    Ok(NewsPage {
        documents,
        item_count,
    })
}

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

const ENTITIES: &[(&str, &str)] = &[
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    // last, so "&amp;lt;" decodes to "&lt;" and not "<"
    ("&amp;", "&"),
];

/// Remove HTML tags and decode the entities search snippets carry.
pub fn strip_markup(text: &str) -> String {
    let mut out = TAG.replace_all(text, "").into_owned();
    for (entity, plain) in ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, plain);
        }
    }
    out.trim().to_string()
}

/// Client for the Naver news search API.
#[derive(Debug, Clone)]
pub struct NaverNewsClient {
    client: reqwest::blocking::Client,
    endpoint: String,
    client_id: String,
    client_secret: String,
    page_size: usize,
    sort: NewsSort,
}

impl NaverNewsClient {
    /// Create a client from configuration.
    ///
    /// Fails with [`SourceError::MissingCredentials`] when the id or secret is
    /// unset or blank.
    pub fn new(config: &NaverConfig) -> SourceResult<Self> {
        let credential = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
        };
        let (Some(client_id), Some(client_secret)) = (
            credential(&config.client_id),
            credential(&config.client_secret),
        ) else {
            return Err(SourceError::MissingCredentials);
        };

        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            endpoint: config
                .endpoint
                .clone()
                .unwrap_or_else(|| NAVER_NEWS_ENDPOINT.to_string()),
            client_id,
            client_secret,
            page_size: config.page_size.unwrap_or(MAX_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            sort: config.sort.unwrap_or_default(),
        })
    }

    /// Request one page starting at the 1-based offset `start`.
    #[tracing::instrument(skip(self, display), fields(endpoint = %self.endpoint))]
    pub fn fetch_page(&self, keyword: &str, start: usize, display: usize) -> SourceResult<NewsPage> {
        let display = display.to_string();
        let start = start.to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&[
                ("query", keyword),
                ("display", display.as_str()),
                ("start", start.as_str()),
                ("sort", self.sort.as_str()),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }
        parse_page(&response.text()?)
    }

    /// Like [`NewsSource::fetch`], calling `progress` with the running total
    /// after each page.
    #[tracing::instrument(skip(self, progress))]
    pub fn fetch_with_progress(
        &self,
        keyword: &str,
        max_count: usize,
        mut progress: impl FnMut(usize),
    ) -> Vec<Document> {
        let mut documents: Vec<Document> = Vec::new();
        let mut start = 1;

        while documents.len() < max_count && start <= MAX_START {
            let display = self.page_size.min(max_count - documents.len());
            let page = match self.fetch_page(keyword, start, display) {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(start, gathered = documents.len(), error = %e, "page failed, keeping partial results");
                    break;
                }
            };

            let exhausted = page.item_count < display;
            documents.extend(page.documents);
            progress(documents.len());
            if exhausted {
                break;
            }
            start += display;
        }

        documents.truncate(max_count);
        tracing::info!(count = documents.len(), "retrieval finished");
        documents
    }
}

impl NewsSource for NaverNewsClient {
    fn fetch(&self, keyword: &str, max_count: usize) -> Vec<Document> {
        self.fetch_with_progress(keyword, max_count, |_| {})
    }
}

/// Write a corpus snapshot as pretty-printed JSON.
pub fn write_corpus(path: &Utf8Path, documents: &[Document]) -> SourceResult<()> {
    let json = serde_json::to_string_pretty(documents)?;
    std::fs::write(path, json).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}
