mod html;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum Error {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{url} returned status {status}")]
    BadStatus { url: Url, status: StatusCode },
    #[error("{url} is not HTML (content type {content_type:?})")]
    NotHtml {
        url: Url,
        content_type: Option<String>,
    },
}

/// A page the crawler visited, reduced to what the index needs.
#[derive(Debug, Clone, PartialEq)]
pub struct CrawledPage {
    pub url: Url,
    pub title: String,
    /// Visible text of the whole document, whitespace-collapsed.
    pub text: String,
}

/// Breadth crawler that never leaves the host of its start URL.
pub struct Crawler {
    client: reqwest::Client,
    host: String,
    visited: HashSet<Url>,
    frontier: VecDeque<Url>,
    max_pages: usize,
}

impl Crawler {
    pub const USER_AGENT: &'static str = "bsee-crawler/0.1";

    pub fn new(start_url: &str, max_pages: usize) -> Result<Self, Error> {
        let start = Url::parse(start_url)?;
        let host = start.host_str().unwrap_or_default().to_string();
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(Self::USER_AGENT)
                .build()?,
            host,
            visited: HashSet::new(),
            frontier: VecDeque::from([start]),
            max_pages,
        })
    }

    /// Walks the frontier until it is exhausted or the page cap is
    /// reached. Pages that fail to fetch are logged and skipped, the
    /// crawl keeps going.
    pub async fn crawl(&mut self) -> Vec<CrawledPage> {
        let mut pages = Vec::new();
        while let Some(url) = self.frontier.pop_front() {
            if pages.len() >= self.max_pages {
                break;
            }
            if !self.visited.insert(url.clone()) {
                continue;
            }
            match self.visit(url.clone()).await {
                Ok(page) => pages.push(page),
                Err(e) => warn!("skipping {url}: {e}"),
            }
        }
        info!("crawl finished, {} pages", pages.len());
        pages
    }

    /// Frontier admission: a link is queued only if it is on the crawl
    /// host and has not been visited yet.
    fn admits(&self, link: &Url) -> bool {
        link.host_str() == Some(self.host.as_str()) && !self.visited.contains(link)
    }

    async fn visit(&mut self, url: Url) -> Result<CrawledPage, Error> {
        info!("crawling {url}");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::BadStatus { url, status });
        }
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        if !content_type
            .as_deref()
            .map(|c| c.contains("text/html"))
            .unwrap_or(false)
        {
            return Err(Error::NotHtml { url, content_type });
        }
        let body = response.text().await?;
        for link in html::extract_links(&body, &url) {
            if self.admits(&link) {
                self.frontier.push_back(link);
            }
        }
        let (title, text) = html::extract_text(&body);
        Ok(CrawledPage {
            title: title.unwrap_or_else(|| url.to_string()),
            url,
            text,
        })
    }
}
