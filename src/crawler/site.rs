//! Depth-bounded, same-site website crawler

use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use scraper::Html;
use scraper::Selector;
use tracing::debug;
use tracing::info;
use tracing::warn;
use url::Url;

use super::mime::detect_mime;
use super::mime::output_filename;
use super::mime::HTML_MIME;
use super::links::clean_url;
use super::links::is_same_domain;
use super::links::resolve_link;
use super::links::site_domain;
use crate::config::AppConfig;
use crate::errors::AllycatError;
use crate::errors::Result;

/// Options for a single crawl run
#[derive(Debug, Clone)]
pub struct CrawlOptions {
    pub start_url: String,
    pub max_depth: usize,
    pub max_downloads: usize,
    pub output_dir: PathBuf,
    pub request_timeout: Duration,
}

impl CrawlOptions {
    /// Build options from configuration, with optional CLI overrides
    pub fn from_app_config(
        config: &AppConfig,
        start_url: impl Into<String>,
        max_depth: Option<usize>,
        max_downloads: Option<usize>,
    ) -> Self {
        Self {
            start_url: start_url.into(),
            max_depth: max_depth.unwrap_or(config.crawl.max_depth),
            max_downloads: max_downloads.unwrap_or(config.crawl.max_downloads),
            output_dir: PathBuf::from(&config.crawl.output_dir),
            request_timeout: Duration::from_secs(config.crawl.request_timeout_secs),
        }
    }
}

/// Summary of a crawl run
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    pub downloaded: usize,
    pub visited: usize,
    pub failed: usize,
    pub files: Vec<PathBuf>,
}

/// Website crawler saving pages and documents of one site to disk
pub struct WebsiteCrawler {
    options: CrawlOptions,
    domain: String,
    client: Client,
    visited: HashSet<String>,
    report: CrawlReport,
}

impl WebsiteCrawler {
    /// Create a new crawler
    ///
    /// # Errors
    /// - The start URL cannot be parsed or has no host
    /// - HTTP client build errors
    pub fn new(options: CrawlOptions) -> Result<Self> {
        let domain = site_domain(&options.start_url)?;
        let client = Client::builder()
            .timeout(options.request_timeout)
            .user_agent(concat!("allycat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AllycatError::HttpError(e.to_string()))?;

        Ok(Self {
            options,
            domain,
            client,
            visited: HashSet::new(),
            report: CrawlReport::default(),
        })
    }

    /// Crawl the site depth-first from the start URL
    ///
    /// Fetch failures are logged and counted; they do not stop the crawl.
    pub async fn crawl(mut self) -> Result<CrawlReport> {
        prepare_output_dir(&self.options.output_dir, false)?;
        info!(
            "Crawling {} (max depth {}, max downloads {})",
            self.options.start_url, self.options.max_depth, self.options.max_downloads
        );

        // Children are pushed in reverse so links are followed in document order
        let mut stack = vec![(self.options.start_url.clone(), 0usize)];

        while let Some((url, depth)) = stack.pop() {
            if depth > self.options.max_depth
                || self.report.downloaded >= self.options.max_downloads
            {
                continue;
            }

            let Some(url) = clean_url(&url, &self.domain) else {
                continue;
            };
            if !is_same_domain(&url, &self.domain) || !self.visited.insert(url.clone()) {
                continue;
            }
            self.report.visited += 1;

            match self.fetch_and_save(&url).await {
                Ok(links) => {
                    for link in links.into_iter().rev() {
                        stack.push((link, depth + 1));
                    }
                }
                Err(e) => {
                    warn!("Error crawling {}: {}", url, e);
                    self.report.failed += 1;
                }
            }
        }

        info!(
            "Crawl finished: {} downloaded, {} visited, {} failed",
            self.report.downloaded, self.report.visited, self.report.failed
        );
        Ok(self.report)
    }

    /// Fetch one URL, save it, and return the links to follow
    async fn fetch_and_save(&mut self, url: &str) -> Result<Vec<String>> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let final_url = response.url().to_string();
        let mime = detect_mime(content_type.as_deref(), &final_url);

        let filename = output_filename(url, &self.options.start_url, &mime);
        let path = self.options.output_dir.join(&filename);

        let links = if mime == HTML_MIME {
            let body = response.text().await?;
            let base = Url::parse(url)?;
            let (serialized, links) = parse_page(&body, &base)?;
            tokio::fs::write(&path, serialized).await?;
            links
        } else {
            let bytes = response.bytes().await?;
            tokio::fs::write(&path, &bytes).await?;
            Vec::new()
        };

        debug!("Saved {} ({}) to {}", url, mime, path.display());
        self.report.downloaded += 1;
        self.report.files.push(path);
        Ok(links)
    }
}

/// Re-serialize an HTML page and collect its resolved `<a href>` links
fn parse_page(body: &str, base: &Url) -> Result<(String, Vec<String>)> {
    let document = Html::parse_document(body);
    let selector = Selector::parse("a[href]")
        .map_err(|e| AllycatError::CrawlError(format!("Invalid selector: {e:?}")))?;

    let links = document
        .select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| !href.trim().is_empty())
        .filter_map(|href| resolve_link(base, href))
        .collect();

    Ok((document.html(), links))
}

/// Make sure the output directory exists, optionally emptying it first
pub fn prepare_output_dir(dir: &Path, clean: bool) -> Result<()> {
    if clean && dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_collects_links_in_order() {
        let base = Url::parse("https://example.com/news/").unwrap();
        let html = r##"<html><body>
            <a href="a.html">A</a>
            <a>no href</a>
            <a href="  ">blank</a>
            <a href="/about">About</a>
            <a href="#top">Top</a>
        </body></html>"##;

        let (serialized, links) = parse_page(html, &base).unwrap();
        assert!(serialized.contains("<body>"));
        assert_eq!(
            links,
            vec![
                "https://example.com/news/a.html".to_string(),
                "https://example.com/about".to_string(),
                "https://example.com/news/#top".to_string(),
            ]
        );
    }

    #[test]
    fn test_prepare_output_dir_clean() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("crawled");
        prepare_output_dir(&dir, false).unwrap();
        std::fs::write(dir.join("old.html"), "x").unwrap();

        prepare_output_dir(&dir, false).unwrap();
        assert!(dir.join("old.html").exists());

        prepare_output_dir(&dir, true).unwrap();
        assert!(dir.exists());
        assert!(!dir.join("old.html").exists());
    }

    #[test]
    fn test_new_rejects_hostless_url() {
        let options = CrawlOptions {
            start_url: "not a url".to_string(),
            max_depth: 1,
            max_downloads: 1,
            output_dir: PathBuf::from("unused"),
            request_timeout: Duration::from_secs(1),
        };
        assert!(WebsiteCrawler::new(options).is_err());
    }
}
