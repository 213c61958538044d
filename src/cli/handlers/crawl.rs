//! Crawl handler

use crate::cli::output::print_crawl_report;
use crate::cli::output::print_info;
use crate::crawler::prepare_output_dir;
use crate::crawler::CrawlOptions;
use crate::crawler::CrawlReport;
use crate::crawler::WebsiteCrawler;
use crate::AppConfig;
use crate::Result;

pub async fn handle_crawl(
    config: &AppConfig,
    url: &str,
    max_depth: Option<usize>,
    max_downloads: Option<usize>,
    clean: bool,
) -> Result<CrawlReport> {
    let options = CrawlOptions::from_app_config(config, url, max_depth, max_downloads);
    prepare_output_dir(&options.output_dir, clean)?;

    print_info(&format!(
        "Crawling {} into {}",
        options.start_url,
        options.output_dir.display()
    ));

    let report = WebsiteCrawler::new(options)?.crawl().await?;
    print_crawl_report(&report);
    Ok(report)
}
