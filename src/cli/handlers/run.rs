//! End-to-end pipeline handler

use super::crawl::handle_crawl;
use super::process::handle_process;
use super::save::handle_save;
use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::AppConfig;
use crate::Result;

pub async fn handle_run(
    config: &AppConfig,
    url: &str,
    max_depth: Option<usize>,
    max_downloads: Option<usize>,
) -> Result<()> {
    print_info("Step 1/3: crawling");
    handle_crawl(config, url, max_depth, max_downloads, false).await?;

    print_info("Step 2/3: processing");
    handle_process(config)?;

    print_info("Step 3/3: saving to Neo4j");
    let stored = handle_save(config, false).await?;

    print_success(&format!(
        "Pipeline complete: {stored} documents indexed. Ask with `allycat query`."
    ));
    Ok(())
}
