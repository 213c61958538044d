//! Processing handler

use std::path::Path;

use crate::cli::output::print_processing_report;
use crate::cli::output::print_warning;
use crate::processing::process_directory;
use crate::processing::ChunkingOptions;
use crate::processing::ProcessingReport;
use crate::AppConfig;
use crate::Result;

pub fn handle_process(config: &AppConfig) -> Result<ProcessingReport> {
    let crawl_dir = Path::new(&config.crawl.output_dir);
    let processed_dir = Path::new(&config.processing.processed_dir);

    let report = process_directory(
        crawl_dir,
        processed_dir,
        ChunkingOptions::from_app_config(config),
    )?;

    if report.files_processed == 0 {
        print_warning(&format!(
            "No HTML pages found in {}. Run `allycat crawl` first.",
            crawl_dir.display()
        ));
    }
    print_processing_report(&report);
    Ok(report)
}
