//! Website crawler
//!
//! Downloads the pages of a single site, depth-first and bounded by depth and
//! download count. HTML pages are saved as `<name>_text.html`; PDFs and other
//! files are saved as-is with an extension matching their MIME type, so the
//! processing stage never mistakes a PDF for HTML.

pub mod mime;
pub mod site;
pub mod links;

pub use mime::detect_mime;
pub use mime::output_filename;
pub use site::prepare_output_dir;
pub use site::CrawlOptions;
pub use site::CrawlReport;
pub use site::WebsiteCrawler;
pub use links::clean_url;
pub use links::is_same_domain;
