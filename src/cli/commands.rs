//! CLI command definitions and argument parsing

use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(name = "allycat")]
#[command(about = "Crawl a website, index it in Neo4j and answer questions about it")]
#[command(version)]
pub struct Cli {
    /// Enable verbose debug logging (default: info level)
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download the pages of a website
    Crawl {
        /// Start URL; only pages on its domain are followed
        #[arg(long)]
        url: String,
        /// Maximum link depth from the start URL
        #[arg(long)]
        max_depth: Option<usize>,
        /// Maximum number of files to download
        #[arg(long)]
        max_downloads: Option<usize>,
        /// Empty the crawl directory first
        #[arg(long)]
        clean: bool,
    },
    /// Convert crawled HTML into chunked documents
    Process,
    /// Embed processed documents and store them in Neo4j
    Save {
        /// Delete all stored documents first
        #[arg(long)]
        reset: bool,
    },
    /// Ask a question; starts an interactive session when none is given
    Query {
        /// The question to answer
        question: Option<String>,
        /// Number of chunks to retrieve
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
        /// Print the retrieved sources after the answer
        #[arg(long)]
        sources: bool,
    },
    /// Check that Neo4j is reachable with the configured credentials
    CheckConnection,
    /// Start the web app
    Serve {
        /// Host to bind (default: server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (default: server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Crawl, process and save in one go
    Run {
        /// Start URL
        #[arg(long)]
        url: String,
        /// Maximum link depth from the start URL
        #[arg(long)]
        max_depth: Option<usize>,
        /// Maximum number of files to download
        #[arg(long)]
        max_downloads: Option<usize>,
    },
    /// Show the effective configuration
    Config,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_crawl() {
        let cli = Cli::try_parse_from([
            "allycat",
            "-v",
            "crawl",
            "--url",
            "https://example.com",
            "--max-depth",
            "2",
            "--clean",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Crawl {
                url,
                max_depth,
                max_downloads,
                clean,
            } => {
                assert_eq!(url, "https://example.com");
                assert_eq!(max_depth, Some(2));
                assert_eq!(max_downloads, None);
                assert!(clean);
            }
            _ => panic!("expected crawl"),
        }
    }

    #[test]
    fn test_parse_query_without_question() {
        let cli = Cli::try_parse_from(["allycat", "-c", "my.toml", "query", "-k", "3"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("my.toml")));
        assert!(matches!(
            cli.command,
            Commands::Query {
                question: None,
                top_k: Some(3),
                sources: false
            }
        ));
    }

    #[test]
    fn test_crawl_requires_url() {
        assert!(Cli::try_parse_from(["allycat", "crawl"]).is_err());
    }
}
