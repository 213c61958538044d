use allycat::cli::handle_check_connection;
use allycat::cli::handle_config;
use allycat::cli::handle_crawl;
use allycat::cli::handle_process;
use allycat::cli::handle_query;
use allycat::cli::handle_run;
use allycat::cli::handle_save;
use allycat::cli::handle_serve;
use allycat::cli::print_error;
use allycat::cli::Cli;
use allycat::cli::Commands;
use allycat::config::AppConfig;
use allycat::Result;
use clap::Parser;
use tracing::info;
use tracing::warn;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref())?;

    // Initialize logging
    allycat::logging::init_logging_with_config(&config.logging, cli.verbose)?;
    if config.uses_example_file() {
        warn!("Using config.example.toml. Please create config.toml for production use.");
    }
    info!("Configuration loaded successfully");

    // Execute the requested command
    match cli.command {
        Commands::Crawl {
            url,
            max_depth,
            max_downloads,
            clean,
        } => {
            handle_crawl(&config, &url, max_depth, max_downloads, clean).await?;
        }
        Commands::Process => {
            handle_process(&config)?;
        }
        Commands::Save { reset } => {
            handle_save(&config, reset).await?;
        }
        Commands::Query {
            question,
            top_k,
            sources,
        } => {
            handle_query(&config, question, top_k, sources).await?;
        }
        Commands::CheckConnection => {
            handle_check_connection(&config).await?;
        }
        Commands::Serve { host, port } => {
            handle_serve(&config, host, port).await?;
        }
        Commands::Run {
            url,
            max_depth,
            max_downloads,
        } => {
            handle_run(&config, &url, max_depth, max_downloads).await?;
        }
        Commands::Config => {
            handle_config(&config);
        }
    }

    Ok(())
}
