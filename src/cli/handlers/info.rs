//! Information handlers (connection check, config)

use crate::cli::output::print_config;
use crate::cli::output::print_success;
use crate::graph::GraphStore;
use crate::AppConfig;
use crate::Result;

pub async fn handle_check_connection(config: &AppConfig) -> Result<()> {
    println!("Testing Neo4j connection...");
    println!("URI: {}", config.neo4j.uri);
    println!("Username: {}", config.neo4j.user);
    println!("Database: {}", config.neo4j.database);

    let store = GraphStore::new(config)?;
    store.verify_connectivity().await?;
    print_success("Connection successful!");

    let count = store.count_documents().await?;
    println!("Documents stored: {count}");
    Ok(())
}

pub fn handle_config(config: &AppConfig) {
    print_config(config);
}
