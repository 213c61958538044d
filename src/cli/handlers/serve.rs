//! Web app handler

use crate::api::serve_api;
use crate::AppConfig;
use crate::Result;

pub async fn handle_serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    println!("🚀 Starting AllyCat web app");
    println!("===========================\n");
    println!("📍 Host: {host}");
    println!("🔌 Port: {port}");
    println!(
        "🌐 CORS: {}",
        if config.server.enable_cors {
            "Enabled"
        } else {
            "Disabled"
        }
    );
    println!();

    serve_api(config, &host, port).await
}
