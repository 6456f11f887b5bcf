//! Startup sequence: configuration, logging, server.

use std::path::Path;

use tokio::net::TcpListener;

use crate::config::{load_config, ServerConfig};
use crate::http::HttpServer;

/// Load the configuration file, or defaults when no path is given.
pub fn load_or_default(path: Option<&Path>) -> Result<ServerConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            Ok(config)
        }
        None => Ok(ServerConfig::default()),
    }
}

/// Build the server and bind its listener.
pub async fn bind(config: ServerConfig) -> Result<(HttpServer, TcpListener), Box<dyn std::error::Error>> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config)?;
    Ok((server, listener))
}
