//! RAX Chat Server - Entry Point
//!
//! A small TCP chat server: clients send their name, then lines of chat
//! that the server logs until they type `exit`.

use log::{error, info};
use std::process::ExitCode;

use rax_chat_server::error::handlers::{exit_code, handle_error};
use rax_chat_server::{ChatServerError, Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize the logger (env_logger picks up RUST_LOG, defaulting to info)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Launching chat server...");

    match run().await {
        Ok(()) => {
            info!("Chat server stopped");
            ExitCode::SUCCESS
        }
        Err(e) => {
            handle_error(&e);
            ExitCode::from(exit_code(&e))
        }
    }
}

async fn run() -> Result<(), ChatServerError> {
    let config = ServerConfig::load()?;
    let server = Server::bind(config).await?;

    server.run_until(shutdown_signal()).await;
    Ok(())
}

/// Resolves on Ctrl-C. If the handler cannot be installed the server runs until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
}
