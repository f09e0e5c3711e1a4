//! Library root for `ticket-bot`.
//!
//! Ticket-bot is a Discord support-ticket assistant designed to:
//! - Greet direct messages with a support-type menu
//! - Open a private, prioritized ticket channel per request
//! - Let staff claim and close tickets with slash commands
//!
//! The bot integrates with Discord for chat and keeps its ticket state in memory.
//! The architecture is built around extensible traits that allow for different
//! implementations of each service.

pub mod base;
pub mod interaction;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the ticket-bot runtime:
/// - Creates the runtime context with the ticket store and chat client
/// - Starts the gateway loop that dispatches events to the handlers
pub async fn start(config: Config) -> Void {
    info!("Starting ticket-bot ...");

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config).await?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
