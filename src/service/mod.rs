//! Service integrations for external APIs and state.
//!
//! This module contains implementations for the services used by the ticket-bot:
//! - Chat services (e.g., Discord)
//! - Ticket storage (e.g., in-memory)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod chat;
pub mod store;
