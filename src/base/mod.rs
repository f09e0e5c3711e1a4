//! Core components, types, and utilities for the ticket-bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - User-facing message templates.
//! - Ticket, event, and result types.

pub mod config;
pub mod messages;
pub mod types;
