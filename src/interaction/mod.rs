//! Event handling and user interactions for ticket-bot.
//!
//! This module turns inbound chat events into ticket workflow steps:
//! - Answering direct messages with the support-type menu
//! - Opening and routing ticket channels on selection
//! - Running staff `/claim` and `/close` commands

pub mod intake;
pub mod routing;
pub mod staff;

use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use crate::{
    base::{config::Config, types::ChatEvent},
    service::{chat::ChatClient, store::TicketStore},
};

/// Routes an event to its handler.
///
/// Returns the spawned handler task, or `None` when the event is ignored.
#[instrument(skip_all)]
pub fn dispatch(event: ChatEvent, config: Config, store: TicketStore, chat: ChatClient) -> Option<JoinHandle<()>> {
    match event {
        ChatEvent::DirectMessage { author_is_bot: true, author, .. } => {
            debug!("Skipping direct message from bot {}.", author);
            None
        }
        ChatEvent::DirectMessage { channel, message, .. } => Some(intake::handle_direct_message(channel, message, chat)),
        ChatEvent::MenuSelection {
            interaction,
            user,
            custom_id,
            values,
            prompt_content,
            original_content,
        } => {
            if custom_id != intake::SUPPORT_MENU_ID {
                warn!("Skipping selection on unknown menu `{}`.", custom_id);
                return None;
            }

            let Some(value) = values.into_iter().next() else {
                warn!("Skipping selection without a value.");
                return None;
            };

            // Prefer the requester's own words over the menu prompt.
            let issue = original_content.filter(|c| !c.trim().is_empty()).unwrap_or(prompt_content);

            let selection = routing::Selection {
                interaction,
                requester: user,
                value,
                issue,
            };

            Some(routing::handle_selection(selection, config, store, chat))
        }
        ChatEvent::SlashCommand {
            interaction,
            name,
            user,
            username,
            roles,
            channel,
        } => {
            let Some(command) = staff::StaffCommand::parse(&name) else {
                warn!("Skipping unknown command `{}`.", name);
                return None;
            };

            let invocation = staff::Invocation {
                interaction,
                command,
                user,
                username,
                roles,
                channel,
            };

            Some(staff::handle_command(invocation, config, store, chat))
        }
    }
}
