//! Staff commands: `/claim` and `/close` inside a ticket channel.

use std::time::Duration;

use tokio::{task::JoinHandle, time::Instant};
use tracing::{Instrument, error, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        messages,
        types::{ChannelId, CommandDef, InteractionRef, InteractionReply, RoleId, TicketState, UserId, Void},
    },
    service::{chat::ChatClient, store::TicketStore},
};

/// Commands registered in the guild.
pub const COMMANDS: [CommandDef; 2] = [
    CommandDef {
        name: "claim",
        description: "Claim this ticket.",
    },
    CommandDef {
        name: "close",
        description: "Close this ticket.",
    },
];

/// A command staff can run in a ticket channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaffCommand {
    Claim,
    Close,
}

impl StaffCommand {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "claim" => Some(Self::Claim),
            "close" => Some(Self::Close),
            _ => None,
        }
    }
}

/// A staff command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub interaction: InteractionRef,
    pub command: StaffCommand,
    pub user: UserId,
    pub username: String,
    pub roles: Vec<RoleId>,
    pub channel: ChannelId,
}

/// Staff role, admin role, or the admin user.
pub fn is_authorized(config: &Config, user: UserId, roles: &[RoleId]) -> bool {
    roles.contains(&config.staff_role_id) || roles.contains(&config.admin_role_id) || user == config.admin_user_id
}

/// Registers the staff commands once the gateway is ready.
#[instrument(skip_all)]
pub fn handle_ready(chat: ChatClient) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            match chat.register_commands(&COMMANDS).await {
                Ok(()) => info!("Slash commands registered."),
                Err(err) => error!("Failed to register slash commands: {}", err),
            }
        }
        .in_current_span(),
    )
}

/// Handles a staff command.
///
/// Spawns a task that runs the command. On failure the error is logged and the caller
/// gets a best-effort, ephemeral failure reply.
#[instrument(skip_all)]
pub fn handle_command(invocation: Invocation, config: Config, store: TicketStore, chat: ChatClient) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            // Process the event.
            let result = process_command(&invocation, &config, &store, &chat).await;

            // Log any errors, and tell the caller.
            if let Err(err) = &result {
                error!("Error while handling command: {}", err);

                let reply = InteractionReply::Message {
                    content: messages::SOMETHING_WENT_WRONG.to_string(),
                    ephemeral: true,
                };

                if let Err(err) = chat.respond(&invocation.interaction, &reply).await {
                    warn!("Could not report the failure to the caller: {}", err);
                }
            }
        }
        .in_current_span(),
    )
}

/// Checks authorization and runs the command.
#[instrument(skip_all, fields(command = ?invocation.command, user = invocation.user, channel = invocation.channel))]
pub async fn process_command(invocation: &Invocation, config: &Config, store: &TicketStore, chat: &ChatClient) -> Void {
    if !is_authorized(config, invocation.user, &invocation.roles) {
        warn!("User {} is not allowed to run {:?}.", invocation.user, invocation.command);

        let reply = InteractionReply::Message {
            content: messages::NO_PERMISSION.to_string(),
            ephemeral: true,
        };

        return chat.respond(&invocation.interaction, &reply).await;
    }

    match invocation.command {
        StaffCommand::Claim => claim(invocation, config, store, chat).await,
        StaffCommand::Close => close(invocation, config, store, chat).await,
    }
}

/// Moves the channel into the claimant's grouping and notifies the requester.
async fn claim(invocation: &Invocation, config: &Config, store: &TicketStore, chat: &ChatClient) -> Void {
    // A closed ticket stays where it is until it is deleted.

    if let Some(ticket) = store.ticket_for_channel(invocation.channel).await?
        && ticket.state == TicketState::Closed
    {
        warn!("Ticket {} is closed; refusing claim by {}.", ticket.number, invocation.username);

        let reply = InteractionReply::Message {
            content: messages::TICKET_ALREADY_CLOSED.to_string(),
            ephemeral: true,
        };

        return chat.respond(&invocation.interaction, &reply).await;
    }

    let category = config.claimed_category(&invocation.username);
    let parent = chat.ensure_category(&category).await?;

    chat.set_channel_parent(invocation.channel, parent).await?;

    let ticket = store.claim(invocation.channel, invocation.user).await?;

    chat.respond(
        &invocation.interaction,
        &InteractionReply::Message {
            content: messages::CLAIM_SUCCESS.to_string(),
            ephemeral: false,
        },
    )
    .await?;

    // Notify the ticket's requester (not the claimant).

    let Some(ticket) = ticket else {
        warn!("Channel {} has no open ticket on record; cannot notify the requester.", invocation.channel);
        return Ok(());
    };

    info!("Ticket {} claimed by {}.", ticket.number, invocation.username);

    if let Err(err) = chat.send_direct_message(ticket.requester, &messages::claimed_notification(&invocation.username)).await {
        warn!("Cannot notify requester {}: {}", ticket.requester, err);
    }

    Ok(())
}

/// Acknowledges, then deletes the channel once the close delay elapsed.
async fn close(invocation: &Invocation, config: &Config, store: &TicketStore, chat: &ChatClient) -> Void {
    chat.respond(
        &invocation.interaction,
        &InteractionReply::Message {
            content: messages::CLOSING_TICKET.to_string(),
            ephemeral: false,
        },
    )
    .await?;

    match store.close(invocation.channel).await? {
        Some(ticket) => info!("Ticket {} closed by {}.", ticket.number, invocation.username),
        None => warn!("Channel {} has no ticket on record; deleting anyway.", invocation.channel),
    }

    schedule_delete(chat.clone(), invocation.channel, Duration::from_secs(config.close_delay_secs));

    Ok(())
}

/// Deletes a channel after `delay`; not cancellable.
fn schedule_delete(chat: ChatClient, channel: ChannelId, delay: Duration) -> JoinHandle<()> {
    let deadline = Instant::now() + delay;

    tokio::spawn(
        async move {
            tokio::time::sleep_until(deadline).await;

            if let Err(err) = chat.delete_channel(channel).await {
                error!("Failed to delete channel {}: {}", channel, err);
            }
        }
        .in_current_span(),
    )
}
