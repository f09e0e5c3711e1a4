//! Support-type selection: open a private ticket channel and route it to staff.

use chrono::Local;
use tokio::task::JoinHandle;
use tracing::{Instrument, error, info, instrument, warn};

use crate::{
    base::{
        config::Config,
        messages,
        types::{Access, InteractionRef, InteractionReply, Priority, RoleOverwrite, Ticket, TicketState, UserId, Void, category_label},
    },
    service::{chat::ChatClient, store::TicketStore},
};

/// A selection made on the support menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub interaction: InteractionRef,
    pub requester: UserId,
    /// Machine value of the chosen option.
    pub value: String,
    /// Text recorded as the ticket's issue.
    pub issue: String,
}

/// Role overwrites of a new ticket channel.
///
/// `@everyone` shares its id with the guild.
pub fn ticket_overwrites(config: &Config) -> Vec<RoleOverwrite> {
    vec![
        RoleOverwrite {
            role: config.guild_id,
            access: Access::Hidden,
        },
        RoleOverwrite {
            role: config.staff_role_id,
            access: Access::ViewAndSend,
        },
        RoleOverwrite {
            role: config.admin_role_id,
            access: Access::ViewAndSend,
        },
    ]
}

/// Handles a support menu selection.
///
/// Spawns a task that opens the ticket. On failure the error is logged and the requester
/// gets a best-effort failure reply.
#[instrument(skip_all)]
pub fn handle_selection(selection: Selection, config: Config, store: TicketStore, chat: ChatClient) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            // Process the event.
            let result = process_selection(&selection, &config, &store, &chat).await;

            // Log any errors, and tell the requester.
            if let Err(err) = &result {
                error!("Error while handling selection: {}", err);

                let reply = InteractionReply::UpdateMenu {
                    content: messages::SOMETHING_WENT_WRONG.to_string(),
                };

                if let Err(err) = chat.respond(&selection.interaction, &reply).await {
                    warn!("Could not report the failure to the requester: {}", err);
                }
            }
        }
        .in_current_span(),
    )
}

/// Opens a ticket for the selection.
///
/// The steps are not transactional: a failure after the channel exists leaves it in place.
#[instrument(skip_all, fields(requester = selection.requester, value = %selection.value))]
pub async fn process_selection(selection: &Selection, config: &Config, store: &TicketStore, chat: &ChatClient) -> Void {
    let priority = Priority::from_selection(&selection.value);
    let category = category_label(&selection.value);
    let created_at = Local::now();

    // Find or create the grouping for new tickets.

    let parent = chat.ensure_category(&config.unclaimed_category).await?;

    // Provision the ticket channel.

    let number = store.next_ticket_number().await?;
    let channel = chat.create_ticket_channel(&number.channel_name(), parent, &ticket_overwrites(config)).await?;

    store
        .record_ticket(Ticket {
            number,
            requester: selection.requester,
            channel,
            category: category.clone(),
            priority,
            created_at,
            state: TicketState::Unclaimed,
        })
        .await?;

    info!("Opened ticket {} in channel {}.", number, channel);

    // Brief the staff, then acknowledge.

    let time = created_at.format(&config.time_format).to_string();
    let message = messages::new_ticket_message(selection.requester, &selection.issue, &category, priority, &time);

    chat.send_channel_message(channel, &message).await?;

    chat.respond(
        &selection.interaction,
        &InteractionReply::UpdateMenu {
            content: messages::TICKET_CREATED.to_string(),
        },
    )
    .await?;

    Ok(())
}
