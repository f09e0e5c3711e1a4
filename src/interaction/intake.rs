//! Direct-message intake: answer every DM with the support-type menu.

use tokio::task::JoinHandle;
use tracing::{Instrument, error, instrument};

use crate::{
    base::{
        messages,
        types::{ChannelId, Menu, MenuOption, MessageId, Void},
    },
    service::chat::ChatClient,
};

/// Component id of the support-type menu.
pub const SUPPORT_MENU_ID: &str = "support_type";

/// The support-type menu sent in reply to a direct message.
pub fn support_menu() -> Menu {
    let option = |label: &str, value: &str, emoji: &str| MenuOption {
        label: label.to_string(),
        value: value.to_string(),
        emoji: Some(emoji.to_string()),
    };

    Menu {
        custom_id: SUPPORT_MENU_ID.to_string(),
        content: messages::MENU_PROMPT.to_string(),
        placeholder: messages::MENU_PLACEHOLDER.to_string(),
        options: vec![
            option("Technical Support", "technical", "🛠️"),
            option("General Questions", "general", "💬"),
            option("Other", "other", "❓"),
        ],
    }
}

/// Handles a direct message.
///
/// Spawns a task that replies with the support menu; failures (e.g. blocked DMs) are logged.
#[instrument(skip_all)]
pub fn handle_direct_message(channel: ChannelId, message: MessageId, chat: ChatClient) -> JoinHandle<()> {
    tokio::spawn(
        async move {
            // Process the event.
            let result = process_direct_message(channel, message, &chat).await;

            // Log any errors.
            if let Err(err) = &result {
                error!("Error while handling direct message: {}", err);
            }
        }
        .in_current_span(),
    )
}

/// Replies to the direct message with the support menu.
#[instrument(skip(chat))]
pub async fn process_direct_message(channel: ChannelId, message: MessageId, chat: &ChatClient) -> Void {
    chat.send_menu(channel, Some(message), &support_menu()).await
}
