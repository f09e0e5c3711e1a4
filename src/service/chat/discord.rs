//! Discord integration for ticket-bot.
//!
//! This module provides the `GenericChatClient` implementation backed by serenity:
//! - A gateway listener that converts DMs, menu selections, and slash commands into `ChatEvent`s
//! - REST calls for categories, channels, messages, and interaction responses
//!
//! No serenity type leaves this module.

use crate::{
    base::{
        config::Config,
        types::{Access, ChannelId, ChatEvent, CommandDef, InteractionRef, InteractionReply, Menu, MessageId, Res, RoleOverwrite, UserId, Void},
    },
    interaction,
    service::store::TicketStore,
};
use async_trait::async_trait;
use serenity::all::{
    ChannelId as DiscordChannelId, ChannelType, ComponentInteractionDataKind, Context, CreateActionRow, CreateChannel, CreateCommand, CreateInteractionResponse,
    CreateInteractionResponseMessage, CreateMessage, CreateSelectMenu, CreateSelectMenuKind, CreateSelectMenuOption, EditChannel, EventHandler, GatewayIntents, GuildId,
    Http, Interaction, InteractionId, Message, MessageId as DiscordMessageId, PermissionOverwrite, PermissionOverwriteType, Permissions, ReactionType, Ready,
    RoleId as DiscordRoleId, UserId as DiscordUserId,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use std::sync::Arc;

use super::{ChatClient, GenericChatClient};

// Extra methods on `ChatClient` applied by the discord implementation.

impl ChatClient {
    /// Creates a new Discord chat client.
    pub async fn discord(config: &Config, store: TicketStore) -> Res<Self> {
        let client = DiscordChatClient::new(config, store).await?;
        Ok(Self::from(client))
    }
}

impl From<DiscordChatClient> for ChatClient {
    fn from(client: DiscordChatClient) -> Self {
        let category_lock = client.category_lock.clone();
        Self::with_category_lock(Arc::new(client), category_lock)
    }
}

// Structs.

/// Gateway event handler state.
struct DiscordHandler {
    config: Config,
    store: TicketStore,
    chat: ChatClient,
}

/// Discord client implementation.
#[derive(Clone)]
struct DiscordChatClient {
    pub config: Config,
    pub guild: GuildId,
    pub http: Arc<Http>,
    pub store: TicketStore,
    /// Shared by every `ChatClient` wrapping this connection.
    pub category_lock: Arc<Mutex<()>>,
}

impl DiscordChatClient {
    /// Create a new Discord chat client.
    #[instrument(name = "DiscordChatClient::new", skip_all)]
    pub async fn new(config: &Config, store: TicketStore) -> Res<Self> {
        let http = Arc::new(Http::new(&config.discord_token));

        // Check the token before connecting to the gateway.

        let bot_user = http.get_current_user().await?;

        info!("Discord bot user: {} ({})", bot_user.name, bot_user.id);

        Ok(Self {
            config: config.clone(),
            guild: GuildId::new(config.guild_id),
            http,
            store,
            category_lock: Arc::default(),
        })
    }
}

#[async_trait]
impl GenericChatClient for DiscordChatClient {
    async fn start(&self) -> Void {
        let handler = DiscordHandler {
            config: self.config.clone(),
            store: self.store.clone(),
            chat: ChatClient::from(self.clone()),
        };

        let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT;

        let mut client = serenity::Client::builder(&self.config.discord_token, intents).event_handler(handler).await?;

        // Shut the shards down on Ctrl-C so `start` returns.

        let shard_manager = client.shard_manager.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Received Ctrl-C, shutting down ...");
                shard_manager.shutdown_all().await;
            }
        });

        client.start().await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn register_commands(&self, commands: &[CommandDef]) -> Void {
        let commands = commands.iter().map(|c| CreateCommand::new(c.name).description(c.description)).collect::<Vec<_>>();

        self.guild.set_commands(self.http.as_ref(), commands).await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_category(&self, name: &str) -> Res<Option<ChannelId>> {
        let channels = self.guild.channels(self.http.as_ref()).await?;

        // Lowest id wins if duplicates already exist.
        let id = channels
            .values()
            .filter(|c| c.kind == ChannelType::Category && c.name == name)
            .map(|c| c.id.get())
            .min();

        Ok(id)
    }

    #[instrument(skip(self))]
    async fn create_category(&self, name: &str) -> Res<ChannelId> {
        let builder = CreateChannel::new(name).kind(ChannelType::Category);
        let category = self.guild.create_channel(self.http.as_ref(), builder).await?;

        Ok(category.id.get())
    }

    #[instrument(skip(self))]
    async fn create_ticket_channel(&self, name: &str, parent: ChannelId, overwrites: &[RoleOverwrite]) -> Res<ChannelId> {
        let permissions = overwrites.iter().map(to_permission_overwrite).collect::<Vec<_>>();

        let builder = CreateChannel::new(name).kind(ChannelType::Text).category(DiscordChannelId::new(parent)).permissions(permissions);
        let channel = self.guild.create_channel(self.http.as_ref(), builder).await?;

        Ok(channel.id.get())
    }

    #[instrument(skip(self))]
    async fn set_channel_parent(&self, channel: ChannelId, parent: ChannelId) -> Void {
        let builder = EditChannel::new().category(Some(DiscordChannelId::new(parent)));

        DiscordChannelId::new(channel).edit(self.http.as_ref(), builder).await?;

        Ok(())
    }

    #[instrument(skip(self, content))]
    async fn send_channel_message(&self, channel: ChannelId, content: &str) -> Res<MessageId> {
        let message = DiscordChannelId::new(channel).say(self.http.as_ref(), content).await?;

        Ok(message.id.get())
    }

    #[instrument(skip(self, menu))]
    async fn send_menu(&self, channel: ChannelId, reply_to: Option<MessageId>, menu: &Menu) -> Void {
        let options = menu
            .options
            .iter()
            .map(|o| {
                let option = CreateSelectMenuOption::new(&o.label, &o.value);

                match &o.emoji {
                    Some(emoji) => option.emoji(ReactionType::Unicode(emoji.clone())),
                    None => option,
                }
            })
            .collect::<Vec<_>>();

        let select = CreateSelectMenu::new(&menu.custom_id, CreateSelectMenuKind::String { options }).placeholder(&menu.placeholder);

        let mut message = CreateMessage::new().content(&menu.content).components(vec![CreateActionRow::SelectMenu(select)]);

        if let Some(reply_to) = reply_to {
            message = message.reference_message((DiscordChannelId::new(channel), DiscordMessageId::new(reply_to)));
        }

        DiscordChannelId::new(channel).send_message(self.http.as_ref(), message).await?;

        Ok(())
    }

    #[instrument(skip(self, content))]
    async fn send_direct_message(&self, user: UserId, content: &str) -> Void {
        let user = self.http.get_user(DiscordUserId::new(user)).await?;

        user.direct_message(self.http.as_ref(), CreateMessage::new().content(content)).await?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_channel(&self, channel: ChannelId) -> Void {
        DiscordChannelId::new(channel).delete(self.http.as_ref()).await?;

        Ok(())
    }

    #[instrument(skip_all)]
    async fn respond(&self, interaction: &InteractionRef, reply: &InteractionReply) -> Void {
        let response = match reply {
            InteractionReply::UpdateMenu { content } => CreateInteractionResponse::UpdateMessage(CreateInteractionResponseMessage::new().content(content).components(vec![])),
            InteractionReply::Message { content, ephemeral } => {
                CreateInteractionResponse::Message(CreateInteractionResponseMessage::new().content(content).ephemeral(*ephemeral))
            }
        };

        self.http
            .create_interaction_response(InteractionId::new(interaction.id), &interaction.token, &response, vec![])
            .await
            .map_err(|e| anyhow::anyhow!("Failed to respond to interaction: {}", e))?;

        Ok(())
    }
}

// Gateway callbacks for Discord.

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Logged in as {}", ready.user.name);

        interaction::staff::handle_ready(self.chat.clone());
    }

    async fn message(&self, _ctx: Context, message: Message) {
        // Only direct messages open tickets.
        if message.guild_id.is_some() {
            return;
        }

        let event = ChatEvent::DirectMessage {
            author: message.author.id.get(),
            author_is_bot: message.author.bot,
            channel: message.channel_id.get(),
            message: message.id.get(),
        };

        interaction::dispatch(event, self.config.clone(), self.store.clone(), self.chat.clone());
    }

    async fn interaction_create(&self, _ctx: Context, incoming: Interaction) {
        let Some(event) = to_chat_event(incoming) else {
            debug!("Ignoring unsupported interaction.");
            return;
        };

        interaction::dispatch(event, self.config.clone(), self.store.clone(), self.chat.clone());
    }
}

// Helpers.

/// Converts a gateway interaction into a platform-neutral event.
fn to_chat_event(incoming: Interaction) -> Option<ChatEvent> {
    match incoming {
        Interaction::Component(component) => {
            let values = match &component.data.kind {
                ComponentInteractionDataKind::StringSelect { values } => values.clone(),
                _ => {
                    warn!("Ignoring non-select component `{}`.", component.data.custom_id);
                    return None;
                }
            };

            Some(ChatEvent::MenuSelection {
                interaction: InteractionRef {
                    id: component.id.get(),
                    token: component.token.clone(),
                },
                user: component.user.id.get(),
                custom_id: component.data.custom_id.clone(),
                values,
                prompt_content: component.message.content.clone(),
                original_content: component.message.referenced_message.as_ref().map(|m| m.content.clone()),
            })
        }
        Interaction::Command(command) => Some(ChatEvent::SlashCommand {
            interaction: InteractionRef {
                id: command.id.get(),
                token: command.token.clone(),
            },
            name: command.data.name.clone(),
            user: command.user.id.get(),
            username: command.user.name.clone(),
            roles: command.member.as_ref().map(|m| m.roles.iter().map(|r| r.get()).collect()).unwrap_or_default(),
            channel: command.channel_id.get(),
        }),
        _ => None,
    }
}

/// Converts a role overwrite into serenity's representation.
fn to_permission_overwrite(overwrite: &RoleOverwrite) -> PermissionOverwrite {
    let (allow, deny) = match overwrite.access {
        Access::Hidden => (Permissions::empty(), Permissions::VIEW_CHANNEL),
        Access::ViewAndSend => (Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES, Permissions::empty()),
    };

    PermissionOverwrite {
        allow,
        deny,
        kind: PermissionOverwriteType::Role(DiscordRoleId::new(overwrite.role)),
    }
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::config::ConfigInner;

    #[test]
    fn clients_over_one_connection_share_the_category_lock() {
        let config = Config::from(ConfigInner::new("token", 1, 100, 200, 300));
        let client = DiscordChatClient {
            guild: GuildId::new(config.guild_id),
            http: Arc::new(Http::new(&config.discord_token)),
            store: TicketStore::memory(),
            category_lock: Arc::default(),
            config,
        };

        let runtime_chat = ChatClient::from(client.clone());
        let handler_chat = ChatClient::from(client);
        let unrelated = ChatClient::new(handler_chat.inner.clone());

        assert!(Arc::ptr_eq(&runtime_chat.category_lock, &handler_chat.category_lock));
        assert!(!Arc::ptr_eq(&runtime_chat.category_lock, &unrelated.category_lock));
    }

    #[test]
    fn hidden_denies_view() {
        let overwrite = to_permission_overwrite(&RoleOverwrite { role: 1, access: Access::Hidden });

        assert_eq!(overwrite.allow, Permissions::empty());
        assert_eq!(overwrite.deny, Permissions::VIEW_CHANNEL);
        assert!(matches!(overwrite.kind, PermissionOverwriteType::Role(role) if role.get() == 1));
    }

    #[test]
    fn view_and_send_allows_both() {
        let overwrite = to_permission_overwrite(&RoleOverwrite { role: 2, access: Access::ViewAndSend });

        assert!(overwrite.allow.contains(Permissions::VIEW_CHANNEL));
        assert!(overwrite.allow.contains(Permissions::SEND_MESSAGES));
        assert!(overwrite.deny.is_empty());
    }
}
