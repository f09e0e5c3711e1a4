pub mod discord;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, instrument};

use crate::base::types::{ChannelId, CommandDef, InteractionRef, InteractionReply, Menu, MessageId, Res, RoleOverwrite, UserId, Void};

// Traits.

/// Generic "chat" trait that clients must implement.
///
/// This trait is the seam between the ticket workflow and the chat platform. Implementing
/// it allows the handlers to run against a different platform, or a mock in tests.
#[async_trait]
pub trait GenericChatClient: Send + Sync + 'static {
    /// Start the chat client listener.
    ///
    /// Connects to the platform, dispatches inbound events, and blocks until shutdown.
    async fn start(&self) -> Void;

    /// Register the bot's slash commands in the configured workspace.
    async fn register_commands(&self, commands: &[CommandDef]) -> Void;

    /// Find a top-level channel category by exact name.
    async fn find_category(&self, name: &str) -> Res<Option<ChannelId>>;

    /// Create a top-level channel category.
    async fn create_category(&self, name: &str) -> Res<ChannelId>;

    /// Create a text channel under `parent` with the given role overwrites.
    async fn create_ticket_channel(&self, name: &str, parent: ChannelId, overwrites: &[RoleOverwrite]) -> Res<ChannelId>;

    /// Move a channel under another category.
    async fn set_channel_parent(&self, channel: ChannelId, parent: ChannelId) -> Void;

    /// Post a plain message into a channel.
    async fn send_channel_message(&self, channel: ChannelId, content: &str) -> Res<MessageId>;

    /// Post a single-select menu, optionally as a reply to another message.
    async fn send_menu(&self, channel: ChannelId, reply_to: Option<MessageId>, menu: &Menu) -> Void;

    /// Send a direct message to a user.
    ///
    /// Fails when the user does not exist or does not accept direct messages.
    async fn send_direct_message(&self, user: UserId, content: &str) -> Void;

    /// Delete a channel.
    async fn delete_channel(&self, channel: ChannelId) -> Void;

    /// Respond to a pending interaction.
    async fn respond(&self, interaction: &InteractionRef, reply: &InteractionReply) -> Void;
}

// Structs.

/// Chat client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct ChatClient {
    inner: Arc<dyn GenericChatClient>,
    category_lock: Arc<Mutex<()>>,
}

impl Deref for ChatClient {
    type Target = dyn GenericChatClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl ChatClient {
    pub fn new(inner: Arc<dyn GenericChatClient>) -> Self {
        Self::with_category_lock(inner, Arc::default())
    }

    /// Wraps `inner`, serializing category creation on `category_lock`.
    ///
    /// Clients that wrap the same platform connection must share one lock.
    pub fn with_category_lock(inner: Arc<dyn GenericChatClient>, category_lock: Arc<Mutex<()>>) -> Self {
        Self { inner, category_lock }
    }

    /// Find-or-create a category by name.
    ///
    /// The lookup and the creation run under one lock, so concurrent callers of the
    /// same client never create duplicate categories.
    #[instrument(skip(self))]
    pub async fn ensure_category(&self, name: &str) -> Res<ChannelId> {
        let _guard = self.category_lock.lock().await;

        if let Some(id) = self.inner.find_category(name).await? {
            return Ok(id);
        }

        info!("Creating category `{}` ...", name);

        self.inner.create_category(name).await
    }
}
