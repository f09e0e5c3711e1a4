use std::fmt;

use chrono::{DateTime, Local};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

/// Opaque platform identifier of a user.
pub type UserId = u64;
/// Opaque platform identifier of a channel (or a channel category).
pub type ChannelId = u64;
/// Opaque platform identifier of a role.
pub type RoleId = u64;
/// Opaque platform identifier of a message.
pub type MessageId = u64;

// Tickets.

/// Sequential, process-lifetime ticket number.
///
/// Rendered zero-padded to at least three digits (`1` -> `001`, `1000` -> `1000`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TicketNumber(pub u32);

impl TicketNumber {
    /// The first number handed out after a start.
    pub const FIRST: TicketNumber = TicketNumber(1);

    /// The number following this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Name of the ticket channel carrying this number.
    pub fn channel_name(self) -> String {
        format!("ticket-{self}")
    }
}

impl fmt::Display for TicketNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:03}", self.0)
    }
}

/// Priority derived from the selected support type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Maps a menu value to a priority; anything unrecognized is `Low`.
    pub fn from_selection(value: &str) -> Self {
        match value {
            "technical" => Priority::High,
            "general" => Priority::Medium,
            _ => Priority::Low,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Priority::High => "HIGH PRIORITY",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        };

        f.write_str(label)
    }
}

/// Capitalizes the first character of a menu value, leaving the rest as-is.
pub fn category_label(value: &str) -> String {
    let mut chars = value.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Where a ticket is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketState {
    Unclaimed,
    Claimed { claimant: UserId },
    Closed,
}

/// A support ticket backed by a private channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub number: TicketNumber,
    pub requester: UserId,
    pub channel: ChannelId,
    pub category: String,
    pub priority: Priority,
    pub created_at: DateTime<Local>,
    pub state: TicketState,
}

// Platform-neutral shapes.

/// Reference to an interaction that still expects a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractionRef {
    pub id: u64,
    pub token: String,
}

/// A response to an interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionReply {
    /// Edit the message carrying the component and strip its components.
    UpdateMenu { content: String },
    /// Post a new message in response.
    Message { content: String, ephemeral: bool },
}

/// A single-select menu option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuOption {
    pub label: String,
    pub value: String,
    pub emoji: Option<String>,
}

/// A message carrying one single-select menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub custom_id: String,
    pub content: String,
    pub placeholder: String,
    pub options: Vec<MenuOption>,
}

/// Channel access granted (or denied) to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Cannot see the channel.
    Hidden,
    /// Can see the channel and post in it.
    ViewAndSend,
}

/// A per-role permission overwrite on a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleOverwrite {
    pub role: RoleId,
    pub access: Access,
}

/// A slash command the bot registers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDef {
    pub name: &'static str,
    pub description: &'static str,
}

/// Inbound events, already stripped of platform types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    DirectMessage {
        author: UserId,
        author_is_bot: bool,
        channel: ChannelId,
        message: MessageId,
    },
    MenuSelection {
        interaction: InteractionRef,
        user: UserId,
        custom_id: String,
        values: Vec<String>,
        /// Content of the message carrying the menu.
        prompt_content: String,
        /// Content of the message the menu replied to, when the platform supplies it.
        original_content: Option<String>,
    },
    SlashCommand {
        interaction: InteractionRef,
        name: String,
        user: UserId,
        username: String,
        roles: Vec<RoleId>,
        channel: ChannelId,
    },
}

// Tests.
