use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{ChannelId, Res, Ticket, TicketNumber, UserId};

pub mod memory;

// Traits.

/// Generic ticket store trait that stores must implement.
///
/// This is the single owner of the ticket registry (requester -> open ticket channel),
/// the ticket records, and the ticket counter. Implementations serialize their writes.
#[async_trait]
pub trait GenericTicketStore: Send + Sync + 'static {
    /// Allocates the next ticket number.
    ///
    /// Numbers start at 1 and strictly increase for the lifetime of the store.
    async fn next_ticket_number(&self) -> Res<TicketNumber>;

    /// Records a freshly provisioned ticket.
    ///
    /// The requester's registry entry is overwritten with the ticket's channel.
    async fn record_ticket(&self, ticket: Ticket) -> Res<()>;

    /// Gets the channel of the requester's currently open ticket.
    async fn requester_channel(&self, requester: UserId) -> Res<Option<ChannelId>>;

    /// Gets the ticket backed by a channel.
    async fn ticket_for_channel(&self, channel: ChannelId) -> Res<Option<Ticket>>;

    /// Marks the ticket of a channel as claimed by `claimant`.
    ///
    /// Returns the updated ticket, or `None` when the channel is not a known ticket.
    /// Closed tickets cannot be claimed.
    async fn claim(&self, channel: ChannelId, claimant: UserId) -> Res<Option<Ticket>>;

    /// Marks the ticket of a channel as closed.
    ///
    /// Removes the requester's registry entry when it still points at this channel.
    async fn close(&self, channel: ChannelId) -> Res<Option<Ticket>>;
}

// Structs.

/// Ticket store for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct TicketStore {
    inner: Arc<dyn GenericTicketStore>,
}

impl Deref for TicketStore {
    type Target = dyn GenericTicketStore;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl TicketStore {
    pub fn new(inner: Arc<dyn GenericTicketStore>) -> Self {
        Self { inner }
    }
}
