//! In-memory ticket store.
//!
//! State lives for the lifetime of the process; a restart starts over at ticket `001`.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::base::types::{ChannelId, Res, Ticket, TicketNumber, TicketState, UserId};

use super::{GenericTicketStore, TicketStore};

// Extra methods on `TicketStore` applied by the memory implementation.

impl TicketStore {
    /// Creates a new, empty in-memory ticket store.
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryTicketStore::default()))
    }
}

// Structs.

#[derive(Debug)]
struct State {
    next_number: TicketNumber,
    /// Requester -> open ticket channel.
    registry: HashMap<UserId, ChannelId>,
    /// Channel -> ticket record.
    tickets: HashMap<ChannelId, Ticket>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            next_number: TicketNumber::FIRST,
            registry: HashMap::new(),
            tickets: HashMap::new(),
        }
    }
}

/// Mutex-guarded ticket state.
#[derive(Debug, Default)]
pub struct MemoryTicketStore {
    state: Mutex<State>,
}

#[async_trait]
impl GenericTicketStore for MemoryTicketStore {
    async fn next_ticket_number(&self) -> Res<TicketNumber> {
        let mut state = self.state.lock().await;

        let number = state.next_number;
        state.next_number = number.next();

        Ok(number)
    }

    async fn record_ticket(&self, ticket: Ticket) -> Res<()> {
        let mut state = self.state.lock().await;

        if let Some(previous) = state.registry.insert(ticket.requester, ticket.channel) {
            debug!("Requester {} already had ticket channel {}; overwriting.", ticket.requester, previous);
        }

        state.tickets.insert(ticket.channel, ticket);

        Ok(())
    }

    async fn requester_channel(&self, requester: UserId) -> Res<Option<ChannelId>> {
        Ok(self.state.lock().await.registry.get(&requester).copied())
    }

    async fn ticket_for_channel(&self, channel: ChannelId) -> Res<Option<Ticket>> {
        Ok(self.state.lock().await.tickets.get(&channel).cloned())
    }

    async fn claim(&self, channel: ChannelId, claimant: UserId) -> Res<Option<Ticket>> {
        let mut state = self.state.lock().await;

        let Some(ticket) = state.tickets.get_mut(&channel) else {
            return Ok(None);
        };

        if ticket.state == TicketState::Closed {
            warn!("Ticket {} is closed; ignoring claim.", ticket.number);
            return Ok(None);
        }

        ticket.state = TicketState::Claimed { claimant };

        Ok(Some(ticket.clone()))
    }

    async fn close(&self, channel: ChannelId) -> Res<Option<Ticket>> {
        let mut state = self.state.lock().await;

        let Some(ticket) = state.tickets.get_mut(&channel) else {
            return Ok(None);
        };

        ticket.state = TicketState::Closed;
        let ticket = ticket.clone();

        // Only drop the registry entry if it is still this ticket.
        if state.registry.get(&ticket.requester) == Some(&channel) {
            state.registry.remove(&ticket.requester);
        }

        Ok(Some(ticket))
    }
}

// Tests.
