//! User-facing message templates.

use super::types::{Priority, UserId};

/// Replaces the support menu once a selection has been handled.
pub const TICKET_CREATED: &str = "✅ Your ticket has been created!";

/// Text of the intake menu message.
pub const MENU_PROMPT: &str = "Please select the type of support you need:";

/// Placeholder of the intake menu.
pub const MENU_PLACEHOLDER: &str = "Select the type of support you need";

/// Ephemeral reply to staff commands from unauthorized users.
pub const NO_PERMISSION: &str = "❌ You do not have permission.";

/// Reply to a successful claim.
pub const CLAIM_SUCCESS: &str = "✅ Ticket claimed and moved to your category.";

/// Ephemeral reply to a claim on a ticket that is being closed.
pub const TICKET_ALREADY_CLOSED: &str = "❌ This ticket is already closed.";

/// Reply to a close, visible until the channel is deleted.
pub const CLOSING_TICKET: &str = "🗑️ Closing ticket...";

/// Best-effort reply when handling an interaction failed.
pub const SOMETHING_WENT_WRONG: &str = "⚠️ Something went wrong while handling your request. Please try again or contact a staff member.";

/// First message posted into a new ticket channel.
pub fn new_ticket_message(requester: UserId, issue: &str, category: &str, priority: Priority, time: &str) -> String {
    format!(
        "Ticket created by <@{requester}>:\n\n\
         **Issue**: {issue}\n\
         **Category**: {category}\n\
         **Priority**: {priority}\n\
         **Time of Request**: {time}"
    )
}

/// Direct message to a requester once staff claimed the ticket.
pub fn claimed_notification(staff_name: &str) -> String {
    format!("📬 Your ticket has been claimed by {staff_name}! Hang tight — we’ll assist you shortly.")
}
