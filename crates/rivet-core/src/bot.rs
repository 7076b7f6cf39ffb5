//! Bot collaborator interface.
//!
//! The rule layer never talks to the wire directly. Everything it needs from
//! the outside world (history lookup, group member lookup, sending a prompt)
//! goes through the [`Bot`] trait, which adapters implement and tests mock.
//! Implementations must be callable concurrently from several event
//! evaluations.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::event::Event;
use crate::message::Message;
use crate::types::MemberRole;

/// A message fetched from history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryMessage {
    /// ID of the message.
    pub message_id: i64,
    /// ID of the user who sent it, when the implementation reports one.
    pub sender_id: Option<i64>,
}

impl HistoryMessage {
    /// Returns the sender id if the lookup produced a usable record.
    ///
    /// A zero message id or a missing/zero sender counts as "not found".
    pub fn resolved_sender(&self) -> Option<i64> {
        if self.message_id == 0 {
            return None;
        }
        self.sender_id.filter(|id| *id != 0)
    }
}

/// Outbound capabilities consumed by the rule layer.
#[async_trait]
pub trait Bot: Send + Sync {
    /// Returns the bot's self ID.
    fn id(&self) -> &str;

    /// Looks up a message by id.
    async fn get_message(&self, message_id: &str) -> ApiResult<HistoryMessage>;

    /// Resolves a user's role within a group.
    async fn get_group_member_role(&self, group_id: i64, user_id: i64) -> ApiResult<MemberRole>;

    /// Sends a message into the session the event came from.
    ///
    /// Returns the id of the sent message.
    async fn send(&self, event: &Event, message: Message) -> ApiResult<i64>;
}

/// A shared, type-erased bot handle.
pub type BoxedBot = Arc<dyn Bot>;
