//! Test doubles shared by the framework's unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rivet_core::{
    ApiError, ApiResult, Bot, BoxedBot, Context, Event, HistoryMessage, MemberRole, Message,
};

/// In-memory bot with canned history and member roles.
#[derive(Default)]
pub(crate) struct MockBot {
    history: HashMap<String, HistoryMessage>,
    roles: HashMap<(i64, i64), MemberRole>,
    sent: Mutex<Vec<Message>>,
    history_calls: AtomicUsize,
}

impl MockBot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_history(mut self, message_id: i64, sender_id: i64) -> Self {
        self.history.insert(
            message_id.to_string(),
            HistoryMessage {
                message_id,
                sender_id: Some(sender_id),
            },
        );
        self
    }

    pub(crate) fn with_role(mut self, group_id: i64, user_id: i64, role: MemberRole) -> Self {
        self.roles.insert((group_id, user_id), role);
        self
    }

    pub(crate) fn sent(&self) -> Vec<Message> {
        self.sent.lock().clone()
    }

    pub(crate) fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Bot for MockBot {
    fn id(&self) -> &str {
        "10000"
    }

    async fn get_message(&self, message_id: &str) -> ApiResult<HistoryMessage> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        self.history
            .get(message_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("message {message_id}")))
    }

    async fn get_group_member_role(&self, group_id: i64, user_id: i64) -> ApiResult<MemberRole> {
        self.roles
            .get(&(group_id, user_id))
            .copied()
            .ok_or_else(|| ApiError::NotFound(format!("member {user_id} in group {group_id}")))
    }

    async fn send(&self, _event: &Event, message: Message) -> ApiResult<i64> {
        let mut sent = self.sent.lock();
        sent.push(message);
        Ok(sent.len() as i64)
    }
}

/// Builds a context over a bot with no history and no roles.
pub(crate) fn context(event: Event) -> Context {
    Context::new(event, Arc::new(MockBot::new()))
}

/// Builds a context over the given bot.
pub(crate) fn context_with(event: Event, bot: &Arc<MockBot>) -> Context {
    let bot: BoxedBot = bot.clone();
    Context::new(event, bot)
}
