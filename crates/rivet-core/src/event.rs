//! Incoming event model.
//!
//! [`Event`] follows the OneBot v11 event shape. Only the fields the rule
//! layer reads are modelled; everything else stays with the transport.
//!
//! The type of an event is a three-level triple `post_type/detail_type/sub_type`,
//! for example `message/group/normal`. [`Event::matches_type`] compares any
//! prefix of that triple.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::types::{MemberRole, Sender};

// ============================================================================
// Event Type Classification
// ============================================================================

/// Classification of event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Message events (private messages, group messages, etc.)
    Message,
    /// Notice events (group changes, recalls, friend adds, etc.)
    Notice,
    /// Request events (friend requests, group join requests, etc.)
    Request,
    /// Meta events (lifecycle, heartbeat, etc.)
    Meta,
    /// Other/unknown event types
    Other,
}

impl FromStr for EventType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "message" => EventType::Message,
            "notice" => EventType::Notice,
            "request" => EventType::Request,
            "meta" | "meta_event" => EventType::Meta,
            _ => EventType::Other,
        })
    }
}

// ============================================================================
// Event
// ============================================================================

/// A received event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unix timestamp of the event.
    #[serde(default)]
    pub time: i64,
    /// ID of the bot account that received the event.
    #[serde(default)]
    pub self_id: i64,
    /// Top-level type (`message`, `notice`, `request`, `meta_event`).
    pub post_type: String,
    /// Second-level type (`private`, `group`, `guild`, ...).
    #[serde(
        default,
        alias = "message_type",
        alias = "notice_type",
        alias = "request_type",
        alias = "meta_event_type"
    )]
    pub detail_type: String,
    /// Third-level type (`normal`, `friend`, `anonymous`, ...).
    #[serde(default)]
    pub sub_type: String,
    /// Message ID, for message events.
    #[serde(default)]
    pub message_id: i64,
    /// The user who triggered the event.
    #[serde(default)]
    pub user_id: i64,
    /// The group the event happened in, if any.
    #[serde(default)]
    pub group_id: Option<i64>,
    /// Message content, for message events.
    #[serde(default)]
    pub message: Message,
    /// Raw CQ-code form of the message, as reported by the implementation.
    #[serde(default)]
    pub raw_message: String,
    /// Sender information, for message events.
    #[serde(default)]
    pub sender: Sender,
    /// Whether the message was addressed to the bot (mention or nickname).
    #[serde(default)]
    pub to_me: bool,
}

impl Event {
    /// Creates a private message event.
    pub fn private_message(user_id: i64, message: impl Into<Message>) -> Self {
        Self {
            post_type: "message".into(),
            detail_type: "private".into(),
            sub_type: "friend".into(),
            user_id,
            message: message.into(),
            sender: Sender {
                user_id: Some(user_id),
                ..Default::default()
            },
            to_me: true,
            ..Default::default()
        }
    }

    /// Creates a group message event.
    pub fn group_message(group_id: i64, user_id: i64, message: impl Into<Message>) -> Self {
        Self {
            post_type: "message".into(),
            detail_type: "group".into(),
            sub_type: "normal".into(),
            user_id,
            group_id: Some(group_id),
            message: message.into(),
            sender: Sender {
                user_id: Some(user_id),
                role: Some(MemberRole::Member.as_str().into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Sets the message id (builder pattern).
    pub fn with_message_id(mut self, message_id: i64) -> Self {
        self.message_id = message_id;
        self
    }

    /// Sets the sender's group role (builder pattern).
    pub fn with_role(mut self, role: MemberRole) -> Self {
        self.sender.role = Some(role.as_str().into());
        self
    }

    /// Marks the event as addressed to the bot (builder pattern).
    pub fn with_to_me(mut self, to_me: bool) -> Self {
        self.to_me = to_me;
        self
    }

    /// Returns the high-level event type classification.
    pub fn event_type(&self) -> EventType {
        self.post_type.parse().unwrap_or(EventType::Other)
    }

    /// Returns true for message events.
    pub fn is_message(&self) -> bool {
        self.event_type() == EventType::Message
    }

    /// Returns true for group message events.
    pub fn is_group(&self) -> bool {
        self.is_message() && self.detail_type == "group"
    }

    /// Returns true for private message events.
    pub fn is_private(&self) -> bool {
        self.is_message() && self.detail_type == "private"
    }

    /// Returns true for guild message events.
    pub fn is_guild(&self) -> bool {
        self.is_message() && self.detail_type == "guild"
    }

    /// Returns the sender's role within the group.
    pub fn sender_role(&self) -> MemberRole {
        self.sender.member_role()
    }

    /// Returns the plain-text projection of the message.
    pub fn plain_text(&self) -> String {
        self.message.extract_plain_text()
    }

    /// Matches a `post_type[/detail_type[/sub_type]]` descriptor.
    ///
    /// Only the levels present in the descriptor are compared, so `"message"`
    /// matches every message event and `"message/group"` every group message.
    pub fn matches_type(&self, descriptor: &str) -> bool {
        let levels = [&self.post_type, &self.detail_type, &self.sub_type];
        descriptor
            .splitn(3, '/')
            .zip(levels)
            .all(|(expected, actual)| expected == actual)
    }
}
