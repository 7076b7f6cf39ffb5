//! The pattern rule.

use std::sync::Arc;

use async_trait::async_trait;
use rivet_core::segment::{AT, REPLY};
use rivet_core::{Context, Segment};
use tracing::{trace, warn};

use crate::keys::PATTERN_MATCHED;
use crate::pattern::{ParseResult, Pattern};
use crate::rule::Rule;

/// Matches the event's message against a [`Pattern`].
///
/// Replying to a message in most clients inserts a mention of the quoted
/// author right after the reply segment. Before matching, such a mention is
/// dropped when the history lookup confirms it targets the quoted author;
/// otherwise, or if the lookup fails, it is kept.
///
/// On success the per-segment results are appended to the
/// `Vec<ParseResult>` stored under `pattern_matched`. A failed match leaves
/// the state untouched.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pattern: Arc<Pattern>,
}

impl PatternRule {
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern: Arc::new(pattern),
        }
    }

    /// Returns the wrapped pattern.
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }
}

impl From<Pattern> for PatternRule {
    fn from(pattern: Pattern) -> Self {
        Self::new(pattern)
    }
}

/// Shorthand for [`PatternRule::new`].
pub fn pattern(pattern: Pattern) -> PatternRule {
    PatternRule::new(pattern)
}

#[async_trait]
impl Rule for PatternRule {
    async fn check(&self, ctx: &mut Context) -> bool {
        let segments = strip_reply_mentions(ctx).await;
        let Some(results) = self.pattern.matches(&segments) else {
            return false;
        };
        trace!(rule = "pattern", slots = results.len(), "pattern matched");
        ctx.state_mut()
            .get_or_default::<Vec<ParseResult>>(PATTERN_MATCHED)
            .extend(results);
        true
    }
}

/// Copies the message, dropping each mention that directly follows a reply
/// to a message written by the mentioned user.
async fn strip_reply_mentions(ctx: &Context) -> Vec<Segment> {
    let message = &ctx.event().message;
    let mut segments = Vec::with_capacity(message.len());
    for (index, segment) in message.iter().enumerate() {
        if index > 0 && message[index - 1].is(REPLY) && segment.is(AT) {
            if mentions_quoted_author(ctx, &message[index - 1], segment).await {
                continue;
            }
        }
        segments.push(segment.clone());
    }
    segments
}

async fn mentions_quoted_author(ctx: &Context, reply: &Segment, at: &Segment) -> bool {
    let quoted_id = reply.field("id");
    match ctx.bot().get_message(quoted_id).await {
        Ok(history) => history
            .resolved_sender()
            .is_some_and(|sender| sender.to_string() == at.field("qq")),
        Err(err) => {
            warn!(message_id = quoted_id, error = %err, "failed to resolve quoted message");
            false
        }
    }
}
