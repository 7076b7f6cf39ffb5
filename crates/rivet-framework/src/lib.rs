//! # Rivet Framework
//!
//! Deciding whether a handler should run for an event, and handing it what
//! was matched.
//!
//! - **Rules**: the [`Rule`] predicate and the built-in [`rules`]
//! - **Patterns**: structural matching of a message's segments
//!   ([`Pattern`]), bound back into handler values through
//!   [`PatternMatches`]
//! - **Follow-up waits**: [`FutureEvents`], for rules that must wait for the
//!   user's next message
//! - **Extractors**: [`FromContext`] and typed wrappers for rule output
//!
//! ## Example
//!
//! ```rust,ignore
//! use rivet_framework::prelude::*;
//!
//! let config = Arc::new(RuleConfig::new([10001], "/"));
//! let rules: Vec<BoxedRule> = vec![
//!     boxed(only_group),
//!     boxed(admin(config.clone())),
//!     boxed(pattern(Pattern::new().text(r"^mute (\d+)m$").name("minutes").at().name("who"))),
//! ];
//!
//! let mut ctx = Context::new(event, bot);
//! if check_all(&rules, &mut ctx).await {
//!     let matches = PatternMatches::from_context(&ctx)?;
//!     let minutes = matches.required_text("minutes")?;
//! }
//! ```

pub mod config;
pub mod error;
pub mod extractor;
pub mod future;
pub mod keys;
pub mod pattern;
pub mod rule;
pub mod rules;
pub mod split;

#[cfg(test)]
pub(crate) mod testing;

pub use config::RuleConfig;
pub use error::{PatternError, PatternResult, WaitError};
pub use extractor::{
    Args, CommandName, FromContext, FullMatched, ImageUrls, Keyword, Prefix, RegexMatched, Suffix,
};
pub use future::{FutureEvent, FutureEvents, Pending};
pub use pattern::{
    FromMatches, Matched, ParseResult, ParsedValue, Pattern, PatternMatches, PatternSegment,
    SlotKey,
};
pub use rule::{BoxedRule, Rule, boxed, check_all};
pub use split::shell_split;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::rules::*;
    pub use crate::{
        Args, BoxedRule, CommandName, FromContext, FromMatches, FutureEvent, FutureEvents,
        ImageUrls, Matched, ParseResult, Pattern, PatternMatches, RuleConfig, Rule, WaitError,
        boxed, check_all,
    };
    pub use rivet_core::{Context, Event, Message, Segment};
    pub use std::sync::Arc;
}
