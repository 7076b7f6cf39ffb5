//! # Rivet
//!
//! Structural message patterns and composable rules for chat bots.
//!
//! ## Overview
//!
//! A chat message is a list of segments: text, mentions, images, replies.
//! Rivet decides whether a handler should run for an incoming event by
//! checking it against [rules](framework::rules). Rules read the event,
//! may ask the bot for more information, and leave what they matched in the
//! per-event state for the handler to pick up.
//!
//! ```text
//! event ──▶ FutureEvents::deliver ──▶ claimed by a waiting rule?
//!                                          │ no
//!                                          ▼
//!                     rules (prefix, command, pattern, permission, ...)
//!                                          │ all pass
//!                                          ▼
//!                          handler reads Context state
//! ```
//!
//! - **core**: segments, messages, events, the `Bot` API seam and `Context`
//! - **framework**: the `Pattern` matcher, `Rule` and built-in rules, and
//!   follow-up waits
//! - **runtime**: configuration loading and logging setup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rivet::prelude::*;
//!
//! let config = rivet::runtime::init()?;
//! let rule_config = config.rules.rule_config();
//!
//! let ban = pattern(
//!     Pattern::new()
//!         .text(r"^ban\s+(\d+)$").name("minutes")
//!         .at().name("who"),
//! );
//! let rules: Vec<BoxedRule> = vec![boxed(only_group), boxed(admin(rule_config)), boxed(ban)];
//!
//! if check_all(&rules, &mut ctx).await {
//!     let matches = PatternMatches::from_context(&ctx)?;
//!     let who = matches.at("who");
//! }
//! ```
//!
//! ## Features
//!
//! - `toml-config`: read `rivet.toml` / `config.toml` (default)
//! - `json-log`: JSON log output

pub use rivet_core as core;
pub use rivet_framework as framework;
pub use rivet_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use rivet::prelude::*;
/// ```
pub mod prelude {
    pub use rivet_framework::prelude::*;

    pub use rivet_core::{Bot, BoxedBot, MemberRole, State};
    pub use rivet_framework::{PatternError, Pending, SlotKey};
    pub use rivet_runtime::{ConfigLoader, RivetConfig, RulesConfig};

    pub use rivet_runtime::prelude::*;
}
