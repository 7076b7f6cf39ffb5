//! # Rivet Core
//!
//! Data model shared by every Rivet crate.
//!
//! - **Messages**: [`Segment`] and [`Message`], the OneBot v11 segment shape
//! - **Events**: [`Event`] with its `post/detail/sub` type triple
//! - **Collaborator**: the [`Bot`] trait used for history lookup, member
//!   lookup and sending
//! - **Evaluation state**: [`Context`] and its [`State`] bag
//!
//! Rules and patterns live in `rivet-framework`; this crate has no opinion on
//! how events are matched.

pub mod bot;
pub mod context;
pub mod error;
pub mod event;
pub mod message;
pub mod segment;
pub mod types;

pub use bot::{Bot, BoxedBot, HistoryMessage};
pub use context::{Context, State};
pub use error::{ApiError, ApiResult, ExtractError, ExtractResult};
pub use event::{Event, EventType};
pub use message::Message;
pub use segment::Segment;
pub use types::{MemberRole, Sender, UnknownRole};
