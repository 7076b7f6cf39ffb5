//! Built-in rules.
//!
//! Every rule reports a plain `bool`. Rules that extract something write it
//! into the context state under one of the [`keys`](crate::keys).
//!
//! | rule | passes when | writes |
//! |---|---|---|
//! | [`type_rule`] | event type matches `post/detail/sub` | |
//! | [`prefix`] / [`suffix`] | first / last text segment starts / ends with a literal | `prefix` / `suffix`, `args` |
//! | [`command`] | text is the command prefix plus a command name | `command`, `args` |
//! | [`regex`] | text matches an expression | `regex_matched` |
//! | [`keyword`] / [`full_match`] | text contains / equals a literal | `keyword` / `matched` |
//! | [`reply`] | message starts by quoting a given message | |
//! | [`PatternRule`] | message fits a [`Pattern`](crate::Pattern) | `pattern_matched` |
//! | [`has_picture`] / [`MustProvidePicture`] | message has (or user then sends) an image | `image_url` |
//! | session and permission rules | sender, conversation or role checks | |

mod message;
mod pattern;
mod permission;
mod picture;
mod session;

pub use message::{command, full_match, keyword, prefix, regex, reply, suffix, try_regex, type_rule};
pub use pattern::{PatternRule, pattern};
pub use permission::{
    GroupHigherPermission, admin, group_higher_permission, owner, superuser, user_or_group_admin,
};
pub use picture::{DEFAULT_PICTURE_TIMEOUT, MustProvidePicture, has_picture};
pub use session::{
    check_args, check_group, check_session, check_user, only_group, only_guild, only_private,
    only_public, only_to_me,
};
