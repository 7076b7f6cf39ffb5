//! Extractor system for Rivet handlers.
//!
//! This module provides the [`FromContext`] trait, which defines how values
//! can be pulled out of a [`Context`] once its rules have passed, together
//! with typed wrappers for the state keys the built-in rules write.

use std::sync::Arc;

use rivet_core::{BoxedBot, Context, Event, ExtractResult};

use crate::keys;

/// A trait for types that can be extracted from a [`Context`].
///
/// Extraction fails with an [`ExtractError`](rivet_core::ExtractError) when
/// the data is not available, for instance because the rule that would have
/// written it did not run.
///
/// # Example
///
/// ```rust,ignore
/// struct Nickname(String);
///
/// impl FromContext for Nickname {
///     fn from_context(ctx: &Context) -> ExtractResult<Self> {
///         ctx.event()
///             .sender
///             .nickname
///             .clone()
///             .map(Nickname)
///             .ok_or_else(|| ExtractError::custom("sender has no nickname"))
///     }
/// }
/// ```
pub trait FromContext: Sized {
    /// Attempts to extract this type from the given context.
    fn from_context(ctx: &Context) -> ExtractResult<Self>;
}

impl<T: FromContext> FromContext for Option<T> {
    fn from_context(ctx: &Context) -> ExtractResult<Self> {
        Ok(T::from_context(ctx).ok())
    }
}

impl FromContext for Arc<Event> {
    fn from_context(ctx: &Context) -> ExtractResult<Self> {
        Ok(ctx.event_arc())
    }
}

impl FromContext for BoxedBot {
    fn from_context(ctx: &Context) -> ExtractResult<Self> {
        Ok(Arc::clone(ctx.bot()))
    }
}

macro_rules! state_extractor {
    ($(#[$meta:meta])* $name:ident($ty:ty) = $key:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name(pub $ty);

        impl FromContext for $name {
            fn from_context(ctx: &Context) -> ExtractResult<Self> {
                ctx.state().require::<$ty>($key).cloned().map($name)
            }
        }
    };
}

state_extractor!(
    /// Text following a matched prefix, suffix or command.
    Args(String) = keys::ARGS
);
state_extractor!(
    /// The prefix literal that matched.
    Prefix(String) = keys::PREFIX
);
state_extractor!(
    /// The suffix literal that matched.
    Suffix(String) = keys::SUFFIX
);
state_extractor!(
    /// The command name that matched.
    CommandName(String) = keys::COMMAND
);
state_extractor!(
    /// Capture groups of a regex rule.
    RegexMatched(Vec<String>) = keys::REGEX_MATCHED
);
state_extractor!(
    /// The keyword found in the message.
    Keyword(String) = keys::KEYWORD
);
state_extractor!(
    /// The literal a full-match rule matched.
    FullMatched(String) = keys::MATCHED
);
state_extractor!(
    /// Download URLs of the images found by the picture rules.
    ImageUrls(Vec<String>) = keys::IMAGE_URL
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;
    use rivet_core::ExtractError;

    #[test]
    fn test_state_extractors() {
        let mut ctx = context(Event::private_message(7, "hi"));
        ctx.state_mut().insert(keys::ARGS, "a b".to_string());

        assert_eq!(Args::from_context(&ctx).unwrap(), Args("a b".into()));
        assert!(matches!(
            CommandName::from_context(&ctx),
            Err(ExtractError::MissingState(_))
        ));
        assert_eq!(Option::<Keyword>::from_context(&ctx).unwrap(), None);
        assert_eq!(Arc::<Event>::from_context(&ctx).unwrap().user_id, 7);
    }

    #[test]
    fn test_state_type_mismatch() {
        let mut ctx = context(Event::private_message(7, "hi"));
        ctx.state_mut().insert(keys::IMAGE_URL, "not a list".to_string());
        assert!(matches!(
            ImageUrls::from_context(&ctx),
            Err(ExtractError::StateTypeMismatch { .. })
        ));
    }
}
