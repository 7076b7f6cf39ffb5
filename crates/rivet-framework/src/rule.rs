//! The [`Rule`] predicate.
//!
//! A rule decides whether a handler should run for an event. It receives the
//! per-event [`Context`] mutably and may leave extraction results in its
//! state for the handler to read.
//!
//! Plain functions and closures with the signature
//! `Fn(&mut Context) -> bool` are rules already. Rules that need to call the
//! bot, or wait for a follow-up event, implement the trait directly.
//!
//! ```rust,ignore
//! fn only_group(ctx: &mut Context) -> bool {
//!     ctx.event().is_group()
//! }
//!
//! let long_text = |ctx: &mut Context| ctx.plain_text().len() > 100;
//! ```
//!
//! Combining rules is left to the dispatcher: a handler's rules are
//! evaluated in order and must all pass.

use std::sync::Arc;

use async_trait::async_trait;
use rivet_core::Context;

/// A boolean predicate over an event context.
#[async_trait]
pub trait Rule: Send + Sync {
    /// Evaluates the rule, possibly writing into `ctx`'s state.
    async fn check(&self, ctx: &mut Context) -> bool;
}

#[async_trait]
impl<F> Rule for F
where
    F: Fn(&mut Context) -> bool + Send + Sync,
{
    async fn check(&self, ctx: &mut Context) -> bool {
        self(ctx)
    }
}

/// A shared, type-erased rule.
pub type BoxedRule = Arc<dyn Rule>;

/// Erases a rule's type.
pub fn boxed(rule: impl Rule + 'static) -> BoxedRule {
    Arc::new(rule)
}

/// Evaluates `rules` in order, stopping at the first failure.
pub async fn check_all(rules: &[BoxedRule], ctx: &mut Context) -> bool {
    for rule in rules {
        if !rule.check(ctx).await {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;
    use rivet_core::{Event, Segment};

    fn mark(ctx: &mut Context) -> bool {
        ctx.state_mut().insert("seen", true);
        true
    }

    #[tokio::test]
    async fn test_check_all_stops_at_first_failure() {
        let mut ctx = context(Event::private_message(1, Segment::text("hi")));
        let rules = vec![
            boxed(|_: &mut Context| false),
            boxed(mark),
        ];
        assert!(!check_all(&rules, &mut ctx).await);
        assert!(!ctx.state().contains("seen"));

        let rules = vec![boxed(mark), boxed(|ctx: &mut Context| ctx.event().is_private())];
        assert!(check_all(&rules, &mut ctx).await);
        assert!(ctx.state().contains("seen"));
    }
}
