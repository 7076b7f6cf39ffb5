//! Rules about who sent the event and where.

use rivet_core::{Context, Event};

use crate::keys::ARGS;
use crate::rule::Rule;
use crate::split::shell_split;

/// Passes when the message was addressed to the bot.
pub fn only_to_me(ctx: &mut Context) -> bool {
    ctx.event().to_me
}

/// Passes for private messages.
pub fn only_private(ctx: &mut Context) -> bool {
    ctx.event().is_private()
}

/// Passes for group or guild messages.
pub fn only_public(ctx: &mut Context) -> bool {
    ctx.event().is_group() || ctx.event().is_guild()
}

/// Passes for group messages.
pub fn only_group(ctx: &mut Context) -> bool {
    ctx.event().is_group()
}

/// Passes for guild messages.
pub fn only_guild(ctx: &mut Context) -> bool {
    ctx.event().is_guild()
}

/// Passes when the event was triggered by one of `user_ids`.
pub fn check_user(user_ids: impl IntoIterator<Item = i64>) -> impl Rule {
    let user_ids: Vec<i64> = user_ids.into_iter().collect();
    move |ctx: &mut Context| user_ids.contains(&ctx.event().user_id)
}

/// Passes when the event happened in one of `group_ids`.
pub fn check_group(group_ids: impl IntoIterator<Item = i64>) -> impl Rule {
    let group_ids: Vec<i64> = group_ids.into_iter().collect();
    move |ctx: &mut Context| {
        ctx.event()
            .group_id
            .is_some_and(|group_id| group_ids.contains(&group_id))
    }
}

/// Passes for later events from the same user in the same conversation as
/// `event`.
pub fn check_session(event: &Event) -> impl Rule + use<> {
    let user_id = event.user_id;
    let group_id = event.group_id;
    move |ctx: &mut Context| ctx.event().user_id == user_id && ctx.event().group_id == group_id
}

/// Shell-splits the `args` state value and hands the words to `pred`.
///
/// Missing or empty `args` yield an empty slice.
pub fn check_args<F>(pred: F) -> impl Rule
where
    F: Fn(&Context, &[String]) -> bool + Send + Sync,
{
    move |ctx: &mut Context| {
        let words = ctx
            .state()
            .get::<String>(ARGS)
            .map(|args| shell_split(args))
            .unwrap_or_default();
        pred(ctx, &words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::context;

    #[tokio::test]
    async fn test_session_kind_rules() {
        let mut private = context(Event::private_message(1, "x"));
        let mut group = context(Event::group_message(2, 1, "x"));

        assert!(only_private.check(&mut private).await);
        assert!(!only_private.check(&mut group).await);
        assert!(only_group.check(&mut group).await);
        assert!(only_public.check(&mut group).await);
        assert!(!only_public.check(&mut private).await);
        assert!(!only_guild.check(&mut group).await);

        assert!(only_to_me.check(&mut private).await);
        assert!(!only_to_me.check(&mut group).await);
    }

    #[tokio::test]
    async fn test_check_user_and_group() {
        let mut ctx = context(Event::group_message(200, 10, "x"));
        assert!(check_user([10, 11]).check(&mut ctx).await);
        assert!(!check_user([11]).check(&mut ctx).await);
        assert!(check_group([200]).check(&mut ctx).await);

        let mut private = context(Event::private_message(10, "x"));
        assert!(!check_group([200]).check(&mut private).await);
    }

    #[tokio::test]
    async fn test_check_session() {
        let origin = Event::group_message(200, 10, "first");
        let rule = check_session(&origin);

        assert!(rule.check(&mut context(Event::group_message(200, 10, "again"))).await);
        assert!(!rule.check(&mut context(Event::group_message(201, 10, "x"))).await);
        assert!(!rule.check(&mut context(Event::group_message(200, 11, "x"))).await);
        assert!(!rule.check(&mut context(Event::private_message(10, "x"))).await);
    }

    #[tokio::test]
    async fn test_check_args() {
        let rule = check_args(|_, words| words == ["add", "two words"]);
        let mut ctx = context(Event::private_message(1, "x"));
        assert!(!rule.check(&mut ctx).await);

        ctx.state_mut().insert(ARGS, r#"add "two words""#.to_string());
        assert!(rule.check(&mut ctx).await);

        let empty = check_args(|_, words| words.is_empty());
        ctx.state_mut().insert(ARGS, String::new());
        assert!(empty.check(&mut ctx).await);
    }
}
