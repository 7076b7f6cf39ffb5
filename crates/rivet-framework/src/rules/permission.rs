//! Permission rules: super users and group roles.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use rivet_core::{Context, MemberRole};
use tracing::warn;

use super::session::{only_group, only_to_me};
use crate::config::RuleConfig;
use crate::rule::Rule;

fn is_super_user(config: &RuleConfig, ctx: &Context) -> bool {
    config.is_super_user(ctx.event().user_id)
}

/// Passes for configured super users.
pub fn superuser(config: Arc<RuleConfig>) -> impl Rule {
    move |ctx: &mut Context| is_super_user(&config, ctx)
}

/// Passes for super users, group owners and group admins.
pub fn admin(config: Arc<RuleConfig>) -> impl Rule {
    move |ctx: &mut Context| {
        is_super_user(&config, ctx) || ctx.event().sender_role() >= MemberRole::Admin
    }
}

/// Passes for super users and group owners.
pub fn owner(config: Arc<RuleConfig>) -> impl Rule {
    move |ctx: &mut Context| {
        is_super_user(&config, ctx) || ctx.event().sender_role() == MemberRole::Owner
    }
}

/// In groups, requires admin permission; elsewhere, requires the message to
/// be addressed to the bot.
pub fn user_or_group_admin(config: Arc<RuleConfig>) -> impl Rule {
    move |ctx: &mut Context| {
        if only_group(ctx) {
            is_super_user(&config, ctx) || ctx.event().sender_role() >= MemberRole::Admin
        } else {
            only_to_me(ctx)
        }
    }
}

type TargetFn = dyn Fn(&Context) -> i64 + Send + Sync;

/// Passes in a group when the sender outranks a target user.
///
/// Ranking, highest first: super users (ordered by their position in the
/// configuration), the group owner, admins, members. A sender never outranks
/// themselves. The target's group role is looked up through the bot; a failed
/// lookup fails the rule.
pub struct GroupHigherPermission {
    config: Arc<RuleConfig>,
    target: Box<TargetFn>,
}

impl GroupHigherPermission {
    /// `target` picks the user to compare against, usually from state written
    /// by an earlier rule.
    pub fn new<F>(config: Arc<RuleConfig>, target: F) -> Self
    where
        F: Fn(&Context) -> i64 + Send + Sync + 'static,
    {
        Self {
            config,
            target: Box::new(target),
        }
    }

    async fn target_role(&self, ctx: &Context, group_id: i64, target: i64) -> Option<MemberRole> {
        match ctx.bot().get_group_member_role(group_id, target).await {
            Ok(role) => Some(role),
            Err(err) => {
                warn!(group_id, target, error = %err, "failed to resolve group member role");
                None
            }
        }
    }
}

impl fmt::Debug for GroupHigherPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GroupHigherPermission")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Rule for GroupHigherPermission {
    async fn check(&self, ctx: &mut Context) -> bool {
        let event = ctx.event();
        let Some(group_id) = event.group_id.filter(|_| event.is_group()) else {
            return false;
        };
        let sender = event.user_id;
        let target = (self.target)(ctx);
        if target == sender {
            return false;
        }

        if self.config.is_super_user(sender) {
            return self.config.first_super_user(&[sender, target]) == Some(sender);
        }
        if self.config.is_super_user(target) {
            return false;
        }

        let ceiling = match event.sender_role() {
            MemberRole::Owner => MemberRole::Owner,
            MemberRole::Admin => MemberRole::Admin,
            MemberRole::Member => return false,
        };
        self.target_role(ctx, group_id, target)
            .await
            .is_some_and(|role| role < ceiling)
    }
}

/// Shorthand for [`GroupHigherPermission::new`].
pub fn group_higher_permission<F>(config: Arc<RuleConfig>, target: F) -> GroupHigherPermission
where
    F: Fn(&Context) -> i64 + Send + Sync + 'static,
{
    GroupHigherPermission::new(config, target)
}
