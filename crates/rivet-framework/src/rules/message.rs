//! Text-level rules: type, prefix, suffix, command, regex, keyword, full match
//! and reply.
//!
//! Rules that look at "the text" use the plain-text projection of the whole
//! message unless noted otherwise.

use std::sync::Arc;

use ::regex::Regex;
use rivet_core::segment::REPLY;
use rivet_core::{Context, message::extract_plain_text};
use tracing::{debug, trace};

use crate::config::RuleConfig;
use crate::error::{PatternError, PatternResult};
use crate::keys::{ARGS, COMMAND, KEYWORD, MATCHED, PREFIX, REGEX_MATCHED, SUFFIX};
use crate::rule::Rule;

fn collect<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

/// Matches the event type against `post_type[/detail_type[/sub_type]]`.
pub fn type_rule(descriptor: impl Into<String>) -> impl Rule {
    let descriptor = descriptor.into();
    move |ctx: &mut Context| ctx.event().matches_type(&descriptor)
}

/// Requires the first segment to be text starting with one of `prefixes`.
///
/// Stores the prefix under `prefix` and, under `args`, the rest of that
/// segment (leading spaces trimmed) followed by the plain text of the
/// remaining segments.
pub fn prefix<I, S>(prefixes: I) -> impl Rule
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let prefixes = collect(prefixes);
    move |ctx: &mut Context| {
        let message = &ctx.event().message;
        let Some(first) = message.first().and_then(|s| s.as_text()) else {
            return false;
        };
        let Some(prefix) = prefixes.iter().find(|p| first.starts_with(p.as_str())) else {
            return false;
        };
        let mut args = first[prefix.len()..].trim_start_matches(' ').to_string();
        args.push_str(&extract_plain_text(&message[1..]));

        trace!(rule = "prefix", prefix = %prefix, args = %args, "prefix matched");
        let prefix = prefix.clone();
        let state = ctx.state_mut();
        state.insert(PREFIX, prefix);
        state.insert(ARGS, args);
        true
    }
}

/// Requires the last segment to be text ending with one of `suffixes`.
///
/// Stores the suffix under `suffix` and, under `args`, the plain text of the
/// preceding segments followed by the rest of the last segment (trailing
/// spaces trimmed).
pub fn suffix<I, S>(suffixes: I) -> impl Rule
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let suffixes = collect(suffixes);
    move |ctx: &mut Context| {
        let message = &ctx.event().message;
        let Some((last, leading)) = message.split_last() else {
            return false;
        };
        let Some(last) = last.as_text() else {
            return false;
        };
        let Some(suffix) = suffixes.iter().find(|s| last.ends_with(s.as_str())) else {
            return false;
        };
        let mut args = extract_plain_text(leading);
        args.push_str(last[..last.len() - suffix.len()].trim_end_matches(' '));

        trace!(rule = "suffix", suffix = %suffix, args = %args, "suffix matched");
        let suffix = suffix.clone();
        let state = ctx.state_mut();
        state.insert(SUFFIX, suffix);
        state.insert(ARGS, args);
        true
    }
}

/// Requires the trimmed text to be `command_prefix` followed by one of
/// `commands`, alone or followed by a space.
///
/// Stores the command name under `command` and the text after it (leading
/// spaces trimmed) under `args`.
pub fn command<I, S>(config: Arc<RuleConfig>, commands: I) -> impl Rule + use<I, S>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let commands = collect(commands);
    move |ctx: &mut Context| {
        if ctx.event().message.is_empty() {
            return false;
        }
        let text = ctx.plain_text();
        let Some(rest) = text.trim().strip_prefix(config.command_prefix.as_str()) else {
            return false;
        };

        for name in &commands {
            let args = if rest.trim() == name.as_str() {
                Some("")
            } else {
                rest.strip_prefix(name.as_str())
                    .and_then(|after| after.strip_prefix(' '))
                    .map(|after| after.trim_start_matches(' '))
            };
            if let Some(args) = args {
                debug!(rule = "command", command = %name, args = %args, "command triggered");
                let args = args.to_string();
                let state = ctx.state_mut();
                state.insert(COMMAND, name.clone());
                state.insert(ARGS, args);
                return true;
            }
        }
        false
    }
}

/// Searches the text with a regular expression and stores the capture groups
/// under `regex_matched`.
///
/// # Panics
///
/// Panics if `expr` is not a valid expression.
pub fn regex(expr: &str) -> impl Rule + use<> {
    match try_regex(expr) {
        Ok(rule) => rule,
        Err(err) => panic!("{err}"),
    }
}

/// Like [`regex`], returning an error for an invalid expression.
pub fn try_regex(expr: &str) -> PatternResult<impl Rule + use<>> {
    let re = Regex::new(expr).map_err(|err| PatternError::invalid_regex(expr, err))?;
    Ok(move |ctx: &mut Context| {
        let text = ctx.plain_text();
        let Some(captures) = re.captures(&text) else {
            return false;
        };
        let groups: Vec<String> = captures
            .iter()
            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect();
        trace!(rule = "regex", regex = re.as_str(), "regex matched");
        ctx.state_mut().insert(REGEX_MATCHED, groups);
        true
    })
}

/// Requires the text to contain one of `keywords`; the first one found, in
/// the given order, is stored under `keyword`.
pub fn keyword<I, S>(keywords: I) -> impl Rule
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let keywords = collect(keywords);
    move |ctx: &mut Context| {
        let text = ctx.plain_text();
        match keywords.iter().find(|k| text.contains(k.as_str())) {
            Some(found) => {
                ctx.state_mut().insert(KEYWORD, found.clone());
                true
            }
            None => false,
        }
    }
}

/// Requires the text to equal one of `literals` exactly; it is stored under
/// `matched`.
pub fn full_match<I, S>(literals: I) -> impl Rule
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let literals = collect(literals);
    move |ctx: &mut Context| {
        let text = ctx.plain_text();
        if literals.contains(&text) {
            ctx.state_mut().insert(MATCHED, text);
            true
        } else {
            false
        }
    }
}

/// Requires the message to start with a reply quoting `message_id`.
///
/// Ids are compared as strings, or as integers when both sides parse as one.
pub fn reply(message_id: impl ToString) -> impl Rule {
    let target = message_id.to_string();
    let numeric = target.parse::<i64>().ok();
    move |ctx: &mut Context| {
        let Some(first) = ctx.event().message.first().filter(|s| s.is(REPLY)) else {
            return false;
        };
        let id = first.field("id");
        id == target || (numeric.is_some() && id.parse::<i64>().ok() == numeric)
    }
}
