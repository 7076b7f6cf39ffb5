//! Reading pattern results back out of the context.
//!
//! [`PatternMatches`] wraps the results a pattern rule stored in the state.
//! Each slot is addressed by its position in the pattern or by the name given
//! with [`Pattern::name`](super::Pattern::name). Typed accessors return
//! `Ok(None)` for a skipped optional slot and an error for a slot that does
//! not exist or holds another kind of value.
//!
//! ```rust,ignore
//! struct Kick {
//!     reason: Vec<String>,
//!     target: Option<String>,
//! }
//!
//! impl FromMatches for Kick {
//!     fn from_matches(m: &PatternMatches) -> ExtractResult<Self> {
//!         Ok(Self {
//!             reason: m.required_text("reason")?,
//!             target: m.at("target")?,
//!         })
//!     }
//! }
//!
//! async fn handler(Matched(kick): Matched<Kick>) { /* ... */ }
//! ```

use std::fmt;

use rivet_core::segment::{AT, IMAGE, REPLY, TEXT};
use rivet_core::{Context, ExtractError, ExtractResult};

use super::{ParseResult, ParsedValue};
use crate::extractor::FromContext;
use crate::keys::PATTERN_MATCHED;

/// Addresses a slot by index or by declared name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKey {
    Index(usize),
    Name(String),
}

impl From<usize> for SlotKey {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

impl From<&str> for SlotKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for SlotKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "#{index}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// The ordered results of the pattern rules that passed for an event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternMatches {
    results: Vec<ParseResult>,
}

impl PatternMatches {
    /// Wraps a result list.
    pub fn new(results: Vec<ParseResult>) -> Self {
        Self { results }
    }

    /// Returns the number of slots.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns `true` if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterates over the slots in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ParseResult> {
        self.results.iter()
    }

    /// Returns the raw result of a slot.
    pub fn get(&self, key: impl Into<SlotKey>) -> Option<&ParseResult> {
        match key.into() {
            SlotKey::Index(index) => self.results.get(index),
            SlotKey::Name(name) => self.results.iter().find(|r| r.name() == Some(name.as_str())),
        }
    }

    /// Capture groups of a text slot.
    pub fn text(&self, key: impl Into<SlotKey>) -> ExtractResult<Option<Vec<String>>> {
        let key = key.into();
        let slot = self.slot(&key)?;
        match slot.value() {
            ParsedValue::Groups(groups) if slot.is_valid() => Ok(Some(groups.clone())),
            ParsedValue::Empty if !slot.is_valid() => Ok(None),
            _ => Err(kind_mismatch(&key, TEXT)),
        }
    }

    /// Capture groups of a text slot that must have matched.
    pub fn required_text(&self, key: impl Into<SlotKey>) -> ExtractResult<Vec<String>> {
        let key = key.into();
        self.text(key.clone())?
            .ok_or_else(|| ExtractError::MissingSlot(key.to_string()))
    }

    /// User id of an at slot.
    pub fn at(&self, key: impl Into<SlotKey>) -> ExtractResult<Option<String>> {
        self.string(key.into(), AT)
    }

    /// File reference of an image slot.
    pub fn image(&self, key: impl Into<SlotKey>) -> ExtractResult<Option<String>> {
        self.string(key.into(), IMAGE)
    }

    /// Quoted message id of a reply slot.
    pub fn reply(&self, key: impl Into<SlotKey>) -> ExtractResult<Option<String>> {
        self.string(key.into(), REPLY)
    }

    /// Binds the slots into a caller-defined structure.
    pub fn bind<T: FromMatches>(&self) -> ExtractResult<T> {
        T::from_matches(self)
    }

    fn slot(&self, key: &SlotKey) -> ExtractResult<&ParseResult> {
        self.get(key.clone())
            .ok_or_else(|| ExtractError::MissingSlot(key.to_string()))
    }

    fn string(&self, key: SlotKey, kind: &'static str) -> ExtractResult<Option<String>> {
        let slot = self.slot(&key)?;
        let from_kind = slot.source().is_some_and(|segment| segment.is(kind));
        match slot.value() {
            ParsedValue::Str(value) if slot.is_valid() && from_kind => Ok(Some(value.clone())),
            ParsedValue::Empty if !slot.is_valid() => Ok(None),
            _ => Err(kind_mismatch(&key, kind)),
        }
    }
}

fn kind_mismatch(key: &SlotKey, expected: &'static str) -> ExtractError {
    ExtractError::SlotKindMismatch {
        slot: key.to_string(),
        expected,
    }
}

impl<'a> IntoIterator for &'a PatternMatches {
    type Item = &'a ParseResult;
    type IntoIter = std::slice::Iter<'a, ParseResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

impl FromContext for PatternMatches {
    fn from_context(ctx: &Context) -> ExtractResult<Self> {
        let results = ctx.state().require::<Vec<ParseResult>>(PATTERN_MATCHED)?;
        Ok(Self::new(results.clone()))
    }
}

/// Types that can be built from pattern results.
pub trait FromMatches: Sized {
    fn from_matches(matches: &PatternMatches) -> ExtractResult<Self>;
}

/// Extractor that binds the pattern results into `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched<T>(pub T);

impl<T: FromMatches> FromContext for Matched<T> {
    fn from_context(ctx: &Context) -> ExtractResult<Self> {
        PatternMatches::from_context(ctx)?.bind().map(Matched)
    }
}
