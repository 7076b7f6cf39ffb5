//! Structural message patterns.
//!
//! A [`Pattern`] is an ordered list of segment matchers. Each one names a
//! segment type, may be marked optional, and knows how to pull a value out of
//! a segment of that type. Matching walks the pattern and the message side by
//! side; see [`Pattern::matches`] for the exact alignment rules.
//!
//! # Example
//!
//! ```rust
//! use rivet_framework::Pattern;
//! use rivet_core::Segment;
//!
//! // An optional quote, a command word, and an optional mention.
//! let pattern = Pattern::new()
//!     .reply()
//!     .optional()
//!     .text(r"^kick$")
//!     .at()
//!     .optional();
//!
//! let results = pattern
//!     .matches(&[Segment::text(" kick "), Segment::at(42)])
//!     .unwrap();
//!
//! assert!(!results[0].is_valid());
//! assert_eq!(results[1].text().unwrap()[0], "kick");
//! assert_eq!(results[2].at(), Some("42"));
//! ```
//!
//! Patterns are immutable once built and can be shared across concurrent
//! evaluations.

mod binding;
mod matching;
mod parsed;

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use rivet_core::Segment;
use rivet_core::segment::{AT, IMAGE, REPLY, TEXT};

use crate::error::{PatternError, PatternResult};

pub use binding::{FromMatches, Matched, PatternMatches, SlotKey};
pub use parsed::{ParseResult, ParsedValue};

type CustomExtract = Arc<dyn Fn(&Segment) -> Option<ParsedValue> + Send + Sync>;

/// How a pattern segment turns a message segment into a value.
#[derive(Clone)]
enum Extractor {
    /// Trimmed text searched with a regex.
    Text(Regex),
    /// A mention, optionally of one specific user.
    At(Option<String>),
    Image,
    Reply,
    Custom(CustomExtract),
}

impl fmt::Debug for Extractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(re) => f.debug_tuple("Text").field(&re.as_str()).finish(),
            Self::At(target) => f.debug_tuple("At").field(target).finish(),
            Self::Image => f.write_str("Image"),
            Self::Reply => f.write_str("Reply"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// One element of a [`Pattern`].
#[derive(Debug, Clone)]
pub struct PatternSegment {
    kind: String,
    optional: bool,
    name: Option<String>,
    extractor: Extractor,
}

impl PatternSegment {
    fn new(kind: impl Into<String>, extractor: Extractor) -> Self {
        Self {
            kind: kind.into(),
            optional: false,
            name: None,
            extractor,
        }
    }

    /// The segment type this element accepts.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Whether the element may be skipped.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// The slot name, if one was declared.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// An ordered sequence of segment matchers.
#[derive(Debug, Clone, Default)]
pub struct Pattern {
    segments: Vec<PatternSegment>,
}

impl Pattern {
    /// Creates an empty pattern.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text matcher.
    ///
    /// The text is trimmed and searched (not anchored) with `regex`.
    ///
    /// # Panics
    ///
    /// Panics if `regex` is not a valid expression. Use
    /// [`try_text`](Self::try_text) to handle the error instead.
    pub fn text(self, regex: &str) -> Self {
        match self.try_text(regex) {
            Ok(pattern) => pattern,
            Err(err) => panic!("{err}"),
        }
    }

    /// Appends a text matcher, returning an error for an invalid expression.
    pub fn try_text(self, regex: &str) -> PatternResult<Self> {
        let re = Regex::new(regex).map_err(|err| PatternError::invalid_regex(regex, err))?;
        Ok(self.push(PatternSegment::new(TEXT, Extractor::Text(re))))
    }

    /// Appends a matcher for a mention of anyone.
    pub fn at(self) -> Self {
        self.push(PatternSegment::new(AT, Extractor::At(None)))
    }

    /// Appends a matcher for a mention of one specific user.
    pub fn at_id(self, user_id: impl ToString) -> Self {
        let target = user_id.to_string();
        self.push(PatternSegment::new(AT, Extractor::At(Some(target))))
    }

    /// Appends an image matcher. The value is the image's file reference.
    pub fn image(self) -> Self {
        self.push(PatternSegment::new(IMAGE, Extractor::Image))
    }

    /// Appends a reply matcher. The value is the quoted message id.
    pub fn reply(self) -> Self {
        self.push(PatternSegment::new(REPLY, Extractor::Reply))
    }

    /// Appends a matcher for any segment type with a custom extractor.
    ///
    /// The extractor runs only on segments of type `kind`; returning `None`
    /// counts as a non-match.
    pub fn segment<F>(self, kind: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&Segment) -> Option<ParsedValue> + Send + Sync + 'static,
    {
        self.push(PatternSegment::new(kind, Extractor::Custom(Arc::new(extract))))
    }

    /// Marks the last segment optional.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is empty.
    pub fn optional(self) -> Self {
        self.set_optional(true)
    }

    /// Sets whether the last segment is optional.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is empty.
    pub fn set_optional(self, optional: bool) -> Self {
        match self.try_set_optional(optional) {
            Ok(pattern) => pattern,
            Err(err) => panic!("{err}"),
        }
    }

    /// Sets whether the last segment is optional, failing on an empty pattern.
    pub fn try_set_optional(mut self, optional: bool) -> PatternResult<Self> {
        self.last_mut()?.optional = optional;
        Ok(self)
    }

    /// Names the last segment so its result can be looked up by name.
    ///
    /// # Panics
    ///
    /// Panics if the pattern is empty.
    pub fn name(self, name: impl Into<String>) -> Self {
        match self.try_name(name) {
            Ok(pattern) => pattern,
            Err(err) => panic!("{err}"),
        }
    }

    /// Names the last segment, failing on an empty pattern.
    pub fn try_name(mut self, name: impl Into<String>) -> PatternResult<Self> {
        self.last_mut()?.name = Some(name.into());
        Ok(self)
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if no segment has been added.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the segments in declaration order.
    pub fn segments(&self) -> &[PatternSegment] {
        &self.segments
    }

    /// Returns `true` if any segment is optional.
    pub fn has_optional(&self) -> bool {
        self.segments.iter().any(PatternSegment::is_optional)
    }

    /// Aligns the pattern against `message`.
    ///
    /// Returns one [`ParseResult`] per pattern segment, in declaration order,
    /// or `None` if the message does not fit.
    ///
    /// - Without optional segments the lengths must be equal.
    /// - A segment that fails to match is recorded as invalid and skipped if it
    ///   is optional; the same message segment is then tried against the next
    ///   pattern segment. A required segment that fails rejects the message.
    /// - Message segments left over once the pattern is exhausted are ignored.
    pub fn matches(&self, message: &[Segment]) -> Option<Vec<ParseResult>> {
        matching::align(&self.segments, message)
    }

    fn push(mut self, segment: PatternSegment) -> Self {
        self.segments.push(segment);
        self
    }

    fn last_mut(&mut self) -> PatternResult<&mut PatternSegment> {
        self.segments.last_mut().ok_or(PatternError::EmptyPattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_marks_last_segment() {
        let pattern = Pattern::new().text("a").at().optional().name("target");
        assert_eq!(pattern.len(), 2);
        assert!(!pattern.segments()[0].is_optional());
        assert!(pattern.segments()[1].is_optional());
        assert_eq!(pattern.segments()[1].name(), Some("target"));
        assert!(pattern.has_optional());

        let pattern = pattern.set_optional(false);
        assert!(!pattern.has_optional());
    }

    #[test]
    fn test_invalid_regex_is_reported() {
        let err = Pattern::new().try_text("((").unwrap_err();
        assert!(matches!(err, PatternError::InvalidRegex { .. }));
    }

    #[test]
    #[should_panic(expected = "invalid regular expression")]
    fn test_invalid_regex_panics() {
        let _ = Pattern::new().text("[unclosed");
    }

    #[test]
    fn test_optional_on_empty_pattern() {
        assert!(matches!(
            Pattern::new().try_set_optional(true),
            Err(PatternError::EmptyPattern)
        ));
        assert!(matches!(
            Pattern::new().try_name("x"),
            Err(PatternError::EmptyPattern)
        ));
    }

    #[test]
    #[should_panic(expected = "pattern is empty")]
    fn test_optional_on_empty_pattern_panics() {
        let _ = Pattern::new().optional();
    }
}
