//! Per-segment parse results.

use rivet_core::Segment;

/// The value extracted from one message segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ParsedValue {
    /// Nothing was extracted.
    #[default]
    Empty,
    /// Regex capture groups, group 0 first.
    Groups(Vec<String>),
    /// A single field, such as a user id, file reference or message id.
    Str(String),
}

/// Outcome of matching one pattern segment.
///
/// An invalid result always carries [`ParsedValue::Empty`] and no source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseResult {
    valid: bool,
    value: ParsedValue,
    source: Option<Segment>,
    name: Option<String>,
}

impl ParseResult {
    /// A successful result extracted from `source`.
    pub fn matched(value: ParsedValue, source: &Segment) -> Self {
        Self {
            valid: true,
            value,
            source: Some(source.clone()),
            name: None,
        }
    }

    /// A skipped or failed result.
    pub fn invalid() -> Self {
        Self::default()
    }

    pub(crate) fn named(mut self, name: Option<&str>) -> Self {
        self.name = name.map(str::to_string);
        self
    }

    /// Returns `true` if the segment matched.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns the extracted value.
    pub fn value(&self) -> &ParsedValue {
        &self.value
    }

    /// Returns the message segment the value came from.
    pub fn source(&self) -> Option<&Segment> {
        self.source.as_ref()
    }

    /// Returns the slot name declared on the pattern segment.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Capture groups of a text match.
    pub fn text(&self) -> Option<&[String]> {
        match &self.value {
            ParsedValue::Groups(groups) if self.valid => Some(groups),
            _ => None,
        }
    }

    /// Mentioned user id of an at match.
    pub fn at(&self) -> Option<&str> {
        self.string()
    }

    /// File reference of an image match.
    pub fn image(&self) -> Option<&str> {
        self.string()
    }

    /// Quoted message id of a reply match.
    pub fn reply(&self) -> Option<&str> {
        self.string()
    }

    fn string(&self) -> Option<&str> {
        match &self.value {
            ParsedValue::Str(value) if self.valid => Some(value),
            _ => None,
        }
    }
}
