//! Message type: an ordered sequence of [`Segment`]s.
//!
//! `Message` dereferences to `[Segment]`, so slicing and iteration work as
//! on a plain slice. The plain-text projection used by text rules lives here.

use std::fmt::{self, Display};
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::segment::Segment;

/// A message composed of segments.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Message {
    segments: Vec<Segment>,
}

impl Message {
    /// Creates a new empty message.
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Creates a message from a vector of segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Extracts all plain text content from the message.
    ///
    /// This concatenates the text content of all text segments,
    /// ignoring non-text segments like images or mentions.
    pub fn extract_plain_text(&self) -> String {
        extract_plain_text(&self.segments)
    }

    /// Adds a segment to the end of the message.
    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// Consumes the message and adds a segment (builder pattern).
    pub fn with(mut self, segment: Segment) -> Self {
        self.segments.push(segment);
        self
    }

    /// Consumes the message and returns the inner segments vector.
    pub fn into_segments(self) -> Vec<Segment> {
        self.segments
    }
}

/// Plain-text projection of any run of segments.
pub fn extract_plain_text(segments: &[Segment]) -> String {
    segments.iter().filter_map(Segment::as_text).collect()
}

impl Deref for Message {
    type Target = [Segment];

    fn deref(&self) -> &Self::Target {
        &self.segments
    }
}

impl DerefMut for Message {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.segments
    }
}

impl Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl From<Vec<Segment>> for Message {
    fn from(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
}

impl From<Segment> for Message {
    fn from(segment: Segment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl From<&str> for Message {
    fn from(text: &str) -> Self {
        Segment::text(text).into()
    }
}

impl FromIterator<Segment> for Message {
    fn from_iter<T: IntoIterator<Item = Segment>>(iter: T) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_text_skips_non_text() {
        let msg = Message::new()
            .with(Segment::text("hello "))
            .with(Segment::at(123))
            .with(Segment::text("world"));
        assert_eq!(msg.extract_plain_text(), "hello world");
        assert_eq!(extract_plain_text(&msg[1..]), "world");
    }

    #[test]
    fn test_display_joins_segments() {
        let msg: Message = vec![Segment::reply(42), Segment::text("ok")].into();
        assert_eq!(msg.to_string(), "reply{id=42}ok");
    }
}
