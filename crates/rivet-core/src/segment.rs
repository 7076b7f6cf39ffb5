//! Message segment model.
//!
//! A segment is the smallest unit of a chat message: a type tag such as
//! `text`, `image`, `at` or `reply` plus a flat map of named string fields.
//! This mirrors the OneBot v11 wire shape:
//!
//! ```json
//! {"type": "at", "data": {"qq": "10001000"}}
//! ```
//!
//! Segments are immutable once received; rules and patterns only read them.
//!
//! # Example
//!
//! ```rust
//! use rivet_core::Segment;
//!
//! let text = Segment::text("Hello, ");
//! let at = Segment::at(10001000);
//! assert_eq!(at.get("qq"), Some("10001000"));
//! assert!(text.is_text());
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Segment type tag for plain text.
pub const TEXT: &str = "text";
/// Segment type tag for a mention.
pub const AT: &str = "at";
/// Segment type tag for an image.
pub const IMAGE: &str = "image";
/// Segment type tag for a quoted reply.
pub const REPLY: &str = "reply";
/// Segment type tag for a platform emoji.
pub const FACE: &str = "face";

/// A single typed unit of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// The type tag (`text`, `image`, `at`, `reply`, ...).
    #[serde(rename = "type")]
    kind: String,
    /// Named payload fields.
    #[serde(default, deserialize_with = "deserialize_data")]
    data: BTreeMap<String, String>,
}

impl Segment {
    /// Creates a segment from a type tag and its payload fields.
    pub fn new<K, V>(kind: impl Into<String>, data: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            kind: kind.into(),
            data: data
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Creates a plain text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(TEXT, [("text", text.into())])
    }

    /// Creates a mention of a specific user.
    pub fn at(user_id: i64) -> Self {
        Self::new(AT, [("qq", user_id.to_string())])
    }

    /// Creates a mention of everyone in the group.
    pub fn at_all() -> Self {
        Self::new(AT, [("qq", "all")])
    }

    /// Creates an image segment from a file reference.
    pub fn image(file: impl Into<String>) -> Self {
        Self::new(IMAGE, [("file", file.into())])
    }

    /// Creates an image segment carrying both a file reference and a download URL.
    pub fn image_url(file: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(IMAGE, [("file", file.into()), ("url", url.into())])
    }

    /// Creates a reply segment quoting another message.
    pub fn reply(message_id: impl ToString) -> Self {
        Self::new(REPLY, [("id", message_id.to_string())])
    }

    /// Creates a platform emoji segment.
    pub fn face(id: i32) -> Self {
        Self::new(FACE, [("id", id.to_string())])
    }

    /// Returns the type tag.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Returns true if this segment has the given type tag.
    pub fn is(&self, kind: &str) -> bool {
        self.kind == kind
    }

    /// Returns true if this is a plain text segment.
    pub fn is_text(&self) -> bool {
        self.is(TEXT)
    }

    /// Returns a payload field.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    /// Returns a payload field, or the empty string if absent.
    pub fn field(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Returns all payload fields.
    pub fn data(&self) -> &BTreeMap<String, String> {
        &self.data
    }

    /// Returns the text content if this is a text segment.
    pub fn as_text(&self) -> Option<&str> {
        if self.is_text() {
            self.get("text")
        } else {
            None
        }
    }
}

/// Text renders as itself; anything else as `kind{key=value,...}`.
impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.as_text() {
            return f.write_str(text);
        }
        write!(f, "{}{{", self.kind)?;
        for (i, (key, value)) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{key}={value}")?;
        }
        f.write_str("}")
    }
}

/// Accepts string, number and boolean payload values; OneBot implementations
/// disagree on whether ids are sent as strings or numbers.
fn deserialize_data<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => return None,
                other => other.to_string(),
            };
            Some((key, value))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_serialize() {
        let text = Segment::text("Hello");
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, r#"{"type":"text","data":{"text":"Hello"}}"#);

        let at = Segment::at(10001000);
        let json = serde_json::to_string(&at).unwrap();
        assert_eq!(json, r#"{"type":"at","data":{"qq":"10001000"}}"#);
    }

    #[test]
    fn test_segment_deserialize_numeric_fields() {
        let json = r#"{"type":"reply","data":{"id":12345}}"#;
        let segment: Segment = serde_json::from_str(json).unwrap();
        assert_eq!(segment.kind(), REPLY);
        assert_eq!(segment.get("id"), Some("12345"));

        let json = r#"{"type":"shake"}"#;
        let segment: Segment = serde_json::from_str(json).unwrap();
        assert!(segment.data().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Segment::text("a [b]").to_string(), "a [b]");
        assert_eq!(Segment::at(10001000).to_string(), "at{qq=10001000}");
        assert_eq!(
            Segment::image_url("x.jpg", "http://e.com/a").to_string(),
            "image{file=x.jpg,url=http://e.com/a}"
        );
        assert_eq!(Segment::new("shake", [("", ""); 0]).to_string(), "shake{}");
    }

    #[test]
    fn test_as_text() {
        assert_eq!(Segment::text("hi").as_text(), Some("hi"));
        assert_eq!(Segment::image("x").as_text(), None);
        assert_eq!(Segment::image("x").field("url"), "");
    }
}
