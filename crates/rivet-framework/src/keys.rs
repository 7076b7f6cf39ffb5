//! State keys written by the built-in rules.

/// `Vec<ParseResult>` accumulated by pattern rules.
pub const PATTERN_MATCHED: &str = "pattern_matched";
/// `String`: the prefix literal that matched.
pub const PREFIX: &str = "prefix";
/// `String`: the suffix literal that matched.
pub const SUFFIX: &str = "suffix";
/// `String`: text left over after a prefix, suffix or command.
pub const ARGS: &str = "args";
/// `String`: the command name that matched.
pub const COMMAND: &str = "command";
/// `Vec<String>`: capture groups of a regex rule, group 0 first.
pub const REGEX_MATCHED: &str = "regex_matched";
/// `String`: the keyword found in the message.
pub const KEYWORD: &str = "keyword";
/// `String`: the full-match literal.
pub const MATCHED: &str = "matched";
/// `Vec<String>`: download URLs of the images in the message.
pub const IMAGE_URL: &str = "image_url";
