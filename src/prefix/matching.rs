//! Case-insensitive prefix matching.

/// Match `prefix` at the start of `text`, ignoring letter case.
///
/// Returns the matched slice of `text`, keeping the sender's casing.
/// An empty prefix matches every text.
pub fn match_prefix<'a>(prefix: &str, text: &'a str) -> Option<&'a str> {
    let mut end = 0;
    let mut chars = text.char_indices();

    for expected in prefix.chars() {
        let (idx, actual) = chars.next()?;
        if !actual.to_lowercase().eq(expected.to_lowercase()) {
            return None;
        }
        end = idx + actual.len_utf8();
    }

    Some(&text[..end])
}

/// The prefixes a message may use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prefixes {
    /// The effective prefix for a regular invoker.
    Single(String),
    /// Owner prefixes, tried in order.
    Many(Vec<String>),
}

impl Prefixes {
    /// Find the prefix `text` starts with, returning the matched slice.
    pub fn find_in<'a>(&self, text: &'a str) -> Option<&'a str> {
        match self {
            Prefixes::Single(prefix) => match_prefix(prefix, text),
            Prefixes::Many(prefixes) => prefixes.iter().find_map(|p| match_prefix(p, text)),
        }
    }
}
