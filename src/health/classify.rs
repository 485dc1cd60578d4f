//! Status output classification.
//!
//! The gateway CLI prints free-form text. A check is positive when any
//! configured keyword appears in it as a whole word, ignoring case:
//!
//! ```text
//! "Gateway: CONNECTED, uptime=3d"  → Connected   ("connected")
//! "Gateway: disconnected"          → Disconnected
//! "uptime=3d"                      → Disconnected ("up" is not a word here)
//! ```
//!
//! Negations are not understood: "not running" still matches "running".

use crate::health::state::Status;

/// Case-insensitive whole-word keyword matcher.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    keywords: Vec<String>,
}

impl KeywordClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// First keyword found in `output`, if any.
    pub fn matched_keyword(&self, output: &str) -> Option<&str> {
        let haystack = output.to_lowercase();
        self.keywords
            .iter()
            .find(|keyword| contains_word(&haystack, keyword))
            .map(String::as_str)
    }

    pub fn classify(&self, output: &str) -> Status {
        if self.matched_keyword(output).is_some() {
            Status::Connected
        } else {
            Status::Disconnected
        }
    }
}

// Every start position is tried, so overlapping candidates are not skipped.
fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.char_indices().any(|(start, _)| {
        if !haystack[start..].starts_with(word) {
            return false;
        }
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + word.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
