//! Query sanitization.
//!
//! Teams delivers message text as HTML (`<at>Bot</at> ollama質問 ...`). Before the text reaches
//! the model, tags and line breaks become single spaces, the trigger phrase is removed and
//! whitespace is collapsed. The transformation is applied until it reaches a fixed point, so
//! sanitizing an already-sanitized query is a no-op.

use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r\n|\r|\n").expect("line break pattern is valid"));

// Line breaks are gone before this runs, so a leftover `<` never has a `>` after it.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Message text with markup, line breaks and the trigger phrase removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizedQuery(String);

impl SanitizedQuery {
    /// Sanitize raw message text, removing every occurrence of `trigger_phrase`.
    pub fn new(raw: &str, trigger_phrase: &str) -> Self {
        let mut current = single_pass(raw, trigger_phrase);
        loop {
            let next = single_pass(&current, trigger_phrase);
            if next == current {
                return Self(current);
            }
            current = next;
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SanitizedQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

fn single_pass(text: &str, trigger_phrase: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(text, " ");
    let mut text = TAG_RE.replace_all(&text, " ").into_owned();

    if !trigger_phrase.is_empty() {
        while text.contains(trigger_phrase) {
            text = text.replace(trigger_phrase, "");
        }
    }

    WHITESPACE_RE.replace_all(&text, " ").trim().to_string()
}
