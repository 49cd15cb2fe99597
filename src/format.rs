use std::fmt;

use crate::author::AuthorName;

const QUOTE_PREFIX: &str = "> ";
const BLOCK_SEPARATOR: &str = "\n\n";

/// Markdown blockquote ready to be written into a composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteText(String);

impl QuoteText {
    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Display for QuoteText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whitespace as the host's text fields trim it: U+FEFF counts, U+0085 does not.
fn is_host_whitespace(ch: char) -> bool {
    ch == '\u{feff}' || (ch.is_whitespace() && ch != '\u{85}')
}

pub fn trim_host(text: &str) -> &str {
    text.trim_matches(is_host_whitespace)
}

pub fn format_quote(text: &str, author: Option<&AuthorName>) -> QuoteText {
    let quoted = trim_host(text)
        .split('\n')
        .map(|line| format!("{QUOTE_PREFIX}{}", line.strip_suffix('\r').unwrap_or(line)))
        .collect::<Vec<_>>()
        .join("\n");
    let mention = author
        .map(|name| format!("@{name} "))
        .unwrap_or_default();
    QuoteText(format!("{quoted}{BLOCK_SEPARATOR}{mention}"))
}
