//! Text filter sanitization
//!
//! Text filters are inlined into the predicate, so the text is cleaned
//! first: quote, percent and escape characters, statement separators,
//! comment markers and a fixed set of SQL keywords are removed.

use std::sync::OnceLock;

use regex::Regex;

use crate::filter::TextMatch;

/// Keywords removed from filter text, wherever they occur
pub const SQL_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "DROP", "TABLE", "ALTER", "CREATE", "EXEC", "UNION",
    "TRUNCATE", "GRANT", "REVOKE",
];

const STRIPPED_CHARS: &[char] = &['\'', '"', '`', '%', '\\', ';'];

fn keyword_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let alternatives = SQL_KEYWORDS.join("|");
        // Built from constants above, cannot fail to compile
        Regex::new(&format!(r"(?i)(--|/\*|\*/|{})", alternatives)).unwrap()
    })
}

/// Cleans `text` for inlining.
///
/// Outside full-text mode only the first whitespace-delimited token is
/// kept: a single substring match cannot require several tokens at once.
pub fn sanitize_text(text: &str, mode: TextMatch) -> String {
    let mut cleaned: String = text.chars().filter(|c| !STRIPPED_CHARS.contains(c)).collect();

    // Removing one keyword can join the halves of another
    loop {
        let next = keyword_pattern().replace_all(&cleaned, " ").into_owned();
        if next == cleaned {
            break;
        }
        cleaned = next;
    }

    match mode {
        TextMatch::FullText => cleaned.split_whitespace().collect::<Vec<_>>().join(" "),
        _ => cleaned
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}
