//! Mention expansion for post content.
//!
//! Post bodies may reference other users with `@username` tokens. Before a
//! post is persisted, every token that names a known user is replaced with
//! that user's full name; tokens that match nobody are kept verbatim.
//!
//! The transform is a two-phase pipeline: [`scan`] produces the candidate
//! token list from a single left-to-right pass, and [`expand`] folds over
//! that list applying a global substring replacement per resolved token.
//! Only the original scan drives substitution, so text introduced by a
//! replacement is never re-scanned.

use once_cell::sync::Lazy;
use regex::Regex;

static MENTION_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@(\w+)").expect("mention pattern is valid"));

/// A user's display name as substituted into content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName {
    pub first_name: String,
    pub last_name: String,
}

impl DisplayName {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    fn render(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Scan content for `@username` candidates in discovery order.
///
/// Duplicates are included; a maximal run of word characters after `@`
/// forms one token. Tokens at the string boundaries match normally.
pub fn scan(content: &str) -> Vec<String> {
    MENTION_PATTERN
        .captures_iter(content)
        .map(|capture| capture[1].to_string())
        .collect()
}

/// Expand recognised mentions in `content` using `resolve`.
///
/// For each scanned candidate that resolves to a user, every literal
/// occurrence of `@username` in the current string is replaced with the
/// user's full name. Unresolved candidates are a no-op, not an error.
pub fn expand<F>(content: &str, mut resolve: F) -> String
where
    F: FnMut(&str) -> Option<DisplayName>,
{
    scan(content)
        .into_iter()
        .fold(content.to_string(), |current, username| {
            match resolve(&username) {
                Some(name) => current.replace(&format!("@{username}"), &name.render()),
                None => current,
            }
        })
}
