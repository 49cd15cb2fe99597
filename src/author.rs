use std::fmt;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use serde_json::Value;

use crate::state::StateAccessor;

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^[a-z0-9._-]+$")
        .case_insensitive(true)
        .build()
        .expect("username pattern compiles")
});

/// A username that is safe to drop into Markdown as a mention.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthorName(String);

impl AuthorName {
    pub fn parse(raw: &str) -> Option<Self> {
        if USERNAME_PATTERN.is_match(raw) {
            Some(Self(raw.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Looks up the author's username. Missing profiles and invalid names both read as `None`.
pub fn resolve_author(state: &dyn StateAccessor, user_id: &str) -> Option<AuthorName> {
    match state.username(user_id)? {
        Value::String(name) if name.is_empty() => None,
        Value::String(name) => {
            let parsed = AuthorName::parse(&name);
            if parsed.is_none() {
                tracing::warn!(user_id, username = %name, "invalid username format");
            }
            parsed
        }
        other => {
            tracing::warn!(user_id, value = %other, "username is not a string");
            None
        }
    }
}
