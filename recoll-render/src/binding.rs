//! Parsing of `<alias> in <collection>` watch expressions.

use crate::error::{RenderError, RenderResult};
use std::fmt;
use std::str::FromStr;

/// A parsed watch expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    alias: String,
    collection: String,
}

impl Binding {
    /// Splits `expression` at the first standalone `in`.
    ///
    /// The alias must be a single name; the collection expression is the
    /// trimmed remainder and must not be empty.
    pub fn parse(expression: &str) -> RenderResult<Self> {
        let syntax = |reason| RenderError::BindingSyntax {
            expression: expression.to_string(),
            reason,
        };

        let trimmed = expression.trim();
        let mut search_from = 0;
        while let Some(offset) = trimmed[search_from..].find("in") {
            let start = search_from + offset;
            let end = start + 2;
            let before = &trimmed[..start];
            let after = &trimmed[end..];
            search_from = end;

            if !before.ends_with(char::is_whitespace) || !after.starts_with(char::is_whitespace) {
                continue;
            }

            let alias = before.trim_end();
            let collection = after.trim_start();
            if alias.is_empty() {
                continue;
            }
            if collection.is_empty() {
                return Err(syntax("missing collection expression"));
            }
            if alias.contains(char::is_whitespace) {
                return Err(syntax("alias must be a single name"));
            }
            return Ok(Self {
                alias: alias.to_string(),
                collection: collection.to_string(),
            });
        }

        Err(syntax("expected `<alias> in <collection>`"))
    }

    /// Name the current item is exposed under.
    pub fn alias(&self) -> &str {
        &self.alias
    }

    /// Expression that produces the collection.
    pub fn collection(&self) -> &str {
        &self.collection
    }
}

impl FromStr for Binding {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.alias, self.collection)
    }
}
