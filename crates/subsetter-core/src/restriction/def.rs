use crate::{Error, Result};

use std::fmt;

/// Condition sentinel that disables an edge entirely.
pub const IGNORE: &str = "ignore";

/// One persisted edge override: `from; to-or-empty; condition`.
///
/// A named edge is keyed by its relationship name with an empty `to` field;
/// an unnamed edge is keyed by its source and destination table names. The
/// condition is either a boolean SQL fragment or the literal `ignore`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestrictionDef {
    pub from: String,
    pub to: Option<String>,
    pub condition: String,
}

impl RestrictionDef {
    /// Keys a named edge by its relationship name.
    pub fn by_name(name: &str, condition: &str) -> Self {
        Self {
            from: name.to_string(),
            to: None,
            condition: condition.to_string(),
        }
    }

    /// Keys an unnamed edge by its endpoint table names.
    pub fn by_tables(from: &str, to: &str, condition: &str) -> Self {
        Self {
            from: from.to_string(),
            to: Some(to.to_string()),
            condition: condition.to_string(),
        }
    }

    pub fn is_ignored(&self) -> bool {
        self.condition == IGNORE
    }

    pub fn parse_line(line: &str) -> Result<Self> {
        let mut parts = line.splitn(3, ';');
        let from = parts.next().unwrap_or("").trim();
        let Some(to) = parts.next().map(str::trim) else {
            return Err(Error::invalid_restriction(line, "expected `from; to; condition`"));
        };
        let Some(condition) = parts.next().map(str::trim) else {
            return Err(Error::invalid_restriction(line, "missing condition"));
        };
        if from.is_empty() {
            return Err(Error::invalid_restriction(line, "empty source"));
        }
        if condition.is_empty() {
            return Err(Error::invalid_restriction(line, "empty condition"));
        }

        Ok(Self {
            from: from.to_string(),
            to: (!to.is_empty()).then(|| to.to_string()),
            condition: condition.to_string(),
        })
    }

    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RestrictionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; {}; {}",
            self.from,
            self.to.as_deref().unwrap_or(""),
            self.condition
        )
    }
}
