use std::fmt;
use std::str::FromStr;

use crate::core::SessionError;

/// Transaction isolation level requested when a transaction is opened.
///
/// The level is forwarded to the underlying store as-is; how strictly it is
/// honored is a property of the store, not of the session layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// All levels, in increasing order of strictness.
    pub const ALL: [IsolationLevel; 4] = [
        IsolationLevel::ReadUncommitted,
        IsolationLevel::ReadCommitted,
        IsolationLevel::RepeatableRead,
        IsolationLevel::Serializable,
    ];
}

impl Default for IsolationLevel {
    /// `ReadCommitted` is what most relational stores use when no explicit
    /// level is requested.
    fn default() -> Self {
        IsolationLevel::ReadCommitted
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IsolationLevel::ReadUncommitted => write!(f, "READ UNCOMMITTED"),
            IsolationLevel::ReadCommitted => write!(f, "READ COMMITTED"),
            IsolationLevel::RepeatableRead => write!(f, "REPEATABLE READ"),
            IsolationLevel::Serializable => write!(f, "SERIALIZABLE"),
        }
    }
}

impl FromStr for IsolationLevel {
    type Err = SessionError;

    /// Parses both SQL spelling ("READ COMMITTED") and snake_case
    /// ("read_committed"), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "read_uncommitted" => Ok(IsolationLevel::ReadUncommitted),
            "read_committed" => Ok(IsolationLevel::ReadCommitted),
            "repeatable_read" => Ok(IsolationLevel::RepeatableRead),
            "serializable" => Ok(IsolationLevel::Serializable),
            _ => Err(SessionError::InvalidArgument(format!(
                "unknown isolation level '{s}'"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_read_committed() {
        assert_eq!(IsolationLevel::default(), IsolationLevel::ReadCommitted);
    }

    #[test]
    fn test_display_sql_spelling() {
        assert_eq!(IsolationLevel::Serializable.to_string(), "SERIALIZABLE");
        assert_eq!(
            IsolationLevel::ReadCommitted.to_string(),
            "READ COMMITTED"
        );
    }

    #[test]
    fn test_parse_both_spellings() {
        for level in IsolationLevel::ALL {
            let sql: IsolationLevel = level.to_string().parse().unwrap();
            assert_eq!(sql, level);

            let snake: IsolationLevel = level
                .to_string()
                .to_ascii_lowercase()
                .replace(' ', "_")
                .parse()
                .unwrap();
            assert_eq!(snake, level);
        }
    }

    #[test]
    fn test_parse_unknown_level() {
        assert!("chaos".parse::<IsolationLevel>().is_err());
    }
}
