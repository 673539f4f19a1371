//! Identifiers as received from callers.
//!
//! Path segments arrive as text and JSON bodies may carry numbers or strings;
//! both are parsed here before any lookup touches storage.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// An identifier that has not been validated yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Num(i64),
    Text(String),
}

impl RawId {
    /// Well-formed base-10 `i64`, surrounding whitespace ignored.
    pub fn parse(&self) -> Result<i64, ServiceError> {
        match self {
            RawId::Num(n) => Ok(*n),
            RawId::Text(s) => s
                .trim()
                .parse::<i64>()
                .map_err(|_| ServiceError::InvalidIdentifier(s.clone())),
        }
    }
}

/// Parse every id of a link list, failing on the first malformed one.
pub fn parse_all(ids: &[RawId]) -> Result<Vec<i64>, ServiceError> {
    ids.iter().map(RawId::parse).collect()
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawId::Num(n) => write!(f, "{n}"),
            RawId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RawId {
    fn from(n: i64) -> Self { RawId::Num(n) }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self { RawId::Text(s.to_string()) }
}

impl From<String> for RawId {
    fn from(s: String) -> Self { RawId::Text(s) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numbers_and_numeric_text() {
        assert_eq!(RawId::from(7).parse().unwrap(), 7);
        assert_eq!(RawId::from("42").parse().unwrap(), 42);
        assert_eq!(RawId::from(" -3 ").parse().unwrap(), -3);
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in ["", "abc", "12abc", "1.5", "1e3", "0x10", "99999999999999999999"] {
            let err = RawId::from(bad).parse().unwrap_err();
            assert!(matches!(err, ServiceError::InvalidIdentifier(_)), "{bad:?}");
        }
    }

    #[test]
    fn deserializes_from_json_number_or_string() {
        let ids: Vec<RawId> = serde_json::from_str(r#"[1, "2", "x"]"#).unwrap();
        assert_eq!(ids[0], RawId::Num(1));
        assert_eq!(ids[1], RawId::Text("2".into()));
        assert!(parse_all(&ids).is_err());
        assert_eq!(parse_all(&ids[..2]).unwrap(), vec![1, 2]);
    }
}
