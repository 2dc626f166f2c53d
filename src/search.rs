//! Free-text search input: either a coordinate pair or a node identifier.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::model::NodeId;

const SEPARATORS: [char; 3] = [',', ';', '|'];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Query {
    Coordinates { latitude: f64, longitude: f64 },
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchError {
    InvalidInput(String),
}

impl SearchError {
    pub const NOTICE: &'static str = "Please enter coordinates or a valid node ID";
}

impl Display for SearchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchError::InvalidInput(input) => write!(f, "unrecognised search input {input:?}"),
        }
    }
}

impl std::error::Error for SearchError {}

impl FromStr for Query {
    type Err = SearchError;

    /// Accepts `lat, lon`, `lat; lon`, `lat | lon` (optionally wrapped in
    /// parentheses) or a bare node id.
    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || SearchError::InvalidInput(input.to_string());

        let trimmed = input.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);

        match inner.split_once(SEPARATORS) {
            Some((latitude, longitude)) => {
                let latitude = parse_degree(latitude).ok_or_else(invalid)?;
                let longitude = parse_degree(longitude).ok_or_else(invalid)?;

                Ok(Query::Coordinates {
                    latitude,
                    longitude,
                })
            }
            None => inner
                .trim()
                .parse::<NodeId>()
                .map(Query::Node)
                .map_err(|_| invalid()),
        }
    }
}

fn parse_degree(token: &str) -> Option<f64> {
    token
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test_log::test]
    fn coordinates_with_any_separator() {
        for input in ["48.1, 9.2", "(48.1;9.2)", " 48.1 | 9.2 "] {
            assert_eq!(
                input.parse::<Query>(),
                Ok(Query::Coordinates {
                    latitude: 48.1,
                    longitude: 9.2
                }),
                "{input}"
            );
        }
    }

    #[test_log::test]
    fn first_separator_wins() {
        let err = "48.1;9.2,3".parse::<Query>();
        assert!(err.is_err(), "second component must be a single number");
    }

    #[test_log::test]
    fn node_identifier() {
        assert_eq!("  42 ".parse::<Query>(), Ok(Query::Node(42)));
        assert_eq!("(7)".parse::<Query>(), Ok(Query::Node(7)));
    }

    #[test_log::test]
    fn rejects_garbage() {
        for input in ["", "stuttgart", "48.1,", "NaN, 9", "4.5"] {
            assert!(input.parse::<Query>().is_err(), "{input:?} accepted");
        }
    }
}
