use std::fmt::{Display, Formatter};
use std::time::Duration;

/// A response body that does not follow the operation's grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Empty,
    /// A token that is not a finite number of the expected kind.
    InvalidField {
        field: &'static str,
        token: String,
    },
    /// Trailing tokens that do not form a complete record.
    Arity { arity: usize, trailing: usize },
    /// The grammar requires at least one record.
    MissingRecords,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty response"),
            ParseError::InvalidField { field, token } => {
                write!(f, "invalid {field}: {token:?}")
            }
            ParseError::Arity { arity, trailing } => write!(
                f,
                "incomplete record, expected {arity} fields but {trailing} remain"
            ),
            ParseError::MissingRecords => write!(f, "response carries no records"),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug)]
pub enum ProtocolError {
    /// The request never produced a response.
    Transport(reqwest::Error),
    /// The backend answered with anything but `200 OK`.
    Status { code: u16, body: String },
    Timeout(Duration),
    Parse(ParseError),
}

impl ProtocolError {
    /// Every protocol failure ends the session, only the message differs.
    pub fn notice(&self) -> String {
        match self {
            ProtocolError::Transport(err) => format!("Could not reach server: {err}"),
            ProtocolError::Status { body, .. } => format!("Bad reply from server: {body}"),
            ProtocolError::Timeout(_) => "A timeout occurred... Please try again".to_string(),
            ProtocolError::Parse(err) => format!("Malformed reply from server: {err}"),
        }
    }
}

impl Display for ProtocolError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ProtocolError::Transport(err) => write!(f, "transport failure: {err}"),
            ProtocolError::Status { code, body } => write!(f, "status {code}: {body}"),
            ProtocolError::Timeout(after) => write!(f, "timed out after {after:?}"),
            ProtocolError::Parse(err) => write!(f, "parse failure: {err}"),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Transport(err) => Some(err),
            ProtocolError::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ParseError> for ProtocolError {
    fn from(value: ParseError) -> Self {
        ProtocolError::Parse(value)
    }
}
