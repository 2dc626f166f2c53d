//! Client side of the backend's plain-text wire protocol.
//!
//! Each [`Operation`] is a single POST against one endpoint, the operation is
//! selected by query flags and both bodies are whitespace separated numbers.

#[doc(hidden)]
pub mod client;
#[doc(hidden)]
pub mod codec;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod operation;

#[doc(inline)]
pub use client::{Backend, ProtocolClient};
#[doc(inline)]
pub use error::{ParseError, ProtocolError};
#[doc(inline)]
pub use operation::{Flag, Operation};

use crate::model::{NearestNeighbors, NodeLookup, Route};

/// A decoded response, one variant per [`Operation`].
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Nearest(NearestNeighbors),
    Lookup(NodeLookup),
    Route(Route),
}
