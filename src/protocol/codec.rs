//! Positional decoders for the three response grammars.
//!
//! ```text
//! nearest-neighbor  <distance> (<id> <lat> <lon>)+
//! node lookup       <found:0|1> [<id> <lat> <lon>]
//! route             <totalDistance> (<id> <lat> <lon> <cumulativeDistance>)+
//! ```

use std::str::{FromStr, SplitWhitespace};

use itertools::Itertools;

use crate::model::{NearestNeighbors, Node, NodeId, NodeLookup, Route, RouteNode, NO_ROUTE};
use crate::protocol::ParseError;

struct Tokens<'a> {
    inner: SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(body: &'a str) -> Self {
        Tokens {
            inner: body.split_whitespace(),
        }
    }

    fn next_token(&mut self, field: &'static str) -> Result<&'a str, ParseError> {
        self.inner.next().ok_or(ParseError::InvalidField {
            field,
            token: String::new(),
        })
    }

    fn id(&mut self) -> Result<NodeId, ParseError> {
        let token = self.next_token("id")?;
        parse_id(token)
    }

    fn number(&mut self, field: &'static str) -> Result<f64, ParseError> {
        let token = self.next_token(field)?;
        parse_number(field, token)
    }

    /// Collects the remaining tokens, refusing a partial trailing record.
    fn records(self, arity: usize) -> Result<Vec<&'a str>, ParseError> {
        let rest = self.inner.collect::<Vec<_>>();

        match rest.len() % arity {
            0 => Ok(rest),
            trailing => Err(ParseError::Arity { arity, trailing }),
        }
    }
}

fn parse_id(token: &str) -> Result<NodeId, ParseError> {
    NodeId::from_str(token).map_err(|_| ParseError::InvalidField {
        field: "id",
        token: token.to_string(),
    })
}

// `f64::from_str` accepts "NaN" and "inf", neither is a distance or a degree.
fn parse_number(field: &'static str, token: &str) -> Result<f64, ParseError> {
    match f64::from_str(token) {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ParseError::InvalidField {
            field,
            token: token.to_string(),
        }),
    }
}

fn parse_node(id: &str, latitude: &str, longitude: &str) -> Result<Node, ParseError> {
    Ok(Node::new(
        parse_id(id)?,
        parse_number("latitude", latitude)?,
        parse_number("longitude", longitude)?,
    ))
}

pub fn parse_nearest(body: &str) -> Result<NearestNeighbors, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut tokens = Tokens::new(body);
    let distance = tokens.number("distance")?;

    let nodes = tokens
        .records(3)?
        .into_iter()
        .tuples()
        .map(|(id, latitude, longitude)| parse_node(id, latitude, longitude))
        .collect::<Result<Vec<_>, _>>()?;

    if nodes.is_empty() {
        return Err(ParseError::MissingRecords);
    }

    Ok(NearestNeighbors { distance, nodes })
}

/// A `0` carries no further fields, anything after it is left untouched.
pub fn parse_lookup(body: &str) -> Result<NodeLookup, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut tokens = Tokens::new(body);

    match tokens.next_token("found")? {
        "0" => Ok(NodeLookup::NotFound),
        "1" => {
            let id = tokens.id()?;
            let latitude = tokens.number("latitude")?;
            let longitude = tokens.number("longitude")?;

            Ok(NodeLookup::Found(Node::new(id, latitude, longitude)))
        }
        other => Err(ParseError::InvalidField {
            field: "found",
            token: other.to_string(),
        }),
    }
}

/// An unreachable destination is reported as a bare `-1`, which is the only
/// case where a route without records is accepted.
pub fn parse_route(body: &str) -> Result<Route, ParseError> {
    if body.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    let mut tokens = Tokens::new(body);
    let distance = tokens.number("distance")?;

    let nodes = tokens
        .records(4)?
        .into_iter()
        .tuples()
        .map(|(id, latitude, longitude, cumulative)| -> Result<RouteNode, ParseError> {
            Ok(RouteNode {
                node: parse_node(id, latitude, longitude)?,
                cumulative_distance: parse_number("cumulative distance", cumulative)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if nodes.is_empty() && distance != NO_ROUTE {
        return Err(ParseError::MissingRecords);
    }

    Ok(Route::new(distance, nodes))
}
