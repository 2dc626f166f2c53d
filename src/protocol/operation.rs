use std::time::Duration;

use itertools::Itertools;
use strum::{AsRefStr, Display};

use crate::config::ClientConfig;
use crate::model::NodeId;
use crate::protocol::codec;
use crate::protocol::{ParseError, Reply};
use crate::view::LoadingVariant;

/// Query flags understood by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
pub enum Flag {
    /// Nearest-neighbor find.
    #[strum(serialize = "nnf")]
    NearestFind,
    /// Node lookup by identifier.
    #[strum(serialize = "nbi")]
    NodeById,
    /// One-to-one shortest path.
    #[strum(serialize = "oto")]
    OneToOne,
    #[strum(serialize = "pl")]
    PrintLocation,
    #[strum(serialize = "pd")]
    PrintDistance,
    #[strum(serialize = "pp")]
    PrintPath,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Operation {
    NearestNeighbor { latitude: f64, longitude: f64 },
    NodeById(NodeId),
    OneToOne { start: NodeId, destination: NodeId },
}

impl Operation {
    pub fn flags(&self) -> &'static [Flag] {
        match self {
            Operation::NearestNeighbor { .. } => &[Flag::NearestFind, Flag::PrintLocation],
            Operation::NodeById(_) => &[Flag::NodeById, Flag::PrintLocation],
            Operation::OneToOne { .. } => &[
                Flag::OneToOne,
                Flag::PrintLocation,
                Flag::PrintDistance,
                Flag::PrintPath,
            ],
        }
    }

    /// The query string, e.g. `nbi&pl&5`.
    pub fn query(&self) -> String {
        let flags = self.flags().iter().map(AsRef::<str>::as_ref).join("&");

        match self {
            Operation::NodeById(id) => format!("{flags}&{id}"),
            _ => flags,
        }
    }

    pub fn body(&self) -> String {
        match self {
            Operation::NearestNeighbor {
                latitude,
                longitude,
            } => format!("{latitude} {longitude}"),
            Operation::NodeById(_) => String::new(),
            Operation::OneToOne { start, destination } => format!("{start} {destination}"),
        }
    }

    pub fn timeout(&self, config: &ClientConfig) -> Duration {
        match self {
            Operation::OneToOne { .. } => config.route_timeout,
            _ => config.lookup_timeout,
        }
    }

    /// Route computation is expected to take noticeably longer, so it blocks
    /// the whole surface while lookups only disable the confirm controls.
    pub fn loading(&self) -> LoadingVariant {
        match self {
            Operation::OneToOne { .. } => LoadingVariant::Long,
            _ => LoadingVariant::Short,
        }
    }

    pub fn decode(&self, body: &str) -> Result<Reply, ParseError> {
        match self {
            Operation::NearestNeighbor { .. } => codec::parse_nearest(body).map(Reply::Nearest),
            Operation::NodeById(_) => codec::parse_lookup(body).map(Reply::Lookup),
            Operation::OneToOne { .. } => codec::parse_route(body).map(Reply::Route),
        }
    }
}
