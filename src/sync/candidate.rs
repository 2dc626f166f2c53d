use geo::{coord, Coord};

use crate::model::Node;
use crate::view::OverlayId;

/// The point a nearest-neighbor query was issued from, with its marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub marker: OverlayId,
}

impl QueryPoint {
    pub fn coord(&self) -> Coord {
        coord! { x: self.longitude, y: self.latitude }
    }
}

/// A node on display, pending confirmation as an endpoint.
///
/// The overlay handles are valid while the candidate is registered with
/// [`MapSync`](crate::sync::MapSync) or, once detached, until it is
/// released. `origin` and `beeline` are absent for nodes found by identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub node: Node,
    /// Distance from the query point, `0` for lookups.
    pub distance: f64,
    pub marker: OverlayId,
    pub beeline: Option<OverlayId>,
    pub origin: Option<QueryPoint>,
}
