use geo::{coord, Coord};
use serde::{Deserialize, Serialize};

/// Server-assigned node identifier.
pub type NodeId = i64;

/// `Node`
/// A graph node as reported by the backend, geotagged in degrees.
///
/// ```rust
/// use routeplanner::model::Node;
/// let node = Node::new(7, 48.1, 9.2);
/// assert_eq!(node.coord().x, 9.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub latitude: f64,
    pub longitude: f64,
}

impl Node {
    pub fn new(id: NodeId, latitude: f64, longitude: f64) -> Self {
        Node {
            id,
            latitude,
            longitude,
        }
    }

    /// The node position in map order, `x` is longitude and `y` latitude.
    pub fn coord(&self) -> Coord {
        coord! { x: self.longitude, y: self.latitude }
    }
}

/// Result of a nearest-neighbor query. Every node returned shares the same
/// distance to the query point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearestNeighbors {
    pub distance: f64,
    pub nodes: Vec<Node>,
}

/// Result of a node-by-ID lookup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum NodeLookup {
    Found(Node),
    NotFound,
}

impl NodeLookup {
    pub fn found(&self) -> bool {
        matches!(self, NodeLookup::Found(_))
    }
}
