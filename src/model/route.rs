use geo::LineString;
use serde::{Deserialize, Serialize};

use crate::model::Node;

/// Total distance the backend reports when no path connects the endpoints.
pub const NO_ROUTE: f64 = -1.0;

/// A node on a computed route, carrying the distance travelled from the start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteNode {
    pub node: Node,
    pub cumulative_distance: f64,
}

/// A one-to-one route between two nodes.
///
/// The `path` is derived from `nodes` and holds `(longitude, latitude)`
/// coordinates, which is the order the map widget draws in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub distance: f64,
    pub nodes: Vec<RouteNode>,
    pub path: LineString,
}

impl Route {
    pub fn new(distance: f64, nodes: Vec<RouteNode>) -> Self {
        let path = nodes.iter().map(|entry| entry.node.coord()).collect();

        Route {
            distance,
            nodes,
            path,
        }
    }

    /// A route without a connecting path, as reported by the `-1` sentinel.
    pub fn unreachable() -> Self {
        Route::new(NO_ROUTE, vec![])
    }

    pub fn exists(&self) -> bool {
        self.distance != NO_ROUTE
    }
}
