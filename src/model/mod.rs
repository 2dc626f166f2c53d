#[doc(hidden)]
pub mod node;
#[doc(hidden)]
pub mod route;

#[doc(inline)]
pub use node::{NearestNeighbors, Node, NodeId, NodeLookup};
#[doc(inline)]
pub use route::{Route, RouteNode, NO_ROUTE};
