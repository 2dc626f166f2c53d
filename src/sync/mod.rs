//! Keeps map overlays in one-to-one correspondence with the session's
//! candidates, endpoints and route.
//!
//! Every overlay placed through [`MapSync`] is either registered in the
//! candidate set, handed out as part of a [`Candidate`] (which then owns it),
//! or tracked as the route path / row marker. Nothing is placed without one
//! of those owners.

#[doc(hidden)]
pub mod candidate;

#[doc(inline)]
pub use candidate::{Candidate, QueryPoint};

use geo::{coord, Line, LineString};
use indexmap::IndexMap;
use log::debug;
use smallvec::SmallVec;

use crate::model::{Node, Route, RouteNode};
use crate::view::{LineStyle, MapWidget, MarkerOptions, OverlayId, RowId, ViewSurface};

/// Whether [`MapSync::show_route`] rendered anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDisplay {
    Shown,
    NoRoute,
}

pub struct MapSync<M> {
    map: M,
    style: LineStyle,
    /// Candidate set keyed by marker, in query order.
    candidates: IndexMap<OverlayId, Candidate>,
    /// Query-point markers belonging to the candidate set.
    origins: SmallVec<[QueryPoint; 1]>,
    path: Option<OverlayId>,
    /// The route currently drawn.
    route: Option<Route>,
    rows: Vec<(RowId, RouteNode)>,
    selected_row: Option<RowId>,
    row_marker: Option<OverlayId>,
}

impl<M> MapSync<M>
where
    M: MapWidget,
{
    pub fn new(map: M) -> Self {
        MapSync {
            map,
            style: LineStyle::default(),
            candidates: IndexMap::new(),
            origins: SmallVec::new(),
            path: None,
            route: None,
            rows: vec![],
            selected_row: None,
            row_marker: None,
        }
    }

    /// Sets up the world view, tiles and scale bar.
    pub fn initialize(&mut self, tile_url: &str) {
        self.map.create_view(coord! { x: 0.0, y: 0.0 }, 0);
        self.map.add_tile_layer(tile_url);
        self.map.add_scale_control();
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Clears the candidate set and marks the point a query is issued from.
    pub fn show_start(&mut self, longitude: f64, latitude: f64) -> QueryPoint {
        self.remove_neighbors();

        let marker = self.map.place_marker(
            coord! { x: longitude, y: latitude },
            MarkerOptions::query_point(),
            &format!("( {latitude} | {longitude} )"),
        );

        let origin = QueryPoint {
            latitude,
            longitude,
            marker,
        };

        self.origins.push(origin);
        origin
    }

    /// Places a candidate with a beeline back to its query point and opens
    /// its popup. The caller is expected to treat the returned candidate as
    /// the one whose popup just opened.
    pub fn show_neighbor(&mut self, node: Node, distance: f64, origin: QueryPoint) -> Candidate {
        let marker =
            self.map
                .place_marker(node.coord(), MarkerOptions::default(), &format!("Node {}", node.id));

        let beeline = LineString::from(Line::new(origin.coord(), node.coord()));
        let beeline = self.map.draw_line(&beeline, &self.style);

        let candidate = Candidate {
            node,
            distance,
            marker,
            beeline: Some(beeline),
            origin: Some(origin),
        };

        debug!("Registered candidate {} ({marker:?}, {beeline:?})", node.id);
        self.candidates.insert(marker, candidate);
        self.map.open_popup(marker);

        candidate
    }

    /// Shows a node found by identifier as the sole candidate. It has no
    /// query point, so neither origin nor beeline are attached.
    pub fn show_found(&mut self, node: Node) -> Candidate {
        self.remove_neighbors();

        let marker =
            self.map
                .place_marker(node.coord(), MarkerOptions::default(), &format!("Node {}", node.id));

        let candidate = Candidate {
            node,
            distance: 0.0,
            marker,
            beeline: None,
            origin: None,
        };

        self.candidates.insert(marker, candidate);
        self.map.open_popup(marker);

        candidate
    }

    pub fn candidate(&self, marker: OverlayId) -> Option<&Candidate> {
        self.candidates.get(&marker)
    }

    pub fn candidates(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.values()
    }

    /// Overlays currently owned by the candidate set.
    pub fn candidate_overlays(&self) -> usize {
        self.origins.len()
            + self
                .candidates
                .values()
                .map(|candidate| 1 + usize::from(candidate.beeline.is_some()))
                .sum::<usize>()
    }

    /// Takes a candidate out of the candidate set without touching its
    /// overlays, which from now on belong to the returned value. Its query
    /// point goes with it, so that a following [`MapSync::remove_neighbors`]
    /// leaves the endpoint fully drawn.
    pub fn detach(&mut self, marker: OverlayId) -> Option<Candidate> {
        let candidate = self.candidates.shift_remove(&marker)?;

        if let Some(origin) = candidate.origin {
            self.origins.retain(|kept| kept.marker != origin.marker);
        }

        debug!("Detached candidate {} from the candidate set", candidate.node.id);
        Some(candidate)
    }

    /// Removes every overlay owned by a detached candidate.
    pub fn release(&mut self, candidate: &Candidate) {
        self.map.remove(candidate.marker);

        if let Some(origin) = candidate.origin {
            self.map.remove(origin.marker);
        }

        if let Some(beeline) = candidate.beeline {
            self.map.remove(beeline);
        }

        debug!("Released overlays of {}", candidate.node.id);
    }

    /// Removes all candidate markers, beelines and query points.
    pub fn remove_neighbors(&mut self) {
        for (marker, candidate) in self.candidates.drain(..) {
            self.map.remove(marker);

            if let Some(beeline) = candidate.beeline {
                self.map.remove(beeline);
            }
        }

        for origin in self.origins.drain(..) {
            self.map.remove(origin.marker);
        }
    }

    /// Draws the path and fills the results table. A route carrying the
    /// no-route sentinel is not rendered.
    pub fn show_route<V>(&mut self, route: &Route, view: &mut V) -> RouteDisplay
    where
        V: ViewSurface,
    {
        self.clear_route(view);

        if !route.exists() {
            return RouteDisplay::NoRoute;
        }

        self.path = Some(self.map.draw_line(&route.path, &self.style));

        self.rows = route
            .nodes
            .iter()
            .map(|entry| (view.push_row(entry.node.id, entry.cumulative_distance), *entry))
            .collect();

        self.route = Some(route.clone());

        debug!("Route drawn with {} rows", self.rows.len());
        RouteDisplay::Shown
    }

    pub fn has_route(&self) -> bool {
        self.path.is_some()
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    /// Removes the path, the row marker and every table row.
    pub fn clear_route<V>(&mut self, view: &mut V)
    where
        V: ViewSurface,
    {
        self.unselect_row(view);

        if let Some(path) = self.path.take() {
            self.map.remove(path);
        }

        self.route = None;

        self.rows.clear();
        view.clear_table();
    }

    /// Toggles the selection of a table row. Selecting the selected row
    /// again clears it.
    pub fn select_row<V>(&mut self, row: RowId, view: &mut V)
    where
        V: ViewSurface,
    {
        let previous = self.selected_row;
        self.unselect_row(view);

        if previous == Some(row) {
            return;
        }

        let Some((_, entry)) = self.rows.iter().find(|(id, _)| *id == row).copied() else {
            debug!("Ignoring click on unknown row {row:?}");
            return;
        };

        view.mark_row(row, true);

        let marker = self.map.place_marker(
            entry.node.coord(),
            MarkerOptions::default(),
            &format!("Node {}\nDistance {}", entry.node.id, entry.cumulative_distance),
        );

        self.map.open_popup(marker);
        self.selected_row = Some(row);
        self.row_marker = Some(marker);
    }

    pub fn unselect_row<V>(&mut self, view: &mut V)
    where
        V: ViewSurface,
    {
        if let Some(marker) = self.row_marker.take() {
            self.map.remove(marker);
        }

        if let Some(row) = self.selected_row.take() {
            view.mark_row(row, false);
        }
    }

    pub fn selected_row(&self) -> Option<RowId> {
        self.selected_row
    }

    pub fn rows(&self) -> impl Iterator<Item = &(RowId, RouteNode)> {
        self.rows.iter()
    }
}
