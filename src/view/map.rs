use geo::{Coord, LineString};

/// Opaque handle to anything placed on the map. Handles are never reused by
/// a widget for the lifetime of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerOptions {
    pub opacity: f64,
    pub rise_on_hover: bool,
}

impl Default for MarkerOptions {
    fn default() -> Self {
        MarkerOptions {
            opacity: 1.0,
            rise_on_hover: true,
        }
    }
}

impl MarkerOptions {
    /// Translucent marker used for the point a query was issued from.
    pub fn query_point() -> Self {
        MarkerOptions {
            opacity: 0.5,
            ..MarkerOptions::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: String,
    pub weight: u32,
    pub opacity: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            color: "#ff7800".to_string(),
            weight: 5,
            opacity: 1.0,
        }
    }
}

/// The operations the core needs from a slippy-map widget.
///
/// Coordinates are in map order: `x` is longitude, `y` is latitude.
/// Events flow the other way; the host forwards clicks and popup openings to
/// the [`Session`](crate::session::Session).
pub trait MapWidget {
    fn create_view(&mut self, center: Coord, zoom: u8);

    fn add_tile_layer(&mut self, url: &str);

    fn add_scale_control(&mut self);

    /// Places a marker with a bound popup and returns its handle.
    fn place_marker(&mut self, at: Coord, options: MarkerOptions, popup: &str) -> OverlayId;

    /// Draws a GeoJSON-style line string.
    fn draw_line(&mut self, coords: &LineString, style: &LineStyle) -> OverlayId;

    /// Removes an overlay. Removing an unknown handle is a no-op.
    fn remove(&mut self, overlay: OverlayId);

    fn open_popup(&mut self, marker: OverlayId);
}
