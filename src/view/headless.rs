//! Recording implementations of the view capabilities.
//!
//! They keep every overlay, label and control in memory and log each change,
//! which is enough to host a [`Session`](crate::session::Session) from a
//! terminal and to assert on its effects in tests.

use geo::{Coord, LineString};
use log::{debug, info};
use rustc_hash::FxHashMap;
use strum::IntoEnumIterator;

use crate::history::History;
use crate::model::NodeId;
use crate::view::{
    Control, Label, LineStyle, LoadingVariant, MapWidget, MarkerOptions, OverlayId, RowId,
    Section, ViewSurface,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    Marker {
        at: Coord,
        options: MarkerOptions,
        popup: String,
    },
    Line {
        coords: LineString,
    },
}

#[derive(Debug, Default)]
pub struct HeadlessMap {
    next: u64,
    overlays: FxHashMap<OverlayId, Overlay>,
    open_popup: Option<OverlayId>,
    pub center: Option<(Coord, u8)>,
    pub tile_layers: Vec<String>,
    pub scale_control: bool,
}

impl HeadlessMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of overlays currently on the map.
    pub fn live(&self) -> usize {
        self.overlays.len()
    }

    pub fn contains(&self, overlay: OverlayId) -> bool {
        self.overlays.contains_key(&overlay)
    }

    pub fn get(&self, overlay: OverlayId) -> Option<&Overlay> {
        self.overlays.get(&overlay)
    }

    pub fn lines(&self) -> usize {
        self.overlays
            .values()
            .filter(|overlay| matches!(overlay, Overlay::Line { .. }))
            .count()
    }

    /// The marker whose popup is open, if it is still on the map.
    pub fn open_popup(&self) -> Option<OverlayId> {
        self.open_popup.filter(|id| self.overlays.contains_key(id))
    }

    fn insert(&mut self, overlay: Overlay) -> OverlayId {
        self.next += 1;
        let id = OverlayId(self.next);
        self.overlays.insert(id, overlay);
        id
    }
}

impl MapWidget for HeadlessMap {
    fn create_view(&mut self, center: Coord, zoom: u8) {
        debug!("map::view center={center:?} zoom={zoom}");
        self.center = Some((center, zoom));
    }

    fn add_tile_layer(&mut self, url: &str) {
        debug!("map::tiles {url}");
        self.tile_layers.push(url.to_string());
    }

    fn add_scale_control(&mut self) {
        self.scale_control = true;
    }

    fn place_marker(&mut self, at: Coord, options: MarkerOptions, popup: &str) -> OverlayId {
        let id = self.insert(Overlay::Marker {
            at,
            options,
            popup: popup.to_string(),
        });
        debug!("map::marker {id:?} at ({}, {}) opacity={}", at.y, at.x, options.opacity);
        id
    }

    fn draw_line(&mut self, coords: &LineString, _style: &LineStyle) -> OverlayId {
        let id = self.insert(Overlay::Line {
            coords: coords.clone(),
        });
        debug!("map::line {id:?} with {} points", coords.0.len());
        id
    }

    fn remove(&mut self, overlay: OverlayId) {
        if self.overlays.remove(&overlay).is_some() {
            debug!("map::remove {overlay:?}");
        }
    }

    fn open_popup(&mut self, marker: OverlayId) {
        if let Some(Overlay::Marker { popup, .. }) = self.overlays.get(&marker) {
            info!("popup: {popup}");
            self.open_popup = Some(marker);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub id: NodeId,
    pub cumulative_distance: f64,
    pub selected: bool,
}

#[derive(Debug)]
pub struct HeadlessView {
    labels: FxHashMap<Label, String>,
    enabled: FxHashMap<Control, bool>,
    texts: FxHashMap<Control, String>,
    visible: FxHashMap<Section, bool>,
    loading: Option<LoadingVariant>,
    pub rows: Vec<Row>,
    pub notices: Vec<String>,
    pub reloads: usize,
}

impl Default for HeadlessView {
    fn default() -> Self {
        HeadlessView {
            labels: Label::iter().map(|label| (label, "-".to_string())).collect(),
            enabled: Control::iter().map(|control| (control, true)).collect(),
            texts: FxHashMap::default(),
            visible: Section::iter().map(|section| (section, true)).collect(),
            loading: None,
            rows: vec![],
            notices: vec![],
            reloads: 0,
        }
    }
}

impl HeadlessView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label(&self, label: Label) -> &str {
        self.labels.get(&label).map_or("-", String::as_str)
    }

    pub fn enabled(&self, control: Control) -> bool {
        self.enabled.get(&control).copied().unwrap_or(false)
    }

    pub fn text(&self, control: Control) -> &str {
        self.texts.get(&control).map_or("", String::as_str)
    }

    pub fn visible(&self, section: Section) -> bool {
        self.visible.get(&section).copied().unwrap_or(false)
    }

    pub fn selected_rows(&self) -> usize {
        self.rows.iter().filter(|row| row.selected).count()
    }
}

impl ViewSurface for HeadlessView {
    fn set_label(&mut self, label: Label, text: &str) {
        self.labels.insert(label, text.to_string());
    }

    fn set_enabled(&mut self, control: Control, enabled: bool) {
        self.enabled.insert(control, enabled);
    }

    fn set_button_text(&mut self, control: Control, text: &str) {
        self.texts.insert(control, text.to_string());
    }

    fn set_visible(&mut self, section: Section, visible: bool) {
        self.visible.insert(section, visible);
    }

    fn show_loading(&mut self, variant: LoadingVariant) {
        debug!("view::loading {variant}");
        self.loading = Some(variant);
    }

    fn hide_loading(&mut self) {
        self.loading = None;
    }

    fn loading(&self) -> Option<LoadingVariant> {
        self.loading
    }

    fn clear_table(&mut self) {
        self.rows.clear();
    }

    fn push_row(&mut self, id: NodeId, cumulative_distance: f64) -> RowId {
        self.rows.push(Row {
            id,
            cumulative_distance,
            selected: false,
        });
        RowId(self.rows.len() - 1)
    }

    fn mark_row(&mut self, row: RowId, selected: bool) {
        if let Some(entry) = self.rows.get_mut(row.0) {
            entry.selected = selected;
        }
    }

    fn notify(&mut self, message: &str) {
        info!("notice: {message}");
        self.notices.push(message.to_string());
    }

    fn reload(&mut self) {
        self.reloads += 1;
    }
}

#[derive(Debug, Default)]
pub struct HeadlessHistory {
    pub push_state: bool,
    pub pushes: usize,
    pub fragments: Vec<String>,
}

impl HeadlessHistory {
    pub fn with_push_state() -> Self {
        HeadlessHistory {
            push_state: true,
            ..Self::default()
        }
    }

    pub fn fragment_only() -> Self {
        Self::default()
    }
}

impl History for HeadlessHistory {
    fn supports_push_state(&self) -> bool {
        self.push_state
    }

    fn push_state(&mut self) {
        self.pushes += 1;
    }

    fn set_fragment(&mut self, fragment: &str) {
        self.fragments.push(fragment.to_string());
    }
}
