use strum::{AsRefStr, Display, EnumIter};

use crate::model::NodeId;

/// Buttons the core enables, disables and relabels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Control {
    /// "From" while picking the first endpoint, "Back" afterwards.
    LeftButton,
    /// "To" while picking the first endpoint, "Start" afterwards.
    RightButton,
    SearchButton,
}

/// Text labels the core writes to. The kebab-case name is the element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Label {
    SelectedLatitude,
    SelectedLongitude,
    NextId,
    NextLatitude,
    NextLongitude,
    NextDistance,
    OtherTitle,
    OtherId,
    OtherLatitude,
    OtherLongitude,
    RouteTitle,
    RouteDistance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Section {
    OtherNode,
    SidebarSelectNode,
    SidebarShowRoute,
    SearchContainer,
}

/// The loading overlay shown while a request is outstanding.
///
/// `Short` only disables the confirm controls and is used for lookups,
/// `Long` blocks all interaction and is used for route computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum LoadingVariant {
    Short,
    Long,
}

/// Handle to a row of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(pub usize);

/// The page surrounding the map, reduced to what the core reads and writes.
pub trait ViewSurface {
    fn set_label(&mut self, label: Label, text: &str);

    fn set_enabled(&mut self, control: Control, enabled: bool);

    fn set_button_text(&mut self, control: Control, text: &str);

    fn set_visible(&mut self, section: Section, visible: bool);

    fn show_loading(&mut self, variant: LoadingVariant);

    fn hide_loading(&mut self);

    /// The visible loading variant, if any.
    fn loading(&self) -> Option<LoadingVariant>;

    fn clear_table(&mut self);

    /// Appends a clickable row to the results table.
    fn push_row(&mut self, id: NodeId, cumulative_distance: f64) -> RowId;

    fn mark_row(&mut self, row: RowId, selected: bool);

    /// Blocking notification, an `alert` on the web.
    fn notify(&mut self, message: &str);

    /// Discards the page state, a location reload on the web.
    fn reload(&mut self);
}
