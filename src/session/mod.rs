//! The selection state machine.
//!
//! A [`Session`] owns the interaction mode, both endpoints and the currently
//! selected candidate. It never performs I/O: operations that need the
//! backend return a [`Command`] which the host executes and answers through
//! [`Session::deliver`].
//!
//! ```text
//!  SelectingFirst ──designate──▶ SelectingSecond ──confirm──▶ ShowingRoute
//!        ▲                             │  ▲                        │
//!        └────────────back─────────────┘  └──────────back──────────┘
//! ```

#[cfg(test)]
mod test;

use log::{debug, error, info, warn};
use strum::Display;

use crate::config::ClientConfig;
use crate::model::{NearestNeighbors, NodeId, NodeLookup, Route};
use crate::protocol::{Operation, ProtocolError, Reply};
use crate::search::{Query, SearchError};
use crate::sync::{Candidate, MapSync, QueryPoint, RouteDisplay};
use crate::view::{
    Control, Label, LoadingVariant, MapWidget, OverlayId, RowId, Section, ViewSurface,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum SelectionState {
    SelectingFirst,
    SelectingSecond,
    ShowingRoute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Endpoint {
    Start,
    Destination,
}

/// Identifies an issued request. Replies carrying anything but the ticket of
/// the outstanding request are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A request the host must carry to the backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Command {
    pub ticket: Ticket,
    pub operation: Operation,
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Nearest(QueryPoint),
    Lookup,
    Route,
}

#[derive(Debug, Clone, Copy)]
struct Outstanding {
    ticket: Ticket,
    pending: Pending,
}

const SELECTION_LABELS: [Label; 6] = [
    Label::SelectedLatitude,
    Label::SelectedLongitude,
    Label::NextId,
    Label::NextLatitude,
    Label::NextLongitude,
    Label::NextDistance,
];

pub struct Session<M, V> {
    sync: MapSync<M>,
    view: V,
    state: SelectionState,
    start: Option<Candidate>,
    destination: Option<Candidate>,
    selected: Option<Candidate>,
    issued: u64,
    outstanding: Option<Outstanding>,
}

impl<M, V> Session<M, V>
where
    M: MapWidget,
    V: ViewSurface,
{
    pub fn new(map: M, view: V, config: &ClientConfig) -> Self {
        let mut session = Session {
            sync: MapSync::new(map),
            view,
            state: SelectionState::SelectingFirst,
            start: None,
            destination: None,
            selected: None,
            issued: 0,
            outstanding: None,
        };

        session.sync.initialize(&config.tile_url);
        session.render_first_pick();
        session.clear_selection_labels();
        session
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn start(&self) -> Option<&Candidate> {
        self.start.as_ref()
    }

    pub fn destination(&self) -> Option<&Candidate> {
        self.destination.as_ref()
    }

    pub fn selected(&self) -> Option<&Candidate> {
        self.selected.as_ref()
    }

    pub fn sync(&self) -> &MapSync<M> {
        &self.sync
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn is_loading(&self) -> bool {
        self.view.loading().is_some()
    }

    /// Ticket of the request still awaiting its reply.
    pub fn outstanding(&self) -> Option<Ticket> {
        self.outstanding.map(|outstanding| outstanding.ticket)
    }

    /// Host callback for a click on the map background.
    pub fn on_map_click(&mut self, latitude: f64, longitude: f64) -> Option<Command> {
        match self.state {
            SelectionState::ShowingRoute => {
                self.sync.unselect_row(&mut self.view);
                None
            }
            SelectionState::SelectingFirst | SelectionState::SelectingSecond => {
                self.set_query_labels(latitude, longitude);
                self.find_nearest(latitude, longitude)
            }
        }
    }

    /// Host callback for the search button.
    pub fn search(&mut self, input: &str) -> Option<Command> {
        if self.state == SelectionState::ShowingRoute {
            debug!("Search is unavailable while a route is shown");
            return None;
        }

        match input.parse::<Query>() {
            Ok(Query::Coordinates {
                latitude,
                longitude,
            }) => {
                self.set_query_labels(latitude, longitude);
                self.find_nearest(latitude, longitude)
            }
            Ok(Query::Node(id)) => self.lookup(id),
            Err(err) => {
                warn!("{err}");
                self.view.notify(SearchError::NOTICE);
                None
            }
        }
    }

    /// Host callback for a marker popup opened by the user. Markers that are
    /// not part of the candidate set (endpoints, row markers) are ignored.
    pub fn on_popup_open(&mut self, marker: OverlayId) {
        match self.sync.candidate(marker).copied() {
            Some(candidate) => self.popup_opened(candidate),
            None => debug!("Popup of {marker:?} does not belong to a candidate"),
        }
    }

    /// Host callback for a click on a results-table row.
    pub fn on_row_click(&mut self, row: RowId) {
        if self.state == SelectionState::ShowingRoute {
            self.sync.select_row(row, &mut self.view);
        }
    }

    /// "From" while picking the first endpoint, "Back" afterwards.
    pub fn left_button(&mut self) {
        match self.state {
            SelectionState::SelectingFirst => self.designate(Endpoint::Start),
            _ => {
                self.back();
            }
        }
    }

    /// "To" while picking the first endpoint, "Start" afterwards.
    pub fn right_button(&mut self) -> Option<Command> {
        match self.state {
            SelectionState::SelectingFirst => {
                self.designate(Endpoint::Destination);
                None
            }
            SelectionState::SelectingSecond => self.confirm(),
            SelectionState::ShowingRoute => None,
        }
    }

    /// Makes the selected candidate the given endpoint and moves on to
    /// picking the other one.
    pub fn designate(&mut self, endpoint: Endpoint) {
        if self.state != SelectionState::SelectingFirst || self.is_loading() {
            warn!("Cannot designate {endpoint} in {}", self.state);
            return;
        }

        let Some(candidate) = self.take_selected() else {
            warn!("Cannot designate {endpoint} without a selected node");
            return;
        };

        let title = match endpoint {
            Endpoint::Start => {
                self.start = Some(candidate);
                "Starting point"
            }
            Endpoint::Destination => {
                self.destination = Some(candidate);
                "Destination"
            }
        };

        self.view.set_label(Label::OtherTitle, title);
        self.set_other_labels(&candidate);

        self.view.set_button_text(Control::RightButton, "Start");
        self.view.set_enabled(Control::RightButton, false);
        self.view.set_button_text(Control::LeftButton, "Back");
        self.view.set_enabled(Control::LeftButton, true);
        self.view.set_visible(Section::OtherNode, true);

        self.clear_selected_node();
        self.state = SelectionState::SelectingSecond;

        info!("{endpoint} set to node {}", candidate.node.id);
    }

    /// Completes the pair with the selected candidate and requests the route.
    pub fn confirm(&mut self) -> Option<Command> {
        if self.state != SelectionState::SelectingSecond || !self.can_issue() {
            warn!("Cannot confirm in {}", self.state);
            return None;
        }

        let Some(candidate) = self.take_selected() else {
            warn!("Cannot confirm without a selected node");
            return None;
        };

        if self.start.is_none() {
            self.start = Some(candidate);
        }
        if self.destination.is_none() {
            self.destination = Some(candidate);
        }

        let (Some(start), Some(destination)) = (self.start, self.destination) else {
            return None;
        };

        self.sync.remove_neighbors();
        self.view.set_enabled(Control::RightButton, false);
        self.selected = Some(candidate);
        self.state = SelectionState::ShowingRoute;

        info!("Requesting route {} -> {}", start.node.id, destination.node.id);
        Some(self.issue(
            Operation::OneToOne {
                start: start.node.id,
                destination: destination.node.id,
            },
            Pending::Route,
        ))
    }

    /// Steps back one state, tearing down every overlay of the state being
    /// left. Returns whether a transition happened; it never does while the
    /// loading indicator is visible. In the first pick there is nothing to
    /// step back to, but the candidate set is still cleared.
    pub fn back(&mut self) -> bool {
        if self.is_loading() {
            debug!("Back suppressed while loading");
            return false;
        }

        match self.state {
            SelectionState::SelectingFirst => {
                self.clear_selected_node();
                self.forget_selection();
                false
            }
            SelectionState::SelectingSecond => {
                for endpoint in [self.start.take(), self.destination.take()]
                    .into_iter()
                    .flatten()
                {
                    self.sync.release(&endpoint);
                }

                self.clear_selected_node();
                self.render_first_pick();
                self.outstanding = None;
                self.state = SelectionState::SelectingFirst;

                info!("Back to {}", self.state);
                true
            }
            SelectionState::ShowingRoute => {
                self.sync.clear_route(&mut self.view);

                let selected = self.selected.take();
                let reset = match (self.start, selected) {
                    (Some(start), Some(selected)) if start.marker == selected.marker => {
                        self.start.take()
                    }
                    _ => self.destination.take(),
                };

                if let Some(endpoint) = reset {
                    self.sync.release(&endpoint);
                }

                self.render_second_pick();
                self.outstanding = None;
                self.state = SelectionState::SelectingSecond;

                info!("Back to {}", self.state);
                true
            }
        }
    }

    /// Feeds the outcome of a [`Command`] back into the session.
    pub fn deliver(&mut self, ticket: Ticket, reply: Result<Reply, ProtocolError>) {
        let outstanding = match self.outstanding {
            Some(outstanding) if outstanding.ticket == ticket => outstanding,
            _ => {
                warn!("Discarding reply for {ticket:?}, no longer outstanding");
                return;
            }
        };
        self.outstanding = None;

        let reply = match reply {
            Ok(reply) => reply,
            Err(err) => {
                error!("Request {ticket:?} failed: {err}");
                self.fail(&err.notice());
                return;
            }
        };

        match (outstanding.pending, reply) {
            (Pending::Nearest(origin), Reply::Nearest(result)) => self.on_nearest(origin, result),
            (Pending::Lookup, Reply::Lookup(lookup)) => self.on_lookup(lookup),
            (Pending::Route, Reply::Route(route)) => self.on_route(route),
            (pending, reply) => {
                error!("Reply {reply:?} does not answer {pending:?}");
                self.fail("Bad reply from server");
            }
        }
    }

    /// Discards all client state, the equivalent of reloading the page.
    pub fn reset(&mut self) {
        self.view.hide_loading();
        self.view.set_enabled(Control::SearchButton, true);
        self.sync.clear_route(&mut self.view);

        for endpoint in [self.start.take(), self.destination.take()]
            .into_iter()
            .flatten()
        {
            self.sync.release(&endpoint);
        }

        self.clear_selected_node();
        self.render_first_pick();
        self.outstanding = None;
        self.state = SelectionState::SelectingFirst;
        self.view.reload();

        info!("Session reset");
    }

    fn fail(&mut self, notice: &str) {
        self.view.notify(notice);
        self.reset();
    }

    fn can_issue(&self) -> bool {
        if self.is_loading() || self.outstanding.is_some() {
            debug!("A request is already outstanding");
            return false;
        }
        true
    }

    fn issue(&mut self, operation: Operation, pending: Pending) -> Command {
        let variant = operation.loading();
        self.view.show_loading(variant);

        self.view.set_enabled(Control::LeftButton, false);
        self.view.set_enabled(Control::RightButton, false);
        if variant == LoadingVariant::Long {
            self.view.set_enabled(Control::SearchButton, false);
        }

        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.outstanding = Some(Outstanding { ticket, pending });

        debug!("Issued {ticket:?} for {}", operation.query());
        Command { ticket, operation }
    }

    /// Hides the loading indicator and gives the controls back as the current
    /// state and selection allow.
    fn finish_loading(&mut self) {
        self.view.hide_loading();
        self.view.set_enabled(Control::SearchButton, true);

        let selected = self.selected.is_some();
        let (left, right) = match self.state {
            SelectionState::SelectingFirst => (selected, selected),
            SelectionState::SelectingSecond => (true, selected),
            SelectionState::ShowingRoute => (true, false),
        };

        self.view.set_enabled(Control::LeftButton, left);
        self.view.set_enabled(Control::RightButton, right);
    }

    fn find_nearest(&mut self, latitude: f64, longitude: f64) -> Option<Command> {
        if !self.can_issue() {
            return None;
        }

        let origin = self.sync.show_start(longitude, latitude);
        // The candidate the confirm controls referred to is gone.
        self.forget_selection();

        Some(self.issue(
            Operation::NearestNeighbor {
                latitude,
                longitude,
            },
            Pending::Nearest(origin),
        ))
    }

    fn lookup(&mut self, id: NodeId) -> Option<Command> {
        if !self.can_issue() {
            return None;
        }

        Some(self.issue(Operation::NodeById(id), Pending::Lookup))
    }

    fn on_nearest(&mut self, origin: QueryPoint, result: NearestNeighbors) {
        for node in result.nodes {
            let candidate = self.sync.show_neighbor(node, result.distance, origin);
            self.popup_opened(candidate);
        }

        self.finish_loading();
    }

    fn on_lookup(&mut self, lookup: NodeLookup) {
        self.finish_loading();

        match lookup {
            NodeLookup::Found(node) => {
                self.set_query_labels(node.latitude, node.longitude);
                let candidate = self.sync.show_found(node);
                self.popup_opened(candidate);
            }
            NodeLookup::NotFound => {
                warn!("Node lookup found nothing");
                self.view.notify("Node not found");
            }
        }
    }

    fn on_route(&mut self, route: Route) {
        if let (Some(start), Some(destination)) = (self.start, self.destination) {
            self.view.set_label(
                Label::RouteTitle,
                &format!("{} -> {}", start.node.id, destination.node.id),
            );
        }
        self.view
            .set_label(Label::RouteDistance, &format!("Distance: {}", route.distance));

        match self.sync.show_route(&route, &mut self.view) {
            RouteDisplay::Shown => {
                self.view.set_visible(Section::SidebarSelectNode, false);
                self.view.set_visible(Section::SidebarShowRoute, true);
                self.view.set_visible(Section::SearchContainer, false);
                self.finish_loading();

                info!("Route shown, distance {}", route.distance);
            }
            RouteDisplay::NoRoute => {
                self.finish_loading();
                warn!("No route between the selected endpoints");
                self.view.notify("No route found");
                self.back();
            }
        }
    }

    fn popup_opened(&mut self, candidate: Candidate) {
        self.view.set_label(Label::NextId, &candidate.node.id.to_string());
        self.view
            .set_label(Label::NextLatitude, &candidate.node.latitude.to_string());
        self.view
            .set_label(Label::NextLongitude, &candidate.node.longitude.to_string());
        self.view
            .set_label(Label::NextDistance, &candidate.distance.to_string());

        match self.state {
            SelectionState::SelectingFirst => {
                self.view.set_enabled(Control::LeftButton, true);
                self.view.set_enabled(Control::RightButton, true);
            }
            SelectionState::SelectingSecond => {
                self.view.set_enabled(Control::RightButton, true);
            }
            SelectionState::ShowingRoute => {}
        }

        self.selected = Some(candidate);
    }

    /// Detaches the selected candidate from the candidate set. A selection
    /// whose overlays are already gone yields nothing.
    fn take_selected(&mut self) -> Option<Candidate> {
        let selected = self.selected.take()?;
        self.sync.detach(selected.marker)
    }

    fn forget_selection(&mut self) {
        self.selected = None;

        match self.state {
            SelectionState::SelectingFirst => {
                self.view.set_enabled(Control::LeftButton, false);
                self.view.set_enabled(Control::RightButton, false);
            }
            SelectionState::SelectingSecond => {
                self.view.set_enabled(Control::RightButton, false);
            }
            SelectionState::ShowingRoute => {}
        }
    }

    fn clear_selected_node(&mut self) {
        self.sync.remove_neighbors();
        self.selected = None;
        self.clear_selection_labels();
    }

    fn clear_selection_labels(&mut self) {
        for label in SELECTION_LABELS {
            self.view.set_label(label, "-");
        }
    }

    fn set_query_labels(&mut self, latitude: f64, longitude: f64) {
        self.view
            .set_label(Label::SelectedLatitude, &latitude.to_string());
        self.view
            .set_label(Label::SelectedLongitude, &longitude.to_string());
    }

    fn set_other_labels(&mut self, candidate: &Candidate) {
        self.view
            .set_label(Label::OtherId, &candidate.node.id.to_string());
        self.view
            .set_label(Label::OtherLatitude, &candidate.node.latitude.to_string());
        self.view
            .set_label(Label::OtherLongitude, &candidate.node.longitude.to_string());
    }

    fn render_first_pick(&mut self) {
        self.view.set_button_text(Control::LeftButton, "From");
        self.view.set_enabled(Control::LeftButton, false);
        self.view.set_button_text(Control::RightButton, "To");
        self.view.set_enabled(Control::RightButton, false);

        self.view.set_visible(Section::OtherNode, false);
        self.view.set_visible(Section::SidebarSelectNode, true);
        self.view.set_visible(Section::SidebarShowRoute, false);
        self.view.set_visible(Section::SearchContainer, true);
    }

    fn render_second_pick(&mut self) {
        self.view.set_visible(Section::SidebarSelectNode, true);
        self.view.set_visible(Section::SidebarShowRoute, false);
        self.view.set_visible(Section::SearchContainer, true);

        self.view.set_button_text(Control::LeftButton, "Back");
        self.view.set_enabled(Control::LeftButton, true);
        self.view.set_button_text(Control::RightButton, "Start");
        self.view.set_enabled(Control::RightButton, false);

        if let Some(remaining) = self.start.or(self.destination) {
            let title = match self.start {
                Some(_) => "Starting point",
                None => "Destination",
            };

            self.view.set_label(Label::OtherTitle, title);
            self.set_other_labels(&remaining);
            self.view.set_visible(Section::OtherNode, true);
        }

        self.clear_selection_labels();
    }
}
