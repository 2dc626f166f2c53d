use std::time::Duration;

use crate::config::ClientConfig;
use crate::model::{NearestNeighbors, Node, NodeLookup, Route, RouteNode};
use crate::protocol::{Operation, ParseError, ProtocolError, Reply};
use crate::search::SearchError;
use crate::session::{Command, Endpoint, SelectionState, Session};
use crate::view::headless::{HeadlessMap, HeadlessView};
use crate::view::{Control, Label, LoadingVariant, RowId, Section, ViewSurface};

type TestSession = Session<HeadlessMap, HeadlessView>;

const FIRST: Node = Node {
    id: 7,
    latitude: 48.1,
    longitude: 9.2,
};

const SECOND: Node = Node {
    id: 9,
    latitude: 48.3,
    longitude: 9.4,
};

/// Overlays an endpoint picked from a nearest-neighbor query keeps:
/// its marker, its beeline and the query point.
const ENDPOINT_OVERLAYS: usize = 3;

fn session() -> TestSession {
    Session::new(
        HeadlessMap::new(),
        HeadlessView::new(),
        &ClientConfig::new("http://backend"),
    )
}

fn query(session: &mut TestSession, nodes: &[Node]) {
    let at = nodes[0];
    let command = session
        .on_map_click(at.latitude + 0.001, at.longitude + 0.001)
        .expect("query issued");

    session.deliver(
        command.ticket,
        Ok(Reply::Nearest(NearestNeighbors {
            distance: 12.5,
            nodes: nodes.to_vec(),
        })),
    );
}

fn second_pick() -> TestSession {
    let mut session = session();
    query(&mut session, &[FIRST]);
    session.designate(Endpoint::Start);
    session
}

fn confirmed() -> (TestSession, Command) {
    let mut session = second_pick();
    query(&mut session, &[SECOND]);
    let command = session.right_button().expect("route requested");
    (session, command)
}

fn route(start: Node, destination: Node) -> Route {
    Route::new(
        100.0,
        vec![
            RouteNode {
                node: start,
                cumulative_distance: 0.0,
            },
            RouteNode {
                node: Node::new(8, 48.2, 9.3),
                cumulative_distance: 40.0,
            },
            RouteNode {
                node: destination,
                cumulative_distance: 100.0,
            },
        ],
    )
}

fn showing_route() -> TestSession {
    let (mut session, command) = confirmed();
    session.deliver(command.ticket, Ok(Reply::Route(route(FIRST, SECOND))));
    session
}

fn assert_no_candidates_or_route(session: &TestSession) {
    assert_eq!(session.sync().candidate_overlays(), 0);
    assert_eq!(session.sync().candidates().count(), 0);
    assert!(!session.sync().has_route());
    assert_eq!(session.view().selected_rows(), 0);
}

#[test_log::test]
fn starts_in_first_pick_with_confirm_disabled() {
    let session = session();
    let view = session.view();

    assert_eq!(session.state(), SelectionState::SelectingFirst);
    assert_eq!(view.text(Control::LeftButton), "From");
    assert_eq!(view.text(Control::RightButton), "To");
    assert!(!view.enabled(Control::LeftButton));
    assert!(!view.enabled(Control::RightButton));
    assert!(!view.visible(Section::OtherNode));
    assert_eq!(view.label(Label::NextId), "-");
    assert_eq!(session.sync().map().live(), 0);
    assert_eq!(session.sync().map().tile_layers.len(), 1);
}

#[test_log::test]
fn confirm_controls_wait_for_a_popup() {
    let mut session = session();

    // Nothing selected yet, neither button does anything.
    session.left_button();
    assert!(session.right_button().is_none());
    assert_eq!(session.state(), SelectionState::SelectingFirst);

    let command = session.on_map_click(48.1, 9.2).expect("query issued");
    assert_eq!(session.view().loading(), Some(LoadingVariant::Short));
    assert!(!session.view().enabled(Control::LeftButton));
    assert!(!session.view().enabled(Control::RightButton));
    assert_eq!(session.view().label(Label::SelectedLatitude), "48.1");

    session.deliver(
        command.ticket,
        Ok(Reply::Nearest(NearestNeighbors {
            distance: 12.5,
            nodes: vec![FIRST],
        })),
    );

    let view = session.view();
    assert!(!session.is_loading());
    assert!(view.enabled(Control::LeftButton));
    assert!(view.enabled(Control::RightButton));
    assert_eq!(view.label(Label::NextId), "7");
    assert_eq!(view.label(Label::NextDistance), "12.5");
    assert_eq!(session.selected().map(|c| c.node), Some(FIRST));
}

#[test_log::test]
fn nearest_request_carries_clicked_coordinates() {
    let mut session = session();
    let command = session.on_map_click(48.1, 9.2).expect("query issued");

    assert_eq!(
        command.operation,
        Operation::NearestNeighbor {
            latitude: 48.1,
            longitude: 9.2
        }
    );
    assert_eq!(session.outstanding(), Some(command.ticket));
}

#[test_log::test]
fn designating_keeps_only_the_chosen_candidate() {
    let mut session = session();
    query(&mut session, &[FIRST, Node::new(8, 48.1, 9.21)]);

    // The last popup opened wins; the user re-opens the first one.
    assert_eq!(session.selected().map(|c| c.node.id), Some(8));
    let first = session
        .sync()
        .candidates()
        .find(|c| c.node.id == 7)
        .map(|c| c.marker)
        .expect("candidate shown");
    session.on_popup_open(first);
    assert_eq!(session.selected().map(|c| c.node.id), Some(7));

    session.left_button();

    assert_eq!(session.state(), SelectionState::SelectingSecond);
    assert_eq!(session.start().map(|c| c.node), Some(FIRST));
    assert!(session.destination().is_none());
    assert!(session.selected().is_none());
    assert_eq!(session.sync().candidate_overlays(), 0);
    assert_eq!(session.sync().map().live(), ENDPOINT_OVERLAYS);

    let view = session.view();
    assert_eq!(view.text(Control::LeftButton), "Back");
    assert_eq!(view.text(Control::RightButton), "Start");
    assert!(view.enabled(Control::LeftButton));
    assert!(!view.enabled(Control::RightButton));
    assert!(view.visible(Section::OtherNode));
    assert_eq!(view.label(Label::OtherTitle), "Starting point");
    assert_eq!(view.label(Label::OtherId), "7");
    assert_eq!(view.label(Label::NextId), "-");
}

#[test_log::test]
fn endpoint_popups_do_not_select() {
    let mut session = second_pick();
    let start = session.start().map(|c| c.marker).expect("start set");

    session.on_popup_open(start);

    assert!(session.selected().is_none());
    assert!(!session.view().enabled(Control::RightButton));
}

#[test_log::test]
fn confirm_requests_the_route() {
    let (session, command) = confirmed();

    assert_eq!(
        command.operation,
        Operation::OneToOne {
            start: 7,
            destination: 9
        }
    );
    assert_eq!(session.state(), SelectionState::ShowingRoute);
    assert_eq!(session.view().loading(), Some(LoadingVariant::Long));
    assert_eq!(session.destination().map(|c| c.node), Some(SECOND));
    assert_eq!(session.sync().candidate_overlays(), 0);
    assert_eq!(session.sync().map().live(), 2 * ENDPOINT_OVERLAYS);
    assert!(!session.view().enabled(Control::RightButton));
}

#[test_log::test]
fn destination_can_be_picked_first() {
    let mut session = session();
    query(&mut session, &[SECOND]);
    assert!(session.right_button().is_none());

    assert_eq!(session.view().label(Label::OtherTitle), "Destination");
    assert_eq!(session.destination().map(|c| c.node), Some(SECOND));

    query(&mut session, &[FIRST]);
    let command = session.right_button().expect("route requested");

    assert_eq!(
        command.operation,
        Operation::OneToOne {
            start: 7,
            destination: 9
        }
    );
}

#[test_log::test]
fn reselecting_the_same_node_requests_a_degenerate_route() {
    let mut session = second_pick();
    query(&mut session, &[FIRST]);

    let command = session.right_button().expect("route requested");
    assert_eq!(
        command.operation,
        Operation::OneToOne {
            start: 7,
            destination: 7
        }
    );

    session.deliver(command.ticket, Ok(Reply::Route(route(FIRST, FIRST))));
    assert!(session.back());

    // The second pick is the one reset, the first start stays drawn.
    assert_eq!(session.state(), SelectionState::SelectingSecond);
    assert!(session.start().is_some());
    assert!(session.destination().is_none());
    assert_eq!(session.sync().map().live(), ENDPOINT_OVERLAYS);
}

#[test_log::test]
fn route_is_rendered() {
    let session = showing_route();
    let view = session.view();

    assert!(!session.is_loading());
    assert!(session.sync().has_route());
    assert_eq!(view.rows.len(), 3);
    assert_eq!(view.label(Label::RouteTitle), "7 -> 9");
    assert_eq!(view.label(Label::RouteDistance), "Distance: 100");
    assert!(!view.visible(Section::SidebarSelectNode));
    assert!(view.visible(Section::SidebarShowRoute));
    assert!(!view.visible(Section::SearchContainer));
    assert!(!view.enabled(Control::RightButton));
}

#[test_log::test]
fn row_clicks_toggle() {
    let mut session = showing_route();
    let before = session.sync().map().live();

    session.on_row_click(RowId(1));
    assert_eq!(session.view().selected_rows(), 1);
    assert_eq!(session.sync().map().live(), before + 1);

    session.on_row_click(RowId(1));
    assert_eq!(session.view().selected_rows(), 0);
    assert_eq!(session.sync().map().live(), before);
}

#[test_log::test]
fn map_click_while_showing_route_only_clears_the_row() {
    let mut session = showing_route();
    let before = session.sync().map().live();

    session.on_row_click(RowId(0));
    assert!(session.on_map_click(48.0, 9.0).is_none());

    assert_eq!(session.state(), SelectionState::ShowingRoute);
    assert_eq!(session.view().selected_rows(), 0);
    assert_eq!(session.sync().map().live(), before);
    assert!(!session.is_loading());
}

#[test_log::test]
fn back_from_route_resets_the_second_endpoint() {
    let mut session = showing_route();
    session.on_row_click(RowId(2));

    assert!(session.back());

    assert_eq!(session.state(), SelectionState::SelectingSecond);
    assert_eq!(session.start().map(|c| c.node), Some(FIRST));
    assert!(session.destination().is_none());
    assert_no_candidates_or_route(&session);
    assert_eq!(session.sync().map().live(), ENDPOINT_OVERLAYS);

    let view = session.view();
    assert!(view.rows.is_empty());
    assert!(view.visible(Section::SidebarSelectNode));
    assert!(!view.visible(Section::SidebarShowRoute));
    assert!(view.visible(Section::SearchContainer));
    assert!(!view.enabled(Control::RightButton));
    assert_eq!(view.label(Label::OtherId), "7");
}

#[test_log::test]
fn no_route_returns_to_second_pick_without_a_path() {
    let (mut session, command) = confirmed();

    session.deliver(command.ticket, Ok(Reply::Route(Route::unreachable())));

    assert_eq!(session.state(), SelectionState::SelectingSecond);
    assert!(!session.is_loading());
    assert!(!session.sync().has_route());
    assert_eq!(session.sync().map().lines(), 1);
    assert!(session.destination().is_none());
    assert_eq!(session.view().notices, vec!["No route found".to_string()]);
    assert_eq!(session.view().reloads, 0);
}

#[test_log::test]
fn back_never_leaks_overlays() {
    type Setup = fn() -> TestSession;

    let with_candidates: Setup = || {
        let mut session = second_pick();
        query(&mut session, &[SECOND, Node::new(10, 48.3, 9.41)]);
        session
    };
    let with_first_candidates: Setup = || {
        let mut session = session();
        query(&mut session, &[FIRST]);
        session
    };
    let with_row: Setup = || {
        let mut session = showing_route();
        session.on_row_click(RowId(1));
        session
    };
    let from_lookup: Setup = || {
        let mut session = session();
        let command = session.search("5").expect("lookup issued");
        session.deliver(
            command.ticket,
            Ok(Reply::Lookup(NodeLookup::Found(Node::new(5, 48.0, 9.0)))),
        );
        session.designate(Endpoint::Destination);
        session
    };

    let setups: [(&str, Setup); 7] = [
        ("fresh", session),
        ("first with candidates", with_first_candidates),
        ("second pick", second_pick),
        ("second with candidates", with_candidates),
        ("showing route", showing_route),
        ("row selected", with_row),
        ("looked-up endpoint", from_lookup),
    ];

    for (name, setup) in setups {
        for presses in 1..=3 {
            let mut session = setup();
            for _ in 0..presses {
                session.back();
            }

            match session.state() {
                SelectionState::SelectingFirst => {
                    assert_eq!(session.sync().candidate_overlays(), 0, "{name} x{presses}");
                    assert_eq!(session.sync().map().live(), 0, "{name} x{presses}");
                }
                SelectionState::SelectingSecond => {
                    assert_no_candidates_or_route(&session);
                    let kept = session
                        .start()
                        .or(session.destination())
                        .expect("one endpoint kept");
                    assert!(session.sync().map().contains(kept.marker), "{name} x{presses}");
                }
                SelectionState::ShowingRoute => panic!("{name} x{presses} stayed on the route"),
            }

            if session.state() == SelectionState::SelectingFirst {
                assert!(session.start().is_none() && session.destination().is_none());
            }
            if session.state() == SelectionState::SelectingSecond {
                assert!(session.start().is_some() ^ session.destination().is_some());
            }
        }
    }
}

#[test_log::test]
fn back_releases_endpoints_without_origin() {
    let mut session = session();
    let command = session.search("(5)").expect("lookup issued");
    assert_eq!(command.operation, Operation::NodeById(5));

    session.deliver(
        command.ticket,
        Ok(Reply::Lookup(NodeLookup::Found(Node::new(5, 48.0, 9.0)))),
    );
    assert_eq!(session.view().label(Label::NextDistance), "0");

    session.left_button();
    let start = *session.start().expect("start set");
    assert!(start.origin.is_none());
    assert_eq!(session.sync().map().live(), 1);

    assert!(session.back());
    assert_eq!(session.state(), SelectionState::SelectingFirst);
    assert_eq!(session.sync().map().live(), 0);
}

#[test_log::test]
fn missing_node_changes_nothing() {
    let mut session = session();
    query(&mut session, &[FIRST]);
    let live = session.sync().map().live();

    let command = session.search("99").expect("lookup issued");
    session.deliver(command.ticket, Ok(Reply::Lookup(NodeLookup::NotFound)));

    assert_eq!(session.view().notices, vec!["Node not found".to_string()]);
    assert_eq!(session.state(), SelectionState::SelectingFirst);
    assert_eq!(session.selected().map(|c| c.node), Some(FIRST));
    assert_eq!(session.sync().map().live(), live);
    assert!(!session.is_loading());
}

#[test_log::test]
fn invalid_search_is_reported() {
    let mut session = session();

    assert!(session.search("somewhere nice").is_none());
    assert_eq!(session.view().notices, vec![SearchError::NOTICE.to_string()]);
    assert!(!session.is_loading());
}

#[test_log::test]
fn coordinate_search_behaves_like_a_click() {
    let mut session = session();
    let command = session.search("(48.1; 9.2)").expect("query issued");

    assert_eq!(
        command.operation,
        Operation::NearestNeighbor {
            latitude: 48.1,
            longitude: 9.2
        }
    );
    assert_eq!(session.view().label(Label::SelectedLongitude), "9.2");
    assert_eq!(session.sync().map().live(), 1);
}

#[test_log::test]
fn one_request_at_a_time() {
    let mut session = session();

    let command = session.on_map_click(48.1, 9.2).expect("query issued");
    assert!(session.on_map_click(48.2, 9.3).is_none());
    assert!(session.search("5").is_none());

    assert_eq!(session.outstanding(), Some(command.ticket));
}

#[test_log::test]
fn back_is_suppressed_while_loading() {
    let mut session = second_pick();
    session.on_map_click(48.3, 9.4).expect("query issued");

    assert!(!session.back());
    assert_eq!(session.state(), SelectionState::SelectingSecond);
    assert!(session.start().is_some());
}

#[test_log::test]
fn back_in_first_pick_clears_the_candidates() {
    let mut session = session();
    query(&mut session, &[FIRST, Node::new(8, 48.1, 9.21)]);
    assert_eq!(session.sync().map().live(), 5);

    assert!(!session.back());

    assert_eq!(session.state(), SelectionState::SelectingFirst);
    assert_eq!(session.sync().candidate_overlays(), 0);
    assert_eq!(session.sync().map().live(), 0);
    assert!(session.selected().is_none());
    assert!(!session.view().enabled(Control::LeftButton));
    assert!(!session.view().enabled(Control::RightButton));
    assert_eq!(session.view().label(Label::NextId), "-");
}

#[test_log::test]
fn lookup_disables_confirm_controls_until_answered() {
    let mut session = session();
    query(&mut session, &[FIRST]);
    assert!(session.view().enabled(Control::LeftButton));

    let command = session.search("5").expect("lookup issued");

    let view = session.view();
    assert_eq!(view.loading(), Some(LoadingVariant::Short));
    assert!(!view.enabled(Control::LeftButton));
    assert!(!view.enabled(Control::RightButton));
    assert!(view.enabled(Control::SearchButton));

    session.deliver(command.ticket, Ok(Reply::Lookup(NodeLookup::NotFound)));

    // The earlier candidate is still selected, so it can still be designated.
    let view = session.view();
    assert!(view.loading().is_none());
    assert!(view.enabled(Control::LeftButton));
    assert!(view.enabled(Control::RightButton));
}

#[test_log::test]
fn route_request_blocks_every_control() {
    let (mut session, command) = confirmed();

    let view = session.view();
    assert_eq!(view.loading(), Some(LoadingVariant::Long));
    assert!(!view.enabled(Control::LeftButton));
    assert!(!view.enabled(Control::RightButton));
    assert!(!view.enabled(Control::SearchButton));

    session.deliver(command.ticket, Ok(Reply::Route(route(FIRST, SECOND))));

    let view = session.view();
    assert!(view.enabled(Control::LeftButton));
    assert!(!view.enabled(Control::RightButton));
    assert!(view.enabled(Control::SearchButton));
}

#[test_log::test]
fn failure_resets_everything() {
    let (mut session, command) = confirmed();

    session.deliver(
        command.ticket,
        Err(ProtocolError::Timeout(Duration::from_secs(30))),
    );

    assert_eq!(session.state(), SelectionState::SelectingFirst);
    assert!(session.start().is_none() && session.destination().is_none());
    assert!(!session.is_loading());
    assert_eq!(session.sync().map().live(), 0);
    assert_eq!(session.view().reloads, 1);
    assert_eq!(
        session.view().notices,
        vec!["A timeout occurred... Please try again".to_string()]
    );
    assert_eq!(session.view().text(Control::LeftButton), "From");
}

#[test_log::test]
fn parse_failure_is_fatal() {
    let mut session = session();
    let command = session.on_map_click(48.1, 9.2).expect("query issued");

    session.deliver(
        command.ticket,
        Err(ProtocolError::Parse(ParseError::MissingRecords)),
    );

    assert_eq!(session.view().reloads, 1);
    assert_eq!(session.sync().map().live(), 0);
}

#[test_log::test]
fn late_replies_are_discarded() {
    let mut session = session();
    let command = session.on_map_click(48.1, 9.2).expect("query issued");

    session.reset();
    session.deliver(
        command.ticket,
        Ok(Reply::Nearest(NearestNeighbors {
            distance: 12.5,
            nodes: vec![FIRST],
        })),
    );

    assert_eq!(session.sync().map().live(), 0);
    assert!(session.selected().is_none());

    // A ticket is only ever answered once.
    query(&mut session, &[FIRST]);
    let live = session.sync().map().live();
    session.deliver(
        command.ticket,
        Ok(Reply::Nearest(NearestNeighbors {
            distance: 1.0,
            nodes: vec![SECOND],
        })),
    );
    assert_eq!(session.sync().map().live(), live);
}

#[test_log::test]
fn mismatched_reply_is_fatal() {
    let mut session = session();
    let command = session.on_map_click(48.1, 9.2).expect("query issued");

    session.deliver(command.ticket, Ok(Reply::Lookup(NodeLookup::NotFound)));

    assert_eq!(session.view().reloads, 1);
    assert_eq!(session.state(), SelectionState::SelectingFirst);
}
