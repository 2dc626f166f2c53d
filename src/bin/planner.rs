//! Terminal host for a planning session.
//!
//! Reads one command per line from stdin, talks to the backend named by
//! `ROUTEPLANNER_ENDPOINT` and logs every change the session makes to its
//! recording map and view.

use log::{info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};

use routeplanner::util::trace::initialize_logger;
use routeplanner::view::headless::{HeadlessHistory, HeadlessMap, HeadlessView};
use routeplanner::view::{OverlayId, RowId};
use routeplanner::{ClientConfig, HistoryGuard, Planner, ProtocolClient, SelectionState, Session};

const USAGE: &str = "commands: click <lat> <lon> | search <text> | popup <marker> | from | to | start | back | row <n> | route | state | quit";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    initialize_logger();

    let config = ClientConfig::from_env().map_err(routeplanner::Error::from)?;
    info!("Using backend {}/{}", config.endpoint, config.path);

    let session = Session::new(HeadlessMap::new(), HeadlessView::new(), &config);
    let client = ProtocolClient::new(config).map_err(routeplanner::Error::from)?;

    let mut planner = Planner::new(client, session);
    let mut guard = HistoryGuard::install(HeadlessHistory::with_push_state());

    println!("{USAGE}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => continue,
            "click" => match coordinates(rest) {
                Some((latitude, longitude)) => planner.click(latitude, longitude).await,
                None => warn!("click expects <lat> <lon>"),
            },
            "search" => planner.search(rest).await,
            "popup" => match rest.parse::<u64>() {
                Ok(marker) => planner.popup(OverlayId(marker)),
                Err(_) => warn!("popup expects a marker id"),
            },
            "from" | "to" if planner.session().state() != SelectionState::SelectingFirst => {
                warn!("{command} is only available while picking the first endpoint")
            }
            "start" if planner.session().state() != SelectionState::SelectingSecond => {
                warn!("start needs one endpoint and a selected node")
            }
            "from" => planner.left(),
            "to" | "start" => planner.right().await,
            "back" => {
                if !guard.on_pop_state(planner.session_mut()) {
                    info!("Nothing to go back to");
                }
            }
            "row" => match rest.parse::<usize>() {
                Ok(row) => planner.row(RowId(row)),
                Err(_) => warn!("row expects a row index"),
            },
            "route" => match planner.session().sync().route() {
                Some(route) => println!("{}", serde_json::to_string_pretty(route)?),
                None => info!("No route shown"),
            },
            "state" => print_state(&planner),
            "quit" | "exit" => break,
            other => warn!("Unknown command {other:?}. {USAGE}"),
        }
    }

    info!("Terminating planner.");
    Ok(())
}

fn coordinates(input: &str) -> Option<(f64, f64)> {
    let mut parts = input.split_whitespace().map(str::parse::<f64>);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(Ok(latitude)), Some(Ok(longitude)), None) => Some((latitude, longitude)),
        _ => None,
    }
}

fn print_state(planner: &Planner<ProtocolClient, HeadlessMap, HeadlessView>) {
    let session = planner.session();
    let describe = |candidate: Option<&routeplanner::sync::Candidate>| {
        candidate.map_or("-".to_string(), |c| {
            format!("{} ({}, {})", c.node.id, c.node.latitude, c.node.longitude)
        })
    };

    println!("state:       {}", session.state());
    println!("start:       {}", describe(session.start()));
    println!("destination: {}", describe(session.destination()));
    println!("selected:    {}", describe(session.selected()));

    let candidates = session
        .sync()
        .candidates()
        .map(|c| format!("{}={}", c.marker.0, c.node.id))
        .collect::<Vec<_>>();
    println!("candidates:  [{}]", candidates.join(", "));

    for row in &session.view().rows {
        let mark = if row.selected { '*' } else { ' ' };
        println!("{mark} {:>12} {:>12}", row.id, row.cumulative_distance);
    }

    println!("overlays:    {}", session.sync().map().live());
}
