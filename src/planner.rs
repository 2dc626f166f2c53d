//! Async driver connecting a [`Session`] to a [`Backend`].
//!
//! Requests are awaited one at a time on the caller's task; the loading gate
//! inside the session guarantees at most one is outstanding.

use log::debug;

use crate::protocol::Backend;
use crate::session::{Command, Session};
use crate::view::{MapWidget, OverlayId, RowId, ViewSurface};

pub struct Planner<B, M, V> {
    backend: B,
    session: Session<M, V>,
}

impl<B, M, V> Planner<B, M, V>
where
    B: Backend,
    M: MapWidget,
    V: ViewSurface,
{
    pub fn new(backend: B, session: Session<M, V>) -> Self {
        Planner { backend, session }
    }

    pub fn session(&self) -> &Session<M, V> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<M, V> {
        &mut self.session
    }

    /// Executes a command, if any, and delivers its outcome.
    pub async fn dispatch(&mut self, command: Option<Command>) {
        let Some(Command { ticket, operation }) = command else {
            return;
        };

        let reply = self.backend.call(&operation).await;
        debug!("{ticket:?} answered, ok={}", reply.is_ok());

        self.session.deliver(ticket, reply);
    }

    pub async fn click(&mut self, latitude: f64, longitude: f64) {
        let command = self.session.on_map_click(latitude, longitude);
        self.dispatch(command).await;
    }

    pub async fn search(&mut self, input: &str) {
        let command = self.session.search(input);
        self.dispatch(command).await;
    }

    pub fn popup(&mut self, marker: OverlayId) {
        self.session.on_popup_open(marker);
    }

    pub fn left(&mut self) {
        self.session.left_button();
    }

    pub async fn right(&mut self) {
        let command = self.session.right_button();
        self.dispatch(command).await;
    }

    pub fn row(&mut self, row: RowId) {
        self.session.on_row_click(row);
    }

    pub fn back(&mut self) -> bool {
        self.session.back()
    }
}
