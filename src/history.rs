//! Traps browser back-navigation and turns it into [`Session::back`].

use log::debug;

use crate::session::Session;
use crate::view::{MapWidget, ViewSurface};

/// The slice of the browser history API the guard needs.
pub trait History {
    fn supports_push_state(&self) -> bool;

    /// Pushes a no-op entry onto the history stack.
    fn push_state(&mut self);

    /// Replaces the location fragment, which adds a history entry.
    fn set_fragment(&mut self, fragment: &str);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trap {
    PushState,
    /// `ignore` is set while the next fragment change is our own.
    Fragment { ignore: bool },
}

pub struct HistoryGuard<H> {
    history: H,
    trap: Trap,
    toggles: u64,
}

impl<H> HistoryGuard<H>
where
    H: History,
{
    /// Arms the trap by pushing the entry a back-navigation will pop.
    pub fn install(mut history: H) -> Self {
        let trap = if history.supports_push_state() {
            history.push_state();
            Trap::PushState
        } else {
            history.set_fragment("0");
            Trap::Fragment { ignore: true }
        };

        debug!("History guard installed ({trap:?})");
        HistoryGuard {
            history,
            trap,
            toggles: 0,
        }
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Host callback for `popstate`. Re-arms the trap and steps the session
    /// back unless a request is loading. Returns whether the session moved.
    pub fn on_pop_state<M, V>(&mut self, session: &mut Session<M, V>) -> bool
    where
        M: MapWidget,
        V: ViewSurface,
    {
        self.history.push_state();
        Self::step_back(session)
    }

    /// Host callback for `hashchange`, used when push-state is unavailable.
    /// Our own fragment writes are skipped, any other change re-arms the
    /// trap with a fresh fragment and steps the session back.
    pub fn on_fragment_change<M, V>(&mut self, session: &mut Session<M, V>) -> bool
    where
        M: MapWidget,
        V: ViewSurface,
    {
        let Trap::Fragment { ignore } = &mut self.trap else {
            return false;
        };

        if *ignore {
            *ignore = false;
            return false;
        }

        *ignore = true;
        self.toggles += 1;
        self.history.set_fragment(&self.toggles.to_string());

        Self::step_back(session)
    }

    fn step_back<M, V>(session: &mut Session<M, V>) -> bool
    where
        M: MapWidget,
        V: ViewSurface,
    {
        if session.is_loading() {
            debug!("Back navigation suppressed while loading");
            return false;
        }

        session.back()
    }
}
