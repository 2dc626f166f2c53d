#![doc = include_str!("../README.md")]

pub mod config;
pub mod history;
pub mod model;
pub mod planner;
pub mod protocol;
pub mod search;
pub mod session;
pub mod sync;
pub mod util;
pub mod view;

#[doc(inline)]
pub use config::{ClientConfig, ConfigError};
#[doc(inline)]
pub use history::{History, HistoryGuard};
#[doc(inline)]
pub use planner::Planner;
#[doc(inline)]
pub use protocol::{Backend, ProtocolClient, ProtocolError};
#[doc(inline)]
pub use search::SearchError;
#[doc(inline)]
pub use session::{SelectionState, Session};

use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    Protocol(ProtocolError),
    Config(ConfigError),
    Search(SearchError),
}

impl_err!(ProtocolError, Protocol);
impl_err!(ConfigError, Config);
impl_err!(SearchError, Search);

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Protocol(err) => write!(f, "protocol: {err}"),
            Error::Config(err) => write!(f, "config: {err}"),
            Error::Search(err) => write!(f, "search: {err}"),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
