//! Capability sets the core consumes from its host: the mapping widget and
//! the named controls of the page around it.
//!
//! Nothing in the core touches a concrete widget; the [`headless`] module
//! provides recording implementations used by the command-line host and the
//! test-suite.

pub mod headless;
#[doc(hidden)]
pub mod map;
#[doc(hidden)]
pub mod surface;

#[doc(inline)]
pub use map::{LineStyle, MapWidget, MarkerOptions, OverlayId};
#[doc(inline)]
pub use surface::{Control, Label, LoadingVariant, RowId, Section, ViewSurface};
