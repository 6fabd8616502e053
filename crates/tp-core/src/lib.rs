//! tp-core: Shared types for the track panel interaction layer
//!
//! Geometry, mouse events, tool modes, track display settings and the
//! amplitude <-> pixel mapping used by both hit-testing and envelope editing.

mod error;
mod event;
mod geometry;
mod scale;
mod tool;
mod track;
mod view;

pub use error::*;
pub use event::*;
pub use geometry::*;
pub use scale::*;
pub use tool::*;
pub use track::*;
pub use view::*;
