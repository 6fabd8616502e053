//! tp-panel: Track panel mouse interaction
//!
//! Hit-test primitives for each affordance of a track row (envelope,
//! time-shift grips, samples, cut lines, buttons), the arbitrator that
//! picks one of them for the current tool, and the gesture handles they
//! produce.

mod button;
mod context;
mod cutline;
mod envelope_handle;
mod handle;
mod preview;
mod refresh;
mod sample;
mod time_shift;

pub use button::*;
pub use context::*;
pub use cutline::*;
pub use envelope_handle::*;
pub use handle::*;
pub use hit_test::*;
pub use preview::*;
pub use refresh::*;
pub use sample::*;
pub use time_shift::*;
