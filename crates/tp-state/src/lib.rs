//! tp-state: Document state behind the track panel
//!
//! Envelopes and their per-gesture editor, clips and tracks, snapshot
//! undo history, preferences and the `Project` that ties them together.

mod clip;
mod envelope;
mod envelope_editor;
mod history;
mod preferences;
mod project;
mod track;

pub use clip::*;
pub use envelope::*;
pub use envelope_editor::*;
pub use history::*;
pub use preferences::*;
pub use project::*;
pub use track::*;
