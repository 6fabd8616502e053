//! Editing Tools
//!
//! The tool selected in the tools toolbar decides what a click on a track
//! means:
//! - Selection: select a time range
//! - Envelope: edit the amplitude envelope anywhere on the track
//! - Draw: edit individual samples
//! - Zoom: zoom in/out around the click
//! - TimeShift: move clips in time
//! - Multi: pick the affordance from the pointer position

use serde::{Deserialize, Serialize};

/// Currently selected tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Time range selection
    #[default]
    Selection,

    /// Amplitude envelope editing
    Envelope,

    /// Sample drawing (only at sample resolution)
    Draw,

    /// Zoom in/out
    Zoom,

    /// Clip time shifting
    TimeShift,

    /// Several tools at once, chosen by where the pointer is
    Multi,
}

impl ToolMode {
    /// All tools in toolbar order
    pub const ALL: [ToolMode; 6] = [
        Self::Selection,
        Self::Envelope,
        Self::Draw,
        Self::Zoom,
        Self::TimeShift,
        Self::Multi,
    ];

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Selection => "Selection Tool",
            Self::Envelope => "Envelope Tool",
            Self::Draw => "Draw Tool",
            Self::Zoom => "Zoom Tool",
            Self::TimeShift => "Time Shift Tool",
            Self::Multi => "Multi-Tool",
        }
    }

    /// Status bar message shown while hovering with this tool
    pub fn message(&self) -> &'static str {
        match self {
            Self::Selection => "Click and drag to select audio",
            Self::Envelope => "Click and drag to edit the amplitude envelope",
            Self::Draw => "Click and drag to edit the samples",
            Self::Zoom => "Click to Zoom In, Shift-Click to Zoom Out",
            Self::TimeShift => "Click and drag to move a clip in time",
            Self::Multi => "Multi-Tool Mode",
        }
    }

    /// Get keyboard shortcut
    pub fn shortcut(&self) -> &'static str {
        match self {
            Self::Selection => "F1",
            Self::Envelope => "F2",
            Self::Draw => "F3",
            Self::Zoom => "F4",
            Self::TimeShift => "F5",
            Self::Multi => "F6",
        }
    }

    #[inline]
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi)
    }
}
