//! Track identity and display settings
//!
//! The panel only needs to know what kind of track a row shows and how its
//! amplitude axis is laid out; sample and envelope storage lives in tp-state.

use serde::{Deserialize, Serialize};

use crate::{PanelError, PanelResult};

/// Unique track identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl TrackId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Track kind, as seen by handles deciding whether they apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    /// Audio samples in clips, one envelope per clip
    Wave,
    /// Playback speed curve with a single envelope
    Time,
    /// Text labels
    Label,
}

/// How a wave track is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WaveDisplay {
    /// Amplitude over time; envelopes, cut lines and sample dots are drawn
    #[default]
    Waveform,
    /// Spectrogram; none of the waveform affordances are drawn
    Spectrum,
}

/// Vertical scale of the waveform view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WaveformScale {
    #[default]
    Linear,
    Logarithmic,
}

/// Per-track waveform display settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaveformSettings {
    pub scale: WaveformScale,
    /// Decibels shown between full scale and the center line (log scale only)
    pub db_range: f64,
}

impl Default for WaveformSettings {
    fn default() -> Self {
        Self {
            scale: WaveformScale::Linear,
            db_range: 60.0,
        }
    }
}

impl WaveformSettings {
    pub fn linear() -> Self {
        Self::default()
    }

    pub fn logarithmic(db_range: f64) -> PanelResult<Self> {
        if !(db_range > 0.0) {
            return Err(PanelError::InvalidDbRange(db_range));
        }
        Ok(Self {
            scale: WaveformScale::Logarithmic,
            db_range,
        })
    }

    #[inline]
    pub fn is_linear(&self) -> bool {
        self.scale == WaveformScale::Linear
    }
}

/// Amplitude range mapped onto the row height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct DisplayBounds {
    lower: f64,
    upper: f64,
}

impl Default for DisplayBounds {
    fn default() -> Self {
        Self {
            lower: -1.0,
            upper: 1.0,
        }
    }
}

impl DisplayBounds {
    /// Create bounds, rejecting empty or inverted ranges
    pub fn new(lower: f64, upper: f64) -> PanelResult<Self> {
        if !(lower < upper) {
            return Err(PanelError::InvalidBounds { lower, upper });
        }
        Ok(Self { lower, upper })
    }

    #[inline]
    pub fn lower(&self) -> f64 {
        self.lower
    }

    #[inline]
    pub fn upper(&self) -> f64 {
        self.upper
    }

    #[inline]
    pub fn span(&self) -> f64 {
        self.upper - self.lower
    }
}

impl TryFrom<(f64, f64)> for DisplayBounds {
    type Error = PanelError;

    fn try_from((lower, upper): (f64, f64)) -> PanelResult<Self> {
        Self::new(lower, upper)
    }
}

impl From<DisplayBounds> for (f64, f64) {
    fn from(bounds: DisplayBounds) -> Self {
        (bounds.lower, bounds.upper)
    }
}
