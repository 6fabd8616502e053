//! Amplitude <-> pixel mapping
//!
//! The same transform is used to draw waveforms and envelopes, to hit-test
//! them and to turn a dragged pixel back into an envelope value, so all of
//! those must go through [`AmplitudeScale`].

use serde::{Deserialize, Serialize};

use crate::{DisplayBounds, WaveformSettings};

/// Smallest magnitude converted to dB; quieter values clamp here
pub const MIN_LINEAR: f64 = 1.0e-7;

#[inline]
pub fn linear_to_db(value: f64) -> f64 {
    20.0 * value.log10()
}

#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// Snapshot of everything that decides where an amplitude is drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeScale {
    /// Amplitude at the bottom row
    pub lower: f64,
    /// Amplitude at the top row
    pub upper: f64,
    /// Logarithmic (dB) vertical scale
    pub db: bool,
    /// dB between full scale and silence; only read when `db` is set
    pub db_range: f64,
}

impl Default for AmplitudeScale {
    fn default() -> Self {
        Self::linear(-1.0, 1.0)
    }
}

impl AmplitudeScale {
    pub fn linear(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            db: false,
            db_range: 60.0,
        }
    }

    pub fn logarithmic(lower: f64, upper: f64, db_range: f64) -> Self {
        Self {
            lower,
            upper,
            db: true,
            db_range,
        }
    }

    /// Scale of a wave track from its bounds and waveform settings
    pub fn from_track(bounds: DisplayBounds, settings: &WaveformSettings) -> Self {
        Self {
            lower: bounds.lower(),
            upper: bounds.upper(),
            db: !settings.is_linear(),
            db_range: settings.db_range,
        }
    }

    /// Row offset (0 = top) at which `value` is drawn in a row `height` tall.
    ///
    /// `outer` selects the outer edge of the waveform band rather than the
    /// half-height inner contour; `clip` pins values outside the bounds to
    /// the first/last row.
    pub fn wave_y_pos(&self, value: f64, height: i32, outer: bool, clip: bool) -> i32 {
        let mut value = value;
        if self.db {
            if height == 0 {
                return 0;
            }
            if value != 0.0 {
                let sign = if value >= 0.0 { 1.0 } else { -1.0 };
                let mut v = (linear_to_db(value.abs().max(MIN_LINEAR)) + self.db_range)
                    / self.db_range;
                if !outer {
                    v -= 0.5;
                }
                if v < 0.0 {
                    v = 0.0;
                }
                value = v * sign;
            }
        } else if !outer {
            if value >= 0.0 {
                value -= 0.5;
            } else {
                value += 0.5;
            }
        }

        if clip {
            if value < self.lower {
                value = self.lower;
            }
            if value > self.upper {
                value = self.upper;
            }
        }

        let frac = (self.upper - value) / (self.upper - self.lower);
        (frac * f64::from(height - 1) + 0.5) as i32
    }

    /// Amplitude shown at row offset `y`; inverse of [`Self::wave_y_pos`]
    /// up to pixel rounding.
    pub fn value_of_pixel(&self, y: i32, height: i32, offset: bool) -> f64 {
        if height <= 1 {
            log::debug!("value_of_pixel on a {}px row", height);
            return self.upper;
        }
        let mut v = self.upper - (f64::from(y) / f64::from(height - 1)) * (self.upper - self.lower);
        if offset {
            if v > 0.0 {
                v += 0.5;
            } else {
                v -= 0.5;
            }
        }
        if self.db { self.from_db(v) } else { v }
    }

    /// Undo the dB normalisation of [`Self::wave_y_pos`]
    pub fn from_db(&self, value: f64) -> f64 {
        if value == 0.0 {
            return 0.0;
        }
        let sign = if value >= 0.0 { 1.0 } else { -1.0 };
        db_to_linear(value.abs() * self.db_range - self.db_range) * sign
    }

    /// Pixels between neighbouring gain contours in a row `height` tall
    #[inline]
    pub fn contour_spacing(&self, height: i32) -> i32 {
        (f64::from(height) / (2.0 * (self.upper - self.lower))) as i32
    }
}
