//! Horizontal view state shared by every track row

use serde::{Deserialize, Serialize};

/// Maps between timeline seconds and panel pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewInfo {
    /// Time at the left edge of the track area (seconds)
    pub h_offset: f64,
    /// Pixels per second
    pub zoom: f64,
    /// dB range used by time tracks in log view
    pub db_range: f64,
}

impl Default for ViewInfo {
    fn default() -> Self {
        Self {
            h_offset: 0.0,
            zoom: 44100.0 / 512.0,
            db_range: 60.0,
        }
    }
}

impl ViewInfo {
    pub fn new(h_offset: f64, zoom: f64) -> Self {
        Self {
            h_offset,
            zoom,
            ..Self::default()
        }
    }

    /// Time under a pixel column, `origin` being the x of the track area
    #[inline]
    pub fn position_to_time(&self, position: i32, origin: i32) -> f64 {
        self.h_offset + f64::from(position - origin) / self.zoom
    }

    /// Pixel column of a time, relative to the x of the track area
    #[inline]
    pub fn time_to_position(&self, time: f64, origin: i32) -> i32 {
        let pos = ((time - self.h_offset) * self.zoom).floor();
        // Saturate far off-screen times instead of wrapping
        pos.clamp(f64::from(i32::MIN / 2), f64::from(i32::MAX / 2)) as i32 + origin
    }

    /// Seconds covered by one pixel
    #[inline]
    pub fn seconds_per_pixel(&self) -> f64 {
        1.0 / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_position_time_roundtrip() {
        let view = ViewInfo::new(2.0, 100.0);
        assert_relative_eq!(view.position_to_time(150, 50), 3.0);
        assert_eq!(view.time_to_position(3.0, 50), 150);
        assert_eq!(view.time_to_position(2.0, 0), 0);
    }

    #[test]
    fn test_time_before_offset_is_left_of_origin() {
        let view = ViewInfo::new(1.0, 10.0);
        assert_eq!(view.time_to_position(0.5, 0), -5);
    }
}
