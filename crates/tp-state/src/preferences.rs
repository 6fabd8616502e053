//! Track panel preferences
//!
//! Persistent settings for the interaction layer:
//! - Hit-test tolerances (pixels)
//! - Display defaults
//! - Undo history depth

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tp_core::{PanelError, PanelResult};

/// Panel preferences
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelPreferences {
    pub hit: HitTolerances,
    pub display: DisplayPreferences,
    pub history: HistoryPreferences,
}

/// Pixel tolerances for the hit-test primitives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTolerances {
    /// Offset between the drawn envelope line and its true row
    pub envelope_misalign: i32,
    /// Max distance from an envelope contour that still hits
    pub envelope_tolerance: i32,
    /// Number of gain contours above the envelope
    pub max_contours: i32,
    /// Width of the time-shift grip at each edge of the track
    pub grip_width: i32,
    /// Cursor hotspot offset from the pointer tip
    pub grip_hotspot_offset: i32,
    pub sample_tolerance: i32,
    pub cutline_tolerance: i32,
    /// Zoom (pixels per sample) at which single samples become editable
    pub sample_points_min_pixels: f64,
}

impl Default for HitTolerances {
    fn default() -> Self {
        Self {
            envelope_misalign: 2,
            envelope_tolerance: 5,
            max_contours: 2,
            grip_width: 14,
            grip_hotspot_offset: 5,
            sample_tolerance: 10,
            cutline_tolerance: 5,
            sample_points_min_pixels: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayPreferences {
    /// dB shown between full scale and the center line
    pub default_db_range: f64,
    /// Default track row height (pixels)
    pub track_height: u32,
}

impl Default for DisplayPreferences {
    fn default() -> Self {
        Self {
            default_db_range: 60.0,
            track_height: 150,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryPreferences {
    pub max_entries: usize,
}

impl Default for HistoryPreferences {
    fn default() -> Self {
        Self {
            max_entries: crate::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl PanelPreferences {
    /// Load preferences from standard location
    pub fn load() -> Self {
        Self::load_from(Self::default_path())
    }

    /// Load preferences, falling back to defaults on any failure
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        match Self::try_load_from(&path) {
            Ok(prefs) => {
                log::info!("Loaded panel preferences from {}", path.as_ref().display());
                prefs
            }
            Err(e) => {
                log::debug!("Using default panel preferences: {}", e);
                Self::default()
            }
        }
    }

    pub fn try_load_from<P: AsRef<Path>>(path: P) -> PanelResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PanelError::Serialization(e.to_string()))
    }

    pub fn save(&self) -> PanelResult<()> {
        self.save_to(Self::default_path())
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> PanelResult<()> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)
            .map_err(|e| PanelError::Serialization(e.to_string()))?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Get default preferences file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("trackpanel"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("panel.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = PanelPreferences::default();
        assert_eq!(prefs.hit.envelope_tolerance, 5);
        assert_eq!(prefs.hit.grip_width, 14);
        assert_eq!(prefs.display.default_db_range, 60.0);
        assert_eq!(prefs.history.max_entries, 100);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("panel.json");

        let mut prefs = PanelPreferences::default();
        prefs.hit.sample_tolerance = 6;
        prefs.display.track_height = 90;
        prefs.save_to(&path).unwrap();

        let loaded = PanelPreferences::try_load_from(&path).unwrap();
        assert_eq!(loaded, prefs);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.json");
        fs::write(&path, r#"{ "hit": { "cutline_tolerance": 8 } }"#).unwrap();

        let loaded = PanelPreferences::load_from(&path);
        assert_eq!(loaded.hit.cutline_tolerance, 8);
        assert_eq!(loaded.hit.envelope_misalign, 2);
        assert_eq!(loaded.history.max_entries, 100);
    }

    #[test]
    fn test_bad_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("panel.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            PanelPreferences::try_load_from(&path),
            Err(PanelError::Serialization(_))
        ));
        assert_eq!(PanelPreferences::load_from(&path), PanelPreferences::default());
        assert_eq!(
            PanelPreferences::load_from(dir.path().join("missing.json")),
            PanelPreferences::default()
        );
    }
}
