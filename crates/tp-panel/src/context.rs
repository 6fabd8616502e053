//! What handles need from the document

use tp_core::{TrackId, ViewInfo};
use tp_state::{PanelPreferences, Project, TrackRef};

/// Document services used by hit tests and gestures
pub trait PanelContext {
    /// Playback or recording in progress; edits must not start or continue
    fn is_audio_active(&self) -> bool;

    fn view_info(&self) -> &ViewInfo;

    fn preferences(&self) -> &PanelPreferences;

    /// Record the current document content as an undo step
    fn push_state(&mut self, description: &str, category: &str);

    /// Throw away changes made since the last recorded step
    fn rollback_state(&mut self);

    /// Other channel of a stereo pair
    fn linked_partner(&self, track: TrackId) -> Option<TrackRef>;

    /// dB range for time tracks in log view
    fn time_track_db_range(&self) -> f64;
}

impl PanelContext for Project {
    fn is_audio_active(&self) -> bool {
        Project::is_audio_active(self)
    }

    fn view_info(&self) -> &ViewInfo {
        self.view()
    }

    fn preferences(&self) -> &PanelPreferences {
        Project::preferences(self)
    }

    fn push_state(&mut self, description: &str, category: &str) {
        Project::push_state(self, description, category);
    }

    fn rollback_state(&mut self) {
        Project::rollback_state(self);
    }

    fn linked_partner(&self, track: TrackId) -> Option<TrackRef> {
        self.tracks().partner_of(track)
    }

    fn time_track_db_range(&self) -> f64 {
        self.view().db_range
    }
}
