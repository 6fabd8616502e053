//! Project: the document behind the track panel
//!
//! Owns the tracks, the horizontal view, the current tool and the undo
//! history. History entries are whole-project snapshots; rolling back writes
//! a snapshot into the existing tracks, clips and envelopes so `Weak`
//! references held by UI handles stay valid.

use tp_core::{ToolMode, TrackId, ViewInfo};

use crate::{PanelPreferences, Track, TrackList, TrackRef, TrackState, UndoHistory};

/// Editable content of every track at one point in history
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectSnapshot {
    pub tracks: Vec<(TrackId, TrackState)>,
}

impl ProjectSnapshot {
    pub fn track(&self, id: TrackId) -> Option<&TrackState> {
        self.tracks.iter().find(|(t, _)| *t == id).map(|(_, s)| s)
    }
}

#[derive(Debug)]
pub struct Project {
    tracks: TrackList,
    view: ViewInfo,
    audio_active: bool,
    tool: ToolMode,
    preferences: PanelPreferences,
    history: UndoHistory<ProjectSnapshot>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new(PanelPreferences::default())
    }
}

impl Project {
    pub fn new(preferences: PanelPreferences) -> Self {
        let view = ViewInfo {
            db_range: preferences.display.default_db_range,
            ..ViewInfo::default()
        };
        let history = UndoHistory::new(ProjectSnapshot::default(), "Created new project")
            .with_max_entries(preferences.history.max_entries);
        Self {
            tracks: TrackList::new(),
            view,
            audio_active: false,
            tool: ToolMode::default(),
            preferences,
            history,
        }
    }

    // ─── Tracks ────────────────────────────────────────────────────────────

    pub fn tracks(&self) -> &TrackList {
        &self.tracks
    }

    pub fn next_track_id(&mut self) -> TrackId {
        self.tracks.next_id()
    }

    /// Add a track; its content becomes part of the current history state
    pub fn add_track(&mut self, track: Track) -> TrackRef {
        let shared = self.tracks.add(track);
        self.history.modify_state(self.capture());
        shared
    }

    pub fn remove_track(&mut self, id: TrackId) -> Option<TrackRef> {
        let removed = self.tracks.remove(id);
        if removed.is_some() {
            self.history.modify_state(self.capture());
        }
        removed
    }

    pub fn find_track(&self, id: TrackId) -> Option<TrackRef> {
        self.tracks.find(id)
    }

    pub fn link_stereo(&mut self, left: TrackId, right: TrackId) -> bool {
        self.tracks.link_stereo(left, right)
    }

    // ─── View / transport / tool ───────────────────────────────────────────

    pub fn view(&self) -> &ViewInfo {
        &self.view
    }

    pub fn set_view(&mut self, view: ViewInfo) {
        self.view = view;
    }

    /// Playback or recording in progress
    pub fn is_audio_active(&self) -> bool {
        self.audio_active
    }

    pub fn set_audio_active(&mut self, active: bool) {
        if self.audio_active != active {
            log::debug!("Audio {}", if active { "started" } else { "stopped" });
        }
        self.audio_active = active;
    }

    pub fn tool(&self) -> ToolMode {
        self.tool
    }

    pub fn set_tool(&mut self, tool: ToolMode) {
        self.tool = tool;
    }

    pub fn preferences(&self) -> &PanelPreferences {
        &self.preferences
    }

    pub fn set_preferences(&mut self, preferences: PanelPreferences) {
        self.history.set_max_entries(preferences.history.max_entries);
        self.preferences = preferences;
    }

    // ─── History ───────────────────────────────────────────────────────────

    pub fn history(&self) -> &UndoHistory<ProjectSnapshot> {
        &self.history
    }

    fn capture(&self) -> ProjectSnapshot {
        ProjectSnapshot {
            tracks: self
                .tracks
                .iter()
                .map(|t| {
                    let t = t.read();
                    (t.id(), t.state())
                })
                .collect(),
        }
    }

    fn apply(&self, snapshot: &ProjectSnapshot) {
        for (id, state) in &snapshot.tracks {
            match self.tracks.find(*id) {
                Some(track) => track.write().restore(state),
                None => log::warn!("Snapshot refers to missing track {:?}", id),
            }
        }
    }

    /// Record the current content as a new undo step
    pub fn push_state(&mut self, description: &str, category: &str) {
        let snapshot = self.capture();
        self.history.push_state(snapshot, description, category);
    }

    /// Discard changes made since the last recorded step
    pub fn rollback_state(&mut self) {
        log::debug!("Rolling back to \"{}\"", self.history.current().description);
        let snapshot = self.history.current_state().clone();
        self.apply(&snapshot);
    }

    pub fn undo(&mut self) -> bool {
        match self.history.undo().cloned() {
            Some(snapshot) => {
                self.apply(&snapshot);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.history.redo().cloned() {
            Some(snapshot) => {
                self.apply(&snapshot);
                true
            }
            None => false,
        }
    }
}
