//! Tracks and the track list
//!
//! Tracks are shared as `Arc<RwLock<Track>>`; UI handles keep only a `Weak`
//! reference so a track deleted mid-gesture simply stops responding.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;
use tp_core::{DisplayBounds, TrackId, TrackKind, WaveDisplay, WaveformSettings};

use crate::{ClipState, Envelope, Interpolation, WaveClip};

pub type TrackRef = Arc<RwLock<Track>>;
pub type WeakTrackRef = Weak<RwLock<Track>>;
pub type EnvelopeRef = Arc<RwLock<Envelope>>;

// ═══════════════════════════════════════════════════════════════════════════════
// WAVE TRACK
// ═══════════════════════════════════════════════════════════════════════════════

/// Audio track made of clips
#[derive(Debug, Clone)]
pub struct WaveTrack {
    pub id: TrackId,
    pub name: String,
    pub clips: Vec<WaveClip>,
    pub display: WaveDisplay,
    pub bounds: DisplayBounds,
    pub settings: WaveformSettings,
    pub rate: f64,
    /// Other channel of a stereo pair
    pub link: Option<TrackId>,
    pub muted: bool,
    pub solo: bool,
}

impl WaveTrack {
    pub fn new(id: TrackId, name: impl Into<String>, rate: f64) -> Self {
        Self {
            id,
            name: name.into(),
            clips: Vec::new(),
            display: WaveDisplay::Waveform,
            bounds: DisplayBounds::default(),
            settings: WaveformSettings::default(),
            rate,
            link: None,
            muted: false,
            solo: false,
        }
    }

    pub fn with_clip(mut self, clip: WaveClip) -> Self {
        self.clips.push(clip);
        self
    }

    pub fn with_display(mut self, display: WaveDisplay) -> Self {
        self.display = display;
        self
    }

    pub fn with_settings(mut self, settings: WaveformSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_bounds(mut self, bounds: DisplayBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn clip_index_at(&self, time: f64) -> Option<usize> {
        self.clips.iter().position(|c| c.contains_time(time))
    }

    pub fn clip_at(&self, time: f64) -> Option<&WaveClip> {
        self.clip_index_at(time).map(|i| &self.clips[i])
    }

    pub fn clip_at_mut(&mut self, time: f64) -> Option<&mut WaveClip> {
        self.clips.iter_mut().find(|c| c.contains_time(time))
    }

    /// Envelope of the clip under a time
    pub fn envelope_at(&self, time: f64) -> Option<EnvelopeRef> {
        self.clip_at(time).map(|c| Arc::clone(c.envelope()))
    }

    /// Sample under a time, if a clip covers it
    pub fn sample_at(&self, time: f64) -> Option<f32> {
        self.clip_at(time).and_then(|c| c.sample_at(time))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIME TRACK
// ═══════════════════════════════════════════════════════════════════════════════

/// Playback speed track
#[derive(Debug, Clone)]
pub struct TimeTrack {
    pub id: TrackId,
    pub name: String,
    pub envelope: Option<EnvelopeRef>,
    pub display_log: bool,
    pub range_lower: f64,
    pub range_upper: f64,
}

impl TimeTrack {
    pub fn new(id: TrackId) -> Self {
        let envelope = Envelope::new(0.1, 10.0, 1.0).with_interpolation(Interpolation::Exponential);
        Self {
            id,
            name: "Time Track".to_string(),
            envelope: Some(Arc::new(RwLock::new(envelope))),
            display_log: false,
            range_lower: 0.9,
            range_upper: 1.1,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LABEL TRACK
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct LabelTrack {
    pub id: TrackId,
    pub name: String,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRACK
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub enum Track {
    Wave(WaveTrack),
    Time(TimeTrack),
    Label(LabelTrack),
}

impl Track {
    pub fn id(&self) -> TrackId {
        match self {
            Track::Wave(t) => t.id,
            Track::Time(t) => t.id,
            Track::Label(t) => t.id,
        }
    }

    pub fn kind(&self) -> TrackKind {
        match self {
            Track::Wave(_) => TrackKind::Wave,
            Track::Time(_) => TrackKind::Time,
            Track::Label(_) => TrackKind::Label,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Track::Wave(t) => &t.name,
            Track::Time(t) => &t.name,
            Track::Label(t) => &t.name,
        }
    }

    pub fn as_wave(&self) -> Option<&WaveTrack> {
        match self {
            Track::Wave(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_wave_mut(&mut self) -> Option<&mut WaveTrack> {
        match self {
            Track::Wave(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_time(&self) -> Option<&TimeTrack> {
        match self {
            Track::Time(t) => Some(t),
            _ => None,
        }
    }

    pub fn link(&self) -> Option<TrackId> {
        self.as_wave().and_then(|w| w.link)
    }
}

/// Plain-data copy of one track's editable content
#[derive(Debug, Clone, PartialEq)]
pub enum TrackState {
    Wave {
        clips: Vec<ClipState>,
        muted: bool,
        solo: bool,
    },
    Time {
        envelope: Option<Envelope>,
    },
    Label,
}

impl Track {
    pub fn state(&self) -> TrackState {
        match self {
            Track::Wave(t) => TrackState::Wave {
                clips: t.clips.iter().map(WaveClip::state).collect(),
                muted: t.muted,
                solo: t.solo,
            },
            Track::Time(t) => TrackState::Time {
                envelope: t.envelope.as_ref().map(|e| e.read().snapshot()),
            },
            Track::Label(_) => TrackState::Label,
        }
    }

    /// Write a saved state back in place
    pub fn restore(&mut self, state: &TrackState) {
        match (self, state) {
            (Track::Wave(t), TrackState::Wave { clips, muted, solo }) => {
                if t.clips.len() != clips.len() {
                    log::warn!(
                        "Track {:?}: clip count changed ({} -> {}), rebuilding clips",
                        t.id,
                        t.clips.len(),
                        clips.len()
                    );
                    t.clips = clips
                        .iter()
                        .map(|s| {
                            let mut clip = WaveClip::new(s.offset, t.rate, Vec::new());
                            clip.restore(s);
                            clip
                        })
                        .collect();
                } else {
                    for (clip, saved) in t.clips.iter_mut().zip(clips) {
                        clip.restore(saved);
                    }
                }
                t.muted = *muted;
                t.solo = *solo;
            }
            (Track::Time(t), TrackState::Time { envelope }) => {
                if let (Some(shared), Some(saved)) = (&t.envelope, envelope) {
                    *shared.write() = saved.clone();
                }
            }
            (Track::Label(_), TrackState::Label) => {}
            (track, _) => {
                log::warn!("Track {:?}: saved state kind does not match", track.id());
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TRACK LIST
// ═══════════════════════════════════════════════════════════════════════════════

/// Ordered tracks of a project
#[derive(Debug, Default)]
pub struct TrackList {
    tracks: Vec<TrackRef>,
    next_id: u64,
}

impl TrackList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a track about to be added
    pub fn next_id(&mut self) -> TrackId {
        self.next_id += 1;
        TrackId(self.next_id)
    }

    pub fn add(&mut self, track: Track) -> TrackRef {
        self.next_id = self.next_id.max(track.id().0);
        let shared = Arc::new(RwLock::new(track));
        self.tracks.push(Arc::clone(&shared));
        shared
    }

    pub fn remove(&mut self, id: TrackId) -> Option<TrackRef> {
        let idx = self.tracks.iter().position(|t| t.read().id() == id)?;
        Some(self.tracks.remove(idx))
    }

    pub fn find(&self, id: TrackId) -> Option<TrackRef> {
        self.tracks.iter().find(|t| t.read().id() == id).cloned()
    }

    /// Other channel of a linked stereo pair
    pub fn partner_of(&self, id: TrackId) -> Option<TrackRef> {
        let link = self.find(id)?.read().link()?;
        self.find(link)
    }

    /// Link two wave tracks as left/right channels
    pub fn link_stereo(&self, left: TrackId, right: TrackId) -> bool {
        // Both channels share one lock when the ids match
        if left == right {
            return false;
        }
        let (Some(l), Some(r)) = (self.find(left), self.find(right)) else {
            return false;
        };
        let linked = {
            let mut l = l.write();
            let mut r = r.write();
            match (l.as_wave_mut(), r.as_wave_mut()) {
                (Some(lw), Some(rw)) => {
                    lw.link = Some(right);
                    rw.link = Some(left);
                    true
                }
                _ => false,
            }
        };
        linked
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackRef> {
        self.tracks.iter()
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(list: &mut TrackList, name: &str) -> TrackId {
        let id = list.next_id();
        list.add(Track::Wave(
            WaveTrack::new(id, name, 44100.0).with_clip(WaveClip::silence(0.0, 44100.0, 2.0)),
        ));
        id
    }

    #[test]
    fn test_envelope_lookup() {
        let track = WaveTrack::new(TrackId(1), "a", 10.0)
            .with_clip(WaveClip::silence(0.0, 10.0, 1.0))
            .with_clip(WaveClip::silence(2.0, 10.0, 1.0));
        assert!(track.envelope_at(0.5).is_some());
        assert!(track.envelope_at(1.5).is_none());
        assert_eq!(track.clip_index_at(2.5), Some(1));
    }

    #[test]
    fn test_stereo_link() {
        let mut list = TrackList::new();
        let left = wave(&mut list, "L");
        let right = wave(&mut list, "R");
        assert!(list.partner_of(left).is_none());

        assert!(list.link_stereo(left, right));
        let partner = list.partner_of(left).unwrap();
        assert_eq!(partner.read().id(), right);
        assert_eq!(list.partner_of(right).unwrap().read().id(), left);
    }

    #[test]
    fn test_link_rejects_non_wave() {
        let mut list = TrackList::new();
        let left = wave(&mut list, "L");
        let id = list.next_id();
        list.add(Track::Time(TimeTrack::new(id)));
        assert!(!list.link_stereo(left, id));
    }

    #[test]
    fn test_link_rejects_same_track() {
        let mut list = TrackList::new();
        let id = wave(&mut list, "L");
        assert!(!list.link_stereo(id, id));
        assert_eq!(list.find(id).and_then(|t| t.read().link()), None);
    }

    #[test]
    fn test_remove_drops_weak_refs() {
        let mut list = TrackList::new();
        let id = wave(&mut list, "L");
        let weak = Arc::downgrade(&list.find(id).unwrap());
        assert!(weak.upgrade().is_some());
        list.remove(id);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_state_roundtrip() {
        let mut list = TrackList::new();
        let id = wave(&mut list, "L");
        let track = list.find(id).unwrap();
        let saved = track.read().state();

        if let Some(w) = track.write().as_wave_mut() {
            w.muted = true;
            w.clips[0].shift(1.0);
        }
        track.write().restore(&saved);
        assert_eq!(track.read().state(), saved);
    }
}
