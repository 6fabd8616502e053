//! Envelope Drag Gesture Integration Tests
//!
//! Click / drag / release / cancel through `EnvelopeHandle` against a real
//! `Project`: stereo pairs, time tracks, history and rollback.

use approx::assert_relative_eq;
use tp_core::{MouseEvent, Rect, ToolMode, TrackId, ViewInfo, WaveDisplay};
use tp_panel::{
    ENVELOPE_CATEGORY, EnvelopeHandle, Handle, PanelMouseEvent, Refresh, UiHandle,
    hit_test_for_tool,
};
use tp_state::{EnvelopeRef, Project, TimeTrack, Track, TrackRef, WaveClip, WaveTrack};

const RATE: f64 = 10.0;
const ROW: Rect = Rect::new(0, 0, 800, 150);

struct Stereo {
    project: Project,
    left: TrackRef,
    right: TrackRef,
}

fn wave(project: &mut Project, name: &str) -> (TrackId, TrackRef) {
    let id = project.next_track_id();
    let track = project.add_track(Track::Wave(
        WaveTrack::new(id, name, RATE).with_clip(WaveClip::silence(0.0, RATE, 8.0)),
    ));
    (id, track)
}

fn stereo() -> Stereo {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut project = Project::default();
    project.set_view(ViewInfo::new(0.0, 100.0));
    let (l, left) = wave(&mut project, "Left");
    let (r, right) = wave(&mut project, "Right");
    assert!(project.link_stereo(l, r));
    Stereo {
        project,
        left,
        right,
    }
}

fn envelope(track: &TrackRef) -> EnvelopeRef {
    track
        .read()
        .as_wave()
        .and_then(|wt| wt.envelope_at(1.0))
        .expect("clip at 1 s")
}

fn event(track: &TrackRef, event: MouseEvent) -> PanelMouseEvent {
    PanelMouseEvent::new(event, ROW, TrackRef::clone(track))
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMMIT
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_click_drag_release_commits_once() {
    let mut s = stereo();
    let before = s.project.history().len();

    let down = event(&s.left, MouseEvent::down(100, 2));
    let mut result = hit_test_for_tool(&down, &s.project, ToolMode::Envelope).unwrap();
    let Some(Handle::Envelope(handle)) = result.handle.as_mut() else {
        panic!("expected an envelope handle");
    };

    assert_eq!(handle.click(&down, &mut s.project), Refresh::CELL);
    assert!(handle.is_active());
    assert!(handle.has_partner_editor());

    let drag = down.with_event(MouseEvent::drag(150, 38));
    assert_eq!(handle.drag(&drag, &mut s.project), Refresh::CELL);

    let up = down.with_event(MouseEvent::up(150, 38));
    assert_eq!(handle.release(&up, &mut s.project), Refresh::CELL);
    assert!(!handle.is_active());
    assert!(!handle.has_partner_editor());

    let history = s.project.history();
    assert_eq!(history.len(), before + 1);
    assert_eq!(history.current().category, ENVELOPE_CATEGORY);
    assert_eq!(history.current().description, "Adjusted envelope.");

    // Both channels got the same point
    for track in [&s.left, &s.right] {
        let env = envelope(track);
        let env = env.read();
        assert_eq!(env.len(), 1);
        assert_relative_eq!(env.points()[0].time, 1.5);
        assert_relative_eq!(env.points()[0].value, 1.0 - 2.0 * 38.0 / 149.0, epsilon = 1e-9);
        assert_eq!(env.drag_point(), None);
    }
}

#[test]
fn test_mono_track_has_one_editor() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut project = Project::default();
    project.set_view(ViewInfo::new(0.0, 100.0));
    let (_, track) = wave(&mut project, "Mono");

    let mut handle = EnvelopeHandle::new();
    let down = event(&track, MouseEvent::down(100, 2));
    assert_eq!(handle.click(&down, &mut project), Refresh::CELL);
    assert!(!handle.has_partner_editor());
}

#[test]
fn test_undo_after_commit() {
    let mut s = stereo();
    let mut handle = EnvelopeHandle::new();
    let down = event(&s.left, MouseEvent::down(100, 30));
    handle.click(&down, &mut s.project);
    handle.release(&down.with_event(MouseEvent::up(100, 30)), &mut s.project);
    assert_eq!(envelope(&s.left).read().len(), 1);

    assert!(s.project.undo());
    assert!(envelope(&s.left).read().is_empty());
    assert!(envelope(&s.right).read().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════════
// REJECTED CLICKS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_click_while_playing_is_cancelled() {
    let mut s = stereo();
    s.project.set_audio_active(true);
    let before = s.project.history().len();

    let mut handle = EnvelopeHandle::new();
    let down = event(&s.left, MouseEvent::down(100, 2));
    assert_eq!(handle.click(&down, &mut s.project), Refresh::CANCELLED);
    assert!(!handle.is_active());
    assert_eq!(s.project.history().len(), before);
    assert!(envelope(&s.left).read().is_empty());
}

#[test]
fn test_click_in_spectrum_is_cancelled() {
    let mut s = stereo();
    if let Some(wt) = s.left.write().as_wave_mut() {
        wt.display = WaveDisplay::Spectrum;
    }
    let mut handle = EnvelopeHandle::new();
    let down = event(&s.left, MouseEvent::down(100, 2));
    assert_eq!(handle.click(&down, &mut s.project), Refresh::CANCELLED);
}

#[test]
fn test_click_outside_clips_is_cancelled() {
    let mut s = stereo();
    s.project.set_view(ViewInfo::new(10.0, 100.0));
    let mut handle = EnvelopeHandle::new();
    let down = event(&s.left, MouseEvent::down(100, 2));
    assert_eq!(handle.click(&down, &mut s.project), Refresh::CANCELLED);
    assert!(!handle.is_active());
}

#[test]
fn test_click_on_label_track_is_cancelled() {
    let mut s = stereo();
    let id = s.project.next_track_id();
    let labels = s.project.add_track(Track::Label(tp_state::LabelTrack {
        id,
        name: "Labels".into(),
    }));
    let mut handle = EnvelopeHandle::new();
    assert_eq!(
        handle.click(&event(&labels, MouseEvent::down(100, 2)), &mut s.project),
        Refresh::CANCELLED
    );
}

// ═══════════════════════════════════════════════════════════════════════════════
// CANCEL / ROLLBACK
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_cancel_rolls_back() {
    let mut s = stereo();
    let before = s.project.history().len();
    let mut handle = EnvelopeHandle::new();

    let down = event(&s.left, MouseEvent::down(100, 2));
    handle.click(&down, &mut s.project);
    handle.drag(&down.with_event(MouseEvent::drag(200, 60)), &mut s.project);
    assert_eq!(envelope(&s.left).read().len(), 1);

    assert_eq!(handle.cancel(&mut s.project), Refresh::CELL);
    assert!(!handle.is_active());
    assert!(envelope(&s.left).read().is_empty());
    assert!(envelope(&s.right).read().is_empty());
    assert_eq!(s.project.history().len(), before);
}

#[test]
fn test_playback_during_drag_cancels() {
    let mut s = stereo();
    let mut handle = EnvelopeHandle::new();

    let down = event(&s.left, MouseEvent::down(100, 2));
    handle.click(&down, &mut s.project);
    s.project.set_audio_active(true);

    let result = handle.drag(&down.with_event(MouseEvent::drag(200, 60)), &mut s.project);
    assert_eq!(result, Refresh::CELL | Refresh::CANCELLED);
    assert!(!handle.is_active());
    assert!(envelope(&s.left).read().is_empty());
}

#[test]
fn test_playback_before_release_cancels() {
    let mut s = stereo();
    let before = s.project.history().len();
    let mut handle = EnvelopeHandle::new();

    let down = event(&s.left, MouseEvent::down(100, 2));
    handle.click(&down, &mut s.project);
    s.project.set_audio_active(true);

    let result = handle.release(&down.with_event(MouseEvent::up(100, 2)), &mut s.project);
    assert_eq!(result, Refresh::CELL);
    assert_eq!(s.project.history().len(), before);
    assert!(envelope(&s.left).read().is_empty());
}

#[test]
fn test_deleted_track_mid_gesture() {
    let mut s = stereo();
    let id = s.left.read().id();
    let mut handle = EnvelopeHandle::new();
    {
        let down = event(&s.left, MouseEvent::down(100, 2));
        handle.click(&down, &mut s.project);
    }

    let Stereo {
        mut project,
        left,
        right,
    } = s;
    drop(left);
    assert!(project.remove_track(id).is_some());

    let drag = event(&right, MouseEvent::drag(150, 20));
    assert_eq!(handle.drag(&drag, &mut project), Refresh::CANCELLED);
    assert!(!handle.is_active());
}

// ═══════════════════════════════════════════════════════════════════════════════
// TIME TRACK
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_time_track_gesture() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut project = Project::default();
    project.set_view(ViewInfo::new(0.0, 100.0));
    let id = project.next_track_id();
    let track = project.add_track(Track::Time(TimeTrack::new(id)));
    let speed = track
        .read()
        .as_time()
        .and_then(|tt| tt.envelope.clone())
        .expect("time track envelope");

    let mut handle = EnvelopeHandle::new();
    let down = event(&track, MouseEvent::down(100, 0));
    assert_eq!(handle.click(&down, &mut project), Refresh::CELL);
    assert!(!handle.has_partner_editor());

    handle.release(&down.with_event(MouseEvent::up(100, 0)), &mut project);
    let speed = speed.read();
    assert_eq!(speed.len(), 1);
    // Top row of a 0.9..1.1 row
    assert_relative_eq!(speed.points()[0].value, 1.1, epsilon = 1e-9);
    assert_eq!(project.history().current().category, ENVELOPE_CATEGORY);
}

#[test]
fn test_time_track_without_envelope() {
    let mut project = Project::default();
    let id = project.next_track_id();
    let mut tt = TimeTrack::new(id);
    tt.envelope = None;
    let track = project.add_track(Track::Time(tt));

    let mut handle = EnvelopeHandle::new();
    assert_eq!(
        handle.click(&event(&track, MouseEvent::down(100, 0)), &mut project),
        Refresh::CANCELLED
    );
}
