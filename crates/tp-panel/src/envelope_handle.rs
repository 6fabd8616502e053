//! Envelope handle
//!
//! Hit-tests the gain envelope (and its gain contours) of wave clips and the
//! speed envelope of time tracks, and drives the envelope drag gesture.
//!
//! Gesture lifecycle:
//! - click: pick the envelope under the pointer, snapshot the amplitude
//!   scale and open one editor (two for a linked stereo pair)
//! - drag: forward to the editors
//! - release: forward, record one undo step, close the editors
//! - cancel: roll the document back, close the editors

use std::sync::Arc;

use tp_core::{
    AmplitudeScale, MIN_LINEAR, MouseEvent, Rect, ToolMode, TrackId, ViewInfo, WaveDisplay,
    linear_to_db,
};
use tp_state::{
    Envelope, EnvelopeEditor, EnvelopeRef, HitTolerances, TimeTrack, Track, WaveTrack,
    WeakTrackRef,
};

use crate::{
    CursorKind, Handle, HitPreview, HitTestResult, PanelContext, PanelMouseEvent, Refresh,
    UiHandle,
};

pub const ENVELOPE_HISTORY: &str = "Adjusted envelope.";
pub const ENVELOPE_CATEGORY: &str = "Envelope";

/// Envelope drag gesture state
#[derive(Debug, Default)]
pub struct EnvelopeHandle {
    track: WeakTrackRef,
    rect: Rect,
    scale: AmplitudeScale,
    editor: Option<EnvelopeEditor>,
    partner_editor: Option<EnvelopeEditor>,
}

impl EnvelopeHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a gesture is in progress
    pub fn is_active(&self) -> bool {
        self.editor.is_some()
    }

    pub fn has_partner_editor(&self) -> bool {
        self.partner_editor.is_some()
    }

    pub fn hit_preview(unsafe_state: bool) -> HitPreview {
        HitPreview::new(
            ToolMode::Envelope.message(),
            if unsafe_state {
                CursorKind::Disabled
            } else {
                CursorKind::Envelope
            },
        )
    }

    /// Unconditional hit, used when the envelope tool is selected
    pub fn hit_anywhere(ctx: &dyn PanelContext) -> HitTestResult {
        let unsafe_state = ctx.is_audio_active();
        let preview = Self::hit_preview(unsafe_state);
        if unsafe_state {
            HitTestResult::disabled(preview)
        } else {
            HitTestResult::new(preview, Handle::Envelope(Self::new()))
        }
    }

    /// Hit on the envelope of the clip under the pointer
    pub fn wave_track_hit_test(
        event: &MouseEvent,
        rect: Rect,
        ctx: &dyn PanelContext,
        track: &WaveTrack,
    ) -> Option<HitTestResult> {
        let time = ctx.view_info().position_to_time(event.x, rect.x);
        let envelope = track.envelope_at(time)?;
        if track.display != WaveDisplay::Waveform {
            return None;
        }
        let scale = AmplitudeScale::from_track(track.bounds, &track.settings);
        let envelope = envelope.read();
        Self::hit_envelope(event, rect, ctx, &envelope, &scale)
    }

    pub fn time_track_hit_test(
        event: &MouseEvent,
        rect: Rect,
        ctx: &dyn PanelContext,
        track: &TimeTrack,
    ) -> Option<HitTestResult> {
        let envelope = track.envelope.as_ref()?;
        let scale = time_track_scale(track, ctx.time_track_db_range());
        let envelope = envelope.read();
        Self::hit_envelope(event, rect, ctx, &envelope, &scale)
    }

    /// Hit when the pointer is near the envelope line or one of its gain
    /// contours at the pointer's time
    pub fn hit_envelope(
        event: &MouseEvent,
        rect: Rect,
        ctx: &dyn PanelContext,
        envelope: &Envelope,
        scale: &AmplitudeScale,
    ) -> Option<HitTestResult> {
        let view = ctx.view_info();
        let env_value = envelope.value_at(view.position_to_time(event.x, rect.x));

        let y_value = scale.wave_y_pos(env_value, rect.height, true, false) + rect.y;
        let ctr = scale.wave_y_pos(0.0, rect.height, true, false) + rect.y;

        let y_mouse = (ctr - event.y).abs();
        let y_value = (ctr - y_value).abs();
        let spacing = scale.contour_spacing(rect.height);

        let hit = contour_hit(y_value, y_mouse, spacing, &ctx.preferences().hit);
        log::trace!(
            "Envelope hit test: value {:.3} y_value {} y_mouse {} spacing {} -> {}",
            env_value,
            y_value,
            y_mouse,
            spacing,
            hit
        );
        hit.then(|| Self::hit_anywhere(ctx))
    }

    fn forward(&mut self, event: &MouseEvent, view: &ViewInfo) -> bool {
        let mut changed = false;
        for editor in self.editor.iter_mut().chain(self.partner_editor.iter_mut()) {
            changed |= editor.mouse_event(event, self.rect, view, &self.scale);
        }
        changed
    }

    fn close(&mut self) {
        self.editor = None;
        self.partner_editor = None;
    }
}

/// Contour test on distances from the center line.
///
/// `y_value` is the envelope's pixel distance from the center, `y_mouse`
/// the pointer's. Contours sit `spacing` pixels apart, inward from the
/// envelope line.
pub fn contour_hit(y_value: i32, y_mouse: i32, spacing: i32, tol: &HitTolerances) -> bool {
    if spacing <= 0 {
        return false;
    }
    let displace = y_value - tol.envelope_misalign - y_mouse + spacing / 2;
    if displace > tol.max_contours * spacing {
        return false;
    }
    let distance = ((displace % spacing) - spacing / 2).abs();
    distance < tol.envelope_tolerance
}

/// Amplitude scale of a time track's speed envelope
pub fn time_track_scale(track: &TimeTrack, db_range: f64) -> AmplitudeScale {
    if track.display_log {
        let lower = linear_to_db(track.range_lower.max(MIN_LINEAR)) / db_range + 1.0;
        let upper = linear_to_db(track.range_upper.max(MIN_LINEAR)) / db_range + 1.0;
        AmplitudeScale::logarithmic(lower, upper, db_range)
    } else {
        AmplitudeScale::linear(track.range_lower, track.range_upper)
    }
}

/// What a click resolved to, gathered before any other track is locked
struct Target {
    id: TrackId,
    envelope: EnvelopeRef,
    scale: AmplitudeScale,
    mirrored: bool,
}

impl UiHandle for EnvelopeHandle {
    fn click(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            return Refresh::CANCELLED;
        }
        let view = *ctx.view_info();
        let time = view.position_to_time(event.event.x, event.rect.x);

        let target = {
            let track = event.track.read();
            match &*track {
                Track::Wave(wt) => {
                    if wt.display != WaveDisplay::Waveform {
                        return Refresh::CANCELLED;
                    }
                    let Some(envelope) = wt.envelope_at(time) else {
                        return Refresh::CANCELLED;
                    };
                    Target {
                        id: wt.id,
                        envelope,
                        scale: AmplitudeScale::from_track(wt.bounds, &wt.settings),
                        mirrored: true,
                    }
                }
                Track::Time(tt) => {
                    let Some(envelope) = tt.envelope.clone() else {
                        return Refresh::CANCELLED;
                    };
                    Target {
                        id: tt.id,
                        envelope,
                        scale: time_track_scale(tt, ctx.time_track_db_range()),
                        mirrored: false,
                    }
                }
                Track::Label(_) => return Refresh::CANCELLED,
            }
        };

        self.scale = target.scale;
        self.editor = Some(EnvelopeEditor::new(
            Arc::downgrade(&target.envelope),
            target.mirrored,
        ));
        self.partner_editor = if target.mirrored {
            ctx.linked_partner(target.id)
                .and_then(|partner| {
                    let partner = partner.read();
                    partner.as_wave().and_then(|pw| pw.envelope_at(time))
                })
                .map(|envelope| EnvelopeEditor::new(Arc::downgrade(&envelope), true))
        } else {
            None
        };
        self.track = Arc::downgrade(&event.track);
        self.rect = event.rect;

        log::debug!(
            "Envelope gesture started on track {:?} (partner: {})",
            target.id,
            self.partner_editor.is_some()
        );
        Refresh::cell_if(self.forward(&event.event, &view))
    }

    fn drag(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            self.cancel(ctx);
            return Refresh::CELL | Refresh::CANCELLED;
        }
        if self.track.upgrade().is_none() {
            log::warn!("Envelope drag on a deleted track");
            self.close();
            return Refresh::CANCELLED;
        }
        let view = *ctx.view_info();
        Refresh::cell_if(self.forward(&event.event, &view))
    }

    fn release(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            return self.cancel(ctx);
        }
        if self.track.upgrade().is_none() {
            log::warn!("Envelope release on a deleted track");
            self.close();
            return Refresh::CANCELLED;
        }
        let view = *ctx.view_info();
        let changed = self.forward(&event.event, &view);

        ctx.push_state(ENVELOPE_HISTORY, ENVELOPE_CATEGORY);
        log::debug!("Envelope gesture committed");

        self.close();
        Refresh::cell_if(changed)
    }

    fn cancel(&mut self, ctx: &mut dyn PanelContext) -> Refresh {
        ctx.rollback_state();
        log::debug!("Envelope gesture cancelled");
        self.close();
        Refresh::CELL
    }

    fn preview(&self, _event: &PanelMouseEvent, _ctx: &dyn PanelContext) -> HitPreview {
        Self::hit_preview(false)
    }
}
