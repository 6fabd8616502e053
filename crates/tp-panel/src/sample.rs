//! Sample handle: draw individual samples when zoomed in far enough
//!
//! Alt-click smooths the samples around the click instead of setting one.

use std::sync::Arc;

use tp_core::{AmplitudeScale, MouseEvent, Rect, ToolMode, ViewInfo, WaveDisplay};
use tp_state::{HitTolerances, WaveTrack, WeakTrackRef};

use crate::{
    CursorKind, Handle, HitPreview, HitTestResult, PanelContext, PanelMouseEvent, Refresh,
    UiHandle,
};

pub const SAMPLE_HISTORY: &str = "Moved Samples";
pub const SAMPLE_CATEGORY: &str = "Sample Edit";

const ZOOM_IN_MESSAGE: &str =
    "To use Draw, zoom in further until you can see the individual samples.";
const WAVEFORM_ONLY_MESSAGE: &str = "To use Draw, choose 'Waveform' in the Track Dropdown Menu.";

/// Samples each side of the click rewritten by a smoothing click
const SMOOTH_RADIUS: usize = 10;
/// Samples each side averaged for one smoothed value
const SMOOTH_WINDOW: usize = 3;

/// Individual samples are drawn (and editable) at this zoom
pub fn showing_samples(view: &ViewInfo, rate: f64, tol: &HitTolerances) -> bool {
    rate > 0.0 && view.zoom / rate >= tol.sample_points_min_pixels
}

#[derive(Debug, Default)]
pub struct SampleHandle {
    track: WeakTrackRef,
    clip: usize,
    rect: Rect,
    scale: AmplitudeScale,
    /// Index and value of the last sample written
    last: Option<(usize, f32)>,
}

impl SampleHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_preview(event: &MouseEvent, unsafe_state: bool) -> HitPreview {
        let cursor = if unsafe_state {
            CursorKind::Disabled
        } else if event.alt_down() {
            CursorKind::Smooth
        } else {
            CursorKind::Pencil
        };
        HitPreview::new(ToolMode::Draw.message(), cursor)
    }

    pub fn hit_anywhere(event: &MouseEvent, ctx: &dyn PanelContext) -> HitTestResult {
        let unsafe_state = ctx.is_audio_active();
        let preview = Self::hit_preview(event, unsafe_state);
        if unsafe_state {
            HitTestResult::disabled(preview)
        } else {
            HitTestResult::new(preview, Handle::Sample(Self::new()))
        }
    }

    /// Hit when the pointer is near the drawn sample under it
    pub fn hit_test(
        event: &MouseEvent,
        rect: Rect,
        ctx: &dyn PanelContext,
        track: &WaveTrack,
    ) -> Option<HitTestResult> {
        let view = ctx.view_info();
        let tol = &ctx.preferences().hit;
        if !showing_samples(view, track.rate, tol) {
            return None;
        }

        let time = view.position_to_time(event.x, rect.x);
        let clip = track.clip_at(time)?;
        let sample = f64::from(clip.sample_at(time)?);
        let gain = clip.envelope().read().value_at(time);

        let scale = AmplitudeScale::from_track(track.bounds, &track.settings);
        let y_sample = scale.wave_y_pos(sample * gain, rect.height, true, false) + rect.y;
        if (y_sample - event.y).abs() >= tol.sample_tolerance {
            return None;
        }
        Some(Self::hit_anywhere(event, ctx))
    }

    /// Sample value drawn at a pointer row, before the envelope gain
    fn value_at_y(&self, y: i32, gain: f64) -> f32 {
        let y = (y - self.rect.y).clamp(0, (self.rect.height - 1).max(0));
        let value = self.scale.value_of_pixel(y, self.rect.height, false);
        let value = if gain > 0.0 { value / gain } else { value };
        value as f32
    }

    /// Write samples for a pointer position; fills the gap from the last
    /// written sample so fast drags leave no holes
    fn draw(&mut self, event: &MouseEvent, view: &ViewInfo) -> bool {
        let Some(track) = self.track.upgrade() else {
            log::warn!("Sample edit on a deleted track");
            return false;
        };
        let mut track = track.write();
        let Some(clip) = track.as_wave_mut().and_then(|wt| wt.clips.get_mut(self.clip)) else {
            return false;
        };

        let time = view.position_to_time(event.x, self.rect.x);
        let Some(index) = clip.sample_index_at(time) else {
            return false;
        };
        let gain = clip.envelope().read().value_at(time);
        let value = self.value_at_y(event.y, gain);

        match self.last {
            Some((last, last_value)) if last != index => {
                let (from, to) = (last.min(index), last.max(index));
                let span = (to - from) as f32;
                for i in from..=to {
                    let frac = (i - from) as f32 / span;
                    let v = if last < index {
                        last_value + (value - last_value) * frac
                    } else {
                        value + (last_value - value) * frac
                    };
                    clip.set_sample(i, v);
                }
            }
            _ => {
                clip.set_sample(index, value);
            }
        }
        self.last = Some((index, value));
        true
    }

    /// Replace the samples around `time` with a moving average
    fn smooth(&mut self, event: &MouseEvent, view: &ViewInfo) -> bool {
        let Some(track) = self.track.upgrade() else {
            return false;
        };
        let mut track = track.write();
        let Some(clip) = track.as_wave_mut().and_then(|wt| wt.clips.get_mut(self.clip)) else {
            return false;
        };
        let time = view.position_to_time(event.x, self.rect.x);
        let Some(center) = clip.sample_index_at(time) else {
            return false;
        };

        let original = clip.samples().to_vec();
        let from = center.saturating_sub(SMOOTH_RADIUS);
        let to = (center + SMOOTH_RADIUS).min(original.len() - 1);
        for i in from..=to {
            let lo = i.saturating_sub(SMOOTH_WINDOW);
            let hi = (i + SMOOTH_WINDOW).min(original.len() - 1);
            let window = &original[lo..=hi];
            let mean = window.iter().sum::<f32>() / window.len() as f32;
            clip.set_sample(i, mean);
        }
        true
    }
}

impl UiHandle for SampleHandle {
    fn click(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            return Refresh::CANCELLED;
        }
        let view = *ctx.view_info();
        let time = view.position_to_time(event.event.x, event.rect.x);
        {
            let track = event.track.read();
            let Some(wt) = track.as_wave() else {
                return Refresh::CANCELLED;
            };
            if wt.display != WaveDisplay::Waveform
                || !showing_samples(&view, wt.rate, &ctx.preferences().hit)
            {
                return Refresh::CANCELLED;
            }
            let Some(clip) = wt.clip_index_at(time) else {
                return Refresh::CANCELLED;
            };
            self.clip = clip;
            self.scale = AmplitudeScale::from_track(wt.bounds, &wt.settings);
        }
        self.track = Arc::downgrade(&event.track);
        self.rect = event.rect;
        self.last = None;

        let changed = if event.event.alt_down() {
            self.smooth(&event.event, &view)
        } else {
            self.draw(&event.event, &view)
        };
        if !changed {
            return Refresh::CANCELLED;
        }
        log::debug!("Sample edit started on clip {}", self.clip);
        Refresh::CELL
    }

    fn drag(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            self.cancel(ctx);
            return Refresh::CELL | Refresh::CANCELLED;
        }
        // Smoothing is a single click
        if self.last.is_none() {
            return Refresh::NONE;
        }
        let view = *ctx.view_info();
        Refresh::cell_if(self.draw(&event.event, &view))
    }

    fn release(&mut self, _event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            return self.cancel(ctx);
        }
        ctx.push_state(SAMPLE_HISTORY, SAMPLE_CATEGORY);
        self.last = None;
        Refresh::CELL
    }

    fn cancel(&mut self, ctx: &mut dyn PanelContext) -> Refresh {
        ctx.rollback_state();
        self.last = None;
        Refresh::CELL
    }

    fn preview(&self, event: &PanelMouseEvent, ctx: &dyn PanelContext) -> HitPreview {
        let track = event.track.read();
        match track.as_wave() {
            Some(wt) if wt.display != WaveDisplay::Waveform => {
                HitPreview::new(WAVEFORM_ONLY_MESSAGE, CursorKind::Arrow)
            }
            Some(wt) if !showing_samples(ctx.view_info(), wt.rate, &ctx.preferences().hit) => {
                HitPreview::new(ZOOM_IN_MESSAGE, CursorKind::Arrow)
            }
            _ => Self::hit_preview(&event.event, ctx.is_audio_active()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_showing_samples() {
        let tol = HitTolerances::default();
        assert!(showing_samples(&ViewInfo::new(0.0, 30.0), 10.0, &tol));
        assert!(!showing_samples(&ViewInfo::new(0.0, 29.0), 10.0, &tol));
        assert!(!showing_samples(&ViewInfo::new(0.0, 30.0), 0.0, &tol));
    }

    #[test]
    fn test_preview_cursor() {
        let down = MouseEvent::down(0, 0);
        assert_eq!(SampleHandle::hit_preview(&down, false).cursor, CursorKind::Pencil);
        let alt = down.with_modifiers(tp_core::Modifiers::default().with_alt());
        assert_eq!(SampleHandle::hit_preview(&alt, false).cursor, CursorKind::Smooth);
        assert_eq!(SampleHandle::hit_preview(&alt, true).cursor, CursorKind::Disabled);
    }
}
