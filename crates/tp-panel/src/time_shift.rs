//! Time-shift handle: drag a clip along the timeline
//!
//! In multi-tool mode only the grips at the left and right edges of the
//! track hit; with the time-shift tool (or Cmd in multi-tool) it hits
//! anywhere.

use std::sync::Arc;

use tp_core::{MouseEvent, Rect, ToolMode};
use tp_state::WeakTrackRef;

use crate::{
    CursorKind, Handle, HitPreview, HitTestResult, PanelContext, PanelMouseEvent, Refresh,
    UiHandle,
};

pub const TIME_SHIFT_HISTORY: &str = "Moved clip";
pub const TIME_SHIFT_CATEGORY: &str = "TimeShift";

/// Clip being moved on one track
#[derive(Debug)]
struct Grabbed {
    track: WeakTrackRef,
    clip: usize,
}

#[derive(Debug, Default)]
pub struct TimeShiftHandle {
    grabbed: Vec<Grabbed>,
    last_time: f64,
    moved: bool,
}

impl TimeShiftHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit_preview(unsafe_state: bool) -> HitPreview {
        HitPreview::new(
            ToolMode::TimeShift.message(),
            if unsafe_state {
                CursorKind::Disabled
            } else {
                CursorKind::TimeShift
            },
        )
    }

    pub fn hit_anywhere(ctx: &dyn PanelContext) -> HitTestResult {
        let unsafe_state = ctx.is_audio_active();
        let preview = Self::hit_preview(unsafe_state);
        if unsafe_state {
            HitTestResult::disabled(preview)
        } else {
            HitTestResult::new(preview, Handle::TimeShift(Self::new()))
        }
    }

    /// Hit on the grips drawn at both ends of the row
    pub fn hit_test(event: &MouseEvent, rect: Rect, ctx: &dyn PanelContext) -> Option<HitTestResult> {
        let tol = &ctx.preferences().hit;
        let hotspot = event.x + tol.grip_hotspot_offset;
        let on_grip = hotspot < rect.x + tol.grip_width || hotspot >= rect.right() - tol.grip_width;
        on_grip.then(|| Self::hit_anywhere(ctx))
    }

    fn shift(&mut self, delta: f64) {
        for grabbed in &self.grabbed {
            let Some(track) = grabbed.track.upgrade() else {
                continue;
            };
            let mut track = track.write();
            if let Some(clip) = track
                .as_wave_mut()
                .and_then(|wt| wt.clips.get_mut(grabbed.clip))
            {
                clip.shift(delta);
            }
        }
    }
}

impl UiHandle for TimeShiftHandle {
    fn click(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            return Refresh::CANCELLED;
        }
        let time = ctx.view_info().position_to_time(event.event.x, event.rect.x);

        let (id, clip) = {
            let track = event.track.read();
            let Some(wt) = track.as_wave() else {
                return Refresh::CANCELLED;
            };
            let Some(clip) = wt.clip_index_at(time) else {
                return Refresh::CANCELLED;
            };
            (wt.id, clip)
        };

        self.grabbed = vec![Grabbed {
            track: Arc::downgrade(&event.track),
            clip,
        }];
        if let Some(partner) = ctx.linked_partner(id) {
            let partner_clip = partner.read().as_wave().and_then(|pw| pw.clip_index_at(time));
            if let Some(clip) = partner_clip {
                self.grabbed.push(Grabbed {
                    track: Arc::downgrade(&partner),
                    clip,
                });
            }
        }
        self.last_time = time;
        self.moved = false;

        log::debug!("Time shift started on track {:?}, clip {}", id, clip);
        Refresh::NONE
    }

    fn drag(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            self.cancel(ctx);
            return Refresh::CELL | Refresh::CANCELLED;
        }
        if self.grabbed.is_empty() {
            return Refresh::NONE;
        }
        let time = ctx.view_info().position_to_time(event.event.x, event.rect.x);
        let delta = time - self.last_time;
        if delta == 0.0 {
            return Refresh::NONE;
        }
        self.shift(delta);
        self.last_time = time;
        self.moved = true;
        Refresh::ALL
    }

    fn release(&mut self, _event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            return self.cancel(ctx);
        }
        let result = if self.moved {
            ctx.push_state(TIME_SHIFT_HISTORY, TIME_SHIFT_CATEGORY);
            Refresh::ALL
        } else {
            Refresh::NONE
        };
        self.grabbed.clear();
        self.moved = false;
        result
    }

    fn cancel(&mut self, ctx: &mut dyn PanelContext) -> Refresh {
        ctx.rollback_state();
        self.grabbed.clear();
        self.moved = false;
        Refresh::ALL
    }

    fn preview(&self, _event: &PanelMouseEvent, ctx: &dyn PanelContext) -> HitPreview {
        Self::hit_preview(ctx.is_audio_active())
    }
}
