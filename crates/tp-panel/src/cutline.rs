//! Cut line handle: left-click expands a cut line, right-click removes it

use std::sync::Arc;

use tp_core::{MouseButton, MouseEvent, Rect};
use tp_state::{WaveTrack, WeakTrackRef};

use crate::{
    CursorKind, Handle, HitPreview, HitTestResult, PanelContext, PanelMouseEvent, Refresh,
    UiHandle,
};

pub const CUTLINE_CATEGORY: &str = "Cut Line";

const CUTLINE_MESSAGE: &str = "Left-Click to expand, Right-Click to remove";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutlineOperation {
    Expand,
    Remove,
}

impl CutlineOperation {
    pub fn history(&self) -> &'static str {
        match self {
            Self::Expand => "Expanded Cut Line",
            Self::Remove => "Removed Cut Line",
        }
    }
}

#[derive(Debug)]
pub struct CutlineHandle {
    clip: usize,
    cut: usize,
    track: WeakTrackRef,
    operation: Option<CutlineOperation>,
}

impl CutlineHandle {
    pub fn new(clip: usize, cut: usize) -> Self {
        Self {
            clip,
            cut,
            track: WeakTrackRef::new(),
            operation: None,
        }
    }

    /// (clip index, cut line index) this handle acts on
    pub fn location(&self) -> (usize, usize) {
        (self.clip, self.cut)
    }

    pub fn hit_preview(unsafe_state: bool) -> HitPreview {
        HitPreview::new(
            CUTLINE_MESSAGE,
            if unsafe_state {
                CursorKind::Disabled
            } else {
                CursorKind::Arrow
            },
        )
    }

    /// Hit when the pointer is within the cut line tolerance of a cut line
    pub fn hit_test(
        event: &MouseEvent,
        rect: Rect,
        ctx: &dyn PanelContext,
        track: &WaveTrack,
    ) -> Option<HitTestResult> {
        let view = ctx.view_info();
        let tolerance = ctx.preferences().hit.cutline_tolerance;

        let (clip, cut) = track.clips.iter().enumerate().find_map(|(ci, clip)| {
            (0..clip.cut_lines().len())
                .find(|&i| {
                    clip.cut_line_time(i).is_some_and(|t| {
                        (view.time_to_position(t, rect.x) - event.x).abs() <= tolerance
                    })
                })
                .map(|i| (ci, i))
        })?;

        log::trace!("Cut line hit: clip {} cut {}", clip, cut);
        let unsafe_state = ctx.is_audio_active();
        let preview = Self::hit_preview(unsafe_state);
        Some(if unsafe_state {
            HitTestResult::disabled(preview)
        } else {
            HitTestResult::new(preview, Handle::Cutline(Self::new(clip, cut)))
        })
    }
}

impl UiHandle for CutlineHandle {
    fn click(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        if ctx.is_audio_active() {
            return Refresh::CANCELLED;
        }
        let operation = match event.event.button() {
            Some(MouseButton::Left) => CutlineOperation::Expand,
            Some(MouseButton::Right) => CutlineOperation::Remove,
            _ => return Refresh::CANCELLED,
        };

        let done = {
            let mut track = event.track.write();
            match track
                .as_wave_mut()
                .and_then(|wt| wt.clips.get_mut(self.clip))
            {
                Some(clip) => match operation {
                    CutlineOperation::Expand => clip.expand_cut_line(self.cut),
                    CutlineOperation::Remove => clip.remove_cut_line(self.cut),
                },
                None => false,
            }
        };
        if !done {
            return Refresh::CANCELLED;
        }

        log::debug!("{} (clip {}, cut {})", operation.history(), self.clip, self.cut);
        self.track = Arc::downgrade(&event.track);
        self.operation = Some(operation);
        Refresh::ALL
    }

    fn drag(&mut self, _event: &PanelMouseEvent, _ctx: &mut dyn PanelContext) -> Refresh {
        Refresh::NONE
    }

    fn release(&mut self, _event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        let Some(operation) = self.operation.take() else {
            return Refresh::NONE;
        };
        if self.track.upgrade().is_none() {
            log::warn!("Cut line release on a deleted track");
            return Refresh::CANCELLED;
        }
        ctx.push_state(operation.history(), CUTLINE_CATEGORY);
        Refresh::NONE
    }

    fn cancel(&mut self, ctx: &mut dyn PanelContext) -> Refresh {
        ctx.rollback_state();
        self.operation = None;
        Refresh::ALL
    }

    fn preview(&self, _event: &PanelMouseEvent, ctx: &dyn PanelContext) -> HitPreview {
        Self::hit_preview(ctx.is_audio_active())
    }
}
