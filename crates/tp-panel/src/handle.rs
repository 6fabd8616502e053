//! Gesture handles
//!
//! A handle is created by a hit test and then owns one mouse gesture:
//! `click` on button down, `drag` while the button is held, then either
//! `release` (commit) or `cancel` (roll back). Handles hold only weak
//! references to tracks and envelopes.

use tp_core::{MouseEvent, Rect};
use tp_state::TrackRef;

use crate::{
    ButtonHandle, CutlineHandle, EnvelopeHandle, HitPreview, PanelContext, Refresh,
    SampleHandle, TimeShiftHandle,
};

/// Mouse event routed to a track row
#[derive(Debug, Clone)]
pub struct PanelMouseEvent {
    pub event: MouseEvent,
    /// Row rectangle of the track
    pub rect: Rect,
    pub track: TrackRef,
}

impl PanelMouseEvent {
    pub fn new(event: MouseEvent, rect: Rect, track: TrackRef) -> Self {
        Self { event, rect, track }
    }

    /// Same row and track, different raw event
    pub fn with_event(&self, event: MouseEvent) -> Self {
        Self {
            event,
            rect: self.rect,
            track: TrackRef::clone(&self.track),
        }
    }
}

/// Gesture contract shared by every handle
pub trait UiHandle {
    fn click(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh;

    fn drag(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh;

    fn release(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh;

    fn cancel(&mut self, ctx: &mut dyn PanelContext) -> Refresh;

    /// Feedback while the gesture is in progress
    fn preview(&self, event: &PanelMouseEvent, ctx: &dyn PanelContext) -> HitPreview;
}

/// Every kind of handle a hit test can produce
#[derive(Debug)]
pub enum Handle {
    Envelope(EnvelopeHandle),
    TimeShift(TimeShiftHandle),
    Sample(SampleHandle),
    Cutline(CutlineHandle),
    Button(ButtonHandle),
}

impl Handle {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Envelope(_) => "Envelope",
            Self::TimeShift(_) => "TimeShift",
            Self::Sample(_) => "Sample",
            Self::Cutline(_) => "Cutline",
            Self::Button(_) => "Button",
        }
    }

    fn as_ui(&mut self) -> &mut dyn UiHandle {
        match self {
            Self::Envelope(h) => h,
            Self::TimeShift(h) => h,
            Self::Sample(h) => h,
            Self::Cutline(h) => h,
            Self::Button(h) => h,
        }
    }

    fn as_ui_ref(&self) -> &dyn UiHandle {
        match self {
            Self::Envelope(h) => h,
            Self::TimeShift(h) => h,
            Self::Sample(h) => h,
            Self::Cutline(h) => h,
            Self::Button(h) => h,
        }
    }
}

impl UiHandle for Handle {
    fn click(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        self.as_ui().click(event, ctx)
    }

    fn drag(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        self.as_ui().drag(event, ctx)
    }

    fn release(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        self.as_ui().release(event, ctx)
    }

    fn cancel(&mut self, ctx: &mut dyn PanelContext) -> Refresh {
        self.as_ui().cancel(ctx)
    }

    fn preview(&self, event: &PanelMouseEvent, ctx: &dyn PanelContext) -> HitPreview {
        self.as_ui_ref().preview(event, ctx)
    }
}
