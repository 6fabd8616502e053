//! Track control buttons (mute / solo)
//!
//! Press inside the button, optionally drag out and back, and release
//! inside to toggle. Nothing changes until release.

use std::sync::Arc;

use tp_core::{MouseEvent, Rect};
use tp_state::WeakTrackRef;

use crate::{
    CursorKind, Handle, HitPreview, HitTestResult, PanelContext, PanelMouseEvent, Refresh,
    UiHandle,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    Mute,
    Solo,
}

impl ButtonAction {
    pub fn tip(&self) -> &'static str {
        match self {
            Self::Mute => "Mute",
            Self::Solo => "Solo",
        }
    }

    fn history(&self) -> (&'static str, &'static str) {
        match self {
            Self::Mute => ("Toggled mute", "Mute"),
            Self::Solo => ("Toggled solo", "Solo"),
        }
    }
}

#[derive(Debug)]
pub struct ButtonHandle {
    action: ButtonAction,
    rect: Rect,
    track: WeakTrackRef,
    pressed: bool,
    inside: bool,
}

impl ButtonHandle {
    pub fn new(action: ButtonAction, rect: Rect) -> Self {
        Self {
            action,
            rect,
            track: WeakTrackRef::new(),
            pressed: false,
            inside: false,
        }
    }

    pub fn action(&self) -> ButtonAction {
        self.action
    }

    /// Drawn pressed: button held and pointer over the button
    pub fn is_down(&self) -> bool {
        self.pressed && self.inside
    }

    pub fn hit_preview(action: ButtonAction) -> HitPreview {
        HitPreview::new(action.tip(), CursorKind::Arrow)
    }

    pub fn hit_test(event: &MouseEvent, button: Rect, action: ButtonAction) -> Option<HitTestResult> {
        button.contains(event.x, event.y).then(|| {
            HitTestResult::new(
                Self::hit_preview(action),
                Handle::Button(Self::new(action, button)),
            )
        })
    }

    fn commit(&self) -> bool {
        let Some(track) = self.track.upgrade() else {
            log::warn!("{} button released on a deleted track", self.action.tip());
            return false;
        };
        let mut track = track.write();
        let Some(wt) = track.as_wave_mut() else {
            return false;
        };
        match self.action {
            ButtonAction::Mute => wt.muted = !wt.muted,
            ButtonAction::Solo => wt.solo = !wt.solo,
        }
        true
    }
}

impl UiHandle for ButtonHandle {
    fn click(&mut self, event: &PanelMouseEvent, _ctx: &mut dyn PanelContext) -> Refresh {
        if !self.rect.contains(event.event.x, event.event.y) {
            return Refresh::CANCELLED;
        }
        self.track = Arc::downgrade(&event.track);
        self.pressed = true;
        self.inside = true;
        Refresh::CELL
    }

    fn drag(&mut self, event: &PanelMouseEvent, _ctx: &mut dyn PanelContext) -> Refresh {
        let inside = self.rect.contains(event.event.x, event.event.y);
        let changed = inside != self.inside;
        self.inside = inside;
        Refresh::cell_if(changed)
    }

    fn release(&mut self, event: &PanelMouseEvent, ctx: &mut dyn PanelContext) -> Refresh {
        let commit = self.pressed && self.rect.contains(event.event.x, event.event.y);
        self.pressed = false;
        self.inside = false;
        if commit && self.commit() {
            let (description, category) = self.action.history();
            ctx.push_state(description, category);
        }
        Refresh::CELL
    }

    fn cancel(&mut self, _ctx: &mut dyn PanelContext) -> Refresh {
        self.pressed = false;
        self.inside = false;
        Refresh::CELL
    }

    fn preview(&self, _event: &PanelMouseEvent, _ctx: &dyn PanelContext) -> HitPreview {
        Self::hit_preview(self.action)
    }
}
