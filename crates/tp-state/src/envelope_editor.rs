//! Per-gesture envelope editor
//!
//! Lives from mouse-down to mouse-up. A click grabs the nearest control
//! point (or adds one), drags move it, and release finishes the drag.
//! Mirrored envelopes (wave clips) are drawn above and below the center
//! line, plus the inner gain contours; any of those images can be grabbed.

use std::sync::Weak;

use parking_lot::RwLock;
use tp_core::{AmplitudeScale, MouseButton, MouseEvent, Rect, ViewInfo};

use crate::Envelope;

/// Pixel distance within which a click grabs an existing point
pub const POINT_TOLERANCE: i32 = 10;

/// How far past the row edge a point may go before it is hidden
pub const DRAG_OUT_MARGIN: i32 = 10;

/// Which drawn image of a point is being dragged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Grip {
    upper: bool,
    inner: bool,
}

const UPPER_OUTER: Grip = Grip {
    upper: true,
    inner: false,
};

/// Edits one envelope for the duration of a gesture
#[derive(Debug)]
pub struct EnvelopeEditor {
    envelope: Weak<RwLock<Envelope>>,
    mirrored: bool,
    button: Option<MouseButton>,
    grip: Grip,
    dirty: bool,
}

impl EnvelopeEditor {
    pub fn new(envelope: Weak<RwLock<Envelope>>, mirrored: bool) -> Self {
        Self {
            envelope,
            mirrored,
            button: None,
            grip: UPPER_OUTER,
            dirty: false,
        }
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirrored
    }

    /// Whether any point changed since the button went down
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Feed one mouse event; returns true if the envelope needs a redraw
    pub fn mouse_event(
        &mut self,
        event: &MouseEvent,
        rect: Rect,
        view: &ViewInfo,
        scale: &AmplitudeScale,
    ) -> bool {
        let Some(envelope) = self.envelope.upgrade() else {
            log::warn!("Envelope dropped in the middle of an edit");
            return false;
        };
        let mut env = envelope.write();

        if event.button_down() && self.button.is_none() {
            return self.button_down(&mut env, event, rect, view, scale);
        }
        if event.dragging() && self.button.is_some() && env.drag_point().is_some() {
            return self.drag(&mut env, event, rect, view, scale);
        }
        if event.button_up() && self.button.is_some() && event.button() == self.button {
            return self.button_up(&mut env);
        }
        false
    }

    fn grips(&self) -> &'static [Grip] {
        const MIRRORED: [Grip; 4] = [
            UPPER_OUTER,
            Grip {
                upper: false,
                inner: false,
            },
            Grip {
                upper: true,
                inner: true,
            },
            Grip {
                upper: false,
                inner: true,
            },
        ];
        if self.mirrored {
            &MIRRORED
        } else {
            &MIRRORED[..1]
        }
    }

    fn value_for(y_rel: i32, height: i32, scale: &AmplitudeScale, grip: Grip) -> f64 {
        let y = y_rel.clamp(0, (height - 1).max(0));
        let v = scale.value_of_pixel(y, height, grip.inner);
        if grip.upper { v } else { -v }
    }

    fn button_down(
        &mut self,
        env: &mut Envelope,
        event: &MouseEvent,
        rect: Rect,
        view: &ViewInfo,
        scale: &AmplitudeScale,
    ) -> bool {
        let y_rel = event.y - rect.y;

        let mut best: Option<(usize, Grip, i32)> = None;
        for (i, p) in env.points().iter().enumerate() {
            let x = view.time_to_position(p.time + env.offset(), rect.x);
            let dx = (x - event.x).abs();
            if dx >= POINT_TOLERANCE {
                continue;
            }
            for &grip in self.grips() {
                let value = if grip.upper { p.value } else { -p.value };
                let y = scale.wave_y_pos(value, rect.height, !grip.inner, false);
                let dist = dx + (y - y_rel).abs();
                if dist < POINT_TOLERANCE && best.is_none_or(|(_, _, d)| dist < d) {
                    best = Some((i, grip, dist));
                }
            }
        }

        let index = match best {
            Some((index, grip, _)) => {
                self.grip = grip;
                self.dirty = false;
                index
            }
            None => {
                let center = scale.wave_y_pos(0.0, rect.height, true, false);
                self.grip = Grip {
                    upper: !self.mirrored || y_rel <= center,
                    inner: false,
                };
                let time = view.position_to_time(event.x, rect.x) - env.offset();
                let value = Self::value_for(y_rel, rect.height, scale, self.grip);
                self.dirty = true;
                env.insert_or_replace(time, value)
            }
        };

        log::trace!("Envelope point {} grabbed ({:?})", index, self.grip);
        env.set_drag_point(Some(index));
        self.button = event.button();
        true
    }

    fn drag(
        &mut self,
        env: &mut Envelope,
        event: &MouseEvent,
        rect: Rect,
        view: &ViewInfo,
        scale: &AmplitudeScale,
    ) -> bool {
        let Some(index) = env.drag_point() else {
            return false;
        };
        let inside =
            event.y >= rect.y - DRAG_OUT_MARGIN && event.y <= rect.bottom() + DRAG_OUT_MARGIN;

        let time = view.position_to_time(event.x, rect.x) - env.offset();
        let value = Self::value_for(event.y - rect.y, rect.height, scale, self.grip);
        env.move_point(index, time, value);
        env.set_drag_point_valid(inside);
        self.dirty = true;
        true
    }

    fn button_up(&mut self, env: &mut Envelope) -> bool {
        env.clear_drag_point();
        self.button = None;
        true
    }
}
