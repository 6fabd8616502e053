//! Mouse events delivered to the track panel

use serde::{Deserialize, Serialize};

/// Mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MouseButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// What happened to the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseEventKind {
    /// Button pressed
    Down(MouseButton),
    /// Button released
    Up(MouseButton),
    /// Double click
    DoubleClick(MouseButton),
    /// Pointer moved with a button held
    Drag(MouseButton),
    /// Pointer moved with no button held
    Motion,
}

/// Modifier keys held during the event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    /// Ctrl, or Cmd on macOS
    pub cmd: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        cmd: false,
        alt: false,
    };

    pub fn cmd() -> Self {
        Self {
            cmd: true,
            ..Self::NONE
        }
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }

    pub fn with_alt(mut self) -> Self {
        self.alt = true;
        self
    }
}

/// A single pointer event in panel pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub x: i32,
    pub y: i32,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    pub fn new(kind: MouseEventKind, x: i32, y: i32) -> Self {
        Self {
            kind,
            x,
            y,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn down(x: i32, y: i32) -> Self {
        Self::new(MouseEventKind::Down(MouseButton::Left), x, y)
    }

    pub fn drag(x: i32, y: i32) -> Self {
        Self::new(MouseEventKind::Drag(MouseButton::Left), x, y)
    }

    pub fn up(x: i32, y: i32) -> Self {
        Self::new(MouseEventKind::Up(MouseButton::Left), x, y)
    }

    pub fn motion(x: i32, y: i32) -> Self {
        Self::new(MouseEventKind::Motion, x, y)
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: MouseButton) -> Self {
        self.kind = match self.kind {
            MouseEventKind::Down(_) => MouseEventKind::Down(button),
            MouseEventKind::Up(_) => MouseEventKind::Up(button),
            MouseEventKind::DoubleClick(_) => MouseEventKind::DoubleClick(button),
            MouseEventKind::Drag(_) => MouseEventKind::Drag(button),
            MouseEventKind::Motion => MouseEventKind::Motion,
        };
        self
    }

    #[inline]
    pub fn cmd_down(&self) -> bool {
        self.modifiers.cmd
    }

    #[inline]
    pub fn alt_down(&self) -> bool {
        self.modifiers.alt
    }

    #[inline]
    pub fn shift_down(&self) -> bool {
        self.modifiers.shift
    }

    pub fn button_down(&self) -> bool {
        matches!(
            self.kind,
            MouseEventKind::Down(_) | MouseEventKind::DoubleClick(_)
        )
    }

    pub fn button_up(&self) -> bool {
        matches!(self.kind, MouseEventKind::Up(_))
    }

    pub fn dragging(&self) -> bool {
        matches!(self.kind, MouseEventKind::Drag(_))
    }

    /// Button involved in the event, if any
    pub fn button(&self) -> Option<MouseButton> {
        match self.kind {
            MouseEventKind::Down(b)
            | MouseEventKind::Up(b)
            | MouseEventKind::DoubleClick(b)
            | MouseEventKind::Drag(b) => Some(b),
            MouseEventKind::Motion => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kinds() {
        let down = MouseEvent::down(5, 6);
        assert!(down.button_down());
        assert!(!down.button_up());
        assert_eq!(down.button(), Some(MouseButton::Left));

        let up = MouseEvent::up(5, 6).with_button(MouseButton::Right);
        assert!(up.button_up());
        assert_eq!(up.button(), Some(MouseButton::Right));

        assert_eq!(MouseEvent::motion(0, 0).button(), None);
    }

    #[test]
    fn test_modifiers() {
        let event = MouseEvent::down(0, 0).with_modifiers(Modifiers::cmd().with_alt());
        assert!(event.cmd_down());
        assert!(event.alt_down());
        assert!(!event.shift_down());
    }
}
