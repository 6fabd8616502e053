//! Hover feedback and hit-test results

use crate::Handle;

/// Pointer shape shown over an affordance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorKind {
    Arrow,
    Envelope,
    TimeShift,
    Pencil,
    /// Draw tool with Alt held
    Smooth,
    /// Edit not possible right now (playback/recording)
    Disabled,
}

/// Status bar message + cursor for the pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitPreview {
    pub message: &'static str,
    pub cursor: CursorKind,
}

impl HitPreview {
    pub const fn new(message: &'static str, cursor: CursorKind) -> Self {
        Self { message, cursor }
    }

    pub fn is_disabled(&self) -> bool {
        self.cursor == CursorKind::Disabled
    }
}

/// Outcome of a successful hit test
///
/// A missing handle means "hit, but nothing can be started" (the disabled
/// preview while audio is active).
#[derive(Debug)]
pub struct HitTestResult {
    pub preview: HitPreview,
    pub handle: Option<Handle>,
}

impl HitTestResult {
    pub fn new(preview: HitPreview, handle: Handle) -> Self {
        Self {
            preview,
            handle: Some(handle),
        }
    }

    pub fn disabled(preview: HitPreview) -> Self {
        Self {
            preview,
            handle: None,
        }
    }

    pub fn handle_name(&self) -> Option<&'static str> {
        self.handle.as_ref().map(Handle::name)
    }
}
