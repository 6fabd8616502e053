//! Redraw directives returned by handle callbacks

use std::ops::{BitOr, BitOrAssign};

/// Set of refresh flags; combine with `|`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Refresh(u8);

impl Refresh {
    /// Nothing to redraw
    pub const NONE: Self = Self(0);
    /// Redraw the cell (track row) under the gesture
    pub const CELL: Self = Self(1);
    /// Redraw the whole panel
    pub const ALL: Self = Self(1 << 1);
    /// The gesture ended without committing
    pub const CANCELLED: Self = Self(1 << 2);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_cancelled(self) -> bool {
        self.contains(Self::CANCELLED)
    }

    #[inline]
    pub fn needs_redraw(self) -> bool {
        self.0 & (Self::CELL.0 | Self::ALL.0) != 0
    }

    /// `CELL` when `changed`, else `NONE`
    #[inline]
    pub fn cell_if(changed: bool) -> Self {
        if changed { Self::CELL } else { Self::NONE }
    }
}

impl BitOr for Refresh {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Refresh {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combine() {
        let r = Refresh::CELL | Refresh::CANCELLED;
        assert!(r.contains(Refresh::CELL));
        assert!(r.is_cancelled());
        assert!(r.needs_redraw());
        assert!(!Refresh::NONE.needs_redraw());
        assert!(Refresh::NONE.contains(Refresh::NONE));
    }

    #[test]
    fn test_cell_if() {
        assert_eq!(Refresh::cell_if(true), Refresh::CELL);
        assert_eq!(Refresh::cell_if(false), Refresh::NONE);
    }
}
