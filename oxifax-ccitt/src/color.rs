//! Pixel colors.

use std::ops::Not;

/// Color of a run of pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    /// Background (bit value 0).
    White,
    /// Ink (bit value 1).
    Black,
}

impl Color {
    /// The other color.
    #[inline]
    pub const fn invert(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Whether this is [`Color::Black`].
    #[inline]
    pub const fn is_black(self) -> bool {
        matches!(self, Color::Black)
    }
}

impl Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        self.invert()
    }
}

impl From<bool> for Color {
    fn from(black: bool) -> Color {
        if black { Color::Black } else { Color::White }
    }
}
