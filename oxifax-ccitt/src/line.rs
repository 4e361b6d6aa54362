//! Changing-element view of a scanline.
//!
//! A line is stored as the ascending list of positions where a run ends,
//! starting with a white run and always closed by `width`. The element at
//! index `i` starts a black run when `i` is even and a white run when odd.
//! A line that begins with black pixels therefore starts with `0`.

use oxifax_core::raster::{bit_at, fill_run};

use crate::color::Color;

/// Run ends of one scanline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodingLine {
    width: usize,
    ends: Vec<usize>,
}

impl CodingLine {
    /// An all-white line, the implied reference above the first row.
    pub fn white(width: usize) -> Self {
        let mut ends = Vec::with_capacity(16);
        ends.push(width);
        Self { width, ends }
    }

    /// Compute the run ends of a packed row.
    ///
    /// Padding bits past `width` are ignored.
    pub fn from_row(row: &[u8], width: usize) -> Self {
        let mut ends = Vec::new();
        let mut black = false;
        let mut x = 0;
        while x < width {
            if x % 8 == 0 && x + 8 <= width {
                let uniform = if black { 0xFF } else { 0x00 };
                if row[x / 8] == uniform {
                    x += 8;
                    continue;
                }
            }
            if bit_at(row, x) != black {
                ends.push(x);
                black = !black;
            }
            x += 1;
        }
        ends.push(width);
        Self { width, ends }
    }

    /// Line width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// The run ends.
    pub fn ends(&self) -> &[usize] {
        &self.ends
    }

    /// Lengths of the alternating runs, white first.
    pub fn runs(&self) -> impl Iterator<Item = usize> + '_ {
        let mut start = 0;
        self.ends.iter().map(move |&end| {
            let run = end - start;
            start = end;
            run
        })
    }

    /// Drop all elements to start a new line.
    pub fn clear(&mut self) {
        self.ends.clear();
    }

    /// Reset to the all-white line.
    pub fn reset(&mut self) {
        self.ends.clear();
        self.ends.push(self.width);
    }

    /// Position reached so far.
    pub fn reached(&self) -> usize {
        self.ends.last().copied().unwrap_or(0)
    }

    /// Color of the run that the next element would close.
    fn open_color(&self) -> Color {
        Color::from(self.ends.len() % 2 == 1)
    }

    /// Extend the line with `color` up to `end` and paint it into `row`.
    ///
    /// Zero-length runs are absorbed: extending the color of the run the
    /// last element closed moves that element instead of adding one.
    /// Callers guarantee `reached() <= end <= width`.
    pub fn add_run(&mut self, row: &mut [u8], end: usize, color: Color) {
        debug_assert!(end <= self.width);
        let start = self.reached();
        debug_assert!(end >= start);
        if color.is_black() {
            fill_run(row, start, end);
        }

        if self.open_color() == color {
            if end > start {
                self.ends.push(end);
            }
        } else if let Some(last) = self.ends.last_mut() {
            *last = end;
        } else {
            // Black at the very start: close an empty white run first.
            self.ends.push(0);
            if end > 0 {
                self.ends.push(end);
            }
        }
    }

    /// Close the line at `width`.
    pub fn finish(&mut self) {
        if self.ends.is_empty() || self.reached() < self.width {
            self.ends.push(self.width);
        }
    }

    /// Locate b1 and b2 on this (reference) line.
    ///
    /// b1 is the first element right of `a0` that changes to the color
    /// opposite `color`; b2 is the next one. Both default to `width`.
    /// `hint` is an index into the list that only moves forward within a
    /// line; start each line with zero.
    pub fn changes_after(&self, a0: Option<usize>, color: Color, hint: &mut usize) -> (usize, usize) {
        if let Some(a0) = a0 {
            while *hint < self.ends.len() && self.ends[*hint] <= a0 {
                *hint += 1;
            }
        }
        let mut i = *hint;
        // Even indices start black runs, which is the opposite of white.
        let wanted_even = color == Color::White;
        if i < self.ends.len() && (i % 2 == 0) != wanted_even {
            i += 1;
        }
        let b1 = self.ends.get(i).copied().unwrap_or(self.width);
        let b2 = self.ends.get(i + 1).copied().unwrap_or(self.width);
        (b1, b2)
    }

    /// The element right of `a0` (or the first one when `a0` is unset) and
    /// its successor, defaulting to `width`.
    pub fn next_changes(&self, a0: Option<usize>, index: &mut usize) -> (usize, usize) {
        if let Some(a0) = a0 {
            while *index < self.ends.len() && self.ends[*index] <= a0 {
                *index += 1;
            }
        }
        let a1 = self.ends.get(*index).copied().unwrap_or(self.width);
        let a2 = self.ends.get(*index + 1).copied().unwrap_or(self.width);
        (a1, a2)
    }
}
