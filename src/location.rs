//! Source locations.

use std::fmt;

/// A 1-based line, 0-based column pair.
///
/// Column 0 means "before the first byte of the line". Both counters
/// saturate at their maximum representable value rather than wrapping;
/// [`Location::bump_line`] reports the saturation once via its return
/// value so the caller can emit a one-shot note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line_no: u32,
    pub col_no: u32,
}

impl Location {
    pub const fn start() -> Self {
        Location {
            line_no: 1,
            col_no: 0,
        }
    }

    /// Advances to the next line, resetting the column. Returns `true` if
    /// the line counter was already at its maximum and therefore did not
    /// advance (caller should emit the saturation note, once).
    #[must_use]
    pub fn bump_line(&mut self) -> bool {
        let saturated = self.line_no == u32::MAX;
        if !saturated {
            self.line_no += 1;
        }
        self.col_no = 0;
        saturated
    }

    /// Advances the column by one. Returns `true` if the column counter was
    /// already at its maximum and therefore did not advance.
    #[must_use]
    pub fn bump_col(&mut self) -> bool {
        let saturated = self.col_no == u32::MAX;
        if !saturated {
            self.col_no += 1;
        }
        saturated
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_no, self.col_no)
    }
}
