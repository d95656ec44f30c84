/*!
 * On-screen layout for KBP display lines.
 *
 * Positions are in CDG pixels. Alignment uses the ASS numpad codes for the
 * top row (7 left, 8 centre, 9 right), which is also what the horizontal
 * formula is written against.
 */

use serde::{Deserialize, Serialize};

/// Drawable width of a CDG frame without the border
pub const CDG_WIDTH: i64 = 288;
/// Drawable height of a CDG frame without the border
pub const CDG_HEIGHT: i64 = 192;
/// Width when the standard CDG border is included
pub const CDG_BORDER_WIDTH: i64 = 300;
/// Height when the standard CDG border is included
pub const CDG_BORDER_HEIGHT: i64 = 216;
/// Extra top margin contributed by the CDG border
pub const BORDER_TOP: i64 = 12;
/// Extra side margin contributed by the CDG border
pub const BORDER_SIDE: i64 = 6;
/// KBS adds this to the configured line spacing.
// Measured for Arial 12 bold, Arial 13 and Arial 13 bold.
pub const FONT_LINE_PADDING: i64 = 19;

/// Horizontal alignment of a display line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

impl Alignment {
    /// Alignment from the header character; anything unknown is centred
    pub fn from_code(code: &str) -> Self {
        match code {
            "L" => Self::Left,
            "R" => Self::Right,
            _ => Self::Center,
        }
    }

    /// ASS `\an` value
    pub fn ass_code(self) -> i64 {
        match self {
            Self::Left => 7,
            Self::Center => 8,
            Self::Right => 9,
        }
    }
}

/// Page geometry shared by every line of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub border: bool,
}

impl Layout {
    pub fn new(border: bool) -> Self {
        Self { border }
    }

    pub fn total_width(&self) -> i64 {
        if self.border { CDG_BORDER_WIDTH } else { CDG_WIDTH }
    }

    pub fn total_height(&self) -> i64 {
        if self.border { CDG_BORDER_HEIGHT } else { CDG_HEIGHT }
    }

    /// Top margin as stored in the project plus the border allowance
    pub fn top_margin(&self, declared: i64) -> i64 {
        declared.saturating_add(if self.border { BORDER_TOP } else { 0 })
    }

    /// Effective spacing between lines
    pub fn line_spacing(&self, declared: i64) -> i64 {
        declared.saturating_add(FONT_LINE_PADDING)
    }

    /// Horizontal anchor of a line.
    ///
    /// `((a - 7) * width) / 2 + offset + (8 - a) * (margin + pad)` where the
    /// margin is the left one for left-aligned lines and the right one
    /// otherwise.
    pub fn horizontal_position(
        &self,
        alignment: Alignment,
        raw_offset: i64,
        left_margin: i64,
        right_margin: i64,
    ) -> i64 {
        let a = alignment.ass_code();
        let side_margin = if alignment == Alignment::Left { left_margin } else { right_margin };
        let pad = if self.border { BORDER_SIDE } else { 0 };

        (((a - 7) * self.total_width()) / 2)
            .saturating_add(raw_offset)
            .saturating_add((8 - a).saturating_mul(side_margin.saturating_add(pad)))
    }
}
