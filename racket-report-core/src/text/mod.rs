//! Standard-14 text support: font selection, WinAnsi encoding and width metrics.

mod encoding;
mod font;
mod metrics;

pub use encoding::encode_win_ansi;
pub(crate) use encoding::push_literal;
pub use font::{Font, FontFamily};
pub use metrics::{measure_char, measure_text, split_into_words};

/// Horizontal alignment of a line inside a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// X offset of a line of `line_width` inside a box of `box_width`.
    pub fn offset(self, line_width: f64, box_width: f64) -> f64 {
        match self {
            TextAlign::Left => 0.0,
            TextAlign::Center => ((box_width - line_width) / 2.0).max(0.0),
            TextAlign::Right => (box_width - line_width).max(0.0),
        }
    }
}
