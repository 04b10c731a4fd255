/// A device color used for fills, strokes and text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// RGB color with components in 0.0..=1.0
    Rgb(f64, f64, f64),
    /// Grayscale from 0.0 (black) to 1.0 (white)
    Gray(f64),
}

impl Color {
    /// Creates an RGB color with values clamped to 0.0-1.0.
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color::Rgb(r.clamp(0.0, 1.0), g.clamp(0.0, 1.0), b.clamp(0.0, 1.0))
    }

    /// Creates an RGB color from 8-bit channels, the way design palettes are written.
    pub const fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    /// Creates a grayscale color with value clamped to 0.0-1.0.
    pub fn gray(value: f64) -> Self {
        Color::Gray(value.clamp(0.0, 1.0))
    }

    /// Grayscale from an 8-bit level.
    pub const fn gray8(level: u8) -> Self {
        Color::Gray(level as f64 / 255.0)
    }

    pub const fn black() -> Self {
        Color::Gray(0.0)
    }

    pub const fn white() -> Self {
        Color::Gray(1.0)
    }

    /// Operator line for this color, `fill` picks `rg`/`g` over `RG`/`G`.
    pub(crate) fn operator(&self, fill: bool) -> String {
        match (*self, fill) {
            (Color::Rgb(r, g, b), true) => format!("{r:.3} {g:.3} {b:.3} rg"),
            (Color::Rgb(r, g, b), false) => format!("{r:.3} {g:.3} {b:.3} RG"),
            (Color::Gray(g), true) => format!("{g:.3} g"),
            (Color::Gray(g), false) => format!("{g:.3} G"),
        }
    }
}
