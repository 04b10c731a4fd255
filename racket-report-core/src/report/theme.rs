//! Palette and typography shared by every renderer.

use crate::graphics::Color;
use crate::text::FontFamily;

/// Point sizes for each text role.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Typography {
    pub cover_title: f64,
    pub cover_subtitle: f64,
    pub cover_date: f64,
    pub card_name: f64,
    pub card_brand: f64,
    pub badge: f64,
    pub heading: f64,
    pub subheading: f64,
    pub body: f64,
    pub table: f64,
    pub footer: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Theme {
    /// Brand green used for bands, headings, bullets and the table header
    pub primary: Color,
    /// Dark gray for subheadings, card names and table body text
    pub secondary: Color,
    /// Body copy
    pub text: Color,
    pub on_primary: Color,
    pub placeholder: Color,
    pub muted: Color,
    pub footer: Color,
    pub grid: Color,
    pub feature_fill: Color,
    pub family: FontFamily,
    pub sizes: Typography,
}

/// The Smashly look.
pub const SMASHLY: Theme = Theme {
    primary: Color::rgb8(22, 163, 74),
    secondary: Color::rgb8(31, 41, 55),
    text: Color::rgb8(55, 65, 81),
    on_primary: Color::white(),
    placeholder: Color::gray8(230),
    muted: Color::gray8(100),
    footer: Color::gray8(150),
    grid: Color::rgb8(230, 230, 230),
    feature_fill: Color::rgb8(249, 250, 251),
    family: FontFamily::Helvetica,
    sizes: Typography {
        cover_title: 36.0,
        cover_subtitle: 14.0,
        cover_date: 10.0,
        card_name: 11.0,
        card_brand: 9.0,
        badge: 8.0,
        heading: 16.0,
        subheading: 12.0,
        body: 10.0,
        table: 9.0,
        footer: 8.0,
    },
};

impl Default for Theme {
    fn default() -> Self {
        SMASHLY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Font;

    #[test]
    fn test_default_is_smashly() {
        assert_eq!(Theme::default(), SMASHLY);
        assert_eq!(SMASHLY.family.bold(), Font::HelveticaBold);
    }

    #[test]
    fn test_heading_hierarchy() {
        let sizes = SMASHLY.sizes;
        assert!(sizes.cover_title > sizes.heading);
        assert!(sizes.heading > sizes.subheading);
        assert!(sizes.subheading > sizes.body);
        assert!(sizes.body > sizes.table);
    }
}
