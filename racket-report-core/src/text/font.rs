/// Standard Type 1 fonts available in every PDF reader without embedding.
///
/// Reports only ever draw with the sans-serif and serif families, so the
/// oblique and monospace faces are not modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    /// Helvetica (sans-serif)
    Helvetica,
    /// Helvetica Bold
    HelveticaBold,
    /// Times Roman (serif)
    TimesRoman,
    /// Times Bold
    TimesBold,
}

impl Font {
    /// Every font the writer declares in page resources.
    pub const ALL: [Font; 4] = [
        Font::Helvetica,
        Font::HelveticaBold,
        Font::TimesRoman,
        Font::TimesBold,
    ];

    /// PDF base font name, also used as the resource key in content streams.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::TimesRoman => "Times-Roman",
            Font::TimesBold => "Times-Bold",
        }
    }

    pub fn is_bold(&self) -> bool {
        matches!(self, Font::HelveticaBold | Font::TimesBold)
    }

    pub fn family(&self) -> FontFamily {
        match self {
            Font::Helvetica | Font::HelveticaBold => FontFamily::Helvetica,
            Font::TimesRoman | Font::TimesBold => FontFamily::Times,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFamily {
    Helvetica,
    Times,
}

impl FontFamily {
    pub fn regular(self) -> Font {
        match self {
            FontFamily::Helvetica => Font::Helvetica,
            FontFamily::Times => Font::TimesRoman,
        }
    }

    pub fn bold(self) -> Font {
        match self {
            FontFamily::Helvetica => Font::HelveticaBold,
            FontFamily::Times => Font::TimesBold,
        }
    }

    /// Picks the bold or regular face of this family.
    pub fn weighted(self, bold: bool) -> Font {
        if bold {
            self.bold()
        } else {
            self.regular()
        }
    }
}
