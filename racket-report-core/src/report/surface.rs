//! Measurement and drawing facade used by every renderer.
//!
//! Layout code works in points with `y` measured downward from the top edge of
//! the page. [`PdfSurface`] flips that into PDF user space; [`RecordingSurface`]
//! keeps the draw calls so layouts can be inspected without producing a file.

use crate::document::Document;
use crate::error::Result;
use crate::graphics::{Color, Image};
use crate::page::Page;
use crate::report::config::{PageSize, ReportConfig};
use crate::text::{measure_text, Font};

/// Page size and the content box inside the margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64, margin: f64) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn a4(margin: f64) -> Self {
        let page = Page::a4();
        Self::new(page.width(), page.height(), margin)
    }

    pub fn content_width(&self) -> f64 {
        self.width - 2.0 * self.margin
    }

    /// First usable `y` on a fresh page.
    pub fn top(&self) -> f64 {
        self.margin
    }

    /// Lowest `y` content may reach.
    pub fn bottom(&self) -> f64 {
        self.height - self.margin
    }
}

/// What a renderer may ask of the page it draws on.
///
/// Widths are measured against the font selected by the last `set_font`.
pub trait Surface {
    fn geometry(&self) -> PageGeometry;

    fn set_font(&mut self, font: Font, size: f64);

    fn font(&self) -> (Font, f64);

    fn text_width(&self, text: &str) -> f64 {
        let (font, size) = self.font();
        measure_text(text, font, size)
    }

    /// Appends a page and makes it current.
    fn new_page(&mut self);

    fn page_count(&self) -> usize;

    /// Makes the 1-based `page` current again; false when it does not exist.
    fn go_to_page(&mut self, page: usize) -> bool;

    /// Draws `text` with its baseline at `y`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: Color);

    /// `y` is the top edge.
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64, color: Color);

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color);

    fn line(&mut self, from: (f64, f64), to: (f64, f64), line_width: f64, color: Color);

    /// Places `image` with its top-left corner at (`x`, `y`).
    fn draw_image(&mut self, name: &str, image: &Image, x: f64, y: f64, width: f64, height: f64) -> Result<()>;
}

/// Draws straight into a [`Document`].
pub struct PdfSurface {
    document: Document,
    page_size: PageSize,
    geometry: PageGeometry,
    current: usize,
    font: (Font, f64),
}

impl PdfSurface {
    /// A surface holding one empty page.
    pub fn new(config: &ReportConfig) -> Self {
        let first = config.page.new_page();
        let geometry = PageGeometry::new(first.width(), first.height(), config.margin());
        let mut document = Document::new();
        document.add_page(first);

        Self {
            document,
            page_size: config.page,
            geometry,
            current: 0,
            font: (Font::Helvetica, 10.0),
        }
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    fn page(&mut self) -> Option<&mut Page> {
        self.document.page_mut(self.current)
    }

    fn pdf_y(&self, y: f64) -> f64 {
        self.geometry.height - y
    }
}

impl Surface for PdfSurface {
    fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    fn set_font(&mut self, font: Font, size: f64) {
        self.font = (font, size);
    }

    fn font(&self) -> (Font, f64) {
        self.font
    }

    fn new_page(&mut self) {
        self.document.add_page(self.page_size.new_page());
        self.current = self.document.page_count() - 1;
    }

    fn page_count(&self) -> usize {
        self.document.page_count()
    }

    fn go_to_page(&mut self, page: usize) -> bool {
        if page == 0 || page > self.document.page_count() {
            return false;
        }
        self.current = page - 1;
        true
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: Color) {
        let (font, size) = self.font;
        let y = self.pdf_y(y);
        if let Some(page) = self.page() {
            page.graphics()
                .set_fill_color(color)
                .text_at(font, size, x, y, text);
        }
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        let y = self.pdf_y(y + height);
        if let Some(page) = self.page() {
            page.graphics()
                .set_fill_color(color)
                .rect(x, y, width, height)
                .fill();
        }
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, line_width: f64, color: Color) {
        let y = self.pdf_y(y + height);
        if let Some(page) = self.page() {
            page.graphics()
                .set_stroke_color(color)
                .set_line_width(line_width)
                .rect(x, y, width, height)
                .stroke();
        }
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        let cy = self.pdf_y(cy);
        if let Some(page) = self.page() {
            page.graphics()
                .set_fill_color(color)
                .circle(cx, cy, radius)
                .fill();
        }
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), line_width: f64, color: Color) {
        let (y1, y2) = (self.pdf_y(from.1), self.pdf_y(to.1));
        if let Some(page) = self.page() {
            page.graphics()
                .set_stroke_color(color)
                .set_line_width(line_width)
                .move_to(from.0, y1)
                .line_to(to.0, y2)
                .stroke();
        }
    }

    fn draw_image(&mut self, name: &str, image: &Image, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        let y = self.pdf_y(y + height);
        match self.page() {
            Some(page) => {
                page.add_image(name, image.clone());
                page.draw_image(name, x, y, width, height)
            }
            None => Ok(()),
        }
    }
}

/// A drawing call captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text {
        page: usize,
        text: String,
        x: f64,
        y: f64,
        font: Font,
        size: f64,
        color: Color,
    },
    Rect {
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        filled: bool,
    },
    Circle {
        page: usize,
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    },
    Line {
        page: usize,
        from: (f64, f64),
        to: (f64, f64),
        color: Color,
    },
    Image {
        page: usize,
        name: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

impl DrawOp {
    pub fn page(&self) -> usize {
        match self {
            DrawOp::Text { page, .. }
            | DrawOp::Rect { page, .. }
            | DrawOp::Circle { page, .. }
            | DrawOp::Line { page, .. }
            | DrawOp::Image { page, .. } => *page,
        }
    }
}

/// Measures with the real font metrics and records draw calls instead of
/// producing PDF content.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    geometry: PageGeometry,
    font: (Font, f64),
    pages: usize,
    current: usize,
    ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            font: (Font::Helvetica, 10.0),
            pages: 1,
            current: 1,
            ops: Vec::new(),
        }
    }

    /// A4 with the default 20 mm margin.
    pub fn a4() -> Self {
        Self::new(PageGeometry::a4(ReportConfig::default().margin()))
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Every text draw as (page, text), in call order.
    pub fn texts(&self) -> Vec<(usize, &str)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { page, text, .. } => Some((*page, text.as_str())),
                _ => None,
            })
            .collect()
    }

    pub fn texts_on(&self, page: usize) -> Vec<&str> {
        self.texts()
            .into_iter()
            .filter(|(p, _)| *p == page)
            .map(|(_, text)| text)
            .collect()
    }

    /// Whether some text draw equals `needle`.
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|(_, text)| *text == needle)
    }
}

impl Surface for RecordingSurface {
    fn geometry(&self) -> PageGeometry {
        self.geometry
    }

    fn set_font(&mut self, font: Font, size: f64) {
        self.font = (font, size);
    }

    fn font(&self) -> (Font, f64) {
        self.font
    }

    fn new_page(&mut self) {
        self.pages += 1;
        self.current = self.pages;
    }

    fn page_count(&self) -> usize {
        self.pages
    }

    fn go_to_page(&mut self, page: usize) -> bool {
        if page == 0 || page > self.pages {
            return false;
        }
        self.current = page;
        true
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, color: Color) {
        let (font, size) = self.font;
        self.ops.push(DrawOp::Text {
            page: self.current,
            text: text.to_string(),
            x,
            y,
            font,
            size,
            color,
        });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.ops.push(DrawOp::Rect {
            page: self.current,
            x,
            y,
            width,
            height,
            color,
            filled: true,
        });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64, _line_width: f64, color: Color) {
        self.ops.push(DrawOp::Rect {
            page: self.current,
            x,
            y,
            width,
            height,
            color,
            filled: false,
        });
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, color: Color) {
        self.ops.push(DrawOp::Circle {
            page: self.current,
            cx,
            cy,
            radius,
            color,
        });
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), _line_width: f64, color: Color) {
        self.ops.push(DrawOp::Line {
            page: self.current,
            from,
            to,
            color,
        });
    }

    fn draw_image(&mut self, name: &str, _image: &Image, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        self.ops.push(DrawOp::Image {
            page: self.current,
            name: name.to_string(),
            x,
            y,
            width,
            height,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry() {
        let geometry = PageGeometry::new(600.0, 800.0, 50.0);
        assert_eq!(geometry.content_width(), 500.0);
        assert_eq!(geometry.top(), 50.0);
        assert_eq!(geometry.bottom(), 750.0);
    }

    #[test]
    fn test_text_width_follows_current_font() {
        let mut surface = RecordingSurface::a4();
        surface.set_font(Font::Helvetica, 10.0);
        let regular = surface.text_width("Potencia");
        surface.set_font(Font::HelveticaBold, 10.0);
        let bold = surface.text_width("Potencia");
        assert!(bold > regular);
    }

    #[test]
    fn test_recording_pages() {
        let mut surface = RecordingSurface::a4();
        surface.draw_text("one", 0.0, 10.0, Color::black());
        surface.new_page();
        surface.draw_text("two", 0.0, 10.0, Color::black());
        assert!(surface.go_to_page(1));
        surface.draw_text("again", 0.0, 20.0, Color::black());
        assert!(!surface.go_to_page(3));

        assert_eq!(surface.page_count(), 2);
        assert_eq!(surface.texts_on(1), vec!["one", "again"]);
        assert_eq!(surface.texts_on(2), vec!["two"]);
    }

    #[test]
    fn test_pdf_surface_flips_y() {
        let mut surface = PdfSurface::new(&ReportConfig::default());
        surface.set_font(Font::Helvetica, 10.0);
        surface.fill_rect(10.0, 0.0, 20.0, 30.0, Color::black());
        surface.draw_text("Hi", 10.0, 100.0, Color::black());

        let height = surface.geometry().height;
        let mut document = surface.into_document();
        let page = document.page_mut(0).unwrap();
        let ops = page.graphics().operations().to_string();

        assert!(ops.contains(&format!("10.00 {:.2} 20.00 30.00 re", height - 30.0)));
        assert!(ops.contains(&format!("1 0 0 1 10.00 {:.2} Tm", height - 100.0)));
    }

    #[test]
    fn test_pdf_surface_pages() {
        let mut surface = PdfSurface::new(&ReportConfig::default());
        assert_eq!(surface.page_count(), 1);
        surface.new_page();
        surface.new_page();
        assert_eq!(surface.page_count(), 3);
        assert!(surface.go_to_page(2));
        assert!(!surface.go_to_page(0));
        assert_eq!(surface.into_document().page_count(), 3);
    }
}
