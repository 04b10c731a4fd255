use crate::error::{ReportError, Result};
use crate::graphics::{GraphicsContext, Image};
use std::collections::BTreeMap;

/// Points per millimetre.
pub const PT_PER_MM: f64 = 72.0 / 25.4;

/// Converts millimetres to points.
pub fn mm(value: f64) -> f64 {
    value * PT_PER_MM
}

/// A single page in a PDF document.
///
/// Drawing goes through [`Page::graphics`]; images must be registered with
/// [`Page::add_image`] before [`Page::draw_image`] can place them.
///
/// ```rust
/// use racket_report::{Color, Page};
///
/// let mut page = Page::a4();
/// page.graphics()
///     .set_fill_color(Color::rgb8(22, 163, 74))
///     .rect(0.0, 0.0, 100.0, 50.0)
///     .fill();
/// ```
#[derive(Clone)]
pub struct Page {
    width: f64,
    height: f64,
    graphics_context: GraphicsContext,
    images: BTreeMap<String, Image>,
}

impl Page {
    /// Creates a new page with the specified width and height in points.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            graphics_context: GraphicsContext::new(),
            images: BTreeMap::new(),
        }
    }

    /// Creates a new A4 page (210 x 297 mm).
    pub fn a4() -> Self {
        Self::new(mm(210.0), mm(297.0))
    }

    /// Creates a new US Letter page (612 x 792 points).
    pub fn letter() -> Self {
        Self::new(612.0, 792.0)
    }

    pub fn graphics(&mut self) -> &mut GraphicsContext {
        &mut self.graphics_context
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn add_image(&mut self, name: impl Into<String>, image: Image) {
        self.images.insert(name.into(), image);
    }

    pub fn draw_image(&mut self, name: &str, x: f64, y: f64, width: f64, height: f64) -> Result<()> {
        if self.images.contains_key(name) {
            self.graphics_context.draw_image(name, x, y, width, height);
            Ok(())
        } else {
            Err(ReportError::InvalidReference(format!(
                "Image '{name}' not found"
            )))
        }
    }

    pub(crate) fn images(&self) -> &BTreeMap<String, Image> {
        &self.images
    }

    pub(crate) fn generate_content(&self) -> Vec<u8> {
        self.graphics_context.generate_operations()
    }
}
