mod color;
mod image;

pub use color::Color;
pub use image::{ColorSpace as ImageColorSpace, Image, ImageFormat};

use crate::text::{push_literal, Font};
use std::fmt::{self, Write};

/// Bezier control-point ratio for approximating a quarter circle
const KAPPA: f64 = 0.552284749831;

/// Accumulates the content-stream operators of one page.
///
/// Coordinates are PDF user space: points, origin at the bottom-left corner.
#[derive(Clone)]
pub struct GraphicsContext {
    operations: String,
    current_color: Color,
    stroke_color: Color,
    line_width: f64,
    font: Option<(Font, f64)>,
}

impl Default for GraphicsContext {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsContext {
    pub fn new() -> Self {
        Self {
            operations: String::new(),
            current_color: Color::black(),
            stroke_color: Color::black(),
            line_width: 1.0,
            font: None,
        }
    }

    fn op(&mut self, args: fmt::Arguments<'_>) {
        // Writing into a String cannot fail
        let _ = self.operations.write_fmt(args);
        self.operations.push('\n');
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(format_args!("{x:.2} {y:.2} m"));
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(format_args!("{x:.2} {y:.2} l"));
        self
    }

    pub fn curve_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) -> &mut Self {
        self.op(format_args!(
            "{x1:.2} {y1:.2} {x2:.2} {y2:.2} {x3:.2} {y3:.2} c"
        ));
        self
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.op(format_args!("{x:.2} {y:.2} {width:.2} {height:.2} re"));
        self
    }

    pub fn circle(&mut self, cx: f64, cy: f64, radius: f64) -> &mut Self {
        let k = KAPPA * radius;
        let r = radius;

        self.move_to(cx + r, cy);
        self.curve_to(cx + r, cy + k, cx + k, cy + r, cx, cy + r);
        self.curve_to(cx - k, cy + r, cx - r, cy + k, cx - r, cy);
        self.curve_to(cx - r, cy - k, cx - k, cy - r, cx, cy - r);
        self.curve_to(cx + k, cy - r, cx + r, cy - k, cx + r, cy);
        self.close_path()
    }

    pub fn close_path(&mut self) -> &mut Self {
        self.operations.push_str("h\n");
        self
    }

    pub fn stroke(&mut self) -> &mut Self {
        self.apply_stroke_color();
        self.operations.push_str("S\n");
        self
    }

    pub fn fill(&mut self) -> &mut Self {
        self.apply_fill_color();
        self.operations.push_str("f\n");
        self
    }

    pub fn set_stroke_color(&mut self, color: Color) -> &mut Self {
        self.stroke_color = color;
        self
    }

    pub fn set_fill_color(&mut self, color: Color) -> &mut Self {
        self.current_color = color;
        self
    }

    pub fn set_line_width(&mut self, width: f64) -> &mut Self {
        self.line_width = width;
        self.op(format_args!("{width:.2} w"));
        self
    }

    pub fn save_state(&mut self) -> &mut Self {
        self.operations.push_str("q\n");
        self
    }

    pub fn restore_state(&mut self) -> &mut Self {
        self.operations.push_str("Q\n");
        self
    }

    /// Paint the image XObject `image_name` into the given box
    pub fn draw_image(
        &mut self,
        image_name: &str,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> &mut Self {
        self.save_state();
        // Image space is the unit square, so scale it onto the box
        self.op(format_args!("{width:.2} 0 0 {height:.2} {x:.2} {y:.2} cm"));
        self.op(format_args!("/{image_name} Do"));
        self.restore_state()
    }

    pub fn begin_text(&mut self) -> &mut Self {
        self.operations.push_str("BT\n");
        self
    }

    pub fn end_text(&mut self) -> &mut Self {
        self.operations.push_str("ET\n");
        self
    }

    pub fn set_font(&mut self, font: Font, size: f64) -> &mut Self {
        self.font = Some((font, size));
        self.op(format_args!("/{} {size:.2} Tf", font.pdf_name()));
        self
    }

    /// Absolute text position, valid inside a BT/ET pair
    pub fn set_text_position(&mut self, x: f64, y: f64) -> &mut Self {
        self.op(format_args!("1 0 0 1 {x:.2} {y:.2} Tm"));
        self
    }

    /// Show `text` with the current fill color
    pub fn show_text(&mut self, text: &str) -> &mut Self {
        self.apply_fill_color();
        push_literal(&mut self.operations, text);
        self.operations.push_str(" Tj\n");
        self
    }

    /// One self-contained text object: font, color, position and string
    pub fn text_at(&mut self, font: Font, size: f64, x: f64, y: f64, text: &str) -> &mut Self {
        self.begin_text()
            .set_font(font, size)
            .set_text_position(x, y)
            .show_text(text)
            .end_text()
    }

    fn apply_stroke_color(&mut self) {
        let line = self.stroke_color.operator(false);
        self.op(format_args!("{line}"));
    }

    fn apply_fill_color(&mut self) {
        let line = self.current_color.operator(true);
        self.op(format_args!("{line}"));
    }

    pub(crate) fn generate_operations(&self) -> Vec<u8> {
        self.operations.as_bytes().to_vec()
    }

    pub fn fill_color(&self) -> Color {
        self.current_color
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Font selected by the last `set_font`
    pub fn font(&self) -> Option<(Font, f64)> {
        self.font
    }

    /// Get the operations string
    pub fn operations(&self) -> &str {
        &self.operations
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphics_context_new() {
        let ctx = GraphicsContext::new();
        assert_eq!(ctx.fill_color(), Color::black());
        assert_eq!(ctx.stroke_color(), Color::black());
        assert_eq!(ctx.line_width(), 1.0);
        assert!(ctx.font().is_none());
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_rect_fill() {
        let mut ctx = GraphicsContext::new();
        ctx.set_fill_color(Color::rgb8(22, 163, 74))
            .rect(0.0, 0.0, 595.28, 841.89)
            .fill();

        let ops = ctx.operations();
        assert!(ops.contains("0.00 0.00 595.28 841.89 re\n"));
        assert!(ops.contains("0.086 0.639 0.290 rg\nf\n"));
    }

    #[test]
    fn test_line_stroke() {
        let mut ctx = GraphicsContext::new();
        ctx.set_stroke_color(Color::gray(0.5))
            .set_line_width(1.42)
            .move_to(56.69, 100.0)
            .line_to(113.39, 100.0)
            .stroke();

        assert_eq!(
            ctx.operations(),
            "1.42 w\n56.69 100.00 m\n113.39 100.00 l\n0.500 G\nS\n"
        );
        assert_eq!(ctx.line_width(), 1.42);
    }

    #[test]
    fn test_circle() {
        let mut ctx = GraphicsContext::new();
        ctx.circle(50.0, 50.0, 25.0);

        let ops = ctx.operations();
        assert!(ops.starts_with("75.00 50.00 m\n"));
        assert_eq!(ops.matches(" c\n").count(), 4);
        assert!(ops.ends_with("h\n"));
    }

    #[test]
    fn test_draw_image() {
        let mut ctx = GraphicsContext::new();
        ctx.draw_image("Im1", 10.0, 20.0, 100.0, 50.0);

        assert_eq!(
            ctx.operations(),
            "q\n100.00 0 0 50.00 10.00 20.00 cm\n/Im1 Do\nQ\n"
        );
    }

    #[test]
    fn test_text_at() {
        let mut ctx = GraphicsContext::new();
        ctx.set_fill_color(Color::white())
            .text_at(Font::HelveticaBold, 8.0, 100.0, 200.0, "VS");

        assert_eq!(
            ctx.operations(),
            "BT\n/Helvetica-Bold 8.00 Tf\n1 0 0 1 100.00 200.00 Tm\n1.000 g\n(VS) Tj\nET\n"
        );
        assert_eq!(ctx.font(), Some((Font::HelveticaBold, 8.0)));
    }

    #[test]
    fn test_show_text_escapes_and_encodes() {
        let mut ctx = GraphicsContext::new();
        ctx.show_text("Peso (g)");
        assert!(ctx.operations().ends_with("(Peso \\(g\\)) Tj\n"));
    }

    #[test]
    fn test_save_restore_state() {
        let mut ctx = GraphicsContext::new();
        ctx.save_state().restore_state();
        assert_eq!(ctx.operations(), "q\nQ\n");
    }

    #[test]
    fn test_generate_operations() {
        let mut ctx = GraphicsContext::new();
        ctx.rect(0.0, 0.0, 10.0, 10.0);
        assert_eq!(ctx.generate_operations(), b"0.00 0.00 10.00 10.00 re\n".to_vec());
    }
}
