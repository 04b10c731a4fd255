//! Greedy line breaking over mixed-weight runs.

use crate::graphics::Color;
use crate::page::mm;
use crate::report::markup::StyledRun;
use crate::report::pagination::{ensure_space, LayoutCursor};
use crate::report::surface::{PageGeometry, Surface};
use crate::report::theme::Theme;
use crate::text::{split_into_words, FontFamily};

/// Indent of bulleted text from the left edge of the flow box.
const BULLET_INDENT_MM: f64 = 5.0;
const BULLET_RADIUS_MM: f64 = 1.0;
const BULLET_OFFSET_MM: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowOptions {
    pub start_x: f64,
    pub max_width: f64,
    pub bulleted: bool,
    pub font_size: f64,
    pub family: FontFamily,
    pub color: Color,
    pub bullet_color: Color,
}

impl FlowOptions {
    /// Body text spanning the whole content box.
    pub fn paragraph(geometry: &PageGeometry, theme: &Theme) -> Self {
        Self {
            start_x: geometry.margin,
            max_width: geometry.content_width(),
            bulleted: false,
            font_size: theme.sizes.body,
            family: theme.family,
            color: theme.text,
            bullet_color: theme.primary,
        }
    }

    pub fn bullet(geometry: &PageGeometry, theme: &Theme) -> Self {
        Self {
            bulleted: true,
            ..Self::paragraph(geometry, theme)
        }
    }

    /// Baseline-to-baseline distance inside a paragraph.
    pub fn line_advance(&self) -> f64 {
        self.line_height() + mm(2.0)
    }

    /// Space after the last line of a paragraph.
    pub fn paragraph_gap(&self) -> f64 {
        self.line_height() + mm(4.0)
    }

    fn line_height(&self) -> f64 {
        mm(self.font_size * 0.5)
    }
}

/// A measured piece of a laid-out line.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChunk {
    pub text: String,
    pub bold: bool,
    pub width: f64,
}

impl LineChunk {
    pub fn is_whitespace(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowLine {
    pub page: usize,
    /// Baseline
    pub y: f64,
    pub chunks: Vec<LineChunk>,
}

impl FlowLine {
    pub fn width(&self) -> f64 {
        self.chunks.iter().map(|chunk| chunk.width).sum()
    }

    pub fn text(&self) -> String {
        self.chunks.iter().map(|chunk| chunk.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowSummary {
    pub lines: Vec<FlowLine>,
}

/// Lays `runs` out as one paragraph starting at `cursor` and draws it.
///
/// Each chunk is measured right after its weight is selected on the surface.
/// A chunk that overflows a non-empty line starts the next one; overflowing
/// whitespace is dropped instead. Lines are checked against the page bottom
/// before they are drawn.
pub fn layout<S: Surface + ?Sized>(
    surface: &mut S,
    runs: &[StyledRun],
    options: &FlowOptions,
    cursor: &mut LayoutCursor,
) -> FlowSummary {
    let mut summary = FlowSummary::default();
    if runs.iter().all(|run| run.text.is_empty()) {
        return summary;
    }

    let indent = if options.bulleted { mm(BULLET_INDENT_MM) } else { 0.0 };
    let mut writer = LineWriter {
        options,
        start_x: options.start_x + indent,
        max_width: options.max_width - indent,
        buffer: Vec::new(),
        width: 0.0,
    };

    for run in runs {
        let font = options.family.weighted(run.is_bold());
        for chunk in run.chunks() {
            surface.set_font(font, options.font_size);
            let chunk_width = surface.text_width(chunk);

            if !writer.buffer.is_empty() && writer.width + chunk_width > writer.max_width {
                writer.flush(surface, cursor, &mut summary);
                cursor.advance(options.line_advance());
                if chunk.trim().is_empty() {
                    continue;
                }
            }

            writer.buffer.push(LineChunk {
                text: chunk.to_string(),
                bold: run.is_bold(),
                width: chunk_width,
            });
            writer.width += chunk_width;
        }
    }

    if !writer.buffer.is_empty() {
        writer.flush(surface, cursor, &mut summary);
        cursor.advance(options.paragraph_gap());
    }

    summary
}

struct LineWriter<'a> {
    options: &'a FlowOptions,
    start_x: f64,
    max_width: f64,
    buffer: Vec<LineChunk>,
    width: f64,
}

impl LineWriter<'_> {
    fn flush<S: Surface + ?Sized>(&mut self, surface: &mut S, cursor: &mut LayoutCursor, summary: &mut FlowSummary) {
        let options = self.options;
        ensure_space(surface, cursor, options.line_height());

        if options.bulleted && summary.lines.is_empty() {
            surface.fill_circle(
                options.start_x + mm(BULLET_OFFSET_MM),
                cursor.y - mm(options.font_size / 3.0),
                mm(BULLET_RADIUS_MM),
                options.bullet_color,
            );
        }

        let mut x = self.start_x;
        for chunk in &self.buffer {
            if !chunk.is_whitespace() {
                surface.set_font(options.family.weighted(chunk.bold), options.font_size);
                surface.draw_text(&chunk.text, x, cursor.y, options.color);
            }
            x += chunk.width;
        }

        summary.lines.push(FlowLine {
            page: cursor.page(),
            y: cursor.y,
            chunks: std::mem::take(&mut self.buffer),
        });
        self.width = 0.0;
    }
}

/// Greedy wrap of single-style text using the surface's current font.
///
/// Lines carry no leading or trailing whitespace; an overlong word gets a
/// line of its own.
pub fn wrap_plain<S: Surface + ?Sized>(surface: &S, text: &str, max_width: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut width = 0.0;

    for chunk in split_into_words(text.trim()) {
        let chunk_width = surface.text_width(chunk);
        let is_space = chunk.trim().is_empty();

        if !line.is_empty() && width + chunk_width > max_width {
            lines.push(line.trim_end().to_string());
            line.clear();
            width = 0.0;
            if is_space {
                continue;
            }
        }
        line.push_str(chunk);
        width += chunk_width;
    }

    if !line.trim().is_empty() {
        lines.push(line.trim_end().to_string());
    }
    lines
}
