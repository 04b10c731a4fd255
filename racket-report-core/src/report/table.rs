//! The comparison grid: one row per feature, one column per product.

use crate::graphics::Color;
use crate::page::mm;
use crate::report::flow::wrap_plain;
use crate::report::markup::strip_markers;
use crate::report::model::{FeatureRow, NO_VALUE};
use crate::report::pagination::{ensure_space, LayoutCursor};
use crate::report::surface::Surface;
use crate::report::theme::{Theme, SMASHLY};
use crate::text::{FontFamily, TextAlign};

pub const FEATURE_HEADER: &str = "Feature";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableStyle {
    pub family: FontFamily,
    pub font_size: f64,
    pub padding: f64,
    pub feature_width: f64,
    pub grid_width: f64,
    /// Space left below the table
    pub gap_after: f64,
    pub header_fill: Color,
    pub header_text: Color,
    pub body_fill: Color,
    pub body_text: Color,
    pub feature_fill: Color,
    pub grid: Color,
}

impl TableStyle {
    pub fn from_theme(theme: &Theme) -> Self {
        Self {
            family: theme.family,
            font_size: theme.sizes.table,
            padding: mm(3.0),
            feature_width: mm(40.0),
            grid_width: mm(0.1),
            gap_after: mm(10.0),
            header_fill: theme.primary,
            header_text: theme.on_primary,
            body_fill: Color::white(),
            body_text: theme.secondary,
            feature_fill: theme.feature_fill,
            grid: theme.grid,
        }
    }

    fn line_height(&self) -> f64 {
        self.font_size * 1.15
    }
}

impl Default for TableStyle {
    fn default() -> Self {
        Self::from_theme(&SMASHLY)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSummary {
    pub rows_drawn: usize,
    /// One per page the table touches
    pub header_draws: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowKind {
    Header,
    Body,
}

/// Wrapped cell text and the resulting row height.
struct RowLayout {
    cells: Vec<Vec<String>>,
    height: f64,
}

/// Renders `rows` in the style derived from `theme`.
pub fn render_table<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    rows: &[FeatureRow],
    cursor: &mut LayoutCursor,
) -> TableSummary {
    render_table_with(surface, rows, &TableStyle::from_theme(theme), cursor)
}

/// Renders `rows` starting at `cursor.y` and leaves the cursor below the table.
///
/// Columns come from the first row. Every row is checked against the page
/// bottom before drawing; a row that does not fit moves to a new page, which
/// gets the header row again.
pub fn render_table_with<S: Surface + ?Sized>(
    surface: &mut S,
    rows: &[FeatureRow],
    style: &TableStyle,
    cursor: &mut LayoutCursor,
) -> TableSummary {
    let mut summary = TableSummary::default();
    let Some(first) = rows.first() else {
        return summary;
    };

    let columns: Vec<&str> = first.value_keys().collect();
    let widths = column_widths(surface.geometry().content_width(), style.feature_width, columns.len());
    let header = lay_out_row(surface, &header_cells(&columns), &widths, RowKind::Header, style);

    let mut pending_header = true;
    for row in rows {
        let body = lay_out_row(surface, &body_cells(row, &columns), &widths, RowKind::Body, style);

        let needed = if pending_header { header.height + body.height } else { body.height };
        if ensure_space(surface, cursor, needed) {
            pending_header = true;
        }
        if pending_header {
            draw_row(surface, &header, &widths, RowKind::Header, style, cursor);
            summary.header_draws += 1;
            pending_header = false;
        }

        draw_row(surface, &body, &widths, RowKind::Body, style, cursor);
        summary.rows_drawn += 1;
    }

    cursor.advance(style.gap_after);
    tracing::debug!(
        rows = summary.rows_drawn,
        headers = summary.header_draws,
        "table rendered"
    );
    summary
}

/// Height of the header row plus the first body row, the least a table
/// needs on the page it starts on. Zero for an empty table.
pub fn opening_height<S: Surface + ?Sized>(surface: &mut S, rows: &[FeatureRow], style: &TableStyle) -> f64 {
    let Some(first) = rows.first() else {
        return 0.0;
    };
    let columns: Vec<&str> = first.value_keys().collect();
    let widths = column_widths(surface.geometry().content_width(), style.feature_width, columns.len());
    let header = lay_out_row(surface, &header_cells(&columns), &widths, RowKind::Header, style);
    let body = lay_out_row(surface, &body_cells(first, &columns), &widths, RowKind::Body, style);
    header.height + body.height
}

fn header_cells(columns: &[&str]) -> Vec<String> {
    std::iter::once(FEATURE_HEADER.to_string())
        .chain(columns.iter().map(|key| strip_markers(key)))
        .collect()
}

fn body_cells(row: &FeatureRow, columns: &[&str]) -> Vec<String> {
    std::iter::once(row.feature())
        .chain(columns.iter().map(|key| row.cell(key)))
        .map(strip_markers)
        .collect()
}

fn column_widths(content_width: f64, feature_width: f64, value_columns: usize) -> Vec<f64> {
    if value_columns == 0 {
        return vec![content_width];
    }
    let feature_width = feature_width.min(content_width / 2.0);
    let value_width = (content_width - feature_width) / value_columns as f64;
    std::iter::once(feature_width)
        .chain(std::iter::repeat(value_width).take(value_columns))
        .collect()
}

fn cell_is_bold(kind: RowKind, column: usize) -> bool {
    kind == RowKind::Header || column == 0
}

fn lay_out_row<S: Surface + ?Sized>(
    surface: &mut S,
    texts: &[String],
    widths: &[f64],
    kind: RowKind,
    style: &TableStyle,
) -> RowLayout {
    let inner = |width: f64| (width - 2.0 * style.padding).max(1.0);

    let cells: Vec<Vec<String>> = texts
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(column, (text, width))| {
            surface.set_font(style.family.weighted(cell_is_bold(kind, column)), style.font_size);
            let lines = wrap_plain(surface, text, inner(*width));
            if lines.is_empty() {
                vec![NO_VALUE.to_string()]
            } else {
                lines
            }
        })
        .collect();

    let max_lines = cells.iter().map(Vec::len).max().unwrap_or(1);
    RowLayout {
        height: max_lines as f64 * style.line_height() + 2.0 * style.padding,
        cells,
    }
}

fn draw_row<S: Surface + ?Sized>(
    surface: &mut S,
    row: &RowLayout,
    widths: &[f64],
    kind: RowKind,
    style: &TableStyle,
    cursor: &mut LayoutCursor,
) {
    let top = cursor.y;
    let line_height = style.line_height();
    let mut x = surface.geometry().margin;

    for (column, (lines, width)) in row.cells.iter().zip(widths).enumerate() {
        let (fill, text_color, align) = match kind {
            RowKind::Header => (style.header_fill, style.header_text, TextAlign::Center),
            RowKind::Body if column == 0 => (style.feature_fill, style.body_text, TextAlign::Left),
            RowKind::Body => (style.body_fill, style.body_text, TextAlign::Left),
        };

        surface.fill_rect(x, top, *width, row.height, fill);
        surface.stroke_rect(x, top, *width, row.height, style.grid_width, style.grid);

        surface.set_font(style.family.weighted(cell_is_bold(kind, column)), style.font_size);
        let block_height = lines.len() as f64 * line_height;
        let block_top = top + (row.height - block_height) / 2.0;
        for (i, line) in lines.iter().enumerate() {
            let inner_width = width - 2.0 * style.padding;
            let line_x = x + style.padding + align.offset(surface.text_width(line), inner_width);
            // Baseline sits roughly one cap height below the middle of the line box
            let baseline = block_top + i as f64 * line_height + line_height / 2.0 + style.font_size * 0.35;
            surface.draw_text(line, line_x, baseline, text_color);
        }

        x += width;
    }

    cursor.advance(row.height);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::surface::{DrawOp, PageGeometry, RecordingSurface};
    use crate::text::Font;
    use pretty_assertions::assert_eq;

    fn row(feature: &str, a: &str, b: &str) -> FeatureRow {
        [("feature", feature), ("Vertex 04", a), ("Metalbone", b)]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_empty_rows_draw_nothing() {
        let mut surface = RecordingSurface::a4();
        let mut cursor = LayoutCursor::new(100.0);

        let summary = render_table(&mut surface, &SMASHLY, &[], &mut cursor);

        assert_eq!(summary, TableSummary::default());
        assert!(surface.ops().is_empty());
        assert_eq!(cursor.y, 100.0);
    }

    #[test]
    fn test_header_and_cells() {
        let mut surface = RecordingSurface::a4();
        let mut cursor = LayoutCursor::new(100.0);
        let rows = vec![row("Weight", "**375 g**", "360 g"), row("Shape", "Diamond", "")];

        let summary = render_table(&mut surface, &SMASHLY, &rows, &mut cursor);

        assert_eq!(summary, TableSummary { rows_drawn: 2, header_draws: 1 });
        assert_eq!(
            surface.texts_on(1),
            vec![
                "Feature", "Vertex 04", "Metalbone", "Weight", "375 g", "360 g", "Shape", "Diamond",
                "-"
            ]
        );
        assert!(cursor.y > 100.0);
    }

    #[test]
    fn test_missing_column_renders_no_value() {
        let mut surface = RecordingSurface::a4();
        let mut cursor = LayoutCursor::new(100.0);
        let short: FeatureRow = [("feature", "Core")].into_iter().collect();
        let rows = vec![row("Weight", "375 g", "360 g"), short];

        render_table(&mut surface, &SMASHLY, &rows, &mut cursor);

        let texts = surface.texts_on(1);
        assert_eq!(&texts[texts.len() - 3..], &["Core", "-", "-"]);
    }

    #[test]
    fn test_feature_column_styling() {
        let mut surface = RecordingSurface::a4();
        let mut cursor = LayoutCursor::new(100.0);
        let style = TableStyle::default();

        render_table(&mut surface, &SMASHLY, &[row("Weight", "375 g", "360 g")], &mut cursor);

        let margin = surface.geometry().margin;
        let feature_fills: Vec<Color> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect { x, color, filled: true, .. } if (*x - margin).abs() < 1e-9 => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(feature_fills, vec![style.header_fill, style.feature_fill]);

        let weight_font = surface.ops().iter().find_map(|op| match op {
            DrawOp::Text { text, font, .. } if text == "Weight" => Some(*font),
            _ => None,
        });
        assert_eq!(weight_font, Some(Font::HelveticaBold));
    }

    #[test]
    fn test_header_repeats_after_page_break() {
        let mut surface = RecordingSurface::new(PageGeometry::new(400.0, 300.0, 40.0));
        let mut cursor = LayoutCursor::new(40.0);
        let rows: Vec<FeatureRow> = (0..12)
            .map(|i| row(&format!("Feature {i}"), "a", "b"))
            .collect();

        let summary = render_table(&mut surface, &SMASHLY, &rows, &mut cursor);

        assert_eq!(summary.rows_drawn, 12);
        assert!(surface.page_count() >= 2);
        assert_eq!(summary.header_draws, surface.page_count());
        for page in 1..=surface.page_count() {
            assert_eq!(surface.texts_on(page)[0], "Feature", "page {page}");
        }
    }

    #[test]
    fn test_long_cells_wrap_and_grow_the_row() {
        let mut surface = RecordingSurface::a4();
        let style = TableStyle::default();

        let mut short_cursor = LayoutCursor::new(100.0);
        render_table(&mut surface, &SMASHLY, &[row("Core", "EVA", "EVA")], &mut short_cursor);

        let mut long_cursor = LayoutCursor::new(100.0);
        let long = "EVA Soft Performance with a carbon aluminized frame and reinforced heart";
        render_table(&mut surface, &SMASHLY, &[row("Core", long, "EVA")], &mut long_cursor);

        assert!(long_cursor.y >= short_cursor.y + style.line_height());
    }

    #[test]
    fn test_opening_height_covers_header_and_first_row() {
        let mut surface = RecordingSurface::a4();
        let style = TableStyle::default();
        let rows = vec![row("Weight", "375 g", "360 g"), row("Shape", "Diamond", "Round")];

        let opening = opening_height(&mut surface, &rows, &style);

        let mut cursor = LayoutCursor::new(100.0);
        render_table_with(&mut surface, &rows[..1], &style, &mut cursor);
        let drawn = cursor.y - 100.0 - style.gap_after;
        assert!((opening - drawn).abs() < 1e-9);
        assert_eq!(opening_height(&mut surface, &[], &style), 0.0);
    }

    #[test]
    fn test_column_widths() {
        assert_eq!(column_widths(500.0, 100.0, 2), vec![100.0, 200.0, 200.0]);
        assert_eq!(column_widths(500.0, 100.0, 0), vec![500.0]);
        assert_eq!(column_widths(100.0, 80.0, 1), vec![50.0, 50.0]);
    }
}
