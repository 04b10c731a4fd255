//! One renderer per document section, plus the footer pass.

use crate::page::mm;
use crate::report::assets::ImageCache;
use crate::report::flow::{layout, wrap_plain, FlowOptions};
use crate::report::markup::{parse_blocks, Block};
use crate::report::model::{Product, TechnicalSection};
use crate::report::pagination::{ensure_space, LayoutCursor};
use crate::report::surface::Surface;
use crate::report::table::{opening_height, render_table, TableStyle};
use crate::report::theme::Theme;
use crate::report::model::FeatureRow;
use chrono::NaiveDate;

pub const COVER_TITLE: &str = "COMPARISON";
pub const COVER_SUBTITLE: &str = "EQUIPMENT AND PERFORMANCE ANALYSIS";

/// Cover band height; the white body starts below it.
const BAND_MM: f64 = 80.0;
const CARDS_TOP_MM: f64 = 95.0;
const CARD_GAP_MM: f64 = 5.0;
const CARD_IMAGE_MM: f64 = 60.0;
const CARD_NAME_OFFSET_MM: f64 = 65.0;
const CARD_NAME_LINE_MM: f64 = 5.0;
const PLACEHOLDER_RADIUS_MM: f64 = 20.0;
const BADGE_RADIUS_MM: f64 = 8.0;
const FOOTER_OFFSET_MM: f64 = 10.0;
const HEADING_ADVANCE_MM: f64 = 15.0;
const SUBHEADING_GAP_MM: f64 = 5.0;
const SUBHEADING_ADVANCE_MM: f64 = 8.0;
/// Space a paragraph or bullet asks for before it starts.
const BLOCK_RESERVE_MM: f64 = 20.0;

/// Draws the cover: brand band, titles and one card per product.
pub fn render_cover<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    products: &[Product],
    images: &ImageCache,
    date: NaiveDate,
    cursor: &mut LayoutCursor,
) {
    let geometry = surface.geometry();
    let sizes = &theme.sizes;

    surface.fill_rect(0.0, 0.0, geometry.width, geometry.height, theme.primary);
    surface.fill_rect(
        0.0,
        mm(BAND_MM),
        geometry.width,
        geometry.height - mm(BAND_MM),
        theme.on_primary,
    );

    surface.set_font(theme.family.bold(), sizes.cover_title);
    surface.draw_text(COVER_TITLE, geometry.margin, mm(40.0), theme.on_primary);
    surface.set_font(theme.family.regular(), sizes.cover_subtitle);
    surface.draw_text(COVER_SUBTITLE, geometry.margin, mm(50.0), theme.on_primary);
    surface.set_font(theme.family.regular(), sizes.cover_date);
    surface.draw_text(
        &format!("Generated on {}", date.format("%d %B %Y")),
        geometry.margin,
        mm(65.0),
        theme.on_primary,
    );

    cursor.y = cursor.y.max(mm(CARDS_TOP_MM));
    let top = cursor.y;

    if !products.is_empty() {
        let count = products.len() as f64;
        let card_width = geometry.content_width() / count - mm(CARD_GAP_MM);
        for (index, product) in products.iter().enumerate() {
            let x = geometry.margin + (card_width + mm(CARD_GAP_MM)) * index as f64;
            render_card(surface, theme, product, images, index, x, top, card_width);
        }
    }

    if products.len() == 2 {
        let center = geometry.width / 2.0;
        let cy = top + mm(CARD_IMAGE_MM / 2.0);
        surface.fill_circle(center, cy, mm(BADGE_RADIUS_MM), theme.primary);
        surface.set_font(theme.family.bold(), sizes.badge);
        let width = surface.text_width("VS");
        surface.draw_text("VS", center - width / 2.0, cy + sizes.badge * 0.35, theme.on_primary);
    }

    cursor.advance(mm(100.0));
}

#[allow(clippy::too_many_arguments)]
fn render_card<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    product: &Product,
    images: &ImageCache,
    index: usize,
    x: f64,
    top: f64,
    card_width: f64,
) {
    let center = x + card_width / 2.0;

    let drawn = match images.get(product.id) {
        Some(image) => {
            let mut height = mm(CARD_IMAGE_MM);
            let mut width = image.aspect_ratio() * height;
            if width > card_width {
                width = card_width;
                height = width / image.aspect_ratio();
            }
            let name = format!("Im{}", index + 1);
            match surface.draw_image(&name, image, center - width / 2.0, top, width, height) {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(product_id = product.id, error = %e, "could not place image");
                    false
                }
            }
        }
        None => false,
    };
    if !drawn {
        surface.fill_circle(
            center,
            top + mm(CARD_IMAGE_MM / 2.0),
            mm(PLACEHOLDER_RADIUS_MM),
            theme.placeholder,
        );
    }

    surface.set_font(theme.family.bold(), theme.sizes.card_name);
    let lines = wrap_plain(surface, &product.name, card_width);
    let mut baseline = top + mm(CARD_NAME_OFFSET_MM);
    for line in &lines {
        let width = surface.text_width(line);
        surface.draw_text(line, center - width / 2.0, baseline, theme.secondary);
        baseline += mm(CARD_NAME_LINE_MM);
    }

    let brand = product.brand.trim().to_uppercase();
    if !brand.is_empty() {
        surface.set_font(theme.family.regular(), theme.sizes.card_brand);
        let width = surface.text_width(&brand);
        let y = top + mm(CARD_NAME_OFFSET_MM) + lines.len() as f64 * mm(CARD_NAME_LINE_MM) + mm(3.0);
        surface.draw_text(&brand, center - width / 2.0, y, theme.muted);
    }
}

/// Space the first block of a body needs below whatever precedes it.
fn block_need(block: Option<&Block>) -> f64 {
    match block {
        Some(Block::Heading { .. }) => mm(SUBHEADING_GAP_MM + SUBHEADING_ADVANCE_MM + BLOCK_RESERVE_MM),
        Some(_) => mm(BLOCK_RESERVE_MM),
        None => 0.0,
    }
}

/// Section heading: upper-cased, primary color, short accent rule below.
///
/// `first_need` is what the content right after the heading asks for; it is
/// reserved together with the heading so the two always share a page.
pub fn render_heading<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    title: &str,
    first_need: f64,
    cursor: &mut LayoutCursor,
) {
    ensure_space(surface, cursor, mm(HEADING_ADVANCE_MM) + first_need.max(mm(5.0)));

    let margin = surface.geometry().margin;
    surface.set_font(theme.family.bold(), theme.sizes.heading);
    surface.draw_text(&title.to_uppercase(), margin, cursor.y, theme.primary);
    surface.line(
        (margin, cursor.y + mm(2.0)),
        (margin + mm(20.0), cursor.y + mm(2.0)),
        mm(0.5),
        theme.primary,
    );
    cursor.advance(mm(HEADING_ADVANCE_MM));
}

pub fn render_subheading<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    title: &str,
    first_need: f64,
    cursor: &mut LayoutCursor,
) {
    cursor.advance(mm(SUBHEADING_GAP_MM));
    ensure_space(surface, cursor, mm(SUBHEADING_ADVANCE_MM) + first_need.max(mm(7.0)));

    let margin = surface.geometry().margin;
    surface.set_font(theme.family.bold(), theme.sizes.subheading);
    surface.draw_text(title, margin, cursor.y, theme.secondary);
    cursor.advance(mm(SUBHEADING_ADVANCE_MM));
}

/// Renders parsed rich-text blocks in order.
pub fn render_rich_text<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    blocks: &[Block],
    cursor: &mut LayoutCursor,
) {
    let geometry = surface.geometry();
    let paragraph = FlowOptions::paragraph(&geometry, theme);
    let bullet = FlowOptions::bullet(&geometry, theme);

    for (i, block) in blocks.iter().enumerate() {
        let next_need = block_need(blocks.get(i + 1));
        match block {
            Block::Heading { level: 1, text } => render_heading(surface, theme, text, next_need, cursor),
            Block::Heading { text, .. } => render_subheading(surface, theme, text, next_need, cursor),
            Block::Bullet(runs) => {
                ensure_space(surface, cursor, mm(BLOCK_RESERVE_MM));
                layout(surface, runs, &bullet, cursor);
            }
            Block::Paragraph(runs) => {
                ensure_space(surface, cursor, mm(BLOCK_RESERVE_MM));
                layout(surface, runs, &paragraph, cursor);
            }
        }
    }
}

/// Heading plus body; nothing at all when the body has no renderable block.
pub fn render_text_section<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    title: &str,
    body: Option<&str>,
    cursor: &mut LayoutCursor,
) -> bool {
    let blocks = body.map(parse_blocks).unwrap_or_default();
    if blocks.is_empty() {
        tracing::debug!(section = title, "skipping empty section");
        return false;
    }

    tracing::debug!(section = title, page = cursor.page(), "rendering section");
    render_heading(surface, theme, title, block_need(blocks.first()), cursor);
    render_rich_text(surface, theme, &blocks, cursor);
    true
}

pub fn render_table_section<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    title: &str,
    rows: &[FeatureRow],
    cursor: &mut LayoutCursor,
) -> bool {
    if rows.is_empty() {
        tracing::debug!(section = title, "skipping empty section");
        return false;
    }

    tracing::debug!(section = title, page = cursor.page(), rows = rows.len(), "rendering section");
    let opening = opening_height(surface, rows, &TableStyle::from_theme(theme));
    render_heading(surface, theme, title, opening, cursor);
    render_table(surface, theme, rows, cursor);
    true
}

/// One heading for the whole list, then each subsection's title and body.
pub fn render_technical_analysis<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    title: &str,
    sections: &[TechnicalSection],
    cursor: &mut LayoutCursor,
) -> bool {
    let present: Vec<(&str, Vec<Block>)> = sections
        .iter()
        .filter(|section| !section.is_empty())
        .map(|section| (section.title.trim(), parse_blocks(&section.content)))
        .collect();
    let Some((first_title, first_blocks)) = present.first() else {
        tracing::debug!(section = title, "skipping empty section");
        return false;
    };

    let first_need = if first_title.is_empty() {
        block_need(first_blocks.first())
    } else {
        mm(SUBHEADING_GAP_MM + SUBHEADING_ADVANCE_MM) + block_need(first_blocks.first()).max(mm(7.0))
    };

    tracing::debug!(section = title, page = cursor.page(), "rendering section");
    render_heading(surface, theme, title, first_need, cursor);
    for (subtitle, blocks) in &present {
        if !subtitle.is_empty() {
            render_subheading(surface, theme, subtitle, block_need(blocks.first()), cursor);
        }
        render_rich_text(surface, theme, blocks, cursor);
    }
    true
}

/// Stamps "Page i of N" on every page. Must run after all content exists.
pub fn stamp_page_numbers<S: Surface + ?Sized>(surface: &mut S, theme: &Theme, brand: Option<&str>) -> usize {
    let total = surface.page_count();
    let geometry = surface.geometry();
    let suffix = brand
        .map(str::trim)
        .filter(|brand| !brand.is_empty())
        .map(|brand| format!(" - {brand}"))
        .unwrap_or_default();

    // Inside the bottom margin, never closer than half of it to the body
    let footer_y = geometry.height - mm(FOOTER_OFFSET_MM).min(geometry.margin / 2.0);

    for page in 1..=total {
        if !surface.go_to_page(page) {
            continue;
        }
        let footer = format!("Page {page} of {total}{suffix}");
        surface.set_font(theme.family.regular(), theme.sizes.footer);
        let width = surface.text_width(&footer);
        surface.draw_text(&footer, (geometry.width - width) / 2.0, footer_y, theme.footer);
    }
    total
}
