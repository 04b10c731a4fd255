//! End-to-end tests for report generation
//!
//! Layout checks run against `RecordingSurface`; the full pipeline runs with a
//! stub fetcher so no network is needed.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use racket_report::report::{render_report, DrawOp, ImageCache, SMASHLY};
use racket_report::{
    ComparisonDocument, ImageFetcher, RecordingSurface, ReportConfig, ReportError, ReportGenerator,
    Result, Surface,
};
use std::collections::HashSet;

const FIXTURE: &str = r###"{
  "items": [
    {"id": 1, "name": "Bullpadel Vertex 04", "brand": "Bullpadel", "imageUrl": "https://cdn.example.com/vertex.png"},
    {"id": 2, "name": "Adidas Metalbone 3.3", "brand": "Adidas", "imageUrl": "https://cdn.example.com/missing.png"}
  ],
  "executiveSummary": "The **Vertex 04** favours control while the **Metalbone** rewards aggressive players.",
  "comparisonTable": [
    {"feature": "Weight", "Vertex 04": "360-375 g", "Metalbone 3.3": "345-360 g"},
    {"feature": "Shape", "Vertex 04": "Diamond", "Metalbone 3.3": "Diamond"},
    {"feature": "Core", "Vertex 04": "MultiEva", "Metalbone 3.3": null},
    {"feature": "Carbon face", "Vertex 04": true, "Metalbone 3.3": false}
  ],
  "technicalAnalysis": [
    {"title": "Power", "content": "Both rackets are **explosive** at the net.\n- Vertex: stiffer face\n- Metalbone: weight-adjustable"},
    {"title": "Control", "content": "The Vertex has the larger sweet spot."}
  ],
  "recommendedProfiles": "## Advanced players\nLooking for a **smash** finisher.",
  "biomechanicalConsiderations": "Heavier head balance loads the elbow.",
  "conclusion": "Pick the Vertex for control, the Metalbone for power."
}"###;

struct StubFetcher;

impl ImageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if url.contains("missing") {
            return Err(ReportError::Fetch {
                url: url.to_string(),
                reason: "HTTP 404 Not Found".to_string(),
            });
        }
        let mut out = std::io::Cursor::new(Vec::new());
        image::RgbaImage::from_pixel(40, 80, image::Rgba([200, 30, 30, 255]))
            .write_to(&mut out, image::ImageFormat::Png)
            .map_err(|e| ReportError::InvalidImage(e.to_string()))?;
        Ok(out.into_inner())
    }
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn fixture() -> ComparisonDocument {
    ComparisonDocument::from_json(FIXTURE).unwrap()
}

#[test]
fn test_fixture_parses() {
    let doc = fixture();
    doc.validate().unwrap();
    assert_eq!(doc.items.len(), 2);
    assert_eq!(doc.table_columns(), vec!["Vertex 04", "Metalbone 3.3"]);
    assert_eq!(
        doc.present_sections(),
        vec![
            "cover",
            "executive summary",
            "comparison table",
            "technical analysis",
            "recommended profiles",
            "biomechanical considerations",
            "conclusion"
        ]
    );
}

#[test]
fn test_all_sections_render_in_order() {
    let mut surface = RecordingSurface::a4();
    let pages = render_report(&mut surface, &SMASHLY, &fixture(), &ImageCache::default(), date(), None);

    let texts: Vec<&str> = surface.texts().into_iter().map(|(_, text)| text).collect();
    let position = |needle: &str| {
        texts
            .iter()
            .position(|text| *text == needle)
            .unwrap_or_else(|| panic!("missing {needle}"))
    };

    let order = [
        "COMPARISON",
        "EXECUTIVE SUMMARY",
        "TECHNICAL SPECIFICATIONS",
        "TECHNICAL ANALYSIS",
        "RECOMMENDED PROFILES",
        "BIOMECHANICAL CONSIDERATIONS",
        "CONCLUSION",
    ];
    let positions: Vec<usize> = order.iter().map(|heading| position(*heading)).collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    // The cover is a page of its own
    assert!(surface.texts_on(1).contains(&"COMPARISON"));
    assert!(!surface.texts_on(1).contains(&"EXECUTIVE SUMMARY"));
    assert!(pages >= 2);
}

#[test]
fn test_table_cells_and_missing_values() {
    let mut surface = RecordingSurface::a4();
    render_report(&mut surface, &SMASHLY, &fixture(), &ImageCache::default(), date(), None);

    for cell in ["Feature", "Vertex 04", "Metalbone 3.3", "360-375 g", "MultiEva", "Yes", "No"] {
        assert!(surface.has_text(cell), "missing cell {cell}");
    }
    assert!(surface.has_text("-"));
}

#[test]
fn test_footer_on_every_page() {
    let mut surface = RecordingSurface::a4();
    let pages = render_report(
        &mut surface,
        &SMASHLY,
        &fixture(),
        &ImageCache::default(),
        date(),
        Some("Smashly.app"),
    );

    assert_eq!(pages, surface.page_count());
    for page in 1..=pages {
        let expected = format!("Page {page} of {pages} - Smashly.app");
        assert!(
            surface.texts_on(page).contains(&expected.as_str()),
            "page {page} lacks its footer"
        );
    }
}

#[test]
fn test_long_table_repeats_header_on_each_page() {
    let mut doc = fixture();
    let row = doc.comparison_table[0].clone();
    doc.comparison_table = std::iter::repeat(row).take(80).collect();
    doc.technical_analysis.clear();
    doc.recommended_profiles = None;
    doc.biomechanical_considerations = None;
    doc.conclusion = None;
    doc.executive_summary.clear();

    let mut surface = RecordingSurface::a4();
    let pages = render_report(&mut surface, &SMASHLY, &doc, &ImageCache::default(), date(), None);

    assert!(pages > 2, "80 rows should span several pages");
    for page in 2..=pages {
        assert_eq!(
            surface.texts_on(page).iter().filter(|text| **text == "Feature").count(),
            1,
            "page {page} needs exactly one header"
        );
    }
}

#[test]
fn test_content_stays_inside_margins() {
    let mut doc = fixture();
    doc.conclusion = Some("Long conclusion sentence with many words. ".repeat(200));

    let mut surface = RecordingSurface::a4();
    render_report(&mut surface, &SMASHLY, &doc, &ImageCache::default(), date(), None);

    let geometry = surface.geometry();
    let body_pages: HashSet<usize> = (2..=surface.page_count()).collect();
    for op in surface.ops() {
        if let DrawOp::Text { page, text, y, .. } = op {
            if body_pages.contains(page) && !text.starts_with("Page ") {
                assert!(*y <= geometry.bottom() + 1e-6, "{text} at {y} below the margin");
            }
        }
    }
}

#[tokio::test]
async fn test_generate_with_one_failed_image() {
    let generator = ReportGenerator::with_fetcher(
        ReportConfig {
            footer_brand: Some("Smashly.app".to_string()),
            ..ReportConfig::default()
        },
        StubFetcher,
    )
    .unwrap()
    .with_date(date());

    let artifact = generator.generate(&fixture()).await.unwrap();

    assert_eq!(artifact.file_name, "Smashly-Comparativa-2025-03-14.pdf");
    let text = String::from_utf8_lossy(&artifact.bytes);
    assert!(text.starts_with("%PDF-1.7"));
    assert!(text.trim_end().ends_with("%%EOF"));
    // one product image made it in, the other got a placeholder
    assert_eq!(text.matches("/Subtype /Image").count(), 1);
    assert!(text.contains(&format!("/Count {}", artifact.page_count)));
}

#[tokio::test]
async fn test_generation_is_deterministic() {
    let generator = ReportGenerator::with_fetcher(ReportConfig::default(), StubFetcher)
        .unwrap()
        .with_date(date());

    let first = generator.generate(&fixture()).await.unwrap();
    let second = generator.generate(&fixture()).await.unwrap();

    assert_eq!(first.bytes, second.bytes);
}

#[tokio::test]
async fn test_generate_rejects_four_items() {
    let mut doc = fixture();
    let extra = doc.items[0].clone();
    doc.items.push(extra.clone());
    doc.items.push(extra);

    let generator = ReportGenerator::with_fetcher(ReportConfig::default(), StubFetcher).unwrap();
    let err = generator.generate(&doc).await.unwrap_err();
    assert!(matches!(err, ReportError::InvalidDocument(_)));
}
