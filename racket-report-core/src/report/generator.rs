//! End-to-end assembly: images, sections, footers and the PDF bytes.

use crate::error::Result;
use crate::report::assets::{AssetLoader, HttpFetcher, ImageCache, ImageFetcher};
use crate::report::config::ReportConfig;
use crate::report::model::ComparisonDocument;
use crate::report::pagination::LayoutCursor;
use crate::report::sections::{
    render_cover, render_table_section, render_technical_analysis, render_text_section,
    stamp_page_numbers,
};
use crate::report::surface::{PdfSurface, Surface};
use crate::report::theme::Theme;
use chrono::{NaiveDate, NaiveTime};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub const EXECUTIVE_SUMMARY: &str = "Executive summary";
pub const COMPARISON_TABLE: &str = "Technical specifications";
pub const TECHNICAL_ANALYSIS: &str = "Technical analysis";
pub const RECOMMENDED_PROFILES: &str = "Recommended profiles";
pub const BIOMECHANICAL: &str = "Biomechanical considerations";
pub const CONCLUSION: &str = "Conclusion";

/// `<prefix>-<YYYY-MM-DD>.pdf`
pub fn file_name(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix}-{}.pdf", date.format("%Y-%m-%d"))
}

/// A finished report, not yet written anywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

impl ReportArtifact {
    /// Writes the PDF into `dir` under its file name and returns the full path.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Draws every section in its fixed order and stamps the footers.
///
/// Returns the final page count. Works on any [`Surface`], so layouts can be
/// inspected without producing PDF bytes.
pub fn render_report<S: Surface + ?Sized>(
    surface: &mut S,
    theme: &Theme,
    doc: &ComparisonDocument,
    images: &ImageCache,
    date: NaiveDate,
    footer_brand: Option<&str>,
) -> usize {
    let top = surface.geometry().top();
    let mut cursor = LayoutCursor::new(top);

    render_cover(surface, theme, &doc.items, images, date, &mut cursor);
    surface.new_page();
    cursor.start_page(top);

    render_text_section(surface, theme, EXECUTIVE_SUMMARY, Some(doc.executive_summary.as_str()), &mut cursor);
    render_table_section(surface, theme, COMPARISON_TABLE, &doc.comparison_table, &mut cursor);
    render_technical_analysis(surface, theme, TECHNICAL_ANALYSIS, &doc.technical_analysis, &mut cursor);
    render_text_section(
        surface,
        theme,
        RECOMMENDED_PROFILES,
        doc.recommended_profiles.as_deref(),
        &mut cursor,
    );
    render_text_section(
        surface,
        theme,
        BIOMECHANICAL,
        doc.biomechanical_considerations.as_deref(),
        &mut cursor,
    );
    render_text_section(surface, theme, CONCLUSION, doc.conclusion.as_deref(), &mut cursor);

    stamp_page_numbers(surface, theme, footer_brand)
}

/// Turns a [`ComparisonDocument`] into a PDF.
///
/// ```no_run
/// use racket_report::{ComparisonDocument, ReportConfig, ReportGenerator};
///
/// # async fn run(json: &str) -> racket_report::Result<()> {
/// let doc = ComparisonDocument::from_json(json)?;
/// let artifact = ReportGenerator::new(ReportConfig::default())?.generate(&doc).await?;
/// artifact.save_in("reports")?;
/// # Ok(())
/// # }
/// ```
pub struct ReportGenerator<F = HttpFetcher> {
    config: ReportConfig,
    theme: Theme,
    fetcher: Arc<F>,
    date: Option<NaiveDate>,
}

impl ReportGenerator<HttpFetcher> {
    pub fn new(config: ReportConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = HttpFetcher::new(config.fetch_timeout())?;
        Ok(Self::build(config, fetcher))
    }
}

impl<F: ImageFetcher> ReportGenerator<F> {
    pub fn with_fetcher(config: ReportConfig, fetcher: F) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, fetcher))
    }

    fn build(config: ReportConfig, fetcher: F) -> Self {
        Self {
            config,
            theme: Theme::default(),
            fetcher: Arc::new(fetcher),
            date: None,
        }
    }

    /// Fixes the date printed on the cover and used in the file name.
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub async fn generate(&self, doc: &ComparisonDocument) -> Result<ReportArtifact> {
        doc.validate()?;
        let date = self.date.unwrap_or_else(|| chrono::Local::now().date_naive());
        info!(
            items = doc.items.len(),
            sections = ?doc.present_sections(),
            "generating comparison report"
        );

        let loader = AssetLoader::with_shared(Arc::clone(&self.fetcher), self.config.proxy_base_url.clone());
        let images = loader.load_all(&doc.items).await;

        let mut surface = PdfSurface::new(&self.config);
        let page_count = render_report(
            &mut surface,
            &self.theme,
            doc,
            &images,
            date,
            self.config.footer_brand.as_deref(),
        );

        let mut document = surface.into_document();
        document.set_title(report_title(doc));
        document.set_subject("Padel racket comparison");
        document.set_keywords(report_keywords(doc));
        if let Some(author) = &self.config.author {
            document.set_author(author.clone());
        }
        document.set_creation_date(date.and_time(NaiveTime::MIN).and_utc());

        let bytes = document.to_bytes()?;
        let artifact = ReportArtifact {
            file_name: file_name(&self.config.file_prefix, date),
            bytes,
            page_count,
        };
        info!(
            file = %artifact.file_name,
            pages = page_count,
            bytes = artifact.bytes.len(),
            images = images.len(),
            "report ready"
        );
        Ok(artifact)
    }
}

fn report_title(doc: &ComparisonDocument) -> String {
    let names: Vec<&str> = doc.items.iter().map(|item| item.name.trim()).collect();
    format!("Comparison: {}", names.join(" vs "))
}

/// "padel, <brand> <name>, ..." with blank brands left out.
fn report_keywords(doc: &ComparisonDocument) -> String {
    std::iter::once("padel".to_string())
        .chain(doc.items.iter().map(|item| {
            let brand = item.brand.trim();
            if brand.is_empty() {
                item.name.trim().to_string()
            } else {
                format!("{brand} {}", item.name.trim())
            }
        }))
        .collect::<Vec<_>>()
        .join(", ")
}
