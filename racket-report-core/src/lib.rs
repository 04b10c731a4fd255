//! # racket-report
//!
//! Paginated PDF comparison reports for padel rackets, written from scratch on a
//! small PDF object model.
//!
//! ## Features
//!
//! - **PDF Generation**: Multi-page documents with standard-14 text, vector graphics and JPEG/PNG images
//! - **Rich Text Flow**: Greedy line breaking over mixed regular/bold runs with real font metrics
//! - **Tables**: Column-aligned feature tables that repeat their header after page breaks
//! - **Concurrent Assets**: Product images fetched in parallel, with a placeholder for each failure
//! - **Deterministic Output**: Same document and date, same bytes
//!
//! ## Quick Start
//!
//! ### Drawing a page
//!
//! ```rust
//! use racket_report::{Color, Document, Font, Page, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new();
//! doc.set_title("My PDF");
//!
//! let mut page = Page::a4();
//! page.graphics()
//!     .set_fill_color(Color::rgb8(22, 163, 74))
//!     .circle(300.0, 400.0, 50.0)
//!     .fill()
//!     .text_at(Font::HelveticaBold, 24.0, 50.0, 700.0, "Hello, PDF!");
//!
//! doc.add_page(page);
//! let bytes = doc.to_bytes()?;
//! assert!(bytes.starts_with(b"%PDF-1.7"));
//! # Ok(())
//! # }
//! ```
//!
//! ### Generating a comparison report
//!
//! ```rust,no_run
//! use racket_report::{ComparisonDocument, ReportConfig, ReportGenerator};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let json = std::fs::read_to_string("comparison.json")?;
//! let doc = ComparisonDocument::from_json(&json)?;
//!
//! let generator = ReportGenerator::new(ReportConfig::default())?;
//! let artifact = generator.generate(&doc).await?;
//! println!("{} ({} pages)", artifact.save_in(".")?.display(), artifact.page_count);
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod error;
pub mod graphics;
pub mod objects;
pub mod page;
pub mod report;
pub mod text;
pub mod writer;

// Re-export generation types
pub use document::{Document, DocumentMetadata};
pub use error::{ReportError, Result};
pub use graphics::{Color, GraphicsContext, Image, ImageColorSpace, ImageFormat};
pub use page::{mm, Page, PT_PER_MM};
pub use text::{measure_text, split_into_words, Font, FontFamily, TextAlign};

// Re-export the report pipeline
pub use report::{
    ComparisonDocument, FeatureRow, ImageCache, ImageFetcher, PageSize, Product, RecordingSurface,
    ReportArtifact, ReportConfig, ReportGenerator, Surface, TechnicalSection, Theme,
};

/// Current version of racket-report
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
