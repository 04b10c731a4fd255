//! Comparison report: data model, layout engine and section renderers.
//!
//! Layout coordinates are points measured from the top-left corner of the
//! page; [`PdfSurface`] flips them into PDF user space.

pub mod assets;
pub mod config;
pub mod flow;
pub mod generator;
pub mod markup;
pub mod model;
pub mod pagination;
pub mod sections;
pub mod surface;
pub mod table;
pub mod theme;

pub use assets::{AssetLoader, HttpFetcher, ImageCache, ImageFetcher, ImageSource};
pub use config::{PageSize, ReportConfig, DEFAULT_FILE_PREFIX};
pub use flow::{layout, wrap_plain, FlowLine, FlowOptions, FlowSummary};
pub use generator::{file_name, render_report, ReportArtifact, ReportGenerator};
pub use markup::{parse_blocks, plain_text, strip_markers, tokenize, Block, RunKind, StyledRun};
pub use model::{ComparisonDocument, FeatureRow, Product, TechnicalSection};
pub use pagination::{ensure_space, LayoutCursor};
pub use sections::stamp_page_numbers;
pub use surface::{DrawOp, PageGeometry, PdfSurface, RecordingSurface, Surface};
pub use table::{render_table, TableStyle, TableSummary};
pub use theme::{Theme, Typography, SMASHLY};
