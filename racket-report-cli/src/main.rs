use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use racket_report::{ComparisonDocument, Product, ReportConfig, ReportGenerator};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "racketreport",
    about = "Padel racket comparison reports as PDF",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a comparison document to PDF
    Generate {
        /// Comparison document (JSON)
        input: PathBuf,

        /// Directory the PDF is written to
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// JSON config file
        #[arg(short, long, env = "RACKET_REPORT_CONFIG")]
        config: Option<PathBuf>,

        /// Base URL of the image proxy
        #[arg(long, env = "RACKET_REPORT_PROXY")]
        proxy: Option<String>,

        /// File name prefix, the date is appended
        #[arg(long)]
        prefix: Option<String>,

        /// Text appended to every page footer
        #[arg(long)]
        footer_brand: Option<String>,

        /// Input is `{ items, markdown }` with the table embedded in the text
        #[arg(long)]
        legacy: bool,
    },

    /// Print what a comparison document contains without rendering it
    Inspect {
        /// Comparison document (JSON)
        input: PathBuf,

        /// Input is `{ items, markdown }` with the table embedded in the text
        #[arg(long)]
        legacy: bool,
    },
}

/// The older input shape: products plus one free-text comparison.
#[derive(Deserialize)]
struct LegacyInput {
    #[serde(alias = "rackets")]
    items: Vec<Product>,
    #[serde(alias = "content", alias = "comparison")]
    markdown: String,
}

fn read_document(path: &Path, legacy: bool) -> Result<ComparisonDocument> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    let doc = if legacy {
        let input: LegacyInput =
            serde_json::from_str(&raw).with_context(|| format!("{} is not a legacy comparison", path.display()))?;
        ComparisonDocument::from_legacy_markdown(input.items, &input.markdown)
    } else {
        ComparisonDocument::from_json(&raw).with_context(|| format!("{} is not a comparison document", path.display()))?
    };
    Ok(doc)
}

fn load_config(
    config: Option<&Path>,
    proxy: Option<String>,
    prefix: Option<String>,
    footer_brand: Option<String>,
) -> Result<ReportConfig> {
    let mut config = match config {
        Some(path) => ReportConfig::from_json_file(path)
            .with_context(|| format!("cannot load config {}", path.display()))?,
        None => ReportConfig::default(),
    };

    if let Some(proxy) = proxy {
        config.proxy_base_url = Some(proxy);
    }
    if let Some(prefix) = prefix {
        config.file_prefix = prefix;
    }
    if let Some(brand) = footer_brand {
        config.footer_brand = Some(brand);
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "racket_report=info,racketreport=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output_dir,
            config,
            proxy,
            prefix,
            footer_brand,
            legacy,
        } => {
            let doc = read_document(&input, legacy)?;
            let config = load_config(config.as_deref(), proxy, prefix, footer_brand)?;
            info!(input = %input.display(), "loaded comparison document");

            let artifact = ReportGenerator::new(config)?.generate(&doc).await?;
            let path = artifact
                .save_in(&output_dir)
                .with_context(|| format!("cannot write into {}", output_dir.display()))?;
            println!("{}", path.display());
        }

        Commands::Inspect { input, legacy } => {
            let doc = read_document(&input, legacy)?;

            println!("Comparison document: {}", input.display());
            println!("==========================================");
            println!("Items: {}", doc.items.len());
            for item in &doc.items {
                let brand = if item.brand.trim().is_empty() { "-" } else { item.brand.trim() };
                let image = item.image_url.as_deref().unwrap_or("none");
                println!("  #{} {} ({brand}) image: {image}", item.id, item.name);
            }
            println!("Table rows: {}", doc.comparison_table.len());
            println!("Table columns: {}", doc.table_columns().join(", "));
            println!("Sections: {}", doc.present_sections().join(", "));

            if let Err(e) = doc.validate() {
                bail!("document cannot be rendered: {e}");
            }
        }
    }

    Ok(())
}
