//! Integration tests for concurrent image loading

use racket_report::report::{AssetLoader, ImageFetcher};
use racket_report::{ImageFormat, Product, ReportError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Serves a JPEG for every URL except those containing "unreachable".
struct SlowFetcher {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl SlowFetcher {
    fn new() -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }
}

fn jpeg() -> Vec<u8> {
    vec![
        0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00, 0xFF, 0xC0, 0x00, 0x11, 0x08, 0x00, 0x32, 0x00, 0x64,
        0x03, 0xFF, 0xD9,
    ]
}

impl ImageFetcher for SlowFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if url.contains("unreachable") {
            return Err(ReportError::Fetch {
                url: url.to_string(),
                reason: "connection refused".to_string(),
            });
        }
        Ok(jpeg())
    }
}

fn product(id: u64, url: &str) -> Product {
    Product {
        id,
        name: format!("Racket {id}"),
        brand: "Nox".to_string(),
        image_url: Some(url.to_string()),
    }
}

#[tokio::test]
async fn test_one_unreachable_image_of_three() {
    let loader = AssetLoader::new(SlowFetcher::new(), None);
    let products = vec![
        product(10, "https://cdn.example.com/a.jpg"),
        product(20, "https://unreachable.example.com/b.jpg"),
        product(30, "https://cdn.example.com/c.jpg"),
    ];

    let cache = loader.load_all(&products).await;

    assert_eq!(cache.len(), 2);
    assert!(cache.contains(10));
    assert!(!cache.contains(20));
    assert!(cache.contains(30));

    let image = cache.get(30).unwrap();
    assert_eq!(image.format(), ImageFormat::Jpeg);
    assert_eq!((image.width(), image.height()), (100, 50));
}

#[tokio::test]
async fn test_fetches_run_concurrently() {
    let fetcher = Arc::new(SlowFetcher::new());
    let loader = AssetLoader::with_shared(Arc::clone(&fetcher), None);
    let products: Vec<Product> = (1..=3)
        .map(|id| product(id, &format!("https://cdn.example.com/{id}.jpg")))
        .collect();

    let cache = loader.load_all(&products).await;

    assert_eq!(cache.len(), 3);
    assert!(fetcher.peak.load(Ordering::SeqCst) > 1);
}

#[tokio::test]
async fn test_products_without_images_are_skipped() {
    let fetcher = Arc::new(SlowFetcher::new());
    let loader = AssetLoader::with_shared(Arc::clone(&fetcher), Some(String::new()));
    let mut blank = product(1, "");
    blank.image_url = Some("   ".to_string());
    let mut none = product(2, "");
    none.image_url = None;

    let cache = loader.load_all(&[blank, none]).await;

    assert!(cache.is_empty());
    assert_eq!(fetcher.peak.load(Ordering::SeqCst), 0);
}
