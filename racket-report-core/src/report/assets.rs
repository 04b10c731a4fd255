//! Concurrent acquisition of product images.
//!
//! Every product with an image reference gets its own task; the batch settles
//! before anything is drawn. A failed image only loses that product's picture.

use crate::error::{ReportError, Result};
use crate::graphics::Image;
use crate::report::model::Product;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{debug, warn};

const PROXY_PATH: &str = "/api/v1/proxy/image";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Turns a URL into raw bytes. The HTTP implementation is [`HttpFetcher`];
/// tests plug in their own.
pub trait ImageFetcher: Send + Sync + 'static {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ReportError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let fail = |reason: String| ReportError::Fetch {
            url: url.to_string(),
            reason,
        };

        let response = self.client.get(url).send().await.map_err(|e| fail(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("HTTP {status}")));
        }
        let bytes = response.bytes().await.map_err(|e| fail(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Where a product image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Remote(String),
    DataUri(String),
    File(PathBuf),
}

impl ImageSource {
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        let lower = reference.to_ascii_lowercase();
        let source = if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageSource::Remote(reference.to_string())
        } else if lower.starts_with("data:") {
            ImageSource::DataUri(reference.to_string())
        } else if let Some(path) = reference.strip_prefix("file://") {
            ImageSource::File(PathBuf::from(path))
        } else {
            ImageSource::File(PathBuf::from(reference))
        };
        Some(source)
    }
}

/// URL of the image proxy endpoint for `url`.
pub fn proxy_url(base: &str, url: &str) -> Result<String> {
    let endpoint = format!("{}{PROXY_PATH}", base.trim_end_matches('/'));
    reqwest::Url::parse_with_params(&endpoint, &[("url", url)])
        .map(String::from)
        .map_err(|e| ReportError::Fetch {
            url: url.to_string(),
            reason: format!("invalid proxy URL {endpoint}: {e}"),
        })
}

/// Decodes the payload of a base64 `data:` URI.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let invalid = |reason: &str| ReportError::InvalidImage(format!("data URI: {reason}"));

    let rest = uri
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &uri[5..])
        .ok_or_else(|| invalid("missing data: scheme"))?;
    let (meta, payload) = rest.split_once(',').ok_or_else(|| invalid("missing payload"))?;
    if !meta.split(';').any(|part| part.eq_ignore_ascii_case("base64")) {
        return Err(invalid("only base64 payloads are supported"));
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| invalid(&e.to_string()))
}

/// Product id to embeddable image. Missing entries mean "draw a placeholder".
#[derive(Debug, Clone, Default)]
pub struct ImageCache {
    images: HashMap<u64, Image>,
}

impl ImageCache {
    pub fn get(&self, product_id: u64) -> Option<&Image> {
        self.images.get(&product_id)
    }

    pub fn contains(&self, product_id: u64) -> bool {
        self.images.contains_key(&product_id)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub(crate) fn insert(&mut self, product_id: u64, image: Image) {
        self.images.insert(product_id, image);
    }
}

impl FromIterator<(u64, Image)> for ImageCache {
    fn from_iter<I: IntoIterator<Item = (u64, Image)>>(iter: I) -> Self {
        Self {
            images: iter.into_iter().collect(),
        }
    }
}

pub struct AssetLoader<F> {
    fetcher: Arc<F>,
    proxy_base_url: Option<String>,
}

impl<F: ImageFetcher> AssetLoader<F> {
    pub fn new(fetcher: F, proxy_base_url: Option<String>) -> Self {
        Self::with_shared(Arc::new(fetcher), proxy_base_url)
    }

    pub fn with_shared(fetcher: Arc<F>, proxy_base_url: Option<String>) -> Self {
        let proxy_base_url = proxy_base_url.filter(|base| !base.trim().is_empty());
        Self {
            fetcher,
            proxy_base_url,
        }
    }

    /// Loads every product image concurrently and waits for all of them.
    ///
    /// Never fails as a whole: each failure is logged and leaves that entry out.
    pub async fn load_all(&self, products: &[Product]) -> ImageCache {
        let mut set = JoinSet::new();

        for product in products {
            let Some(source) = product.image_url.as_deref().and_then(ImageSource::parse) else {
                debug!(product_id = product.id, "no image reference");
                continue;
            };
            let id = product.id;
            let fetcher = Arc::clone(&self.fetcher);
            let proxy = self.proxy_base_url.clone();
            set.spawn(async move { (id, load_one(fetcher.as_ref(), proxy.as_deref(), source).await) });
        }

        let mut cache = ImageCache::default();
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((id, Ok(image))) => {
                    debug!(product_id = id, width = image.width(), height = image.height(), "image ready");
                    cache.insert(id, image);
                }
                Ok((id, Err(e))) => warn!(product_id = id, error = %e, "image unavailable, using placeholder"),
                Err(e) => warn!(error = %e, "image task did not complete"),
            }
        }
        cache
    }
}

async fn load_one<F: ImageFetcher>(fetcher: &F, proxy: Option<&str>, source: ImageSource) -> Result<Image> {
    let bytes = match source {
        ImageSource::Remote(url) => {
            let target = match proxy {
                Some(base) => proxy_url(base, &url)?,
                None => url,
            };
            fetcher.fetch(&target).await?
        }
        ImageSource::DataUri(uri) => decode_data_uri(&uri)?,
        ImageSource::File(path) => tokio::fs::read(&path).await?,
    };

    tokio::task::spawn_blocking(move || Image::from_bytes(bytes))
        .await
        .map_err(|e| ReportError::InvalidImage(format!("decoder task failed: {e}")))?
}
