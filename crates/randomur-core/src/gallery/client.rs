//! Client for the paginated random gallery endpoint.

use crate::config::{GalleryConfig, GalleryDefaults};
use crate::gallery::types::{ErrorEnvelope, GalleryEnvelope, ImagePage, PageCursor};
use crate::network::{decode_body, HttpTransport, ReqwestTransport};
use crate::{RandomurError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source of random image pages, as seen by the fetch coordinator.
#[async_trait]
pub trait GalleryApi: Send + Sync {
    /// Fetch one page of random images.
    ///
    /// Returns `Ok(None)` without touching the network when `page` is past
    /// [`PageCursor::MAX_PAGE`].
    async fn fetch_random_page(&self, page: PageCursor) -> Result<Option<ImagePage>>;
}

/// Gallery client over an [`HttpTransport`].
pub struct GalleryClient<T: HttpTransport = ReqwestTransport> {
    transport: Arc<T>,
    config: GalleryConfig,
}

impl GalleryClient<ReqwestTransport> {
    /// Create a client backed by reqwest.
    pub fn new(config: GalleryConfig) -> Result<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(&config)?;
        Ok(Self::with_transport(Arc::new(transport), config))
    }
}

impl<T: HttpTransport> GalleryClient<T> {
    /// Create a client with a custom transport.
    pub fn with_transport(transport: Arc<T>, config: GalleryConfig) -> Self {
        Self { transport, config }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    /// URL of one page of the random listing.
    pub fn page_url(&self, page: PageCursor) -> String {
        format!(
            "{}/{}/{}",
            self.config.api_base,
            GalleryDefaults::RANDOM_PATH,
            page
        )
    }

    fn parse_page(&self, status: u16, text: Option<String>) -> Result<ImagePage> {
        if !(200..300).contains(&status) {
            let message = match text.as_deref() {
                Some(text) => serde_json::from_str::<ErrorEnvelope>(text)
                    .map(|e| e.message())
                    .unwrap_or_else(|_| text.chars().take(200).collect()),
                None => StatusCode::from_u16(status)
                    .ok()
                    .and_then(|s| s.canonical_reason())
                    .unwrap_or("no response body")
                    .to_string(),
            };
            return Err(RandomurError::Api { status, message });
        }

        let text = text.ok_or_else(|| RandomurError::parse("gallery response had no body"))?;

        let envelope: GalleryEnvelope = serde_json::from_str(&text)?;
        if !envelope.success {
            return Err(RandomurError::Api {
                status: envelope.status.unwrap_or(status),
                message: "gallery reported success=false".to_string(),
            });
        }
        Ok(envelope.into())
    }
}

#[async_trait]
impl<T: HttpTransport> GalleryApi for GalleryClient<T> {
    async fn fetch_random_page(&self, page: PageCursor) -> Result<Option<ImagePage>> {
        if !page.is_in_range() {
            debug!(
                "Page {} is past the last random page ({}), nothing to fetch",
                page,
                PageCursor::MAX_PAGE
            );
            return Ok(None);
        }

        let url = self.page_url(page);
        let headers = [("Authorization".to_string(), self.config.authorization())];

        debug!("Fetching random gallery page {}", page);
        let response = self.transport.get(&url, &headers).await?;
        let status = response.status;
        let text = decode_body(Some(response))?;

        match self.parse_page(status, text) {
            Ok(images) => {
                info!("Fetched {} images from random page {}", images.len(), page);
                Ok(Some(images))
            }
            Err(e) => {
                warn!("Random page {} could not be used: {}", page, e);
                Err(e)
            }
        }
    }
}
