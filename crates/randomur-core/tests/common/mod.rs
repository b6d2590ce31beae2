//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use randomur_core::{
    GalleryClient, GalleryConfig, HttpTransport, ImageMeta, ImagePage, PresentationSurface,
    RandomurError, RawResponse, Result, ThumbnailCache,
};
use reqwest::header::{HeaderValue, CONTENT_ENCODING};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Two-item page as served by the random gallery endpoint.
pub const TWO_ITEM_ENVELOPE: &str = r#"{
  "data": [
    {
      "id": "Zx9aQ1",
      "title": "First from the server",
      "link": "https://i.imgur.com/Zx9aQ1.jpg",
      "type": "image/jpeg",
      "animated": false,
      "width": 800,
      "height": 600,
      "size": 48211,
      "datetime": 1420156800
    },
    {
      "id": "b7KkP0",
      "title": "Second from the server",
      "link": "https://i.imgur.com/b7KkP0.gif",
      "type": "image/gif",
      "animated": true,
      "width": 320,
      "height": 240,
      "size": 912334,
      "mp4": "https://i.imgur.com/b7KkP0.mp4"
    }
  ],
  "success": true,
  "status": 200
}"#;

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

/// What the fixture transport answers with.
#[derive(Clone)]
pub enum Reply {
    Plain(String),
    Gzip(String),
    Status(u16, String),
    TransportFailure,
}

/// Transport that serves a canned reply and records every request.
pub struct FixtureTransport {
    reply: Mutex<Reply>,
    urls: Mutex<Vec<String>>,
}

impl FixtureTransport {
    pub fn new(reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            reply: Mutex::new(reply),
            urls: Mutex::new(Vec::new()),
        })
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.reply.lock().unwrap() = reply;
    }

    pub fn call_count(&self) -> usize {
        self.urls.lock().unwrap().len()
    }

    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for FixtureTransport {
    async fn get(&self, url: &str, _headers: &[(String, String)]) -> Result<RawResponse> {
        self.urls.lock().unwrap().push(url.to_string());
        let reply = self.reply.lock().unwrap().clone();
        match reply {
            Reply::Plain(body) => Ok(RawResponse::new(200, body)),
            Reply::Gzip(body) => {
                let mut response = RawResponse::new(200, gzip(body.as_bytes()));
                response
                    .headers
                    .insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
                Ok(response)
            }
            Reply::Status(status, body) => Ok(RawResponse::new(status, body)),
            Reply::TransportFailure => Err(RandomurError::transport(
                format!("GET {} failed", url),
                "connection reset by peer",
            )),
        }
    }
}

pub fn gallery_client(transport: Arc<FixtureTransport>) -> GalleryClient<FixtureTransport> {
    GalleryClient::with_transport(
        transport,
        GalleryConfig::new("test-client").with_api_base("https://gallery.test"),
    )
}

/// Surface calls, forwarded to the test over a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    ShowOffline,
    HideOffline,
    Loading(bool),
    ItemsReady(Vec<String>),
    FullImage(String),
    CloseFullImage,
    FetchError(String),
}

pub struct ChannelSurface {
    tx: mpsc::UnboundedSender<SurfaceEvent>,
}

impl ChannelSurface {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SurfaceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn emit(&self, event: SurfaceEvent) {
        let _ = self.tx.send(event);
    }
}

impl PresentationSurface for ChannelSurface {
    fn show_offline(&mut self) {
        self.emit(SurfaceEvent::ShowOffline);
    }
    fn hide_offline(&mut self) {
        self.emit(SurfaceEvent::HideOffline);
    }
    fn set_loading_indicator(&mut self, loading: bool) {
        self.emit(SurfaceEvent::Loading(loading));
    }
    fn on_items_ready(&mut self, page: &ImagePage) {
        self.emit(SurfaceEvent::ItemsReady(
            page.iter().map(|i| i.id.clone()).collect(),
        ));
    }
    fn show_full_image(&mut self, image: &ImageMeta) {
        self.emit(SurfaceEvent::FullImage(image.id.clone()));
    }
    fn close_full_image(&mut self) {
        self.emit(SurfaceEvent::CloseFullImage);
    }
    fn show_fetch_error(&mut self, error: &RandomurError) {
        self.emit(SurfaceEvent::FetchError(error.to_string()));
    }
}

#[derive(Default)]
pub struct MemoryCache {
    pub images: Vec<ImageMeta>,
}

impl ThumbnailCache for MemoryCache {
    fn count(&self) -> usize {
        self.images.len()
    }
    fn store(&mut self, page: ImagePage) {
        self.images.extend(page.into_images());
    }
    fn get(&self, id: &str) -> Option<&ImageMeta> {
        self.images.iter().find(|i| i.id == id)
    }
}

/// Wait for the first event matching `pred`, failing after a few seconds.
pub async fn wait_for(
    rx: &mut mpsc::UnboundedReceiver<SurfaceEvent>,
    pred: impl Fn(&SurfaceEvent) -> bool,
) -> SurfaceEvent {
    let fut = async {
        while let Some(event) = rx.recv().await {
            if pred(&event) {
                return event;
            }
        }
        panic!("surface channel closed");
    };
    tokio::time::timeout(std::time::Duration::from_secs(5), fut)
        .await
        .expect("timed out waiting for surface event")
}
