//! Randomur Core - feed acquisition and connectivity state machine for a
//! random image gallery browser.
//!
//! The crate fetches pages of random image metadata from the gallery API,
//! decodes (possibly gzip-compressed) responses into typed records, and hands
//! them to a presentation layer while tracking network connectivity. At most
//! one fetch runs at a time, and a canceled fetch never delivers its result.
//!
//! # Example
//!
//! ```rust,ignore
//! use randomur_core::{
//!     ConnectivityMonitor, FeedRuntime, GalleryClient, GalleryConfig, Startup,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> randomur_core::Result<()> {
//!     let gallery = Arc::new(GalleryClient::new(GalleryConfig::from_env()?)?);
//!     let monitor = ConnectivityMonitor::new(true);
//!     let (runtime, commands) = FeedRuntime::new(gallery, &monitor, surface, cache);
//!
//!     let presenter = runtime.run(Startup::Cold).await;
//!     println!("{:?}", presenter.save_state());
//!     Ok(())
//! }
//! ```

pub mod cancel;
pub mod config;
pub mod connectivity;
pub mod error;
pub mod feed;
pub mod gallery;
pub mod network;

// Re-export commonly used types
pub use cancel::{CancellationToken, CancelledError};
pub use config::{GalleryConfig, GalleryDefaults, NetworkConfig};
pub use connectivity::{
    ConnectivityEvent, ConnectivityMonitor, ConnectivityProbe, ConnectivitySubscription,
    ProbeConfig,
};
pub use error::{FailureKind, RandomurError, Result};
pub use feed::{
    FeedCommand, FeedPresenter, FeedRuntime, FetchCoordinator, FetchId, FetchNotification,
    FetchState, FetchTrigger, PresentationSurface, SavedViewState, Startup, ThumbnailCache,
    ViewMode, ViewState,
};
pub use gallery::{GalleryApi, GalleryClient, ImageMeta, ImagePage, PageCursor, ThumbnailSize};
pub use network::{HttpTransport, RawResponse, ReqwestTransport};
