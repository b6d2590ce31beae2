//! Random gallery client and its typed records.

mod client;
mod types;

pub use client::{GalleryApi, GalleryClient};
pub use types::{GalleryEnvelope, ImageMeta, ImagePage, PageCursor, ThumbnailSize};
