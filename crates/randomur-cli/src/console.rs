//! Terminal rendering of the feed.

use randomur_core::{
    ImageMeta, ImagePage, PresentationSurface, RandomurError, ThumbnailCache, ThumbnailSize,
};

/// Prints grid items and view changes to stdout.
#[derive(Debug, Default)]
pub struct ConsoleSurface {
    printed: usize,
}

impl ConsoleSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationSurface for ConsoleSurface {
    fn show_offline(&mut self) {
        println!("-- offline: waiting for a connection (r to retry) --");
    }

    fn hide_offline(&mut self) {
        println!("-- online --");
    }

    fn set_loading_indicator(&mut self, loading: bool) {
        if loading {
            println!("loading...");
        }
    }

    fn on_items_ready(&mut self, page: &ImagePage) {
        for image in page {
            self.printed += 1;
            let title = if image.title.is_empty() {
                "(untitled)"
            } else {
                image.title.as_str()
            };
            println!(
                "{:>4}  {:<8} {}  {}",
                self.printed,
                image.id,
                title,
                image.thumbnail_url(ThumbnailSize::SmallSquare)
            );
        }
    }

    fn show_full_image(&mut self, image: &ImageMeta) {
        println!("[{}] {}", image.id, image.display_url());
        if let Some(description) = &image.description {
            println!("    {}", description);
        }
        if let Some(uploaded) = image.uploaded_at() {
            println!("    uploaded {}", uploaded.format("%Y-%m-%d %H:%M UTC"));
        }
    }

    fn close_full_image(&mut self) {
        println!("[closed]");
    }

    fn show_fetch_error(&mut self, error: &RandomurError) {
        eprintln!("could not load images: {}", error);
    }
}

/// Keeps delivered metadata in memory, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryThumbnailCache {
    images: Vec<ImageMeta>,
}

impl ThumbnailCache for MemoryThumbnailCache {
    fn count(&self) -> usize {
        self.images.len()
    }

    fn store(&mut self, page: ImagePage) {
        for image in page.into_images() {
            if !self.images.iter().any(|i| i.id == image.id) {
                self.images.push(image);
            }
        }
    }

    fn get(&self, id: &str) -> Option<&ImageMeta> {
        self.images.iter().find(|i| i.id == id)
    }
}
