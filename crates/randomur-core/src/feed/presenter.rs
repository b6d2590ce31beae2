//! Presentation state machine.
//!
//! Chooses between the content view and the offline view, owns the loading
//! flag, and turns connectivity changes, user actions and fetch results into
//! calls on the presentation surface and the fetch coordinator.

use crate::feed::coordinator::FetchCoordinator;
use crate::feed::state::{
    FetchCompletion, FetchNotification, FetchTrigger, SavedViewState, ViewMode, ViewState,
};
use crate::gallery::{ImageMeta, ImagePage, PageCursor};
use crate::RandomurError;
use tracing::{debug, info, warn};

/// What the feed draws on.
pub trait PresentationSurface {
    fn show_offline(&mut self);
    fn hide_offline(&mut self);
    fn set_loading_indicator(&mut self, loading: bool);
    fn on_items_ready(&mut self, page: &ImagePage);
    fn show_full_image(&mut self, image: &ImageMeta);
    fn close_full_image(&mut self);
    /// Show a transient, non-blocking error for a failed refresh.
    fn show_fetch_error(&mut self, error: &RandomurError);
}

/// Where fetched pages end up.
pub trait ThumbnailCache {
    fn count(&self) -> usize;
    fn store(&mut self, page: ImagePage);
    fn get(&self, id: &str) -> Option<&ImageMeta>;
}

pub struct FeedPresenter<S, K> {
    coordinator: FetchCoordinator,
    surface: S,
    cache: K,
    view: ViewState,
    is_connected: bool,
    next_page: PageCursor,
    open_image: Option<String>,
}

impl<S: PresentationSurface, K: ThumbnailCache> FeedPresenter<S, K> {
    pub fn new(coordinator: FetchCoordinator, surface: S, cache: K) -> Self {
        Self {
            coordinator,
            surface,
            cache,
            view: ViewState::default(),
            is_connected: true,
            next_page: PageCursor::first(),
            open_image: None,
        }
    }

    pub fn view_state(&self) -> ViewState {
        self.view
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn coordinator(&self) -> &FetchCoordinator {
        &self.coordinator
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn cache(&self) -> &K {
        &self.cache
    }

    /// Id of the image shown full size, if any.
    pub fn open_image(&self) -> Option<&str> {
        self.open_image.as_deref()
    }

    /// First start: content view, loading, and an immediate refresh. When
    /// starting disconnected the offline path runs right after.
    pub fn cold_start(&mut self, connected: bool) {
        info!("Cold start (connected: {})", connected);
        self.view = ViewState::default();
        self.surface.set_loading_indicator(true);
        self.refresh();
        if !connected {
            self.on_connectivity_changed(false);
        }
    }

    /// Recreate from saved flags. No fetch is started.
    pub fn restore(&mut self, saved: SavedViewState) {
        info!(
            "Restoring view state (connected: {}, loading: {})",
            saved.is_connected, saved.is_loading
        );
        self.is_connected = saved.is_connected;
        self.view.is_loading = saved.is_loading;
        self.surface.set_loading_indicator(saved.is_loading);

        if saved.is_connected {
            self.view.mode = ViewMode::ShowingContent;
        } else {
            self.view.mode = ViewMode::ShowingOffline;
            self.surface.show_offline();
        }
    }

    pub fn save_state(&self) -> SavedViewState {
        SavedViewState {
            is_connected: self.is_connected,
            is_loading: self.view.is_loading,
        }
    }

    /// React to a connectivity transition.
    pub fn on_connectivity_changed(&mut self, connected: bool) {
        if !connected {
            self.is_connected = false;
            self.show_offline_view();
            return;
        }

        let was_offline = self.view.mode == ViewMode::ShowingOffline;
        self.is_connected = true;
        if !was_offline {
            return;
        }

        self.hide_offline_view();
        // Started without a network, nothing to show yet.
        if self.cache.count() == 0 {
            debug!("Reconnected with an empty cache, fetching the first page");
            self.start(PageCursor::first(), FetchTrigger::Reconnect);
        }
    }

    /// User-initiated refresh: restart from the first page.
    pub fn refresh(&mut self) {
        self.set_loading(true);
        self.coordinator.cancel();
        self.next_page = PageCursor::first();
        self.start(PageCursor::first(), FetchTrigger::UserRefresh);
        self.hide_offline_view();
    }

    /// Fetch the next page when idle and online.
    ///
    /// Returns whether a fetch was started.
    pub fn load_more(&mut self) -> bool {
        if self.view.mode == ViewMode::ShowingOffline || self.coordinator.is_running() {
            return false;
        }
        if !self.next_page.is_in_range() {
            debug!("All {} random pages loaded", PageCursor::MAX_PAGE);
            return false;
        }
        self.start(self.next_page, FetchTrigger::LoadMore)
    }

    /// Apply a result from the completion channel.
    pub fn on_fetch_completed(&mut self, completion: FetchCompletion) {
        let fetched = completion.page();
        let Some(notification) = self.coordinator.settle(completion) else {
            return;
        };

        match notification {
            FetchNotification::LoadingFinished(page) => {
                // Only a delivered page moves the cursor.
                self.next_page = fetched.next();
                if let Some(page) = page {
                    self.surface.on_items_ready(&page);
                    self.cache.store(page);
                }
                self.set_loading(false);
            }
            FetchNotification::NetworkInterruption(e) => {
                // The transfer failed even if the monitor has not noticed yet.
                info!("Network interruption: {}", e);
                self.set_loading(false);
                self.on_connectivity_changed(false);
            }
            FetchNotification::Failed(e) => {
                self.surface.show_fetch_error(&e);
                self.set_loading(false);
            }
        }
    }

    /// Show a cached image full size. Refused while offline.
    pub fn open_full_image(&mut self, id: &str) -> bool {
        if self.view.mode == ViewMode::ShowingOffline {
            return false;
        }
        let Some(image) = self.cache.get(id) else {
            warn!("Image {} is not in the cache", id);
            return false;
        };
        self.surface.show_full_image(image);
        self.open_image = Some(id.to_string());
        true
    }

    pub fn close_full_image(&mut self) {
        if self.open_image.take().is_some() {
            self.surface.close_full_image();
        }
    }

    /// Cancel outstanding work before the owner goes away.
    pub fn teardown(&mut self) {
        self.coordinator.cancel();
    }

    fn start(&mut self, page: PageCursor, trigger: FetchTrigger) -> bool {
        match self.coordinator.start_fetch(page, trigger) {
            Ok(_) => {
                self.set_loading(true);
                true
            }
            Err(e) => {
                debug!("Fetch of page {} not started: {}", page, e);
                false
            }
        }
    }

    fn set_loading(&mut self, loading: bool) {
        self.view.is_loading = loading;
        self.surface.set_loading_indicator(loading);
    }

    fn show_offline_view(&mut self) {
        self.coordinator.cancel();
        self.close_full_image();
        if self.view.mode != ViewMode::ShowingOffline {
            self.view.mode = ViewMode::ShowingOffline;
            self.surface.show_offline();
        }
    }

    fn hide_offline_view(&mut self) {
        if self.view.mode != ViewMode::ShowingContent {
            self.view.mode = ViewMode::ShowingContent;
            self.surface.hide_offline();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::state::{FetchId, FetchState};
    use crate::gallery::GalleryApi;
    use crate::Result;
    use async_trait::async_trait;
    use std::sync::Arc;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        ShowOffline,
        HideOffline,
        Loading(bool),
        Items(usize),
        FullImage(String),
        CloseFullImage,
        Error,
    }

    #[derive(Default)]
    struct RecordingSurface {
        events: Vec<Event>,
    }

    impl PresentationSurface for RecordingSurface {
        fn show_offline(&mut self) {
            self.events.push(Event::ShowOffline);
        }
        fn hide_offline(&mut self) {
            self.events.push(Event::HideOffline);
        }
        fn set_loading_indicator(&mut self, loading: bool) {
            self.events.push(Event::Loading(loading));
        }
        fn on_items_ready(&mut self, page: &ImagePage) {
            self.events.push(Event::Items(page.len()));
        }
        fn show_full_image(&mut self, image: &ImageMeta) {
            self.events.push(Event::FullImage(image.id.clone()));
        }
        fn close_full_image(&mut self) {
            self.events.push(Event::CloseFullImage);
        }
        fn show_fetch_error(&mut self, _error: &RandomurError) {
            self.events.push(Event::Error);
        }
    }

    #[derive(Default)]
    struct VecCache {
        images: Vec<ImageMeta>,
    }

    impl ThumbnailCache for VecCache {
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

    struct PendingGallery;

    #[async_trait]
    impl GalleryApi for PendingGallery {
        async fn fetch_random_page(&self, _page: PageCursor) -> Result<Option<ImagePage>> {
            std::future::pending().await
        }
    }

    fn presenter() -> FeedPresenter<RecordingSurface, VecCache> {
        let (coordinator, _rx) = FetchCoordinator::new(Arc::new(PendingGallery));
        FeedPresenter::new(coordinator, RecordingSurface::default(), VecCache::default())
    }

    fn image(id: &str) -> ImageMeta {
        serde_json::from_value(serde_json::json!({ "id": id, "title": id })).unwrap()
    }

    fn complete(id: FetchId, outcome: Result<Option<ImagePage>>) -> FetchCompletion {
        FetchCompletion {
            id,
            page: PageCursor::first(),
            outcome,
        }
    }

    fn running_id(p: &FeedPresenter<RecordingSurface, VecCache>) -> FetchId {
        p.coordinator().current_id().expect("a fetch should be running")
    }

    #[tokio::test]
    async fn test_cold_start_refreshes() {
        let mut p = presenter();
        p.cold_start(true);
        assert_eq!(p.view_state(), ViewState::default());
        assert_eq!(
            p.coordinator().state(),
            &FetchState::Running {
                id: FetchId(1),
                page: PageCursor::first()
            }
        );
    }

    #[tokio::test]
    async fn test_cold_start_offline_cancels_fetch() {
        let mut p = presenter();
        p.cold_start(false);
        assert_eq!(p.view_state().mode, ViewMode::ShowingOffline);
        assert!(p.view_state().is_loading);
        assert_eq!(p.coordinator().state(), &FetchState::Canceled { id: FetchId(1) });
        assert!(p.surface().events.contains(&Event::ShowOffline));
    }

    #[tokio::test]
    async fn test_reconnect_with_empty_cache_fetches_once() {
        let mut p = presenter();
        p.restore(SavedViewState {
            is_connected: false,
            is_loading: false,
        });
        assert_eq!(p.coordinator().state(), &FetchState::Idle);

        p.on_connectivity_changed(true);
        assert_eq!(
            p.coordinator().state(),
            &FetchState::Running {
                id: FetchId(1),
                page: PageCursor::first()
            }
        );
        assert_eq!(p.view_state().mode, ViewMode::ShowingContent);
        assert!(p.view_state().is_loading);

        // Already showing content: a repeated "connected" starts nothing.
        p.on_connectivity_changed(true);
        assert_eq!(running_id(&p), FetchId(1));
    }

    #[tokio::test]
    async fn test_reconnect_with_cached_items_does_not_fetch() {
        let mut p = presenter();
        p.cache.store(ImagePage::new(vec![image("a")]));
        p.restore(SavedViewState {
            is_connected: false,
            is_loading: false,
        });

        p.on_connectivity_changed(true);
        assert_eq!(p.coordinator().state(), &FetchState::Idle);
        assert_eq!(p.surface().events.last(), Some(&Event::HideOffline));
    }

    #[tokio::test]
    async fn test_refresh_while_offline_forces_content() {
        let mut p = presenter();
        p.restore(SavedViewState {
            is_connected: false,
            is_loading: false,
        });

        p.refresh();
        assert_eq!(p.view_state().mode, ViewMode::ShowingContent);
        assert!(p.view_state().is_loading);
        assert!(p.coordinator().is_running());
        assert_eq!(p.surface().events.last(), Some(&Event::HideOffline));
    }

    #[tokio::test]
    async fn test_refresh_replaces_running_fetch() {
        let mut p = presenter();
        p.refresh();
        let first = running_id(&p);
        p.refresh();
        let second = running_id(&p);
        assert_ne!(first, second);

        // The first fetch's late result changes nothing.
        p.on_fetch_completed(complete(first, Ok(Some(ImagePage::new(vec![image("x")])))));
        assert_eq!(p.cache().count(), 0);
        assert!(p.view_state().is_loading);
    }

    #[tokio::test]
    async fn test_loading_finished_hands_page_to_cache() {
        let mut p = presenter();
        p.refresh();
        let id = running_id(&p);

        let page = ImagePage::new(vec![image("a"), image("b")]);
        p.on_fetch_completed(complete(id, Ok(Some(page))));

        assert_eq!(p.cache().count(), 2);
        assert!(!p.view_state().is_loading);
        assert!(p.surface().events.contains(&Event::Items(2)));
        assert_eq!(p.surface().events.last(), Some(&Event::Loading(false)));
    }

    #[tokio::test]
    async fn test_transport_failure_goes_offline() {
        let mut p = presenter();
        p.cache.store(ImagePage::new(vec![image("a")]));
        assert!(p.open_full_image("a"));
        p.refresh();
        let id = running_id(&p);

        p.on_fetch_completed(complete(id, Err(RandomurError::transport("reset", "peer"))));

        assert_eq!(p.view_state().mode, ViewMode::ShowingOffline);
        assert!(!p.is_connected());
        assert!(p.open_image().is_none());
        let events = &p.surface().events;
        assert!(events.contains(&Event::CloseFullImage));
        assert!(events.contains(&Event::ShowOffline));
        assert!(!events.contains(&Event::Error));
    }

    #[tokio::test]
    async fn test_parse_failure_shows_inline_error() {
        let mut p = presenter();
        p.refresh();
        let id = running_id(&p);

        p.on_fetch_completed(complete(id, Err(RandomurError::parse("bad json"))));

        assert_eq!(p.view_state().mode, ViewMode::ShowingContent);
        assert!(p.is_connected());
        assert!(!p.view_state().is_loading);
        let events = &p.surface().events;
        assert!(events.contains(&Event::Error));
        assert!(!events.contains(&Event::ShowOffline));
    }

    #[tokio::test]
    async fn test_disconnect_cancels_and_closes_viewer() {
        let mut p = presenter();
        p.cache.store(ImagePage::new(vec![image("a")]));
        p.refresh();
        let id = running_id(&p);
        assert!(p.open_full_image("a"));

        p.on_connectivity_changed(false);

        assert_eq!(p.coordinator().state(), &FetchState::Canceled { id });
        assert!(p.open_image().is_none());
        assert!(!p.open_full_image("a"));
    }

    #[tokio::test]
    async fn test_load_more_advances_pages() {
        let mut p = presenter();
        p.refresh();
        let id = running_id(&p);
        assert!(!p.load_more());

        p.on_fetch_completed(complete(id, Ok(Some(ImagePage::new(vec![image("a")])))));
        assert!(p.load_more());
        assert!(matches!(
            p.coordinator().state(),
            FetchState::Running { page, .. } if page.get() == 2
        ));
    }

    #[tokio::test]
    async fn test_load_more_stops_past_last_page() {
        let mut p = presenter();
        p.next_page = PageCursor::new(PageCursor::MAX_PAGE + 1);
        assert!(!p.load_more());
        assert_eq!(p.coordinator().state(), &FetchState::Idle);
    }

    #[tokio::test]
    async fn test_load_more_refused_while_offline() {
        let mut p = presenter();
        p.restore(SavedViewState {
            is_connected: false,
            is_loading: false,
        });
        assert!(!p.load_more());
        assert_eq!(p.coordinator().state(), &FetchState::Idle);
    }

    #[tokio::test]
    async fn test_failed_load_more_retries_same_page() {
        let mut p = presenter();
        p.refresh();
        let id = running_id(&p);
        p.on_fetch_completed(complete(id, Ok(Some(ImagePage::new(vec![image("a")])))));

        assert!(p.load_more());
        let id = running_id(&p);
        p.on_fetch_completed(FetchCompletion {
            id,
            page: PageCursor::new(2),
            outcome: Err(RandomurError::parse("bad json")),
        });

        assert!(p.load_more());
        assert!(matches!(
            p.coordinator().state(),
            FetchState::Running { page, .. } if page.get() == 2
        ));
    }

    #[tokio::test]
    async fn test_restore_round_trip_starts_nothing() {
        let saved = SavedViewState {
            is_connected: false,
            is_loading: true,
        };
        let mut p = presenter();
        p.restore(saved);
        assert_eq!(p.save_state(), saved);
        assert_eq!(p.view_state().mode, ViewMode::ShowingOffline);
        assert_eq!(p.coordinator().state(), &FetchState::Idle);
    }

    #[tokio::test]
    async fn test_open_unknown_image_is_refused() {
        let mut p = presenter();
        assert!(!p.open_full_image("missing"));
        p.close_full_image();
        assert!(!p.surface().events.contains(&Event::CloseFullImage));
    }
}
