//! Fetch coordinator: runs at most one gallery fetch at a time.
//!
//! The coordinator is owned by a single sequence (the feed runtime). A fetch
//! runs on a spawned task and reports back through the completion channel;
//! the owner passes each [`FetchCompletion`] to [`FetchCoordinator::settle`],
//! which drops it unless it belongs to the fetch that is still running.

use crate::cancel::CancellationToken;
use crate::connectivity::ConnectivitySubscription;
use crate::feed::state::{FetchCompletion, FetchId, FetchNotification, FetchState, FetchTrigger};
use crate::gallery::{GalleryApi, PageCursor};
use crate::{RandomurError, Result};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Shared handle to a gallery implementation.
pub type DynGallery = Arc<dyn GalleryApi>;

/// Single-slot fetch tracker.
pub struct FetchCoordinator {
    gallery: DynGallery,
    state: FetchState,
    next_id: u64,
    /// Token of the running fetch.
    token: Option<CancellationToken>,
    completions: mpsc::UnboundedSender<FetchCompletion>,
    connectivity: Option<ConnectivitySubscription>,
}

impl FetchCoordinator {
    /// Create a coordinator and the receiver its fetch results arrive on.
    pub fn new(gallery: DynGallery) -> (Self, mpsc::UnboundedReceiver<FetchCompletion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            gallery,
            state: FetchState::Idle,
            next_id: 1,
            token: None,
            completions: tx,
            connectivity: None,
        };
        (coordinator, rx)
    }

    /// Refuse automatic fetches while `connectivity` reports disconnected.
    pub fn with_connectivity(mut self, connectivity: ConnectivitySubscription) -> Self {
        self.connectivity = Some(connectivity);
        self
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    /// Id of the running fetch.
    pub fn current_id(&self) -> Option<FetchId> {
        match self.state {
            FetchState::Running { id, .. } => Some(id),
            _ => None,
        }
    }

    /// Start fetching `page`.
    ///
    /// Rejected with [`RandomurError::FetchInProgress`] while another fetch
    /// runs; the running fetch is left untouched. Fetches not started by the
    /// user are rejected with [`RandomurError::Offline`] while disconnected.
    pub fn start_fetch(&mut self, page: PageCursor, trigger: FetchTrigger) -> Result<FetchId> {
        if let FetchState::Running { id, .. } = self.state {
            warn!("Ignoring {:?} fetch of page {}: fetch {} is running", trigger, page, id);
            return Err(RandomurError::FetchInProgress { id: id.get() });
        }

        if !trigger.is_user_initiated() {
            if let Some(connectivity) = &self.connectivity {
                if !connectivity.is_connected() {
                    debug!("Not starting {:?} fetch while offline", trigger);
                    return Err(RandomurError::Offline);
                }
            }
        }

        let id = FetchId(self.next_id);
        self.next_id += 1;

        let token = CancellationToken::new();
        self.token = Some(token.clone());
        self.state = FetchState::Running { id, page };
        info!("Starting fetch {} of page {} ({:?})", id, page, trigger);

        let gallery = Arc::clone(&self.gallery);
        let tx = self.completions.clone();
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Fetch {} stopped by cancellation", id);
                    return;
                }
                outcome = gallery.fetch_random_page(page) => outcome,
            };
            if tx.send(FetchCompletion { id, page, outcome }).is_err() {
                debug!("Fetch {} finished after its owner went away", id);
            }
        });

        Ok(id)
    }

    /// Cancel the running fetch, if any.
    ///
    /// Returns `false` (and changes nothing) when no fetch is running.
    pub fn cancel(&mut self) -> bool {
        let FetchState::Running { id, .. } = self.state else {
            return false;
        };
        if let Some(token) = self.token.take() {
            token.cancel();
        }
        self.state = FetchState::Canceled { id };
        info!("Canceled fetch {}", id);
        true
    }

    /// Apply a fetch result.
    ///
    /// Returns the notification to raise, or `None` when the result is stale
    /// (its fetch was canceled or superseded) and has been discarded.
    pub fn settle(&mut self, completion: FetchCompletion) -> Option<FetchNotification> {
        let FetchCompletion { id, page, outcome } = completion;

        match self.state {
            FetchState::Running { id: running, .. } if running == id => {}
            _ => {
                debug!("Discarding stale result of fetch {}", id);
                return None;
            }
        }
        self.token = None;

        match outcome {
            Ok(images) => {
                let item_count = images.as_ref().map(|p| p.len()).unwrap_or(0);
                self.state = FetchState::Completed {
                    id,
                    page,
                    item_count,
                };
                debug!("Fetch {} completed with {} images", id, item_count);
                Some(FetchNotification::LoadingFinished(images))
            }
            Err(e) => {
                let kind = e.kind();
                self.state = FetchState::Failed { id, kind };
                if e.is_network_interruption() {
                    warn!("Fetch {} interrupted: {}", id, e);
                    Some(FetchNotification::NetworkInterruption(e))
                } else {
                    warn!("Fetch {} failed: {}", id, e);
                    Some(FetchNotification::Failed(e))
                }
            }
        }
    }
}

impl Drop for FetchCoordinator {
    fn drop(&mut self) {
        if let Some(token) = self.token.take() {
            token.cancel();
        }
    }
}
