//! Fetch lifecycle and view state values.

use crate::error::FailureKind;
use crate::gallery::{ImagePage, PageCursor};
use crate::{RandomurError, Result};
use serde::{Deserialize, Serialize};

/// Identity of one `start_fetch` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FetchId(pub(crate) u64);

impl FetchId {
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for FetchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What asked for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
    /// The user pressed refresh; never gated on connectivity.
    UserRefresh,
    /// Connectivity came back while nothing was cached.
    Reconnect,
    /// The user reached the end of the loaded items.
    LoadMore,
}

impl FetchTrigger {
    pub fn is_user_initiated(&self) -> bool {
        matches!(self, FetchTrigger::UserRefresh)
    }
}

/// State of the coordinator's single fetch slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FetchState {
    #[default]
    Idle,
    Running {
        id: FetchId,
        page: PageCursor,
    },
    /// The page was handed off with the completion notification.
    Completed {
        id: FetchId,
        page: PageCursor,
        item_count: usize,
    },
    Failed {
        id: FetchId,
        kind: FailureKind,
    },
    Canceled {
        id: FetchId,
    },
}

impl FetchState {
    pub fn is_running(&self) -> bool {
        matches!(self, FetchState::Running { .. })
    }

    /// The fetch this state refers to, if any.
    pub fn id(&self) -> Option<FetchId> {
        match self {
            FetchState::Idle => None,
            FetchState::Running { id, .. }
            | FetchState::Completed { id, .. }
            | FetchState::Failed { id, .. }
            | FetchState::Canceled { id } => Some(*id),
        }
    }
}

/// Result of one fetch task, delivered back to the coordinator's owner.
#[derive(Debug)]
pub struct FetchCompletion {
    pub(crate) id: FetchId,
    pub(crate) page: PageCursor,
    pub(crate) outcome: Result<Option<ImagePage>>,
}

impl FetchCompletion {
    pub fn id(&self) -> FetchId {
        self.id
    }

    pub fn page(&self) -> PageCursor {
        self.page
    }
}

/// Notification raised when a fetch settles. At most one per fetch.
#[derive(Debug)]
pub enum FetchNotification {
    /// The fetch succeeded. `None` when the page was past the last one.
    LoadingFinished(Option<ImagePage>),
    /// The fetch failed in transport; connectivity has probably dropped.
    NetworkInterruption(RandomurError),
    /// The fetch failed for a reason unrelated to connectivity.
    Failed(RandomurError),
}

/// Which of the two mutually exclusive views is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    ShowingContent,
    ShowingOffline,
}

/// Presentation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub mode: ViewMode,
    pub is_loading: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            mode: ViewMode::ShowingContent,
            is_loading: true,
        }
    }
}

/// Flags carried across a teardown and recreation of the hosting view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedViewState {
    pub is_connected: bool,
    pub is_loading: bool,
}

impl Default for SavedViewState {
    fn default() -> Self {
        Self {
            is_connected: true,
            is_loading: true,
        }
    }
}
