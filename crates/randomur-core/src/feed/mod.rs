//! Feed acquisition: the fetch coordinator, the presentation state machine
//! and the runtime that drives both.

mod coordinator;
mod presenter;
mod runtime;
mod state;
mod state_file;

pub use coordinator::{DynGallery, FetchCoordinator};
pub use presenter::{FeedPresenter, PresentationSurface, ThumbnailCache};
pub use runtime::{FeedCommand, FeedRuntime, Startup, COMMAND_BUFFER};
pub use state::{
    FetchCompletion, FetchId, FetchNotification, FetchState, FetchTrigger, SavedViewState,
    ViewMode, ViewState,
};
pub use state_file::{load_view_state, save_view_state};
