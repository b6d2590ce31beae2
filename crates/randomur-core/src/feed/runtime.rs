//! The feed's foreground sequence.
//!
//! All presenter and coordinator mutation happens inside [`FeedRuntime::run`],
//! which interleaves user commands, connectivity transitions and fetch
//! results in arrival order.

use crate::connectivity::{ConnectivityMonitor, ConnectivitySubscription};
use crate::feed::coordinator::{DynGallery, FetchCoordinator};
use crate::feed::presenter::{FeedPresenter, PresentationSurface, ThumbnailCache};
use crate::feed::state::{FetchCompletion, SavedViewState};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Capacity of the command channel returned by [`FeedRuntime::new`].
pub const COMMAND_BUFFER: usize = 32;

/// User input accepted by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedCommand {
    Refresh,
    LoadMore,
    OpenImage(String),
    CloseImage,
    Shutdown,
}

/// How the runtime begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    /// Fresh start with an immediate refresh.
    Cold,
    /// Recreated from saved flags; nothing is fetched until asked.
    Restore(SavedViewState),
}

pub struct FeedRuntime<S, K> {
    presenter: FeedPresenter<S, K>,
    completions: mpsc::UnboundedReceiver<FetchCompletion>,
    connectivity: ConnectivitySubscription,
    commands: mpsc::Receiver<FeedCommand>,
}

impl<S: PresentationSurface, K: ThumbnailCache> FeedRuntime<S, K> {
    /// Wire a presenter to `gallery` and `monitor`.
    ///
    /// Returns the runtime and the sender for user commands.
    pub fn new(
        gallery: DynGallery,
        monitor: &ConnectivityMonitor,
        surface: S,
        cache: K,
    ) -> (Self, mpsc::Sender<FeedCommand>) {
        let (coordinator, completions) = FetchCoordinator::new(gallery);
        let coordinator = coordinator.with_connectivity(monitor.subscribe());
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);

        let runtime = Self {
            presenter: FeedPresenter::new(coordinator, surface, cache),
            completions,
            connectivity: monitor.subscribe(),
            commands,
        };
        (runtime, tx)
    }

    pub fn presenter(&self) -> &FeedPresenter<S, K> {
        &self.presenter
    }

    /// Run until [`FeedCommand::Shutdown`] or until every command sender is
    /// dropped. Cancels any running fetch and returns the presenter.
    pub async fn run(mut self, startup: Startup) -> FeedPresenter<S, K> {
        match startup {
            Startup::Cold => {
                let connected = self.connectivity.is_connected();
                self.presenter.cold_start(connected);
            }
            Startup::Restore(saved) => {
                self.presenter.restore(saved);
                // The monitor may have moved on since the flags were saved.
                let connected = self.connectivity.is_connected();
                if connected != saved.is_connected {
                    self.presenter.on_connectivity_changed(connected);
                }
            }
        }

        let mut connectivity_open = true;
        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(FeedCommand::Shutdown) | None => break,
                    Some(command) => self.apply(command),
                },
                Some(completion) = self.completions.recv() => {
                    self.presenter.on_fetch_completed(completion);
                }
                changed = self.connectivity.changed(), if connectivity_open => match changed {
                    Some(connected) => self.presenter.on_connectivity_changed(connected),
                    None => {
                        debug!("Connectivity monitor went away");
                        connectivity_open = false;
                    }
                },
            }
        }

        info!("Feed shutting down");
        self.presenter.teardown();
        self.presenter
    }

    fn apply(&mut self, command: FeedCommand) {
        debug!("Command: {:?}", command);
        match command {
            FeedCommand::Refresh => self.presenter.refresh(),
            FeedCommand::LoadMore => {
                self.presenter.load_more();
            }
            FeedCommand::OpenImage(id) => {
                self.presenter.open_full_image(&id);
            }
            FeedCommand::CloseImage => self.presenter.close_full_image(),
            FeedCommand::Shutdown => {}
        }
    }
}
