//! Connectivity monitor: the single writer of the process-wide
//! connected/disconnected flag.

use tokio::sync::watch;
use tracing::info;

/// Connectivity notification as delivered by a platform source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    /// A network became usable.
    Available,
    /// The last usable network went away.
    Lost,
    /// A source that only reports the resulting state.
    Changed { connected: bool },
}

impl ConnectivityEvent {
    pub fn is_connected(&self) -> bool {
        match self {
            ConnectivityEvent::Available => true,
            ConnectivityEvent::Lost => false,
            ConnectivityEvent::Changed { connected } => *connected,
        }
    }
}

/// Normalizes platform events into a boolean signal and publishes each
/// transition to its subscribers.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    tx: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    /// Create a monitor with the given initial state.
    pub fn new(initially_connected: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_connected);
        Self { tx }
    }

    /// Current connectivity.
    pub fn is_connected(&self) -> bool {
        *self.tx.borrow()
    }

    /// Apply a platform event.
    ///
    /// Returns `true` if the connectivity flag changed. Repeated reports of
    /// the same state are not delivered again.
    pub fn report(&self, event: ConnectivityEvent) -> bool {
        let connected = event.is_connected();
        let changed = self.tx.send_if_modified(|current| {
            if *current == connected {
                false
            } else {
                *current = connected;
                true
            }
        });

        if changed {
            if connected {
                info!("Network connectivity restored");
            } else {
                info!("Network connectivity lost");
            }
        }
        changed
    }

    /// Subscribe to transitions. Dropping the subscription unsubscribes.
    pub fn subscribe(&self) -> ConnectivitySubscription {
        ConnectivitySubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Read side of the connectivity flag.
#[derive(Debug, Clone)]
pub struct ConnectivitySubscription {
    rx: watch::Receiver<bool>,
}

impl ConnectivitySubscription {
    /// Current connectivity, without consuming a pending transition.
    pub fn is_connected(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the next transition.
    ///
    /// Returns `None` once the monitor has been dropped.
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}
