//! Connectivity signal: a monitor that owns the connected flag, and an
//! optional HTTP probe that drives it.

mod monitor;
mod probe;

pub use monitor::{ConnectivityEvent, ConnectivityMonitor, ConnectivitySubscription};
pub use probe::{ConnectivityProbe, ProbeConfig};
