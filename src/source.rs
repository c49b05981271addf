// Boundary to the external collector that produces raw snapshots.

use std::future::Future;

use crate::models::ContainerStats;

/// Produces the current snapshot for one container. Implementations may block
/// on I/O; nothing in this crate does.
pub trait StatsSource: Send + Sync {
    fn get_stats(&self) -> impl Future<Output = anyhow::Result<ContainerStats>> + Send;
}
