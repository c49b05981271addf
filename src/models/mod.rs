// Domain models

mod container;
mod summary;

pub use container::{ContainerStats, CpuStats, CpuUsage, MemoryStats, NetworkStats};
pub use summary::{ContainerStatsSample, ContainerStatsSummary, CpuSample, MemorySample, Percentile};
