use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

/// Invalid run configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("process count {0} must be between 1 and 10000")]
    ProcessCount(usize),

    #[error("cpu-bound percentage {0} must be between 0 and 100")]
    CpuBoundPercent(u8),

    #[error("round-robin quantum must be at least 1 tick")]
    ZeroQuantum,

    #[error("snapshot interval must be at least 1 tick")]
    ZeroSnapshotInterval,
}

#[derive(Error, Debug)]
pub enum SimError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
