//! Tick-by-tick CPU scheduling simulator.
//!
//! Synthetic processes move through NEW, READY, RUNNING, WAITING and
//! TERMINATED under a pluggable [`Scheduler`] policy. The [`Simulation`]
//! engine owns the clock and every process; views and loggers only ever see
//! [`TickSnapshot`] copies.

pub mod config;
pub mod console;
pub mod csv_log;
pub mod error;
pub mod logging;
pub mod scheduler;

pub use config::{Cli, PolicyKind, SimConfig};
pub use error::{ConfigError, Result, SimError};
pub use scheduler::{
    FifoScheduler, Pid, PidAllocator, Process, ProcessState, Profile, RoundRobinScheduler,
    RunSummary, Scheduler, Simulation, Tick, TickObserver, TickSnapshot, WorkloadGenerator,
};
