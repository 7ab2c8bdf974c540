use crate::error::ConfigError;
use crate::scheduler::Tick;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const MAX_PROCESSES: usize = 10_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// First-come first-served, no preemption
    Fifo,
    /// Round-robin with a fixed time quantum
    #[value(name = "rr", alias = "round-robin")]
    RoundRobin,
}

/// Settings for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    pub processes: usize,
    pub cpu_bound_percent: u8,
    pub policy: PolicyKind,
    pub quantum: u32,
    pub step_mode: bool,
    /// Render cadence in continuous mode, in ticks.
    pub snapshot_every: u64,
    pub clear_screen: bool,
    pub progress_bars: bool,
    pub bar_width: usize,
    /// Writes `<base>_ticks.csv` and `<base>_process.csv` when set.
    pub csv_base: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl SimConfig {
    pub fn io_bound_percent(&self) -> u8 {
        100u8.saturating_sub(self.cpu_bound_percent)
    }

    /// Continuous mode renders the first tick and then every `snapshot_every` ticks.
    pub fn renders_at(&self, clock: Tick) -> bool {
        clock == 1 || clock % self.snapshot_every.max(1) == 0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processes == 0 || self.processes > MAX_PROCESSES {
            return Err(ConfigError::ProcessCount(self.processes));
        }
        if self.cpu_bound_percent > 100 {
            return Err(ConfigError::CpuBoundPercent(self.cpu_bound_percent));
        }
        if self.policy == PolicyKind::RoundRobin && self.quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        if self.snapshot_every == 0 {
            return Err(ConfigError::ZeroSnapshotInterval);
        }
        Ok(())
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            processes: 10,
            cpu_bound_percent: 50,
            policy: PolicyKind::Fifo,
            quantum: 4,
            step_mode: false,
            snapshot_every: 10,
            clear_screen: true,
            progress_bars: true,
            bar_width: 24,
            csv_base: None,
            seed: None,
        }
    }
}

/// Tick-by-tick CPU scheduling simulator
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// Number of processes to simulate
    #[arg(short = 'n', long, default_value_t = 10)]
    pub processes: usize,

    /// Percentage of CPU-bound processes; the rest are IO-bound
    #[arg(long = "cpu-bound", default_value_t = 50)]
    pub cpu_bound_percent: u8,

    /// Scheduling policy
    #[arg(short, long, value_enum, default_value_t = PolicyKind::Fifo)]
    pub policy: PolicyKind,

    /// Round-robin time quantum, in ticks
    #[arg(short, long, default_value_t = 4)]
    pub quantum: u32,

    /// Interactive step-by-step mode
    #[arg(long)]
    pub step: bool,

    /// Render a snapshot every N ticks in continuous mode
    #[arg(long, default_value_t = 10)]
    pub snapshot_every: u64,

    /// Do not clear the screen before each snapshot
    #[arg(long)]
    pub no_clear: bool,

    /// Hide progress bars
    #[arg(long)]
    pub no_bars: bool,

    /// Write CSV logs to <BASE>_ticks.csv and <BASE>_process.csv
    #[arg(long, value_name = "BASE")]
    pub csv: Option<PathBuf>,

    /// Seed for a reproducible workload
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Cli {
    pub fn into_config(self) -> Result<SimConfig, ConfigError> {
        let config = SimConfig {
            processes: self.processes,
            cpu_bound_percent: self.cpu_bound_percent,
            policy: self.policy,
            quantum: self.quantum,
            step_mode: self.step,
            snapshot_every: self.snapshot_every,
            clear_screen: !self.no_clear,
            progress_bars: !self.no_bars,
            csv_base: self.csv,
            seed: self.seed,
            ..SimConfig::default()
        };
        config.validate()?;
        Ok(config)
    }
}
