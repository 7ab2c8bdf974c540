use crate::scheduler::{Process, Tick, TickObserver, TickSnapshot};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const TICKS_HEADER: &str = "clock,running_pid,ready_size,waiting_size,terminated_size";
pub const PROCESS_HEADER: &str = "clock,pid,state,cpu_done,cpu_total,io_done,io_total";

/// `<base>_ticks.csv` and `<base>_process.csv`.
pub fn log_paths(base: &Path) -> (PathBuf, PathBuf) {
    let base = base.as_os_str().to_string_lossy();
    (
        PathBuf::from(format!("{base}_ticks.csv")),
        PathBuf::from(format!("{base}_process.csv")),
    )
}

/// Writes one row per tick and one row per process per tick.
pub struct CsvLogger<W: Write> {
    ticks: W,
    processes: W,
    enabled: bool,
}

impl CsvLogger<BufWriter<File>> {
    /// Creates `<base>_ticks.csv` and `<base>_process.csv`.
    pub fn create(base: &Path) -> io::Result<Self> {
        let (ticks_path, process_path) = log_paths(base);
        let ticks = BufWriter::new(File::create(&ticks_path)?);
        let processes = BufWriter::new(File::create(&process_path)?);
        info!(
            ticks = %ticks_path.display(),
            processes = %process_path.display(),
            "csv logging enabled"
        );
        Self::new(ticks, processes)
    }

    /// Like [`CsvLogger::create`], but a failure only disables logging.
    pub fn open_or_warn(base: &Path) -> Option<Self> {
        match Self::create(base) {
            Ok(logger) => Some(logger),
            Err(err) => {
                warn!(error = %err, base = %base.display(), "cannot open csv files, continuing without logs");
                None
            }
        }
    }
}

impl<W: Write> CsvLogger<W> {
    pub fn new(mut ticks: W, mut processes: W) -> io::Result<Self> {
        writeln!(ticks, "{TICKS_HEADER}")?;
        writeln!(processes, "{PROCESS_HEADER}")?;
        Ok(Self {
            ticks,
            processes,
            enabled: true,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn record(&mut self, snapshot: &TickSnapshot) -> io::Result<()> {
        let running_pid = snapshot
            .running
            .as_ref()
            .map_or(-1, |process| i64::from(process.pid()));

        writeln!(
            self.ticks,
            "{},{},{},{},{}",
            snapshot.clock,
            running_pid,
            snapshot.ready.len(),
            snapshot.waiting.len(),
            snapshot.terminated.len()
        )?;

        let rows = snapshot
            .ready
            .iter()
            .chain(&snapshot.waiting)
            .chain(snapshot.running.as_ref())
            .chain(&snapshot.terminated);
        for process in rows {
            write_process_row(&mut self.processes, snapshot.clock, process)?;
        }
        Ok(())
    }

    pub fn finish(mut self) -> io::Result<(W, W)> {
        self.ticks.flush()?;
        self.processes.flush()?;
        Ok((self.ticks, self.processes))
    }
}

fn write_process_row<W: Write>(out: &mut W, clock: Tick, process: &Process) -> io::Result<()> {
    let profile = process.profile();
    writeln!(
        out,
        "{},{},{},{},{},{},{}",
        clock,
        process.pid(),
        process.state(),
        process.cpu_done(),
        profile.total_cpu,
        process.io_done(),
        profile.total_io
    )
}

impl<W: Write> TickObserver for CsvLogger<W> {
    fn observe(&mut self, snapshot: &TickSnapshot) {
        if !self.enabled {
            return;
        }
        if let Err(err) = self.record(snapshot) {
            warn!(error = %err, clock = snapshot.clock, "csv logging disabled");
            self.enabled = false;
        }
    }
}
