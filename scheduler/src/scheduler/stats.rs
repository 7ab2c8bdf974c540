use super::{Process, Tick};
use std::fmt;

/// End-of-run figures derived from the terminated processes.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub total_ticks: Tick,
    pub finished: usize,
    pub total_admitted: usize,
    /// Terminated processes per tick.
    pub throughput: f64,
    pub average_turnaround: f64,
    pub cpu_bound_terminated: usize,
    pub io_bound_terminated: usize,
}

impl RunSummary {
    pub fn from_terminated(terminated: &[Process], total_ticks: Tick, total_admitted: usize) -> Self {
        let finished = terminated.len();

        let throughput = if total_ticks == 0 {
            0.0
        } else {
            finished as f64 / total_ticks as f64
        };

        let average_turnaround = if finished == 0 {
            0.0
        } else {
            let total: Tick = terminated.iter().filter_map(Process::turnaround).sum();
            total as f64 / finished as f64
        };

        let io_bound_terminated = terminated.iter().filter(|p| p.is_io_bound()).count();

        Self {
            total_ticks,
            finished,
            total_admitted,
            throughput,
            average_turnaround,
            cpu_bound_terminated: finished - io_bound_terminated,
            io_bound_terminated,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==== Statistics ====")?;
        writeln!(f, "Processes finished: {}/{}", self.finished, self.total_admitted)?;
        writeln!(f, "Total simulated time (ticks): {}", self.total_ticks)?;
        writeln!(f, "Throughput (proc/tick): {:.6}", self.throughput)?;
        writeln!(f, "Average turnaround (ticks): {:.2}", self.average_turnaround)?;
        write!(
            f,
            "Distribution: CPU-bound={}, IO-bound={}",
            self.cpu_bound_terminated, self.io_bound_terminated
        )
    }
}
