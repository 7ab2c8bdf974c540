mod display;
mod fifo;
mod process;
mod round_robin;
mod runner;
mod simulation;
mod stats;
mod workload;

pub use fifo::FifoScheduler;
pub use process::{Pid, PidAllocator, Process, ProcessState, Profile, Tick};
pub use round_robin::RoundRobinScheduler;
pub use runner::ProcessRunner;
pub use simulation::{Simulation, TickObserver, TickSnapshot};
pub use stats::RunSummary;
pub use workload::WorkloadGenerator;

/// Ready-queue policy driven by [`Simulation`].
///
/// A scheduler only ever holds READY processes. Every process handed to it
/// is owned by it until [`Scheduler::next`] gives it back.
pub trait Scheduler {
    /// Admits a process at the tail of the ready queue and marks it READY.
    fn add(&mut self, process: Process);

    /// Pops the head of the ready queue and marks it RUNNING.
    fn next(&mut self) -> Option<Process>;

    /// Returns a RUNNING process to the ready queue.
    fn preempt(&mut self, process: Process);

    /// Called once per tick while a process is running, after completion and
    /// IO-blocking have been ruled out. Returns true when the runner must be
    /// preempted.
    fn quantum_expired(&mut self) -> bool;

    fn ready_len(&self) -> usize;

    /// Copy of the ready queue, head to tail.
    fn snapshot_ready(&self) -> Vec<Process>;

    fn name(&self) -> String;
}
