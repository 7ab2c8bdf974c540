use super::{Process, ProcessState, Scheduler};
use std::collections::VecDeque;

/// First-come first-served, never preempts.
#[derive(Debug, Default)]
pub struct FifoScheduler {
    ready: VecDeque<Process>,
}

impl FifoScheduler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Scheduler for FifoScheduler {
    fn add(&mut self, mut process: Process) {
        process.set_state(ProcessState::Ready);
        self.ready.push_back(process);
    }

    fn next(&mut self) -> Option<Process> {
        let mut process = self.ready.pop_front()?;
        process.set_state(ProcessState::Running);
        Some(process)
    }

    // Never called by the engine for this policy since the quantum never expires.
    fn preempt(&mut self, process: Process) {
        self.add(process);
    }

    fn quantum_expired(&mut self) -> bool {
        false
    }

    fn ready_len(&self) -> usize {
        self.ready.len()
    }

    fn snapshot_ready(&self) -> Vec<Process> {
        self.ready.iter().cloned().collect()
    }

    fn name(&self) -> String {
        "FIFO".to_owned()
    }
}
