use super::{Process, ProcessState, Scheduler};
use std::collections::VecDeque;

pub struct RoundRobinScheduler {
    ready: VecDeque<Process>,
    quantum: u32,
    ticks_used: u32,
}

impl RoundRobinScheduler {
    pub const DEFAULT_QUANTUM: u32 = 4;

    pub fn new() -> Self {
        RoundRobinScheduler::with_quantum(RoundRobinScheduler::DEFAULT_QUANTUM)
    }

    /// A zero quantum is raised to 1.
    pub fn with_quantum(quantum: u32) -> Self {
        Self {
            ready: VecDeque::new(),
            quantum: quantum.max(1),
            ticks_used: 0,
        }
    }

    pub fn quantum(&self) -> u32 {
        self.quantum
    }

    /// Ticks the current runner has used of its quantum.
    pub fn ticks_used(&self) -> u32 {
        self.ticks_used
    }
}

impl Default for RoundRobinScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for RoundRobinScheduler {
    fn add(&mut self, mut process: Process) {
        process.set_state(ProcessState::Ready);
        self.ready.push_back(process);
    }

    fn next(&mut self) -> Option<Process> {
        let mut process = self.ready.pop_front()?;
        process.set_state(ProcessState::Running);
        self.ticks_used = 0;
        Some(process)
    }

    fn preempt(&mut self, mut process: Process) {
        debug_assert_eq!(process.state(), ProcessState::Running);
        process.set_state(ProcessState::Ready);
        self.ready.push_back(process);
        self.ticks_used = 0;
    }

    fn quantum_expired(&mut self) -> bool {
        self.ticks_used += 1;
        self.ticks_used >= self.quantum
    }

    fn ready_len(&self) -> usize {
        self.ready.len()
    }

    fn snapshot_ready(&self) -> Vec<Process> {
        self.ready.iter().cloned().collect()
    }

    fn name(&self) -> String {
        format!("Round-Robin (q={})", self.quantum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::Profile;

    fn process(pid: u32) -> Process {
        Process::new(pid, Profile::cpu_bound(10, 0, 1))
    }

    #[test]
    fn quantum_expires_after_configured_ticks() {
        let mut rr = RoundRobinScheduler::with_quantum(3);
        rr.add(process(1));
        rr.next().unwrap();
        assert!(!rr.quantum_expired());
        assert!(!rr.quantum_expired());
        assert!(rr.quantum_expired());
    }

    #[test]
    fn next_starts_a_fresh_quantum() {
        let mut rr = RoundRobinScheduler::with_quantum(2);
        rr.add(process(1));
        rr.add(process(2));
        let first = rr.next().unwrap();
        rr.quantum_expired();
        assert_eq!(rr.ticks_used(), 1);

        rr.preempt(first);
        assert_eq!(rr.ticks_used(), 0);
        let second = rr.next().unwrap();
        assert_eq!(second.pid(), 2);
        assert_eq!(rr.ticks_used(), 0);
    }

    #[test]
    fn preempted_process_goes_to_tail() {
        let mut rr = RoundRobinScheduler::with_quantum(1);
        rr.add(process(1));
        rr.add(process(2));
        let head = rr.next().unwrap();
        rr.preempt(head);

        let ready = rr.snapshot_ready();
        assert_eq!(ready.iter().map(Process::pid).collect::<Vec<_>>(), vec![2, 1]);
        assert!(ready.iter().all(|p| p.state() == ProcessState::Ready));
    }

    #[test]
    fn zero_quantum_is_raised() {
        assert_eq!(RoundRobinScheduler::with_quantum(0).quantum(), 1);
    }

    #[test]
    fn name_includes_quantum() {
        assert_eq!(RoundRobinScheduler::with_quantum(5).name(), "Round-Robin (q=5)");
    }
}
