use super::{Process, ProcessState, RunSummary, Scheduler, Tick};
use tracing::{debug, trace};

/// Read-only copy of the engine state after a tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickSnapshot {
    pub clock: Tick,
    pub running: Option<Process>,
    pub ready: Vec<Process>,
    pub waiting: Vec<Process>,
    pub terminated: Vec<Process>,
    pub policy_name: String,
}

impl TickSnapshot {
    pub fn population(&self) -> usize {
        self.ready.len()
            + self.waiting.len()
            + self.terminated.len()
            + usize::from(self.running.is_some())
    }
}

/// Consumer of per-tick snapshots (views, loggers).
///
/// Observers never get mutable access to the engine, and the engine never
/// learns whether an observer succeeded.
pub trait TickObserver {
    fn observe(&mut self, snapshot: &TickSnapshot);
}

/// Tick-stepping simulation over a single scheduling policy.
///
/// Each process lives in exactly one of the ready queue (inside the
/// scheduler), the running slot, the waiting set or the terminated list.
pub struct Simulation<S> {
    scheduler: S,
    clock: Tick,
    running: Option<Process>,
    waiting: Vec<Process>,
    terminated: Vec<Process>,
    admitted: usize,
}

impl<S: Scheduler> Simulation<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            clock: 0,
            running: None,
            waiting: Vec::new(),
            terminated: Vec::new(),
            admitted: 0,
        }
    }

    pub fn with_processes<I>(scheduler: S, processes: I) -> Self
    where
        I: IntoIterator<Item = Process>,
    {
        let mut simulation = Simulation::new(scheduler);
        simulation.admit_all(processes);
        simulation
    }

    /// Hands a NEW process to the scheduler. Its arrival time is the current clock.
    pub fn admit(&mut self, mut process: Process) {
        assert_eq!(
            process.state(),
            ProcessState::New,
            "pid {} admitted twice",
            process.pid()
        );
        process.set_arrival(self.clock);
        trace!(pid = process.pid(), clock = self.clock, "admitted");
        self.admitted += 1;
        self.scheduler.add(process);
    }

    pub fn admit_all<I>(&mut self, processes: I)
    where
        I: IntoIterator<Item = Process>,
    {
        let before = self.admitted;
        for process in processes {
            self.admit(process);
        }
        debug!(
            count = self.admitted - before,
            policy = %self.scheduler.name(),
            "workload admitted"
        );
    }

    pub fn clock(&self) -> Tick {
        self.clock
    }

    pub fn admitted(&self) -> usize {
        self.admitted
    }

    pub fn running(&self) -> Option<&Process> {
        self.running.as_ref()
    }

    pub fn waiting(&self) -> &[Process] {
        &self.waiting
    }

    pub fn terminated(&self) -> &[Process] {
        &self.terminated
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn is_finished(&self) -> bool {
        self.terminated.len() == self.admitted
    }

    /// Advances the clock by one tick. Returns false, without advancing, once
    /// every admitted process has terminated.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }

        self.clock += 1;
        self.advance_waiting();
        self.dispatch();
        self.advance_running();

        debug_assert_eq!(
            self.population(),
            self.admitted,
            "process lost at tick {}",
            self.clock
        );

        if self.is_finished() {
            debug!(clock = self.clock, finished = self.terminated.len(), "run complete");
        }
        true
    }

    /// Steps until every process has terminated.
    pub fn run(&mut self) -> RunSummary {
        while self.step() {}
        self.summary()
    }

    /// Steps until every process has terminated, handing a snapshot to the
    /// observer after each tick.
    pub fn run_observed(&mut self, observer: &mut dyn TickObserver) -> RunSummary {
        while self.step() {
            observer.observe(&self.snapshot());
        }
        self.summary()
    }

    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            clock: self.clock,
            running: self.running.clone(),
            ready: self.scheduler.snapshot_ready(),
            waiting: self.waiting.clone(),
            terminated: self.terminated.clone(),
            policy_name: self.scheduler.name(),
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_terminated(&self.terminated, self.clock, self.admitted)
    }

    fn population(&self) -> usize {
        self.scheduler.ready_len()
            + self.waiting.len()
            + self.terminated.len()
            + usize::from(self.running.is_some())
    }

    fn advance_waiting(&mut self) {
        let now = self.clock;
        let waiting = std::mem::take(&mut self.waiting);
        self.waiting.reserve(waiting.len());

        for mut process in waiting {
            process.on_io_tick();
            if process.remaining_io() > 0 {
                self.waiting.push(process);
            } else if process.remaining_cpu() == 0 {
                process.terminate(now);
                trace!(pid = process.pid(), clock = now, "waiting -> terminated");
                self.terminated.push(process);
            } else {
                trace!(pid = process.pid(), clock = now, "waiting -> ready");
                self.scheduler.add(process);
            }
        }
    }

    fn dispatch(&mut self) {
        if self.running.is_some() {
            return;
        }
        self.running = self.scheduler.next();
        if let Some(process) = &self.running {
            trace!(pid = process.pid(), clock = self.clock, "ready -> running");
        }
    }

    fn advance_running(&mut self) {
        let now = self.clock;
        let Some(mut process) = self.running.take() else {
            return;
        };

        process.on_cpu_tick(now);

        // Completion and IO blocking win over quantum expiry on the same tick.
        if process.is_finished() {
            process.terminate(now);
            trace!(pid = process.pid(), clock = now, "running -> terminated");
            self.terminated.push(process);
        } else if process.needs_io_only() || process.should_request_io() {
            process.block_on_io();
            trace!(pid = process.pid(), clock = now, "running -> waiting");
            self.waiting.push(process);
        } else if self.scheduler.quantum_expired() {
            trace!(pid = process.pid(), clock = now, "running -> ready (preempted)");
            self.scheduler.preempt(process);
        } else {
            self.running = Some(process);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{FifoScheduler, Profile, RoundRobinScheduler};

    #[derive(Default)]
    struct Recorder {
        snapshots: Vec<TickSnapshot>,
    }

    impl TickObserver for Recorder {
        fn observe(&mut self, snapshot: &TickSnapshot) {
            self.snapshots.push(snapshot.clone());
        }
    }

    #[test]
    fn empty_workload_is_already_finished() {
        let mut sim = Simulation::new(FifoScheduler::new());
        assert!(sim.is_finished());
        assert!(!sim.step());
        assert_eq!(sim.clock(), 0);
    }

    #[test]
    fn admission_marks_ready_with_arrival_at_clock() {
        let mut sim = Simulation::new(FifoScheduler::new());
        sim.admit(Process::new(1, Profile::cpu_bound(3, 0, 1)));
        let ready = sim.scheduler().snapshot_ready();
        assert_eq!(ready[0].state(), ProcessState::Ready);
        assert_eq!(ready[0].arrival_time(), 0);
        assert_eq!(sim.admitted(), 1);
    }

    #[test]
    fn observer_sees_every_tick() {
        let mut sim = Simulation::with_processes(
            RoundRobinScheduler::with_quantum(2),
            vec![
                Process::new(1, Profile::cpu_bound(3, 0, 1)),
                Process::new(2, Profile::cpu_bound(2, 0, 1)),
            ],
        );
        let mut recorder = Recorder::default();
        let summary = sim.run_observed(&mut recorder);

        assert_eq!(summary.total_ticks, 5);
        let clocks: Vec<Tick> = recorder.snapshots.iter().map(|s| s.clock).collect();
        assert_eq!(clocks, vec![1, 2, 3, 4, 5]);
        assert!(recorder.snapshots.iter().all(|s| s.population() == 2));
        assert_eq!(recorder.snapshots[0].policy_name, "Round-Robin (q=2)");
    }

    #[test]
    fn cpu_exhausted_with_io_left_blocks() {
        let mut sim = Simulation::with_processes(
            FifoScheduler::new(),
            vec![Process::new(1, Profile::cpu_bound(1, 2, 10))],
        );

        sim.step();
        assert!(sim.running().is_none());
        assert_eq!(sim.waiting().len(), 1);
        assert_eq!(sim.waiting()[0].state(), ProcessState::Waiting);

        sim.step();
        assert_eq!(sim.waiting()[0].remaining_io(), 1);

        sim.step();
        assert!(sim.is_finished());
        assert_eq!(sim.terminated()[0].finish_time(), Some(3));
    }
}
