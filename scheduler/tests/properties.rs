//! Property tests for process conservation and demand accounting.

use std::collections::HashMap;

use proptest::prelude::*;

use tick_scheduler::{
    FifoScheduler, Pid, Process, ProcessState, Profile, RoundRobinScheduler, Scheduler,
    Simulation, TickSnapshot,
};

fn profile_strategy() -> impl Strategy<Value = Profile> {
    (any::<bool>(), 1u32..=20, 0u32..=20, 1u32..=6)
        .prop_map(|(io_bound, cpu, io, interval)| Profile::new(io_bound, cpu, io, interval))
}

fn workload_strategy() -> impl Strategy<Value = Vec<Process>> {
    prop::collection::vec(profile_strategy(), 0..=12).prop_map(|profiles| {
        profiles
            .into_iter()
            .enumerate()
            .map(|(index, profile)| Process::new(index as Pid + 1, profile))
            .collect()
    })
}

fn all_processes(snapshot: &TickSnapshot) -> impl Iterator<Item = &Process> {
    snapshot
        .ready
        .iter()
        .chain(&snapshot.waiting)
        .chain(snapshot.running.as_ref())
        .chain(&snapshot.terminated)
}

/// Steps the simulation to completion, checking the per-tick invariants.
fn check_run<S: Scheduler>(mut sim: Simulation<S>) -> Result<(), TestCaseError> {
    let admitted = sim.admitted();
    let work_bound: u64 = all_processes(&sim.snapshot())
        .map(|p| u64::from(p.remaining_cpu()) + u64::from(p.remaining_io()))
        .sum();

    let mut remaining: HashMap<Pid, (u32, u32)> = all_processes(&sim.snapshot())
        .map(|p| (p.pid(), (p.remaining_cpu(), p.remaining_io())))
        .collect();
    let mut terminated_seen = 0;

    while sim.step() {
        let snapshot = sim.snapshot();
        prop_assert!(snapshot.clock <= work_bound, "run exceeded total demand");

        // Conservation.
        prop_assert_eq!(snapshot.population(), admitted);
        let mut pids: Vec<Pid> = all_processes(&snapshot).map(Process::pid).collect();
        pids.sort_unstable();
        pids.dedup();
        prop_assert_eq!(pids.len(), admitted);

        // Monotonic decay.
        for process in all_processes(&snapshot) {
            let (cpu, io) = remaining[&process.pid()];
            prop_assert!(process.remaining_cpu() <= cpu);
            prop_assert!(process.remaining_io() <= io);
            remaining.insert(process.pid(), (process.remaining_cpu(), process.remaining_io()));
        }

        // Termination happens exactly when both demands are spent, stamped with this tick.
        for process in &snapshot.terminated[terminated_seen..] {
            prop_assert!(process.is_finished());
            prop_assert_eq!(process.state(), ProcessState::Terminated);
            prop_assert_eq!(process.finish_time(), Some(snapshot.clock));
        }
        terminated_seen = snapshot.terminated.len();

        for process in snapshot.ready.iter().chain(&snapshot.waiting).chain(snapshot.running.as_ref()) {
            prop_assert!(!process.is_finished());
            prop_assert!(process.finish_time().is_none());
        }
        if let Some(running) = &snapshot.running {
            prop_assert_eq!(running.state(), ProcessState::Running);
        }
        prop_assert!(snapshot.ready.iter().all(|p| p.state() == ProcessState::Ready));
        prop_assert!(snapshot.waiting.iter().all(|p| p.state() == ProcessState::Waiting));
    }

    prop_assert!(sim.is_finished());
    prop_assert_eq!(sim.terminated().len(), admitted);
    Ok(())
}

proptest! {
    #[test]
    fn fifo_conserves_processes_and_demand(workload in workload_strategy()) {
        check_run(Simulation::with_processes(FifoScheduler::new(), workload))?;
    }

    #[test]
    fn round_robin_conserves_processes_and_demand(
        workload in workload_strategy(),
        quantum in 1u32..=5,
    ) {
        check_run(Simulation::with_processes(
            RoundRobinScheduler::with_quantum(quantum),
            workload,
        ))?;
    }

    #[test]
    fn cpu_ticks_match_total_demand(workload in workload_strategy(), quantum in 1u32..=5) {
        let total_cpu: u64 = workload.iter().map(|p| u64::from(p.profile().total_cpu)).sum();
        let mut sim = Simulation::with_processes(RoundRobinScheduler::with_quantum(quantum), workload);

        let mut busy_ticks = 0u64;
        while sim.step() {
            let snapshot = sim.snapshot();
            let spent: u64 = all_processes(&snapshot).map(|p| u64::from(p.cpu_done())).sum();
            busy_ticks += 1;
            prop_assert!(spent <= busy_ticks);
        }

        let spent: u64 = sim.terminated().iter().map(|p| u64::from(p.cpu_done())).sum();
        prop_assert_eq!(spent, total_cpu);
    }
}
