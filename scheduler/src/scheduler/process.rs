use std::fmt;

pub type Pid = u32;

/// Simulated clock value, in ticks.
pub type Tick = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessState {
    New,
    Ready,
    Running,
    Waiting,
    Terminated,
}

impl ProcessState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Waiting => "WAITING",
            Self::Terminated => "TERMINATED",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hands out process identities for a single run.
///
/// Identities start at 1 and are never handed out twice by the same allocator.
#[derive(Debug)]
pub struct PidAllocator {
    next: Pid,
}

impl PidAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn alloc(&mut self) -> Pid {
        let pid = self.next;
        self.next = self
            .next
            .checked_add(1)
            .expect("process identity space exhausted");
        pid
    }

    /// Number of identities handed out so far.
    pub fn allocated(&self) -> usize {
        (self.next - 1) as usize
    }
}

impl Default for PidAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable demand profile of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub io_bound: bool,
    pub total_cpu: u32,
    pub total_io: u32,
    /// CPU ticks executed between two IO requests, at least 1.
    pub io_interval: u32,
}

impl Profile {
    pub fn cpu_bound(total_cpu: u32, total_io: u32, io_interval: u32) -> Self {
        Self::new(false, total_cpu, total_io, io_interval)
    }

    pub fn io_bound(total_cpu: u32, total_io: u32, io_interval: u32) -> Self {
        Self::new(true, total_cpu, total_io, io_interval)
    }

    pub fn new(io_bound: bool, total_cpu: u32, total_io: u32, io_interval: u32) -> Self {
        Self {
            io_bound,
            total_cpu,
            total_io,
            io_interval: io_interval.max(1),
        }
    }
}

/// Process control block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Process {
    pid: Pid,
    profile: Profile,
    remaining_cpu: u32,
    remaining_io: u32,
    ticks_since_io: u32,
    state: ProcessState,
    arrival_time: Tick,
    start_time: Option<Tick>,
    finish_time: Option<Tick>,
}

impl Process {
    pub fn new(pid: Pid, profile: Profile) -> Self {
        Self {
            pid,
            profile,
            remaining_cpu: profile.total_cpu,
            remaining_io: profile.total_io,
            ticks_since_io: 0,
            state: ProcessState::New,
            arrival_time: 0,
            start_time: None,
            finish_time: None,
        }
    }

    pub fn pid(&self) -> Pid {
        self.pid
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn is_io_bound(&self) -> bool {
        self.profile.io_bound
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn remaining_cpu(&self) -> u32 {
        self.remaining_cpu
    }

    pub fn remaining_io(&self) -> u32 {
        self.remaining_io
    }

    pub fn cpu_done(&self) -> u32 {
        self.profile.total_cpu - self.remaining_cpu
    }

    pub fn io_done(&self) -> u32 {
        self.profile.total_io - self.remaining_io
    }

    pub fn ticks_since_io(&self) -> u32 {
        self.ticks_since_io
    }

    pub fn arrival_time(&self) -> Tick {
        self.arrival_time
    }

    pub fn start_time(&self) -> Option<Tick> {
        self.start_time
    }

    pub fn finish_time(&self) -> Option<Tick> {
        self.finish_time
    }

    /// `finish - arrival`, only known once the process has terminated.
    pub fn turnaround(&self) -> Option<Tick> {
        self.finish_time.map(|finish| finish - self.arrival_time)
    }

    pub fn is_finished(&self) -> bool {
        self.remaining_cpu == 0 && self.remaining_io == 0
    }

    /// True when the process has IO left and has run long enough since its last request.
    pub fn should_request_io(&self) -> bool {
        self.remaining_io > 0 && self.ticks_since_io >= self.profile.io_interval
    }

    /// True when the CPU work is exhausted but IO remains.
    pub fn needs_io_only(&self) -> bool {
        self.remaining_cpu == 0 && self.remaining_io > 0
    }

    pub(crate) fn set_state(&mut self, state: ProcessState) {
        debug_assert!(
            self.state != ProcessState::Terminated,
            "pid {} left TERMINATED",
            self.pid
        );
        self.state = state;
    }

    pub(crate) fn set_arrival(&mut self, now: Tick) {
        self.arrival_time = now;
    }

    pub(crate) fn on_cpu_tick(&mut self, now: Tick) {
        if self.start_time.is_none() {
            self.start_time = Some(now);
        }
        self.remaining_cpu = self.remaining_cpu.saturating_sub(1);
        self.ticks_since_io += 1;
    }

    pub(crate) fn on_io_tick(&mut self) {
        self.remaining_io = self.remaining_io.saturating_sub(1);
    }

    pub(crate) fn block_on_io(&mut self) {
        self.ticks_since_io = 0;
        self.set_state(ProcessState::Waiting);
    }

    pub(crate) fn terminate(&mut self, now: Tick) {
        assert!(
            self.finish_time.is_none(),
            "pid {} terminated twice",
            self.pid
        );
        assert!(self.is_finished(), "pid {} terminated with work left", self.pid);
        self.set_state(ProcessState::Terminated);
        self.finish_time = Some(now);
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PID={}[{}] CPU:{}/{} IO:{}/{}",
            self.pid,
            if self.is_io_bound() { "IO" } else { "CPU" },
            self.cpu_done(),
            self.profile.total_cpu,
            self.io_done(),
            self.profile.total_io
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pid_allocator_is_monotonic() {
        let mut pids = PidAllocator::new();
        assert_eq!(pids.alloc(), 1);
        assert_eq!(pids.alloc(), 2);
        assert_eq!(pids.alloc(), 3);
        assert_eq!(pids.allocated(), 3);
    }

    #[test]
    fn io_interval_is_clamped() {
        assert_eq!(Profile::cpu_bound(5, 5, 0).io_interval, 1);
    }

    #[test]
    fn cpu_tick_records_start_once() {
        let mut process = Process::new(1, Profile::cpu_bound(3, 0, 1));
        process.on_cpu_tick(4);
        process.on_cpu_tick(5);
        assert_eq!(process.start_time(), Some(4));
        assert_eq!(process.remaining_cpu(), 1);
        assert_eq!(process.ticks_since_io(), 2);
    }

    #[test]
    fn ticks_floor_at_zero() {
        let mut process = Process::new(1, Profile::cpu_bound(1, 1, 1));
        process.on_cpu_tick(1);
        process.on_cpu_tick(2);
        process.on_io_tick();
        process.on_io_tick();
        assert_eq!(process.remaining_cpu(), 0);
        assert_eq!(process.remaining_io(), 0);
        assert!(process.is_finished());
    }

    #[test]
    fn io_request_after_interval() {
        let mut process = Process::new(1, Profile::io_bound(10, 4, 2));
        process.on_cpu_tick(1);
        assert!(!process.should_request_io());
        process.on_cpu_tick(2);
        assert!(process.should_request_io());
        process.block_on_io();
        assert_eq!(process.ticks_since_io(), 0);
        assert_eq!(process.state(), ProcessState::Waiting);
    }

    #[test]
    fn no_io_request_without_io_demand() {
        let mut process = Process::new(1, Profile::cpu_bound(10, 0, 1));
        process.on_cpu_tick(1);
        assert!(!process.should_request_io());
    }

    #[test]
    fn turnaround_after_termination() {
        let mut process = Process::new(7, Profile::cpu_bound(1, 0, 1));
        assert_eq!(process.turnaround(), None);
        process.on_cpu_tick(1);
        process.terminate(1);
        assert_eq!(process.turnaround(), Some(1));
        assert_eq!(process.state(), ProcessState::Terminated);
    }

    #[test]
    fn display_shows_progress() {
        let mut process = Process::new(3, Profile::io_bound(4, 2, 2));
        process.on_cpu_tick(1);
        assert_eq!(process.to_string(), "PID=3[IO] CPU:1/4 IO:0/2");
    }
}
