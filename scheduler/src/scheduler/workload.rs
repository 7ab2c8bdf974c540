use super::{PidAllocator, Process, Profile};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::ops::RangeInclusive;

/// Demand ranges for one class of process.
#[derive(Debug, Clone)]
pub struct DemandRanges {
    pub cpu: RangeInclusive<u32>,
    pub io: RangeInclusive<u32>,
    pub io_interval: RangeInclusive<u32>,
}

impl DemandRanges {
    pub fn cpu_bound() -> Self {
        Self {
            cpu: 80..=200,
            io: 5..=40,
            io_interval: 6..=12,
        }
    }

    pub fn io_bound() -> Self {
        Self {
            cpu: 20..=90,
            io: 60..=200,
            io_interval: 2..=4,
        }
    }
}

/// Produces processes with randomized CPU/IO demand profiles.
pub struct WorkloadGenerator {
    rng: StdRng,
    cpu_bound_percent: u8,
    cpu_bound: DemandRanges,
    io_bound: DemandRanges,
}

impl WorkloadGenerator {
    /// `cpu_bound_percent` above 100 is treated as 100.
    pub fn new(cpu_bound_percent: u8) -> Self {
        WorkloadGenerator::with_rng(cpu_bound_percent, StdRng::from_entropy())
    }

    pub fn seeded(cpu_bound_percent: u8, seed: u64) -> Self {
        WorkloadGenerator::with_rng(cpu_bound_percent, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(cpu_bound_percent: u8, rng: StdRng) -> Self {
        Self {
            rng,
            cpu_bound_percent: cpu_bound_percent.min(100),
            cpu_bound: DemandRanges::cpu_bound(),
            io_bound: DemandRanges::io_bound(),
        }
    }

    pub fn with_ranges(mut self, cpu_bound: DemandRanges, io_bound: DemandRanges) -> Self {
        self.cpu_bound = cpu_bound;
        self.io_bound = io_bound;
        self
    }

    pub fn io_bound_percent(&self) -> u8 {
        100 - self.cpu_bound_percent
    }

    pub fn next_profile(&mut self) -> Profile {
        let io_bound = self.rng.gen_range(0..100u8) < self.io_bound_percent();
        let ranges = if io_bound {
            &self.io_bound
        } else {
            &self.cpu_bound
        };

        let total_cpu = self.rng.gen_range(ranges.cpu.clone());
        let total_io = self.rng.gen_range(ranges.io.clone());
        let io_interval = self.rng.gen_range(ranges.io_interval.clone());
        Profile::new(io_bound, total_cpu, total_io, io_interval)
    }

    pub fn generate(&mut self, count: usize, pids: &mut PidAllocator) -> Vec<Process> {
        (0..count)
            .map(|_| {
                let profile = self.next_profile();
                Process::new(pids.alloc(), profile)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assigns_sequential_pids() {
        let mut pids = PidAllocator::new();
        let mut generator = WorkloadGenerator::seeded(50, 7);
        let first = generator.generate(3, &mut pids);
        let second = generator.generate(2, &mut pids);

        let all: Vec<u32> = first.iter().chain(&second).map(Process::pid).collect();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn same_seed_same_workload() {
        let a = WorkloadGenerator::seeded(30, 42).generate(20, &mut PidAllocator::new());
        let b = WorkloadGenerator::seeded(30, 42).generate(20, &mut PidAllocator::new());
        assert_eq!(a, b);
    }

    #[test]
    fn all_cpu_bound_at_100_percent() {
        let processes = WorkloadGenerator::seeded(100, 1).generate(50, &mut PidAllocator::new());
        let ranges = DemandRanges::cpu_bound();
        for process in &processes {
            let profile = process.profile();
            assert!(!profile.io_bound);
            assert!(ranges.cpu.contains(&profile.total_cpu));
            assert!(ranges.io.contains(&profile.total_io));
            assert!(ranges.io_interval.contains(&profile.io_interval));
        }
    }

    #[test]
    fn all_io_bound_at_0_percent() {
        let processes = WorkloadGenerator::seeded(0, 1).generate(50, &mut PidAllocator::new());
        let ranges = DemandRanges::io_bound();
        for process in &processes {
            let profile = process.profile();
            assert!(profile.io_bound);
            assert!(ranges.cpu.contains(&profile.total_cpu));
            assert!(ranges.io.contains(&profile.total_io));
            assert!(ranges.io_interval.contains(&profile.io_interval));
        }
    }

    #[test]
    fn percent_is_capped() {
        assert_eq!(WorkloadGenerator::seeded(250, 1).io_bound_percent(), 0);
    }
}
