use rand::Rng;

use crate::{
    memory::PAGE_SIZE_KB,
    process::{Pid, Process},
};

pub struct WorkloadConfig {
    pub process_count: usize,
    pub max_arrival_gap: u32,
    pub max_pages: u32,
    pub max_job_time: u32,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            process_count: 10,
            max_arrival_gap: 20,
            max_pages: 16,
            max_job_time: 60,
        }
    }
}

/// Random arrival list with PIDs `1..=process_count` in arrival order and
/// page-aligned footprints.
pub fn generate<R: Rng>(rng: &mut R, config: &WorkloadConfig) -> Vec<Process> {
    let mut arrival = 0;
    let mut processes = Vec::with_capacity(config.process_count);

    for idx in 0..config.process_count {
        if idx > 0 {
            arrival += rng.random_range(0..=config.max_arrival_gap);
        }
        let pages = rng.random_range(1..=config.max_pages.max(1));
        let job_time = rng.random_range(1..=config.max_job_time.max(1));
        processes.push(Process::new(
            Pid(idx as u32 + 1),
            arrival,
            pages * PAGE_SIZE_KB,
            job_time,
        ));
    }

    processes
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn test_generate_respects_bounds() {
        let config = WorkloadConfig {
            process_count: 50,
            max_arrival_gap: 5,
            max_pages: 8,
            max_job_time: 30,
        };
        let processes = generate(&mut StdRng::seed_from_u64(7), &config);

        assert_eq!(processes.len(), 50);
        assert_eq!(processes[0].arrival_time, 0);
        for pair in processes.windows(2) {
            assert!(pair[0].arrival_time <= pair[1].arrival_time);
            assert!(pair[1].arrival_time - pair[0].arrival_time <= 5);
        }
        for (idx, p) in processes.iter().enumerate() {
            assert_eq!(p.pid, Pid(idx as u32 + 1));
            assert_eq!(p.memory_required % PAGE_SIZE_KB, 0);
            assert!((1..=8).contains(&p.page_count()));
            assert!((1..=30).contains(&p.job_time));
        }
    }

    #[test]
    fn test_same_seed_same_workload() {
        let config = WorkloadConfig::default();
        let a = generate(&mut StdRng::seed_from_u64(42), &config);
        let b = generate(&mut StdRng::seed_from_u64(42), &config);
        let key = |p: &Process| (p.pid, p.arrival_time, p.memory_required, p.job_time);
        assert_eq!(a.iter().map(key).collect::<Vec<_>>(), b.iter().map(key).collect::<Vec<_>>());
    }
}
