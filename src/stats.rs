use std::fmt;

use crate::{memory::MemoryStats, process::FinishedProcess};

pub const THROUGHPUT_WINDOW: u32 = 60;

#[derive(Debug, Default)]
pub struct StatisticsLog {
    finished: Vec<FinishedProcess>,
}

impl StatisticsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, process: FinishedProcess) {
        self.finished.push(process);
    }

    pub fn len(&self) -> usize {
        self.finished.len()
    }

    pub fn is_empty(&self) -> bool {
        self.finished.is_empty()
    }

    pub fn turnaround(&self) -> u32 {
        if self.is_empty() {
            return 0;
        }
        let total: u64 = self.finished.iter().map(|p| p.turnaround() as u64).sum();
        total.div_ceil(self.finished.len() as u64) as u32
    }

    /// Finished processes per 60 second window of `[0, makespan)`.
    pub fn throughput(&self, makespan: u32) -> Throughput {
        if self.is_empty() {
            return Throughput::default();
        }

        let windows = makespan.div_ceil(THROUGHPUT_WINDOW).max(1) as usize;
        let mut counts = vec![0u32; windows];
        for process in &self.finished {
            let idx = (process.time_finished.saturating_sub(1) / THROUGHPUT_WINDOW) as usize;
            counts[idx.min(windows - 1)] += 1;
        }

        let total: u32 = counts.iter().sum();
        Throughput {
            average: total.div_ceil(windows as u32),
            min: counts.iter().copied().min().unwrap_or(0),
            max: counts.iter().copied().max().unwrap_or(0),
        }
    }

    pub fn overhead(&self) -> Overhead {
        if self.is_empty() {
            return Overhead::default();
        }
        let ratios: Vec<f64> = self.finished.iter().map(FinishedProcess::overhead).collect();
        let max = ratios.iter().copied().fold(f64::MIN, f64::max);
        let average = ratios.iter().sum::<f64>() / ratios.len() as f64;
        Overhead {
            max: round2(max),
            average: round2(average),
        }
    }

    pub fn summarize(&self, makespan: u32, memory: MemoryStats) -> Summary {
        Summary {
            throughput: self.throughput(makespan),
            turnaround: self.turnaround(),
            overhead: self.overhead(),
            makespan,
            memory,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Throughput {
    pub average: u32,
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Overhead {
    pub max: f64,
    pub average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub throughput: Throughput,
    pub turnaround: u32,
    pub overhead: Overhead,
    pub makespan: u32,
    pub memory: MemoryStats,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Throughput {}, {}, {}",
            self.throughput.average, self.throughput.min, self.throughput.max
        )?;
        writeln!(f, "Turnaround time {}", self.turnaround)?;
        writeln!(
            f,
            "Time overhead {:.2} {:.2}",
            self.overhead.max, self.overhead.average
        )?;
        writeln!(f, "Makespan {}", self.makespan)
    }
}
