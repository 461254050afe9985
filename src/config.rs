use std::{error, fmt, str::FromStr};

use crate::{
    memory::{MIN_RESIDENT_KB, pages_for},
    paging::MemoryPolicy,
    process::{Pid, Process},
};

pub const DEFAULT_QUANTUM: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulingPolicy {
    Fcfs,
    RoundRobin,
    /// Shortest total job time first, reordered whenever a job finishes.
    ShortestJob,
}

impl FromStr for SchedulingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ff" | "fcfs" => Ok(SchedulingPolicy::Fcfs),
            "rr" | "round_robin" | "round-robin" => Ok(SchedulingPolicy::RoundRobin),
            "cs" | "custom" | "sjf" => Ok(SchedulingPolicy::ShortestJob),
            other => Err(ConfigError::UnknownSchedulingPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchedulingPolicy::Fcfs => "fcfs",
            SchedulingPolicy::RoundRobin => "round-robin",
            SchedulingPolicy::ShortestJob => "shortest-job",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub scheduling: SchedulingPolicy,
    pub memory: MemoryPolicy,
    pub memory_size_kb: u32,
    pub quantum: u32,
}

impl Config {
    pub fn new(scheduling: SchedulingPolicy, memory: MemoryPolicy) -> Self {
        Self {
            scheduling,
            memory,
            memory_size_kb: 0,
            quantum: DEFAULT_QUANTUM,
        }
    }

    pub fn with_memory_size(mut self, kb: u32) -> Self {
        self.memory_size_kb = kb;
        self
    }

    pub fn with_quantum(mut self, quantum: u32) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scheduling == SchedulingPolicy::RoundRobin && self.quantum == 0 {
            return Err(ConfigError::ZeroQuantum);
        }
        if self.memory.is_bounded() && pages_for(self.memory_size_kb) == 0 {
            return Err(ConfigError::MissingMemorySize(self.memory));
        }
        Ok(())
    }

    /// Rejects workloads the memory policy could never make runnable.
    pub fn check_workload(&self, processes: &[Process]) -> Result<(), ConfigError> {
        self.validate()?;

        let total_pages = pages_for(self.memory_size_kb);
        for process in processes {
            let required_pages = match self.memory {
                MemoryPolicy::Unlimited => continue,
                MemoryPolicy::Swap => process.page_count(),
                MemoryPolicy::Virtual | MemoryPolicy::SecondChance => {
                    process.page_count().min(pages_for(MIN_RESIDENT_KB))
                }
            };
            if required_pages > total_pages {
                return Err(ConfigError::ProcessTooLarge {
                    pid: process.pid,
                    required_pages,
                    total_pages,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    UnknownSchedulingPolicy(String),
    UnknownMemoryPolicy(String),
    MissingMemorySize(MemoryPolicy),
    ZeroQuantum,
    ProcessTooLarge {
        pid: Pid,
        required_pages: usize,
        total_pages: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownSchedulingPolicy(name) => {
                write!(f, "unknown scheduling algorithm `{}` (expected ff, rr or cs)", name)
            }
            ConfigError::UnknownMemoryPolicy(name) => {
                write!(f, "unknown memory allocation `{}` (expected u, p, v or cm)", name)
            }
            ConfigError::MissingMemorySize(policy) => {
                write!(f, "{} memory needs a size of at least one page", policy)
            }
            ConfigError::ZeroQuantum => write!(f, "round-robin quantum must be positive"),
            ConfigError::ProcessTooLarge {
                pid,
                required_pages,
                total_pages,
            } => write!(
                f,
                "process {} needs {} pages resident but memory holds {}",
                pid, required_pages, total_pages
            ),
        }
    }
}

impl error::Error for ConfigError {}
