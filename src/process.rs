use std::fmt;

use crate::memory::pages_for;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A simulated job. Identity fields never change once parsed; `state` is
/// mutated by the scheduler and the memory manager every tick.
#[derive(Clone, Debug)]
pub struct Process {
    pub pid: Pid,
    pub arrival_time: u32,
    pub memory_required: u32,
    pub job_time: u32,

    pub state: ProcessState,
}

impl Process {
    pub fn new(pid: Pid, arrival_time: u32, memory_required: u32, job_time: u32) -> Self {
        Self {
            pid,
            arrival_time,
            memory_required,
            job_time,

            state: ProcessState::new(job_time),
        }
    }

    pub fn page_count(&self) -> usize {
        pages_for(self.memory_required)
    }

    /// Spends one simulated second on this process. Outstanding load penalty
    /// is paid off before any CPU time is consumed.
    pub fn execute(&mut self, tick: u32) -> Execution {
        if self.state.load_penalty > 0 {
            self.state.load_penalty -= 1;
            return Execution::Loading;
        }

        self.state.time_remaining = self.state.time_remaining.saturating_sub(1);
        self.state.time_last_used = Some(tick);

        if self.state.time_remaining == 0 {
            Execution::Finished
        } else {
            Execution::Ran
        }
    }

    pub fn finish(self, time_finished: u32) -> FinishedProcess {
        FinishedProcess {
            pid: self.pid,
            arrival_time: self.arrival_time,
            memory_required: self.memory_required,
            job_time: self.job_time,
            time_finished,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ProcessState {
    pub time_remaining: u32,
    pub time_last_used: Option<u32>,
    pub load_penalty: u32,
}

impl ProcessState {
    pub fn new(job_time: u32) -> Self {
        Self {
            time_remaining: job_time,
            time_last_used: None,
            load_penalty: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Execution {
    Loading,
    Ran,
    Finished,
}

impl Execution {
    pub fn used_cpu(self) -> bool {
        !matches!(self, Execution::Loading)
    }
}

/// Immutable record of a completed process, as kept by the statistics log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedProcess {
    pub pid: Pid,
    pub arrival_time: u32,
    pub memory_required: u32,
    pub job_time: u32,
    pub time_finished: u32,
}

impl FinishedProcess {
    pub fn turnaround(&self) -> u32 {
        self.time_finished - self.arrival_time
    }

    pub fn overhead(&self) -> f64 {
        self.turnaround() as f64 / self.job_time as f64
    }
}
