use std::collections::VecDeque;

use crate::process::{Execution, Process};

/// Processes that have not arrived yet, ordered by arrival time then PID.
#[derive(Debug, Default)]
pub struct ArrivalQueue {
    pending: VecDeque<Process>,
}
impl ArrivalQueue {
    pub fn new(mut processes: Vec<Process>) -> Self {
        processes.sort_by_key(|p| (p.arrival_time, p.pid));
        Self {
            pending: processes.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn next_arrival(&self) -> Option<u32> {
        self.pending.front().map(|p| p.arrival_time)
    }

    pub fn pop_due(&mut self, now: u32) -> Option<Process> {
        match self.next_arrival() {
            Some(arrival) if arrival <= now => self.pending.pop_front(),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct ReadyQueue {
    processes: VecDeque<Process>,
}
impl ReadyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    pub fn head(&self) -> Option<&Process> {
        self.processes.front()
    }

    pub fn head_mut(&mut self) -> Option<&mut Process> {
        self.processes.front_mut()
    }

    pub fn pop_head(&mut self) -> Option<Process> {
        self.processes.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.processes.iter()
    }

    /// Moves every process due at `now` out of `arrivals`. Returns how many
    /// were admitted.
    pub fn admit_due(&mut self, arrivals: &mut ArrivalQueue, now: u32) -> usize {
        let mut admitted = 0;
        while let Some(process) = arrivals.pop_due(now) {
            self.insert(process);
            admitted += 1;
        }
        admitted
    }

    fn insert(&mut self, process: Process) {
        let position = self
            .processes
            .iter()
            .position(|p| p.arrival_time == process.arrival_time && p.pid > process.pid);
        match position {
            Some(idx) => self.processes.insert(idx, process),
            None => self.processes.push_back(process),
        }
    }

    pub fn run_head(&mut self, tick: u32) -> Option<Execution> {
        self.processes.front_mut().map(|p| p.execute(tick))
    }

    pub fn rotate(&mut self) {
        if self.processes.len() > 1 {
            self.processes.rotate_left(1);
        }
    }

    /// Moves the process with the shortest total job time to the head.
    /// Ties go to whichever comes first in the current order.
    pub fn promote_shortest(&mut self) {
        if self.processes.len() < 2 {
            return;
        }
        let shortest = self
            .processes
            .iter()
            .enumerate()
            .min_by_key(|(idx, p)| (p.job_time, *idx))
            .map(|(idx, _)| idx);
        if let Some(idx) = shortest.filter(|&idx| idx > 0) {
            if let Some(process) = self.processes.remove(idx) {
                self.processes.push_front(process);
            }
        }
    }
}
