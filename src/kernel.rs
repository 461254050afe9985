use log::{debug, info};

use crate::{
    config::{Config, ConfigError, SchedulingPolicy},
    memory::MemoryManager,
    process::{Execution, Process},
    queue::{ArrivalQueue, ReadyQueue},
    stats::{StatisticsLog, Summary},
    transcript::{Event, MemorySnapshot},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing to run, arrivals still pending.
    Idle,
    /// The head is paying off its memory load penalty.
    Loading,
    Running,
    /// Running with no arrivals left.
    Draining,
    Done,
}

pub struct Kernel {
    pub mm: MemoryManager,
    arrivals: ArrivalQueue,
    ready: ReadyQueue,
    log: StatisticsLog,
    scheduling: SchedulingPolicy,
    quantum: u32,
    quantum_used: u32,
    clock: u32,
    head_finished: bool,
    state: SchedulerState,
}

impl Kernel {
    pub fn new(config: &Config, processes: Vec<Process>) -> Result<Self, ConfigError> {
        config.check_workload(&processes)?;

        let mm = MemoryManager::new(config.memory, config.memory_size_kb, processes.len());
        debug!(
            "{} processes, {} scheduling, {} memory over {} frames",
            processes.len(),
            config.scheduling,
            config.memory,
            mm.total_frames()
        );

        Ok(Self {
            mm,
            arrivals: ArrivalQueue::new(processes),
            ready: ReadyQueue::new(),
            log: StatisticsLog::new(),
            scheduling: config.scheduling,
            quantum: config.quantum,
            quantum_used: 0,
            clock: 0,
            head_finished: false,
            state: SchedulerState::Idle,
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn clock(&self) -> u32 {
        self.clock
    }

    pub fn ready(&self) -> &ReadyQueue {
        &self.ready
    }

    pub fn arrivals(&self) -> &ArrivalQueue {
        &self.arrivals
    }

    pub fn log(&self) -> &StatisticsLog {
        &self.log
    }

    /// Runs to completion, handing every transcript event to `emit`.
    pub fn run<F: FnMut(Event)>(mut self, mut emit: F) -> Summary {
        while self.tick(&mut emit) != SchedulerState::Done {}

        let summary = self.summary();
        info!(
            "makespan {}: {} page faults, {} frames evicted",
            summary.makespan, summary.memory.page_faults, summary.memory.evicted_frames
        );
        summary
    }

    pub fn summary(&self) -> Summary {
        self.log.summarize(self.clock, self.mm.stats)
    }

    /// Advances the simulation by one second.
    pub fn tick<F: FnMut(Event)>(&mut self, emit: &mut F) -> SchedulerState {
        if self.state == SchedulerState::Done {
            return self.state;
        }
        let now = self.clock;

        if self.head_finished {
            self.head_finished = false;
            self.retire_head(now, emit);
            if self.ready.is_empty() && self.arrivals.is_empty() {
                return self.halt();
            }
            if self.scheduling == SchedulingPolicy::ShortestJob {
                self.ready.promote_shortest();
            }
            if !self.ready.is_empty() {
                self.dispatch_head(now, emit);
            }
        }

        if self.ready.is_empty() && self.arrivals.is_empty() {
            return self.halt();
        }

        let was_empty = self.ready.is_empty();
        let admitted = self.ready.admit_due(&mut self.arrivals, now);
        if admitted > 0 {
            debug!("t={}: admitted {} processes", now, admitted);
            if was_empty {
                self.dispatch_head(now, emit);
            }
        }

        if self.scheduling == SchedulingPolicy::RoundRobin {
            self.expire_quantum(now, emit);
        }

        self.state = self.classify();
        if let Some(execution) = self.ready.run_head(now) {
            if execution.used_cpu() {
                self.quantum_used += 1;
                if let Some(head) = self.ready.head() {
                    self.mm.access(head);
                }
            }
            self.head_finished = execution == Execution::Finished;
        }

        self.clock += 1;
        self.state
    }

    fn halt(&mut self) -> SchedulerState {
        debug!("t={}: all processes finished", self.clock);
        self.state = SchedulerState::Done;
        self.state
    }

    fn classify(&self) -> SchedulerState {
        match self.ready.head() {
            None => SchedulerState::Idle,
            Some(head) if head.state.load_penalty > 0 => SchedulerState::Loading,
            Some(_) if self.arrivals.is_empty() => SchedulerState::Draining,
            Some(_) => SchedulerState::Running,
        }
    }

    /// Makes the head of the ready queue resident and announces it.
    fn dispatch_head<F: FnMut(Event)>(&mut self, now: u32, emit: &mut F) {
        let Some(head) = self.ready.head_mut() else {
            return;
        };
        let outcome = self.mm.load(head);
        head.state.load_penalty = outcome.load_time;
        let (pid, remaining) = (head.pid, head.state.time_remaining);
        self.quantum_used = 0;

        if !outcome.evicted.is_empty() {
            emit(Event::Evicted {
                time: now,
                frames: outcome.evicted,
            });
        }

        let memory = if self.mm.policy().is_bounded() {
            Some(MemorySnapshot {
                load_time: outcome.load_time,
                usage: self.mm.usage_percent(),
                frames: self.mm.frames_of(pid),
            })
        } else {
            None
        };
        emit(Event::Running {
            time: now,
            pid,
            remaining,
            memory,
        });
    }

    fn retire_head<F: FnMut(Event)>(&mut self, now: u32, emit: &mut F) {
        let Some(process) = self.ready.pop_head() else {
            return;
        };

        let freed = self.mm.release(process.pid);
        if !freed.is_empty() {
            emit(Event::Evicted {
                time: now,
                frames: freed,
            });
        }
        emit(Event::Finished {
            time: now,
            pid: process.pid,
            proc_remaining: self.ready.len(),
        });

        self.log.record(process.finish(now));
    }

    /// Rotates the ready queue once the head has had its quantum of CPU.
    /// A lone process just starts a fresh quantum.
    fn expire_quantum<F: FnMut(Event)>(&mut self, now: u32, emit: &mut F) {
        let Some(head) = self.ready.head() else {
            return;
        };
        if head.state.load_penalty > 0 || self.quantum_used < self.quantum {
            return;
        }

        self.quantum_used = 0;
        if self.ready.len() > 1 {
            self.ready.rotate();
            self.dispatch_head(now, emit);
        }
    }
}
