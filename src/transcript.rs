use std::fmt;

use crate::{paging::Pfn, process::Pid};

/// One line of the simulation transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Running {
        time: u32,
        pid: Pid,
        remaining: u32,
        memory: Option<MemorySnapshot>,
    },
    Evicted {
        time: u32,
        frames: Vec<Pfn>,
    },
    Finished {
        time: u32,
        pid: Pid,
        proc_remaining: usize,
    },
}

impl Event {
    pub fn time(&self) -> u32 {
        match self {
            Event::Running { time, .. } | Event::Evicted { time, .. } | Event::Finished { time, .. } => {
                *time
            }
        }
    }
}

/// Memory state reported alongside RUNNING when memory is bounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub load_time: u32,
    pub usage: u32,
    pub frames: Vec<Pfn>,
}

struct FrameList<'a>(&'a [Pfn]);

impl fmt::Display for FrameList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (idx, pfn) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", pfn)?;
        }
        f.write_str("]")
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Running {
                time,
                pid,
                remaining,
                memory,
            } => {
                write!(f, "{}, RUNNING, id={}, remaining-time={}", time, pid, remaining)?;
                if let Some(snapshot) = memory {
                    write!(
                        f,
                        ", load-time={}, mem-usage={}%, mem-addresses={}",
                        snapshot.load_time,
                        snapshot.usage,
                        FrameList(&snapshot.frames)
                    )?;
                }
                Ok(())
            }
            Event::Evicted { time, frames } => {
                write!(f, "{}, EVICTED, mem-addresses={}", time, FrameList(frames))
            }
            Event::Finished {
                time,
                pid,
                proc_remaining,
            } => write!(
                f,
                "{}, FINISHED, id={}, proc-remaining={}",
                time, pid, proc_remaining
            ),
        }
    }
}
