use std::{fmt, str::FromStr};

use crate::{config::ConfigError, memory::FrameTable, process::Pid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pfn(pub usize);

impl fmt::Display for Pfn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemoryPolicy {
    /// Memory is never a constraint.
    Unlimited,
    /// Whole processes are swapped in and out.
    Swap,
    /// Demand paging with a minimum resident set.
    Virtual,
    /// Demand paging with second-chance frame replacement.
    SecondChance,
}

impl MemoryPolicy {
    pub fn is_bounded(self) -> bool {
        !matches!(self, MemoryPolicy::Unlimited)
    }
}

impl FromStr for MemoryPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "u" | "unlimited" => Ok(MemoryPolicy::Unlimited),
            "p" | "swap" => Ok(MemoryPolicy::Swap),
            "v" | "virtual" => Ok(MemoryPolicy::Virtual),
            "cm" | "custom" | "second-chance" => Ok(MemoryPolicy::SecondChance),
            other => Err(ConfigError::UnknownMemoryPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for MemoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MemoryPolicy::Unlimited => "unlimited",
            MemoryPolicy::Swap => "swap",
            MemoryPolicy::Virtual => "virtual",
            MemoryPolicy::SecondChance => "second-chance",
        };
        f.write_str(name)
    }
}

/// Second-chance sweep over the frame table. The hand keeps its position
/// between sweeps.
pub struct Clock {
    hand: usize,
    frame_count: usize,
}
impl Clock {
    pub fn new(frame_count: usize) -> Self {
        Self {
            hand: 0,
            frame_count,
        }
    }

    fn inc(&mut self) {
        self.hand += 1;
        if self.hand == self.frame_count {
            self.hand = 0;
        }
    }

    /// Sweeps from frame 0 for a frame owned by anyone but `requester`.
    /// Referenced frames have their bit cleared and are passed over once.
    /// Returns `None` when no frame belongs to another process.
    pub fn pick_victim(&mut self, frame_table: &mut FrameTable, requester: Pid) -> Option<Pfn> {
        self.hand = 0;
        let has_candidate = frame_table
            .entries
            .iter()
            .any(|fte| fte.owner.is_some_and(|owner| owner != requester));
        if !has_candidate {
            return None;
        }

        loop {
            let fte = &mut frame_table.entries[self.hand];
            match fte.owner {
                Some(owner) if owner != requester => {
                    if fte.referenced {
                        fte.referenced = false;
                        self.inc();
                    } else {
                        let victim = self.hand;
                        self.inc();
                        return Some(Pfn(victim));
                    }
                }
                _ => self.inc(),
            }
        }
    }
}
