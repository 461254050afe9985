use log::{debug, trace, warn};

use crate::{
    hardware::mmu::{AccessResult, Mmu},
    paging::{Clock, MemoryPolicy, Pfn},
    process::{Pid, Process},
};

pub const PAGE_SIZE_KB: u32 = 4;
pub const LOAD_TIME_PER_PAGE: u32 = 2;
/// Smallest footprint a process must have resident to run under paging.
pub const MIN_RESIDENT_KB: u32 = 16;

pub fn pages_for(kb: u32) -> usize {
    (kb / PAGE_SIZE_KB) as usize
}

pub struct MemoryManager {
    policy: MemoryPolicy,
    pub frame_table: FrameTable,
    pub residents: ResidencyList,
    pub mmu: Mmu,
    clock: Clock,
    pub stats: MemoryStats,
}
impl MemoryManager {
    pub fn new(policy: MemoryPolicy, total_kb: u32, max_processes: usize) -> Self {
        let frame_count = if policy.is_bounded() {
            pages_for(total_kb)
        } else {
            0
        };
        Self {
            policy,
            frame_table: FrameTable::new(frame_count),
            residents: ResidencyList::new(max_processes),
            mmu: Mmu::new(),
            clock: Clock::new(frame_count),
            stats: MemoryStats::default(),
        }
    }

    pub fn policy(&self) -> MemoryPolicy {
        self.policy
    }

    pub fn total_frames(&self) -> usize {
        self.frame_table.len()
    }

    pub fn count_free(&self) -> usize {
        self.frame_table.count_free()
    }

    pub fn used_frames(&self) -> usize {
        self.total_frames() - self.count_free()
    }

    pub fn resident_pages(&self, pid: Pid) -> usize {
        self.frame_table.owned_by(pid).count()
    }

    pub fn frames_of(&self, pid: Pid) -> Vec<Pfn> {
        self.frame_table.owned_by(pid).collect()
    }

    pub fn usage_percent(&self) -> u32 {
        let total = self.total_frames();
        if total == 0 {
            return 0;
        }
        (100 * self.used_frames()).div_ceil(total) as u32
    }

    /// Claims up to `pages` free frames for `pid`, lowest index first.
    /// Returns how many frames were actually claimed.
    pub fn insert(&mut self, pid: Pid, pages: usize) -> usize {
        let mut loaded = 0;
        while loaded < pages {
            let Some(pfn) = self.frame_table.get_unassigned() else {
                break;
            };
            self.frame_table.entries[pfn.0].assign(pid);
            trace!("frame {} <- pid {}", pfn, pid);
            loaded += 1;
        }
        if loaded < pages {
            warn!("pid {}: wanted {} frames, only {} free", pid, pages, loaded);
        }
        if loaded > 0 {
            self.residents.register(pid);
        }
        loaded
    }

    pub fn evict_all(&mut self, pid: Pid) -> Vec<Pfn> {
        let mut freed = Vec::new();
        for (idx, fte) in self.frame_table.entries.iter_mut().enumerate() {
            if fte.owner == Some(pid) {
                fte.clear();
                freed.push(Pfn(idx));
            }
        }
        self.residents.remove(pid);
        freed
    }

    pub fn evict_one(&mut self, pid: Pid) -> Option<Pfn> {
        let pfn = self.frame_table.owned_by(pid).next()?;
        self.free_frame(pfn);
        Some(pfn)
    }

    /// Picks the process whose pages make room for `requester`: the most
    /// recently registered resident other than the requester itself.
    pub fn choose_evictee(&self, requester: Pid) -> Option<Pid> {
        self.residents.most_recent_except(requester)
    }

    pub fn clock_evict(&mut self, requester: Pid) -> Option<Pfn> {
        let pfn = self.clock.pick_victim(&mut self.frame_table, requester)?;
        self.free_frame(pfn);
        Some(pfn)
    }

    fn free_frame(&mut self, pfn: Pfn) {
        let fte = &mut self.frame_table.entries[pfn.0];
        let owner = fte.owner;
        fte.clear();
        if let Some(owner) = owner {
            trace!("frame {} freed from pid {}", pfn, owner);
            if self.resident_pages(owner) == 0 {
                self.residents.remove(owner);
            }
        }
    }

    /// Makes `process` runnable according to the configured policy.
    pub fn load(&mut self, process: &Process) -> LoadOutcome {
        let outcome = match self.policy {
            MemoryPolicy::Unlimited => LoadOutcome::default(),
            MemoryPolicy::Swap => self.load_swap(process),
            MemoryPolicy::Virtual | MemoryPolicy::SecondChance => self.load_paged(process),
        };

        if outcome.page_fault {
            self.stats.page_faults += 1;
        }
        self.stats.evicted_frames += outcome.evicted.len() as u64;
        debug!(
            "pid {}: load-time={} evicted={} fault={} usage={}%",
            process.pid,
            outcome.load_time,
            outcome.evicted.len(),
            outcome.page_fault,
            self.usage_percent()
        );
        outcome
    }

    fn load_swap(&mut self, process: &Process) -> LoadOutcome {
        let pid = process.pid;
        let required = process.page_count();
        let resident = self.resident_pages(pid);
        if resident >= required {
            return LoadOutcome::default();
        }

        let missing = required - resident;
        let mut evicted = Vec::new();
        while self.count_free() < missing {
            let Some(victim) = self.choose_evictee(pid) else {
                warn!("pid {}: nothing left to swap out", pid);
                break;
            };
            debug!("pid {}: swapping out pid {}", pid, victim);
            evicted.extend(self.evict_all(victim));
        }

        let loaded = self.insert(pid, missing);
        LoadOutcome::new(loaded, evicted, false)
    }

    fn load_paged(&mut self, process: &Process) -> LoadOutcome {
        let pid = process.pid;
        let total = process.page_count();
        let resident = self.resident_pages(pid);
        let threshold = total.min(pages_for(MIN_RESIDENT_KB));

        if resident >= threshold {
            return LoadOutcome::new(0, Vec::new(), resident < total);
        }

        let need = total - resident;
        let free = self.count_free();
        if free >= need {
            let loaded = self.insert(pid, need);
            return LoadOutcome::new(loaded, Vec::new(), false);
        }

        let shortfall = threshold - resident;
        if free >= shortfall {
            let loaded = self.insert(pid, free);
            return LoadOutcome::new(loaded, Vec::new(), true);
        }

        let mut evicted = Vec::new();
        while self.count_free() < shortfall {
            let freed = match self.policy {
                MemoryPolicy::SecondChance => self.clock_evict(pid),
                _ => self
                    .choose_evictee(pid)
                    .and_then(|victim| self.evict_one(victim)),
            };
            match freed {
                Some(pfn) => evicted.push(pfn),
                None => {
                    warn!("pid {}: no frame can be reclaimed", pid);
                    break;
                }
            }
        }

        let loaded = self.insert(pid, shortfall);
        LoadOutcome::new(loaded, evicted, true)
    }

    /// Frees everything a finished process holds.
    pub fn release(&mut self, pid: Pid) -> Vec<Pfn> {
        if !self.policy.is_bounded() {
            return Vec::new();
        }
        self.evict_all(pid)
    }

    pub fn access(&mut self, process: &Process) {
        if !self.policy.is_bounded() {
            return;
        }
        let result = self
            .mmu
            .access(&mut self.frame_table, process.pid, process.page_count());
        if let AccessResult::PageFault { missing } = result {
            trace!("pid {} running with {} pages absent", process.pid, missing);
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct LoadOutcome {
    pub load_time: u32,
    pub evicted: Vec<Pfn>,
    pub page_fault: bool,
}
impl LoadOutcome {
    fn new(pages_loaded: usize, mut evicted: Vec<Pfn>, page_fault: bool) -> Self {
        evicted.sort();
        evicted.dedup();
        let page_fault = page_fault || !evicted.is_empty();
        Self {
            load_time: pages_loaded as u32 * LOAD_TIME_PER_PAGE,
            evicted,
            page_fault,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryStats {
    pub page_faults: u64,
    pub evicted_frames: u64,
}

pub struct FrameTable {
    pub entries: Vec<FrameTableEntry>,
}
impl FrameTable {
    pub fn new(frame_count: usize) -> Self {
        let mut entries = Vec::with_capacity(frame_count);
        for _ in 0..frame_count {
            entries.push(FrameTableEntry::new());
        }
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_free(&self) -> usize {
        self.entries.iter().filter(|fte| fte.is_free()).count()
    }

    pub fn get_unassigned(&self) -> Option<Pfn> {
        self.entries.iter().position(|fte| fte.is_free()).map(Pfn)
    }

    pub fn owned_by(&self, pid: Pid) -> impl Iterator<Item = Pfn> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, fte)| fte.owner == Some(pid))
            .map(|(idx, _)| Pfn(idx))
    }
}

pub struct FrameTableEntry {
    pub owner: Option<Pid>,
    pub referenced: bool,
}
impl FrameTableEntry {
    pub fn new() -> Self {
        FrameTableEntry {
            owner: None,
            referenced: false,
        }
    }

    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    pub fn clear(&mut self) {
        self.owner = None;
        self.referenced = false;
    }

    pub fn assign(&mut self, pid: Pid) {
        self.owner = Some(pid);
        self.referenced = true;
    }
}

impl Default for FrameTableEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// PIDs with at least one resident frame, in the order they became resident.
pub struct ResidencyList {
    pids: Vec<Pid>,
}
impl ResidencyList {
    pub fn new(capacity: usize) -> Self {
        Self {
            pids: Vec::with_capacity(capacity),
        }
    }

    pub fn register(&mut self, pid: Pid) {
        if !self.contains(pid) {
            self.pids.push(pid);
        }
    }

    pub fn remove(&mut self, pid: Pid) {
        self.pids.retain(|&p| p != pid);
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.pids.contains(&pid)
    }

    pub fn len(&self) -> usize {
        self.pids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Pid> + '_ {
        self.pids.iter().copied()
    }

    pub fn most_recent_except(&self, requester: Pid) -> Option<Pid> {
        self.pids.iter().rev().copied().find(|&p| p != requester)
    }
}
