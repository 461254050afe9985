use crate::{memory::FrameTable, process::Pid};

pub struct Mmu;

impl Mmu {
    pub fn new() -> Self {
        Self {}
    }

    /// Records a CPU second spent by `pid`: every frame it owns gets its
    /// reference bit set. Reports how many of its `pages` were not resident.
    pub fn access(&self, frame_table: &mut FrameTable, pid: Pid, pages: usize) -> AccessResult {
        let mut resident = 0;
        for fte in frame_table.entries.iter_mut() {
            if fte.owner == Some(pid) {
                fte.referenced = true;
                resident += 1;
            }
        }

        if resident >= pages {
            AccessResult::Hit
        } else {
            AccessResult::PageFault {
                missing: pages - resident,
            }
        }
    }
}

impl Default for Mmu {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AccessResult {
    Hit,
    PageFault { missing: usize },
}
