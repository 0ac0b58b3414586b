//! Run configuration.
//!
//! All policy selections live in one plain value, constructed once,
//! validated up front and threaded through every component call. No
//! global state.

use crate::error::SimError;
use crate::types::{AllocatorKind, SchedulerKind, Time};

/// Page size in KB when none is given on the command line.
pub const DEFAULT_PAGE_KB: u64 = 4;

/// Round-robin quantum in cycles when none is given on the command line.
pub const DEFAULT_QUANTUM: Time = 10;

/// Cycles it takes to load one page into memory.
pub const PAGE_LOAD_COST: Time = 2;

/// Minimum working set, in pages, guaranteed by the virtual and custom
/// allocators.
pub const MIN_WORKING_SET: usize = 4;

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub scheduler: SchedulerKind,
    pub allocator: AllocatorKind,
    /// Total physical memory in KB. Ignored by the unlimited allocator.
    pub mem_kb: u64,
    /// Page size in KB.
    pub page_kb: u64,
    /// Round-robin quantum in cycles.
    pub quantum: Time,
}

impl SimConfig {
    pub fn new(
        scheduler: SchedulerKind,
        allocator: AllocatorKind,
        mem_kb: u64,
        page_kb: u64,
        quantum: Time,
    ) -> Result<Self, SimError> {
        if page_kb == 0 {
            return Err(SimError::Config("page size must be positive".into()));
        }
        if quantum == 0 {
            return Err(SimError::Config("quantum must be positive".into()));
        }
        if allocator.tracks_memory() && mem_kb / page_kb == 0 {
            return Err(SimError::Config(format!(
                "memory size must hold at least one {page_kb}KB page, got {mem_kb}KB"
            )));
        }
        Ok(SimConfig {
            scheduler,
            allocator,
            mem_kb,
            page_kb,
            quantum,
        })
    }

    /// Number of physical pages in the simulated memory.
    pub fn total_pages(&self) -> usize {
        (self.mem_kb / self.page_kb) as usize
    }
}
