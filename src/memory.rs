//! Physical memory: a fixed array of pages and the allocation and
//! eviction primitives the allocator strategies are built from.
//!
//! Each page records its owner and the slot it occupies in the owner's
//! local page list. All scans run front-to-back over the page array so
//! the selection order is part of the observable trace.

use std::cmp::Reverse;

use crate::config::PAGE_LOAD_COST;
use crate::process::{ProcState, ProcTable};
use crate::types::Pid;

/// One physical page. Free when `owner` is `None`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Page {
    pub owner: Option<Pid>,
    /// Index of this page within the owner's local page list. Only
    /// meaningful while `owner` is set.
    pub slot: usize,
}

#[derive(Debug, Clone)]
pub struct Memory {
    pages: Vec<Page>,
}

impl Memory {
    pub fn new(total_pages: usize) -> Self {
        Memory {
            pages: vec![Page::default(); total_pages],
        }
    }

    pub fn total_pages(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, addr: usize) -> &Page {
        &self.pages[addr]
    }

    /// Number of pages currently owned by any process.
    pub fn used_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.owner.is_some()).count()
    }

    /// Memory usage as a ceiling percentage of occupied pages.
    pub fn usage_pct(&self) -> u64 {
        if self.pages.is_empty() {
            return 0;
        }
        (self.used_pages() as u64 * 100).div_ceil(self.pages.len() as u64)
    }

    /// Addresses held by `pid`, in ascending address order.
    pub fn pages_of(&self, pid: Pid) -> Vec<usize> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, p)| p.owner == Some(pid))
            .map(|(addr, _)| addr)
            .collect()
    }

    /// Assign free pages to the process in context, scanning the page
    /// array front-to-back, until it holds `target` pages or no free
    /// page remains. Each page assigned costs [`PAGE_LOAD_COST`] cycles
    /// of load time. Never evicts.
    pub fn allocate(&mut self, table: &mut ProcTable, target: usize) {
        let idx = table.context();
        for addr in 0..self.pages.len() {
            if table.proc(idx).pages.len() >= target {
                break;
            }
            if self.pages[addr].owner.is_some() {
                continue;
            }
            let p = table.proc_mut(idx);
            self.pages[addr] = Page {
                owner: Some(p.id),
                slot: p.pages.len(),
            };
            p.pages.push(addr);
            p.load_pending += PAGE_LOAD_COST;
            p.load_total += PAGE_LOAD_COST;
        }
    }

    /// Free the first `n` pages (ascending address order) owned by
    /// `pid`. Returns the freed addresses.
    pub fn evict_process(&mut self, table: &mut ProcTable, pid: Pid, n: usize) -> Vec<usize> {
        let mut addrs = self.pages_of(pid);
        addrs.truncate(n);
        self.evict_pages(table, &addrs);
        addrs
    }

    /// Free an explicit, possibly multi-owner, set of addresses,
    /// removing each from its owner's local page list.
    pub fn evict_pages(&mut self, table: &mut ProcTable, addrs: &[usize]) {
        let mut owners: Vec<Pid> = Vec::new();
        for &addr in addrs {
            let Some(pid) = self.pages[addr].owner.take() else {
                continue;
            };
            if let Some(idx) = table.index_of(pid) {
                table.proc_mut(idx).pages.retain(|&a| a != addr);
            }
            if !owners.contains(&pid) {
                owners.push(pid);
            }
        }
        // Page slots shift when a page is removed from the middle of an
        // owner's list.
        for pid in owners {
            if let Some(idx) = table.index_of(pid) {
                for (slot, &addr) in table.proc(idx).pages.iter().enumerate() {
                    self.pages[addr].slot = slot;
                }
            }
        }
    }

    /// Eviction-victim selection: among processes holding at least one
    /// page and not mid-load, the one with the smallest `last_change`.
    /// Ties prefer the *later* arrival (the more recently arrived
    /// process has had less resident time to show for its pages), then
    /// the larger id. Returns a table index.
    pub fn oldest(&self, table: &ProcTable) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, p) in table.procs().iter().enumerate() {
            if p.pages.is_empty() || p.state == ProcState::Loading {
                continue;
            }
            let key = (p.last_change, Reverse(p.arrival), Reverse(p.id));
            match best {
                None => best = Some(i),
                Some(b) => {
                    let q = table.proc(b);
                    if key < (q.last_change, Reverse(q.arrival), Reverse(q.id)) {
                        best = Some(i);
                    }
                }
            }
        }
        best
    }
}
