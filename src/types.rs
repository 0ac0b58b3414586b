//! Newtype wrappers and type aliases for domain concepts.
//!
//! A newtype for process identifiers prevents silent confusion with page
//! addresses and table indices, which are all plain integers in the
//! simulation. Simulated time is a type alias: it is only ever added to
//! and compared, so a full newtype would be boilerplate.

use std::fmt;

use clap::ValueEnum;

/// Simulated time in cycles. Monotonic, non-negative, advanced only by
/// explicit jumps in the driver loop.
pub type Time = u64;

/// Process identifier, taken verbatim from the descriptor file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Pid(pub u32);

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which scheduling policy drives the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchedulerKind {
    /// First-come-first-served: non-preemptive, table order.
    Fcfs,
    /// Round-robin: preemptive with a fixed quantum.
    Rr,
    /// Shortest-job-first: non-preemptive, re-sorted at every decision.
    Sjf,
}

/// Which memory allocation policy the run uses. Fixed for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AllocatorKind {
    /// Memory is never tracked; processes always fit.
    Unlimited,
    /// Whole-process swapping: a starting process gets its full
    /// requirement, evicting entire victims as needed.
    Swap,
    /// Virtual memory: only a minimum working set is guaranteed, with a
    /// page-fault penalty for every missing page.
    Virtual,
    /// Small-footprint priority: like virtual, but victims are drawn
    /// from the largest ready processes first.
    Custom,
}

impl AllocatorKind {
    /// Whether this allocator tracks the page array at all. The
    /// unlimited allocator never touches memory and its `Run` events
    /// carry no memory fields.
    pub fn tracks_memory(self) -> bool {
        !matches!(self, AllocatorKind::Unlimited)
    }
}
