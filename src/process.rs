//! Process model and process table.
//!
//! A [`Process`] carries the descriptor fields (id, memory requirement,
//! arrival, job time) plus the mutable bookkeeping the policies read:
//! timestamps, remaining time, load cost and the ordered list of page
//! addresses it holds. The [`ProcTable`] owns the processes sorted once
//! by `(arrival, id)` and tracks the currently selected context.

use crate::error::SimError;
use crate::types::{Pid, Time};

/// The state a simulated process can be in.
///
/// `Terminated` is absorbing. The `Loading`/`Running`/`Ready` cycle only
/// occurs under round-robin; FCFS and SJF go straight from `Admitted`
/// through `Loading`/`Running` to `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcState {
    /// Known to the table but not yet arrived.
    Init,
    /// Arrived and waiting for its first selection.
    Admitted,
    /// Selected into context, memory allocation in progress. A loading
    /// process is never an eviction victim.
    Loading,
    /// Executing on the simulated CPU.
    Running,
    /// Preempted with work left; waiting to be selected again.
    Ready,
    /// Finished. Holds no pages.
    Terminated,
}

#[derive(Debug, Clone)]
pub struct Process {
    pub id: Pid,
    /// Memory requirement in KB.
    pub mem_kb: u64,
    /// Arrival time in cycles.
    pub arrival: Time,
    /// Total job time in cycles, as given by the descriptor.
    pub job_time: Time,
    /// Cycles of work left. Non-increasing except for page-fault
    /// penalties added by the virtual and custom allocators.
    pub remaining: Time,
    /// When the process first started running.
    pub started: Option<Time>,
    /// Timestamp of the last state change. Drives round-robin selection
    /// and eviction-victim staleness.
    pub last_change: Time,
    /// When the process terminated.
    pub finished: Option<Time>,
    /// Accumulated page load cost over the whole run.
    pub load_total: Time,
    /// Page load cost incurred in the current scheduling interval.
    /// Cleared when the interval ends; `pause` deducts it from the
    /// elapsed time so only active cycles count against `remaining`.
    pub load_pending: Time,
    /// Addresses of the pages this process holds, in allocation order.
    pub pages: Vec<usize>,
    pub state: ProcState,
}

impl Process {
    pub fn new(id: Pid, mem_kb: u64, arrival: Time, job_time: Time) -> Self {
        Process {
            id,
            mem_kb,
            arrival,
            job_time,
            remaining: job_time,
            started: None,
            last_change: 0,
            finished: None,
            load_total: 0,
            load_pending: 0,
            pages: Vec::new(),
            state: ProcState::Init,
        }
    }

    /// Number of pages needed to hold the full memory requirement.
    pub fn required_pages(&self, page_kb: u64) -> usize {
        (self.mem_kb.div_ceil(page_kb)) as usize
    }

    /// Whether the process is waiting to be selected into context.
    pub fn is_waiting(&self) -> bool {
        matches!(self.state, ProcState::Admitted | ProcState::Ready)
    }
}

/// The process table: all processes sorted once by `(arrival, id)` at
/// construction, the count of non-terminated processes, and the index of
/// the process currently selected to occupy the CPU.
#[derive(Debug, Clone)]
pub struct ProcTable {
    procs: Vec<Process>,
    alive: usize,
    context: usize,
}

impl ProcTable {
    pub fn new(mut procs: Vec<Process>) -> Self {
        procs.sort_by_key(|p| (p.arrival, p.id));
        let alive = procs.len();
        ProcTable {
            procs,
            alive,
            context: 0,
        }
    }

    pub fn procs(&self) -> &[Process] {
        &self.procs
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }

    /// Count of processes that have not terminated.
    pub fn alive(&self) -> usize {
        self.alive
    }

    pub fn context(&self) -> usize {
        self.context
    }

    pub fn set_context(&mut self, idx: usize) {
        self.context = idx;
    }

    /// The process currently in context.
    pub fn current(&self) -> &Process {
        &self.procs[self.context]
    }

    pub fn current_mut(&mut self) -> &mut Process {
        &mut self.procs[self.context]
    }

    pub fn proc(&self, idx: usize) -> &Process {
        &self.procs[idx]
    }

    pub fn proc_mut(&mut self, idx: usize) -> &mut Process {
        &mut self.procs[idx]
    }

    pub fn index_of(&self, pid: Pid) -> Option<usize> {
        self.procs.iter().position(|p| p.id == pid)
    }

    /// Earliest arrival time among processes still in `Init`.
    pub fn next_arrival(&self) -> Option<Time> {
        self.procs
            .iter()
            .filter(|p| p.state == ProcState::Init)
            .map(|p| p.arrival)
            .min()
    }

    /// `Init → Admitted`. The driver passes the process's arrival time,
    /// not the current clock: the clock may have jumped past the arrival,
    /// but the admission logically happened when the process arrived, and
    /// round-robin selection orders by `last_change`.
    pub fn admit(&mut self, idx: usize, time: Time) {
        let p = &mut self.procs[idx];
        p.state = ProcState::Admitted;
        p.last_change = time;
    }

    /// `{Admitted, Ready, Loading} → Running`. Sets `started` on the
    /// first call only; a resume mirrors a start otherwise.
    pub fn start(&mut self, idx: usize, time: Time) {
        let p = &mut self.procs[idx];
        if p.started.is_none() {
            p.started = Some(time);
        }
        p.last_change = time;
        p.state = ProcState::Running;
    }

    /// `Running → Ready`. Deducts the elapsed active time from
    /// `remaining`: the wall interval since the last state change minus
    /// the load overhead incurred in it.
    pub fn pause(&mut self, idx: usize, time: Time) -> Result<(), SimError> {
        let p = &mut self.procs[idx];
        let elapsed = time - p.last_change;
        let active = elapsed.checked_sub(p.load_pending).ok_or_else(|| {
            SimError::Invariant(format!(
                "process {} paused inside its load window (elapsed {elapsed}, load {})",
                p.id, p.load_pending
            ))
        })?;
        p.remaining = p.remaining.checked_sub(active).ok_or_else(|| {
            SimError::Invariant(format!(
                "process {} remaining time underflow ({} - {active})",
                p.id, p.remaining
            ))
        })?;
        p.load_pending = 0;
        p.last_change = time;
        p.state = ProcState::Ready;
        Ok(())
    }

    /// `Running → Terminated`. The caller is responsible for releasing
    /// the process's pages first; termination itself only touches the
    /// process record.
    pub fn finish(&mut self, idx: usize, time: Time) {
        let p = &mut self.procs[idx];
        p.remaining = 0;
        p.load_pending = 0;
        p.finished = Some(time);
        p.last_change = time;
        p.state = ProcState::Terminated;
        self.alive -= 1;
    }
}
