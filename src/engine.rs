//! The driver: owns the System aggregate and advances the simulation to
//! completion.
//!
//! The engine is single-threaded and fully deterministic. The clock only
//! moves in explicit jumps: a full job-time jump for the non-preemptive
//! policies, `min(quantum, remaining)` for round-robin, plus whatever
//! load time the start incurred. The System is exclusively owned here
//! and lent to the scheduler and memory functions one step at a time.

use log::{debug, trace};

use crate::alloc;
use crate::config::SimConfig;
use crate::error::SimError;
use crate::memory::Memory;
use crate::process::{ProcState, ProcTable, Process};
use crate::sched;
use crate::trace::{Event, EventKind, MemSnapshot, Notifier};
use crate::types::Time;

/// Overall run status. `Ready` means a dispatch decision is due;
/// `Running` means the context process is mid-interval and the next step
/// advances the clock past it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ready,
    Running,
    Terminated,
}

/// The complete simulated machine: clock, process table, page array and
/// the configuration threaded through every call.
#[derive(Debug)]
pub struct System {
    pub clock: Time,
    pub table: ProcTable,
    pub memory: Memory,
    pub config: SimConfig,
    pub status: Status,
}

impl System {
    pub fn new(config: SimConfig, procs: Vec<Process>) -> Self {
        let memory = Memory::new(config.total_pages());
        let status = if procs.is_empty() {
            Status::Terminated
        } else {
            Status::Ready
        };
        System {
            clock: 0,
            table: ProcTable::new(procs),
            memory,
            config,
            status,
        }
    }

    /// Drive the simulation until every process has terminated, emitting
    /// events through `notifier` as they occur.
    pub fn run(&mut self, notifier: &mut dyn Notifier) -> Result<(), SimError> {
        while self.status != Status::Terminated {
            self.admit_arrivals();
            self.step(notifier)?;
        }
        debug!("simulation terminated at t={}", self.clock);
        Ok(())
    }

    /// One step of the per-policy state machine: dispatch when `Ready`,
    /// advance the clock past the current interval when `Running`.
    pub fn step(&mut self, notifier: &mut dyn Notifier) -> Result<(), SimError> {
        match self.status {
            Status::Ready => self.dispatch(notifier),
            Status::Running => self.advance(notifier),
            Status::Terminated => Ok(()),
        }
    }

    /// Admit every process whose arrival the clock has reached, in table
    /// order. The admission timestamp is the arrival itself, which may
    /// be earlier than the clock after a jump.
    fn admit_arrivals(&mut self) {
        for i in 0..self.table.len() {
            let p = self.table.proc(i);
            if p.state == ProcState::Init && p.arrival <= self.clock {
                let arrival = p.arrival;
                trace!("t={}: admitting process {}", self.clock, p.id);
                self.table.admit(i, arrival);
            }
        }
    }

    fn dispatch(&mut self, notifier: &mut dyn Notifier) -> Result<(), SimError> {
        match sched::select(self.config.scheduler, &self.table) {
            Some(idx) => {
                self.table.set_context(idx);
                self.start_context(notifier)?;
                self.status = Status::Running;
            }
            None => match self.table.next_arrival() {
                // Nothing runnable yet: jump the clock to the next
                // arrival and try again.
                Some(t) => {
                    trace!("t={}: idle until next arrival at t={t}", self.clock);
                    self.clock = self.clock.max(t);
                }
                None => self.status = Status::Terminated,
            },
        }
        Ok(())
    }

    /// Start or resume the process in context: grant it memory (evicting
    /// others as the allocator dictates), move it to `Running` and emit
    /// the `Run` event. Evictions land before the `Run` event at the
    /// same tick.
    fn start_context(&mut self, notifier: &mut dyn Notifier) -> Result<(), SimError> {
        let idx = self.table.context();
        if !self.table.proc(idx).is_waiting() {
            return Err(SimError::Invariant(format!(
                "context selected process {} in state {:?}",
                self.table.proc(idx).id,
                self.table.proc(idx).state
            )));
        }
        {
            let p = self.table.proc_mut(idx);
            p.state = ProcState::Loading;
            p.load_pending = 0;
        }
        alloc::ensure_resident(
            &mut self.memory,
            &mut self.table,
            &self.config,
            self.clock,
            notifier,
        )?;
        self.table.start(idx, self.clock);

        let p = self.table.proc(idx);
        let mem = if self.config.allocator.tracks_memory() {
            Some(MemSnapshot {
                load_time: p.load_pending,
                usage_pct: self.memory.usage_pct(),
                addrs: p.pages.clone(),
            })
        } else {
            None
        };
        notifier.notify(&Event {
            time: self.clock,
            kind: EventKind::Run {
                pid: p.id,
                remaining: p.remaining,
                mem,
            },
        });
        Ok(())
    }

    /// Jump the clock past the current interval, then finish or preempt
    /// the context process.
    fn advance(&mut self, notifier: &mut dyn Notifier) -> Result<(), SimError> {
        let idx = self.table.context();
        let (load, remaining) = {
            let p = self.table.proc(idx);
            (p.load_pending, p.remaining)
        };
        let run_for = sched::run_duration(self.config.scheduler, self.config.quantum, remaining);
        self.clock += load + run_for;
        if run_for == remaining {
            self.finish_context(notifier)?;
        } else {
            self.table.pause(idx, self.clock)?;
        }
        self.status = Status::Ready;
        Ok(())
    }

    /// Terminate the context process, releasing its pages. The release
    /// is observable as an `Evict` event immediately before the `Finish`
    /// event when the allocator tracks memory.
    fn finish_context(&mut self, notifier: &mut dyn Notifier) -> Result<(), SimError> {
        let idx = self.table.context();
        let pid = self.table.proc(idx).id;
        let held = self.table.proc(idx).pages.len();
        if held > 0 {
            let freed = self.memory.evict_process(&mut self.table, pid, held);
            notifier.notify(&Event {
                time: self.clock,
                kind: EventKind::Evict { addrs: freed },
            });
        }
        self.table.finish(idx, self.clock);
        notifier.notify(&Event {
            time: self.clock,
            kind: EventKind::Finish {
                pid,
                alive: self.table.alive(),
            },
        });
        Ok(())
    }
}
