//! Allocator strategies.
//!
//! Each strategy brings the process in context up to its residency
//! target before it runs, evicting other processes' pages as needed.
//! Evictions are emitted through the [`Notifier`] at the current clock,
//! before the `Run` event the engine emits for the same tick.
//!
//! The strategies differ in the target they guarantee and in how they
//! pick victims:
//!
//! - **unlimited** guarantees nothing and tracks nothing;
//! - **swap** guarantees the full requirement, evicting whole processes
//!   stalest-first;
//! - **virtual** guarantees only a minimum working set, charging one
//!   cycle of extra execution per page still missing;
//! - **custom** sizes its target from the surplus held by larger ready
//!   processes and evicts their pages first, keeping small processes
//!   resident.

use std::cmp::Reverse;

use log::debug;

use crate::config::{SimConfig, MIN_WORKING_SET};
use crate::error::SimError;
use crate::memory::Memory;
use crate::process::{ProcState, ProcTable};
use crate::trace::{Event, EventKind, Notifier};
use crate::types::{AllocatorKind, Time};

/// Bring the process in context up to the residency target of the
/// configured strategy. The process must already be marked `Loading` so
/// it is never its own eviction victim.
pub fn ensure_resident(
    mem: &mut Memory,
    table: &mut ProcTable,
    cfg: &SimConfig,
    clock: Time,
    notifier: &mut dyn Notifier,
) -> Result<(), SimError> {
    match cfg.allocator {
        AllocatorKind::Unlimited => Ok(()),
        AllocatorKind::Swap => swap(mem, table, cfg, clock, notifier),
        AllocatorKind::Virtual => virtual_mem(mem, table, cfg, clock, notifier),
        AllocatorKind::Custom => smallswap(mem, table, cfg, clock, notifier),
    }
}

fn evict_event(clock: Time, addrs: Vec<usize>) -> Event {
    Event {
        time: clock,
        kind: EventKind::Evict { addrs },
    }
}

/// Whole-process swapping: allocate until the full requirement is
/// resident, evicting *all* pages of the stalest victim each round.
fn swap(
    mem: &mut Memory,
    table: &mut ProcTable,
    cfg: &SimConfig,
    clock: Time,
    notifier: &mut dyn Notifier,
) -> Result<(), SimError> {
    let required = table.current().required_pages(cfg.page_kb);
    loop {
        mem.allocate(table, required);
        if table.current().pages.len() >= required {
            return Ok(());
        }
        let victim = mem.oldest(table).ok_or_else(|| {
            SimError::Invariant(format!(
                "process {} needs {} pages but only {} exist and no victim remains",
                table.current().id,
                required,
                mem.total_pages()
            ))
        })?;
        let vpid = table.proc(victim).id;
        let held = table.proc(victim).pages.len();
        debug!("swap: evicting all {held} pages of process {vpid}");
        let freed = mem.evict_process(table, vpid, held);
        notifier.notify(&evict_event(clock, freed));
    }
}

/// Holder processes ordered stalest-first: smallest `last_change`, ties
/// to the later arrival then the larger id, mirroring `Memory::oldest`.
fn staleness_order(table: &ProcTable) -> Vec<usize> {
    let mut order: Vec<usize> = (0..table.len())
        .filter(|&i| {
            let p = table.proc(i);
            !p.pages.is_empty() && p.state != ProcState::Loading
        })
        .collect();
    order.sort_by_key(|&i| {
        let p = table.proc(i);
        (p.last_change, Reverse(p.arrival), Reverse(p.id))
    });
    order
}

/// Collect up to `needed` victim page addresses by walking `order` and,
/// within each process, the page array front-to-back. The result is
/// sorted ascending before eviction.
fn collect_victim_pages(
    mem: &Memory,
    table: &ProcTable,
    order: &[usize],
    needed: usize,
) -> Vec<usize> {
    let mut candidates = Vec::with_capacity(needed);
    'outer: for &i in order {
        let pid = table.proc(i).id;
        for addr in 0..mem.total_pages() {
            if candidates.len() >= needed {
                break 'outer;
            }
            if mem.page(addr).owner == Some(pid) {
                candidates.push(addr);
            }
        }
    }
    candidates.sort_unstable();
    candidates
}

/// Virtual memory: try for the full requirement, but only guarantee the
/// minimum working set. Every page still missing from the requirement
/// adds one cycle to the process's remaining time.
fn virtual_mem(
    mem: &mut Memory,
    table: &mut ProcTable,
    cfg: &SimConfig,
    clock: Time,
    notifier: &mut dyn Notifier,
) -> Result<(), SimError> {
    let required = table.current().required_pages(cfg.page_kb);
    let min_target = MIN_WORKING_SET.min(required);
    loop {
        mem.allocate(table, required);
        let held = table.current().pages.len();
        if held >= min_target {
            break;
        }
        let order = staleness_order(table);
        let victims = collect_victim_pages(mem, table, &order, min_target - held);
        if victims.is_empty() {
            return Err(SimError::Invariant(format!(
                "process {} cannot reach its working set of {min_target} pages",
                table.current().id
            )));
        }
        mem.evict_pages(table, &victims);
        notifier.notify(&evict_event(clock, victims));
    }
    apply_fault_penalty(table, required);
    Ok(())
}

/// Small-footprint priority: the target grows with the surplus (pages
/// beyond the minimum working set) held by larger ready processes, and
/// those larger processes are the first eviction victims.
fn smallswap(
    mem: &mut Memory,
    table: &mut ProcTable,
    cfg: &SimConfig,
    clock: Time,
    notifier: &mut dyn Notifier,
) -> Result<(), SimError> {
    let required = table.current().required_pages(cfg.page_kb);
    let min_target = MIN_WORKING_SET.min(required);
    let order = size_order(table);
    let me = table.current().id;

    let mut surplus = 0usize;
    for &i in &order {
        let p = table.proc(i);
        if p.id == me {
            break;
        }
        if !p.is_waiting() {
            continue;
        }
        surplus += p.pages.len().saturating_sub(MIN_WORKING_SET);
        if surplus >= required {
            break;
        }
    }
    let target = surplus.clamp(min_target, required);
    debug!("smallswap: process {me} target {target} of {required} required");

    loop {
        mem.allocate(table, required);
        let held = table.current().pages.len();
        if held >= target {
            break;
        }
        let victim_order: Vec<usize> = order
            .iter()
            .copied()
            .filter(|&i| table.proc(i).id != me && !table.proc(i).pages.is_empty())
            .collect();
        let victims = collect_victim_pages(mem, table, &victim_order, target - held);
        if victims.is_empty() {
            return Err(SimError::Invariant(format!(
                "process {me} cannot reach its target of {target} pages"
            )));
        }
        mem.evict_pages(table, &victims);
        notifier.notify(&evict_event(clock, victims));
    }
    apply_fault_penalty(table, required);
    Ok(())
}

/// Processes ordered by descending memory size, ties to the larger id.
fn size_order(table: &ProcTable) -> Vec<usize> {
    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by_key(|&i| {
        let p = table.proc(i);
        (Reverse(p.mem_kb), Reverse(p.id))
    });
    order
}

/// One cycle of page-fault cost per page short of the full requirement.
fn apply_fault_penalty(table: &mut ProcTable, required: usize) {
    let p = table.current_mut();
    let shortfall = required.saturating_sub(p.pages.len()) as Time;
    p.remaining += shortfall;
}
