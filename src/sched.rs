//! Scheduler strategies: pure selection logic.
//!
//! Each strategy is a linear scan over the table returning the index of
//! the process to run next, or `None` when nothing is in `Admitted` or
//! `Ready` state. The scan order and tie-breaks are part of the
//! observable trace, so they live here as pure functions the tests can
//! exercise in isolation; the engine owns the clock and the mutation.

use crate::process::ProcTable;
use crate::types::{SchedulerKind, Time};

/// Select the next context index under the given policy.
pub fn select(kind: SchedulerKind, table: &ProcTable) -> Option<usize> {
    match kind {
        SchedulerKind::Fcfs => fcfs_select(table),
        SchedulerKind::Rr => rr_select(table),
        SchedulerKind::Sjf => sjf_select(table),
    }
}

/// How long the selected process runs before the engine re-dispatches:
/// to completion for the non-preemptive policies, one quantum (or less)
/// under round-robin. Load time is accounted separately.
pub fn run_duration(kind: SchedulerKind, quantum: Time, remaining: Time) -> Time {
    match kind {
        SchedulerKind::Fcfs | SchedulerKind::Sjf => remaining,
        SchedulerKind::Rr => quantum.min(remaining),
    }
}

/// First-come-first-served: the earliest waiting process in table
/// order. The table is already sorted by `(arrival, id)`, so the first
/// hit of a forward scan is the answer.
pub fn fcfs_select(table: &ProcTable) -> Option<usize> {
    table.procs().iter().position(|p| p.is_waiting())
}

/// Round-robin: the waiting process with the smallest `last_change`,
/// ties broken by earliest arrival, then ascending id. A process that
/// arrived during another's quantum therefore rejoins ahead of the
/// process that was just preempted.
pub fn rr_select(table: &ProcTable) -> Option<usize> {
    table
        .procs()
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_waiting())
        .min_by_key(|(_, p)| (p.last_change, p.arrival, p.id))
        .map(|(i, _)| i)
}

/// Shortest-job-first: the waiting process with the smallest total job
/// time, ties broken by ascending id. Re-evaluated at every decision,
/// so a short job that arrived while a long one was waiting overtakes
/// it (but never preempts the one in context).
pub fn sjf_select(table: &ProcTable) -> Option<usize> {
    table
        .procs()
        .iter()
        .enumerate()
        .filter(|(_, p)| p.is_waiting())
        .min_by_key(|(_, p)| (p.job_time, p.id))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{ProcTable, Process};
    use crate::types::Pid;

    fn admitted_table(descriptors: &[(u32, u64, Time, Time)]) -> ProcTable {
        let mut t = ProcTable::new(
            descriptors
                .iter()
                .map(|&(id, mem, ta, tj)| Process::new(Pid(id), mem, ta, tj))
                .collect(),
        );
        for i in 0..t.len() {
            let arrival = t.proc(i).arrival;
            t.admit(i, arrival);
        }
        t
    }

    #[test]
    fn fcfs_picks_table_order() {
        let t = admitted_table(&[(2, 8, 0, 9), (1, 8, 0, 3), (3, 8, 1, 1)]);
        // Sorted (arrival, id): 1, 2, 3.
        assert_eq!(fcfs_select(&t).map(|i| t.proc(i).id), Some(Pid(1)));
    }

    #[test]
    fn rr_picks_smallest_last_change_then_arrival() {
        let mut t = admitted_table(&[(1, 8, 0, 9), (2, 8, 2, 9)]);
        // Process 1 was just preempted at t=10; process 2 still has
        // last_change = arrival = 2.
        t.proc_mut(0).last_change = 10;
        assert_eq!(rr_select(&t).map(|i| t.proc(i).id), Some(Pid(2)));

        // Tie on last_change goes to the earlier arrival.
        t.proc_mut(0).last_change = 2;
        assert_eq!(rr_select(&t).map(|i| t.proc(i).id), Some(Pid(1)));
    }

    #[test]
    fn sjf_picks_shortest_job_then_id() {
        let t = admitted_table(&[(1, 8, 0, 9), (2, 8, 0, 4), (3, 8, 0, 4)]);
        assert_eq!(sjf_select(&t).map(|i| t.proc(i).id), Some(Pid(2)));
    }

    #[test]
    fn nothing_selectable_from_init_or_terminated() {
        let mut t = ProcTable::new(vec![Process::new(Pid(1), 8, 5, 3)]);
        assert_eq!(fcfs_select(&t), None);
        assert_eq!(rr_select(&t), None);
        assert_eq!(sjf_select(&t), None);
        t.admit(0, 5);
        t.start(0, 5);
        t.finish(0, 8);
        assert_eq!(fcfs_select(&t), None);
    }

    #[test]
    fn run_duration_per_policy() {
        assert_eq!(run_duration(SchedulerKind::Fcfs, 10, 37), 37);
        assert_eq!(run_duration(SchedulerKind::Sjf, 10, 37), 37);
        assert_eq!(run_duration(SchedulerKind::Rr, 10, 37), 10);
        assert_eq!(run_duration(SchedulerKind::Rr, 10, 4), 4);
    }
}
