use schedsim::error::SimError;
use schedsim::trace::EventKind;
use schedsim::types::{Pid, Time};
use schedsim::{loader, AllocatorKind, SchedulerKind, SimConfig, System, Trace};

fn run_sim(
    scheduler: SchedulerKind,
    allocator: AllocatorKind,
    mem_kb: u64,
    quantum: Time,
    descriptors: &str,
) -> (System, Trace) {
    let procs = loader::parse_descriptors(descriptors).unwrap();
    let cfg = SimConfig::new(scheduler, allocator, mem_kb, 4, quantum).unwrap();
    let mut system = System::new(cfg, procs);
    let mut trace = Trace::new();
    system.run(&mut trace).unwrap();
    (system, trace)
}

#[test]
fn swap_evicts_the_whole_stalest_victim_before_running() {
    // 2 pages of physical memory, each process needs both. The second
    // start must evict all of the first process's pages, with the Evict
    // event landing immediately before the Run event at the same tick.
    let (_, trace) = run_sim(
        SchedulerKind::Rr,
        AllocatorKind::Swap,
        8,
        10,
        "0 1 8 20\n0 2 8 20\n",
    );
    assert_eq!(
        trace.lines(),
        vec![
            "0, RUNNING, id=1, remaining-time=20, load-time=4, mem-usage=100%, mem-addresses=[0,1]",
            "14, EVICTED, mem-addresses=[0,1]",
            "14, RUNNING, id=2, remaining-time=20, load-time=4, mem-usage=100%, mem-addresses=[0,1]",
            "28, EVICTED, mem-addresses=[0,1]",
            "28, RUNNING, id=1, remaining-time=10, load-time=4, mem-usage=100%, mem-addresses=[0,1]",
            "42, EVICTED, mem-addresses=[0,1]",
            "42, FINISHED, id=1, proc-remaining=1",
            "42, RUNNING, id=2, remaining-time=10, load-time=4, mem-usage=100%, mem-addresses=[0,1]",
            "56, EVICTED, mem-addresses=[0,1]",
            "56, FINISHED, id=2, proc-remaining=0",
        ]
    );
}

#[test]
fn finished_process_releases_its_pages_for_the_next_one() {
    // Under FCFS the first process terminates before the second starts,
    // so the release happens at finish time and the second start needs
    // no eviction of its own.
    let (_, trace) = run_sim(
        SchedulerKind::Fcfs,
        AllocatorKind::Swap,
        8,
        10,
        "0 1 8 5\n0 2 8 5\n",
    );
    assert_eq!(
        trace.lines(),
        vec![
            "0, RUNNING, id=1, remaining-time=5, load-time=4, mem-usage=100%, mem-addresses=[0,1]",
            "9, EVICTED, mem-addresses=[0,1]",
            "9, FINISHED, id=1, proc-remaining=1",
            "9, RUNNING, id=2, remaining-time=5, load-time=4, mem-usage=100%, mem-addresses=[0,1]",
            "18, EVICTED, mem-addresses=[0,1]",
            "18, FINISHED, id=2, proc-remaining=0",
        ]
    );
}

#[test]
fn virtual_charges_one_cycle_per_missing_page() {
    // 4 physical pages, the process needs 8. It gets its working set of
    // 4 and pays 4 extra cycles of execution for the 4 missing pages.
    let (_, trace) = run_sim(
        SchedulerKind::Fcfs,
        AllocatorKind::Virtual,
        16,
        10,
        "0 1 32 10\n",
    );
    assert_eq!(
        trace.lines(),
        vec![
            "0, RUNNING, id=1, remaining-time=14, load-time=8, mem-usage=100%, mem-addresses=[0,1,2,3]",
            "22, EVICTED, mem-addresses=[0,1,2,3]",
            "22, FINISHED, id=1, proc-remaining=0",
        ]
    );
}

#[test]
fn virtual_takes_just_enough_stalest_pages_for_the_working_set() {
    // 6 physical pages, two processes of 4 pages each. A resuming
    // process keeps its leftover pages and only steals the shortfall,
    // lowest addresses of the stalest holder first.
    let (_, trace) = run_sim(
        SchedulerKind::Rr,
        AllocatorKind::Virtual,
        24,
        10,
        "0 1 16 20\n0 2 16 20\n",
    );
    assert_eq!(
        trace.lines(),
        vec![
            "0, RUNNING, id=1, remaining-time=20, load-time=8, mem-usage=67%, mem-addresses=[0,1,2,3]",
            "18, EVICTED, mem-addresses=[0,1]",
            "18, RUNNING, id=2, remaining-time=20, load-time=8, mem-usage=100%, mem-addresses=[4,5,0,1]",
            "36, EVICTED, mem-addresses=[0,1]",
            "36, RUNNING, id=1, remaining-time=10, load-time=4, mem-usage=100%, mem-addresses=[2,3,0,1]",
            "50, EVICTED, mem-addresses=[0,1,2,3]",
            "50, FINISHED, id=1, proc-remaining=1",
            "50, RUNNING, id=2, remaining-time=10, load-time=4, mem-usage=67%, mem-addresses=[4,5,0,1]",
            "64, EVICTED, mem-addresses=[0,1,4,5]",
            "64, FINISHED, id=2, proc-remaining=0",
        ]
    );
}

#[test]
fn custom_keeps_small_processes_resident_at_the_expense_of_large_ones() {
    // The large process 1 hoards all 6 pages; when the small process 2
    // resumes, its target comes out of process 1's surplus and process
    // 1's pages are the first victims. The small process finishes first
    // despite arriving later.
    let (_, trace) = run_sim(
        SchedulerKind::Rr,
        AllocatorKind::Custom,
        24,
        10,
        "0 1 24 30\n1 2 8 10\n",
    );
    assert_eq!(
        trace.lines(),
        vec![
            "0, RUNNING, id=1, remaining-time=30, load-time=12, mem-usage=100%, mem-addresses=[0,1,2,3,4,5]",
            "22, EVICTED, mem-addresses=[0,1]",
            "22, RUNNING, id=2, remaining-time=10, load-time=4, mem-usage=100%, mem-addresses=[0,1]",
            "36, EVICTED, mem-addresses=[0,1]",
            "36, FINISHED, id=2, proc-remaining=1",
            "36, RUNNING, id=1, remaining-time=20, load-time=4, mem-usage=100%, mem-addresses=[2,3,4,5,0,1]",
            "50, RUNNING, id=1, remaining-time=10, load-time=0, mem-usage=100%, mem-addresses=[2,3,4,5,0,1]",
            "60, EVICTED, mem-addresses=[0,1,2,3,4,5]",
            "60, FINISHED, id=1, proc-remaining=0",
        ]
    );
}

#[test]
fn custom_never_evicts_a_smaller_process_while_a_larger_victim_remains() {
    // 8 physical pages: the large process 1 holds 6 and the small
    // process 3 holds 1 when the medium process 2 starts needing 2.
    // Only one page is free, so one page must be evicted; it has to
    // come from the large process, not the small one.
    let (_, trace) = run_sim(
        SchedulerKind::Rr,
        AllocatorKind::Custom,
        32,
        10,
        "0 1 24 30\n2 2 8 25\n1 3 4 25\n",
    );
    assert_eq!(
        &trace.lines()[..4],
        [
            "0, RUNNING, id=1, remaining-time=30, load-time=12, mem-usage=75%, mem-addresses=[0,1,2,3,4,5]",
            "22, RUNNING, id=3, remaining-time=25, load-time=2, mem-usage=88%, mem-addresses=[6]",
            "34, EVICTED, mem-addresses=[0]",
            "34, RUNNING, id=2, remaining-time=25, load-time=4, mem-usage=100%, mem-addresses=[7,0]",
        ]
    );
    // The small process's page (address 6) stays resident for its whole
    // lifetime: the only eviction touching it is its own release at
    // termination.
    let small_finish = trace.finish_time(Pid(3)).unwrap();
    for event in trace.events() {
        if let EventKind::Evict { addrs } = &event.kind {
            if addrs.contains(&6) {
                assert_eq!(event.time, small_finish);
            }
        }
    }
}

#[test]
fn unsatisfiable_requirement_fails_instead_of_looping() {
    // 2 physical pages, the process needs 4 and swap guarantees the full
    // requirement. No victim exists, so the run must abort.
    let procs = loader::parse_descriptors("0 1 16 5\n").unwrap();
    let cfg = SimConfig::new(SchedulerKind::Fcfs, AllocatorKind::Swap, 8, 4, 10).unwrap();
    let mut system = System::new(cfg, procs);
    let mut trace = Trace::new();
    let err = system.run(&mut trace).unwrap_err();
    assert!(matches!(err, SimError::Invariant(_)));
}
