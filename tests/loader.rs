use std::io::Write;

use schedsim::error::SimError;
use schedsim::{loader, AllocatorKind, SchedulerKind, SimConfig, System, Trace};

#[test]
fn loads_a_descriptor_file_and_runs_it() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "0 2 16 2").unwrap();
    writeln!(file, "0 1 16 3").unwrap();
    file.flush().unwrap();

    let procs = loader::load_processes(file.path()).unwrap();
    assert_eq!(procs.len(), 2);

    let cfg = SimConfig::new(SchedulerKind::Fcfs, AllocatorKind::Unlimited, 0, 4, 10).unwrap();
    let mut system = System::new(cfg, procs);
    let mut trace = Trace::new();
    system.run(&mut trace).unwrap();
    assert_eq!(
        trace.lines(),
        vec![
            "0, RUNNING, id=1, remaining-time=3",
            "3, FINISHED, id=1, proc-remaining=1",
            "3, RUNNING, id=2, remaining-time=2",
            "5, FINISHED, id=2, proc-remaining=0",
        ]
    );
}

#[test]
fn missing_file_is_an_input_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = loader::load_processes(&dir.path().join("no-such-file")).unwrap_err();
    assert!(matches!(err, SimError::Input(_)));
}

#[test]
fn malformed_file_aborts_before_the_simulation_starts() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "0 1 16 3").unwrap();
    writeln!(file, "0 2 sixteen 2").unwrap();
    file.flush().unwrap();

    let err = loader::load_processes(file.path()).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}
