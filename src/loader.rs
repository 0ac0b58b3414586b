//! Parser for process descriptor files.
//!
//! One record per line, four whitespace-separated integers:
//! `arrival id mem_kb job_time`. Record order is arbitrary; the process
//! table sorts by `(arrival, id)` at construction. Blank lines are
//! skipped; anything else malformed aborts the run before it starts.

use std::fs;
use std::path::Path;

use crate::error::SimError;
use crate::process::Process;
use crate::types::Pid;

pub fn load_processes(path: &Path) -> Result<Vec<Process>, SimError> {
    let text = fs::read_to_string(path)
        .map_err(|e| SimError::Input(format!("{}: {e}", path.display())))?;
    parse_descriptors(&text)
}

pub fn parse_descriptors(text: &str) -> Result<Vec<Process>, SimError> {
    let mut procs = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 4 {
            return Err(SimError::Input(format!(
                "line {}: expected 4 fields, got {}",
                lineno + 1,
                fields.len()
            )));
        }
        let parse = |field: &str, name: &str| -> Result<u64, SimError> {
            field.parse::<u64>().map_err(|_| {
                SimError::Input(format!("line {}: bad {name} {field:?}", lineno + 1))
            })
        };
        let arrival = parse(fields[0], "arrival time")?;
        let id = fields[1].parse::<u32>().map_err(|_| {
            SimError::Input(format!("line {}: bad process id {:?}", lineno + 1, fields[1]))
        })?;
        let mem_kb = parse(fields[2], "memory requirement")?;
        let job_time = parse(fields[3], "job time")?;
        procs.push(Process::new(Pid(id), mem_kb, arrival, job_time));
    }
    Ok(procs)
}
