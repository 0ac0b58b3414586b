//! Summary statistics over a completed run.
//!
//! Completions are bucketed into fixed 60-cycle epochs for throughput;
//! turnaround and the time-overhead ratio (`turnaround / job time`) are
//! aggregated per process. Integer averages round up.

use std::io::Write;

use anyhow::Result;
use itertools::{Itertools, MinMaxResult};
use serde::Serialize;

use crate::process::ProcTable;
use crate::types::Time;

/// Fixed window, in cycles, used to bucket completions for throughput.
pub const EPOCH: Time = 60;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub throughput_avg: u64,
    pub throughput_min: u64,
    pub throughput_max: u64,
    pub turnaround_avg: Time,
    pub overhead_max: f64,
    pub overhead_avg: f64,
    pub makespan: Time,
}

impl Summary {
    /// Aggregate a finished table. Processes that never terminated (an
    /// aborted run) are ignored; the driver only produces a summary for
    /// complete runs.
    pub fn from_table(table: &ProcTable) -> Self {
        let finished: Vec<_> = table
            .procs()
            .iter()
            .filter(|p| p.finished.is_some())
            .collect();
        if finished.is_empty() {
            return Summary::default();
        }

        let makespan = finished
            .iter()
            .filter_map(|p| p.finished)
            .max()
            .unwrap_or(0);
        let epochs = makespan.div_ceil(EPOCH).max(1) as usize;

        let mut per_epoch = vec![0u64; epochs];
        for p in &finished {
            let t = p.finished.unwrap_or(0);
            // The interval (0, 60] is epoch 0.
            let idx = (t.saturating_sub(1) / EPOCH) as usize;
            per_epoch[idx] += 1;
        }
        let (throughput_min, throughput_max) = match per_epoch.iter().copied().minmax() {
            MinMaxResult::NoElements => (0, 0),
            MinMaxResult::OneElement(x) => (x, x),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let throughput_avg = (finished.len() as u64).div_ceil(epochs as u64);

        let n = finished.len() as u64;
        let turnaround_sum: Time = finished
            .iter()
            .map(|p| p.finished.unwrap_or(0) - p.arrival)
            .sum();
        let turnaround_avg = turnaround_sum.div_ceil(n);

        let overheads: Vec<f64> = finished
            .iter()
            .filter(|p| p.job_time > 0)
            .map(|p| (p.finished.unwrap_or(0) - p.arrival) as f64 / p.job_time as f64)
            .collect();
        let overhead_max = overheads.iter().copied().fold(0.0, f64::max);
        let overhead_avg = if overheads.is_empty() {
            0.0
        } else {
            overheads.iter().sum::<f64>() / overheads.len() as f64
        };

        Summary {
            throughput_avg,
            throughput_min,
            throughput_max,
            turnaround_avg,
            overhead_max,
            overhead_avg,
            makespan,
        }
    }

    pub fn format<W: Write>(&self, w: &mut W) -> Result<()> {
        writeln!(
            w,
            "Throughput {}, {}, {}",
            self.throughput_avg, self.throughput_min, self.throughput_max
        )?;
        writeln!(w, "Turnaround time {}", self.turnaround_avg)?;
        writeln!(
            w,
            "Time overhead {:.2} {:.2}",
            self.overhead_max, self.overhead_avg
        )?;
        writeln!(w, "Makespan {}", self.makespan)?;
        Ok(())
    }
}
