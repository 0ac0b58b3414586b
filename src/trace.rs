//! Event recording for the simulator.
//!
//! Every observable state transition (a process starting or resuming, a
//! process finishing, pages being evicted) is emitted synchronously as an
//! [`Event`] the instant it occurs. The event sequence *is* the
//! correctness contract: identical input and configuration must produce a
//! byte-identical rendering.

use std::io::Write;

use itertools::Itertools;

use crate::types::{Pid, Time};

/// Memory fields attached to a `Run` event when the allocator tracks
/// memory. Absent entirely under the unlimited allocator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemSnapshot {
    /// Load cost incurred by this start/resume, in cycles.
    pub load_time: Time,
    /// Ceiling percentage of all occupied pages over total pages.
    pub usage_pct: u64,
    /// Addresses held by the process, in allocation order.
    pub addrs: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A process started or resumed execution.
    Run {
        pid: Pid,
        remaining: Time,
        mem: Option<MemSnapshot>,
    },
    /// A process terminated. `alive` counts the processes not yet
    /// terminated after this one.
    Finish { pid: Pid, alive: usize },
    /// A batch of pages was freed, in ascending address order.
    Evict { addrs: Vec<usize> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub time: Time,
    pub kind: EventKind,
}

impl Event {
    /// Render the event in the simulator's line format.
    pub fn render(&self) -> String {
        match &self.kind {
            EventKind::Run {
                pid,
                remaining,
                mem,
            } => {
                let mut line = format!(
                    "{}, RUNNING, id={}, remaining-time={}",
                    self.time, pid, remaining
                );
                if let Some(m) = mem {
                    line.push_str(&format!(
                        ", load-time={}, mem-usage={}%, mem-addresses=[{}]",
                        m.load_time,
                        m.usage_pct,
                        m.addrs.iter().join(",")
                    ));
                }
                line
            }
            EventKind::Finish { pid, alive } => {
                format!(
                    "{}, FINISHED, id={}, proc-remaining={}",
                    self.time, pid, alive
                )
            }
            EventKind::Evict { addrs } => {
                format!(
                    "{}, EVICTED, mem-addresses=[{}]",
                    self.time,
                    addrs.iter().join(",")
                )
            }
        }
    }
}

/// Receives events synchronously, in the order they occur relative to
/// clock advancement. If a start triggers evictions, the `Evict` events
/// arrive before the `Run` event of the same tick.
pub trait Notifier {
    fn notify(&mut self, event: &Event);
}

/// A complete simulation trace: all events in emission order, with the
/// query helpers the tests are built on.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    events: Vec<Event>,
}

impl Trace {
    pub fn new() -> Self {
        Trace::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Rendered lines for the whole trace.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(Event::render).collect()
    }

    pub fn write_lines<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        for event in &self.events {
            writeln!(w, "{}", event.render())?;
        }
        Ok(())
    }

    /// Count the number of times a process was started or resumed.
    pub fn run_count(&self, pid: Pid) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::Run { pid: p, .. } if p == pid))
            .count()
    }

    /// The time the `Finish` event for a process was emitted.
    pub fn finish_time(&self, pid: Pid) -> Option<Time> {
        self.events.iter().find_map(|e| match e.kind {
            EventKind::Finish { pid: p, .. } if p == pid => Some(e.time),
            _ => None,
        })
    }

    /// All addresses freed across `Evict` events, in emission order.
    pub fn evicted_addrs(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match &e.kind {
                EventKind::Evict { addrs } => Some(addrs.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Pretty-print the trace to stderr for debugging.
    pub fn dump(&self) {
        for event in &self.events {
            eprintln!("{}", event.render());
        }
    }
}

impl Notifier for Trace {
    fn notify(&mut self, event: &Event) {
        self.events.push(event.clone());
    }
}

/// Writes each event line to the wrapped writer the moment it occurs.
pub struct StreamNotifier<W: Write> {
    writer: W,
}

impl<W: Write> StreamNotifier<W> {
    pub fn new(writer: W) -> Self {
        StreamNotifier { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Notifier for StreamNotifier<W> {
    fn notify(&mut self, event: &Event) {
        // A failed write cannot be surfaced through the synchronous
        // notification path; the trace is what matters.
        let _ = writeln!(self.writer, "{}", event.render());
    }
}
