//! schedsim - Deterministic simulator for process scheduling and memory
//! management policies.
//!
//! A single simulated CPU schedules arriving processes under one of
//! three policies (FCFS, round-robin, SJF) while a fixed pool of
//! physical pages is managed by one of four allocators (unlimited,
//! whole-process swap, virtual/working-set, small-footprint priority).
//! The run is fully deterministic: correctness is the byte-exact event
//! trace, including every tie-break.
//!
//! # Architecture
//!
//! - **ProcTable**: process records and lifecycle transitions
//! - **Memory**: the page array and allocation/eviction primitives
//! - **alloc**: the four allocator strategies built on those primitives
//! - **sched**: pure selection logic for the three scheduling policies
//! - **System**: the driver loop that owns the clock
//! - **Trace**: synchronous event collection and line rendering
//!
//! # Usage
//!
//! ```rust
//! use schedsim::{
//!     loader, SimConfig, System, Trace, SchedulerKind, AllocatorKind,
//! };
//!
//! let procs = loader::parse_descriptors("0 1 16 5\n").unwrap();
//! let cfg = SimConfig::new(SchedulerKind::Fcfs, AllocatorKind::Unlimited, 0, 4, 10).unwrap();
//! let mut system = System::new(cfg, procs);
//! let mut trace = Trace::new();
//! system.run(&mut trace).unwrap();
//! assert_eq!(trace.lines()[0], "0, RUNNING, id=1, remaining-time=5");
//! ```

pub mod alloc;
pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod memory;
pub mod process;
pub mod sched;
pub mod stats;
pub mod trace;
pub mod types;

// Re-export the main public types for convenience.
pub use config::{SimConfig, DEFAULT_PAGE_KB, DEFAULT_QUANTUM, MIN_WORKING_SET, PAGE_LOAD_COST};
pub use engine::{Status, System};
pub use error::SimError;
pub use memory::{Memory, Page};
pub use process::{ProcState, ProcTable, Process};
pub use stats::{Summary, EPOCH};
pub use trace::{Event, EventKind, MemSnapshot, Notifier, StreamNotifier, Trace};
pub use types::{AllocatorKind, Pid, SchedulerKind, Time};
