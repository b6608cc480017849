pub mod context;
pub mod scan_cycle;
pub mod scheduler;

pub use context::ScoutContext;
pub use scan_cycle::{process_listing, scan_once, CycleReport, EntryOutcome};
