//! Batch conversion orchestration.
//!
//! The orchestrator owns the lifetime of one batch: it validates the
//! request, computes output paths, fans the jobs out over a bounded
//! worker pool, matches results back to their per-input slots by output
//! path, and sweeps any slot left pending into a terminal state before
//! returning. One slot per input, in input order, always.

mod orchestrator;
mod paths;

pub use orchestrator::{BatchOrchestrator, OPT_FORMAT};
pub use paths::output_path;
