//! Runtime Module - digest execution
//!
//! - `pipeline`: one run (search, collect, enrich, render, deliver)
//! - `schedule`: cron parsing and the in-process scheduler loop
//!
//! Static pieces (config, arXiv client, rendering) live in their own modules;
//! this module wires them together.

mod pipeline;
mod schedule;

// Re-export public types
pub use pipeline::{Digest, DigestPipeline, RunReport};
pub use schedule::{generate_run_id, next_run_after, parse_cron, run_scheduler, Trigger};
