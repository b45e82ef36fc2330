mod orchestrator;
mod policy;

pub use orchestrator::{backfill_codes, run_flight_deals, DealRunConfig, RunSummary};
pub use policy::{search_with_fallback, SearchKind};
