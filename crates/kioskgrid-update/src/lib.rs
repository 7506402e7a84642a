//! kioskgrid-update — simulated kiosk updates and their outcomes.
//!
//! Each update request waits a simulated delay, then either bumps the
//! kiosk's version or fails. The latest outcome per kiosk is tracked for
//! display, and every settled request invalidates the record query.
//!
//! # Components
//!
//! - **`source`** — Where delays and success/failure come from (random or scripted)
//! - **`outcome`** — Latest-outcome-per-kiosk tracker and its event feed
//! - **`orchestrator`** — Submits, runs, and settles update requests

pub mod error;
pub mod orchestrator;
pub mod outcome;
pub mod source;

pub use error::{UpdateError, UpdateResult};
pub use orchestrator::{UpdateOrchestrator, UpdateTicket, wait_all};
pub use outcome::{OutcomeEvent, OutcomeTracker, UpdateStatus};
pub use source::{RandomSource, ScriptedSource, UpdatePlan, UpdateSource};
