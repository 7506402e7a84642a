//! kioskgrid-state — in-memory record store for kioskgrid.
//!
//! Holds the kiosk fleet for one simulated session and exposes it to the
//! view through a cached, invalidatable query.
//!
//! # Components
//!
//! - **`store`** — `RecordStore`, the owned collection of kiosk records
//! - **`query`** — `RecordQuery`, the read-side cache with subscribers
//!
//! Both are cheap `Clone` handles (backed by `Arc`) and can be shared
//! across async tasks. There is no process-wide instance; every session
//! or test constructs its own.

pub mod error;
pub mod query;
pub mod store;

pub use error::{StateError, StateResult};
pub use query::{RecordQuery, RecordSnapshot};
pub use store::RecordStore;
