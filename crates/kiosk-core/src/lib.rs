pub mod config;
pub mod types;

pub use config::KioskConfig;
pub use types::*;
