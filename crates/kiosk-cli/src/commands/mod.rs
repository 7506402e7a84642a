pub mod init;
pub mod list;
pub mod simulate;

use std::path::Path;

use anyhow::Context;
use kiosk_core::KioskConfig;
use tracing::debug;

/// Load kiosk.toml, falling back to defaults when the file does not exist.
pub fn load_config(path: &str) -> anyhow::Result<KioskConfig> {
    let path = Path::new(path);
    if !path.is_file() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(KioskConfig::default());
    }
    KioskConfig::from_file(path).with_context(|| format!("failed to load {}", path.display()))
}
