//! kiosk.toml configuration parser.

use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use crate::types::{KioskRecord, default_fleet};

pub const DEFAULT_MAX_DELAY_MS: u64 = 3000;
/// Three in four simulated updates succeed.
pub const DEFAULT_SUCCESS_RATE: f64 = 0.75;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KioskConfig {
    pub simulation: Option<SimulationConfig>,
    pub view: Option<ViewConfig>,
    pub kiosks: Option<Vec<KioskRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Upper bound (exclusive) of the simulated update delay.
    pub max_delay_ms: Option<u64>,
    /// Probability that a simulated update succeeds.
    pub success_rate: Option<f64>,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    pub page_size: Option<usize>,
}

impl KioskConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: KioskConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        let rate = self.success_rate();
        if !(0.0..=1.0).contains(&rate) {
            bail!("simulation.success_rate must be within [0, 1], got {rate}");
        }
        if self.page_size() == 0 {
            bail!("view.page_size must be greater than zero");
        }
        if let Some(kiosks) = &self.kiosks {
            let mut seen = HashSet::new();
            for kiosk in kiosks {
                if !seen.insert(kiosk.id) {
                    bail!("duplicate kiosk id {} in [[kiosks]]", kiosk.id);
                }
            }
        }
        Ok(())
    }

    pub fn max_delay(&self) -> Duration {
        let ms = self
            .simulation
            .as_ref()
            .and_then(|s| s.max_delay_ms)
            .unwrap_or(DEFAULT_MAX_DELAY_MS);
        Duration::from_millis(ms)
    }

    pub fn success_rate(&self) -> f64 {
        self.simulation
            .as_ref()
            .and_then(|s| s.success_rate)
            .unwrap_or(DEFAULT_SUCCESS_RATE)
    }

    pub fn seed(&self) -> Option<u64> {
        self.simulation.as_ref().and_then(|s| s.seed)
    }

    pub fn page_size(&self) -> usize {
        self.view
            .as_ref()
            .and_then(|v| v.page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Kiosks to seed the store with; falls back to the default fleet.
    pub fn fleet(&self) -> Vec<KioskRecord> {
        self.kiosks.clone().unwrap_or_else(default_fleet)
    }

    /// Scaffold a kiosk.toml with every default spelled out.
    pub fn scaffold() -> Self {
        KioskConfig {
            simulation: Some(SimulationConfig {
                max_delay_ms: Some(DEFAULT_MAX_DELAY_MS),
                success_rate: Some(DEFAULT_SUCCESS_RATE),
                seed: None,
            }),
            view: Some(ViewConfig {
                page_size: Some(DEFAULT_PAGE_SIZE),
            }),
            kiosks: Some(default_fleet()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold() {
        let config = KioskConfig::scaffold();
        let toml_str = config.to_toml_string().unwrap();
        assert!(toml_str.contains("success_rate = 0.75"));
        assert!(toml_str.contains("Kiosk 14"));

        let back: KioskConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.fleet().len(), 14);
    }

    #[test]
    fn test_defaults_when_empty() {
        let config: KioskConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_delay(), Duration::from_millis(3000));
        assert_eq!(config.success_rate(), 0.75);
        assert_eq!(config.seed(), None);
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.fleet(), default_fleet());
    }

    #[test]
    fn test_parse_minimal() {
        let toml_str = r#"
[simulation]
max_delay_ms = 500
seed = 7

[[kiosks]]
id = 40
name = "Lobby"
version = "2.1.0"
"#;
        let config: KioskConfig = toml::from_str(toml_str).unwrap();
        config.validate().unwrap();
        assert_eq!(config.max_delay(), Duration::from_millis(500));
        assert_eq!(config.seed(), Some(7));
        assert_eq!(config.fleet(), vec![KioskRecord::new(40, "Lobby", "2.1.0")]);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let bad_rate: KioskConfig = toml::from_str("[simulation]\nsuccess_rate = 1.5").unwrap();
        assert!(bad_rate.validate().is_err());

        let bad_page: KioskConfig = toml::from_str("[view]\npage_size = 0").unwrap();
        assert!(bad_page.validate().is_err());

        let dupes = r#"
[[kiosks]]
id = 1
name = "a"
version = "1.0.0"

[[kiosks]]
id = 1
name = "b"
version = "1.0.0"
"#;
        let dupes: KioskConfig = toml::from_str(dupes).unwrap();
        assert!(dupes.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk.toml");
        std::fs::write(&path, "[view]\npage_size = 5\n").unwrap();

        let config = KioskConfig::from_file(&path).unwrap();
        assert_eq!(config.page_size(), 5);
    }
}
