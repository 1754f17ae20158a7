use crate::types::Config;
use anyhow::{ensure, Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path))?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would poison downstream math (NaN cooldowns,
    /// zero-sized displays) at load time, with a pointer to the field.
    pub fn validate(&self) -> Result<()> {
        let cooldown = self.tracker.announce_cooldown_secs;
        ensure!(
            cooldown.is_finite() && cooldown >= 0.0,
            "tracker.announce_cooldown_secs must be non-negative and finite, got {cooldown}"
        );
        let ratio = self.tracker.movement_ratio;
        ensure!(
            ratio.is_finite() && ratio >= 0.0,
            "tracker.movement_ratio must be non-negative and finite, got {ratio}"
        );
        ensure!(
            self.display.screen_width > 0.0
                && self.display.screen_height > 0.0
                && self.display.screen_width.is_finite()
                && self.display.screen_height.is_finite(),
            "display dimensions must be positive and finite"
        );
        Ok(())
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
