//! # Engine Configuration
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file (or no file) yields the stock engine:
//!
//! ```toml
//! cursed_item_cap = 6
//! effect_bus_capacity = 1024
//!
//! [backoff]
//! initial_delay_ms = 20
//! max_delay_ms = 1280
//!
//! [blindfold]
//! slot = "Head"
//! item = 0
//! stain = 0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use wardrobe_core::BackoffConfig;
use wardrobe_shared::{
    DrawData, EquipItem, EquipSlot, DEFAULT_CURSED_ITEM_CAP, REDRAW_INITIAL_DELAY_MS,
    REDRAW_MAX_DELAY_MS,
};

use crate::error::{WardrobeError, WardrobeResult};

/// Backoff for the redraw waiter, in milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffSettings {
    /// First sleep.
    pub initial_delay_ms: u64,
    /// Backoff ceiling.
    pub max_delay_ms: u64,
}

impl Default for BackoffSettings {
    fn default() -> Self {
        Self {
            initial_delay_ms: REDRAW_INITIAL_DELAY_MS,
            max_delay_ms: REDRAW_MAX_DELAY_MS,
        }
    }
}

impl From<BackoffSettings> for BackoffConfig {
    fn from(settings: BackoffSettings) -> Self {
        Self::from_millis(settings.initial_delay_ms, settings.max_delay_ms)
    }
}

/// The item forced onto the avatar while blindfolded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlindfoldConfig {
    /// Slot the blindfold occupies.
    pub slot: EquipSlot,
    /// Item id.
    pub item: u32,
    /// Dye.
    pub stain: u8,
}

impl Default for BlindfoldConfig {
    fn default() -> Self {
        Self {
            slot: EquipSlot::Head,
            item: 0,
            stain: 0,
        }
    }
}

impl BlindfoldConfig {
    /// Draw data written during resolution.
    #[inline]
    #[must_use]
    pub const fn draw_data(&self) -> DrawData {
        DrawData::new(self.slot, EquipItem::new(self.item).with_stain(self.stain))
    }
}

/// Engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Redraw waiter backoff.
    pub backoff: BackoffSettings,
    /// Maximum number of cursed items contributing to resolution.
    pub cursed_item_cap: usize,
    /// Blindfold item.
    pub blindfold: BlindfoldConfig,
    /// Bounded capacity of the effect bus.
    pub effect_bus_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backoff: BackoffSettings::default(),
            cursed_item_cap: DEFAULT_CURSED_ITEM_CAP,
            blindfold: BlindfoldConfig::default(),
            effect_bus_capacity: 1024,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the document does not parse or a value is
    /// out of range.
    pub fn from_toml_str(raw: &str) -> WardrobeResult<Self> {
        let config: Self =
            toml::from_str(raw).map_err(|e| WardrobeError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the file cannot be read or is invalid.
    pub fn load(path: impl AsRef<Path>) -> WardrobeResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| WardrobeError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!(path = %path.display(), "loaded engine configuration");
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` naming the first bad value.
    pub fn validate(&self) -> WardrobeResult<()> {
        if self.backoff.initial_delay_ms == 0 {
            return Err(WardrobeError::InvalidConfig(
                "backoff.initial_delay_ms must be > 0".into(),
            ));
        }
        if self.backoff.max_delay_ms < self.backoff.initial_delay_ms {
            return Err(WardrobeError::InvalidConfig(
                "backoff.max_delay_ms must be >= backoff.initial_delay_ms".into(),
            ));
        }
        if self.effect_bus_capacity == 0 {
            return Err(WardrobeError::InvalidConfig(
                "effect_bus_capacity must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Backoff schedule for the redraw waiter.
    #[must_use]
    pub fn backoff_config(&self) -> BackoffConfig {
        self.backoff.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_empty_document_is_default() {
        let config = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.cursed_item_cap, 6);
        assert_eq!(config.backoff_config().total_budget(), Duration::from_millis(2540));
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let raw = r#"
            cursed_item_cap = 3

            [blindfold]
            slot = "Head"
            item = 9001
            stain = 4
        "#;
        let config = EngineConfig::from_toml_str(raw).unwrap();

        assert_eq!(config.cursed_item_cap, 3);
        assert_eq!(config.backoff, BackoffSettings::default());
        assert_eq!(config.blindfold.draw_data().item, EquipItem::new(9001).with_stain(4));
    }

    #[test]
    fn test_rejects_bad_values() {
        let zero = EngineConfig::from_toml_str("[backoff]\ninitial_delay_ms = 0");
        assert!(matches!(zero, Err(WardrobeError::InvalidConfig(_))));

        let inverted =
            EngineConfig::from_toml_str("[backoff]\ninitial_delay_ms = 100\nmax_delay_ms = 50");
        assert!(matches!(inverted, Err(WardrobeError::InvalidConfig(_))));

        let garbage = EngineConfig::from_toml_str("cursed_item_cap = \"many\"");
        assert!(matches!(garbage, Err(WardrobeError::InvalidConfig(_))));
    }
}
