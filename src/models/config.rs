use std::time::Duration;

use serde::Deserialize;

/// Settings of the category board.
///
/// Loaded from an optional YAML file and `APP__`-prefixed environment
/// variables, e.g. `APP__SAVE_DELAY_MS=250`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Simulated round-trip when saving the create/edit form.
    pub save_delay_ms: u64,
    /// Simulated round-trip when deleting a category.
    pub delete_delay_ms: u64,
    /// Simulated round-trip when toggling a category's status.
    pub toggle_delay_ms: u64,
    /// Simulated wait before the initial list is shown.
    pub load_delay_ms: u64,
    /// Start with the demo categories instead of an empty board.
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            save_delay_ms: 700,
            delete_delay_ms: 700,
            toggle_delay_ms: 500,
            load_delay_ms: 500,
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Builds the configuration from `path` (extension optional, file may be
    /// absent) layered under environment overrides.
    pub fn load(path: &str) -> Result<Self, ::config::ConfigError> {
        ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}
