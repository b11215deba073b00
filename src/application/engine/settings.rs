//! Engine settings.

use crate::application::catalog::CatalogSettings;
use crate::config::AppConfig;
use crate::domain::journey::IslandLayout;

/// Everything the engine needs from configuration.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub catalog: CatalogSettings,
    /// Length of calendar events created for reminders.
    pub event_duration_minutes: i64,
    pub layout: IslandLayout,
    /// Buffer size of the domain event broadcast channel.
    pub event_capacity: usize,
}

impl EngineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            catalog: CatalogSettings::from_config(config),
            event_duration_minutes: config.calendar.event_duration_minutes,
            layout: IslandLayout::default(),
            event_capacity: 64,
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}
