mod engine_settings;

pub use engine_settings::{EngineSettings, EngineSettingsUpdate};
