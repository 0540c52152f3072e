mod loader;
mod settings;

pub use loader::{load_config, ClientConfig, LoadedConfig, ProfileConfig, CONFIG_FILE_NAME};
pub use settings::{Overrides, Settings, SettingsBuilder, DEFAULT_EXECUTABLE};
