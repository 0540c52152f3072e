use std::collections::BTreeMap;

/// Environment overrides passed to a spawned validator.
pub type EnvMap = BTreeMap<String, String>;

mod loader;

pub use loader::load_env_file;
