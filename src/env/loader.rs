use std::{
    fs,
    io::Cursor,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::env::EnvMap;

/// Merges a dotenv-format file into `env`, later keys winning.
pub fn load_env_file(path: &Path, env: &mut EnvMap) -> Result<PathBuf> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading env file {}", path.display()))?;

    let mut count = 0usize;
    for item in dotenvy::from_read_iter(Cursor::new(content)) {
        let (key, value) = item.with_context(|| format!("parsing env file {}", path.display()))?;
        env.insert(key, value);
        count += 1;
    }
    debug!(path = %path.display(), count, "loaded env file");

    Ok(path.to_path_buf())
}
