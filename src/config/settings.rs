use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::{
    env::{load_env_file, EnvMap},
    http::{ServiceEndpoint, DEFAULT_HOST, DEFAULT_PORT},
    process::InvocationRequest,
};

use super::loader::{ClientConfig, LoadedConfig, ProfileConfig};

pub const DEFAULT_EXECUTABLE: &str = "arelleCmdLine";

/// Values given on the command line; they beat anything in the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub executable: Option<PathBuf>,
    pub config_home: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
    pub plugins: Vec<String>,
    pub output_dir: Option<PathBuf>,
}

/// Fully resolved settings for one run of the client.
#[derive(Debug, Clone)]
pub struct Settings {
    pub profile_name: Option<String>,
    pub endpoint: ServiceEndpoint,
    pub executable: PathBuf,
    pub config_home: Option<PathBuf>,
    pub extra_args: Vec<String>,
    pub plugins: Vec<String>,
    pub environment: EnvMap,
    pub env_files: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
}

impl Settings {
    /// Starts a validator command line carrying the configured executable,
    /// plugins, config home and environment.
    pub fn invocation(&self) -> InvocationRequest {
        let mut request = InvocationRequest::new(&self.executable)
            .envs(self.environment.clone())
            .plugins(&self.plugins)
            .args(&self.extra_args);
        if let Some(dir) = &self.config_home {
            request = request.config_home(dir);
        }
        request
    }
}

#[derive(Debug, Clone)]
pub struct SettingsBuilder {
    base_dir: PathBuf,
    config: Option<LoadedConfig>,
    overrides: Overrides,
}

impl SettingsBuilder {
    pub fn new(base_dir: PathBuf, config: Option<LoadedConfig>, overrides: Overrides) -> Self {
        Self {
            base_dir,
            config,
            overrides,
        }
    }

    pub fn build(&self) -> Result<Settings> {
        let (config_dir, layers, profile_name) = match &self.config {
            Some(loaded) => {
                let (name, profile) =
                    resolve_profile(&loaded.config, self.overrides.profile.as_deref())?;
                let layers = Layers {
                    profile,
                    defaults: &loaded.config.defaults,
                };
                (loaded.dir.as_path(), layers, name)
            }
            None => {
                if let Some(name) = &self.overrides.profile {
                    bail!("Unknown profile: {} (no configuration found)", name);
                }
                let layers = Layers {
                    profile: &EMPTY_PROFILE,
                    defaults: &EMPTY_PROFILE,
                };
                (self.base_dir.as_path(), layers, None)
            }
        };

        let host = self
            .overrides
            .host
            .clone()
            .or_else(|| layers.pick(|p| p.host.as_ref()))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = self
            .overrides
            .port
            .or(layers.profile.port)
            .or(layers.defaults.port)
            .unwrap_or(DEFAULT_PORT);
        let mut endpoint = ServiceEndpoint::new(host, port);
        if let Some(scheme) = layers.pick(|p| p.scheme.as_ref()) {
            endpoint = endpoint.with_scheme(scheme);
        }

        let executable = match &self.overrides.executable {
            Some(executable) => executable.clone(),
            None => layers
                .pick(|p| p.executable.as_ref())
                .map(|e| resolve_executable(config_dir, &e))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXECUTABLE)),
        };

        let config_home = match &self.overrides.config_home {
            Some(dir) => Some(dir.clone()),
            None => layers
                .pick(|p| p.config_home.as_ref())
                .map(|d| resolve_relative(config_dir, &d)),
        };

        let extra_args = match layers.pick(|p| p.extra_args.as_ref()) {
            Some(raw) => {
                shell_words::split(&raw).with_context(|| format!("parsing extraArgs {raw:?}"))?
            }
            None => Vec::new(),
        };

        let plugins = if self.overrides.plugins.is_empty() {
            layers
                .profile
                .plugins
                .clone()
                .or_else(|| layers.defaults.plugins.clone())
                .unwrap_or_default()
        } else {
            self.overrides.plugins.clone()
        };

        let mut environment = EnvMap::new();
        let mut env_files = Vec::new();
        let env_path = match &self.overrides.env_file {
            Some(path) => Some(path.clone()),
            None => layers
                .pick(|p| p.env.as_ref())
                .map(|e| resolve_relative(config_dir, &e)),
        };
        if let Some(env_path) = env_path {
            env_files.push(load_env_file(&env_path, &mut environment)?);
        }

        let mut output_dir = match &self.overrides.output_dir {
            Some(dir) => Some(dir.clone()),
            None => layers
                .pick(|p| p.output_dir.as_ref())
                .map(|d| resolve_relative(config_dir, &d)),
        };
        if let Some(dir) = &mut output_dir {
            if !dir.is_absolute() {
                *dir = self.base_dir.join(dir.as_path());
            }
        }

        Ok(Settings {
            profile_name,
            endpoint,
            executable,
            config_home,
            extra_args,
            plugins,
            environment,
            env_files,
            output_dir,
        })
    }
}

static EMPTY_PROFILE: ProfileConfig = ProfileConfig {
    scheme: None,
    host: None,
    port: None,
    executable: None,
    config_home: None,
    env: None,
    extra_args: None,
    plugins: None,
    output_dir: None,
};

/// Selected profile over the config file's top-level values.
struct Layers<'a> {
    profile: &'a ProfileConfig,
    defaults: &'a ProfileConfig,
}

impl<'a> Layers<'a> {
    fn pick(&self, field: impl Fn(&'a ProfileConfig) -> Option<&'a String>) -> Option<String> {
        field(self.profile).or_else(|| field(self.defaults)).cloned()
    }
}

fn resolve_profile<'a>(
    config: &'a ClientConfig,
    requested: Option<&str>,
) -> Result<(Option<String>, &'a ProfileConfig)> {
    if let Some(name) = requested {
        return match config.profiles.get(name) {
            Some(profile) => Ok((Some(name.to_string()), profile)),
            None => bail!("Unknown profile: {}", name),
        };
    }

    if let Some(default) = &config.default_profile {
        return match config.profiles.get(default) {
            Some(profile) => Ok((Some(default.clone()), profile)),
            None => bail!("Default profile {} is not defined", default),
        };
    }

    Ok((None, &EMPTY_PROFILE))
}

fn resolve_relative(base: &Path, value: &str) -> PathBuf {
    let candidate = Path::new(value);
    if candidate.is_absolute() {
        candidate.to_path_buf()
    } else {
        base.join(candidate)
    }
}

/// Bare command names are looked up on PATH; anything with a separator is a
/// path relative to the config directory.
fn resolve_executable(config_dir: &Path, value: &str) -> PathBuf {
    if value.contains(['/', '\\']) {
        resolve_relative(config_dir, value)
    } else {
        PathBuf::from(value)
    }
}
