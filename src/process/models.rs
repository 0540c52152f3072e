use std::{
    collections::BTreeMap,
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
};

/// Environment variable Arelle reads to locate its configuration directory.
pub const CONFIG_HOME_VAR: &str = "XDG_CONFIG_HOME";

/// One invocation of an external validator executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    pub executable: PathBuf,
    pub arguments: Vec<OsString>,
    pub environment_overrides: BTreeMap<String, String>,
    pub working_dir: Option<PathBuf>,
}

impl InvocationRequest {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            arguments: Vec::new(),
            environment_overrides: BTreeMap::new(),
            working_dir: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.arguments.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.arguments
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment_overrides.insert(name.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.environment_overrides
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Points the validator at a private configuration directory.
    pub fn config_home(self, dir: impl AsRef<Path>) -> Self {
        let value = dir.as_ref().to_string_lossy().into_owned();
        self.env(CONFIG_HOME_VAR, value)
    }

    /// Appends `--file <path> -v`, the validate-one-document command line.
    pub fn validate_file(self, path: impl AsRef<Path>) -> Self {
        self.arg("--file").arg(path.as_ref()).arg("-v")
    }

    /// Appends `--plugins a|b`. No-op for an empty list.
    pub fn plugins<I, S>(self, plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = plugins
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join("|");
        if joined.is_empty() {
            self
        } else {
            self.arg("--plugins").arg(joined)
        }
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn display_command(&self) -> String {
        std::iter::once(self.executable.to_string_lossy())
            .chain(self.arguments.iter().map(|a| a.to_string_lossy()))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    /// Exit code of the child; `-1` when it was terminated by a signal.
    pub exit_code: i32,
    pub output_lines: Vec<String>,
}

impl InvocationResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
