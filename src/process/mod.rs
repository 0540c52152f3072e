mod models;
mod runner;

pub use models::{InvocationRequest, InvocationResult, CONFIG_HOME_VAR};
pub use runner::{run_process, spawn_process, stream_process, RunningProcess};
