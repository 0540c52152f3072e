pub mod client;
pub mod config;
pub mod env;
pub mod error;
pub mod http;
pub mod output;
pub mod process;
#[cfg(feature = "cli")]
pub mod telemetry;

pub use client::ExternalValidatorClient;
pub use error::{ClientError, ClientResult};
