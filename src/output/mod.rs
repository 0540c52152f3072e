#[cfg(feature = "cli")]
mod printer;
mod writer;

#[cfg(feature = "cli")]
pub use printer::{print_http_result, print_process_summary};
pub use writer::{save_response, save_transcript};
