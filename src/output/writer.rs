use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::debug;

use crate::{http::HttpValidationResult, process::InvocationResult};

/// Saves a response body as `<dir>/<label>/<NNN>.<ext>`, the extension
/// following the sniffed content kind.
pub fn save_response(dir: &Path, label: &str, result: &HttpValidationResult) -> Result<PathBuf> {
    write_numbered(dir, label, result.content_kind().extension(), &result.body)
}

/// Saves the captured output lines of a validator run as a `.log` file.
pub fn save_transcript(dir: &Path, label: &str, result: &InvocationResult) -> Result<PathBuf> {
    let mut transcript = result.output_lines.join("\n");
    if !transcript.is_empty() {
        transcript.push('\n');
    }
    write_numbered(dir, label, ".log", transcript.as_bytes())
}

fn write_numbered(dir: &Path, label: &str, extension: &str, bytes: &[u8]) -> Result<PathBuf> {
    let target_dir = dir.join(sanitize_component(label));
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("creating output directory {}", target_dir.display()))?;

    let index = next_index(&target_dir)?;
    let path = target_dir.join(format!("{:03}{}", index, extension));
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "saved output");
    Ok(path)
}

fn sanitize_component(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|ch| match ch {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' => ch,
            _ => '-',
        })
        .collect();
    let trimmed = sanitized.trim_matches(|c| c == '-' || c == '.');
    if trimmed.is_empty() {
        "validation".to_string()
    } else {
        trimmed.to_string()
    }
}

fn next_index(dir: &Path) -> Result<u32> {
    let mut next = 0;
    for entry in fs::read_dir(dir).with_context(|| format!("reading directory {}", dir.display()))?
    {
        let name = entry?.file_name();
        let Some(prefix) = name.to_str().and_then(|n| n.get(..3)) else {
            continue;
        };
        if let Ok(value) = prefix.parse::<u32>() {
            next = next.max(value + 1);
        }
    }
    Ok(next)
}
