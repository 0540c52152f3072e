use std::path::Path;

use colored::{Color, Colorize};

use crate::http::{create_preview, HttpValidationResult};

/// Writes the status line to stderr and the body to stdout.
///
/// With `preview` set, only the first N bytes of the body are shown; binary
/// bodies are always previewed as hex.
pub fn print_http_result(
    method: &str,
    url: &str,
    result: &HttpValidationResult,
    preview: Option<usize>,
    saved_to: Option<&Path>,
) {
    for line in http_summary(method, url, result, saved_to) {
        eprintln!("{line}");
    }
    print!("{}", render_body(result, preview));
}

pub fn print_process_summary(command: &str, exit_code: i32, saved_to: Option<&Path>) {
    for line in process_summary(command, exit_code, saved_to) {
        eprintln!("{line}");
    }
}

fn http_summary(
    method: &str,
    url: &str,
    result: &HttpValidationResult,
    saved_to: Option<&Path>,
) -> Vec<String> {
    let status_color = if result.status_code >= 400 {
        Color::Red
    } else if result.status_code >= 300 {
        Color::Yellow
    } else {
        Color::Green
    };

    let mut lines = vec![
        format!("{} {}", method.bold(), url.cyan()),
        format!(
            "{} {} {}",
            "Status:".bold(),
            result.status_code.to_string().color(status_color),
            format!("({:.1} ms, {} bytes)", result.duration_ms, result.body.len()).dimmed()
        ),
    ];
    if let Some(path) = saved_to {
        lines.push(saved_line(path));
    }
    lines
}

fn render_body(result: &HttpValidationResult, preview: Option<usize>) -> String {
    match preview {
        Some(limit) => format!("{}\n", create_preview(&result.body, limit)),
        None if result.content_kind().is_binary() => {
            format!("{}\n", create_preview(&result.body, 64))
        }
        None => result.body_text.clone(),
    }
}

fn process_summary(command: &str, exit_code: i32, saved_to: Option<&Path>) -> Vec<String> {
    let code = if exit_code == 0 {
        exit_code.to_string().green()
    } else {
        exit_code.to_string().red()
    };
    let mut lines = vec![
        format!("{} {}", "Command:".bold(), command.cyan()),
        format!("{} {}", "Exit code:".bold(), code),
    ];
    if let Some(path) = saved_to {
        lines.push(saved_line(path));
    }
    lines
}

fn saved_line(path: &Path) -> String {
    format!("{} {}", "Saved:".bold(), path.display().to_string().cyan())
}
