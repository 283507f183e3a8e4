//! System clipboard access through the platform's command-line tool.
//!
//! macOS uses `pbcopy`, Windows `clip`, everything else `xclip` with an `xsel`
//! fallback. Nothing is linked; a missing tool is reported as an error.

use std::io::Write;
use std::process::{Command, Stdio};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("failed to start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to {tool}: {source}")]
    Write {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}")]
    Failed {
        tool: &'static str,
        status: std::process::ExitStatus,
    },
}

/// Picks the clipboard command for this platform.
fn clipboard_command() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("pbcopy", &[])
    } else if cfg!(target_os = "windows") {
        ("clip", &[])
    } else if has_command("xclip") {
        ("xclip", &["-selection", "clipboard"])
    } else {
        ("xsel", &["--clipboard", "--input"])
    }
}

fn has_command(name: &str) -> bool {
    Command::new("which")
        .arg(name)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Copies `text` to the system clipboard.
///
/// Blocks until the clipboard tool exits; callers on the async runtime run it
/// on a blocking thread.
///
/// # Errors
///
/// Returns a [`ClipboardError`] naming the tool when it cannot be started, its
/// stdin cannot be written, or it exits unsuccessfully.
pub fn copy(text: &str) -> Result<(), ClipboardError> {
    let (tool, args) = clipboard_command();
    run_tool(tool, args, text)
}

/// Pipes `text` into `tool` and waits for it. The child is always reaped,
/// even when writing to it fails.
fn run_tool(tool: &'static str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
    let mut child = Command::new(tool)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| ClipboardError::Spawn { tool, source })?;

    // Dropping stdin at the end of this block closes the pipe before `wait`.
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };

    let status = child
        .wait()
        .map_err(|source| ClipboardError::Spawn { tool, source })?;
    written.map_err(|source| ClipboardError::Write { tool, source })?;
    if !status.success() {
        return Err(ClipboardError::Failed { tool, status });
    }
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn tool_reading_stdin_succeeds() {
        assert!(run_tool("cat", &[], "Build a todo app.").is_ok());
    }

    #[test]
    fn missing_tool_is_a_spawn_error() {
        let err = run_tool("promptsense-no-such-tool", &[], "x").unwrap_err();
        assert!(matches!(err, ClipboardError::Spawn { .. }));
    }

    #[test]
    fn failing_tool_reports_its_status() {
        let err = run_tool("false", &[], "").unwrap_err();
        assert!(matches!(err, ClipboardError::Failed { tool: "false", .. }));
    }

    #[test]
    fn tool_that_closes_stdin_early_is_a_write_error() {
        // Larger than any pipe buffer, so the write cannot complete after `true` exits.
        let text = "x".repeat(4 * 1024 * 1024);
        let err = run_tool("true", &[], &text).unwrap_err();
        assert!(matches!(err, ClipboardError::Write { tool: "true", .. }));
    }
}
