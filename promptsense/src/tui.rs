//! Terminal lifecycle management for promptsense.
//!
//! The TUI draws to stdout through a `BufWriter`, so escape sequences are
//! batched into fewer write(2) calls at the 30 FPS render rate. Logging never
//! touches the terminal (see `logging.rs`).

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use signal_hook::consts::SIGTERM;
use signal_hook::flag::register;
use std::io::{stdout, BufWriter, Stdout};
use std::panic;
use std::sync::{atomic::AtomicBool, Arc};

pub type Tui = Terminal<CrosstermBackend<BufWriter<Stdout>>>;

/// Enables raw mode, enters the alternate screen, and turns on mouse capture and
/// bracketed paste. Call [`restore_tui`] on every exit path.
///
/// # Errors
///
/// Returns `Err` if `enable_raw_mode`, `execute!`, or `Terminal::new` fails.
pub fn init_tui() -> std::io::Result<Tui> {
    let mut out = BufWriter::new(stdout());
    enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    Terminal::new(CrosstermBackend::new(out))
}

/// Restores the terminal to its pre-TUI state. Idempotent.
///
/// ratatui 0.30 does not restore the terminal on `Drop`, so this runs after the
/// event loop and from the panic hook.
///
/// # Errors
///
/// Returns `Err` if `disable_raw_mode` or `execute!` fails.
pub fn restore_tui() -> std::io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), DisableBracketedPaste, DisableMouseCapture, LeaveAlternateScreen)?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before the panic message prints.
///
/// Must be called before [`init_tui`]. Chains onto the previously installed hook.
pub fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Already panicking; best effort only.
        let _ = restore_tui();
        original_hook(panic_info);
    }));
}

/// Returns a flag that flips to `true` when the process receives SIGTERM.
///
/// The main loop polls it on a 50 ms heartbeat.
///
/// # Errors
///
/// Returns `Err` if the OS refuses to register the handler.
pub fn register_sigterm() -> std::io::Result<Arc<AtomicBool>> {
    let term = Arc::new(AtomicBool::new(false));
    register(SIGTERM, Arc::clone(&term))?;
    Ok(term)
}
