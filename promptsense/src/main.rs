//! promptsense: score vibe-coding prompts and debug failed generations from the terminal.
//!
//! Entry point for the `promptsense` binary. Wires together configuration
//! (`config`), file logging (`logging`), the terminal lifecycle (`tui`), the
//! event bus (`event`), rendering (`ui`) and the core session + orchestrator.
//!
//! # Startup sequence
//!
//! 1. Parse flags, load config, start file logging. Nothing touches the terminal yet,
//!    so config and API-key errors print normally and exit.
//! 2. Build the Gemini client and orchestrator.
//! 3. `install_panic_hook()` so a panic restores the terminal before printing.
//! 4. `register_sigterm()`, polled on the 50 ms heartbeat.
//! 5. `init_tui()`, then the event channel and `spawn_event_task()`.
//!
//! The event loop exits only via `break`, so `restore_tui()` always runs.

mod app;
mod clipboard;
mod config;
mod event;
mod logging;
mod markdown;
mod theme;
mod tui;
mod ui;

use std::sync::Arc;
use std::sync::atomic::Ordering;

use clap::Parser;
use promptsense_core::gemini::GeminiClient;
use promptsense_core::{AppMode, Command, InputField, Orchestrator, SessionEvent};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info};

use crate::clipboard::ClipboardError;
use crate::event::AppEvent;
use crate::ui::keybindings::{self, KeyAction};

/// Runs one service command off the event loop and posts the completion back.
fn spawn_request(orchestrator: &Orchestrator, command: Command, tx: &UnboundedSender<AppEvent>) {
    let orchestrator = orchestrator.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let completion = orchestrator.execute(command).await;
        // The receiver is gone only when the app is shutting down.
        let _ = tx.send(AppEvent::ServiceResult(Box::new(completion)));
    });
}

/// Runs a clipboard copy on the blocking pool; the outcome comes back as
/// `AppEvent::CopyFinished`.
fn spawn_copy<F>(copy: F, tx: &UnboundedSender<AppEvent>)
where
    F: FnOnce() -> Result<(), ClipboardError> + Send + 'static,
{
    let tx = tx.clone();
    tokio::task::spawn_blocking(move || {
        let _ = tx.send(AppEvent::CopyFinished(copy()));
    });
}

/// Reports a finished copy in the status bar.
fn report_copy(state: &mut app::AppState, result: Result<(), ClipboardError>) {
    match result {
        Ok(()) => state.notify("Copied to clipboard", false),
        Err(e) => {
            error!(error = %e, "clipboard copy failed");
            state.notify(format!("Copy failed: {e}"), true);
        }
    }
}

fn startup_error(e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(e.to_string())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Step 1: configuration and logging, before the terminal is touched.
    let cli = config::Cli::parse();
    let config_file = cli.config.clone().unwrap_or_else(config::config_path);
    logging::init(&config::log_dir())?;
    let config = config::Config::load(&config_file)
        .merge_cli(&cli)
        .map_err(startup_error)?;
    let api_key = config::api_key_from_env().map_err(startup_error)?;
    let preload_prompt =
        config::read_input_file(cli.prompt_file.as_deref()).map_err(startup_error)?;
    let preload_observed =
        config::read_input_file(cli.observed_file.as_deref()).map_err(startup_error)?;

    // Step 2: service stack.
    let client = GeminiClient::new(api_key, config.api_base_url.clone(), config.model.clone())
        .map_err(startup_error)?;
    info!(
        model = client.model(),
        timeout_secs = config.request_timeout_secs,
        "service ready"
    );
    let orchestrator = Orchestrator::new(Arc::new(client), config.request_timeout());

    let theme = theme::Theme::from_name(&config.theme);
    let start_mode = if cli.debug { AppMode::Debug } else { AppMode::Analyze };
    let mut state = app::AppState::new(start_mode, config.model.clone());
    if let Some(text) = preload_prompt {
        state.apply(SessionEvent::SetInput {
            field: InputField::Prompt,
            text,
        });
    }
    if let Some(text) = preload_observed {
        state.apply(SessionEvent::SetInput {
            field: InputField::ObservedOutput,
            text,
        });
    }

    // Step 3: panic hook first, so it is the innermost hook.
    tui::install_panic_hook();

    // Step 4: SIGTERM flag, polled in the heartbeat arm below.
    let term_flag = tui::register_sigterm()?;

    // Step 5: alternate screen, raw mode, event task.
    let mut terminal = tui::init_tui()?;
    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let tx = handler.tx;
    let mut rx = handler.rx;

    // Exits only via `break`, never via `?`, except for draw errors in the
    // Render arm, which leave the loop and still reach `restore_tui()` below.
    let result: std::io::Result<()> = 'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50 ms even when idle.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    info!("SIGTERM received");
                    break 'event_loop Ok(());
                }
            }
            maybe_event = rx.recv() => {
                let action = match maybe_event {
                    Some(AppEvent::Render) => {
                        let drawn = terminal.draw(|frame| ui::render(frame, &mut state, &theme));
                        if let Err(e) = drawn {
                            break 'event_loop Err(e);
                        }
                        KeyAction::Continue
                    }
                    Some(AppEvent::Key(key)) => keybindings::handle_key(key, &mut state),
                    Some(AppEvent::Mouse(mouse)) => keybindings::handle_mouse(mouse, &mut state),
                    Some(AppEvent::Paste(text)) => keybindings::handle_paste(&text, &mut state),
                    Some(AppEvent::Tick) => {
                        state.tick();
                        KeyAction::Continue
                    }
                    Some(AppEvent::ServiceResult(completion)) => {
                        state.apply(SessionEvent::Completed(*completion));
                        KeyAction::Continue
                    }
                    Some(AppEvent::CopyFinished(result)) => {
                        report_copy(&mut state, result);
                        KeyAction::Continue
                    }
                    // Resize is picked up by the next Render via frame.area().
                    Some(AppEvent::Resize(_, _)) => KeyAction::Continue,
                    None => break 'event_loop Ok(()),
                };

                match action {
                    KeyAction::Continue => {}
                    KeyAction::Quit => break 'event_loop Ok(()),
                    KeyAction::Run(command) => spawn_request(&orchestrator, command, &tx),
                    KeyAction::Copy(text) => spawn_copy(move || clipboard::copy(&text), &tx),
                }

                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop Ok(());
                }
            }
        }
    };

    tui::restore_tui()?;
    info!("promptsense exiting");
    result
}
