//! Event bus for promptsense.
//!
//! Terminal input, timer ticks and finished service calls all arrive as an
//! [`AppEvent`] on one tokio unbounded channel, which the main loop drains.
//!
//! Two independent intervals drive the render and logic cycles:
//! - **Render interval** (33 ms, about 30 FPS) triggers a `terminal.draw()` call.
//! - **Tick interval** (250 ms) advances the spinner and expires status notices.

use crossterm::event::{Event, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::{FutureExt, StreamExt};
use promptsense_core::Completion;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

use crate::clipboard::ClipboardError;

/// Everything the main loop reacts to.
#[derive(Debug)]
#[non_exhaustive]
pub enum AppEvent {
    /// A key press (`KeyEventKind::Press` only; Windows also reports releases).
    Key(KeyEvent),
    /// A mouse event from the terminal (click, scroll, move).
    Mouse(MouseEvent),
    /// Bracketed paste: the whole pasted text in one event.
    Paste(String),
    /// Terminal was resized to (columns, rows).
    Resize(u16, u16),
    /// Logic tick (250 ms).
    Tick,
    /// Render tick (33 ms).
    Render,
    /// A service call spawned by the main loop has finished.
    ServiceResult(Box<Completion>),
    /// A clipboard copy run on a blocking thread has finished.
    CopyFinished(Result<(), ClipboardError>),
}

/// Sender and receiver ends of the event channel.
///
/// `tx` is cloned into every task that produces events; `rx` belongs to the main loop.
pub struct EventHandler {
    pub tx: mpsc::UnboundedSender<AppEvent>,
    pub rx: mpsc::UnboundedReceiver<AppEvent>,
}

impl EventHandler {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawns the task that feeds terminal input and timer ticks into `tx`.
///
/// The task ends when the crossterm stream closes or the receiver is dropped.
///
/// `reader.next().fuse()` keeps `tokio::select!` from polling a completed
/// future if the crossterm stream terminates.
pub fn spawn_event_task(tx: mpsc::UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut tick_interval = interval(Duration::from_millis(250));
        let mut render_interval = interval(Duration::from_millis(33));
        let mut reader = EventStream::new();

        loop {
            let tick_tick = tick_interval.tick();
            let render_tick = render_interval.tick();
            let crossterm_event = reader.next().fuse();

            let event = tokio::select! {
                _ = tick_tick => Some(AppEvent::Tick),
                _ = render_tick => Some(AppEvent::Render),
                maybe_event = crossterm_event => match maybe_event {
                    Some(Ok(event)) => translate(event),
                    Some(Err(_)) => None,
                    None => break,
                },
            };

            if let Some(event) = event {
                if tx.send(event).is_err() {
                    break;
                }
            }
        }
    });
}

/// Maps a crossterm event to an [`AppEvent`], dropping the ones we ignore.
fn translate(event: Event) -> Option<AppEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(AppEvent::Key(key)),
        Event::Mouse(mouse) => Some(AppEvent::Mouse(mouse)),
        Event::Paste(text) => Some(AppEvent::Paste(text)),
        Event::Resize(w, h) => Some(AppEvent::Resize(w, h)),
        _ => None,
    }
}
