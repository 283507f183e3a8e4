//! Keybinding dispatcher for promptsense.
//!
//! Translates crossterm key and mouse events into `AppState` mutations and
//! returns a `KeyAction` telling the event loop what else to do. The
//! dispatcher branches first on `state.mode`, so HelpOverlay, ConfirmQuit,
//! Insert and Normal each have an isolated handler.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use promptsense_core::{AppMode, Command, InputField};
use ratatui::layout::Position;

use crate::app::{AppState, Mode, PanelFocus};
use crate::ui::input_pane::debug_field_areas;

/// What the event loop should do after a key has been handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Nothing beyond the state change; redraw on the next render tick.
    Continue,
    /// Restore the terminal and exit.
    Quit,
    /// Execute this service command in the background.
    Run(Command),
    /// Put this text on the system clipboard.
    Copy(String),
}

impl From<Option<Command>> for KeyAction {
    fn from(command: Option<Command>) -> Self {
        command.map_or(KeyAction::Continue, KeyAction::Run)
    }
}

/// Dispatches a key event to the handler for the current mode.
///
/// # Arguments
///
/// * `key`: the raw crossterm key event (code + modifiers)
/// * `state`: mutable reference to all UI state
pub fn handle_key(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return request_quit(state);
    }
    match state.mode {
        Mode::HelpOverlay => handle_help(key, state),
        Mode::ConfirmQuit => handle_confirm_quit(key, state),
        Mode::Normal => handle_normal(key, state),
        Mode::Insert => handle_insert(key, state),
    }
}

/// Handles a bracketed paste: the text goes into the active field.
///
/// Pasting in Normal mode switches to Insert mode first.
pub fn handle_paste(text: &str, state: &mut AppState) -> KeyAction {
    match state.mode {
        Mode::Normal => state.start_editing(),
        Mode::Insert => {}
        Mode::HelpOverlay | Mode::ConfirmQuit => return KeyAction::Continue,
    }
    state.insert_str(text);
    KeyAction::Continue
}

/// Quits immediately, or asks first while a check is in flight.
fn request_quit(state: &mut AppState) -> KeyAction {
    if state.session.is_loading() && state.mode != Mode::ConfirmQuit {
        state.mode = Mode::ConfirmQuit;
        KeyAction::Continue
    } else {
        KeyAction::Quit
    }
}

// ---------------------------------------------------------------------------
// Normal mode
// ---------------------------------------------------------------------------

fn handle_normal(key: KeyEvent, state: &mut AppState) -> KeyAction {
    if let Some(action) = handle_scroll_key(key, state) {
        return action;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        // Checking
        KeyCode::Enter => state.submit().into(),
        KeyCode::Char('s') if ctrl => state.submit().into(),
        KeyCode::Char('m') => {
            state.switch_mode(state.session.mode().toggled());
            KeyAction::Continue
        }
        KeyCode::Char('1') => {
            state.switch_mode(AppMode::Analyze);
            KeyAction::Continue
        }
        KeyCode::Char('2') => {
            state.switch_mode(AppMode::Debug);
            KeyAction::Continue
        }
        KeyCode::Char('e') => {
            state.load_example();
            KeyAction::Continue
        }
        KeyCode::Char('y') => match state.copy_target() {
            Some(text) => KeyAction::Copy(text.to_owned()),
            None => {
                state.notify("Nothing to copy yet", false);
                KeyAction::Continue
            }
        },

        // Editing
        KeyCode::Char('i') | KeyCode::Char('a') => {
            state.start_editing();
            KeyAction::Continue
        }
        KeyCode::Tab => {
            state.cycle_field();
            KeyAction::Continue
        }

        // Panel focus and size
        KeyCode::Char('H') => {
            state.focus = state.focus.prev();
            KeyAction::Continue
        }
        KeyCode::Char('L') => {
            state.focus = state.focus.next();
            KeyAction::Continue
        }
        KeyCode::Char('<') => {
            state.shrink_input_panel();
            KeyAction::Continue
        }
        KeyCode::Char('>') => {
            state.grow_input_panel();
            KeyAction::Continue
        }

        KeyCode::Char('?') => {
            state.help_scroll = 0;
            state.mode = Mode::HelpOverlay;
            KeyAction::Continue
        }
        KeyCode::Char('q') => request_quit(state),

        _ => KeyAction::Continue,
    }
}

/// Handles j / k / g / G and the Ctrl page keys for the focused panel.
///
/// Returns `None` when the key is not a scroll key.
fn handle_scroll_key(key: KeyEvent, state: &mut AppState) -> Option<KeyAction> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => state.scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => state.scroll_up(1),
        KeyCode::Char('g') | KeyCode::Home => state.scroll_top(),
        KeyCode::Char('G') | KeyCode::End => state.scroll_bottom(),
        KeyCode::Char('d') if ctrl => state.half_page_down(),
        KeyCode::Char('u') if ctrl => state.half_page_up(),
        KeyCode::Char('f') if ctrl => state.full_page_down(),
        KeyCode::Char('b') if ctrl => state.full_page_up(),
        KeyCode::PageDown => state.full_page_down(),
        KeyCode::PageUp => state.full_page_up(),
        _ => return None,
    }
    Some(KeyAction::Continue)
}

// ---------------------------------------------------------------------------
// Insert mode
// ---------------------------------------------------------------------------

fn handle_insert(key: KeyEvent, state: &mut AppState) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Esc => state.mode = Mode::Normal,
        KeyCode::Char('s') if ctrl => return state.submit().into(),
        KeyCode::Char('w') if ctrl => state.delete_word(),
        KeyCode::Tab => state.cycle_field(),
        KeyCode::Enter => state.insert_char('\n'),
        KeyCode::Backspace => state.delete_char(),
        KeyCode::Char(c) if !ctrl && !alt => state.insert_char(c),
        _ => {}
    }
    KeyAction::Continue
}

// ---------------------------------------------------------------------------
// HelpOverlay and ConfirmQuit
// ---------------------------------------------------------------------------

fn handle_help(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.help_scroll = state.help_scroll.saturating_add(1);
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.help_scroll = state.help_scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => state.help_scroll = 0,
        KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q') => state.mode = Mode::Normal,
        _ => {}
    }
    KeyAction::Continue
}

/// `y` quits and abandons the running check; `n` or `Esc` goes back.
fn handle_confirm_quit(key: KeyEvent, state: &mut AppState) -> KeyAction {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => KeyAction::Quit,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            state.mode = Mode::Normal;
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

// ---------------------------------------------------------------------------
// Mouse events
// ---------------------------------------------------------------------------

/// Click-to-focus and scroll wheel.
///
/// In Debug mode a click on the input panel also selects the field under the
/// pointer. The wheel scrolls the help overlay while it is open.
pub fn handle_mouse(mouse: MouseEvent, state: &mut AppState) -> KeyAction {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            handle_mouse_click(mouse.column, mouse.row, state);
        }
        MouseEventKind::ScrollUp if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_sub(3);
        }
        MouseEventKind::ScrollDown if state.mode == Mode::HelpOverlay => {
            state.help_scroll = state.help_scroll.saturating_add(3);
        }
        MouseEventKind::ScrollUp => state.scroll_up(3),
        MouseEventKind::ScrollDown => state.scroll_down(3),
        _ => {}
    }
    KeyAction::Continue
}

fn handle_mouse_click(col: u16, row: u16, state: &mut AppState) {
    if matches!(state.mode, Mode::HelpOverlay | Mode::ConfirmQuit) {
        return;
    }
    let pos = Position { x: col, y: row };
    let [input, report] = state.panel_rects;

    if input.contains(pos) {
        state.focus = PanelFocus::Input;
        if state.session.mode() == AppMode::Debug {
            let [prompt_area, _] = debug_field_areas(input);
            let field = if prompt_area.contains(pos) {
                InputField::Prompt
            } else {
                InputField::ObservedOutput
            };
            if field != state.active_field {
                state.cycle_field();
            }
        }
    } else if report.contains(pos) {
        state.focus = PanelFocus::Report;
    }
}
