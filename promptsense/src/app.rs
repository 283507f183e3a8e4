//! Central application state for promptsense.
//!
//! `AppState` wraps the core [`Session`] together with everything that is
//! purely presentational: editor mode, panel focus, which input field is being
//! edited, scroll offsets, cached viewport heights and the transient status
//! notice. No rendering happens here; `ui` reads this state and
//! `ui::keybindings` mutates it.

use promptsense_core::{AppMode, Command, InputField, Session, SessionEvent};
use ratatui::layout::Rect;

use crate::markdown::HighlightCache;

/// Spinner glyphs cycled once per tick while a request is loading.
pub const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// Ticks (250 ms each) a status notice stays visible.
const NOTICE_TICKS: u8 = 12;

/// Editor mode controlling which keybinding set is active.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Navigation and commands (default).
    #[default]
    Normal,
    /// Typing into the active input field.
    Insert,
    /// Help overlay shown above all panels.
    HelpOverlay,
    /// Quit requested while a check is still running.
    ConfirmQuit,
}

/// Which panel receives scroll keys.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// Left panel: the prompt (and observed output in Debug mode).
    #[default]
    Input,
    /// Right panel: the quality report or fix advice.
    Report,
}

impl PanelFocus {
    /// With two panels, previous and next are the same move.
    pub fn prev(self) -> Self {
        self.next()
    }

    pub fn next(self) -> Self {
        match self {
            PanelFocus::Input => PanelFocus::Report,
            PanelFocus::Report => PanelFocus::Input,
        }
    }
}

/// A short message shown in the status bar until it expires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
    ticks: u8,
}

/// All mutable UI state passed through every render cycle.
pub struct AppState {
    /// Inputs, request status and results. Changed only through [`AppState::apply`].
    pub session: Session,

    pub mode: Mode,
    pub focus: PanelFocus,
    /// Field that receives typed text in Insert mode.
    pub active_field: InputField,

    pub input_scroll: u16,
    pub report_scroll: u16,
    pub help_scroll: u16,

    /// Inner heights cached by the renderer for page-wise scrolling.
    pub input_viewport_height: u16,
    pub report_viewport_height: u16,

    /// Outer rects of `[input, report]` from the last frame, for mouse hit-testing.
    pub panel_rects: [Rect; 2],

    /// Width percentage of the input panel in the side-by-side layout.
    pub left_pct: u16,

    pub notice: Option<Notice>,
    pub spinner_frame: usize,

    /// Model name shown in the status bar.
    pub model: String,

    /// Markdown highlighting of the prompt input and of the refined prompt.
    pub prompt_highlight: HighlightCache,
    pub refined_highlight: HighlightCache,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppMode::default(), String::new())
    }
}

impl AppState {
    pub fn new(mode: AppMode, model: String) -> Self {
        Self {
            session: Session::new(mode),
            mode: Mode::default(),
            focus: PanelFocus::default(),
            active_field: InputField::Prompt,
            input_scroll: 0,
            report_scroll: 0,
            help_scroll: 0,
            input_viewport_height: 0,
            report_viewport_height: 0,
            panel_rects: [Rect::default(); 2],
            left_pct: 45,
            notice: None,
            spinner_frame: 0,
            model,
            prompt_highlight: HighlightCache::default(),
            refined_highlight: HighlightCache::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Session transitions
    // -----------------------------------------------------------------------

    /// Feeds one event through the session and returns the command it issued.
    ///
    /// The report scrolls back to the top whenever the request status changes,
    /// so a fresh result is always read from its first line.
    pub fn apply(&mut self, event: SessionEvent) -> Option<Command> {
        let previous = self.session.status();
        let (session, command) = std::mem::take(&mut self.session).update(event);
        self.session = session;
        if self.session.status() != previous {
            self.report_scroll = 0;
        }
        command
    }

    /// Starts a check for the current mode, if the inputs allow one.
    pub fn submit(&mut self) -> Option<Command> {
        if self.session.is_loading() {
            return None;
        }
        if !self.session.can_submit() {
            let missing = match self.session.mode() {
                AppMode::Debug if !self.session.prompt().trim().is_empty() => {
                    "Paste what Lovable produced first"
                }
                _ => "Write a prompt first",
            };
            self.notify(missing, false);
            return None;
        }
        self.mode = Mode::Normal;
        self.focus = PanelFocus::Report;
        self.apply(SessionEvent::Submit)
    }

    /// Switches to `mode`, clearing results and any pending request.
    pub fn switch_mode(&mut self, mode: AppMode) {
        self.apply(SessionEvent::SwitchMode(mode));
        self.active_field = InputField::Prompt;
        self.input_scroll = 0;
        self.report_scroll = 0;
    }

    /// Replaces the prompt with the built-in sample.
    pub fn load_example(&mut self) {
        self.apply(SessionEvent::LoadExample);
        self.active_field = InputField::Prompt;
        self.input_scroll = 0;
        self.notify("Loaded example prompt", false);
    }

    // -----------------------------------------------------------------------
    // Input editing
    // -----------------------------------------------------------------------

    /// Text of the field currently receiving input.
    pub fn active_text(&self) -> &str {
        self.session.input(self.active_field)
    }

    fn edit_active(&mut self, edit: impl FnOnce(&mut String)) {
        let mut text = self.active_text().to_owned();
        edit(&mut text);
        self.apply(SessionEvent::SetInput {
            field: self.active_field,
            text,
        });
    }

    pub fn insert_char(&mut self, c: char) {
        self.edit_active(|text| text.push(c));
    }

    /// Appends pasted text, normalising CRLF line endings.
    pub fn insert_str(&mut self, s: &str) {
        let s = s.replace("\r\n", "\n").replace('\r', "\n");
        self.edit_active(|text| text.push_str(&s));
    }

    pub fn delete_char(&mut self) {
        self.edit_active(|text| {
            text.pop();
        });
    }

    /// Deletes back to the start of the previous word, like readline's Ctrl-w.
    pub fn delete_word(&mut self) {
        self.edit_active(|text| {
            if text.ends_with('\n') {
                text.pop();
                return;
            }
            let trimmed = text.trim_end_matches(|c: char| c.is_whitespace() && c != '\n');
            let cut = trimmed
                .char_indices()
                .rev()
                .find(|(_, c)| c.is_whitespace())
                .map(|(i, c)| i + c.len_utf8())
                .unwrap_or(0);
            text.truncate(cut);
        });
    }

    /// Moves input to the other field. Only Debug mode has a second field.
    pub fn cycle_field(&mut self) {
        if self.session.mode() != AppMode::Debug {
            return;
        }
        self.active_field = match self.active_field {
            InputField::Prompt => InputField::ObservedOutput,
            InputField::ObservedOutput => InputField::Prompt,
        };
        self.input_scroll = 0;
    }

    /// Enters Insert mode on the input panel.
    pub fn start_editing(&mut self) {
        self.focus = PanelFocus::Input;
        self.mode = Mode::Insert;
    }

    // -----------------------------------------------------------------------
    // Clipboard, notices and ticks
    // -----------------------------------------------------------------------

    /// What `y` copies: the refined prompt in Analyze mode, the fix in Debug mode.
    pub fn copy_target(&self) -> Option<&str> {
        match self.session.mode() {
            AppMode::Analyze => self.session.analysis().map(|a| a.refined_prompt.as_str()),
            AppMode::Debug => self.session.advice().map(|a| a.fix.as_str()),
        }
    }

    pub fn notify(&mut self, text: impl Into<String>, is_error: bool) {
        self.notice = Some(Notice {
            text: text.into(),
            is_error,
            ticks: 0,
        });
    }

    /// Advances the spinner while loading and expires the status notice.
    pub fn tick(&mut self) {
        if self.session.is_loading() {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }
        if let Some(notice) = &mut self.notice {
            notice.ticks += 1;
            if notice.ticks > NOTICE_TICKS {
                self.notice = None;
            }
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    // -----------------------------------------------------------------------
    // Scrolling
    // -----------------------------------------------------------------------

    fn focused_scroll(&mut self) -> &mut u16 {
        match self.focus {
            PanelFocus::Input => &mut self.input_scroll,
            PanelFocus::Report => &mut self.report_scroll,
        }
    }

    fn focused_viewport(&self) -> u16 {
        match self.focus {
            PanelFocus::Input => self.input_viewport_height,
            PanelFocus::Report => self.report_viewport_height,
        }
    }

    pub fn scroll_down(&mut self, lines: u16) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_add(lines);
    }

    pub fn scroll_up(&mut self, lines: u16) {
        let scroll = self.focused_scroll();
        *scroll = scroll.saturating_sub(lines);
    }

    pub fn scroll_top(&mut self) {
        *self.focused_scroll() = 0;
    }

    /// Renderers clamp the offset to the content length.
    pub fn scroll_bottom(&mut self) {
        *self.focused_scroll() = u16::MAX;
    }

    /// Half a viewport down. Scrolls by 1 before the first frame has cached a height.
    pub fn half_page_down(&mut self) {
        self.scroll_down((self.focused_viewport() / 2).max(1));
    }

    pub fn half_page_up(&mut self) {
        self.scroll_up((self.focused_viewport() / 2).max(1));
    }

    pub fn full_page_down(&mut self) {
        self.scroll_down(self.focused_viewport().max(1));
    }

    pub fn full_page_up(&mut self) {
        self.scroll_up(self.focused_viewport().max(1));
    }

    // -----------------------------------------------------------------------
    // Panel sizing
    // -----------------------------------------------------------------------

    /// Shrinks the input panel by 5%, down to 25%.
    pub fn shrink_input_panel(&mut self) {
        const MIN_LEFT: u16 = 25;
        self.left_pct = self.left_pct.saturating_sub(5).max(MIN_LEFT);
    }

    /// Grows the input panel by 5%, up to 70%.
    pub fn grow_input_panel(&mut self) {
        const MAX_LEFT: u16 = 70;
        self.left_pct = (self.left_pct + 5).min(MAX_LEFT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptsense_core::RequestStatus;

    fn typed(text: &str) -> AppState {
        let mut state = AppState::default();
        state.insert_str(text);
        state
    }

    #[test]
    fn focus_toggles_between_two_panels() {
        assert_eq!(PanelFocus::Input.next(), PanelFocus::Report);
        assert_eq!(PanelFocus::Report.prev(), PanelFocus::Input);
    }

    #[test]
    fn typing_edits_the_active_field() {
        let mut state = typed("Build a todo");
        state.insert_char('!');
        assert_eq!(state.session.prompt(), "Build a todo!");
        state.delete_char();
        state.delete_char();
        assert_eq!(state.session.prompt(), "Build a tod");
    }

    #[test]
    fn paste_normalises_line_endings() {
        let state = typed("# GOAL\r\nBuild a todo app.\r");
        assert_eq!(state.session.prompt(), "# GOAL\nBuild a todo app.\n");
    }

    #[test]
    fn delete_word_removes_last_word_only() {
        let mut state = typed("Build a todo app  ");
        state.delete_word();
        assert_eq!(state.session.prompt(), "Build a todo ");
        state.delete_word();
        assert_eq!(state.session.prompt(), "Build a ");

        let mut state = typed("single");
        state.delete_word();
        assert_eq!(state.session.prompt(), "");

        let mut state = typed("# GOAL\n");
        state.delete_word();
        assert_eq!(state.session.prompt(), "# GOAL");
    }

    #[test]
    fn cycle_field_only_moves_in_debug_mode() {
        let mut state = AppState::default();
        state.cycle_field();
        assert_eq!(state.active_field, InputField::Prompt);

        state.switch_mode(AppMode::Debug);
        state.cycle_field();
        assert_eq!(state.active_field, InputField::ObservedOutput);
        state.insert_str("a list view");
        assert_eq!(state.session.observed_output(), "a list view");
        assert_eq!(state.session.prompt(), "");
    }

    #[test]
    fn submit_with_empty_prompt_only_notifies() {
        let mut state = AppState::default();
        assert!(state.submit().is_none());
        assert_eq!(state.session.status(), RequestStatus::Idle);
        assert_eq!(state.notice.as_ref().map(|n| n.text.as_str()), Some("Write a prompt first"));
    }

    #[test]
    fn submit_issues_one_command_and_leaves_insert_mode() {
        let mut state = typed("Build a todo app.");
        state.start_editing();
        assert!(state.submit().is_some());
        assert_eq!(state.mode, Mode::Normal);
        assert_eq!(state.focus, PanelFocus::Report);
        assert!(state.session.is_loading());
        assert!(state.submit().is_none());
    }

    #[test]
    fn switch_mode_resets_field_and_scroll() {
        let mut state = AppState::default();
        state.switch_mode(AppMode::Debug);
        state.cycle_field();
        state.report_scroll = 9;
        state.switch_mode(AppMode::Analyze);
        assert_eq!(state.active_field, InputField::Prompt);
        assert_eq!(state.report_scroll, 0);
        assert_eq!(state.session.mode(), AppMode::Analyze);
    }

    #[test]
    fn notice_expires_after_enough_ticks() {
        let mut state = AppState::default();
        state.notify("Copied", false);
        for _ in 0..NOTICE_TICKS {
            state.tick();
        }
        assert!(state.notice.is_some());
        state.tick();
        assert!(state.notice.is_none());
    }

    #[test]
    fn spinner_only_moves_while_loading() {
        let mut state = typed("Build a todo app.");
        state.tick();
        assert_eq!(state.spinner_frame, 0);
        state.submit();
        state.tick();
        assert_eq!(state.spinner_frame, 1);
    }

    #[test]
    fn scroll_uses_focused_panel_and_cached_viewport() {
        let mut state = AppState::default();
        state.report_viewport_height = 20;
        state.focus = PanelFocus::Report;
        state.half_page_down();
        assert_eq!(state.report_scroll, 10);
        state.scroll_up(15);
        assert_eq!(state.report_scroll, 0);

        state.focus = PanelFocus::Input;
        state.full_page_down();
        assert_eq!(state.input_scroll, 1);
    }

    #[test]
    fn input_panel_width_is_clamped() {
        let mut state = AppState::default();
        for _ in 0..20 {
            state.grow_input_panel();
        }
        assert_eq!(state.left_pct, 70);
        for _ in 0..20 {
            state.shrink_input_panel();
        }
        assert_eq!(state.left_pct, 25);
    }
}
