//! Input panel renderer.
//!
//! Analyze mode shows one field, the prompt. Debug mode splits the panel into
//! the prompt ("Vibe Context") above the observed output. The field receiving
//! keystrokes is marked with `▸` in its title; in Insert mode the terminal
//! cursor sits after its last character.

use promptsense_core::{AppMode, InputField};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{AppState, Mode, PanelFocus};
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block};
use crate::ui::wrap::{max_scroll, wrap_lines};

const PROMPT_PLACEHOLDER: &str =
    "Paste your Lovable prompt here... (e.g., Build a SaaS dashboard for tracking habits)";
const CONTEXT_PLACEHOLDER: &str = "What did you ask Lovable to build?";
const OBSERVED_PLACEHOLDER: &str = "Paste what Lovable produced, or the error it hit...";

/// Renders the input panel for the current mode.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: outer `Rect` of the input panel
/// * `state`: app state; scroll offset and viewport height are written back
/// * `theme`: active color theme
pub fn render_input(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let focused = state.focus == PanelFocus::Input;

    match state.session.mode() {
        AppMode::Analyze => {
            render_field(
                frame,
                area,
                InputField::Prompt,
                "Your Lovable Prompt",
                focused,
                state,
                theme,
            );
        }
        AppMode::Debug => {
            let [top, bottom] = debug_field_areas(area);
            render_field(frame, top, InputField::Prompt, "Vibe Context", focused, state, theme);
            render_field(
                frame,
                bottom,
                InputField::ObservedOutput,
                "Lovable Output / Error",
                focused,
                state,
                theme,
            );
        }
    }
}

/// Splits the Debug-mode input panel into the prompt and observed-output fields.
///
/// Shared with mouse hit-testing so clicks land on the field that was drawn.
pub(crate) fn debug_field_areas(area: Rect) -> [Rect; 2] {
    area.layout(&Layout::vertical([
        Constraint::Percentage(45),
        Constraint::Percentage(55),
    ]))
}

/// Renders one bordered text field.
///
/// Only the active field scrolls and caches its viewport height; the other
/// field in Debug mode is always shown from the top.
fn render_field(
    frame: &mut Frame,
    area: Rect,
    field: InputField,
    title: &str,
    panel_focused: bool,
    state: &mut AppState,
    theme: &Theme,
) {
    let active = state.active_field == field;
    let editing = active && state.mode == Mode::Insert;

    let marker = if active { "▸ " } else { "  " };
    let title_style = if active && panel_focused {
        Style::default().fg(theme.border_active).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let title = Line::from(Span::styled(format!(" {marker}{title} "), title_style));
    let block = panel_block(title, panel_focused && active, theme);
    let inner = inner_rect(area);
    frame.render_widget(block, area);

    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let text = state.session.input(field).to_owned();
    let source: Vec<Line<'static>> = if text.is_empty() && !editing {
        let placeholder = match (field, state.session.mode()) {
            (InputField::ObservedOutput, _) => OBSERVED_PLACEHOLDER,
            (InputField::Prompt, AppMode::Debug) => CONTEXT_PLACEHOLDER,
            (InputField::Prompt, AppMode::Analyze) => PROMPT_PLACEHOLDER,
        };
        let style = Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::ITALIC);
        vec![Line::styled(placeholder, style)]
    } else if field == InputField::Prompt && !editing {
        state.prompt_highlight.lines(&text).to_vec()
    } else {
        text.split('\n')
            .map(|l| Line::styled(l.to_owned(), Style::default().fg(theme.text)))
            .collect()
    };

    let rows = wrap_lines(&source, inner.width);
    // A full last row pushes the cursor onto a row of its own.
    let last_row_full = rows
        .last()
        .is_some_and(|l| l.width() >= usize::from(inner.width));
    let cursor_row_extra = usize::from(editing && last_row_full);
    let limit = max_scroll(rows.len() + cursor_row_extra, inner.height);

    let scroll = if !active {
        0
    } else {
        state.input_viewport_height = inner.height;
        // While typing, keep the end of the text (where the cursor is) in view.
        if editing {
            state.input_scroll = limit;
        }
        state.input_scroll = state.input_scroll.min(limit);
        state.input_scroll
    };

    let start = usize::from(scroll);
    let end = (start + usize::from(inner.height)).min(rows.len());
    frame.render_widget(Paragraph::new(rows[start..end].to_vec()), inner);

    if editing {
        frame.set_cursor_position(cursor_position(&rows, inner, scroll));
    }
}

/// Screen position just after the last character of the wrapped text.
fn cursor_position(rows: &[Line<'_>], inner: Rect, scroll: u16) -> Position {
    let last_width = rows.last().map(|l| l.width()).unwrap_or(0);
    let mut row = rows.len().saturating_sub(1);
    let mut col = last_width;
    if col >= usize::from(inner.width) {
        row += 1;
        col = 0;
    }
    let y = row
        .saturating_sub(usize::from(scroll))
        .min(usize::from(inner.height.saturating_sub(1)));
    Position {
        x: inner.x + u16::try_from(col).unwrap_or(0),
        y: inner.y + u16::try_from(y).unwrap_or(0),
    }
}
