//! UI rendering for promptsense.
//!
//! `render()` is the single entry point, called once per `AppEvent::Render`
//! inside `terminal.draw()`. Layout arithmetic lives in `layout.rs`, the two
//! panels in `input_pane.rs` and `report.rs` (with `advice.rs` for Debug mode).

mod advice;
mod input_pane;
mod layout;
mod report;
mod wrap;
pub mod help;
pub mod keybindings;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, render_header, render_status_bar};

/// Renders one complete frame: header, input panel, report panel, status bar,
/// and the help overlay on top when open.
///
/// Panel rects are cached into `state` for mouse hit-testing; the panels
/// themselves cache their viewport heights for page-wise scrolling.
///
/// # Arguments
///
/// * `frame`: current render frame provided by `terminal.draw()`
/// * `state`: app state (rects, viewport heights and clamped scroll offsets are written back)
/// * `theme`: active color theme
pub fn render(frame: &mut Frame, state: &mut AppState, theme: &Theme) {
    let [header, input, report, status_bar] = compute_layout(frame.area(), state);
    state.panel_rects = [input, report];

    render_header(frame, header, state, theme);
    input_pane::render_input(frame, input, state, theme);
    report::render_report(frame, report, state, theme);
    render_status_bar(frame, status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
