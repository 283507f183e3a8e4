//! Responsive two-panel layout for promptsense.
//!
//! Pure layout arithmetic plus the two one-row chrome widgets (mode header and
//! status bar). Called inside `terminal.draw()` on every render, so every frame
//! reflects the current terminal size.
//!
//! # Panel geometry
//!
//! At `>= 100` columns the input panel sits left of the report with a width of
//! `AppState.left_pct`. Narrower terminals stack the input above the report.
//! `Spacing::Overlap(1)` with `MergeStrategy::Fuzzy` lets adjacent borders share
//! one cell.

use promptsense_core::{AppMode, RequestStatus};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph, Tabs},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{AppState, Mode};
use crate::theme::Theme;

/// Columns at which the panels switch from stacked to side by side.
pub const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;

/// Returns `[header, input, report, status_bar]` for the current frame.
///
/// # Arguments
///
/// * `area`: full frame area
/// * `state`: supplies the input panel width percentage
pub fn compute_layout(area: Rect, state: &AppState) -> [Rect; 4] {
    let [header, main_area, status_bar] = area.layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]));

    let split = if area.width >= SIDE_BY_SIDE_MIN_WIDTH {
        Layout::horizontal([
            Constraint::Percentage(state.left_pct),
            Constraint::Percentage(100 - state.left_pct),
        ])
    } else {
        Layout::vertical([Constraint::Percentage(40), Constraint::Percentage(60)])
    };
    let [input, report] = main_area.layout(&split.spacing(Spacing::Overlap(1)));

    [header, input, report, status_bar]
}

/// Inner `Rect` of a bordered panel.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin {
        vertical: 1,
        horizontal: 1,
    })
}

/// Builds a bordered `Block` for a panel.
///
/// Focused panels get a thick border in `border_active`. `MergeStrategy::Fuzzy`
/// is used because `Exact` produces wrong junctions between thick and plain borders.
///
/// # Arguments
///
/// * `title`: panel title shown in the top border
/// * `is_focused`: `true` when this panel has keyboard focus
/// * `theme`: active color theme
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Label of the submit control for `mode` and `status`.
pub fn submit_label(mode: AppMode, status: RequestStatus) -> &'static str {
    match (mode, status) {
        (AppMode::Analyze, RequestStatus::Loading) => "Checking...",
        (AppMode::Debug, RequestStatus::Loading) => "Analyzing Failure...",
        (AppMode::Analyze, _) => "Run Vibe Check",
        (AppMode::Debug, _) => "Get Fix",
    }
}

/// Renders the header: mode tabs on the left, the submit control on the right.
///
/// The submit control is dimmed whenever a submit would be ignored.
pub fn render_header(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let session = &state.session;
    let selected = match session.mode() {
        AppMode::Analyze => 0,
        AppMode::Debug => 1,
    };

    let label = submit_label(session.mode(), session.status());
    let submit_text = if session.is_loading() {
        format!(" {} {label} ", state.spinner())
    } else {
        format!(" [Enter] {label} ")
    };
    let submit_style = if session.can_submit() {
        Style::default()
            .fg(theme.status_bar_bg)
            .bg(theme.border_active)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };

    let width = u16::try_from(submit_text.width()).unwrap_or(u16::MAX);
    let [tabs_area, submit_area] =
        area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(width)]));

    let tabs = Tabs::new([AppMode::Analyze.label(), AppMode::Debug.label()])
        .select(selected)
        .style(Style::default().fg(theme.dim))
        .highlight_style(
            Style::default()
                .fg(theme.heading)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");
    frame.render_widget(tabs, tabs_area);
    frame.render_widget(
        Paragraph::new(Span::styled(submit_text, submit_style)),
        submit_area,
    );
}

/// Renders the 1-row status bar.
///
/// Left: editor mode indicator and app mode. Middle: the current notice, or a
/// key hint. Right: model name.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let (mode_text, mode_fg) = match state.mode {
        Mode::Insert => (" INSERT ", theme.status_mode_insert),
        Mode::Normal | Mode::HelpOverlay | Mode::ConfirmQuit => {
            (" NORMAL ", theme.status_mode_normal)
        }
    };

    let mut spans = vec![
        Span::styled(mode_text, Style::default().fg(mode_fg).add_modifier(Modifier::BOLD)),
        Span::raw(format!(" {} ", state.session.mode().label())),
    ];

    match (&state.notice, state.mode) {
        (_, Mode::ConfirmQuit) => spans.push(Span::styled(
            " A check is still running. Quit anyway? (y/n) ",
            Style::default()
                .fg(theme.error)
                .add_modifier(Modifier::BOLD),
        )),
        (Some(notice), _) => {
            let fg = if notice.is_error { theme.error } else { theme.status_bar_fg };
            spans.push(Span::styled(format!(" {} ", notice.text), Style::default().fg(fg)));
        }
        (None, Mode::Insert) => {
            spans.push(Span::raw(" Esc normal · Tab field · Ctrl-s run "));
        }
        (None, _) => {
            spans.push(Span::raw(" i edit · Enter run · m mode · e example · ? help "));
        }
    }

    let model = format!(" {} ", state.model);
    let model_width = u16::try_from(model.width()).unwrap_or(0);
    let [left, right] =
        area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(model_width)]));

    let bar = Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar), left);
    frame.render_widget(
        Paragraph::new(model).style(bar.add_modifier(Modifier::DIM)),
        right,
    );
}
