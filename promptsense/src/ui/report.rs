//! Report panel renderer.
//!
//! Shows, top to bottom: the error banner (if the last run failed), then one of
//! a loading spinner, the result for the current mode, or the mode's empty
//! state. Analyze results get a fixed score gauge above a scrollable body; the
//! body is pre-wrapped (see `wrap.rs`) and only the visible rows are rendered.

use promptsense_core::highlight::{count_new_lines, highlight_new_lines};
use promptsense_core::types::ScoreBand;
use promptsense_core::{AnalysisResult, AppMode, GroupedChecklist};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph},
};

use crate::app::{AppState, PanelFocus};
use crate::theme::Theme;
use crate::ui::advice::advice_lines;
use crate::ui::layout::{inner_rect, panel_block};
use crate::ui::wrap::{max_scroll, wrap_lines};

/// Renders the report panel for the current mode and request status.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `area`: outer `Rect` of the report panel
/// * `state`: app state; the report scroll is clamped and written back
/// * `theme`: active color theme
pub fn render_report(frame: &mut Frame, area: Rect, state: &mut AppState, theme: &Theme) {
    let mode = state.session.mode();
    let title = match mode {
        AppMode::Analyze => " Vibe Quality Report ",
        AppMode::Debug => " Vibe Fix Advice ",
    };
    frame.render_widget(
        panel_block(title, state.focus == PanelFocus::Report, theme),
        area,
    );

    let mut inner = inner_rect(area);
    if inner.is_empty() {
        return;
    }

    if let Some(message) = state.session.error() {
        let banner = wrap_lines(&[error_line(message, theme)], inner.width);
        let height = u16::try_from(banner.len()).unwrap_or(u16::MAX);
        let [banner_area, _, rest] = inner.layout(&Layout::vertical([
            Constraint::Length(height),
            Constraint::Length(1),
            Constraint::Fill(1),
        ]));
        frame.render_widget(Paragraph::new(banner), banner_area);
        inner = rest;
    }

    if state.session.is_loading() {
        state.report_viewport_height = inner.height;
        frame.render_widget(
            Paragraph::new(loading_lines(mode, state.spinner(), theme)),
            inner,
        );
        return;
    }

    let lines = match mode {
        AppMode::Analyze => match state.session.analysis() {
            Some(result) => {
                let [gauge_area, _, body] = inner.layout(&Layout::vertical([
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Fill(1),
                ]));
                render_score(frame, gauge_area, result.score, theme);
                inner = body;
                let refined = state.refined_highlight.lines(&result.refined_prompt);
                analysis_lines(result, state.session.prompt(), refined, theme)
            }
            None => empty_state(mode, theme),
        },
        AppMode::Debug => match state.session.advice() {
            Some(advice) => advice_lines(advice, theme),
            None => empty_state(mode, theme),
        },
    };

    let rows = wrap_lines(&lines, inner.width);
    state.report_viewport_height = inner.height;
    state.report_scroll = state
        .report_scroll
        .min(max_scroll(rows.len(), inner.height));

    let start = usize::from(state.report_scroll);
    let end = (start + usize::from(inner.height)).min(rows.len());
    frame.render_widget(Paragraph::new(rows[start..end].to_vec()), inner);
}

/// One-row gauge coloured by score band, labelled e.g. `72/100 · Average`.
fn render_score(frame: &mut Frame, area: Rect, score: i64, theme: &Theme) {
    let band = ScoreBand::from_score(score);
    let percent = u16::try_from(score.clamp(0, 100)).unwrap_or(0);
    let label = Span::styled(
        format!("{score}/100 · {}", band.label()),
        Style::default().add_modifier(Modifier::BOLD),
    );
    let gauge = Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.score_color(band))
                .bg(theme.status_bar_bg),
        )
        .percent(percent)
        .label(label);
    frame.render_widget(gauge, area);
}

fn heading_style(theme: &Theme) -> Style {
    Style::default()
        .fg(theme.heading)
        .add_modifier(Modifier::BOLD)
}

pub(crate) fn heading(title: impl Into<String>, theme: &Theme) -> Line<'static> {
    Line::styled(title.into(), heading_style(theme))
}

fn error_line(message: &str, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            "✗ ",
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        ),
        Span::styled(message.to_owned(), Style::default().fg(theme.error)),
    ])
}

fn loading_lines(mode: AppMode, spinner: &str, theme: &Theme) -> Vec<Line<'static>> {
    let message = match mode {
        AppMode::Analyze => "Analyzing prompt structure...",
        AppMode::Debug => "Finding where the vibe broke...",
    };
    vec![
        Line::default(),
        Line::from(vec![
            Span::styled(format!("{spinner} "), Style::default().fg(theme.border_active)),
            Span::styled(message, Style::default().fg(theme.text)),
        ])
        .centered(),
    ]
}

/// Placeholder shown when the current mode has no result yet.
pub fn empty_state(mode: AppMode, theme: &Theme) -> Vec<Line<'static>> {
    let (title, body) = match mode {
        AppMode::Analyze => (
            "Ready for Analysis",
            "Write or paste a prompt on the left and press Enter to get a quality \
             score, a checklist and an improved version. Press e to load an example.",
        ),
        AppMode::Debug => (
            "Debug a Failed Generation",
            "Put your original prompt in Vibe Context and paste what Lovable built \
             (or the error it hit) below it, then press Enter for a fix.",
        ),
    };
    vec![
        Line::default(),
        Line::styled(title, heading_style(theme)).centered(),
        Line::default(),
        Line::styled(body, Style::default().fg(theme.dim)).centered(),
    ]
}

/// Builds the scrollable body of an analysis report.
///
/// `refined_highlighted` must be the Markdown-highlighted lines of
/// `result.refined_prompt`, one per `'\n'`-separated line.
pub fn analysis_lines(
    result: &AnalysisResult,
    original_prompt: &str,
    refined_highlighted: &[Line<'static>],
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Summary", theme),
        Line::styled(result.summary.clone(), Style::default().fg(theme.text)),
        Line::default(),
    ];

    let added = count_new_lines(original_prompt, &result.refined_prompt);
    let noun = if added == 1 { "line" } else { "lines" };
    lines.push(Line::from(vec![
        Span::styled("Vibe Evolution", heading_style(theme)),
        Span::styled(
            format!("  ({added} new {noun})  y to copy"),
            Style::default().fg(theme.dim),
        ),
    ]));
    lines.extend(comparison_lines(
        original_prompt,
        &result.refined_prompt,
        refined_highlighted,
        theme,
    ));
    lines.push(Line::default());

    push_list(
        &mut lines,
        "Technical Steering Applied",
        &result.whats_changed,
        "→ ",
        theme.heading,
        theme,
    );
    push_checklist(&mut lines, &result.checklist, theme);

    if !result.prioritized_actions.is_empty() {
        lines.push(heading("Priority Fixes", theme));
        for (i, action) in result.prioritized_actions.iter().enumerate() {
            let number_style = Style::default()
                .fg(theme.priority)
                .add_modifier(Modifier::BOLD);
            lines.push(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), number_style),
                Span::styled(action.clone(), Style::default().fg(theme.text)),
            ]));
        }
        lines.push(Line::default());
    }

    push_list(
        &mut lines,
        "Strengths",
        &result.strengths,
        "+ ",
        theme.check_pass,
        theme,
    );
    push_list(
        &mut lines,
        "Hallucination Risks",
        &result.weaknesses,
        "- ",
        theme.check_fail,
        theme,
    );

    while lines.last().is_some_and(|l| l.spans.is_empty()) {
        lines.pop();
    }
    lines
}

/// The refined prompt with every line absent from the original marked `+`.
///
/// New lines are drawn in `new_line` on `new_line_bg`; carried-over lines keep
/// their Markdown highlighting behind a blank gutter.
pub fn comparison_lines(
    original: &str,
    refined: &str,
    refined_highlighted: &[Line<'static>],
    theme: &Theme,
) -> Vec<Line<'static>> {
    let new_style = Style::default().fg(theme.new_line).bg(theme.new_line_bg);
    highlight_new_lines(original, refined)
        .enumerate()
        .map(|(i, line)| {
            if line.is_new {
                Line::from(vec![
                    Span::styled("+ ", new_style.add_modifier(Modifier::BOLD)),
                    Span::styled(line.text.to_owned(), new_style),
                ])
            } else {
                let mut spans = vec![Span::raw("  ")];
                match refined_highlighted.get(i) {
                    Some(highlighted) => spans.extend(highlighted.spans.iter().cloned()),
                    None => spans.push(Span::styled(
                        line.text.to_owned(),
                        Style::default().fg(theme.dim),
                    )),
                }
                Line::from(spans)
            }
        })
        .collect()
}

fn push_list(
    lines: &mut Vec<Line<'static>>,
    title: &str,
    items: &[String],
    marker: &str,
    marker_color: ratatui::style::Color,
    theme: &Theme,
) {
    if items.is_empty() {
        return;
    }
    lines.push(heading(title, theme));
    for item in items {
        lines.push(Line::from(vec![
            Span::styled(marker.to_owned(), Style::default().fg(marker_color)),
            Span::styled(item.clone(), Style::default().fg(theme.text)),
        ]));
    }
    lines.push(Line::default());
}

fn push_checklist(lines: &mut Vec<Line<'static>>, checklist: &GroupedChecklist, theme: &Theme) {
    if checklist.total() == 0 {
        return;
    }
    lines.push(Line::from(vec![
        Span::styled("Vibe Checklist", heading_style(theme)),
        Span::styled(
            format!("  ({}/{} passed)", checklist.passed(), checklist.total()),
            Style::default().fg(theme.dim),
        ),
    ]));
    for (section, items) in checklist.sections() {
        if items.is_empty() {
            continue;
        }
        lines.push(Line::styled(
            section,
            Style::default()
                .fg(theme.text)
                .add_modifier(Modifier::UNDERLINED),
        ));
        for item in items {
            let (mark, color) = if item.status {
                ("✓ ", theme.check_pass)
            } else {
                ("! ", theme.check_fail)
            };
            lines.push(Line::from(vec![
                Span::styled(mark, Style::default().fg(color).add_modifier(Modifier::BOLD)),
                Span::styled(item.label.clone(), Style::default().fg(theme.text)),
            ]));
            if !item.feedback.is_empty() {
                lines.push(Line::styled(
                    format!("  {}", item.feedback),
                    Style::default().fg(theme.dim),
                ));
            }
        }
    }
    lines.push(Line::default());
}
