//! Help overlay renderer.
//!
//! Draws a centred modal over the panels. `Clear` erases the area first, so the
//! overlay lives in the same `terminal.draw()` call as everything else.

use ratatui::{
    Frame,
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled by `help_scroll` rows.
///
/// Skipped on terminals narrower than 50 columns.
///
/// # Arguments
///
/// * `frame`: current render frame
/// * `theme`: active color theme
/// * `help_scroll`: vertical scroll offset, driven by j/k while the overlay is open
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 50 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help · j/k scroll · ? or Esc to close ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text(theme))
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text(theme: &Theme) -> Text<'static> {
    let section = |title: &'static str| {
        Line::styled(
            title,
            Style::default()
                .fg(theme.heading)
                .add_modifier(Modifier::BOLD),
        )
    };
    Text::from(vec![
        section("Checking"),
        Line::from("  Enter / Ctrl-s  Run the check for the current mode"),
        Line::from("  m               Switch Vibe Check / Debug Vibe (clears results)"),
        Line::from("  1 / 2           Vibe Check / Debug Vibe"),
        Line::from("  e               Load the example prompt"),
        Line::from("  y               Copy the refined prompt, or the fix in Debug Vibe"),
        Line::from(""),
        section("Editing"),
        Line::from("  i / a           Edit the active field (Insert mode)"),
        Line::from("  Tab             Switch between prompt and Lovable output (Debug Vibe)"),
        Line::from("  Esc             Back to Normal mode"),
        Line::from("  Backspace       Delete one character"),
        Line::from("  Ctrl-w          Delete one word"),
        Line::from("  Ctrl-s          Run the check without leaving the keyboard"),
        Line::from(""),
        section("Navigation"),
        Line::from("  j / k           Scroll down / up one line"),
        Line::from("  g / G           Jump to top / bottom"),
        Line::from("  Ctrl-d / u      Scroll half page down / up"),
        Line::from("  Ctrl-f / b      Scroll full page down / up"),
        Line::from("  H / L           Move focus between input and report"),
        Line::from("  < / >           Shrink / grow the input panel"),
        Line::from(""),
        section("General"),
        Line::from("  ?               Open / close this help"),
        Line::from("  q / Ctrl-c      Quit (asks first while a check is running)"),
    ])
}
