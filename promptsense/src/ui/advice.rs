//! Fix-advice body for Debug mode.

use promptsense_core::IterationAdvice;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use crate::theme::Theme;
use crate::ui::report::heading;

const ITERATION_PROTOCOL: &str = "Lovable handles complex state logic best when you \
    explicitly describe the user flow transitions. If it gets stuck in a loop, try adding: \
    \"Ensure that after [Action], the user is redirected to [Page] and [Data] is refreshed.\"";

/// Builds the scrollable body for a piece of fix advice.
pub fn advice_lines(advice: &IterationAdvice, theme: &Theme) -> Vec<Line<'static>> {
    let text = Style::default().fg(theme.text);
    let mut lines = vec![
        heading("The Misinterpretation", theme),
        Line::styled(advice.misunderstanding.clone(), text.add_modifier(Modifier::BOLD)),
        Line::default(),
        heading("Structural Vulnerability", theme),
        Line::styled(advice.root_cause.clone(), text),
        Line::default(),
        Line::from(vec![
            Span::styled(
                "Master Logic Injection",
                Style::default()
                    .fg(theme.heading)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  y to copy", Style::default().fg(theme.dim)),
        ]),
    ];

    let fix_style = Style::default().fg(theme.new_line).bg(theme.new_line_bg);
    lines.extend(advice.fix.split('\n').map(|l| {
        Line::from(vec![
            Span::styled("│ ", Style::default().fg(theme.border_active)),
            Span::styled(l.to_owned(), fix_style),
        ])
    }));

    lines.push(Line::default());
    lines.push(heading("Iteration Protocol", theme));
    lines.push(Line::styled(
        ITERATION_PROTOCOL,
        Style::default()
            .fg(theme.dim)
            .add_modifier(Modifier::ITALIC),
    ));
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_part_of_the_advice_is_shown() {
        let advice = IterationAdvice {
            misunderstanding: "Lovable built a list instead of a grid.".into(),
            root_cause: "No layout constraint.".into(),
            fix: "Use a 7-column CSS grid.\nOne column per weekday.".into(),
        };
        let body: Vec<String> = advice_lines(&advice, &Theme::dark())
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert_eq!(body[1], "Lovable built a list instead of a grid.");
        assert_eq!(body[4], "No layout constraint.");
        assert!(body.contains(&"│ Use a 7-column CSS grid.".to_owned()));
        assert!(body.contains(&"│ One column per weekday.".to_owned()));
        assert!(body.contains(&"Iteration Protocol".to_owned()));
    }
}
