//! Line-level "what's new" classification for a rewritten document.
//!
//! This is emphasis, not a structural diff: there is no alignment, no move
//! detection and no deletion tracking. A revised line counts as new when its
//! trimmed text is non-empty and does not appear (trimmed) anywhere in the
//! original. Relocated lines therefore read as carried over.

use std::collections::HashSet;

/// One line of the revised text together with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightedLine<'a> {
    /// The line exactly as it appears in the revised text, spacing intact.
    pub text: &'a str,
    /// `true` when the line's content is absent from the original.
    pub is_new: bool,
}

/// Lazy iterator over the classified lines of a revised text.
///
/// Created by [`highlight_new_lines`]. Borrows both inputs; the membership set
/// of trimmed original lines is built once up front.
#[derive(Debug, Clone)]
pub struct NewLines<'a> {
    known: HashSet<&'a str>,
    lines: Option<std::str::Split<'a, char>>,
}

impl<'a> Iterator for NewLines<'a> {
    type Item = HighlightedLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.lines.as_mut()?.next()?;
        let trimmed = text.trim();
        let is_new = !trimmed.is_empty() && !self.known.contains(trimmed);
        Some(HighlightedLine { text, is_new })
    }
}

/// Classifies every line of `revised` against the lines of `original`.
///
/// Yields one entry per revised line, in order. An empty `revised` yields
/// nothing. Blank and whitespace-only lines are never new.
pub fn highlight_new_lines<'a>(original: &'a str, revised: &'a str) -> NewLines<'a> {
    let known = original.split('\n').map(str::trim).collect();
    let lines = (!revised.is_empty()).then(|| revised.split('\n'));
    NewLines { known, lines }
}

/// Number of lines in `revised` that [`highlight_new_lines`] marks as new.
pub fn count_new_lines(original: &str, revised: &str) -> usize {
    highlight_new_lines(original, revised)
        .filter(|l| l.is_new)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROMPT: &str = "# GOAL\nBuild a habit tracker.\n\n# USER\n  Busy people  \n";

    fn flags(original: &str, revised: &str) -> Vec<bool> {
        highlight_new_lines(original, revised).map(|l| l.is_new).collect()
    }

    #[test]
    fn text_against_itself_has_no_new_lines() {
        assert_eq!(count_new_lines(PROMPT, PROMPT), 0);
        assert_eq!(count_new_lines("", ""), 0);
        assert_eq!(count_new_lines("a\r\nb", "a\r\nb"), 0);
    }

    #[test]
    fn whitespace_only_lines_are_never_new() {
        let revised = "   \n\t\n\n \t ";
        assert!(flags("", revised).iter().all(|f| !f));
        assert!(flags("unrelated", revised).iter().all(|f| !f));
    }

    #[test]
    fn appended_line_is_the_only_new_line() {
        let revised = format!("{PROMPT}\n# PLATFORM");
        let new: Vec<&str> = highlight_new_lines(PROMPT, &revised)
            .filter(|l| l.is_new)
            .map(|l| l.text)
            .collect();
        assert_eq!(new, vec!["# PLATFORM"]);
    }

    #[test]
    fn comparison_trims_but_display_keeps_spacing() {
        let lines: Vec<_> =
            highlight_new_lines("Busy people", "    Busy people\n  - New bullet").collect();
        assert_eq!(
            lines,
            vec![
                HighlightedLine {
                    text: "    Busy people",
                    is_new: false,
                },
                HighlightedLine {
                    text: "  - New bullet",
                    is_new: true,
                },
            ]
        );
    }

    #[test]
    fn relocated_lines_are_carried_over() {
        assert_eq!(flags("a\nb\nc", "c\na\nb"), vec![false, false, false]);
    }

    #[test]
    fn empty_revised_yields_nothing() {
        assert_eq!(highlight_new_lines(PROMPT, "").count(), 0);
    }

    #[test]
    fn trailing_newline_yields_blank_final_line() {
        assert_eq!(flags("", "x\n"), vec![true, false]);
    }

    #[test]
    fn same_inputs_give_same_output() {
        let revised = "# GOAL\nBuild a habit tracker with streaks.\n# CONSTRAINTS";
        let first: Vec<_> = highlight_new_lines(PROMPT, revised).collect();
        let second: Vec<_> = highlight_new_lines(PROMPT, revised).collect();
        assert_eq!(first, second);
        assert_eq!(count_new_lines(PROMPT, revised), 2);
    }
}
