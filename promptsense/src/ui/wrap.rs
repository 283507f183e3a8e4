//! Styled line wrapping.
//!
//! Panels pre-wrap their content so the number of visual rows is known before
//! rendering. That keeps scroll offsets clampable and the insert cursor exact,
//! which `Paragraph::wrap` cannot report. Rows are measured in display columns,
//! so wide (CJK, emoji) characters take two.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

/// One character with its resolved style and display width.
#[derive(Clone, Copy)]
struct Cell {
    ch: char,
    style: Style,
    width: usize,
}

/// Breaks each line into rows of at most `width` display columns.
///
/// Breaks after the last whitespace that fits; a run without whitespace longer
/// than `width` is split mid-word. A whitespace char landing exactly on a
/// break is dropped. Empty lines stay as one empty row. Line-level styles are
/// folded into the spans; alignment is kept on every row. A single character
/// wider than `width` still gets a row of its own.
pub fn wrap_lines(lines: &[Line<'_>], width: u16) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::with_capacity(lines.len());

    for line in lines {
        let cells: Vec<Cell> = line
            .spans
            .iter()
            .flat_map(|span| {
                let style = line.style.patch(span.style);
                span.content.chars().map(move |ch| Cell {
                    ch,
                    style,
                    width: ch.width().unwrap_or(0),
                })
            })
            .collect();

        if cells.is_empty() {
            rows.push(Line {
                style: line.style,
                alignment: line.alignment,
                ..Line::default()
            });
            continue;
        }
        let row = |cells: &[Cell]| Line {
            alignment: line.alignment,
            ..to_line(cells)
        };

        let mut start = 0;
        while start < cells.len() {
            let hard_end = fit_end(&cells, start, width);
            if hard_end == cells.len() {
                rows.push(row(&cells[start..]));
                break;
            }
            let (row_end, next) = if cells[hard_end].ch.is_whitespace() {
                (hard_end, hard_end + 1)
            } else if let Some(i) = (start + 1..=hard_end)
                .rev()
                .find(|&i| cells[i - 1].ch.is_whitespace())
            {
                (i, i)
            } else {
                (hard_end, hard_end)
            };
            rows.push(row(&cells[start..row_end]));
            start = next;
        }
    }
    rows
}

/// Index one past the last cell from `start` that fits in `width` columns.
///
/// Always advances by at least one cell.
fn fit_end(cells: &[Cell], start: usize, width: usize) -> usize {
    let mut used = 0;
    let mut end = start;
    while end < cells.len() && used + cells[end].width <= width {
        used += cells[end].width;
        end += 1;
    }
    end.max(start + 1)
}

/// Regroups consecutive same-style cells into spans.
fn to_line(cells: &[Cell]) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = Vec::new();
    let mut current = String::new();
    let mut current_style = cells.first().map(|c| c.style).unwrap_or_default();

    for &Cell { ch: c, style, .. } in cells {
        if style != current_style && !current.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current), current_style));
        }
        current_style = style;
        current.push(c);
    }
    if !current.is_empty() {
        spans.push(Span::styled(current, current_style));
    }
    Line::from(spans)
}

/// Largest useful scroll offset for `rows` rows in a viewport of `height`.
pub fn max_scroll(rows: usize, height: u16) -> u16 {
    u16::try_from(rows.saturating_sub(usize::from(height))).unwrap_or(u16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn texts(rows: &[Line<'_>]) -> Vec<String> {
        rows.iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn short_lines_are_untouched() {
        let rows = wrap_lines(&[Line::from("Build a todo app."), Line::from("")], 40);
        assert_eq!(texts(&rows), ["Build a todo app.", ""]);
    }

    #[test]
    fn breaks_after_whitespace() {
        let rows = wrap_lines(&[Line::from("Build a habit tracker app")], 12);
        assert_eq!(texts(&rows), ["Build a ", "habit ", "tracker app"]);
    }

    #[test]
    fn whitespace_on_the_boundary_is_dropped() {
        let rows = wrap_lines(&[Line::from("abcd efgh")], 4);
        assert_eq!(texts(&rows), ["abcd", "efgh"]);
    }

    #[test]
    fn long_words_are_split() {
        let rows = wrap_lines(&[Line::from("abcdefghij")], 4);
        assert_eq!(texts(&rows), ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn styles_survive_the_split() {
        let green = Style::default().fg(Color::Green);
        let line = Line::from(vec![Span::raw("+ "), Span::styled("new line here", green)]);
        let rows = wrap_lines(&[line], 8);
        assert_eq!(texts(&rows), ["+ new ", "line ", "here"]);
        assert_eq!(rows[1].spans[0].style, green);
    }

    #[test]
    fn wide_characters_count_two_columns() {
        let rows = wrap_lines(&[Line::from("日本語のプロンプト")], 6);
        assert_eq!(texts(&rows), ["日本語", "のプロ", "ンプト"]);
        assert!(rows.iter().all(|row| row.width() <= 6));
    }

    #[test]
    fn wide_character_never_straddles_the_edge() {
        let rows = wrap_lines(&[Line::from("ab日本")], 3);
        assert_eq!(texts(&rows), ["ab", "日", "本"]);
    }

    #[test]
    fn wide_text_breaks_at_whitespace() {
        let rows = wrap_lines(&[Line::from("習慣 トラッカー を作る")], 10);
        assert_eq!(texts(&rows), ["習慣 ", "トラッカー", "を作る"]);
        assert!(rows.iter().all(|row| row.width() <= 10));
    }

    #[test]
    fn combining_marks_stay_with_their_base() {
        // "e" + U+0301 is one column wide.
        let rows = wrap_lines(&[Line::from("cafe\u{301} ok")], 4);
        assert_eq!(texts(&rows), ["cafe\u{301}", "ok"]);
    }

    #[test]
    fn max_scroll_never_underflows() {
        assert_eq!(max_scroll(5, 10), 0);
        assert_eq!(max_scroll(25, 10), 15);
    }
}
