//! Markdown syntax highlighting for prompt text.
//!
//! Prompts are usually written as Markdown (`# GOAL`, `- bullet`), so the input
//! panel and the carried-over lines of the refined prompt are coloured with
//! syntect's bundled Markdown grammar.

use std::sync::LazyLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme as SyntectTheme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

/// Stateful line-by-line highlighter. Feed lines in document order so that
/// multi-line constructs (code fences) are tracked.
pub struct MarkdownHighlighter {
    inner: Option<HighlightLines<'static>>,
}

impl Default for MarkdownHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownHighlighter {
    /// Falls back to plain spans when the grammar or theme is unavailable.
    pub fn new() -> Self {
        let inner = match (markdown_syntax(), syntect_theme()) {
            (Some(syntax), Some(theme)) => Some(HighlightLines::new(syntax, theme)),
            _ => None,
        };
        Self { inner }
    }

    /// Highlights one line (without its trailing newline) into owned spans.
    pub fn spans(&mut self, line: &str) -> Vec<Span<'static>> {
        let Some(h) = self.inner.as_mut() else {
            return vec![Span::raw(line.to_owned())];
        };
        // The newline-aware grammar expects each line to end in '\n'.
        let with_newline = format!("{line}\n");
        let ranges = h.highlight_line(&with_newline, &PS).unwrap_or_default();
        let spans: Vec<Span<'static>> = ranges
            .into_iter()
            .filter_map(|(style, text)| {
                let text = text.trim_end_matches('\n');
                (!text.is_empty()).then(|| syntect_to_span(style, text))
            })
            .collect();
        if spans.is_empty() {
            vec![Span::raw(line.to_owned())]
        } else {
            spans
        }
    }
}

/// Highlights a whole document into one `Line` per `'\n'`-separated line.
pub fn highlight(text: &str) -> Vec<Line<'static>> {
    let mut highlighter = MarkdownHighlighter::new();
    text.split('\n').map(|line| Line::from(highlighter.spans(line))).collect()
}

/// Highlighted lines of the last text seen, recomputed only when the text changes.
#[derive(Debug, Default)]
pub struct HighlightCache {
    source: String,
    lines: Vec<Line<'static>>,
}

impl HighlightCache {
    pub fn lines(&mut self, text: &str) -> &[Line<'static>] {
        if self.lines.is_empty() || self.source != text {
            self.source = text.to_owned();
            self.lines = highlight(text);
        }
        &self.lines
    }
}

fn markdown_syntax() -> Option<&'static SyntaxReference> {
    PS.find_syntax_by_extension("md")
}

fn syntect_theme() -> Option<&'static SyntectTheme> {
    TS.themes.get("base16-ocean.dark").or_else(|| TS.themes.values().next())
}

/// Converts a syntect style to ratatui. Background colours are dropped so the
/// terminal and theme backgrounds show through.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.to_owned(), ratatui_style)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn text_survives_highlighting() {
        let doc = "# GOAL\nBuild a **habit** tracker.\n\n- Daily check-ins";
        let lines = highlight(doc);
        let rendered: Vec<String> = lines.iter().map(plain).collect();
        assert_eq!(rendered, doc.split('\n').collect::<Vec<_>>());
    }

    #[test]
    fn headings_are_coloured() {
        let lines = highlight("# GOAL");
        assert!(lines[0].spans.iter().any(|s| s.style.fg.is_some()));
    }

    #[test]
    fn cache_follows_text_changes() {
        let mut cache = HighlightCache::default();
        assert_eq!(cache.lines("# GOAL").len(), 1);
        assert_eq!(cache.lines("# GOAL\nBuild it").len(), 2);
        assert_eq!(plain(&cache.lines("# GOAL\nBuild it")[1]), "Build it");
    }

    #[test]
    fn empty_line_yields_one_empty_span() {
        let mut h = MarkdownHighlighter::new();
        let spans = h.spans("");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "");
    }
}
