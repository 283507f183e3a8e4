//! Color themes for promptsense.
//!
//! Two built-ins: `dark` (ANSI 16 colors, safe on any terminal) and
//! `catppuccin-mocha` (RGB, needs truecolor). Renderers read fields directly,
//! e.g. `Style::default().fg(theme.new_line)`.

use promptsense_core::types::ScoreBand;
use ratatui::style::Color;
use tracing::warn;

/// Every color promptsense draws with.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    pub border_active: Color,
    pub border_inactive: Color,

    // Text
    pub text: Color,
    /// Placeholders, hints and carried-over lines without syntax colors.
    pub dim: Color,
    /// Section headings in the report.
    pub heading: Color,

    // Comparison view
    /// Lines of the refined prompt that are not in the original.
    pub new_line: Color,
    pub new_line_bg: Color,

    // Score gauge
    pub score_excellent: Color,
    pub score_average: Color,
    pub score_poor: Color,

    // Checklist and lists
    pub check_pass: Color,
    pub check_fail: Color,
    pub priority: Color,

    /// Error banner text.
    pub error: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub status_mode_normal: Color,
    pub status_mode_insert: Color,
}

impl Theme {
    /// ANSI 16-color theme; the fallback for unknown names.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            text: Color::Reset,
            dim: Color::DarkGray,
            heading: Color::Magenta,

            new_line: Color::Green,
            new_line_bg: Color::Reset,

            score_excellent: Color::Green,
            score_average: Color::Yellow,
            score_poor: Color::Red,

            check_pass: Color::Green,
            check_fail: Color::Yellow,
            priority: Color::Yellow,

            error: Color::Red,

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_mode_insert: Color::Green,
        }
    }

    /// Catppuccin Mocha in truecolor.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let peach = Color::Rgb(250, 179, 135); // #fab387
        let mauve = Color::Rgb(203, 166, 247); // #cba6f7
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface0 = Color::Rgb(49, 50, 68); // #313244
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let text = Color::Rgb(205, 214, 244); // #cdd6f4

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            text,
            dim: overlay1,
            heading: mauve,

            new_line: green,
            new_line_bg: surface0,

            score_excellent: green,
            score_average: yellow,
            score_poor: red,

            check_pass: green,
            check_fail: peach,
            priority: peach,

            error: red,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_mode_insert: green,
        }
    }

    /// Resolves a theme name from config or the command line.
    ///
    /// Unknown names log a warning and fall back to `dark()`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }

    /// Gauge and label color for a score band.
    pub fn score_color(&self, band: ScoreBand) -> Color {
        match band {
            ScoreBand::Excellent => self.score_excellent,
            ScoreBand::Average => self.score_average,
            ScoreBand::Poor => self.score_poor,
        }
    }
}
