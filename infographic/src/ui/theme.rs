//! Color themes and styling for the infographic TUI

use ratatui::style::{Color, Modifier, Style};

/// Which palette is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

/// UI color theme
#[derive(Debug, Clone)]
pub struct Theme {
    pub mode: ThemeMode,

    // Base colors
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub border_selected: Color,

    // Text colors
    pub heading: Color,
    pub accent: Color,
    pub muted: Color,
    pub quote: Color,
    pub creative: Color,

    // Status colors
    pub error: Color,
    pub success: Color,
    pub busy: Color,

    /// Series colors for charts, cycled by dataset index.
    pub chart: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            background: Color::Reset,
            foreground: Color::White,
            border: Color::DarkGray,
            border_selected: Color::Cyan,

            heading: Color::LightCyan,
            accent: Color::Yellow,
            muted: Color::DarkGray,
            quote: Color::LightMagenta,
            creative: Color::LightGreen,

            error: Color::LightRed,
            success: Color::Green,
            busy: Color::Yellow,

            chart: [
                Color::Cyan,
                Color::Magenta,
                Color::Yellow,
                Color::Green,
                Color::LightRed,
                Color::LightBlue,
            ],
        }
    }

    pub fn light() -> Self {
        Self {
            mode: ThemeMode::Light,
            background: Color::White,
            foreground: Color::Black,
            border: Color::Gray,
            border_selected: Color::Blue,

            heading: Color::Blue,
            accent: Color::Rgb(180, 90, 0),
            muted: Color::Gray,
            quote: Color::Magenta,
            creative: Color::Rgb(0, 120, 60),

            error: Color::Red,
            success: Color::Rgb(0, 120, 60),
            busy: Color::Rgb(180, 90, 0),

            chart: [
                Color::Blue,
                Color::Magenta,
                Color::Rgb(180, 90, 0),
                Color::Rgb(0, 120, 60),
                Color::Red,
                Color::Cyan,
            ],
        }
    }

    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
        }
    }

    /// The other palette.
    pub fn toggled(&self) -> Self {
        Self::for_mode(self.mode.toggled())
    }

    /// Base style for a whole screen
    pub fn base_style(&self) -> Style {
        Style::default().fg(self.foreground).bg(self.background)
    }

    pub fn text_style(&self) -> Style {
        Style::default().fg(self.foreground)
    }

    /// Get style for border based on selection
    pub fn border_style(&self, selected: bool) -> Style {
        if selected {
            Style::default().fg(self.border_selected)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn heading_style(&self) -> Style {
        Style::default()
            .fg(self.heading)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn quote_style(&self) -> Style {
        Style::default()
            .fg(self.quote)
            .add_modifier(Modifier::ITALIC)
    }

    pub fn creative_style(&self) -> Style {
        Style::default().fg(self.creative)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    pub fn busy_style(&self) -> Style {
        Style::default().fg(self.busy)
    }

    /// Color for chart series `index`.
    pub fn chart_color(&self, index: usize) -> Color {
        self.chart[index % self.chart.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trips() {
        let theme = Theme::default();
        assert_eq!(theme.mode, ThemeMode::Dark);
        let light = theme.toggled();
        assert_eq!(light.mode, ThemeMode::Light);
        assert_eq!(light.foreground, Color::Black);
        assert_eq!(light.toggled().mode, ThemeMode::Dark);
    }

    #[test]
    fn test_chart_colors_cycle() {
        let theme = Theme::dark();
        assert_eq!(theme.chart_color(0), theme.chart_color(6));
        assert_ne!(theme.chart_color(0), theme.chart_color(1));
    }
}
