//! Feed widget: the grouped, progressively revealed card list

use infographic_core::{ChartType, DisplayGroup, Layout as GroupLayout};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{
        Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};

use crate::ui::layout::split_columns;
use crate::ui::theme::Theme;
use crate::ui::widgets::card::{spinner, CardWidget};

/// Renders display groups top to bottom, keeping the selected card in view.
pub struct FeedWidget<'a> {
    groups: &'a [DisplayGroup<'a>],
    theme: &'a Theme,
    visible: usize,
    selected: Option<usize>,
    regenerating: Option<usize>,
    chart_types: &'a [Option<ChartType>],
    generating: bool,
    frame: u8,
}

impl<'a> FeedWidget<'a> {
    pub fn new(groups: &'a [DisplayGroup<'a>], theme: &'a Theme) -> Self {
        Self {
            groups,
            theme,
            visible: usize::MAX,
            selected: None,
            regenerating: None,
            chart_types: &[],
            generating: false,
            frame: 0,
        }
    }

    /// How many cards (in flattened order) are revealed.
    pub fn visible(mut self, count: usize) -> Self {
        self.visible = count;
        self
    }

    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    pub fn regenerating(mut self, index: Option<usize>) -> Self {
        self.regenerating = index;
        self
    }

    /// Per-card chart type overrides, indexed by card position.
    pub fn chart_types(mut self, chart_types: &'a [Option<ChartType>]) -> Self {
        self.chart_types = chart_types;
        self
    }

    /// Whether an append round is in flight.
    pub fn generating(mut self, generating: bool) -> Self {
        self.generating = generating;
        self
    }

    pub fn frame(mut self, frame: u8) -> Self {
        self.frame = frame;
        self
    }

    fn card_widget(&self, index: usize, group: &DisplayGroup<'a>) -> Option<CardWidget<'a>> {
        if index >= self.visible {
            return None;
        }
        let card = group.cards.get(index - group.start)?;
        Some(
            CardWidget::new(card, self.theme)
                .index(index)
                .selected(self.selected == Some(index))
                .regenerating(self.regenerating == Some(index))
                .chart_type(self.chart_types.get(index).copied().flatten())
                .frame(self.frame),
        )
    }

    /// Rows needed by `group` at `width`, or `None` if nothing in it is revealed yet.
    fn group_height(&self, group: &DisplayGroup<'a>, width: u16) -> Option<u16> {
        match group.layout {
            GroupLayout::Full => self
                .card_widget(group.start, group)
                .map(|card| card.height(width)),
            GroupLayout::Grid => {
                let (left, right) = split_columns(Rect::new(0, 0, width, 1));
                let heights = [
                    self.card_widget(group.start, group)
                        .map(|card| card.height(left.width)),
                    self.card_widget(group.start + 1, group)
                        .map(|card| card.height(right.width)),
                ];
                heights.into_iter().flatten().max()
            }
        }
    }

    fn render_group(&self, group: &DisplayGroup<'a>, area: Rect, buf: &mut Buffer) {
        match group.layout {
            GroupLayout::Full => {
                if let Some(card) = self.card_widget(group.start, group) {
                    card.render(area, buf);
                }
            }
            GroupLayout::Grid => {
                let (left, right) = split_columns(area);
                if let Some(card) = self.card_widget(group.start, group) {
                    card.render(left, buf);
                }
                if let Some(card) = self.card_widget(group.start + 1, group) {
                    card.render(right, buf);
                }
            }
        }
    }

    fn footer(&self) -> Line<'a> {
        let line = if self.generating {
            Line::from(Span::styled(
                format!("{} Generating the next section...", spinner(self.frame)),
                self.theme.busy_style(),
            ))
        } else if self.visible < self.total() {
            Line::from(Span::styled(
                format!("{} Revealing...", spinner(self.frame)),
                self.theme.muted_style(),
            ))
        } else {
            Line::from(Span::styled(
                "▼ m or scroll past the end to load more",
                self.theme.muted_style(),
            ))
        };
        line.alignment(Alignment::Center)
    }

    fn total(&self) -> usize {
        self.groups.iter().map(|g| g.cards.len()).sum()
    }
}

impl Widget for FeedWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 4 || area.height == 0 {
            return;
        }
        let content = Rect {
            width: area.width - 1,
            ..area
        };

        let heights: Vec<Option<u16>> = self
            .groups
            .iter()
            .map(|group| self.group_height(group, content.width))
            .collect();

        let selected_group = self
            .selected
            .and_then(|i| self.groups.iter().position(|g| g.indices().contains(&i)))
            .unwrap_or(0);
        let last_revealed = heights.iter().rposition(Option::is_some).unwrap_or(0);

        // Walk back from the selected group while earlier groups still fit.
        let mut start = selected_group.min(last_revealed);
        let mut used = heights.get(start).copied().flatten().unwrap_or(0);
        while start > 0 {
            let previous = heights[start - 1].unwrap_or(0);
            if used + previous > content.height {
                break;
            }
            used += previous;
            start -= 1;
        }

        let mut y = content.y;
        let bottom = content.bottom();
        for (group, height) in self.groups.iter().zip(heights.iter()).skip(start) {
            let Some(height) = *height else {
                break;
            };
            if bottom - y < 3 {
                break;
            }
            let rect = Rect::new(content.x, y, content.width, height.min(bottom - y));
            self.render_group(group, rect, buf);
            y += rect.height;
        }

        if y < bottom {
            let footer = Rect::new(content.x, y, content.width, 1);
            Paragraph::new(self.footer()).render(footer, buf);
        }

        let total = self.total();
        if total > 0 {
            let mut state = ScrollbarState::new(total)
                .position(self.selected.unwrap_or(0).min(total - 1));
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .render(area, buf, &mut state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use infographic_core::{group_cards, Card, Width};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(widget: FeedWidget<'_>, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| f.render_widget(widget, f.area()))
            .unwrap();
        let buffer = terminal.backend().buffer().clone();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cards() -> Vec<Card> {
        vec![
            Card::title("Tea"),
            Card::text("Left half").with_width(Width::Half),
            Card::text("Right half").with_width(Width::Half),
            Card::text("Closing words"),
        ]
    }

    #[test]
    fn test_only_revealed_cards_render() {
        let theme = Theme::default();
        let cards = cards();
        let groups = group_cards(&cards);
        let screen = draw(FeedWidget::new(&groups, &theme).visible(2), 80, 30);

        assert!(screen.contains("Tea"));
        assert!(screen.contains("Left half"));
        assert!(!screen.contains("Right half"));
        assert!(!screen.contains("Closing words"));
        assert!(screen.contains("Revealing"));
    }

    #[test]
    fn test_grid_cards_share_a_row() {
        let theme = Theme::default();
        let cards = cards();
        let groups = group_cards(&cards);
        let screen = draw(FeedWidget::new(&groups, &theme).visible(4), 80, 30);

        let row = screen
            .lines()
            .find(|line| line.contains("Left half"))
            .unwrap();
        assert!(row.contains("Right half"));
        assert!(screen.contains("load more"));
    }

    #[test]
    fn test_selected_card_kept_in_view() {
        let theme = Theme::default();
        let cards: Vec<Card> = (0..12).map(|i| Card::text(format!("Card number {i}"))).collect();
        let groups = group_cards(&cards);
        let screen = draw(
            FeedWidget::new(&groups, &theme).selected(Some(11)),
            60,
            12,
        );
        assert!(screen.contains("Card number 11"));
        assert!(!screen.contains("Card number 0 "));
    }

    #[test]
    fn test_generating_footer() {
        let theme = Theme::default();
        let cards = vec![Card::title("Tea")];
        let groups = group_cards(&cards);
        let screen = draw(FeedWidget::new(&groups, &theme).generating(true), 60, 10);
        assert!(screen.contains("Generating the next section"));
    }
}
