//! Card widget
//!
//! Renders one [`Card`] as a bordered panel. Factual cards show their
//! sources on the last line; chart cards draw a bar chart, a line chart or a
//! share list depending on the active chart type.

use infographic_core::card::{
    ChartCard, KpiCard, QuoteCard, TextCard, TimelineCard, TitleCard,
};
use infographic_core::{Card, ChartType, Source};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph,
        Widget, Wrap,
    },
};

use crate::ui::theme::Theme;

/// Spinner frames shared by every busy indicator.
pub const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Height of the plot area of bar and line charts.
const CHART_HEIGHT: u16 = 10;

/// The spinner glyph for an animation frame.
pub fn spinner(frame: u8) -> char {
    SPINNER[frame as usize % SPINNER.len()]
}

/// A single card panel
pub struct CardWidget<'a> {
    card: &'a Card,
    theme: &'a Theme,
    index: usize,
    selected: bool,
    regenerating: bool,
    chart_type: Option<ChartType>,
    frame: u8,
}

impl<'a> CardWidget<'a> {
    pub fn new(card: &'a Card, theme: &'a Theme) -> Self {
        Self {
            card,
            theme,
            index: 0,
            selected: false,
            regenerating: false,
            chart_type: None,
            frame: 0,
        }
    }

    /// Position shown in the panel title.
    pub fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn regenerating(mut self, regenerating: bool) -> Self {
        self.regenerating = regenerating;
        self
    }

    /// Display type for chart cards, overriding the card's own.
    pub fn chart_type(mut self, chart_type: Option<ChartType>) -> Self {
        self.chart_type = chart_type;
        self
    }

    pub fn frame(mut self, frame: u8) -> Self {
        self.frame = frame;
        self
    }

    /// Rows this card needs when rendered `width` columns wide.
    pub fn height(&self, width: u16) -> u16 {
        let inner = width.saturating_sub(2).max(1);
        let body = match self.card {
            Card::Chart(chart) => self.chart_height(chart),
            Card::Kpi(kpi) => kpi_height(kpi),
            _ => wrapped_height(&self.body_lines(), inner),
        };
        body + self.sources_height(inner) + 2
    }

    fn effective_chart_type(&self, chart: &ChartCard) -> ChartType {
        self.chart_type.unwrap_or(chart.chart_type)
    }

    fn chart_height(&self, chart: &ChartCard) -> u16 {
        let title = u16::from(!chart.title.is_empty());
        if chart.data.labels.is_empty() || chart.data.datasets.is_empty() {
            return title + 1;
        }
        match self.effective_chart_type(chart) {
            ChartType::Bar | ChartType::Line => title + CHART_HEIGHT,
            ChartType::Pie | ChartType::Doughnut => {
                title + chart.data.labels.len().min(u16::MAX as usize - 2) as u16 + 1
            }
        }
    }

    fn sources_height(&self, inner: u16) -> u16 {
        match sources_line(self.card.sources(), self.theme) {
            Some(line) => wrapped_height(&[line], inner),
            None => 0,
        }
    }

    fn block(&self) -> Block<'a> {
        let kind = self.card.kind();
        let mut title = vec![Span::styled(
            format!(" {} ", self.index + 1),
            self.theme.muted_style(),
        )];
        let label = match self.card {
            Card::Chart(chart) => {
                format!("{} · {} ", kind, self.effective_chart_type(chart).name().to_lowercase())
            }
            _ => format!("{kind} "),
        };
        let label_style = if kind.is_creative() {
            self.theme.creative_style()
        } else {
            self.theme.muted_style()
        };
        title.push(Span::styled(label, label_style));

        let border_style = if self.regenerating {
            self.theme.busy_style()
        } else {
            self.theme.border_style(self.selected)
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Line::from(title));
        if self.regenerating {
            block = block.title_top(
                Line::from(Span::styled(
                    format!(" {} regenerating ", spinner(self.frame)),
                    self.theme.busy_style(),
                ))
                .right_aligned(),
            );
        }
        block
    }

    /// Text content for every card type except charts and KPIs.
    fn body_lines(&self) -> Vec<Line<'a>> {
        let theme = self.theme;
        match self.card {
            Card::Title(TitleCard { title, .. }) => {
                vec![Line::from(Span::styled(title.clone(), theme.heading_style()))
                    .alignment(Alignment::Center)]
            }
            Card::Text(TextCard { content, .. }) => content
                .split('\n')
                .map(|para| Line::from(Span::styled(para.to_string(), theme.text_style())))
                .collect(),
            Card::Quote(QuoteCard {
                content, author, ..
            }) => {
                let mut lines = vec![Line::from(Span::styled(
                    format!("\u{201c}{content}\u{201d}"),
                    theme.quote_style(),
                ))];
                if !author.is_empty() {
                    lines.push(
                        Line::from(Span::styled(format!("- {author}"), theme.muted_style()))
                            .alignment(Alignment::Right),
                    );
                }
                lines
            }
            Card::Timeline(TimelineCard { title, events, .. }) => {
                let mut lines = Vec::new();
                if !title.is_empty() {
                    lines.push(Line::from(Span::styled(title.clone(), theme.heading_style())));
                }
                for event in events {
                    lines.push(Line::from(vec![
                        Span::styled(format!("● {}  ", event.date), theme.accent_style()),
                        Span::styled(
                            event.title.clone(),
                            theme.text_style().add_modifier(Modifier::BOLD),
                        ),
                    ]));
                    if !event.description.is_empty() {
                        lines.push(Line::from(Span::styled(
                            format!("  {}", event.description),
                            theme.text_style(),
                        )));
                    }
                }
                lines
            }
            Card::Simile(c) => creative_lines(theme, format!("{} is...", c.word), &c.similes),
            Card::Explode(c) => {
                creative_lines(theme, format!("Sounds hiding in \"{}\"", c.word), &c.fragments)
            }
            Card::Unexpect(c) => {
                creative_lines(theme, format!("{}, but unexpected", c.scene), &c.twists)
            }
            Card::Chain(c) => creative_lines(theme, format!("Starting from {}", c.word), &c.chains),
            Card::Pov(c) => {
                creative_lines(theme, format!("{} through other eyes", c.topic), &c.perspectives)
            }
            Card::Alliteration(c) => creative_lines(
                theme,
                format!("{} in the letter {}", c.topic, c.letter),
                &c.words,
            ),
            Card::Acronym(c) => creative_lines(theme, c.word.to_uppercase(), &c.expansions),
            Card::Fuse(c) => {
                creative_lines(theme, format!("{} + {}", c.first, c.second), &c.fusions)
            }
            Card::Scene(c) => creative_lines(theme, format!("Sensing {}", c.place), &c.details),
            Card::Unfold(c) => {
                creative_lines(theme, format!("Meanings of {}", c.word), &c.meanings)
            }
            Card::Chart(_) | Card::Kpi(_) => Vec::new(),
        }
    }

    fn render_kpi(&self, kpi: &KpiCard, area: Rect, buf: &mut Buffer) {
        if kpi.items.is_empty() {
            Paragraph::new(Span::styled("No figures", self.theme.muted_style())).render(area, buf);
            return;
        }
        let constraints = vec![Constraint::Fill(1); kpi.items.len()];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);
        for (item, column) in kpi.items.iter().zip(columns.iter()) {
            let lines = vec![
                Line::from(Span::styled(item.value.clone(), self.theme.accent_style())),
                Line::from(Span::styled(item.label.clone(), self.theme.muted_style())),
            ];
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(*column, buf);
        }
    }

    fn render_chart(&self, chart: &ChartCard, area: Rect, buf: &mut Buffer) {
        let mut area = area;
        if !chart.title.is_empty() {
            let title_area = Rect { height: 1, ..area };
            Paragraph::new(Span::styled(chart.title.clone(), self.theme.heading_style()))
                .render(title_area, buf);
            area.y += 1;
            area.height = area.height.saturating_sub(1);
        }
        if chart.data.labels.is_empty() || chart.data.datasets.is_empty() {
            Paragraph::new(Span::styled("No chart data", self.theme.muted_style()))
                .render(area, buf);
            return;
        }
        match self.effective_chart_type(chart) {
            ChartType::Bar => self.render_bars(chart, area, buf),
            ChartType::Line => self.render_lines(chart, area, buf),
            chart_type @ (ChartType::Pie | ChartType::Doughnut) => {
                self.render_shares(chart, chart_type, area, buf)
            }
        }
    }

    fn render_bars(&self, chart: &ChartCard, area: Rect, buf: &mut Buffer) {
        let labels = &chart.data.labels;
        let datasets = &chart.data.datasets;
        let slots = (labels.len() * datasets.len() + labels.len()).max(1);
        let bar_width = (area.width as usize / slots).clamp(1, 9) as u16;

        let groups: Vec<Vec<Bar>> = labels
            .iter()
            .enumerate()
            .map(|(i, _)| {
                datasets
                    .iter()
                    .enumerate()
                    .map(|(d, dataset)| {
                        let value = dataset.data.get(i).copied().unwrap_or(0.0);
                        Bar::default()
                            .value(bar_value(value))
                            .text_value(format_value(value))
                            .style(Style::default().fg(self.theme.chart_color(d)))
                    })
                    .collect()
            })
            .collect();

        let mut bar_chart = BarChart::default()
            .bar_width(bar_width)
            .bar_gap(0)
            .group_gap(1)
            .value_style(self.theme.text_style().add_modifier(Modifier::BOLD))
            .label_style(self.theme.muted_style());
        for (label, bars) in labels.iter().zip(groups.iter()) {
            bar_chart = bar_chart.data(
                BarGroup::default()
                    .label(Line::from(label.clone()))
                    .bars(bars),
            );
        }
        bar_chart.render(area, buf);
    }

    fn render_lines(&self, chart: &ChartCard, area: Rect, buf: &mut Buffer) {
        let labels = &chart.data.labels;
        let points: Vec<Vec<(f64, f64)>> = chart
            .data
            .datasets
            .iter()
            .map(|dataset| {
                dataset
                    .data
                    .iter()
                    .take(labels.len())
                    .enumerate()
                    .map(|(i, v)| (i as f64, *v))
                    .collect()
            })
            .collect();

        let values = points.iter().flatten().map(|(_, y)| *y);
        let (min, max) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), y| (lo.min(y), hi.max(y)));
        let max = if max <= min { min + 1.0 } else { max };

        let datasets: Vec<Dataset> = chart
            .data
            .datasets
            .iter()
            .zip(points.iter())
            .enumerate()
            .map(|(d, (dataset, data))| {
                Dataset::default()
                    .name(dataset.label.clone())
                    .marker(Marker::Braille)
                    .graph_type(GraphType::Line)
                    .style(Style::default().fg(self.theme.chart_color(d)))
                    .data(data)
            })
            .collect();

        let first = labels.first().cloned().unwrap_or_default();
        let last = labels.last().cloned().unwrap_or_default();
        let x_labels = if labels.len() > 1 {
            vec![first, last]
        } else {
            vec![first]
        };

        Chart::new(datasets)
            .x_axis(
                Axis::default()
                    .style(self.theme.muted_style())
                    .bounds([0.0, (labels.len().max(2) - 1) as f64])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .style(self.theme.muted_style())
                    .bounds([min, max])
                    .labels(vec![format_value(min), format_value(max)]),
            )
            .render(area, buf);
    }

    fn render_shares(
        &self,
        chart: &ChartCard,
        chart_type: ChartType,
        area: Rect,
        buf: &mut Buffer,
    ) {
        // Pie and doughnut charts show the first dataset only.
        let data = chart
            .data
            .datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[]);
        let total: f64 = data.iter().filter(|v| **v > 0.0).sum();
        let label_width = chart
            .data
            .labels
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
            .min(24);
        let bar_room = (area.width as usize).saturating_sub(label_width + 12);

        let mut lines: Vec<Line> = chart
            .data
            .labels
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let value = data.get(i).copied().unwrap_or(0.0).max(0.0);
                let share = if total > 0.0 { value / total } else { 0.0 };
                let filled = (share * bar_room as f64).round() as usize;
                let color = Style::default().fg(self.theme.chart_color(i));
                let bar = if chart_type == ChartType::Doughnut {
                    "◯".repeat(filled)
                } else {
                    "█".repeat(filled)
                };
                Line::from(vec![
                    Span::styled("■ ", color),
                    Span::styled(
                        format!("{:<label_width$} ", truncate(label, label_width)),
                        self.theme.text_style(),
                    ),
                    Span::styled(format!("{:>5.1}% ", share * 100.0), self.theme.accent_style()),
                    Span::styled(bar, color),
                ])
            })
            .collect();
        lines.push(Line::from(Span::styled(
            format!("Total {}", format_value(total)),
            self.theme.muted_style(),
        )));
        Paragraph::new(lines).render(area, buf);
    }
}

impl Widget for CardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = self.block();
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let sources = sources_line(self.card.sources(), self.theme);
        let sources_height = self.sources_height(inner.width).min(inner.height);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(sources_height)])
            .split(inner);

        match self.card {
            Card::Chart(chart) => self.render_chart(chart, chunks[0], buf),
            Card::Kpi(kpi) => self.render_kpi(kpi, chunks[0], buf),
            _ => Paragraph::new(self.body_lines())
                .wrap(Wrap { trim: false })
                .render(chunks[0], buf),
        }

        if let Some(line) = sources {
            Paragraph::new(line)
                .wrap(Wrap { trim: true })
                .render(chunks[1], buf);
        }
    }
}

fn creative_lines<'a>(theme: &Theme, heading: String, items: &[String]) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(Span::styled(heading, theme.heading_style()))];
    lines.extend(items.iter().map(|item| {
        Line::from(vec![
            Span::styled("• ", theme.creative_style()),
            Span::styled(item.clone(), theme.text_style()),
        ])
    }));
    lines
}

fn sources_line<'a>(sources: &[Source], theme: &Theme) -> Option<Line<'a>> {
    if sources.is_empty() {
        return None;
    }
    let hosts: Vec<&str> = sources.iter().map(Source::host).collect();
    Some(Line::from(vec![
        Span::styled("Sources: ", theme.muted_style().add_modifier(Modifier::BOLD)),
        Span::styled(hosts.join(", "), theme.muted_style()),
    ]))
}

fn kpi_height(kpi: &KpiCard) -> u16 {
    if kpi.items.is_empty() {
        1
    } else {
        3
    }
}

/// Rows needed to show `lines` wrapped at `width` columns.
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = width.max(1) as usize;
    let rows: usize = lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum();
    // Word wrapping can spill one more row than a character count suggests.
    let slack = usize::from(lines.iter().any(|line| line.width() > width));
    (rows + slack).min(u16::MAX as usize) as u16
}

fn bar_value(value: f64) -> u64 {
    // Bars are scaled relative to each other, so keep one decimal of precision.
    (value.max(0.0) * 10.0).round() as u64
}

/// Integers print without a fraction, everything else with one decimal.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.1}")
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
