//! Main rendering logic

use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Screen};
use crate::ui::layout::{centered_rect_fixed, feed_areas, input_areas};
use crate::ui::widgets::card::spinner;
use crate::ui::widgets::{CreativeForm, CreativeWidget, FeedWidget, InputWidget};

/// Overlay types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Help,
    Creative(CreativeForm),
}

/// Main render function
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();
    frame.render_widget(Block::default().style(app.theme.base_style()), area);

    match app.screen {
        Screen::Input => render_input_screen(frame, app, area),
        Screen::Feed => render_feed_screen(frame, app, area),
    }

    match app.overlay() {
        Some(Overlay::Help) => render_help_overlay(frame, app, area),
        Some(Overlay::Creative(form)) => render_creative_overlay(frame, app, form, area),
        None => {}
    }
}

fn render_input_screen(frame: &mut Frame, app: &App, area: Rect) {
    let areas = input_areas(area);

    let banner = vec![
        Line::from(Span::styled(
            "Generative Infographic",
            app.theme.heading_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Enter any topic to generate an infographic with sourced facts.",
            app.theme.muted_style(),
        )),
    ];
    frame.render_widget(
        Paragraph::new(banner).alignment(Alignment::Center),
        areas.banner,
    );

    frame.render_widget(
        InputWidget::new(app.input(), &app.theme)
            .title("Topic")
            .placeholder("e.g. The history of tea")
            .active(!app.has_overlay()),
        areas.input,
    );

    let hint = Line::from(vec![
        Span::styled("Enter ", app.theme.accent_style()),
        Span::raw("generate  "),
        Span::styled("Ctrl+L ", app.theme.accent_style()),
        Span::raw("load saved  "),
        Span::styled("Ctrl+W ", app.theme.accent_style()),
        Span::raw("creative tools  "),
        Span::styled("Ctrl+T ", app.theme.accent_style()),
        Span::raw("theme  "),
        Span::styled("Esc ", app.theme.accent_style()),
        Span::raw("quit"),
    ]);
    frame.render_widget(
        Paragraph::new(hint)
            .alignment(Alignment::Center)
            .style(app.theme.muted_style()),
        areas.hint,
    );

    render_status_bar(frame, app, areas.status);
}

fn render_feed_screen(frame: &mut Frame, app: &App, area: Rect) {
    let areas = feed_areas(area);

    render_title_bar(frame, app, areas.title);

    let mut body = areas.body;
    if let Some(message) = app.feed.error() {
        let height = 4.min(body.height);
        let error_area = Rect {
            y: body.bottom() - height,
            height,
            ..body
        };
        body.height -= height;
        render_error_panel(frame, app, message, error_area);
    }

    let groups = app.feed.groups();
    let chart_types = app.chart_types();
    let feed = FeedWidget::new(&groups, &app.theme)
        .visible(app.feed.visible_count())
        .selected(Some(app.selected()))
        .regenerating(app.feed.regenerating_index())
        .chart_types(&chart_types)
        .generating(app.feed.is_generating() && app.feed.regenerating_index().is_none())
        .frame(app.animation_frame);
    frame.render_widget(feed, body);

    render_status_bar(frame, app, areas.status);
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let topic = app.feed.topic().unwrap_or("Untitled");
    let mut spans = vec![
        Span::styled(format!(" {topic} "), app.theme.heading_style()),
        Span::styled(
            format!(
                "  {} cards, {} shown",
                app.feed.len(),
                app.feed.visible_count().min(app.feed.len())
            ),
            app.theme.muted_style(),
        ),
    ];
    if app.feed.is_busy() {
        spans.push(Span::styled(
            format!("  {} generating", spinner(app.animation_frame)),
            app.theme.busy_style(),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(false))
        .title(Span::styled(" Infographic ", app.theme.muted_style()))
        .title_top(
            Line::from(Span::styled(
                format!(" {} ", app.theme.mode.name()),
                app.theme.muted_style(),
            ))
            .right_aligned(),
        );
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_error_panel(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.theme.error_style())
        .title(Span::styled(" Error ", app.theme.error_style()))
        .title_bottom(
            Line::from(Span::styled(
                " x dismiss · m / r retry ",
                app.theme.muted_style(),
            ))
            .right_aligned(),
        );
    frame.render_widget(
        Paragraph::new(Span::styled(message.to_string(), app.theme.text_style()))
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let line = match app.status_message() {
        Some(message) => Line::from(Span::styled(
            format!(" {message}"),
            app.theme.accent_style(),
        )),
        None if app.screen == Screen::Feed => Line::from(Span::styled(
            " j/k move  d delete  r regenerate  c chart  m more  s save  L load  w tools  ? help",
            app.theme.muted_style(),
        )),
        None => Line::from(Span::styled(" F1 help", app.theme.muted_style())),
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_creative_overlay(frame: &mut Frame, app: &App, form: &CreativeForm, area: Rect) {
    let popup_area = centered_rect_fixed(70, 16, area);
    frame.render_widget(CreativeWidget::new(form, &app.theme), popup_area);
}

fn render_help_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered_rect_fixed(56, 32, area);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let header = |text: &'static str| {
        Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::UNDERLINED),
        ))
    };

    let help_text = vec![
        Line::from(Span::styled(
            " Generative Infographic - Help ",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        header("Topic screen:"),
        Line::from("  Enter          Generate the infographic"),
        Line::from("  Ctrl+L         Load the saved infographic"),
        Line::from("  Ctrl+W / T     Creative tools / theme"),
        Line::from("  F1             This help"),
        Line::from("  Esc            Quit"),
        Line::from(""),
        header("Navigation:"),
        Line::from("  j/k or ↑/↓     Select next/previous card"),
        Line::from("  g/G            Jump to first/last card"),
        Line::from("  Mouse wheel    Move the selection"),
        Line::from("  Space          Show every card now"),
        Line::from(""),
        header("Cards:"),
        Line::from("  m              Load more (or move past the end)"),
        Line::from("  r              Regenerate the selected card"),
        Line::from("  d              Delete the selected card"),
        Line::from("  c              Cycle chart type (bar/line/pie)"),
        Line::from("  w              Creative tools"),
        Line::from(""),
        header("Session:"),
        Line::from("  s / L / X      Save / load / clear saved"),
        Line::from("  t              Toggle light/dark theme"),
        Line::from("  x              Dismiss the error"),
        Line::from("  n              New topic"),
        Line::from("  q              Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc or ? to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(app.theme.border_style(true))
        .style(app.theme.base_style());

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, popup_area);
}
