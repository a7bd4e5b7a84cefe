//! Screen layout helpers

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Regions of the feed screen.
pub struct FeedAreas {
    pub title: Rect,
    pub body: Rect,
    pub status: Rect,
}

/// Regions of the topic input screen.
pub struct InputAreas {
    pub banner: Rect,
    pub input: Rect,
    pub hint: Rect,
    pub status: Rect,
}

pub fn feed_areas(area: Rect) -> FeedAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);
    FeedAreas {
        title: chunks[0],
        body: chunks[1],
        status: chunks[2],
    }
}

pub fn input_areas(area: Rect) -> InputAreas {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);
    let input = centered_columns(72, chunks[2]);
    InputAreas {
        banner: chunks[1],
        input,
        hint: chunks[3],
        status: chunks[5],
    }
}

/// Split `area` into two equal columns with a one-cell gutter.
pub fn split_columns(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(area);
    (chunks[0], chunks[2])
}

/// A horizontally centered slice of `area` at most `width` columns wide.
pub fn centered_columns(width: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    }
}

/// A centered rectangle of fixed size, clipped to `area`.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
