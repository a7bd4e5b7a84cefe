//! Single-line text input: editing state and widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::Theme;

/// A text buffer with a character-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    buffer: String,
    /// Cursor position in characters, not bytes.
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.trim().is_empty()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
        }
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_count() {
            let at = self.byte_index(self.cursor);
            self.buffer.remove(at);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.char_count();
    }

    pub fn set(&mut self, content: impl Into<String>) {
        self.buffer = content.into();
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Take the contents, leaving the editor empty.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.buffer)
    }
}

/// Input field widget
pub struct InputWidget<'a> {
    editor: &'a LineEditor,
    theme: &'a Theme,
    placeholder: &'a str,
    title: Option<&'a str>,
    is_active: bool,
}

impl<'a> InputWidget<'a> {
    pub fn new(editor: &'a LineEditor, theme: &'a Theme) -> Self {
        Self {
            editor,
            theme,
            placeholder: "Enter a topic...",
            title: None,
            is_active: true,
        }
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_active = active;
        self
    }
}

impl Widget for InputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(self.is_active));
        if let Some(title) = self.title {
            block = block.title(Span::styled(format!(" {title} "), self.theme.muted_style()));
        }

        let inner = block.inner(area);
        block.render(area, buf);

        let content = self.editor.as_str();
        let prompt = Span::styled("> ", self.theme.accent_style());

        let line = if content.is_empty() {
            let mut spans = vec![prompt];
            if self.is_active {
                spans.push(Span::styled(
                    " ",
                    Style::default().add_modifier(Modifier::UNDERLINED),
                ));
            }
            spans.push(Span::styled(
                self.placeholder,
                self.theme.muted_style().add_modifier(Modifier::DIM),
            ));
            Line::from(spans)
        } else if !self.is_active {
            Line::from(vec![prompt, Span::styled(content, self.theme.text_style())])
        } else {
            // Character-based slicing for unicode safety
            let cursor = self.editor.cursor();
            let before: String = content.chars().take(cursor).collect();
            let at = content
                .chars()
                .nth(cursor)
                .map(|c| c.to_string())
                .unwrap_or_else(|| " ".to_string());
            let after: String = content.chars().skip(cursor + 1).collect();

            Line::from(vec![
                prompt,
                Span::styled(before, self.theme.text_style()),
                Span::styled(
                    at,
                    Style::default()
                        .fg(self.theme.accent)
                        .add_modifier(Modifier::UNDERLINED | Modifier::BOLD),
                ),
                Span::styled(after, self.theme.text_style()),
            ])
        };

        Paragraph::new(line).render(inner, buf);
    }
}
