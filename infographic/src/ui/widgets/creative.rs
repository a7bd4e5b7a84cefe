//! Creative tools overlay

use infographic_core::{CreativeRun, CreativeTool};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use crate::ui::theme::Theme;
use crate::ui::widgets::input::{InputWidget, LineEditor};

/// Editing state of the creative tools overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreativeForm {
    tool: usize,
    inputs: [LineEditor; 2],
    field: usize,
}

impl CreativeForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tool(&self) -> CreativeTool {
        CreativeTool::ALL[self.tool % CreativeTool::ALL.len()]
    }

    pub fn field(&self) -> usize {
        self.field
    }

    pub fn input(&self, slot: usize) -> &LineEditor {
        &self.inputs[slot.min(1)]
    }

    /// The field being edited.
    pub fn editor_mut(&mut self) -> &mut LineEditor {
        &mut self.inputs[self.field.min(1)]
    }

    pub fn next_tool(&mut self) {
        self.tool = (self.tool + 1) % CreativeTool::ALL.len();
        self.reset_inputs();
    }

    pub fn prev_tool(&mut self) {
        self.tool = (self.tool + CreativeTool::ALL.len() - 1) % CreativeTool::ALL.len();
        self.reset_inputs();
    }

    /// Move to the next input field of a two-input tool.
    pub fn next_field(&mut self) {
        self.field = (self.field + 1) % self.tool().input_count();
    }

    fn reset_inputs(&mut self) {
        self.inputs = Default::default();
        self.field = 0;
    }

    /// Run the selected tool. `None` if an input is blank.
    pub fn run(&self) -> Option<CreativeRun> {
        self.tool()
            .run(&[self.inputs[0].as_str(), self.inputs[1].as_str()])
    }
}

/// Overlay listing the tools with the selected tool's inputs.
pub struct CreativeWidget<'a> {
    form: &'a CreativeForm,
    theme: &'a Theme,
}

impl<'a> CreativeWidget<'a> {
    pub fn new(form: &'a CreativeForm, theme: &'a Theme) -> Self {
        Self { form, theme }
    }
}

impl Widget for CreativeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let block = Block::default()
            .title(Span::styled(" Creative tools ", self.theme.heading_style()))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style(true))
            .style(self.theme.base_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let selected = self.form.tool();
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(10)])
            .split(inner);

        let tools: Vec<Line> = CreativeTool::ALL
            .iter()
            .map(|tool| {
                if *tool == selected {
                    Line::from(Span::styled(format!("▶ {tool}"), self.theme.accent_style()))
                } else {
                    Line::from(Span::styled(format!("  {tool}"), self.theme.text_style()))
                }
            })
            .collect();
        Paragraph::new(tools).render(chunks[0], buf);

        let count = selected.input_count();
        let mut constraints = vec![Constraint::Length(3); count];
        constraints.push(Constraint::Min(1));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(chunks[1]);

        for slot in 0..count {
            let title = if slot == 0 { "Input" } else { "Second input" };
            InputWidget::new(self.form.input(slot), self.theme)
                .title(title)
                .placeholder(selected.placeholder(slot))
                .active(self.form.field() == slot)
                .render(rows[slot], buf);
        }

        let mut hints = vec![
            Line::from(Span::styled(
                "Suggestions are fixed samples for now.",
                self.theme.muted_style(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("↑/↓ ", self.theme.accent_style()),
                Span::raw("tool  "),
                Span::styled("Enter ", self.theme.accent_style()),
                Span::raw("add card  "),
                Span::styled("Esc ", self.theme.accent_style()),
                Span::raw("close"),
            ]),
        ];
        if count > 1 {
            hints.push(Line::from(vec![
                Span::styled("Tab ", self.theme.accent_style()),
                Span::raw("switch input"),
            ]));
        }
        Paragraph::new(hints)
            .wrap(Wrap { trim: true })
            .render(rows[count], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_cycling_resets_inputs() {
        let mut form = CreativeForm::new();
        assert_eq!(form.tool(), CreativeTool::Simile);
        form.editor_mut().insert('x');

        form.prev_tool();
        assert_eq!(form.tool(), CreativeTool::Unfold);
        assert!(form.input(0).is_blank());

        form.next_tool();
        form.next_tool();
        assert_eq!(form.tool(), CreativeTool::Explode);
    }

    #[test]
    fn test_two_input_tool_needs_both_fields() {
        let mut form = CreativeForm::new();
        while form.tool() != CreativeTool::Fuse {
            form.next_tool();
        }
        form.editor_mut().set("car");
        assert!(form.run().is_none());

        form.next_field();
        assert_eq!(form.field(), 1);
        form.editor_mut().set("tree");
        let run = form.run().unwrap();
        assert_eq!(run.inputs, vec!["car", "tree"]);

        form.next_field();
        assert_eq!(form.field(), 0);
    }

    #[test]
    fn test_single_input_field_stays_put() {
        let mut form = CreativeForm::new();
        form.next_field();
        assert_eq!(form.field(), 0);
    }
}
