use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::selection::MAX_FORCE_COUNT;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormKind {
    Force,
    Vrtx,
}

/// Operator-facing modal: the target/source word plus a 1–6 selector
/// (scroll count for FORCE, letter rank for VRTX).
pub struct SetupForm {
    pub kind: FormKind,
    pub word: String,
    pub level: u32,
    pub invalid: bool,
}

impl SetupForm {
    pub fn new(kind: FormKind) -> Self {
        Self {
            kind,
            word: String::new(),
            level: 1,
            invalid: false,
        }
    }

    pub fn push_char(&mut self, ch: char) {
        if ch.is_alphabetic() {
            self.word.extend(ch.to_uppercase());
            self.invalid = false;
        }
    }

    pub fn backspace(&mut self) {
        self.word.pop();
        self.invalid = false;
    }

    pub fn level_next(&mut self) {
        self.level = if self.level >= MAX_FORCE_COUNT { 1 } else { self.level + 1 };
    }

    pub fn level_prev(&mut self) {
        self.level = if self.level <= 1 { MAX_FORCE_COUNT } else { self.level - 1 };
    }

    fn title(&self) -> String {
        match self.kind {
            FormKind::Force => t!("force_title").to_string(),
            FormKind::Vrtx => t!("vrtx_title").to_string(),
        }
    }

    fn level_label(&self) -> String {
        match self.kind {
            FormKind::Force => t!("count_label").to_string(),
            FormKind::Vrtx => t!("rank_label").to_string(),
        }
    }
}

pub struct SetupFormView<'a> {
    form: &'a SetupForm,
    theme: &'a Theme,
}

impl<'a> SetupFormView<'a> {
    pub fn new(form: &'a SetupForm, theme: &'a Theme) -> Self {
        Self { form, theme }
    }
}

impl Widget for SetupFormView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let form = self.form;

        let border = if form.invalid {
            colors.error()
        } else {
            colors.accent()
        };
        let block = Block::bordered()
            .title(format!(" {} ", form.title()))
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        // Word input, with the VRTX letter counter the operator glances at
        let counter = if form.kind == FormKind::Vrtx {
            format!(" ({})", form.word.chars().count())
        } else {
            String::new()
        };
        let word_line = Line::from(vec![
            Span::styled(
                format!(" {}: ", t!("word_label")),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("{}_", form.word),
                Style::default()
                    .fg(colors.text_focus())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(counter, Style::default().fg(colors.text_dim())),
        ]);
        Paragraph::new(word_line).render(layout[0], buf);

        // 1..6 selector rendered as a radio row
        let mut spans = vec![Span::styled(
            format!(" {}: ", form.level_label()),
            Style::default().fg(colors.fg()),
        )];
        for level in 1..=MAX_FORCE_COUNT {
            let selected = level == form.level;
            let style = if selected {
                Style::default()
                    .fg(colors.bg())
                    .bg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text_dim())
            };
            spans.push(Span::styled(format!(" {level} "), style));
            spans.push(Span::raw(" "));
        }
        Paragraph::new(Line::from(spans)).render(layout[1], buf);

        let hint = if form.invalid {
            Span::styled(
                format!(" {}", t!("form_invalid")),
                Style::default().fg(colors.error()),
            )
        } else {
            Span::styled(
                format!(" {}", t!("form_hint")),
                Style::default().fg(colors.text_dim()),
            )
        };
        Paragraph::new(Line::from(hint)).render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_char_uppercases_and_skips_non_letters() {
        let mut form = SetupForm::new(FormKind::Force);
        form.push_char('p');
        form.push_char('3');
        form.push_char('é');
        assert_eq!(form.word, "PÉ");
    }

    #[test]
    fn level_selector_wraps_both_ways() {
        let mut form = SetupForm::new(FormKind::Vrtx);
        assert_eq!(form.level, 1);
        form.level_prev();
        assert_eq!(form.level, MAX_FORCE_COUNT);
        form.level_next();
        assert_eq!(form.level, 1);
    }

    #[test]
    fn editing_clears_the_invalid_flag() {
        let mut form = SetupForm::new(FormKind::Force);
        form.invalid = true;
        form.push_char('a');
        assert!(!form.invalid);
    }
}
