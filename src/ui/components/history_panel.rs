use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};
use rust_i18n::t;

use crate::engine::history::HistoryEntry;
use crate::ui::theme::Theme;

/// Operator-facing outcome list, most recent first; forced outcomes carry
/// their kind tag so the performer can reconstruct the routine afterwards.
pub struct HistoryPanel<'a> {
    entries: Vec<&'a HistoryEntry>,
    theme: &'a Theme,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(entries: Vec<&'a HistoryEntry>, theme: &'a Theme) -> Self {
        Self { entries, theme }
    }
}

impl Widget for HistoryPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", t!("history_title")))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let lines: Vec<Line> = if self.entries.is_empty() {
            vec![Line::from(Span::styled(
                format!(" {}", t!("history_empty")),
                Style::default().fg(colors.text_dim()),
            ))]
        } else {
            self.entries
                .iter()
                .take(layout[0].height as usize)
                .map(|entry| {
                    let mut spans = vec![Span::styled(
                        format!(" {}", entry.word),
                        Style::default().fg(colors.fg()),
                    )];
                    if entry.kind.is_forced() {
                        spans.push(Span::styled(
                            format!("  ({})", entry.kind.as_str()),
                            Style::default()
                                .fg(colors.marker())
                                .add_modifier(Modifier::ITALIC),
                        ));
                    }
                    Line::from(spans)
                })
                .collect()
        };
        Paragraph::new(lines).render(layout[0], buf);

        let footer = Paragraph::new(Line::from(Span::styled(
            format!(" {}", t!("history_hint")),
            Style::default().fg(colors.text_dim()),
        )));
        footer.render(layout[1], buf);
    }
}
