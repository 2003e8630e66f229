use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::engine::feedback::{self, SlotStyle};
use crate::engine::wheel::{SlotView, WheelModel};
use crate::ui::theme::Theme;

/// The spectator-facing wheel: one slot per row, fisheye emphasis around the
/// viewport center. Styling comes entirely from the feedback mapping; the
/// widget never touches mode or history state.
pub struct WheelView<'a> {
    wheel: &'a WheelModel,
    offset: f64,
    theme: &'a Theme,
}

impl<'a> WheelView<'a> {
    pub fn new(wheel: &'a WheelModel, offset: f64, theme: &'a Theme) -> Self {
        Self {
            wheel,
            offset,
            theme,
        }
    }

    fn row_style(&self, style: SlotStyle) -> Style {
        let colors = &self.theme.colors;
        if style.focused {
            Style::default()
                .fg(colors.text_focus())
                .add_modifier(Modifier::BOLD)
        } else if style.opacity >= 0.6 {
            Style::default().fg(colors.fg())
        } else {
            Style::default().fg(colors.text_dim())
        }
    }
}

impl Widget for WheelView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let slot_height = self.wheel.slot_height();
        let viewport = area.height as f64 * slot_height;
        let center_line = self.offset + viewport / 2.0;
        let top_index = (self.offset / slot_height).floor().max(0.0) as usize;

        for row in 0..area.height {
            let index = top_index + row as usize;
            let Some(text) = self.wheel.slot_text(index) else {
                continue;
            };
            let distance = feedback::slot_distance(center_line, index, slot_height);
            let style = feedback::style_for(distance, slot_height);

            let line = Line::from(Span::styled(text.to_string(), self.row_style(style)));
            let row_area = Rect::new(area.x, area.y + row, area.width, 1);
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(row_area, buf);
        }
    }
}
