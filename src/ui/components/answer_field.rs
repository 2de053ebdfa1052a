use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::merge::{CellKind, CharCell, MergeView};
use crate::ui::theme::Theme;

const EMPTY_SLOT: char = '_';
const LETTER_GAP: &str = " ";
const WORD_GAP: &str = "   ";

/// The merged answer, one slot per letter, grouped by word.
pub struct AnswerField<'a> {
    view: &'a MergeView,
    theme: &'a Theme,
    revealed: bool,
}

impl<'a> AnswerField<'a> {
    pub fn new(view: &'a MergeView, theme: &'a Theme) -> Self {
        Self {
            view,
            theme,
            revealed: false,
        }
    }

    pub fn revealed(mut self, revealed: bool) -> Self {
        self.revealed = revealed;
        self
    }

    fn cell_style(&self, cell: &CharCell) -> Style {
        let colors = &self.theme.colors;
        match cell.kind {
            CellKind::Prefilled => Style::default()
                .fg(colors.prefilled())
                .add_modifier(Modifier::BOLD),
            CellKind::Empty if cell.cursor => Style::default()
                .fg(colors.text_cursor_fg())
                .bg(colors.text_cursor_bg()),
            CellKind::Empty => Style::default().fg(colors.text_pending()),
            CellKind::Correct if self.revealed => Style::default().fg(colors.warning()),
            CellKind::Correct => Style::default().fg(colors.text_correct()),
            CellKind::Incorrect => Style::default()
                .fg(colors.text_incorrect())
                .bg(colors.text_incorrect_bg())
                .add_modifier(Modifier::UNDERLINED),
        }
    }

    fn spans(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for (w, word) in self.view.words.iter().enumerate() {
            if w > 0 {
                spans.push(Span::raw(WORD_GAP));
            }
            for (l, cell) in word.iter().enumerate() {
                if l > 0 {
                    spans.push(Span::raw(LETTER_GAP));
                }
                let ch = cell.shown.unwrap_or(EMPTY_SLOT);
                spans.push(Span::styled(ch.to_string(), self.cell_style(cell)));
            }
        }
        spans
    }
}

impl Widget for AnswerField<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let border = if self.view.is_match {
            colors.success()
        } else {
            colors.border_focused()
        };
        let block = Block::bordered()
            .title(" Answer ")
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));

        let paragraph = Paragraph::new(vec![Line::default(), Line::from(self.spans())])
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: false });

        paragraph.render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::merge::merge;

    fn render(view: &MergeView, revealed: bool) -> Buffer {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 40, 5);
        let mut buf = Buffer::empty(area);
        AnswerField::new(view, &theme)
            .revealed(revealed)
            .render(area, &mut buf);
        buf
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn column_of(line: &str, needle: &str) -> u16 {
        let byte_idx = line.find(needle).unwrap();
        line[..byte_idx].chars().count() as u16
    }

    #[test]
    fn test_renders_slots_grouped_by_word() {
        let view = merge("WY", "will young", "ix");
        let buf = render(&view, false);
        assert!(row(&buf, 2).contains("W i x _   Y _ _ _ _"), "{:?}", row(&buf, 2));
    }

    #[test]
    fn test_cell_styles_follow_classification() {
        let theme = Theme::default();
        let colors = &theme.colors;
        let view = merge("WY", "will young", "ix");
        let buf = render(&view, false);
        let start = column_of(&row(&buf, 2), "W i x _");

        let prefilled = &buf[(start, 2)];
        assert_eq!(prefilled.fg, colors.prefilled());
        assert!(prefilled.modifier.contains(Modifier::BOLD));

        assert_eq!(buf[(start + 2, 2)].fg, colors.text_correct());

        let wrong = &buf[(start + 4, 2)];
        assert_eq!(wrong.bg, colors.text_incorrect_bg());
        assert!(wrong.modifier.contains(Modifier::UNDERLINED));

        let cursor = &buf[(start + 6, 2)];
        assert_eq!(cursor.bg, colors.text_cursor_bg());
    }

    #[test]
    fn test_only_one_cursor_slot() {
        let theme = Theme::default();
        let view = merge("WY", "will young", "");
        let buf = render(&view, false);
        let cursor_cells = (0..buf.area.width)
            .filter(|&x| buf[(x, 2)].bg == theme.colors.text_cursor_bg())
            .count();
        assert_eq!(cursor_cells, 1);
    }

    #[test]
    fn test_revealed_letters_use_warning_colour() {
        let theme = Theme::default();
        let view = merge("M", "madness", "adness");
        let buf = render(&view, true);
        let start = column_of(&row(&buf, 2), "M a");
        assert_eq!(buf[(start + 2, 2)].fg, theme.colors.warning());
    }
}
