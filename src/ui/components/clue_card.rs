use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::bank::Question;
use crate::ui::theme::Theme;

pub struct ClueCard<'a> {
    question: &'a Question,
    number: usize,
    total: usize,
    /// Show the phonetic hint; only once the answer is on screen.
    show_sound: bool,
    theme: &'a Theme,
}

impl<'a> ClueCard<'a> {
    pub fn new(question: &'a Question, number: usize, total: usize, theme: &'a Theme) -> Self {
        Self {
            question,
            number,
            total,
            show_sound: false,
            theme,
        }
    }

    pub fn show_sound(mut self, show: bool) -> Self {
        self.show_sound = show;
        self
    }
}

fn spaced_initials(initials: &str) -> String {
    initials
        .chars()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Widget for ClueCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Question {} of {} ", self.number, self.total))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let mut lines = vec![
            Line::default(),
            Line::from(Span::styled(
                self.question.question.as_str(),
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];

        if !self.question.initials.is_empty() {
            lines.push(Line::from(vec![
                Span::styled("Initials: ", Style::default().fg(colors.text_pending())),
                Span::styled(
                    spaced_initials(&self.question.initials),
                    Style::default()
                        .fg(colors.prefilled())
                        .add_modifier(Modifier::BOLD),
                ),
            ]));
        }

        if self.show_sound {
            if let Some(sound) = &self.question.sound {
                lines.push(Line::from(vec![
                    Span::styled("Karl says: ", Style::default().fg(colors.text_pending())),
                    Span::styled(
                        format!("\"{sound}\""),
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::ITALIC),
                    ),
                ]));
            }
        }

        if let Some(provenance) = self.question.provenance() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                provenance,
                Style::default().fg(colors.text_pending()),
            )));
        }

        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
