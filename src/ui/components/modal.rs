use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

pub enum ModalKind<'a> {
    Welcome,
    Correct {
        answer: &'a str,
        sound: Option<&'a str>,
        has_next: bool,
    },
    Info,
}

/// Popup drawn over the quiz screen. Clears its area first.
pub struct Modal<'a> {
    kind: ModalKind<'a>,
    theme: &'a Theme,
}

impl<'a> Modal<'a> {
    pub fn new(kind: ModalKind<'a>, theme: &'a Theme) -> Self {
        Self { kind, theme }
    }

    fn title(&self) -> &'static str {
        match self.kind {
            ModalKind::Welcome => " Rockbusters ",
            ModalKind::Correct { .. } => " Correct! ",
            ModalKind::Info => " About ",
        }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let body = Style::default().fg(colors.fg());
        let dim = Style::default().fg(colors.text_pending());
        let key = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        match self.kind {
            ModalKind::Welcome => vec![
                Line::default(),
                Line::from(Span::styled("Welcome to Rockbusters!", key)),
                Line::default(),
                Line::from(Span::styled(
                    "Each clue hides a band or artist. The initials are filled in for you; type the rest.",
                    body,
                )),
                Line::default(),
                Line::from(Span::styled("[Enter/Space] Start", key)),
            ],
            ModalKind::Correct {
                answer,
                sound,
                has_next,
            } => {
                let mut lines = vec![
                    Line::default(),
                    Line::from(Span::styled(
                        answer.to_uppercase(),
                        Style::default()
                            .fg(colors.success())
                            .add_modifier(Modifier::BOLD),
                    )),
                ];
                if let Some(sound) = sound {
                    lines.push(Line::default());
                    lines.push(Line::from(vec![
                        Span::styled("Karl says: ", dim),
                        Span::styled(format!("\"{sound}\""), body.add_modifier(Modifier::ITALIC)),
                    ]));
                }
                lines.push(Line::default());
                let next = if has_next {
                    "[Space/Enter] Next question"
                } else {
                    "[Space/Enter] See results"
                };
                lines.push(Line::from(Span::styled(next, key)));
                lines
            }
            ModalKind::Info => vec![
                Line::from(Span::styled("What is Rockbusters?", key)),
                Line::from(Span::styled(
                    "A radio quiz where a cryptic, pun-heavy clue points at a band or artist, \
                     helped along by the answer's initials.",
                    body,
                )),
                Line::default(),
                Line::from(Span::styled("How to play", key)),
                Line::from(Span::styled(
                    "Type the missing letters. Spaces are implied, the first letter of each word is given.",
                    body,
                )),
                Line::default(),
                Line::from(Span::styled(
                    "Ctrl+S skip   Ctrl+R reveal   Enter next   Ctrl+T sound   Ctrl+X reset",
                    dim,
                )),
                Line::from(Span::styled("[F1/Esc] Close", key)),
            ],
        }
    }
}

impl Widget for Modal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        Clear.render(area, buf);
        let block = Block::bordered()
            .title(self.title())
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.modal_bg()));

        Paragraph::new(self.lines())
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}
