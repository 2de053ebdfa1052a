use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::result::QuizSummary;
use crate::ui::theme::Theme;

pub struct Results<'a> {
    pub summary: &'a QuizSummary,
    pub theme: &'a Theme,
}

impl<'a> Results<'a> {
    pub fn new(summary: &'a QuizSummary, theme: &'a Theme) -> Self {
        Self { summary, theme }
    }
}

impl Widget for Results<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.summary.headline()))
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(2),
                Constraint::Length(1),
            ])
            .split(inner);

        let score_color = if self.summary.won {
            colors.success()
        } else {
            colors.warning()
        };
        let score_line = Line::from(vec![
            Span::styled("  Score:     ", Style::default().fg(colors.fg())),
            Span::styled(
                self.summary.score_line(),
                Style::default().fg(score_color).add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(score_line).render(layout[0], buf);

        let attempts_line = Line::from(vec![
            Span::styled("  Attempts:  ", Style::default().fg(colors.fg())),
            Span::styled(
                self.summary.total_attempts.to_string(),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            ),
        ]);
        Paragraph::new(attempts_line).render(layout[1], buf);

        let passed_line = Line::from(vec![
            Span::styled("  Skipped/Revealed: ", Style::default().fg(colors.fg())),
            Span::styled(
                self.summary.skipped_or_revealed.to_string(),
                Style::default().fg(if self.summary.skipped_or_revealed == 0 {
                    colors.success()
                } else {
                    colors.text_pending()
                }),
            ),
        ]);
        Paragraph::new(passed_line).render(layout[2], buf);

        Paragraph::new(Line::from(Span::styled(
            self.summary.rating,
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::ITALIC),
        )))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(layout[3], buf);

        let help = Paragraph::new(Line::from(vec![
            Span::styled("  [r/Enter] Play again  ", Style::default().fg(colors.accent())),
            Span::styled("[q/Esc] Quit", Style::default().fg(colors.accent())),
        ]));
        help.render(layout[5], buf);
    }
}
