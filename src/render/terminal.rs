use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use super::Presenter;
use crate::view::{LeaderboardView, Slot, SlotContent, PLACEHOLDER_NAME, PLACEHOLDER_XP};

/// Shows the leaderboard in the alternate screen until `q`, `Esc` or `Enter`.
pub struct TerminalPresenter {
    /// Footer line, e.g. repository and fetch status.
    pub status: String,
}

impl TerminalPresenter {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

impl Presenter for TerminalPresenter {
    fn present(&mut self, view: &LeaderboardView) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

        let result = run(&mut terminal, view, &self.status);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }
}

fn run<B: Backend>(terminal: &mut Terminal<B>, view: &LeaderboardView, status: &str) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, view, status))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press
                    && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter)
                {
                    return Ok(());
                }
            }
        }
    }
}

fn ui(f: &mut Frame, view: &LeaderboardView, status: &str) {
    let mut constraints = vec![Constraint::Length(3)];
    constraints.extend(view.slots.iter().map(|_| Constraint::Length(4)));
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " XPBOARD ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ Top contributors"),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    for (i, slot) in view.slots.iter().enumerate() {
        render_slot(f, slot, chunks[i + 1]);
    }

    let footer = Paragraph::new(format!("{status} │ q: Quit"))
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[chunks.len() - 1]);
}

fn render_slot(f: &mut Frame, slot: &Slot, area: Rect) {
    let (lines, accent) = match &slot.content {
        SlotContent::Filled(standing) => {
            let color = parse_hex(standing.tier.color).unwrap_or(Color::White);
            let lines = vec![
                Line::from(vec![
                    Span::styled(
                        format!("{:<4}", slot.badge()),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::styled(
                        standing.handle(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::raw(standing.xp_display()),
                    Span::styled(" XP", Style::default().fg(Color::DarkGray)),
                ]),
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(
                        standing.tier.name,
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" · "),
                    Span::styled(standing.tier.perk, Style::default().fg(color)),
                ]),
            ];
            (lines, color)
        }
        SlotContent::Empty => (
            vec![Line::from(vec![
                Span::styled(
                    format!("{:<4}", slot.badge()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(PLACEHOLDER_NAME),
                Span::raw("  "),
                Span::styled(PLACEHOLDER_XP, Style::default().fg(Color::DarkGray)),
            ])],
            Color::DarkGray,
        ),
    };

    let row = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent)),
    );
    f.render_widget(row, area);
}

/// `#RRGGBB` -> `Color::Rgb`
fn parse_hex(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::RankedEntry;
    use crate::scoring::ScoringTable;
    use crate::view;
    use ratatui::backend::TestBackend;

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn parses_tier_colors() {
        assert_eq!(parse_hex("#FFD700"), Some(Color::Rgb(255, 215, 0)));
        assert_eq!(parse_hex("#00aaff"), Some(Color::Rgb(0, 170, 255)));
        assert_eq!(parse_hex("FFD700"), None);
        assert_eq!(parse_hex("#FFF"), None);
        assert_eq!(parse_hex("#GG0000"), None);
    }

    #[test]
    fn draws_filled_and_placeholder_rows() {
        let top = vec![RankedEntry {
            login: "alice".to_string(),
            xp: 7_500,
        }];
        let view = view::build(&top, &ScoringTable::default());
        let mut terminal = Terminal::new(TestBackend::new(60, 24)).unwrap();

        terminal.draw(|f| ui(f, &view, "sayeeg-11/Pixel_Phantoms")).unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("@alice"));
        assert!(text.contains("7,500"));
        assert!(text.contains("Silver"));
        assert!(text.contains("Exclusive Merch"));
        assert!(text.contains("#2  ---"));
        assert!(text.contains("#3  ---"));
        assert!(text.contains("0 XP"));
        assert!(text.contains("sayeeg-11/Pixel_Phantoms"));
    }
}
