use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Vector};

/// Mode-specific text shown around the grid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HudInfo {
    /// Grid block title
    pub title: &'static str,
    /// Game clock, `MM:SS`
    pub time: Option<String>,
    /// Episode counter in watch mode
    pub episode: Option<usize>,
    pub high_score: u32,
    /// Playback speed label in watch mode
    pub speed: Option<&'static str>,
    pub paused: bool,
    /// One-line controls help for the footer
    pub controls: &'static str,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, hud: &HudInfo) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, hud), chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if state.is_alive {
            frame.render_widget(self.render_grid(state, hud), game_area);
        } else {
            frame.render_widget(self.render_game_over(state, hud), game_area);
        }

        frame.render_widget(self.render_controls(hud), chunks[2]);
    }

    fn render_grid(&self, state: &GameState, hud: &HudInfo) -> Paragraph<'_> {
        let head = state.snake.head();
        let mut lines = Vec::with_capacity(state.grid_height);

        for y in 0..state.grid_height {
            let mut spans = Vec::with_capacity(state.grid_width);

            for x in 0..state.grid_width {
                let pos = Vector::new(x as i32, y as i32);

                let cell = if pos == head {
                    Span::styled(
                        "■ ",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                } else if state.snake.contains(pos) {
                    Span::styled("□ ", Style::default().fg(Color::Green))
                } else if pos == state.food {
                    Span::styled(
                        "O ",
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                } else {
                    Span::styled(". ", Style::default().fg(Color::DarkGray))
                };

                spans.push(cell);
            }

            lines.push(Line::from(spans));
        }

        let title = if hud.paused {
            format!(" {} (paused) ", hud.title)
        } else {
            format!(" {} ", hud.title)
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, hud: &HudInfo) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(hud.high_score.to_string(), value),
            Span::raw("    "),
            Span::styled("Steps: ", label),
            Span::styled(state.steps.to_string(), value),
        ];

        if let Some(time) = &hud.time {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Time: ", label));
            spans.push(Span::styled(time.clone(), value));
        }
        if let Some(episode) = hud.episode {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Episode: ", label));
            spans.push(Span::styled(episode.to_string(), value));
        }
        if let Some(speed) = hud.speed {
            spans.push(Span::raw("    "));
            spans.push(Span::styled("Speed: ", label));
            spans.push(Span::styled(speed, value));
        }

        Paragraph::new(vec![Line::from(spans)]).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, hud: &HudInfo) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let bold = Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        let mut text = vec![
            Line::from(""),
            Line::from(Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", label),
                Span::styled(state.score.to_string(), bold),
                Span::raw("    "),
                Span::styled("Length: ", label),
                Span::styled(state.snake.len().to_string(), bold),
            ]),
            Line::from(vec![
                Span::styled("Best: ", label),
                Span::styled(hud.high_score.max(state.score).to_string(), bold),
            ]),
            Line::from(""),
        ];

        // Watch mode restarts on its own
        let hint = if hud.episode.is_some() {
            Line::from(Span::styled(
                "Next episode starts shortly",
                Style::default().fg(Color::Gray),
            ))
        } else {
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ])
        };
        text.push(hint);

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, hud: &HudInfo) -> Paragraph<'_> {
        let text = vec![Line::from(Span::styled(
            hud.controls,
            Style::default().fg(Color::Cyan),
        ))];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
