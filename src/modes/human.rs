use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;

use crate::game::{Action, GameConfig, GameEngine, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::SessionMetrics;
use crate::render::{HudInfo, Renderer};
use crate::rl::make_rng;

const CONTROLS: &str = "←→ or A/D to turn | R to restart | Q to quit";

pub struct HumanMode {
    engine: GameEngine,
    state: GameState,
    metrics: SessionMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    /// Turn queued for the next tick; the snake goes straight without one
    pending_turn: Option<Action>,
}

impl HumanMode {
    pub fn new(config: GameConfig, seed: Option<u64>) -> Result<Self> {
        let mut engine =
            GameEngine::new(config, make_rng(seed)).context("Invalid game configuration")?;
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            metrics: SessionMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            pending_turn: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_game_loop(&mut terminal).await;

        // Restore the terminal even if the loop failed
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Game ticks at 8 Hz (125ms per tick)
        let mut tick_timer = interval(Duration::from_millis(125));

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    if self.state.is_alive {
                        self.update_game();
                    }
                }

                _ = render_timer.tick() => {
                    if self.state.is_alive {
                        self.metrics.tick();
                    }
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.state, &hud);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Turn(action) => self.pending_turn = Some(action),
                KeyAction::Restart => self.reset_game(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Pause | KeyAction::Speed(_) | KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) {
        let action = self.pending_turn.take().unwrap_or(Action::Straight);
        let result = self.engine.step(&mut self.state, action);

        if result.terminated {
            self.metrics.on_game_over(self.state.score);
        }
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
        self.metrics.on_game_start();
        self.pending_turn = None;
    }

    fn hud(&self) -> HudInfo {
        HudInfo {
            title: "Snake",
            time: Some(self.metrics.format_time()),
            high_score: self.metrics.high_score,
            controls: CONTROLS,
            ..Default::default()
        }
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Direction;

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig::default(), Some(5)).unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(mode.state.is_alive);
        assert_eq!(mode.state.score, 0);
        assert_eq!(mode.state.snake.direction, Direction::Right);
    }

    #[test]
    fn test_invalid_grid_rejected() {
        assert!(HumanMode::new(GameConfig::new(0, 10), None).is_err());
    }

    #[test]
    fn test_no_key_goes_straight() {
        let mut mode = mode();
        let head = mode.state.snake.head();
        mode.update_game();
        assert_eq!(mode.state.snake.direction, Direction::Right);
        assert_eq!(mode.state.snake.head().x, head.x + 1);
    }

    #[test]
    fn test_pending_turn_used_once() {
        let mut mode = mode();
        mode.pending_turn = Some(Action::Left);
        mode.update_game();
        // Left from Right is up the screen
        assert_eq!(mode.state.snake.direction, Direction::Up);
        assert!(mode.pending_turn.is_none());

        mode.update_game();
        assert_eq!(mode.state.snake.direction, Direction::Up);
    }

    #[test]
    fn test_game_reset() {
        let mut mode = mode();
        mode.state.score = 10;
        mode.state.is_alive = false;
        mode.reset_game();
        assert_eq!(mode.state.score, 0);
        assert!(mode.state.is_alive);
    }

    #[test]
    fn test_crash_counts_game() {
        let mut mode = HumanMode::new(GameConfig::new(3, 3), Some(1)).unwrap();
        // Center (1,1) heading right hits the wall on the second step
        mode.update_game();
        mode.update_game();
        assert!(!mode.state.is_alive);
        assert_eq!(mode.metrics.games_played, 1);
    }
}
