//! Watch mode: a saved Q-table plays Snake greedily in the terminal
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Reset episode
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit
//!
//! # Example
//!
//! ```rust,no_run
//! use q_snake::modes::WatchMode;
//! use std::path::Path;
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let mut watch_mode = WatchMode::new(Path::new("models/snake.qtable"), None, None)?;
//! watch_mode.run().await?;
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::path::Path;
use std::time::Duration;
use tokio::time::{Interval, interval};
use tracing::info;

use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::render::{HudInfo, Renderer};
use crate::rl::{ACTIONS, QLearningAgent, SnakeEnvironment, load_q_table, make_rng};

const CONTROLS: &str = "Space to pause | 1-4 speed | R to reset | Q to quit";

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackSpeed {
    /// 2 Hz (500ms per step)
    Slow,
    /// 8 Hz (125ms per step), same as human mode
    Normal,
    /// 20 Hz (50ms per step)
    Fast,
    /// 60 Hz (16ms per step)
    VeryFast,
}

impl PlaybackSpeed {
    /// Speed for the number keys 1-4
    pub fn from_key(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Slow),
            2 => Some(Self::Normal),
            3 => Some(Self::Fast),
            4 => Some(Self::VeryFast),
            _ => None,
        }
    }

    fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(500),
            Self::Normal => Duration::from_millis(125),
            Self::Fast => Duration::from_millis(50),
            Self::VeryFast => Duration::from_millis(16),
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

/// Greedy replay of a trained table
pub struct WatchMode {
    agent: QLearningAgent,
    env: SnakeEnvironment,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
    /// Episodes started, including the current one
    episode: usize,
    high_score: u32,
}

impl WatchMode {
    /// Load a saved table
    ///
    /// The grid defaults to the one the table was trained on; `game_config`
    /// overrides it.
    pub fn new(model_path: &Path, game_config: Option<GameConfig>, seed: Option<u64>) -> Result<Self> {
        let (table, metadata) = load_q_table(model_path)
            .with_context(|| format!("Failed to load model from {:?}", model_path))?;

        info!(
            path = ?model_path,
            episodes_trained = metadata.progress.episodes_trained,
            training_steps = metadata.progress.training_steps,
            states = metadata.states,
            grid = %format!("{}x{}", metadata.game_config.grid_width, metadata.game_config.grid_height),
            version = %metadata.version,
            "loaded Q-table"
        );

        let game_config = game_config.unwrap_or_else(|| metadata.game_config.clone());
        let env = SnakeEnvironment::new(game_config, make_rng(seed))
            .context("Invalid game configuration")?;
        let agent = QLearningAgent::new(metadata.agent_config.clone(), make_rng(seed))
            .context("Saved agent configuration is invalid")?
            .with_q_table(table);

        Ok(Self {
            agent,
            env,
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            speed: PlaybackSpeed::Normal,
            episode: 1,
            high_score: 0,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_watch_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_watch_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval());
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.tick();
                    }
                }

                _ = render_timer.tick() => {
                    let hud = self.hud();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.env.state(), &hud);
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

    /// Advance playback by one tick: restart a finished episode, otherwise
    /// take the greedy action
    fn tick(&mut self) {
        if self.env.is_done() {
            self.restart_episode();
            return;
        }

        let action_index = self.agent.greedy_action(&self.env.encoded_state());
        self.env.step(ACTIONS[action_index]);
        self.high_score = self.high_score.max(self.env.state().score);
    }

    fn restart_episode(&mut self) {
        self.env.reset();
        self.episode += 1;
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Pause => self.paused = !self.paused,
                KeyAction::Restart => self.restart_episode(),
                KeyAction::Speed(level) => {
                    if let Some(speed) = PlaybackSpeed::from_key(level) {
                        self.speed = speed;
                        tick_timer.reset_after(speed.tick_interval());
                    }
                }
                KeyAction::Turn(_) | KeyAction::None => {}
            }
        }
    }

    fn hud(&self) -> HudInfo {
        HudInfo {
            title: "Q-learning agent",
            episode: Some(self.episode),
            high_score: self.high_score,
            speed: Some(self.speed.as_str()),
            paused: self.paused,
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
