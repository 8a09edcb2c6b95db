use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use q_snake::AppConfig;
use q_snake::game::GameConfig;
use q_snake::metrics::CsvCurveObserver;
use q_snake::modes::{HumanMode, TrainMode, WatchMode};
use q_snake::rl::load_q_table;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Read by `train` when `--config` is not given
const DEFAULT_CONFIG_PATH: &str = "q_snake.toml";

#[derive(Parser)]
#[command(name = "q_snake")]
#[command(version, about = "Snake with a tabular Q-learning agent")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play snake with keyboard controls
    Human {
        #[command(flatten)]
        grid: GridArgs,

        /// Seed for food placement
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Train a Q-learning agent and save its table
    Train {
        /// TOML configuration file [default: q_snake.toml if present]
        #[arg(long)]
        config: Option<PathBuf>,

        /// Continue training from a saved table
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Number of training episodes
        #[arg(long)]
        episodes: Option<usize>,

        /// Where to save the trained table
        #[arg(long)]
        output: Option<PathBuf>,

        /// Seed for the environment and the agent
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        grid: GridArgs,

        /// Write per-episode reward and score to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Watch a trained table play
    Watch {
        /// Path to a saved table
        #[arg(long)]
        model: PathBuf,

        #[command(flatten)]
        grid: GridArgs,

        /// Seed for food placement
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[derive(Args)]
struct GridArgs {
    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,
}

impl GridArgs {
    fn is_set(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }

    /// Override the dimensions of `base` with whichever flags were given
    fn apply(&self, base: &mut GameConfig) {
        if let Some(width) = self.width {
            base.grid_width = width;
        }
        if let Some(height) = self.height {
            base.grid_height = height;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Human { grid, seed } => {
            let mut config = GameConfig::default();
            grid.apply(&mut config);

            let mut human_mode = HumanMode::new(config, seed)?;
            human_mode.run().await?;
        }
        Command::Train {
            config,
            resume,
            episodes,
            output,
            seed,
            grid,
            csv,
        } => {
            let mut app = match config {
                Some(path) => AppConfig::load(&path)
                    .with_context(|| format!("Failed to load config {:?}", path))?,
                None => AppConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH))
                    .with_context(|| format!("Failed to load config {DEFAULT_CONFIG_PATH}"))?,
            };

            grid.apply(&mut app.game);
            if let Some(episodes) = episodes {
                app.training.num_episodes = episodes;
            }
            if let Some(output) = output {
                app.training.save_path = output;
            }
            if seed.is_some() {
                app.training.seed = seed;
            }
            app.validate().context("Invalid configuration")?;

            let mut train_mode = TrainMode::new(app.training, app.game, app.agent)?;
            if let Some(path) = resume {
                let (table, metadata) = load_q_table(&path)
                    .with_context(|| format!("Failed to load model from {:?}", path))?;
                train_mode.resume_from(table, &metadata);
            }
            if let Some(csv) = csv {
                train_mode.add_observer(Box::new(CsvCurveObserver::create(&csv)?));
            }
            train_mode.run()?;
        }
        Command::Watch { model, grid, seed } => {
            // Without flags the grid the table was trained on is used
            let game_config = grid.is_set().then(|| {
                let mut config = GameConfig::default();
                grid.apply(&mut config);
                config
            });

            let mut watch_mode = WatchMode::new(&model, game_config, seed)?;
            watch_mode.run().await?;
        }
    }

    Ok(())
}
