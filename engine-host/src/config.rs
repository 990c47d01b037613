use anyhow::{anyhow, Context, Result};
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "arcade")]
#[command(about = "Arcade mini-game shell")]
#[command(long_about = "Hosts the arcade mini-games in a single frame loop.

The host resolves a hash route (e.g. #breakout) to a registered game, loads it
onto the surface and drives it on a fixed tick. With --frames-per-game it
rotates through --games and exits after the last one.")]
pub struct Config {
    /// Hash route of the first game (e.g. #boat)
    #[arg(long, env = "ARCADE_ROUTE", default_value = "#placeholder")]
    pub route: String,

    /// Game shown when the route does not name a registered game
    #[arg(long, env = "ARCADE_DEFAULT_GAME", default_value = "placeholder")]
    pub default_game: String,

    /// Games to rotate through after the first one
    #[arg(long, env = "ARCADE_GAMES", value_delimiter = ',')]
    pub games: Vec<String>,

    /// Frame rate of the fixed tick
    #[arg(long, env = "ARCADE_FPS", default_value = "60")]
    pub fps: u32,

    /// Frames to run each game before switching (0 for unlimited)
    #[arg(long, env = "ARCADE_FRAMES_PER_GAME", default_value = "0")]
    pub frames_per_game: u64,

    /// Seed for every game's RNG (entropy when unset)
    #[arg(long, env = "ARCADE_SEED")]
    pub seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ARCADE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Hand tones to the tracing audio backend instead of discarding them
    #[arg(long, env = "ARCADE_AUDIO", default_value = "true", action = clap::ArgAction::Set)]
    pub audio: bool,

    /// Feed random input to the active game
    #[arg(long, env = "ARCADE_AUTOPILOT")]
    pub autopilot: bool,

    /// TOML file supplying any option not given on the command line
    #[arg(long, env = "ARCADE_CONFIG")]
    #[serde(skip)]
    pub config: Option<PathBuf>,
}

/// Options accepted from a TOML config file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub route: Option<String>,
    pub default_game: Option<String>,
    pub games: Option<Vec<String>>,
    pub fps: Option<u32>,
    pub frames_per_game: Option<u64>,
    pub seed: Option<u64>,
    pub log_level: Option<String>,
    pub audio: Option<bool>,
    pub autopilot: Option<bool>,
}

impl FileConfig {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }
}

/// True unless the user set `id` on the command line or in the environment
fn unset(matches: &ArgMatches, id: &str) -> bool {
    !matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

impl Config {
    /// Parse arguments and the environment, then fill the rest from `--config`
    pub fn load() -> Result<Self> {
        Self::from_matches(&Self::command().get_matches())
    }

    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut config = Self::from_arg_matches(matches)?;
        if let Some(path) = config.config.clone() {
            config.merge(FileConfig::read(&path)?, matches);
        }
        Ok(config)
    }

    /// Take file values for every option the user did not set explicitly
    pub fn merge(&mut self, file: FileConfig, matches: &ArgMatches) {
        fn take<T>(slot: &mut T, value: Option<T>, unset: bool) {
            if let (Some(v), true) = (value, unset) {
                *slot = v;
            }
        }
        take(&mut self.route, file.route, unset(matches, "route"));
        take(&mut self.default_game, file.default_game, unset(matches, "default_game"));
        take(&mut self.games, file.games, unset(matches, "games"));
        take(&mut self.fps, file.fps, unset(matches, "fps"));
        take(&mut self.frames_per_game, file.frames_per_game, unset(matches, "frames_per_game"));
        take(&mut self.log_level, file.log_level, unset(matches, "log_level"));
        take(&mut self.audio, file.audio, unset(matches, "audio"));
        take(&mut self.autopilot, file.autopilot, unset(matches, "autopilot"));
        if unset(matches, "seed") && file.seed.is_some() {
            self.seed = file.seed;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(anyhow!("fps must be greater than 0"));
        }

        if self.fps > 1000 {
            return Err(anyhow!("fps cannot exceed 1000"));
        }

        if self.default_game.trim().is_empty() {
            return Err(anyhow!("default_game cannot be empty"));
        }

        if self.games.iter().any(|g| g.trim().is_empty()) {
            return Err(anyhow!("games cannot contain an empty id"));
        }

        self.level()?;

        Ok(())
    }

    pub fn level(&self) -> Result<Level> {
        Level::from_str(&self.log_level).map_err(|_| anyhow!("unknown log level '{}'", self.log_level))
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.fps.max(1)))
    }
}
