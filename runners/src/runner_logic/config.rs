use clap::Parser;
use clap::builder::BoolishValueParser;
use lib_common::core::{ConfigError, LogPolicy, PrintPolicy, RateSpec, RecurrenceSpec};
use lib_common::scenarios::ScenarioKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "scenario_runner.conf";
const DOTENV_FILE: &str = ".env.app";
/// Asset lists shipped beside this crate; used when `ASSETS_DIR` is unset.
const DEFAULT_ASSETS_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

#[derive(Parser, Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[command(about = "Publishes synthetic scenario payloads at a controlled rate", version)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[arg(long, env = "SCENARIO_RUNNER_CONFIG", help = "Path to the JSON configuration file.")]
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[arg(long, env = "SCENARIO", help = "Scenario to run (scenario1|scenario2).")]
    pub scenario: Option<String>,

    #[arg(long, env = "ASSETS_DIR", help = "Directory holding the scenario asset lists.")]
    pub assets_dir: Option<PathBuf>,

    #[arg(long, env = "REDIS_URL", help = "Redis server URL used as the publish sink.")]
    pub redis_url: Option<String>,

    #[arg(long, env = "REDIS_CHANNEL", help = "Redis pub/sub channel payloads are published on.")]
    pub redis_channel: Option<String>,

    #[arg(
        long,
        env = "DRY_RUN",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Discard payloads instead of publishing them."
    )]
    pub dry_run: Option<bool>,

    #[arg(long, env = "RATE_HZ", help = "Override the scenario's rate in Hz.")]
    pub rate_hz: Option<f64>,

    #[arg(long, env = "RECURRENCE_MODE", help = "Override the scenario's recurrence (fixed|infinite).")]
    pub recurrence_mode: Option<String>,

    #[arg(long, env = "RECURRENCE_COUNT", help = "Tick count for fixed recurrence.")]
    pub recurrence_count: Option<u64>,

    #[arg(long, env = "PRINT_MODE", help = "Console echo policy (none|first|nth|all).")]
    pub print_mode: Option<String>,

    #[arg(long, env = "PRINT_N", help = "Tick echoed when print mode is nth.")]
    pub print_n: Option<u64>,

    #[arg(
        long,
        env = "LOG_ENABLED",
        value_parser = BoolishValueParser::new(),
        num_args = 0..=1,
        default_missing_value = "true",
        help = "Append every payload to the payload journal."
    )]
    pub log_enabled: Option<bool>,

    #[arg(long, env = "LOG_FILE", help = "Payload journal path.")]
    pub log_file: Option<PathBuf>,

    #[arg(long, env = "DIAG_LOG_DIR", help = "Directory for diagnostic log files.")]
    pub diag_log_dir: Option<PathBuf>,

    #[arg(long, env = "DIAG_LOG_LEVEL", help = "Diagnostic logging level (trace, debug, info, warn, error).")]
    pub diag_log_level: Option<String>,
}

/// Where payloads are delivered.
#[derive(Debug, Clone, PartialEq)]
pub enum SinkTarget {
    Redis { url: String, channel: String },
    Discard,
}

/// Validated settings. Rate and recurrence are overrides; `None` means the
/// scenario's own values apply.
#[derive(Debug, Clone)]
pub struct RunnerPlan {
    pub scenario: ScenarioKind,
    pub assets_dir: PathBuf,
    pub rate: Option<RateSpec>,
    pub recurrence: Option<RecurrenceSpec>,
    pub print: PrintPolicy,
    pub log: LogPolicy,
    pub sink: SinkTarget,
}

impl Config {
    // Merge two Config structs, where 'other' overrides 'self' for Some values
    fn merge(self, other: Config) -> Config {
        Config {
            config_path: other.config_path.or(self.config_path),
            scenario: other.scenario.or(self.scenario),
            assets_dir: other.assets_dir.or(self.assets_dir),
            redis_url: other.redis_url.or(self.redis_url),
            redis_channel: other.redis_channel.or(self.redis_channel),
            dry_run: other.dry_run.or(self.dry_run),
            rate_hz: other.rate_hz.or(self.rate_hz),
            recurrence_mode: other.recurrence_mode.or(self.recurrence_mode),
            recurrence_count: other.recurrence_count.or(self.recurrence_count),
            print_mode: other.print_mode.or(self.print_mode),
            print_n: other.print_n.or(self.print_n),
            log_enabled: other.log_enabled.or(self.log_enabled),
            log_file: other.log_file.or(self.log_file),
            diag_log_dir: other.diag_log_dir.or(self.diag_log_dir),
            diag_log_level: other.diag_log_level.or(self.diag_log_level),
        }
    }

    pub fn defaults() -> Config {
        Config {
            assets_dir: Some(PathBuf::from(DEFAULT_ASSETS_DIR)),
            redis_url: Some("redis://127.0.0.1/".to_string()),
            dry_run: Some(false),
            print_mode: Some("none".to_string()),
            print_n: Some(1),
            log_enabled: Some(false),
            log_file: Some(PathBuf::from(lib_common::core::DEFAULT_LOG_FILE)),
            diag_log_dir: Some(PathBuf::from("./logs")),
            diag_log_level: Some("info".to_string()),
            ..Default::default()
        }
    }

    pub fn diag_log_dir(&self) -> PathBuf {
        self.diag_log_dir.clone().unwrap_or_else(|| PathBuf::from("./logs"))
    }

    pub fn diag_log_level(&self) -> &str {
        self.diag_log_level.as_deref().unwrap_or("info")
    }

    /// Validates everything the run needs. Fails before any tick is produced.
    pub fn plan(&self) -> Result<RunnerPlan, ConfigError> {
        let scenario: ScenarioKind = self
            .scenario
            .as_deref()
            .ok_or(ConfigError::MissingValue("scenario"))?
            .parse()?;

        let rate = self.rate_hz.map(RateSpec::parse_hz).transpose()?;

        let recurrence = match (&self.recurrence_mode, self.recurrence_count) {
            (Some(mode), count) => Some(RecurrenceSpec::parse(mode, count)?),
            (None, Some(count)) => Some(RecurrenceSpec::fixed(count)?),
            (None, None) => None,
        };

        let print = PrintPolicy::parse(self.print_mode.as_deref().unwrap_or("none"), self.print_n)?;
        let log = LogPolicy::from_settings(self.log_enabled.unwrap_or(false), self.log_file.clone());

        let sink = if self.dry_run.unwrap_or(false) {
            SinkTarget::Discard
        } else {
            SinkTarget::Redis {
                url: self
                    .redis_url
                    .clone()
                    .ok_or(ConfigError::MissingValue("redis_url"))?,
                channel: self
                    .redis_channel
                    .clone()
                    .ok_or(ConfigError::MissingValue("redis_channel"))?,
            }
        };

        Ok(RunnerPlan {
            scenario,
            assets_dir: self.assets_dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR)),
            rate,
            recurrence,
            print,
            log,
            sink,
        })
    }
}

/// Loads `.env.app` from the working directory if present. Variables already
/// in the environment are left untouched.
pub fn load_dotenv() {
    match dotenvy::from_filename(DOTENV_FILE) {
        Ok(path) => eprintln!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => eprintln!("Failed to load {}: {}", DOTENV_FILE, e),
    }
}

pub fn load_config() -> Config {
    resolve(Config::parse())
}

/// Layers defaults < config file < environment/CLI.
pub fn resolve(cli_args: Config) -> Config {
    let config_file_path = cli_args
        .config_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

    let mut current_config = Config::defaults();
    if let Some(file_config) = read_config_file(&config_file_path) {
        current_config = current_config.merge(file_config);
    }

    // clap already folded environment variables into the CLI values.
    current_config.merge(cli_args)
}

fn read_config_file(path: &Path) -> Option<Config> {
    if !path.exists() {
        // Logging is not set up yet at this point.
        eprintln!(
            "Config file not found at {}. Using defaults and environment/CLI variables.",
            path.display()
        );
        return None;
    }
    match fs::read_to_string(path) {
        Ok(config_str) => match serde_json::from_str::<Config>(&config_str) {
            Ok(file_config) => Some(file_config),
            Err(e) => {
                eprintln!("Failed to parse config file {}: {}. Falling back to other sources.", path.display(), e);
                None
            }
        },
        Err(e) => {
            eprintln!("Failed to read config file {}: {}. Falling back to other sources.", path.display(), e);
            None
        }
    }
}
