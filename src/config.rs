//! Runtime settings for the terminal game and its logging.
//!
//! Values come from three places, later ones winning: the defaults,
//! `QTTT_*` environment variables, then command-line flags.

use std::env;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const SEED_VAR: &str = "QTTT_SEED";
pub const SHOW_CIRCUIT_VAR: &str = "QTTT_SHOW_CIRCUIT";
pub const LOG_VAR: &str = "QTTT_LOG";

/// Filter used when nothing else resolves to a valid one
pub const DEFAULT_DIRECTIVE: &str = "warn";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameConfig {
    /// Seed for the first game, later games add their index. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Print the gate log after every turn
    pub show_circuit: bool,
    /// `tracing` filter directives, e.g. `qttt=debug`
    pub log_directives: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be an unsigned integer, got \"{value}\"")]
    InvalidSeed { var: &'static str, value: String },
    #[error("{var} must be a boolean, got \"{value}\"")]
    InvalidFlag { var: &'static str, value: String },
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            var,
            value: value.to_string(),
        }),
    }
}

impl GameConfig {
    /// Defaults overridden by the `QTTT_*` variables that are set
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Same as [`GameConfig::from_env`] with a custom variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(value) = lookup(SEED_VAR) {
            config.seed = Some(value.trim().parse().map_err(|_| ConfigError::InvalidSeed {
                var: SEED_VAR,
                value: value.clone(),
            })?);
        }
        if let Some(value) = lookup(SHOW_CIRCUIT_VAR) {
            config.show_circuit = parse_flag(SHOW_CIRCUIT_VAR, &value)?;
        }
        config.log_directives = lookup(LOG_VAR).filter(|v| !v.trim().is_empty());
        Ok(config)
    }

    /// Overlays command-line values on top of `self`
    pub fn merge(self, seed: Option<u64>, show_circuit: bool, log: Option<String>) -> Self {
        Self {
            seed: seed.or(self.seed),
            show_circuit: show_circuit || self.show_circuit,
            log_directives: log.or(self.log_directives),
        }
    }

    /// Seed for the `index`:th game played in this session
    pub fn game_seed(&self, index: u64) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(index))
    }

    /// Filter from the configured directives, then `RUST_LOG`, then [`DEFAULT_DIRECTIVE`]
    pub fn env_filter(&self) -> EnvFilter {
        self.log_directives
            .as_deref()
            .and_then(|d| EnvFilter::try_new(d).ok())
            .or_else(|| EnvFilter::try_from_default_env().ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
    }

    /// Installs the global subscriber, logging to stderr so the board stays readable
    pub fn init_tracing(&self) {
        let layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true);
        // Already installed (e.g. by a test harness) is fine
        let _ = tracing_subscriber::registry()
            .with(self.env_filter())
            .with(layer)
            .try_init();
    }
}
