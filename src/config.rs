use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub research: ResearchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Number of steps per run
    #[serde(default = "default_steps")]
    pub steps: u32,
    /// Seed for the market walk and the random benchmark (None = entropy)
    #[serde(default)]
    pub seed: Option<u64>,
    /// Opening price of the asset
    #[serde(default = "default_initial_price")]
    pub initial_price: f64,
    /// Starting cash of every portfolio
    #[serde(default = "default_initial_cash")]
    pub initial_cash: f64,
    /// Half-width of the uniform per-step price perturbation
    #[serde(default = "default_max_step_change")]
    pub max_step_change: f64,
    /// Lowest price the walk may reach
    #[serde(default = "default_price_floor")]
    pub price_floor: f64,
    /// History points handed to agents each step
    #[serde(default = "default_decision_window")]
    pub decision_window: usize,
    /// History points carried in each snapshot
    #[serde(default = "default_snapshot_window")]
    pub snapshot_window: usize,
    /// Pause between steps in milliseconds
    #[serde(default)]
    pub step_delay_ms: u64,
}

fn default_steps() -> u32 {
    30
}

fn default_initial_price() -> f64 {
    100.0
}

fn default_initial_cash() -> f64 {
    1000.0
}

fn default_max_step_change() -> f64 {
    1.5
}

fn default_price_floor() -> f64 {
    1.0
}

fn default_decision_window() -> usize {
    10
}

fn default_snapshot_window() -> usize {
    40
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: default_steps(),
            seed: None,
            initial_price: default_initial_price(),
            initial_cash: default_initial_cash(),
            max_step_change: default_max_step_change(),
            price_floor: default_price_floor(),
            decision_window: default_decision_window(),
            snapshot_window: default_snapshot_window(),
            step_delay_ms: 0,
        }
    }
}

/// Which oracle implementation backs the fund's LLM calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OracleBackend {
    /// Local Ollama server
    Ollama,
    /// No model server; every call takes the fallback path
    Offline,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OracleConfig {
    #[serde(default = "default_backend")]
    pub backend: OracleBackend,
    /// Base URL of the model server
    #[serde(default = "default_oracle_url")]
    pub base_url: String,
    /// Model identifier passed with every prompt
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_backend() -> OracleBackend {
    OracleBackend::Ollama
}

fn default_oracle_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "llama3".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            base_url: default_oracle_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResearchConfig {
    /// Consult the oracle for a neutral market analysis each step
    #[serde(default = "default_general_analyst")]
    pub general_analyst: bool,
}

fn default_general_analyst() -> bool {
    true
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            general_analyst: default_general_analyst(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily-rotated log files (stderr only when unset)
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("oracle.backend", "ollama")?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/ci.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("QUORUM_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (QUORUM_SIMULATION__STEPS, etc.)
            .add_source(
                Environment::with_prefix("QUORUM")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let sim = &self.simulation;

        if sim.steps == 0 {
            errors.push("simulation.steps must be positive".to_string());
        }

        if sim.price_floor <= 0.0 {
            errors.push("simulation.price_floor must be positive".to_string());
        }

        if sim.initial_price < sim.price_floor {
            errors.push(format!(
                "simulation.initial_price ({}) must be at least the price floor ({})",
                sim.initial_price, sim.price_floor
            ));
        }

        if sim.initial_cash < 0.0 {
            errors.push("simulation.initial_cash must not be negative".to_string());
        }

        if !(sim.max_step_change > 0.0 && sim.max_step_change.is_finite()) {
            errors.push("simulation.max_step_change must be a positive number".to_string());
        }

        if sim.decision_window < 2 {
            errors.push("simulation.decision_window must hold at least two prices".to_string());
        }

        if sim.snapshot_window == 0 {
            errors.push("simulation.snapshot_window must be positive".to_string());
        }

        if self.oracle.backend == OracleBackend::Ollama && self.oracle.base_url.is_empty() {
            errors.push("oracle.base_url is required for the ollama backend".to_string());
        }

        if self.oracle.model.trim().is_empty() {
            errors.push("oracle.model must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
