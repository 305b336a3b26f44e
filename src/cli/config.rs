use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::boundary::envelope::Environment;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "element-suggest",
    version,
    about = "AI-backed element suggestion engine for web automation"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Model API endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Model name
    #[arg(long, global = true)]
    pub model: Option<String>,

    /// Path to config file (default: element-suggest.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a page description and print ranked element suggestions
    Suggest {
        /// Path to a JSON page description
        #[arg(long)]
        input: String,

        /// Path to a JSON suggestion-options object
        #[arg(long)]
        options: Option<String>,

        /// Analyzer backend: ollama, mock, or none (heuristic only)
        #[arg(long, default_value = "ollama")]
        analyzer: String,
    },

    /// Validate a page description's structure without classifying
    Validate {
        /// Path to a JSON page description
        #[arg(long)]
        input: String,
    },

    /// Print the primary/fallback capability descriptor
    Models,

    /// Print the service health descriptor
    Health,
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `element-suggest.yaml`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    /// When false, every request takes the heuristic path
    #[serde(default = "default_true")]
    pub enabled: bool,

    pub endpoint: Option<String>,
    pub model: Option<String>,

    /// Name of the environment variable holding the API key, if the
    /// endpoint requires one
    pub api_key_env: Option<String>,

    #[serde(default = "default_ai_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: None,
            model: None,
            api_key_env: None,
            timeout_ms: default_ai_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Hard wall-clock budget per request
    #[serde(default = "default_budget_ms")]
    pub request_budget_ms: u64,

    #[serde(default)]
    pub environment: Environment,

    #[serde(default = "default_trace_file")]
    pub trace_file: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            request_budget_ms: default_budget_ms(),
            environment: Environment::default(),
            trace_file: default_trace_file(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_max_requests")]
    pub max_requests: u32,

    #[serde(default = "default_window_secs")]
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: default_max_requests(),
            window_secs: default_window_secs(),
        }
    }
}

// Serde default helpers
fn default_true() -> bool { true }
fn default_ai_timeout_ms() -> u64 { 10_000 }
fn default_budget_ms() -> u64 { 18_000 }
fn default_max_requests() -> u32 { 60 }
fn default_window_secs() -> u64 { 60 }
fn default_trace_file() -> String { "suggest_trace.jsonl".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("element-suggest.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}
