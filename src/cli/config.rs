use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::browser::twitter::ClientTiming;
use crate::error::AuditError;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "follow-audit",
    version,
    about = "Report followed accounts that do not follow back"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: follow-audit.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in, harvest both relationship lists, and report unfollowers
    Audit {},
}

// ============================================================================
// Config File Model (YAML)
// ============================================================================

/// YAML config file: `follow-audit.yaml`.
///
/// Credentials live here and only here — never in flags or the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub account: AccountConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub trace: TraceConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl AccountConfig {
    /// Validated credentials, or an actionable error naming the file and keys
    /// to add.
    pub fn credentials(&self) -> Result<(String, String), AuditError> {
        let username = self
            .username
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                AuditError::ConfigInvalid(
                    "no username configured; add `account.username` to follow-audit.yaml \
                     (e.g. username: SOMEUSERNAME)"
                        .into(),
                )
            })?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                AuditError::ConfigInvalid(
                    "no password configured; add `account.password` to follow-audit.yaml \
                     (e.g. password: SOMEPASSWORD)"
                        .into(),
                )
            })?;
        Ok((username.to_string(), password.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Full page navigation settle, milliseconds
    #[serde(default = "default_page_load_ms")]
    pub page_load_ms: u64,

    /// Nearby-rows settle after a scroll advance, milliseconds
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Dropdown/menu settle, milliseconds
    #[serde(default = "default_menu_ms")]
    pub menu_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            page_load_ms: 4000,
            settle_ms: 500,
            menu_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Path to the Node.js browser server script
    #[serde(default = "default_server_script")]
    pub server_script: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            server_script: "node/browser_server.js".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    /// JSONL trace file; null disables tracing
    #[serde(default = "default_trace_file")]
    pub file: Option<String>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            file: Some("audit_trace.jsonl".to_string()),
        }
    }
}

// Serde default helpers
fn default_page_load_ms() -> u64 {
    4000
}
fn default_settle_ms() -> u64 {
    500
}
fn default_menu_ms() -> u64 {
    1000
}
fn default_server_script() -> String {
    "node/browser_server.js".to_string()
}
fn default_trace_file() -> Option<String> {
    Some("audit_trace.jsonl".to_string())
}

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = path.unwrap_or("follow-audit.yaml");
    match std::fs::read_to_string(config_path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_default(),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Config Builders
// ============================================================================

/// Build the client timing struct from the config's timing section.
pub fn build_client_timing(timing: &TimingConfig) -> ClientTiming {
    ClientTiming {
        page_load_ms: timing.page_load_ms,
        settle_ms: timing.settle_ms,
        menu_ms: timing.menu_ms,
    }
}
