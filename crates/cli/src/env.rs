use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use analyzer::thresholds::{DEFAULT_MAX_DOCS_PER_RETURNED, DEFAULT_SLOW_QUERY_MS};
use tracing::debug;

use crate::error::CliError;

pub const ENV_SLOW_QUERY_MS: &str = "PLANSCOPE_SLOW_QUERY_MS";
pub const ENV_MAX_DOCS_PER_RETURNED: &str = "PLANSCOPE_MAX_DOCS_PER_RETURNED";
pub const ENV_LOG_LEVEL: &str = "PLANSCOPE_LOG_LEVEL";

const ENV_FILE_NAME: &str = ".env";
const APP_DIR: &str = "planscope";

/// Resolved tool configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub slow_query_ms: u64,
    pub max_docs_per_returned: f64,
    pub log_level: String,
}

/// Environment variable manager that loads from system and .env files
#[derive(Debug, Clone)]
pub struct EnvManager {
    vars: HashMap<String, String>,
    loaded_from: Option<PathBuf>,
}

impl EnvManager {
    pub fn new() -> Self {
        Self {
            vars: std::env::vars().collect(),
            loaded_from: None,
        }
    }

    /// System environment plus the first `.env` file found: the explicit path,
    /// then the working directory, then `<config_dir>/planscope/.env`.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, CliError> {
        let mut env = Self::new();

        if let Some(path) = explicit {
            env.load_from_file(path)?;
            return Ok(env);
        }

        let candidates = [
            Some(PathBuf::from(ENV_FILE_NAME)),
            dirs::config_dir().map(|dir| dir.join(APP_DIR).join(ENV_FILE_NAME)),
        ];
        if let Some(path) = candidates.into_iter().flatten().find(|p| p.is_file()) {
            env.load_from_file(&path)?;
        }

        Ok(env)
    }

    /// Load variables from a .env file. File values override system ones.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            CliError::Config(format!("Failed to read env file {}: {}", path.display(), e))
        })?;

        self.parse_env_content(&content)?;
        self.loaded_from = Some(path.to_path_buf());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn loaded_from(&self) -> Option<&Path> {
        self.loaded_from.as_deref()
    }

    pub fn settings(&self) -> Result<Settings, CliError> {
        let settings = Settings {
            slow_query_ms: self.parse_or(ENV_SLOW_QUERY_MS, DEFAULT_SLOW_QUERY_MS)?,
            max_docs_per_returned: self
                .parse_or(ENV_MAX_DOCS_PER_RETURNED, DEFAULT_MAX_DOCS_PER_RETURNED)?,
            log_level: self.get(ENV_LOG_LEVEL).unwrap_or("info").to_string(),
        };
        debug!("Resolved settings: {settings:?}");
        Ok(settings)
    }

    fn parse_or<T: std::str::FromStr>(&self, key: &str, default: T) -> Result<T, CliError> {
        match self.get(key).map(str::trim) {
            None | Some("") => Ok(default),
            Some(raw) => raw
                .parse()
                .map_err(|_| CliError::Config(format!("Invalid value for {key}: `{raw}`"))),
        }
    }

    fn parse_env_content(&mut self, content: &str) -> Result<(), CliError> {
        for (line_num, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            // Parse KEY=VALUE format
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();

                if key.is_empty() {
                    return Err(CliError::Config(format!(
                        "Invalid env file: empty key at line {}",
                        line_num + 1
                    )));
                }

                self.vars.insert(key.to_string(), Self::unquote_value(value));
            } else {
                return Err(CliError::Config(format!(
                    "Invalid env file: malformed line {} (expected KEY=VALUE)",
                    line_num + 1
                )));
            }
        }

        Ok(())
    }

    fn unquote_value(value: &str) -> String {
        let value = value.trim();

        for quote in ['"', '\''] {
            if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
                return value[1..value.len() - 1].to_string();
            }
        }

        value.to_string()
    }
}

impl Default for EnvManager {
    fn default() -> Self {
        Self::new()
    }
}
