use parley_core::{ConnectorConfig, ParserConfig, SkillConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// Root configuration, mapped from to `parley.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParleyConfig {
    pub logging: LoggingConfig,
    pub connectors: Vec<ConnectorConfig>,
    pub parsers: Vec<ParserConfig>,
    pub skills: Vec<SkillConfig>,
}

impl Default for ParleyConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            connectors: vec![ConnectorConfig::named("shell")],
            parsers: vec![ParserConfig::named("regex")],
            skills: Vec::new(),
        }
    }
}

impl ParleyConfig {
    /// Config for the skill named `name`, or an empty one.
    pub fn skill(&self, name: &str) -> SkillConfig {
        self.skills
            .iter()
            .find(|s| s.name == name)
            .cloned()
            .unwrap_or_else(|| SkillConfig::named(name))
    }

    pub fn parser(&self, name: &str) -> Option<&ParserConfig> {
        self.parsers.iter().find(|p| p.name == name)
    }
}

// ── Logging ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Output format: "pretty", "json", "compact".
    pub format: String,
    /// Log file path (None = stderr only).
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
            file: None,
        }
    }
}

pub const CONNECTOR_TYPES: &[&str] = &["shell", "loopback"];
pub const PARSER_NAMES: &[&str] = &["witai", "regex"];

// ── Validation ─────────────────────────────────────────────────

/// A single config validation issue.
#[derive(Debug)]
pub struct ConfigWarning {
    pub field: String,
    pub message: String,
    pub severity: WarningSeverity,
    pub hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.severity {
            WarningSeverity::Error => "error",
            WarningSeverity::Warning => "warning",
            WarningSeverity::Info => "info",
        };
        write!(f, "{}: {}: {}", label, self.field, self.message)?;
        if let Some(ref h) = self.hint {
            write!(f, "\n   ↳ {}", h)?;
        }
        Ok(())
    }
}

impl ParleyConfig {
    /// Validate the config and return a list of warnings/errors.
    /// Returns `Err` with all messages joined if any severity is Error.
    pub fn validate(&self) -> Result<Vec<ConfigWarning>, String> {
        let mut warnings = Vec::new();

        // ── Connectors ───
        if self.connectors.is_empty() {
            warnings.push(ConfigWarning {
                field: "connectors".into(),
                message: "no connectors configured, the bot cannot receive messages".into(),
                severity: WarningSeverity::Warning,
                hint: Some("Add a [[connectors]] entry, e.g. name = \"shell\"".into()),
            });
        }

        let mut seen = HashSet::new();
        for (i, connector) in self.connectors.iter().enumerate() {
            if connector.name.is_empty() {
                warnings.push(ConfigWarning {
                    field: format!("connectors[{i}].name"),
                    message: "connector name is empty".into(),
                    severity: WarningSeverity::Error,
                    hint: None,
                });
                continue;
            }
            if !seen.insert(connector.name.as_str()) {
                warnings.push(ConfigWarning {
                    field: format!("connectors.{}", connector.name),
                    message: format!("duplicate connector name '{}'", connector.name),
                    severity: WarningSeverity::Error,
                    hint: Some("Connector names must be unique; use `type` to run two of a kind".into()),
                });
            }
            if let Err(e) = connector.validate() {
                warnings.push(ConfigWarning {
                    field: format!("connectors.{}", connector.name),
                    message: e.to_string(),
                    severity: WarningSeverity::Error,
                    hint: Some("Delays are seconds: a number or [min, max] with 0 <= min <= max".into()),
                });
            }
            if !CONNECTOR_TYPES.contains(&connector.kind()) {
                warnings.push(ConfigWarning {
                    field: format!("connectors.{}.type", connector.name),
                    message: format!("unknown connector type '{}'", connector.kind()),
                    severity: WarningSeverity::Warning,
                    hint: Some(format!("Supported: {}", CONNECTOR_TYPES.join(", "))),
                });
            }
        }

        // ── Parsers ───
        for parser in &self.parsers {
            if let Err(e) = parser.validate() {
                warnings.push(ConfigWarning {
                    field: format!("parsers.{}.min-score", parser.name),
                    message: e.to_string(),
                    severity: WarningSeverity::Error,
                    hint: Some("min-score is a confidence between 0.0 and 1.0".into()),
                });
            }
            if !PARSER_NAMES.contains(&parser.name.as_str()) {
                warnings.push(ConfigWarning {
                    field: format!("parsers.{}", parser.name),
                    message: format!("unknown parser '{}'", parser.name),
                    severity: WarningSeverity::Warning,
                    hint: Some(format!("Supported: {}", PARSER_NAMES.join(", "))),
                });
            }
            if parser.name == "witai" && parser.enabled && parser.access_token.is_none() {
                warnings.push(ConfigWarning {
                    field: "parsers.witai.access-token".into(),
                    message: "no access-token, wit.ai will never match".into(),
                    severity: WarningSeverity::Warning,
                    hint: Some("Set access-token or WITAI_ACCESS_TOKEN".into()),
                });
            }
        }

        // ── Logging format ───
        let valid_formats = ["pretty", "json", "compact"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.format".into(),
                message: format!("unknown log format '{}'", self.logging.format),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_formats.join(", "))),
            });
        }

        // ── Logging level ───
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            warnings.push(ConfigWarning {
                field: "logging.level".into(),
                message: format!("unknown log level '{}'", self.logging.level),
                severity: WarningSeverity::Warning,
                hint: Some(format!("Valid values: {}", valid_levels.join(", "))),
            });
        }

        // Check for hard errors
        let errors: Vec<String> = warnings
            .iter()
            .filter(|w| w.severity == WarningSeverity::Error)
            .map(|w| format!("{}: {}", w.field, w.message))
            .collect();

        if !errors.is_empty() {
            return Err(format!("Configuration errors:\n  • {}", errors.join("\n  • ")));
        }

        Ok(warnings)
    }
}
