//! Linter configuration.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use semver::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use solint_parser::{is_supported, latest_version};

use crate::{LinterError, Severity};

const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Result<Validator, String>> = OnceLock::new();

/// Configuration file names, in lookup order.
pub const CONFIG_FILES: &[&str] = &[".solint.jsonc", ".solint.json"];

/// Configuration for the linter and the language server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinterConfig {
    /// Editor language id of documents to lint.
    #[serde(default = "default_language_id")]
    pub language_id: String,

    /// Version used when a file declares no usable pragma.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_version: Option<String>,

    /// Per-rule settings, keyed by rule id.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,

    #[serde(default)]
    pub debounce: DebounceConfig,

    /// Runs debounced analyses immediately.
    #[serde(default)]
    pub test_mode: bool,

    /// File patterns to include.
    #[serde(default)]
    pub include: Vec<String>,

    /// File patterns to exclude.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_language_id() -> String {
    "solidity".to_string()
}

/// Setting for a single rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// `true` or `false`.
    Enabled(bool),
    /// `"off"` or a severity name.
    Severity(String),
}

impl RuleSetting {
    pub fn is_enabled(&self) -> bool {
        match self {
            RuleSetting::Enabled(enabled) => *enabled,
            RuleSetting::Severity(s) => s != "off",
        }
    }

    /// The severity override, if the setting names one.
    pub fn severity(&self) -> Option<Severity> {
        match self {
            RuleSetting::Enabled(_) => None,
            RuleSetting::Severity(s) => Severity::from_name(s),
        }
    }
}

/// Debounce waits in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    #[serde(default = "default_analyse_wait")]
    pub analyse: u64,
    #[serde(default = "default_validate_wait")]
    pub validate: u64,
}

fn default_analyse_wait() -> u64 {
    240
}

fn default_validate_wait() -> u64 {
    250
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            analyse: default_analyse_wait(),
            validate: default_validate_wait(),
        }
    }
}

impl LinterConfig {
    /// Creates a configuration with every default.
    pub fn new() -> Self {
        Self {
            language_id: default_language_id(),
            default_version: None,
            rules: BTreeMap::new(),
            debounce: DebounceConfig::default(),
            test_mode: false,
            include: Vec::new(),
            exclude: Vec::new(),
            base_dir: None,
        }
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.solint.jsonc` and `.solint.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LinterError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| LinterError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;
        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses JSON with comments and validates it against the schema.
    pub fn from_json(json: &str) -> Result<Self, LinterError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| LinterError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or(Value::Object(Map::new()));

        let schema = CONFIG_SCHEMA
            .get_or_init(compile_schema)
            .as_ref()
            .map_err(|e| LinterError::config(format!("Invalid config schema: {}", e)))?;

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(LinterError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| LinterError::config(format!("Invalid config: {}", e)))
    }

    /// Finds the configuration file in `dir`, if any.
    pub fn discover(dir: &Path) -> Option<PathBuf> {
        CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads the configuration file in `dir`, or the defaults.
    pub fn load_from_dir(dir: &Path) -> Result<Self, LinterError> {
        match Self::discover(dir) {
            Some(path) => Self::from_file(path),
            None => Ok(Self::new()),
        }
    }

    /// The fallback version, checked against the supported catalogue.
    pub fn default_version(&self) -> Result<Version, LinterError> {
        let Some(raw) = &self.default_version else {
            return Ok(latest_version().clone());
        };

        let version = Version::parse(raw)
            .map_err(|e| LinterError::config(format!("Invalid defaultVersion '{}': {}", raw, e)))?;
        if !is_supported(&version) {
            return Err(LinterError::config(format!(
                "Unsupported defaultVersion '{}'",
                raw
            )));
        }
        Ok(version)
    }

    /// Whether `rule_id` runs. Rules are on unless configured off.
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        self.rules
            .get(rule_id)
            .is_none_or(RuleSetting::is_enabled)
    }

    pub fn analyse_wait(&self) -> Duration {
        self.wait(self.debounce.analyse)
    }

    pub fn validate_wait(&self) -> Duration {
        self.wait(self.debounce.validate)
    }

    fn wait(&self, millis: u64) -> Duration {
        if self.test_mode {
            Duration::ZERO
        } else {
            Duration::from_millis(millis)
        }
    }
}

impl Default for LinterConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_schema() -> Result<Validator, String> {
    let schema_json: Value = serde_json::from_str(SCHEMA_JSON).map_err(|e| e.to_string())?;
    Validator::new(&schema_json).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::tempdir;

    #[test]
    fn test_config_new() {
        let config = LinterConfig::new();
        assert_eq!(config.language_id, "solidity");
        assert!(config.rules.is_empty());
        assert_eq!(config.debounce, DebounceConfig { analyse: 240, validate: 250 });
        assert!(!config.test_mode);
    }

    #[test]
    fn test_config_from_jsonc() {
        let json = r#"{
            // trailing comments and commas are fine
            "languageId": "solidity",
            "defaultVersion": "0.8.19",
            "rules": {
                "no-unsized-uint": "error",
                "no-shadowing-field": false,
            },
            "debounce": { "analyse": 100 },
            "exclude": ["lib/**"],
        }"#;

        let config = LinterConfig::from_json(json).unwrap();
        assert_eq!(config.default_version().unwrap(), Version::new(0, 8, 19));
        assert_eq!(
            config.rules.get("no-unsized-uint"),
            Some(&RuleSetting::Severity("error".to_string()))
        );
        assert!(!config.is_rule_enabled("no-shadowing-field"));
        assert!(config.is_rule_enabled("unconfigured"));
        assert_eq!(config.debounce, DebounceConfig { analyse: 100, validate: 250 });
        assert_eq!(config.exclude, ["lib/**"]);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(LinterConfig::from_json("").unwrap(), LinterConfig::new());
        assert_eq!(LinterConfig::from_json("{}").unwrap(), LinterConfig::new());
    }

    #[rstest]
    #[case(RuleSetting::Enabled(true), true, None)]
    #[case(RuleSetting::Enabled(false), false, None)]
    #[case(RuleSetting::Severity("off".to_string()), false, None)]
    #[case(RuleSetting::Severity("hint".to_string()), true, Some(Severity::Hint))]
    fn test_rule_setting(
        #[case] setting: RuleSetting,
        #[case] enabled: bool,
        #[case] severity: Option<Severity>,
    ) {
        assert_eq!(setting.is_enabled(), enabled);
        assert_eq!(setting.severity(), severity);
    }

    #[test]
    fn test_waits() {
        let mut config = LinterConfig::new();
        assert_eq!(config.analyse_wait(), Duration::from_millis(240));
        assert_eq!(config.validate_wait(), Duration::from_millis(250));

        config.test_mode = true;
        assert_eq!(config.analyse_wait(), Duration::ZERO);
        assert_eq!(config.validate_wait(), Duration::ZERO);
    }

    #[rstest]
    #[case::unknown_property(r#"{ "rulez": {} }"#, "Config validation failed")]
    #[case::type_mismatch(r#"{ "testMode": "yes" }"#, "Config validation failed")]
    #[case::invalid_severity(r#"{ "rules": { "no-unsized-uint": "fatal" } }"#, "Config validation failed")]
    #[case::negative_wait(r#"{ "debounce": { "validate": -1 } }"#, "Config validation failed")]
    #[case::bad_version_shape(r#"{ "defaultVersion": "latest" }"#, "Config validation failed")]
    #[case::not_json(r#"{ "rules": "#, "Invalid JSON")]
    fn test_config_validation_errors(#[case] json: &str, #[case] expected_error_part: &str) {
        let err = LinterConfig::from_json(json).unwrap_err();
        assert!(
            err.to_string().contains(expected_error_part),
            "Error message '{}' should contain '{}'",
            err,
            expected_error_part
        );
    }

    #[test]
    fn test_unsupported_default_version() {
        let config = LinterConfig::from_json(r#"{ "defaultVersion": "0.3.0" }"#).unwrap();
        let err = config.default_version().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Unsupported defaultVersion '0.3.0'"
        );
    }

    #[test]
    fn test_discover_prefers_jsonc() {
        let dir = tempdir().unwrap();
        assert_eq!(LinterConfig::discover(dir.path()), None);

        fs::write(dir.path().join(".solint.json"), "{}").unwrap();
        assert_eq!(
            LinterConfig::discover(dir.path()),
            Some(dir.path().join(".solint.json"))
        );

        fs::write(dir.path().join(".solint.jsonc"), r#"{ "testMode": true }"#).unwrap();
        assert_eq!(
            LinterConfig::discover(dir.path()),
            Some(dir.path().join(".solint.jsonc"))
        );

        let config = LinterConfig::load_from_dir(dir.path()).unwrap();
        assert!(config.test_mode);
        assert_eq!(config.base_dir.as_deref(), Some(dir.path()));
    }
}
