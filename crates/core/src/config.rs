use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::cohort::{DEFAULT_COHORT_MAX_MONTHS, DEFAULT_COHORT_WINDOW};
use crate::analytics::customers::{DEFAULT_CITY_LIMIT, DEFAULT_TOP_LIMIT};
use crate::dataset::customers::DEFAULT_CUSTOMER_COUNT;

pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["menulytics.toml", "config/menulytics.toml"];

const MAX_CUSTOMER_COUNT: usize = 100_000;
const MAX_COHORT_MONTHS: usize = 36;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub dataset: DatasetConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatasetConfig {
    pub customer_count: usize,
    /// Fixed seed for reproducible populations; a fresh one is drawn when unset.
    pub seed: Option<u64>,
    /// "Now" for retention and cohort math; today's UTC date when unset.
    pub reference_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportConfig {
    pub top_limit: usize,
    pub city_limit: usize,
    pub cohort_window: usize,
    pub cohort_max_months: usize,
    pub min_cohort_size: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub customer_count: Option<usize>,
    pub seed: Option<u64>,
    pub reference_date: Option<NaiveDate>,
    pub top_limit: Option<usize>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            report: ReportConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { customer_count: DEFAULT_CUSTOMER_COUNT, seed: None, reference_date: None }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_limit: DEFAULT_TOP_LIMIT,
            city_limit: DEFAULT_CITY_LIMIT,
            cohort_window: DEFAULT_COHORT_WINDOW,
            cohort_max_months: DEFAULT_COHORT_MAX_MONTHS,
            min_cohort_size: 1,
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch)?;
        } else if options.require_file {
            let expected = options
                .config_path
                .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) -> Result<(), ConfigError> {
        if let Some(dataset) = patch.dataset {
            if let Some(customer_count) = dataset.customer_count {
                self.dataset.customer_count = customer_count;
            }
            if let Some(seed) = dataset.seed {
                self.dataset.seed = Some(seed);
            }
            if let Some(reference_date) = dataset.reference_date {
                self.dataset.reference_date = Some(parse_date(&reference_date).ok_or_else(|| {
                    ConfigError::Validation(format!(
                        "dataset.reference_date must be a YYYY-MM-DD date, got `{reference_date}`"
                    ))
                })?);
            }
        }

        if let Some(report) = patch.report {
            if let Some(top_limit) = report.top_limit {
                self.report.top_limit = top_limit;
            }
            if let Some(city_limit) = report.city_limit {
                self.report.city_limit = city_limit;
            }
            if let Some(cohort_window) = report.cohort_window {
                self.report.cohort_window = cohort_window;
            }
            if let Some(cohort_max_months) = report.cohort_max_months {
                self.report.cohort_max_months = cohort_max_months;
            }
            if let Some(min_cohort_size) = report.min_cohort_size {
                self.report.min_cohort_size = min_cohort_size;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("MENULYTICS_DATASET_CUSTOMER_COUNT") {
            self.dataset.customer_count =
                parse_usize("MENULYTICS_DATASET_CUSTOMER_COUNT", &value)?;
        }
        if let Some(value) = read_env("MENULYTICS_DATASET_SEED") {
            self.dataset.seed = Some(parse_u64("MENULYTICS_DATASET_SEED", &value)?);
        }
        if let Some(value) = read_env("MENULYTICS_DATASET_REFERENCE_DATE") {
            let date = parse_date(&value).ok_or_else(|| ConfigError::InvalidEnvOverride {
                key: "MENULYTICS_DATASET_REFERENCE_DATE".to_string(),
                value: value.clone(),
            })?;
            self.dataset.reference_date = Some(date);
        }

        if let Some(value) = read_env("MENULYTICS_REPORT_TOP_LIMIT") {
            self.report.top_limit = parse_usize("MENULYTICS_REPORT_TOP_LIMIT", &value)?;
        }
        if let Some(value) = read_env("MENULYTICS_REPORT_CITY_LIMIT") {
            self.report.city_limit = parse_usize("MENULYTICS_REPORT_CITY_LIMIT", &value)?;
        }
        if let Some(value) = read_env("MENULYTICS_REPORT_COHORT_WINDOW") {
            self.report.cohort_window = parse_usize("MENULYTICS_REPORT_COHORT_WINDOW", &value)?;
        }
        if let Some(value) = read_env("MENULYTICS_REPORT_COHORT_MAX_MONTHS") {
            self.report.cohort_max_months =
                parse_usize("MENULYTICS_REPORT_COHORT_MAX_MONTHS", &value)?;
        }
        if let Some(value) = read_env("MENULYTICS_REPORT_MIN_COHORT_SIZE") {
            self.report.min_cohort_size =
                parse_usize("MENULYTICS_REPORT_MIN_COHORT_SIZE", &value)?;
        }

        let log_level =
            read_env("MENULYTICS_LOGGING_LEVEL").or_else(|| read_env("MENULYTICS_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("MENULYTICS_LOGGING_FORMAT").or_else(|| read_env("MENULYTICS_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(customer_count) = overrides.customer_count {
            self.dataset.customer_count = customer_count;
        }
        if let Some(seed) = overrides.seed {
            self.dataset.seed = Some(seed);
        }
        if let Some(reference_date) = overrides.reference_date {
            self.dataset.reference_date = Some(reference_date);
        }
        if let Some(top_limit) = overrides.top_limit {
            self.report.top_limit = top_limit;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dataset(&self.dataset)?;
        validate_report(&self.report)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_dataset(dataset: &DatasetConfig) -> Result<(), ConfigError> {
    if dataset.customer_count == 0 || dataset.customer_count > MAX_CUSTOMER_COUNT {
        return Err(ConfigError::Validation(format!(
            "dataset.customer_count must be in range 1..={MAX_CUSTOMER_COUNT}"
        )));
    }

    Ok(())
}

fn validate_report(report: &ReportConfig) -> Result<(), ConfigError> {
    if report.top_limit == 0 {
        return Err(ConfigError::Validation(
            "report.top_limit must be greater than zero".to_string(),
        ));
    }

    if report.city_limit == 0 {
        return Err(ConfigError::Validation(
            "report.city_limit must be greater than zero".to_string(),
        ));
    }

    if report.cohort_window == 0 || report.cohort_window > MAX_COHORT_MONTHS {
        return Err(ConfigError::Validation(format!(
            "report.cohort_window must be in range 1..={MAX_COHORT_MONTHS}"
        )));
    }

    if report.cohort_max_months == 0 || report.cohort_max_months > MAX_COHORT_MONTHS {
        return Err(ConfigError::Validation(format!(
            "report.cohort_max_months must be in range 1..={MAX_COHORT_MONTHS}"
        )));
    }

    if report.min_cohort_size == 0 {
        return Err(ConfigError::Validation(
            "report.min_cohort_size must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.trim().parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.trim().parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    dataset: Option<DatasetPatch>,
    report: Option<ReportPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct DatasetPatch {
    customer_count: Option<usize>,
    seed: Option<u64>,
    reference_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ReportPatch {
    top_limit: Option<usize>,
    city_limit: Option<usize>,
    cohort_window: Option<usize>,
    cohort_max_months: Option<usize>,
    min_cohort_size: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_describe_the_standard_dashboard() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(config.dataset.customer_count == 200, "default population is 200 customers")?;
        ensure(config.dataset.seed.is_none(), "seed should be unset by default")?;
        ensure(config.report.top_limit == 5, "default top limit is 5")?;
        ensure(config.report.city_limit == 4, "default city limit is 4")?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("TEST_MENULYTICS_SEED", "4242");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("menulytics.toml");
            fs::write(
                &path,
                r#"
[dataset]
seed = ${TEST_MENULYTICS_SEED}
reference_date = "2026-03-15"

[report]
cohort_window = 6
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.dataset.seed == Some(4242), "seed should be interpolated from env")?;
            ensure(
                config.dataset.reference_date == NaiveDate::from_ymd_opt(2026, 3, 15),
                "reference date should be parsed from file",
            )?;
            ensure(config.report.cohort_window == 6, "cohort window should come from file")?;
            Ok(())
        })();

        clear_vars(&["TEST_MENULYTICS_SEED"]);
        result
    }

    #[test]
    fn logging_env_aliases_are_supported() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MENULYTICS_LOG_LEVEL", "warn");
        env::set_var("MENULYTICS_LOG_FORMAT", "pretty");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.logging.level == "warn", "warning log level should be set from env var")?;
            ensure(
                matches!(config.logging.format, LogFormat::Pretty),
                "pretty logging format should be set from env var",
            )?;
            Ok(())
        })();

        clear_vars(&["MENULYTICS_LOG_LEVEL", "MENULYTICS_LOG_FORMAT"]);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MENULYTICS_DATASET_CUSTOMER_COUNT", "300");
        env::set_var("MENULYTICS_DATASET_SEED", "11");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("menulytics.toml");
            fs::write(
                &path,
                r#"
[dataset]
customer_count = 150
seed = 7

[report]
top_limit = 3

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    seed: Some(99),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(config.dataset.seed == Some(99), "override seed should win")?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(
                config.dataset.customer_count == 300,
                "env customer count should win over file and defaults",
            )?;
            ensure(config.report.top_limit == 3, "file top limit should win over defaults")?;
            Ok(())
        })();

        clear_vars(&["MENULYTICS_DATASET_CUSTOMER_COUNT", "MENULYTICS_DATASET_SEED"]);
        result
    }

    #[test]
    fn invalid_env_override_is_reported_with_key() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        env::set_var("MENULYTICS_DATASET_REFERENCE_DATE", "19/10/2026");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => return Err("expected env override failure".to_string()),
                Err(error) => error,
            };
            ensure(
                matches!(
                    error,
                    ConfigError::InvalidEnvOverride { ref key, .. }
                        if key == "MENULYTICS_DATASET_REFERENCE_DATE"
                ),
                "error should name the offending variable",
            )
        })();

        clear_vars(&["MENULYTICS_DATASET_REFERENCE_DATE"]);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let error = match AppConfig::load(LoadOptions {
            overrides: ConfigOverrides { top_limit: Some(0), ..ConfigOverrides::default() },
            ..LoadOptions::default()
        }) {
            Ok(_) => {
                return Err("expected validation failure but config load succeeded".to_string())
            }
            Err(error) => error,
        };
        let has_message = matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("report.top_limit")
        );
        ensure(has_message, "validation failure should mention report.top_limit")
    }

    #[test]
    fn missing_required_file_is_an_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("absent.toml");
        let result = AppConfig::load(LoadOptions {
            config_path: Some(path),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(_))),
            "missing required file should be reported",
        )
    }
}
