pub mod cohorts;
pub mod config;
pub mod customers;
pub mod menu;
pub mod profiles;

use menulytics_core::config::{AppConfig, LoadOptions};
use menulytics_core::dataset::Dataset;
use menulytics_core::domain::platform::PlatformFilter;
use menulytics_core::errors::{ApplicationError, DomainError};
use serde::Serialize;
use serde_json::Value;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_INVALID_INPUT: u8 = 3;
const EXIT_SERIALIZATION: u8 = 1;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl CommandResult {
    /// Successful outcome carrying a structured report under `data`.
    pub fn report(command: &str, message: impl Into<String>, data: &impl Serialize) -> Self {
        let data = match serde_json::to_value(data) {
            Ok(data) => data,
            Err(error) => {
                return Self::failure(
                    command,
                    "serialization",
                    format!("could not encode report: {error}"),
                    EXIT_SERIALIZATION,
                );
            }
        };

        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data: Some(data),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: None,
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        let exit_code = match error {
            ApplicationError::Domain(_) => EXIT_INVALID_INPUT,
            ApplicationError::Configuration(_) => EXIT_CONFIG,
        };
        Self::failure(
            command,
            error.error_class(),
            format!("{error}. {}", error.user_message()),
            exit_code,
        )
    }
}

/// Loads configuration and builds the dataset every report command reads from.
pub(crate) fn load_dataset(
    command: &str,
    options: LoadOptions,
) -> Result<(AppConfig, Dataset), CommandResult> {
    let config = AppConfig::load(options)
        .map_err(|error| CommandResult::from_error(command, &ApplicationError::from(error)))?;
    let dataset = Dataset::generate(&config.dataset);
    Ok((config, dataset))
}

pub(crate) fn parse_input<T>(
    command: &str,
    raw: Option<&str>,
) -> Result<Option<T>, CommandResult>
where
    T: std::str::FromStr<Err = DomainError>,
{
    raw.map(str::parse::<T>)
        .transpose()
        .map_err(|error| CommandResult::from_error(command, &ApplicationError::from(error)))
}

pub(crate) fn parse_platform(
    command: &str,
    raw: Option<&str>,
) -> Result<PlatformFilter, CommandResult> {
    parse_input::<PlatformFilter>(command, raw).map(Option::unwrap_or_default)
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
