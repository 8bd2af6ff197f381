use std::env;
use std::fs;
use std::path::Path;

use menulytics_core::config::{resolve_config_path, AppConfig};
use menulytics_core::errors::ApplicationError;
use serde::Serialize;
use toml::Value;

use crate::commands::CommandResult;
use crate::GlobalArgs;

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

struct Field {
    key: &'static str,
    env_keys: &'static [&'static str],
    flag: Option<&'static str>,
}

const FIELDS: &[Field] = &[
    Field {
        key: "dataset.customer_count",
        env_keys: &["MENULYTICS_DATASET_CUSTOMER_COUNT"],
        flag: Some("--customers"),
    },
    Field { key: "dataset.seed", env_keys: &["MENULYTICS_DATASET_SEED"], flag: Some("--seed") },
    Field {
        key: "dataset.reference_date",
        env_keys: &["MENULYTICS_DATASET_REFERENCE_DATE"],
        flag: Some("--reference-date"),
    },
    Field { key: "report.top_limit", env_keys: &["MENULYTICS_REPORT_TOP_LIMIT"], flag: None },
    Field { key: "report.city_limit", env_keys: &["MENULYTICS_REPORT_CITY_LIMIT"], flag: None },
    Field {
        key: "report.cohort_window",
        env_keys: &["MENULYTICS_REPORT_COHORT_WINDOW"],
        flag: None,
    },
    Field {
        key: "report.cohort_max_months",
        env_keys: &["MENULYTICS_REPORT_COHORT_MAX_MONTHS"],
        flag: None,
    },
    Field {
        key: "report.min_cohort_size",
        env_keys: &["MENULYTICS_REPORT_MIN_COHORT_SIZE"],
        flag: None,
    },
    Field {
        key: "logging.level",
        env_keys: &["MENULYTICS_LOGGING_LEVEL", "MENULYTICS_LOG_LEVEL"],
        flag: None,
    },
    Field {
        key: "logging.format",
        env_keys: &["MENULYTICS_LOGGING_FORMAT", "MENULYTICS_LOG_FORMAT"],
        flag: None,
    },
];

pub fn run(global: &GlobalArgs) -> CommandResult {
    let config = match AppConfig::load(global.load_options()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", &ApplicationError::from(error)),
    };

    let config_file_path = resolve_config_path(global.config.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let entries = FIELDS
        .iter()
        .map(|field| ConfigEntry {
            key: field.key,
            value: field_value(&config, field.key),
            source: field_source(
                field,
                global,
                config_file_doc.as_ref(),
                config_file_path.as_deref(),
            ),
        })
        .collect::<Vec<_>>();

    CommandResult::report(
        "config",
        "effective config (source precedence: flag > env > file > default)",
        &entries,
    )
}

fn field_value(config: &AppConfig, key: &str) -> String {
    match key {
        "dataset.customer_count" => config.dataset.customer_count.to_string(),
        "dataset.seed" => {
            config.dataset.seed.map(|seed| seed.to_string()).unwrap_or_else(|| "<random>".into())
        }
        "dataset.reference_date" => config
            .dataset
            .reference_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "<today>".into()),
        "report.top_limit" => config.report.top_limit.to_string(),
        "report.city_limit" => config.report.city_limit.to_string(),
        "report.cohort_window" => config.report.cohort_window.to_string(),
        "report.cohort_max_months" => config.report.cohort_max_months.to_string(),
        "report.min_cohort_size" => config.report.min_cohort_size.to_string(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format).to_lowercase(),
        _ => "<unknown>".to_string(),
    }
}

fn flag_is_set(flag: &str, global: &GlobalArgs) -> bool {
    match flag {
        "--customers" => global.customers.is_some(),
        "--seed" => global.seed.is_some(),
        "--reference-date" => global.reference_date.is_some(),
        _ => false,
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    field: &Field,
    global: &GlobalArgs,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(flag) = field.flag.filter(|flag| flag_is_set(flag, global)) {
        return format!("flag ({flag})");
    }

    if let Some(env_key) = field.env_keys.iter().find(|key| env_is_set(key)) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, field.key) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

/// Blank values are ignored by the loader, so they do not count as a source.
fn env_is_set(key: &str) -> bool {
    env::var(key).is_ok_and(|value| !value.trim().is_empty())
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
