//! Command-line arguments and one-shot evaluation.

use crate::eval::{evaluate, EvalError};
use crate::format::format_result;
use crate::settings::{Settings, SettingsStore, DEFAULT_SETTINGS_FILE, MAX_PRECISION};
use clap::Parser;
use std::path::PathBuf;
use tracing::warn;

/// Evaluate simple expressions such as `2 + 2`, `sqrt 9` or `2 ^ 3`.
#[derive(Parser, Debug)]
#[command(name = "pcalc", version)]
pub struct Args {
    /// Settings file to load and save
    #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
    pub config: PathBuf,

    /// Override the number of decimal places for this run
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_PRECISION)))]
    pub precision: Option<u32>,

    /// Expression to evaluate once; starts the interactive prompt when absent
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub expression: Vec<String>,
}

impl Args {
    pub fn expression(&self) -> Option<String> {
        if self.expression.is_empty() {
            None
        } else {
            Some(self.expression.join(" "))
        }
    }
}

/// Stored settings, or the defaults when the file is missing or unreadable,
/// with `precision` applied on top.
pub fn one_shot_settings(store: &SettingsStore, precision: Option<u32>) -> Settings {
    let mut settings = match store.load() {
        Ok(settings) => settings.unwrap_or_default(),
        Err(err) => {
            warn!(error = %err, "using default settings");
            Settings::default()
        }
    };
    if let Some(precision) = precision {
        settings.precision = precision.min(MAX_PRECISION);
    }
    settings
}

/// Evaluates `input` once without prompting and returns the formatted result.
pub fn evaluate_once(
    input: &str,
    store: &SettingsStore,
    precision: Option<u32>,
) -> Result<String, EvalError> {
    let settings = one_shot_settings(store, precision);
    let value = evaluate(input, &settings)?;
    Ok(format_result(value, settings.precision))
}
