//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config get`: Print a single value
//! - `config set`: Validate and store a value

use owo_colors::{OwoColorize, Stream};
use serde_json::json;

use super::CommandOutput;
use crate::cli::OutputOptions;
use crate::config::{Config, USER_ENV_VAR};
use crate::error::Result;

/// Accept `default-sort` as a spelling of `default_sort`.
fn normalize_config_key(key: &str) -> String {
    key.trim().to_lowercase().replace('-', "_")
}

fn key_label(key: &str) -> String {
    key.if_supports_color(Stream::Stdout, |s| s.cyan())
        .to_string()
}

/// Show current configuration
pub fn cmd_config_show(output: OutputOptions) -> Result<()> {
    let config = Config::load()?;
    let env_user = std::env::var(USER_ENV_VAR).ok().filter(|u| !u.trim().is_empty());

    let json_output = json!({
        "user": config.user,
        "user_override": env_user,
        "default_sort": config.default_sort,
        "priorities": config.priorities,
        "trend_capacity": config.trend_capacity,
        "config_file": Config::config_path().to_string_lossy(),
    });

    let not_set = |value: Option<&str>| match value {
        Some(v) => v.to_string(),
        None => "not set"
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    };

    let mut text = String::new();
    text.push_str(&format!("{}: {}\n", key_label("user"), not_set(config.user.as_deref())));
    if let Some(user) = &env_user {
        text.push_str(&format!("  (overridden by {USER_ENV_VAR}={user})\n"));
    }
    text.push_str(&format!(
        "{}: {}\n",
        key_label("default_sort"),
        not_set(config.default_sort.as_deref())
    ));
    text.push_str(&format!(
        "{}: {}\n",
        key_label("priorities"),
        config.priorities.join(", ")
    ));
    text.push_str(&format!(
        "{}: {}\n\n",
        key_label("trend_capacity"),
        config.trend_capacity
    ));
    text.push_str(
        &format!("Config file: {}", Config::config_path().display())
            .if_supports_color(Stream::Stdout, |s| s.dimmed())
            .to_string(),
    );

    CommandOutput::new(json_output).with_text(text).print(output)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output: OutputOptions) -> Result<()> {
    let key = normalize_config_key(key);
    let mut config = Config::load()?;
    config.set(&key, value)?;
    config.save()?;

    let stored = config.get(&key)?;
    tracing::info!(key = %key, value = %stored, "updated configuration");

    CommandOutput::new(json!({
        "action": "config_set",
        "key": key,
        "value": stored,
        "success": true,
    }))
    .with_text(format!("Set {} to {stored}", key_label(&key)))
    .print(output)
}

/// Get a specific configuration value
pub fn cmd_config_get(key: &str, output: OutputOptions) -> Result<()> {
    let key = normalize_config_key(key);
    let config = Config::load()?;
    let value = config.get(&key)?;

    CommandOutput::new(json!({
        "key": key,
        "value": value,
    }))
    .with_text(value)
    .print(output)
}
