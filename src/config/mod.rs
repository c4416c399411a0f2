pub mod bot;
pub mod database;
pub mod telegram;
pub mod unban;

use std::env;
use std::str::FromStr;

fn required_env<T: FromStr>(var_name: &str) -> anyhow::Result<T> {
    let raw = env::var(var_name)
        .map_err(|_| anyhow::anyhow!("{} environment variable must be set", var_name))?;
    raw.trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("{} has an invalid value: '{}'", var_name, raw))
}

fn parse_env_or<T: FromStr>(var_name: &str, default: T) -> T {
    env::var(var_name)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool_env(var_name: &str, default: bool) -> bool {
    env::var(var_name)
        .ok()
        .and_then(|value| parse_bool(&value))
        .unwrap_or(default)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
