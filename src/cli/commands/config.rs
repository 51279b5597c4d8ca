//! Config command handler

use crate::args::ConfigSubcommand;
use credit_checker::config::Config;
use credit_checker::error;
use std::io::{self, BufRead, Write};

/// Keys accepted by `config get|set|unset`
const KEYS: [&str; 7] = [
    "level",
    "file",
    "verbose",
    "catalog_dir",
    "cache_ttl",
    "cross_list",
    "reports_dir",
];

/// Dispatch config subcommands
pub fn run(subcommand: Option<ConfigSubcommand>, config: &mut Config, defaults: &Config) {
    let outcome = match subcommand {
        None => {
            println!("\n=== Configuration ===\n");
            print!("{config}");
            return;
        }
        Some(ConfigSubcommand::Get { key: None }) => {
            print!("{config}");
            return;
        }
        Some(ConfigSubcommand::Get { key: Some(key) }) => get_value(config, &key).map(|value| {
            println!("{value}");
        }),
        Some(ConfigSubcommand::Set { key, value }) => set_value(config, &key, &value)
            .and_then(|()| save(config))
            .map(|()| println!("✓ Set {key} = {value}")),
        Some(ConfigSubcommand::Unset { key }) => config
            .unset(&key, defaults)
            .and_then(|()| save(config))
            .map(|()| println!("✓ Reset {key} to default")),
        Some(ConfigSubcommand::Reset) => {
            reset_with_confirmation(io::stdin().lock());
            return;
        }
    };

    if let Err(e) = outcome {
        error!("{e}");
        eprintln!("✗ {e}");
        std::process::exit(1);
    }
}

/// Look up one key, listing the valid keys when it is unknown
///
/// # Errors
/// Returns a message naming the accepted keys
pub fn get_value(config: &Config, key: &str) -> Result<String, String> {
    config
        .get(key)
        .ok_or_else(|| format!("Unknown config key: '{key}' (expected one of: {})", KEYS.join(", ")))
}

/// Validate and store one value in memory
///
/// # Errors
/// Returns the validation message from [`Config::set`]
pub fn set_value(config: &mut Config, key: &str, value: &str) -> Result<(), String> {
    config.set(key, value.trim())
}

fn save(config: &Config) -> Result<(), String> {
    config
        .save()
        .map_err(|e| format!("Failed to save config: {e}"))
}

/// Whether a confirmation answer means yes
#[must_use]
pub fn is_yes(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

fn reset_with_confirmation<R: BufRead>(mut input: R) {
    if !Config::get_config_file_path().exists() {
        println!("✓ Config is already at defaults");
        return;
    }

    print!("Are you sure you want to reset config to defaults? (y/n): ");
    io::stdout().flush().ok();

    let mut response = String::new();
    input.read_line(&mut response).ok();
    if !is_yes(&response) {
        println!("✗ Reset cancelled");
        return;
    }

    match Config::reset() {
        Ok(()) => println!("✓ Config reset to defaults"),
        Err(e) => {
            error!("Failed to remove config file: {e}");
            eprintln!("✗ Failed to remove config file: {e}");
            std::process::exit(1);
        }
    }
}
