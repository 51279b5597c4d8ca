//! CLI argument definitions for `CreditChecker`

use clap::{builder::BoolishValueParser, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use credit_checker::config::ConfigOverrides;
use credit_checker::core::models::{CourseCategory, Term};
use credit_checker::core::report::ReportFormat;
use credit_checker::logger::Level;

/// CLI log level argument
///
/// Converts to lowercase strings for config storage and to `Level` for runtime use.
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevelArg {
    /// Error-level logging
    Error,
    /// Warning-level logging
    Warn,
    /// Info-level logging
    Info,
    /// Debug-level logging
    Debug,
}

impl From<LogLevelArg> for Level {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => Self::Error,
            LogLevelArg::Warn => Self::Warn,
            LogLevelArg::Info => Self::Info,
            LogLevelArg::Debug => Self::Debug,
        }
    }
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", Level::from(*self))
    }
}

/// CLI cross-list policy argument
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum CrossListArg {
    /// One selection per course id
    Shared,
    /// One selection per course id and category
    PerContext,
}

impl std::fmt::Display for CrossListArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Shared => write!(f, "shared"),
            Self::PerContext => write!(f, "per-context"),
        }
    }
}

/// A course reference on the command line: `ID` or `CATEGORY:ID` (e.g. `pool:240-310`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CourseRef {
    /// Explicit category, if given
    pub category: Option<CourseCategory>,
    /// Course id
    pub id: String,
}

impl FromStr for CourseRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((prefix, id)) = s.split_once(':') {
            if let Ok(category) = prefix.parse::<CourseCategory>() {
                if id.trim().is_empty() {
                    return Err(format!("Missing course id in '{s}'"));
                }
                return Ok(Self {
                    category: Some(category),
                    id: id.trim().to_string(),
                });
            }
        }
        if s.is_empty() {
            return Err("Empty course reference".to_string());
        }
        Ok(Self {
            category: None,
            id: s.to_string(),
        })
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Display configuration values.
    ///
    /// If a KEY is provided, displays only that configuration value.
    /// If no KEY is provided, displays all configuration values.
    Get {
        /// Optional configuration key to display (e.g., `level`, `catalog_dir`, `cross_list`)
        #[arg(value_name = "KEY")]
        key: Option<String>,
    },
    /// Set a configuration value.
    Set {
        /// Configuration key to set
        #[arg(value_name = "KEY")]
        key: String,
        /// Value to set
        #[arg(value_name = "VALUE")]
        value: String,
    },
    /// Unset a configuration value.
    Unset {
        /// Configuration key to unset
        #[arg(value_name = "KEY")]
        key: String,
    },
    /// Reset configuration to defaults (requires confirmation).
    Reset,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    ///
    /// If no subcommand is provided, displays all configuration values.
    Config {
        #[command(subcommand)]
        subcommand: Option<ConfigSubcommand>,
    },
    /// List faculties in the catalog.
    Faculties,
    /// List majors, optionally only those of one faculty.
    Majors {
        /// Faculty name
        #[arg(long, value_name = "NAME")]
        faculty: Option<String>,
    },
    /// Print the classified curriculum of a major.
    Curriculum {
        /// Major abbreviation or name
        #[arg(short, long, value_name = "MAJOR")]
        major: String,
    },
    /// Compute a credit summary for a set of completed courses.
    ///
    /// Core courses up to the current term are counted automatically; use
    /// `--take` and `--drop` to adjust.
    Check {
        /// Major abbreviation or name
        #[arg(short, long, value_name = "MAJOR")]
        major: String,

        /// Current term as YEAR.SEMESTER (e.g. 2.1)
        #[arg(short, long, value_name = "TERM")]
        term: Term,

        /// Mark a course as completed: ID or CATEGORY:ID (repeatable)
        #[arg(long, value_name = "COURSE")]
        take: Vec<CourseRef>,

        /// Unmark a course: ID or CATEGORY:ID (repeatable)
        #[arg(long, value_name = "COURSE")]
        drop: Vec<CourseRef>,

        /// Summary format: text (txt) or markdown (md)
        #[arg(short, long, value_name = "FORMAT", default_value = "text")]
        format: ReportFormat,

        /// Write the summary to a file instead of stdout
        #[arg(short, long, value_name = "FILE", conflicts_with = "save")]
        output: Option<PathBuf>,

        /// Save the summary under the configured reports directory
        #[arg(long)]
        save: bool,
    },
    /// Start an interactive session.
    Session {
        /// Major abbreviation or name
        #[arg(short, long, value_name = "MAJOR")]
        major: String,

        /// Current term as YEAR.SEMESTER (e.g. 2.1)
        #[arg(short, long, value_name = "TERM")]
        term: Term,
    },
}

#[derive(Parser, Debug)]
#[command(
    name = "creditchecker",
    about = "Track earned credits against a major's curriculum",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Cli {
    /// Set the runtime log level (error|warn|info|debug). Falls back to config if omitted.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevelArg>,

    /// Enable verbose output (runtime only)
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Enable debug-level logging and runtime debug flag (shorthand)
    #[arg(long = "debug")]
    pub debug_flag: bool,

    /// Write runtime logs to a file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    // --- Config overrides ---
    /// Override config logging level
    #[arg(long = "config-level", value_enum)]
    pub config_level: Option<LogLevelArg>,

    /// Override config log file path
    #[arg(long = "config-log-file", value_name = "PATH")]
    pub config_log_file: Option<PathBuf>,

    /// Override config verbose flag (true/false)
    #[arg(long = "config-verbose", value_parser = BoolishValueParser::new())]
    pub config_verbose: Option<bool>,

    /// Directory holding the catalog CSV tables
    #[arg(long = "catalog-dir", value_name = "DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// Seconds a loaded catalog stays valid
    #[arg(long = "cache-ttl", value_name = "SECS")]
    pub cache_ttl: Option<u64>,

    /// How courses listed in several categories are counted
    #[arg(long = "cross-list", value_enum)]
    pub cross_list: Option<CrossListArg>,

    /// Override config reports directory
    #[arg(long = "reports-dir", value_name = "DIR")]
    pub reports_dir: Option<PathBuf>,

    /// Subcommand to execute.
    /// A subcommand is required to run the CLI.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Convert CLI flags into config overrides
    ///
    /// # Returns
    /// A `ConfigOverrides` struct with values from CLI flags, where `None` means no override.
    pub fn to_config_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            level: self.config_level.map(|lvl| lvl.to_string()),
            file: self
                .config_log_file
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            verbose: self.config_verbose,
            catalog_dir: self
                .catalog_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
            cache_ttl_secs: self.cache_ttl,
            cross_list: self.cross_list.map(|policy| policy.to_string()),
            reports_dir: self
                .reports_dir
                .as_ref()
                .map(|p| p.to_string_lossy().to_string()),
        }
    }
}
