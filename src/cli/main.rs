//! Command-line interface entry point for `CreditChecker`

mod args;
mod commands;

use args::{Cli, Command};
use clap::Parser;
use credit_checker::config::Config;
use credit_checker::core::loader::{CatalogRepository, DirectorySource};
use credit_checker::logger::{enable_debug, enable_verbose, init_file_logging, set_level, Level};
use credit_checker::{debug, error, info};

fn main() {
    let args = Cli::parse();

    // Load configuration once at startup and apply CLI overrides to it
    let mut config = Config::load();
    let defaults = Config::from_defaults();
    config.apply_overrides(&args.to_config_overrides());

    // CLI flag overrides config logging.level; fallback warn
    let mut level = args
        .log_level
        .map(Level::from)
        .or_else(|| config.logging.level.parse().ok())
        .unwrap_or(Level::Warn);

    if args.debug_flag || level == Level::Debug {
        level = Level::Debug;
        enable_debug();
    }

    let verbose = args.verbose || config.logging.verbose;
    if verbose {
        enable_verbose();
    }
    set_level(level);

    // CLI flag wins, otherwise use config logging.file if set
    let config_log_path: Option<std::path::PathBuf> = if config.logging.file.is_empty() {
        None
    } else {
        Some(std::path::PathBuf::from(&config.logging.file))
    };

    if let Some(log_path) = args.log_file.as_ref().or(config_log_path.as_ref()) {
        let display_path = log_path.to_string_lossy();
        if init_file_logging(log_path) {
            if verbose {
                eprintln!("✓ File logging initialized at: {display_path}");
            } else {
                info!("File logging initialized at: {display_path}");
            }
        } else {
            eprintln!("✗ Failed to initialize file logging at: {display_path}");
        }
    }

    let policy = match config.cross_list_policy() {
        Ok(policy) => policy,
        Err(e) => {
            error!("{e}");
            eprintln!("✗ {e}");
            std::process::exit(1);
        }
    };

    let catalog_dir = config.catalog_dir();
    debug!(
        "Catalog directory {}, cache window {}s, {policy} cross-listing",
        catalog_dir.display(),
        config.cache_ttl().as_secs()
    );
    let mut repository = CatalogRepository::new(DirectorySource::new(&catalog_dir), config.cache_ttl());

    match args.command {
        Command::Config { subcommand } => {
            commands::config::run(subcommand, &mut config, &defaults);
        }
        Command::Faculties => commands::catalog::run_faculties(&mut repository),
        Command::Majors { faculty } => {
            commands::catalog::run_majors(&mut repository, faculty.as_deref());
        }
        Command::Curriculum { major } => commands::catalog::run_curriculum(&mut repository, &major),
        Command::Check {
            major,
            term,
            take,
            drop,
            format,
            output,
            save,
        } => {
            let options = commands::check::CheckOptions {
                major: &major,
                term,
                take: &take,
                drop: &drop,
                format,
                output: output.as_deref(),
                save,
            };
            commands::check::run(&mut repository, &options, policy, &config);
        }
        Command::Session { major, term } => {
            commands::session::run(&mut repository, &major, term, policy);
        }
    }
}
