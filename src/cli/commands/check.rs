//! Check command: one-shot credit summary

use super::load_catalog;
use crate::args::CourseRef;
use credit_checker::config::Config;
use credit_checker::core::loader::{CatalogRepository, CatalogSource};
use credit_checker::core::models::Term;
use credit_checker::core::report::{reporter_for, ReportFormat, SummaryContext};
use credit_checker::core::selection::CrossListPolicy;
use credit_checker::core::session::Session;
use credit_checker::{error, warn};
use std::path::{Path, PathBuf};

/// Options of one check run
pub struct CheckOptions<'a> {
    /// Major abbreviation or name
    pub major: &'a str,
    /// Current term
    pub term: Term,
    /// Courses to mark as completed
    pub take: &'a [CourseRef],
    /// Courses to unmark
    pub drop: &'a [CourseRef],
    /// Output format
    pub format: ReportFormat,
    /// Explicit output file
    pub output: Option<&'a Path>,
    /// Save under the reports directory
    pub save: bool,
}

/// Run the check command
pub fn run<S: CatalogSource>(
    repository: &mut CatalogRepository<S>,
    options: &CheckOptions,
    policy: CrossListPolicy,
    config: &Config,
) {
    let Some(catalog) = load_catalog(repository) else {
        return;
    };

    let mut session = match Session::start(catalog, options.major, options.term, policy) {
        Ok(session) => session,
        Err(e) => {
            error!("{e}");
            eprintln!("✗ {e}");
            return;
        }
    };

    for problem in apply_changes(&mut session, options.take, options.drop) {
        warn!("{problem}");
        eprintln!("✗ {problem}");
    }

    let ctx = SummaryContext::from_session(&session);
    let reporter = reporter_for(options.format);

    let target: Option<PathBuf> = options.output.map(Path::to_path_buf).or_else(|| {
        options
            .save
            .then(|| config.reports_dir().join(summary_file_name(&session, options.format)))
    });

    match target {
        Some(path) => match reporter.generate(&ctx, &path) {
            Ok(()) => println!("✓ Summary written: {}", path.display()),
            Err(e) => {
                error!("Failed to write summary to {}: {e}", path.display());
                eprintln!("✗ Failed to write summary: {e}");
            }
        },
        None => match reporter.render(&ctx) {
            Ok(text) => print!("{text}"),
            Err(e) => {
                error!("Failed to render summary: {e}");
                eprintln!("✗ Failed to render summary: {e}");
            }
        },
    }
}

/// Apply drops, then takes, to a session
///
/// A reference without a category is resolved to the first category listing
/// the id.
///
/// # Returns
/// One message per reference that could not be applied
pub fn apply_changes(session: &mut Session, take: &[CourseRef], drop: &[CourseRef]) -> Vec<String> {
    let mut problems = Vec::new();
    let changes = drop
        .iter()
        .map(|course| (course, false))
        .chain(take.iter().map(|course| (course, true)));

    for (course, on) in changes {
        if let Err(e) = toggle_ref(session, course, on) {
            problems.push(e);
        }
    }
    problems
}

/// Toggle one command-line course reference
///
/// # Errors
/// Returns a message when the id is not part of the active curriculum
pub fn toggle_ref(session: &mut Session, course: &CourseRef, on: bool) -> Result<bool, String> {
    let Some(category) = course.category.or_else(|| session.category_of(&course.id)) else {
        return Err(format!(
            "Course '{}' is not part of the {} curriculum",
            course.id,
            session.major().abbreviation
        ));
    };
    session
        .toggle_course(category, &course.id, on)
        .map_err(|e| e.to_string())
}

/// File name used by `--save`, e.g. `SE-summary.md`
#[must_use]
pub fn summary_file_name(session: &Session, format: ReportFormat) -> String {
    format!("{}-summary.{}", session.major().abbreviation, format.extension())
}
