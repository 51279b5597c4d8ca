//! Interactive session: toggle courses and watch the totals move

use super::catalog::format_curriculum;
use super::check::toggle_ref;
use super::{load_catalog, report_diagnostics};
use crate::args::CourseRef;
use credit_checker::core::loader::{CatalogRepository, CatalogSource};
use credit_checker::core::models::{format_credits, Term};
use credit_checker::core::report::{reporter_for, ReportFormat, SummaryContext};
use credit_checker::core::selection::CrossListPolicy;
use credit_checker::core::session::Session;
use credit_checker::{debug, error};
use std::io::{self, BufRead, Write};
use std::sync::Arc;

const HELP: &str = "\
Commands:
  take [CAT:]ID         mark a course as completed
  drop [CAT:]ID         unmark a course
  major ABBR [TERM]     switch major (keeps the term when omitted)
  term TERM             switch current term
  list                  show the curriculum with counted courses marked
  summary [text|md]     print the credit summary
  reload                fetch the catalog again
  help                  show this help
  quit                  leave the session
Categories: core, plan, pool, coop, project, gened, free";

/// One parsed session command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Mark a course as completed
    Take(CourseRef),
    /// Unmark a course
    Drop(CourseRef),
    /// Switch major, optionally with a new term
    Major(String, Option<Term>),
    /// Switch term
    Term(Term),
    /// Print the curriculum
    List,
    /// Print the summary
    Summary(ReportFormat),
    /// Invalidate the cache and reload the catalog
    Reload,
    /// Print help
    Help,
    /// End the session
    Quit,
}

/// Parse one input line
///
/// # Returns
/// `Ok(None)` for a blank line
///
/// # Errors
/// Returns a message for unknown commands or bad arguments
pub fn parse_command(line: &str) -> Result<Option<SessionCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (verb.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("take" | "t", [course]) => SessionCommand::Take(course.parse()?),
        ("drop" | "d", [course]) => SessionCommand::Drop(course.parse()?),
        ("major" | "m", [major]) => SessionCommand::Major((*major).to_string(), None),
        ("major" | "m", [major, term]) => {
            SessionCommand::Major((*major).to_string(), Some(term.parse()?))
        }
        ("term", [term]) => SessionCommand::Term(term.parse()?),
        ("list" | "ls", []) => SessionCommand::List,
        ("summary" | "s", []) => SessionCommand::Summary(ReportFormat::Text),
        ("summary" | "s", [format]) => SessionCommand::Summary(format.parse()?),
        ("reload", []) => SessionCommand::Reload,
        ("help" | "?", []) => SessionCommand::Help,
        ("quit" | "exit" | "q", []) => SessionCommand::Quit,
        ("take" | "t" | "drop" | "d" | "major" | "m" | "term" | "list" | "ls" | "summary" | "s"
        | "reload" | "help" | "?" | "quit" | "exit" | "q", _) => {
            return Err(format!("Wrong arguments for '{verb}' (try 'help')"));
        }
        _ => return Err(format!("Unknown command '{verb}' (try 'help')")),
    };
    Ok(Some(command))
}

/// Run the session command against stdin and stdout
pub fn run<S: CatalogSource>(
    repository: &mut CatalogRepository<S>,
    major: &str,
    term: Term,
    policy: CrossListPolicy,
) {
    let Some(catalog) = load_catalog(repository) else {
        return;
    };
    let mut session = match Session::start(catalog, major, term, policy) {
        Ok(session) => session,
        Err(e) => {
            error!("{e}");
            eprintln!("✗ {e}");
            return;
        }
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    if let Err(e) = run_loop(repository, &mut session, stdin.lock(), &mut stdout) {
        error!("Session I/O failed: {e}");
        eprintln!("✗ Session ended: {e}");
    }
}

/// Read commands until `quit` or end of input
///
/// # Errors
/// Returns an error if reading input or writing output fails
pub fn run_loop<S, R, W>(
    repository: &mut CatalogRepository<S>,
    session: &mut Session,
    input: R,
    out: &mut W,
) -> io::Result<()>
where
    S: CatalogSource,
    R: BufRead,
    W: Write,
{
    writeln!(
        out,
        "Session for {} at {} ({} cross-listing). Type 'help' for commands.",
        session.major().abbreviation,
        session.term(),
        session.selection().policy()
    )?;
    write_status(session, out)?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next() else {
            writeln!(out)?;
            break;
        };
        let line = line?;

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                writeln!(out, "✗ {e}")?;
                continue;
            }
        };
        debug!("Session command: {command:?}");

        if command == SessionCommand::Quit {
            break;
        }
        execute(repository, session, command, out)?;
    }
    Ok(())
}

fn execute<S: CatalogSource, W: Write>(
    repository: &mut CatalogRepository<S>,
    session: &mut Session,
    command: SessionCommand,
    out: &mut W,
) -> io::Result<()> {
    match command {
        SessionCommand::Take(course) => toggle(session, &course, true, out),
        SessionCommand::Drop(course) => toggle(session, &course, false, out),
        SessionCommand::Major(major, term) => {
            let term = term.unwrap_or_else(|| session.term());
            switch_context(repository, session, &major, term, out)
        }
        SessionCommand::Term(term) => {
            let major = session.major().abbreviation.clone();
            switch_context(repository, session, &major, term, out)
        }
        SessionCommand::List => write!(
            out,
            "{}",
            format_curriculum(session.curriculum(), Some(session.selection()))
        ),
        SessionCommand::Summary(format) => {
            let ctx = SummaryContext::from_session(session);
            match reporter_for(format).render(&ctx) {
                Ok(text) => write!(out, "{text}"),
                Err(e) => {
                    error!("Failed to render summary: {e}");
                    writeln!(out, "✗ Failed to render summary: {e}")
                }
            }
        }
        SessionCommand::Reload => match repository.invalidate_and_reload() {
            Ok(catalog) => {
                report_diagnostics(&catalog);
                match session.replace_catalog(catalog) {
                    Ok(()) => {
                        writeln!(out, "✓ Catalog reloaded; selection reset")?;
                        write_status(session, out)
                    }
                    Err(e) => writeln!(out, "✗ Reload kept the previous catalog: {e}"),
                }
            }
            Err(e) => {
                error!("Catalog reload failed: {e}");
                writeln!(out, "✗ Failed to reload catalog: {e}")
            }
        },
        SessionCommand::Help => writeln!(out, "{HELP}"),
        SessionCommand::Quit => Ok(()),
    }
}

fn toggle<W: Write>(session: &mut Session, course: &CourseRef, on: bool, out: &mut W) -> io::Result<()> {
    match toggle_ref(session, course, on) {
        Ok(true) => write_status(session, out),
        Ok(false) => {
            let state = if on { "already counted" } else { "not counted" };
            writeln!(out, "{} is {state}", course.id)
        }
        Err(e) => writeln!(out, "✗ {e}"),
    }
}

/// Switch (major, term), picking up a newer catalog if the cache window has passed
fn switch_context<S: CatalogSource, W: Write>(
    repository: &mut CatalogRepository<S>,
    session: &mut Session,
    major: &str,
    term: Term,
    out: &mut W,
) -> io::Result<()> {
    match repository.catalog() {
        Ok(catalog) if !Arc::ptr_eq(&catalog, session.catalog()) => {
            report_diagnostics(&catalog);
            if let Err(e) = session.replace_catalog(catalog) {
                writeln!(out, "✗ Refreshed catalog rejected: {e}")?;
            }
        }
        Ok(_) => {}
        Err(e) => {
            error!("Catalog refresh failed: {e}");
            writeln!(out, "✗ Failed to refresh catalog, keeping the loaded one: {e}")?;
        }
    }

    match session.reset_context(major, term) {
        Ok(()) => {
            writeln!(
                out,
                "✓ Now tracking {} at {}",
                session.major().abbreviation,
                session.term()
            )?;
            write_status(session, out)
        }
        Err(e) => writeln!(out, "✗ {e}"),
    }
}

fn write_status<W: Write>(session: &Session, out: &mut W) -> io::Result<()> {
    let summary = session.get_summary();
    writeln!(
        out,
        "Earned {} / {} credits ({:.1}%), {} remaining",
        format_credits(summary.total_earned),
        format_credits(summary.total_required),
        summary.percent * 100.0,
        format_credits(summary.remaining)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_checker::core::loader::{CatalogTable, InMemorySource};
    use credit_checker::core::models::CourseCategory;
    use std::io::Cursor;
    use std::time::Duration;

    fn source() -> InMemorySource {
        InMemorySource::new()
            .with_table(CatalogTable::Faculty, include_str!("../../../tests/fixtures/catalog/Faculty.csv"))
            .with_table(CatalogTable::Majors, include_str!("../../../tests/fixtures/catalog/Majors.csv"))
            .with_table(CatalogTable::Core, include_str!("../../../tests/fixtures/catalog/Core.csv"))
            .with_table(CatalogTable::GenEd, include_str!("../../../tests/fixtures/catalog/7group.csv"))
            .with_table(CatalogTable::Elective, include_str!("../../../tests/fixtures/catalog/Elective.csv"))
            .with_table(
                CatalogTable::FreeElective,
                include_str!("../../../tests/fixtures/catalog/FreeElective.csv"),
            )
    }

    fn start(repository: &mut CatalogRepository<InMemorySource>) -> Session {
        let catalog = repository.catalog().expect("catalog");
        Session::start(catalog, "SE", Term::new(2, 1), CrossListPolicy::Shared).expect("session")
    }

    fn drive(repository: &mut CatalogRepository<InMemorySource>, session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        run_loop(repository, session, Cursor::new(script.to_string()), &mut out).expect("loop");
        String::from_utf8(out).expect("utf-8")
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("take pool:240-450"),
            Ok(Some(SessionCommand::Take(CourseRef {
                category: Some(CourseCategory::MajorElectivePool),
                id: "240-450".to_string()
            })))
        );
        assert_eq!(
            parse_command("major cpe 1.2"),
            Ok(Some(SessionCommand::Major("cpe".to_string(), Some(Term::new(1, 2)))))
        );
        assert_eq!(parse_command("summary md"), Ok(Some(SessionCommand::Summary(ReportFormat::Markdown))));
        assert_eq!(parse_command("QUIT"), Ok(Some(SessionCommand::Quit)));
        assert!(parse_command("take").is_err());
        assert!(parse_command("term soon").is_err());
        assert!(parse_command("dance").unwrap_err().contains("Unknown command"));
    }

    #[test]
    fn test_loop_toggles_and_summarizes() {
        let mut repository = CatalogRepository::new(source(), Duration::from_secs(600));
        let mut session = start(&mut repository);

        let output = drive(&mut repository, &mut session, "take 950-102\ntake 950-102\ndrop 240-101\nsummary\nquit\n");

        assert!(output.contains("Earned 12 / 130 credits"));
        assert!(output.contains("Earned 14 / 130 credits"));
        assert!(output.contains("950-102 is already counted"));
        assert!(output.contains("Earned 11 / 130 credits"));
        assert!(output.contains("Free Elective"));
        assert!((session.get_summary().total_earned - 11.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_loop_reports_bad_input_and_continues() {
        let mut repository = CatalogRepository::new(source(), Duration::from_secs(600));
        let mut session = start(&mut repository);

        let output = drive(&mut repository, &mut session, "fly\ntake 999-999\nmajor LAW\nlist\n");

        assert!(output.contains("✗ Unknown command 'fly'"));
        assert!(output.contains("✗ Course '999-999' is not part of the SE curriculum"));
        assert!(output.contains("✗ Unknown major 'LAW'"));
        assert!(output.contains("[x] 240-201"));
        assert!(output.contains("[ ] 240-202"));
        assert_eq!(session.major().abbreviation, "SE");
    }

    #[test]
    fn test_major_switch_resets_selection() {
        let mut repository = CatalogRepository::new(source(), Duration::from_secs(600));
        let mut session = start(&mut repository);

        let output = drive(&mut repository, &mut session, "take 950-101\nmajor CPE\n");

        assert!(output.contains("✓ Now tracking CPE at Year 2 Term 1"));
        assert_eq!(session.major().abbreviation, "CPE");
        assert!(!session.selection().is_counted("950-101"));
        assert!(session.selection().is_counted("242-201"));
    }

    #[test]
    fn test_reload_fetches_again() {
        let mut repository = CatalogRepository::new(source(), Duration::from_secs(600));
        let mut session = start(&mut repository);
        let fetches = repository.source().fetch_count();

        let output = drive(&mut repository, &mut session, "take 950-101\nreload\n");

        assert!(output.contains("✓ Catalog reloaded; selection reset"));
        assert!(repository.source().fetch_count() > fetches);
        assert!(!session.selection().is_counted("950-101"));
    }
}
