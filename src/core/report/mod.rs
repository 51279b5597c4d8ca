//! Shareable credit summaries
//!
//! A [`SummaryContext`] captures everything a renderer needs (major, faculty,
//! term, totals and counted courses) so every format reads from the same
//! snapshot of a session.

pub mod formats;

use crate::core::aggregator::{BreakdownEntry, CreditSummary};
use crate::core::models::{format_credits, Course, CourseCategory, Faculty, Major, Term};
use crate::core::selection::CrossListPolicy;
use crate::core::session::Session;
use std::error::Error;
use std::path::Path;

pub use formats::{MarkdownReporter, ReportFormat, TextReporter};

/// Data context for summary rendering
#[derive(Debug, Clone)]
pub struct SummaryContext<'a> {
    /// Active major
    pub major: &'a Major,
    /// Faculty of the major, if listed
    pub faculty: Option<&'a Faculty>,
    /// Student's current term
    pub term: Term,
    /// Cross-list keying in effect
    pub policy: CrossListPolicy,
    /// Credit totals
    pub summary: CreditSummary,
    /// Counted courses with their credited category, in canonical order
    pub courses: Vec<(CourseCategory, &'a Course)>,
}

impl<'a> SummaryContext<'a> {
    /// Snapshot a session
    #[must_use]
    pub fn from_session(session: &'a Session) -> Self {
        Self {
            major: session.major(),
            faculty: session.faculty(),
            term: session.term(),
            policy: session.selection().policy(),
            summary: session.get_summary(),
            courses: session.counted_courses(),
        }
    }

    /// Faculty name or a placeholder
    #[must_use]
    pub fn faculty_name(&self) -> &str {
        self.faculty.map_or("-", |f| f.name.as_str())
    }

    /// Major heading such as "Software Engineering (SE)"
    #[must_use]
    pub fn major_title(&self) -> String {
        if self.major.abbreviation == self.major.name {
            self.major.name.clone()
        } else {
            format!("{} ({})", self.major.name, self.major.abbreviation)
        }
    }

    /// Completion as a percentage with one decimal, e.g. "71.5%"
    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.summary.percent * 100.0)
    }

    /// Breakdown buckets of the summary
    #[must_use]
    pub fn breakdown(&self) -> Vec<BreakdownEntry> {
        self.summary.breakdown()
    }

    /// Earned credits formatted for display
    #[must_use]
    pub fn total_earned_label(&self) -> String {
        format_credits(self.summary.total_earned)
    }

    /// Required credits formatted for display
    #[must_use]
    pub fn total_required_label(&self) -> String {
        format_credits(self.summary.total_required)
    }
}

/// Trait for summary renderers
pub trait SummaryReporter {
    /// Render the summary as a string
    ///
    /// # Errors
    /// Returns an error if rendering fails
    fn render(&self, ctx: &SummaryContext) -> Result<String, Box<dyn Error>>;

    /// Render the summary into a file, creating parent directories
    ///
    /// # Errors
    /// Returns an error if rendering or writing fails
    fn generate(&self, ctx: &SummaryContext, output_path: &Path) -> Result<(), Box<dyn Error>> {
        let content = self.render(ctx)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(output_path, content)?;
        Ok(())
    }
}

/// Reporter for a format
#[must_use]
pub fn reporter_for(format: ReportFormat) -> Box<dyn SummaryReporter> {
    match format {
        ReportFormat::Text => Box::new(TextReporter::new()),
        ReportFormat::Markdown => Box::new(MarkdownReporter::new()),
    }
}
