//! Plain-text summary renderer
//!
//! Prints the breakdown as a fixed-width table followed by the counted
//! courses, the terminal counterpart of a dashboard sidebar.

use crate::core::models::format_credits;
use crate::core::report::{SummaryContext, SummaryReporter};
use std::error::Error;
use std::fmt::Write;

const LABEL_WIDTH: usize = 24;
const VALUE_WIDTH: usize = 8;

/// Plain-text summary renderer
pub struct TextReporter;

impl TextReporter {
    /// Create a new text reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn row(out: &mut String, label: &str, credits: f32) {
        let _ = writeln!(
            out,
            "{label:<LABEL_WIDTH$}{:>VALUE_WIDTH$}",
            format_credits(credits)
        );
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryReporter for TextReporter {
    fn render(&self, ctx: &SummaryContext) -> Result<String, Box<dyn Error>> {
        let mut out = String::new();
        let rule = "-".repeat(LABEL_WIDTH + VALUE_WIDTH);

        writeln!(out, "Credit summary: {}", ctx.major_title())?;
        writeln!(out, "Faculty: {}", ctx.faculty_name())?;
        writeln!(out, "Current term: {}", ctx.term)?;
        writeln!(out)?;
        writeln!(out, "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}", "Category", "Credits")?;
        writeln!(out, "{rule}")?;

        for entry in ctx.breakdown() {
            Self::row(&mut out, entry.bucket.label(), entry.credits);
        }

        writeln!(out, "{rule}")?;
        writeln!(
            out,
            "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$} / {} ({})",
            "Total earned",
            ctx.total_earned_label(),
            ctx.total_required_label(),
            ctx.percent_label()
        )?;

        writeln!(out)?;
        writeln!(out, "Counted courses ({})", ctx.courses.len())?;
        for (category, course) in &ctx.courses {
            writeln!(out, "  [{}] {}", category.key(), course.display_label())?;
        }

        Ok(out)
    }
}
