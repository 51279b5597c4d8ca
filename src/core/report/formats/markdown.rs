//! Markdown summary renderer
//!
//! Renders `templates/summary.md` through askama. Values are pre-formatted here
//! so the template stays a plain layout.

use crate::core::models::format_credits;
use crate::core::report::{SummaryContext, SummaryReporter};
use askama::Template;
use std::error::Error;

struct SummaryRow {
    label: &'static str,
    credits: String,
}

struct CourseRow {
    category: &'static str,
    id: String,
    name: String,
    credits: String,
}

#[derive(Template)]
#[template(path = "summary.md", escape = "none")]
struct SummaryTemplate<'a> {
    title: String,
    faculty: &'a str,
    term: String,
    policy: String,
    rows: Vec<SummaryRow>,
    total_earned: String,
    total_required: String,
    percent: String,
    courses: Vec<CourseRow>,
}

/// Table cells cannot contain a raw pipe
fn cell_text(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Markdown summary renderer
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Create a new Markdown reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for MarkdownReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SummaryReporter for MarkdownReporter {
    fn render(&self, ctx: &SummaryContext) -> Result<String, Box<dyn Error>> {
        let template = SummaryTemplate {
            title: ctx.major_title(),
            faculty: ctx.faculty_name(),
            term: ctx.term.to_string(),
            policy: ctx.policy.to_string(),
            rows: ctx
                .breakdown()
                .into_iter()
                .map(|entry| SummaryRow {
                    label: entry.bucket.label(),
                    credits: format_credits(entry.credits),
                })
                .collect(),
            total_earned: ctx.total_earned_label(),
            total_required: ctx.total_required_label(),
            percent: ctx.percent_label(),
            courses: ctx
                .courses
                .iter()
                .map(|(category, course)| CourseRow {
                    category: category.label(),
                    id: cell_text(&course.id),
                    name: cell_text(&course.name_primary),
                    credits: format_credits(course.credits),
                })
                .collect(),
        };
        Ok(template.render()?)
    }
}
