//! Major and faculty models

use serde::{Deserialize, Serialize};

/// Represents a major (degree program) and its credit goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Major {
    /// Major name (e.g., "Software Engineering")
    pub name: String,

    /// Abbreviation referenced by course rows (e.g., "SE")
    pub abbreviation: String,

    /// Name of the owning faculty
    pub faculty_ref: String,

    /// Credits required to graduate
    pub total_credits: f32,
}

impl Major {
    /// Create a new major
    ///
    /// # Arguments
    /// * `name` - Major name
    /// * `abbreviation` - Abbreviation used in course affinity cells
    /// * `faculty_ref` - Faculty name
    /// * `total_credits` - Credit goal
    #[must_use]
    pub const fn new(
        name: String,
        abbreviation: String,
        faculty_ref: String,
        total_credits: f32,
    ) -> Self {
        Self {
            name,
            abbreviation,
            faculty_ref,
            total_credits,
        }
    }

    /// Case-insensitive comparison against an abbreviation
    #[must_use]
    pub fn has_abbreviation(&self, abbreviation: &str) -> bool {
        self.abbreviation
            .trim()
            .eq_ignore_ascii_case(abbreviation.trim())
    }
}

/// Represents a faculty grouping several majors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    /// Faculty name (e.g., "Faculty of Engineering")
    pub name: String,

    /// Number of majors, for display only
    pub major_count: usize,
}

impl Faculty {
    /// Create a new faculty
    #[must_use]
    pub const fn new(name: String, major_count: usize) -> Self {
        Self { name, major_count }
    }

    /// Label shown by faculty pickers
    ///
    /// # Returns
    /// A string such as "Faculty of Engineering (9 majors)"
    #[must_use]
    pub fn display_label(&self) -> String {
        let noun = if self.major_count == 1 { "major" } else { "majors" };
        format!("{} ({} {noun})", self.name, self.major_count)
    }
}
