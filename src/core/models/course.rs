//! Course model

use super::Term;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The category a course counts toward
///
/// Variant order is the canonical category order used when a cross-listed
/// course has to be attributed to a single category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CourseCategory {
    /// Required course of the major's study plan
    Core,
    /// Major elective listed in the major's study plan
    MajorElectivePlan,
    /// Major elective picked from the shared elective pool
    MajorElectivePool,
    /// Cooperative education placement
    Coop,
    /// Major project
    Project,
    /// General-education course
    GenEd,
    /// Free elective
    FreeElective,
}

impl CourseCategory {
    /// All categories in canonical order
    pub const ALL: [Self; 7] = [
        Self::Core,
        Self::MajorElectivePlan,
        Self::MajorElectivePool,
        Self::Coop,
        Self::Project,
        Self::GenEd,
        Self::FreeElective,
    ];

    /// Short key used on the command line (`pool:CS101`)
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::MajorElectivePlan => "plan",
            Self::MajorElectivePool => "pool",
            Self::Coop => "coop",
            Self::Project => "project",
            Self::GenEd => "gened",
            Self::FreeElective => "free",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::MajorElectivePlan => "Major Elective (Plan)",
            Self::MajorElectivePool => "Major Elective (Pool)",
            Self::Coop => "Cooperative Education",
            Self::Project => "Major Project",
            Self::GenEd => "General Education",
            Self::FreeElective => "Free Elective",
        }
    }
}

impl fmt::Display for CourseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CourseCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.key() == needle)
            .ok_or_else(|| {
                let keys: Vec<&str> = Self::ALL.iter().map(|c| c.key()).collect();
                format!("Unknown category '{s}' (expected one of: {})", keys.join(", "))
            })
    }
}

/// The set of majors a course counts toward
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Affinity {
    /// Offered to every major (tables without a `major_ref` column)
    #[default]
    Unrestricted,
    /// Uppercase, trimmed major abbreviations parsed from a comma-separated cell
    Listed(BTreeSet<String>),
}

impl Affinity {
    /// Normalize a comma-separated abbreviation cell (`"CPE, se"` -> `{CPE, SE}`)
    ///
    /// An empty cell yields an empty set, which matches nothing.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::Listed(
            raw.split(',')
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(str::to_uppercase)
                .collect(),
        )
    }

    /// Case-insensitive membership test for a major abbreviation
    #[must_use]
    pub fn matches(&self, abbreviation: &str) -> bool {
        match self {
            Self::Unrestricted => true,
            Self::Listed(tokens) => tokens.contains(&abbreviation.trim().to_uppercase()),
        }
    }

    /// Listed abbreviations (empty for unrestricted affinity)
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        let listed = match self {
            Self::Unrestricted => None,
            Self::Listed(tokens) => Some(tokens),
        };
        listed.into_iter().flatten().map(String::as_str)
    }
}

/// Represents a course row of the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Subject code (e.g., "240-101"), unique within its catalog table
    pub id: String,

    /// Primary display name (English)
    pub name_primary: String,

    /// Secondary display name (local language)
    pub name_secondary: String,

    /// Credits (never negative)
    pub credits: f32,

    /// Planned study term (`Term::UNKNOWN` outside the core plan)
    pub term: Term,

    /// Hierarchical display group such as "1 Language" or "1.1 English"; empty when ungrouped
    pub group: String,

    /// General-education section label; empty for other tables
    pub section: String,

    /// Majors this course counts toward
    pub affinity: Affinity,

    category: CourseCategory,
}

impl Course {
    /// Create a new course
    ///
    /// Negative or non-finite credits are stored as `0`.
    #[must_use]
    pub fn new(
        id: String,
        name_primary: String,
        name_secondary: String,
        credits: f32,
        category: CourseCategory,
    ) -> Self {
        Self {
            id,
            name_primary,
            name_secondary,
            credits: if credits.is_finite() { credits.max(0.0) } else { 0.0 },
            term: Term::UNKNOWN,
            group: String::new(),
            section: String::new(),
            affinity: Affinity::Unrestricted,
            category,
        }
    }

    /// Set the planned term
    #[must_use]
    pub fn with_term(mut self, term: Term) -> Self {
        self.term = term;
        self
    }

    /// Set the display group
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Set the general-education section
    #[must_use]
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        self.section = section.into();
        self
    }

    /// Set the major affinity
    #[must_use]
    pub fn with_affinity(mut self, affinity: Affinity) -> Self {
        self.affinity = affinity;
        self
    }

    /// Category assigned at load time
    #[must_use]
    pub const fn category(&self) -> CourseCategory {
        self.category
    }

    /// Whether this course counts toward the given major
    #[must_use]
    pub fn counts_toward(&self, abbreviation: &str) -> bool {
        self.affinity.matches(abbreviation)
    }

    /// Label used by searchable pick lists
    ///
    /// # Returns
    /// A string such as "240-101 Programming | การเขียนโปรแกรม (3 credits)"
    #[must_use]
    pub fn display_label(&self) -> String {
        format!(
            "{} {} | {} ({} credits)",
            self.id,
            self.name_primary,
            self.name_secondary,
            format_credits(self.credits)
        )
    }
}

/// Format credits without a trailing `.0` for whole numbers
#[must_use]
pub fn format_credits(credits: f32) -> String {
    if (credits - credits.trunc()).abs() < f32::EPSILON {
        format!("{credits:.0}")
    } else {
        format!("{credits:.1}")
    }
}
