//! Academic term model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A study term encoded as `year.semester` (e.g. `2.1` is year 2, semester 1)
///
/// Ordering is by year, then semester, so `1.2 < 2.1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Term {
    /// Study year (1-based; 0 means unscheduled)
    pub year: u8,
    /// Semester within the year
    pub semester: u8,
}

impl Term {
    /// Placeholder for rows whose term cell could not be parsed
    pub const UNKNOWN: Self = Self::new(0, 0);

    /// Create a new term
    #[must_use]
    pub const fn new(year: u8, semester: u8) -> Self {
        Self { year, semester }
    }

    /// The terms a student can declare as "current"
    #[must_use]
    pub const fn standard_terms() -> [Self; 8] {
        [
            Self::new(1, 1),
            Self::new(1, 2),
            Self::new(2, 1),
            Self::new(2, 2),
            Self::new(3, 1),
            Self::new(3, 2),
            Self::new(4, 1),
            Self::new(4, 2),
        ]
    }

    /// Parse a spreadsheet term cell such as `"2.1"`, `"3"` or `" 4.2 "`
    ///
    /// # Returns
    /// `None` for empty, negative, or non-numeric input
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn parse(raw: &str) -> Option<Self> {
        let value = raw.trim().parse::<f64>().ok()?;
        if !value.is_finite() || value < 0.0 || value >= f64::from(u8::MAX) {
            return None;
        }
        let year = value.trunc();
        let semester = ((value - year) * 10.0).round();
        Some(Self::new(year as u8, semester as u8))
    }

    /// Whether the term was parsed from real data
    #[must_use]
    pub fn is_known(&self) -> bool {
        *self != Self::UNKNOWN
    }
}

impl FromStr for Term {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid term '{s}': expected YEAR.SEMESTER such as 2.1"))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "Year {} Term {}", self.year, self.semester)
        } else {
            write!(f, "Unscheduled")
        }
    }
}
