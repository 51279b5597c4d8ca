//! Selection state: which courses the student has marked as completed
//!
//! A selection is scoped to one (major, term) context. Creating or resetting
//! it seeds the defaults: every core course planned up to the student's term is
//! counted, everything else is not.

use crate::core::classifier::MajorCurriculum;
use crate::core::models::{CourseCategory, Term};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// How a course listed in several categories is keyed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrossListPolicy {
    /// One key per course id; a toggle shows up in every category listing it
    #[default]
    Shared,
    /// One key per (course id, category); the same course can be counted twice
    PerContext,
}

impl CrossListPolicy {
    /// Config / CLI spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::PerContext => "per-context",
        }
    }
}

impl fmt::Display for CrossListPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrossListPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "per-context" | "per_context" | "percontext" => Ok(Self::PerContext),
            _ => Err(format!(
                "Unknown cross-list policy '{s}' (expected 'shared' or 'per-context')"
            )),
        }
    }
}

/// A counted selection entry
///
/// `category` is `None` under [`CrossListPolicy::Shared`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SelectionKey {
    /// Course id
    pub course_id: String,
    /// Category the toggle was made in, when keys are per context
    pub category: Option<CourseCategory>,
}

/// The (major, term) a selection belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionContext {
    /// Major abbreviation
    pub major: String,
    /// Student's current term
    pub term: Term,
}

impl SelectionContext {
    /// Create a new context
    #[must_use]
    pub fn new(major: impl Into<String>, term: Term) -> Self {
        Self {
            major: major.into(),
            term,
        }
    }
}

/// The set of counted courses for one context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionState {
    policy: CrossListPolicy,
    context: SelectionContext,
    counted: BTreeSet<SelectionKey>,
}

impl SelectionState {
    /// Create a selection seeded with the core defaults for `context`
    #[must_use]
    pub fn new(
        policy: CrossListPolicy,
        context: SelectionContext,
        curriculum: &MajorCurriculum,
    ) -> Self {
        let mut state = Self {
            policy,
            context,
            counted: BTreeSet::new(),
        };
        state.seed_defaults(curriculum);
        state
    }

    /// Discard every toggle and reseed for a new context
    pub fn reset(&mut self, context: SelectionContext, curriculum: &MajorCurriculum) {
        self.context = context;
        self.counted.clear();
        self.seed_defaults(curriculum);
    }

    fn seed_defaults(&mut self, curriculum: &MajorCurriculum) {
        let term = self.context.term;
        let seeded: Vec<SelectionKey> = curriculum
            .core
            .iter()
            .filter(|bucket| bucket.term <= term)
            .flat_map(|bucket| bucket.courses.iter())
            .map(|course| self.key(CourseCategory::Core, &course.id))
            .collect();
        self.counted.extend(seeded);
    }

    fn key(&self, category: CourseCategory, course_id: &str) -> SelectionKey {
        SelectionKey {
            course_id: course_id.to_string(),
            category: match self.policy {
                CrossListPolicy::Shared => None,
                CrossListPolicy::PerContext => Some(category),
            },
        }
    }

    /// Set the counted status of a course as toggled from `category`
    ///
    /// Idempotent: toggling to the current status is a no-op.
    ///
    /// # Returns
    /// `true` if the status changed
    pub fn toggle(&mut self, category: CourseCategory, course_id: &str, on: bool) -> bool {
        let key = self.key(category, course_id);
        if on {
            self.counted.insert(key)
        } else {
            self.counted.remove(&key)
        }
    }

    /// Whether a course is counted in any category
    #[must_use]
    pub fn is_counted(&self, course_id: &str) -> bool {
        self.counted.iter().any(|key| key.course_id == course_id)
    }

    /// Whether a course is counted as seen from one category
    #[must_use]
    pub fn is_counted_in(&self, category: CourseCategory, course_id: &str) -> bool {
        self.counted.contains(&self.key(category, course_id))
    }

    /// Copy of the counted keys
    #[must_use]
    pub fn snapshot(&self) -> BTreeSet<SelectionKey> {
        self.counted.clone()
    }

    /// Number of counted keys
    #[must_use]
    pub fn counted_count(&self) -> usize {
        self.counted.len()
    }

    /// Keying policy
    #[must_use]
    pub const fn policy(&self) -> CrossListPolicy {
        self.policy
    }

    /// Context the selection belongs to
    #[must_use]
    pub const fn context(&self) -> &SelectionContext {
        &self.context
    }
}
