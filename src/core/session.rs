//! Session facade used by the presentation layer
//!
//! A session pairs a shared catalog snapshot with one (major, term) context:
//! the classified curriculum of the major and the selection made against it.

use crate::core::aggregator::{counted_courses, summarize, CreditSummary};
use crate::core::classifier::{classify, MajorCurriculum};
use crate::core::models::{Catalog, Course, CourseCategory, Faculty, Major, Term};
use crate::core::selection::{CrossListPolicy, SelectionContext, SelectionState};
use crate::{debug, info, warn};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by session operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// No major matches the abbreviation or name
    #[error("Unknown major '{0}'")]
    UnknownMajor(String),

    /// The course is not listed under the category for the active major
    #[error("Course '{id}' is not listed under {category} for major {major}")]
    UnknownCourse {
        /// Active major abbreviation
        major: String,
        /// Category the toggle was made in
        category: CourseCategory,
        /// Requested course id
        id: String,
    },
}

/// One student's working session
#[derive(Debug, Clone)]
pub struct Session {
    catalog: Arc<Catalog>,
    major: Major,
    curriculum: MajorCurriculum,
    selection: SelectionState,
}

impl Session {
    /// Start a session for a major (abbreviation or name) and current term
    ///
    /// # Errors
    /// Returns `SessionError::UnknownMajor` when the catalog has no such major
    pub fn start(
        catalog: Arc<Catalog>,
        major: &str,
        term: Term,
        policy: CrossListPolicy,
    ) -> Result<Self, SessionError> {
        let major = resolve_major(&catalog, major)?;
        let curriculum = classify(&catalog, &major.abbreviation);
        let selection = SelectionState::new(
            policy,
            SelectionContext::new(major.abbreviation.clone(), term),
            &curriculum,
        );
        info!(
            "Session started for {} ({}), {term}; {} courses, {} pre-selected",
            major.name,
            major.abbreviation,
            curriculum.course_count(),
            selection.counted_count()
        );

        Ok(Self {
            catalog,
            major,
            curriculum,
            selection,
        })
    }

    /// Classified curriculum of any major in the session's catalog
    ///
    /// Unknown abbreviations yield an empty curriculum and a warning.
    #[must_use]
    pub fn get_categories_for_major(&self, abbreviation: &str) -> MajorCurriculum {
        if self.catalog.major(abbreviation).is_none() {
            warn!("No major with abbreviation '{abbreviation}'; curriculum is empty");
        }
        classify(&self.catalog, abbreviation)
    }

    /// Toggle a course as seen from one category
    ///
    /// # Returns
    /// `true` if the counted status changed
    ///
    /// # Errors
    /// Returns `SessionError::UnknownCourse` when the active curriculum does not
    /// list the course under `category`
    pub fn toggle_course(
        &mut self,
        category: CourseCategory,
        id: &str,
        on: bool,
    ) -> Result<bool, SessionError> {
        let id = id.trim();
        if self.curriculum.find(category, id).is_none() {
            return Err(SessionError::UnknownCourse {
                major: self.major.abbreviation.clone(),
                category,
                id: id.to_string(),
            });
        }
        let changed = self.selection.toggle(category, id, on);
        debug!(
            "{} {id} in {category} ({})",
            if on { "take" } else { "drop" },
            if changed { "changed" } else { "unchanged" }
        );
        Ok(changed)
    }

    /// First category (canonical order) listing a course id
    #[must_use]
    pub fn category_of(&self, id: &str) -> Option<CourseCategory> {
        self.curriculum.categories_of(id.trim()).into_iter().next()
    }

    /// Switch to another (major, term) context, discarding all toggles
    ///
    /// # Errors
    /// Returns `SessionError::UnknownMajor` and leaves the session untouched
    /// when the major is unknown
    pub fn reset_context(&mut self, major: &str, term: Term) -> Result<(), SessionError> {
        let major = resolve_major(&self.catalog, major)?;
        self.curriculum = classify(&self.catalog, &major.abbreviation);
        self.selection.reset(
            SelectionContext::new(major.abbreviation.clone(), term),
            &self.curriculum,
        );
        info!("Context reset to {} at {term}", major.abbreviation);
        self.major = major;
        Ok(())
    }

    /// Install a freshly loaded catalog and reset the current context against it
    ///
    /// # Errors
    /// Returns `SessionError::UnknownMajor` when the new catalog dropped the
    /// active major; the old catalog is kept in that case
    pub fn replace_catalog(&mut self, catalog: Arc<Catalog>) -> Result<(), SessionError> {
        let previous = std::mem::replace(&mut self.catalog, catalog);
        let abbreviation = self.major.abbreviation.clone();
        let term = self.term();
        if let Err(err) = self.reset_context(&abbreviation, term) {
            self.catalog = previous;
            return Err(err);
        }
        Ok(())
    }

    /// Credit totals for the current selection
    #[must_use]
    pub fn get_summary(&self) -> CreditSummary {
        summarize(&self.curriculum, &self.selection, &self.major)
    }

    /// Counted courses with the category each is credited to
    #[must_use]
    pub fn counted_courses(&self) -> Vec<(CourseCategory, &Course)> {
        counted_courses(&self.curriculum, &self.selection)
    }

    /// Catalog snapshot in use
    #[must_use]
    pub const fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Active major
    #[must_use]
    pub const fn major(&self) -> &Major {
        &self.major
    }

    /// Faculty of the active major, if listed
    #[must_use]
    pub fn faculty(&self) -> Option<&Faculty> {
        self.catalog.faculty(&self.major.faculty_ref)
    }

    /// Student's current term
    #[must_use]
    pub const fn term(&self) -> Term {
        self.selection.context().term
    }

    /// Classified curriculum of the active major
    #[must_use]
    pub const fn curriculum(&self) -> &MajorCurriculum {
        &self.curriculum
    }

    /// Current selection
    #[must_use]
    pub const fn selection(&self) -> &SelectionState {
        &self.selection
    }
}

fn resolve_major(catalog: &Catalog, key: &str) -> Result<Major, SessionError> {
    catalog
        .find_major(key)
        .cloned()
        .ok_or_else(|| SessionError::UnknownMajor(key.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::Affinity;

    fn catalog(core_credits: f32) -> Arc<Catalog> {
        let courses = vec![
            Course::new("M101".into(), "Calculus".into(), String::new(), core_credits, CourseCategory::Core)
                .with_term(Term::new(1, 1))
                .with_affinity(Affinity::parse("CPE, SE")),
            Course::new("M301".into(), "Compilers".into(), String::new(), 3.0, CourseCategory::Core)
                .with_term(Term::new(3, 1))
                .with_affinity(Affinity::parse("SE")),
            Course::new("E301".into(), "Cloud".into(), String::new(), 3.0, CourseCategory::MajorElectivePlan)
                .with_affinity(Affinity::parse("SE")),
            Course::new("F100".into(), "Guitar".into(), String::new(), 1.0, CourseCategory::FreeElective),
        ];
        let majors = vec![
            Major::new("Software Engineering".into(), "SE".into(), "Engineering".into(), 130.0),
            Major::new("Computer Engineering".into(), "CPE".into(), "Engineering".into(), 136.0),
        ];
        Arc::new(Catalog::new(
            vec![Faculty::new("Engineering".into(), 2)],
            majors,
            courses,
        ))
    }

    fn session() -> Session {
        Session::start(catalog(3.0), "se", Term::new(2, 1), CrossListPolicy::Shared)
            .expect("session starts")
    }

    #[test]
    fn test_start_seeds_core() {
        let session = session();
        assert_eq!(session.major().abbreviation, "SE");
        let summary = session.get_summary();
        assert!((summary.earned(CourseCategory::Core) - 3.0).abs() < f32::EPSILON);
        assert_eq!(session.faculty().map(|f| f.name.as_str()), Some("Engineering"));
    }

    #[test]
    fn test_start_by_major_name() {
        let session = Session::start(
            catalog(3.0),
            "Computer Engineering",
            Term::new(1, 1),
            CrossListPolicy::Shared,
        )
        .expect("session starts");
        assert_eq!(session.major().abbreviation, "CPE");
    }

    #[test]
    fn test_unknown_major_rejected() {
        let err = Session::start(catalog(3.0), "EE", Term::new(1, 1), CrossListPolicy::Shared)
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownMajor("EE".to_string()));
    }

    #[test]
    fn test_toggle_course() {
        let mut session = session();
        assert_eq!(session.toggle_course(CourseCategory::MajorElectivePlan, "E301", true), Ok(true));
        assert_eq!(session.toggle_course(CourseCategory::MajorElectivePlan, "E301", true), Ok(false));
        assert!((session.get_summary().major_elective_total() - 3.0).abs() < f32::EPSILON);
        assert_eq!(session.counted_courses().len(), 2);
    }

    #[test]
    fn test_toggle_unknown_course_rejected() {
        let mut session = session();
        let err = session
            .toggle_course(CourseCategory::Core, "E301", true)
            .unwrap_err();
        assert!(matches!(err, SessionError::UnknownCourse { ref id, .. } if id == "E301"));
        assert_eq!(session.category_of("E301"), Some(CourseCategory::MajorElectivePlan));
        assert_eq!(session.category_of("NOPE"), None);
    }

    #[test]
    fn test_reset_context_discards_toggles() {
        let mut session = session();
        session
            .toggle_course(CourseCategory::FreeElective, "F100", true)
            .expect("toggle");
        session.reset_context("CPE", Term::new(1, 1)).expect("reset");

        assert_eq!(session.major().abbreviation, "CPE");
        assert!(!session.selection().is_counted("F100"));
        assert!(session.selection().is_counted("M101"));
        assert!(session.curriculum().find(CourseCategory::Core, "M301").is_none());
    }

    #[test]
    fn test_reset_to_unknown_major_keeps_state() {
        let mut session = session();
        assert!(session.reset_context("EE", Term::new(1, 1)).is_err());
        assert_eq!(session.major().abbreviation, "SE");
        assert_eq!(session.term(), Term::new(2, 1));
    }

    #[test]
    fn test_replace_catalog() {
        let mut session = session();
        session.replace_catalog(catalog(4.0)).expect("replace");
        assert!((session.get_summary().earned(CourseCategory::Core) - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_categories_for_other_major() {
        let session = session();
        let cpe = session.get_categories_for_major("cpe");
        assert_eq!(cpe.courses_in(CourseCategory::Core).len(), 1);
        assert!(session.get_categories_for_major("EE").is_empty());
    }
}
