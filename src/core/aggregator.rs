//! Credit aggregator: pure per-category sums over a selection

use crate::core::classifier::MajorCurriculum;
use crate::core::models::{Course, CourseCategory, Major};
use crate::core::selection::{CrossListPolicy, SelectionState};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Credit totals for one selection; recomputed, never stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreditSummary {
    /// Earned credits per category (every category present, zero when empty)
    pub earned_by_category: BTreeMap<CourseCategory, f32>,
    /// Sum of the per-category totals
    pub total_earned: f32,
    /// The major's credit goal
    pub total_required: f32,
    /// `max(total_required - total_earned, 0)`
    pub remaining: f32,
    /// Completion in `[0, 1]`
    pub percent: f32,
}

/// Display buckets of the summary breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryBucket {
    /// Core courses
    Core,
    /// Plan and pool major electives
    MajorElective,
    /// Co-op and major project
    Capstone,
    /// General education
    GenEd,
    /// Free electives
    Free,
    /// Credits still missing
    Missing,
}

impl SummaryBucket {
    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Core => "Core",
            Self::MajorElective => "Major Elective",
            Self::Capstone => "Capstone",
            Self::GenEd => "General Education",
            Self::Free => "Free Elective",
            Self::Missing => "Missing",
        }
    }
}

impl fmt::Display for SummaryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One slice of the breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BreakdownEntry {
    /// Bucket
    pub bucket: SummaryBucket,
    /// Credits in the bucket
    pub credits: f32,
}

impl CreditSummary {
    /// Earned credits of one category
    #[must_use]
    pub fn earned(&self, category: CourseCategory) -> f32 {
        self.earned_by_category
            .get(&category)
            .copied()
            .unwrap_or_default()
    }

    /// Plan and pool electives together
    #[must_use]
    pub fn major_elective_total(&self) -> f32 {
        self.earned(CourseCategory::MajorElectivePlan) + self.earned(CourseCategory::MajorElectivePool)
    }

    /// Co-op and project together
    #[must_use]
    pub fn capstone_total(&self) -> f32 {
        self.earned(CourseCategory::Coop) + self.earned(CourseCategory::Project)
    }

    /// The six display buckets, `Missing` last
    #[must_use]
    pub fn breakdown(&self) -> Vec<BreakdownEntry> {
        [
            (SummaryBucket::Core, self.earned(CourseCategory::Core)),
            (SummaryBucket::MajorElective, self.major_elective_total()),
            (SummaryBucket::Capstone, self.capstone_total()),
            (SummaryBucket::GenEd, self.earned(CourseCategory::GenEd)),
            (SummaryBucket::Free, self.earned(CourseCategory::FreeElective)),
            (SummaryBucket::Missing, self.remaining),
        ]
        .into_iter()
        .map(|(bucket, credits)| BreakdownEntry { bucket, credits })
        .collect()
    }

    /// Whether the credit goal is met
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.remaining <= 0.0
    }
}

/// Counted courses with the category each one is credited to
///
/// Under [`CrossListPolicy::Shared`] a course listed in several categories is
/// credited once, to the first category in canonical order. Under
/// [`CrossListPolicy::PerContext`] it is credited in every category where it
/// is toggled on.
#[must_use]
pub fn counted_courses<'a>(
    curriculum: &'a MajorCurriculum,
    selection: &SelectionState,
) -> Vec<(CourseCategory, &'a Course)> {
    let mut credited: HashSet<&str> = HashSet::new();
    curriculum
        .entries()
        .into_iter()
        .filter(|(category, course)| selection.is_counted_in(*category, &course.id))
        .filter(|(_, course)| {
            selection.policy() == CrossListPolicy::PerContext || credited.insert(course.id.as_str())
        })
        .collect()
}

/// Sum the credits of the counted courses per category
#[must_use]
pub fn summarize(
    curriculum: &MajorCurriculum,
    selection: &SelectionState,
    major: &Major,
) -> CreditSummary {
    let mut earned_by_category: BTreeMap<CourseCategory, f32> =
        CourseCategory::ALL.into_iter().map(|c| (c, 0.0)).collect();

    for (category, course) in counted_courses(curriculum, selection) {
        *earned_by_category.entry(category).or_default() += course.credits;
    }

    let total_earned: f32 = earned_by_category.values().sum();
    let total_required = major.total_credits;
    let percent = if total_required <= 0.0 {
        1.0
    } else {
        (total_earned / total_required).clamp(0.0, 1.0)
    };

    CreditSummary {
        earned_by_category,
        total_earned,
        total_required,
        remaining: (total_required - total_earned).max(0.0),
        percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classifier::classify;
    use crate::core::models::{Affinity, Catalog, Faculty, Term};
    use crate::core::selection::SelectionContext;

    fn course(id: &str, credits: f32, category: CourseCategory) -> Course {
        Course::new(id.to_string(), id.to_string(), String::new(), credits, category)
            .with_affinity(Affinity::parse("SE"))
    }

    fn major(total: f32) -> Major {
        Major::new("Software Engineering".into(), "SE".into(), "Eng".into(), total)
    }

    fn setup(courses: Vec<Course>, total: f32) -> (MajorCurriculum, Major) {
        let catalog = Catalog::new(vec![Faculty::new("Eng".into(), 1)], vec![major(total)], courses);
        (classify(&catalog, "SE"), major(total))
    }

    fn selection(policy: CrossListPolicy, curriculum: &MajorCurriculum, term: Term) -> SelectionState {
        SelectionState::new(policy, SelectionContext::new("SE", term), curriculum)
    }

    #[test]
    fn test_scenario_core_course_seeded() {
        let (curriculum, major) = setup(
            vec![course("M101", 3.0, CourseCategory::Core).with_term(Term::new(1, 1))],
            130.0,
        );
        let state = selection(CrossListPolicy::Shared, &curriculum, Term::new(2, 1));
        let summary = summarize(&curriculum, &state, &major);
        assert!((summary.earned(CourseCategory::Core) - 3.0).abs() < f32::EPSILON);
        assert!((summary.remaining - 127.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_additivity() {
        let (curriculum, major) = setup(
            vec![
                course("M101", 3.0, CourseCategory::Core).with_term(Term::new(1, 1)),
                course("E301", 2.5, CourseCategory::MajorElectivePlan),
                course("C401", 6.0, CourseCategory::Coop),
                Course::new("G101".into(), "G".into(), String::new(), 3.0, CourseCategory::GenEd),
                Course::new("F100".into(), "F".into(), String::new(), 1.0, CourseCategory::FreeElective),
            ],
            130.0,
        );
        let mut state = selection(CrossListPolicy::Shared, &curriculum, Term::new(1, 1));
        state.toggle(CourseCategory::MajorElectivePlan, "E301", true);
        state.toggle(CourseCategory::Coop, "C401", true);
        state.toggle(CourseCategory::GenEd, "G101", true);
        state.toggle(CourseCategory::FreeElective, "F100", true);

        let summary = summarize(&curriculum, &state, &major);
        let sum: f32 = summary.earned_by_category.values().sum();
        assert!((summary.total_earned - sum).abs() < f32::EPSILON);
        assert!((summary.total_earned - 15.5).abs() < f32::EPSILON);
        assert!((summary.major_elective_total() - 2.5).abs() < f32::EPSILON);
        assert!((summary.capstone_total() - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clamped_when_over_goal() {
        let (curriculum, major) = setup(
            vec![course("BIG", 140.0, CourseCategory::Core).with_term(Term::new(1, 1))],
            130.0,
        );
        let state = selection(CrossListPolicy::Shared, &curriculum, Term::new(1, 1));
        let summary = summarize(&curriculum, &state, &major);
        assert!(summary.remaining.abs() < f32::EPSILON);
        assert!((summary.percent - 1.0).abs() < f32::EPSILON);
        assert!(summary.is_complete());
    }

    #[test]
    fn test_zero_goal_is_complete() {
        let (curriculum, major) = setup(vec![course("M101", 3.0, CourseCategory::Core)], 0.0);
        let state = selection(CrossListPolicy::Shared, &curriculum, Term::UNKNOWN);
        let summary = summarize(&curriculum, &state, &major);
        assert!((summary.percent - 1.0).abs() < f32::EPSILON);
        assert!(summary.remaining.abs() < f32::EPSILON);
    }

    #[test]
    fn test_zero_credit_course_listed_but_adds_nothing() {
        let (curriculum, major) = setup(
            vec![
                course("M101", 3.0, CourseCategory::Core).with_term(Term::new(1, 1)),
                course("M102", 0.0, CourseCategory::Core).with_term(Term::new(1, 1)),
            ],
            130.0,
        );
        let state = selection(CrossListPolicy::Shared, &curriculum, Term::new(1, 1));
        assert_eq!(counted_courses(&curriculum, &state).len(), 2);
        let summary = summarize(&curriculum, &state, &major);
        assert!((summary.total_earned - 3.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cross_listed_counts_once_when_shared() {
        let courses = vec![
            course("X500", 3.0, CourseCategory::MajorElectivePlan),
            Course::new("X500".into(), "X".into(), String::new(), 3.0, CourseCategory::MajorElectivePool),
        ];
        let (curriculum, major) = setup(courses, 130.0);
        let mut state = selection(CrossListPolicy::Shared, &curriculum, Term::new(1, 1));
        state.toggle(CourseCategory::MajorElectivePool, "X500", true);

        let summary = summarize(&curriculum, &state, &major);
        assert!((summary.total_earned - 3.0).abs() < f32::EPSILON);
        assert!((summary.earned(CourseCategory::MajorElectivePlan) - 3.0).abs() < f32::EPSILON);
        assert!(summary.earned(CourseCategory::MajorElectivePool).abs() < f32::EPSILON);
    }

    #[test]
    fn test_cross_listed_double_counts_per_context() {
        let courses = vec![
            course("X500", 3.0, CourseCategory::MajorElectivePlan),
            Course::new("X500".into(), "X".into(), String::new(), 3.0, CourseCategory::MajorElectivePool),
        ];
        let (curriculum, major) = setup(courses, 130.0);
        let mut state = selection(CrossListPolicy::PerContext, &curriculum, Term::new(1, 1));
        state.toggle(CourseCategory::MajorElectivePlan, "X500", true);
        state.toggle(CourseCategory::MajorElectivePool, "X500", true);

        let summary = summarize(&curriculum, &state, &major);
        assert!((summary.total_earned - 6.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_breakdown_buckets() {
        let (curriculum, major) = setup(
            vec![course("M101", 3.0, CourseCategory::Core).with_term(Term::new(1, 1))],
            10.0,
        );
        let state = selection(CrossListPolicy::Shared, &curriculum, Term::new(1, 1));
        let breakdown = summarize(&curriculum, &state, &major).breakdown();
        assert_eq!(breakdown.len(), 6);
        assert_eq!(breakdown[0].bucket, SummaryBucket::Core);
        assert_eq!(breakdown[5].bucket, SummaryBucket::Missing);
        assert!((breakdown[5].credits - 7.0).abs() < f32::EPSILON);
    }
}
