//! Course classifier: partitions one major's courses into display categories
//!
//! The classifier is a pure function of the catalog and a major
//! abbreviation. A course is visible to a major when its affinity contains the
//! abbreviation (case-insensitive); every visible course lands in exactly one
//! category, the one assigned at load time.

use crate::core::models::{Catalog, Course, CourseCategory, Term};
use std::collections::BTreeMap;

/// Display level of a group label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Leading token has no `.` (e.g. "1 Language")
    TopLevel,
    /// Leading token is dotted (e.g. "1.1 English")
    SubGroup,
}

/// Classify a group label by its leading token (up to the first space)
#[must_use]
pub fn group_kind(label: &str) -> GroupKind {
    let leading = label.trim().split(' ').next().unwrap_or_default();
    if leading.contains('.') {
        GroupKind::SubGroup
    } else {
        GroupKind::TopLevel
    }
}

/// Courses sharing one exact group label
#[derive(Debug, Clone, PartialEq)]
pub struct CourseGroup {
    /// Group label as it appears in the catalog
    pub label: String,
    /// Display level
    pub kind: GroupKind,
    /// Courses in catalog order
    pub courses: Vec<Course>,
}

/// A list of courses split into an ungrouped part and labelled groups
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedCourses {
    /// Courses with an empty group, rendered as a flat list
    pub ungrouped: Vec<Course>,
    /// Groups sorted lexicographically by label
    pub groups: Vec<CourseGroup>,
}

impl GroupedCourses {
    /// Cluster courses by exact group-label equality
    #[must_use]
    pub fn from_courses(courses: Vec<Course>) -> Self {
        let mut ungrouped = Vec::new();
        let mut by_label: BTreeMap<String, Vec<Course>> = BTreeMap::new();

        for course in courses {
            if course.group.is_empty() {
                ungrouped.push(course);
            } else {
                by_label.entry(course.group.clone()).or_default().push(course);
            }
        }

        let groups = by_label
            .into_iter()
            .map(|(label, courses)| CourseGroup {
                kind: group_kind(&label),
                label,
                courses,
            })
            .collect();

        Self { ungrouped, groups }
    }

    /// Every course, ungrouped first, then group by group
    pub fn iter(&self) -> impl Iterator<Item = &Course> {
        self.ungrouped
            .iter()
            .chain(self.groups.iter().flat_map(|group| group.courses.iter()))
    }

    /// Number of courses
    #[must_use]
    pub fn len(&self) -> usize {
        self.ungrouped.len() + self.groups.iter().map(|g| g.courses.len()).sum::<usize>()
    }

    /// Whether there are no courses
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Core courses planned for one term
#[derive(Debug, Clone, PartialEq)]
pub struct TermBucket {
    /// Planned term (`Term::UNKNOWN` sorts first)
    pub term: Term,
    /// Courses of the term
    pub courses: GroupedCourses,
}

/// General-education courses of one section, in first-seen section order
#[derive(Debug, Clone, PartialEq)]
pub struct GenEdSection {
    /// Section label (the GenEd `category` column)
    pub name: String,
    /// Courses of the section
    pub courses: GroupedCourses,
}

/// The classified curriculum of one major
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MajorCurriculum {
    /// Abbreviation the curriculum was classified for
    pub major: String,
    /// Core courses bucketed by term, ascending
    pub core: Vec<TermBucket>,
    /// Major electives from the study plan
    pub major_elective_plan: GroupedCourses,
    /// Major electives from the shared pool
    pub major_elective_pool: GroupedCourses,
    /// Cooperative education
    pub coop: Vec<Course>,
    /// Major project
    pub project: Vec<Course>,
    /// General education, by section
    pub gen_ed: Vec<GenEdSection>,
    /// Free electives
    pub free_elective: GroupedCourses,
}

impl MajorCurriculum {
    /// Courses of one category
    #[must_use]
    pub fn courses_in(&self, category: CourseCategory) -> Vec<&Course> {
        match category {
            CourseCategory::Core => self
                .core
                .iter()
                .flat_map(|bucket| bucket.courses.iter())
                .collect(),
            CourseCategory::MajorElectivePlan => self.major_elective_plan.iter().collect(),
            CourseCategory::MajorElectivePool => self.major_elective_pool.iter().collect(),
            CourseCategory::Coop => self.coop.iter().collect(),
            CourseCategory::Project => self.project.iter().collect(),
            CourseCategory::GenEd => self
                .gen_ed
                .iter()
                .flat_map(|section| section.courses.iter())
                .collect(),
            CourseCategory::FreeElective => self.free_elective.iter().collect(),
        }
    }

    /// Every (category, course) pair in canonical category order
    #[must_use]
    pub fn entries(&self) -> Vec<(CourseCategory, &Course)> {
        CourseCategory::ALL
            .into_iter()
            .flat_map(|category| {
                self.courses_in(category)
                    .into_iter()
                    .map(move |course| (category, course))
            })
            .collect()
    }

    /// Look up a course within one category
    #[must_use]
    pub fn find(&self, category: CourseCategory, id: &str) -> Option<&Course> {
        self.courses_in(category)
            .into_iter()
            .find(|course| course.id == id)
    }

    /// Categories listing a course id, in canonical order
    #[must_use]
    pub fn categories_of(&self, id: &str) -> Vec<CourseCategory> {
        CourseCategory::ALL
            .into_iter()
            .filter(|category| self.find(*category, id).is_some())
            .collect()
    }

    /// Total number of listed courses
    #[must_use]
    pub fn course_count(&self) -> usize {
        CourseCategory::ALL
            .into_iter()
            .map(|category| self.courses_in(category).len())
            .sum()
    }

    /// Whether the major sees no course at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.course_count() == 0
    }
}

/// Partition the courses visible to a major into categories
///
/// Abbreviations that match no major yield an empty curriculum.
#[must_use]
pub fn classify(catalog: &Catalog, major: &str) -> MajorCurriculum {
    if catalog.major(major).is_none() {
        return MajorCurriculum {
            major: major.trim().to_string(),
            ..MajorCurriculum::default()
        };
    }

    let mut core: BTreeMap<Term, Vec<Course>> = BTreeMap::new();
    let mut plan = Vec::new();
    let mut pool = Vec::new();
    let mut coop = Vec::new();
    let mut project = Vec::new();
    let mut gen_ed: Vec<(String, Vec<Course>)> = Vec::new();
    let mut free = Vec::new();

    for course in catalog.courses().iter().filter(|c| c.counts_toward(major)) {
        let course = course.clone();
        match course.category() {
            CourseCategory::Core => core.entry(course.term).or_default().push(course),
            CourseCategory::MajorElectivePlan => plan.push(course),
            CourseCategory::MajorElectivePool => pool.push(course),
            CourseCategory::Coop => coop.push(course),
            CourseCategory::Project => project.push(course),
            CourseCategory::GenEd => {
                if let Some(idx) = gen_ed.iter().position(|(name, _)| *name == course.section) {
                    gen_ed[idx].1.push(course);
                } else {
                    gen_ed.push((course.section.clone(), vec![course]));
                }
            }
            CourseCategory::FreeElective => free.push(course),
        }
    }

    MajorCurriculum {
        major: major.trim().to_string(),
        core: core
            .into_iter()
            .map(|(term, courses)| TermBucket {
                term,
                courses: GroupedCourses::from_courses(courses),
            })
            .collect(),
        major_elective_plan: GroupedCourses::from_courses(plan),
        major_elective_pool: GroupedCourses::from_courses(pool),
        coop,
        project,
        gen_ed: gen_ed
            .into_iter()
            .map(|(name, courses)| GenEdSection {
                name,
                courses: GroupedCourses::from_courses(courses),
            })
            .collect(),
        free_elective: GroupedCourses::from_courses(free),
    }
}
