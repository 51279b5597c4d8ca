//! Catalog model: one read-only snapshot of every curriculum table

use super::{Course, CourseCategory, Faculty, Major};
use crate::core::diagnostics::LoadDiagnostics;

/// A complete catalog snapshot for one load cycle
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Faculties in sheet order
    pub faculties: Vec<Faculty>,

    /// Majors in sheet order
    pub majors: Vec<Major>,

    /// Courses from every course table, tagged with their category
    courses: Vec<Course>,

    /// Data-quality findings collected while normalizing the tables
    pub diagnostics: LoadDiagnostics,
}

impl Catalog {
    /// Create a catalog from already-normalized records
    #[must_use]
    pub const fn new(faculties: Vec<Faculty>, majors: Vec<Major>, courses: Vec<Course>) -> Self {
        Self {
            faculties,
            majors,
            courses,
            diagnostics: LoadDiagnostics::new(),
        }
    }

    /// Attach load diagnostics
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: LoadDiagnostics) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Get all courses
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Iterate the courses of one category in catalog order
    pub fn courses_in(&self, category: CourseCategory) -> impl Iterator<Item = &Course> {
        self.courses
            .iter()
            .filter(move |course| course.category() == category)
    }

    /// Find a faculty by exact name
    #[must_use]
    pub fn faculty(&self, name: &str) -> Option<&Faculty> {
        self.faculties.iter().find(|f| f.name == name.trim())
    }

    /// Majors belonging to a faculty, in sheet order
    pub fn majors_in_faculty<'a>(&'a self, faculty: &'a str) -> impl Iterator<Item = &'a Major> {
        self.majors
            .iter()
            .filter(move |major| major.faculty_ref == faculty.trim())
    }

    /// Find a major by abbreviation (case-insensitive)
    #[must_use]
    pub fn major(&self, abbreviation: &str) -> Option<&Major> {
        self.majors
            .iter()
            .find(|major| major.has_abbreviation(abbreviation))
    }

    /// Find a major by abbreviation first, then by exact name
    #[must_use]
    pub fn find_major(&self, key: &str) -> Option<&Major> {
        self.major(key)
            .or_else(|| self.majors.iter().find(|major| major.name == key.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_catalog() -> Catalog {
        let faculties = vec![
            Faculty::new("Engineering".to_string(), 2),
            Faculty::new("Science".to_string(), 1),
        ];
        let majors = vec![
            Major::new(
                "Software Engineering".to_string(),
                "SE".to_string(),
                "Engineering".to_string(),
                130.0,
            ),
            Major::new(
                "Computer Engineering".to_string(),
                "CPE".to_string(),
                "Engineering".to_string(),
                136.0,
            ),
            Major::new(
                "Mathematics".to_string(),
                "MATH".to_string(),
                "Science".to_string(),
                128.0,
            ),
        ];
        let courses = vec![
            Course::new(
                "M101".to_string(),
                "Calculus".to_string(),
                String::new(),
                3.0,
                CourseCategory::Core,
            ),
            Course::new(
                "F201".to_string(),
                "Photography".to_string(),
                String::new(),
                2.0,
                CourseCategory::FreeElective,
            ),
        ];
        Catalog::new(faculties, majors, courses)
    }

    #[test]
    fn test_major_lookup() {
        let catalog = sample_catalog();
        assert_eq!(catalog.major("se").map(|m| m.name.as_str()), Some("Software Engineering"));
        assert_eq!(
            catalog.find_major("Mathematics").map(|m| m.abbreviation.as_str()),
            Some("MATH")
        );
        assert!(catalog.major("EE").is_none());
    }

    #[test]
    fn test_majors_in_faculty() {
        let catalog = sample_catalog();
        let names: Vec<&str> = catalog
            .majors_in_faculty("Engineering")
            .map(|m| m.abbreviation.as_str())
            .collect();
        assert_eq!(names, vec!["SE", "CPE"]);
        assert_eq!(catalog.majors_in_faculty("Law").count(), 0);
    }

    #[test]
    fn test_courses_in_category() {
        let catalog = sample_catalog();
        assert_eq!(catalog.courses().len(), 2);
        assert_eq!(catalog.courses_in(CourseCategory::Core).count(), 1);
        assert_eq!(catalog.courses_in(CourseCategory::GenEd).count(), 0);
        assert!(catalog.faculty("Science").is_some());
    }
}
