//! Catalog loading: CSV sources, normalization and the TTL-cached repository

pub mod csv_table;
pub mod normalize;
pub mod repository;
pub mod source;

pub use csv_table::CsvTable;
pub use normalize::load_catalog;
pub use repository::CatalogRepository;
pub use source::{CatalogSource, DirectorySource, InMemorySource};

use crate::core::models::CourseCategory;
use std::fmt;

/// The six tables (sheet tabs) a catalog is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogTable {
    /// Faculties and their major counts
    Faculty,
    /// Majors and their credit goals
    Majors,
    /// Per-major study plans (core, plan electives, co-op, project)
    Core,
    /// General-education courses
    GenEd,
    /// Shared major-elective pool
    Elective,
    /// Free electives
    FreeElective,
}

impl CatalogTable {
    /// All tables in load order
    pub const ALL: [Self; 6] = [
        Self::Faculty,
        Self::Majors,
        Self::Core,
        Self::GenEd,
        Self::Elective,
        Self::FreeElective,
    ];

    /// Sheet tab name, also used as the CSV file stem
    #[must_use]
    pub const fn tab_name(self) -> &'static str {
        match self {
            Self::Faculty => "Faculty",
            Self::Majors => "Majors",
            Self::Core => "Core",
            Self::GenEd => "7group",
            Self::Elective => "Elective",
            Self::FreeElective => "FreeElective",
        }
    }

    /// Whether every row must carry a `major_ref` cell
    #[must_use]
    pub const fn requires_affinity(self) -> bool {
        matches!(self, Self::Core)
    }

    /// Category for tables whose rows all share one category
    #[must_use]
    pub const fn course_category(self) -> Option<CourseCategory> {
        match self {
            Self::GenEd => Some(CourseCategory::GenEd),
            Self::Elective => Some(CourseCategory::MajorElectivePool),
            Self::FreeElective => Some(CourseCategory::FreeElective),
            Self::Faculty | Self::Majors | Self::Core => None,
        }
    }
}

impl fmt::Display for CatalogTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tab_name())
    }
}
