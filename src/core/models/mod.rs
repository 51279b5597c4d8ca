//! Data models for `CreditChecker`

pub mod catalog;
pub mod course;
pub mod major;
pub mod term;

pub use catalog::Catalog;
pub use course::{format_credits, Affinity, Course, CourseCategory};
pub use major::{Faculty, Major};
pub use term::Term;
