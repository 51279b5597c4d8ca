//! Catalog browsing commands: faculties, majors, curriculum

use super::load_catalog;
use credit_checker::core::classifier::{
    classify, CourseGroup, GroupKind, GroupedCourses, MajorCurriculum,
};
use credit_checker::core::loader::{CatalogRepository, CatalogSource};
use credit_checker::core::models::{format_credits, Course, CourseCategory};
use credit_checker::core::selection::SelectionState;
use credit_checker::error;
use std::fmt::Write;

/// Run the faculties command
pub fn run_faculties<S: CatalogSource>(repository: &mut CatalogRepository<S>) {
    let Some(catalog) = load_catalog(repository) else {
        return;
    };
    if catalog.faculties.is_empty() {
        println!("No faculties in the catalog");
        return;
    }
    for faculty in &catalog.faculties {
        println!("{}", faculty.display_label());
    }
}

/// Run the majors command
pub fn run_majors<S: CatalogSource>(repository: &mut CatalogRepository<S>, faculty: Option<&str>) {
    let Some(catalog) = load_catalog(repository) else {
        return;
    };

    let majors: Vec<_> = match faculty {
        Some(name) => {
            if catalog.faculty(name).is_none() {
                error!("Unknown faculty '{name}'");
                eprintln!("✗ Unknown faculty '{name}'");
                return;
            }
            catalog.majors_in_faculty(name).collect()
        }
        None => catalog.majors.iter().collect(),
    };

    for major in majors {
        println!(
            "{:<8} {} ({} credits, {})",
            major.abbreviation,
            major.name,
            format_credits(major.total_credits),
            major.faculty_ref
        );
    }
}

/// Run the curriculum command
pub fn run_curriculum<S: CatalogSource>(repository: &mut CatalogRepository<S>, major: &str) {
    let Some(catalog) = load_catalog(repository) else {
        return;
    };
    let Some(found) = catalog.find_major(major) else {
        error!("Unknown major '{major}'");
        eprintln!("✗ Unknown major '{major}'");
        return;
    };
    let curriculum = classify(&catalog, &found.abbreviation);
    print!("{}", format_curriculum(&curriculum, None));
}

/// Render a classified curriculum, marking counted courses when a selection is given
pub fn format_curriculum(curriculum: &MajorCurriculum, selection: Option<&SelectionState>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Curriculum for {} ({} courses)",
        curriculum.major,
        curriculum.course_count()
    );

    let mark = |category: CourseCategory, course: &Course| match selection {
        Some(state) if state.is_counted_in(category, &course.id) => "[x] ",
        Some(_) => "[ ] ",
        None => "",
    };

    for category in CourseCategory::ALL {
        if curriculum.courses_in(category).is_empty() {
            continue;
        }
        let _ = writeln!(out, "\n{category}");

        match category {
            CourseCategory::Core => {
                for bucket in &curriculum.core {
                    let _ = writeln!(out, "  {}", bucket.term);
                    write_grouped(&mut out, &bucket.courses, 4, &|c| mark(category, c));
                }
            }
            CourseCategory::MajorElectivePlan => {
                write_grouped(&mut out, &curriculum.major_elective_plan, 2, &|c| mark(category, c));
            }
            CourseCategory::MajorElectivePool => {
                write_grouped(&mut out, &curriculum.major_elective_pool, 2, &|c| mark(category, c));
            }
            CourseCategory::Coop => {
                write_courses(&mut out, &curriculum.coop, 2, &|c| mark(category, c));
            }
            CourseCategory::Project => {
                write_courses(&mut out, &curriculum.project, 2, &|c| mark(category, c));
            }
            CourseCategory::GenEd => {
                for section in &curriculum.gen_ed {
                    let name = if section.name.is_empty() { "Other" } else { &section.name };
                    let _ = writeln!(out, "  {name}");
                    write_grouped(&mut out, &section.courses, 4, &|c| mark(category, c));
                }
            }
            CourseCategory::FreeElective => {
                write_grouped(&mut out, &curriculum.free_elective, 2, &|c| mark(category, c));
            }
        }
    }

    out
}

fn write_courses(out: &mut String, courses: &[Course], indent: usize, mark: &dyn Fn(&Course) -> &'static str) {
    for course in courses {
        let _ = writeln!(out, "{:indent$}{}{}", "", mark(course), course.display_label());
    }
}

fn write_grouped(
    out: &mut String,
    grouped: &GroupedCourses,
    indent: usize,
    mark: &dyn Fn(&Course) -> &'static str,
) {
    write_courses(out, &grouped.ungrouped, indent, mark);
    for CourseGroup { label, kind, courses } in &grouped.groups {
        let depth = match kind {
            GroupKind::TopLevel => indent,
            GroupKind::SubGroup => indent + 2,
        };
        let _ = writeln!(out, "{:depth$}{label}", "");
        write_courses(out, courses, depth + 2, mark);
    }
}
