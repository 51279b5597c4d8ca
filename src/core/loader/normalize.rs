//! Normalization pass: raw CSV tables -> fully-typed, default-filled catalog
//!
//! Every recoverable data-quality problem is resolved here, once, and recorded
//! in the catalog's [`LoadDiagnostics`]:
//! - absent optional columns get a documented default (`SchemaDefault`)
//! - unparseable `credits` / `term` / `special_type` cells become `0` or
//!   `Term::UNKNOWN` or `Core` (`ValueCoercion`)
//! - abbreviations that match no major are reported (`AffinityResolution`)
//!
//! Missing required columns are the only fatal outcome.

use super::csv_table::{cell, CsvTable};
use super::source::CatalogSource;
use super::CatalogTable;
use crate::core::diagnostics::{DataSourceError, DiagnosticKind, LoadDiagnostics};
use crate::core::models::{Affinity, Catalog, Course, CourseCategory, Faculty, Major, Term};
use crate::info;
use std::collections::{BTreeMap, HashSet};

const SUBJECT_ID: &str = "subject_id";
const NAME_EN: &str = "subject_name_en";
const NAME_TH: &str = "subject_name_th";
const CREDITS: &str = "credits";
const TERM: &str = "term";
const SPECIAL_TYPE: &str = "special_type";
const IS_MAJOR_ELECTIVE: &str = "is_major_elective";
const GROUP: &str = "group";
const MAJOR_REF: &str = "major_ref";
const GEN_ED_CATEGORY: &str = "category";
const FACULTY_NAME: &str = "faculty_name";
const MAJOR_COUNT: &str = "major_count";
const MAJOR_NAME: &str = "major_name";
const MAJOR_ABBREVIATION: &str = "major_abbreviation";
const FACULTY_REF: &str = "faculty_ref";
const TOTAL_CREDITS: &str = "total_credits";

/// Fetch every table from a source and normalize it into a [`Catalog`]
///
/// # Errors
/// Returns a `DataSourceError` when a table cannot be fetched, is empty, or
/// lacks a required column
pub fn load_catalog<S: CatalogSource + ?Sized>(source: &S) -> Result<Catalog, DataSourceError> {
    info!("Loading catalog from {}", source.describe());

    let fetch = |tab: CatalogTable| -> Result<CsvTable, DataSourceError> {
        let table = CsvTable::parse(&source.fetch_table(tab)?);
        if table.is_empty() {
            return Err(DataSourceError::EmptyTable {
                table: tab.tab_name().to_string(),
            });
        }
        Ok(table)
    };

    let mut diagnostics = LoadDiagnostics::new();

    let majors = normalize_majors(&fetch(CatalogTable::Majors)?, &mut diagnostics)?;
    let faculties = normalize_faculties(&fetch(CatalogTable::Faculty)?, &majors, &mut diagnostics)?;
    let known: HashSet<String> = majors
        .iter()
        .map(|major| major.abbreviation.trim().to_uppercase())
        .collect();

    let mut courses = normalize_core(&fetch(CatalogTable::Core)?, &known, &mut diagnostics)?;
    courses.extend(normalize_gen_ed(
        &fetch(CatalogTable::GenEd)?,
        &known,
        &mut diagnostics,
    )?);
    courses.extend(normalize_shared(
        CatalogTable::Elective,
        &fetch(CatalogTable::Elective)?,
        &known,
        &mut diagnostics,
    )?);
    courses.extend(normalize_shared(
        CatalogTable::FreeElective,
        &fetch(CatalogTable::FreeElective)?,
        &known,
        &mut diagnostics,
    )?);

    info!(
        "Catalog loaded: {} faculties, {} majors, {} courses ({})",
        faculties.len(),
        majors.len(),
        courses.len(),
        diagnostics.summary_line()
    );

    Ok(Catalog::new(faculties, majors, courses).with_diagnostics(diagnostics))
}

/// Resolve a required column or fail the load
fn required(tab: CatalogTable, table: &CsvTable, column: &str) -> Result<usize, DataSourceError> {
    table
        .column(column)
        .ok_or_else(|| DataSourceError::MissingColumn {
            table: tab.tab_name().to_string(),
            column: column.to_string(),
        })
}

/// Resolve an optional column, recording the substituted default when absent
fn optional(
    tab: CatalogTable,
    table: &CsvTable,
    column: &str,
    default: &str,
    diagnostics: &mut LoadDiagnostics,
) -> Option<usize> {
    let idx = table.column(column);
    if idx.is_none() {
        diagnostics.record(
            DiagnosticKind::SchemaDefault,
            tab.tab_name(),
            format!("no '{column}' column; {default}"),
        );
    }
    idx
}

fn parse_credits(raw: &str, tab: CatalogTable, id: &str, diagnostics: &mut LoadDiagnostics) -> f32 {
    match raw.parse::<f32>() {
        Ok(value) if value.is_finite() && value >= 0.0 => value,
        _ => {
            diagnostics.record(
                DiagnosticKind::ValueCoercion,
                tab.tab_name(),
                format!("credits '{raw}' for {id} treated as 0"),
            );
            0.0
        }
    }
}

fn parse_term(raw: &str, tab: CatalogTable, id: &str, diagnostics: &mut LoadDiagnostics) -> Term {
    Term::parse(raw).unwrap_or_else(|| {
        diagnostics.record(
            DiagnosticKind::ValueCoercion,
            tab.tab_name(),
            format!("term '{raw}' for {id} treated as 0"),
        );
        Term::UNKNOWN
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_count(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0 && v.fract() == 0.0)
            .map(|v| v as usize)
    })
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "x"
    )
}

/// Map a `special_type` cell onto a category
fn special_type_category(raw: &str) -> Option<CourseCategory> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "normal subject" | "normal" => Some(CourseCategory::Core),
        "major elective subject" | "major elective" => Some(CourseCategory::MajorElectivePlan),
        "cooperative education" | "co-op" | "coop" => Some(CourseCategory::Coop),
        "major project" | "project" => Some(CourseCategory::Project),
        _ => None,
    }
}

/// How the Core table marks its special course types
enum TypeColumn {
    SpecialType(usize),
    MajorElectiveFlag(usize),
    Missing,
}

impl TypeColumn {
    fn resolve(table: &CsvTable, diagnostics: &mut LoadDiagnostics) -> Self {
        if let Some(idx) = table.column(SPECIAL_TYPE) {
            return Self::SpecialType(idx);
        }
        if let Some(idx) = table.column(IS_MAJOR_ELECTIVE) {
            return Self::MajorElectiveFlag(idx);
        }
        diagnostics.record(
            DiagnosticKind::SchemaDefault,
            CatalogTable::Core.tab_name(),
            format!("no '{SPECIAL_TYPE}' column; every row is a Normal Subject"),
        );
        Self::Missing
    }

    fn category_of(&self, row: &[String], id: &str, diagnostics: &mut LoadDiagnostics) -> CourseCategory {
        match self {
            Self::SpecialType(idx) => {
                let raw = cell(row, Some(*idx));
                special_type_category(raw).unwrap_or_else(|| {
                    diagnostics.record(
                        DiagnosticKind::ValueCoercion,
                        CatalogTable::Core.tab_name(),
                        format!("special_type '{raw}' for {id} treated as Normal Subject"),
                    );
                    CourseCategory::Core
                })
            }
            Self::MajorElectiveFlag(idx) => {
                if is_truthy(cell(row, Some(*idx))) {
                    CourseCategory::MajorElectivePlan
                } else {
                    CourseCategory::Core
                }
            }
            Self::Missing => CourseCategory::Core,
        }
    }
}

/// Column positions shared by every course table
struct CourseColumns {
    id: usize,
    name_primary: usize,
    name_secondary: usize,
    credits: usize,
    group: Option<usize>,
    major_ref: Option<usize>,
}

impl CourseColumns {
    fn resolve(
        tab: CatalogTable,
        table: &CsvTable,
        diagnostics: &mut LoadDiagnostics,
    ) -> Result<Self, DataSourceError> {
        let id = required(tab, table, SUBJECT_ID)?;
        let name_primary = required(tab, table, NAME_EN)?;
        let name_secondary = required(tab, table, NAME_TH)?;
        let credits = required(tab, table, CREDITS)?;
        let major_ref = if tab.requires_affinity() {
            Some(required(tab, table, MAJOR_REF)?)
        } else {
            table.column(MAJOR_REF)
        };
        let group = optional(tab, table, GROUP, "courses are ungrouped", diagnostics);

        Ok(Self {
            id,
            name_primary,
            name_secondary,
            credits,
            group,
            major_ref,
        })
    }
}

/// Build courses row by row; the first row wins when a `subject_id` repeats
fn read_courses<C, D>(
    tab: CatalogTable,
    table: &CsvTable,
    columns: &CourseColumns,
    diagnostics: &mut LoadDiagnostics,
    category_of: C,
    decorate: D,
) -> Vec<Course>
where
    C: Fn(&[String], &str, &mut LoadDiagnostics) -> CourseCategory,
    D: Fn(&[String], Course, &mut LoadDiagnostics) -> Course,
{
    let mut seen = HashSet::new();
    let mut courses = Vec::new();

    for row in table.rows() {
        let id = cell(row, Some(columns.id));
        if id.is_empty() {
            diagnostics.record(
                DiagnosticKind::ValueCoercion,
                tab.tab_name(),
                "row without subject_id skipped",
            );
            continue;
        }
        if !seen.insert(id.to_string()) {
            diagnostics.record(
                DiagnosticKind::ValueCoercion,
                tab.tab_name(),
                format!("duplicate subject_id '{id}' ignored; first row kept"),
            );
            continue;
        }

        let credits = parse_credits(cell(row, Some(columns.credits)), tab, id, diagnostics);
        let category = category_of(row, id, diagnostics);
        let affinity = columns
            .major_ref
            .map_or(Affinity::Unrestricted, |idx| Affinity::parse(cell(row, Some(idx))));

        let course = Course::new(
            id.to_string(),
            cell(row, Some(columns.name_primary)).to_string(),
            cell(row, Some(columns.name_secondary)).to_string(),
            credits,
            category,
        )
        .with_group(cell(row, columns.group))
        .with_affinity(affinity);

        courses.push(decorate(row, course, diagnostics));
    }

    courses
}

/// Report abbreviations that match no major, one finding per abbreviation
fn check_affinity(
    tab: CatalogTable,
    courses: &[Course],
    known: &HashSet<String>,
    diagnostics: &mut LoadDiagnostics,
) {
    let mut dangling: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for course in courses {
        for token in course.affinity.tokens() {
            if !known.contains(token) {
                dangling.entry(token).or_default().push(&course.id);
            }
        }
    }

    for (token, ids) in dangling {
        diagnostics.record(
            DiagnosticKind::AffinityResolution,
            tab.tab_name(),
            format!(
                "major '{token}' referenced by {} is not defined",
                ids.join(", ")
            ),
        );
    }
}

fn normalize_majors(
    table: &CsvTable,
    diagnostics: &mut LoadDiagnostics,
) -> Result<Vec<Major>, DataSourceError> {
    let tab = CatalogTable::Majors;
    let name_col = required(tab, table, MAJOR_NAME)?;
    let faculty_col = required(tab, table, FACULTY_REF)?;
    let credits_col = required(tab, table, TOTAL_CREDITS)?;
    let abbr_col = optional(
        tab,
        table,
        MAJOR_ABBREVIATION,
        "abbreviation defaults to the major name",
        diagnostics,
    );

    let mut seen = HashSet::new();
    let mut majors = Vec::new();

    for row in table.rows() {
        let name = cell(row, Some(name_col));
        if name.is_empty() {
            continue;
        }

        let mut abbreviation = cell(row, abbr_col);
        if abbreviation.is_empty() {
            if abbr_col.is_some() {
                diagnostics.record(
                    DiagnosticKind::ValueCoercion,
                    tab.tab_name(),
                    format!("empty abbreviation for '{name}' replaced by the major name"),
                );
            }
            abbreviation = name;
        }

        if !seen.insert(abbreviation.to_uppercase()) {
            diagnostics.record(
                DiagnosticKind::ValueCoercion,
                tab.tab_name(),
                format!("duplicate abbreviation '{abbreviation}' ignored; first row kept"),
            );
            continue;
        }

        let raw_total = cell(row, Some(credits_col));
        let total_credits = match raw_total.parse::<f32>() {
            Ok(value) if value.is_finite() && value > 0.0 => value,
            _ => {
                diagnostics.record(
                    DiagnosticKind::ValueCoercion,
                    tab.tab_name(),
                    format!("total_credits '{raw_total}' for '{name}' treated as 0"),
                );
                0.0
            }
        };

        majors.push(Major::new(
            name.to_string(),
            abbreviation.to_string(),
            cell(row, Some(faculty_col)).to_string(),
            total_credits,
        ));
    }

    Ok(majors)
}

fn normalize_faculties(
    table: &CsvTable,
    majors: &[Major],
    diagnostics: &mut LoadDiagnostics,
) -> Result<Vec<Faculty>, DataSourceError> {
    let tab = CatalogTable::Faculty;
    let name_col = required(tab, table, FACULTY_NAME)?;
    let count_col = optional(
        tab,
        table,
        MAJOR_COUNT,
        "counts derived from the Majors table",
        diagnostics,
    );

    let faculties = table
        .rows()
        .iter()
        .filter_map(|row| {
            let name = cell(row, Some(name_col));
            if name.is_empty() {
                return None;
            }
            let derived = majors.iter().filter(|m| m.faculty_ref == name).count();
            let major_count = match count_col {
                Some(idx) => {
                    let raw = cell(row, Some(idx));
                    parse_count(raw).unwrap_or_else(|| {
                        diagnostics.record(
                            DiagnosticKind::ValueCoercion,
                            tab.tab_name(),
                            format!("major_count '{raw}' for '{name}' replaced by {derived}"),
                        );
                        derived
                    })
                }
                None => derived,
            };
            Some(Faculty::new(name.to_string(), major_count))
        })
        .collect();

    Ok(faculties)
}

fn normalize_core(
    table: &CsvTable,
    known: &HashSet<String>,
    diagnostics: &mut LoadDiagnostics,
) -> Result<Vec<Course>, DataSourceError> {
    let tab = CatalogTable::Core;
    let columns = CourseColumns::resolve(tab, table, diagnostics)?;
    let term_col = required(tab, table, TERM)?;
    let type_column = TypeColumn::resolve(table, diagnostics);

    let courses = read_courses(
        tab,
        table,
        &columns,
        diagnostics,
        |row, id, diags| type_column.category_of(row, id, diags),
        |row, course, diags| {
            let term = parse_term(cell(row, Some(term_col)), tab, &course.id, diags);
            course.with_term(term)
        },
    );
    check_affinity(tab, &courses, known, diagnostics);
    Ok(courses)
}

fn normalize_gen_ed(
    table: &CsvTable,
    known: &HashSet<String>,
    diagnostics: &mut LoadDiagnostics,
) -> Result<Vec<Course>, DataSourceError> {
    let tab = CatalogTable::GenEd;
    let columns = CourseColumns::resolve(tab, table, diagnostics)?;
    let section_col = required(tab, table, GEN_ED_CATEGORY)?;

    let courses = read_courses(
        tab,
        table,
        &columns,
        diagnostics,
        |_, _, _| CourseCategory::GenEd,
        |row, course, _| course.with_section(cell(row, Some(section_col))),
    );
    check_affinity(tab, &courses, known, diagnostics);
    Ok(courses)
}

/// Elective pool and free-elective tables share one schema
fn normalize_shared(
    tab: CatalogTable,
    table: &CsvTable,
    known: &HashSet<String>,
    diagnostics: &mut LoadDiagnostics,
) -> Result<Vec<Course>, DataSourceError> {
    let category = tab.course_category().unwrap_or(CourseCategory::FreeElective);
    let columns = CourseColumns::resolve(tab, table, diagnostics)?;

    let courses = read_courses(
        tab,
        table,
        &columns,
        diagnostics,
        |_, _, _| category,
        |_, course, _| course,
    );
    check_affinity(tab, &courses, known, diagnostics);
    Ok(courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::loader::InMemorySource;

    const FACULTY: &str = "faculty_name,major_count\nEngineering,2\n";
    const MAJORS: &str = "major_name,major_abbreviation,faculty_ref,total_credits\n\
        Software Engineering,SE,Engineering,130\n\
        Computer Engineering,CPE,Engineering,136\n";
    const CORE: &str = "subject_id,subject_name_en,subject_name_th,credits,term,special_type,group,major_ref\n\
        M101,Calculus I,แคลคูลัส 1,3,1.1,Normal Subject,,\"SE, CPE\"\n\
        M102,Data Structures,โครงสร้างข้อมูล,N/A,bad,Normal Subject,,se\n\
        E301,Cloud Computing,คลาวด์,3,3.1,Major Elective Subject,1 Systems,SE\n\
        C401,Co-op,สหกิจ,6,4.2,Cooperative Education,,SE\n\
        P401,Senior Project,โครงงาน,3,4.1,Major Project,,SE\n\
        X999,Mystery,ลึกลับ,1,2.1,Capstone Thing,,XX\n";
    const GEN_ED: &str = "subject_id,subject_name_en,subject_name_th,credits,category,group\n\
        G101,English I,ภาษาอังกฤษ 1,3,1 Language,1.1 English\n";
    const ELECTIVE: &str = "subject_id,subject_name_en,subject_name_th,credits\nP500,AI,ปัญญาประดิษฐ์,3\n";
    const FREE: &str = "subject_id,subject_name_en,subject_name_th,credits\nF100,Guitar,กีตาร์,1\n";

    fn full_source() -> InMemorySource {
        InMemorySource::new()
            .with_table(CatalogTable::Faculty, FACULTY)
            .with_table(CatalogTable::Majors, MAJORS)
            .with_table(CatalogTable::Core, CORE)
            .with_table(CatalogTable::GenEd, GEN_ED)
            .with_table(CatalogTable::Elective, ELECTIVE)
            .with_table(CatalogTable::FreeElective, FREE)
    }

    fn find<'a>(catalog: &'a Catalog, id: &str) -> &'a Course {
        catalog
            .courses()
            .iter()
            .find(|c| c.id == id)
            .expect("course present")
    }

    #[test]
    fn test_load_full_catalog() {
        let catalog = load_catalog(&full_source()).expect("catalog loads");
        assert_eq!(catalog.faculties.len(), 1);
        assert_eq!(catalog.majors.len(), 2);
        assert_eq!(catalog.courses().len(), 9);

        assert_eq!(find(&catalog, "M101").category(), CourseCategory::Core);
        assert_eq!(find(&catalog, "E301").category(), CourseCategory::MajorElectivePlan);
        assert_eq!(find(&catalog, "E301").group, "1 Systems");
        assert_eq!(find(&catalog, "C401").category(), CourseCategory::Coop);
        assert_eq!(find(&catalog, "P401").category(), CourseCategory::Project);
        assert_eq!(find(&catalog, "G101").section, "1 Language");
        assert_eq!(find(&catalog, "P500").category(), CourseCategory::MajorElectivePool);
        assert_eq!(find(&catalog, "F100").affinity, Affinity::Unrestricted);
    }

    #[test]
    fn test_unparseable_values_are_coerced() {
        let catalog = load_catalog(&full_source()).expect("catalog loads");
        let m102 = find(&catalog, "M102");
        assert!(m102.credits.abs() < f32::EPSILON);
        assert_eq!(m102.term, Term::UNKNOWN);
        assert_eq!(find(&catalog, "X999").category(), CourseCategory::Core);
        // credits, term, special_type
        assert_eq!(catalog.diagnostics.count(DiagnosticKind::ValueCoercion), 3);
    }

    #[test]
    fn test_dangling_affinity_reported() {
        let catalog = load_catalog(&full_source()).expect("catalog loads");
        assert_eq!(catalog.diagnostics.count(DiagnosticKind::AffinityResolution), 1);
        let finding = catalog
            .diagnostics
            .iter()
            .find(|d| d.kind == DiagnosticKind::AffinityResolution)
            .expect("finding");
        assert!(finding.message.contains("'XX'"));
        assert!(finding.message.contains("X999"));
    }

    #[test]
    fn test_missing_optional_columns_default() {
        let source = full_source()
            .with_table(
                CatalogTable::Majors,
                "major_name,faculty_ref,total_credits\nSoftware Engineering,Engineering,130\n",
            )
            .with_table(
                CatalogTable::Core,
                "subject_id,subject_name_en,subject_name_th,credits,term,major_ref\n\
                 M101,Calculus I,แคลคูลัส 1,3,1.1,Software Engineering\n",
            );
        let catalog = load_catalog(&source).expect("catalog loads");

        assert_eq!(catalog.majors[0].abbreviation, "Software Engineering");
        let m101 = find(&catalog, "M101");
        assert_eq!(m101.category(), CourseCategory::Core);
        assert!(m101.group.is_empty());
        assert!(m101.counts_toward("software engineering"));
        assert!(catalog.diagnostics.count(DiagnosticKind::SchemaDefault) >= 3);
    }

    #[test]
    fn test_major_elective_flag_column() {
        let source = full_source().with_table(
            CatalogTable::Core,
            "subject_id,subject_name_en,subject_name_th,credits,term,is_major_elective,major_ref\n\
             M101,Calculus I,แคลคูลัส 1,3,1.1,FALSE,SE\n\
             E301,Cloud,คลาวด์,3,3.1,TRUE,SE\n",
        );
        let catalog = load_catalog(&source).expect("catalog loads");
        assert_eq!(find(&catalog, "M101").category(), CourseCategory::Core);
        assert_eq!(find(&catalog, "E301").category(), CourseCategory::MajorElectivePlan);
    }

    #[test]
    fn test_duplicate_ids_keep_first_row() {
        let source = full_source().with_table(
            CatalogTable::FreeElective,
            "subject_id,subject_name_en,subject_name_th,credits\nF100,Guitar,กีตาร์,1\nF100,Piano,เปียโน,2\n",
        );
        let catalog = load_catalog(&source).expect("catalog loads");
        let free: Vec<&Course> = catalog.courses_in(CourseCategory::FreeElective).collect();
        assert_eq!(free.len(), 1);
        assert_eq!(free[0].name_primary, "Guitar");
    }

    #[test]
    fn test_missing_required_column_is_fatal() {
        let source = full_source().with_table(
            CatalogTable::Majors,
            "major_name,faculty_ref\nSoftware Engineering,Engineering\n",
        );
        let err = load_catalog(&source).unwrap_err();
        assert_eq!(
            err,
            DataSourceError::MissingColumn {
                table: "Majors".to_string(),
                column: "total_credits".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let source = InMemorySource::new().with_table(CatalogTable::Majors, MAJORS);
        let err = load_catalog(&source).unwrap_err();
        assert!(matches!(err, DataSourceError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_empty_table_is_fatal() {
        let source = full_source().with_table(CatalogTable::GenEd, "");
        let err = load_catalog(&source).unwrap_err();
        assert_eq!(
            err,
            DataSourceError::EmptyTable {
                table: "7group".to_string()
            }
        );
    }

    #[test]
    fn test_faculty_count_derived_when_unparseable() {
        let source = full_source().with_table(CatalogTable::Faculty, "faculty_name,major_count\nEngineering,lots\n");
        let catalog = load_catalog(&source).expect("catalog loads");
        assert_eq!(catalog.faculties[0].major_count, 2);
    }

    #[test]
    fn test_parse_count_accepts_whole_floats() {
        assert_eq!(parse_count("9"), Some(9));
        assert_eq!(parse_count("9.0"), Some(9));
        assert_eq!(parse_count("9.5"), None);
        assert_eq!(parse_count("-1"), None);
    }
}
