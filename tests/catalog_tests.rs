//! Integration tests for loading the catalog from a directory of CSV tables

use credit_checker::core::loader::{CatalogRepository, CatalogTable, DirectorySource};
use credit_checker::core::models::CourseCategory;
use credit_checker::core::{DataSourceError, DiagnosticKind};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/catalog")
}

/// Copy the fixture catalog into a scratch directory the test may edit
fn scratch_catalog() -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    for table in CatalogTable::ALL {
        let name = format!("{}.csv", table.tab_name());
        fs::copy(fixture_dir().join(&name), dir.path().join(&name)).expect("Failed to copy fixture");
    }
    dir
}

#[test]
fn test_load_fixture_catalog() {
    let mut repository = CatalogRepository::with_default_ttl(DirectorySource::new(fixture_dir()));
    let catalog = repository.catalog().expect("fixture catalog loads");

    assert_eq!(catalog.faculties.len(), 2);
    assert_eq!(catalog.majors.len(), 3);
    assert_eq!(catalog.courses_in(CourseCategory::Core).count(), 8);
    assert_eq!(catalog.courses_in(CourseCategory::MajorElectivePlan).count(), 2);
    assert_eq!(catalog.courses_in(CourseCategory::Coop).count(), 1);
    assert_eq!(catalog.courses_in(CourseCategory::Project).count(), 1);
    assert_eq!(catalog.courses_in(CourseCategory::GenEd).count(), 3);
    assert_eq!(catalog.courses_in(CourseCategory::MajorElectivePool).count(), 2);
    assert_eq!(catalog.courses_in(CourseCategory::FreeElective).count(), 2);
    assert_eq!(catalog.diagnostics.count(DiagnosticKind::ValueCoercion), 0);
    assert_eq!(catalog.diagnostics.count(DiagnosticKind::AffinityResolution), 0);

    let faculties: Vec<String> = catalog.faculties.iter().map(|f| f.display_label()).collect();
    assert_eq!(
        faculties,
        vec!["Faculty of Engineering (2 majors)", "Faculty of Science (1 major)"]
    );
}

#[test]
fn test_missing_table_is_fatal() {
    let dir = scratch_catalog();
    fs::remove_file(dir.path().join("7group.csv")).expect("remove");

    let mut repository = CatalogRepository::with_default_ttl(DirectorySource::new(dir.path()));
    let err = repository.catalog().unwrap_err();

    assert!(matches!(err, DataSourceError::SourceUnavailable { ref table, .. } if table == "7group"));
    assert!(!repository.is_cached_at(Instant::now()));
}

#[test]
fn test_missing_required_column_is_fatal() {
    let dir = scratch_catalog();
    fs::write(
        dir.path().join("Majors.csv"),
        "major_name,major_abbreviation,faculty_ref\nSoftware Engineering,SE,Faculty of Engineering\n",
    )
    .expect("write");

    let mut repository = CatalogRepository::with_default_ttl(DirectorySource::new(dir.path()));
    let err = repository.catalog().unwrap_err();

    assert!(err.to_string().contains("total_credits"));
}

#[test]
fn test_bad_cells_are_coerced_not_fatal() {
    let dir = scratch_catalog();
    fs::write(
        dir.path().join("FreeElective.csv"),
        "subject_id,subject_name_en,subject_name_th,credits\n950-101,Guitar,กีตาร์,N/A\n",
    )
    .expect("write");

    let mut repository = CatalogRepository::with_default_ttl(DirectorySource::new(dir.path()));
    let catalog = repository.catalog().expect("catalog loads");

    let guitar = catalog
        .courses_in(CourseCategory::FreeElective)
        .find(|c| c.id == "950-101")
        .expect("course kept");
    assert!(guitar.credits.abs() < f32::EPSILON);
    assert_eq!(catalog.diagnostics.count(DiagnosticKind::ValueCoercion), 1);
}

#[test]
fn test_cache_serves_stale_catalog_until_reload() {
    let dir = scratch_catalog();
    let mut repository =
        CatalogRepository::new(DirectorySource::new(dir.path()), Duration::from_secs(600));

    let first = repository.catalog().expect("first load");
    assert_eq!(first.courses_in(CourseCategory::FreeElective).count(), 2);

    fs::write(
        dir.path().join("FreeElective.csv"),
        "subject_id,subject_name_en,subject_name_th,credits\n950-103,Painting,จิตรกรรม,2\n",
    )
    .expect("write");

    let cached = repository.catalog().expect("cached load");
    assert!(std::sync::Arc::ptr_eq(&first, &cached));

    let fresh = repository.invalidate_and_reload().expect("reload");
    assert_eq!(fresh.courses_in(CourseCategory::FreeElective).count(), 1);
    // the old snapshot is untouched for whoever still holds it
    assert_eq!(first.courses_in(CourseCategory::FreeElective).count(), 2);
}

#[test]
fn test_cache_expires_after_ttl() {
    let mut repository =
        CatalogRepository::new(DirectorySource::new(fixture_dir()), Duration::from_secs(600));
    let start = Instant::now();

    let first = repository.catalog_at(start).expect("load");
    assert!(repository.is_cached_at(start + Duration::from_secs(599)));
    assert!(!repository.is_cached_at(start + Duration::from_secs(600)));

    let later = repository
        .catalog_at(start + Duration::from_secs(601))
        .expect("reload");
    assert!(!std::sync::Arc::ptr_eq(&first, &later));
}
