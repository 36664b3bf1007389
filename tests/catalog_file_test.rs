use std::io::Write;
use story_progress::MarkerCatalog;
use tempfile::NamedTempFile;

#[test]
fn test_catalog_loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[markers]
"1" = ["mea_gui1", "sel_gal1"]
"3" = ["exp_dat1"]
"#
    )
    .unwrap();

    let catalog = MarkerCatalog::from_file(file.path()).unwrap();
    assert_eq!(catalog.stage_count(), 2);
    assert_eq!(catalog.markers_for("1").unwrap().len(), 2);
}

#[test]
fn test_missing_catalog_file_is_an_io_error() {
    let result = MarkerCatalog::from_file("./no/such/markers.toml");
    assert!(result.is_err());
}

#[test]
fn test_invalid_catalog_file_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "markers = 42").unwrap();

    assert!(MarkerCatalog::from_file(file.path()).is_err());
}

#[test]
fn test_env_var_substitution_in_catalog() {
    std::env::set_var("STORY_PROGRESS_TEST_MARKER", "sub_mark1");

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[markers]
"1" = ["${{STORY_PROGRESS_TEST_MARKER}}", "sel_gal1"]
"#
    )
    .unwrap();

    let catalog = MarkerCatalog::from_file(file.path()).unwrap();
    assert_eq!(catalog.markers_for("1").unwrap()[0], "sub_mark1");
}

#[test]
fn test_unset_env_var_is_left_verbatim() {
    let catalog = MarkerCatalog::from_str(
        r#"
[markers]
"1" = ["${STORY_PROGRESS_UNSET_VAR}"]
"#,
    )
    .unwrap();
    assert_eq!(
        catalog.markers_for("1").unwrap()[0],
        "${STORY_PROGRESS_UNSET_VAR}"
    );
}
