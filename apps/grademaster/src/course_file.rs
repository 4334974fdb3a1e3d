//! # Course Files
//!
//! Reading courses from disk for the CLI and for startup imports.
//!
//! The format follows the file extension: `.json` is JSON, anything else is
//! TOML. Both map directly onto [`Course`], with every field optional.
//!
//! ```toml
//! title = "Year 13 IT"
//! subject = "information_technology"
//! qualification = "diploma"
//!
//! [[units]]
//! id = "u1"
//! name = "Unit 1: Information Technology Systems"
//! glh = 120
//! kind = "external"
//!
//! [[students]]
//! name = "Ada"
//! grades = { u1 = "M" }
//! ```

use crate::config::GradebookConfig;
use crate::error::AppError;
use grademaster_core::{
    Course, Gradebook, GradebookError, User, UserId, primitives::ROOT_USERNAME,
};
use std::path::Path;

/// Maximum course file size (10 MB).
const MAX_COURSE_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Read and parse a course file.
pub fn read_course_file(path: &Path) -> Result<Course, AppError> {
    let metadata = std::fs::metadata(path)
        .map_err(|e| AppError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    if !metadata.is_file() {
        return Err(AppError::Io(format!(
            "Path '{}' is not a regular file",
            path.display()
        )));
    }
    if metadata.len() > MAX_COURSE_FILE_SIZE {
        return Err(AppError::Serialization(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_COURSE_FILE_SIZE
        )));
    }

    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::Io(format!("Cannot read '{}': {}", path.display(), e)))?;
    parse_course(&text, is_json(path))
        .map_err(|e| AppError::Serialization(format!("{}: {}", path.display(), e)))
}

/// Parse course text in either format.
pub fn parse_course(text: &str, json: bool) -> Result<Course, String> {
    if json {
        serde_json::from_str(text).map_err(|e| e.to_string())
    } else {
        toml::from_str(text).map_err(|e| e.to_string())
    }
}

/// The startup gradebook: the default accounts, the sample course when
/// enabled, then every configured course file imported as the root account.
pub fn build_gradebook(config: &GradebookConfig) -> Result<Gradebook, AppError> {
    let mut book = Gradebook::with_default_users();
    if config.seed_sample {
        let id = book.seed_sample_course();
        tracing::info!("Seeded sample course {}", id);
    }

    let root = root_account(&book)?;
    for path in &config.courses {
        let course = book.import_course(&root, read_course_file(path)?)?;
        tracing::info!(
            "Imported course {} '{}' from {} ({} students)",
            course.id,
            course.title,
            path.display(),
            course.students.len()
        );
    }
    Ok(book)
}

/// The root superuser account of a gradebook.
pub fn root_account(book: &Gradebook) -> Result<User, GradebookError> {
    book.find_user_by_name(ROOT_USERNAME)
        .cloned()
        .ok_or_else(|| GradebookError::UserNotFound(UserId::from(ROOT_USERNAME)))
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use grademaster_core::{Grade, QualificationType, StudentId, Subject, UnitId, UnitKind};

    const SAMPLE: &str = r#"
title = "Year 13 IT"
subject = "information_technology"
qualification = "diploma"

[[units]]
id = "u1"
name = "Unit 1: Information Technology Systems"
glh = 120
kind = "external"

[[students]]
id = "s1"
name = "Ada"
grades = { u1 = "NP" }
"#;

    #[test]
    fn parses_toml_course() {
        let course = parse_course(SAMPLE, false).expect("parse");
        assert_eq!(course.subject, Subject::InformationTechnology);
        assert_eq!(course.qualification, QualificationType::Diploma);
        assert_eq!(course.units[0].kind, UnitKind::External);
        assert_eq!(course.students[0].id, StudentId::from("s1"));
        assert_eq!(course.students[0].grade(&UnitId::from("u1")), Grade::NP);
    }

    #[test]
    fn parses_json_course() {
        let course = parse_course(
            r#"{"title":"J","units":[{"name":"A","glh":60,"kind":"internal"}]}"#,
            true,
        )
        .expect("parse");
        assert_eq!(course.title, "J");
        assert!(course.units[0].id.as_str().is_empty());
    }

    #[test]
    fn unknown_grade_is_an_error() {
        let bad = SAMPLE.replace("\"NP\"", "\"Z\"");
        assert!(parse_course(&bad, false).is_err());
    }

    #[test]
    fn extension_picks_format() {
        assert!(is_json(Path::new("a/course.JSON")));
        assert!(!is_json(Path::new("course.toml")));
        assert!(!is_json(Path::new("course")));
    }

    #[test]
    fn startup_gradebook_imports_course_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("it.toml");
        std::fs::write(&path, SAMPLE).expect("write");

        let config = GradebookConfig {
            seed_sample: false,
            courses: vec![path],
        };
        let book = build_gradebook(&config).expect("gradebook");
        assert_eq!(book.courses().len(), 1);
        assert_eq!(book.courses()[0].title, "Year 13 IT");
        assert_eq!(book.users().len(), 3);
    }

    #[test]
    fn startup_gradebook_seeds_sample() {
        let book = build_gradebook(&GradebookConfig::default()).expect("gradebook");
        assert_eq!(book.courses().len(), 1);
        assert_eq!(book.courses()[0].units.len(), 4);
    }

    #[test]
    fn missing_course_file_fails_startup() {
        let config = GradebookConfig {
            seed_sample: false,
            courses: vec!["/nonexistent/course.toml".into()],
        };
        assert!(matches!(build_gradebook(&config), Err(AppError::Io(_))));
    }
}
