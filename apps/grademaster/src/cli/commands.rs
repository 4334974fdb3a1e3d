//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::advisor::Advisor;
use crate::api::{self, AppState, BoundariesResponse, PointsResponse};
use crate::config::AppConfig;
use crate::course_file::{build_gradebook, read_course_file, root_account};
use crate::error::AppError;
use grademaster_core::{
    Grade, Gradebook, GradebookError, QualificationType, StudentResult, UnitKind, points_for,
};
use serde::Serialize;
use std::path::Path;

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &AppConfig) -> Result<(), AppError> {
    let gradebook = build_gradebook(&config.gradebook)?;
    let advisor = Advisor::from_config(&config.advisor);
    let course_count = gradebook.courses().len();
    let advisor_enabled = advisor.is_enabled();

    println!("GradeMaster Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", config.server.host);
    println!("  Port:       {}", config.server.port);
    println!("  Courses:    {}", course_count);
    println!(
        "  Advisor:    {}",
        if advisor_enabled { "enabled" } else { "disabled" }
    );
    println!("  Rate limit: {} req/s", config.server.rate_limit);
    println!();
    println!("Endpoints:");
    println!("  GET  /health                     - Health check");
    println!("  POST /points                     - Points for one unit");
    println!("  POST /evaluate                   - Evaluate a list of units");
    println!("  GET  /boundaries/{{qualification}} - Boundary table");
    println!("  GET  /courses/{{id}}/students      - Student results (?search=)");
    println!("  *    /courses, /users, /me       - Gradebook (Basic auth)");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.server, AppState::new(gradebook, advisor)).await
}

// =============================================================================
// POINTS COMMAND
// =============================================================================

/// Points awarded for one unit.
pub fn cmd_points(glh: u32, kind: UnitKind, grade: Grade, json_mode: bool) -> Result<(), AppError> {
    if glh == 0 {
        return Err(GradebookError::InvalidInput("glh must be positive".to_string()).into());
    }
    let points = points_for(glh, kind, grade);

    if json_mode {
        return print_json(&PointsResponse {
            glh,
            kind,
            grade,
            points,
        });
    }

    println!("{} GLH {} unit at {}: {} points", glh, kind, grade.code(), points);
    if !grade.applies_to(kind) {
        println!("Note: {} is not awarded on {} units", grade.code(), kind);
    }
    Ok(())
}

// =============================================================================
// EVALUATE COMMAND
// =============================================================================

#[derive(Serialize)]
struct StudentReport {
    #[serde(flatten)]
    result: StudentResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    advice: Option<String>,
}

/// Evaluate every student in a course file.
pub async fn cmd_evaluate(
    config: &AppConfig,
    file: &Path,
    student: Option<&str>,
    advice: bool,
    json_mode: bool,
) -> Result<(), AppError> {
    let mut book = Gradebook::with_default_users();
    let root = root_account(&book)?;
    let course = book.import_course(&root, read_course_file(file)?)?;
    tracing::debug!(
        "Evaluating course '{}' ({} units, {} students)",
        course.title,
        course.units.len(),
        course.students.len()
    );

    let results = book.search_results(&course.id, student)?;
    if let Some(name) = student {
        if results.is_empty() {
            return Err(GradebookError::InvalidInput(format!(
                "no student matching '{}' in {}",
                name,
                file.display()
            ))
            .into());
        }
    }

    let advisor = advice.then(|| Advisor::from_config(&config.advisor));
    let mut reports = Vec::with_capacity(results.len());
    for result in results {
        let advice = match &advisor {
            Some(advisor) => Some(advisor.advise(&result.advice_request()).await),
            None => None,
        };
        reports.push(StudentReport { result, advice });
    }

    if json_mode {
        return print_json(&reports);
    }

    println!("{} ({})", course.title, course.academic_year);
    println!("{}, {}", course.subject, course.qualification);
    if reports.is_empty() {
        println!();
        println!("No students.");
    }
    for report in &reports {
        print_student_report(report);
    }
    Ok(())
}

fn print_student_report(report: &StudentReport) {
    let evaluation = &report.result.evaluation;
    let result = &evaluation.result;

    println!();
    println!("{}", report.result.student_name);
    println!("{}", "=".repeat(report.result.student_name.len().max(8)));
    for unit in &evaluation.units {
        println!(
            "  {:<48} {:>4} GLH  {:<8} {:<2} {:>3} pts{}",
            unit.name,
            unit.glh,
            unit.kind.name(),
            unit.grade.code(),
            unit.points,
            if unit.locked { "  [locked]" } else { "" }
        );
    }
    println!();
    println!("  Total points: {}", result.total_points);
    println!("  Grade:        {}", result.grade);
    println!("  UCAS points:  {}", result.ucas_points);
    match &result.next_grade_boundary {
        Some(next) => println!(
            "  Next grade:   {} ({} more points, {}% of the way)",
            next.grade,
            next.points_needed,
            result.progress_percent()
        ),
        None => println!("  Top grade achieved"),
    }
    if let Some(advice) = &report.advice {
        println!();
        for line in advice.lines() {
            println!("  {}", line);
        }
    }
}

// =============================================================================
// BOUNDARIES COMMAND
// =============================================================================

/// Show a qualification's boundary table.
pub fn cmd_boundaries(qualification: QualificationType, json_mode: bool) -> Result<(), AppError> {
    let table = BoundariesResponse::from(qualification);

    if json_mode {
        return print_json(&table);
    }

    println!("{}", table.name);
    println!();
    println!("  {:<8} {:>10} {:>6}", "Grade", "Min points", "UCAS");
    for row in &table.boundaries {
        println!("  {:<8} {:>10} {:>6}", row.grade, row.min_points, row.ucas);
    }
    Ok(())
}

// =============================================================================
// QUALIFICATIONS COMMAND
// =============================================================================

/// List the supported qualifications.
pub fn cmd_qualifications(json_mode: bool) -> Result<(), AppError> {
    if json_mode {
        let rows: Vec<serde_json::Value> = QualificationType::ALL
            .iter()
            .map(|q| {
                serde_json::json!({
                    "key": q.key(),
                    "name": q.name(),
                    "grades": q.boundaries().len(),
                })
            })
            .collect();
        return print_json(&rows);
    }

    println!("Qualifications");
    println!("==============");
    for q in QualificationType::ALL {
        println!("  {:<22} {}", q.key(), q.name());
    }
    Ok(())
}
