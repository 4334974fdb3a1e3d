//! Unit tests for API types serialization/deserialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use axum::http::StatusCode;
use grademaster::api::{
    ApiResponse, BoundariesResponse, EvaluateRequest, HealthResponse, PointsRequest,
    PointsResponse, SetGradeRequest, status_for,
};
use grademaster_core::{CourseId, Grade, GradebookError, QualificationType, UnitId, UnitKind};

// =============================================================================
// ENVELOPE
// =============================================================================

#[test]
fn test_success_envelope_shape() {
    let json = serde_json::to_value(ApiResponse::success(42u32)).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["data"], 42);
    assert!(json["error"].is_null());
}

#[test]
fn test_error_envelope_from_gradebook_error() {
    let response: ApiResponse<()> =
        GradebookError::CourseNotFound(CourseId::from("course-9")).into();
    assert!(!response.success);
    assert!(response.data.is_none());
    assert_eq!(response.error.as_deref(), Some("Course not found: course-9"));
}

#[test]
fn test_status_mapping() {
    assert_eq!(
        status_for(&GradebookError::UnitNotFound(UnitId::from("u"))),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        status_for(&GradebookError::Forbidden("no")),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        status_for(&GradebookError::GradeLocked(UnitId::from("u"))),
        StatusCode::CONFLICT
    );
    assert_eq!(
        status_for(&GradebookError::InvalidInput("x".into())),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        status_for(&GradebookError::InvalidCredentials),
        StatusCode::UNAUTHORIZED
    );
}

// =============================================================================
// HEALTH
// =============================================================================

#[test]
fn test_health_response_new() {
    let health = HealthResponse::new(true);
    assert_eq!(health.status, "ok");
    assert!(!health.version.is_empty());
    assert!(health.advisor_enabled);
}

// =============================================================================
// POINTS
// =============================================================================

#[test]
fn test_points_request_deserialization() {
    let json = r#"{"glh":90,"kind":"external","grade":"NP"}"#;
    let request: PointsRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.glh, 90);
    assert_eq!(request.kind, UnitKind::External);
    assert_eq!(request.grade, Grade::NP);
    assert!(request.validate().is_ok());

    let response = PointsResponse::from(&request);
    assert_eq!(response.points, 6);
}

#[test]
fn test_points_request_rejects_zero_glh() {
    let request: PointsRequest =
        serde_json::from_str(r#"{"glh":0,"kind":"internal","grade":"P"}"#).unwrap();
    assert!(matches!(
        request.validate(),
        Err(GradebookError::InvalidInput(_))
    ));
}

#[test]
fn test_unknown_kind_is_a_deserialization_error() {
    let result: Result<PointsRequest, _> =
        serde_json::from_str(r#"{"glh":60,"kind":"coursework","grade":"P"}"#);
    assert!(result.is_err());
}

// =============================================================================
// EVALUATE
// =============================================================================

#[test]
fn test_evaluate_request_defaults() {
    let request: EvaluateRequest =
        serde_json::from_str(r#"{"units":[{"glh":60,"kind":"internal"}]}"#).unwrap();
    assert_eq!(request.qualification, QualificationType::ExtendedDiploma);
    assert_eq!(request.units[0].grade, Grade::U);
    assert!(!request.units[0].locked);
    assert!(request.validate().is_ok());
}

#[test]
fn test_evaluate_request_rejects_zero_glh_unit() {
    let request: EvaluateRequest =
        serde_json::from_str(r#"{"units":[{"glh":0,"kind":"external","grade":"D"}]}"#).unwrap();
    assert!(request.validate().is_err());
}

// =============================================================================
// BOUNDARIES AND GRADES
// =============================================================================

#[test]
fn test_boundaries_response_extended_certificate() {
    let table = BoundariesResponse::from(QualificationType::ExtendedCertificate);
    assert_eq!(table.name, "Extended Certificate (360 GLH)");
    let grades: Vec<&str> = table.boundaries.iter().map(|b| b.grade.as_str()).collect();
    assert_eq!(grades, ["P", "M", "D", "D*"]);

    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["qualification"], "extended_certificate");
}

#[test]
fn test_set_grade_request_uses_grade_codes() {
    let request: SetGradeRequest = serde_json::from_str(r#"{"grade":"M"}"#).unwrap();
    assert_eq!(request.grade, Grade::M);
    assert!(serde_json::from_str::<SetGradeRequest>(r#"{"grade":"Merit"}"#).is_err());
}
