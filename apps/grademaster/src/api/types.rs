//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API. Gradebook
//! entities (`Course`, `Student`, `User`, `Evaluation`, ...) are returned as
//! they serialize from the core crate.

use grademaster_core::{
    Grade, GradeBoundary, GradedUnit, GradebookError, QualificationType, UnitKind, points_for,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// ENVELOPE
// =============================================================================

/// Every authenticated endpoint answers with this envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

impl<T> From<GradebookError> for ApiResponse<T> {
    fn from(e: GradebookError) -> Self {
        Self::error(e.to_string())
    }
}

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub advisor_enabled: bool,
}

impl HealthResponse {
    pub fn new(advisor_enabled: bool) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            advisor_enabled,
        }
    }
}

// =============================================================================
// POINTS REQUEST/RESPONSE
// =============================================================================

/// Points for a single unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsRequest {
    pub glh: u32,
    pub kind: UnitKind,
    pub grade: Grade,
}

impl PointsRequest {
    pub fn validate(&self) -> Result<(), GradebookError> {
        if self.glh == 0 {
            return Err(GradebookError::InvalidInput(
                "glh must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsResponse {
    pub glh: u32,
    pub kind: UnitKind,
    pub grade: Grade,
    pub points: u32,
}

impl From<&PointsRequest> for PointsResponse {
    fn from(req: &PointsRequest) -> Self {
        Self {
            glh: req.glh,
            kind: req.kind,
            grade: req.grade,
            points: points_for(req.glh, req.kind, req.grade),
        }
    }
}

// =============================================================================
// EVALUATE REQUEST
// =============================================================================

/// Ad-hoc evaluation of a list of units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluateRequest {
    #[serde(default)]
    pub qualification: QualificationType,
    pub units: Vec<GradedUnit>,
}

/// Upper bound on units accepted by `/evaluate`.
pub const MAX_EVALUATE_UNITS: usize = 1000;

impl EvaluateRequest {
    pub fn validate(&self) -> Result<(), GradebookError> {
        if self.units.len() > MAX_EVALUATE_UNITS {
            return Err(GradebookError::InvalidInput(format!(
                "at most {MAX_EVALUATE_UNITS} units per request"
            )));
        }
        if self.units.iter().any(|u| u.glh == 0) {
            return Err(GradebookError::InvalidInput(
                "glh must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// BOUNDARIES RESPONSE
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryJson {
    pub min_points: u32,
    pub grade: String,
    pub ucas: u32,
}

impl From<&GradeBoundary> for BoundaryJson {
    fn from(b: &GradeBoundary) -> Self {
        Self {
            min_points: b.min_points,
            grade: b.grade.to_string(),
            ucas: b.ucas,
        }
    }
}

/// A qualification's boundary table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundariesResponse {
    pub qualification: QualificationType,
    pub name: String,
    pub boundaries: Vec<BoundaryJson>,
}

impl From<QualificationType> for BoundariesResponse {
    fn from(q: QualificationType) -> Self {
        Self {
            qualification: q,
            name: q.name().to_string(),
            boundaries: q.boundaries().iter().map(BoundaryJson::from).collect(),
        }
    }
}

// =============================================================================
// GRADEBOOK REQUESTS
// =============================================================================

/// New student. Without a name the student is called "Student N".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddStudentRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// `?search=` filter on a course's student list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameStudentRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetGradeRequest {
    pub grade: Grade,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetLockRequest {
    pub locked: bool,
}

/// Written feedback for one student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advisor_enabled: bool,
    pub advice: String,
}
