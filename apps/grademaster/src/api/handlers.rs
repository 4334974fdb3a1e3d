//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.
//!
//! Public handlers touch only the pure engine. Gradebook handlers run behind
//! Basic auth and act as the authenticated [`CurrentUser`]; the core enforces
//! the role rules and its errors map onto status codes here.

use super::{
    AppState,
    auth::CurrentUser,
    types::{
        AddStudentRequest, AdviceResponse, ApiResponse, BoundariesResponse, EvaluateRequest,
        HealthResponse, PointsRequest, PointsResponse, RenameStudentRequest, SetGradeRequest,
        SetLockRequest, StudentSearchQuery,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use grademaster_core::{
    CourseDraft, CourseId, GradebookError, QualificationType, StudentId, UnitDraft, UnitId,
    UserDraft, UserId, evaluate_with_breakdown,
};
use serde::Serialize;

// =============================================================================
// RESPONSE HELPERS
// =============================================================================

/// HTTP status for a gradebook error.
pub fn status_for(error: &GradebookError) -> StatusCode {
    match error {
        GradebookError::CourseNotFound(_)
        | GradebookError::StudentNotFound(_)
        | GradebookError::UnitNotFound(_)
        | GradebookError::UserNotFound(_) => StatusCode::NOT_FOUND,
        GradebookError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        GradebookError::Forbidden(_) => StatusCode::FORBIDDEN,
        GradebookError::GradeLocked(_)
        | GradebookError::DuplicateUsername(_)
        | GradebookError::ProtectedUser(_) => StatusCode::CONFLICT,
        GradebookError::InvalidInput(_) | GradebookError::SerializationError(_) => {
            StatusCode::BAD_REQUEST
        }
        GradebookError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(
    result: Result<T, GradebookError>,
    ok: StatusCode,
) -> (StatusCode, Json<ApiResponse<T>>) {
    match result {
        Ok(data) => (ok, Json(ApiResponse::success(data))),
        Err(e) => {
            let status = status_for(&e);
            if status == StatusCode::FORBIDDEN || status == StatusCode::CONFLICT {
                tracing::info!("Request refused: {}", e);
            }
            (status, Json(ApiResponse::from(e)))
        }
    }
}

// =============================================================================
// PUBLIC HANDLERS
// =============================================================================

/// Health check endpoint.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::new(state.advisor.is_enabled()))
}

/// Points for one unit.
pub async fn points_handler(Json(request): Json<PointsRequest>) -> impl IntoResponse {
    respond(
        request.validate().map(|()| PointsResponse::from(&request)),
        StatusCode::OK,
    )
}

/// Evaluate an ad-hoc list of graded units.
pub async fn evaluate_handler(Json(request): Json<EvaluateRequest>) -> impl IntoResponse {
    respond(
        request
            .validate()
            .map(|()| evaluate_with_breakdown(&request.units, request.qualification)),
        StatusCode::OK,
    )
}

/// A qualification's boundary table.
pub async fn boundaries_handler(Path(qualification): Path<String>) -> impl IntoResponse {
    respond(
        qualification
            .parse::<QualificationType>()
            .map(BoundariesResponse::from),
        StatusCode::OK,
    )
}

// =============================================================================
// ACCOUNT HANDLERS
// =============================================================================

/// The authenticated account.
pub async fn me_handler(Extension(CurrentUser(user)): Extension<CurrentUser>) -> impl IntoResponse {
    respond(Ok(user), StatusCode::OK)
}

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> impl IntoResponse {
    let book = state.gradebook.read().await;
    let result = if user.role.manages_users() {
        Ok(book.users().to_vec())
    } else {
        Err(GradebookError::Forbidden("only a superuser can manage users"))
    };
    respond(result, StatusCode::OK)
}

pub async fn create_user_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(draft): Json<UserDraft>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    let result = book.add_user(&user, draft);
    if let Ok(created) = &result {
        tracing::info!(actor = %user.username, "Created user '{}'", created.username);
    }
    respond(result, StatusCode::CREATED)
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(draft): Json<UserDraft>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.update_user(&user, &UserId::new(id), draft),
        StatusCode::OK,
    )
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    let result = book.delete_user(&user, &UserId::new(id));
    if let Ok(deleted) = &result {
        tracing::info!(actor = %user.username, "Deleted user '{}'", deleted.username);
    }
    respond(result, StatusCode::OK)
}

// =============================================================================
// COURSE HANDLERS
// =============================================================================

pub async fn list_courses_handler(State(state): State<AppState>) -> impl IntoResponse {
    let book = state.gradebook.read().await;
    respond(Ok(book.summaries()), StatusCode::OK)
}

pub async fn get_course_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let book = state.gradebook.read().await;
    respond(book.course(&CourseId::new(id)).cloned(), StatusCode::OK)
}

pub async fn create_course_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(draft): Json<CourseDraft>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    let result = book.create_course(&user, &draft);
    if let Ok(course) = &result {
        tracing::info!(actor = %user.username, "Created course {} '{}'", course.id, course.title);
    }
    respond(result, StatusCode::CREATED)
}

pub async fn update_course_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(draft): Json<CourseDraft>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.update_course(&user, &CourseId::new(id), &draft),
        StatusCode::OK,
    )
}

pub async fn delete_course_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    let result = book.delete_course(&user, &CourseId::new(id));
    if let Ok(course) = &result {
        tracing::info!(actor = %user.username, "Deleted course {}", course.id);
    }
    respond(result.map(|c| c.summary()), StatusCode::OK)
}

// =============================================================================
// UNIT HANDLERS
// =============================================================================

pub async fn add_unit_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(course_id): Path<String>,
    Json(draft): Json<UnitDraft>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.add_unit(&user, &CourseId::new(course_id), &draft),
        StatusCode::CREATED,
    )
}

pub async fn update_unit_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((course_id, unit_id)): Path<(String, String)>,
    Json(draft): Json<UnitDraft>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.update_unit(
            &user,
            &CourseId::new(course_id),
            &UnitId::new(unit_id),
            &draft,
        ),
        StatusCode::OK,
    )
}

pub async fn delete_unit_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((course_id, unit_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.remove_unit(&user, &CourseId::new(course_id), &UnitId::new(unit_id)),
        StatusCode::OK,
    )
}

/// Replace a course's units with its subject's standard list.
pub async fn load_presets_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(course_id): Path<String>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.load_presets(&user, &CourseId::new(course_id)),
        StatusCode::OK,
    )
}

// =============================================================================
// STUDENT HANDLERS
// =============================================================================

pub async fn add_student_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(course_id): Path<String>,
    body: Option<Json<AddStudentRequest>>,
) -> impl IntoResponse {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let mut book = state.gradebook.write().await;
    respond(
        book.add_student(&user, &CourseId::new(course_id), request.name.as_deref()),
        StatusCode::CREATED,
    )
}

pub async fn rename_student_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((course_id, student_id)): Path<(String, String)>,
    Json(request): Json<RenameStudentRequest>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.rename_student(
            &user,
            &CourseId::new(course_id),
            &StudentId::new(student_id),
            &request.name,
        ),
        StatusCode::OK,
    )
}

pub async fn delete_student_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((course_id, student_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.delete_student(&user, &CourseId::new(course_id), &StudentId::new(student_id)),
        StatusCode::OK,
    )
}

// =============================================================================
// GRADE HANDLERS
// =============================================================================

/// Set one unit grade; answers with the student's updated result.
pub async fn set_grade_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((course_id, student_id, unit_id)): Path<(String, String, String)>,
    Json(request): Json<SetGradeRequest>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.set_grade(
            &user,
            &CourseId::new(course_id),
            &StudentId::new(student_id),
            &UnitId::new(unit_id),
            request.grade,
        ),
        StatusCode::OK,
    )
}

/// Lock or unlock one unit grade; answers with the student's updated result.
pub async fn set_lock_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((course_id, student_id, unit_id)): Path<(String, String, String)>,
    Json(request): Json<SetLockRequest>,
) -> impl IntoResponse {
    let mut book = state.gradebook.write().await;
    respond(
        book.set_lock(
            &user,
            &CourseId::new(course_id),
            &StudentId::new(student_id),
            &UnitId::new(unit_id),
            request.locked,
        ),
        StatusCode::OK,
    )
}

pub async fn list_students_handler(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<StudentSearchQuery>,
) -> impl IntoResponse {
    let book = state.gradebook.read().await;
    respond(
        book.search_results(&CourseId::new(course_id), query.search.as_deref()),
        StatusCode::OK,
    )
}

pub async fn student_result_handler(
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let book = state.gradebook.read().await;
    respond(
        book.student_result(&CourseId::new(course_id), &StudentId::new(student_id)),
        StatusCode::OK,
    )
}

/// Ask the advisor about one student. The gradebook lock is released before
/// the advisor is called.
pub async fn advice_handler(
    State(state): State<AppState>,
    Path((course_id, student_id)): Path<(String, String)>,
) -> impl IntoResponse {
    let request = {
        let book = state.gradebook.read().await;
        book.student_result(&CourseId::new(course_id), &StudentId::new(student_id))
            .map(|r| r.advice_request())
    };

    let request = match request {
        Ok(request) => request,
        Err(e) => return respond::<AdviceResponse>(Err(e), StatusCode::OK),
    };

    let advice = state.advisor.advise(&request).await;
    respond(
        Ok(AdviceResponse {
            advisor_enabled: state.advisor.is_enabled(),
            advice,
        }),
        StatusCode::OK,
    )
}
