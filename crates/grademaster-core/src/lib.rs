//! # grademaster-core
//!
//! The deterministic calculation engine for GradeMaster.
//!
//! Maps a student's unit grades on a vocational qualification to points, an
//! overall grade, UCAS tariff points and the distance to the next grade
//! boundary. Also holds the in-memory gradebook of courses, students and
//! accounts that feeds the engine.
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - Integer arithmetic only; reference tables are `const` data
//! - Every engine function is total: missing grades are `U`, unknown unit
//!   sizes use the fallback formula, totals below every boundary are `U`
//! - The advisory collaborator lives in the application; this crate only
//!   builds its request

// =============================================================================
// MODULES
// =============================================================================

pub mod advice;
pub mod evaluator;
pub mod gradebook;
pub mod merge;
pub mod points;
pub mod primitives;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    CourseId, Grade, GradebookError, GradedUnit, QualificationType, StudentId, Subject, UnitId,
    UnitKind, UnitTemplate, UserId,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use evaluator::{
    CalculationResult, Evaluation, NextBoundary, UnitScore, classify, evaluate,
    evaluate_with_breakdown, total_points,
};
pub use merge::merge_units_and_grades;
pub use points::points_for;
pub use primitives::GradeBoundary;

// =============================================================================
// RE-EXPORTS: Gradebook and advice
// =============================================================================

pub use advice::{ADVICE_UNAVAILABLE, AdviceRequest, NO_ADVICE_GENERATED};
pub use gradebook::{
    Course, CourseDraft, CourseSummary, Gradebook, Student, StudentResult, UnitDraft, User,
    UserDraft, UserRole,
};
