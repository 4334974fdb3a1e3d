//! # Qualification Evaluator
//!
//! Turns a set of graded units into an overall qualification result.
//!
//! ## Algorithm
//!
//! 1. Sum the points of every unit (order-independent).
//! 2. Walk the qualification's boundary table in ascending order, remembering
//!    the highest boundary met.
//! 3. The first boundary whose minimum exceeds the total becomes the
//!    next-boundary projection and the walk stops.
//!
//! A total below every minimum yields `"U"` with 0 UCAS points and a
//! projection to the first row. A total at or above the top row has no
//! projection.

use crate::primitives::{GradeBoundary, UNCLASSIFIED};
use crate::types::{Grade, GradedUnit, QualificationType, UnitId, UnitKind};
use serde::{Deserialize, Serialize};

// =============================================================================
// RESULT TYPES
// =============================================================================

/// The next grade boundary above the current total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextBoundary {
    /// Grade label of the next boundary.
    pub grade: String,
    /// Points still needed to reach it. Always positive.
    pub points_needed: u32,
}

/// Overall result for one student on one qualification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub total_points: u32,
    /// Achieved grade label, `"U"` when no boundary is met.
    pub grade: String,
    /// UCAS tariff points, 0 when no boundary is met.
    pub ucas_points: u32,
    /// Absent once the top boundary has been reached.
    pub next_grade_boundary: Option<NextBoundary>,
}

impl CalculationResult {
    /// Progress toward the next boundary as a whole percentage.
    ///
    /// `total / (total + needed) * 100`, rounded down. 100 when there is no
    /// next boundary.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let Some(next) = &self.next_grade_boundary else {
            return 100;
        };
        let denominator = u64::from(self.total_points) + u64::from(next.points_needed);
        if denominator == 0 {
            return 0;
        }
        let percent = u64::from(self.total_points).saturating_mul(100) / denominator;
        percent.min(100) as u8
    }

    /// Whether the top boundary of the table has been reached.
    #[must_use]
    pub fn is_top_grade(&self) -> bool {
        self.next_grade_boundary.is_none()
    }
}

/// One unit's contribution to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitScore {
    pub id: UnitId,
    pub name: String,
    pub glh: u32,
    pub kind: UnitKind,
    pub grade: Grade,
    pub locked: bool,
    pub points: u32,
}

impl From<&GradedUnit> for UnitScore {
    fn from(unit: &GradedUnit) -> Self {
        Self {
            id: unit.id.clone(),
            name: unit.name.clone(),
            glh: unit.glh,
            kind: unit.kind,
            grade: unit.grade,
            locked: unit.locked,
            points: unit.points(),
        }
    }
}

/// A result together with the per-unit breakdown that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub qualification: QualificationType,
    pub units: Vec<UnitScore>,
    pub result: CalculationResult,
}

// =============================================================================
// EVALUATION
// =============================================================================

/// Sum of per-unit points.
#[must_use]
pub fn total_points(units: &[GradedUnit]) -> u32 {
    units
        .iter()
        .fold(0u32, |acc, unit| acc.saturating_add(unit.points()))
}

/// Classify a points total against a qualification's boundary table.
#[must_use]
pub fn classify(total: u32, qualification: QualificationType) -> CalculationResult {
    classify_against(total, qualification.boundaries())
}

/// Classify a points total against an arbitrary ascending boundary table.
#[must_use]
pub fn classify_against(total: u32, boundaries: &[GradeBoundary]) -> CalculationResult {
    let mut achieved: Option<&GradeBoundary> = None;
    let mut next_grade_boundary = None;

    for boundary in boundaries {
        if total >= boundary.min_points {
            achieved = Some(boundary);
        } else {
            next_grade_boundary = Some(NextBoundary {
                grade: boundary.grade.to_string(),
                points_needed: boundary.min_points - total,
            });
            break;
        }
    }

    CalculationResult {
        total_points: total,
        grade: achieved.map_or(UNCLASSIFIED, |b| b.grade).to_string(),
        ucas_points: achieved.map_or(0, |b| b.ucas),
        next_grade_boundary,
    }
}

/// Evaluate graded units against a qualification.
#[must_use]
pub fn evaluate(units: &[GradedUnit], qualification: QualificationType) -> CalculationResult {
    classify(total_points(units), qualification)
}

/// Evaluate and keep the per-unit points.
#[must_use]
pub fn evaluate_with_breakdown(
    units: &[GradedUnit],
    qualification: QualificationType,
) -> Evaluation {
    let scores: Vec<UnitScore> = units.iter().map(UnitScore::from).collect();
    let total = scores
        .iter()
        .fold(0u32, |acc, score| acc.saturating_add(score.points));

    Evaluation {
        qualification,
        units: scores,
        result: classify(total, qualification),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extended_diploma_mmm() {
        let result = classify(156, QualificationType::ExtendedDiploma);
        assert_eq!(result.grade, "MMM");
        assert_eq!(result.ucas_points, 96);
        assert_eq!(
            result.next_grade_boundary,
            Some(NextBoundary {
                grade: "DMM".to_string(),
                points_needed: 20
            })
        );
    }

    #[test]
    fn top_grade_has_no_projection() {
        let result = classify(300, QualificationType::ExtendedDiploma);
        assert_eq!(result.grade, "D*D*D*");
        assert_eq!(result.ucas_points, 168);
        assert!(result.is_top_grade());
        assert_eq!(result.progress_percent(), 100);
    }

    #[test]
    fn zero_is_unclassified() {
        let result = classify(0, QualificationType::ExtendedDiploma);
        assert_eq!(result.grade, "U");
        assert_eq!(result.ucas_points, 0);
        let next = result.next_grade_boundary.as_ref().expect("projection");
        assert_eq!(next.grade, "PPP");
        assert_eq!(next.points_needed, 108);
        assert_eq!(result.progress_percent(), 0);
    }

    #[test]
    fn exact_minimum_meets_boundary() {
        let result = classify(36, QualificationType::ExtendedCertificate);
        assert_eq!(result.grade, "P");
        assert_eq!(result.ucas_points, 16);
        assert_eq!(
            result.next_grade_boundary.map(|n| n.points_needed),
            Some(16)
        );
    }

    #[test]
    fn progress_percent_rounds_down() {
        // 156 / (156 + 20) = 88.6%
        let result = classify(156, QualificationType::ExtendedDiploma);
        assert_eq!(result.progress_percent(), 88);
    }

    #[test]
    fn breakdown_totals_match() {
        let units = vec![
            GradedUnit::anonymous(60, UnitKind::Internal, Grade::D),
            GradedUnit::anonymous(120, UnitKind::External, Grade::M),
            GradedUnit::anonymous(90, UnitKind::Internal, Grade::U),
        ];
        let evaluation = evaluate_with_breakdown(&units, QualificationType::Diploma);
        assert_eq!(evaluation.result, evaluate(&units, QualificationType::Diploma));
        assert_eq!(evaluation.result.total_points, 48);
        let points: Vec<u32> = evaluation.units.iter().map(|u| u.points).collect();
        assert_eq!(points, vec![16, 32, 0]);
    }

    #[test]
    fn empty_units_total_zero() {
        assert_eq!(total_points(&[]), 0);
    }
}
