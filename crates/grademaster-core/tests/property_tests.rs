//! # Property-Based Tests
//!
//! Invariants of the points engine and the evaluator, checked with proptest.

use grademaster_core::{
    Grade, GradedUnit, QualificationType, UnitKind, classify, evaluate, points_for,
};
use proptest::collection::vec;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn grade() -> impl Strategy<Value = Grade> {
    prop::sample::select(Grade::ALL.to_vec())
}

fn kind() -> impl Strategy<Value = UnitKind> {
    prop_oneof![Just(UnitKind::Internal), Just(UnitKind::External)]
}

fn qualification() -> impl Strategy<Value = QualificationType> {
    prop::sample::select(QualificationType::ALL.to_vec())
}

fn glh() -> impl Strategy<Value = u32> {
    prop_oneof![Just(60u32), Just(90u32), Just(120u32), 1u32..400]
}

fn unit() -> impl Strategy<Value = GradedUnit> {
    (glh(), kind(), grade()).prop_map(|(glh, kind, grade)| GradedUnit::anonymous(glh, kind, grade))
}

fn rank(label: &str, qualification: QualificationType) -> usize {
    qualification
        .boundaries()
        .iter()
        .position(|b| b.grade == label)
        .map_or(0, |i| i + 1)
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Unclassified units never score.
    #[test]
    fn unclassified_scores_zero(glh in 1u32..2000, kind in kind()) {
        prop_assert_eq!(points_for(glh, kind, Grade::U), 0);
    }

    /// A better grade never scores fewer points on the same unit.
    #[test]
    fn points_monotone_in_grade(glh in glh(), kind in kind()) {
        let points: Vec<u32> = Grade::ALL.iter().map(|g| points_for(glh, kind, *g)).collect();
        prop_assert!(points.windows(2).all(|w| w[0] <= w[1]));
    }

    /// Unit order does not affect the result.
    #[test]
    fn evaluation_is_order_independent(
        units in vec(unit(), 0..12),
        qualification in qualification(),
    ) {
        let mut reversed = units.clone();
        reversed.reverse();
        let mut rotated = units.clone();
        if !rotated.is_empty() {
            rotated.rotate_left(1);
        }

        let base = evaluate(&units, qualification);
        prop_assert_eq!(&base, &evaluate(&reversed, qualification));
        prop_assert_eq!(&base, &evaluate(&rotated, qualification));
    }

    /// Same input, same output.
    #[test]
    fn evaluation_is_deterministic(
        units in vec(unit(), 0..12),
        qualification in qualification(),
    ) {
        prop_assert_eq!(evaluate(&units, qualification), evaluate(&units, qualification));
    }

    /// Raising one unit's grade never lowers the total or the grade rank.
    #[test]
    fn raising_a_grade_is_monotone(
        units in vec(unit(), 1..10),
        index in any::<prop::sample::Index>(),
        qualification in qualification(),
    ) {
        let i = index.index(units.len());
        let before = evaluate(&units, qualification);

        let mut raised = units.clone();
        let better = Grade::ALL.iter().copied().filter(|g| *g > raised[i].grade).last();
        if let Some(better) = better {
            raised[i].grade = better;
        }
        let after = evaluate(&raised, qualification);

        prop_assert!(after.total_points >= before.total_points);
        prop_assert!(rank(&after.grade, qualification) >= rank(&before.grade, qualification));
        prop_assert!(after.ucas_points >= before.ucas_points);
    }

    /// The projection, when present, points at the first boundary above the total.
    #[test]
    fn projection_targets_first_unmet_boundary(
        total in 0u32..400,
        qualification in qualification(),
    ) {
        let result = classify(total, qualification);
        let first_unmet = qualification.boundaries().iter().find(|b| b.min_points > total);

        match (first_unmet, &result.next_grade_boundary) {
            (Some(boundary), Some(next)) => {
                prop_assert_eq!(next.grade.as_str(), boundary.grade);
                prop_assert_eq!(next.points_needed, boundary.min_points - total);
                prop_assert!(next.points_needed > 0);
            }
            (None, None) => {}
            _ => prop_assert!(false, "projection mismatch at {}", total),
        }
        prop_assert!(result.progress_percent() <= 100);
    }
}
