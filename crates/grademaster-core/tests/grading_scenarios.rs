//! # Grading Scenarios
//!
//! End-to-end checks of the reference tables and the evaluator, grouped by
//! the component they exercise.

use grademaster_core::{
    Grade, GradedUnit, QualificationType, UnitId, UnitKind, UnitTemplate, evaluate,
    merge_units_and_grades, points_for,
};
use std::collections::BTreeMap;

// =============================================================================
// POINTS TABLE
// =============================================================================

mod points_table {
    use super::*;

    #[test]
    fn every_standard_cell() {
        let expected = [
            (60, UnitKind::Internal, [0, 0, 6, 10, 16]),
            (60, UnitKind::External, [0, 4, 6, 10, 16]),
            (90, UnitKind::Internal, [0, 0, 9, 15, 24]),
            (90, UnitKind::External, [0, 6, 9, 15, 24]),
            (120, UnitKind::Internal, [0, 0, 12, 20, 32]),
            (120, UnitKind::External, [0, 12, 20, 32, 48]),
        ];
        for (glh, kind, row) in expected {
            let actual: Vec<u32> = Grade::ALL.iter().map(|g| points_for(glh, kind, *g)).collect();
            assert_eq!(actual, row, "{glh} {kind}");
        }
    }

    #[test]
    fn custom_sizes_use_fallback() {
        assert_eq!(points_for(30, UnitKind::Internal, Grade::D), 8);
        assert_eq!(points_for(180, UnitKind::External, Grade::NP), 18);
        assert_eq!(points_for(180, UnitKind::External, Grade::D), 72);
    }
}

// =============================================================================
// BOUNDARIES
// =============================================================================

mod boundaries {
    use super::*;

    fn units(specs: &[(u32, UnitKind, Grade)]) -> Vec<GradedUnit> {
        specs
            .iter()
            .map(|&(glh, kind, grade)| GradedUnit::anonymous(glh, kind, grade))
            .collect()
    }

    #[test]
    fn esports_distinctions_reach_extended_certificate_d_star() {
        // 16 + 32 + 32 + 16 = 96
        let graded = units(&[
            (60, UnitKind::Internal, Grade::D),
            (120, UnitKind::Internal, Grade::D),
            (120, UnitKind::Internal, Grade::D),
            (60, UnitKind::Internal, Grade::D),
        ]);
        let result = evaluate(&graded, QualificationType::ExtendedCertificate);
        assert_eq!(result.total_points, 96);
        assert_eq!(result.grade, "D*");
        assert_eq!(result.ucas_points, 56);
        assert!(result.next_grade_boundary.is_none());
    }

    #[test]
    fn it_units_on_foundation_diploma() {
        // 32 + 15 + 15 + 10 = 72, one short of M
        let graded = units(&[
            (120, UnitKind::External, Grade::M),
            (90, UnitKind::External, Grade::M),
            (90, UnitKind::Internal, Grade::M),
            (60, UnitKind::Internal, Grade::M),
        ]);
        let result = evaluate(&graded, QualificationType::FoundationDiploma);
        assert_eq!(result.total_points, 72);
        assert_eq!(result.grade, "P");
        assert_eq!(result.ucas_points, 24);
        let next = result.next_grade_boundary.expect("projection");
        assert_eq!(next.grade, "M");
        assert_eq!(next.points_needed, 1);
    }

    #[test]
    fn diploma_exact_boundaries() {
        for (total, grade, ucas) in [(72, "PP", 32), (143, "DM", 80), (180, "D*D*", 112)] {
            let result = grademaster_core::classify(total, QualificationType::Diploma);
            assert_eq!(result.grade, grade);
            assert_eq!(result.ucas_points, ucas);
        }
    }

    #[test]
    fn extended_diploma_reference_totals() {
        let mmm = grademaster_core::classify(156, QualificationType::ExtendedDiploma);
        assert_eq!(mmm.grade, "MMM");
        assert_eq!(mmm.ucas_points, 96);
        let next = mmm.next_grade_boundary.expect("projection");
        assert_eq!((next.grade.as_str(), next.points_needed), ("DMM", 20));

        let top = grademaster_core::classify(300, QualificationType::ExtendedDiploma);
        assert_eq!(top.grade, "D*D*D*");
        assert_eq!(top.ucas_points, 168);
        assert!(top.next_grade_boundary.is_none());

        let zero = grademaster_core::classify(0, QualificationType::ExtendedDiploma);
        assert_eq!(zero.grade, "U");
        assert_eq!(zero.ucas_points, 0);
        let next = zero.next_grade_boundary.expect("projection");
        assert_eq!((next.grade.as_str(), next.points_needed), ("PPP", 108));
    }
}

// =============================================================================
// MERGE
// =============================================================================

mod merge {
    use super::*;

    #[test]
    fn ungraded_template_resolves_to_u() {
        let templates = vec![
            UnitTemplate::new(UnitId::from("a"), "A", 60, UnitKind::Internal),
            UnitTemplate::new(UnitId::from("b"), "B", 90, UnitKind::External),
        ];
        let grades = BTreeMap::from([(UnitId::from("a"), Grade::P)]);
        let merged = merge_units_and_grades(&templates, &grades, None);

        assert_eq!(merged[0].grade, Grade::P);
        assert_eq!(merged[1].grade, Grade::U);
        assert_eq!(evaluate(&merged, QualificationType::Diploma).total_points, 6);
    }
}
