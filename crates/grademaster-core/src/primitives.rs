//! # Innate Primitives
//!
//! Hardcoded reference data for the GradeMaster engine.
//!
//! These tables are compiled into the binary and are immutable at runtime.
//! Nothing in the system edits them; every calculation reads them directly.
//!
//! ## Tables
//!
//! 1. **Points table**: GLH tier → unit kind → grade → points (RQF 2016/2019 specs).
//! 2. **Fallback multipliers**: per-grade points per 10 GLH for non-standard sizes.
//! 3. **Grade boundaries**: per qualification, ascending minimum-points thresholds.
//! 4. **Preset units**: the standard unit lists offered by "load standard units".

use crate::types::{QualificationType, Subject, UnitKind};
use serde::Serialize;

// =============================================================================
// POINTS TABLE
// =============================================================================

/// Exact points for one standard GLH size.
///
/// Arrays are indexed by [`Grade::index`](crate::Grade::index):
/// `[U, NP, P, M, D]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointsTier {
    /// Guided learning hours this tier applies to.
    pub glh: u32,
    /// Points for an internally assessed unit.
    pub internal: [u32; 5],
    /// Points for an externally assessed unit.
    pub external: [u32; 5],
}

impl PointsTier {
    /// Points row for a unit kind.
    #[must_use]
    pub const fn row(&self, kind: UnitKind) -> &[u32; 5] {
        match kind {
            UnitKind::Internal => &self.internal,
            UnitKind::External => &self.external,
        }
    }
}

/// The standard points table.
///
/// NP is defined as 0 for internal units since Near Pass does not apply to them.
pub const POINTS_TABLE: [PointsTier; 3] = [
    PointsTier {
        glh: 60,
        internal: [0, 0, 6, 10, 16],
        external: [0, 4, 6, 10, 16],
    },
    PointsTier {
        glh: 90,
        internal: [0, 0, 9, 15, 24],
        external: [0, 6, 9, 15, 24],
    },
    PointsTier {
        glh: 120,
        internal: [0, 0, 12, 20, 32],
        external: [0, 12, 20, 32, 48],
    },
];

// =============================================================================
// FALLBACK MULTIPLIERS
// =============================================================================

/// Fallback points per 10 GLH for internal units, in thousandths.
///
/// Calibrated on the 60 GLH internal row: P=6, M=10, D=16.
pub const INTERNAL_MULTIPLIERS_MILLI: [u32; 5] = [0, 0, 1000, 1666, 2666];

/// Fallback points per 10 GLH for external units, in thousandths.
///
/// Calibrated on the 120 GLH external row: NP=12, P=20, M=32, D=48.
pub const EXTERNAL_MULTIPLIERS_MILLI: [u32; 5] = [0, 1000, 1666, 2666, 4000];

/// Divisor turning `glh * multiplier_milli` into points: 10 GLH per step times 1000.
pub const FALLBACK_DIVISOR: u64 = 10_000;

// =============================================================================
// GRADE BOUNDARIES
// =============================================================================

/// One row of a grade-boundary table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GradeBoundary {
    /// Minimum total points needed for this grade.
    pub min_points: u32,
    /// Overall grade label, e.g. "D*D".
    pub grade: &'static str,
    /// Equivalent UCAS tariff points.
    pub ucas: u32,
}

const fn boundary(min_points: u32, grade: &'static str, ucas: u32) -> GradeBoundary {
    GradeBoundary {
        min_points,
        grade,
        ucas,
    }
}

/// Extended Certificate (360 GLH).
pub const EXTENDED_CERTIFICATE_BOUNDARIES: [GradeBoundary; 4] = [
    boundary(36, "P", 16),
    boundary(52, "M", 32),
    boundary(74, "D", 48),
    boundary(90, "D*", 56),
];

/// Foundation Diploma (510/540 GLH).
pub const FOUNDATION_DIPLOMA_BOUNDARIES: [GradeBoundary; 4] = [
    boundary(51, "P", 24),
    boundary(73, "M", 48),
    boundary(104, "D", 72),
    boundary(130, "D*", 84),
];

/// Diploma (720 GLH).
pub const DIPLOMA_BOUNDARIES: [GradeBoundary; 7] = [
    boundary(72, "PP", 32),
    boundary(88, "MP", 48),
    boundary(104, "MM", 64),
    boundary(124, "DM", 80),
    boundary(144, "DD", 96),
    boundary(162, "D*D", 104),
    boundary(180, "D*D*", 112),
];

/// Extended Diploma (1080 GLH).
pub const EXTENDED_DIPLOMA_BOUNDARIES: [GradeBoundary; 10] = [
    boundary(108, "PPP", 48),
    boundary(124, "MPP", 64),
    boundary(140, "MMP", 80),
    boundary(156, "MMM", 96),
    boundary(176, "DMM", 112),
    boundary(196, "DDM", 128),
    boundary(216, "DDD", 144),
    boundary(234, "D*DD", 152),
    boundary(252, "D*D*D", 160),
    boundary(270, "D*D*D*", 168),
];

impl QualificationType {
    /// The ascending grade-boundary table for this qualification.
    #[must_use]
    pub fn boundaries(&self) -> &'static [GradeBoundary] {
        match self {
            QualificationType::ExtendedCertificate => &EXTENDED_CERTIFICATE_BOUNDARIES,
            QualificationType::FoundationDiploma => &FOUNDATION_DIPLOMA_BOUNDARIES,
            QualificationType::Diploma => &DIPLOMA_BOUNDARIES,
            QualificationType::ExtendedDiploma => &EXTENDED_DIPLOMA_BOUNDARIES,
        }
    }
}

/// Label reported when no boundary is met.
pub const UNCLASSIFIED: &str = "U";

// =============================================================================
// PRESET UNITS
// =============================================================================

/// A unit in a preset list (no identifier yet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetUnit {
    pub name: &'static str,
    pub glh: u32,
    pub kind: UnitKind,
}

const fn preset(name: &'static str, glh: u32, kind: UnitKind) -> PresetUnit {
    PresetUnit { name, glh, kind }
}

/// Standard Esports units.
pub const ESPORTS_UNITS: [PresetUnit; 4] = [
    preset("Unit 1: Introduction to Esports", 60, UnitKind::Internal),
    preset(
        "Unit 2: Esports Skills, Strategies and Analysis",
        120,
        UnitKind::Internal,
    ),
    preset("Unit 3: Enterprise and Entrepreneurship", 120, UnitKind::Internal),
    preset("Unit 4: Health, Wellbeing and Fitness", 60, UnitKind::Internal),
];

/// Standard Information Technology units.
pub const IT_UNITS: [PresetUnit; 4] = [
    preset("Unit 1: Information Technology Systems", 120, UnitKind::External),
    preset(
        "Unit 2: Creating Systems to Manage Information",
        90,
        UnitKind::External,
    ),
    preset("Unit 3: Using Social Media in Business", 90, UnitKind::Internal),
    preset("Unit 6: Website Development", 60, UnitKind::Internal),
];

impl Subject {
    /// Preset unit list for this subject. Subjects without their own list use IT's.
    #[must_use]
    pub fn preset_units(&self) -> &'static [PresetUnit] {
        match self {
            Subject::Esports => &ESPORTS_UNITS,
            Subject::InformationTechnology | Subject::Computing => &IT_UNITS,
        }
    }
}

// =============================================================================
// GRADEBOOK DEFAULTS
// =============================================================================

/// Username of the root superuser. This account can never be deleted.
pub const ROOT_USERNAME: &str = "Frazadmin";

/// Title given to a freshly created course.
pub const DEFAULT_COURSE_TITLE: &str = "New Course";

/// Academic year given to a freshly created course.
pub const DEFAULT_ACADEMIC_YEAR: &str = "2024-25";

/// Name given to a freshly added unit.
pub const DEFAULT_UNIT_NAME: &str = "New Unit";

/// GLH given to a freshly added unit.
pub const DEFAULT_UNIT_GLH: u32 = 60;

/// Title of the sample course seeded at startup.
pub const SAMPLE_COURSE_TITLE: &str = "Year 12 Esports Group A";

/// Maximum length accepted for names and titles.
pub const MAX_NAME_LENGTH: usize = 256;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_tables_ascend() {
        for q in QualificationType::ALL {
            let mins: Vec<u32> = q.boundaries().iter().map(|b| b.min_points).collect();
            assert!(mins.windows(2).all(|w| w[0] < w[1]), "{q} not ascending");
        }
    }

    #[test]
    fn boundary_table_sizes() {
        assert_eq!(QualificationType::ExtendedCertificate.boundaries().len(), 4);
        assert_eq!(QualificationType::FoundationDiploma.boundaries().len(), 4);
        assert_eq!(QualificationType::Diploma.boundaries().len(), 7);
        assert_eq!(QualificationType::ExtendedDiploma.boundaries().len(), 10);
    }

    #[test]
    fn points_rows_never_decrease() {
        for tier in POINTS_TABLE {
            for row in [tier.internal, tier.external] {
                assert!(row.windows(2).all(|w| w[0] <= w[1]));
            }
        }
    }

    #[test]
    fn computing_uses_it_presets() {
        assert_eq!(Subject::Computing.preset_units(), &IT_UNITS);
        assert_eq!(Subject::Esports.preset_units(), &ESPORTS_UNITS);
    }
}
