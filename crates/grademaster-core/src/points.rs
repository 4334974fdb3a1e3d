//! # Points Engine
//!
//! Maps a single unit's (GLH, kind, grade) to its integer point value.
//!
//! Standard unit sizes (60, 90, 120 GLH) are looked up in [`POINTS_TABLE`].
//! Any other size goes through a linear fallback: points per 10 GLH times a
//! per-grade multiplier, rounded half up. The multipliers are integer
//! thousandths so the whole computation stays in integer arithmetic.
//!
//! The engine is total: it never errors and never returns a negative value.

use crate::primitives::{
    EXTERNAL_MULTIPLIERS_MILLI, FALLBACK_DIVISOR, INTERNAL_MULTIPLIERS_MILLI, POINTS_TABLE,
};
use crate::types::{Grade, GradedUnit, UnitKind};

/// Points awarded for one unit.
#[must_use]
pub fn points_for(glh: u32, kind: UnitKind, grade: Grade) -> u32 {
    match POINTS_TABLE.iter().find(|tier| tier.glh == glh) {
        Some(tier) => tier.row(kind)[grade.index()],
        None => fallback_points(glh, kind, grade),
    }
}

/// Linear fallback for GLH values outside the standard table.
///
/// `round_half_up(glh / 10 * multiplier)` computed as
/// `(glh * milli + 5000) / 10000`.
#[must_use]
pub fn fallback_points(glh: u32, kind: UnitKind, grade: Grade) -> u32 {
    let milli = match kind {
        UnitKind::Internal => INTERNAL_MULTIPLIERS_MILLI[grade.index()],
        UnitKind::External => EXTERNAL_MULTIPLIERS_MILLI[grade.index()],
    };
    let scaled = u64::from(glh) * u64::from(milli);
    let rounded = scaled.saturating_add(FALLBACK_DIVISOR / 2) / FALLBACK_DIVISOR;
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

impl GradedUnit {
    /// Points this unit currently earns.
    #[must_use]
    pub fn points(&self) -> u32 {
        points_for(self.glh, self.kind, self.grade)
    }
}
