//! Joins a course's unit templates with one student's grades and locks.

use crate::types::{Grade, GradedUnit, UnitId, UnitTemplate};
use std::collections::BTreeMap;

/// Build the graded units for one student.
///
/// Template order is preserved. A unit with no recorded grade is `U`; a unit
/// with no lock entry, or no lock map at all, is unlocked. Entries in either
/// map that match no template are ignored.
#[must_use]
pub fn merge_units_and_grades(
    templates: &[UnitTemplate],
    grades: &BTreeMap<UnitId, Grade>,
    locks: Option<&BTreeMap<UnitId, bool>>,
) -> Vec<GradedUnit> {
    templates
        .iter()
        .map(|template| {
            let grade = grades.get(&template.id).copied().unwrap_or_default();
            let locked = locks
                .and_then(|map| map.get(&template.id).copied())
                .unwrap_or(false);
            GradedUnit::from_template(template, grade, locked)
        })
        .collect()
}
