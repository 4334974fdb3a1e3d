//! Courses, students and the per-student result view.

use crate::advice::AdviceRequest;
use crate::evaluator::{Evaluation, evaluate_with_breakdown};
use crate::merge::merge_units_and_grades;
use crate::primitives::{
    DEFAULT_ACADEMIC_YEAR, DEFAULT_COURSE_TITLE, DEFAULT_UNIT_GLH, DEFAULT_UNIT_NAME,
    MAX_NAME_LENGTH,
};
use crate::types::{
    CourseId, Grade, GradebookError, QualificationType, StudentId, Subject, UnitId, UnitKind,
    UnitTemplate,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// STUDENT
// =============================================================================

/// A student enrolled on a course.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    /// Grade per unit. Units without an entry are `U`.
    pub grades: BTreeMap<UnitId, Grade>,
    /// Lock flag per unit. Units without an entry are unlocked.
    pub locked_grades: BTreeMap<UnitId, bool>,
}

impl Student {
    #[must_use]
    pub fn new(id: StudentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn grade(&self, unit: &UnitId) -> Grade {
        self.grades.get(unit).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn is_locked(&self, unit: &UnitId) -> bool {
        self.locked_grades.get(unit).copied().unwrap_or(false)
    }

    pub(crate) fn forget_unit(&mut self, unit: &UnitId) {
        self.grades.remove(unit);
        self.locked_grades.remove(unit);
    }
}

// =============================================================================
// COURSE
// =============================================================================

/// A course: its qualification, unit templates and students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub academic_year: String,
    pub subject: Subject,
    pub qualification: QualificationType,
    pub units: Vec<UnitTemplate>,
    pub students: Vec<Student>,
}

impl Default for Course {
    fn default() -> Self {
        Self {
            id: CourseId::default(),
            title: DEFAULT_COURSE_TITLE.to_string(),
            academic_year: DEFAULT_ACADEMIC_YEAR.to_string(),
            subject: Subject::default(),
            qualification: QualificationType::default(),
            units: Vec::new(),
            students: Vec::new(),
        }
    }
}

impl Course {
    pub fn unit(&self, id: &UnitId) -> Result<&UnitTemplate, GradebookError> {
        self.units
            .iter()
            .find(|u| &u.id == id)
            .ok_or_else(|| GradebookError::UnitNotFound(id.clone()))
    }

    pub fn student(&self, id: &StudentId) -> Result<&Student, GradebookError> {
        self.students
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| GradebookError::StudentNotFound(id.clone()))
    }

    pub(crate) fn unit_mut(&mut self, id: &UnitId) -> Result<&mut UnitTemplate, GradebookError> {
        self.units
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| GradebookError::UnitNotFound(id.clone()))
    }

    pub(crate) fn student_mut(&mut self, id: &StudentId) -> Result<&mut Student, GradebookError> {
        self.students
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| GradebookError::StudentNotFound(id.clone()))
    }

    #[must_use]
    pub fn has_unit(&self, id: &UnitId) -> bool {
        self.units.iter().any(|u| &u.id == id)
    }

    #[must_use]
    pub fn has_student(&self, id: &StudentId) -> bool {
        self.students.iter().any(|s| &s.id == id)
    }

    /// Total guided learning hours across all units.
    #[must_use]
    pub fn total_glh(&self) -> u32 {
        self.units
            .iter()
            .fold(0u32, |acc, u| acc.saturating_add(u.glh))
    }

    /// Merge and evaluate one student.
    #[must_use]
    pub fn evaluate_student(&self, student: &Student) -> StudentResult {
        let graded = merge_units_and_grades(
            &self.units,
            &student.grades,
            Some(&student.locked_grades),
        );
        StudentResult {
            course_id: self.id.clone(),
            student_id: student.id.clone(),
            student_name: student.name.clone(),
            subject: self.subject,
            evaluation: evaluate_with_breakdown(&graded, self.qualification),
        }
    }

    #[must_use]
    pub fn summary(&self) -> CourseSummary {
        CourseSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            academic_year: self.academic_year.clone(),
            subject: self.subject,
            qualification: self.qualification,
            unit_count: self.units.len(),
            student_count: self.students.len(),
            total_glh: self.total_glh(),
        }
    }
}

/// Listing view of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: CourseId,
    pub title: String,
    pub academic_year: String,
    pub subject: Subject,
    pub qualification: QualificationType,
    pub unit_count: usize,
    pub student_count: usize,
    pub total_glh: u32,
}

/// One student's evaluated standing on a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentResult {
    pub course_id: CourseId,
    pub student_id: StudentId,
    pub student_name: String,
    pub subject: Subject,
    pub evaluation: Evaluation,
}

impl StudentResult {
    /// Build the advisory request for this result.
    #[must_use]
    pub fn advice_request(&self) -> AdviceRequest {
        AdviceRequest::new(
            self.subject,
            self.evaluation.qualification,
            self.evaluation.units.clone(),
            self.evaluation.result.clone(),
        )
    }
}

// =============================================================================
// DRAFTS (partial updates)
// =============================================================================

/// Course fields to set. Absent fields keep their current (or default) value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseDraft {
    pub title: Option<String>,
    pub academic_year: Option<String>,
    pub subject: Option<Subject>,
    pub qualification: Option<QualificationType>,
}

impl CourseDraft {
    pub(crate) fn apply(&self, course: &mut Course) -> Result<(), GradebookError> {
        if let Some(title) = &self.title {
            course.title = validate_name("title", title)?;
        }
        if let Some(year) = &self.academic_year {
            course.academic_year = validate_name("academic year", year)?;
        }
        if let Some(subject) = self.subject {
            course.subject = subject;
        }
        if let Some(qualification) = self.qualification {
            course.qualification = qualification;
        }
        Ok(())
    }
}

/// Unit fields to set. Absent fields keep their current (or default) value.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitDraft {
    pub name: Option<String>,
    pub glh: Option<u32>,
    pub kind: Option<UnitKind>,
}

impl UnitDraft {
    pub(crate) fn build(&self, id: UnitId) -> Result<UnitTemplate, GradebookError> {
        let mut unit = UnitTemplate::new(id, DEFAULT_UNIT_NAME, DEFAULT_UNIT_GLH, UnitKind::Internal);
        self.apply(&mut unit)?;
        Ok(unit)
    }

    pub(crate) fn apply(&self, unit: &mut UnitTemplate) -> Result<(), GradebookError> {
        if let Some(name) = &self.name {
            unit.name = validate_name("unit name", name)?;
        }
        if let Some(glh) = self.glh {
            unit.glh = validate_glh(glh)?;
        }
        if let Some(kind) = self.kind {
            unit.kind = kind;
        }
        Ok(())
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

pub(crate) fn validate_name(field: &str, value: &str) -> Result<String, GradebookError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GradebookError::InvalidInput(format!(
            "{field} must not be empty"
        )));
    }
    if trimmed.len() > MAX_NAME_LENGTH {
        return Err(GradebookError::InvalidInput(format!(
            "{field} exceeds {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_glh(glh: u32) -> Result<u32, GradebookError> {
    if glh == 0 {
        return Err(GradebookError::InvalidInput(
            "glh must be positive".to_string(),
        ));
    }
    Ok(glh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course() -> Course {
        Course {
            id: CourseId::from("course-1"),
            units: vec![
                UnitTemplate::new(UnitId::from("u1"), "A", 120, UnitKind::External),
                UnitTemplate::new(UnitId::from("u2"), "B", 60, UnitKind::Internal),
            ],
            ..Course::default()
        }
    }

    #[test]
    fn course_defaults() {
        let c = Course::default();
        assert_eq!(c.title, "New Course");
        assert_eq!(c.academic_year, "2024-25");
        assert_eq!(c.subject, Subject::Esports);
        assert_eq!(c.qualification, QualificationType::ExtendedDiploma);
    }

    #[test]
    fn evaluate_student_merges_grades() {
        let c = course();
        let mut s = Student::new(StudentId::from("s1"), "Ada");
        s.grades.insert(UnitId::from("u1"), Grade::D);
        s.locked_grades.insert(UnitId::from("u1"), true);

        let result = c.evaluate_student(&s);
        assert_eq!(result.evaluation.result.total_points, 48);
        assert!(result.evaluation.units[0].locked);
        assert_eq!(result.evaluation.units[1].grade, Grade::U);
    }

    #[test]
    fn summary_counts() {
        let summary = course().summary();
        assert_eq!(summary.unit_count, 2);
        assert_eq!(summary.student_count, 0);
        assert_eq!(summary.total_glh, 180);
    }

    #[test]
    fn unit_draft_rejects_zero_glh() {
        let draft = UnitDraft {
            glh: Some(0),
            ..UnitDraft::default()
        };
        assert!(draft.build(UnitId::from("u9")).is_err());
    }

    #[test]
    fn unit_draft_defaults() {
        let unit = UnitDraft::default().build(UnitId::from("u9")).expect("build");
        assert_eq!(unit.name, "New Unit");
        assert_eq!(unit.glh, 60);
        assert_eq!(unit.kind, UnitKind::Internal);
    }

    #[test]
    fn course_file_fields_default() {
        let c: Course = serde_json::from_str(r#"{"title":"X"}"#).expect("de");
        assert_eq!(c.title, "X");
        assert_eq!(c.academic_year, "2024-25");
        assert!(c.units.is_empty());
    }
}
