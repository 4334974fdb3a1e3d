//! # Gradebook
//!
//! In-memory store of user accounts and courses, with the role rules that
//! govern who may change what.
//!
//! ## Permissions
//!
//! | Operation | Superuser | Admin | Teacher |
//! |-----------|-----------|-------|---------|
//! | Manage accounts | yes | no | no |
//! | Create/edit/delete courses, units, students | yes | yes | no |
//! | Set an unlocked grade | yes | yes | yes |
//! | Lock a grade | yes | yes | yes |
//! | Unlock a grade | yes | yes | no |
//!
//! Reads (course lists, results) are open to every signed-in role.
//!
//! Identifiers are sequential (`course-1`, `unit-4`, `student-2`, `user-1`)
//! so that every run over the same operations produces the same state.

mod course;
mod users;

pub use course::{Course, CourseDraft, CourseSummary, Student, StudentResult, UnitDraft};
pub use users::{User, UserDraft, UserRole};

use crate::primitives::{ROOT_USERNAME, SAMPLE_COURSE_TITLE};
use crate::types::{
    CourseId, Grade, GradebookError, QualificationType, StudentId, Subject, UnitId, UnitTemplate,
    UserId,
};
use course::validate_name;
use std::collections::BTreeSet;

// =============================================================================
// ID SEQUENCE
// =============================================================================

#[derive(Debug, Clone, Default)]
struct IdSequence {
    user: u64,
    course: u64,
    unit: u64,
    student: u64,
}

fn bump(counter: &mut u64, prefix: &str) -> String {
    *counter = counter.saturating_add(1);
    format!("{prefix}-{counter}")
}

// =============================================================================
// GRADEBOOK
// =============================================================================

/// All accounts and courses held by one running instance.
#[derive(Debug, Clone, Default)]
pub struct Gradebook {
    users: Vec<User>,
    courses: Vec<Course>,
    ids: IdSequence,
}

impl Gradebook {
    /// An empty gradebook with no accounts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A gradebook holding the three seeded accounts.
    #[must_use]
    pub fn with_default_users() -> Self {
        Self {
            users: User::defaults(),
            ..Self::default()
        }
    }

    /// Add the sample Esports course and return its id.
    pub fn seed_sample_course(&mut self) -> CourseId {
        let id = CourseId::new(bump(&mut self.ids.course, "course"));
        let mut course = Course {
            id: id.clone(),
            title: SAMPLE_COURSE_TITLE.to_string(),
            subject: Subject::Esports,
            qualification: QualificationType::ExtendedDiploma,
            ..Course::default()
        };
        course.units = self.preset_units(course.subject);
        self.courses.push(course);
        id
    }

    fn preset_units(&mut self, subject: Subject) -> Vec<UnitTemplate> {
        subject
            .preset_units()
            .iter()
            .map(|p| {
                UnitTemplate::new(
                    UnitId::new(bump(&mut self.ids.unit, "unit")),
                    p.name,
                    p.glh,
                    p.kind,
                )
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    /// Check credentials and return the matching account.
    pub fn login(&self, username: &str, password: &str) -> Result<User, GradebookError> {
        self.login_with(username, password, |provided, stored| provided == stored)
    }

    /// Check credentials with the given password comparison, called as
    /// `password_eq(provided, stored)`.
    pub fn login_with<F>(
        &self,
        username: &str,
        password: &str,
        password_eq: F,
    ) -> Result<User, GradebookError>
    where
        F: Fn(&str, &str) -> bool,
    {
        self.find_user_by_name(username)
            .filter(|u| password_eq(password, &u.password))
            .cloned()
            .ok_or(GradebookError::InvalidCredentials)
    }

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: &UserId) -> Result<&User, GradebookError> {
        self.users
            .iter()
            .find(|u| &u.id == id)
            .ok_or_else(|| GradebookError::UserNotFound(id.clone()))
    }

    #[must_use]
    pub fn find_user_by_name(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub fn add_user(&mut self, actor: &User, draft: UserDraft) -> Result<User, GradebookError> {
        require_user_manager(actor)?;
        draft.validate()?;
        let username = draft.username.trim().to_string();
        if self.find_user_by_name(&username).is_some() {
            return Err(GradebookError::DuplicateUsername(username));
        }

        let mut id = UserId::new(bump(&mut self.ids.user, "user"));
        while self.users.iter().any(|u| u.id == id) {
            id = UserId::new(bump(&mut self.ids.user, "user"));
        }
        let user = User::new(id, username, draft.password, draft.role);
        self.users.push(user.clone());
        Ok(user)
    }

    /// Replace an account's username, password and role.
    pub fn update_user(
        &mut self,
        actor: &User,
        id: &UserId,
        draft: UserDraft,
    ) -> Result<User, GradebookError> {
        require_user_manager(actor)?;
        draft.validate()?;
        let username = draft.username.trim().to_string();
        if self
            .users
            .iter()
            .any(|u| u.username == username && &u.id != id)
        {
            return Err(GradebookError::DuplicateUsername(username));
        }

        let user = self
            .users
            .iter_mut()
            .find(|u| &u.id == id)
            .ok_or_else(|| GradebookError::UserNotFound(id.clone()))?;
        if user.is_root() && (username != ROOT_USERNAME || draft.role != UserRole::Superuser) {
            return Err(GradebookError::ProtectedUser(user.username.clone()));
        }

        user.username = username;
        user.password = draft.password;
        user.role = draft.role;
        Ok(user.clone())
    }

    /// Delete an account. The root account and the acting account are protected.
    pub fn delete_user(&mut self, actor: &User, id: &UserId) -> Result<User, GradebookError> {
        require_user_manager(actor)?;
        let index = self
            .users
            .iter()
            .position(|u| &u.id == id)
            .ok_or_else(|| GradebookError::UserNotFound(id.clone()))?;
        let target = &self.users[index];
        if target.is_root() || target.id == actor.id {
            return Err(GradebookError::ProtectedUser(target.username.clone()));
        }
        Ok(self.users.remove(index))
    }

    // -------------------------------------------------------------------------
    // Courses
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn summaries(&self) -> Vec<CourseSummary> {
        self.courses.iter().map(Course::summary).collect()
    }

    pub fn course(&self, id: &CourseId) -> Result<&Course, GradebookError> {
        find_course(&self.courses, id)
    }

    fn course_mut(&mut self, id: &CourseId) -> Result<&mut Course, GradebookError> {
        self.courses
            .iter_mut()
            .find(|c| &c.id == id)
            .ok_or_else(|| GradebookError::CourseNotFound(id.clone()))
    }

    pub fn create_course(
        &mut self,
        actor: &User,
        draft: &CourseDraft,
    ) -> Result<Course, GradebookError> {
        require_editor(actor)?;
        let mut course = Course::default();
        draft.apply(&mut course)?;
        course.id = self.fresh_course_id();
        self.courses.push(course.clone());
        Ok(course)
    }

    pub fn update_course(
        &mut self,
        actor: &User,
        id: &CourseId,
        draft: &CourseDraft,
    ) -> Result<Course, GradebookError> {
        require_editor(actor)?;
        let course = self.course_mut(id)?;
        let mut updated = course.clone();
        draft.apply(&mut updated)?;
        *course = updated.clone();
        Ok(updated)
    }

    /// Delete a course along with every student on it.
    pub fn delete_course(&mut self, actor: &User, id: &CourseId) -> Result<Course, GradebookError> {
        require_editor(actor)?;
        let index = self
            .courses
            .iter()
            .position(|c| &c.id == id)
            .ok_or_else(|| GradebookError::CourseNotFound(id.clone()))?;
        Ok(self.courses.remove(index))
    }

    /// Add a course read from a file. The course gets a fresh id; blank unit
    /// and student ids are assigned.
    pub fn import_course(&mut self, actor: &User, mut course: Course) -> Result<Course, GradebookError> {
        require_editor(actor)?;
        course.title = validate_name("title", &course.title)?;

        let mut unit_ids = BTreeSet::new();
        for unit in &mut course.units {
            if unit.id.as_str().is_empty() {
                unit.id = UnitId::new(bump(&mut self.ids.unit, "unit"));
            }
            unit.name = validate_name("unit name", &unit.name)?;
            course::validate_glh(unit.glh)?;
            if !unit_ids.insert(unit.id.clone()) {
                return Err(GradebookError::InvalidInput(format!(
                    "duplicate unit id '{}'",
                    unit.id
                )));
            }
        }

        let mut student_ids = BTreeSet::new();
        for student in &mut course.students {
            if student.id.as_str().is_empty() {
                student.id = StudentId::new(bump(&mut self.ids.student, "student"));
            }
            if !student_ids.insert(student.id.clone()) {
                return Err(GradebookError::InvalidInput(format!(
                    "duplicate student id '{}'",
                    student.id
                )));
            }
            for (unit_id, grade) in &student.grades {
                if let Some(unit) = course.units.iter().find(|u| &u.id == unit_id) {
                    if !grade.applies_to(unit.kind) {
                        return Err(near_pass_error(unit));
                    }
                }
            }
        }

        course.id = self.fresh_course_id();
        self.courses.push(course.clone());
        Ok(course)
    }

    fn fresh_course_id(&mut self) -> CourseId {
        loop {
            let id = CourseId::new(bump(&mut self.ids.course, "course"));
            if !self.courses.iter().any(|c| c.id == id) {
                return id;
            }
        }
    }

    // -------------------------------------------------------------------------
    // Units
    // -------------------------------------------------------------------------

    pub fn add_unit(
        &mut self,
        actor: &User,
        course_id: &CourseId,
        draft: &UnitDraft,
    ) -> Result<UnitTemplate, GradebookError> {
        require_editor(actor)?;
        let existing = find_course(&self.courses, course_id)?;
        let mut id = UnitId::new(bump(&mut self.ids.unit, "unit"));
        while existing.has_unit(&id) {
            id = UnitId::new(bump(&mut self.ids.unit, "unit"));
        }
        let unit = draft.build(id)?;
        self.course_mut(course_id)?.units.push(unit.clone());
        Ok(unit)
    }

    pub fn update_unit(
        &mut self,
        actor: &User,
        course_id: &CourseId,
        unit_id: &UnitId,
        draft: &UnitDraft,
    ) -> Result<UnitTemplate, GradebookError> {
        require_editor(actor)?;
        let course = self.course_mut(course_id)?;
        let mut updated = course.unit(unit_id)?.clone();
        draft.apply(&mut updated)?;

        // A unit turned internal can no longer hold a Near Pass, and a locked
        // Near Pass must be unlocked before it can be reset.
        let drops_near_pass = !Grade::NP.applies_to(updated.kind);
        if drops_near_pass
            && course
                .students
                .iter()
                .any(|s| s.is_locked(unit_id) && s.grade(unit_id) == Grade::NP)
        {
            return Err(GradebookError::GradeLocked(unit_id.clone()));
        }
        *course.unit_mut(unit_id)? = updated.clone();

        if drops_near_pass {
            for student in &mut course.students {
                if student.grade(unit_id) == Grade::NP {
                    student.grades.insert(unit_id.clone(), Grade::U);
                }
            }
        }
        Ok(updated)
    }

    /// Remove a unit and every student's grade and lock for it.
    pub fn remove_unit(
        &mut self,
        actor: &User,
        course_id: &CourseId,
        unit_id: &UnitId,
    ) -> Result<UnitTemplate, GradebookError> {
        require_editor(actor)?;
        let course = self.course_mut(course_id)?;
        let index = course
            .units
            .iter()
            .position(|u| &u.id == unit_id)
            .ok_or_else(|| GradebookError::UnitNotFound(unit_id.clone()))?;
        let removed = course.units.remove(index);
        for student in &mut course.students {
            student.forget_unit(unit_id);
        }
        Ok(removed)
    }

    /// Replace a course's units with its subject's standard list.
    ///
    /// Grades and locks recorded against the old units are dropped.
    pub fn load_presets(
        &mut self,
        actor: &User,
        course_id: &CourseId,
    ) -> Result<Vec<UnitTemplate>, GradebookError> {
        require_editor(actor)?;
        let subject = self.course(course_id)?.subject;
        let units = self.preset_units(subject);
        let course = self.course_mut(course_id)?;
        for student in &mut course.students {
            student.grades.clear();
            student.locked_grades.clear();
        }
        course.units.clone_from(&units);
        Ok(units)
    }

    // -------------------------------------------------------------------------
    // Students
    // -------------------------------------------------------------------------

    /// Add a student. Without a name the student is called "Student N".
    pub fn add_student(
        &mut self,
        actor: &User,
        course_id: &CourseId,
        name: Option<&str>,
    ) -> Result<Student, GradebookError> {
        require_editor(actor)?;
        let existing = find_course(&self.courses, course_id)?;
        let name = match name {
            Some(name) => validate_name("student name", name)?,
            None => format!("Student {}", existing.students.len().saturating_add(1)),
        };
        let mut id = StudentId::new(bump(&mut self.ids.student, "student"));
        while existing.has_student(&id) {
            id = StudentId::new(bump(&mut self.ids.student, "student"));
        }
        let student = Student::new(id, name);
        self.course_mut(course_id)?.students.push(student.clone());
        Ok(student)
    }

    pub fn rename_student(
        &mut self,
        actor: &User,
        course_id: &CourseId,
        student_id: &StudentId,
        name: &str,
    ) -> Result<Student, GradebookError> {
        require_editor(actor)?;
        let name = validate_name("student name", name)?;
        let student = self.course_mut(course_id)?.student_mut(student_id)?;
        student.name = name;
        Ok(student.clone())
    }

    pub fn delete_student(
        &mut self,
        actor: &User,
        course_id: &CourseId,
        student_id: &StudentId,
    ) -> Result<Student, GradebookError> {
        require_editor(actor)?;
        let course = self.course_mut(course_id)?;
        let index = course
            .students
            .iter()
            .position(|s| &s.id == student_id)
            .ok_or_else(|| GradebookError::StudentNotFound(student_id.clone()))?;
        Ok(course.students.remove(index))
    }

    // -------------------------------------------------------------------------
    // Grades
    // -------------------------------------------------------------------------

    /// Record a grade. Any role may do this while the grade is unlocked.
    pub fn set_grade(
        &mut self,
        _actor: &User,
        course_id: &CourseId,
        student_id: &StudentId,
        unit_id: &UnitId,
        grade: Grade,
    ) -> Result<StudentResult, GradebookError> {
        let course = self.course_mut(course_id)?;
        let unit = course.unit(unit_id)?;
        if !grade.applies_to(unit.kind) {
            return Err(near_pass_error(unit));
        }
        let student = course.student_mut(student_id)?;
        if student.is_locked(unit_id) {
            return Err(GradebookError::GradeLocked(unit_id.clone()));
        }
        student.grades.insert(unit_id.clone(), grade);
        self.student_result(course_id, student_id)
    }

    /// Lock or unlock a grade. Only editors may unlock.
    pub fn set_lock(
        &mut self,
        actor: &User,
        course_id: &CourseId,
        student_id: &StudentId,
        unit_id: &UnitId,
        locked: bool,
    ) -> Result<StudentResult, GradebookError> {
        let course = self.course_mut(course_id)?;
        course.unit(unit_id)?;
        let student = course.student_mut(student_id)?;
        if !locked && student.is_locked(unit_id) && !actor.role.is_editor() {
            return Err(GradebookError::Forbidden(
                "only an admin or superuser can unlock a grade",
            ));
        }
        student.locked_grades.insert(unit_id.clone(), locked);
        self.student_result(course_id, student_id)
    }

    // -------------------------------------------------------------------------
    // Results
    // -------------------------------------------------------------------------

    pub fn student_result(
        &self,
        course_id: &CourseId,
        student_id: &StudentId,
    ) -> Result<StudentResult, GradebookError> {
        let course = self.course(course_id)?;
        let student = course.student(student_id)?;
        Ok(course.evaluate_student(student))
    }

    /// Results for every student on a course, in enrolment order.
    pub fn course_results(&self, course_id: &CourseId) -> Result<Vec<StudentResult>, GradebookError> {
        self.search_results(course_id, None)
    }

    /// Results for the students whose name contains `search`, ignoring case.
    /// A blank or absent term matches every student.
    pub fn search_results(
        &self,
        course_id: &CourseId,
        search: Option<&str>,
    ) -> Result<Vec<StudentResult>, GradebookError> {
        let course = self.course(course_id)?;
        let needle = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);
        Ok(course
            .students
            .iter()
            .filter(|s| {
                needle
                    .as_deref()
                    .is_none_or(|term| s.name.to_lowercase().contains(term))
            })
            .map(|s| course.evaluate_student(s))
            .collect())
    }
}

fn find_course<'a>(courses: &'a [Course], id: &CourseId) -> Result<&'a Course, GradebookError> {
    courses
        .iter()
        .find(|c| &c.id == id)
        .ok_or_else(|| GradebookError::CourseNotFound(id.clone()))
}

fn require_editor(actor: &User) -> Result<(), GradebookError> {
    if actor.role.is_editor() {
        Ok(())
    } else {
        Err(GradebookError::Forbidden(
            "only an admin or superuser can change course structure",
        ))
    }
}

fn require_user_manager(actor: &User) -> Result<(), GradebookError> {
    if actor.role.manages_users() {
        Ok(())
    } else {
        Err(GradebookError::Forbidden("only a superuser can manage users"))
    }
}

fn near_pass_error(unit: &UnitTemplate) -> GradebookError {
    GradebookError::InvalidInput(format!(
        "Near Pass is only available for external units ('{}' is {})",
        unit.name, unit.kind
    ))
}

// =============================================================================
// TESTS
// =============================================================================
