//! # Core Type Definitions
//!
//! This module contains the vocabulary shared by every GradeMaster component:
//! - Identifiers (`UnitId`, `StudentId`, `CourseId`, `UserId`)
//! - Grading enums (`Grade`, `UnitKind`, `QualificationType`, `Subject`)
//! - Unit structures (`UnitTemplate`, `GradedUnit`)
//! - Error types (`GradebookError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer values only (no floating-point)
//! - Implement `Ord` where they key a `BTreeMap`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create an identifier from any string.
            #[must_use]
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Identifier of a unit template within a course.
    UnitId
);
string_id!(
    /// Identifier of a student within a course.
    StudentId
);
string_id!(
    /// Identifier of a course.
    CourseId
);
string_id!(
    /// Identifier of a user account.
    UserId
);

// =============================================================================
// GRADE
// =============================================================================

/// A unit grade.
///
/// Ordered `U < NP < P < M < D`. `NP` (Near Pass) only applies to
/// externally assessed units.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub enum Grade {
    /// Unclassified.
    #[default]
    U,
    /// Near Pass (external units only).
    NP,
    /// Pass.
    P,
    /// Merit.
    M,
    /// Distinction.
    D,
}

impl Grade {
    /// Every grade in ascending order.
    pub const ALL: [Grade; 5] = [Grade::U, Grade::NP, Grade::P, Grade::M, Grade::D];

    /// Column index of this grade in the points table.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Grade::U => 0,
            Grade::NP => 1,
            Grade::P => 2,
            Grade::M => 3,
            Grade::D => 4,
        }
    }

    /// Short code as shown in grade tables.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Grade::U => "U",
            Grade::NP => "NP",
            Grade::P => "P",
            Grade::M => "M",
            Grade::D => "D",
        }
    }

    /// Long description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Grade::U => "Unclassified",
            Grade::NP => "Near Pass",
            Grade::P => "Pass",
            Grade::M => "Merit",
            Grade::D => "Distinction",
        }
    }

    /// Whether a unit of the given kind can be awarded this grade.
    #[must_use]
    pub fn applies_to(&self, kind: UnitKind) -> bool {
        !matches!((self, kind), (Grade::NP, UnitKind::Internal))
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Grade {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "U" => Ok(Grade::U),
            "NP" => Ok(Grade::NP),
            "P" => Ok(Grade::P),
            "M" => Ok(Grade::M),
            "D" => Ok(Grade::D),
            _ => Err(GradebookError::InvalidInput(format!("unknown grade '{s}'"))),
        }
    }
}

// =============================================================================
// UNIT KIND
// =============================================================================

/// How a unit is assessed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum UnitKind {
    /// Internally assessed (coursework).
    #[default]
    Internal,
    /// Externally assessed (exam or set task).
    External,
}

impl UnitKind {
    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            UnitKind::Internal => "Internal",
            UnitKind::External => "External",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitKind {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "internal" | "int" | "i" => Ok(UnitKind::Internal),
            "external" | "ext" | "e" => Ok(UnitKind::External),
            _ => Err(GradebookError::InvalidInput(format!(
                "unknown unit kind '{s}'"
            ))),
        }
    }
}

// =============================================================================
// QUALIFICATION TYPE
// =============================================================================

/// The four vocational qualification sizes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum QualificationType {
    /// Extended Certificate (360 GLH).
    ExtendedCertificate,
    /// Foundation Diploma (510/540 GLH).
    FoundationDiploma,
    /// Diploma (720 GLH).
    Diploma,
    /// Extended Diploma (1080 GLH).
    #[default]
    ExtendedDiploma,
}

impl QualificationType {
    /// Every qualification type, smallest first.
    pub const ALL: [QualificationType; 4] = [
        QualificationType::ExtendedCertificate,
        QualificationType::FoundationDiploma,
        QualificationType::Diploma,
        QualificationType::ExtendedDiploma,
    ];

    /// Display name including the guided learning hours.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            QualificationType::ExtendedCertificate => "Extended Certificate (360 GLH)",
            QualificationType::FoundationDiploma => "Foundation Diploma (510/540 GLH)",
            QualificationType::Diploma => "Diploma (720 GLH)",
            QualificationType::ExtendedDiploma => "Extended Diploma (1080 GLH)",
        }
    }

    /// Stable machine key (matches the serde representation).
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            QualificationType::ExtendedCertificate => "extended_certificate",
            QualificationType::FoundationDiploma => "foundation_diploma",
            QualificationType::Diploma => "diploma",
            QualificationType::ExtendedDiploma => "extended_diploma",
        }
    }
}

impl fmt::Display for QualificationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualificationType {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|q| q.key() == normalized || q.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GradebookError::InvalidInput(format!("unknown qualification '{s}'")))
    }
}

// =============================================================================
// SUBJECT
// =============================================================================

/// Course subject area. Selects the preset unit list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    /// Esports.
    #[default]
    Esports,
    /// Information Technology.
    InformationTechnology,
    /// Computing.
    Computing,
}

impl Subject {
    /// Display name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Subject::Esports => "Esports",
            Subject::InformationTechnology => "Information Technology",
            Subject::Computing => "Computing",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Subject {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "esports" => Ok(Subject::Esports),
            "information_technology" | "it" => Ok(Subject::InformationTechnology),
            "computing" => Ok(Subject::Computing),
            _ => Err(GradebookError::InvalidInput(format!("unknown subject '{s}'"))),
        }
    }
}

// =============================================================================
// UNITS
// =============================================================================

/// A unit as defined on a course, without any student's grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitTemplate {
    /// Unique identifier within the course. Blank ids are assigned on import.
    #[serde(default)]
    pub id: UnitId,
    /// Display name, e.g. "Unit 1: Introduction to Esports".
    pub name: String,
    /// Guided learning hours. Standard sizes are 60, 90 and 120.
    pub glh: u32,
    /// Internal or external assessment.
    pub kind: UnitKind,
}

impl UnitTemplate {
    /// Create a new unit template.
    #[must_use]
    pub fn new(id: UnitId, name: impl Into<String>, glh: u32, kind: UnitKind) -> Self {
        Self {
            id,
            name: name.into(),
            glh,
            kind,
        }
    }
}

/// A unit template joined with one student's grade and lock flag.
///
/// Only ever built transiently for a calculation; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedUnit {
    #[serde(default)]
    pub id: UnitId,
    #[serde(default)]
    pub name: String,
    pub glh: u32,
    pub kind: UnitKind,
    #[serde(default)]
    pub grade: Grade,
    #[serde(default)]
    pub locked: bool,
}

impl GradedUnit {
    /// Join a template with a grade.
    #[must_use]
    pub fn from_template(template: &UnitTemplate, grade: Grade, locked: bool) -> Self {
        Self {
            id: template.id.clone(),
            name: template.name.clone(),
            glh: template.glh,
            kind: template.kind,
            grade,
            locked,
        }
    }

    /// An anonymous unit, handy for ad-hoc calculations.
    #[must_use]
    pub fn anonymous(glh: u32, kind: UnitKind, grade: Grade) -> Self {
        Self {
            id: UnitId::default(),
            name: String::new(),
            glh,
            kind,
            grade,
            locked: false,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the gradebook and its collaborators.
///
/// The points engine and evaluator never produce these; they are total.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradebookError {
    /// The requested course does not exist.
    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    /// The requested student is not on the course.
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),

    /// The requested unit is not on the course.
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    /// The requested user does not exist.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Username and password did not match any account.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The acting user's role does not permit the operation.
    #[error("Forbidden: {0}")]
    Forbidden(&'static str),

    /// The student's grade for this unit is locked.
    #[error("Grade for unit {0} is locked")]
    GradeLocked(UnitId),

    /// Another account already uses this username.
    #[error("Username already taken: {0}")]
    DuplicateUsername(String),

    /// The account may not be deleted.
    #[error("User cannot be deleted: {0}")]
    ProtectedUser(String),

    /// A value could not be parsed or is out of range.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A serialization or deserialization error occurred.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
