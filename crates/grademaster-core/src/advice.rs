//! # Advisory Request
//!
//! The input handed to an optional advisory collaborator, and the prompt text
//! derived from it. The collaborator itself lives in the application layer;
//! the core only shapes the request and owns the fixed fallback messages.

use crate::evaluator::{CalculationResult, UnitScore};
use crate::types::{QualificationType, Subject};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Returned when the advisory collaborator fails for any reason.
pub const ADVICE_UNAVAILABLE: &str =
    "Unable to generate advice at this time. Please check your connection and try again.";

/// Returned when the collaborator answers without any text.
pub const NO_ADVICE_GENERATED: &str = "No advice generated.";

/// Everything an advisor needs to comment on one student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub subject: Subject,
    pub qualification: QualificationType,
    pub units: Vec<UnitScore>,
    pub result: CalculationResult,
}

impl AdviceRequest {
    #[must_use]
    pub fn new(
        subject: Subject,
        qualification: QualificationType,
        units: Vec<UnitScore>,
        result: CalculationResult,
    ) -> Self {
        Self {
            subject,
            qualification,
            units,
            result,
        }
    }

    /// Render the analysis prompt.
    #[must_use]
    pub fn prompt(&self) -> String {
        let mut out = String::new();
        out.push_str(
            "As an academic advisor, please analyze the following student results \
             and provide constructive feedback:\n\n",
        );
        let _ = writeln!(out, "Subject: {}", self.subject);
        let _ = writeln!(out, "Qualification: {}", self.qualification);
        out.push_str("\nUnit Breakdown:\n");
        for unit in &self.units {
            let _ = writeln!(out, "- {}: {} ({} points)", unit.name, unit.grade, unit.points);
        }
        out.push_str("\nOverall Results:\n");
        let _ = writeln!(out, "Total Points: {}", self.result.total_points);
        let _ = writeln!(out, "Grade: {}", self.result.grade);
        out.push_str(
            "\nPlease include:\n\
             1. Performance Summary\n\
             2. Strengths & Weaknesses\n\
             3. Recommendations for improvement or next steps (university/career)\n",
        );
        out
    }
}
