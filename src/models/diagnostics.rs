use serde::{Deserialize, Serialize};

use crate::notice::Severity;

// ---------------------------------------------------------------------------
// DiagnosticCheck: Outcome of one system check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticCheck {
    pub name: String,
    pub severity: Severity,
    pub message: String,
}

impl DiagnosticCheck {
    pub fn new(name: &str, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            severity,
            message: message.into(),
        }
    }

    pub fn passed(&self) -> bool {
        self.severity == Severity::Success
    }
}

// ---------------------------------------------------------------------------
// DiagnosticReport: Every check plus the overall score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub checks: Vec<DiagnosticCheck>,
    /// Share of passed checks, 0..=100.
    pub score: u8,
    pub severity: Severity,
}

impl DiagnosticReport {
    /// Score the checks: success at 80 % or more, warning at 50 % or more.
    pub fn from_checks(checks: Vec<DiagnosticCheck>) -> Self {
        let passed = checks.iter().filter(|c| c.passed()).count();
        let score = if checks.is_empty() {
            0
        } else {
            ((passed as f64 / checks.len() as f64) * 100.0).round() as u8
        };
        let severity = if score >= 80 {
            Severity::Success
        } else if score >= 50 {
            Severity::Warning
        } else {
            Severity::Error
        };
        Self {
            checks,
            score,
            severity,
        }
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.checks.iter().filter(|c| c.severity == severity).count()
    }

    pub fn check(&self, name: &str) -> Option<&DiagnosticCheck> {
        self.checks.iter().find(|c| c.name == name)
    }
}
