use serde::{Deserialize, Serialize};
use std::fmt;

use super::context::RuleContextKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationSeverity {
    Warning,
    Error,
}

/// A rule finding; data, not an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub severity: ViolationSeverity,
    pub rule: RuleContextKind,
    /// Node or edge the finding is about, when there is one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_uuid: Option<String>,
    pub message: String,
}

impl RuleViolation {
    pub fn new(severity: ViolationSeverity, rule: RuleContextKind, message: impl Into<String>) -> Self {
        Self {
            severity,
            rule,
            element_uuid: None,
            message: message.into(),
        }
    }

    pub fn error(rule: RuleContextKind, message: impl Into<String>) -> Self {
        Self::new(ViolationSeverity::Error, rule, message)
    }

    pub fn warning(rule: RuleContextKind, message: impl Into<String>) -> Self {
        Self::new(ViolationSeverity::Warning, rule, message)
    }

    pub fn with_element(mut self, uuid: impl Into<String>) -> Self {
        self.element_uuid = Some(uuid.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == ViolationSeverity::Error
    }
}

impl fmt::Display for RuleViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            ViolationSeverity::Error => "ERROR",
            ViolationSeverity::Warning => "WARNING",
        };
        write!(f, "{} [{}] {}", severity, self.rule, self.message)?;
        if let Some(uuid) = &self.element_uuid {
            write!(f, " (element: {})", uuid)?;
        }
        Ok(())
    }
}

pub fn has_errors(violations: &[RuleViolation]) -> bool {
    violations.iter().any(RuleViolation::is_error)
}

pub fn error_count(violations: &[RuleViolation]) -> usize {
    violations.iter().filter(|v| v.is_error()).count()
}
