use serde::{Deserialize, Serialize};

use crate::rules::{RuleViolation, ViolationSeverity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandResultType {
    Ok,
    Warning,
    Error,
}

/// Outcome of checking, executing or undoing a command
///
/// The type is derived from the violations: `Error` if any has error
/// severity, `Warning` if any has warning severity, `Ok` otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    result_type: CommandResultType,
    violations: Vec<RuleViolation>,
}

impl CommandResult {
    pub fn ok() -> Self {
        Self {
            result_type: CommandResultType::Ok,
            violations: Vec::new(),
        }
    }

    pub fn builder() -> CommandResultBuilder {
        CommandResultBuilder::default()
    }

    pub fn from_violations(violations: Vec<RuleViolation>) -> Self {
        Self::builder().add_violations(violations).build()
    }

    pub fn result_type(&self) -> CommandResultType {
        self.result_type
    }

    pub fn violations(&self) -> &[RuleViolation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<RuleViolation> {
        self.violations
    }

    pub fn is_error(&self) -> bool {
        self.result_type == CommandResultType::Error
    }

    pub fn is_ok(&self) -> bool {
        self.result_type == CommandResultType::Ok
    }
}

impl Default for CommandResult {
    fn default() -> Self {
        Self::ok()
    }
}

#[derive(Debug, Default)]
pub struct CommandResultBuilder {
    violations: Vec<RuleViolation>,
}

impl CommandResultBuilder {
    pub fn add_violation(mut self, violation: RuleViolation) -> Self {
        self.violations.push(violation);
        self
    }

    pub fn add_violations(mut self, violations: impl IntoIterator<Item = RuleViolation>) -> Self {
        self.violations.extend(violations);
        self
    }

    /// Fold another result's violations into this one
    pub fn merge(self, result: CommandResult) -> Self {
        self.add_violations(result.violations)
    }

    pub fn build(self) -> CommandResult {
        let result_type = self
            .violations
            .iter()
            .map(|v| match v.severity {
                ViolationSeverity::Error => CommandResultType::Error,
                ViolationSeverity::Warning => CommandResultType::Warning,
            })
            .max()
            .unwrap_or(CommandResultType::Ok);
        CommandResult {
            result_type,
            violations: self.violations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleContextKind;

    #[test]
    fn test_empty_builder_is_ok() {
        let result = CommandResult::builder().build();
        assert!(result.is_ok());
        assert!(result.violations().is_empty());
    }

    #[test]
    fn test_type_is_worst_severity() {
        let warning = RuleViolation::warning(RuleContextKind::Docking, "advisory");
        let error = RuleViolation::error(RuleContextKind::Connection, "blocked");

        let result = CommandResult::from_violations(vec![warning.clone()]);
        assert_eq!(result.result_type(), CommandResultType::Warning);

        let result = CommandResult::builder()
            .add_violation(warning)
            .add_violation(error)
            .build();
        assert_eq!(result.result_type(), CommandResultType::Error);
        assert_eq!(result.violations().len(), 2);
    }

    #[test]
    fn test_result_type_serializes_uppercase() {
        let json = serde_json::to_string(&CommandResultType::Warning).unwrap();
        assert_eq!(json, "\"WARNING\"");
    }
}
