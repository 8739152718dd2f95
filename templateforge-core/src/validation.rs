//! Input Validation - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Policy maps violations to a verdict.
//!
//! The engine itself never validates; unknown tags there silently take
//! their fallback. This is for callers that want to vet a form first.

use serde::{Deserialize, Serialize};

use crate::design::Color;
use crate::templates::{ColorScheme, DesignTone, GenerationInputs, TemplateType};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ViolationSeverity {
    Error,
    Warning,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub severity: ViolationSeverity,
    pub message: String,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub remediation: Vec<String>,
}

impl ValidationViolation {
    fn new(rule: &str, severity: ViolationSeverity, message: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            severity,
            message: message.into(),
            expected: None,
            actual: None,
            remediation: vec![],
        }
    }

    fn expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    fn actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    fn remediation(mut self, step: impl Into<String>) -> Self {
        self.remediation.push(step.into());
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationViolation> {
        self.violations.iter().filter(|v| v.severity == ViolationSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Errors make the inputs invalid
    #[default]
    Block,
    /// Never invalid, just record
    Warn,
}

/// Validation rule trait - produces violations
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, inputs: &GenerationInputs) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct RequiredTextRule;

impl ValidationRule for RequiredTextRule {
    fn name(&self) -> &'static str { "required_text" }

    fn validate(&self, inputs: &GenerationInputs) -> Vec<ValidationViolation> {
        [
            ("templateName", "Template name", &inputs.template_name),
            ("targetAudience", "Target audience", &inputs.target_audience),
        ]
        .into_iter()
        .filter(|(_, _, value)| value.trim().is_empty())
        .map(|(field, label, _)| {
            ValidationViolation::new(self.name(), ViolationSeverity::Error, format!("{label} is required"))
                .expected(format!("non-blank {field}"))
                .actual("blank")
                .remediation(format!("Enter a value for {field}"))
        })
        .collect()
    }
}

pub struct BrandColorFormatRule;

impl ValidationRule for BrandColorFormatRule {
    fn name(&self) -> &'static str { "brand_color_format" }

    fn validate(&self, inputs: &GenerationInputs) -> Vec<ValidationViolation> {
        inputs
            .brand_colors()
            .iter()
            .enumerate()
            .filter(|(_, color)| Color::from_hex(color).is_err())
            .map(|(i, color)| {
                ValidationViolation::new(
                    self.name(),
                    ViolationSeverity::Error,
                    format!("Brand color {} is not a hex color", i + 1),
                )
                .expected("#rgb or #rrggbb")
                .actual(color.clone())
                .remediation("Pick the color with a color picker")
            })
            .collect()
    }
}

pub struct BrandColorsPresentRule;

impl ValidationRule for BrandColorsPresentRule {
    fn name(&self) -> &'static str { "brand_colors_present" }

    fn validate(&self, inputs: &GenerationInputs) -> Vec<ValidationViolation> {
        let is_brand = ColorScheme::from_tag(&inputs.color_scheme) == Some(ColorScheme::Brand);
        if is_brand && inputs.brand_colors().is_empty() {
            vec![ValidationViolation::new(
                self.name(),
                ViolationSeverity::Warning,
                "Brand scheme without brand colors uses the neutral palette",
            )
            .expected("at least one brand color")
            .actual("none")
            .remediation("Add brand colors or choose a preset scheme")]
        } else {
            vec![]
        }
    }
}

pub struct RecognizedTagRule;

impl RecognizedTagRule {
    fn check(
        &self,
        field: &str,
        value: &str,
        known: &[&'static str],
        fallback: &str,
    ) -> Option<ValidationViolation> {
        if known.iter().any(|k| *k == value) {
            return None;
        }
        Some(
            ValidationViolation::new(
                self.name(),
                ViolationSeverity::Warning,
                format!("Unknown {field}; '{fallback}' will be used"),
            )
            .expected(known.join(" | "))
            .actual(value.to_string()),
        )
    }
}

impl ValidationRule for RecognizedTagRule {
    fn name(&self) -> &'static str { "recognized_tag" }

    fn validate(&self, inputs: &GenerationInputs) -> Vec<ValidationViolation> {
        let types: Vec<_> = TemplateType::ALL.iter().map(|t| t.as_tag()).collect();
        let tones: Vec<_> = DesignTone::ALL.iter().map(|t| t.as_tag()).collect();
        let schemes: Vec<_> = ColorScheme::ALL.iter().map(|t| t.as_tag()).collect();

        [
            self.check("templateType", &inputs.template_type, &types, crate::templates::FALLBACK_TEMPLATE_TYPE.as_tag()),
            self.check("designTone", &inputs.design_tone, &tones, crate::design::FALLBACK_TONE.as_tag()),
            self.check("colorScheme", &inputs.color_scheme, &schemes, crate::design::FALLBACK_SCHEME.as_tag()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Validator orchestrates rules and applies policy
pub struct InputValidator {
    rules: Vec<Box<dyn ValidationRule>>,
    failure_mode: FailureMode,
}

impl InputValidator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(RequiredTextRule),
                Box::new(BrandColorFormatRule),
                Box::new(BrandColorsPresentRule),
                Box::new(RecognizedTagRule),
            ],
            failure_mode: FailureMode::Block,
        }
    }

    pub fn with_failure_mode(mut self, mode: FailureMode) -> Self {
        self.failure_mode = mode;
        self
    }

    pub fn validate(&self, inputs: &GenerationInputs) -> ValidationResult {
        let violations: Vec<_> = self.rules.iter().flat_map(|rule| rule.validate(inputs)).collect();
        let has_errors = violations.iter().any(|v| v.severity == ViolationSeverity::Error);

        let valid = match self.failure_mode {
            FailureMode::Block => !has_errors,
            FailureMode::Warn => true,
        };
        ValidationResult { valid, violations }
    }
}

impl Default for InputValidator {
    fn default() -> Self {
        Self::new()
    }
}
