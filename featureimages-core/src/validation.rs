//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! Errors block stylesheet generation, warnings are recorded.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::breakpoints::{BreakpointTable, ImageSlot, SlotImages};

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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn has_errors(&self) -> bool {
        self.violations.iter().any(|v| v.severity == ViolationSeverity::Error)
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.violations
            .iter()
            .filter(|v| v.severity == ViolationSeverity::Error)
            .map(|v| format!("{}: {}", v.rule, v.message))
            .collect()
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule {
    fn name(&self) -> &'static str;
    fn validate(&self, table: &BreakpointTable, images: &SlotImages) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

/// Thresholds must strictly descend; the order is the fallback chain.
pub struct DescendingOrderRule;

impl ValidationRule for DescendingOrderRule {
    fn name(&self) -> &'static str { "descending_order" }

    fn validate(&self, table: &BreakpointTable, _images: &SlotImages) -> Vec<ValidationViolation> {
        table
            .tiers()
            .windows(2)
            .filter(|pair| pair[0].min_width <= pair[1].min_width)
            .map(|pair| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: "Breakpoints must be listed largest first".to_string(),
                expected: Some(format!("{} > {}", pair[0].label(), pair[1].label())),
                actual: Some(format!("{} then {}", pair[0].label(), pair[1].label())),
                remediation: vec!["Order the breakpoint table from the widest threshold down".to_string()],
            })
            .collect()
    }
}

pub struct ZeroThresholdRule;

impl ValidationRule for ZeroThresholdRule {
    fn name(&self) -> &'static str { "zero_threshold" }

    fn validate(&self, table: &BreakpointTable, _images: &SlotImages) -> Vec<ValidationViolation> {
        table
            .tiers()
            .iter()
            .filter(|bp| bp.min_width == 0)
            .map(|bp| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Error,
                message: format!("Breakpoint for {} has a 0px threshold", bp.slot.name()),
                expected: Some("1px minimum".to_string()),
                actual: Some(bp.label()),
                remediation: vec!["Use 1px for the smallest tier".to_string()],
            })
            .collect()
    }
}

pub struct DuplicateSlotRule;

impl ValidationRule for DuplicateSlotRule {
    fn name(&self) -> &'static str { "duplicate_slot" }

    fn validate(&self, table: &BreakpointTable, _images: &SlotImages) -> Vec<ValidationViolation> {
        let mut seen: HashSet<ImageSlot> = HashSet::new();
        let mut violations = vec![];

        for bp in table.tiers() {
            if !seen.insert(bp.slot) {
                violations.push(ValidationViolation {
                    rule: self.name().to_string(),
                    severity: ViolationSeverity::Error,
                    message: format!("Slot {} is mapped to more than one breakpoint", bp.slot.name()),
                    expected: Some("one breakpoint per slot".to_string()),
                    actual: Some(bp.label()),
                    remediation: vec!["Remove the duplicate breakpoint".to_string()],
                });
            }
        }

        violations
    }
}

/// A present image with no URL would render `url()`.
pub struct UnresolvableImageRule;

impl ValidationRule for UnresolvableImageRule {
    fn name(&self) -> &'static str { "unresolvable_image" }

    fn validate(&self, table: &BreakpointTable, images: &SlotImages) -> Vec<ValidationViolation> {
        table
            .tiers()
            .iter()
            .filter_map(|bp| images.get(bp.slot).map(|img| (bp, img)))
            .filter(|(_, img)| img.is_present() && img.url.trim().is_empty())
            .map(|(bp, img)| ValidationViolation {
                rule: self.name().to_string(),
                severity: ViolationSeverity::Warning,
                message: format!("Image {} for {} has no URL", img.id, bp.slot.name()),
                expected: Some("absolute or host-relative URL".to_string()),
                actual: Some(String::new()),
                remediation: vec!["Re-publish the image so the asset store reports a URL".to_string()],
            })
            .collect()
    }
}

/// Validator orchestrates rules and applies policy
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule + Send + Sync>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(DescendingOrderRule),
                Box::new(ZeroThresholdRule),
                Box::new(DuplicateSlotRule),
                Box::new(UnresolvableImageRule),
            ],
        }
    }

    pub fn validate(&self, table: &BreakpointTable, images: &SlotImages) -> ValidationResult {
        let violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(table, images))
            .collect();

        // Warnings never block
        let valid = !violations.iter().any(|v| v.severity == ViolationSeverity::Error);

        ValidationResult { valid, violations }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
