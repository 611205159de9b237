//! Checks on the violations a visitor produced.
//!
//! The `check_*` functions return an [`AssertionFailure`] carrying both the
//! expected and the actual side. The `assert_*` wrappers panic with the same
//! information, for direct use in tests.

use serde::Serialize;
use strictpy_rules::{AnchorKind, Violation, ViolationKind, ViolationRecord, Visitor};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
#[serde(tag = "failure", rename_all = "snake_case")]
pub enum AssertionFailure {
    #[error("expected {} violations {:?}, found {} {:?}", .expected.len(), .expected, .actual.len(), names(.actual))]
    Count {
        expected: Vec<&'static str>,
        actual: Vec<ViolationRecord>,
    },
    #[error("violation #{index}: expected {expected}, found {} ({})", .actual.name, .actual.code)]
    Kind {
        index: usize,
        expected: &'static str,
        actual: ViolationRecord,
    },
    #[error("violation #{index} ({}) has no location", .actual.name)]
    Unanchored {
        index: usize,
        actual: ViolationRecord,
    },
    #[error("expected exactly one violation, found {} {:?}", .actual.len(), names(.actual))]
    Single { actual: Vec<ViolationRecord> },
    #[error("no violation to check the message of")]
    Empty,
    #[error("template of {kind} has no `: {{0}}` placeholder: {template:?}")]
    NoPlaceholder {
        kind: &'static str,
        template: &'static str,
    },
    #[error("message mismatch: expected {expected:?}, found {:?}", .actual.message)]
    Message {
        expected: String,
        actual: ViolationRecord,
    },
}

fn names(records: &[ViolationRecord]) -> Vec<&'static str> {
    records.iter().map(|r| r.name).collect()
}

impl AssertionFailure {
    /// Pretty JSON of the failure, including every actual record.
    pub fn payload(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|err| err.to_string())
    }
}

fn records(violations: &[&Violation]) -> Vec<ViolationRecord> {
    violations.iter().map(|v| v.record()).collect()
}

/// Compare violations against an ordered list of expected kinds.
///
/// Violations of `ignored` kinds are dropped first. Node and token kinds must
/// carry an anchor with a real location; file kinds report `(0, 0)`.
pub fn check_errors(
    visitor: &dyn Visitor,
    expected: &[&'static ViolationKind],
    ignored: &[&'static ViolationKind],
) -> Result<(), AssertionFailure> {
    let actual: Vec<&Violation> = visitor
        .violations()
        .iter()
        .filter(|v| !ignored.contains(&v.kind()))
        .collect();

    if actual.len() != expected.len() {
        return Err(AssertionFailure::Count {
            expected: expected.iter().map(|k| k.name).collect(),
            actual: records(&actual),
        });
    }

    for (index, (violation, kind)) in actual.iter().zip(expected).enumerate() {
        if violation.kind() != *kind {
            return Err(AssertionFailure::Kind {
                index,
                expected: kind.name,
                actual: violation.record(),
            });
        }
    }

    for (index, violation) in actual.iter().enumerate() {
        let needs_anchor = violation.kind().anchor != AnchorKind::File;
        if needs_anchor && (violation.anchor().is_none() || violation.location() == (0, 0)) {
            return Err(AssertionFailure::Unanchored {
                index,
                actual: violation.record(),
            });
        }
    }

    Ok(())
}

/// Check the rendered message of the first violation.
///
/// Unless `multiple` is set, exactly one violation must exist. The message is
/// compared with a violation rebuilt from the same kind and anchor plus the
/// given `text` and `baseline`.
pub fn check_error_text(
    visitor: &dyn Visitor,
    text: &str,
    baseline: Option<&str>,
    multiple: bool,
) -> Result<(), AssertionFailure> {
    let violations = visitor.violations();
    if !multiple && violations.len() != 1 {
        return Err(AssertionFailure::Single {
            actual: violations.iter().map(Violation::record).collect(),
        });
    }
    let Some(first) = violations.first() else {
        return Err(AssertionFailure::Empty);
    };

    let kind = first.kind();
    if !kind.has_placeholder() {
        return Err(AssertionFailure::NoPlaceholder {
            kind: kind.name,
            template: kind.template,
        });
    }

    let mut rebuilt = Violation::new(kind, first.anchor().cloned()).with_text(text);
    if let Some(baseline) = baseline {
        rebuilt = rebuilt.with_baseline(baseline);
    }
    if rebuilt.message() != first.message() {
        return Err(AssertionFailure::Message {
            expected: rebuilt.message(),
            actual: first.record(),
        });
    }
    Ok(())
}

/// Panicking form of [`check_errors`].
#[track_caller]
pub fn assert_errors(
    visitor: &dyn Visitor,
    expected: &[&'static ViolationKind],
    ignored: &[&'static ViolationKind],
) {
    if let Err(failure) = check_errors(visitor, expected, ignored) {
        panic!("{}: {failure}\n{}", visitor.name(), failure.payload());
    }
}

/// Panicking form of [`check_error_text`].
#[track_caller]
pub fn assert_error_text(visitor: &dyn Visitor, text: &str, baseline: Option<&str>, multiple: bool) {
    if let Err(failure) = check_error_text(visitor, text, baseline, multiple) {
        panic!("{}: {failure}\n{}", visitor.name(), failure.payload());
    }
}
