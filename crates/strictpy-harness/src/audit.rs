//! Registry convention checks for test suites.

use strictpy_rules::{AuditFinding, Registry};

/// All audit findings of `registry`, or `Ok` when it follows every convention.
pub fn check_registry(registry: &Registry) -> Result<(), Vec<AuditFinding>> {
    let findings = registry.audit();
    if findings.is_empty() {
        Ok(())
    } else {
        Err(findings)
    }
}

#[track_caller]
pub fn assert_registry_consistent(registry: &Registry) {
    if let Err(findings) = check_registry(registry) {
        let listing: Vec<String> = findings.iter().map(|f| format!("  {f}")).collect();
        panic!(
            "registry has {} audit findings:\n{}",
            findings.len(),
            listing.join("\n")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictpy_rules::{AnchorKind, RuleModule, ViolationKind, builtin_registry};

    static LATE_START: ViolationKind = ViolationKind {
        name: "LateStartViolation",
        module: "late",
        code: 905,
        template: "Found late start",
        anchor: AnchorKind::Node,
        previous_codes: &[],
        docs: "versionadded: 0.1.0",
    };

    #[test]
    fn test_builtins_are_consistent() {
        assert_registry_consistent(&builtin_registry().unwrap());
    }

    #[test]
    fn test_findings_are_reported() {
        let mut registry = Registry::new();
        registry
            .register_module(RuleModule {
                index: 9,
                name: "late",
                docs: "late.LateStartViolation",
            })
            .unwrap();
        registry.register(&LATE_START).unwrap();
        let findings = check_registry(&registry).unwrap_err();
        assert_eq!(
            findings,
            [
                AuditFinding::BandStart {
                    module: "late",
                    lowest: 905,
                    expected: 900,
                },
                AuditFinding::DocMentions {
                    qualified: "late.LateStartViolation".into(),
                    count: 1,
                },
            ]
        );
    }
}
