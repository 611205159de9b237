//! Numbering and documentation conventions of the builtin kinds.

use std::collections::HashSet;
use strictpy_rules::{AnchorKind, builtin_registry};

#[test]
fn builtin_codes_are_unique() {
    let registry = builtin_registry().unwrap();
    let codes = registry.codes();
    let unique: HashSet<_> = codes.iter().collect();
    assert_eq!(unique.len(), codes.len());
}

#[test]
fn builtin_codes_stay_in_their_band() {
    let registry = builtin_registry().unwrap();
    for module in registry.modules() {
        let codes: Vec<u16> = registry.kinds_in(module.name).map(|k| k.code).collect();
        assert!(!codes.is_empty(), "module {} has no kinds", module.name);
        assert!(codes.iter().all(|c| module.band().contains(c)), "{}", module.name);
        assert_eq!(codes.iter().min(), Some(&(module.index * 100)));
    }
}

#[test]
fn builtin_registry_passes_audit() {
    let registry = builtin_registry().unwrap();
    let findings: Vec<String> = registry.audit().iter().map(ToString::to_string).collect();
    assert!(findings.is_empty(), "{findings:#?}");
}

#[test]
fn placeholder_templates_and_anchors() {
    let registry = builtin_registry().unwrap();
    for kind in registry.kinds() {
        assert!(!kind.template.ends_with('.'), "{}", kind.name);
        if kind.template.contains("{0}") {
            assert!(kind.has_placeholder(), "{}", kind.name);
        }
        if kind.module == "naming" {
            assert_eq!(kind.anchor, AnchorKind::File, "{}", kind.name);
        }
    }
}

#[test]
fn lookup_by_name_and_code() {
    let registry = builtin_registry().unwrap();
    let kind = registry.by_name("TooLongTupleUnpackViolation").unwrap();
    assert_eq!(kind.full_code(), "SPY200");
    assert_eq!(registry.by_code(200).map(|k| k.name), Some(kind.name));
    assert!(registry.by_code(999).is_none());
}
