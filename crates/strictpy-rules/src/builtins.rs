//! The builtin visitor set.

use crate::settings::Settings;
use crate::violation::Violation;
use crate::visitor::VisitorFactory;
use crate::visitors::{comments, indentation, module_name, numbers, tuple_unpack};
use strictpy_syntax::SourceUnit;

/// A builtin visitor and the name it is selected by.
#[derive(Clone, Copy)]
pub struct BuiltinVisitor {
    pub name: &'static str,
    pub factory: VisitorFactory,
}

pub const BUILTIN_VISITORS: &[BuiltinVisitor] = &[
    BuiltinVisitor {
        name: "module_name",
        factory: module_name::build,
    },
    BuiltinVisitor {
        name: "parameters_indentation",
        factory: indentation::build,
    },
    BuiltinVisitor {
        name: "tuple_unpack",
        factory: tuple_unpack::build,
    },
    BuiltinVisitor {
        name: "number_tokens",
        factory: numbers::build,
    },
    BuiltinVisitor {
        name: "comment_tokens",
        factory: comments::build,
    },
];

pub fn visitor_factory(name: &str) -> Option<VisitorFactory> {
    BUILTIN_VISITORS
        .iter()
        .find(|v| v.name == name)
        .map(|v| v.factory)
}

/// Run every builtin visitor, returning violations sorted by location.
///
/// Violations at the same location keep visitor order.
pub fn run_all(settings: &Settings, unit: &SourceUnit) -> Vec<Violation> {
    let mut violations = Vec::new();
    for builtin in BUILTIN_VISITORS {
        let mut visitor = (builtin.factory)(settings, unit);
        visitor.run();
        tracing::debug!(
            visitor = builtin.name,
            input = ?visitor.input(),
            file = %unit.filename().display(),
            found = visitor.violations().len(),
            "ran visitor"
        );
        violations.extend_from_slice(visitor.violations());
    }
    violations.sort_by_key(Violation::location);
    violations
}

/// Run one builtin visitor by name. Unknown names yield `None`.
pub fn run_rule(name: &str, settings: &Settings, unit: &SourceUnit) -> Option<Vec<Violation>> {
    let factory = visitor_factory(name)?;
    let mut visitor = factory(settings, unit);
    visitor.run();
    Some(visitor.violations().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match_visitors() {
        let unit = SourceUnit::parse("module.py", "x = 1\n").unwrap();
        let settings = Settings::default();
        for builtin in BUILTIN_VISITORS {
            let visitor = (builtin.factory)(&settings, &unit);
            assert_eq!(visitor.name(), builtin.name);
        }
    }

    #[test]
    fn test_inputs() {
        use crate::visitor::VisitorInput;

        let unit = SourceUnit::parse("module.py", "x = 1\n").unwrap();
        let settings = Settings::default();
        let inputs: Vec<_> = BUILTIN_VISITORS
            .iter()
            .map(|b| (b.name, (b.factory)(&settings, &unit).input()))
            .collect();
        assert_eq!(
            inputs,
            [
                ("module_name", VisitorInput::Filename),
                ("parameters_indentation", VisitorInput::Tree),
                ("tuple_unpack", VisitorInput::Tree),
                ("number_tokens", VisitorInput::Tokens),
                ("comment_tokens", VisitorInput::Tokens),
            ]
        );
    }

    #[test]
    fn test_run_rule_unknown() {
        let unit = SourceUnit::parse("module.py", "x = 1\n").unwrap();
        assert!(run_rule("nope", &Settings::default(), &unit).is_none());
    }

    #[test]
    fn test_run_all_sorts_by_location() {
        let source = "xy = (1.,\n      2)\na, b, c, d, e = xy  #\n";
        let unit = SourceUnit::parse("m.py", source).unwrap();
        let codes: Vec<_> = run_all(&Settings::default(), &unit)
            .iter()
            .map(|v| (v.location(), v.full_code()))
            .collect();
        assert_eq!(
            codes,
            [
                ((0, 0), "SPY103".to_string()),
                ((1, 5), "SPY300".to_string()),
                ((1, 6), "SPY301".to_string()),
                ((3, 0), "SPY200".to_string()),
                ((3, 20), "SPY304".to_string()),
            ]
        );
    }
}
