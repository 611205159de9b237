//! Checks on the module file name.

use crate::settings::Settings;
use crate::violation::{Violation, ViolationKind};
use crate::violations::naming::{
    CONSECUTIVE_UNDERSCORES_IN_NAME, TOO_LONG_NAME, TOO_SHORT_NAME, UNDERSCORED_NUMBER_NAME,
    WRONG_MODULE_MAGIC_NAME, WRONG_MODULE_NAME, WRONG_MODULE_NAME_PATTERN,
};
use crate::visitor::{Visitor, VisitorInput};
use regex::Regex;
use std::sync::LazyLock;
use strictpy_syntax::SourceUnit;

const MAGIC_MODULE_NAMES: &[&str] = &["__init__", "__main__"];

static MODULE_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^_?[a-z][a-z0-9_]*$").expect("module name pattern"));

static UNDERSCORED_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]_\d").expect("underscored number pattern"));

pub struct ModuleNameVisitor<'a> {
    settings: &'a Settings,
    unit: &'a SourceUnit,
    violations: Vec<Violation>,
}

pub fn build<'a>(settings: &'a Settings, unit: &'a SourceUnit) -> Box<dyn Visitor + 'a> {
    Box::new(ModuleNameVisitor {
        settings,
        unit,
        violations: Vec::new(),
    })
}

fn is_magic(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

impl ModuleNameVisitor<'_> {
    fn report(&mut self, kind: &'static ViolationKind, stem: &str) {
        let violation = if kind.has_placeholder() {
            Violation::for_file(kind).with_text(stem)
        } else {
            Violation::for_file(kind)
        };
        self.violations.push(violation);
    }

    fn check(&mut self, stem: &str) {
        if self.settings.forbidden_module_names.iter().any(|n| n == stem) {
            self.report(&WRONG_MODULE_NAME, stem);
            return;
        }
        if is_magic(stem) {
            if !MAGIC_MODULE_NAMES.contains(&stem) {
                self.report(&WRONG_MODULE_MAGIC_NAME, stem);
            }
            return;
        }

        let trimmed = stem.trim_matches('_');
        if trimmed.chars().count() < self.settings.min_name_length {
            self.report(&TOO_SHORT_NAME, stem);
        }
        if stem.chars().count() > self.settings.max_name_length {
            self.violations.push(
                Violation::for_file(&TOO_LONG_NAME)
                    .with_text(stem)
                    .with_baseline(self.settings.max_name_length),
            );
        }
        if !MODULE_NAME_PATTERN.is_match(stem) {
            self.report(&WRONG_MODULE_NAME_PATTERN, stem);
        }
        if trimmed.contains("__") {
            self.report(&CONSECUTIVE_UNDERSCORES_IN_NAME, stem);
        }
        if UNDERSCORED_NUMBER.is_match(stem) {
            self.report(&UNDERSCORED_NUMBER_NAME, stem);
        }
    }
}

impl Visitor for ModuleNameVisitor<'_> {
    fn name(&self) -> &'static str {
        "module_name"
    }

    fn input(&self) -> VisitorInput {
        VisitorInput::Filename
    }

    fn run(&mut self) {
        let Some(stem) = self.unit.filename().file_stem() else {
            return;
        };
        let stem = stem.to_string_lossy().into_owned();
        self.check(&stem);
    }

    fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(filename: &str) -> Vec<&'static str> {
        let unit = SourceUnit::parse(filename, "").unwrap();
        let settings = Settings::default();
        let mut visitor = build(&settings, &unit);
        visitor.run();
        visitor.violations().iter().map(|v| v.kind().name).collect()
    }

    #[test]
    fn test_short_names() {
        assert_eq!(names("a.py"), ["TooShortNameViolation"]);
        assert_eq!(names("_a_.py"), ["TooShortNameViolation"]);
        assert!(names("io.py").is_empty());
    }

    #[test]
    fn test_long_names() {
        let stem = "a".repeat(60);
        assert_eq!(names(&format!("{stem}.py")), ["TooLongNameViolation"]);
    }

    #[test]
    fn test_forbidden_and_magic_names() {
        assert_eq!(names("utils.py"), ["WrongModuleNameViolation"]);
        assert_eq!(names("__custom__.py"), ["WrongModuleMagicNameViolation"]);
        assert!(names("__init__.py").is_empty());
        assert!(names("__main__.py").is_empty());
    }

    #[test]
    fn test_pattern_checks() {
        assert_eq!(names("MyModule.py"), ["WrongModuleNamePatternViolation"]);
        assert_eq!(names("some__module.py"), ["ConsecutiveUnderscoresInNameViolation"]);
        assert_eq!(names("file_1.py"), ["UnderscoredNumberNameViolation"]);
        assert!(names("_private.py").is_empty());
        assert!(names("file1.py").is_empty());
    }

    #[test]
    fn test_messages_and_locations() {
        let unit = SourceUnit::parse("a.py", "").unwrap();
        let settings = Settings::default();
        let mut visitor = build(&settings, &unit);
        visitor.run();
        let violation = &visitor.violations()[0];
        assert_eq!(violation.message(), "Found too short name: a");
        assert_eq!(violation.location(), (0, 0));
    }
}
