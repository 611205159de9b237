//! Naming rules. Applied to the module file name.

use crate::registry::RuleModule;
use crate::violation::{AnchorKind, ViolationKind};

pub const MODULE: RuleModule = RuleModule {
    index: 1,
    name: "naming",
    docs: r#"
Naming rules apply to module file names.

Summary:

- naming.WrongModuleNameViolation
- naming.WrongModuleMagicNameViolation
- naming.WrongModuleNamePatternViolation
- naming.TooShortNameViolation
- naming.TooLongNameViolation
- naming.ConsecutiveUnderscoresInNameViolation
- naming.UnderscoredNumberNameViolation

Details:

naming.WrongModuleNameViolation
    Module names that say nothing about their content.

naming.WrongModuleMagicNameViolation
    Dunder module names other than `__init__` and `__main__`.

naming.WrongModuleNamePatternViolation
    Module names that are not lowercase snake case.

naming.TooShortNameViolation
    Module names shorter than `min_name_length`.

naming.TooLongNameViolation
    Module names longer than `max_name_length`.

naming.ConsecutiveUnderscoresInNameViolation
    Module names with `__` inside them.

naming.UnderscoredNumberNameViolation
    Module names with a number separated by an underscore, like `file_1`.
"#,
};

pub static WRONG_MODULE_NAME: ViolationKind = ViolationKind {
    name: "WrongModuleNameViolation",
    module: "naming",
    code: 100,
    template: "Found wrong module name",
    anchor: AnchorKind::File,
    previous_codes: &[],
    docs: "Forbids `util`, `utils`, `helpers` and similar module names.\n\nversionadded: 0.1.0",
};

pub static WRONG_MODULE_MAGIC_NAME: ViolationKind = ViolationKind {
    name: "WrongModuleMagicNameViolation",
    module: "naming",
    code: 101,
    template: "Found wrong module magic name",
    anchor: AnchorKind::File,
    previous_codes: &[],
    docs: "Only `__init__` and `__main__` are allowed magic module names.\n\nversionadded: 0.1.0",
};

pub static WRONG_MODULE_NAME_PATTERN: ViolationKind = ViolationKind {
    name: "WrongModuleNamePatternViolation",
    module: "naming",
    code: 102,
    template: "Found incorrect module name pattern",
    anchor: AnchorKind::File,
    previous_codes: &[],
    docs: "Module names must match `^_?[a-z][a-z0-9_]*$`.\n\nversionadded: 0.1.0",
};

pub static TOO_SHORT_NAME: ViolationKind = ViolationKind {
    name: "TooShortNameViolation",
    module: "naming",
    code: 103,
    template: "Found too short name: {0}",
    anchor: AnchorKind::File,
    previous_codes: &[],
    docs: "Leading and trailing underscores do not count.\n\nversionadded: 0.1.0",
};

pub static TOO_LONG_NAME: ViolationKind = ViolationKind {
    name: "TooLongNameViolation",
    module: "naming",
    code: 104,
    template: "Found too long name: {0}",
    anchor: AnchorKind::File,
    previous_codes: &[118],
    docs: "The limit is configured with `max_name_length`.\n\n\
           versionadded: 0.1.0\n\
           versionchanged: 0.2.0 (was 118)",
};

pub static CONSECUTIVE_UNDERSCORES_IN_NAME: ViolationKind = ViolationKind {
    name: "ConsecutiveUnderscoresInNameViolation",
    module: "naming",
    code: 105,
    template: "Found consecutive underscores name: {0}",
    anchor: AnchorKind::File,
    previous_codes: &[],
    docs: "Leading and trailing underscores are not checked.\n\nversionadded: 0.1.0",
};

pub static UNDERSCORED_NUMBER_NAME: ViolationKind = ViolationKind {
    name: "UnderscoredNumberNameViolation",
    module: "naming",
    code: 106,
    template: "Found underscored number name pattern: {0}",
    anchor: AnchorKind::File,
    previous_codes: &[],
    docs: "Write `file1`, not `file_1`.\n\nversionadded: 0.1.0",
};

pub static KINDS: &[&ViolationKind] = &[
    &WRONG_MODULE_NAME,
    &WRONG_MODULE_MAGIC_NAME,
    &WRONG_MODULE_NAME_PATTERN,
    &TOO_SHORT_NAME,
    &TOO_LONG_NAME,
    &CONSECUTIVE_UNDERSCORES_IN_NAME,
    &UNDERSCORED_NUMBER_NAME,
];
