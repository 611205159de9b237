//! Consistency rules: one way to write the same thing.

use crate::registry::RuleModule;
use crate::violation::{AnchorKind, ViolationKind};

pub const MODULE: RuleModule = RuleModule {
    index: 3,
    name: "consistency",
    docs: r#"
Consistency rules pick one spelling out of several equivalent ones.

Summary:

- consistency.ParametersIndentationViolation
- consistency.PartialFloatViolation
- consistency.BadNumberSuffixViolation
- consistency.WrongMagicCommentViolation
- consistency.EmptyCommentViolation

Details:

consistency.ParametersIndentationViolation
    Multi-line collections, calls, and signatures put either all elements on
    the opening line or every element on its own line.

consistency.PartialFloatViolation
    Write `1.0` and `0.5`, not `1.` and `.5`.

consistency.BadNumberSuffixViolation
    Number prefixes and suffixes are lowercase: `0xFF`, `1e5`, `1j`.

consistency.WrongMagicCommentViolation
    A bare `noqa` silences everything; `type:` comments other than
    `type: ignore` are replaced by annotations.

consistency.EmptyCommentViolation
    A lone `#` that does not separate paragraphs of a comment block.
"#,
};

pub static PARAMETERS_INDENTATION: ViolationKind = ViolationKind {
    name: "ParametersIndentationViolation",
    module: "consistency",
    code: 300,
    template: "Found incorrect multi-line parameters",
    anchor: AnchorKind::Node,
    previous_codes: &[],
    docs: "versionadded: 0.1.0",
};

pub static PARTIAL_FLOAT: ViolationKind = ViolationKind {
    name: "PartialFloatViolation",
    module: "consistency",
    code: 301,
    template: "Found partial float: {0}",
    anchor: AnchorKind::Token,
    previous_codes: &[],
    docs: "versionadded: 0.1.0",
};

pub static BAD_NUMBER_SUFFIX: ViolationKind = ViolationKind {
    name: "BadNumberSuffixViolation",
    module: "consistency",
    code: 302,
    template: "Found bad number suffix: {0}",
    anchor: AnchorKind::Token,
    previous_codes: &[],
    docs: "versionadded: 0.1.0",
};

pub static WRONG_MAGIC_COMMENT: ViolationKind = ViolationKind {
    name: "WrongMagicCommentViolation",
    module: "consistency",
    code: 303,
    template: "Found wrong magic comment: {0}",
    anchor: AnchorKind::Token,
    previous_codes: &[],
    docs: "versionadded: 0.1.0",
};

pub static EMPTY_COMMENT: ViolationKind = ViolationKind {
    name: "EmptyCommentViolation",
    module: "consistency",
    code: 304,
    template: "Found empty comment",
    anchor: AnchorKind::Token,
    previous_codes: &[],
    docs: "Empty lines inside a comment block are allowed.\n\nversionadded: 0.1.0",
};

pub static KINDS: &[&ViolationKind] = &[
    &PARAMETERS_INDENTATION,
    &PARTIAL_FLOAT,
    &BAD_NUMBER_SUFFIX,
    &WRONG_MAGIC_COMMENT,
    &EMPTY_COMMENT,
];
