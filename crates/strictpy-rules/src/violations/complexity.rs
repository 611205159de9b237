//! Complexity rules.

use crate::registry::RuleModule;
use crate::violation::{AnchorKind, ViolationKind};

pub const MODULE: RuleModule = RuleModule {
    index: 2,
    name: "complexity",
    docs: r#"
Complexity rules limit how much a single construct does.

Summary:

- complexity.TooLongTupleUnpackViolation

Details:

complexity.TooLongTupleUnpackViolation
    Unpacking into more names than `max_tuple_unpack_length`.
"#,
};

pub static TOO_LONG_TUPLE_UNPACK: ViolationKind = ViolationKind {
    name: "TooLongTupleUnpackViolation",
    module: "complexity",
    code: 200,
    template: "Found too long tuple unpacking: {0}",
    anchor: AnchorKind::Node,
    previous_codes: &[],
    docs: "Applies to assignments, `for` targets and comprehension targets.\n\n\
           versionadded: 0.1.0",
};

pub static KINDS: &[&ViolationKind] = &[&TOO_LONG_TUPLE_UNPACK];
