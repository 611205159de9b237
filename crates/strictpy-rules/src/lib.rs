//! Violation model, rule registry and builtin visitors for strictpy.
//!
//! Visitors are built per [`SourceUnit`](strictpy_syntax::SourceUnit) from
//! explicit [`Settings`] and report [`Violation`]s of statically declared
//! [`ViolationKind`]s. Kinds are grouped into rule modules, each owning a
//! band of one hundred codes; see [`registry`].

pub mod builtins;
pub mod registry;
pub mod settings;
pub mod violation;
pub mod violations;
pub mod visitor;
pub mod visitors;

pub use builtins::{BUILTIN_VISITORS, BuiltinVisitor, run_all, run_rule, visitor_factory};
pub use registry::{
    AuditFinding, MAX_MODULE_INDEX, Registry, RegistryError, RuleModule, builtin_registry,
};
pub use settings::{ConfigError, OPTIONS, Settings};
pub use violation::{
    Anchor, AnchorKind, CODE_PREFIX, Violation, ViolationKind, ViolationRecord, render_template,
    to_json,
};
pub use visitor::{Visitor, VisitorFactory, VisitorInput};
