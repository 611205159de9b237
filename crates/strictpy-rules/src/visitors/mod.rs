//! Builtin visitors.
//!
//! Each submodule exposes a `build` function matching
//! [`VisitorFactory`](crate::visitor::VisitorFactory).

pub mod comments;
pub mod indentation;
pub mod module_name;
pub mod numbers;
pub mod tuple_unpack;
