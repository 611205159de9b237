//! Builtin violation kinds, grouped by rule module.
//!
//! | index | module        | band    |
//! |-------|---------------|---------|
//! | 1     | `naming`      | 100-199 |
//! | 2     | `complexity`  | 200-299 |
//! | 3     | `consistency` | 300-399 |

use crate::registry::RuleModule;
use crate::violation::ViolationKind;

pub mod complexity;
pub mod consistency;
pub mod naming;

/// Every builtin module with its kinds, in registration order.
pub static MODULES: &[(RuleModule, &[&ViolationKind])] = &[
    (naming::MODULE, naming::KINDS),
    (complexity::MODULE, complexity::KINDS),
    (consistency::MODULE, consistency::KINDS),
];
