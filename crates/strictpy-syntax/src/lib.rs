//! Python syntax front end for strictpy visitors.
//!
//! # Pipeline
//!
//! ```text
//! template ─> SourceNormalizer ─> TreeBuilder ─> transforms ─┐
//!             (dedent, compile)   (tree-sitter)  (ordered)   ├─> SourceUnit
//!                                 tokenize ──────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use strictpy_syntax::{Normalized, SourceNormalizer, SourceUnit};
//!
//! let Normalized::Ready(source) = SourceNormalizer::new().normalize("
//!     xy = (1,
//!           2, 3)
//! ")? else { return Ok(()) };
//! let unit = SourceUnit::parse("module.py", &source)?;
//! assert_eq!(unit.tree().root().kind, "module");
//! ```

pub mod error;
pub mod source;
pub mod tokens;
pub mod transform;
pub mod tree;
pub mod unit;

pub use error::{BuildError, SyntaxError};
pub use source::{
    GrammarQuirk, HostGrammar, Normalized, PYTHON_GRAMMAR_VERSION, SourceNormalizer, dedent,
};
pub use tokens::{Token, TokenKind, tokenize};
pub use transform::{LinkParents, MarkAsync, MarkScopes, NormalizeLiterals, Transform};
pub use tree::{NodeId, Position, SyntaxNode, SyntaxTree, TreeBuilder, build_tree};
pub use unit::SourceUnit;
