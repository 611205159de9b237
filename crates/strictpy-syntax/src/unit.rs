//! The bundle every visitor receives: filename, tree, and tokens.

use crate::error::BuildError;
use crate::tokens::{Token, tokenize};
use crate::tree::{SyntaxTree, TreeBuilder};
use std::path::{Path, PathBuf};

/// One parsed Python module.
#[derive(Debug, Clone)]
pub struct SourceUnit {
    filename: PathBuf,
    tree: SyntaxTree,
    tokens: Vec<Token>,
}

impl SourceUnit {
    /// Parse with the default transform pipeline.
    pub fn parse(filename: impl Into<PathBuf>, source: &str) -> Result<Self, BuildError> {
        Self::parse_with(&TreeBuilder::new(), filename, source)
    }

    pub fn parse_with(
        builder: &TreeBuilder,
        filename: impl Into<PathBuf>,
        source: &str,
    ) -> Result<Self, BuildError> {
        let tree = builder.build(source)?;
        let tokens = tokenize(source)?;
        Ok(Self {
            filename: filename.into(),
            tree,
            tokens,
        })
    }

    pub fn filename(&self) -> &Path {
        &self.filename
    }

    pub fn source(&self) -> &str {
        self.tree.source()
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }
}
