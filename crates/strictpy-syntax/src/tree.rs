//! Tree-sitter based Python tree builder.
//!
//! The tree-sitter tree is lowered into an owned arena so that the transform
//! pipeline can decorate nodes (parent links, scopes, async flags) before any
//! visitor sees them.

use crate::error::{BuildError, SyntaxError};
use crate::transform::{self, Transform};
use serde::Serialize;
use tree_sitter::Parser;

/// A location in source text. Lines are 1-indexed, columns are 0-indexed byte offsets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    fn from_point(point: tree_sitter::Point) -> Self {
        Self {
            line: point.row as u32 + 1,
            column: point.column as u32,
        }
    }
}

/// Index of a node inside its [`SyntaxTree`]. Ids follow pre-order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(pub usize);

/// One node of the lowered syntax tree.
#[derive(Debug, Clone)]
pub struct SyntaxNode {
    pub id: NodeId,
    /// Node kind after transforms (e.g. `pattern_list` becomes `tuple`).
    pub kind: &'static str,
    /// Node kind as produced by the grammar.
    pub original_kind: &'static str,
    /// Field name under which the parent holds this node.
    pub field: Option<&'static str>,
    pub named: bool,
    pub start: Position,
    pub end: Position,
    pub start_byte: usize,
    pub end_byte: usize,
    pub children: Vec<NodeId>,
    /// Set by the `link_parents` transform.
    pub parent: Option<NodeId>,
    /// Set by the `mark_async` transform.
    pub is_async: bool,
    /// Innermost enclosing function, class, or module. Set by `mark_scopes`.
    pub scope: Option<NodeId>,
}

/// Owned, decorated Python syntax tree.
#[derive(Debug, Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<SyntaxNode>,
    applied: Vec<&'static str>,
}

impl SyntaxTree {
    /// The `module` node.
    pub fn root(&self) -> &SyntaxNode {
        &self.nodes[0]
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> &SyntaxNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SyntaxNode {
        &mut self.nodes[id.0]
    }

    /// Number of nodes, anonymous tokens included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The parsed source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by a node.
    pub fn text(&self, id: NodeId) -> &str {
        let node = self.node(id);
        &self.source[node.start_byte..node.end_byte]
    }

    /// Parent of a node. Needs `link_parents`.
    pub fn parent(&self, id: NodeId) -> Option<&SyntaxNode> {
        self.node(id).parent.map(|p| self.node(p))
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &SyntaxNode> {
        self.node(id).children.iter().map(|c| self.node(*c))
    }

    /// Named children, skipping comments.
    pub fn named_children(&self, id: NodeId) -> impl Iterator<Item = &SyntaxNode> {
        self.children(id)
            .filter(|c| c.named && c.kind != "comment")
    }

    pub fn child_by_field(&self, id: NodeId, field: &str) -> Option<&SyntaxNode> {
        self.children(id).find(|c| c.field == Some(field))
    }

    /// Ancestors from the direct parent up to the root. Requires `link_parents`.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &SyntaxNode> {
        std::iter::successors(self.parent(id), |n| self.parent(n.id))
    }

    /// All node ids in pre-order.
    pub fn walk(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Names of the transforms applied so far, in order.
    pub fn applied(&self) -> &[&'static str] {
        &self.applied
    }

    pub(crate) fn ids(&self) -> std::ops::Range<usize> {
        0..self.nodes.len()
    }
}

/// Create a parser for the Python grammar.
pub(crate) fn python_parser() -> Result<Parser, SyntaxError> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|err| SyntaxError::Grammar(err.to_string()))?;
    Ok(parser)
}

/// Parse source and report the first error or missing node, if any.
pub(crate) fn parse_checked(source: &str) -> Result<tree_sitter::Tree, SyntaxError> {
    let mut parser = python_parser()?;
    let tree = parser.parse(source, None).ok_or(SyntaxError::NoTree)?;
    if let Some(error) = first_error(&tree) {
        return Err(error);
    }
    Ok(tree)
}

fn first_error(tree: &tree_sitter::Tree) -> Option<SyntaxError> {
    let root = tree.root_node();
    if !root.has_error() {
        return None;
    }
    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if node.is_missing() {
            return Some(SyntaxError::at(
                Position::from_point(node.start_position()),
                format!("missing `{}`", node.kind()),
            ));
        }
        if node.is_error() {
            return Some(SyntaxError::at(
                Position::from_point(node.start_position()),
                "unexpected input",
            ));
        }
        // Only descend into subtrees that contain the error.
        if node.has_error() && cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return Some(SyntaxError::at(
                    Position::from_point(root.start_position()),
                    "unexpected input",
                ));
            }
        }
    }
}

/// Lower a tree-sitter tree into arena nodes, in pre-order.
fn lower(tree: &tree_sitter::Tree) -> Vec<SyntaxNode> {
    let mut nodes: Vec<SyntaxNode> = Vec::new();
    let mut stack: Vec<NodeId> = Vec::new();
    let mut cursor = tree.walk();

    loop {
        let node = cursor.node();
        let id = NodeId(nodes.len());
        nodes.push(SyntaxNode {
            id,
            kind: node.kind(),
            original_kind: node.kind(),
            field: cursor.field_name(),
            named: node.is_named(),
            start: Position::from_point(node.start_position()),
            end: Position::from_point(node.end_position()),
            start_byte: node.start_byte(),
            end_byte: node.end_byte(),
            children: Vec::new(),
            parent: None,
            is_async: false,
            scope: None,
        });
        if let Some(parent) = stack.last() {
            nodes[parent.0].children.push(id);
        }

        if cursor.goto_first_child() {
            stack.push(id);
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return nodes;
            }
            stack.pop();
        }
    }
}

/// Parses source and runs an ordered transform pipeline over the result.
pub struct TreeBuilder {
    transforms: Vec<Box<dyn Transform>>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeBuilder {
    /// Builder with the default pipeline: `link_parents`, `mark_async`,
    /// `mark_scopes`, `normalize_literals`.
    pub fn new() -> Self {
        Self {
            transforms: transform::default_pipeline(),
        }
    }

    /// Builder that only parses.
    pub fn bare() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Append a transform to the end of the pipeline.
    pub fn with(mut self, transform: Box<dyn Transform>) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Names of the configured transforms, in pipeline order.
    pub fn transform_names(&self) -> Vec<&'static str> {
        self.transforms.iter().map(|t| t.name()).collect()
    }

    /// Parse `source` and apply every transform in order.
    pub fn build(&self, source: &str) -> Result<SyntaxTree, BuildError> {
        let parsed = parse_checked(source)?;
        let mut tree = SyntaxTree {
            source: source.to_string(),
            nodes: lower(&parsed),
            applied: Vec::new(),
        };

        for transform in &self.transforms {
            if let Some(missing) = transform
                .requires()
                .iter()
                .copied()
                .find(|req| !tree.applied.contains(req))
            {
                return Err(BuildError::TransformOrder {
                    transform: transform.name(),
                    missing,
                });
            }
            transform.apply(&mut tree);
            tree.applied.push(transform.name());
            tracing::debug!(transform = transform.name(), nodes = tree.len(), "applied transform");
        }

        Ok(tree)
    }
}

/// Parse source with the default pipeline.
pub fn build_tree(source: &str) -> Result<SyntaxTree, BuildError> {
    TreeBuilder::new().build(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowering_is_preorder() {
        let tree = TreeBuilder::bare().build("x = 1\n").unwrap();
        assert_eq!(tree.root().kind, "module");
        let kinds: Vec<_> = tree.walk().map(|id| tree.node(id).kind).collect();
        assert_eq!(
            kinds,
            ["module", "expression_statement", "assignment", "identifier", "=", "integer"]
        );
    }

    #[test]
    fn test_positions_are_one_based_lines() {
        let tree = TreeBuilder::bare().build("x = 1\ny = 2\n").unwrap();
        let second = tree
            .walk()
            .map(|id| tree.node(id))
            .filter(|n| n.kind == "assignment")
            .nth(1)
            .unwrap();
        assert_eq!(second.start, Position::new(2, 0));
        assert_eq!(tree.text(second.id), "y = 2");
    }

    #[test]
    fn test_syntax_error_propagates() {
        let err = TreeBuilder::new().build("def f(:\n    pass\n").unwrap_err();
        let BuildError::Syntax(syntax) = err else {
            panic!("expected syntax error, got {err:?}");
        };
        assert_eq!(syntax.position().map(|p| p.line), Some(1));
    }

    #[test]
    fn test_field_names_are_kept() {
        let tree = build_tree("a = b\n").unwrap();
        let assignment = tree.walk().find(|id| tree.node(*id).kind == "assignment").unwrap();
        assert_eq!(tree.child_by_field(assignment, "left").map(|n| n.kind), Some("identifier"));
        assert_eq!(tree.child_by_field(assignment, "right").map(|n| n.kind), Some("identifier"));
    }
}
