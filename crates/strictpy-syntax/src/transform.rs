//! Ordered structural transforms applied after parsing.
//!
//! Each transform declares the transforms it depends on. The builder refuses
//! to run a transform whose prerequisites have not been applied yet.

use crate::tree::{NodeId, SyntaxTree};

/// A structural decoration pass over a freshly built tree.
pub trait Transform: Send + Sync {
    /// Stable name, recorded in [`SyntaxTree::applied`].
    fn name(&self) -> &'static str;

    /// Names of transforms that must have run before this one.
    fn requires(&self) -> &'static [&'static str] {
        &[]
    }

    fn apply(&self, tree: &mut SyntaxTree);
}

/// The default pipeline, in the order it must run.
pub fn default_pipeline() -> Vec<Box<dyn Transform>> {
    vec![
        Box::new(LinkParents),
        Box::new(MarkAsync),
        Box::new(MarkScopes),
        Box::new(NormalizeLiterals),
    ]
}

/// Sets `parent` on every node.
pub struct LinkParents;

impl Transform for LinkParents {
    fn name(&self) -> &'static str {
        "link_parents"
    }

    fn apply(&self, tree: &mut SyntaxTree) {
        for index in tree.ids() {
            let id = NodeId(index);
            let children = tree.node(id).children.clone();
            for child in children {
                tree.node_mut(child).parent = Some(id);
            }
        }
    }
}

/// Flags `async def`, `async for` and `async with`.
pub struct MarkAsync;

const ASYNC_CAPABLE: &[&str] = &["function_definition", "for_statement", "with_statement"];

impl Transform for MarkAsync {
    fn name(&self) -> &'static str {
        "mark_async"
    }

    fn apply(&self, tree: &mut SyntaxTree) {
        for index in tree.ids() {
            let id = NodeId(index);
            if !ASYNC_CAPABLE.contains(&tree.node(id).kind) {
                continue;
            }
            let is_async = tree.children(id).any(|c| c.kind == "async");
            tree.node_mut(id).is_async = is_async;
        }
    }
}

/// Records the innermost enclosing function, class, or module of each node.
pub struct MarkScopes;

const SCOPE_KINDS: &[&str] = &["module", "function_definition", "class_definition"];

impl Transform for MarkScopes {
    fn name(&self) -> &'static str {
        "mark_scopes"
    }

    fn requires(&self) -> &'static [&'static str] {
        &["link_parents"]
    }

    fn apply(&self, tree: &mut SyntaxTree) {
        // Pre-order ids guarantee a parent's scope is resolved before its children.
        for index in tree.ids() {
            let id = NodeId(index);
            let scope = tree.parent(id).and_then(|parent| {
                if SCOPE_KINDS.contains(&parent.kind) {
                    Some(parent.id)
                } else {
                    parent.scope
                }
            });
            tree.node_mut(id).scope = scope;
        }
    }
}

/// Renames bare `expression_list` / `pattern_list` nodes to `tuple`.
///
/// `a, b = 1, 2` and `(a, b) = (1, 2)` then look the same to visitors;
/// `original_kind` still tells them apart.
pub struct NormalizeLiterals;

impl Transform for NormalizeLiterals {
    fn name(&self) -> &'static str {
        "normalize_literals"
    }

    fn requires(&self) -> &'static [&'static str] {
        &["link_parents"]
    }

    fn apply(&self, tree: &mut SyntaxTree) {
        for index in tree.ids() {
            let node = tree.node_mut(NodeId(index));
            if matches!(node.kind, "expression_list" | "pattern_list") {
                node.kind = "tuple";
            }
        }
    }
}
