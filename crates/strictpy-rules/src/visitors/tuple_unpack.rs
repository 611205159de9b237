//! Limits how many names one unpacking target may bind.

use crate::settings::Settings;
use crate::violation::Violation;
use crate::violations::complexity::TOO_LONG_TUPLE_UNPACK;
use crate::visitor::{Visitor, VisitorInput};
use strictpy_syntax::{SourceUnit, SyntaxNode, SyntaxTree};

/// Nodes whose `left` field is an unpacking target.
const TARGET_OWNERS: &[&str] = &["assignment", "for_statement", "for_in_clause"];

const UNPACKING: &[&str] = &["tuple", "tuple_pattern", "list_pattern"];

pub struct TupleUnpackVisitor<'a> {
    unit: &'a SourceUnit,
    max_length: usize,
    violations: Vec<Violation>,
}

pub fn build<'a>(settings: &'a Settings, unit: &'a SourceUnit) -> Box<dyn Visitor + 'a> {
    Box::new(TupleUnpackVisitor {
        unit,
        max_length: settings.max_tuple_unpack_length,
        violations: Vec::new(),
    })
}

/// The unpacking target owned by `node`, if any.
fn unpacking_target<'t>(tree: &'t SyntaxTree, node: &SyntaxNode) -> Option<&'t SyntaxNode> {
    if TARGET_OWNERS.contains(&node.kind) {
        return tree
            .child_by_field(node.id, "left")
            .filter(|left| UNPACKING.contains(&left.kind));
    }
    // `with ... as (a, b)`
    if node.kind == "as_pattern" && tree.parent(node.id).is_some_and(|p| p.kind == "with_item") {
        let alias = tree.child_by_field(node.id, "alias")?;
        if UNPACKING.contains(&alias.kind) {
            return Some(alias);
        }
        let mut named = tree.named_children(alias.id);
        let only = named.next()?;
        return (named.next().is_none() && UNPACKING.contains(&only.kind)).then_some(only);
    }
    None
}

impl Visitor for TupleUnpackVisitor<'_> {
    fn name(&self) -> &'static str {
        "tuple_unpack"
    }

    fn input(&self) -> VisitorInput {
        VisitorInput::Tree
    }

    fn run(&mut self) {
        let tree = self.unit.tree();
        for id in tree.walk() {
            let Some(target) = unpacking_target(tree, tree.node(id)) else {
                continue;
            };
            let length = tree.named_children(target.id).count();
            if length > self.max_length {
                self.violations.push(
                    Violation::at_node(&TOO_LONG_TUPLE_UNPACK, tree, target.id)
                        .with_text(length)
                        .with_baseline(self.max_length),
                );
            }
        }
    }

    fn violations(&self) -> &[Violation] {
        &self.violations
    }
}
