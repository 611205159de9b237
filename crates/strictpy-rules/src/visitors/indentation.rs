//! Multi-line collection layout.
//!
//! A collection either keeps every element on its opening line, or puts the
//! first element on a later line and starts each element on a line after the
//! previous one ended:
//!
//! ```python
//! ok = [1, 2, 3]
//! ok = [
//!     1,
//!     2,
//! ]
//! bad = [1,
//!        2]
//! bad = [
//!     1, 2,
//!     3,
//! ]
//! ```

use crate::settings::Settings;
use crate::violation::Violation;
use crate::violations::consistency::PARAMETERS_INDENTATION;
use crate::visitor::{Visitor, VisitorInput};
use strictpy_syntax::{SourceUnit, SyntaxNode, SyntaxTree};

const BRACKETED: &[&str] = &["list", "set", "dictionary", "argument_list", "parameters"];

pub struct ParametersIndentationVisitor<'a> {
    unit: &'a SourceUnit,
    violations: Vec<Violation>,
}

pub fn build<'a>(_settings: &'a Settings, unit: &'a SourceUnit) -> Box<dyn Visitor + 'a> {
    Box::new(ParametersIndentationVisitor {
        unit,
        violations: Vec::new(),
    })
}

fn is_bracketed(node: &SyntaxNode) -> bool {
    // Bare `a, b` tuples have no brackets to lay out against.
    BRACKETED.contains(&node.kind) || (node.kind == "tuple" && node.original_kind == "tuple")
}

fn is_consistent(tree: &SyntaxTree, node: &SyntaxNode) -> bool {
    let opening = node.start.line;
    let mut elements = tree.named_children(node.id);
    let Some(first) = elements.next() else {
        return true;
    };

    if first.start.line == opening {
        return elements.all(|e| e.start.line == opening);
    }

    let mut previous_end = first.end.line;
    for element in elements {
        if element.start.line <= previous_end {
            return false;
        }
        previous_end = element.end.line;
    }
    true
}

impl Visitor for ParametersIndentationVisitor<'_> {
    fn name(&self) -> &'static str {
        "parameters_indentation"
    }

    fn input(&self) -> VisitorInput {
        VisitorInput::Tree
    }

    fn run(&mut self) {
        let tree = self.unit.tree();
        for id in tree.walk() {
            let node = tree.node(id);
            if is_bracketed(node) && !is_consistent(tree, node) {
                self.violations
                    .push(Violation::at_node(&PARAMETERS_INDENTATION, tree, id));
            }
        }
    }

    fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(source: &str) -> Vec<(u32, u32)> {
        let unit = SourceUnit::parse("module.py", source).unwrap();
        let settings = Settings::default();
        let mut visitor = build(&settings, &unit);
        visitor.run();
        visitor.violations().iter().map(Violation::location).collect()
    }

    #[test]
    fn test_single_line_collections() {
        assert!(check("xy = (1, 2, 3)\n").is_empty());
        assert!(check("xy = {'a': 1, 'b': 2}\n").is_empty());
        assert!(check("call(a, b=2, *rest)\n").is_empty());
        assert!(check("xy = []\n").is_empty());
    }

    #[test]
    fn test_one_element_per_line() {
        assert!(check("xy = [\n    1,\n    2,\n]\n").is_empty());
        assert!(check("def function(\n    first,\n    second,\n):\n    pass\n").is_empty());
        assert!(check("class Klass(\n    Base,\n    Mixin,\n):\n    pass\n").is_empty());
    }

    #[test]
    fn test_hanging_elements() {
        assert_eq!(check("xy = (1,\n      2, 3)\n"), [(1, 5)]);
        assert_eq!(check("xy = [\n    1, 2,\n    3,\n]\n"), [(1, 5)]);
        assert_eq!(check("call(first,\n     second)\n"), [(1, 4)]);
    }

    #[test]
    fn test_multi_line_element_is_one_element() {
        let source = "xy = [\n    call(\n        1,\n    ),\n    2,\n]\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn test_bare_tuples_are_ignored() {
        assert!(check("xy = 1, \\\n    2\n").is_empty());
    }

    #[test]
    fn test_nested_collections_report_separately() {
        let source = "xy = [(1,\n       2), [3,\n    4]]\n";
        assert_eq!(check(source), [(1, 5), (1, 6), (2, 11)]);
    }
}
