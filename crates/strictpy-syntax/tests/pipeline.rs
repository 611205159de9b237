//! End-to-end tests: template -> normalizer -> tree + tokens.

use strictpy_syntax::{
    BuildError, Normalized, SourceNormalizer, SourceUnit, TokenKind, TreeBuilder,
};

fn prepare(template: &str) -> String {
    match SourceNormalizer::new().normalize(template) {
        Ok(Normalized::Ready(source)) => source,
        other => panic!("template did not normalize: {other:?}"),
    }
}

#[test]
fn indented_template_becomes_module() {
    let source = prepare(
        "
        def function(
            first,
            second,
        ):
            return first
        ",
    );
    let unit = SourceUnit::parse("module.py", &source).expect("parse failed");

    let tree = unit.tree();
    assert_eq!(tree.root().kind, "module");
    let function = tree
        .walk()
        .map(|id| tree.node(id))
        .find(|n| n.kind == "function_definition")
        .expect("function");
    assert_eq!(function.start.line, 2);
    assert_eq!(function.start.column, 0);

    let parameters = tree.child_by_field(function.id, "parameters").expect("parameters");
    let names: Vec<_> = tree
        .named_children(parameters.id)
        .map(|n| tree.text(n.id))
        .collect();
    assert_eq!(names, ["first", "second"]);
}

#[test]
fn applied_transforms_are_recorded() {
    let unit = SourceUnit::parse("module.py", "x = 1\n").unwrap();
    insta::assert_snapshot!(
        unit.tree().applied().join(","),
        @"link_parents,mark_async,mark_scopes,normalize_literals"
    );
    assert_eq!(unit.tree().applied(), TreeBuilder::new().transform_names());
    assert!(TreeBuilder::bare().transform_names().is_empty());
}

#[test]
fn token_stream_matches_tree_source() {
    let unit = SourceUnit::parse("module.py", "xy = (1,\n      2, 3)\n").unwrap();
    let kinds: Vec<String> = unit
        .tokens()
        .iter()
        .map(|t| format!("{:?}", t.kind))
        .collect();
    insta::assert_snapshot!(
        kinds.join(" "),
        @"Name Op Op Number Op Nl Number Op Number Op Newline EndMarker"
    );
    assert_eq!(unit.source(), "xy = (1,\n      2, 3)\n");
}

#[test]
fn numbers_keep_their_spelling() {
    let unit = SourceUnit::parse("module.py", "x = 0XFF + 1.\n").unwrap();
    let numbers: Vec<_> = unit
        .tokens()
        .iter()
        .filter(|t| t.kind == TokenKind::Number)
        .map(|t| (t.text.as_str(), t.start.column))
        .collect();
    assert_eq!(numbers, [("0XFF", 4), ("1.", 11)]);
}

#[test]
fn parse_errors_are_not_swallowed() {
    let err = SourceUnit::parse("module.py", "def broken(:\n").unwrap_err();
    assert!(matches!(err, BuildError::Syntax(_)), "{err:?}");

    let bare = TreeBuilder::bare().build("class:\n");
    assert!(bare.is_err());
}

#[test]
fn async_template_parses() {
    let source = prepare(
        "
        async def worker(items):
            async with lock:
                async for item in items:
                    yield item
        ",
    );
    let unit = SourceUnit::parse("module.py", &source).unwrap();
    let tree = unit.tree();
    let async_nodes = tree.walk().filter(|id| tree.node(*id).is_async).count();
    assert_eq!(async_nodes, 3);
}
