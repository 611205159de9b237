//! Magic and empty comments.

use crate::settings::Settings;
use crate::violation::Violation;
use crate::violations::consistency::{EMPTY_COMMENT, WRONG_MAGIC_COMMENT};
use crate::visitor::{Visitor, VisitorInput};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use strictpy_syntax::{SourceUnit, Token, TokenKind};

static BARE_NOQA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^#\s*noqa\s*:?\s*$").expect("noqa pattern"));

static TYPE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*type:\s*(.*)$").expect("type comment pattern"));

pub struct CommentTokenVisitor<'a> {
    unit: &'a SourceUnit,
    violations: Vec<Violation>,
}

pub fn build<'a>(_settings: &'a Settings, unit: &'a SourceUnit) -> Box<dyn Visitor + 'a> {
    Box::new(CommentTokenVisitor {
        unit,
        violations: Vec::new(),
    })
}

fn is_wrong_magic(text: &str) -> bool {
    if BARE_NOQA.is_match(text) {
        return true;
    }
    TYPE_COMMENT
        .captures(text)
        .and_then(|c| c.get(1))
        .is_some_and(|rest| !rest.as_str().starts_with("ignore"))
}

impl Visitor for CommentTokenVisitor<'_> {
    fn name(&self) -> &'static str {
        "comment_tokens"
    }

    fn input(&self) -> VisitorInput {
        VisitorInput::Tokens
    }

    fn run(&mut self) {
        let tokens = self.unit.tokens();
        let comments: Vec<(usize, &Token)> = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.kind == TokenKind::Comment)
            .collect();
        // Lines holding a comment with some text.
        let worded: HashSet<u32> = comments
            .iter()
            .filter(|(_, t)| t.text.trim() != "#")
            .map(|(_, t)| t.start.line)
            .collect();

        for &(index, token) in &comments {
            let text = token.text.trim_end();
            if text == "#" {
                let line = token.start.line;
                let inside_block = worded.contains(&(line - 1)) && worded.contains(&(line + 1));
                if !inside_block {
                    self.violations
                        .push(Violation::at_token(&EMPTY_COMMENT, index, token));
                }
            } else if is_wrong_magic(text) {
                self.violations
                    .push(Violation::at_token(&WRONG_MAGIC_COMMENT, index, token).with_text(text));
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

    fn messages(source: &str) -> Vec<String> {
        let unit = SourceUnit::parse("module.py", source).unwrap();
        let settings = Settings::default();
        let mut visitor = build(&settings, &unit);
        visitor.run();
        visitor.violations().iter().map(Violation::report_line).collect()
    }

    #[test]
    fn test_magic_comments() {
        assert_eq!(
            messages("x = 1  # noqa\ny = 2  # type: int\n"),
            [
                "1:7: SPY303 Found wrong magic comment: # noqa",
                "2:7: SPY303 Found wrong magic comment: # type: int",
            ]
        );
        assert!(messages("x = 1  # noqa: SPY301\ny = call()  # type: ignore\n").is_empty());
    }

    #[test]
    fn test_empty_comments() {
        assert_eq!(messages("#\nx = 1\n"), ["1:0: SPY304 Found empty comment"]);
        assert!(messages("# first paragraph\n#\n# second paragraph\nx = 1\n").is_empty());
        assert_eq!(
            messages("# only above\n#\nx = 1\n"),
            ["2:0: SPY304 Found empty comment"]
        );
    }

    #[test]
    fn test_comment_text_inside_strings_is_ignored() {
        assert!(messages("x = '# noqa'\n").is_empty());
    }
}
