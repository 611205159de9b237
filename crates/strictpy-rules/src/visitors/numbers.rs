//! Number literal spelling.

use crate::settings::Settings;
use crate::violation::Violation;
use crate::violations::consistency::{BAD_NUMBER_SUFFIX, PARTIAL_FLOAT};
use crate::visitor::{Visitor, VisitorInput};
use strictpy_syntax::{SourceUnit, TokenKind};

const UPPERCASE_PREFIXES: &[&str] = &["0X", "0O", "0B"];

pub struct NumberTokenVisitor<'a> {
    unit: &'a SourceUnit,
    violations: Vec<Violation>,
}

pub fn build<'a>(_settings: &'a Settings, unit: &'a SourceUnit) -> Box<dyn Visitor + 'a> {
    Box::new(NumberTokenVisitor {
        unit,
        violations: Vec::new(),
    })
}

fn has_prefix(text: &str) -> bool {
    let bytes = text.as_bytes();
    bytes.len() > 2 && bytes[0] == b'0' && matches!(bytes[1], b'x' | b'X' | b'o' | b'O' | b'b' | b'B')
}

fn has_bad_suffix(text: &str) -> bool {
    if UPPERCASE_PREFIXES.iter().any(|p| text.starts_with(p)) {
        return true;
    }
    // Hex digits may be uppercase; only exponent and imaginary markers matter.
    !has_prefix(text) && text.contains(['E', 'J'])
}

impl Visitor for NumberTokenVisitor<'_> {
    fn name(&self) -> &'static str {
        "number_tokens"
    }

    fn input(&self) -> VisitorInput {
        VisitorInput::Tokens
    }

    fn run(&mut self) {
        for (index, token) in self.unit.tokens().iter().enumerate() {
            if token.kind != TokenKind::Number {
                continue;
            }
            let text = token.text.as_str();
            if text.starts_with('.') || text.ends_with('.') {
                self.violations
                    .push(Violation::at_token(&PARTIAL_FLOAT, index, token).with_text(text));
            }
            if has_bad_suffix(text) {
                self.violations
                    .push(Violation::at_token(&BAD_NUMBER_SUFFIX, index, token).with_text(text));
            }
        }
    }

    fn violations(&self) -> &[Violation] {
        &self.violations
    }
}
