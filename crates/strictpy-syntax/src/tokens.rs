//! Python lexical token stream.
//!
//! Mirrors the token kinds of Python's `tokenize` module closely enough for
//! token-walking visitors: physical vs. logical newlines, indentation,
//! comments, and the exact text of numbers and strings.

use crate::error::SyntaxError;
use crate::tree::Position;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Name,
    Number,
    String,
    Op,
    Comment,
    /// End of a logical line.
    Newline,
    /// Line break that does not end a logical line (blank line, inside brackets).
    Nl,
    Indent,
    Dedent,
    EndMarker,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: Position,
    pub end: Position,
}

const OPERATORS: &[&str] = &[
    "**=", "//=", ">>=", "<<=", "...", "**", "//", ">>", "<<", "<=", ">=", "==", "!=", "->",
    "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "@=", ":=", "+", "-", "*", "/", "%", "@",
    "&", "|", "^", "~", "<", ">", "(", ")", "[", "]", "{", "}", ",", ":", ";", ".", "=", "!",
];

const STRING_PREFIXES: &[&str] = &["r", "u", "b", "f", "br", "rb", "fr", "rf"];

/// An unfinished multi-line string carried across physical lines.
struct OpenString {
    start: Position,
    quote: &'static str,
    text: String,
}

struct Lexer {
    tokens: Vec<Token>,
    indents: Vec<u32>,
    depth: usize,
    continued: bool,
    open_string: Option<OpenString>,
}

/// Tokenize Python source.
pub fn tokenize(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut lexer = Lexer {
        tokens: Vec::new(),
        indents: vec![0],
        depth: 0,
        continued: false,
        open_string: None,
    };

    let mut last_line = 0u32;
    for (index, line) in source.split_inclusive('\n').enumerate() {
        last_line = index as u32 + 1;
        lexer.line(last_line, line)?;
    }
    lexer.finish(last_line, source)
}

impl Lexer {
    fn push(&mut self, kind: TokenKind, text: &str, line: u32, start: usize, end: usize) {
        self.tokens.push(Token {
            kind,
            text: text.to_string(),
            start: Position::new(line, start as u32),
            end: Position::new(line, end as u32),
        });
    }

    fn line(&mut self, lnum: u32, line: &str) -> Result<(), SyntaxError> {
        let bytes = line.as_bytes();
        let mut pos = 0;

        if let Some(mut open) = self.open_string.take() {
            match find_closing(bytes, 0, open.quote) {
                Some(end) => {
                    open.text.push_str(&line[..end]);
                    self.tokens.push(Token {
                        kind: TokenKind::String,
                        text: open.text,
                        start: open.start,
                        end: Position::new(lnum, end as u32),
                    });
                    pos = end;
                }
                None => {
                    open.text.push_str(line);
                    self.open_string = Some(open);
                    return Ok(());
                }
            }
        } else if self.depth == 0 && !self.continued {
            let mut column = 0u32;
            while pos < bytes.len() {
                match bytes[pos] {
                    b' ' => column += 1,
                    b'\t' => column = (column / 8 + 1) * 8,
                    b'\x0c' => column = 0,
                    _ => break,
                }
                pos += 1;
            }

            // Blank and comment-only lines do not affect indentation.
            if pos == bytes.len() || matches!(bytes[pos], b'#' | b'\r' | b'\n') {
                if bytes.get(pos) == Some(&b'#') {
                    let end = comment_end(bytes, pos);
                    self.push(TokenKind::Comment, &line[pos..end], lnum, pos, end);
                    pos = end;
                }
                if pos < bytes.len() {
                    self.push(TokenKind::Nl, &line[pos..], lnum, pos, bytes.len());
                }
                return Ok(());
            }

            let current = *self.indents.last().unwrap_or(&0);
            if column > current {
                self.indents.push(column);
                self.push(TokenKind::Indent, &line[..pos], lnum, 0, pos);
            }
            while column < *self.indents.last().unwrap_or(&0) {
                self.indents.pop();
                self.push(TokenKind::Dedent, "", lnum, pos, pos);
            }
            if column != *self.indents.last().unwrap_or(&0) {
                return Err(SyntaxError::at(
                    Position::new(lnum, pos as u32),
                    "unindent does not match any outer indentation level",
                ));
            }
        } else {
            self.continued = false;
        }

        self.scan(lnum, line, pos)
    }

    fn scan(&mut self, lnum: u32, line: &str, mut pos: usize) -> Result<(), SyntaxError> {
        let bytes = line.as_bytes();
        while pos < bytes.len() {
            let byte = bytes[pos];
            match byte {
                b' ' | b'\t' | b'\x0c' => pos += 1,
                b'#' => {
                    let end = comment_end(bytes, pos);
                    self.push(TokenKind::Comment, &line[pos..end], lnum, pos, end);
                    pos = end;
                }
                b'\r' | b'\n' => {
                    let kind = if self.depth > 0 || self.last_ends_line() {
                        TokenKind::Nl
                    } else {
                        TokenKind::Newline
                    };
                    self.push(kind, &line[pos..], lnum, pos, bytes.len());
                    return Ok(());
                }
                b'\\' => {
                    if matches!(bytes.get(pos + 1), Some(b'\n') | Some(b'\r')) {
                        self.continued = true;
                        return Ok(());
                    }
                    return Err(SyntaxError::at(
                        Position::new(lnum, pos as u32),
                        "unexpected character after line continuation character",
                    ));
                }
                b'0'..=b'9' => pos = self.number(lnum, line, pos),
                b'.' if bytes.get(pos + 1).is_some_and(u8::is_ascii_digit) => {
                    pos = self.number(lnum, line, pos)
                }
                b'\'' | b'"' => pos = self.string(lnum, line, pos, pos)?,
                b if b == b'_' || b.is_ascii_alphabetic() || b >= 0x80 => {
                    let end = name_end(bytes, pos);
                    let word = &line[pos..end];
                    if matches!(bytes.get(end), Some(b'\'') | Some(b'"'))
                        && STRING_PREFIXES.contains(&word.to_ascii_lowercase().as_str())
                    {
                        pos = self.string(lnum, line, pos, end)?;
                    } else {
                        self.push(TokenKind::Name, word, lnum, pos, end);
                        pos = end;
                    }
                }
                _ => pos = self.operator(lnum, line, pos)?,
            }
        }
        Ok(())
    }

    /// Whether the previous token already closed the logical line.
    fn last_ends_line(&self) -> bool {
        matches!(
            self.tokens.last().map(|t| t.kind),
            None | Some(TokenKind::Newline) | Some(TokenKind::Nl) | Some(TokenKind::Indent)
                | Some(TokenKind::Dedent)
        )
    }

    fn number(&mut self, lnum: u32, line: &str, start: usize) -> usize {
        let bytes = line.as_bytes();
        let mut pos = start;
        let is_digit = |b: &u8| b.is_ascii_digit() || *b == b'_';

        if bytes[pos] == b'0' && matches!(bytes.get(pos + 1), Some(b'x' | b'X' | b'o' | b'O' | b'b' | b'B')) {
            pos += 2;
            while bytes.get(pos).is_some_and(|b| b.is_ascii_hexdigit() || *b == b'_') {
                pos += 1;
            }
        } else {
            while bytes.get(pos).is_some_and(is_digit) {
                pos += 1;
            }
            if bytes.get(pos) == Some(&b'.') {
                pos += 1;
                while bytes.get(pos).is_some_and(is_digit) {
                    pos += 1;
                }
            }
            if matches!(bytes.get(pos), Some(b'e' | b'E')) {
                let mut exp = pos + 1;
                if matches!(bytes.get(exp), Some(b'+' | b'-')) {
                    exp += 1;
                }
                if bytes.get(exp).is_some_and(u8::is_ascii_digit) {
                    pos = exp;
                    while bytes.get(pos).is_some_and(is_digit) {
                        pos += 1;
                    }
                }
            }
            if matches!(bytes.get(pos), Some(b'j' | b'J')) {
                pos += 1;
            }
        }

        self.push(TokenKind::Number, &line[start..pos], lnum, start, pos);
        pos
    }

    /// Scan a string literal. `start` includes any prefix, `quote_at` is the opening quote.
    fn string(&mut self, lnum: u32, line: &str, start: usize, quote_at: usize) -> Result<usize, SyntaxError> {
        let bytes = line.as_bytes();
        let quote: &'static str = match (bytes[quote_at], line[quote_at..].starts_with("'''"), line[quote_at..].starts_with("\"\"\"")) {
            (_, true, _) => "'''",
            (_, _, true) => "\"\"\"",
            (b'\'', _, _) => "'",
            _ => "\"",
        };
        let body = quote_at + quote.len();

        if let Some(end) = find_closing(bytes, body, quote) {
            self.push(TokenKind::String, &line[start..end], lnum, start, end);
            return Ok(end);
        }

        let continues = quote.len() == 3 || line.trim_end_matches(['\r', '\n']).ends_with('\\');
        if !continues {
            return Err(SyntaxError::at(
                Position::new(lnum, start as u32),
                "unterminated string literal",
            ));
        }
        self.open_string = Some(OpenString {
            start: Position::new(lnum, start as u32),
            quote,
            text: line[start..].to_string(),
        });
        Ok(bytes.len())
    }

    fn operator(&mut self, lnum: u32, line: &str, pos: usize) -> Result<usize, SyntaxError> {
        let Some(op) = OPERATORS.iter().find(|op| line[pos..].starts_with(**op)) else {
            return Err(SyntaxError::at(
                Position::new(lnum, pos as u32),
                format!("invalid character {:?}", line[pos..].chars().next().unwrap_or(' ')),
            ));
        };
        match *op {
            "(" | "[" | "{" => self.depth += 1,
            ")" | "]" | "}" => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        let end = pos + op.len();
        self.push(TokenKind::Op, op, lnum, pos, end);
        Ok(end)
    }

    fn finish(mut self, last_line: u32, source: &str) -> Result<Vec<Token>, SyntaxError> {
        let eof = Position::new(last_line + 1, 0);
        if let Some(open) = &self.open_string {
            return Err(SyntaxError::at(open.start, "EOF in multi-line string"));
        }
        if self.depth > 0 || self.continued {
            return Err(SyntaxError::at(eof, "EOF in multi-line statement"));
        }
        if !source.is_empty() && !source.ends_with('\n') && !self.last_ends_line() {
            let column = source.rsplit('\n').next().map_or(0, str::len) as u32;
            self.tokens.push(Token {
                kind: TokenKind::Newline,
                text: String::new(),
                start: Position::new(last_line, column),
                end: Position::new(last_line, column + 1),
            });
        }
        for _ in 1..self.indents.len() {
            self.tokens.push(Token {
                kind: TokenKind::Dedent,
                text: String::new(),
                start: eof,
                end: eof,
            });
        }
        self.tokens.push(Token {
            kind: TokenKind::EndMarker,
            text: String::new(),
            start: eof,
            end: eof,
        });
        Ok(self.tokens)
    }
}

fn comment_end(bytes: &[u8], pos: usize) -> usize {
    bytes[pos..]
        .iter()
        .position(|b| matches!(b, b'\r' | b'\n'))
        .map_or(bytes.len(), |offset| pos + offset)
}

fn name_end(bytes: &[u8], pos: usize) -> usize {
    bytes[pos..]
        .iter()
        .position(|b| !(*b == b'_' || b.is_ascii_alphanumeric() || *b >= 0x80))
        .map_or(bytes.len(), |offset| pos + offset)
}

/// Index just past the closing `quote`, honoring backslash escapes.
fn find_closing(bytes: &[u8], mut pos: usize, quote: &str) -> Option<usize> {
    let quote = quote.as_bytes();
    while pos < bytes.len() {
        if bytes[pos] == b'\\' {
            pos += 2;
            continue;
        }
        if bytes[pos..].starts_with(quote) {
            return Some(pos + quote.len());
        }
        if quote.len() == 1 && bytes[pos] == b'\n' {
            return None;
        }
        pos += 1;
    }
    None
}
