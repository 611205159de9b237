//! Violations produced by visitors.
//!
//! A [`ViolationKind`] is the static description of a rule (code, message
//! template, docs). A [`Violation`] is one detected infraction of that rule,
//! optionally anchored to a syntax node or token.

use serde::Serialize;
use std::fmt;
use strictpy_syntax::{NodeId, Position, SyntaxTree, Token};

/// Prefix of every rendered code, e.g. `SPY200`.
pub const CODE_PREFIX: &str = "SPY";

/// What a violation of a given kind is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AnchorKind {
    /// A syntax tree node.
    Node,
    /// A lexical token.
    Token,
    /// The file as a whole (e.g. its name); carries no anchor.
    File,
}

/// Static description of one rule.
#[derive(Debug)]
pub struct ViolationKind {
    /// Symbolic name, e.g. `TooShortNameViolation`.
    pub name: &'static str,
    /// Rule module the kind belongs to, e.g. `naming`.
    pub module: &'static str,
    /// Globally unique numeric code.
    pub code: u16,
    /// Message template. Dynamic text is substituted for `{0}`.
    pub template: &'static str,
    pub anchor: AnchorKind,
    /// Codes this kind was known by in earlier releases.
    pub previous_codes: &'static [u16],
    pub docs: &'static str,
}

impl ViolationKind {
    /// `module.Name`, as used in module documentation.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.module, self.name)
    }

    /// Code with prefix, e.g. `SPY103`.
    pub fn full_code(&self) -> String {
        format!("{CODE_PREFIX}{:03}", self.code)
    }

    /// Whether the template carries a trailing `: {0}` placeholder.
    pub fn has_placeholder(&self) -> bool {
        self.template.ends_with(": {0}")
    }
}

impl PartialEq for ViolationKind {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ViolationKind {}

impl std::hash::Hash for ViolationKind {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The node or token a violation is attributed to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Anchor {
    Node {
        id: NodeId,
        kind: &'static str,
        position: Position,
    },
    Token {
        index: usize,
        text: String,
        position: Position,
    },
}

impl Anchor {
    pub fn node(tree: &SyntaxTree, id: NodeId) -> Self {
        let node = tree.node(id);
        Anchor::Node {
            id,
            kind: node.kind,
            position: node.start,
        }
    }

    pub fn token(index: usize, token: &Token) -> Self {
        Anchor::Token {
            index,
            text: token.text.clone(),
            position: token.start,
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Anchor::Node { position, .. } | Anchor::Token { position, .. } => *position,
        }
    }
}

/// Substitute `text` for the `{0}` placeholder of a template.
pub fn render_template(template: &str, text: &str) -> String {
    template.replace("{0}", text)
}

/// One detected rule infraction.
#[derive(Clone, Debug, PartialEq)]
pub struct Violation {
    kind: &'static ViolationKind,
    anchor: Option<Anchor>,
    text: Option<String>,
    baseline: Option<String>,
}

impl Violation {
    pub fn new(kind: &'static ViolationKind, anchor: Option<Anchor>) -> Self {
        Self {
            kind,
            anchor,
            text: None,
            baseline: None,
        }
    }

    /// Violation anchored to a tree node.
    pub fn at_node(kind: &'static ViolationKind, tree: &SyntaxTree, id: NodeId) -> Self {
        Self::new(kind, Some(Anchor::node(tree, id)))
    }

    /// Violation anchored to the token at `index` of the stream.
    pub fn at_token(kind: &'static ViolationKind, index: usize, token: &Token) -> Self {
        Self::new(kind, Some(Anchor::token(index, token)))
    }

    /// Violation about the file as a whole.
    pub fn for_file(kind: &'static ViolationKind) -> Self {
        Self::new(kind, None)
    }

    /// Set the text substituted into the template.
    pub fn with_text(mut self, text: impl fmt::Display) -> Self {
        self.text = Some(text.to_string());
        self
    }

    /// Set the configured limit reported after the text.
    pub fn with_baseline(mut self, baseline: impl fmt::Display) -> Self {
        self.baseline = Some(baseline.to_string());
        self
    }

    pub fn kind(&self) -> &'static ViolationKind {
        self.kind
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn baseline(&self) -> Option<&str> {
        self.baseline.as_deref()
    }

    /// `(line, column)` of the anchor, or `(0, 0)` when unanchored.
    pub fn location(&self) -> (u32, u32) {
        self.anchor
            .as_ref()
            .map(|a| {
                let p = a.position();
                (p.line, p.column)
            })
            .unwrap_or((0, 0))
    }

    /// Rendered message: the template with text substituted, then ` > baseline`.
    pub fn message(&self) -> String {
        let mut message = render_template(self.kind.template, self.text.as_deref().unwrap_or(""));
        if let Some(baseline) = &self.baseline {
            message.push_str(" > ");
            message.push_str(baseline);
        }
        message
    }

    pub fn full_code(&self) -> String {
        self.kind.full_code()
    }

    /// `line:column: CODE message`.
    pub fn report_line(&self) -> String {
        self.record().to_string()
    }

    /// Serializable snapshot of this violation.
    pub fn record(&self) -> ViolationRecord {
        let (line, column) = self.location();
        ViolationRecord {
            code: self.full_code(),
            name: self.kind.name,
            line,
            column,
            message: self.message(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.record().fmt(f)
    }
}

/// Flat, serializable view of a violation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ViolationRecord {
    pub code: String,
    pub name: &'static str,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl fmt::Display for ViolationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {} {}", self.line, self.column, self.code, self.message)
    }
}

/// Render violations as a JSON array of records.
pub fn to_json(violations: &[Violation]) -> serde_json::Result<String> {
    let records: Vec<_> = violations.iter().map(Violation::record).collect();
    serde_json::to_string_pretty(&records)
}
