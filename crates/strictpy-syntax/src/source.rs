//! Turning indented code templates into flat, parseable source.

use crate::error::SyntaxError;
use crate::tree::parse_checked;

/// Version of the Python grammar this crate is built against.
pub const PYTHON_GRAMMAR_VERSION: &str = "0.25";

/// Strip the longest common leading whitespace from every non-blank line.
///
/// Whitespace-only lines become empty and do not take part in the margin.
/// Relative indentation and line endings are preserved.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .reduce(common_prefix)
        .unwrap_or("");

    let mut out = String::with_capacity(text.len());
    for line in text.split_inclusive('\n') {
        let (content, ending) = match line.strip_suffix('\n') {
            Some(rest) => (rest, "\n"),
            None => (line, ""),
        };
        if !content.trim().is_empty() {
            out.push_str(&content[margin.len()..]);
        }
        out.push_str(ending);
    }
    out
}

fn common_prefix<'a>(a: &'a str, b: &str) -> &'a str {
    let len = a
        .bytes()
        .zip(b.bytes())
        .take_while(|(x, y)| x == y)
        .count();
    &a[..len]
}

/// The grammar a normalizer compiles against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostGrammar {
    pub name: String,
    pub version: String,
}

impl HostGrammar {
    /// The bundled tree-sitter Python grammar.
    pub fn python() -> Self {
        Self {
            name: "python".into(),
            version: PYTHON_GRAMMAR_VERSION.into(),
        }
    }
}

/// A grammar version known to reject valid code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarQuirk {
    pub version: String,
    pub reason: String,
}

/// Result of normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Dedented source, compilable when the check is enabled.
    Ready(String),
    /// The source failed to compile under a grammar version with a known quirk.
    Skipped { reason: String },
}

impl Normalized {
    /// The normalized source, or `None` when skipped.
    pub fn into_source(self) -> Option<String> {
        match self {
            Normalized::Ready(source) => Some(source),
            Normalized::Skipped { .. } => None,
        }
    }
}

/// Dedents templates and optionally checks they compile.
#[derive(Debug, Clone)]
pub struct SourceNormalizer {
    host: HostGrammar,
    compile_check: bool,
    quirks: Vec<GrammarQuirk>,
}

impl Default for SourceNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceNormalizer {
    /// Create a normalizer for the bundled grammar, with the compile check on.
    pub fn new() -> Self {
        Self {
            host: HostGrammar::python(),
            compile_check: true,
            quirks: Vec::new(),
        }
    }

    /// Compile against another grammar version.
    pub fn with_host(mut self, host: HostGrammar) -> Self {
        self.host = host;
        self
    }

    /// Skip sources that fail to compile under `version`.
    pub fn with_quirk(mut self, version: impl Into<String>, reason: impl Into<String>) -> Self {
        self.quirks.push(GrammarQuirk {
            version: version.into(),
            reason: reason.into(),
        });
        self
    }

    /// Only dedent.
    pub fn without_compile_check(mut self) -> Self {
        self.compile_check = false;
        self
    }

    /// The grammar sources are compiled against.
    pub fn host(&self) -> &HostGrammar {
        &self.host
    }

    /// Dedent `text` and check that it compiles.
    pub fn normalize(&self, text: &str) -> Result<Normalized, SyntaxError> {
        let source = dedent(text);
        if !self.compile_check {
            return Ok(Normalized::Ready(source));
        }

        match parse_checked(&source) {
            Ok(_) => Ok(Normalized::Ready(source)),
            Err(err) => {
                let Some(quirk) = self.quirks.iter().find(|q| q.version == self.host.version)
                else {
                    return Err(err);
                };
                tracing::warn!(
                    grammar = %self.host.name,
                    version = %self.host.version,
                    error = %err,
                    reason = %quirk.reason,
                    "skipping source rejected by a known grammar quirk"
                );
                Ok(Normalized::Skipped {
                    reason: format!(
                        "{} {}: {} ({err})",
                        self.host.name, self.host.version, quirk.reason
                    ),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedent_strips_common_margin() {
        let text = "\n    def f():\n        return 1\n";
        assert_eq!(dedent(text), "\ndef f():\n    return 1\n");
    }

    #[test]
    fn test_dedent_ignores_blank_lines() {
        let text = "    x = 1\n  \n    y = 2";
        assert_eq!(dedent(text), "x = 1\n\ny = 2");
    }

    #[test]
    fn test_dedent_mixed_margin() {
        let text = "  a\n    b\n";
        assert_eq!(dedent(text), "a\n  b\n");
    }

    #[test]
    fn test_dedent_no_margin() {
        assert_eq!(dedent("a\n  b\n"), "a\n  b\n");
        assert_eq!(dedent(""), "");
    }

    #[test]
    fn test_compile_check_rejects_bad_source() {
        let err = SourceNormalizer::new().normalize("x = (\n").unwrap_err();
        assert!(err.position().is_some(), "{err}");
    }

    #[test]
    fn test_compile_check_can_be_disabled() {
        let normalized = SourceNormalizer::new()
            .without_compile_check()
            .normalize("    x = (\n")
            .unwrap();
        assert_eq!(normalized, Normalized::Ready("x = (\n".into()));
    }

    #[test]
    fn test_quirk_skips_only_matching_version() {
        let matching = SourceNormalizer::new().with_quirk(PYTHON_GRAMMAR_VERSION, "known bug");
        let normalized = matching.normalize("x = (\n").unwrap();
        assert!(matches!(normalized, Normalized::Skipped { ref reason } if reason.contains("known bug")));

        let other = SourceNormalizer::new().with_quirk("0.0.1", "old bug");
        assert!(other.normalize("x = (\n").is_err());
    }

    #[test]
    fn test_quirk_follows_host_version() {
        let host = HostGrammar {
            name: "python".into(),
            version: "9.9".into(),
        };
        let normalizer = SourceNormalizer::new().with_host(host).with_quirk("9.9", "future bug");
        assert_eq!(normalizer.host().version, "9.9");
        assert_eq!(normalizer.normalize("x = (\n").unwrap().into_source(), None);
        assert_eq!(
            SourceNormalizer::new().normalize("  x = 1\n").unwrap().into_source(),
            Some("x = 1\n".to_string())
        );
    }

    #[test]
    fn test_quirk_does_not_affect_valid_source() {
        let normalizer = SourceNormalizer::new().with_quirk(PYTHON_GRAMMAR_VERSION, "known bug");
        assert_eq!(
            normalizer.normalize("  x = 1\n").unwrap(),
            Normalized::Ready("x = 1\n".into())
        );
    }
}
