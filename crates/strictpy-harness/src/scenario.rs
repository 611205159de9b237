//! Parameterized scenarios: templates x substitutions x modes.
//!
//! Every expanded [`Scenario`] is normalized, parsed, visited, and checked on
//! its own, so one failing combination never hides another.

use crate::assertion::{AssertionFailure, check_error_text, check_errors};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use strictpy_rules::{ConfigError, Settings, ViolationKind, VisitorFactory};
use strictpy_syntax::{BuildError, Normalized, SourceNormalizer, SourceUnit, SyntaxError, TreeBuilder};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("template {template:?}: {reason}")]
    Template { template: String, reason: String },
    #[error("source does not compile: {0}")]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Assertion(#[from] AssertionFailure),
}

/// Values substituted into a template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Substitution {
    positional: Vec<String>,
    named: BTreeMap<String, String>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional value, filled into `{0}`, `{1}`, ...
    pub fn arg(mut self, value: impl fmt::Display) -> Self {
        self.positional.push(value.to_string());
        self
    }

    /// Set a named value, filled into `{name}`.
    pub fn named(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.named.insert(name.into(), value.to_string());
        self
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        match key.parse::<usize>() {
            Ok(index) => self.positional.get(index).map(String::as_str),
            Err(_) => self.named.get(key).map(String::as_str),
        }
    }
}

/// Code text with `{0}` / `{name}` placeholders. `{{` and `}}` are literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    text: String,
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn render(&self, values: &Substitution) -> Result<String, ScenarioError> {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();
        while let Some(at) = rest.find(['{', '}']) {
            out.push_str(&rest[..at]);
            let tail = &rest[at..];
            if let Some(after) = tail.strip_prefix("{{") {
                out.push('{');
                rest = after;
            } else if let Some(after) = tail.strip_prefix("}}") {
                out.push('}');
                rest = after;
            } else if tail.starts_with('}') {
                return Err(self.error("unmatched `}`"));
            } else {
                let Some(close) = tail.find('}') else {
                    return Err(self.error("unclosed `{`"));
                };
                let key = &tail[1..close];
                let value = values
                    .lookup(key)
                    .ok_or_else(|| self.error(format!("no value for placeholder `{{{key}}}`")))?;
                out.push_str(value);
                rest = &tail[close + 1..];
            }
        }
        out.push_str(rest);
        Ok(out)
    }

    fn error(&self, reason: impl Into<String>) -> ScenarioError {
        ScenarioError::Template {
            template: self.text.clone(),
            reason: reason.into(),
        }
    }
}

/// How a rendered template is turned into source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Regular,
    /// Statement-leading `def`, `with` and `for` gain an `async` prefix.
    /// Lines inside an open bracket, such as comprehension clauses, are kept.
    Async,
}

const ASYNC_KEYWORDS: &[&str] = &["def", "with", "for"];

fn leads_with_async_keyword(body: &str) -> bool {
    ASYNC_KEYWORDS.iter().any(|kw| {
        body.strip_prefix(kw)
            .is_some_and(|after| after.starts_with([' ', '\t']))
    })
}

/// Bracket depth after `line`, starting from `depth`.
///
/// Skips single-line string literals and comments.
fn bracket_depth(line: &str, mut depth: usize) -> usize {
    let mut quote = None;
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(c),
            (None, '#') => break,
            (None, '(' | '[' | '{') => depth += 1,
            (None, ')' | ']' | '}') => depth = depth.saturating_sub(1),
            (None, _) => {}
        }
    }
    depth
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Regular => "regular",
            Mode::Async => "async",
        }
    }

    pub fn apply(self, source: &str) -> String {
        match self {
            Mode::Regular => source.to_string(),
            Mode::Async => {
                let mut out = String::with_capacity(source.len());
                let mut depth = 0;
                for line in source.split_inclusive('\n') {
                    let body = line.trim_start();
                    if depth == 0 && leads_with_async_keyword(body) {
                        out.push_str(&line[..line.len() - body.len()]);
                        out.push_str("async ");
                        out.push_str(body);
                    } else {
                        out.push_str(line);
                    }
                    depth = bracket_depth(line, depth);
                }
                out
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One concrete combination of the matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub id: String,
    pub mode: Mode,
    pub filename: String,
    /// Rendered, mode-applied text, not yet normalized.
    pub text: String,
}

/// Cross product of templates, substitution sets, and modes.
#[derive(Debug, Clone)]
pub struct ScenarioMatrix {
    templates: Vec<(String, Template)>,
    substitutions: Vec<(String, Substitution)>,
    modes: Vec<Mode>,
    filename: String,
}

impl Default for ScenarioMatrix {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioMatrix {
    pub fn new() -> Self {
        Self {
            templates: Vec::new(),
            substitutions: Vec::new(),
            modes: vec![Mode::Regular],
            filename: "module.py".to_string(),
        }
    }

    pub fn template(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.templates.push((name.into(), Template::new(text)));
        self
    }

    pub fn values(mut self, label: impl Into<String>, values: Substitution) -> Self {
        self.substitutions.push((label.into(), values));
        self
    }

    pub fn modes(mut self, modes: &[Mode]) -> Self {
        self.modes = modes.to_vec();
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    /// Expand into scenarios: templates outermost, then values, then modes.
    ///
    /// Fails on the first combination whose template does not render.
    pub fn expand(&self) -> Result<Vec<Scenario>, ScenarioError> {
        self.expand_each()
            .into_iter()
            .map(|entry| entry.map_err(|(_, error)| error))
            .collect()
    }

    /// Expand every combination on its own, keeping the id of those whose
    /// template does not render.
    pub fn expand_each(&self) -> Vec<Result<Scenario, (String, ScenarioError)>> {
        let empty = [(String::new(), Substitution::new())];
        let substitutions: &[(String, Substitution)] = if self.substitutions.is_empty() {
            &empty
        } else {
            &self.substitutions
        };

        let mut entries = Vec::new();
        for (name, template) in &self.templates {
            for (label, values) in substitutions {
                for &mode in &self.modes {
                    let id = [name.as_str(), label.as_str(), mode.as_str()]
                        .into_iter()
                        .filter(|part| !part.is_empty())
                        .collect::<Vec<_>>()
                        .join("-");
                    entries.push(match template.render(values) {
                        Ok(rendered) => Ok(Scenario {
                            id,
                            mode,
                            filename: self.filename.clone(),
                            text: mode.apply(&rendered),
                        }),
                        Err(error) => Err((id, error)),
                    });
                }
            }
        }
        entries
    }
}

/// Message expectation for the first violation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextExpectation {
    pub text: String,
    pub baseline: Option<String>,
    pub multiple: bool,
}

/// What a scenario's visitor must report.
#[derive(Debug, Clone, Default)]
pub struct Expectation {
    pub kinds: Vec<&'static ViolationKind>,
    pub ignored: Vec<&'static ViolationKind>,
    pub text: Option<TextExpectation>,
}

impl Expectation {
    /// No violations at all.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn kinds(kinds: &[&'static ViolationKind]) -> Self {
        Self {
            kinds: kinds.to_vec(),
            ..Self::default()
        }
    }

    pub fn ignoring(mut self, kinds: &[&'static ViolationKind]) -> Self {
        self.ignored.extend_from_slice(kinds);
        self
    }

    pub fn with_text(mut self, text: impl fmt::Display) -> Self {
        self.text.get_or_insert_with(TextExpectation::default).text = text.to_string();
        self
    }

    pub fn with_baseline(mut self, baseline: impl fmt::Display) -> Self {
        self.text.get_or_insert_with(TextExpectation::default).baseline = Some(baseline.to_string());
        self
    }

    /// Allow more than one violation when checking the text.
    pub fn multiple(mut self) -> Self {
        self.text.get_or_insert_with(TextExpectation::default).multiple = true;
        self
    }
}

#[derive(Debug)]
pub enum Outcome {
    Passed,
    Skipped { reason: String },
    Failed { error: ScenarioError },
}

#[derive(Debug)]
pub struct ScenarioReport {
    pub id: String,
    pub outcome: Outcome,
}

impl ScenarioReport {
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed)
    }
}

/// Per-scenario failures of a run, listed one per line.
#[derive(Debug, Error)]
#[error("{} of {total} scenarios failed:{}", .failures.len(), listing(.failures))]
pub struct RunFailure {
    pub total: usize,
    pub failures: Vec<(String, ScenarioError)>,
}

fn listing(failures: &[(String, ScenarioError)]) -> String {
    failures
        .iter()
        .map(|(id, error)| format!("\n  {id}: {error}"))
        .collect()
}

/// Reports of one run, in scenario order.
#[derive(Debug)]
pub struct RunSummary {
    pub reports: Vec<ScenarioReport>,
}

impl RunSummary {
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.passed()).count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = (&str, &str)> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            Outcome::Skipped { reason } => Some((r.id.as_str(), reason.as_str())),
            _ => None,
        })
    }

    pub fn failed(&self) -> impl Iterator<Item = (&str, &ScenarioError)> {
        self.reports.iter().filter_map(|r| match &r.outcome {
            Outcome::Failed { error } => Some((r.id.as_str(), error)),
            _ => None,
        })
    }

    /// Fail if any scenario failed.
    pub fn into_result(self) -> Result<Self, RunFailure> {
        if self.failed().next().is_none() {
            return Ok(self);
        }
        let total = self.reports.len();
        let failures = self
            .reports
            .into_iter()
            .filter_map(|r| match r.outcome {
                Outcome::Failed { error } => Some((r.id, error)),
                _ => None,
            })
            .collect();
        Err(RunFailure { total, failures })
    }
}

/// Runs scenarios against a visitor factory.
pub struct ScenarioRunner {
    settings: Settings,
    normalizer: SourceNormalizer,
    builder: TreeBuilder,
}

impl Default for ScenarioRunner {
    /// Runner with default settings.
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            normalizer: SourceNormalizer::new(),
            builder: TreeBuilder::new(),
        }
    }
}

impl ScenarioRunner {
    /// Runner with the given settings, rejected here if they are invalid.
    pub fn new(settings: Settings) -> Result<Self, ScenarioError> {
        settings.validate()?;
        Ok(Self {
            settings,
            ..Self::default()
        })
    }

    pub fn with_normalizer(mut self, normalizer: SourceNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn with_builder(mut self, builder: TreeBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run every scenario in order.
    ///
    /// A template that does not render fails only its own scenarios.
    pub fn run(
        &self,
        matrix: &ScenarioMatrix,
        factory: VisitorFactory,
        expectation: &Expectation,
    ) -> RunSummary {
        let reports = matrix
            .expand_each()
            .into_iter()
            .map(|entry| self.report(entry, factory, expectation))
            .collect();
        RunSummary { reports }
    }

    /// Like [`run`](Self::run), spreading scenarios over the rayon pool.
    ///
    /// Each worker parses its own tree and builds its own visitor; reports
    /// keep scenario order.
    pub fn run_parallel(
        &self,
        matrix: &ScenarioMatrix,
        factory: VisitorFactory,
        expectation: &Expectation,
    ) -> RunSummary {
        let reports = matrix
            .expand_each()
            .into_par_iter()
            .map(|entry| self.report(entry, factory, expectation))
            .collect();
        RunSummary { reports }
    }

    fn report(
        &self,
        entry: Result<Scenario, (String, ScenarioError)>,
        factory: VisitorFactory,
        expectation: &Expectation,
    ) -> ScenarioReport {
        let (id, outcome) = match entry {
            Ok(scenario) => {
                let outcome = match self.run_one(&scenario, factory, expectation) {
                    Ok(None) => Outcome::Passed,
                    Ok(Some(reason)) => Outcome::Skipped { reason },
                    Err(error) => Outcome::Failed { error },
                };
                (scenario.id, outcome)
            }
            Err((id, error)) => (id, Outcome::Failed { error }),
        };
        tracing::debug!(scenario = %id, outcome = ?outcome, "scenario finished");
        ScenarioReport { id, outcome }
    }

    /// Returns the skip reason when the host grammar cannot compile the source.
    pub fn run_one(
        &self,
        scenario: &Scenario,
        factory: VisitorFactory,
        expectation: &Expectation,
    ) -> Result<Option<String>, ScenarioError> {
        let source = match self.normalizer.normalize(&scenario.text)? {
            Normalized::Ready(source) => source,
            Normalized::Skipped { reason } => return Ok(Some(reason)),
        };
        let unit = SourceUnit::parse_with(&self.builder, scenario.filename.as_str(), &source)?;

        let mut visitor = factory(&self.settings, &unit);
        tracing::trace!(
            scenario = %scenario.id,
            visitor = visitor.name(),
            input = ?visitor.input(),
            "running visitor"
        );
        visitor.run();

        check_errors(visitor.as_ref(), &expectation.kinds, &expectation.ignored)?;
        if let Some(text) = &expectation.text {
            check_error_text(
                visitor.as_ref(),
                &text.text,
                text.baseline.as_deref(),
                text.multiple,
            )?;
        }
        Ok(None)
    }
}
