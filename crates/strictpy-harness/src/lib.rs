//! Verification harness for strictpy visitors.
//!
//! A test describes code through [`Template`]s, expands them over substitution
//! values and [`Mode`]s with a [`ScenarioMatrix`], and lets a
//! [`ScenarioRunner`] parse each scenario, run a fresh visitor over it, and
//! compare the violations with an [`Expectation`]:
//!
//! ```ignore
//! use strictpy_harness::{Expectation, Mode, ScenarioMatrix, ScenarioRunner};
//! use strictpy_rules::{violations::complexity, visitors::tuple_unpack};
//!
//! let matrix = ScenarioMatrix::new()
//!     .template("loop", "for a, b, c, d, e in items:\n    pass\n")
//!     .modes(&[Mode::Regular, Mode::Async]);
//! let expectation = Expectation::kinds(&[&complexity::TOO_LONG_TUPLE_UNPACK])
//!     .with_text(5)
//!     .with_baseline(4);
//! ScenarioRunner::default()
//!     .run(&matrix, tuple_unpack::build, &expectation)
//!     .into_result()?;
//! ```
//!
//! The lower-level [`assert_errors`] and [`assert_error_text`] work on any
//! [`Visitor`](strictpy_rules::Visitor) directly.

pub mod assertion;
pub mod audit;
pub mod logging;
pub mod scenario;

pub use assertion::{
    AssertionFailure, assert_error_text, assert_errors, check_error_text, check_errors,
};
pub use audit::{assert_registry_consistent, check_registry};
pub use scenario::{
    Expectation, Mode, Outcome, RunFailure, RunSummary, Scenario, ScenarioError, ScenarioMatrix,
    ScenarioReport, ScenarioRunner, Substitution, Template, TextExpectation,
};
