//! The capability every checker implements.

use crate::settings::Settings;
use crate::violation::Violation;
use strictpy_syntax::SourceUnit;

/// Which part of a [`SourceUnit`] a visitor walks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorInput {
    Tree,
    Tokens,
    Filename,
}

/// A checker bound to one source unit.
///
/// Violations are collected in detection order. `run` is meant to be called
/// once; construct a fresh visitor for every unit.
pub trait Visitor {
    fn name(&self) -> &'static str;

    fn input(&self) -> VisitorInput;

    /// Walk the input and record violations.
    fn run(&mut self);

    fn violations(&self) -> &[Violation];
}

/// Builds a visitor over one unit.
pub type VisitorFactory = for<'a> fn(&'a Settings, &'a SourceUnit) -> Box<dyn Visitor + 'a>;
