//! Registry of rule modules and the violation kinds they own.
//!
//! Every module owns a code band: module `i` owns `[i*100, i*100 + 99]`.
//! Registration rejects duplicate and out-of-band codes immediately; the
//! softer documentation and numbering conventions are checked by
//! [`Registry::audit`].

use crate::violation::ViolationKind;
use crate::violations;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use thiserror::Error;

/// A named group of violation kinds sharing a code band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleModule {
    pub index: u16,
    pub name: &'static str,
    /// Module documentation. Mentions each kind's qualified name exactly
    /// twice: once in the summary, once in the details.
    pub docs: &'static str,
}

/// Highest module index whose band still fits a `u16` code.
pub const MAX_MODULE_INDEX: u16 = (u16::MAX - 99) / 100;

impl RuleModule {
    /// Codes owned by the module. Saturates above [`MAX_MODULE_INDEX`],
    /// which [`Registry::register_module`] rejects.
    pub fn band(&self) -> RangeInclusive<u16> {
        let base = self.index.saturating_mul(100);
        base..=base.saturating_add(99)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("code {code} of {name} is already used by {existing}")]
    DuplicateCode {
        code: u16,
        name: &'static str,
        existing: &'static str,
    },
    #[error("code {code} of {name} is outside the band {start}..={end} of module {module}")]
    OutOfBand {
        code: u16,
        name: &'static str,
        module: &'static str,
        start: u16,
        end: u16,
    },
    #[error("{name} belongs to unregistered module {module}")]
    UnknownModule {
        name: &'static str,
        module: &'static str,
    },
    #[error("module {name} (index {index}) is already registered")]
    DuplicateModule { name: &'static str, index: u16 },
    #[error("module {name} has index {index}, above the highest band index {max}")]
    IndexOutOfRange {
        name: &'static str,
        index: u16,
        max: u16,
    },
}

/// A convention violated by the registered kinds.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditFinding {
    #[error("module {module} starts at {lowest}, expected {expected}")]
    BandStart {
        module: &'static str,
        lowest: u16,
        expected: u16,
    },
    #[error("module {module} skips a single code between {before} and {after}")]
    SingleGap {
        module: &'static str,
        before: u16,
        after: u16,
    },
    #[error("module docs mention {qualified} {count} times, expected 2")]
    DocMentions { qualified: String, count: usize },
    #[error("{name} docs carry {count} versionadded markers, expected 1")]
    VersionAdded { name: &'static str, count: usize },
    #[error("{name} docs carry {count} versionchanged markers, expected {expected}")]
    VersionChanged {
        name: &'static str,
        count: usize,
        expected: usize,
    },
    #[error("{name} message template ends with a period")]
    TrailingPeriod { name: &'static str },
}

/// Rule modules and violation kinds, in registration order.
#[derive(Debug, Default)]
pub struct Registry {
    modules: Vec<RuleModule>,
    kinds: Vec<&'static ViolationKind>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_module(&mut self, module: RuleModule) -> Result<(), RegistryError> {
        if module.index > MAX_MODULE_INDEX {
            return Err(RegistryError::IndexOutOfRange {
                name: module.name,
                index: module.index,
                max: MAX_MODULE_INDEX,
            });
        }
        if self
            .modules
            .iter()
            .any(|m| m.name == module.name || m.index == module.index)
        {
            return Err(RegistryError::DuplicateModule {
                name: module.name,
                index: module.index,
            });
        }
        self.modules.push(module);
        Ok(())
    }

    /// Register a kind under its module.
    pub fn register(&mut self, kind: &'static ViolationKind) -> Result<(), RegistryError> {
        let module = self
            .module(kind.module)
            .ok_or(RegistryError::UnknownModule {
                name: kind.name,
                module: kind.module,
            })?;

        let band = module.band();
        if !band.contains(&kind.code) {
            return Err(RegistryError::OutOfBand {
                code: kind.code,
                name: kind.name,
                module: module.name,
                start: *band.start(),
                end: *band.end(),
            });
        }

        if let Some(existing) = self.by_code(kind.code) {
            return Err(RegistryError::DuplicateCode {
                code: kind.code,
                name: kind.name,
                existing: existing.name,
            });
        }

        tracing::trace!(code = kind.code, name = kind.name, "registered violation kind");
        self.kinds.push(kind);
        Ok(())
    }

    pub fn modules(&self) -> &[RuleModule] {
        &self.modules
    }

    pub fn module(&self, name: &str) -> Option<&RuleModule> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn kinds(&self) -> &[&'static ViolationKind] {
        &self.kinds
    }

    pub fn kinds_in<'a>(
        &'a self,
        module: &'a str,
    ) -> impl Iterator<Item = &'static ViolationKind> + 'a {
        self.kinds.iter().copied().filter(move |k| k.module == module)
    }

    pub fn by_code(&self, code: u16) -> Option<&'static ViolationKind> {
        self.kinds.iter().copied().find(|k| k.code == code)
    }

    pub fn by_name(&self, name: &str) -> Option<&'static ViolationKind> {
        self.kinds.iter().copied().find(|k| k.name == name)
    }

    /// All codes, sorted.
    pub fn codes(&self) -> Vec<u16> {
        let mut codes: Vec<u16> = self.kinds.iter().map(|k| k.code).collect();
        codes.sort_unstable();
        codes
    }

    /// Check numbering and documentation conventions.
    ///
    /// Returns every finding rather than stopping at the first one.
    pub fn audit(&self) -> Vec<AuditFinding> {
        let mut findings = Vec::new();

        let mut by_module: BTreeMap<u16, (&RuleModule, Vec<u16>)> = BTreeMap::new();
        for module in &self.modules {
            by_module.insert(module.index, (module, Vec::new()));
        }
        for kind in &self.kinds {
            if let Some(module) = self.module(kind.module)
                && let Some((_, codes)) = by_module.get_mut(&module.index)
            {
                codes.push(kind.code);
            }
        }

        for (module, codes) in by_module.values_mut() {
            codes.sort_unstable();
            let expected = *module.band().start();
            if let Some(&lowest) = codes.first()
                && lowest != expected
            {
                findings.push(AuditFinding::BandStart {
                    module: module.name,
                    lowest,
                    expected,
                });
            }
            for pair in codes.windows(2) {
                if pair[1] - pair[0] == 2 {
                    findings.push(AuditFinding::SingleGap {
                        module: module.name,
                        before: pair[0],
                        after: pair[1],
                    });
                }
            }
        }

        for kind in &self.kinds {
            if let Some(module) = self.module(kind.module) {
                let qualified = kind.qualified_name();
                let count = count_mentions(module.docs, &qualified);
                if count != 2 {
                    findings.push(AuditFinding::DocMentions { qualified, count });
                }
            }

            let added = kind.docs.matches("versionadded").count();
            if added != 1 {
                findings.push(AuditFinding::VersionAdded {
                    name: kind.name,
                    count: added,
                });
            }
            let changed = kind.docs.matches("versionchanged").count();
            if changed != kind.previous_codes.len() {
                findings.push(AuditFinding::VersionChanged {
                    name: kind.name,
                    count: changed,
                    expected: kind.previous_codes.len(),
                });
            }

            if kind.template.ends_with('.') {
                findings.push(AuditFinding::TrailingPeriod { name: kind.name });
            }
        }

        findings
    }
}

/// Count whole-identifier mentions of `needle`.
fn count_mentions(haystack: &str, needle: &str) -> usize {
    haystack
        .match_indices(needle)
        .filter(|(at, _)| {
            let next = haystack[at + needle.len()..].chars().next();
            !next.is_some_and(|c| c.is_alphanumeric() || c == '_')
        })
        .count()
}

/// Registry holding every builtin module and kind. A fresh value per call.
pub fn builtin_registry() -> Result<Registry, RegistryError> {
    let mut registry = Registry::new();
    for (module, kinds) in violations::MODULES {
        registry.register_module(*module)?;
        for &kind in *kinds {
            registry.register(kind)?;
        }
    }
    Ok(registry)
}
