//! Mutation Session - Orchestrates generation for one baseline and payload
//!
//! A session owns the options and borrows its collaborators. Each call to
//! [`MutationSession::generate`] returns an independent [`Mutants`]
//! iterator with its own dedup ledger: enabled strategies run in their
//! fixed order, every candidate passes the ledger, and only admitted
//! mutants are yielded.

use std::vec;

use serde::{Deserialize, Serialize};

use super::config::MutationOptions;
use super::filters::{
    DebugSink, DefaultValidator, ImmutabilityFilter, NameValidator, PayloadValidator, TracingSink,
};
use super::input::InputSet;
use super::ledger::DedupLedger;
use super::mutation::format::{Formatter, StandardFormatter};
use super::mutation::strategy::MutationStrategy;
use super::mutation::{Candidates, Mutant, MutationEngine};
use super::value::Path;
use crate::errors::MutationError;

/// Treats every field as mutable
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImmutableFields;

impl ImmutabilityFilter for NoImmutableFields {
    fn is_immutable(&self, _path: &Path) -> bool {
        false
    }
}

/// External policy objects consulted during generation
#[derive(Clone, Copy)]
pub struct Collaborators<'c> {
    pub formatter: &'c dyn Formatter,
    pub immutable: &'c dyn ImmutabilityFilter,
    pub names: &'c dyn NameValidator,
    pub payloads: &'c dyn PayloadValidator,
    pub sink: &'c dyn DebugSink,
}

impl Default for Collaborators<'_> {
    fn default() -> Self {
        Self {
            formatter: &StandardFormatter,
            immutable: &NoImmutableFields,
            names: &DefaultValidator,
            payloads: &DefaultValidator,
            sink: &TracingSink,
        }
    }
}

impl std::fmt::Debug for Collaborators<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Reusable generator configuration
#[derive(Debug, Clone)]
pub struct MutationSession<'c> {
    options: MutationOptions,
    with: Collaborators<'c>,
}

impl<'c> MutationSession<'c> {
    /// Create a session with default collaborators
    pub fn new(options: MutationOptions) -> Self {
        Self {
            options,
            with: Collaborators::default(),
        }
    }

    pub fn with_collaborators(mut self, with: Collaborators<'c>) -> Self {
        self.with = with;
        self
    }

    pub fn with_formatter(mut self, formatter: &'c dyn Formatter) -> Self {
        self.with.formatter = formatter;
        self
    }

    pub fn with_immutability_filter(mut self, filter: &'c dyn ImmutabilityFilter) -> Self {
        self.with.immutable = filter;
        self
    }

    pub fn with_name_validator(mut self, names: &'c dyn NameValidator) -> Self {
        self.with.names = names;
        self
    }

    pub fn with_payload_validator(mut self, payloads: &'c dyn PayloadValidator) -> Self {
        self.with.payloads = payloads;
        self
    }

    pub fn with_debug_sink(mut self, sink: &'c dyn DebugSink) -> Self {
        self.with.sink = sink;
        self
    }

    pub fn options(&self) -> &MutationOptions {
        &self.options
    }

    /// Lazily generate mutants of `baseline` for `payload`
    pub fn generate<'s>(&'s self, baseline: &'s InputSet, payload: &'s str) -> Mutants<'s> {
        Mutants::new(MutationEngine::new(
            baseline,
            payload,
            &self.options,
            self.with,
        ))
    }
}

/// Generate mutants with default collaborators
pub fn generate<'a>(
    baseline: &'a InputSet,
    payload: &'a str,
    options: &'a MutationOptions,
) -> Mutants<'a> {
    Mutants::new(MutationEngine::new(
        baseline,
        payload,
        options,
        Collaborators::default(),
    ))
}

/// Counters for one generation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Candidates built by the strategies
    pub candidates: usize,
    /// Candidates admitted by the ledger and yielded
    pub admitted: usize,
    /// Candidates dropped as duplicates
    pub duplicates: usize,
}

/// Lazy sequence of admitted mutants
///
/// Yields `Err` at most once, for a fatal error, and is fused afterwards.
/// Dropping it early is always safe.
pub struct Mutants<'a> {
    engine: MutationEngine<'a>,
    pending: vec::IntoIter<MutationStrategy>,
    current: Option<Candidates<'a>>,
    ledger: DedupLedger,
    stats: GenerationStats,
    finished: bool,
}

impl<'a> Mutants<'a> {
    fn new(engine: MutationEngine<'a>) -> Self {
        let strategies = if engine.baseline().is_empty() {
            tracing::debug!("Baseline has no leaves, nothing to mutate");
            Vec::new()
        } else {
            engine.options().enabled_strategies()
        };

        Self {
            engine,
            pending: strategies.into_iter(),
            current: None,
            ledger: DedupLedger::new(),
            stats: GenerationStats::default(),
            finished: false,
        }
    }

    /// Counters so far
    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            duplicates: self.ledger.rejected(),
            ..self.stats
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        self.current = None;
        let stats = self.stats();
        tracing::info!(
            payload = self.engine.payload(),
            candidates = stats.candidates,
            admitted = stats.admitted,
            duplicates = stats.duplicates,
            "Mutation run finished"
        );
    }
}

impl Iterator for Mutants<'_> {
    type Item = Result<Mutant, MutationError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.finished {
            let Some(candidates) = self.current.as_mut() else {
                match self.pending.next() {
                    Some(strategy) => {
                        tracing::debug!(strategy = %strategy, "Running strategy");
                        self.current = Some(self.engine.candidates(strategy));
                    }
                    None => self.finish(),
                }
                continue;
            };

            match candidates.next() {
                None => self.current = None,
                Some(Err(err)) => {
                    tracing::error!("Mutation run aborted: {}", err);
                    self.finish();
                    return Some(Err(err));
                }
                Some(Ok(mutant)) => {
                    self.stats.candidates += 1;
                    if self.ledger.admit(&mutant.input) {
                        self.stats.admitted += 1;
                        tracing::trace!(mutant = %mutant.describe(), "Mutant admitted");
                        return Some(Ok(mutant));
                    }
                }
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Mutants<'_> {}
