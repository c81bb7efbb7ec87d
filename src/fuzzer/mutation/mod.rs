//! Mutation Module - Candidate generation for structured inputs
//!
//! Provides the three generation strategies (value substitution,
//! extra-parameter injection, parameter-name fuzzing) and the `Mutant`
//! value they produce. Candidates are built lazily from a fresh copy of
//! the baseline; deduplication happens in the session.

pub mod format;
pub mod strategy;

use std::iter;

use serde::Serialize;

use self::format::FormatId;
use self::strategy::MutationStrategy;
use super::config::MutationOptions;
use super::input::InputSet;
use super::session::Collaborators;
use super::value::{Path, Scalar, StructuredValue};
use crate::errors::MutationError;

/// One generated variant of an input set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mutant {
    /// Resulting input set
    pub input: InputSet,
    /// Leaf that was written; `None` for the top-level merges of extra
    /// parameter and name fuzzing, which name their slot in `parameter`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Path>,
    /// Name of the targeted parameter, when it has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
    /// Payload this mutant was generated from
    pub payload: String,
    /// Format variant applied, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<FormatId>,
    /// Value actually written into the tree
    pub injected: String,
    /// Strategy that produced this mutant
    pub strategy: MutationStrategy,
}

impl Mutant {
    /// Seed value; the originating payload for every strategy
    pub fn seed(&self) -> &str {
        &self.payload
    }

    /// Value found at the mutated path
    pub fn mutated_value(&self) -> Option<&StructuredValue> {
        self.path
            .as_ref()
            .and_then(|path| self.input.get(path).ok())
    }

    /// One-line description for reports
    pub fn describe(&self) -> String {
        let target = match (&self.path, &self.parameter) {
            (Some(path), _) => format!("\"{}\"", path),
            (None, Some(name)) => format!("\"{}\"", name),
            (None, None) => "body".to_string(),
        };
        match &self.format {
            Some(format) => format!("{} of {} with format {}", self.strategy, target, format),
            None => format!("{} of {}", self.strategy, target),
        }
    }
}

/// Lazy stream of candidates from one strategy
pub type Candidates<'a> = Box<dyn Iterator<Item = Result<Mutant, MutationError>> + 'a>;

/// Builds candidates for one baseline and one payload
#[derive(Clone, Copy)]
pub struct MutationEngine<'a> {
    baseline: &'a InputSet,
    payload: &'a str,
    options: &'a MutationOptions,
    with: Collaborators<'a>,
}

impl<'a> MutationEngine<'a> {
    pub fn new(
        baseline: &'a InputSet,
        payload: &'a str,
        options: &'a MutationOptions,
        with: Collaborators<'a>,
    ) -> Self {
        Self {
            baseline,
            payload,
            options,
            with,
        }
    }

    pub fn baseline(&self) -> &'a InputSet {
        self.baseline
    }

    pub fn payload(&self) -> &'a str {
        self.payload
    }

    pub fn options(&self) -> &'a MutationOptions {
        self.options
    }

    /// Candidates of a single strategy
    ///
    /// Validity checks run when this is called, not when the engine is built,
    /// so a consumer that stops early never triggers later diagnostics.
    pub fn candidates(self, strategy: MutationStrategy) -> Candidates<'a> {
        match strategy {
            MutationStrategy::Value => self.value_mutations(),
            MutationStrategy::Extra => self.extra_parameters(),
            MutationStrategy::Name => self.name_fuzzing(),
        }
    }

    // =========================================================================
    // Value mutation
    // =========================================================================

    fn value_mutations(self) -> Candidates<'a> {
        Box::new(
            self.baseline
                .leaves()
                .flat_map(move |(path, leaf)| self.mutate_leaf(path, leaf)),
        )
    }

    fn mutate_leaf(
        self,
        path: Path,
        leaf: &'a Scalar,
    ) -> impl Iterator<Item = Result<Mutant, MutationError>> + 'a {
        let allowed = self.leaf_allowed(&path, leaf);
        let original = leaf.as_text();

        self.options
            .format_variants()
            .into_iter()
            .filter(move |_| allowed)
            .map(move |format| self.write_leaf(&path, &original, format))
    }

    fn leaf_allowed(&self, path: &Path, leaf: &Scalar) -> bool {
        if self.with.immutable.is_immutable(path) {
            tracing::trace!(path = %path, "Skipping immutable field");
            return false;
        }
        if !self.with.payloads.is_valid_value_payload(self.payload, leaf) {
            let reason = format!("not a valid value for \"{}\"", path);
            self.skip(MutationError::invalid_payload(MutationStrategy::Value, reason));
            return false;
        }
        true
    }

    fn write_leaf(
        &self,
        path: &Path,
        original: &str,
        format: &FormatId,
    ) -> Result<Mutant, MutationError> {
        let injected = self.with.formatter.format(self.payload, format, original);
        let input = self
            .baseline
            .set(path, StructuredValue::string(injected.clone()))?;

        Ok(Mutant {
            input,
            path: Some(path.clone()),
            parameter: path.leaf_name().map(str::to_string),
            payload: self.payload.to_string(),
            format: Some(format.clone()),
            injected,
            strategy: MutationStrategy::Value,
        })
    }

    // =========================================================================
    // Extra-parameter injection
    // =========================================================================

    fn extra_parameters(self) -> Candidates<'a> {
        let name = self.options.extra_param_name.as_str();

        if !self.with.names.is_valid_input_name(name) {
            self.skip(MutationError::name_rejected(name, MutationStrategy::Extra));
            return Box::new(iter::empty());
        }
        if !self.root_accepts_fields(MutationStrategy::Extra) {
            return Box::new(iter::empty());
        }

        let build = move |format: &'a FormatId| -> Result<Mutant, MutationError> {
            let injected = self.with.formatter.format(self.payload, format, "");
            let input = self
                .baseline
                .merge_top_level(name, StructuredValue::string(injected.clone()))?;

            Ok(Mutant {
                input,
                path: None,
                parameter: Some(name.to_string()),
                payload: self.payload.to_string(),
                format: Some(format.clone()),
                injected,
                strategy: MutationStrategy::Extra,
            })
        };

        Box::new(self.options.format_variants().into_iter().map(build))
    }

    // =========================================================================
    // Parameter-name fuzzing
    // =========================================================================

    fn name_fuzzing(self) -> Candidates<'a> {
        if !self.with.names.is_valid_as_input_name_payload(self.payload) {
            self.skip(MutationError::invalid_payload(
                MutationStrategy::Name,
                "not usable as an input name",
            ));
            return Box::new(iter::empty());
        }
        let slot = self.options.fuzz_name.as_str();
        if !self.with.names.is_valid_input_name(slot) {
            self.skip(MutationError::name_rejected(slot, MutationStrategy::Name));
            return Box::new(iter::empty());
        }
        if !self.root_accepts_fields(MutationStrategy::Name) {
            return Box::new(iter::empty());
        }

        let value = self.options.fuzz_name_value.clone();
        let candidate = self
            .baseline
            .merge_top_level(self.payload, StructuredValue::string(value.clone()))
            .map(|input| Mutant {
                input,
                path: None,
                parameter: Some(slot.to_string()),
                payload: self.payload.to_string(),
                format: None,
                injected: value,
                strategy: MutationStrategy::Name,
            });

        Box::new(iter::once(candidate))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn root_accepts_fields(&self, strategy: MutationStrategy) -> bool {
        if self.baseline.root().is_object() {
            return true;
        }
        self.with.sink.report(
            &format!("{} skipped: input root is not an object", strategy),
            self.payload,
        );
        false
    }

    fn skip(&self, reason: MutationError) {
        tracing::debug!(payload = self.payload, "Strategy skipped: {}", reason);
        self.with.sink.report(&reason.to_string(), self.payload);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzer::filters::{CollectingSink, ImmutableFields};
    use serde_json::json;

    fn run(
        baseline: &InputSet,
        payload: &str,
        options: &MutationOptions,
        strategy: MutationStrategy,
    ) -> Vec<Mutant> {
        MutationEngine::new(baseline, payload, options, Collaborators::default())
            .candidates(strategy)
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn value_mutation_visits_every_leaf_and_format() {
        let baseline = InputSet::from(json!({"a": 1, "b": {"c": "x"}}));
        let options = MutationOptions::default().with_formats(["straight", "append"]);

        let mutants = run(&baseline, "P", &options, MutationStrategy::Value);

        let bodies: Vec<_> = mutants.iter().map(|m| m.input.to_json()).collect();
        assert_eq!(
            bodies,
            vec![
                json!({"a": "P", "b": {"c": "x"}}),
                json!({"a": "1P", "b": {"c": "x"}}),
                json!({"a": 1, "b": {"c": "P"}}),
                json!({"a": 1, "b": {"c": "xP"}}),
            ]
        );
        assert_eq!(mutants[2].path, Some("b.c".parse().unwrap()));
        assert_eq!(mutants[2].parameter.as_deref(), Some("c"));
        assert_eq!(mutants[1].format, Some(FormatId::append()));
    }

    #[test]
    fn value_mutation_respects_immutable_fields() {
        let baseline = InputSet::from(json!({"a": 1, "b": "x"}));
        let options = MutationOptions::default();
        let immutable = ImmutableFields::new().with_name("a");
        let with = Collaborators {
            immutable: &immutable,
            ..Collaborators::default()
        };

        let mutants: Vec<_> = MutationEngine::new(&baseline, "P", &options, with)
            .candidates(MutationStrategy::Value)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(mutants.len(), 1);
        assert_eq!(mutants[0].path, Some("b".parse().unwrap()));
    }

    #[test]
    fn invalid_value_payload_is_reported_per_leaf() {
        let baseline = InputSet::from(json!({"a": 1, "b": "x"}));
        let options = MutationOptions::default();
        let sink = CollectingSink::new();
        let with = Collaborators {
            sink: &sink,
            ..Collaborators::default()
        };

        let count = MutationEngine::new(&baseline, "", &options, with)
            .candidates(MutationStrategy::Value)
            .count();

        assert_eq!(count, 0);
        assert_eq!(sink.len(), 2);
        assert!(sink.reports()[0].0.contains("value_mutation"));
    }

    #[test]
    fn extra_parameter_formats_without_original() {
        let baseline = InputSet::from(json!({"a": 1}));
        let options = MutationOptions::default()
            .with_formats(["straight", "append"])
            .with_extra_param_name("__extra");

        let mutants = run(&baseline, "Z", &options, MutationStrategy::Extra);

        assert_eq!(mutants.len(), 2);
        assert_eq!(mutants[0].input.to_json(), json!({"a": 1, "__extra": "Z"}));
        assert_eq!(mutants[1].input.to_json(), json!({"a": 1, "__extra": "Z"}));
        assert!(mutants.iter().all(|m| m.path.is_none()));
        assert_eq!(mutants[0].parameter.as_deref(), Some("__extra"));
    }

    #[test]
    fn rejected_extra_name_skips_strategy() {
        let baseline = InputSet::from(json!({"a": 1}));
        let options = MutationOptions::default().with_extra_param_name("bad name");
        let sink = CollectingSink::new();
        let with = Collaborators {
            sink: &sink,
            ..Collaborators::default()
        };

        let count = MutationEngine::new(&baseline, "Z", &options, with)
            .candidates(MutationStrategy::Extra)
            .count();

        assert_eq!(count, 0);
        assert_eq!(sink.len(), 1);
        assert!(sink.reports()[0].0.contains("bad name"));
    }

    #[test]
    fn name_fuzzing_uses_payload_as_key() {
        let baseline = InputSet::from(json!({"a": 1}));
        let options = MutationOptions::default().with_fuzz_name_value("v");

        let mutants = run(&baseline, "<script>", &options, MutationStrategy::Name);

        assert_eq!(mutants.len(), 1);
        let mutant = &mutants[0];
        assert_eq!(mutant.input.to_json(), json!({"a": 1, "<script>": "v"}));
        assert_eq!(mutant.path, None);
        assert_eq!(mutant.mutated_value(), None);
        assert_eq!(mutant.parameter.as_deref(), Some("__fuzz_name__"));
        assert_eq!(mutant.describe(), "name_fuzzing of \"__fuzz_name__\"");
        assert_eq!(
            mutant.input.get(&Path::from_iter(["<script>"])).unwrap(),
            &StructuredValue::string("v")
        );
        assert_eq!(mutant.format, None);
        assert_eq!(mutant.seed(), "<script>");
    }

    #[test]
    fn name_fuzzing_rejects_control_characters() {
        let baseline = InputSet::from(json!({"a": 1}));
        let options = MutationOptions::default();
        let sink = CollectingSink::new();
        let with = Collaborators {
            sink: &sink,
            ..Collaborators::default()
        };

        let count = MutationEngine::new(&baseline, "a\nb", &options, with)
            .candidates(MutationStrategy::Name)
            .count();

        assert_eq!(count, 0);
        assert_eq!(sink.reports()[0].1, "a\nb");
    }

    #[test]
    fn list_root_skips_object_strategies() {
        let baseline = InputSet::from(json!([1, 2]));
        let options = MutationOptions::all_strategies();
        let sink = CollectingSink::new();
        let with = Collaborators {
            sink: &sink,
            ..Collaborators::default()
        };
        let engine = MutationEngine::new(&baseline, "P", &options, with);

        assert_eq!(engine.candidates(MutationStrategy::Value).count(), 2);
        assert_eq!(engine.candidates(MutationStrategy::Extra).count(), 0);
        assert_eq!(engine.candidates(MutationStrategy::Name).count(), 0);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn describe_mentions_target_and_format() {
        let baseline = InputSet::from(json!({"a": 1, "b": "x"}));
        let options = MutationOptions::all_strategies();
        let value = run(&baseline, "P", &options, MutationStrategy::Value);
        let extra = run(&baseline, "P", &options, MutationStrategy::Extra);

        assert_eq!(
            value[1].describe(),
            "value_mutation of \"b\" with format straight"
        );
        assert_eq!(
            extra[0].describe(),
            "extra_parameter of \"__extra__\" with format straight"
        );
    }

    #[test]
    fn baseline_is_never_written() {
        let baseline = InputSet::from(json!({"a": [1, {"b": 2}]}));
        let before = baseline.clone();
        let options = MutationOptions::all_strategies();

        for strategy in MutationStrategy::all() {
            let _ = run(&baseline, "P", &options, strategy);
        }

        assert_eq!(baseline, before);
        assert_eq!(baseline.root(), before.baseline());
    }
}
